/// Playfield geometry and per-frame kinematics.
///
/// ## Coordinates
///
/// Logical pixels, origin at the top-left of the playfield, y grows down.
/// The renderer maps these onto terminal cells; nothing here knows about cells.
///
/// ## Rectangle semantics
///
/// Two different rules, on purpose:
///   - `Rect::intersects` is INCLUSIVE. Rectangles sharing only an edge
///     or a corner collide (a coin grazing the player's head is caught).
///   - `Rect::contains` is HALF-OPEN (`left <= x < right`), so adjacent
///     buttons never both claim the same pointer position.
///
/// ## Player kinematics (one call each per frame, in this order)
///
///   1. `move_horizontal`: two independent clamped updates (left, then right)
///   2. `try_launch`: set launch velocity if grounded and jump held
///   3. `integrate_vertical`: gravity, then position, then landing check
///
/// Every function leaves the player inside
/// `[0, width - size] x [TOP_BOUND, ground_y]`.

use super::entity::{Coin, Player};

/// Top of the reachable area for the player.
pub const TOP_BOUND: f32 = 0.0;

/// Gap between the player's feet and the bottom of the playfield when grounded.
pub const GROUND_MARGIN: f32 = 10.0;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> f32 { self.x }
    pub fn right(&self) -> f32 { self.x + self.w }
    pub fn top(&self) -> f32 { self.y }
    pub fn bottom(&self) -> f32 { self.y + self.h }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive overlap test: touching edges count as a hit.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Half-open point containment, for pointer hit-tests.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right()
            && p.y >= self.top() && p.y < self.bottom()
    }
}

/// The fixed visible play area.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Playfield { width, height }
    }

    /// Resting y for an actor of side `size`.
    pub fn ground_y(&self, size: f32) -> f32 {
        self.height - size - GROUND_MARGIN
    }

    /// Rightmost x for an actor of side `size`.
    pub fn max_x(&self, size: f32) -> f32 {
        (self.width - size).max(0.0)
    }
}

/// Apply held left/right as two independent clamped updates.
/// Opposite holds cancel only because each update is applied in turn.
pub fn move_horizontal(player: &mut Player, left: bool, right: bool, speed: f32, field: &Playfield) {
    let max_x = field.max_x(player.size);
    if left && player.x > 0.0 {
        player.x = (player.x - speed).max(0.0);
    }
    if right && player.x < max_x {
        player.x = (player.x + speed).min(max_x);
    }
}

/// Start a jump if grounded. Returns true when a launch happened.
/// No double jump: holding jump while airborne does nothing.
pub fn try_launch(player: &mut Player, jump_held: bool, launch_velocity: f32) -> bool {
    if jump_held && !player.airborne {
        player.vertical_velocity = launch_velocity;
        player.airborne = true;
        true
    } else {
        false
    }
}

/// One frame of gravity for an airborne player. Returns true on landing.
/// Velocity is left as-is on landing; the next launch overwrites it.
pub fn integrate_vertical(player: &mut Player, gravity: f32, ground_y: f32) -> bool {
    if !player.airborne {
        return false;
    }
    player.vertical_velocity += gravity;
    player.y += player.vertical_velocity;
    if player.y < TOP_BOUND {
        player.y = TOP_BOUND;
    }
    if player.y >= ground_y {
        player.y = ground_y;
        player.airborne = false;
        return true;
    }
    false
}

/// Move a coin down by one frame's fall distance.
#[inline]
pub fn fall(coin: &mut Coin, distance: f32) {
    coin.bounds.y += distance;
}
