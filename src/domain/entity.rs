/// Entities: Player and Coin, plus the per-frame input snapshot that drives them.
/// All positions are logical playfield pixels, origin top-left, y down.

use super::physics::{Point, Rect};

/// Frame input: continuous held state for movement/jump, edge-triggered
/// presses for navigation, and pointer data for clicks and hover.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    // Held (continuous)
    pub left: bool,
    pub right: bool,
    pub jump: bool,

    // Fresh presses (edge)
    pub nav_left: bool,
    pub nav_right: bool,
    pub confirm: bool,
    /// Window-close request. Ends the game from any phase.
    pub quit: bool,

    // Pointer
    pub pointer: Option<Point>,
    pub clicks: Vec<Point>,
}

impl FrameInput {
    pub fn click_at(x: f32, y: f32) -> Self {
        FrameInput {
            pointer: Some(Point::new(x, y)),
            clicks: vec![Point::new(x, y)],
            ..FrameInput::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vertical_velocity: f32,
    /// Between launch and landing.
    pub airborne: bool,
    pub size: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Player {
            x, y,
            vertical_velocity: 0.0,
            airborne: false,
            size,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    /// Per-round serial; never reused within a round.
    pub id: u32,
    pub bounds: Rect,
}

impl Coin {
    pub fn new(id: u32, x: f32, y: f32, size: f32) -> Self {
        Coin { id, bounds: Rect::new(x, y, size, size) }
    }

    /// Has the coin's top edge gone past the bottom of a field `height` tall?
    pub fn is_below(&self, height: f32) -> bool {
        self.bounds.top() > height
    }

    /// Radius of the circle drawn when no coin sprite is available.
    pub fn radius(&self) -> f32 {
        self.bounds.w.min(self.bounds.h) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_is_grounded_and_still() {
        let p = Player::new(400.0, 540.0, 50.0);
        assert!(!p.airborne);
        assert_eq!(p.vertical_velocity, 0.0);
        assert_eq!(p.bounds(), Rect::new(400.0, 540.0, 50.0, 50.0));
    }

    #[test]
    fn coin_below_only_after_top_passes_bottom() {
        let mut c = Coin::new(1, 10.0, 595.0, 45.0);
        assert!(!c.is_below(600.0));
        c.bounds.y = 600.0;
        assert!(!c.is_below(600.0)); // top exactly on the edge is still in
        c.bounds.y = 600.5;
        assert!(c.is_below(600.0));
    }

    #[test]
    fn coin_radius_is_half_side() {
        let c = Coin::new(0, 0.0, 0.0, 45.0);
        assert!((c.radius() - 22.5).abs() < f32::EPSILON);
    }

    #[test]
    fn click_helper_sets_pointer_and_click() {
        let input = FrameInput::click_at(3.0, 4.0);
        assert_eq!(input.pointer, Some(Point::new(3.0, 4.0)));
        assert_eq!(input.clicks, vec![Point::new(3.0, 4.0)]);
        assert!(!input.quit);
    }
}
