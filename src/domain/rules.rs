/// Round rules: pure functions, no side effects.
///
/// ## Clock
///
/// Both timers count whole seconds of wall-clock time (floor), the same
/// way the HUD shows them:
///
/// ┌──────────────────────┬──────────────────────────────────────┐
/// │ Quantity              │ Value                                │
/// ├──────────────────────┼──────────────────────────────────────┤
/// │ elapsed_secs          │ floor(now - anchor)                  │
/// │ time_left             │ max(0, duration - elapsed_secs)      │
/// │ summary countdown     │ max(0, summary - floor(now - ended)) │
/// └──────────────────────┴──────────────────────────────────────┘
///
/// ## Tiers
///
/// ┌──────────────────┬──────────┐
/// │ Final score       │ Tier     │
/// ├──────────────────┼──────────┤
/// │ 0 ..= 299         │ Low      │
/// │ 300 ..= 500       │ Middle   │
/// │ 501 ..            │ Top      │
/// └──────────────────┴──────────┘
///
/// ## Layout
///
/// Character cards and prompt buttons are derived from the playfield only,
/// so hit-testing works in every phase, not just while something is drawn.

use std::time::Duration;

use super::physics::{Playfield, Point, Rect};

// ══════════════════════════════════════════════════════════════
// Clock
// ══════════════════════════════════════════════════════════════

/// Whole seconds in `elapsed`, saturating at `u32::MAX`.
pub fn whole_seconds(elapsed: Duration) -> u32 {
    u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX)
}

/// Seconds left on a countdown of `total` after `elapsed_secs`. Never negative.
pub fn seconds_left(total: u32, elapsed_secs: u32) -> u32 {
    total.saturating_sub(elapsed_secs)
}

/// The HUD timer turns red at or below this many seconds.
pub const TIMER_WARNING_SECS: u32 = 10;

// ══════════════════════════════════════════════════════════════
// Score tiers
// ══════════════════════════════════════════════════════════════

/// Lowest score of the middle tier (inclusive).
pub const MIDDLE_TIER_MIN: u32 = 300;
/// Highest score of the middle tier (inclusive).
pub const MIDDLE_TIER_MAX: u32 = 500;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tier {
    Low,
    Middle,
    Top,
}

impl Tier {
    pub fn for_score(score: u32) -> Tier {
        if score < MIDDLE_TIER_MIN {
            Tier::Low
        } else if score <= MIDDLE_TIER_MAX {
            Tier::Middle
        } else {
            Tier::Top
        }
    }

    pub fn comment(self) -> &'static str {
        match self {
            Tier::Low => "Keep practicing...",
            Tier::Middle => "Not bad!",
            Tier::Top => "Coin master!",
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Layout
// ══════════════════════════════════════════════════════════════

/// Side of a character card on the selection screen.
pub const CARD_SIZE: f32 = 100.0;

/// Card rectangles for `count` characters, spread evenly across the
/// playfield and vertically centred.
pub fn character_cards(field: &Playfield, count: usize) -> Vec<Rect> {
    let step = (field.width / (count as f32 + 1.0)).floor();
    let y = (field.height / 2.0).floor() - CARD_SIZE / 2.0;
    (0..count)
        .map(|i| {
            let x = step * (i as f32 + 1.0) - CARD_SIZE / 2.0;
            Rect::new(x, y, CARD_SIZE, CARD_SIZE)
        })
        .collect()
}

/// Index of the card containing `p`, if any.
pub fn card_at(cards: &[Rect], p: Point) -> Option<usize> {
    cards.iter().position(|r| r.contains(p))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromptButton {
    Retry,
    Quit,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PromptButtons {
    pub retry: Rect,
    pub quit: Rect,
}

impl PromptButtons {
    pub fn hit(&self, p: Point) -> Option<PromptButton> {
        if self.retry.contains(p) {
            Some(PromptButton::Retry)
        } else if self.quit.contains(p) {
            Some(PromptButton::Quit)
        } else {
            None
        }
    }
}

const BUTTON_W: f32 = 140.0;
const BUTTON_H: f32 = 60.0;

/// Retry sits left of centre, quit right of centre, 40px apart.
pub fn prompt_buttons(field: &Playfield) -> PromptButtons {
    let cx = (field.width / 2.0).floor();
    let cy = (field.height / 2.0).floor();
    PromptButtons {
        retry: Rect::new(cx - 160.0, cy - 20.0, BUTTON_W, BUTTON_H),
        quit: Rect::new(cx + 20.0, cy - 20.0, BUTTON_W, BUTTON_H),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    // ── Clock ──

    #[test]
    fn whole_seconds_floors() {
        assert_eq!(whole_seconds(Duration::from_millis(999)), 0);
        assert_eq!(whole_seconds(Duration::from_millis(1000)), 1);
        assert_eq!(whole_seconds(Duration::from_millis(44_999)), 44);
    }

    #[test]
    fn seconds_left_never_negative() {
        assert_eq!(seconds_left(45, 0), 45);
        assert_eq!(seconds_left(45, 44), 1);
        assert_eq!(seconds_left(45, 45), 0);
        assert_eq!(seconds_left(45, 90), 0);
    }

    // ── Tiers ──

    #[test]
    fn tier_boundaries() {
        assert_eq!(Tier::for_score(0), Tier::Low);
        assert_eq!(Tier::for_score(150), Tier::Low);
        assert_eq!(Tier::for_score(299), Tier::Low);
        assert_eq!(Tier::for_score(300), Tier::Middle);
        assert_eq!(Tier::for_score(500), Tier::Middle);
        assert_eq!(Tier::for_score(501), Tier::Top);
        assert_eq!(Tier::for_score(10_000), Tier::Top);
    }

    #[test]
    fn tiers_have_distinct_comments() {
        let c = [Tier::Low.comment(), Tier::Middle.comment(), Tier::Top.comment()];
        assert_ne!(c[0], c[1]);
        assert_ne!(c[1], c[2]);
        assert_ne!(c[0], c[2]);
    }

    // ── Layout ──

    #[test]
    fn three_cards_match_reference_positions() {
        let cards = character_cards(&field(), 3);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0], Rect::new(150.0, 250.0, 100.0, 100.0));
        assert_eq!(cards[1], Rect::new(350.0, 250.0, 100.0, 100.0));
        assert_eq!(cards[2], Rect::new(550.0, 250.0, 100.0, 100.0));
    }

    #[test]
    fn cards_never_overlap() {
        let cards = character_cards(&field(), 5);
        for (i, a) in cards.iter().enumerate() {
            for b in &cards[i + 1..] {
                assert!(a.right() < b.left());
            }
        }
    }

    #[test]
    fn card_hit_test() {
        let cards = character_cards(&field(), 3);
        assert_eq!(card_at(&cards, Point::new(400.0, 300.0)), Some(1));
        assert_eq!(card_at(&cards, Point::new(300.0, 300.0)), None);
    }

    #[test]
    fn prompt_buttons_reference_positions() {
        let b = prompt_buttons(&field());
        assert_eq!(b.retry, Rect::new(240.0, 280.0, 140.0, 60.0));
        assert_eq!(b.quit, Rect::new(420.0, 280.0, 140.0, 60.0));
    }

    #[test]
    fn prompt_hit_test() {
        let b = prompt_buttons(&field());
        assert_eq!(b.hit(Point::new(300.0, 300.0)), Some(PromptButton::Retry));
        assert_eq!(b.hit(Point::new(500.0, 300.0)), Some(PromptButton::Quit));
        assert_eq!(b.hit(Point::new(400.0, 300.0)), None); // gap between them
        assert_eq!(b.hit(Point::new(10.0, 10.0)), None);
    }
}
