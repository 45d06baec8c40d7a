/// SelectionScreen: choose a character before the first round.
///
/// Only state is the cursor. Per frame, in order:
///   quit  → Quit
///   ←/→   → move cursor (wraps both ways)
///   Enter → Confirmed(cursor)
///   click on a card → Confirmed(that card)

use crate::domain::entity::FrameInput;
use crate::domain::physics::{Playfield, Rect};
use crate::domain::rules;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SelectionOutcome {
    Continue(usize),
    Confirmed(usize),
    Quit,
}

#[derive(Clone, Debug)]
pub struct SelectionScreen {
    cursor: usize,
    count: usize,
    cards: Vec<Rect>,
}

impl SelectionScreen {
    /// `count` must be at least 1.
    pub fn new(count: usize, field: &Playfield) -> Self {
        let count = count.max(1);
        SelectionScreen {
            cursor: 0,
            count,
            cards: rules::character_cards(field, count),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cards(&self) -> &[Rect] {
        &self.cards
    }

    /// Move by `delta` positions, modulo the roster size.
    pub fn move_cursor(&mut self, delta: isize) {
        let n = self.count as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(n) as usize;
    }

    pub fn advance(&mut self, input: &FrameInput) -> SelectionOutcome {
        if input.quit {
            return SelectionOutcome::Quit;
        }

        if input.nav_left {
            self.move_cursor(-1);
        }
        if input.nav_right {
            self.move_cursor(1);
        }

        if input.confirm {
            return SelectionOutcome::Confirmed(self.cursor);
        }

        for click in &input.clicks {
            if let Some(i) = rules::card_at(&self.cards, *click) {
                self.cursor = i;
                return SelectionOutcome::Confirmed(i);
            }
        }

        SelectionOutcome::Continue(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(n: usize) -> SelectionScreen {
        SelectionScreen::new(n, &Playfield::new(800.0, 600.0))
    }

    fn press_left() -> FrameInput {
        FrameInput { nav_left: true, ..FrameInput::default() }
    }

    fn press_right() -> FrameInput {
        FrameInput { nav_right: true, ..FrameInput::default() }
    }

    #[test]
    fn starts_on_first_character() {
        let mut s = screen(3);
        assert_eq!(s.advance(&FrameInput::default()), SelectionOutcome::Continue(0));
    }

    #[test]
    fn left_from_first_wraps_to_last() {
        let mut s = screen(3);
        assert_eq!(s.advance(&press_left()), SelectionOutcome::Continue(2));
    }

    #[test]
    fn right_from_last_wraps_to_first() {
        let mut s = screen(3);
        s.move_cursor(2);
        assert_eq!(s.advance(&press_right()), SelectionOutcome::Continue(0));
    }

    #[test]
    fn right_then_left_same_count_is_identity() {
        for n in 1..=5 {
            for start in 0..n {
                for k in 0..(3 * n) {
                    let mut s = screen(n);
                    s.move_cursor(start as isize);
                    for _ in 0..k { s.advance(&press_right()); }
                    for _ in 0..k { s.advance(&press_left()); }
                    assert_eq!(s.cursor(), start, "n={n} start={start} k={k}");
                }
            }
        }
    }

    #[test]
    fn confirm_returns_cursor() {
        let mut s = screen(3);
        s.advance(&press_right());
        let input = FrameInput { confirm: true, ..FrameInput::default() };
        assert_eq!(s.advance(&input), SelectionOutcome::Confirmed(1));
    }

    #[test]
    fn confirm_applies_same_frame_navigation_first() {
        let mut s = screen(3);
        let input = FrameInput { nav_left: true, confirm: true, ..FrameInput::default() };
        assert_eq!(s.advance(&input), SelectionOutcome::Confirmed(2));
    }

    #[test]
    fn click_on_card_confirms_that_card() {
        let mut s = screen(3);
        let card = s.cards()[2];
        let c = card.center();
        assert_eq!(s.advance(&FrameInput::click_at(c.x, c.y)), SelectionOutcome::Confirmed(2));
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn click_outside_cards_is_ignored() {
        let mut s = screen(3);
        assert_eq!(s.advance(&FrameInput::click_at(5.0, 5.0)), SelectionOutcome::Continue(0));
    }

    #[test]
    fn quit_wins_over_everything() {
        let mut s = screen(3);
        let input = FrameInput { quit: true, confirm: true, ..FrameInput::click_at(400.0, 300.0) };
        assert_eq!(s.advance(&input), SelectionOutcome::Quit);
    }
}
