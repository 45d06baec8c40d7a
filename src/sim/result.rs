/// ResultController: what happens after the round timer runs out.
///
/// Two stages, one way:
///   1. **Summary**: tier comment, final score, countdown. Clicks ignored.
///      Lasts `summary_secs` of wall-clock time from the end of the round.
///   2. **Prompt**: retry / quit buttons. Stays until one is clicked.
///
/// The button rectangles are fixed for the playfield and exist in both
/// stages; only the Prompt stage acts on clicks.

use std::time::Instant;

use crate::domain::entity::FrameInput;
use crate::domain::physics::{Playfield, Point};
use crate::domain::rules::{self, PromptButton, PromptButtons, Tier};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResultStage {
    Summary,
    Prompt,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResultOutcome {
    StillSummarizing,
    StillPrompting,
    RetryRequested,
    QuitRequested,
}

#[derive(Clone, Debug)]
pub struct ResultController {
    anchor: Instant,
    summary_secs: u32,
    final_score: u32,
    tier: Tier,
    stage: ResultStage,
    buttons: PromptButtons,
    countdown: u32,
}

impl ResultController {
    /// `anchor` is the instant the round ended.
    pub fn new(anchor: Instant, final_score: u32, summary_secs: u32, field: &Playfield) -> Self {
        ResultController {
            anchor,
            summary_secs,
            final_score,
            tier: Tier::for_score(final_score),
            stage: ResultStage::Summary,
            buttons: rules::prompt_buttons(field),
            countdown: summary_secs,
        }
    }

    pub fn stage(&self) -> ResultStage { self.stage }
    pub fn final_score(&self) -> u32 { self.final_score }
    pub fn tier(&self) -> Tier { self.tier }
    pub fn comment(&self) -> &'static str { self.tier.comment() }
    pub fn buttons(&self) -> &PromptButtons { &self.buttons }

    /// Seconds left on the summary countdown, as of the last `advance`.
    pub fn countdown(&self) -> u32 { self.countdown }

    /// Which button the pointer is over. Visual feedback only.
    pub fn hovered(&self, pointer: Option<Point>) -> Option<PromptButton> {
        pointer.and_then(|p| self.buttons.hit(p))
    }

    pub fn advance(&mut self, now: Instant, input: &FrameInput) -> ResultOutcome {
        if self.stage == ResultStage::Summary {
            let waited = rules::whole_seconds(now.saturating_duration_since(self.anchor));
            self.countdown = rules::seconds_left(self.summary_secs, waited).min(self.countdown);
            if self.countdown > 0 {
                return ResultOutcome::StillSummarizing;
            }
            self.stage = ResultStage::Prompt;
        }

        for click in &input.clicks {
            match self.buttons.hit(*click) {
                Some(PromptButton::Retry) => return ResultOutcome::RetryRequested,
                Some(PromptButton::Quit) => return ResultOutcome::QuitRequested,
                None => {}
            }
        }
        ResultOutcome::StillPrompting
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    fn retry_click(rc: &ResultController) -> FrameInput {
        let c = rc.buttons().retry.center();
        FrameInput::click_at(c.x, c.y)
    }

    fn quit_click(rc: &ResultController) -> FrameInput {
        let c = rc.buttons().quit.center();
        FrameInput::click_at(c.x, c.y)
    }

    #[test]
    fn tier_comes_from_final_score() {
        let t0 = Instant::now();
        assert_eq!(ResultController::new(t0, 150, 3, &field()).tier(), Tier::Low);
        assert_eq!(ResultController::new(t0, 300, 3, &field()).tier(), Tier::Middle);
        assert_eq!(ResultController::new(t0, 501, 3, &field()).tier(), Tier::Top);
    }

    #[test]
    fn summary_counts_down_then_prompts() {
        let t0 = Instant::now();
        let mut rc = ResultController::new(t0, 200, 3, &field());
        let idle = FrameInput::default();

        assert_eq!(rc.advance(t0, &idle), ResultOutcome::StillSummarizing);
        assert_eq!(rc.countdown(), 3);
        assert_eq!(rc.advance(t0 + Duration::from_millis(1500), &idle), ResultOutcome::StillSummarizing);
        assert_eq!(rc.countdown(), 2);
        assert_eq!(rc.advance(t0 + Duration::from_millis(2999), &idle), ResultOutcome::StillSummarizing);
        assert_eq!(rc.countdown(), 1);
        assert_eq!(rc.advance(t0 + Duration::from_secs(3), &idle), ResultOutcome::StillPrompting);
        assert_eq!(rc.stage(), ResultStage::Prompt);
        assert_eq!(rc.countdown(), 0);
    }

    #[test]
    fn prompt_is_irreversible() {
        let t0 = Instant::now();
        let mut rc = ResultController::new(t0, 200, 3, &field());
        rc.advance(t0 + Duration::from_secs(4), &FrameInput::default());
        assert_eq!(rc.stage(), ResultStage::Prompt);
        // Even a timestamp from before the anchor cannot bring the summary back
        assert_eq!(rc.advance(t0, &FrameInput::default()), ResultOutcome::StillPrompting);
        assert_eq!(rc.stage(), ResultStage::Prompt);
    }

    #[test]
    fn clicks_during_summary_are_ignored() {
        let t0 = Instant::now();
        let mut rc = ResultController::new(t0, 200, 3, &field());
        let click = retry_click(&rc);
        assert_eq!(rc.advance(t0 + Duration::from_secs(1), &click), ResultOutcome::StillSummarizing);
        let click = quit_click(&rc);
        assert_eq!(rc.advance(t0 + Duration::from_secs(2), &click), ResultOutcome::StillSummarizing);
    }

    #[test]
    fn retry_and_quit_clicks_in_prompt() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(5);

        let mut rc = ResultController::new(t0, 200, 3, &field());
        let click = retry_click(&rc);
        assert_eq!(rc.advance(later, &click), ResultOutcome::RetryRequested);

        let mut rc = ResultController::new(t0, 200, 3, &field());
        let click = quit_click(&rc);
        assert_eq!(rc.advance(later, &click), ResultOutcome::QuitRequested);
    }

    #[test]
    fn click_outside_buttons_keeps_prompting() {
        let t0 = Instant::now();
        let mut rc = ResultController::new(t0, 200, 3, &field());
        let click = FrameInput::click_at(10.0, 10.0);
        assert_eq!(rc.advance(t0 + Duration::from_secs(5), &click), ResultOutcome::StillPrompting);
    }

    #[test]
    fn zero_length_summary_prompts_immediately() {
        let t0 = Instant::now();
        let mut rc = ResultController::new(t0, 0, 0, &field());
        assert_eq!(rc.advance(t0, &FrameInput::default()), ResultOutcome::StillPrompting);
    }

    #[test]
    fn hover_reports_button_in_any_stage() {
        let t0 = Instant::now();
        let rc = ResultController::new(t0, 0, 3, &field());
        let retry = rc.buttons().retry.center();
        let quit = rc.buttons().quit.center();
        assert_eq!(rc.hovered(Some(retry)), Some(PromptButton::Retry));
        assert_eq!(rc.hovered(Some(quit)), Some(PromptButton::Quit));
        assert_eq!(rc.hovered(Some(Point::new(0.0, 0.0))), None);
        assert_eq!(rc.hovered(None), None);
    }
}
