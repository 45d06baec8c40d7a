/// GameLoop: the top-level phase machine.
///
/// ┌──────────────────┬─────────────────────────┬──────────────────┐
/// │ Phase             │ Trigger                  │ Next             │
/// ├──────────────────┼─────────────────────────┼──────────────────┤
/// │ Selection         │ Confirmed(i)             │ Playing(i)       │
/// │ Playing           │ round timer reaches 0    │ Summary          │
/// │ Summary           │ countdown reaches 0      │ Prompt           │
/// │ Prompt            │ retry clicked            │ Playing (fresh)  │
/// │ Prompt            │ quit clicked             │ Terminated       │
/// │ any               │ window close             │ Terminated       │
/// └──────────────────┴─────────────────────────┴──────────────────┘
///
/// Exactly one stage object is alive at a time: the selection screen, or
/// a round (session plus, once it has ended, its result controller).

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{GameConfig, PhysicsConfig, RoundConfig};
use crate::domain::character::Character;
use crate::domain::entity::FrameInput;
use crate::domain::physics::{Playfield, Point};
use super::event::GameEvent;
use super::result::{ResultController, ResultOutcome, ResultStage};
use super::selection::{SelectionOutcome, SelectionScreen};
use super::session::{PlaySession, RoundPhase};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Selection,
    Playing,
    Summary,
    Prompt,
    Terminated,
}

enum Stage {
    Selection(SelectionScreen),
    Round {
        session: PlaySession,
        result: Option<ResultController>,
    },
    Terminated,
}

enum Transition {
    Stay,
    StartRound(usize),
    Retry(usize),
    Quit(&'static str),
}

pub struct GameLoop {
    stage: Stage,
    roster: Vec<Character>,
    round: RoundConfig,
    physics: PhysicsConfig,
    field: Playfield,
    rng: Pcg32,
    pointer: Option<Point>,
}

impl GameLoop {
    pub fn new(roster: Vec<Character>, config: &GameConfig, seed: u64) -> Self {
        let field = Playfield::new(config.display.playfield_width, config.display.playfield_height);
        GameLoop {
            stage: Stage::Selection(SelectionScreen::new(roster.len(), &field)),
            roster,
            round: config.round.clone(),
            physics: config.physics.clone(),
            field,
            rng: Pcg32::seed_from_u64(seed),
            pointer: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.stage {
            Stage::Selection(_) => Phase::Selection,
            Stage::Round { result: None, .. } => Phase::Playing,
            Stage::Round { result: Some(rc), .. } => match rc.stage() {
                ResultStage::Summary => Phase::Summary,
                ResultStage::Prompt => Phase::Prompt,
            },
            Stage::Terminated => Phase::Terminated,
        }
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.stage, Stage::Terminated)
    }

    pub fn roster(&self) -> &[Character] { &self.roster }
    pub fn field(&self) -> &Playfield { &self.field }

    /// Last pointer position seen, kept across frames without mouse motion.
    pub fn pointer(&self) -> Option<Point> { self.pointer }

    pub fn selection(&self) -> Option<&SelectionScreen> {
        match &self.stage {
            Stage::Selection(s) => Some(s),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&PlaySession> {
        match &self.stage {
            Stage::Round { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ResultController> {
        match &self.stage {
            Stage::Round { result, .. } => result.as_ref(),
            _ => None,
        }
    }

    /// The character of the current round, if one is running.
    pub fn active_character(&self) -> Option<&Character> {
        self.session().and_then(|s| self.roster.get(s.character()))
    }

    /// One frame: route input to the active stage and apply its transition.
    pub fn advance(&mut self, now: Instant, input: &FrameInput) -> Phase {
        if input.pointer.is_some() {
            self.pointer = input.pointer;
        }
        if !self.is_running() {
            return Phase::Terminated;
        }

        let before = self.phase();
        let transition = if input.quit {
            Transition::Quit("window closed")
        } else {
            self.route(now, input)
        };

        match transition {
            Transition::Stay => {}
            Transition::StartRound(i) => {
                log::info!("character {} selected", self.character_name(i));
                self.start_round(i, now);
            }
            Transition::Retry(i) => {
                log::info!("retry with {}", self.character_name(i));
                self.start_round(i, now);
            }
            Transition::Quit(reason) => {
                log::info!("quit: {reason}");
                self.stage = Stage::Terminated;
            }
        }

        let after = self.phase();
        if after != before {
            log::info!("phase {:?} -> {:?}", before, after);
        }
        after
    }

    fn route(&mut self, now: Instant, input: &FrameInput) -> Transition {
        let summary_secs = self.round.summary_secs;
        let field = self.field;

        match &mut self.stage {
            Stage::Selection(screen) => match screen.advance(input) {
                SelectionOutcome::Continue(_) => Transition::Stay,
                SelectionOutcome::Confirmed(i) => Transition::StartRound(i),
                SelectionOutcome::Quit => Transition::Quit("quit from selection"),
            },
            Stage::Round { session, result } => {
                if let Some(rc) = result.as_mut() {
                    return match rc.advance(now, input) {
                        ResultOutcome::StillSummarizing | ResultOutcome::StillPrompting => Transition::Stay,
                        ResultOutcome::RetryRequested => Transition::Retry(session.character()),
                        ResultOutcome::QuitRequested => Transition::Quit("quit from prompt"),
                    };
                }

                session.step(now, input);
                log_events(&session.take_events());
                if session.phase() == RoundPhase::Ended {
                    let anchor = session.ended_at().unwrap_or(now);
                    let rc = ResultController::new(anchor, session.score(), summary_secs, &field);
                    log::debug!("result tier {:?}", rc.tier());
                    *result = Some(rc);
                }
                Transition::Stay
            }
            Stage::Terminated => Transition::Stay,
        }
    }

    fn start_round(&mut self, character: usize, now: Instant) {
        let seed: u64 = self.rng.random();
        let session = PlaySession::new(character, &self.round, &self.physics, self.field, seed, now);
        self.stage = Stage::Round { session, result: None };
    }

    fn character_name(&self, i: usize) -> &str {
        self.roster.get(i).map(|c| c.name).unwrap_or("?")
    }
}

fn log_events(events: &[GameEvent]) {
    for e in events {
        match e {
            GameEvent::RoundEnded { score } => log::info!("round over, score {score}"),
            GameEvent::CoinCollected { .. } | GameEvent::CoinMissed { .. } => log::debug!("{e:?}"),
            _ => log::trace!("{e:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::character::default_roster;

    const FRAME: Duration = Duration::from_millis(16);

    fn game(duration_secs: u32) -> GameLoop {
        let mut cfg = GameConfig::default();
        cfg.round.duration_secs = duration_secs;
        cfg.round.spawn_one_in = 0;
        GameLoop::new(default_roster(), &cfg, 1)
    }

    fn confirm() -> FrameInput {
        FrameInput { confirm: true, ..FrameInput::default() }
    }

    fn quit() -> FrameInput {
        FrameInput { quit: true, ..FrameInput::default() }
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    /// Drive a fresh game to the prompt. Returns the instant the prompt showed.
    fn to_prompt(g: &mut GameLoop, t0: Instant) -> Instant {
        g.advance(t0, &confirm());
        g.advance(t0 + Duration::from_secs(1), &idle());
        assert_eq!(g.phase(), Phase::Summary);
        let t = t0 + Duration::from_secs(4);
        g.advance(t, &idle());
        assert_eq!(g.phase(), Phase::Prompt);
        t
    }

    fn retry_click(g: &GameLoop) -> FrameInput {
        let c = g.result().unwrap().buttons().retry.center();
        FrameInput::click_at(c.x, c.y)
    }

    #[test]
    fn starts_in_selection() {
        let g = game(45);
        assert_eq!(g.phase(), Phase::Selection);
        assert!(g.is_running());
        assert!(g.session().is_none());
    }

    #[test]
    fn confirm_starts_round_with_chosen_character() {
        let t0 = Instant::now();
        let mut g = game(45);
        g.advance(t0, &FrameInput { nav_right: true, ..FrameInput::default() });
        assert_eq!(g.advance(t0 + FRAME, &confirm()), Phase::Playing);
        assert_eq!(g.session().unwrap().character(), 1);
        assert_eq!(g.active_character().unwrap().name, "Cute");
        assert!(g.selection().is_none());
    }

    #[test]
    fn timer_expiry_moves_to_summary_with_zero_time_left() {
        let t0 = Instant::now();
        let mut g = game(1);
        g.advance(t0, &confirm());
        assert_eq!(g.advance(t0 + Duration::from_millis(500), &idle()), Phase::Playing);
        assert_eq!(g.advance(t0 + Duration::from_secs(1), &idle()), Phase::Summary);
        assert_eq!(g.session().unwrap().time_left(), 0);
        g.advance(t0 + Duration::from_millis(1500), &idle());
        assert_eq!(g.session().unwrap().time_left(), 0);
        assert_eq!(g.result().unwrap().final_score(), 0);
    }

    #[test]
    fn summary_becomes_prompt_after_countdown() {
        let t0 = Instant::now();
        let mut g = game(1);
        g.advance(t0, &confirm());
        g.advance(t0 + Duration::from_secs(1), &idle());
        assert_eq!(g.advance(t0 + Duration::from_millis(3999), &idle()), Phase::Summary);
        assert_eq!(g.advance(t0 + Duration::from_secs(4), &idle()), Phase::Prompt);
    }

    #[test]
    fn retry_gives_fresh_round_on_next_frame() {
        let t0 = Instant::now();
        let mut g = game(1);
        let t = to_prompt(&mut g, t0);
        let click = retry_click(&g);

        assert_eq!(g.advance(t + FRAME, &click), Phase::Playing);
        let s = g.session().unwrap();
        assert_eq!(s.score(), 0);
        assert!(s.coins().is_empty());
        assert_eq!(s.time_left(), 1);
        assert_eq!(s.player().y, 540.0);
        assert!(g.result().is_none());

        // very next frame still a full-length round
        assert_eq!(g.advance(t + FRAME * 2, &idle()), Phase::Playing);
        assert_eq!(g.session().unwrap().time_left(), 1);
    }

    #[test]
    fn retry_keeps_character() {
        let t0 = Instant::now();
        let mut g = game(1);
        g.advance(t0, &FrameInput { nav_left: true, ..FrameInput::default() });
        let t = to_prompt(&mut g, t0 + FRAME);
        let click = retry_click(&g);
        g.advance(t + FRAME, &click);
        assert_eq!(g.session().unwrap().character(), 2);
    }

    #[test]
    fn quit_click_terminates() {
        let t0 = Instant::now();
        let mut g = game(1);
        let t = to_prompt(&mut g, t0);
        let c = g.result().unwrap().buttons().quit.center();
        assert_eq!(g.advance(t + FRAME, &FrameInput::click_at(c.x, c.y)), Phase::Terminated);
        assert!(!g.is_running());
    }

    #[test]
    fn window_close_terminates_from_every_phase() {
        let t0 = Instant::now();

        let mut g = game(1);
        assert_eq!(g.advance(t0, &quit()), Phase::Terminated);

        let mut g = game(1);
        g.advance(t0, &confirm());
        assert_eq!(g.advance(t0 + FRAME, &quit()), Phase::Terminated);

        let mut g = game(1);
        g.advance(t0, &confirm());
        g.advance(t0 + Duration::from_secs(1), &idle());
        assert_eq!(g.phase(), Phase::Summary);
        assert_eq!(g.advance(t0 + Duration::from_secs(2), &quit()), Phase::Terminated);

        let mut g = game(1);
        let t = to_prompt(&mut g, t0);
        assert_eq!(g.advance(t + FRAME, &quit()), Phase::Terminated);
    }

    #[test]
    fn terminated_is_absorbing() {
        let t0 = Instant::now();
        let mut g = game(1);
        g.advance(t0, &quit());
        assert_eq!(g.advance(t0 + FRAME, &confirm()), Phase::Terminated);
        assert!(g.session().is_none());
    }

    #[test]
    fn retry_click_during_summary_does_nothing() {
        let t0 = Instant::now();
        let mut g = game(1);
        g.advance(t0, &confirm());
        g.advance(t0 + Duration::from_secs(1), &idle());
        let click = retry_click(&g);
        assert_eq!(g.advance(t0 + Duration::from_secs(2), &click), Phase::Summary);
    }

    #[test]
    fn pointer_is_remembered_between_frames() {
        let t0 = Instant::now();
        let mut g = game(45);
        let input = FrameInput { pointer: Some(Point::new(5.0, 6.0)), ..FrameInput::default() };
        g.advance(t0, &input);
        g.advance(t0 + FRAME, &idle());
        assert_eq!(g.pointer(), Some(Point::new(5.0, 6.0)));
    }
}
