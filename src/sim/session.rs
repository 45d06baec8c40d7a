/// PlaySession: one round of play, and the step function that advances it.
///
/// Processing order per frame:
///   1. Timer check (expiry ends the round and stops the frame)
///   2. Horizontal movement (two independent clamped updates)
///   3. Jump initiation
///   4. Gravity / landing
///   5. Coin spawn
///   6. Coin fall + resolution (collected, or missed off the bottom)
///
/// The session owns the player, the coins and the round clock. Nothing
/// else mutates them; a retry builds a brand new session.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{PhysicsConfig, RoundConfig};
use crate::domain::entity::{Coin, FrameInput, Player};
use crate::domain::physics::{self, Playfield};
use crate::domain::rules;
use super::event::GameEvent;

/// Coins appear this far above the top edge, so they slide into view.
pub const COIN_SPAWN_Y: f32 = -50.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoundPhase {
    Playing,
    Ended,
}

/// Everything the renderer needs for one frame of play.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundSnapshot {
    pub player: Player,
    pub coins: Vec<Coin>,
    pub score: u32,
    pub time_left: u32,
    pub ended: bool,
}

pub struct PlaySession {
    character: usize,
    rules: RoundConfig,
    physics: PhysicsConfig,
    field: Playfield,

    // ── Entities ──
    player: Player,
    coins: Vec<Coin>,
    next_coin_id: u32,

    // ── Round state ──
    score: u32,
    started_at: Instant,
    elapsed_secs: u32,
    phase: RoundPhase,
    ended_at: Option<Instant>,

    rng: Pcg32,
    events: Vec<GameEvent>,
}

// ── Construction / queries ──

impl PlaySession {
    pub fn new(
        character: usize,
        rules: &RoundConfig,
        physics: &PhysicsConfig,
        field: Playfield,
        seed: u64,
        now: Instant,
    ) -> Self {
        let size = physics.player_size;
        let start_x = (field.width / 2.0).floor().min(field.max_x(size));
        PlaySession {
            character,
            rules: rules.clone(),
            physics: physics.clone(),
            field,
            player: Player::new(start_x, field.ground_y(size), size),
            coins: Vec::new(),
            next_coin_id: 0,
            score: 0,
            started_at: now,
            elapsed_secs: 0,
            phase: RoundPhase::Playing,
            ended_at: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn character(&self) -> usize { self.character }
    pub fn player(&self) -> &Player { &self.player }
    pub fn coins(&self) -> &[Coin] { &self.coins }
    pub fn score(&self) -> u32 { self.score }
    pub fn phase(&self) -> RoundPhase { self.phase }
    pub fn elapsed_secs(&self) -> u32 { self.elapsed_secs }

    /// When the round ended (the anchor for the result timeline).
    pub fn ended_at(&self) -> Option<Instant> { self.ended_at }

    pub fn time_left(&self) -> u32 {
        rules::seconds_left(self.rules.duration_secs, self.elapsed_secs)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            player: self.player.clone(),
            coins: self.coins.clone(),
            score: self.score,
            time_left: self.time_left(),
            ended: self.phase == RoundPhase::Ended,
        }
    }

    /// Events produced since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

// ══════════════════════════════════════════════════════════════
// Step
// ══════════════════════════════════════════════════════════════

impl PlaySession {
    /// Advance the round by one frame. Once ended, this is a pure read.
    pub fn step(&mut self, now: Instant, input: &FrameInput) -> RoundSnapshot {
        if self.phase == RoundPhase::Ended {
            return self.snapshot();
        }
        if self.resolve_timer(now) {
            return self.snapshot();
        }

        physics::move_horizontal(
            &mut self.player, input.left, input.right,
            self.physics.player_speed, &self.field,
        );
        self.resolve_jump(input.jump);
        self.resolve_gravity();
        self.resolve_spawn();
        self.resolve_coins();

        self.snapshot()
    }

    /// Returns true if the round ended on this frame.
    fn resolve_timer(&mut self, now: Instant) -> bool {
        let secs = rules::whole_seconds(now.saturating_duration_since(self.started_at));
        // A stale `now` must not wind the clock back
        self.elapsed_secs = self.elapsed_secs.max(secs);

        if self.time_left() == 0 {
            self.phase = RoundPhase::Ended;
            self.ended_at = Some(now);
            self.events.push(GameEvent::RoundEnded { score: self.score });
            return true;
        }
        false
    }

    fn resolve_jump(&mut self, jump_held: bool) {
        if physics::try_launch(&mut self.player, jump_held, self.physics.jump_velocity) {
            self.events.push(GameEvent::Jumped);
        }
    }

    fn resolve_gravity(&mut self) {
        let ground = self.field.ground_y(self.player.size);
        if physics::integrate_vertical(&mut self.player, self.physics.gravity, ground) {
            self.events.push(GameEvent::Landed);
        }
    }

    fn resolve_spawn(&mut self) {
        let one_in = self.rules.spawn_one_in;
        if one_in == 0 || !self.rng.random_ratio(1, one_in) {
            return;
        }
        let max_x = self.field.max_x(self.physics.coin_size) as u32;
        let x = self.rng.random_range(0..=max_x) as f32;
        self.spawn_coin(x, COIN_SPAWN_Y);
    }

    fn spawn_coin(&mut self, x: f32, y: f32) {
        let id = self.next_coin_id;
        self.next_coin_id += 1;
        self.coins.push(Coin::new(id, x, y, self.physics.coin_size));
        self.events.push(GameEvent::CoinSpawned { id, x });
    }

    /// Fall, then resolve each coin exactly once, in insertion order.
    fn resolve_coins(&mut self) {
        let player_box = self.player.bounds();
        let bottom = self.field.height;
        let fall = self.physics.coin_fall_speed;
        let reward = self.rules.coin_reward;
        let score = &mut self.score;
        let events = &mut self.events;

        self.coins.retain_mut(|coin| {
            physics::fall(coin, fall);
            if coin.bounds.intersects(&player_box) {
                *score = score.saturating_add(reward);
                events.push(GameEvent::CoinCollected { id: coin.id, score: *score });
                false
            } else if coin.is_below(bottom) {
                events.push(GameEvent::CoinMissed { id: coin.id });
                false
            } else {
                true
            }
        });
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
impl PlaySession {
    pub(crate) fn insert_coin(&mut self, x: f32, y: f32) -> u32 {
        let id = self.next_coin_id;
        self.spawn_coin(x, y);
        id
    }

    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }
}
