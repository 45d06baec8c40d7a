/// Input state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous movement and jumping while a key is held
///   - Edge-triggered navigation and confirm (only fire on initial press)
///   - Pointer position and left clicks from mouse capture
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Last mouse cell (col, row), kept until the mouse moves again.
    pointer: Option<(u16, u16)>,

    /// Left-button presses this frame, as cells.
    clicks: Vec<(u16, u16)>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            pointer: None,
            clicks: Vec::with_capacity(4),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key and mouse state.
    /// Call this once per frame, before advancing the game.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.clicks.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key, Instant::now()),
                Ok(Event::Mouse(mouse)) => self.on_mouse(mouse),
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal event read failed: {e}");
                    break;
                }
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                // Explicit release: remove from active set
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Ignore release when enhancement not confirmed;
                // rely on timeout-based expiry instead
            }
            _ => {
                let was_held = self.is_held_inner(key.code);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let cell = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.pointer = Some(cell),
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer = Some(cell);
                self.clicks.push(cell);
            }
            _ => {}
        }
    }

    /// Is this key currently held down?
    /// Used for continuous actions (movement, jump).
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_inner(code)
    }

    /// Convenience: is any of these keys held?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    pub fn pointer(&self) -> Option<(u16, u16)> {
        self.pointer
    }

    pub fn clicks(&self) -> &[(u16, u16)] {
        &self.clicks
    }

    // ── Internal ──

    fn is_held_inner(&self, code: KeyCode) -> bool {
        self.last_active.get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn first_press_is_fresh_repeat_is_not() {
        let mut input = InputState::new();
        input.on_key(press(KeyCode::Left), Instant::now());
        assert!(input.was_pressed(KeyCode::Left));
        assert!(input.is_held(KeyCode::Left));

        input.fresh_presses.clear();
        input.on_key(press(KeyCode::Left), Instant::now());
        assert!(!input.was_pressed(KeyCode::Left));
        assert!(input.any_held(&[KeyCode::Right, KeyCode::Left]));
    }

    #[test]
    fn release_only_counts_with_enhancement() {
        let mut input = InputState::new();
        input.on_key(press(KeyCode::Char(' ')), Instant::now());
        input.on_key(release(KeyCode::Char(' ')), Instant::now());
        assert!(input.is_held(KeyCode::Char(' ')));

        input.honor_release = true;
        input.on_key(release(KeyCode::Char(' ')), Instant::now());
        assert!(!input.is_held(KeyCode::Char(' ')));
    }

    #[test]
    fn stale_press_is_not_held() {
        let mut input = InputState::new();
        let long_ago = Instant::now() - HOLD_TIMEOUT * 2;
        input.on_key(press(KeyCode::Right), long_ago);
        assert!(!input.is_held(KeyCode::Right));
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        input.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(input.ctrl_c_pressed());
    }

    #[test]
    fn mouse_moves_and_clicks() {
        let mut input = InputState::new();
        input.on_mouse(mouse(MouseEventKind::Moved, 10, 4));
        assert_eq!(input.pointer(), Some((10, 4)));
        assert!(input.clicks().is_empty());

        input.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 5));
        assert_eq!(input.pointer(), Some((12, 5)));
        assert_eq!(input.clicks(), &[(12, 5)]);

        // Right button and scroll are ignored
        input.on_mouse(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1));
        input.on_mouse(mouse(MouseEventKind::ScrollDown, 2, 2));
        assert_eq!(input.clicks().len(), 1);
        assert_eq!(input.pointer(), Some((12, 5)));
    }
}
