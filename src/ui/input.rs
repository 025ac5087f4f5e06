/// Keyboard input tracker.
///
/// Maze moves are discrete: one key press, one step. Each frame we drain
/// every pending terminal event and keep the presses in arrival order,
/// so quick taps between frames are not lost. Auto-repeat (holding an
/// arrow) counts as further presses; key releases are ignored.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;

// ── Key Constants ──

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
pub const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Map a key to the direction it controls, if any.
pub fn direction_for(code: KeyCode) -> Option<MoveDir> {
    if KEYS_UP.contains(&code) {
        Some(MoveDir::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(MoveDir::Down)
    } else if KEYS_LEFT.contains(&code) {
        Some(MoveDir::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(MoveDir::Right)
    } else {
        None
    }
}

pub struct InputState {
    /// Press/Repeat events collected by the last `drain_events()`, oldest first.
    presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events.
    /// Call this once per frame, before handling commands.
    pub fn drain_events(&mut self) {
        self.presses.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.push(key);
            }
        }
    }

    fn push(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Release {
            self.presses.push(key);
        }
    }

    /// Was any of these keys pressed this frame?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        self.presses.iter().any(|k| codes.contains(&k.code))
    }

    /// Directions pressed this frame, in order. Ctrl/Alt chords are not moves.
    pub fn directions(&self) -> impl Iterator<Item = MoveDir> + '_ {
        self.presses
            .iter()
            .filter(|k| !k.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT))
            .filter_map(|k| direction_for(k.code))
    }

    /// Check if any event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(direction_for(KeyCode::Up), Some(MoveDir::Up));
        assert_eq!(direction_for(KeyCode::Char('s')), Some(MoveDir::Down));
        assert_eq!(direction_for(KeyCode::Char('A')), Some(MoveDir::Left));
        assert_eq!(direction_for(KeyCode::Right), Some(MoveDir::Right));
        assert_eq!(direction_for(KeyCode::Enter), None);
    }

    #[test]
    fn presses_kept_in_order_releases_dropped() {
        let mut input = InputState::new();
        input.push(key(KeyCode::Right, KeyEventKind::Press));
        input.push(key(KeyCode::Right, KeyEventKind::Release));
        input.push(key(KeyCode::Up, KeyEventKind::Repeat));
        input.push(key(KeyCode::Enter, KeyEventKind::Press));

        let dirs: Vec<_> = input.directions().collect();
        assert_eq!(dirs, vec![MoveDir::Right, MoveDir::Up]);
        assert!(input.any_pressed(KEYS_CONFIRM));
        assert!(!input.any_pressed(KEYS_QUIT));
    }

    #[test]
    fn modifier_chords_do_not_move() {
        let mut input = InputState::new();
        input.push(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        input.push(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::ALT));
        input.push(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL));
        input.push(KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT));
        let dirs: Vec<_> = input.directions().collect();
        assert_eq!(dirs, vec![MoveDir::Down]);
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        input.push(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.ctrl_c_pressed());
    }
}
