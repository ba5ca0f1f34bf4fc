//! Held-button state for terminal environments.
//!
//! Most terminals only report presses (and autorepeat). A button therefore
//! counts as held until a release arrives or until no press has refreshed it
//! for the release timeout. Once a terminal proves it reports releases, the
//! timeout is switched off.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::map::{map_key, KeyMapping};
use crate::types::{Button, FrameInput, PlayerMode, ShipControls, KEY_RELEASE_TIMEOUT_MS};

#[derive(Debug, Clone)]
pub struct KeyboardState {
    /// Last press time per button, `None` when up.
    pressed_at: [Option<u64>; Button::ALL.len()],
    release_timeout_ms: u64,
    reports_releases: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::with_release_timeout_ms(KEY_RELEASE_TIMEOUT_MS)
    }

    pub fn with_release_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            pressed_at: [None; Button::ALL.len()],
            release_timeout_ms: timeout_ms,
            reports_releases: false,
        }
    }

    pub fn press(&mut self, button: Button, now_ms: u64) {
        self.pressed_at[button.index()] = Some(now_ms);
    }

    pub fn release(&mut self, button: Button) {
        self.pressed_at[button.index()] = None;
    }

    /// Drop every held button, e.g. when the terminal loses focus and the
    /// releases will never arrive.
    pub fn release_all(&mut self) {
        self.pressed_at = [None; Button::ALL.len()];
    }

    /// Feed one terminal key event. Returns `true` when the player asked to quit.
    pub fn handle_key_event(&mut self, key: KeyEvent, now_ms: u64) -> bool {
        let mapping = map_key(key);
        if mapping == KeyMapping::Quit {
            return key.kind != KeyEventKind::Release;
        }
        // A captain key without shift means shift is up, however it was let go.
        if mapping.buttons().iter().any(is_captain_key) && !shift_held(&key) {
            self.release(Button::Shift);
        }
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                for &b in mapping.buttons() {
                    self.press(b, now_ms);
                }
            }
            KeyEventKind::Release => {
                if !self.reports_releases {
                    debug!("terminal reports key releases; auto-release disabled");
                    self.reports_releases = true;
                }
                for &b in mapping.buttons() {
                    self.release(b);
                }
            }
        }
        false
    }

    /// Whether `button` counts as held at `now_ms`.
    pub fn is_down(&self, button: Button, now_ms: u64) -> bool {
        match self.pressed_at[button.index()] {
            Some(_) if self.reports_releases => true,
            Some(t) => now_ms.saturating_sub(t) <= self.release_timeout_ms,
            None => false,
        }
    }

    /// Controls for both ships and any requested mode switch.
    pub fn frame_input(&mut self, now_ms: u64) -> FrameInput {
        self.expire(now_ms);
        let down = |b| self.is_down(b, now_ms);
        let mode = if down(Button::Digit2) {
            Some(PlayerMode::TwoPlayer)
        } else if down(Button::Digit1) {
            Some(PlayerMode::OnePlayer)
        } else {
            None
        };
        FrameInput {
            player: ShipControls {
                left: down(Button::Left),
                right: down(Button::Right),
                up: down(Button::Up),
                down: down(Button::Down),
                boost: down(Button::Space),
            },
            captain: ShipControls {
                left: down(Button::KeyA),
                right: down(Button::KeyD),
                up: down(Button::KeyW),
                down: down(Button::KeyS),
                boost: down(Button::Shift),
            },
            mode,
        }
    }

    fn expire(&mut self, now_ms: u64) {
        if self.reports_releases {
            return;
        }
        let timeout = self.release_timeout_ms;
        for slot in &mut self.pressed_at {
            if slot.is_some_and(|t| now_ms.saturating_sub(t) > timeout) {
                *slot = None;
            }
        }
    }
}

fn is_captain_key(button: &Button) -> bool {
    matches!(button, Button::KeyW | Button::KeyA | Button::KeyS | Button::KeyD)
}

fn shift_held(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::SHIFT)
        || matches!(key.code, KeyCode::Char(c) if c.is_ascii_uppercase())
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn press_holds_until_timeout() {
        let mut kb = KeyboardState::new();
        kb.handle_key_event(press(KeyCode::Left), 1000);
        assert!(kb.frame_input(1100).player.left);
        assert!(kb.frame_input(1150).player.left);
        assert!(!kb.frame_input(1151).player.left);
    }

    #[test]
    fn autorepeat_refreshes_the_hold() {
        let mut kb = KeyboardState::new();
        kb.handle_key_event(press(KeyCode::Up), 0);
        kb.handle_key_event(press(KeyCode::Up), 120);
        assert!(kb.frame_input(250).player.up);
    }

    #[test]
    fn release_events_disable_the_timeout() {
        let mut kb = KeyboardState::new();
        kb.handle_key_event(press(KeyCode::Char(' ')), 0);
        kb.handle_key_event(release(KeyCode::Char('x')), 10);
        assert!(kb.frame_input(10_000).player.boost);
        kb.handle_key_event(release(KeyCode::Char(' ')), 10_001);
        assert!(!kb.frame_input(10_002).player.boost);
    }

    #[test]
    fn uppercase_letters_drive_a_fast_captain() {
        let mut kb = KeyboardState::new();
        kb.handle_key_event(press(KeyCode::Char('D')), 0);
        let input = kb.frame_input(16);
        assert!(input.captain.right && input.captain.boost);
        assert_eq!(input.player, ShipControls::default());
    }

    #[test]
    fn letting_go_of_shift_first_ends_the_boost() {
        let mut kb = KeyboardState::new();
        kb.handle_key_event(KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT), 0);
        assert!(kb.frame_input(10).captain.boost);
        // Shift comes up first, so the letter's release arrives unshifted.
        kb.handle_key_event(release(KeyCode::Char('d')), 50);
        let input = kb.frame_input(10_000);
        assert!(!input.captain.boost);
        assert!(!input.captain.right);
    }

    #[test]
    fn unshifted_press_drops_a_lingering_shift() {
        let mut kb = KeyboardState::new();
        kb.handle_key_event(press(KeyCode::Char('W')), 0);
        kb.handle_key_event(press(KeyCode::Char('w')), 20);
        let input = kb.frame_input(30);
        assert!(input.captain.up);
        assert!(!input.captain.boost);
    }

    #[test]
    fn release_all_clears_held_buttons_without_a_timeout() {
        let mut kb = KeyboardState::new();
        kb.handle_key_event(release(KeyCode::Char('x')), 0);
        kb.handle_key_event(press(KeyCode::Left), 1);
        kb.handle_key_event(press(KeyCode::Char('d')), 1);
        assert!(kb.is_down(Button::Left, 5_000));
        kb.release_all();
        let input = kb.frame_input(5_001);
        assert_eq!(input.player, ShipControls::default());
        assert_eq!(input.captain, ShipControls::default());
    }

    #[test]
    fn custom_timeout_shortens_the_hold() {
        let mut kb = KeyboardState::with_release_timeout_ms(40);
        kb.handle_key_event(press(KeyCode::Down), 0);
        assert!(kb.frame_input(40).player.down);
        assert!(!kb.frame_input(41).player.down);
    }

    #[test]
    fn digit_two_wins_over_digit_one() {
        let mut kb = KeyboardState::new();
        kb.handle_key_event(press(KeyCode::Char('1')), 0);
        assert_eq!(kb.frame_input(0).mode, Some(PlayerMode::OnePlayer));
        kb.handle_key_event(press(KeyCode::Char('2')), 1);
        assert_eq!(kb.frame_input(1).mode, Some(PlayerMode::TwoPlayer));
    }

    #[test]
    fn quit_is_reported_on_press_only() {
        let mut kb = KeyboardState::new();
        assert!(kb.handle_key_event(press(KeyCode::Char('q')), 0));
        assert!(!kb.handle_key_event(release(KeyCode::Char('q')), 0));
        assert!(!kb.handle_key_event(press(KeyCode::Char('w')), 0));
    }
}
