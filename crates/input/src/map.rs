//! Key mapping from terminal events to game buttons.

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::Button;

/// What a single key event means to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMapping {
    /// One key can hold two buttons: uppercase WASD also holds shift.
    Buttons(ArrayVec<Button, 2>),
    Quit,
    Ignored,
}

impl KeyMapping {
    fn one(button: Button) -> Self {
        let mut buttons = ArrayVec::new();
        buttons.push(button);
        KeyMapping::Buttons(buttons)
    }

    fn shifted(button: Button) -> Self {
        let mut buttons = ArrayVec::new();
        buttons.push(button);
        buttons.push(Button::Shift);
        KeyMapping::Buttons(buttons)
    }

    pub fn buttons(&self) -> &[Button] {
        match self {
            KeyMapping::Buttons(b) => b.as_slice(),
            KeyMapping::Quit | KeyMapping::Ignored => &[],
        }
    }
}

/// Map a keyboard event onto game buttons.
///
/// Player one: arrows and space. Player two: WASD, with shift (or caps) to go
/// fast. `1` and `2` pick the mode.
pub fn map_key(key: KeyEvent) -> KeyMapping {
    if should_quit(key) {
        return KeyMapping::Quit;
    }
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let wasd = |button: Button, upper: bool| {
        if upper || shift {
            KeyMapping::shifted(button)
        } else {
            KeyMapping::one(button)
        }
    };
    match key.code {
        KeyCode::Left => KeyMapping::one(Button::Left),
        KeyCode::Right => KeyMapping::one(Button::Right),
        KeyCode::Up => KeyMapping::one(Button::Up),
        KeyCode::Down => KeyMapping::one(Button::Down),
        KeyCode::Char(' ') => KeyMapping::one(Button::Space),

        KeyCode::Char(c @ ('w' | 'W')) => wasd(Button::KeyW, c.is_ascii_uppercase()),
        KeyCode::Char(c @ ('a' | 'A')) => wasd(Button::KeyA, c.is_ascii_uppercase()),
        KeyCode::Char(c @ ('s' | 'S')) => wasd(Button::KeyS, c.is_ascii_uppercase()),
        KeyCode::Char(c @ ('d' | 'D')) => wasd(Button::KeyD, c.is_ascii_uppercase()),

        KeyCode::Char('1') => KeyMapping::one(Button::Digit1),
        KeyCode::Char('2') => KeyMapping::one(Button::Digit2),
        _ => KeyMapping::Ignored,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
