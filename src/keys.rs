//! Keyboard play for `--live` mode.
//!
//! | Key | Action |
//! |-----|--------|
//! | `q` | rotate anticlockwise |
//! | `e`, Up | rotate clockwise |
//! | `a`, Left | move left |
//! | `d`, Right | move right |
//! | `s`, Down, Space | hard drop |
//! | anything else | no-op |
//!
//! Esc or Ctrl+C ends the game.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::{Agent, Board, Decision};
use crate::types::Action;

/// Map a key press to a game action.
pub fn key_action(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::RotateAnticlockwise,
        KeyCode::Up | KeyCode::Char('e') | KeyCode::Char('E') => Action::RotateClockwise,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Action::MoveRight,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char(' ') => {
            Action::HardDrop
        }
        _ => Action::Noop,
    }
}

/// Check if key should end the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Blocks on the terminal for one key press per turn.
///
/// The terminal must be in raw mode. After a quit key every further turn is a
/// no-op; the caller checks [`KeyboardAgent::quit_requested`].
#[derive(Debug, Default)]
pub struct KeyboardAgent {
    quit: bool,
}

impl KeyboardAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Handle one key press; `None` when it was a quit key.
    pub fn press(&mut self, key: KeyEvent) -> Option<Action> {
        if should_quit(key) {
            self.quit = true;
            return None;
        }
        Some(key_action(key))
    }

    fn read_action(&mut self) -> io::Result<Action> {
        loop {
            // Release and repeat events are ignored
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                return Ok(self.press(key).unwrap_or(Action::Noop));
            }
        }
    }
}

impl Agent for KeyboardAgent {
    fn play_move(&mut self, _board: &Board) -> Decision {
        if self.quit {
            return Decision::Single(Action::Noop);
        }
        match self.read_action() {
            Ok(action) => Decision::Single(action),
            Err(err) => {
                eprintln!("[Game] Keyboard read failed: {}", err);
                self.quit = true;
                Decision::Single(Action::Noop)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_keys() {
        assert_eq!(
            key_action(KeyEvent::from(KeyCode::Char('q'))),
            Action::RotateAnticlockwise
        );
        assert_eq!(
            key_action(KeyEvent::from(KeyCode::Char('e'))),
            Action::RotateClockwise
        );
        assert_eq!(
            key_action(KeyEvent::from(KeyCode::Char('a'))),
            Action::MoveLeft
        );
        assert_eq!(
            key_action(KeyEvent::from(KeyCode::Char('d'))),
            Action::MoveRight
        );
        assert_eq!(
            key_action(KeyEvent::from(KeyCode::Char('s'))),
            Action::HardDrop
        );
        assert_eq!(key_action(KeyEvent::from(KeyCode::Left)), Action::MoveLeft);
        assert_eq!(key_action(KeyEvent::from(KeyCode::Char(' '))), Action::HardDrop);
    }

    #[test]
    fn test_other_keys_are_noop() {
        assert_eq!(key_action(KeyEvent::from(KeyCode::Char('x'))), Action::Noop);
        assert_eq!(key_action(KeyEvent::from(KeyCode::Enter)), Action::Noop);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('q'))));
    }

    #[test]
    fn test_quit_is_sticky() {
        let mut agent = KeyboardAgent::new();
        assert_eq!(
            agent.press(KeyEvent::from(KeyCode::Char('d'))),
            Some(Action::MoveRight)
        );
        assert!(!agent.quit_requested());

        assert_eq!(agent.press(KeyEvent::from(KeyCode::Esc)), None);
        assert!(agent.quit_requested());
        // no terminal read once quit
        assert_eq!(
            agent.play_move(&Board::new()),
            Decision::Single(Action::Noop)
        );
    }
}
