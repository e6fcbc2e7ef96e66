//! Key mapping from terminal events to player actions.

use crate::types::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Move the board cursor one cell
    MoveCursor(Direction),
    /// Select (or pair) the tile under the cursor
    Select,
    /// Slide the selected tile
    Slide(Direction),
    Restart,
}

/// Map keyboard input to player actions.
///
/// Arrows and `hjkl` move the cursor; `wasd` and shifted arrows slide.
pub fn handle_key_event(key: KeyEvent) -> Option<PlayerAction> {
    let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        // Cursor (or slide with shift)
        KeyCode::Left => Some(arrow(Direction::Left, shifted)),
        KeyCode::Right => Some(arrow(Direction::Right, shifted)),
        KeyCode::Up => Some(arrow(Direction::Up, shifted)),
        KeyCode::Down => Some(arrow(Direction::Down, shifted)),
        KeyCode::Char('h') => Some(PlayerAction::MoveCursor(Direction::Left)),
        KeyCode::Char('l') => Some(PlayerAction::MoveCursor(Direction::Right)),
        KeyCode::Char('k') => Some(PlayerAction::MoveCursor(Direction::Up)),
        KeyCode::Char('j') => Some(PlayerAction::MoveCursor(Direction::Down)),

        // Slides
        KeyCode::Char('a') | KeyCode::Char('A') => Some(PlayerAction::Slide(Direction::Left)),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(PlayerAction::Slide(Direction::Right)),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(PlayerAction::Slide(Direction::Up)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(PlayerAction::Slide(Direction::Down)),

        KeyCode::Char(' ') | KeyCode::Enter => Some(PlayerAction::Select),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(PlayerAction::Restart),

        _ => None,
    }
}

fn arrow(dir: Direction, shifted: bool) -> PlayerAction {
    if shifted {
        PlayerAction::Slide(dir)
    } else {
        PlayerAction::MoveCursor(dir)
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_cursor_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(PlayerAction::MoveCursor(Direction::Left))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('j'))),
            Some(PlayerAction::MoveCursor(Direction::Down))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('k'))),
            Some(PlayerAction::MoveCursor(Direction::Up))
        );
    }

    #[test]
    fn test_slide_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT)),
            Some(PlayerAction::Slide(Direction::Right))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('W'))),
            Some(PlayerAction::Slide(Direction::Up))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('a'))),
            Some(PlayerAction::Slide(Direction::Left))
        );
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(PlayerAction::Select)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(PlayerAction::Select)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(PlayerAction::Restart)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
