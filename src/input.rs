use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Restart,
    Quit,
    /// Any other key. Still counts as "press any key" on message screens.
    Other,
}

pub fn key_action(key: &KeyEvent) -> KeyAction {
    if is_ctrl_c(key) {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyAction::Steer(Direction::Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyAction::Steer(Direction::Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyAction::Steer(Direction::Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyAction::Steer(Direction::Right),
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Other,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.modifiers.contains(KeyModifiers::CONTROL) && ev.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_each_arrow_sets_one_direction() {
        assert_eq!(key_action(&press(KeyCode::Up)), KeyAction::Steer(Direction::Up));
        assert_eq!(key_action(&press(KeyCode::Down)), KeyAction::Steer(Direction::Down));
        assert_eq!(key_action(&press(KeyCode::Left)), KeyAction::Steer(Direction::Left));
        assert_eq!(key_action(&press(KeyCode::Right)), KeyAction::Steer(Direction::Right));
    }

    #[test]
    fn test_wasd() {
        assert_eq!(key_action(&press(KeyCode::Char('w'))), KeyAction::Steer(Direction::Up));
        assert_eq!(key_action(&press(KeyCode::Char('a'))), KeyAction::Steer(Direction::Left));
        assert_eq!(key_action(&press(KeyCode::Char('S'))), KeyAction::Steer(Direction::Down));
        assert_eq!(key_action(&press(KeyCode::Char('d'))), KeyAction::Steer(Direction::Right));
    }

    #[test]
    fn test_controls() {
        assert_eq!(key_action(&press(KeyCode::Char('r'))), KeyAction::Restart);
        assert_eq!(key_action(&press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(key_action(&press(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_action(&ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_other_keys() {
        assert_eq!(key_action(&press(KeyCode::Char('c'))), KeyAction::Other);
        assert_eq!(key_action(&press(KeyCode::Enter)), KeyAction::Other);
    }
}
