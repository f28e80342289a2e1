//! Key bindings: arrows/space and vim-style.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Command from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
    Start,
    Restart,
    Quit,
    None,
}

/// Map key event to a command. Supports both arrows/space and vim (hjkl).
pub fn key_to_command(key: KeyEvent) -> Command {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Command::Quit;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Command::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('p' | 'P') => Command::TogglePause,
        KeyCode::Left | KeyCode::Char('h') => Command::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Command::MoveRight,
        KeyCode::Up | KeyCode::Char('k') => Command::Rotate,
        KeyCode::Down | KeyCode::Char('j') => Command::SoftDrop,
        KeyCode::Char(' ') => Command::HardDrop,
        KeyCode::Enter => Command::Start,
        KeyCode::Char('r' | 'R') => Command::Restart,
        _ => Command::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(key_to_command(press(KeyCode::Left)), Command::MoveLeft);
        assert_eq!(key_to_command(press(KeyCode::Right)), Command::MoveRight);
        assert_eq!(key_to_command(press(KeyCode::Up)), Command::Rotate);
        assert_eq!(key_to_command(press(KeyCode::Down)), Command::SoftDrop);
        assert_eq!(key_to_command(press(KeyCode::Char(' '))), Command::HardDrop);
    }

    #[test]
    fn test_vim_keys_and_pause() {
        assert_eq!(key_to_command(press(KeyCode::Char('h'))), Command::MoveLeft);
        assert_eq!(key_to_command(press(KeyCode::Char('k'))), Command::Rotate);
        assert_eq!(key_to_command(press(KeyCode::Char('p'))), Command::TogglePause);
        assert_eq!(
            key_to_command(KeyEvent::new(KeyCode::Char('P'), KeyModifiers::SHIFT)),
            Command::TogglePause
        );
    }

    #[test]
    fn test_ctrl_c_quits_other_modifiers_ignored() {
        assert_eq!(
            key_to_command(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Command::Quit
        );
        assert_eq!(
            key_to_command(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT)),
            Command::None
        );
    }
}
