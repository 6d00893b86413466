//! Key classification helpers shared by the router and the menu state machine.
//!
//! Recognition is a closed match over crossterm's `KeyCode`/`KeyModifiers`
//! rather than any stringly-typed lookup, so adding a key is a compile-time
//! concern.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys that always pull focus back to the command line: Escape, any Ctrl
/// or Alt combination, and the function keys.
pub fn is_priority_key(key: &KeyEvent) -> bool {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return true;
    }
    matches!(key.code, KeyCode::Esc | KeyCode::F(_))
}

/// Navigation keys the grid handler recognizes.
pub fn is_grid_nav_key(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::Enter
    )
}

/// Menu activation triggers: F10, or any key with Alt held.
pub fn is_menu_trigger(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.code == KeyCode::F(10)
}

/// Extract a printable character from a key event.
///
/// Returns `None` for control characters and for anything with Ctrl or Alt
/// held (those are priority keys and never reach text insertion).
pub fn printable_char(key: &KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Byte offset of the previous character boundary before `pos` in `text`.
pub fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the next character boundary after `pos` in `text`.
pub fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_mod(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_priority_keys() {
        assert!(is_priority_key(&key(KeyCode::Esc)));
        assert!(is_priority_key(&key(KeyCode::F(1))));
        assert!(is_priority_key(&key(KeyCode::F(24))));
        assert!(is_priority_key(&key_mod(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(is_priority_key(&key_mod(
            KeyCode::Char('f'),
            KeyModifiers::ALT
        )));

        assert!(!is_priority_key(&key(KeyCode::Char('a'))));
        assert!(!is_priority_key(&key(KeyCode::Enter)));
        assert!(!is_priority_key(&key_mod(
            KeyCode::Char('A'),
            KeyModifiers::SHIFT
        )));
    }

    #[test]
    fn test_grid_nav_keys() {
        for code in [
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::PageUp,
            KeyCode::PageDown,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::Enter,
        ] {
            assert!(is_grid_nav_key(&key(code)), "{code:?} should be nav");
        }
        assert!(!is_grid_nav_key(&key(KeyCode::Char('x'))));
        assert!(!is_grid_nav_key(&key(KeyCode::Tab)));
    }

    #[test]
    fn test_menu_triggers() {
        assert!(is_menu_trigger(&key(KeyCode::F(10))));
        assert!(is_menu_trigger(&key_mod(
            KeyCode::Char('f'),
            KeyModifiers::ALT
        )));
        assert!(!is_menu_trigger(&key(KeyCode::F(9))));
        assert!(!is_menu_trigger(&key(KeyCode::Char('f'))));
    }

    #[test]
    fn test_printable_char() {
        assert_eq!(printable_char(&key(KeyCode::Char('x'))), Some('x'));
        assert_eq!(
            printable_char(&key_mod(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Some('X')
        );
        assert_eq!(
            printable_char(&key_mod(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(printable_char(&key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_char_boundaries_multibyte() {
        let text = "aé√";
        let after_a = 1;
        let after_e = after_a + 'é'.len_utf8();
        assert_eq!(prev_char_boundary(text, after_e), after_a);
        assert_eq!(next_char_boundary(text, after_a), after_e);
        assert_eq!(prev_char_boundary(text, 0), 0);
        assert_eq!(next_char_boundary(text, text.len()), text.len());
    }
}
