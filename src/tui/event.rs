//! Terminal event polling. The shell consumes key presses one at a time;
//! everything else crossterm reports is either a resize or noise.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Events the shell's main loop cares about.
pub enum ShellEvent {
    Key(KeyEvent),
    Resize,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<ShellEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            log::debug!("key event: {:?} with modifiers {:?}", key.code, key.modifiers);
            Some(ShellEvent::Key(key))
        }
        Event::Resize(_, _) => Some(ShellEvent::Resize),
        _ => None,
    }
}

/// Block until the next key press. Used by the menu's own read loop, which
/// owns input for the whole interaction.
pub fn read_key_blocking() -> Option<KeyEvent> {
    loop {
        match event::read().ok()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Some(key),
            _ => {}
        }
    }
}
