use std::time::Duration;

use futures::channel::mpsc;
use iced::keyboard::{self, key::Named, Key};
use iced::{event, window, Event};

use crate::app::Message;

const THEME_REFRESH_SECS: u64 = 5;

pub(crate) fn theme_refresh_stream() -> mpsc::UnboundedReceiver<Message> {
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || loop {
        std::thread::sleep(Duration::from_secs(THEME_REFRESH_SECS));
        if tx.unbounded_send(Message::ThemeRefresh).is_err() {
            break;
        }
    });
    rx
}

/// Window and keyboard events the viewer reacts to.
///
/// End follows the tail again, Home jumps to the first line, `t` flips the
/// theme and `w` toggles wrapping.
pub(crate) fn on_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::CloseRequested) => Some(Message::CloseRequested),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            if modifiers.control() || modifiers.alt() || modifiers.logo() {
                return None;
            }
            match key.as_ref() {
                Key::Named(Named::End) => Some(Message::JumpToEnd),
                Key::Named(Named::Home) => Some(Message::JumpToStart),
                Key::Character("t") => Some(Message::ThemeToggle),
                Key::Character("w") => Some(Message::WrapToggle),
                _ => None,
            }
        }
        _ => None,
    }
}
