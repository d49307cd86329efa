//! Input routing.
//!
//! [`route_input`] folds one [`InputEvent`] into the polled
//! [`InputState`], handles the debug chord (Ctrl + backtick), and returns the
//! bus [`Event`] to publish for it.

use log::debug;

use crate::events::Event;
use crate::events::input::InputEvent;
use crate::resources::debugmode::DebugMode;
use crate::resources::input::{InputState, normalize_key};

/// Key that toggles debug mode while Ctrl is held.
pub const DEBUG_CHORD_KEY: &str = "`";

pub fn route_input(input: &mut InputState, debug_mode: &mut DebugMode, event: InputEvent) -> Event {
    match event {
        InputEvent::PointerDown { x, y } => {
            input.set_pointer(x, y);
            Event::PointerDown { x, y }
        }
        InputEvent::PointerUp { x, y } => {
            input.set_pointer(x, y);
            Event::PointerUp { x, y }
        }
        InputEvent::PointerMove { x, y } => {
            input.set_pointer(x, y);
            Event::PointerMove { x, y }
        }
        InputEvent::KeyDown { key, ctrl } => {
            let key = normalize_key(&key);
            input.press(&key);
            if ctrl && key == DEBUG_CHORD_KEY {
                debug_mode.toggle();
            }
            Event::KeyDown { key }
        }
        InputEvent::KeyUp { key } => {
            let key = normalize_key(&key);
            input.release(&key);
            Event::KeyUp { key }
        }
        InputEvent::Resize { width, height } => {
            debug!("Surface resized to {}x{}", width, height);
            Event::Resize { width, height }
        }
        InputEvent::Focus => {
            input.set_focused(true);
            Event::Focus
        }
        InputEvent::Blur => {
            input.set_focused(false);
            Event::Blur
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_backtick_toggles_debug() {
        let mut input = InputState::new();
        let mut dbg = DebugMode::new(false);
        route_input(&mut input, &mut dbg, InputEvent::KeyDown { key: "`".into(), ctrl: true });
        assert!(dbg.is_enabled());
        route_input(&mut input, &mut dbg, InputEvent::key_down("`"));
        assert!(dbg.is_enabled(), "backtick without ctrl must not toggle");
    }

    #[test]
    fn space_key_is_published_as_space() {
        let mut input = InputState::new();
        let mut dbg = DebugMode::default();
        let ev = route_input(&mut input, &mut dbg, InputEvent::key_down(" "));
        assert_eq!(ev, Event::KeyDown { key: "space".into() });
        assert!(input.is_held("space"));
        let ev = route_input(&mut input, &mut dbg, InputEvent::key_up(" "));
        assert_eq!(ev, Event::KeyUp { key: "space".into() });
        assert!(!input.is_held("space"));
    }

    #[test]
    fn pointer_events_update_last_position() {
        let mut input = InputState::new();
        let mut dbg = DebugMode::default();
        route_input(&mut input, &mut dbg, InputEvent::PointerMove { x: 12.0, y: 34.0 });
        assert_eq!(input.pointer().x, 12.0);
        assert_eq!(input.pointer().y, 34.0);
    }
}
