//! Raw input entering the engine.
//!
//! A backend translates its platform events into [`InputEvent`] and hands them
//! to [`Engine::handle_input`](crate::engine::Engine::handle_input). Pointer
//! coordinates are in drawable-surface pixels.

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    /// `key` is the logical key name (`"a"`, `"ArrowLeft"`, `" "`, ...).
    KeyDown { key: String, ctrl: bool },
    KeyUp { key: String },
    Resize { width: f32, height: f32 },
    Focus,
    Blur,
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        InputEvent::KeyDown {
            key: key.into(),
            ctrl: false,
        }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        InputEvent::KeyUp { key: key.into() }
    }
}
