//! Event kinds, the event bus, and the dispatch context handed to handlers.
//!
//! Event types are a closed set ([`EventType`]). Engine-native events
//! (physics, tick, animate, draw, collide) and routed input events share the
//! same bus, so things subscribe to a key press exactly like they subscribe
//! to a tick.
//!
//! Submodules:
//! - [`assets`] – jobs and results exchanged with the asset loader threads
//! - [`audio`] – commands sent to an audio backend
//! - [`bus`] – per-type subscriber registry and the priority-sorted draw order
//! - [`context`] – what a handler can reach while it runs, and `publish`
//! - [`input`] – raw input events entering the engine

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::components::thing::ThingId;
use crate::error::EngineError;

pub mod assets;
pub mod audio;
pub mod bus;
pub mod context;
pub mod input;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Physics,
    Tick,
    Animate,
    Draw,
    Collide,
    PointerDown,
    PointerUp,
    PointerMove,
    KeyDown,
    KeyUp,
    Resize,
    Focus,
    Blur,
}

impl EventType {
    pub const ALL: [EventType; 13] = [
        EventType::Physics,
        EventType::Tick,
        EventType::Animate,
        EventType::Draw,
        EventType::Collide,
        EventType::PointerDown,
        EventType::PointerUp,
        EventType::PointerMove,
        EventType::KeyDown,
        EventType::KeyUp,
        EventType::Resize,
        EventType::Focus,
        EventType::Blur,
    ];

    /// The four types every new thing is subscribed to.
    pub const DEFAULTS: [EventType; 4] = [
        EventType::Physics,
        EventType::Tick,
        EventType::Animate,
        EventType::Draw,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventType::Physics => "physics",
            EventType::Tick => "tick",
            EventType::Animate => "animate",
            EventType::Draw => "draw",
            EventType::Collide => "collide",
            EventType::PointerDown => "pointerdown",
            EventType::PointerUp => "pointerup",
            EventType::PointerMove => "pointermove",
            EventType::KeyDown => "keydown",
            EventType::KeyUp => "keyup",
            EventType::Resize => "resize",
            EventType::Focus => "focus",
            EventType::Blur => "blur",
        }
    }

    /// Lenient lookup: `None` for names outside the closed set.
    pub fn lookup(name: &str) -> Option<EventType> {
        EventType::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = EngineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EventType::lookup(name).ok_or_else(|| EngineError::UnknownEventType(name.to_string()))
    }
}

/// An event with its payload. [`Event::kind`] selects the subscriber set.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Physics { delta: Duration, count: u64 },
    Tick { delta: Duration, count: u64 },
    Animate { delta: Duration, count: u64 },
    Draw { count: u64 },
    /// Delivered to the subscriber whose body overlaps `other`'s.
    Collide { other: ThingId },
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    KeyDown { key: String },
    KeyUp { key: String },
    Resize { width: f32, height: f32 },
    Focus,
    Blur,
}

impl Event {
    pub fn kind(&self) -> EventType {
        match self {
            Event::Physics { .. } => EventType::Physics,
            Event::Tick { .. } => EventType::Tick,
            Event::Animate { .. } => EventType::Animate,
            Event::Draw { .. } => EventType::Draw,
            Event::Collide { .. } => EventType::Collide,
            Event::PointerDown { .. } => EventType::PointerDown,
            Event::PointerUp { .. } => EventType::PointerUp,
            Event::PointerMove { .. } => EventType::PointerMove,
            Event::KeyDown { .. } => EventType::KeyDown,
            Event::KeyUp { .. } => EventType::KeyUp,
            Event::Resize { .. } => EventType::Resize,
            Event::Focus => EventType::Focus,
            Event::Blur => EventType::Blur,
        }
    }

    /// The update or draw counter carried by loop events.
    pub fn count(&self) -> Option<u64> {
        match self {
            Event::Physics { count, .. }
            | Event::Tick { count, .. }
            | Event::Animate { count, .. }
            | Event::Draw { count } => Some(*count),
            _ => None,
        }
    }
}
