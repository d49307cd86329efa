//! Squids: a small event-driven 2D canvas engine.
//!
//! Every game object is a [`Thing`](components::thing::Thing) living in a
//! [`World`](resources::world::World). Things subscribe handlers to event
//! types on the world's bus; the [`Engine`](engine::Engine) publishes
//! physics, tick and animate at a fixed rate and draw once per display
//! frame, in ascending draw priority.
//!
//! The crate is headless. Drawing goes through the
//! [`Renderer`](resources::renderer::Renderer) trait; the `raylib` feature
//! builds a demo binary with a raylib backend.

pub mod components;
pub mod engine;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
