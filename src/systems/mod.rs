//! Engine behavior over the world.
//!
//! Submodules overview
//! - [`animation`] – default animate handler
//! - [`assetloader`] – worker loop that loads asset files off the main thread
//! - [`collision`] – shape predicates and the per-tick collide pass
//! - [`input`] – fold raw input into [`crate::resources::input::InputState`] and bus events
//! - [`physics`] – default physics handler (velocity, gravity, limit)
//! - [`render`] – default draw handler, splash screen, debug overlay
//! - [`scenemanager`] – scene registry and fade transitions
//! - [`scheduler`] – update/draw counters, warm-up, frame pacing

pub mod animation;
pub mod assetloader;
pub mod collision;
pub mod input;
pub mod physics;
pub mod render;
pub mod scenemanager;
pub mod scheduler;
