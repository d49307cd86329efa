//! Plain data carried by things.
//!
//! Submodules overview:
//! - [`animation`] – frame list and tick-count playback state
//! - [`body`] – circle or rectangle collision shape
//! - [`thing`] – the entity itself, its id, and the spawn descriptor
//! - [`vector`] – mutable 3-component vector and heading conversions

pub mod animation;
pub mod body;
pub mod thing;
pub mod vector;
