//! Long-lived state and collaborator contracts.
//!
//! Overview
//! - `assets` – image and sound handles, the asset store, manifest-driven batch loading
//! - `audio` – the sound playback contract plus recording and null players
//! - `clock` – wall clock and a hand-driven clock for tests
//! - `debugmode` – debug flag plus the on-screen message rows
//! - `gameconfig` – INI-backed engine configuration
//! - `input` – held keys, pointer position and focus, for polling
//! - `renderer` – the drawing contract plus recording and null implementations
//! - `world` – the live-thing registry and the event bus
//! - `worldtime` – counters visible to handlers and the tps/fps sampler

pub mod assets;
pub mod audio;
pub mod clock;
pub mod debugmode;
pub mod gameconfig;
pub mod input;
pub mod renderer;
pub mod world;
pub mod worldtime;
