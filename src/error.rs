//! Engine error type.
//!
//! Everything fallible in the library reports an [`EngineError`]. Conditions
//! the engine treats as normal (publishing to nobody, destroying a thing twice,
//! asking for a scene neighbour that does not exist) are not errors and are
//! reported through `bool` or empty results instead.

use std::fmt;
use std::path::PathBuf;

use crate::components::thing::ThingId;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// An event type name that is not part of the closed set.
    UnknownEventType(String),
    /// A scene name that was never registered.
    UnknownScene(String),
    /// A scene that cannot be registered (empty name).
    InvalidScene(String),
    /// A thing id that is not live in the world.
    UnknownThing(ThingId),
    /// The first asset that failed to load, with the offending path.
    AssetLoad { path: PathBuf, reason: String },
    /// Configuration file could not be read, parsed or written.
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownEventType(name) => write!(f, "unknown event type '{}'", name),
            EngineError::UnknownScene(name) => write!(f, "scene '{}' is not registered", name),
            EngineError::InvalidScene(reason) => write!(f, "invalid scene: {}", reason),
            EngineError::UnknownThing(id) => write!(f, "thing {} is not live", id),
            EngineError::AssetLoad { path, reason } => {
                write!(f, "failed to load asset {}: {}", path.display(), reason)
            }
            EngineError::Config(reason) => write!(f, "configuration error: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_item() {
        let err = EngineError::UnknownScene("kitchen".into());
        assert_eq!(err.to_string(), "scene 'kitchen' is not registered");

        let err = EngineError::AssetLoad {
            path: PathBuf::from("data/missing.png"),
            reason: "not found".into(),
        };
        assert!(err.to_string().contains("data/missing.png"));
    }

    #[test]
    fn unknown_thing_uses_hash_id() {
        let err = EngineError::UnknownThing(ThingId::from_raw(7));
        assert_eq!(err.to_string(), "thing #7 is not live");
    }
}
