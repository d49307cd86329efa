use std::path::PathBuf;

/// Commands sent *to* an audio backend, keyed by the sound's store key.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Start `key` from the beginning. `path` lets a backend load it lazily.
    Play { key: String, path: PathBuf, looped: bool },
    Stop { key: String },
    StopAll,
    Shutdown,
}
