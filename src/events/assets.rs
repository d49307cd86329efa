use std::path::PathBuf;

use crate::resources::assets::Asset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Sound,
}

/// Work items sent *to* the loader threads
#[derive(Debug, Clone)]
pub struct AssetJob {
    /// Key the asset is stored under (the manifest entry, relative to the base).
    pub name: String,
    pub path: PathBuf,
    pub kind: AssetKind,
}

/// Results sent *back* from the loader threads
#[derive(Debug, Clone)]
pub enum AssetMessage {
    Loaded(Asset),
    Failed { name: String, path: PathBuf, error: String },
}
