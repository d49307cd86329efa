//! Asset handles, the loaded-asset store, and the bridge to the loader threads.
//!
//! Use [`load_assets`] to start loading a manifest in the background. It
//! returns an [`AssetBatch`] that the main thread polls once per frame (or
//! waits on). The batch finishes exactly once, with the complete
//! [`AssetStore`] or with the first failure.
//!
//! Handles only carry what the engine core needs: a key, the source path and,
//! for images, the pixel dimensions. Uploading textures and playing sounds is
//! up to the rendering/audio backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, unbounded};
use log::{error, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::vector::Vector;
use crate::error::EngineError;
use crate::events::assets::{AssetJob, AssetKind, AssetMessage};
use crate::systems::assetloader::load_worker;

/// Upper bound on loader threads per batch.
const MAX_LOADER_THREADS: usize = 4;

/// Shared, cheaply clonable image reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    key: Arc<str>,
    path: Option<Arc<Path>>,
    width: f32,
    height: f32,
    /// Ask the backend for smoothed (bilinear) sampling.
    pub smoothing: bool,
}

impl ImageHandle {
    /// Handle without a backing file, e.g. for generated or test images.
    pub fn new(key: impl Into<Arc<str>>, width: f32, height: f32) -> Self {
        Self {
            key: key.into(),
            path: None,
            width,
            height,
            smoothing: true,
        }
    }

    pub fn from_file(key: impl Into<Arc<str>>, path: impl AsRef<Path>, width: u32, height: u32) -> Self {
        Self {
            key: key.into(),
            path: Some(Arc::from(path.as_ref())),
            width: width as f32,
            height: height as f32,
            smoothing: true,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Vector {
        Vector::xy(self.width, self.height)
    }

    /// Radius of a circle roughly covering the image: half the mean side.
    pub fn make_radius(&self) -> f32 {
        (self.width + self.height) * 0.5 * 0.5
    }
}

/// Sound file contents, shared with whichever backend plays it.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundHandle {
    key: Arc<str>,
    path: Arc<Path>,
    bytes: Arc<[u8]>,
}

impl SoundHandle {
    pub fn new(key: impl Into<Arc<str>>, path: impl AsRef<Path>, bytes: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            path: Arc::from(path.as_ref()),
            bytes: Arc::from(bytes),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Image(ImageHandle),
    Sound(SoundHandle),
}

impl Asset {
    pub fn name(&self) -> &str {
        match self {
            Asset::Image(image) => image.key(),
            Asset::Sound(sound) => sound.key(),
        }
    }
}

/// Loaded assets keyed by their manifest name.
#[derive(Debug, Default, Clone)]
pub struct AssetStore {
    images: FxHashMap<String, ImageHandle>,
    sounds: FxHashMap<String, SoundHandle>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: Asset) {
        match asset {
            Asset::Image(image) => {
                self.images.insert(image.key().to_string(), image);
            }
            Asset::Sound(sound) => {
                self.sounds.insert(sound.key().to_string(), sound);
            }
        }
    }

    pub fn image(&self, name: impl AsRef<str>) -> Option<&ImageHandle> {
        self.images.get(name.as_ref())
    }

    pub fn sound(&self, name: impl AsRef<str>) -> Option<&SoundHandle> {
        self.sounds.get(name.as_ref())
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageHandle> {
        self.images.values()
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.sounds.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.sounds.clear();
    }
}

/// What to load: a base directory and file names relative to it.
///
/// ```json
/// { "base": "data", "images": ["background-1.png"], "sounds": ["door.ogg"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub base: PathBuf,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sounds: Vec<String>,
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(format!("bad asset manifest: {}", e)))
    }

    /// Read a JSON manifest. A relative `base` is resolved against the
    /// manifest's own directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| EngineError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut manifest = Self::from_json(&json)?;
        if manifest.base.is_relative()
            && let Some(dir) = path.parent()
        {
            manifest.base = dir.join(&manifest.base);
        }
        Ok(manifest)
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.sounds.is_empty()
    }

    fn jobs(&self) -> Vec<AssetJob> {
        let images = self.images.iter().map(|name| (name, AssetKind::Image));
        let sounds = self.sounds.iter().map(|name| (name, AssetKind::Sound));
        images
            .chain(sounds)
            .map(|(name, kind)| AssetJob {
                name: name.clone(),
                path: self.base.join(name),
                kind,
            })
            .collect()
    }
}

/// Result of one [`AssetBatch::poll`].
#[derive(Debug)]
pub enum LoadStatus {
    /// Still waiting; fraction of items loaded so far.
    Loading { progress: f32 },
    /// Every item loaded. Delivered once.
    Done(AssetStore),
    /// The first failure. Delivered once; later results are discarded.
    Failed(EngineError),
    /// `Done` or `Failed` was already delivered.
    Finished,
}

/// In-flight load of one manifest.
pub struct AssetBatch {
    rx_msg: Receiver<AssetMessage>,
    workers: Vec<JoinHandle<()>>,
    total: usize,
    loaded: usize,
    store: AssetStore,
    finished: bool,
}

/// Spawn loader threads for every entry of `manifest`.
///
/// Jobs are queued up front on a shared channel and a small pool of threads
/// drains it, each reporting back over the result channel.
pub fn load_assets(manifest: &AssetManifest) -> AssetBatch {
    let jobs = manifest.jobs();
    let total = jobs.len();
    let (tx_job, rx_job) = unbounded::<AssetJob>();
    let (tx_msg, rx_msg) = unbounded::<AssetMessage>();

    for job in jobs {
        // rx_job is alive in this scope, so the send cannot fail
        let _ = tx_job.send(job);
    }
    drop(tx_job);

    let threads = total.min(MAX_LOADER_THREADS);
    let workers = (0..threads)
        .map(|_| {
            let rx_job = rx_job.clone();
            let tx_msg = tx_msg.clone();
            std::thread::spawn(move || load_worker(rx_job, tx_msg))
        })
        .collect();

    info!(
        "Loading {} assets from {} on {} threads",
        total,
        manifest.base.display(),
        threads
    );

    AssetBatch {
        rx_msg,
        workers,
        total,
        loaded: 0,
        store: AssetStore::new(),
        finished: false,
    }
}

impl AssetBatch {
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f32 / self.total as f32
        }
    }

    /// Drain whatever the loader threads produced since the last call without
    /// blocking. `on_progress(progress, name, asset)` runs once per loaded item.
    pub fn poll(&mut self, mut on_progress: impl FnMut(f32, &str, &Asset)) -> LoadStatus {
        if self.finished {
            return LoadStatus::Finished;
        }
        let pending: Vec<AssetMessage> = self.rx_msg.try_iter().collect();
        for msg in pending {
            if let Some(status) = self.accept(msg, &mut on_progress) {
                return status;
            }
        }
        self.check_done()
            .unwrap_or(LoadStatus::Loading { progress: self.progress() })
    }

    /// Block until the batch finishes.
    pub fn wait(mut self) -> Result<AssetStore, EngineError> {
        loop {
            if let Some(status) = self.check_done() {
                return status.into_result();
            }
            let msg = self.rx_msg.recv().map_err(|_| EngineError::AssetLoad {
                path: PathBuf::new(),
                reason: "loader threads exited early".to_string(),
            })?;
            if let Some(status) = self.accept(msg, &mut |_, _, _| {}) {
                return status.into_result();
            }
        }
    }

    fn accept(
        &mut self,
        msg: AssetMessage,
        on_progress: &mut dyn FnMut(f32, &str, &Asset),
    ) -> Option<LoadStatus> {
        match msg {
            AssetMessage::Loaded(asset) => {
                self.loaded += 1;
                on_progress(self.progress(), asset.name(), &asset);
                self.store.insert(asset);
                None
            }
            AssetMessage::Failed { name, path, error: reason } => {
                error!("Asset '{}' failed to load from {}: {}", name, path.display(), reason);
                self.finished = true;
                Some(LoadStatus::Failed(EngineError::AssetLoad { path, reason }))
            }
        }
    }

    fn check_done(&mut self) -> Option<LoadStatus> {
        if self.finished || self.loaded < self.total {
            return None;
        }
        self.finished = true;
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        info!("Loaded {} assets", self.loaded);
        Some(LoadStatus::Done(std::mem::take(&mut self.store)))
    }
}

impl LoadStatus {
    fn into_result(self) -> Result<AssetStore, EngineError> {
        match self {
            LoadStatus::Done(store) => Ok(store),
            LoadStatus::Failed(err) => Err(err),
            LoadStatus::Loading { .. } | LoadStatus::Finished => Err(EngineError::AssetLoad {
                path: PathBuf::new(),
                reason: "batch already finished".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_radius_is_half_the_mean_side() {
        let img = ImageHandle::new("box", 10.0, 30.0);
        assert_eq!(img.make_radius(), 10.0);
        assert_eq!(img.size(), Vector::xy(10.0, 30.0));
    }

    #[test]
    fn store_separates_images_and_sounds() {
        let mut store = AssetStore::new();
        store.insert(Asset::Image(ImageHandle::new("a.png", 1.0, 1.0)));
        store.insert(Asset::Sound(SoundHandle::new("a.ogg", "data/a.ogg", vec![1, 2, 3])));
        assert_eq!(store.len(), 2);
        assert!(store.image("a.png").is_some());
        assert!(store.image("a.ogg").is_none());
        assert_eq!(store.sound("a.ogg").map(|s| s.bytes().len()), Some(3));
    }

    #[test]
    fn manifest_parses_with_optional_lists() {
        let m = AssetManifest::from_json(r#"{"base":"data","images":["x.png"]}"#).unwrap();
        assert_eq!(m.base, PathBuf::from("data"));
        assert_eq!(m.len(), 1);
        assert!(m.sounds.is_empty());
        let jobs = m.jobs();
        assert_eq!(jobs[0].path, PathBuf::from("data").join("x.png"));
        assert_eq!(jobs[0].kind, AssetKind::Image);
    }

    #[test]
    fn bad_manifest_is_a_config_error() {
        assert!(matches!(
            AssetManifest::from_json("{"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn empty_manifest_completes_on_first_poll() {
        let mut batch = load_assets(&AssetManifest::default());
        assert!(matches!(batch.poll(|_, _, _| {}), LoadStatus::Done(store) if store.is_empty()));
        assert!(matches!(batch.poll(|_, _, _| {}), LoadStatus::Finished));
    }
}
