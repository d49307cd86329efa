//! Asset loader threads.
//!
//! [`load_worker`] runs on its own OS thread, pulls [`AssetJob`]s until the
//! job queue is empty, and reports each outcome as an [`AssetMessage`]. The
//! main thread never touches the filesystem for assets; it only drains
//! results through [`AssetBatch::poll`](crate::resources::assets::AssetBatch::poll).

use crossbeam_channel::{Receiver, Sender};
use log::debug;

use crate::error::EngineError;
use crate::events::assets::{AssetJob, AssetKind, AssetMessage};
use crate::resources::assets::{Asset, ImageHandle, SoundHandle};

/// Entry point of a loader thread.
///
/// Stops early when the batch that owns the result channel is dropped.
pub fn load_worker(rx_job: Receiver<AssetJob>, tx_msg: Sender<AssetMessage>) {
    for job in rx_job.iter() {
        let msg = match load_one(&job) {
            Ok(asset) => AssetMessage::Loaded(asset),
            Err(err) => AssetMessage::Failed {
                name: job.name.clone(),
                path: job.path.clone(),
                error: match err {
                    EngineError::AssetLoad { reason, .. } => reason,
                    other => other.to_string(),
                },
            },
        };
        if tx_msg.send(msg).is_err() {
            debug!("Asset batch dropped; loader thread exiting");
            break;
        }
    }
}

/// Load a single asset from disk.
///
/// Images are only probed for their dimensions; decoding pixels is left to
/// the backend that uploads them.
pub fn load_one(job: &AssetJob) -> Result<Asset, EngineError> {
    let fail = |reason: String| EngineError::AssetLoad {
        path: job.path.clone(),
        reason,
    };
    match job.kind {
        AssetKind::Image => {
            let (width, height) =
                image::image_dimensions(&job.path).map_err(|e| fail(e.to_string()))?;
            debug!("Loaded image '{}' ({}x{})", job.name, width, height);
            Ok(Asset::Image(ImageHandle::from_file(
                job.name.as_str(),
                &job.path,
                width,
                height,
            )))
        }
        AssetKind::Sound => {
            let bytes = std::fs::read(&job.path).map_err(|e| fail(e.to_string()))?;
            debug!("Loaded sound '{}' ({} bytes)", job.name, bytes.len());
            Ok(Asset::Sound(SoundHandle::new(job.name.as_str(), &job.path, bytes)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_reports_its_path() {
        let job = AssetJob {
            name: "nope.png".into(),
            path: PathBuf::from("/definitely/not/here/nope.png"),
            kind: AssetKind::Image,
        };
        match load_one(&job) {
            Err(EngineError::AssetLoad { path, .. }) => assert_eq!(path, job.path),
            other => panic!("expected asset error, got {:?}", other),
        }
    }

    #[test]
    fn worker_reports_failure_and_drains_queue() {
        let (tx_job, rx_job) = crossbeam_channel::unbounded();
        let (tx_msg, rx_msg) = crossbeam_channel::unbounded();
        tx_job
            .send(AssetJob {
                name: "gone.ogg".into(),
                path: PathBuf::from("/definitely/not/here/gone.ogg"),
                kind: AssetKind::Sound,
            })
            .unwrap();
        drop(tx_job);
        load_worker(rx_job, tx_msg);
        let msgs: Vec<_> = rx_msg.try_iter().collect();
        assert_eq!(msgs.len(), 1);
        assert!(matches!(&msgs[0], AssetMessage::Failed { name, .. } if name == "gone.ogg"));
    }
}
