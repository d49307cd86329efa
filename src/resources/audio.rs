//! Sound playback contract.
//!
//! The engine never touches an audio device. Handlers reach an
//! [`AudioPlayer`] through the context and hand it [`SoundHandle`]s from the
//! asset store; the demo binary plugs in a raylib player running on its own
//! thread. [`Engine::reset`](crate::engine::Engine::reset) stops everything.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::events::audio::AudioCmd;
use crate::resources::assets::SoundHandle;

pub trait AudioPlayer {
    /// Start `sound` from the beginning, restarting it if it is playing.
    fn play(&mut self, sound: &SoundHandle, looped: bool);

    fn stop(&mut self, sound: &SoundHandle);

    fn stop_all(&mut self);
}

/// Player for headless runs: plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioPlayer for NullAudio {
    fn play(&mut self, _sound: &SoundHandle, _looped: bool) {}
    fn stop(&mut self, _sound: &SoundHandle) {}
    fn stop_all(&mut self) {}
}

#[derive(Debug, Default)]
struct AudioLog {
    commands: Vec<AudioCmd>,
    playing: FxHashSet<String>,
}

/// Player recording every command, for tests. Clones share one log, so a
/// test can keep a clone after boxing the player into an engine.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    log: Rc<RefCell<AudioLog>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<AudioCmd> {
        self.log.borrow().commands.clone()
    }

    /// Whether `key` was played and not stopped since. Looping or not, a
    /// recorded sound never finishes by itself.
    pub fn is_playing(&self, key: &str) -> bool {
        self.log.borrow().playing.contains(key)
    }
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, sound: &SoundHandle, looped: bool) {
        let mut log = self.log.borrow_mut();
        log.playing.insert(sound.key().to_string());
        log.commands.push(AudioCmd::Play {
            key: sound.key().to_string(),
            path: sound.path().to_path_buf(),
            looped,
        });
    }

    fn stop(&mut self, sound: &SoundHandle) {
        let mut log = self.log.borrow_mut();
        log.playing.remove(sound.key());
        log.commands.push(AudioCmd::Stop {
            key: sound.key().to_string(),
        });
    }

    fn stop_all(&mut self) {
        let mut log = self.log.borrow_mut();
        log.playing.clear();
        log.commands.push(AudioCmd::StopAll);
    }
}
