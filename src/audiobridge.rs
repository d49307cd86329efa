//! Sound playback for the demo: an [`AudioPlayer`] forwarding commands to a
//! thread that owns the raylib audio device.
//!
//! raylib audio calls stay on that one thread; the game thread only sends
//! [`AudioCmd`]s over a crossbeam channel. Sounds are loaded lazily from their
//! file path the first time they are played. Looping sounds are streamed as
//! music, one-shots are loaded whole.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error, info, warn};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::{FxHashMap, FxHashSet};

use squids::events::audio::AudioCmd;
use squids::resources::assets::SoundHandle;
use squids::resources::audio::AudioPlayer;

const PUMP_INTERVAL: Duration = Duration::from_millis(10);

pub struct AudioBridge {
    tx_cmd: Sender<AudioCmd>,
    handle: Option<JoinHandle<()>>,
}

impl AudioBridge {
    /// Start the audio thread. If the device cannot be opened the thread
    /// exits and every command is dropped.
    pub fn spawn() -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let handle = std::thread::spawn(move || audio_thread(rx_cmd));
        Self {
            tx_cmd,
            handle: Some(handle),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        // fails only once the thread has exited
        let _ = self.tx_cmd.send(cmd);
    }
}

impl AudioPlayer for AudioBridge {
    fn play(&mut self, sound: &SoundHandle, looped: bool) {
        self.send(AudioCmd::Play {
            key: sound.key().to_string(),
            path: sound.path().to_path_buf(),
            looped,
        });
    }

    fn stop(&mut self, sound: &SoundHandle) {
        self.send(AudioCmd::Stop {
            key: sound.key().to_string(),
        });
    }

    fn stop_all(&mut self) {
        self.send(AudioCmd::StopAll);
    }
}

impl Drop for AudioBridge {
    fn drop(&mut self) {
        self.send(AudioCmd::Shutdown);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            error!("Audio thread panicked");
        }
    }
}

fn audio_thread(rx_cmd: Receiver<AudioCmd>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("Audio disabled: {}", e);
            return;
        }
    };
    info!("Audio thread started");

    let mut musics: FxHashMap<String, Music<'_>> = FxHashMap::default();
    let mut sounds: FxHashMap<String, Sound<'_>> = FxHashMap::default();
    let mut streaming: FxHashSet<String> = FxHashSet::default();

    'run: loop {
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::Play {
                    key,
                    path,
                    looped: true,
                } => {
                    if !musics.contains_key(&key) {
                        match audio.new_music(&path.to_string_lossy()) {
                            Ok(music) => {
                                musics.insert(key.clone(), music);
                            }
                            Err(e) => {
                                warn!("Cannot stream '{}': {}", key, e);
                                continue;
                            }
                        }
                    }
                    if let Some(music) = musics.get(&key) {
                        debug!("Streaming '{}'", key);
                        music.seek_stream(0.0);
                        music.play_stream();
                        streaming.insert(key);
                    }
                }
                AudioCmd::Play {
                    key,
                    path,
                    looped: false,
                } => {
                    if !sounds.contains_key(&key) {
                        match audio.new_sound(&path.to_string_lossy()) {
                            Ok(sound) => {
                                sounds.insert(key.clone(), sound);
                            }
                            Err(e) => {
                                warn!("Cannot load sound '{}': {}", key, e);
                                continue;
                            }
                        }
                    }
                    if let Some(sound) = sounds.get(&key) {
                        debug!("Playing '{}'", key);
                        sound.play();
                    }
                }
                AudioCmd::Stop { key } => {
                    if let Some(music) = musics.get(&key) {
                        music.stop_stream();
                    }
                    if let Some(sound) = sounds.get(&key) {
                        sound.stop();
                    }
                    streaming.remove(&key);
                }
                AudioCmd::StopAll => {
                    for music in musics.values() {
                        music.stop_stream();
                    }
                    for sound in sounds.values() {
                        sound.stop();
                    }
                    streaming.clear();
                }
                AudioCmd::Shutdown => break 'run,
            }
        }

        // Streams need regular pumping; a finished loop starts over.
        for key in &streaming {
            if let Some(music) = musics.get(key) {
                if music.is_stream_playing() {
                    music.update_stream();
                } else {
                    music.seek_stream(0.0);
                    music.play_stream();
                }
            }
        }
        std::thread::sleep(PUMP_INTERVAL);
    }

    // Handles must go before the device.
    musics.clear();
    sounds.clear();
    info!("Audio thread stopped");
}
