//! Frame animator driven by the fixed-rate update loop.
//!
//! Frames advance by counting `animate` events, never by wall-clock time, so
//! an animation plays identically regardless of display-rate jitter. At the
//! default 100 ticks per second, `ticks_per_frame = 10` gives 10 fps.

use crate::resources::assets::ImageHandle;

#[derive(Debug, Clone)]
pub struct Animator {
    frames: Vec<ImageHandle>,
    /// Number of `next()` calls each frame stays on screen. Never zero.
    ticks_per_frame: u32,
    /// Wrap to the first frame after the last, instead of holding it.
    pub looping: bool,
    playing: bool,
    frame: usize,
    ticks: u32,
}

impl Animator {
    /// Looping animator that starts playing immediately.
    pub fn new(frames: Vec<ImageHandle>, ticks_per_frame: u32) -> Self {
        Self {
            frames,
            ticks_per_frame: ticks_per_frame.max(1),
            looping: true,
            playing: true,
            frame: 0,
            ticks: 0,
        }
    }

    /// Build from a frame rate and the engine's tick rate.
    pub fn from_fps(frames: Vec<ImageHandle>, fps: u32, ticks_per_second: u32) -> Self {
        let per_frame = (ticks_per_second as f32 / fps.max(1) as f32).round() as u32;
        Self::new(frames, per_frame)
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Start (or resume) playback from `start_frame`.
    pub fn play(&mut self, start_frame: usize) -> &mut Self {
        self.frame = start_frame.min(self.frames.len().saturating_sub(1));
        self.ticks = 0;
        self.playing = true;
        self
    }

    pub fn restart(&mut self) -> &mut Self {
        self.play(0)
    }

    pub fn stop(&mut self) -> &mut Self {
        self.playing = false;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn ticks_per_frame(&self) -> u32 {
        self.ticks_per_frame
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Current frame image, then count one tick towards the next frame.
    ///
    /// A non-looping animator stops on its last frame and keeps returning it.
    pub fn next(&mut self) -> Option<ImageHandle> {
        let current = self.frames.get(self.frame).cloned()?;
        if self.playing {
            self.ticks += 1;
            if self.ticks >= self.ticks_per_frame {
                self.ticks = 0;
                self.frame += 1;
                if self.frame >= self.frames.len() {
                    if self.looping {
                        self.frame = 0;
                    } else {
                        self.frame = self.frames.len() - 1;
                        self.playing = false;
                    }
                }
            }
        }
        Some(current)
    }
}
