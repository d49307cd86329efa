//! Engine configuration resource.
//!
//! Settings loaded from an INI configuration file. Provides defaults for safe
//! startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [engine]
//! ticks_per_second = 100
//! splash_ticks = 300
//! transition_step = 0.05
//! background = #000000
//! debug = false
//! max_catch_up = 10
//!
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 60
//! title = Squids
//!
//! [assets]
//! manifest = ./data/manifest.json
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::EngineError;
use crate::resources::renderer::Color;

/// Default safe values for startup
pub const DEFAULT_TICKS_PER_SECOND: u32 = 100;
pub const DEFAULT_SPLASH_TICKS: u32 = 300;
pub const DEFAULT_TRANSITION_STEP: f32 = 0.05;
const DEFAULT_BACKGROUND: Color = Color::BLACK;
const DEFAULT_DEBUG: bool = false;
pub const DEFAULT_MAX_CATCH_UP: u32 = 10;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_TITLE: &str = "Squids";
const DEFAULT_MANIFEST_PATH: &str = "./data/manifest.json";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Fixed update rate.
    pub ticks_per_second: u32,
    /// Update invocations swallowed by the warm-up before anything is published.
    pub splash_ticks: u32,
    /// Scene fade opacity change per tick.
    pub transition_step: f32,
    /// Color the surface is cleared to before each draw.
    pub background: Color,
    /// Start with debug mode on.
    pub debug: bool,
    /// Most updates [`Engine::advance`](crate::engine::Engine::advance) runs per frame.
    pub max_catch_up: u32,
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    pub title: String,
    /// Asset manifest (JSON) loaded at startup.
    pub manifest_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            splash_ticks: DEFAULT_SPLASH_TICKS,
            transition_step: DEFAULT_TRANSITION_STEP,
            background: DEFAULT_BACKGROUND,
            debug: DEFAULT_DEBUG,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            title: DEFAULT_TITLE.to_string(),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Skip the splash warm-up entirely.
    pub fn without_splash(mut self) -> Self {
        self.splash_ticks = 0;
        self
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), EngineError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| EngineError::Config(format!("Failed to load config file: {}", e)))?;
        self.apply(&config)?;
        info!(
            "Loaded config from {:?}: {} tps, splash={}, {}x{} window, fps={}",
            self.config_path,
            self.ticks_per_second,
            self.splash_ticks,
            self.window_width,
            self.window_height,
            self.target_fps
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), EngineError> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), EngineError> {
        // [engine] section
        if let Some(tps) = config.getuint("engine", "ticks_per_second").ok().flatten() {
            self.ticks_per_second = (tps as u32).max(1);
        }
        if let Some(ticks) = config.getuint("engine", "splash_ticks").ok().flatten() {
            self.splash_ticks = ticks as u32;
        }
        if let Some(step) = config.getfloat("engine", "transition_step").ok().flatten() {
            if !(step > 0.0 && step <= 1.0) {
                return Err(EngineError::Config(format!(
                    "transition_step must be in (0, 1], got {}",
                    step
                )));
            }
            self.transition_step = step as f32;
        }
        if let Some(hex) = config.get("engine", "background") {
            self.background = Color::from_hex(hex.trim())?;
        }
        if let Some(debug) = config.getbool("engine", "debug").ok().flatten() {
            self.debug = debug;
        }
        if let Some(n) = config.getuint("engine", "max_catch_up").ok().flatten() {
            self.max_catch_up = (n as u32).max(1);
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }

        // [assets] section
        if let Some(manifest) = config.get("assets", "manifest") {
            self.manifest_path = PathBuf::from(manifest);
        }
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), EngineError> {
        let mut config = Ini::new();

        // [engine] section
        config.set("engine", "ticks_per_second", Some(self.ticks_per_second.to_string()));
        config.set("engine", "splash_ticks", Some(self.splash_ticks.to_string()));
        config.set("engine", "transition_step", Some(self.transition_step.to_string()));
        config.set("engine", "background", Some(self.background.to_hex()));
        config.set("engine", "debug", Some(self.debug.to_string()));
        config.set("engine", "max_catch_up", Some(self.max_catch_up.to_string()));

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "title", Some(self.title.clone()));

        // [assets] section
        config.set(
            "assets",
            "manifest",
            Some(self.manifest_path.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| EngineError::Config(format!("Failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
