//! Squids demo entry point.
//!
//! A raylib window driving the engine from its display loop:
//! - **raylib** for windowing, textures, input and sound
//! - **squids** for things, events, scheduling and scenes
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing) and apply CLI overrides
//! 2. Load the asset manifest on worker threads, showing a progress bar
//! 3. Upload textures and build the hallway/kitchen/bedroom demo
//! 4. Each frame: poll input into the engine, then [`Engine::advance`]
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features raylib -- --nosplash
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod audiobridge;
mod backend;
mod demo;

use clap::Parser;
use log::{error, info, warn};
use raylib::prelude::*;
use std::path::PathBuf;

use squids::engine::Engine;
use squids::resources::assets::{AssetManifest, AssetStore, LoadStatus, load_assets};
use squids::resources::gameconfig::EngineConfig;

use crate::audiobridge::AudioBridge;
use crate::backend::{RaylibRenderer, TextureCache, poll_input};

/// Squids 2D engine demo
#[derive(Parser)]
#[command(version, about = "Walk through the hallway, the kitchen and the bedroom.")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Skip the splash screen.
    #[arg(long)]
    nosplash: bool,

    /// Start with debug mode on (toggle with Ctrl + `).
    #[arg(long)]
    debug: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EngineConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if cli.nosplash {
        config = config.without_splash();
    }
    config.debug |= cli.debug;

    let manifest = match AssetManifest::load(&config.manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // --------------- Raylib window ---------------
    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .resizable()
        .title(&config.title)
        .build();
    rl.set_target_fps(config.target_fps);
    // Escape is a game key, not a quit key
    rl.set_exit_key(None);

    // --------------- Assets ---------------
    let Some(store) = load_with_progress(&mut rl, &thread, &manifest) else {
        std::process::exit(1);
    };
    let textures = TextureCache::load(&mut rl, &thread, &store);
    info!("Uploaded {} textures", textures.len());

    // --------------- Engine + demo ---------------
    let mut engine = Engine::new(config);
    engine.set_surface_size(rl.get_screen_width() as f32, rl.get_screen_height() as f32);
    engine.set_splash_logo(store.image("logo.png").cloned());
    engine.set_audio(Box::new(AudioBridge::spawn()));
    if let Err(e) = demo::setup(&mut engine, &store) {
        error!("Demo setup failed: {}", e);
        std::process::exit(1);
    }

    // --------------- Main loop ---------------
    let mut focused = rl.is_window_focused();
    while !rl.window_should_close() {
        for event in poll_input(&rl, &mut focused) {
            engine.handle_input(event);
        }
        let mut d = rl.begin_drawing(&thread);
        let mut renderer = RaylibRenderer::new(&mut d, &textures);
        engine.advance(&mut renderer);
    }
    info!("Bye");
}

/// Drain the asset batch while drawing a progress bar. `None` on failure
/// or when the window is closed first.
fn load_with_progress(rl: &mut RaylibHandle, thread: &RaylibThread, manifest: &AssetManifest) -> Option<AssetStore> {
    let mut batch = load_assets(manifest);
    while !rl.window_should_close() {
        let progress = match batch.poll(|progress, name, _| {
            info!("Loaded {} ({:.0}%)", name, progress * 100.0);
        }) {
            LoadStatus::Loading { progress } => progress,
            LoadStatus::Done(store) => return Some(store),
            LoadStatus::Failed(e) => {
                error!("{}", e);
                return None;
            }
            LoadStatus::Finished => return None,
        };
        let (w, h) = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);
        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::BLACK);
        d.draw_rectangle_lines_ex(Rectangle::new(w * 0.25, h * 0.5 - 10.0, w * 0.5, 20.0), 1.0, Color::WHITE);
        d.draw_rectangle_rec(
            Rectangle::new(w * 0.25, h * 0.5 - 10.0, w * 0.5 * progress, 20.0),
            Color::WHITE,
        );
    }
    None
}
