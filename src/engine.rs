//! The engine: one value owning the world, the scheduler and the
//! collaborator state, driven from outside by a timer and a display loop.
//!
//! A driver with two callbacks calls [`Engine::update`] at the fixed rate and
//! [`Engine::render`] once per display refresh. A driver with only a display
//! callback calls [`Engine::advance`], which runs as many updates as are due
//! and then renders one frame. Input goes through [`Engine::handle_input`].
//!
//! Updates see a renderer that draws nothing but reports the surface size,
//! so handlers can lay things out from tick handlers.

use std::time::Duration;

use log::{debug, info};

use crate::components::thing::ThingId;
use crate::events::Event;
use crate::events::context::Context;
use crate::events::input::InputEvent;
use crate::resources::assets::ImageHandle;
use crate::resources::audio::{AudioPlayer, NullAudio};
use crate::resources::clock::{Clock, SystemClock};
use crate::resources::debugmode::DebugMode;
use crate::resources::gameconfig::EngineConfig;
use crate::resources::input::InputState;
use crate::resources::renderer::{NullRenderer, Renderer};
use crate::resources::world::World;
use crate::resources::worldtime::{Stats, WorldTime};
use crate::systems::input::route_input;
use crate::systems::render::{Splash, draw_debug_overlay, draw_splash};
use crate::systems::scheduler::{Frame, Scheduler, run_update};

pub struct Engine {
    pub world: World,
    pub debug: DebugMode,
    pub input: InputState,
    scheduler: Scheduler,
    stats: Stats,
    config: EngineConfig,
    clock: Box<dyn Clock>,
    audio: Box<dyn AudioPlayer>,
    splash: Splash,
    surface: NullRenderer,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock::new()))
    }

    pub fn with_clock(config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        let scheduler = Scheduler::new(config.ticks_per_second, config.splash_ticks)
            .with_max_catch_up(config.max_catch_up);
        info!(
            "Engine starting: {} tps, {} warm-up ticks",
            config.ticks_per_second, config.splash_ticks
        );
        Self {
            world: World::new(),
            debug: DebugMode::new(config.debug),
            input: InputState::new(),
            scheduler,
            stats: Stats::new(),
            surface: NullRenderer {
                width: config.window_width as f32,
                height: config.window_height as f32,
            },
            config,
            clock,
            audio: Box::new(NullAudio),
            splash: Splash::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Counters as handlers see them.
    pub fn time(&self) -> WorldTime {
        WorldTime {
            tick_count: self.scheduler.tick_count(),
            draw_count: self.scheduler.draw_count(),
            delta: self.scheduler.delta(),
            tps: self.stats.tps,
            fps: self.stats.fps,
        }
    }

    pub fn surface_size(&self) -> (f32, f32) {
        self.surface.surface_size()
    }

    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.surface.width = width;
        self.surface.height = height;
    }

    pub fn set_splash_logo(&mut self, logo: Option<ImageHandle>) {
        self.splash.logo = logo;
    }

    pub fn splash_mut(&mut self) -> &mut Splash {
        &mut self.splash
    }

    /// Replace the sound player handlers reach through `ctx.audio`.
    pub fn set_audio(&mut self, audio: Box<dyn AudioPlayer>) {
        self.audio = audio;
    }

    pub fn audio_mut(&mut self) -> &mut dyn AudioPlayer {
        self.audio.as_mut()
    }

    pub fn skip_warmup(&mut self) {
        self.scheduler.skip_warmup();
    }

    /// Context for setup code outside the loop, e.g. loading the first scene.
    pub fn offscreen_context(&mut self) -> Context<'_> {
        let time = self.time();
        Context::new(
            &mut self.world,
            &mut self.surface,
            self.audio.as_mut(),
            &mut self.debug,
            &self.input,
            time,
        )
    }

    /// Context drawing into `renderer`.
    pub fn context<'a>(&'a mut self, renderer: &'a mut dyn Renderer) -> Context<'a> {
        let time = self.time();
        Context::new(
            &mut self.world,
            renderer,
            self.audio.as_mut(),
            &mut self.debug,
            &self.input,
            time,
        )
    }

    /// One fixed-rate update invocation. Returns whether anything was
    /// published (false while warming up).
    pub fn update(&mut self) -> bool {
        let now = self.clock.now();
        let step = self.scheduler.begin_update(now);
        self.sample_stats(now);
        match step {
            Some(step) => {
                let mut ctx = self.offscreen_context();
                run_update(&mut ctx, step);
                true
            }
            None => false,
        }
    }

    /// One display frame: the splash while warming up, otherwise clear,
    /// publish `Draw`, then the debug overlay.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        let (width, height) = renderer.surface_size();
        self.set_surface_size(width, height);
        let frame = self.scheduler.begin_frame();
        self.sample_stats(self.clock.now());
        match frame {
            Frame::Splash { .. } => draw_splash(renderer, &self.splash),
            Frame::Draw { count } => {
                renderer.clear(self.config.background);
                self.context(renderer).publish(&Event::Draw { count });
                if self.debug.is_enabled() {
                    draw_debug_overlay(renderer, &self.debug);
                }
            }
        }
    }

    /// Run the updates due since the last call, then render one frame.
    /// Returns how many updates ran.
    pub fn advance(&mut self, renderer: &mut dyn Renderer) -> u32 {
        let due = self.scheduler.due_updates(self.clock.now());
        for _ in 0..due {
            self.update();
        }
        self.render(renderer);
        due
    }

    /// Fold an input event into the input state and publish it. Nothing is
    /// published while warming up.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<ThingId> {
        if let InputEvent::Resize { width, height } = event {
            self.set_surface_size(width, height);
        }
        let event = route_input(&mut self.input, &mut self.debug, event);
        if !self.scheduler.is_running() {
            return Vec::new();
        }
        self.offscreen_context().publish(&event)
    }

    /// Destroy every thing, stop all sounds and clear the debug rows.
    pub fn reset(&mut self) {
        self.world.destroy_all();
        self.audio.stop_all();
        self.debug.clear_messages();
        debug!("Engine reset");
    }

    /// Time elapsed on the engine's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    fn sample_stats(&mut self, now: Duration) {
        let (ticks, draws) = (self.scheduler.tick_count(), self.scheduler.draw_count());
        if self.stats.sample(now, ticks, draws) {
            debug!("{} tps, {} fps", self.stats.tps, self.stats.fps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::thing::Spawn;
    use crate::events::EventType;
    use crate::events::audio::AudioCmd;
    use crate::events::bus::Handler;
    use crate::resources::assets::SoundHandle;
    use crate::resources::audio::RecordingAudio;
    use crate::resources::clock::ManualClock;
    use crate::resources::renderer::{Color, DrawCommand, RecordingRenderer};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine(splash_ticks: u32) -> (Engine, ManualClock) {
        let clock = ManualClock::new();
        let mut config = EngineConfig::new();
        config.splash_ticks = splash_ticks;
        (Engine::with_clock(config, Box::new(clock.clone())), clock)
    }

    #[test]
    fn update_publishes_physics_tick_animate_in_order() {
        let (mut engine, _) = engine(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = engine.world.spawn(Spawn::default());
        for event in [EventType::Animate, EventType::Tick, EventType::Physics] {
            let log = Rc::clone(&log);
            engine
                .world
                .listen(id, event, Handler::new(move |_, _, e| log.borrow_mut().push(e.kind())))
                .unwrap();
        }
        assert!(engine.update());
        assert_eq!(
            *log.borrow(),
            vec![EventType::Physics, EventType::Tick, EventType::Animate]
        );
    }

    #[test]
    fn delta_comes_from_the_clock() {
        let (mut engine, clock) = engine(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = engine.world.spawn(Spawn::default());
        let sink = Rc::clone(&seen);
        engine
            .world
            .listen(id, EventType::Tick, Handler::new(move |_, ctx, e| {
                if let Event::Tick { delta, count } = e {
                    sink.borrow_mut().push((*delta, *count, ctx.time.tick_count));
                }
            }))
            .unwrap();
        engine.update();
        clock.advance(Duration::from_millis(12));
        engine.update();
        assert_eq!(
            *seen.borrow(),
            vec![
                (Duration::ZERO, 1, 1),
                (Duration::from_millis(12), 2, 2)
            ]
        );
    }

    #[test]
    fn splash_frames_until_warmup_ends() {
        let (mut engine, _) = engine(2);
        let mut r = RecordingRenderer::new(640.0, 480.0);
        engine.world.spawn(Spawn::default());
        engine.render(&mut r);
        assert!(!r.texts().is_empty());
        assert!(!r.commands.iter().any(|c| matches!(c, DrawCommand::Clear(_))));
        assert!(!engine.update());
        assert!(!engine.update());
        assert!(engine.is_running());
        r.take();
        engine.render(&mut r);
        assert_eq!(r.commands.first(), Some(&DrawCommand::Clear(Color::BLACK)));
    }

    #[test]
    fn input_is_suppressed_while_warming_up() {
        let (mut engine, _) = engine(1);
        let id = engine.world.spawn(Spawn::default());
        engine
            .world
            .listen(id, EventType::KeyDown, Handler::new(|_, _, _| {}))
            .unwrap();
        assert!(engine.handle_input(InputEvent::key_down("a")).is_empty());
        assert!(engine.input.is_held("a"));
        engine.update();
        assert_eq!(engine.handle_input(InputEvent::key_down("b")), vec![id]);
    }

    #[test]
    fn resize_updates_surface_size() {
        let (mut engine, _) = engine(0);
        engine.handle_input(InputEvent::Resize {
            width: 300.0,
            height: 200.0,
        });
        assert_eq!(engine.surface_size(), (300.0, 200.0));
        assert_eq!(engine.offscreen_context().surface_size(), (300.0, 200.0));
    }

    #[test]
    fn advance_runs_due_updates_then_one_frame() {
        let (mut engine, clock) = engine(0);
        let mut r = RecordingRenderer::new(640.0, 480.0);
        assert_eq!(engine.advance(&mut r), 0);
        clock.advance(Duration::from_millis(25));
        assert_eq!(engine.advance(&mut r), 2);
        assert_eq!(engine.scheduler().tick_count(), 2);
        assert_eq!(engine.scheduler().draw_count(), 2);
    }

    #[test]
    fn stats_sampled_once_per_second() {
        let (mut engine, clock) = engine(0);
        let mut r = RecordingRenderer::new(640.0, 480.0);
        engine.render(&mut r);
        for _ in 0..100 {
            clock.advance(Duration::from_millis(10));
            engine.update();
        }
        engine.render(&mut r);
        assert_eq!(engine.stats().tps, 100);
        assert_eq!(engine.time().tps, 100);
    }

    #[test]
    fn debug_overlay_follows_the_draw() {
        let (mut engine, _) = engine(0);
        engine.debug.set_enabled(true);
        engine.debug.set_message(0, "hello");
        let mut r = RecordingRenderer::new(640.0, 480.0);
        engine.render(&mut r);
        assert_eq!(r.texts(), ["hello", "hello"]);
    }

    #[test]
    fn reset_clears_world_and_messages() {
        let (mut engine, _) = engine(0);
        engine.world.spawn(Spawn::default());
        engine.debug.set_message(0, "x");
        engine.reset();
        assert!(engine.world.is_empty());
        assert!(engine.debug.messages().is_empty());
    }

    #[test]
    fn reset_stops_sounds_started_by_handlers() {
        let (mut engine, _) = engine(0);
        let audio = RecordingAudio::new();
        engine.set_audio(Box::new(audio.clone()));
        let music = SoundHandle::new("theme.ogg", "data/theme.ogg", Vec::new());
        let id = engine.world.spawn(Spawn::default());
        engine
            .world
            .listen(id, EventType::Tick, Handler::new(move |_, ctx, _| ctx.audio.play(&music, true)))
            .unwrap();
        engine.update();
        assert!(audio.is_playing("theme.ogg"));

        engine.reset();
        assert!(!audio.is_playing("theme.ogg"));
        assert_eq!(audio.commands().last(), Some(&AudioCmd::StopAll));
    }
}
