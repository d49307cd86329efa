//! Scene registry and the fade-to-black transition state machine.
//!
//! A [`SceneManager`] is a thing of its own: [`SceneManager::install`] spawns
//! it at draw priority 100 and replaces its tick and draw handlers. The tick
//! handler advances the fade, the draw handler paints the black overlay and
//! (in debug mode) the active scene's margin zones.
//!
//! ```text
//!  Idle --request_next/previous--> TransitioningOut (opacity 0 -> 1)
//!   ^                                   | opacity >= 1: unload active,
//!   |                                   | load target, swap
//!   +---- opacity <= 0 ---- TransitioningIn (opacity 1 -> 0)
//! ```
//!
//! The manager is a cheap handle over shared state; clones observe the same
//! scenes and transition, so scene closures and player handlers can keep one.

use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::thing::{Spawn, ThingId};
use crate::components::vector::Vector;
use crate::error::EngineError;
use crate::events::EventType;
use crate::events::bus::Handler;
use crate::events::context::Context;
use crate::resources::renderer::{Color, Rect};
use crate::resources::world::World;

pub const SCENE_MANAGER_PRIORITY: f32 = 100.0;

const OPACITY_EPSILON: f32 = 1e-4;
const MARGIN_OPACITY: f32 = 0.3;

/// Edge the player enters a freshly loaded scene from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    None,
    FromLeft,
    FromRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    TransitioningOut,
    TransitioningIn,
}

/// Margin widths, in pixels from each surface edge, that trigger a scene
/// change when the player crosses them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub right: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneLinks {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub limits: Limits,
}

impl SceneLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_previous(mut self, name: impl Into<String>) -> Self {
        self.previous = Some(name.into());
        self
    }

    pub fn with_next(mut self, name: impl Into<String>) -> Self {
        self.next = Some(name.into());
        self
    }

    pub fn with_limits(mut self, left: f32, right: f32) -> Self {
        self.limits = Limits { left, right };
        self
    }
}

pub trait Scene {
    fn load(&mut self, ctx: &mut Context<'_>, from: Direction);

    fn unload(&mut self, _ctx: &mut Context<'_>) {}

    fn links(&self) -> &SceneLinks;
}

type LoadFn = Box<dyn FnMut(&mut Context<'_>, Direction)>;
type UnloadFn = Box<dyn FnMut(&mut Context<'_>)>;

/// A [`Scene`] assembled from closures.
pub struct SceneDef {
    links: SceneLinks,
    on_load: LoadFn,
    on_unload: Option<UnloadFn>,
}

impl SceneDef {
    pub fn new<F>(links: SceneLinks, on_load: F) -> Self
    where
        F: FnMut(&mut Context<'_>, Direction) + 'static,
    {
        Self {
            links,
            on_load: Box::new(on_load),
            on_unload: None,
        }
    }

    pub fn on_unload<F>(mut self, on_unload: F) -> Self
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.on_unload = Some(Box::new(on_unload));
        self
    }
}

impl Scene for SceneDef {
    fn load(&mut self, ctx: &mut Context<'_>, from: Direction) {
        (self.on_load)(ctx, from);
    }

    fn unload(&mut self, ctx: &mut Context<'_>) {
        if let Some(f) = self.on_unload.as_mut() {
            f(ctx);
        }
    }

    fn links(&self) -> &SceneLinks {
        &self.links
    }
}

enum Transition {
    Idle,
    Out { target: String, from: Direction },
    In,
}

/// A registered scene. Its links are copied out at registration so lookups
/// keep working while the scene's own hook is running.
struct SceneEntry {
    links: SceneLinks,
    hook: Rc<RefCell<dyn Scene>>,
}

struct SceneState {
    scenes: FxHashMap<String, SceneEntry>,
    active: Option<String>,
    transition: Transition,
    opacity: f32,
    step: f32,
}

impl SceneState {
    fn active_links(&self) -> Option<&SceneLinks> {
        let name = self.active.as_ref()?;
        self.scenes.get(name).map(|entry| &entry.links)
    }

    fn request(&mut self, pick: fn(&SceneLinks) -> Option<&String>, from: Direction) -> bool {
        if !matches!(self.transition, Transition::Idle) {
            warn!("Scene change requested during a transition; ignored");
            return false;
        }
        let Some(target) = self.active_links().and_then(pick).cloned() else {
            return false;
        };
        if !self.scenes.contains_key(&target) {
            error!(
                "Scene {:?} links to unregistered scene '{}'",
                self.active, target
            );
            return false;
        }
        info!("Transition to '{}' started", target);
        self.transition = Transition::Out { target, from };
        true
    }
}

#[derive(Clone)]
pub struct SceneManager {
    owner: ThingId,
    state: Rc<RefCell<SceneState>>,
}

impl SceneManager {
    /// Spawn the manager thing and hook its tick and draw handlers.
    pub fn install(world: &mut World, step: f32) -> Result<Self, EngineError> {
        let owner = world.spawn(Spawn::default());
        let manager = Self {
            owner,
            state: Rc::new(RefCell::new(SceneState {
                scenes: FxHashMap::default(),
                active: None,
                transition: Transition::Idle,
                opacity: 0.0,
                step,
            })),
        };
        world.ignore(owner, EventType::Physics);
        world.ignore(owner, EventType::Animate);
        world.set_draw_priority(owner, SCENE_MANAGER_PRIORITY)?;

        let ticker = manager.clone();
        world.listen(owner, EventType::Tick, Handler::new(move |_, ctx, _| ticker.step(ctx)))?;
        let painter = manager.clone();
        world.listen(owner, EventType::Draw, Handler::new(move |_, ctx, _| painter.draw(ctx)))?;
        Ok(manager)
    }

    /// The thing carrying the manager's handlers.
    pub fn owner(&self) -> ThingId {
        self.owner
    }

    pub fn add_scene(&self, name: impl Into<String>, scene: impl Scene + 'static) -> Result<(), EngineError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::InvalidScene(name));
        }
        let entry = SceneEntry {
            links: scene.links().clone(),
            hook: Rc::new(RefCell::new(scene)),
        };
        self.state.borrow_mut().scenes.insert(name, entry);
        Ok(())
    }

    /// Unload the active scene (if any), then load `name` and make it active.
    pub fn load_scene(&self, ctx: &mut Context<'_>, name: &str, from: Direction) -> Result<(), EngineError> {
        let active = {
            let st = self.state.borrow();
            if !st.scenes.contains_key(name) {
                return Err(EngineError::UnknownScene(name.to_string()));
            }
            st.active.clone()
        };
        if let Some(active) = active {
            self.with_scene(&active, |scene| scene.unload(ctx));
            info!("Unloaded scene '{}'", active);
        }
        self.state.borrow_mut().active = Some(name.to_string());
        self.with_scene(name, |scene| scene.load(ctx, from));
        info!("Loaded scene '{}' ({:?})", name, from);
        Ok(())
    }

    /// Run `name`'s unload hook. Clears the active scene if it was `name`.
    pub fn unload_scene(&self, ctx: &mut Context<'_>, name: &str) -> Result<(), EngineError> {
        if !self.state.borrow().scenes.contains_key(name) {
            return Err(EngineError::UnknownScene(name.to_string()));
        }
        self.with_scene(name, |scene| scene.unload(ctx));
        let mut st = self.state.borrow_mut();
        if st.active.as_deref() == Some(name) {
            st.active = None;
        }
        info!("Unloaded scene '{}'", name);
        Ok(())
    }

    /// Start fading towards the active scene's `next`. The new scene is
    /// entered from the left edge.
    pub fn request_next(&self) -> bool {
        self.state
            .borrow_mut()
            .request(|links| links.next.as_ref(), Direction::FromLeft)
    }

    /// Start fading towards the active scene's `previous`. The new scene is
    /// entered from the right edge.
    pub fn request_previous(&self) -> bool {
        self.state
            .borrow_mut()
            .request(|links| links.previous.as_ref(), Direction::FromRight)
    }

    /// Advance the fade by one step. Called from the manager's tick handler.
    pub fn step(&self, ctx: &mut Context<'_>) {
        let swap = {
            let mut guard = self.state.borrow_mut();
            let st = &mut *guard;
            let step = st.step;
            match st.transition {
                Transition::Idle => None,
                Transition::Out { .. } => {
                    st.opacity += step;
                    if st.opacity >= 1.0 - OPACITY_EPSILON {
                        st.opacity = 1.0;
                        match std::mem::replace(&mut st.transition, Transition::In) {
                            Transition::Out { target, from } => Some((target, from)),
                            _ => None,
                        }
                    } else {
                        None
                    }
                }
                Transition::In => {
                    st.opacity -= step;
                    if st.opacity <= OPACITY_EPSILON {
                        st.opacity = 0.0;
                        st.transition = Transition::Idle;
                        info!("Transition finished");
                    }
                    None
                }
            }
        };
        if let Some((target, from)) = swap
            && let Err(e) = self.load_scene(ctx, &target, from)
        {
            error!("Transition target failed to load: {}", e);
        }
    }

    fn draw(&self, ctx: &mut Context<'_>) {
        let (sw, sh) = ctx.surface_size();
        let st = self.state.borrow();
        if ctx.debug_enabled()
            && let Some(links) = st.active_links()
        {
            let Limits { left, right } = links.limits;
            if left > 0.0 {
                let color = if links.previous.is_some() { Color::BLUE } else { Color::RED };
                ctx.renderer
                    .draw_rect_filled(Rect::new(0.0, 0.0, left, sh), color, MARGIN_OPACITY, 0.0);
            }
            if right > 0.0 {
                let color = if links.next.is_some() { Color::BLUE } else { Color::RED };
                ctx.renderer
                    .draw_rect_filled(Rect::new(sw - right, 0.0, right, sh), color, MARGIN_OPACITY, 0.0);
            }
        }
        if !matches!(st.transition, Transition::Idle) {
            ctx.renderer
                .draw_rect_filled(Rect::new(0.0, 0.0, sw, sh), Color::BLACK, st.opacity, 0.0);
        }
    }

    /// Player boundary contract: past the left margin request the previous
    /// scene, past the right margin the next one. When there is no such
    /// neighbour, or a transition is already running, clamp `position` at the
    /// margin. Returns whether a transition was started.
    pub fn enforce_limits(&self, position: &mut Vector, surface_width: f32) -> bool {
        let (limits, transitioning) = {
            let st = self.state.borrow();
            match st.active_links() {
                Some(links) => (links.limits, !matches!(st.transition, Transition::Idle)),
                None => return false,
            }
        };
        let right_edge = surface_width - limits.right;
        if position.x < limits.left {
            if !transitioning && self.request_previous() {
                return true;
            }
            position.x = limits.left;
        } else if position.x > right_edge {
            if !transitioning && self.request_next() {
                return true;
            }
            position.x = right_edge;
        }
        false
    }

    pub fn active_scene(&self) -> Option<String> {
        self.state.borrow().active.clone()
    }

    /// Links of the active scene.
    pub fn active_links(&self) -> Option<SceneLinks> {
        self.state.borrow().active_links().cloned()
    }

    pub fn has_scene(&self, name: &str) -> bool {
        self.state.borrow().scenes.contains_key(name)
    }

    pub fn is_transitioning(&self) -> bool {
        !matches!(self.state.borrow().transition, Transition::Idle)
    }

    pub fn phase(&self) -> TransitionPhase {
        match self.state.borrow().transition {
            Transition::Idle => TransitionPhase::Idle,
            Transition::Out { .. } => TransitionPhase::TransitioningOut,
            Transition::In => TransitionPhase::TransitioningIn,
        }
    }

    /// Current overlay opacity.
    pub fn opacity(&self) -> f32 {
        self.state.borrow().opacity
    }

    /// Run a hook of `name` with the manager state released, so the hook may
    /// call back into the manager. The scene stays registered meanwhile.
    fn with_scene(&self, name: &str, f: impl FnOnce(&mut dyn Scene)) {
        let hook = match self.state.borrow().scenes.get(name) {
            Some(entry) => Rc::clone(&entry.hook),
            None => return,
        };
        let Ok(mut scene) = hook.try_borrow_mut() else {
            warn!("Scene '{}' re-entered its own hook; skipped", name);
            return;
        };
        f(&mut *scene);
    }
}
