//! Three-room walk-through: hallway, kitchen, bedroom.
//!
//! A background thing stretches the room picture over the surface. The
//! player walks towards pointer clicks, animating by tick count, and crossing
//! a room's margin fades to the neighbouring room, with a door sound on the
//! way in.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use squids::components::animation::Animator;
use squids::components::thing::{Spawn, ThingId};
use squids::components::vector::Vector;
use squids::engine::Engine;
use squids::error::EngineError;
use squids::events::bus::Handler;
use squids::events::{Event, EventType};
use squids::resources::assets::{AssetStore, ImageHandle, SoundHandle};
use squids::systems::scenemanager::{Direction, SceneDef, SceneLinks, SceneManager};

const PLAYER_PRIORITY: f32 = 110.0;
const PLAYER_SPEED: f32 = 4.0;
const PLAYER_SCALE: f32 = 3.0;
const PLAYER_FLOOR_OFFSET: f32 = 300.0;
const WALK_FRAMES: usize = 8;
const WALK_TICKS_PER_FRAME: u32 = 10;

struct Room {
    name: &'static str,
    background: &'static str,
    links: SceneLinks,
}

fn rooms() -> [Room; 3] {
    [
        Room {
            name: "hallway",
            background: "room1.png",
            links: SceneLinks::new().with_next("kitchen").with_limits(100.0, 300.0),
        },
        Room {
            name: "kitchen",
            background: "background-2.png",
            links: SceneLinks::new()
                .with_previous("hallway")
                .with_next("bedroom")
                .with_limits(100.0, 300.0),
        },
        Room {
            name: "bedroom",
            background: "background-3.png",
            links: SceneLinks::new().with_previous("kitchen").with_limits(100.0, 300.0),
        },
    ]
}

fn image(store: &AssetStore, name: &str) -> Result<ImageHandle, EngineError> {
    store.image(name).cloned().ok_or_else(|| EngineError::AssetLoad {
        path: name.into(),
        reason: "not listed in the asset manifest".to_string(),
    })
}

fn sound(store: &AssetStore, name: &str) -> Result<SoundHandle, EngineError> {
    store.sound(name).cloned().ok_or_else(|| EngineError::AssetLoad {
        path: name.into(),
        reason: "not listed in the asset manifest".to_string(),
    })
}

fn walk_cycle(store: &AssetStore, prefix: &str) -> Result<Animator, EngineError> {
    let frames = (0..WALK_FRAMES)
        .map(|i| image(store, &format!("{}{}.png", prefix, i)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Animator::new(frames, WALK_TICKS_PER_FRAME))
}

/// Walking state shared by the player's handlers and the room loaders.
struct Walk {
    target_x: f32,
    idle_right: ImageHandle,
    idle_left: ImageHandle,
    walk_right: Animator,
    walk_left: Animator,
    facing_right: bool,
}

pub struct Demo {
    pub scenes: SceneManager,
    pub background: ThingId,
    pub player: ThingId,
}

pub fn setup(engine: &mut Engine, store: &AssetStore) -> Result<Demo, EngineError> {
    let step = engine.config().transition_step;
    let scenes = SceneManager::install(&mut engine.world, step)?;
    let (_, sh) = engine.surface_size();

    let background = engine.world.spawn(Spawn::default());
    engine.world.listen(
        background,
        EventType::Tick,
        Handler::new(|thing, ctx, _| {
            let (sw, sh) = ctx.surface_size();
            if let Some(image) = &thing.image
                && image.width() > 0.0
            {
                thing.scale = sw / image.width();
            }
            thing.position = Vector::xy(sw * 0.5, sh * 0.5);
        }),
    )?;

    let walk = Rc::new(RefCell::new(Walk {
        target_x: 500.0,
        idle_right: image(store, "person-r-0.png")?,
        idle_left: image(store, "person-l-0.png")?,
        walk_right: walk_cycle(store, "person-r-walking/")?,
        walk_left: walk_cycle(store, "person-l-walking/")?,
        facing_right: true,
    }));

    let player = engine.world.spawn(
        Spawn::at(500.0, sh - PLAYER_FLOOR_OFFSET)
            .with_image(walk.borrow().idle_right.clone())
            .with_scale(PLAYER_SCALE),
    );
    engine.world.set_draw_priority(player, PLAYER_PRIORITY)?;

    let ticker = (Rc::clone(&walk), scenes.clone());
    engine.world.listen(
        player,
        EventType::Tick,
        Handler::new(move |thing, ctx, _| {
            let (walk, scenes) = &ticker;
            let mut walk = walk.borrow_mut();
            let x = thing.position.x;
            if walk.target_x < x {
                thing.position.x -= PLAYER_SPEED;
            } else if walk.target_x > x {
                thing.position.x += PLAYER_SPEED;
            }
            if (walk.target_x - thing.position.x).abs() <= PLAYER_SPEED {
                thing.position.x = walk.target_x;
            }

            let (sw, sh) = ctx.surface_size();
            thing.position.y = sh - PLAYER_FLOOR_OFFSET;
            let before = thing.position.x;
            scenes.enforce_limits(&mut thing.position, sw);
            if thing.position.x != before {
                walk.target_x = thing.position.x;
            }

            if thing.anim.is_some() && walk.target_x == thing.position.x {
                thing.anim = None;
                thing.image = Some(if walk.facing_right {
                    walk.idle_right.clone()
                } else {
                    walk.idle_left.clone()
                });
            }

            ctx.debug
                .set_message(0, format!("tps {}  fps {}", ctx.time.tps, ctx.time.fps));
            ctx.debug.set_message(
                1,
                format!(
                    "{} at ({:.0}, {:.0})",
                    scenes.active_scene().unwrap_or_default(),
                    thing.position.x,
                    thing.position.y
                ),
            );
        }),
    )?;

    let pointer = Rc::clone(&walk);
    engine.world.listen(
        player,
        EventType::PointerDown,
        Handler::new(move |thing, _, event| {
            let Event::PointerDown { x, .. } = event else {
                return;
            };
            let mut walk = pointer.borrow_mut();
            walk.target_x = x.floor();
            if walk.target_x == thing.position.x {
                return;
            }
            walk.facing_right = walk.target_x > thing.position.x;
            let mut cycle = if walk.facing_right {
                walk.walk_right.clone()
            } else {
                walk.walk_left.clone()
            };
            cycle.restart();
            thing.anim = Some(cycle);
        }),
    )?;

    let door = sound(store, "door.wav")?;
    for room in rooms() {
        let backdrop = image(store, room.background)?;
        let door = door.clone();
        let limits = room.links.limits;
        let walk = Rc::clone(&walk);
        let name = room.name;
        let scene = SceneDef::new(room.links, move |ctx, from| {
            let (sw, _) = ctx.surface_size();
            if let Some(bg) = ctx.world.thing_mut(background) {
                bg.image = Some(backdrop.clone());
            }
            if let Some(p) = ctx.world.thing_mut(player) {
                p.position.x = match from {
                    Direction::FromRight => sw - limits.right,
                    Direction::FromLeft | Direction::None => limits.left,
                };
                walk.borrow_mut().target_x = p.position.x;
            }
            if from != Direction::None {
                ctx.audio.play(&door, false);
            }
            info!("Entered the {}", name);
        });
        scenes.add_scene(room.name, scene)?;
    }

    scenes.load_scene(&mut engine.offscreen_context(), "hallway", Direction::None)?;

    Ok(Demo {
        scenes,
        background,
        player,
    })
}
