//! Engine integration tests: draw order, lifecycle, physics, collision,
//! warm-up gating and input, driven headless through the public API.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use squids::components::body::Body;
use squids::components::thing::{Spawn, ThingId};
use squids::components::vector::{Vector, rotation_to_vector, vector_to_rotation};
use squids::engine::Engine;
use squids::events::bus::Handler;
use squids::events::input::InputEvent;
use squids::events::{Event, EventType};
use squids::resources::assets::ImageHandle;
use squids::resources::clock::ManualClock;
use squids::resources::gameconfig::EngineConfig;
use squids::resources::renderer::RecordingRenderer;

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_engine(splash_ticks: u32) -> (Engine, ManualClock) {
    let clock = ManualClock::new();
    let mut config = EngineConfig::new();
    config.splash_ticks = splash_ticks;
    (Engine::with_clock(config, Box::new(clock.clone())), clock)
}

fn spawn_sprite(engine: &mut Engine, key: &str) -> ThingId {
    engine
        .world
        .spawn(Spawn::at(10.0, 10.0).with_image(ImageHandle::new(key, 4.0, 4.0)))
}

fn drawn_keys(engine: &mut Engine) -> Vec<String> {
    let mut r = RecordingRenderer::new(320.0, 240.0);
    engine.render(&mut r);
    r.image_keys().into_iter().map(str::to_string).collect()
}

fn recorder(log: &Rc<RefCell<Vec<ThingId>>>) -> Handler {
    let log = Rc::clone(log);
    Handler::new(move |thing, _, _| log.borrow_mut().push(thing.id()))
}

// =============================================================================
// Draw order
// =============================================================================

#[test]
fn lower_priority_draws_first_regardless_of_subscription_order() {
    let (mut engine, _) = make_engine(0);
    let a = spawn_sprite(&mut engine, "a");
    let b = spawn_sprite(&mut engine, "b");
    let c = spawn_sprite(&mut engine, "c");
    engine.world.set_draw_priority(a, 5.0).unwrap();
    engine.world.set_draw_priority(b, -1.0).unwrap();
    engine.world.set_draw_priority(c, 3.0).unwrap();
    assert_eq!(drawn_keys(&mut engine), ["b", "c", "a"]);
}

#[test]
fn equal_priorities_draw_in_spawn_order() {
    let (mut engine, _) = make_engine(0);
    for key in ["x", "y", "z"] {
        spawn_sprite(&mut engine, key);
    }
    assert_eq!(drawn_keys(&mut engine), ["x", "y", "z"]);
}

#[test]
fn priority_change_applies_to_the_very_next_draw() {
    let (mut engine, _) = make_engine(0);
    let a = spawn_sprite(&mut engine, "a");
    spawn_sprite(&mut engine, "b");
    assert_eq!(drawn_keys(&mut engine), ["a", "b"]);
    engine.world.set_draw_priority(a, 1.0).unwrap();
    assert_eq!(drawn_keys(&mut engine), ["b", "a"]);
}

#[test]
fn priority_change_inside_a_tick_reorders_the_same_frame() {
    let (mut engine, _) = make_engine(0);
    let a = spawn_sprite(&mut engine, "a");
    spawn_sprite(&mut engine, "b");
    engine
        .world
        .listen(a, EventType::Tick, Handler::new(|thing, ctx, _| ctx.set_draw_priority(thing, 2.0)))
        .unwrap();
    engine.update();
    assert_eq!(drawn_keys(&mut engine), ["b", "a"]);
}

#[test]
fn thing_spawned_during_draw_waits_for_the_next_frame() {
    let (mut engine, _) = make_engine(0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let spawner = engine.world.spawn(Spawn::default());
    let spawned = Rc::new(RefCell::new(None));
    let (sink, log2) = (Rc::clone(&spawned), Rc::clone(&log));
    engine
        .world
        .listen(spawner, EventType::Draw, Handler::new(move |thing, ctx, _| {
            log2.borrow_mut().push(thing.id());
            if sink.borrow().is_none() {
                let id = ctx.spawn(Spawn::default());
                let child = ctx.world.thing(id).cloned();
                if let Some(child) = child {
                    ctx.listen(&child, EventType::Draw, recorder(&log2));
                }
                *sink.borrow_mut() = Some(id);
            }
        }))
        .unwrap();

    drawn_keys(&mut engine);
    assert_eq!(*log.borrow(), vec![spawner]);
    let child = spawned.borrow().unwrap();
    drawn_keys(&mut engine);
    assert_eq!(*log.borrow(), vec![spawner, spawner, child]);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn inactive_thing_keeps_subscriptions_and_resumes() {
    let (mut engine, _) = make_engine(0);
    let id = spawn_sprite(&mut engine, "ghost");
    {
        let t = engine.world.thing_mut(id).unwrap();
        t.velocity = Some(Vector::xy(1.0, 0.0));
        t.active = false;
    }
    engine.update();
    assert_eq!(engine.world.thing(id).unwrap().position, Vector::xy(10.0, 10.0));
    assert!(drawn_keys(&mut engine).is_empty());
    for event in EventType::DEFAULTS {
        assert!(engine.world.bus().is_subscribed(event, id));
    }

    engine.world.thing_mut(id).unwrap().active = true;
    engine.update();
    assert_eq!(engine.world.thing(id).unwrap().position, Vector::xy(11.0, 10.0));
    assert_eq!(drawn_keys(&mut engine), ["ghost"]);
}

#[test]
fn destroyed_thing_leaves_every_default_event() {
    let (mut engine, _) = make_engine(0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let id = spawn_sprite(&mut engine, "gone");
    engine.world.listen(id, EventType::Tick, recorder(&log)).unwrap();
    assert!(engine.world.destroy(id));
    assert!(!engine.world.destroy(id));
    for event in EventType::DEFAULTS {
        assert!(!engine.world.bus().is_subscribed(event, id));
    }
    engine.update();
    assert!(log.borrow().is_empty());
    assert!(drawn_keys(&mut engine).is_empty());
}

// =============================================================================
// Geometry and physics
// =============================================================================

#[test]
fn heading_round_trip_is_parallel_unit_vector() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..500 {
        let origin = Vector::xy(rng.f32() * 200.0 - 100.0, rng.f32() * 200.0 - 100.0);
        let d = Vector::xy(rng.f32() * 20.0 - 10.0, rng.f32() * 20.0 - 10.0);
        if d.length() < 1e-3 {
            continue;
        }
        let mut target = origin;
        target.add(d);
        let r = vector_to_rotation(origin, target);
        assert!((0.0..1.0).contains(&r));
        let u = rotation_to_vector(r);
        assert!((u.length() - 1.0).abs() < 1e-4);
        let len = d.length();
        assert!((u.x - d.x / len).abs() < 1e-3, "{:?} vs {:?}", u, d);
        assert!((u.y - d.y / len).abs() < 1e-3, "{:?} vs {:?}", u, d);
    }
}

#[test]
fn physics_integrates_velocity_then_gravity() {
    let (mut engine, _) = make_engine(0);
    let id = engine.world.spawn(Spawn::default());
    {
        let t = engine.world.thing_mut(id).unwrap();
        t.velocity = Some(Vector::xy(1.0, 0.0));
        t.gravity = Some(Vector::xy(0.0, 1.0));
    }
    engine.update();
    let t = engine.world.thing(id).unwrap();
    assert_eq!(t.position, Vector::xy(1.0, 0.0));
    assert_eq!(t.velocity, Some(Vector::xy(1.0, 1.0)));
    engine.update();
    let t = engine.world.thing(id).unwrap();
    assert_eq!(t.position, Vector::xy(2.0, 1.0));
    assert_eq!(t.velocity, Some(Vector::xy(1.0, 2.0)));
}

#[test]
fn velocity_limit_stops_gravity() {
    let (mut engine, _) = make_engine(0);
    let id = engine.world.spawn(Spawn::default());
    {
        let t = engine.world.thing_mut(id).unwrap();
        t.velocity = Some(Vector::xy(1.0, 0.0));
        t.gravity = Some(Vector::xy(0.0, 1.0));
        t.velocity_limit = Some(1.0);
    }
    for step in 1..=5 {
        engine.update();
        let t = engine.world.thing(id).unwrap();
        assert_eq!(t.velocity, Some(Vector::xy(1.0, 0.0)));
        assert!(approx_eq(t.position.x, step as f32));
        assert!(approx_eq(t.position.y, 0.0));
    }
}

// =============================================================================
// Collision
// =============================================================================

fn collide_pair(distance: f32) -> Vec<(ThingId, ThingId)> {
    let (mut engine, _) = make_engine(0);
    let hits = Rc::new(RefCell::new(Vec::new()));
    for x in [0.0, distance] {
        let id = engine.world.spawn(Spawn::at(x, 0.0));
        engine.world.thing_mut(id).unwrap().body = Some(Body::circle(5.0));
        let hits = Rc::clone(&hits);
        engine
            .world
            .listen(id, EventType::Collide, Handler::new(move |thing, _, event| {
                if let Event::Collide { other } = event {
                    hits.borrow_mut().push((thing.id(), *other));
                }
            }))
            .unwrap();
    }
    engine.update();
    let out = hits.borrow().clone();
    out
}

#[test]
fn circles_nine_apart_collide_both_ways() {
    let hits = collide_pair(9.0);
    assert_eq!(hits.len(), 2);
    let (a, b) = hits[0];
    assert_eq!(hits[1], (b, a));
}

#[test]
fn circles_eleven_apart_do_not_collide() {
    assert!(collide_pair(11.0).is_empty());
}

#[test]
fn collision_runs_between_physics_and_tick() {
    let (mut engine, _) = make_engine(0);
    let order = Rc::new(RefCell::new(Vec::new()));
    let id = engine.world.spawn(Spawn::at(0.0, 0.0));
    let other = engine.world.spawn(Spawn::at(20.0, 0.0));
    for thing in [id, other] {
        engine.world.thing_mut(thing).unwrap().body = Some(Body::circle(5.0));
        let order = Rc::clone(&order);
        engine
            .world
            .listen(thing, EventType::Collide, Handler::new(move |_, _, e| order.borrow_mut().push(e.kind())))
            .unwrap();
    }
    // Physics moves the first thing into range before the pass.
    engine.world.thing_mut(id).unwrap().velocity = Some(Vector::xy(12.0, 0.0));
    let tick_order = Rc::clone(&order);
    engine
        .world
        .listen(id, EventType::Tick, Handler::new(move |_, _, e| tick_order.borrow_mut().push(e.kind())))
        .unwrap();
    engine.update();
    assert_eq!(
        *order.borrow(),
        vec![EventType::Collide, EventType::Collide, EventType::Tick]
    );
}

// =============================================================================
// Warm-up and input
// =============================================================================

#[test]
fn nothing_reaches_things_during_warmup() {
    let (mut engine, clock) = make_engine(300);
    let log = Rc::new(RefCell::new(Vec::new()));
    let id = spawn_sprite(&mut engine, "early");
    engine.world.listen(id, EventType::Tick, recorder(&log)).unwrap();
    for _ in 0..299 {
        clock.advance(Duration::from_millis(10));
        assert!(!engine.update());
        assert!(drawn_keys(&mut engine).is_empty());
    }
    assert!(log.borrow().is_empty());
    assert!(!engine.update());
    assert!(engine.is_running());
    assert!(engine.update());
    assert_eq!(*log.borrow(), vec![id]);
    assert_eq!(drawn_keys(&mut engine), ["early"]);
}

#[test]
fn pointer_events_reach_subscribers_with_coordinates() {
    let (mut engine, _) = make_engine(0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let id = engine.world.spawn(Spawn::default());
    let sink = Rc::clone(&seen);
    engine
        .world
        .listen_named(id, "pointerdown", Handler::new(move |_, _, e| {
            if let Event::PointerDown { x, y } = e {
                sink.borrow_mut().push((*x, *y));
            }
        }))
        .unwrap();
    assert_eq!(engine.handle_input(InputEvent::PointerDown { x: 3.0, y: 4.0 }), vec![id]);
    assert_eq!(*seen.borrow(), vec![(3.0, 4.0)]);
    assert_eq!(engine.input.pointer(), Vector::xy(3.0, 4.0));
}

#[test]
fn debug_chord_toggles_debug_mode() {
    let (mut engine, _) = make_engine(0);
    assert!(!engine.debug.is_enabled());
    engine.handle_input(InputEvent::KeyDown {
        key: "`".into(),
        ctrl: true,
    });
    assert!(engine.debug.is_enabled());
    engine.handle_input(InputEvent::key_down("`"));
    assert!(engine.debug.is_enabled());
}

#[test]
fn space_key_is_published_as_space() {
    let (mut engine, _) = make_engine(0);
    let keys = Rc::new(RefCell::new(Vec::new()));
    let id = engine.world.spawn(Spawn::default());
    let sink = Rc::clone(&keys);
    engine
        .world
        .listen(id, EventType::KeyDown, Handler::new(move |_, ctx, e| {
            if let Event::KeyDown { key } = e {
                sink.borrow_mut().push((key.clone(), ctx.input.is_held(key)));
            }
        }))
        .unwrap();
    engine.handle_input(InputEvent::key_down(" "));
    assert_eq!(*keys.borrow(), vec![("space".to_string(), true)]);
}
