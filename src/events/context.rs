//! Dispatch context handed to every handler.
//!
//! A [`Context`] borrows the world and the collaborators for the duration of
//! one scheduler step. Handlers use it to reach other things, publish nested
//! events, spawn or destroy things, issue draw calls and play sounds.
//!
//! # Dispatch semantics
//!
//! [`Context::publish`] snapshots the subscriber ids (in draw order for
//! `Draw`, ascending id otherwise) when it starts. Then, per id:
//! - things subscribed after the snapshot are not visited in this pass;
//! - things unsubscribed or destroyed before their turn are skipped;
//! - a handler replaced before its turn runs in its replaced form;
//! - inactive things are skipped without calling the handler.

use crate::components::thing::{Spawn, Thing, ThingId};
use crate::events::bus::Handler;
use crate::events::{Event, EventType};
use crate::resources::audio::AudioPlayer;
use crate::resources::debugmode::DebugMode;
use crate::resources::input::InputState;
use crate::resources::renderer::Renderer;
use crate::resources::world::World;
use crate::resources::worldtime::WorldTime;

pub struct Context<'a> {
    pub world: &'a mut World,
    pub renderer: &'a mut dyn Renderer,
    pub audio: &'a mut dyn AudioPlayer,
    pub debug: &'a mut DebugMode,
    pub input: &'a InputState,
    pub time: WorldTime,
}

impl<'a> Context<'a> {
    pub fn new(
        world: &'a mut World,
        renderer: &'a mut dyn Renderer,
        audio: &'a mut dyn AudioPlayer,
        debug: &'a mut DebugMode,
        input: &'a InputState,
        time: WorldTime,
    ) -> Self {
        Self {
            world,
            renderer,
            audio,
            debug,
            input,
            time,
        }
    }

    /// Dispatch `event` to its subscribers. Returns the ids in the snapshot,
    /// in dispatch order.
    pub fn publish(&mut self, event: &Event) -> Vec<ThingId> {
        let kind = event.kind();
        let visited = self.world.bus().subscriber_ids(kind);
        for &id in &visited {
            if let Some(handler) = self.world.bus().handler(kind, id) {
                self.dispatch(id, &handler, event);
            }
        }
        visited
    }

    /// Deliver `event` to one subscriber of its type, bypassing the others.
    /// Returns whether a handler ran.
    pub fn publish_to(&mut self, id: ThingId, event: &Event) -> bool {
        match self.world.bus().handler(event.kind(), id) {
            Some(handler) => self.dispatch(id, &handler, event),
            None => false,
        }
    }

    fn dispatch(&mut self, id: ThingId, handler: &Handler, event: &Event) -> bool {
        let Some(mut thing) = self.world.take(id) else {
            return false;
        };
        let ran = thing.active && handler.call(&mut thing, self, event);
        self.world.restore(thing);
        ran
    }

    pub fn surface_size(&self) -> (f32, f32) {
        self.renderer.surface_size()
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.is_enabled()
    }

    pub fn spawn(&mut self, spawn: Spawn) -> ThingId {
        self.world.spawn(spawn)
    }

    /// Subscribe `thing`, which may be the one currently running.
    pub fn listen(&mut self, thing: &Thing, event: EventType, handler: Handler) -> Option<Handler> {
        self.world.bus_mut().subscribe(event, thing, handler)
    }

    pub fn ignore(&mut self, thing: &Thing, event: EventType) -> bool {
        self.world.bus_mut().unsubscribe(event, thing.id())
    }

    /// Floor `priority`, store it on `thing`, and re-sort the draw order.
    pub fn set_draw_priority(&mut self, thing: &mut Thing, priority: f32) {
        let priority = priority.floor() as i32;
        thing.store_priority(priority);
        self.world.bus_mut().set_priority(thing.id(), priority);
    }

    /// Destroy `thing`, typically the one currently running. It is dropped
    /// when its handler returns. Returns `false` if it was already destroyed.
    pub fn destroy(&mut self, thing: &mut Thing) -> bool {
        self.world.bus_mut().unsubscribe_all(thing.id());
        thing.mark_destroyed()
    }
}
