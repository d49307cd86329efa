//! The world: live-thing registry plus the event bus.
//!
//! One `World` value owns every live [`Thing`] and every subscription, and
//! hands out ids from its own monotonically increasing counter. All access
//! is single-threaded; the scheduler passes `&mut World` into each dispatch
//! through the [`Context`](crate::events::context::Context).
//!
//! While a handler runs, its thing is taken out of the registry and handed to
//! the handler by `&mut`. During that window `thing(id)` does not see it, and
//! `destroy(id)` defers the removal until the handler returns.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::thing::{Spawn, Thing, ThingId};
use crate::error::EngineError;
use crate::events::bus::{EventBus, Handler};
use crate::events::context::Context;
use crate::events::{Event, EventType};
use crate::systems::{animation, physics, render};

#[derive(Debug)]
pub struct World {
    things: FxHashMap<ThingId, Thing>,
    bus: EventBus,
    next_id: u64,
    /// Things currently lent to a running handler.
    in_flight: FxHashSet<ThingId>,
    /// In-flight things destroyed by someone else; dropped on return.
    doomed: FxHashSet<ThingId>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            things: FxHashMap::default(),
            bus: EventBus::new(),
            next_id: 1,
            in_flight: FxHashSet::default(),
            doomed: FxHashSet::default(),
        }
    }

    /// Create a thing, register it, and subscribe the default physics, tick,
    /// animate and draw handlers.
    pub fn spawn(&mut self, spawn: Spawn) -> ThingId {
        let id = ThingId::from_raw(self.next_id);
        self.next_id += 1;
        let thing = Thing::new(id, spawn);
        self.bus.subscribe(EventType::Physics, &thing, Handler::new(physics::default_physics));
        self.bus.subscribe(EventType::Tick, &thing, Handler::new(default_tick));
        self.bus.subscribe(EventType::Animate, &thing, Handler::new(animation::default_animate));
        self.bus.subscribe(EventType::Draw, &thing, Handler::new(render::default_draw));
        self.things.insert(id, thing);
        debug!("Spawned thing {}", id);
        id
    }

    pub fn thing(&self, id: ThingId) -> Option<&Thing> {
        self.things.get(&id)
    }

    pub fn thing_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.get_mut(&id)
    }

    /// Whether `id` is live, including while lent to a running handler.
    pub fn contains(&self, id: ThingId) -> bool {
        self.things.contains_key(&id) || (self.in_flight.contains(&id) && !self.doomed.contains(&id))
    }

    /// Number of things resting in the registry.
    pub fn len(&self) -> usize {
        self.things.len()
    }

    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    /// Ids resting in the registry, ascending.
    pub fn ids(&self) -> Vec<ThingId> {
        let mut ids: Vec<ThingId> = self.things.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn things(&self) -> impl Iterator<Item = &Thing> {
        self.things.values()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Subscribe a resting thing; replaces its previous handler for `event`.
    pub fn listen(
        &mut self,
        id: ThingId,
        event: EventType,
        handler: Handler,
    ) -> Result<Option<Handler>, EngineError> {
        let thing = self.things.get(&id).ok_or(EngineError::UnknownThing(id))?;
        Ok(self.bus.subscribe(event, thing, handler))
    }

    /// [`listen`](Self::listen) by event-type name.
    pub fn listen_named(
        &mut self,
        id: ThingId,
        name: &str,
        handler: Handler,
    ) -> Result<Option<Handler>, EngineError> {
        let event: EventType = name.parse()?;
        self.listen(id, event, handler)
    }

    pub fn ignore(&mut self, id: ThingId, event: EventType) -> bool {
        self.bus.unsubscribe(event, id)
    }

    /// Floor `priority`, store it on the thing, and re-sort the draw order.
    pub fn set_draw_priority(&mut self, id: ThingId, priority: f32) -> Result<(), EngineError> {
        let thing = self.things.get_mut(&id).ok_or(EngineError::UnknownThing(id))?;
        let priority = priority.floor() as i32;
        thing.store_priority(priority);
        self.bus.set_priority(id, priority);
        Ok(())
    }

    /// Unsubscribe `id` everywhere and drop it. Returns `false` if it was
    /// already gone, so destroying twice is harmless.
    pub fn destroy(&mut self, id: ThingId) -> bool {
        self.bus.unsubscribe_all(id);
        if let Some(mut thing) = self.things.remove(&id) {
            thing.mark_destroyed();
            debug!("Destroyed thing {}", id);
            true
        } else if self.in_flight.contains(&id) {
            self.doomed.insert(id)
        } else {
            false
        }
    }

    /// Destroy every live thing.
    pub fn destroy_all(&mut self) {
        let ids: Vec<ThingId> = self
            .things
            .keys()
            .chain(self.in_flight.iter())
            .copied()
            .collect();
        for id in ids {
            self.destroy(id);
        }
        self.bus.clear();
    }

    /// Lend a thing out for dispatch.
    pub(crate) fn take(&mut self, id: ThingId) -> Option<Thing> {
        let thing = self.things.remove(&id)?;
        self.in_flight.insert(id);
        Some(thing)
    }

    /// Put a lent thing back, unless it was destroyed meanwhile.
    pub(crate) fn restore(&mut self, thing: Thing) {
        let id = thing.id();
        self.in_flight.remove(&id);
        if self.doomed.remove(&id) || thing.is_destroyed() {
            debug!("Dropped thing {} destroyed during dispatch", id);
            return;
        }
        self.things.insert(id, thing);
    }
}

/// Default tick: nothing. Games override it per thing.
fn default_tick(_thing: &mut Thing, _ctx: &mut Context<'_>, _event: &Event) {}
