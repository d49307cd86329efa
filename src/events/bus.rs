//! Per-event-type subscriber registry.
//!
//! Each event type maps thing ids to one [`Handler`]. Subscribing again under
//! the same `(event type, thing)` pair replaces the previous handler (last
//! write wins), which is how things override the default handlers.
//!
//! Draw subscribers are additionally kept in `draw_order`, sorted by ascending
//! draw priority with ties broken by ascending id. The order is rebuilt
//! whenever a draw subscription is added or removed or a subscriber's
//! priority changes, never lazily at publish time.
//!
//! The bus does not dispatch by itself; see
//! [`Context::publish`](crate::events::context::Context::publish).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use log::warn;
use rustc_hash::FxHashMap;

use crate::components::thing::{Thing, ThingId};
use crate::error::EngineError;
use crate::events::context::Context;
use crate::events::{Event, EventType};

pub type HandlerFn = dyn FnMut(&mut Thing, &mut Context<'_>, &Event);

/// Shared handler closure. The subscribed thing is passed explicitly as the
/// first argument.
#[derive(Clone)]
pub struct Handler(Rc<RefCell<HandlerFn>>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&mut Thing, &mut Context<'_>, &Event) + 'static,
    {
        Handler(Rc::new(RefCell::new(f)))
    }

    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Run the handler. A handler that is already running further up the
    /// stack is skipped rather than re-entered.
    pub(crate) fn call(&self, thing: &mut Thing, ctx: &mut Context<'_>, event: &Event) -> bool {
        match self.0.try_borrow_mut() {
            Ok(mut f) => {
                (&mut *f)(thing, ctx, event);
                true
            }
            Err(_) => {
                warn!(
                    "Handler of thing {} is already running; skipping nested '{}'",
                    thing.id(),
                    event.kind()
                );
                false
            }
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

#[derive(Debug)]
pub struct EventBus {
    subscribers: FxHashMap<EventType, BTreeMap<ThingId, Handler>>,
    /// Priorities of draw subscribers, as of their last subscribe/update.
    priorities: FxHashMap<ThingId, i32>,
    draw_order: Vec<ThingId>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Bus with every type of the closed set pre-declared.
    pub fn new() -> Self {
        let subscribers = EventType::ALL
            .into_iter()
            .map(|t| (t, BTreeMap::new()))
            .collect();
        Self {
            subscribers,
            priorities: FxHashMap::default(),
            draw_order: Vec::new(),
        }
    }

    /// Subscribe `thing` to `event`, replacing any handler it already had for
    /// that type. Returns the replaced handler.
    pub fn subscribe(&mut self, event: EventType, thing: &Thing, handler: Handler) -> Option<Handler> {
        let previous = self
            .subscribers
            .entry(event)
            .or_default()
            .insert(thing.id(), handler);
        if event == EventType::Draw {
            self.priorities.insert(thing.id(), thing.draw_priority());
            self.sort_for_draw();
        }
        previous
    }

    /// [`subscribe`](Self::subscribe) by event-type name. Names outside the
    /// closed set are rejected.
    pub fn subscribe_named(
        &mut self,
        name: &str,
        thing: &Thing,
        handler: Handler,
    ) -> Result<Option<Handler>, EngineError> {
        let event: EventType = name.parse()?;
        Ok(self.subscribe(event, thing, handler))
    }

    pub fn unsubscribe(&mut self, event: EventType, id: ThingId) -> bool {
        let removed = self
            .subscribers
            .get_mut(&event)
            .and_then(|subs| subs.remove(&id))
            .is_some();
        if removed && event == EventType::Draw {
            self.priorities.remove(&id);
            self.sort_for_draw();
        }
        removed
    }

    /// Remove `id` from every event type. Returns how many subscriptions went.
    pub fn unsubscribe_all(&mut self, id: ThingId) -> usize {
        let mut removed = 0;
        for subs in self.subscribers.values_mut() {
            if subs.remove(&id).is_some() {
                removed += 1;
            }
        }
        if self.priorities.remove(&id).is_some() {
            self.sort_for_draw();
        }
        removed
    }

    /// Record a new draw priority and re-sort. No-op for things that are not
    /// draw subscribers.
    pub fn set_priority(&mut self, id: ThingId, priority: i32) {
        if let Some(current) = self.priorities.get_mut(&id)
            && *current != priority
        {
            *current = priority;
            self.sort_for_draw();
        }
    }

    pub fn handler(&self, event: EventType, id: ThingId) -> Option<Handler> {
        self.subscribers.get(&event)?.get(&id).cloned()
    }

    pub fn is_subscribed(&self, event: EventType, id: ThingId) -> bool {
        self.subscribers
            .get(&event)
            .is_some_and(|subs| subs.contains_key(&id))
    }

    /// Subscriber ids in dispatch order: draw order for `Draw`, ascending id
    /// otherwise.
    pub fn subscriber_ids(&self, event: EventType) -> Vec<ThingId> {
        if event == EventType::Draw {
            return self.draw_order.clone();
        }
        self.subscribers
            .get(&event)
            .map(|subs| subs.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Subscriber ids for an event-type name; empty for unknown names.
    pub fn subscriber_ids_named(&self, name: &str) -> Vec<ThingId> {
        EventType::lookup(name)
            .map(|event| self.subscriber_ids(event))
            .unwrap_or_default()
    }

    pub fn draw_order(&self) -> &[ThingId] {
        &self.draw_order
    }

    pub fn len(&self, event: EventType) -> usize {
        self.subscribers.get(&event).map_or(0, BTreeMap::len)
    }

    pub fn clear(&mut self) {
        for subs in self.subscribers.values_mut() {
            subs.clear();
        }
        self.priorities.clear();
        self.draw_order.clear();
    }

    fn sort_for_draw(&mut self) {
        let mut order: Vec<ThingId> = self
            .subscribers
            .get(&EventType::Draw)
            .map(|subs| subs.keys().copied().collect())
            .unwrap_or_default();
        // stable: equal priorities keep ascending id order
        order.sort_by_key(|id| self.priorities.get(id).copied().unwrap_or(0));
        self.draw_order = order;
    }
}
