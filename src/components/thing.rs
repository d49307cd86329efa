//! The thing: base addressable object of the engine.
//!
//! A thing carries its own position, visual and physics state. It does not
//! own behavior; behavior comes from handlers subscribed on the
//! [`EventBus`](crate::events::bus::EventBus) under the thing's id. Things are
//! created only through [`World::spawn`](crate::resources::world::World::spawn),
//! which assigns the id and subscribes the default handlers.
//!
//! Draw priority is read here but changed only through
//! [`World::set_draw_priority`](crate::resources::world::World::set_draw_priority)
//! or [`Context::set_draw_priority`](crate::events::context::Context::set_draw_priority),
//! so the bus can re-sort its draw order.

use std::fmt;

use crate::components::animation::Animator;
use crate::components::body::Body;
use crate::components::vector::{Vector, rotation_to_vector, vector_to_rotation};
use crate::resources::assets::ImageHandle;
use crate::resources::renderer::{Align, Font};

/// Process-unique thing identifier. Ids grow monotonically and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThingId(u64);

impl ThingId {
    pub const fn from_raw(raw: u64) -> Self {
        ThingId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Initial state for a new thing.
///
/// ```
/// use squids::components::thing::Spawn;
/// let spawn = Spawn::at(100.0, 50.0).with_scale(3.0).with_opacity(0.5);
/// assert_eq!(spawn.scale, 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spawn {
    pub position: Vector,
    pub image: Option<ImageHandle>,
    pub rotation: f32,
    pub opacity: f32,
    pub scale: f32,
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            position: Vector::ZERO,
            image: None,
            rotation: 0.0,
            opacity: 1.0,
            scale: 1.0,
        }
    }
}

impl Spawn {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vector::xy(x, y),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: ImageHandle) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Thing {
    id: ThingId,
    /// Inactive things keep their subscriptions but the engine skips their
    /// handlers entirely.
    pub active: bool,
    pub position: Vector,
    pub image: Option<ImageHandle>,
    pub text: Option<String>,
    /// Font for `text`; the debug font is used when unset.
    pub font: Option<Font>,
    pub align: Align,
    /// Fraction of a full turn, clockwise from up.
    pub rotation: f32,
    pub opacity: f32,
    pub scale: f32,
    /// Rotation pivot relative to the image's top-left corner, in scaled
    /// pixels. Defaults to the image centre.
    pub pivot: Option<Vector>,
    pub velocity: Option<Vector>,
    pub gravity: Option<Vector>,
    /// Gravity stops accelerating the thing once `|velocity|` reaches this.
    pub velocity_limit: Option<f32>,
    pub body: Option<Body>,
    pub anim: Option<Animator>,
    priority: i32,
    destroyed: bool,
}

impl Thing {
    pub(crate) fn new(id: ThingId, spawn: Spawn) -> Self {
        Self {
            id,
            active: true,
            position: spawn.position,
            image: spawn.image,
            text: None,
            font: None,
            align: Align::Center,
            rotation: spawn.rotation,
            opacity: spawn.opacity,
            scale: spawn.scale,
            pivot: None,
            velocity: None,
            gravity: None,
            velocity_limit: None,
            body: None,
            anim: None,
            priority: 0,
            destroyed: false,
        }
    }

    pub fn id(&self) -> ThingId {
        self.id
    }

    /// Current draw priority; lower draws first.
    pub fn draw_priority(&self) -> i32 {
        self.priority
    }

    pub(crate) fn store_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn mark_destroyed(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }

    /// Explicit body, or a rectangle the size of the image (0x0 without one).
    pub fn get_body(&self) -> Body {
        self.body.unwrap_or_else(|| match &self.image {
            Some(image) => Body::rect(image.width(), image.height()),
            None => Body::rect(0.0, 0.0),
        })
    }

    /// Turn to face `other`.
    pub fn rotate_to(&mut self, other: &Thing) {
        self.face(other.position);
    }

    /// Turn to face a point.
    pub fn face(&mut self, point: Vector) {
        self.rotation = vector_to_rotation(self.position, point);
    }

    /// Accelerate along the current heading.
    pub fn thrust(&mut self, amount: f32) {
        let push = rotation_to_vector(self.rotation) * amount;
        *self.velocity.get_or_insert(Vector::ZERO) += push;
    }
}
