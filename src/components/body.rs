//! Collision body attached to a thing.
//!
//! Extents are in unscaled pixels; collision tests multiply them by the
//! owning thing's `scale`. A rectangle is centred on the thing's position.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Body {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

impl Body {
    pub fn circle(radius: f32) -> Self {
        Body::Circle { radius }
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Body::Rect { width, height }
    }

    /// Axis-aligned size of the body at the given scale.
    pub fn extents(&self, scale: f32) -> (f32, f32) {
        match *self {
            Body::Circle { radius } => (radius * 2.0 * scale, radius * 2.0 * scale),
            Body::Rect { width, height } => (width * scale, height * scale),
        }
    }
}
