//! Shape intersection tests and the per-tick collision pass.
//!
//! Bodies are centred on their thing's position and scaled by its `scale`.
//! Touching shapes (distance exactly equal to the sum of extents) do not
//! collide.
//!
//! The pass ([`collision_pass`]) only considers things subscribed to
//! [`EventType::Collide`]. Every interested thing is tested against every
//! other one, so each overlapping pair produces two deliveries, one per
//! ordered pair. The cost is quadratic in the number of interested things.

use log::trace;

use crate::components::body::Body;
use crate::components::thing::{Thing, ThingId};
use crate::components::vector::Vector;
use crate::events::context::Context;
use crate::events::{Event, EventType};

/// Circle vs circle: squared centre distance below the squared sum of radii.
pub fn collide_circle_circle(p1: Vector, r1: f32, p2: Vector, r2: f32) -> bool {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let rr = r1 + r2;
    dx * dx + dy * dy < rr * rr
}

/// Centred rectangle vs circle, separating-axis style.
pub fn collide_rect_circle(rect_pos: Vector, width: f32, height: f32, circle_pos: Vector, radius: f32) -> bool {
    let hw = width * 0.5;
    let hh = height * 0.5;
    if circle_pos.x + radius <= rect_pos.x - hw || circle_pos.x - radius >= rect_pos.x + hw {
        return false;
    }
    if circle_pos.y + radius <= rect_pos.y - hh || circle_pos.y - radius >= rect_pos.y + hh {
        return false;
    }
    true
}

/// Centred rectangle vs centred rectangle.
pub fn collide_rect_rect(p1: Vector, w1: f32, h1: f32, p2: Vector, w2: f32, h2: f32) -> bool {
    (p2.x - p1.x).abs() < (w1 + w2) * 0.5 && (p2.y - p1.y).abs() < (h1 + h2) * 0.5
}

/// Test two scaled bodies at the given positions.
pub fn collide_bodies(p1: Vector, b1: Body, s1: f32, p2: Vector, b2: Body, s2: f32) -> bool {
    match (b1, b2) {
        (Body::Circle { radius: r1 }, Body::Circle { radius: r2 }) => {
            collide_circle_circle(p1, r1 * s1, p2, r2 * s2)
        }
        (Body::Rect { width, height }, Body::Circle { radius }) => {
            collide_rect_circle(p1, width * s1, height * s1, p2, radius * s2)
        }
        (Body::Circle { radius }, Body::Rect { width, height }) => {
            collide_rect_circle(p2, width * s2, height * s2, p1, radius * s1)
        }
        (Body::Rect { width: w1, height: h1 }, Body::Rect { width: w2, height: h2 }) => {
            collide_rect_rect(p1, w1 * s1, h1 * s1, p2, w2 * s2, h2 * s2)
        }
    }
}

/// Whether two things' explicit bodies overlap. A thing without a body never
/// collides.
pub fn collide_things(a: &Thing, b: &Thing) -> bool {
    match (a.body, b.body) {
        (Some(ba), Some(bb)) => collide_bodies(a.position, ba, a.scale, b.position, bb, b.scale),
        _ => false,
    }
}

/// Probe a point against a thing's body (explicit, or derived from its
/// image), as a circle of radius 1.
pub fn collide_point(point: Vector, thing: &Thing) -> bool {
    collide_bodies(point, Body::circle(1.0), 1.0, thing.position, thing.get_body(), thing.scale)
}

/// Overlapping ordered pairs among active `Collide` subscribers, computed
/// before any handler runs.
pub fn find_collisions(ctx: &Context<'_>) -> Vec<(ThingId, ThingId)> {
    let interested: Vec<&Thing> = ctx
        .world
        .bus()
        .subscriber_ids(EventType::Collide)
        .into_iter()
        .filter_map(|id| ctx.world.thing(id))
        .filter(|t| t.active && t.body.is_some())
        .collect();
    let mut pairs = Vec::new();
    for a in &interested {
        for b in &interested {
            if a.id() != b.id() && collide_things(a, b) {
                pairs.push((a.id(), b.id()));
            }
        }
    }
    pairs
}

/// Deliver `Collide { other }` to each interested thing once per overlapping
/// partner. Returns the number of deliveries.
pub fn collision_pass(ctx: &mut Context<'_>) -> usize {
    let pairs = find_collisions(ctx);
    let mut delivered = 0;
    for (a, b) in pairs {
        trace!("Collision {} -> {}", a, b);
        if ctx.publish_to(a, &Event::Collide { other: b }) {
            delivered += 1;
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::thing::Spawn;

    fn at(x: f32, y: f32) -> Vector {
        Vector::xy(x, y)
    }

    fn thing(x: f32, y: f32, body: Option<Body>) -> Thing {
        let mut t = Thing::new(ThingId::from_raw(1), Spawn::at(x, y));
        t.body = body;
        t
    }

    #[test]
    fn circles_nine_apart_collide_eleven_apart_do_not() {
        let a = thing(0.0, 0.0, Some(Body::circle(5.0)));
        assert!(collide_things(&a, &thing(9.0, 0.0, Some(Body::circle(5.0)))));
        assert!(!collide_things(&a, &thing(11.0, 0.0, Some(Body::circle(5.0)))));
    }

    #[test]
    fn touching_circles_do_not_collide() {
        assert!(!collide_circle_circle(at(0.0, 0.0), 5.0, at(10.0, 0.0), 5.0));
    }

    #[test]
    fn scale_grows_the_body() {
        let mut a = thing(0.0, 0.0, Some(Body::circle(5.0)));
        let b = thing(15.0, 0.0, Some(Body::circle(5.0)));
        assert!(!collide_things(&a, &b));
        a.scale = 2.0;
        assert!(collide_things(&a, &b));
    }

    #[test]
    fn rect_circle_is_symmetric() {
        let rect = thing(0.0, 0.0, Some(Body::rect(10.0, 4.0)));
        let near = thing(7.0, 0.0, Some(Body::circle(3.0)));
        let far = thing(0.0, 6.0, Some(Body::circle(3.0)));
        assert!(collide_things(&rect, &near));
        assert!(collide_things(&near, &rect));
        assert!(!collide_things(&rect, &far));
        assert!(!collide_things(&far, &rect));
    }

    #[test]
    fn rect_rect_needs_overlap_on_both_axes() {
        assert!(collide_rect_rect(at(0.0, 0.0), 10.0, 10.0, at(9.0, 9.0), 10.0, 10.0));
        assert!(!collide_rect_rect(at(0.0, 0.0), 10.0, 10.0, at(9.0, 11.0), 10.0, 10.0));
        assert!(!collide_rect_rect(at(0.0, 0.0), 10.0, 10.0, at(11.0, 0.0), 10.0, 10.0));
    }

    #[test]
    fn missing_body_never_collides() {
        let a = thing(0.0, 0.0, None);
        let b = thing(0.0, 0.0, Some(Body::circle(5.0)));
        assert!(!collide_things(&a, &b));
        assert!(!collide_things(&b, &a));
    }

    #[test]
    fn point_probe_uses_image_rect_without_body() {
        let mut t = thing(50.0, 50.0, None);
        assert!(!collide_point(at(52.0, 50.0), &t));
        t.image = Some(crate::resources::assets::ImageHandle::new("box", 10.0, 10.0));
        assert!(collide_point(at(52.0, 50.0), &t));
        assert!(!collide_point(at(60.0, 50.0), &t));
    }
}
