//! Default physics handler.

use crate::components::thing::Thing;
use crate::events::Event;
use crate::events::context::Context;

/// Integrate one fixed step: `position += velocity`, then
/// `velocity += gravity` while `|velocity|` is below `velocity_limit`.
///
/// Gravity is suppressed at the limit, not clamped: a thing already at or
/// above its limit keeps its current velocity unchanged.
pub fn default_physics(thing: &mut Thing, _ctx: &mut Context<'_>, _event: &Event) {
    integrate(thing);
}

pub fn integrate(thing: &mut Thing) {
    if !thing.active {
        return;
    }
    let Some(velocity) = thing.velocity.as_mut() else {
        return;
    };
    thing.position += *velocity;
    let below_limit = thing
        .velocity_limit
        .is_none_or(|limit| velocity.length() < limit);
    if below_limit && let Some(gravity) = thing.gravity {
        *velocity += gravity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::thing::{Spawn, ThingId};
    use crate::components::vector::Vector;

    fn falling(velocity: Vector, gravity: Vector) -> Thing {
        let mut t = Thing::new(ThingId::from_raw(1), Spawn::at(0.0, 0.0));
        t.velocity = Some(velocity);
        t.gravity = Some(gravity);
        t
    }

    #[test]
    fn position_then_velocity_integration() {
        let mut t = falling(Vector::xy(1.0, 0.0), Vector::xy(0.0, 1.0));
        integrate(&mut t);
        assert_eq!(t.position, Vector::xy(1.0, 0.0));
        assert_eq!(t.velocity, Some(Vector::xy(1.0, 1.0)));
        integrate(&mut t);
        assert_eq!(t.position, Vector::xy(2.0, 1.0));
        assert_eq!(t.velocity, Some(Vector::xy(1.0, 2.0)));
    }

    #[test]
    fn gravity_suppressed_at_velocity_limit() {
        let mut t = falling(Vector::xy(1.0, 0.0), Vector::xy(0.0, 1.0));
        t.velocity_limit = Some(1.0);
        for step in 1..=3 {
            integrate(&mut t);
            assert_eq!(t.position, Vector::xy(step as f32, 0.0));
            assert_eq!(t.velocity, Some(Vector::xy(1.0, 0.0)));
        }
    }

    #[test]
    fn gravity_applies_below_limit() {
        let mut t = falling(Vector::xy(0.0, 0.0), Vector::xy(0.0, 2.0));
        t.velocity_limit = Some(3.0);
        integrate(&mut t);
        integrate(&mut t);
        integrate(&mut t);
        // 0 -> 2 -> 4, then held at 4
        assert_eq!(t.velocity, Some(Vector::xy(0.0, 4.0)));
    }

    #[test]
    fn no_velocity_means_no_motion() {
        let mut t = Thing::new(ThingId::from_raw(1), Spawn::at(5.0, 5.0));
        t.gravity = Some(Vector::xy(0.0, 1.0));
        integrate(&mut t);
        assert_eq!(t.position, Vector::xy(5.0, 5.0));
        assert!(t.velocity.is_none());
    }

    #[test]
    fn inactive_thing_does_not_move() {
        let mut t = falling(Vector::xy(1.0, 0.0), Vector::xy(0.0, 1.0));
        t.active = false;
        integrate(&mut t);
        assert_eq!(t.position, Vector::ZERO);
    }
}
