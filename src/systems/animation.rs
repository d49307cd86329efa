//! Default animate handler.

use crate::components::thing::Thing;
use crate::events::Event;
use crate::events::context::Context;

/// Replace the thing's image with its animator's next frame.
pub fn default_animate(thing: &mut Thing, _ctx: &mut Context<'_>, _event: &Event) {
    if !thing.active {
        return;
    }
    if let Some(anim) = thing.anim.as_mut() {
        thing.image = anim.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::Animator;
    use crate::components::thing::Spawn;
    use crate::events::EventType;
    use crate::resources::assets::ImageHandle;
    use crate::resources::debugmode::DebugMode;
    use crate::resources::audio::NullAudio;
    use crate::resources::input::InputState;
    use crate::resources::renderer::NullRenderer;
    use crate::resources::world::World;
    use crate::resources::worldtime::WorldTime;
    use std::time::Duration;

    #[test]
    fn animate_event_swaps_frames() {
        let mut world = World::new();
        let id = world.spawn(Spawn::default());
        let frames = vec![ImageHandle::new("a", 1.0, 1.0), ImageHandle::new("b", 1.0, 1.0)];
        world.thing_mut(id).unwrap().anim = Some(Animator::new(frames, 1));
        let (mut renderer, mut debug, input) = (NullRenderer::default(), DebugMode::default(), InputState::default());
        let mut audio = NullAudio;
        let mut ctx = Context::new(&mut world, &mut renderer, &mut audio, &mut debug, &input, WorldTime::default());
        let animate = Event::Animate { delta: Duration::from_millis(10), count: 1 };
        assert_eq!(ctx.publish(&animate), vec![id]);
        assert_eq!(ctx.world.thing(id).unwrap().image.as_ref().map(|i| i.key()), Some("a"));
        ctx.publish(&animate);
        assert_eq!(ctx.world.thing(id).unwrap().image.as_ref().map(|i| i.key()), Some("b"));
        assert!(ctx.world.bus().is_subscribed(EventType::Animate, id));
    }
}
