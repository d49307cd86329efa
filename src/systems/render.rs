//! Drawing: the default draw handler, the splash screen and the debug overlay.
//!
//! Everything here only issues [`Renderer`] calls; the frame itself is driven
//! by [`Engine::render`](crate::engine::Engine::render).

use crate::components::body::Body;
use crate::components::thing::Thing;
use crate::components::vector::Vector;
use crate::events::Event;
use crate::events::context::Context;
use crate::resources::assets::ImageHandle;
use crate::resources::debugmode::DebugMode;
use crate::resources::renderer::{Align, Color, Font, ImageDraw, Rect, Renderer};

pub const ENGINE_NAME: &str = "Squids";
pub const ENGINE_CODE_NAME: &str = "Quiver";

const DBG_FONT_SIZE: f32 = 16.0;
const DBG_LINE_HEIGHT: f32 = DBG_FONT_SIZE + DBG_FONT_SIZE * 0.1;
const DBG_SHADOW_OFFSET: f32 = DBG_FONT_SIZE * 0.1;
const DBG_CROSS_SIZE: f32 = 10.0;

pub fn debug_font() -> Font {
    Font::new("helvetica", DBG_FONT_SIZE, Color::YELLOW)
}

fn debug_shadow_font() -> Font {
    Font::new("helvetica", DBG_FONT_SIZE, Color::BLACK)
}

/// Default draw: image centred on the position, then text, then (in debug
/// mode) a crosshair and the body outline.
pub fn default_draw(thing: &mut Thing, ctx: &mut Context<'_>, _event: &Event) {
    if !thing.active {
        return;
    }
    let debug = ctx.debug.is_enabled();
    draw_thing(thing, ctx.renderer, debug);
}

pub fn draw_thing(thing: &Thing, renderer: &mut dyn Renderer, debug: bool) {
    if let Some(image) = &thing.image {
        draw_centered_image(thing, image, renderer, debug);
    }

    if let Some(text) = &thing.text {
        let font = thing.font.clone().unwrap_or_else(debug_font);
        renderer.draw_text(text, thing.position.x, thing.position.y, &font, thing.align, thing.opacity);
    }

    if debug {
        renderer.draw_cross(thing.position, DBG_CROSS_SIZE, Color::CYAN, 0.8, thing.rotation);
        draw_body_outline(thing, renderer);
    }
}

fn draw_centered_image(thing: &Thing, image: &ImageHandle, renderer: &mut dyn Renderer, debug: bool) {
    let dw = image.width() * thing.scale;
    let dh = image.height() * thing.scale;
    let dest = Vector::xy(thing.position.x - dw * 0.5, thing.position.y - dh * 0.5);
    let pivot = thing.pivot.unwrap_or(Vector::xy(dw * 0.5, dh * 0.5));
    renderer.draw_image(
        image,
        &ImageDraw {
            dest,
            opacity: thing.opacity,
            rotation: thing.rotation,
            pivot,
            scale: (thing.scale, thing.scale),
            source: None,
        },
    );
    if debug {
        renderer.draw_rect_filled(Rect::new(dest.x, dest.y, dw, dh), Color::CYAN, 0.1, 0.0);
    }
}

/// Only an explicit `body` is outlined; the image-derived fallback is not.
fn draw_body_outline(thing: &Thing, renderer: &mut dyn Renderer) {
    let Some(body) = thing.body else {
        return;
    };
    match body {
        Body::Circle { radius } => {
            renderer.draw_circle_unfilled(thing.position, radius * thing.scale, Color::GREEN, 0.9);
        }
        Body::Rect { width, height } => {
            let w = width * thing.scale;
            let h = height * thing.scale;
            let rect = Rect::new(thing.position.x - w * 0.5, thing.position.y - h * 0.5, w, h);
            renderer.draw_rect_unfilled(rect, Color::RED, 0.9, 0.0);
        }
    }
}

/// What the warm-up frames show.
#[derive(Debug, Clone)]
pub struct Splash {
    pub logo: Option<ImageHandle>,
    pub caption: String,
    pub font: Font,
}

impl Default for Splash {
    fn default() -> Self {
        Self {
            logo: None,
            caption: format!(
                "{} {} ({})",
                ENGINE_NAME,
                env!("CARGO_PKG_VERSION"),
                ENGINE_CODE_NAME
            ),
            font: Font::new("helvetica", 25.0, Color::rgb(0x44, 0x88, 0xaa)),
        }
    }
}

/// Black fill, the logo in the upper part, the caption near the bottom.
pub fn draw_splash(renderer: &mut dyn Renderer, splash: &Splash) {
    let (sw, sh) = renderer.surface_size();
    renderer.draw_rect_filled(Rect::new(0.0, 0.0, sw, sh), Color::BLACK, 1.0, 0.0);
    if let Some(logo) = &splash.logo {
        let dest = Vector::xy((sw - logo.width()) * 0.5, (sh - logo.height()) * 0.25);
        renderer.draw_image(logo, &ImageDraw::at(dest));
    }
    renderer.draw_text(&splash.caption, sw * 0.5, sh * 0.9, &splash.font, Align::Center, 1.0);
}

/// Debug message rows, each over a one-pixel-ish black shadow.
pub fn draw_debug_overlay(renderer: &mut dyn Renderer, debug: &DebugMode) {
    let font = debug_font();
    let shadow = debug_shadow_font();
    let mut y = DBG_LINE_HEIGHT;
    for message in debug.messages() {
        renderer.draw_text(message, DBG_FONT_SIZE, y + DBG_SHADOW_OFFSET, &shadow, Align::Left, 0.9);
        renderer.draw_text(message, DBG_FONT_SIZE, y, &font, Align::Left, 0.9);
        y += DBG_LINE_HEIGHT;
    }
}
