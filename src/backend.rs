//! raylib backend for the demo: a [`Renderer`] over a draw handle, a texture
//! cache built from the asset store, and input polling.
//!
//! Rotation arrives as a fraction of a full turn and is handed to raylib in
//! degrees. Only raylib's built-in font is used; the font face is ignored.

use log::warn;
use raylib::prelude::*;
use rustc_hash::FxHashMap;

use squids::components::vector::Vector;
use squids::events::input::InputEvent;
use squids::resources::assets::{AssetStore, ImageHandle};
use squids::resources::renderer::{self, Align, Font, ImageDraw, Rect, Renderer};

/// GPU textures keyed like the asset store.
pub struct TextureCache {
    textures: FxHashMap<String, Texture2D>,
}

impl TextureCache {
    /// Upload every image in `store` that has a file behind it.
    pub fn load(rl: &mut RaylibHandle, thread: &RaylibThread, store: &AssetStore) -> Self {
        let mut textures = FxHashMap::default();
        for image in store.images() {
            let Some(path) = image.path().and_then(|p| p.to_str()) else {
                continue;
            };
            match rl.load_texture(thread, path) {
                Ok(texture) => {
                    textures.insert(image.key().to_string(), texture);
                }
                Err(e) => warn!("Failed to upload texture '{}': {}", image.key(), e),
            }
        }
        Self { textures }
    }

    pub fn get(&self, key: &str) -> Option<&Texture2D> {
        self.textures.get(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }
}

fn rl_color(color: renderer::Color, opacity: f32) -> Color {
    let alpha = (f32::from(color.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::new(color.r, color.g, color.b, alpha)
}

fn rl_rect(rect: Rect) -> Rectangle {
    Rectangle::new(rect.x, rect.y, rect.w, rect.h)
}

fn rl_vec(v: Vector) -> Vector2 {
    Vector2::new(v.x, v.y)
}

fn degrees(turns: f32) -> f32 {
    turns * 360.0
}

pub struct RaylibRenderer<'a, 'b> {
    d: &'a mut RaylibDrawHandle<'b>,
    textures: &'a TextureCache,
    width: f32,
    height: f32,
}

impl<'a, 'b> RaylibRenderer<'a, 'b> {
    pub fn new(d: &'a mut RaylibDrawHandle<'b>, textures: &'a TextureCache) -> Self {
        let width = d.get_screen_width() as f32;
        let height = d.get_screen_height() as f32;
        Self {
            d,
            textures,
            width,
            height,
        }
    }
}

impl Renderer for RaylibRenderer<'_, '_> {
    fn surface_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: renderer::Color) {
        self.d.clear_background(rl_color(color, 1.0));
    }

    fn draw_image(&mut self, image: &ImageHandle, params: &ImageDraw) {
        let Some(texture) = self.textures.get(image.key()) else {
            return;
        };
        let source = params
            .source
            .map(rl_rect)
            .unwrap_or_else(|| Rectangle::new(0.0, 0.0, texture.width as f32, texture.height as f32));
        let dest = Rectangle::new(
            params.dest.x + params.pivot.x,
            params.dest.y + params.pivot.y,
            source.width * params.scale.0,
            source.height * params.scale.1,
        );
        self.d.draw_texture_pro(
            texture,
            source,
            dest,
            rl_vec(params.pivot),
            degrees(params.rotation),
            rl_color(renderer::Color::WHITE, params.opacity),
        );
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &Font, align: Align, opacity: f32) -> f32 {
        let width = self.text_width(text, font);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width * 0.5,
            Align::Right => x - width,
        };
        self.d.draw_text(
            text,
            x as i32,
            y as i32,
            font.size as i32,
            rl_color(font.color, opacity),
        );
        width
    }

    fn text_width(&self, text: &str, font: &Font) -> f32 {
        self.d.measure_text(text, font.size as i32) as f32
    }

    fn draw_line(&mut self, from: Vector, to: Vector, color: renderer::Color, opacity: f32) {
        self.d.draw_line_v(rl_vec(from), rl_vec(to), rl_color(color, opacity));
    }

    fn draw_rect_filled(&mut self, rect: Rect, color: renderer::Color, opacity: f32, rotation: f32) {
        self.d.draw_rectangle_pro(
            rl_rect(rect),
            Vector2::zero(),
            degrees(rotation),
            rl_color(color, opacity),
        );
    }

    fn draw_rect_unfilled(&mut self, rect: Rect, color: renderer::Color, opacity: f32, _rotation: f32) {
        self.d.draw_rectangle_lines_ex(rl_rect(rect), 1.0, rl_color(color, opacity));
    }

    fn draw_circle_unfilled(&mut self, center: Vector, radius: f32, color: renderer::Color, opacity: f32) {
        self.d.draw_circle_lines(
            center.x as i32,
            center.y as i32,
            radius,
            rl_color(color, opacity),
        );
    }
}

/// Keys forwarded to the engine, with their logical names.
const TRACKED_KEYS: &[(KeyboardKey, &str)] = &[
    (KeyboardKey::KEY_LEFT, "ArrowLeft"),
    (KeyboardKey::KEY_RIGHT, "ArrowRight"),
    (KeyboardKey::KEY_UP, "ArrowUp"),
    (KeyboardKey::KEY_DOWN, "ArrowDown"),
    (KeyboardKey::KEY_SPACE, " "),
    (KeyboardKey::KEY_ENTER, "Enter"),
    (KeyboardKey::KEY_ESCAPE, "Escape"),
    (KeyboardKey::KEY_GRAVE, "`"),
    (KeyboardKey::KEY_A, "a"),
    (KeyboardKey::KEY_D, "d"),
    (KeyboardKey::KEY_S, "s"),
    (KeyboardKey::KEY_W, "w"),
];

/// Poll raylib once per frame and translate what changed into input events.
pub fn poll_input(rl: &RaylibHandle, focused: &mut bool) -> Vec<InputEvent> {
    let mut events = Vec::new();

    let now_focused = rl.is_window_focused();
    if now_focused != *focused {
        *focused = now_focused;
        events.push(if now_focused { InputEvent::Focus } else { InputEvent::Blur });
    }

    if rl.is_window_resized() {
        events.push(InputEvent::Resize {
            width: rl.get_screen_width() as f32,
            height: rl.get_screen_height() as f32,
        });
    }

    let ctrl = rl.is_key_down(KeyboardKey::KEY_LEFT_CONTROL) || rl.is_key_down(KeyboardKey::KEY_RIGHT_CONTROL);
    for &(key, name) in TRACKED_KEYS {
        if rl.is_key_pressed(key) {
            events.push(InputEvent::KeyDown {
                key: name.to_string(),
                ctrl,
            });
        }
        if rl.is_key_released(key) {
            events.push(InputEvent::key_up(name));
        }
    }

    let mouse = rl.get_mouse_position();
    let delta = rl.get_mouse_delta();
    if delta.x != 0.0 || delta.y != 0.0 {
        events.push(InputEvent::PointerMove { x: mouse.x, y: mouse.y });
    }
    if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
        events.push(InputEvent::PointerDown { x: mouse.x, y: mouse.y });
    }
    if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
        events.push(InputEvent::PointerUp { x: mouse.x, y: mouse.y });
    }
    events
}
