//! Rendering collaborator contract.
//!
//! The engine never draws pixels itself. Draw handlers, the splash screen and
//! the debug overlay issue side effects through [`Renderer`]. The demo binary
//! implements it on top of raylib; [`RecordingRenderer`] captures commands for
//! tests and headless runs, and [`NullRenderer`] discards them for contexts
//! that must not draw (the update loop).
//!
//! Rotation arguments are fractions of a full turn, clockwise, matching
//! [`Thing::rotation`](crate::components::thing::Thing).

use crate::components::vector::Vector;
use crate::error::EngineError;
use crate::resources::assets::ImageHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, EngineError> {
        let bad = || EngineError::Config(format!("invalid color '{}'", hex));
        let digits = hex.strip_prefix('#').ok_or_else(bad)?;
        let nibble = |i: usize| {
            digits
                .get(i..i + 1)
                .and_then(|d| u8::from_str_radix(d, 16).ok())
                .ok_or_else(bad)
        };
        let byte = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|d| u8::from_str_radix(d, 16).ok())
                .ok_or_else(bad)
        };
        match digits.len() {
            3 => Ok(Color::rgb(nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(bad()),
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Font description. Backends map `face` to whatever fonts they have.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub face: String,
    pub size: f32,
    pub color: Color,
}

impl Font {
    pub fn new(face: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            face: face.into(),
            size,
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Placement of one image draw.
///
/// `dest` is the top-left corner in surface pixels. The image is scaled by
/// `scale`, then rotated by `rotation` around `pivot`, which is measured from
/// `dest` in already-scaled pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDraw {
    pub dest: Vector,
    pub opacity: f32,
    pub rotation: f32,
    pub pivot: Vector,
    pub scale: (f32, f32),
    /// Sub-rectangle of the source image; the whole image when `None`.
    pub source: Option<Rect>,
}

impl ImageDraw {
    pub fn at(dest: Vector) -> Self {
        Self {
            dest,
            opacity: 1.0,
            rotation: 0.0,
            pivot: Vector::ZERO,
            scale: (1.0, 1.0),
            source: None,
        }
    }
}

pub trait Renderer {
    /// Current drawable surface size in pixels.
    fn surface_size(&self) -> (f32, f32);

    fn clear(&mut self, color: Color);

    fn draw_image(&mut self, image: &ImageHandle, params: &ImageDraw);

    /// Draw text anchored at `(x, y)` per `align`. Returns the text width.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &Font, align: Align, opacity: f32) -> f32;

    fn text_width(&self, text: &str, font: &Font) -> f32;

    fn draw_line(&mut self, from: Vector, to: Vector, color: Color, opacity: f32);

    fn draw_rect_filled(&mut self, rect: Rect, color: Color, opacity: f32, rotation: f32);

    fn draw_rect_unfilled(&mut self, rect: Rect, color: Color, opacity: f32, rotation: f32);

    fn draw_circle_unfilled(&mut self, center: Vector, radius: f32, color: Color, opacity: f32);

    /// A `+` of arm length `size / 2` centred on `center`.
    fn draw_cross(&mut self, center: Vector, size: f32, color: Color, opacity: f32, rotation: f32) {
        let r = rotation * std::f32::consts::TAU;
        let (s, c) = r.sin_cos();
        let h = size * 0.5;
        let arm = |dx: f32, dy: f32| Vector::xy(center.x + dx * c - dy * s, center.y + dx * s + dy * c);
        self.draw_line(arm(-h, 0.0), arm(h, 0.0), color, opacity);
        self.draw_line(arm(0.0, -h), arm(0.0, h), color, opacity);
    }
}

/// One recorded side effect of [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Image { key: String, params: ImageDraw },
    Text { text: String, x: f32, y: f32, color: Color, align: Align, opacity: f32 },
    Line { from: Vector, to: Vector, color: Color, opacity: f32 },
    RectFilled { rect: Rect, color: Color, opacity: f32 },
    RectUnfilled { rect: Rect, color: Color, opacity: f32 },
    CircleUnfilled { center: Vector, radius: f32, color: Color, opacity: f32 },
    Cross { center: Vector, size: f32, color: Color, opacity: f32 },
}

/// Renderer that records every command in order.
///
/// Text width is estimated as half the font size per character.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
    width: f32,
    height: f32,
}

impl RecordingRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            commands: Vec::new(),
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Take the recorded commands, leaving the log empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Keys of the images drawn, in draw order.
    pub fn image_keys(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn surface_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_image(&mut self, image: &ImageHandle, params: &ImageDraw) {
        self.commands.push(DrawCommand::Image {
            key: image.key().to_string(),
            params: *params,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &Font, align: Align, opacity: f32) -> f32 {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            color: font.color,
            align,
            opacity,
        });
        self.text_width(text, font)
    }

    fn text_width(&self, text: &str, font: &Font) -> f32 {
        text.chars().count() as f32 * font.size * 0.5
    }

    fn draw_line(&mut self, from: Vector, to: Vector, color: Color, opacity: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, opacity });
    }

    fn draw_rect_filled(&mut self, rect: Rect, color: Color, opacity: f32, _rotation: f32) {
        self.commands.push(DrawCommand::RectFilled { rect, color, opacity });
    }

    fn draw_rect_unfilled(&mut self, rect: Rect, color: Color, opacity: f32, _rotation: f32) {
        self.commands.push(DrawCommand::RectUnfilled { rect, color, opacity });
    }

    fn draw_circle_unfilled(&mut self, center: Vector, radius: f32, color: Color, opacity: f32) {
        self.commands.push(DrawCommand::CircleUnfilled {
            center,
            radius,
            color,
            opacity,
        });
    }

    fn draw_cross(&mut self, center: Vector, size: f32, color: Color, opacity: f32, _rotation: f32) {
        self.commands.push(DrawCommand::Cross {
            center,
            size,
            color,
            opacity,
        });
    }
}

/// Renderer that draws nothing but still knows the surface size.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer {
    pub width: f32,
    pub height: f32,
}

impl Renderer for NullRenderer {
    fn surface_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
    fn clear(&mut self, _color: Color) {}
    fn draw_image(&mut self, _image: &ImageHandle, _params: &ImageDraw) {}
    fn draw_text(&mut self, _text: &str, _x: f32, _y: f32, _font: &Font, _align: Align, _opacity: f32) -> f32 {
        0.0
    }
    fn text_width(&self, _text: &str, _font: &Font) -> f32 {
        0.0
    }
    fn draw_line(&mut self, _from: Vector, _to: Vector, _color: Color, _opacity: f32) {}
    fn draw_rect_filled(&mut self, _rect: Rect, _color: Color, _opacity: f32, _rotation: f32) {}
    fn draw_rect_unfilled(&mut self, _rect: Rect, _color: Color, _opacity: f32, _rotation: f32) {}
    fn draw_circle_unfilled(&mut self, _center: Vector, _radius: f32, _color: Color, _opacity: f32) {}
    fn draw_cross(&mut self, _center: Vector, _size: f32, _color: Color, _opacity: f32, _rotation: f32) {}
}
