//! Canvas rendering
//!
//! The table is drawn with a handful of 2D primitives behind the [`Canvas`]
//! trait. The browser implements it over `CanvasRenderingContext2d`; tests use
//! a recorder.

pub mod table;

use glam::Vec2;

pub use table::draw_frame;

/// An sRGB colour with optional alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// `0xRRGGBB`
    Rgb(u32),
    /// `0xRRGGBB` plus alpha in 0..=1
    Rgba(u32, f32),
}

impl Color {
    /// CSS colour string (`#rrggbb` or `rgba(r,g,b,a)`)
    pub fn css(&self) -> String {
        match *self {
            Color::Rgb(rgb) => format!("#{:06x}", rgb & 0xFF_FFFF),
            Color::Rgba(rgb, alpha) => {
                let (r, g, b) = ((rgb >> 16) & 0xFF, (rgb >> 8) & 0xFF, rgb & 0xFF);
                format!("rgba({},{},{},{})", r, g, b, alpha)
            }
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Grow by `amount` on every side
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            size: self.size + Vec2::splat(amount * 2.0),
        }
    }
}

/// Fill style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Gradient along the segment `from -> to`, with stops at offsets in 0..=1
    LinearGradient {
        from: Vec2,
        to: Vec2,
        stops: Vec<(f32, Color)>,
    },
}

/// Drawing surface
pub trait Canvas {
    /// Make `rect` fully transparent
    fn clear(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
}
