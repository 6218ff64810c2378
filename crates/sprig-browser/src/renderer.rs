//! Software renderer for headless screenshots.
//!
//! Implements [`PaintSurface`] on an RGBA pixel buffer, rasterising text
//! with fontdue.
//!
//! ```text
//! Style → Layout → Paint → Render
//!                    ↓        ↓
//!              DisplayList → Pixels
//! ```
//!
//! The renderer knows nothing about CSS, layout, or the DOM. It simply
//! executes draw commands.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use sprig_css::{ColorValue, FontSpec, PaintSurface, Point, Rect};

use crate::fonts::FontSet;

/// A pixel buffer that draw commands are executed onto.
pub struct Renderer {
    buffer: RgbaImage,
    fonts: Rc<FontSet>,
}

impl Renderer {
    /// Create a white canvas of `width` × `height` pixels.
    #[must_use]
    pub fn new(width: u32, height: u32, fonts: Rc<FontSet>) -> Self {
        Self {
            buffer: ImageBuffer::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            fonts,
        }
    }

    /// Reset every pixel to white.
    pub fn clear(&mut self) {
        for pixel in self.buffer.pixels_mut() {
            *pixel = Rgba([255, 255, 255, 255]);
        }
    }

    /// The rendered pixels.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Save the buffer as an image; the format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .with_context(|| format!("failed to save screenshot to '{}'", path.display()))
    }

    /// Blend `color` into the pixel at (`x`, `y`), ignoring points outside
    /// the buffer.
    #[allow(clippy::cast_sign_loss)]
    fn blend(&mut self, x: i32, y: i32, color: ColorValue, coverage: u8) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.buffer.width() || y >= self.buffer.height() {
            return;
        }
        let alpha = (u16::from(color.a) * u16::from(coverage) / 255) as u8;
        if alpha == 0 {
            return;
        }
        let fg = Rgba([color.r, color.g, color.b, 255]);
        let out = if alpha == 255 {
            fg
        } else {
            alpha_blend(fg, *self.buffer.get_pixel(x, y), alpha)
        };
        self.buffer.put_pixel(x, y, out);
    }
}

impl PaintSurface for Renderer {
    #[allow(clippy::cast_possible_wrap)]
    fn fill_rect(&mut self, rect: Rect, color: ColorValue) {
        let (left, top) = (rect.left.round() as i32, rect.top.round() as i32);
        let (right, bottom) = (rect.right.round() as i32, rect.bottom.round() as i32);
        let top = top.max(0);
        let bottom = bottom.min(self.buffer.height() as i32);
        let left = left.max(0);
        let right = right.min(self.buffer.width() as i32);
        for y in top..bottom {
            for x in left..right {
                self.blend(x, y, color, 255);
            }
        }
    }

    fn outline(&mut self, rect: Rect, color: ColorValue, thickness: f32) {
        let t = thickness.max(1.0);
        let edges = [
            Rect::new(rect.left, rect.top, rect.right, rect.top + t),
            Rect::new(rect.left, rect.bottom - t, rect.right, rect.bottom),
            Rect::new(rect.left, rect.top, rect.left + t, rect.bottom),
            Rect::new(rect.right - t, rect.top, rect.right, rect.bottom),
        ];
        for edge in edges {
            self.fill_rect(edge, color);
        }
    }

    fn line(&mut self, from: Point, to: Point, color: ColorValue, thickness: f32) {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        let half = thickness.max(1.0) / 2.0;
        let mut i = 0.0;
        while i <= steps {
            let x = from.x + dx * i / steps;
            let y = from.y + dy * i / steps;
            self.fill_rect(Rect::new(x - half, y - half, x + half, y + half), color);
            i += 1.0;
        }
    }

    fn text(&mut self, origin: Point, text: &str, font: &FontSpec, color: ColorValue) {
        let fonts = Rc::clone(&self.fonts);
        let Some(face) = fonts.select(font) else {
            return;
        };
        let baseline = (origin.y + fonts.ascent(font)).round() as i32;
        let mut cursor_x = origin.x;

        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let (metrics, bitmap) = face.rasterize(ch, font.size);
            let glyph_x = cursor_x.round() as i32 + metrics.xmin;
            let glyph_y = baseline - metrics.ymin - metrics.height as i32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage > 0 {
                        self.blend(glyph_x + gx as i32, glyph_y + gy as i32, color, coverage);
                    }
                }
            }
            cursor_x += metrics.advance_width;
        }
    }
}

/// Alpha blend a foreground color onto a background color.
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let mix = |f: u8, b: u8| (f32::from(f) * a + f32::from(b) * (1.0 - a)).round() as u8;
    Rgba([mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2]), 255])
}
