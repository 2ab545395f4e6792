// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text measurement and glyph rasterization.
//!
//! The compositor asks a `TextPainter` for one coverage mask per line and
//! places it itself, so the painter never sees layer transforms. `FontBook`
//! is the ab_glyph implementation backed by fonts resolved through the
//! system font source.

use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use std::collections::HashMap;

/// Families tried, in order, when a requested family is not installed.
const FALLBACK_FAMILIES: [&str; 5] = ["Arial", "Helvetica", "Liberation Sans", "DejaVu Sans", "Noto Sans"];

/// Coverage mask of one rasterized line of text.
///
/// Mask pixel `(i, j)` covers the line-local square starting at
/// `(left + i, top + j)`, where x = 0 is the line's pen start and y = 0 is
/// the line's vertical middle.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMask {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<f32>,
    pub left: f64,
    pub top: f64,
    /// Pen advance of the whole line.
    pub advance: f64,
}

impl LineMask {
    fn at(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0.0;
        }
        self.coverage[y as usize * self.width as usize + x as usize]
    }

    /// Bilinear coverage at a point in mask space.
    pub fn sample(&self, x: f64, y: f64) -> f32 {
        let u = x - 0.5;
        let v = y - 0.5;
        let x0 = u.floor();
        let y0 = v.floor();
        let fx = (u - x0) as f32;
        let fy = (v - y0) as f32;
        let (ix, iy) = (x0 as i64, y0 as i64);

        let top = self.at(ix, iy) * (1.0 - fx) + self.at(ix + 1, iy) * fx;
        let bottom = self.at(ix, iy + 1) * (1.0 - fx) + self.at(ix + 1, iy + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

/// Host text facility: measures and rasterizes single lines.
pub trait TextPainter {
    /// Advance width of `text` in logical units.
    fn measure(&mut self, family: &str, size: f64, text: &str) -> f64;

    /// Coverage mask for `text`, or `None` when nothing would be drawn.
    fn rasterize_line(&mut self, family: &str, size: f64, text: &str) -> Option<LineMask>;
}

/// Fonts resolved by family name, cached for the life of the book.
#[derive(Default)]
pub struct FontBook {
    fonts: HashMap<String, Option<FontArc>>,
    fallback: Option<Option<FontArc>>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a family to a loaded font, falling back to a sans-serif face.
    pub fn resolve(&mut self, family: &str) -> Option<FontArc> {
        if !self.fonts.contains_key(family) {
            let loaded = load_system_font(family);
            if loaded.is_none() {
                log::warn!("Font family '{}' not found, using fallback", family);
            }
            self.fonts.insert(family.to_string(), loaded);
        }
        if let Some(Some(font)) = self.fonts.get(family) {
            return Some(font.clone());
        }
        self.fallback_font()
    }

    fn fallback_font(&mut self) -> Option<FontArc> {
        if self.fallback.is_none() {
            let font = FALLBACK_FAMILIES
                .iter()
                .find_map(|family| load_system_font(family))
                .or_else(load_generic_sans_serif);
            if font.is_none() {
                log::error!("No usable system font found; text will not be drawn");
            }
            self.fallback = Some(font);
        }
        self.fallback.clone().flatten()
    }
}

impl TextPainter for FontBook {
    fn measure(&mut self, family: &str, size: f64, text: &str) -> f64 {
        match self.resolve(family) {
            Some(font) => layout_line(&font, size as f32, text).1 as f64,
            None => 0.0,
        }
    }

    fn rasterize_line(&mut self, family: &str, size: f64, text: &str) -> Option<LineMask> {
        let font = self.resolve(family)?;
        rasterize_line(&font, size as f32, text)
    }
}

/// Pen positions along the baseline, with kerning, and the total advance.
fn layout_line(font: &FontArc, size: f32, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(size);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut cursor_x = 0.0f32;
    let mut last_glyph: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = last_glyph {
            cursor_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push((glyph_id, cursor_x));
        cursor_x += scaled.h_advance(glyph_id);
        last_glyph = Some(glyph_id);
    }

    (glyphs, cursor_x)
}

/// Rasterize one line with ab_glyph, positioned relative to its middle.
pub fn rasterize_line(font: &FontArc, size: f32, text: &str) -> Option<LineMask> {
    let scaled = font.as_scaled(size);
    // Baseline sits below the middle of the ascent/descent box.
    let baseline = (scaled.ascent() + scaled.descent()) / 2.0;
    let (glyphs, advance) = layout_line(font, size, text);

    let outlined: Vec<_> = glyphs
        .into_iter()
        .filter_map(|(id, x)| font.outline_glyph(id.with_scale_and_position(size, point(x, 0.0))))
        .collect();
    if outlined.is_empty() {
        return None;
    }

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for glyph in &outlined {
        let b = glyph.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }
    let (x0, y0) = (min_x.floor() as i32, min_y.floor() as i32);
    let width = (max_x.ceil() as i32 - x0).max(0) as u32;
    let height = (max_y.ceil() as i32 - y0).max(0) as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let mut coverage = vec![0.0f32; width as usize * height as usize];
    for glyph in &outlined {
        let b = glyph.px_bounds();
        let (gx, gy) = (b.min.x as i32 - x0, b.min.y as i32 - y0);
        glyph.draw(|px, py, cov| {
            let x = gx + px as i32;
            let y = gy + py as i32;
            if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                let idx = y as usize * width as usize + x as usize;
                coverage[idx] = coverage[idx].max(cov);
            }
        });
    }

    Some(LineMask {
        width,
        height,
        coverage,
        left: x0 as f64,
        top: (y0 as f32 + baseline) as f64,
        advance: advance as f64,
    })
}

/// Load a regular-weight font by family name from the system.
pub fn load_system_font(family: &str) -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    load_family(FamilyName::Title(family.to_string()))
}

fn load_generic_sans_serif() -> Option<FontArc> {
    load_family(font_kit::family_name::FamilyName::SansSerif)
}

fn load_family(name: font_kit::family_name::FamilyName) -> Option<FontArc> {
    use font_kit::properties::Properties;
    use font_kit::source::SystemSource;

    let handle = SystemSource::new()
        .select_best_match(&[name], &Properties::new())
        .ok()?;
    let font_data = handle.load().ok()?;
    let bytes: Vec<u8> = (*font_data.copy_font_data()?).clone();
    FontArc::try_from_vec(bytes).ok()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{LineMask, TextPainter};

    /// Draws every character as a solid block, independent of installed fonts.
    ///
    /// Blocks are `0.5 × size` wide and `size` tall, centered on the line's
    /// middle, so layout can be checked pixel by pixel.
    #[derive(Default)]
    pub struct BlockPainter;

    impl TextPainter for BlockPainter {
        fn measure(&mut self, _family: &str, size: f64, text: &str) -> f64 {
            text.chars().count() as f64 * size * 0.5
        }

        fn rasterize_line(&mut self, family: &str, size: f64, text: &str) -> Option<LineMask> {
            let advance = self.measure(family, size, text);
            let width = advance.round() as u32;
            let height = size.round() as u32;
            if width == 0 || height == 0 {
                return None;
            }
            Some(LineMask {
                width,
                height,
                coverage: vec![1.0; width as usize * height as usize],
                left: 0.0,
                top: -(height as f64) / 2.0,
                advance,
            })
        }
    }
}
