// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text layer data structures.
//!
//! This module defines the text overlay record drawn over the composite,
//! its styling values, and the sparse patch used to update it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Opaque layer identifier, stable for the layer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text-{}", self.0)
    }
}

/// Horizontal anchor of each text line within the layer box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub const ALL: [TextAlign; 3] = [TextAlign::Left, TextAlign::Center, TextAlign::Right];

    pub fn label(&self) -> &'static str {
        match self {
            TextAlign::Left => "Left",
            TextAlign::Center => "Center",
            TextAlign::Right => "Right",
        }
    }
}

/// An sRGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// A positioned, styled text element drawn over the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub id: LayerId,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub font_family: String,
    pub color: Color,
    pub opacity: f64,
    /// Degrees, clockwise-positive.
    pub rotation: f64,
    pub z_index: usize,
    pub is_behind_person: bool,
    pub text_align: TextAlign,
}

impl TextLayer {
    /// Create a layer with the default geometry used by "add text".
    pub fn new(id: LayerId, z_index: usize) -> Self {
        Self {
            id,
            content: "New Text".to_string(),
            x: 100.0,
            y: 100.0,
            width: 200.0,
            height: 60.0,
            font_size: 48.0,
            font_family: "Arial".to_string(),
            color: Color::BLACK,
            opacity: 1.0,
            rotation: 0.0,
            z_index,
            is_behind_person: false,
            text_align: TextAlign::Center,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_extents(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Copy of this layer with every length multiplied by `scale`.
    /// Rotation is scale-invariant and left untouched.
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
            font_size: self.font_size * scale,
            ..self.clone()
        }
    }
}

/// Layers bottom to top: the behind-subject group, then the front group,
/// each in ascending `z_index`.
pub fn stacking_order(layers: &[TextLayer]) -> Vec<&TextLayer> {
    let mut ordered: Vec<&TextLayer> = layers.iter().collect();
    ordered.sort_by_key(|l| (!l.is_behind_person, l.z_index));
    ordered
}

/// Normalize an angle in degrees into `(-180, 180]` for display.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Sparse update applied by the layer store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub color: Option<Color>,
    pub opacity: Option<f64>,
    pub rotation: Option<f64>,
    pub is_behind_person: Option<bool>,
    pub text_align: Option<TextAlign>,
}

impl LayerPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self { rotation: Some(rotation), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when the patch touches a field the box size is derived from.
    pub fn affects_text_metrics(&self) -> bool {
        self.content.is_some() || self.font_family.is_some() || self.font_size.is_some()
    }

    /// Write every present field into `layer`.
    ///
    /// Sizes are kept strictly positive and opacity within `[0, 1]`.
    pub fn apply(&self, layer: &mut TextLayer) {
        if let Some(content) = &self.content {
            layer.content = content.clone();
        }
        if let Some(x) = self.x {
            layer.x = x;
        }
        if let Some(y) = self.y {
            layer.y = y;
        }
        if let Some(width) = self.width {
            layer.width = width.max(1.0);
        }
        if let Some(height) = self.height {
            layer.height = height.max(1.0);
        }
        if let Some(font_size) = self.font_size {
            layer.font_size = font_size.max(1.0);
        }
        if let Some(family) = &self.font_family {
            layer.font_family = family.clone();
        }
        if let Some(color) = self.color {
            layer.color = color;
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(rotation) = self.rotation {
            layer.rotation = rotation;
        }
        if let Some(behind) = self.is_behind_person {
            layer.is_behind_person = behind;
        }
        if let Some(align) = self.text_align {
            layer.text_align = align;
        }
    }
}
