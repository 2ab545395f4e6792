// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Two-pass compositing of image planes and text layers.
//!
//! Draw order is fixed: backdrop, background plane, behind-subject layers,
//! subject plane, front layers, then the selection overlay. The subject
//! plane occludes behind-layers wherever it is opaque, which is what makes
//! text appear to sit behind the person. Output depends only on the inputs.

use crate::config::Theme;
use crate::models::images::{ImagePair, ImageStatus};
use crate::models::layer::{stacking_order, Color, LayerId, Point, TextAlign, TextLayer};
use crate::models::project::LINE_HEIGHT;
use crate::render::raster;
use crate::render::text::TextPainter;
use crate::util::geometry::{Handle, ROTATE_HANDLE_OFFSET};
use image::RgbaImage;

/// Selection outline and handle color.
const SELECTION_COLOR: [u8; 4] = [59, 130, 246, 255];
const SELECTION_STROKE: f64 = 2.0;
const ROTATE_HANDLE_RADIUS: f64 = 6.0;

const PLACEHOLDER_MARGIN: i64 = 50;
const PLACEHOLDER_FONT_SIZE: f64 = 24.0;
const PLACEHOLDER_FONT: &str = "Arial";

/// How the selection overlay is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub handle_size: f64,
    pub rotate_handle: bool,
}

/// Everything one frame depends on besides the planes.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub layers: &'a [TextLayer],
    pub selected: Option<LayerId>,
    pub status: &'a ImageStatus,
    /// `None` suppresses the selection overlay entirely.
    pub overlay: Option<OverlayStyle>,
}

/// Planes pre-scaled to the canvas.
#[derive(Debug, Clone)]
struct ScaledPlanes {
    background: RgbaImage,
    subject: RgbaImage,
}

/// Renders frames at a fixed logical canvas size.
#[derive(Debug, Clone)]
pub struct Compositor {
    width: u32,
    height: u32,
    theme: Theme,
    planes: Option<ScaledPlanes>,
}

impl Compositor {
    pub fn new(size: (u32, u32), theme: Theme) -> Self {
        Self {
            width: size.0.max(1),
            height: size.1.max(1),
            theme,
            planes: None,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Scale and keep the planes of `pair`, or drop them.
    ///
    /// Must be called again after the canvas size changes.
    pub fn set_images(&mut self, pair: Option<&ImagePair>) {
        self.planes = pair.map(|pair| ScaledPlanes {
            background: raster::scale_plane(pair.background(), self.width, self.height),
            subject: raster::scale_plane(pair.subject(), self.width, self.height),
        });
    }

    /// Render one frame.
    pub fn render(&self, scene: &Scene<'_>, painter: &mut dyn TextPainter) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width, self.height);
        raster::fill(&mut canvas, self.theme.backdrop());

        let planes = match (&self.planes, scene.status) {
            (Some(planes), ImageStatus::Ready) => planes,
            (_, status) => {
                let message = status.placeholder_message().unwrap_or("Loading images...");
                self.draw_placeholder(&mut canvas, message, painter);
                return canvas;
            }
        };

        let ordered = stacking_order(scene.layers);
        let (behind, front): (Vec<&TextLayer>, Vec<&TextLayer>) =
            ordered.into_iter().partition(|l| l.is_behind_person);

        raster::draw_plane(&mut canvas, &planes.background);
        for layer in behind {
            draw_layer(&mut canvas, layer, painter);
        }
        raster::draw_plane(&mut canvas, &planes.subject);
        for layer in front {
            draw_layer(&mut canvas, layer, painter);
        }

        if let (Some(style), Some(id)) = (scene.overlay, scene.selected) {
            if let Some(layer) = scene.layers.iter().find(|l| l.id == id) {
                draw_selection(&mut canvas, layer, &style);
            }
        }

        canvas
    }

    fn draw_placeholder(&self, canvas: &mut RgbaImage, message: &str, painter: &mut dyn TextPainter) {
        let (panel, text) = self.theme.placeholder();
        let (w, h) = (self.width as i64, self.height as i64);
        if w > PLACEHOLDER_MARGIN * 2 && h > PLACEHOLDER_MARGIN * 2 {
            raster::fill_rect(
                canvas,
                PLACEHOLDER_MARGIN,
                PLACEHOLDER_MARGIN,
                w - PLACEHOLDER_MARGIN * 2,
                h - PLACEHOLDER_MARGIN * 2,
                panel,
            );
        }

        let block = TextBlock {
            center: Point::new(w as f64 / 2.0, h as f64 / 2.0),
            rotation: 0.0,
            width: w as f64,
            font_family: PLACEHOLDER_FONT,
            font_size: PLACEHOLDER_FONT_SIZE,
            align: TextAlign::Center,
            color: text,
        };
        draw_text_block(canvas, &block, std::iter::once(message), painter);
    }
}

/// A box of centered lines in a rotated frame.
struct TextBlock<'a> {
    center: Point,
    rotation: f64,
    width: f64,
    font_family: &'a str,
    font_size: f64,
    align: TextAlign,
    color: [u8; 4],
}

/// Vertical middle of each line, relative to the block center.
pub fn line_offsets(line_count: usize, font_size: f64) -> Vec<f64> {
    let line_height = font_size * LINE_HEIGHT;
    let total = line_count as f64 * line_height;
    (0..line_count)
        .map(|i| -total / 2.0 + line_height / 2.0 + i as f64 * line_height)
        .collect()
}

/// Pen start of a line of `advance` width inside a box of `width`.
pub fn line_start(align: TextAlign, width: f64, advance: f64) -> f64 {
    match align {
        TextAlign::Left => -width / 2.0,
        TextAlign::Center => -advance / 2.0,
        TextAlign::Right => width / 2.0 - advance,
    }
}

fn draw_text_block<'l>(
    canvas: &mut RgbaImage,
    block: &TextBlock<'_>,
    lines: impl Iterator<Item = &'l str>,
    painter: &mut dyn TextPainter,
) {
    let lines: Vec<&str> = lines.collect();
    let offsets = line_offsets(lines.len(), block.font_size);

    for (line, middle) in lines.into_iter().zip(offsets) {
        let Some(mask) = painter.rasterize_line(block.font_family, block.font_size, line) else {
            continue;
        };
        let origin = Point::new(line_start(block.align, block.width, mask.advance) + mask.left, middle + mask.top);
        let local_min = origin;
        let local_max = Point::new(origin.x + mask.width as f64, origin.y + mask.height as f64);

        raster::paint_rotated(canvas, block.center, block.rotation, local_min, local_max, block.color, |p| {
            mask.sample(p.x - origin.x, p.y - origin.y)
        });
    }
}

fn rgba(color: Color, opacity: f64) -> [u8; 4] {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    [color.r, color.g, color.b, alpha]
}

/// Draw one text layer in its rotated frame.
pub fn draw_layer(canvas: &mut RgbaImage, layer: &TextLayer, painter: &mut dyn TextPainter) {
    let block = TextBlock {
        center: layer.center(),
        rotation: layer.rotation,
        width: layer.width,
        font_family: &layer.font_family,
        font_size: layer.font_size,
        align: layer.text_align,
        color: rgba(layer.color, layer.opacity),
    };
    draw_text_block(canvas, &block, layer.lines(), painter);
}

/// Outline, corner handles and (optionally) the rotate handle.
fn draw_selection(canvas: &mut RgbaImage, layer: &TextLayer, style: &OverlayStyle) {
    let center = layer.center();
    let rotation = layer.rotation;
    let (hw, hh) = layer.half_extents();
    let half_stroke = SELECTION_STROKE / 2.0;

    raster::paint_rotated(
        canvas,
        center,
        rotation,
        Point::new(-hw - half_stroke, -hh - half_stroke),
        Point::new(hw + half_stroke, hh + half_stroke),
        SELECTION_COLOR,
        |p| {
            let on_vertical = (p.x.abs() - hw).abs() <= half_stroke;
            let on_horizontal = (p.y.abs() - hh).abs() <= half_stroke;
            if on_vertical || on_horizontal {
                1.0
            } else {
                0.0
            }
        },
    );

    let half_handle = style.handle_size / 2.0;
    for handle in Handle::CORNERS {
        let c = handle.local_offset(hw, hh);
        raster::paint_rotated(
            canvas,
            center,
            rotation,
            Point::new(c.x - half_handle, c.y - half_handle),
            Point::new(c.x + half_handle, c.y + half_handle),
            SELECTION_COLOR,
            |_| 1.0,
        );
    }

    if style.rotate_handle {
        let knob = Point::new(0.0, -hh - ROTATE_HANDLE_OFFSET);
        raster::paint_rotated(
            canvas,
            center,
            rotation,
            Point::new(knob.x - ROTATE_HANDLE_RADIUS, knob.y - ROTATE_HANDLE_RADIUS),
            Point::new(knob.x + ROTATE_HANDLE_RADIUS, knob.y + ROTATE_HANDLE_RADIUS),
            SELECTION_COLOR,
            |p| if p.distance(knob) <= ROTATE_HANDLE_RADIUS { 1.0 } else { 0.0 },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layer::LayerId;
    use crate::render::text::testing::BlockPainter;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    /// Red background, with a green subject covering the left half.
    fn pair(width: u32, height: u32) -> ImagePair {
        let background = RgbaImage::from_pixel(width, height, RED);
        let mut subject = RgbaImage::new(width, height);
        for y in 0..height {
            for x in 0..width / 2 {
                subject.put_pixel(x, y, GREEN);
            }
        }
        ImagePair::new(background, subject)
    }

    /// A black single-character layer whose block spans x 90..110, y 30..70.
    fn layer(id: u64, z: usize, behind: bool) -> TextLayer {
        let mut layer = TextLayer::new(LayerId(id), z);
        layer.content = "X".to_string();
        layer.font_size = 40.0;
        layer.x = 80.0;
        layer.y = 30.0;
        layer.width = 40.0;
        layer.height = 40.0;
        layer.is_behind_person = behind;
        layer
    }

    fn ready_compositor() -> Compositor {
        let mut compositor = Compositor::new((200, 100), Theme::Light);
        compositor.set_images(Some(&pair(200, 100)));
        compositor
    }

    fn scene<'a>(layers: &'a [TextLayer], status: &'a ImageStatus) -> Scene<'a> {
        Scene {
            layers,
            selected: None,
            status,
            overlay: None,
        }
    }

    #[test]
    fn test_subject_occludes_behind_layers() {
        let compositor = ready_compositor();
        let status = ImageStatus::Ready;
        let layers = vec![layer(1, 0, true)];
        let frame = compositor.render(&scene(&layers, &status), &mut BlockPainter);

        // Left of center the subject covers the text; right of it the text shows.
        assert_eq!(frame.get_pixel(95, 50), &GREEN);
        assert_eq!(frame.get_pixel(105, 50), &Rgba([0, 0, 0, 255]));
        assert_eq!(frame.get_pixel(150, 50), &RED);
    }

    #[test]
    fn test_front_layers_draw_over_subject() {
        let compositor = ready_compositor();
        let status = ImageStatus::Ready;
        let layers = vec![layer(1, 0, false)];
        let frame = compositor.render(&scene(&layers, &status), &mut BlockPainter);
        assert_eq!(frame.get_pixel(95, 50), &Rgba([0, 0, 0, 255]));
        assert_eq!(frame.get_pixel(105, 50), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_higher_z_index_draws_on_top() {
        let compositor = ready_compositor();
        let status = ImageStatus::Ready;
        let mut white = layer(2, 1, false);
        white.color = Color::WHITE;
        let layers = vec![white.clone(), layer(1, 0, false)];
        let frame = compositor.render(&scene(&layers, &status), &mut BlockPainter);
        assert_eq!(frame.get_pixel(105, 50), &Rgba([255, 255, 255, 255]));

        // A front layer beats a behind layer regardless of z-index.
        let mut behind_top = layer(3, 5, true);
        behind_top.color = Color::WHITE;
        let layers = vec![behind_top, layer(1, 0, false)];
        let frame = compositor.render(&scene(&layers, &status), &mut BlockPainter);
        assert_eq!(frame.get_pixel(105, 50), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_opacity_blends_text() {
        let compositor = ready_compositor();
        let status = ImageStatus::Ready;
        let mut faint = layer(1, 0, false);
        faint.opacity = 0.0;
        let layers = vec![faint];
        let frame = compositor.render(&scene(&layers, &status), &mut BlockPainter);
        assert_eq!(frame.get_pixel(105, 50), &RED);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let compositor = ready_compositor();
        let status = ImageStatus::Ready;
        let mut rotated = layer(1, 0, false);
        rotated.rotation = 33.0;
        rotated.content = "ab\ncde".to_string();
        rotated.opacity = 0.6;
        let layers = vec![rotated, layer(2, 1, true)];
        let mut s = scene(&layers, &status);
        s.selected = Some(LayerId(1));
        s.overlay = Some(OverlayStyle { handle_size: 8.0, rotate_handle: true });

        let a = compositor.render(&s, &mut BlockPainter);
        let b = compositor.render(&s, &mut BlockPainter);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_selection_overlay() {
        let compositor = ready_compositor();
        let status = ImageStatus::Ready;
        let mut selected = layer(1, 0, false);
        selected.content = String::new();
        let layers = vec![selected];
        let mut s = scene(&layers, &status);
        s.selected = Some(LayerId(1));
        s.overlay = Some(OverlayStyle { handle_size: 8.0, rotate_handle: true });
        let frame = compositor.render(&s, &mut BlockPainter);

        let blue = Rgba(SELECTION_COLOR);
        // Left edge of the outline, a corner handle and the rotate knob.
        assert_eq!(frame.get_pixel(80, 50), &blue);
        assert_eq!(frame.get_pixel(122, 72), &blue);
        assert_eq!(frame.get_pixel(100, 10), &blue);
        // Inside the box stays untouched.
        assert_eq!(frame.get_pixel(110, 50), &RED);

        s.overlay = Some(OverlayStyle { handle_size: 8.0, rotate_handle: false });
        let frame = compositor.render(&s, &mut BlockPainter);
        assert_eq!(frame.get_pixel(100, 10), &RED);

        s.overlay = None;
        let frame = compositor.render(&s, &mut BlockPainter);
        assert_eq!(frame.get_pixel(80, 50), &GREEN);
    }

    #[test]
    fn test_placeholder_until_ready() {
        let mut compositor = Compositor::new((300, 200), Theme::Light);
        compositor.set_images(Some(&pair(300, 200)));
        let layers = vec![layer(1, 0, false)];

        for status in [ImageStatus::Empty, ImageStatus::Loading, ImageStatus::Failed("x".into())] {
            let frame = compositor.render(&scene(&layers, &status), &mut BlockPainter);
            // Backdrop border and placeholder panel, no planes.
            assert_eq!(frame.get_pixel(10, 10), &Rgba(Theme::Light.backdrop()));
            assert_eq!(frame.get_pixel(60, 55), &Rgba(Theme::Light.placeholder().0));
        }

        let empty = Compositor::new((200, 100), Theme::Dark);
        let status = ImageStatus::Ready;
        let frame = empty.render(&scene(&layers, &status), &mut BlockPainter);
        assert_eq!(frame.get_pixel(10, 10), &Rgba(Theme::Dark.backdrop()));
    }

    #[test]
    fn test_line_layout() {
        let offsets = line_offsets(2, 10.0);
        assert_eq!(offsets, vec![-6.0, 6.0]);
        assert_eq!(line_offsets(1, 10.0), vec![0.0]);

        assert_eq!(line_start(TextAlign::Left, 100.0, 30.0), -50.0);
        assert_eq!(line_start(TextAlign::Center, 100.0, 30.0), -15.0);
        assert_eq!(line_start(TextAlign::Right, 100.0, 30.0), 20.0);
    }

    #[test]
    fn test_text_align_moves_ink() {
        let compositor = ready_compositor();
        let status = ImageStatus::Ready;
        let mut left = layer(1, 0, false);
        left.x = 120.0;
        left.width = 60.0;
        left.text_align = TextAlign::Left;
        let layers = vec![left.clone()];
        let frame = compositor.render(&scene(&layers, &status), &mut BlockPainter);
        assert_eq!(frame.get_pixel(125, 50), &Rgba([0, 0, 0, 255]));
        assert_eq!(frame.get_pixel(175, 50), &RED);

        left.text_align = TextAlign::Right;
        let layers = vec![left];
        let frame = compositor.render(&scene(&layers, &status), &mut BlockPainter);
        assert_eq!(frame.get_pixel(125, 50), &RED);
        assert_eq!(frame.get_pixel(175, 50), &Rgba([0, 0, 0, 255]));
    }
}
