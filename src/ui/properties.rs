// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text properties panel.
//!
//! This module provides the panel for editing the selected text layer:
//! content, typography, color, opacity, rotation, geometry and whether the
//! text sits behind the subject. Edits come back as a `LayerPatch` holding
//! only the fields that changed.

use crate::models::layer::{normalize_degrees, Color, LayerPatch, TextAlign, TextLayer};

/// Font families offered in the picker.
pub const FONT_FAMILIES: [&str; 10] = [
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
    "Verdana",
    "Comic Sans MS",
    "Impact",
    "Trebuchet MS",
    "Arial Black",
    "Courier New",
];

/// Swatches shown under the color picker.
pub const PRESET_COLORS: [&str; 8] = [
    "#000000", "#ffffff", "#ef4444", "#22c55e", "#3b82f6", "#eab308", "#8b5cf6", "#ec4899",
];

pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<f64> = 12.0..=200.0;
pub const ROTATION_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Display the editor for `layer`, or a hint when nothing is selected.
pub fn show(ui: &mut egui::Ui, layer: Option<&TextLayer>) -> Option<LayerPatch> {
    ui.heading("Text Properties");
    ui.separator();

    let Some(layer) = layer else {
        ui.label(egui::RichText::new("Select a text layer to edit it").weak());
        return None;
    };

    let mut edited = layer.clone();
    // Sliders show the wrapped angle; untouched values are left alone below.
    edited.rotation = normalize_degrees(layer.rotation);

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.label("Text");
        ui.add(
            egui::TextEdit::multiline(&mut edited.content)
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);

        egui::Grid::new("typography")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Font");
                egui::ComboBox::from_id_source("font_family")
                    .selected_text(edited.font_family.as_str())
                    .show_ui(ui, |ui| {
                        for family in FONT_FAMILIES {
                            ui.selectable_value(&mut edited.font_family, family.to_string(), family);
                        }
                    });
                ui.end_row();

                ui.label("Size");
                ui.add(egui::Slider::new(&mut edited.font_size, FONT_SIZE_RANGE).integer());
                ui.end_row();

                ui.label("Align");
                ui.horizontal(|ui| {
                    for align in TextAlign::ALL {
                        ui.selectable_value(&mut edited.text_align, align, align.label());
                    }
                });
                ui.end_row();

                ui.label("Color");
                ui.horizontal(|ui| {
                    let mut rgb = edited.color.to_array();
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        edited.color = Color::from(rgb);
                    }
                    ui.label(egui::RichText::new(edited.color.to_hex()).monospace());
                });
                ui.end_row();

                ui.label("");
                ui.horizontal_wrapped(|ui| {
                    for hex in PRESET_COLORS {
                        if let Some(color) = Color::from_hex(hex) {
                            if swatch(ui, color, edited.color == color).clicked() {
                                edited.color = color;
                            }
                        }
                    }
                });
                ui.end_row();

                ui.label("Opacity");
                ui.add(egui::Slider::new(&mut edited.opacity, 0.0..=1.0).fixed_decimals(2));
                ui.end_row();

                ui.label("Rotation");
                ui.add(egui::Slider::new(&mut edited.rotation, ROTATION_RANGE).suffix("°").fixed_decimals(0));
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.separator();
        ui.label("Position & Size");

        egui::Grid::new("geometry")
            .num_columns(4)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("X");
                ui.add(egui::DragValue::new(&mut edited.x).speed(1.0).fixed_decimals(0));
                ui.label("Y");
                ui.add(egui::DragValue::new(&mut edited.y).speed(1.0).fixed_decimals(0));
                ui.end_row();

                ui.label("W");
                ui.add(egui::DragValue::new(&mut edited.width).speed(1.0).range(1.0..=f64::MAX).fixed_decimals(0));
                ui.label("H");
                ui.add(egui::DragValue::new(&mut edited.height).speed(1.0).range(1.0..=f64::MAX).fixed_decimals(0));
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.separator();
        ui.checkbox(&mut edited.is_behind_person, "Place text behind subject");
    });

    let mut patch = diff(layer, &edited);
    // Don't rewrite an unwrapped angle just because it was displayed wrapped.
    if patch.rotation == Some(normalize_degrees(layer.rotation)) {
        patch.rotation = None;
    }
    (!patch.is_empty()).then_some(patch)
}

/// Patch that turns `before` into `after`.
pub fn diff(before: &TextLayer, after: &TextLayer) -> LayerPatch {
    fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
        (a != b).then(|| b.clone())
    }

    LayerPatch {
        content: changed(&before.content, &after.content),
        x: changed(&before.x, &after.x),
        y: changed(&before.y, &after.y),
        width: changed(&before.width, &after.width),
        height: changed(&before.height, &after.height),
        font_size: changed(&before.font_size, &after.font_size),
        font_family: changed(&before.font_family, &after.font_family),
        color: changed(&before.color, &after.color),
        opacity: changed(&before.opacity, &after.opacity),
        rotation: changed(&before.rotation, &after.rotation),
        is_behind_person: changed(&before.is_behind_person, &after.is_behind_person),
        text_align: changed(&before.text_align, &after.text_align),
    }
}

fn swatch(ui: &mut egui::Ui, color: Color, selected: bool) -> egui::Response {
    let size = egui::vec2(18.0, 18.0);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let [r, g, b] = color.to_array();
    let painter = ui.painter();
    painter.rect_filled(rect, 3.0, egui::Color32::from_rgb(r, g, b));
    let stroke = if selected {
        egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
    } else {
        egui::Stroke::new(1.0, egui::Color32::from_gray(120))
    };
    painter.rect_stroke(rect, 3.0, stroke);
    response.on_hover_text(color.to_hex())
}
