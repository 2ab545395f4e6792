// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layer manager panel.
//!
//! Lists the text layers topmost first, with controls for selection,
//! depth group, stacking order and deletion.

use crate::models::layer::{LayerId, TextLayer};

/// Result of layer panel interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayersAction {
    None,
    Select(LayerId),
    ToggleBehind(LayerId),
    /// Swap with the previous list entry.
    MoveUp(LayerId),
    /// Swap with the next list entry.
    MoveDown(LayerId),
    Delete(LayerId),
}

/// Longest label shown for a layer before it is cut short.
const LABEL_CHARS: usize = 24;

/// Display the layer list.
pub fn show(ui: &mut egui::Ui, layers: &[TextLayer], selected: Option<LayerId>) -> LayersAction {
    let mut action = LayersAction::None;

    ui.heading("Layers");
    ui.separator();

    if layers.is_empty() {
        ui.label(egui::RichText::new("No text layers yet").weak());
        return action;
    }

    let last = layers.len() - 1;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, layer) in layers.iter().enumerate().rev() {
            ui.horizontal(|ui| {
                let is_selected = selected == Some(layer.id);
                if ui.selectable_label(is_selected, layer_label(layer)).clicked() {
                    action = LayersAction::Select(layer.id);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("🗑").on_hover_text("Delete layer").clicked() {
                        action = LayersAction::Delete(layer.id);
                    }
                    if ui
                        .add_enabled(index < last, egui::Button::new("⏶").small())
                        .on_hover_text("Bring forward")
                        .clicked()
                    {
                        action = LayersAction::MoveDown(layer.id);
                    }
                    if ui
                        .add_enabled(index > 0, egui::Button::new("⏷").small())
                        .on_hover_text("Send backward")
                        .clicked()
                    {
                        action = LayersAction::MoveUp(layer.id);
                    }

                    let (icon, hint) = if layer.is_behind_person {
                        ("👤", "Behind subject; click to bring in front")
                    } else {
                        ("🔤", "In front of subject; click to send behind")
                    };
                    if ui.small_button(icon).on_hover_text(hint).clicked() {
                        action = LayersAction::ToggleBehind(layer.id);
                    }
                });
            });
        }
    });

    action
}

fn layer_label(layer: &TextLayer) -> String {
    let first_line = layer.lines().next().unwrap_or_default();
    let mut label: String = first_line.chars().take(LABEL_CHARS).collect();
    if first_line.chars().count() > LABEL_CHARS {
        label.push('…');
    }
    if label.trim().is_empty() {
        label = layer.id.to_string();
    }
    label
}
