// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the common layer and file operations.

/// Button pressed in the toolbar this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    OpenImages,
    AddText,
    DeleteSelected,
    Export,
}

/// Display the toolbar.
///
/// Layer operations are only enabled once the image pair is ready.
pub fn show(ui: &mut egui::Ui, images_ready: bool, has_selection: bool, status_text: &str) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("🖼 Open Images...").clicked() {
            action = ToolbarAction::OpenImages;
        }

        ui.separator();

        if ui.add_enabled(images_ready, egui::Button::new("➕ Add Text")).clicked() {
            action = ToolbarAction::AddText;
        }

        if ui
            .add_enabled(images_ready && has_selection, egui::Button::new("🗑 Delete"))
            .clicked()
        {
            action = ToolbarAction::DeleteSelected;
        }

        ui.separator();

        if ui.add_enabled(images_ready, egui::Button::new("💾 Export PNG...")).clicked() {
            action = ToolbarAction::Export;
        }

        ui.separator();

        ui.label(egui::RichText::new(status_text).italics().weak());
    });

    action
}
