// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the layer store, the interaction engine, the pair
//! loader and the compositor to the egui panels. The composite is redrawn
//! into a texture only when something it depends on has changed.

use crate::config::{DeviceClass, EngineConfig, Theme};
use crate::engine::coords::CanvasFrame;
use crate::engine::interaction::{EngineEffect, InteractionEngine};
use crate::engine::loader::{JoinEvent, PairLoader};
use crate::models::images::{ImagePair, ImageStatus};
use crate::models::project::Project;
use crate::render::compositor::{Compositor, OverlayStyle, Scene};
use crate::render::export::render_full_resolution;
use crate::render::text::{FontBook, TextPainter};
use crate::ui::{canvas, layers, properties, toolbar};
use std::path::PathBuf;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "tiff"];

/// Main application state.
pub struct TextBehindApp {
    config: EngineConfig,

    /// Text layers and the current selection
    project: Project,

    /// Pointer gesture state machine
    engine: InteractionEngine,

    /// Background decoder for the two image planes
    loader: PairLoader,

    /// Decoded planes, once both are available
    images: Option<ImagePair>,

    status: ImageStatus,

    /// Logical canvas size and its relation to the original images
    frame: CanvasFrame,

    compositor: Compositor,

    fonts: FontBook,

    /// Live composite shown on the canvas
    texture: Option<egui::TextureHandle>,

    /// Set whenever the composite must be redrawn
    dirty: bool,

    /// Screen units per logical unit at the last layout
    client_per_logical: f64,

    /// Last error worth showing to the user
    notice: Option<String>,
}

impl Default for TextBehindApp {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TextBehindApp {
    /// Create a new application instance.
    pub fn new(config: EngineConfig) -> Self {
        let (width, height) = config.default_canvas;
        let frame = CanvasFrame::unscaled(width, height);
        Self {
            engine: InteractionEngine::new(config.capabilities()),
            compositor: Compositor::new(frame.size(), config.theme),
            config,
            project: Project::new(),
            loader: PairLoader::new(),
            images: None,
            status: ImageStatus::Empty,
            frame,
            fonts: FontBook::new(),
            texture: None,
            dirty: true,
            client_per_logical: 1.0,
            notice: None,
        }
    }

    fn images_ready(&self) -> bool {
        self.status == ImageStatus::Ready && self.images.is_some()
    }

    /// Ask for both planes and start decoding them.
    fn open_images(&mut self) {
        let Some(background) = pick_image("Choose the background image") else {
            return;
        };
        let Some(subject) = pick_image("Choose the subject cutout (transparent PNG)") else {
            return;
        };
        self.start_loading(background, subject);
    }

    fn start_loading(&mut self, background: PathBuf, subject: PathBuf) {
        // A new upload starts from a clean slate.
        self.project.clear();
        self.engine.pointer_cancel();
        self.images = None;
        self.compositor.set_images(None);
        self.status = ImageStatus::Loading;
        self.notice = None;
        self.loader.start(background, subject);
        self.dirty = true;
    }

    fn poll_loader(&mut self) {
        match self.loader.poll() {
            Some(JoinEvent::Ready(pair)) => {
                let (width, height) = pair.original_dimensions();
                self.frame = CanvasFrame::fit(width, height, self.config.capabilities().max_canvas_dimension);
                self.compositor = Compositor::new(self.frame.size(), self.config.theme);
                self.compositor.set_images(Some(&pair));
                self.images = Some(pair);
                self.status = ImageStatus::Ready;
                log::info!(
                    "Image pair ready: {}x{} drawn at {}x{}",
                    width,
                    height,
                    self.frame.width,
                    self.frame.height
                );
                self.dirty = true;
            }
            Some(JoinEvent::Failed(message)) => {
                log::error!("Failed to load image pair: {}", message);
                self.images = None;
                self.compositor.set_images(None);
                self.status = ImageStatus::Failed(message.clone());
                self.notice = Some(message);
                self.dirty = true;
            }
            Some(JoinEvent::Pending) | Some(JoinEvent::Stale) | None => {}
        }
    }

    /// Switch device class; the canvas is re-fitted and layers follow it.
    fn set_device_class(&mut self, device_class: DeviceClass) {
        if self.config.device_class == device_class {
            return;
        }
        self.config.device_class = device_class;
        let capabilities = self.config.capabilities();
        self.engine.set_capabilities(capabilities);

        if let Some(pair) = &self.images {
            let (width, height) = pair.original_dimensions();
            let frame = CanvasFrame::fit(width, height, capabilities.max_canvas_dimension);
            self.project.rescale(frame.display_scale / self.frame.display_scale);
            self.frame = frame;
            self.compositor = Compositor::new(frame.size(), self.config.theme);
            self.compositor.set_images(Some(pair));
        }
        log::info!("Device class set to {:?}", device_class);
        self.dirty = true;
    }

    fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
        self.compositor.set_theme(theme);
        self.dirty = true;
    }

    fn apply_effect(&mut self, effect: EngineEffect) {
        effect.apply_to(&mut self.project);
        self.dirty = true;
    }

    /// New layers keep the default 200x60 box until their text is edited.
    fn add_text(&mut self) {
        self.project.add_layer();
        self.dirty = true;
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.project.selected_id() {
            self.engine.pointer_cancel();
            self.project.delete_layer(id);
            self.dirty = true;
        }
    }

    /// Render at the original resolution and write a PNG.
    fn export(&mut self) {
        let Some(pair) = &self.images else {
            log::warn!("Export requested before images were ready");
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(self.config.export_file_name.as_str())
            .save_file()
        else {
            return;
        };

        let image = render_full_resolution(
            pair,
            &self.frame,
            self.project.layers(),
            self.config.theme,
            &mut self.fonts,
        );
        match crate::io::media::save_png(&image, &path) {
            Ok(()) => log::info!("Exported composite to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export composite: {:#}", e);
                self.notice = Some(format!("Export failed: {:#}", e));
            }
        }
    }

    fn status_text(&self) -> String {
        match &self.status {
            ImageStatus::Ready => format!(
                "{}x{} · {} layer(s)",
                self.frame.original_width,
                self.frame.original_height,
                self.project.layers().len()
            ),
            status => status.placeholder_message().unwrap_or_default().to_string(),
        }
    }

    /// Redraw the composite into the canvas texture.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let capabilities = self.engine.capabilities();
        let scene = Scene {
            layers: self.project.layers(),
            selected: self.project.selected_id(),
            status: &self.status,
            overlay: Some(OverlayStyle {
                handle_size: self.engine.to_logical_distance(capabilities.handle_size),
                rotate_handle: capabilities.rotate_handle,
            }),
        };
        let composite = self.compositor.render(&scene, &mut self.fonts);

        let size = [composite.width() as usize, composite.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, composite.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("composite", color_image, egui::TextureOptions::LINEAR));
            }
        }
        self.dirty = false;
    }

    fn handle_layers_action(&mut self, action: layers::LayersAction) {
        use layers::LayersAction;

        let changed = match action {
            LayersAction::Select(id) => {
                self.project.select_layer(Some(id));
                true
            }
            LayersAction::ToggleBehind(id) => self.project.toggle_behind_person(id),
            LayersAction::MoveUp(id) => self.project.move_layer_up(id),
            LayersAction::MoveDown(id) => self.project.move_layer_down(id),
            LayersAction::Delete(id) => {
                self.engine.pointer_cancel();
                self.project.delete_layer(id)
            }
            LayersAction::None => false,
        };
        self.dirty |= changed;
    }

    fn handle_pointer(&mut self, event: canvas::PointerEvent) {
        match event {
            canvas::PointerEvent::Down(point) => {
                let effect = self
                    .engine
                    .pointer_down(point, self.project.layers(), self.project.selected_id());
                if let Some(effect) = effect {
                    self.apply_effect(effect);
                }
            }
            canvas::PointerEvent::Move(point) => {
                if let Some(effect) = self.engine.pointer_move(point) {
                    self.apply_effect(effect);
                }
            }
            canvas::PointerEvent::Up => self.engine.pointer_up(),
            canvas::PointerEvent::Cancel => self.engine.pointer_cancel(),
        }
    }
}

fn pick_image(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
}

impl eframe::App for TextBehindApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader();

        // Keep polling while planes decode
        if self.status == ImageStatus::Loading {
            ctx.request_repaint();
        }

        let images_ready = self.images_ready();
        let has_selection = self.project.selected_id().is_some();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Images...").clicked() {
                        ui.close_menu();
                        self.open_images();
                    }
                    if ui.add_enabled(images_ready, egui::Button::new("Export PNG...")).clicked() {
                        ui.close_menu();
                        self.export();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.add_enabled(images_ready, egui::Button::new("Add Text")).clicked() {
                        self.add_text();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected (Del)"))
                        .clicked()
                    {
                        self.delete_selected();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut theme = self.config.theme;
                    ui.radio_value(&mut theme, Theme::Light, "Light canvas");
                    ui.radio_value(&mut theme, Theme::Dark, "Dark canvas");
                    if theme != self.config.theme {
                        self.set_theme(theme);
                    }

                    ui.separator();

                    let mut device_class = self.config.device_class;
                    ui.radio_value(&mut device_class, DeviceClass::Desktop, "Desktop input");
                    ui.radio_value(&mut device_class, DeviceClass::Touch, "Touch input");
                    if device_class != self.config.device_class {
                        self.set_device_class(device_class);
                    }
                });
            });
        });

        // Toolbar
        let status_text = self.status_text();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, images_ready, has_selection, &status_text))
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::OpenImages => self.open_images(),
            toolbar::ToolbarAction::AddText => self.add_text(),
            toolbar::ToolbarAction::DeleteSelected => self.delete_selected(),
            toolbar::ToolbarAction::Export => self.export(),
            toolbar::ToolbarAction::None => {}
        }

        if let Some(message) = self.notice.clone() {
            egui::TopBottomPanel::bottom("notice").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(ui.visuals().error_fg_color, message);
                    if ui.small_button("✖").clicked() {
                        self.notice = None;
                    }
                });
            });
        }

        // Layer manager (left side)
        let layers_action = egui::SidePanel::left("layers")
            .default_width(220.0)
            .show(ctx, |ui| {
                layers::show(ui, self.project.layers(), self.project.selected_id())
            })
            .inner;
        self.handle_layers_action(layers_action);

        // Properties panel (right side)
        let patch = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| properties::show(ui, self.project.selected_layer()))
            .inner;
        if let (Some(patch), Some(id)) = (patch, self.project.selected_id()) {
            self.project.update_layer(id, &patch);
            if patch.affects_text_metrics() {
                let fonts = &mut self.fonts;
                self.project
                    .fit_box_to_text(id, |layer, line| fonts.measure(&layer.font_family, layer.font_size, line));
            }
            self.dirty = true;
        }

        // Only process shortcuts if no text field is focused
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
                self.delete_selected();
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.engine.pointer_cancel();
                self.project.select_layer(None);
                self.dirty = true;
            }
        }

        // Redraw before the canvas shows the texture
        if self.dirty || self.texture.is_none() {
            self.refresh_texture(ctx);
        }

        // Main canvas (center)
        let logical_size = self.compositor.size();
        let state = self.engine.state();
        let input = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, &self.texture, logical_size, state))
            .inner;
        if let Some(scale) = input.client_per_logical {
            if (scale - self.client_per_logical).abs() > f64::EPSILON {
                self.client_per_logical = scale;
                self.engine.set_client_scale(scale);
                // Handles are drawn at a fixed on-screen size.
                self.dirty = true;
                ctx.request_repaint();
            }
        }
        if !input.events.is_empty() {
            for event in input.events {
                self.handle_pointer(event);
            }
            if self.dirty {
                ctx.request_repaint();
            }
        }
    }
}
