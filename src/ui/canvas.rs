// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas view for the live composite.
//!
//! This module displays the composite texture fitted into the available
//! space and turns raw egui pointer input into logical-canvas pointer
//! events for the interaction engine.

use crate::engine::coords::{fit_display, CoordinateMapper};
use crate::engine::interaction::InteractionState;
use crate::models::layer::Point;
use crate::util::geometry::Handle;

/// Pointer input translated into logical canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Cancel,
}

/// What the canvas reports back each frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasInput {
    pub events: Vec<PointerEvent>,
    /// Screen units per logical unit, once the canvas has been laid out.
    pub client_per_logical: Option<f64>,
}

/// The slice of egui pointer state the canvas reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    pub pressed: bool,
    pub released: bool,
    pub down: bool,
    pub moving: bool,
    pub interact_pos: Option<egui::Pos2>,
    pub latest_pos: Option<egui::Pos2>,
    pub touch_cancelled: bool,
}

impl PointerFrame {
    fn read(ui: &egui::Ui) -> Self {
        ui.input(|i| Self {
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
            down: i.pointer.primary_down(),
            moving: i.pointer.is_moving(),
            interact_pos: i.pointer.interact_pos(),
            latest_pos: i.pointer.latest_pos(),
            touch_cancelled: i.events.iter().any(|event| {
                matches!(
                    event,
                    egui::Event::Touch {
                        phase: egui::TouchPhase::Cancel,
                        ..
                    }
                )
            }),
        })
    }
}

/// Display the composite and collect pointer events for this frame.
///
/// Moves, releases and leaving the image are only reported while `state`
/// is not idle.
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    logical_size: (u32, u32),
    state: InteractionState,
) -> CanvasInput {
    let interacting = state != InteractionState::Idle;
    let mut input = CanvasInput::default();
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let Some(texture) = texture else {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        };

        let available = ui.available_size();
        let (offset, (display_width, display_height)) =
            fit_display(logical_size, (available.x as f64, available.y as f64));

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(offset.x as f32, offset.y as f32),
            egui::vec2(display_width as f32, display_height as f32),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Claim the drag so the surrounding panel doesn't scroll or select.
        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
        if interacting || response.hovered() {
            ui.ctx().set_cursor_icon(cursor_for(state));
        }

        let mapper = CoordinateMapper::new(
            Point::new(image_rect.min.x as f64, image_rect.min.y as f64),
            (image_rect.width() as f64, image_rect.height() as f64),
            logical_size,
        );
        input.client_per_logical = Some(mapper.client_per_logical());
        input.events = pointer_events(&PointerFrame::read(ui), &image_rect, &mapper, interacting);
    });

    input
}

fn cursor_for(state: InteractionState) -> egui::CursorIcon {
    match state {
        InteractionState::Idle => egui::CursorIcon::Crosshair,
        InteractionState::Moving => egui::CursorIcon::Grabbing,
        InteractionState::Resizing(Handle::TopLeft | Handle::BottomRight) => {
            egui::CursorIcon::ResizeNwSe
        }
        InteractionState::Resizing(_) => egui::CursorIcon::ResizeNeSw,
        InteractionState::Rotating => egui::CursorIcon::Alias,
    }
}

/// Translate one frame of pointer state into canvas events.
pub fn pointer_events(
    frame: &PointerFrame,
    image_rect: &egui::Rect,
    mapper: &CoordinateMapper,
    interacting: bool,
) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    let to_logical = |pos: egui::Pos2| mapper.to_logical(Point::new(pos.x as f64, pos.y as f64));

    if frame.pressed {
        if let Some(pos) = frame.interact_pos.filter(|pos| image_rect.contains(*pos)) {
            events.push(PointerEvent::Down(to_logical(pos)));
            // A quick click or tap can press and release within one frame.
            if frame.released {
                events.push(PointerEvent::Up);
            }
        }
        return events;
    }

    if !interacting {
        return events;
    }

    if frame.touch_cancelled {
        events.push(PointerEvent::Cancel);
        return events;
    }

    match frame.latest_pos {
        Some(pos) if image_rect.contains(pos) => {
            if frame.moving && frame.down {
                events.push(PointerEvent::Move(to_logical(pos)));
            }
        }
        // Leaving the image ends the gesture.
        _ => {
            events.push(PointerEvent::Cancel);
            return events;
        }
    }

    if frame.released {
        events.push(PointerEvent::Up);
    }
    events
}
