// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer interaction state machine.
//!
//! Turns pointer-down/move/up events (mouse or touch, already mapped to
//! logical canvas units) into selection changes and layer patches. The
//! engine never owns the layer list: it reads the caller's layers on
//! pointer-down, keeps a snapshot of the grabbed layer, and computes every
//! pointer-move from that snapshot so small deltas never accumulate drift.

use crate::config::InputCapabilities;
use crate::models::layer::{stacking_order, LayerId, LayerPatch, Point, TextLayer};
use crate::models::project::Project;
use crate::util::geometry::{
    handle_coordinates, hit_test_handle, point_in_layer, resize_from_handle, rotate_from_pointer,
    Handle,
};

/// Font size floor while drag-resizing.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Moving,
    Resizing(Handle),
    Rotating,
}

/// State captured at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSnapshot {
    pub start: Point,
    pub layer: TextLayer,
    /// Opposite-corner position for resizes.
    pub anchor: Point,
}

/// Effect the engine asks the layer store to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEffect {
    SelectLayer(Option<LayerId>),
    UpdateLayer(LayerId, LayerPatch),
}

impl EngineEffect {
    /// Hand the effect to the store.
    pub fn apply_to(&self, project: &mut Project) {
        match self {
            EngineEffect::SelectLayer(id) => project.select_layer(*id),
            EngineEffect::UpdateLayer(id, patch) => {
                project.update_layer(*id, patch);
            }
        }
    }
}

/// Drives one pointer interaction at a time.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    capabilities: InputCapabilities,
    /// Screen units per logical canvas unit.
    client_per_logical: f64,
    state: InteractionState,
    snapshot: Option<InteractionSnapshot>,
}

impl InteractionEngine {
    pub fn new(capabilities: InputCapabilities) -> Self {
        Self {
            capabilities,
            client_per_logical: 1.0,
            state: InteractionState::Idle,
            snapshot: None,
        }
    }

    pub fn capabilities(&self) -> &InputCapabilities {
        &self.capabilities
    }

    pub fn set_capabilities(&mut self, capabilities: InputCapabilities) {
        self.capabilities = capabilities;
    }

    /// Set how many screen units one logical unit spans, so handle reach
    /// and hit tolerance stay the same size on screen.
    pub fn set_client_scale(&mut self, client_per_logical: f64) {
        if client_per_logical.is_finite() && client_per_logical > 0.0 {
            self.client_per_logical = client_per_logical;
        }
    }

    /// Convert a screen-unit distance to logical units.
    pub fn to_logical_distance(&self, screen: f64) -> f64 {
        screen / self.client_per_logical
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != InteractionState::Idle
    }

    /// Classify a pointer-down.
    ///
    /// Handles of the selected layer win over body hits. Bodies are tested
    /// from the topmost drawn layer down. A miss clears the selection.
    pub fn pointer_down(
        &mut self,
        point: Point,
        layers: &[TextLayer],
        selected: Option<LayerId>,
    ) -> Option<EngineEffect> {
        self.reset();

        if let Some(layer) = selected.and_then(|id| layers.iter().find(|l| l.id == id)) {
            if let Some(handle) = self.grabbed_handle(point, layer) {
                let anchor = handle_coordinates(handle.opposite(), layer);
                self.state = if handle.is_corner() {
                    InteractionState::Resizing(handle)
                } else {
                    InteractionState::Rotating
                };
                self.snapshot = Some(InteractionSnapshot {
                    start: point,
                    layer: layer.clone(),
                    anchor,
                });
                log::debug!("Grabbed {:?} handle of layer {}", handle, layer.id);
                return None;
            }
        }

        let tolerance = self.to_logical_distance(self.capabilities.hit_tolerance);
        let hit = stacking_order(layers)
            .into_iter()
            .rev()
            .find(|layer| point_in_layer(point, layer, tolerance));

        match hit {
            Some(layer) => {
                self.state = InteractionState::Moving;
                self.snapshot = Some(InteractionSnapshot {
                    start: point,
                    layer: layer.clone(),
                    anchor: layer.center(),
                });
                Some(EngineEffect::SelectLayer(Some(layer.id)))
            }
            None => Some(EngineEffect::SelectLayer(None)),
        }
    }

    /// Geometry update for the in-progress interaction, if any.
    pub fn pointer_move(&mut self, point: Point) -> Option<EngineEffect> {
        let snapshot = self.snapshot.as_ref()?;
        let start = &snapshot.layer;

        let patch = match self.state {
            InteractionState::Idle => return None,
            InteractionState::Moving => LayerPatch::position(
                start.x + (point.x - snapshot.start.x),
                start.y + (point.y - snapshot.start.y),
            ),
            InteractionState::Resizing(handle) => {
                let r = resize_from_handle(handle, snapshot.anchor, point, start.rotation);
                let old_area = start.width * start.height;
                let new_area = r.width * r.height;
                let font_size = if old_area > 0.0 {
                    (start.font_size * (new_area / old_area).sqrt()).max(MIN_FONT_SIZE)
                } else {
                    start.font_size
                };
                LayerPatch {
                    x: Some(r.x),
                    y: Some(r.y),
                    width: Some(r.width),
                    height: Some(r.height),
                    font_size: Some(font_size),
                    ..Default::default()
                }
            }
            InteractionState::Rotating => {
                let delta = rotate_from_pointer(start.center(), snapshot.start, point);
                LayerPatch::rotation(start.rotation + delta)
            }
        };

        Some(EngineEffect::UpdateLayer(start.id, patch))
    }

    /// End the interaction.
    pub fn pointer_up(&mut self) {
        self.reset();
    }

    /// Abort the interaction (pointer left the canvas, touch cancelled).
    pub fn pointer_cancel(&mut self) {
        if self.is_active() {
            log::debug!("Interaction cancelled in state {:?}", self.state);
        }
        self.reset();
    }

    fn grabbed_handle(&self, point: Point, layer: &TextLayer) -> Option<Handle> {
        let radius = self.to_logical_distance(self.capabilities.handle_radius);
        match hit_test_handle(point, layer, radius)? {
            Handle::Rotate if !self.capabilities.rotate_handle => None,
            handle => Some(handle),
        }
    }

    fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.snapshot = None;
    }
}
