// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! This module owns the ordered text layer list and the current selection.
//! It is the single place layers are mutated; the interaction engine and the
//! property panels only hand it `LayerPatch` records.

use super::layer::{LayerId, LayerPatch, TextLayer};

/// Padding added around measured text when the box is re-derived.
const FIT_PADDING: f64 = 16.0;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// The layer store: ordered layers plus the selected id.
#[derive(Debug, Clone, Default)]
pub struct Project {
    layers: Vec<TextLayer>,
    selected: Option<LayerId>,
    next_id: u64,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// The selected id, if it still names a layer in the list.
    pub fn selected_id(&self) -> Option<LayerId> {
        self.selected_layer().map(|l| l.id)
    }

    pub fn selected_layer(&self) -> Option<&TextLayer> {
        self.selected.and_then(|id| self.layer(id))
    }

    pub fn select_layer(&mut self, id: Option<LayerId>) {
        self.selected = id;
    }

    /// Add a default text layer on top of the list and select it.
    pub fn add_layer(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        let layer = TextLayer::new(id, self.layers.len());
        self.layers.push(layer);
        self.selected = Some(id);
        log::info!("Added layer {}, total: {}", id, self.layers.len());
        id
    }

    /// Apply a sparse patch. Returns false for unknown ids.
    pub fn update_layer(&mut self, id: LayerId, patch: &LayerPatch) -> bool {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                patch.apply(layer);
                true
            }
            None => {
                log::debug!("Ignoring update for missing layer {}", id);
                false
            }
        }
    }

    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        let Some(index) = self.layers.iter().position(|l| l.id == id) else {
            return false;
        };
        self.layers.remove(index);
        self.renumber();
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::info!("Deleted layer {}, total: {}", id, self.layers.len());
        true
    }

    /// Swap the layer with its predecessor in list order (one step towards
    /// the bottom of the stack).
    pub fn move_layer_up(&mut self, id: LayerId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.layers.swap(index, index - 1);
                self.renumber();
                true
            }
            _ => false,
        }
    }

    /// Swap the layer with its successor in list order (one step towards
    /// the top of the stack).
    pub fn move_layer_down(&mut self, id: LayerId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.layers.len() => {
                self.layers.swap(index, index + 1);
                self.renumber();
                true
            }
            _ => false,
        }
    }

    pub fn toggle_behind_person(&mut self, id: LayerId) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        layer.is_behind_person = !layer.is_behind_person;
        log::info!(
            "Layer {} now {} subject",
            id,
            if layer.is_behind_person { "behind" } else { "in front of" }
        );
        true
    }

    /// Re-derive the box size from the text after a content or font edit.
    ///
    /// `measure_line` returns the advance width of one line of the layer's
    /// text in logical units. The box keeps its center.
    pub fn fit_box_to_text<F>(&mut self, id: LayerId, mut measure_line: F) -> bool
    where
        F: FnMut(&TextLayer, &str) -> f64,
    {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        let snapshot = layer.clone();
        let widest = snapshot
            .lines()
            .map(|line| measure_line(&snapshot, line))
            .fold(0.0_f64, f64::max);
        let line_count = snapshot.lines().count() as f64;

        let center = snapshot.center();
        let width = widest + FIT_PADDING;
        let height = line_count * snapshot.font_size * LINE_HEIGHT + FIT_PADDING;
        layer.width = width;
        layer.height = height;
        layer.x = center.x - width / 2.0;
        layer.y = center.y - height / 2.0;
        true
    }

    /// Scale every layer's geometry and font size, e.g. when the canvas is
    /// re-fitted for another device class.
    pub fn rescale(&mut self, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) || factor == 1.0 {
            return;
        }
        for layer in &mut self.layers {
            *layer = layer.scaled(factor);
        }
        log::debug!("Rescaled {} layers by {:.3}", self.layers.len(), factor);
    }

    /// Drop every layer and the selection. Ids keep counting up.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.selected = None;
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn renumber(&mut self) {
        for (index, layer) in self.layers.iter_mut().enumerate() {
            layer.z_index = index;
        }
    }
}
