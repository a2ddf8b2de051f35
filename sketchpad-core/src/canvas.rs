//! # Canvas
//!
//! Owns every layer, their stacking order, and the single selection slot. Layers never hold a
//! reference back to the canvas - instead, the part of the canvas they need (selection and z-order)
//! is lent to them for the duration of each gesture delivery.

use crate::drawable::Drawable;
use crate::gesture::{Gesture, GestureKind};
use crate::layer::{GestureOutcome, LayerID, SketchLayer};
use crate::selection::{Selection, SelectionRegistry};
use crate::util::{Rect, RectError};

/// Stacking control, as needed by layers under active manipulation.
pub trait Container {
    /// Reorder so `layer` renders above all of its siblings.
    fn bring_to_front(&mut self, layer: LayerID);
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetError {
    #[error("layer {0} not found")]
    TargetNotFound(LayerID),
}

/// The state shared between sibling layers.
#[derive(Default, Debug)]
pub struct Shared {
    selection: Selection,
    /// Back to front.
    z_order: Vec<LayerID>,
}
impl SelectionRegistry for Shared {
    fn selected(&self) -> Option<LayerID> {
        self.selection.selected()
    }
    fn set_selected(&mut self, layer: Option<LayerID>) -> Option<LayerID> {
        self.selection.set_selected(layer)
    }
}
impl Container for Shared {
    fn bring_to_front(&mut self, layer: LayerID) {
        let Some(idx) = self.z_order.iter().position(|&id| id == layer) else {
            log::warn!("asked to raise {layer}, which is not on this canvas");
            return;
        };
        // Already on top is the common case during a drag.
        if idx + 1 != self.z_order.len() {
            self.z_order[idx..].rotate_left(1);
        }
    }
}

#[derive(Default)]
pub struct Canvas {
    layers: hashbrown::HashMap<LayerID, SketchLayer>,
    shared: Shared,
}
impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Build a layer and place it above all others.
    pub fn add_layer(
        &mut self,
        origin: [f32; 2],
        size: [f32; 2],
        drawable: Drawable,
    ) -> Result<LayerID, RectError> {
        Ok(self.insert(SketchLayer::new(Rect::new(origin, size)?, drawable)))
    }
    /// Place an already built layer above all others.
    pub fn insert(&mut self, layer: SketchLayer) -> LayerID {
        let id = layer.id();
        log::debug!("adding {id} ({})", layer.kind());
        if self.layers.insert(id, layer).is_none() {
            self.shared.z_order.push(id);
        }
        id
    }
    /// Take a layer off the canvas. If it was selected, the selection is cleared.
    pub fn remove_layer(&mut self, id: LayerID) -> Result<SketchLayer, TargetError> {
        let layer = self
            .layers
            .remove(&id)
            .ok_or(TargetError::TargetNotFound(id))?;
        self.shared.z_order.retain(|&other| other != id);
        if self.shared.is_selected(id) {
            self.shared.set_selected(None);
        }
        log::debug!("removed {id}");
        Ok(layer)
    }
    #[must_use]
    pub fn layer(&self, id: LayerID) -> Option<&SketchLayer> {
        self.layers.get(&id)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
    /// Layer IDs, back to front.
    #[must_use]
    pub fn z_order(&self) -> &[LayerID] {
        &self.shared.z_order
    }
    pub fn layers_back_to_front(&self) -> impl DoubleEndedIterator<Item = &SketchLayer> + '_ {
        // Every ID in the z order is in the map, so this never skips.
        self.shared
            .z_order
            .iter()
            .filter_map(|id| self.layers.get(id))
    }
    /// The front-most layer under this point, if any.
    #[must_use]
    pub fn hit_test(&self, point: [f32; 2]) -> Option<LayerID> {
        self.layers_back_to_front()
            .rev()
            .find(|layer| layer.contains(point))
            .map(SketchLayer::id)
    }
    #[must_use]
    pub fn selected(&self) -> Option<LayerID> {
        self.shared.selected()
    }
    #[must_use]
    pub fn selected_layer(&self) -> Option<&SketchLayer> {
        self.layers.get(&self.selected()?)
    }
    /// Select a layer, returning the one that was selected before.
    pub fn select(&mut self, id: LayerID) -> Result<Option<LayerID>, TargetError> {
        if !self.layers.contains_key(&id) {
            return Err(TargetError::TargetNotFound(id));
        }
        Ok(self.shared.set_selected(Some(id)))
    }
    /// Deselect everything, returning the layer that was selected.
    pub fn clear_selection(&mut self) -> Option<LayerID> {
        self.shared.set_selected(None)
    }
    /// May a recognizer of this kind start on this layer? See [`SketchLayer::should_begin`].
    pub fn should_begin(&self, id: LayerID, kind: GestureKind) -> Result<bool, TargetError> {
        let layer = self.layers.get(&id).ok_or(TargetError::TargetNotFound(id))?;
        Ok(layer.should_begin(kind, &self.shared))
    }
    /// Deliver a recognized gesture to a layer. See [`SketchLayer::handle`].
    pub fn handle(
        &mut self,
        id: LayerID,
        gesture: &mut Gesture,
    ) -> Result<GestureOutcome, TargetError> {
        let layer = self
            .layers
            .get_mut(&id)
            .ok_or(TargetError::TargetNotFound(id))?;
        Ok(layer.handle(&mut self.shared, gesture))
    }
}
