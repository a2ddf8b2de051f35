//! # Selection
//!
//! At most one layer of a canvas is selected at a time. Selecting a layer implicitly deselects the
//! previous one - there is exactly one slot, so the exclusivity holds by construction rather than
//! by layers talking to each other.

use crate::layer::LayerID;

/// The only way to observe or change which layer is selected.
pub trait SelectionRegistry {
    /// The currently selected layer, if any.
    fn selected(&self) -> Option<LayerID>;
    /// Replace the selection, returning the previously selected layer.
    ///
    /// The replaced layer is deselected in the same step - there is no moment where two layers are selected.
    fn set_selected(&mut self, layer: Option<LayerID>) -> Option<LayerID>;

    fn is_selected(&self, layer: LayerID) -> bool {
        self.selected() == Some(layer)
    }
}

/// A single selection slot.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Selection {
    selected: Option<LayerID>,
}
impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
impl SelectionRegistry for Selection {
    fn selected(&self) -> Option<LayerID> {
        self.selected
    }
    fn set_selected(&mut self, layer: Option<LayerID>) -> Option<LayerID> {
        let previous = std::mem::replace(&mut self.selected, layer);
        if previous != layer {
            match (previous, layer) {
                (Some(from), Some(to)) => log::debug!("selection moved {from} -> {to}"),
                (None, Some(to)) => log::debug!("selected {to}"),
                (Some(from), None) => log::debug!("deselected {from}"),
                (None, None) => (),
            }
        }
        previous
    }
}

#[cfg(test)]
mod test {
    use super::{Selection, SelectionRegistry};
    use crate::layer::LayerID;

    #[test]
    fn replacing_returns_previous() {
        let [a, b] = [LayerID::default(), LayerID::default()];
        let mut selection = Selection::new();
        assert_eq!(selection.selected(), None);

        assert_eq!(selection.set_selected(Some(a)), None);
        assert!(selection.is_selected(a));

        assert_eq!(selection.set_selected(Some(b)), Some(a));
        assert!(!selection.is_selected(a));
        assert!(selection.is_selected(b));

        assert_eq!(selection.set_selected(None), Some(b));
        assert_eq!(selection.selected(), None);
    }
}
