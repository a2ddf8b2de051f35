//! # Sketchpad core
//!
//! Interactive layers of a sketch canvas: selection exclusivity between sibling layers, the policy
//! deciding which gestures a layer may process, and the composition of gesture deltas into each
//! layer's transform. Recognizing gestures and rendering layers are left to the host.

pub mod canvas;
pub mod color;
pub mod drawable;
pub mod gesture;
pub mod id;
pub mod layer;
pub mod selection;
pub mod transform;
pub mod util;

pub use canvas::{Canvas, Container, TargetError};
pub use drawable::{Drawable, DrawableKind};
pub use gesture::{Gesture, GestureKind, GesturePhase};
pub use id::SketchID;
pub use layer::{GestureOutcome, LayerID, SketchLayer};
pub use selection::{Selection, SelectionRegistry};
pub use transform::Affine2D;
