//! # Sketch layers
//!
//! A single movable, scalable, rotatable element of a canvas. Each layer decides on its own whether
//! to act on a gesture, consulting two things: its drawable's `touchable` capability, and whether the
//! shared [`SelectionRegistry`] names it as the selected layer.
//!
//! Deciding happens in two separate steps, with deliberately different conditions:
//! * *Admission* ([`SketchLayer::should_begin`]) runs before a recognizer is allowed to start.
//!   Taps are always admitted. Everything else only on the selected layer, regardless of capability.
//!   This keeps stray touches on unselected layers free for the host's own gestures.
//! * *Mutation* ([`SketchLayer::can_manipulate`]) runs on every delivered delta of a manipulation,
//!   and additionally requires the drawable to be touchable.

use crate::canvas::Container;
use crate::drawable::{Drawable, DrawableKind};
use crate::gesture::{Gesture, GestureKind, PanGesture, PinchGesture, RotationGesture};
use crate::selection::SelectionRegistry;
use crate::transform::Affine2D;
use crate::util::{Rect, RectError};

pub type LayerID = crate::SketchID<SketchLayer>;

/// Why a delivered gesture was dropped. These are routine, and never errors.
#[derive(strum::AsRefStr, Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum IgnoreReason {
    /// The layer's drawable may not be manipulated.
    NotTouchable,
    /// Another layer, or none, is selected.
    NotSelected,
    /// The recognizer is not in a phase this handler consumes.
    InactivePhase,
    /// The recognizer reported a NaN or infinite delta.
    NotFinite,
}

/// What a layer did with a delivered gesture.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum GestureOutcome {
    /// The layer became the selected layer, deselecting any other.
    Selected,
    /// The layer was selected, and now nothing is.
    Deselected,
    /// The delta was folded into the layer's transform, and the accumulator reset.
    Transformed,
    /// Nothing changed. The accumulator is untouched.
    Ignored(IgnoreReason),
}

/// Not `Clone`, as a copy would share the original's ID. See [`SketchLayer::duplicate`].
#[derive(Debug)]
pub struct SketchLayer {
    id: LayerID,
    /// Untransformed geometry, in the container's space.
    frame: Rect,
    drawable: Drawable,
    /// User manipulation about the frame's center. The translation part is the accumulated pan.
    transform: Affine2D,
}

impl SketchLayer {
    /// Create a layer with a fresh ID and identity transform.
    #[must_use]
    pub fn new(frame: Rect, drawable: Drawable) -> Self {
        Self {
            id: LayerID::default(),
            frame,
            drawable,
            transform: Affine2D::IDENTITY,
        }
    }
    /// Create a layer from a raw frame. Fails if the frame is not a valid [`Rect`].
    pub fn with_frame(
        origin: [f32; 2],
        size: [f32; 2],
        drawable: Drawable,
    ) -> Result<Self, RectError> {
        Ok(Self::new(Rect::new(origin, size)?, drawable))
    }
    /// A copy of this layer's frame, drawable, and transform under a fresh ID.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: LayerID::default(),
            frame: self.frame,
            drawable: self.drawable.clone(),
            transform: self.transform,
        }
    }
    #[must_use]
    pub fn id(&self) -> LayerID {
        self.id
    }
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }
    #[must_use]
    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }
    #[must_use]
    pub fn kind(&self) -> DrawableKind {
        self.drawable.kind()
    }
    #[must_use]
    pub fn touchable(&self) -> bool {
        self.drawable.touchable()
    }
    #[must_use]
    pub fn transform(&self) -> Affine2D {
        self.transform
    }
    /// Where the frame's center currently sits in the container.
    #[must_use]
    pub fn position(&self) -> [f32; 2] {
        let [cx, cy] = self.frame.center();
        let [tx, ty] = self.transform.translation();
        [cx + tx, cy + ty]
    }
    /// Scale along the layer's own axes.
    #[must_use]
    pub fn scale(&self) -> [f32; 2] {
        self.transform.scale()
    }
    #[must_use]
    pub fn rotation(&self) -> cgmath::Rad<f32> {
        self.transform.rotation()
    }
    /// Full mapping from the untransformed frame into the container, manipulations pivoting about the frame's center.
    #[must_use]
    pub fn layer_to_container(&self) -> Affine2D {
        let [cx, cy] = self.frame.center();
        Affine2D::from_translation([cx, cy])
            .then(self.transform)
            .then(Affine2D::from_translation([-cx, -cy]))
    }
    /// Is this container-space point within the layer's transformed frame?
    /// A collapsed (uninvertable) layer contains nothing.
    #[must_use]
    pub fn contains(&self, point: [f32; 2]) -> bool {
        self.layer_to_container()
            .inverse()
            .is_ok_and(|inverse| self.frame.contains(inverse.transform_point(point)))
    }
    #[must_use]
    pub fn is_selected(&self, selection: &impl SelectionRegistry) -> bool {
        selection.is_selected(self.id)
    }
    /// Admission, asked before a recognizer of this kind may start on this layer.
    ///
    /// Taps always start, as they are the only way to select a layer. Manipulations only start on
    /// the selected layer. Capability is *not* consulted here, see [`Self::can_manipulate`].
    #[must_use]
    pub fn should_begin(&self, kind: GestureKind, selection: &impl SelectionRegistry) -> bool {
        match kind {
            GestureKind::Tap => true,
            GestureKind::Pan | GestureKind::Pinch | GestureKind::Rotate => {
                self.is_selected(selection)
            }
        }
    }
    /// Mutation guard, checked on every manipulation delta.
    pub fn can_manipulate(&self, selection: &impl SelectionRegistry) -> Result<(), IgnoreReason> {
        if !self.touchable() {
            Err(IgnoreReason::NotTouchable)
        } else if !self.is_selected(selection) {
            Err(IgnoreReason::NotSelected)
        } else {
            Ok(())
        }
    }
    /// Deliver any gesture to its handler.
    pub fn handle<Host>(&mut self, host: &mut Host, gesture: &mut Gesture) -> GestureOutcome
    where
        Host: SelectionRegistry + Container,
    {
        let outcome = match gesture {
            Gesture::Tap => self.on_tap(host),
            Gesture::Pan(pan) => self.on_pan(host, pan),
            Gesture::Pinch(pinch) => self.on_pinch(&*host, pinch),
            Gesture::Rotate(rotate) => self.on_rotate(host, rotate),
        };
        if let GestureOutcome::Ignored(reason) = outcome {
            log::trace!(
                "{} dropped {} ({})",
                self.id,
                gesture.kind(),
                reason.as_ref()
            );
        }
        outcome
    }
    /// Toggle selection. Unconditional - neither capability nor current selection can block it.
    pub fn on_tap(&self, selection: &mut impl SelectionRegistry) -> GestureOutcome {
        if self.is_selected(&*selection) {
            selection.set_selected(None);
            GestureOutcome::Deselected
        } else {
            selection.set_selected(Some(self.id));
            GestureOutcome::Selected
        }
    }
    /// Move by the pan accumulator, then reset it to zero.
    ///
    /// The delta is pushed through the current rotation and scale before being added to the position,
    /// so the drag follows the layer's own frame. Applies in every recognizer phase.
    pub fn on_pan<Host>(&mut self, host: &mut Host, pan: &mut PanGesture) -> GestureOutcome
    where
        Host: SelectionRegistry + Container,
    {
        if let Err(reason) = self.can_manipulate(&*host) {
            return GestureOutcome::Ignored(reason);
        }
        if !pan.translation().iter().all(|v| v.is_finite()) {
            return GestureOutcome::Ignored(IgnoreReason::NotFinite);
        }
        host.bring_to_front(self.id);
        let delta = self.transform.transform_vector(pan.translation());
        self.transform = self.transform.offset_by(delta);
        pan.set_translation([0.0; 2]);
        GestureOutcome::Transformed
    }
    /// Scale by the pinch accumulator, then reset it to one. Only while the pinch is began or changed.
    pub fn on_pinch(
        &mut self,
        selection: &impl SelectionRegistry,
        pinch: &mut PinchGesture,
    ) -> GestureOutcome {
        if let Err(reason) = self.can_manipulate(selection) {
            return GestureOutcome::Ignored(reason);
        }
        if !pinch.phase.is_active() {
            return GestureOutcome::Ignored(IgnoreReason::InactivePhase);
        }
        let factor = pinch.scale();
        if !factor.is_finite() {
            return GestureOutcome::Ignored(IgnoreReason::NotFinite);
        }
        self.transform = self.transform.scaled_by(factor, factor);
        pinch.set_scale(1.0);
        GestureOutcome::Transformed
    }
    /// Rotate by the rotation accumulator, then reset it to zero. Applies in every recognizer phase.
    pub fn on_rotate<Host>(
        &mut self,
        host: &mut Host,
        rotate: &mut RotationGesture,
    ) -> GestureOutcome
    where
        Host: SelectionRegistry + Container,
    {
        if let Err(reason) = self.can_manipulate(&*host) {
            return GestureOutcome::Ignored(reason);
        }
        if !rotate.rotation().is_finite() {
            return GestureOutcome::Ignored(IgnoreReason::NotFinite);
        }
        host.bring_to_front(self.id);
        self.transform = self.transform.rotated_by(cgmath::Rad(rotate.rotation()));
        rotate.set_rotation(0.0);
        GestureOutcome::Transformed
    }
}
