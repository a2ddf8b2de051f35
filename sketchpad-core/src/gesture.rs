//! # Gestures
//!
//! Recognition of raw touches into gestures is the platform's job. What arrives here is the
//! recognizer's *output*: a phase plus an accumulator holding the motion since it was last reset.
//! Handlers consume the accumulator and reset it, so every delivery carries only the increment
//! since the previous one.

#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    strum::Display,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
)]
pub enum GestureKind {
    Tap,
    Pan,
    Pinch,
    Rotate,
}
impl GestureKind {
    /// Does this gesture move, scale, or rotate a layer (as opposed to selecting it)?
    #[must_use]
    pub fn is_manipulation(self) -> bool {
        !matches!(self, Self::Tap)
    }
}

/// Lifecycle of a continuous recognizer.
#[derive(strum::AsRefStr, strum::EnumIter, PartialEq, Eq, Copy, Clone, Hash, Debug, Default)]
pub enum GesturePhase {
    /// Not yet recognized.
    #[default]
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}
impl GesturePhase {
    /// Is the gesture in progress and producing motion?
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }
    /// Has the gesture finished, successfully or not?
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::Failed)
    }
}

/// A drag. The translation is in the container's space.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct PanGesture {
    pub phase: GesturePhase,
    translation: [f32; 2],
}
impl PanGesture {
    #[must_use]
    pub fn new(phase: GesturePhase, translation: [f32; 2]) -> Self {
        Self { phase, translation }
    }
    #[must_use]
    pub fn translation(&self) -> [f32; 2] {
        self.translation
    }
    pub fn set_translation(&mut self, translation: [f32; 2]) {
        self.translation = translation;
    }
    /// Motion reported by the platform since the last reset is added to the accumulator.
    pub fn accumulate(&mut self, delta: [f32; 2]) {
        self.translation[0] += delta[0];
        self.translation[1] += delta[1];
    }
}

/// A two-finger pinch. The scale is relative to the last reset, 1.0 meaning no change.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PinchGesture {
    pub phase: GesturePhase,
    scale: f32,
}
impl PinchGesture {
    #[must_use]
    pub fn new(phase: GesturePhase, scale: f32) -> Self {
        Self { phase, scale }
    }
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
    pub fn accumulate(&mut self, factor: f32) {
        self.scale *= factor;
    }
}
impl Default for PinchGesture {
    fn default() -> Self {
        Self {
            phase: GesturePhase::default(),
            scale: 1.0,
        }
    }
}

/// A two-finger twist. Radians since the last reset, positive from +X towards +Y.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct RotationGesture {
    pub phase: GesturePhase,
    rotation: f32,
}
impl RotationGesture {
    #[must_use]
    pub fn new(phase: GesturePhase, rotation: f32) -> Self {
        Self { phase, rotation }
    }
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }
    pub fn accumulate(&mut self, radians: f32) {
        self.rotation += radians;
    }
}

/// A recognized gesture, as delivered to a single layer.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Gesture {
    /// Discrete, carries nothing.
    Tap,
    Pan(PanGesture),
    Pinch(PinchGesture),
    Rotate(RotationGesture),
}
impl Gesture {
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Tap => GestureKind::Tap,
            Self::Pan(_) => GestureKind::Pan,
            Self::Pinch(_) => GestureKind::Pinch,
            Self::Rotate(_) => GestureKind::Rotate,
        }
    }
    /// Phase of the recognizer. Taps are recognized all at once, and report `Ended`.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match self {
            Self::Tap => GesturePhase::Ended,
            Self::Pan(pan) => pan.phase,
            Self::Pinch(pinch) => pinch.phase,
            Self::Rotate(rotate) => rotate.phase,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn accumulators() {
        let mut pan = PanGesture::default();
        pan.accumulate([1.0, 2.0]);
        pan.accumulate([1.0, -1.0]);
        assert_eq!(pan.translation(), [2.0, 1.0]);

        let mut pinch = PinchGesture::default();
        assert_eq!(pinch.scale(), 1.0);
        pinch.accumulate(2.0);
        pinch.accumulate(0.25);
        assert_eq!(pinch.scale(), 0.5);

        let mut rotate = RotationGesture::default();
        rotate.accumulate(0.5);
        rotate.accumulate(0.25);
        assert_eq!(rotate.rotation(), 0.75);
    }
    #[test]
    fn phases() {
        assert!(GesturePhase::Began.is_active());
        assert!(GesturePhase::Changed.is_active());
        assert!(!GesturePhase::Ended.is_active());
        assert!(GesturePhase::Cancelled.is_finished());
        assert!(!GesturePhase::Possible.is_finished());
        assert_eq!(Gesture::Tap.phase(), GesturePhase::Ended);
    }
    #[test]
    fn kinds() {
        assert!(!GestureKind::Tap.is_manipulation());
        assert!(GestureKind::Rotate.is_manipulation());
        assert_eq!(
            Gesture::Pinch(PinchGesture::new(GesturePhase::Changed, 2.0)).kind(),
            GestureKind::Pinch
        );
    }
}
