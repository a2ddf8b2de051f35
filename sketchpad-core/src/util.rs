//! Utility types, used throughout the crate.

/// A float which is neither NaN nor infinite.
#[derive(Copy, Clone, PartialEq, PartialOrd, bytemuck::NoUninit, bytemuck::Zeroable, Debug)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}
impl Default for FiniteF32 {
    fn default() -> Self {
        Self::ZERO
    }
}
impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}
// No NaN, so equality is total.
impl Eq for FiniteF32 {}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RectError {
    #[error("rect has a non-finite component")]
    NotFinite,
    #[error("rect has a negative size")]
    NegativeSize,
}
impl From<FiniteF32Error> for RectError {
    fn from(_: FiniteF32Error) -> Self {
        Self::NotFinite
    }
}

/// An axis-aligned rectangle in logical pixels. 0,0 is top left, +X Right, +Y down.
///
/// Invariant: every component is finite, and the size is non-negative.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    origin: [FiniteF32; 2],
    size: [FiniteF32; 2],
}
impl Rect {
    pub fn new(origin: [f32; 2], size: [f32; 2]) -> Result<Self, RectError> {
        let origin = [FiniteF32::new(origin[0])?, FiniteF32::new(origin[1])?];
        let size = [FiniteF32::new(size[0])?, FiniteF32::new(size[1])?];
        if size[0].get() < 0.0 || size[1].get() < 0.0 {
            return Err(RectError::NegativeSize);
        }
        Ok(Self { origin, size })
    }
    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> [f32; 2] {
        self.origin.map(FiniteF32::get)
    }
    #[must_use]
    pub fn size(&self) -> [f32; 2] {
        self.size.map(FiniteF32::get)
    }
    #[must_use]
    pub fn center(&self) -> [f32; 2] {
        let [x, y] = self.origin();
        let [w, h] = self.size();
        [x + w / 2.0, y + h / 2.0]
    }
    /// Is the point inside this rect? Edges are inclusive.
    #[must_use]
    pub fn contains(&self, point: [f32; 2]) -> bool {
        let [x0, y0] = self.origin();
        let [w, h] = self.size();
        (x0..=x0 + w).contains(&point[0]) && (y0..=y0 + h).contains(&point[1])
    }
}
