use crate::util::{FiniteF32, FiniteF32Error};

/// A straight-alpha, linear RGBA color, used to stroke stock paths.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, bytemuck::Zeroable, Debug)]
pub struct Color([FiniteF32; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([FiniteF32::ZERO; 4]);
    pub const WHITE: Self = Self([FiniteF32::ONE; 4]);
    pub const BLACK: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    /// Create a color from linear channels. Fails if any channel is NaN or infinite.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        Ok(Self([
            FiniteF32::new(r)?,
            FiniteF32::new(g)?,
            FiniteF32::new(b)?,
            FiniteF32::new(a)?,
        ]))
    }
    pub fn from_array([r, g, b, a]: [f32; 4]) -> Result<Self, FiniteF32Error> {
        Self::new(r, g, b, a)
    }
    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        self.0.map(FiniteF32::get)
    }
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.0[3].get()
    }
    /// The same color, with color channels multiplied by alpha.
    #[must_use]
    pub fn premultiplied(&self) -> [f32; 4] {
        let [r, g, b, a] = self.as_array();
        [r * a, g * a, b * a, a]
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
// Safety: FiniteF32 is NoUninit, arrays have no uninit bytes of their own.
unsafe impl bytemuck::NoUninit for Color {}

#[cfg(test)]
mod test {
    use super::Color;
    #[test]
    fn rejects_non_finite() {
        assert!(Color::new(0.0, f32::NAN, 0.0, 1.0).is_err());
        assert!(Color::from_array([1.0, 1.0, 1.0, f32::NEG_INFINITY]).is_err());
    }
    #[test]
    fn premultiply() {
        let color = Color::new(1.0, 0.5, 0.0, 0.5).unwrap();
        assert_eq!(color.premultiplied(), [0.5, 0.25, 0.0, 0.5]);
        assert_eq!(Color::BLACK.as_array(), [0.0, 0.0, 0.0, 1.0]);
    }
}
