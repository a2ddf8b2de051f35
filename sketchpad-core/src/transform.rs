//! # Transforms
//!
//! Layers accumulate user manipulation into a single [`Affine2D`]. Gesture deltas are folded in one
//! at a time, so the *order* of composition is what gives each gesture its feel:
//! * Scale and rotation are post-multiplied (`M * S`, `M * R`). They act in the layer's own frame,
//!   about its center, and never move it.
//! * Pan is a pre-translation in the container's space. Deltas are pushed through the linear part
//!   of the transform first, so they follow the layer's current rotation and scale.

use cgmath::{InnerSpace, SquareMatrix};

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    /// The transform cannot be inverted. Occurs if scale collapses to zero.
    #[error("uninvertable")]
    Uninvertable,
}

/// An affine transform in logical pixels, translation included.
///
/// Column-major, `[x basis, y basis, translation]`. With `(a, b)` the x basis and `(c, d)` the y basis,
/// a point `(x, y)` maps to `(a*x + c*y + tx, b*x + d*y + ty)`.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable, PartialEq)]
#[repr(C)]
pub struct Affine2D {
    pub elements: [[f32; 2]; 3],
}

impl Affine2D {
    pub const IDENTITY: Self = Self {
        elements: [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
    };
    #[must_use]
    pub fn from_translation(offset: [f32; 2]) -> Self {
        Self {
            elements: [[1.0, 0.0], [0.0, 1.0], offset],
        }
    }
    #[must_use]
    pub fn from_scale(x: f32, y: f32) -> Self {
        Self {
            elements: [[x, 0.0], [0.0, y], [0.0, 0.0]],
        }
    }
    /// Rotation by `angle`, positive from +X towards +Y.
    #[must_use]
    pub fn from_rotation(angle: cgmath::Rad<f32>) -> Self {
        cgmath::Matrix3::from_angle_z(angle).into()
    }
    /// Compose, applying `inner` first and then `self`.
    #[must_use = "returns a new transform and does not modify `self`"]
    pub fn then(self, inner: Self) -> Self {
        (cgmath::Matrix3::from(self) * cgmath::Matrix3::from(inner)).into()
    }
    /// Post-multiply by a scale, `self * S`.
    #[must_use = "returns a new transform and does not modify `self`"]
    pub fn scaled_by(self, x: f32, y: f32) -> Self {
        self.then(Self::from_scale(x, y))
    }
    /// Post-multiply by a rotation, `self * R`.
    #[must_use = "returns a new transform and does not modify `self`"]
    pub fn rotated_by(self, angle: cgmath::Rad<f32>) -> Self {
        self.then(Self::from_rotation(angle))
    }
    /// Pre-multiply by a translation, `T * self`. The offset is in the output space, and is not
    /// affected by the current rotation or scale.
    #[must_use = "returns a new transform and does not modify `self`"]
    pub fn offset_by(mut self, offset: [f32; 2]) -> Self {
        self.elements[2][0] += offset[0];
        self.elements[2][1] += offset[1];
        self
    }
    /// Apply the linear part only. Appropriate for displacements, which have no position.
    #[must_use]
    pub fn transform_vector(&self, vector: [f32; 2]) -> [f32; 2] {
        let [[a, b], [c, d], _] = self.elements;
        let [x, y] = vector;
        [a * x + c * y, b * x + d * y]
    }
    #[must_use]
    pub fn transform_point(&self, point: [f32; 2]) -> [f32; 2] {
        let [x, y] = self.transform_vector(point);
        let [tx, ty] = self.elements[2];
        [x + tx, y + ty]
    }
    pub fn inverse(&self) -> Result<Self, TransformError> {
        let matrix = cgmath::Matrix3::from(*self);
        // cgmath only checks for an exactly zero determinant. Anything this small is garbage anyway.
        if matrix.determinant().abs() < f32::EPSILON * f32::EPSILON {
            return Err(TransformError::Uninvertable);
        }
        matrix
            .invert()
            .map(Into::into)
            .ok_or(TransformError::Uninvertable)
    }
    #[must_use]
    pub fn translation(&self) -> [f32; 2] {
        self.elements[2]
    }
    /// Length of each basis vector. For transforms built from rotations and positive scales only,
    /// this is the scale along each local axis.
    #[must_use]
    pub fn scale(&self) -> [f32; 2] {
        let [x_basis, y_basis, _] = self.elements;
        [
            cgmath::Vector2::from(x_basis).magnitude(),
            cgmath::Vector2::from(y_basis).magnitude(),
        ]
    }
    /// Angle of the x basis, in `(-PI, PI]`.
    #[must_use]
    pub fn rotation(&self) -> cgmath::Rad<f32> {
        let [a, b] = self.elements[0];
        cgmath::Rad(b.atan2(a))
    }
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine2D> for cgmath::Matrix3<f32> {
    fn from(value: Affine2D) -> Self {
        let [[a, b], [c, d], [tx, ty]] = value.elements;
        // Also column major. Bottom row is always [0, 0, 1]
        cgmath::Matrix3::new(a, b, 0.0, c, d, 0.0, tx, ty, 1.0)
    }
}
impl From<cgmath::Matrix3<f32>> for Affine2D {
    /// Takes the affine part of a homogeneous 2D matrix. The projective row is discarded.
    fn from(value: cgmath::Matrix3<f32>) -> Self {
        Self {
            elements: [
                [value.x.x, value.x.y],
                [value.y.x, value.y.y],
                [value.z.x, value.z.y],
            ],
        }
    }
}
impl From<[[f32; 2]; 3]> for Affine2D {
    fn from(elements: [[f32; 2]; 3]) -> Self {
        Self { elements }
    }
}
impl From<Affine2D> for [[f32; 2]; 3] {
    fn from(value: Affine2D) -> Self {
        value.elements
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::Affine2D;
    use cgmath::Rad;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    pub(crate) fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }
    pub(crate) fn close2(a: [f32; 2], b: [f32; 2]) -> bool {
        close(a[0], b[0]) && close(a[1], b[1])
    }

    #[test]
    fn scale_composes_multiplicatively() {
        let xform = Affine2D::IDENTITY.scaled_by(2.0, 2.0).scaled_by(1.5, 1.5);
        assert!(close2(xform.scale(), [3.0, 3.0]));
    }
    #[test]
    fn rotation_composes_additively() {
        let xform = Affine2D::IDENTITY
            .rotated_by(Rad(FRAC_PI_4))
            .rotated_by(Rad(FRAC_PI_4));
        assert!(close(xform.rotation().0, FRAC_PI_2));
        // Pure rotation, no scale sneaking in.
        assert!(close2(xform.scale(), [1.0, 1.0]));
    }
    #[test]
    fn rotation_direction() {
        // +X rotates onto +Y
        let xform = Affine2D::from_rotation(Rad(FRAC_PI_2));
        assert!(close2(xform.transform_vector([5.0, 0.0]), [0.0, 5.0]));
    }
    #[test]
    fn post_multiply_keeps_translation() {
        let xform = Affine2D::from_translation([10.0, -4.0])
            .scaled_by(3.0, 3.0)
            .rotated_by(Rad(1.0));
        assert!(close2(xform.translation(), [10.0, -4.0]));
    }
    #[test]
    fn order_matters() {
        // Scaling nonuniformly then rotating is not the same as rotating then scaling.
        let a = Affine2D::IDENTITY
            .scaled_by(2.0, 1.0)
            .rotated_by(Rad(FRAC_PI_2));
        let b = Affine2D::IDENTITY
            .rotated_by(Rad(FRAC_PI_2))
            .scaled_by(2.0, 1.0);
        let v = [1.0, 0.0];
        assert!(close2(a.transform_vector(v), [0.0, 1.0]));
        assert!(close2(b.transform_vector(v), [0.0, 2.0]));
    }
    #[test]
    fn vectors_ignore_translation() {
        let xform = Affine2D::from_translation([100.0, 100.0]).scaled_by(2.0, 2.0);
        assert!(close2(xform.transform_vector([1.0, 1.0]), [2.0, 2.0]));
        assert!(close2(xform.transform_point([1.0, 1.0]), [102.0, 102.0]));
    }
    #[test]
    fn inverse_round_trip() {
        let xform = Affine2D::from_translation([3.0, 7.0])
            .rotated_by(Rad(0.3))
            .scaled_by(2.0, 0.5);
        let inverse = xform.inverse().unwrap();
        let point = [12.0, -3.0];
        assert!(close2(inverse.transform_point(xform.transform_point(point)), point));
    }
    #[test]
    fn degenerate_inverse() {
        let xform = Affine2D::IDENTITY.scaled_by(0.0, 1.0);
        assert!(xform.inverse().is_err());
    }
}
