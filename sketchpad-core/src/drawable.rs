//! # Drawables
//!
//! The renderable payload wrapped by a [`SketchLayer`](crate::layer::SketchLayer). Rendering itself
//! is the business of the host, this module only describes *what* is drawn and whether it may be
//! manipulated.

use std::sync::Arc;

use crate::color::Color;

#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
)]
#[repr(u8)]
pub enum LineStyle {
    Solid,
    Dotted,
}
impl LineStyle {
    /// On/off dash lengths, in multiples of the stroke width. `None` for a continuous line.
    #[must_use]
    pub fn dash_pattern(self) -> Option<&'static [f32]> {
        match self {
            Self::Solid => None,
            // Zero-length "on" with round caps draws dots.
            Self::Dotted => Some(&[0.0, 2.0]),
        }
    }
}
impl Default for LineStyle {
    fn default() -> Self {
        Self::Solid
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    QuadTo {
        control: [f32; 2],
        to: [f32; 2],
    },
    CubicTo {
        control_a: [f32; 2],
        control_b: [f32; 2],
        to: [f32; 2],
    },
    Close,
}
impl PathCommand {
    /// Every point named by this command, controls included.
    fn points(&self) -> impl Iterator<Item = [f32; 2]> {
        let points: smallvec::SmallVec<[[f32; 2]; 3]> = match *self {
            Self::MoveTo(to) | Self::LineTo(to) => smallvec::smallvec![to],
            Self::QuadTo { control, to } => smallvec::smallvec![control, to],
            Self::CubicTo {
                control_a,
                control_b,
                to,
            } => smallvec::smallvec![control_a, control_b, to],
            Self::Close => smallvec::SmallVec::new(),
        };
        points.into_iter()
    }
}

/// A geometric path in the layer's local (untransformed) coordinates.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Path {
    commands: smallvec::SmallVec<[PathCommand; 8]>,
}
impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn move_to(mut self, to: [f32; 2]) -> Self {
        self.commands.push(PathCommand::MoveTo(to));
        self
    }
    #[must_use]
    pub fn line_to(mut self, to: [f32; 2]) -> Self {
        self.commands.push(PathCommand::LineTo(to));
        self
    }
    #[must_use]
    pub fn quad_to(mut self, control: [f32; 2], to: [f32; 2]) -> Self {
        self.commands.push(PathCommand::QuadTo { control, to });
        self
    }
    #[must_use]
    pub fn cubic_to(mut self, control_a: [f32; 2], control_b: [f32; 2], to: [f32; 2]) -> Self {
        self.commands.push(PathCommand::CubicTo {
            control_a,
            control_b,
            to,
        });
        self
    }
    #[must_use]
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
    /// Bounding box of every point of the path, including control points, as `(min, max)`.
    /// This is conservative - curves never leave the hull of their control points.
    ///
    /// `None` if the path names no points.
    #[must_use]
    pub fn bounds(&self) -> Option<([f32; 2], [f32; 2])> {
        self.commands
            .iter()
            .flat_map(PathCommand::points)
            .fold(None, |acc, [x, y]| match acc {
                None => Some(([x, y], [x, y])),
                Some(([x0, y0], [x1, y1])) => {
                    Some(([x0.min(x), y0.min(y)], [x1.max(x), y1.max(y)]))
                }
            })
    }
}
impl FromIterator<PathCommand> for Path {
    fn from_iter<T: IntoIterator<Item = PathCommand>>(iter: T) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

/// Opaque bitmap data. Cloning shares the payload.
#[derive(Clone, PartialEq, Debug)]
pub struct RasterImage {
    /// Pixel dimensions, width then height.
    pub size: [u32; 2],
    pub data: Arc<[u8]>,
}

/// Opaque serialized vector scene (eg. SVG). Cloning shares the payload.
#[derive(Clone, PartialEq, Debug)]
pub struct VectorGraphic {
    pub data: Arc<[u8]>,
}

/// A path drawn with the stock pen.
#[derive(Clone, PartialEq, Debug)]
pub struct StockPath {
    pub path: Path,
    pub color: Color,
    pub line_style: LineStyle,
}

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
#[repr(u8)]
pub enum DrawableKind {
    Raster,
    Vector,
    StockPath,
}
impl DrawableKind {
    /// Whether layers of this kind may be moved, scaled, and rotated by the user.
    /// Selection by tapping is unaffected.
    #[must_use]
    pub const fn touchable(self) -> bool {
        match self {
            Self::Raster => false,
            Self::Vector | Self::StockPath => true,
        }
    }
}

/// The payload of a layer. Immutable once the layer is built.
#[derive(Clone, PartialEq, Debug)]
pub enum Drawable {
    Raster(RasterImage),
    Vector(VectorGraphic),
    StockPath(StockPath),
}
impl Drawable {
    #[must_use]
    pub fn kind(&self) -> DrawableKind {
        match self {
            Self::Raster(_) => DrawableKind::Raster,
            Self::Vector(_) => DrawableKind::Vector,
            Self::StockPath(_) => DrawableKind::StockPath,
        }
    }
    /// See [`DrawableKind::touchable`]. Depends on the variant alone, never on the payload.
    #[must_use]
    pub fn touchable(&self) -> bool {
        self.kind().touchable()
    }
}
impl From<RasterImage> for Drawable {
    fn from(value: RasterImage) -> Self {
        Self::Raster(value)
    }
}
impl From<VectorGraphic> for Drawable {
    fn from(value: VectorGraphic) -> Self {
        Self::Vector(value)
    }
}
impl From<StockPath> for Drawable {
    fn from(value: StockPath) -> Self {
        Self::StockPath(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn touchable_table() {
        let raster: Drawable = RasterImage {
            size: [1, 1],
            data: Arc::from([0u8; 4].as_slice()),
        }
        .into();
        let vector: Drawable = VectorGraphic {
            data: Arc::from(b"<svg/>".as_slice()),
        }
        .into();
        let stock: Drawable = StockPath {
            path: Path::new(),
            color: Color::BLACK,
            line_style: LineStyle::Dotted,
        }
        .into();

        assert!(!raster.touchable());
        assert!(vector.touchable());
        assert!(stock.touchable());
        assert_eq!(raster.kind(), DrawableKind::Raster);
    }
    #[test]
    fn kind_table_matches_drawable() {
        use strum::IntoEnumIterator;
        // Raster is the only immovable kind.
        let touchable: Vec<_> = DrawableKind::iter()
            .filter(|kind| kind.touchable())
            .collect();
        assert_eq!(touchable, [DrawableKind::Vector, DrawableKind::StockPath]);
    }
    #[test]
    fn path_bounds() {
        assert_eq!(Path::new().bounds(), None);
        assert_eq!(Path::new().close().bounds(), None);

        let path = Path::new()
            .move_to([10.0, 10.0])
            .line_to([20.0, -5.0])
            .cubic_to([0.0, 40.0], [15.0, 15.0], [12.0, 12.0])
            .close();
        assert_eq!(path.bounds(), Some(([0.0, -5.0], [20.0, 40.0])));
    }
    #[test]
    fn dash_patterns() {
        assert!(LineStyle::Solid.dash_pattern().is_none());
        assert!(LineStyle::Dotted.dash_pattern().is_some());
        assert_eq!(LineStyle::Dotted.as_ref(), "Dotted");
    }
}
