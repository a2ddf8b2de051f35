//! # Gesture scripts
//!
//! A TOML description of a canvas and a sequence of recognized gestures to deliver to it.
//!
//! ```toml
//! [[layer]]
//! name = "pen"
//! origin = [0.0, 0.0]
//! size = [100.0, 100.0]
//! drawable = "stock-path"
//! line-style = "dotted"
//! points = [[0.0, 0.0], [100.0, 100.0]]
//!
//! [[event]]
//! action = "tap"
//! layer = "pen"
//!
//! [[event]]
//! action = "pan"
//! layer = "pen"
//! delta = [5.0, 0.0]
//! phase = "began"
//! ```

use std::sync::Arc;

use sketchpad_core::color::Color;
use sketchpad_core::drawable::{
    Drawable, LineStyle, Path, RasterImage, StockPath, VectorGraphic,
};
use sketchpad_core::gesture::GesturePhase;

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("layer {0:?} is declared more than once")]
    DuplicateLayer(String),
    #[error("event {index} names undeclared layer {name:?}")]
    UnknownLayer { index: usize, name: String },
    #[error("layer {name:?} has a bad color")]
    InvalidColor { name: String },
    #[error("failed to read payload of layer {name:?}")]
    Payload {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(serde::Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum DrawableSpec {
    Raster,
    Vector,
    StockPath,
}

#[derive(serde::Deserialize, Copy, Clone, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyleSpec {
    #[default]
    Solid,
    Dotted,
}
impl From<LineStyleSpec> for LineStyle {
    fn from(value: LineStyleSpec) -> Self {
        match value {
            LineStyleSpec::Solid => Self::Solid,
            LineStyleSpec::Dotted => Self::Dotted,
        }
    }
}

#[derive(serde::Deserialize, Copy, Clone, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseSpec {
    Possible,
    Began,
    #[default]
    Changed,
    Ended,
    Cancelled,
    Failed,
}
impl From<PhaseSpec> for GesturePhase {
    fn from(value: PhaseSpec) -> Self {
        match value {
            PhaseSpec::Possible => Self::Possible,
            PhaseSpec::Began => Self::Began,
            PhaseSpec::Changed => Self::Changed,
            PhaseSpec::Ended => Self::Ended,
            PhaseSpec::Cancelled => Self::Cancelled,
            PhaseSpec::Failed => Self::Failed,
        }
    }
}

#[derive(serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct LayerSpec {
    pub name: String,
    pub origin: [f32; 2],
    pub size: [f32; 2],
    pub drawable: DrawableSpec,
    /// Raster and vector payload file, relative to the script.
    #[serde(default)]
    pub source: Option<std::path::PathBuf>,
    /// Stock path polyline, in the layer's untransformed space.
    #[serde(default)]
    pub points: Vec<[f32; 2]>,
    #[serde(default)]
    pub color: Option<[f32; 4]>,
    #[serde(default)]
    pub line_style: LineStyleSpec,
}
impl LayerSpec {
    fn payload(&self, base: &std::path::Path) -> Result<Arc<[u8]>, ScriptError> {
        let Some(source) = &self.source else {
            return Ok(Arc::<[u8]>::from(Vec::new()));
        };
        std::fs::read(base.join(source))
            .map(Arc::<[u8]>::from)
            .map_err(|source| ScriptError::Payload {
                name: self.name.clone(),
                source,
            })
    }
    /// Build the drawable this layer describes. Payload paths are resolved against `base`.
    pub fn drawable(&self, base: &std::path::Path) -> Result<Drawable, ScriptError> {
        Ok(match self.drawable {
            DrawableSpec::Raster => RasterImage {
                // Saturating casts, a nonsense frame is rejected later anyway.
                size: self.size.map(|side| side.round() as u32),
                data: self.payload(base)?,
            }
            .into(),
            DrawableSpec::Vector => VectorGraphic {
                data: self.payload(base)?,
            }
            .into(),
            DrawableSpec::StockPath => {
                let color = match self.color {
                    None => Color::BLACK,
                    Some(color) => {
                        Color::from_array(color).map_err(|_| ScriptError::InvalidColor {
                            name: self.name.clone(),
                        })?
                    }
                };
                let mut points = self.points.iter().copied();
                let path = match points.next() {
                    None => Path::new(),
                    Some(first) => points.fold(Path::new().move_to(first), Path::line_to),
                };
                StockPath {
                    path,
                    color,
                    line_style: self.line_style.into(),
                }
                .into()
            }
        })
    }
}

#[derive(serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum EventSpec {
    Tap {
        layer: String,
    },
    Pan {
        layer: String,
        delta: [f32; 2],
        #[serde(default)]
        phase: PhaseSpec,
    },
    Pinch {
        layer: String,
        scale: f32,
        #[serde(default)]
        phase: PhaseSpec,
    },
    Rotate {
        layer: String,
        radians: f32,
        #[serde(default)]
        phase: PhaseSpec,
    },
    /// The container drops the layer.
    Remove {
        layer: String,
    },
}
impl EventSpec {
    #[must_use]
    pub fn layer(&self) -> &str {
        match self {
            Self::Tap { layer }
            | Self::Pan { layer, .. }
            | Self::Pinch { layer, .. }
            | Self::Rotate { layer, .. }
            | Self::Remove { layer } => layer,
        }
    }
}

#[derive(serde::Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Script {
    #[serde(default, rename = "layer")]
    pub layers: Vec<LayerSpec>,
    #[serde(default, rename = "event")]
    pub events: Vec<EventSpec>,
}
impl Script {
    /// Parse and check that every name resolves.
    pub fn from_toml(string: &str) -> anyhow::Result<Self> {
        let script: Self = toml::from_str(string)?;
        script.validate()?;
        Ok(script)
    }
    pub fn read_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let string = std::fs::read_to_string(path)?;
        Self::from_toml(&string)
    }
    fn validate(&self) -> Result<(), ScriptError> {
        let mut names = hashbrown::HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !names.insert(layer.name.as_str()) {
                return Err(ScriptError::DuplicateLayer(layer.name.clone()));
            }
        }
        for (index, event) in self.events.iter().enumerate() {
            if !names.contains(event.layer()) {
                return Err(ScriptError::UnknownLayer {
                    index,
                    name: event.layer().to_owned(),
                });
            }
        }
        Ok(())
    }
}
