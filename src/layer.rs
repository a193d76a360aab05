use ndarray::ArrayD;

use crate::{
    colormap::ColorMap,
    error::{Result, ViewerError},
};

/// One named image dataset shown with its own visibility toggle and colormap.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub data: ArrayD<f32>,
    pub visible: bool,
    pub colormap: Option<ColorMap>,
}

impl Layer {
    pub fn new(name: impl Into<String>, data: ArrayD<f32>) -> Self {
        Self {
            name: name.into(),
            data,
            visible: true,
            colormap: None,
        }
    }

    pub fn hidden(self) -> Self {
        self.with_visible(false)
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_colormap(mut self, colormap: ColorMap) -> Self {
        self.colormap = Some(colormap);
        self
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

/// Shared shape of a validated set of layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Flat([usize; 2]),
    Volume([usize; 3]),
}

impl Geometry {
    pub fn ndim(&self) -> usize {
        match self {
            Geometry::Flat(_) => 2,
            Geometry::Volume(_) => 3,
        }
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Geometry::Flat([nx, ny]) => write!(f, "{nx}x{ny}"),
            Geometry::Volume([nx, ny, nz]) => write!(f, "{nx}x{ny}x{nz}"),
        }
    }
}

/// Check that all layers share one shape of 2 or 3 dimensions.
pub fn validate_layers(layers: &[Layer]) -> Result<Geometry> {
    let first = layers.first().ok_or(ViewerError::NoLayers)?;
    let shape = first.data.shape();

    if let Some(other) = layers.iter().find(|layer| layer.data.shape() != shape) {
        return Err(ViewerError::ShapeMismatch {
            layer: other.name.clone(),
            expected: shape.to_vec(),
            found: other.data.shape().to_vec(),
        });
    }

    match *shape {
        [nx, ny] => Ok(Geometry::Flat([nx, ny])),
        [nx, ny, nz] => Ok(Geometry::Volume([nx, ny, nz])),
        _ => Err(ViewerError::UnsupportedDimensionality { ndim: shape.len() }),
    }
}
