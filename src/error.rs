use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("at least one layer is required")]
    NoLayers,

    #[error(
        "all data entries must have the same shape: layer {layer} has shape {found:?}, expected {expected:?}"
    )]
    ShapeMismatch {
        layer: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("all data entries must have 2 or 3 dimensions, got {ndim}")]
    UnsupportedDimensionality { ndim: usize },

    #[error("invalid colormap: {0}")]
    InvalidColorMap(String),

    #[error("viewer has been closed")]
    Closed,

    #[error("gui error: {0}")]
    Gui(String),

    #[error("producer thread failed: {0}")]
    Producer(String),
}

impl From<eframe::Error> for ViewerError {
    fn from(err: eframe::Error) -> Self {
        ViewerError::Gui(err.to_string())
    }
}
