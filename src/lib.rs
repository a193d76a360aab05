//! # hdav
//!
//! A viewer for 2- and 3-D multi-layered image data.
//!
//! Layers are named arrays of `f32` samples that share one shape. They are
//! drawn on top of each other, each through its own [`ColorMap`], and the keys
//! `1` to `9` toggle the first nine of them. 2-D layers are shown in a single
//! plot. 3-D layers are shown as axial, coronal and sagittal cross-sections
//! through a cursor which follows clicks, drags and the mouse wheel.
//!
//! Windows are identified by a [`WindowId`]. Showing layers under an id that
//! is already open replaces that window's layers.
//!
//! ```no_run
//! use hdav::{KeyCallbacks, Layer, view};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let base = ArrayD::from_shape_fn(IxDyn(&[64, 64, 32]), |idx| (idx[0] + idx[1]) as f32);
//! view(vec![Layer::new("base", base)], 0, KeyCallbacks::new()).unwrap();
//! ```
//!
//! To keep computing while windows are open, use [`run_interactive`] and send
//! layers through the [`ViewerHandle`] it hands to the producer.

pub mod app;
pub mod colormap;
pub mod config;
pub mod error;
pub mod keys;
pub mod layer;
pub mod registry;
pub mod render;
pub mod slice;
pub mod viewport;
pub mod window;

pub use app::{ViewRequest, Viewer, ViewerHandle, run_interactive, view};
pub use colormap::ColorMap;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use keys::{KeyCallbacks, KeyOutcome};
pub use layer::{Geometry, Layer, validate_layers};
pub use registry::{Registration, Registry};
pub use slice::{Cursor, SliceAxes};
pub use window::{ViewerWindow, WindowId};

pub use eframe::egui::Key;
