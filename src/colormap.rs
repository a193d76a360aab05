//! Colour lookup tables for layers.
//!
//! A [`ColorMap`] is a list of colour stops. Rendering samples it into a fixed
//! size lookup table once per layer and indexes that table per sample.

use eframe::egui::Color32;

use crate::error::{Result, ViewerError};

/// Number of entries in the lookup tables used for rendering.
pub const LUT_SIZE: usize = 256;

/// Unmultiplied sRGBA.
pub type Rgba = [u8; 4];

#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    stops: Vec<(f32, Rgba)>,
}

impl ColorMap {
    /// Build a colormap from `(position, unmultiplied rgba)` stops.
    ///
    /// Positions must be finite and ascending. A single stop yields a constant map.
    pub fn new(stops: Vec<(f32, Rgba)>) -> Result<Self> {
        if stops.is_empty() {
            return Err(ViewerError::InvalidColorMap("no stops given".into()));
        }
        if stops.iter().any(|(pos, _)| !pos.is_finite()) {
            return Err(ViewerError::InvalidColorMap(
                "stop positions must be finite".into(),
            ));
        }
        if stops.windows(2).any(|w| w[0].0 > w[1].0) {
            return Err(ViewerError::InvalidColorMap(
                "stop positions must be ascending".into(),
            ));
        }
        Ok(Self { stops })
    }

    pub fn grayscale() -> Self {
        Self {
            stops: vec![(0.0, [0, 0, 0, 255]), (1.0, [255, 255, 255, 255])],
        }
    }

    pub fn hot() -> Self {
        Self {
            stops: vec![
                (0.0, [0, 0, 0, 255]),
                (0.33, [230, 0, 0, 255]),
                (0.66, [255, 210, 0, 255]),
                (1.0, [255, 255, 255, 255]),
            ],
        }
    }

    pub fn viridis() -> Self {
        Self {
            stops: vec![
                (0.0, [68, 1, 84, 255]),
                (0.25, [59, 82, 139, 255]),
                (0.5, [33, 145, 140, 255]),
                (0.75, [94, 201, 98, 255]),
                (1.0, [253, 231, 37, 255]),
            ],
        }
    }

    /// Transparent at the low end, `color` at the high end. Meant for overlays.
    pub fn tint(color: Color32) -> Self {
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        Self {
            stops: vec![(0.0, [r, g, b, 0]), (1.0, [r, g, b, 255])],
        }
    }

    /// Sample `n` colours evenly between the first and the last stop.
    ///
    /// Colours between two stops are interpolated linearly in unmultiplied RGBA.
    pub fn lookup_table(&self, n: usize) -> Vec<Color32> {
        let start = self.stops[0].0;
        let stop = self.stops[self.stops.len() - 1].0;
        (0..n)
            .map(|i| {
                let t = if n > 1 {
                    i as f32 / (n - 1) as f32
                } else {
                    0.0
                };
                let [r, g, b, a] = self.color_at(start + t * (stop - start));
                Color32::from_rgba_unmultiplied(r, g, b, a)
            })
            .collect()
    }

    fn color_at(&self, pos: f32) -> Rgba {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if pos <= first.0 {
            return first.1;
        }
        if pos >= last.0 {
            return last.1;
        }
        let upper = self
            .stops
            .iter()
            .position(|(p, _)| *p >= pos)
            .unwrap_or(self.stops.len() - 1);
        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        if p1 <= p0 {
            return c1;
        }
        lerp(c0, c1, (pos - p0) / (p1 - p0))
    }
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    std::array::from_fn(|i| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8)
}
