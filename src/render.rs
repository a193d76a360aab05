use eframe::egui::{Color32, ColorImage};
use ndarray::ArrayView2;
use rayon::prelude::*;

/// Display range mapped onto the ends of a lookup table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub min: f32,
    pub max: f32,
}

impl Default for Levels {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl Levels {
    /// Minimum finite sample up to the `quantile` of the finite samples.
    pub fn auto(data: ArrayView2<f32>, quantile: f32) -> Self {
        let finite: Vec<f32> = data.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self::default();
        }
        let min = finite.iter().copied().fold(f32::INFINITY, f32::min);
        let max = if quantile >= 1.0 {
            finite.iter().copied().fold(f32::NEG_INFINITY, f32::max)
        } else {
            get_quantile(finite, quantile)
        };
        Self { min, max }
    }

    fn normalize(&self, value: f32) -> f32 {
        if self.max == self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

fn get_quantile(mut data: Vec<f32>, q: f32) -> f32 {
    data.sort_by(f32::total_cmp);
    let idx_for_q = ((data.len() as f32 * q.max(0.0)) as usize).min(data.len() - 1);
    data[idx_for_q]
}

/// Map a cross-section through `lut` into a texture.
///
/// Axis 0 of `data` runs left to right and axis 1 bottom to top, matching the
/// plot's coordinate system. NaN samples are fully transparent.
pub fn render_slice(data: ArrayView2<f32>, lut: &[Color32], levels: Levels) -> ColorImage {
    let (width, height) = data.dim();
    let mut rgba = vec![0u8; width * height * 4];
    if width == 0 || height == 0 || lut.is_empty() {
        return ColorImage::from_rgba_premultiplied([width, height], &rgba);
    }

    let last = lut.len() - 1;
    rgba.par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(row, pixels)| {
            let y = height - 1 - row;
            for (x, pixel) in pixels.chunks_exact_mut(4).enumerate() {
                let value = data[[x, y]];
                if value.is_nan() {
                    continue;
                }
                let idx = (levels.normalize(value) * last as f32).round() as usize;
                pixel.copy_from_slice(&lut[idx.min(last)].to_array());
            }
        });

    ColorImage::from_rgba_premultiplied([width, height], &rgba)
}
