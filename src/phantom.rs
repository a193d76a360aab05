use ndarray::{ArrayD, Dimension, IxDyn};

/// Smooth background: a radial falloff with a faint ramp along axis 0.
pub fn background(shape: &[usize]) -> ArrayD<f32> {
    let center = centers(shape);
    let scale = shape.iter().copied().max().unwrap_or(1).max(1) as f32;
    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        let r = radius(idx.slice(), &center) / scale;
        let ramp = idx[0] as f32 / scale;
        (1.0 - r).max(0.0) + 0.2 * ramp
    })
}

/// Ball (disc for 2-D) of the given relative radius, brightest at its centre
/// and NaN outside.
pub fn ball(shape: &[usize], relative_radius: f32, offset: f32) -> ArrayD<f32> {
    let center: Vec<f32> = centers(shape)
        .iter()
        .zip(shape)
        .map(|(c, n)| c + offset * *n as f32)
        .collect();
    let limit = relative_radius * shape.iter().copied().min().unwrap_or(0) as f32;
    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        let r = radius(idx.slice(), &center);
        if r <= limit {
            0.5 + 0.5 * (1.0 - r / limit)
        } else {
            f32::NAN
        }
    })
}

/// Linear gradient along the last axis.
pub fn gradient(shape: &[usize]) -> ArrayD<f32> {
    let last = shape.len().saturating_sub(1);
    ArrayD::from_shape_fn(IxDyn(shape), |idx| idx[last] as f32)
}

fn centers(shape: &[usize]) -> Vec<f32> {
    shape.iter().map(|n| *n as f32 / 2.0).collect()
}

fn radius(idx: &[usize], center: &[f32]) -> f32 {
    idx.iter()
        .zip(center)
        .map(|(i, c)| (*i as f32 + 0.5 - c).powi(2))
        .sum::<f32>()
        .sqrt()
}
