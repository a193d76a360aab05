use ndarray::{ArrayView2, ArrayView3, Axis};

/// Which volume axes a cross-section shows horizontally and vertically, and
/// which one it cuts through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceAxes {
    pub x: usize,
    pub y: usize,
    pub depth: usize,
}

impl SliceAxes {
    pub const AXIAL: SliceAxes = SliceAxes { x: 0, y: 1, depth: 2 };
    pub const CORONAL: SliceAxes = SliceAxes { x: 0, y: 2, depth: 1 };
    pub const SAGITTAL: SliceAxes = SliceAxes { x: 1, y: 2, depth: 0 };

    pub const ALL: [(&'static str, SliceAxes); 3] = [
        ("axial", SliceAxes::AXIAL),
        ("coronal", SliceAxes::CORONAL),
        ("sagittal", SliceAxes::SAGITTAL),
    ];

    /// Size of the cross-section as `[width, height]`.
    pub fn plane_size(&self, shape: [usize; 3]) -> [usize; 2] {
        [shape[self.x], shape[self.y]]
    }
}

/// Voxel position selecting the slices of a volume window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(pub [usize; 3]);

impl Cursor {
    pub fn centered(shape: [usize; 3]) -> Self {
        Cursor(shape.map(|n| n / 2))
    }

    /// Clamp each component into `0..=shape[i] - 1`.
    pub fn clamped(requested: [i64; 3], shape: [usize; 3]) -> Self {
        let mut pos = [0usize; 3];
        for i in 0..3 {
            let max = shape[i].saturating_sub(1) as i64;
            pos[i] = requested[i].clamp(0, max) as usize;
        }
        Cursor(pos)
    }

    pub fn as_i64(&self) -> [i64; 3] {
        self.0.map(|v| v as i64)
    }

    /// Move the in-plane components of `axes` to a clicked point given in
    /// data coordinates of that cross-section.
    pub fn with_click(&self, axes: SliceAxes, point: [f64; 2], shape: [usize; 3]) -> Self {
        let mut requested = self.as_i64();
        requested[axes.x] = to_index(point[0]);
        requested[axes.y] = to_index(point[1]);
        Cursor::clamped(requested, shape)
    }

    /// Step the depth component of `axes` by `steps` slices.
    pub fn with_scroll(&self, axes: SliceAxes, steps: i64, shape: [usize; 3]) -> Self {
        let mut requested = self.as_i64();
        requested[axes.depth] = requested[axes.depth].saturating_add(steps);
        Cursor::clamped(requested, shape)
    }
}

fn to_index(coordinate: f64) -> i64 {
    if coordinate.is_nan() {
        0
    } else {
        // `as` saturates at the i64 bounds
        coordinate.floor() as i64
    }
}

/// Cross-section through `volume` at the cursor's depth along `axes.depth`.
///
/// Axis 0 of the result runs along `axes.x`, axis 1 along `axes.y`.
pub fn extract_slice<'a>(
    volume: ArrayView3<'a, f32>,
    axes: SliceAxes,
    cursor: Cursor,
) -> ArrayView2<'a, f32> {
    let plane = volume.index_axis_move(Axis(axes.depth), cursor.0[axes.depth]);
    if axes.x < axes.y {
        plane
    } else {
        plane.reversed_axes()
    }
}

/// Turns wheel deltas (in points) into whole slice steps, carrying the rest.
///
/// The remainder belongs to one source plane. Scrolling over a different
/// plane starts from zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollAccumulator {
    pending: f32,
    source: Option<usize>,
}

impl ScrollAccumulator {
    pub fn feed(&mut self, source: usize, delta: f32, points_per_slice: f32) -> i64 {
        if self.source != Some(source) {
            self.reset();
            self.source = Some(source);
        }
        if points_per_slice <= 0.0 || !delta.is_finite() {
            return 0;
        }
        self.pending += delta;
        let steps = (self.pending / points_per_slice).trunc();
        self.pending -= steps * points_per_slice;
        steps as i64
    }

    pub fn reset(&mut self) {
        self.pending = 0.0;
        self.source = None;
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    fn indexed_volume(shape: [usize; 3]) -> Array3<f32> {
        Array3::from_shape_fn(shape, |(i, j, k)| (i * 100 + j * 10 + k) as f32)
    }

    #[test]
    fn clamped_cursor_stays_in_bounds() {
        let shape = [4, 1, 9];
        for requested in [
            [-5, 0, 3],
            [100, -1, 100],
            [i64::MIN, i64::MAX, 8],
            [3, 0, 9],
        ] {
            let Cursor(pos) = Cursor::clamped(requested, shape);
            for i in 0..3 {
                assert!(pos[i] <= shape[i] - 1, "{requested:?} -> {pos:?}");
            }
        }
        assert_eq!(Cursor::clamped([2, 0, 5], shape), Cursor([2, 0, 5]));
        assert_eq!(Cursor::clamped([-2, 7, 50], shape), Cursor([0, 0, 8]));
    }

    #[test]
    fn centered_cursor() {
        assert_eq!(Cursor::centered([4, 5, 1]), Cursor([2, 2, 0]));
    }

    #[test]
    fn slices_have_expected_shapes_and_values() {
        let volume = indexed_volume([3, 4, 5]);
        let cursor = Cursor([1, 2, 3]);

        let axial = extract_slice(volume.view(), SliceAxes::AXIAL, cursor);
        assert_eq!(axial.dim(), (3, 4));
        assert_eq!(axial[[2, 1]], 213.0);

        let coronal = extract_slice(volume.view(), SliceAxes::CORONAL, cursor);
        assert_eq!(coronal.dim(), (3, 5));
        assert_eq!(coronal[[0, 4]], 24.0);

        let sagittal = extract_slice(volume.view(), SliceAxes::SAGITTAL, cursor);
        assert_eq!(sagittal.dim(), (4, 5));
        assert_eq!(sagittal[[3, 1]], 131.0);
    }

    #[test]
    fn plane_size_follows_axes() {
        let shape = [3, 4, 5];
        assert_eq!(SliceAxes::AXIAL.plane_size(shape), [3, 4]);
        assert_eq!(SliceAxes::CORONAL.plane_size(shape), [3, 5]);
        assert_eq!(SliceAxes::SAGITTAL.plane_size(shape), [4, 5]);
    }

    #[test]
    fn click_moves_only_in_plane_components() {
        let shape = [10, 20, 30];
        let cursor = Cursor([5, 5, 5]);
        assert_eq!(
            cursor.with_click(SliceAxes::CORONAL, [7.9, 12.2], shape),
            Cursor([7, 5, 12])
        );
        assert_eq!(
            cursor.with_click(SliceAxes::SAGITTAL, [-3.0, 99.0], shape),
            Cursor([5, 0, 29])
        );
        assert_eq!(
            cursor.with_click(SliceAxes::AXIAL, [f64::NAN, 1.5], shape),
            Cursor([0, 1, 5])
        );
    }

    #[test]
    fn scroll_moves_only_depth() {
        let shape = [10, 20, 30];
        let cursor = Cursor([5, 5, 5]);
        assert_eq!(
            cursor.with_scroll(SliceAxes::AXIAL, 3, shape),
            Cursor([5, 5, 8])
        );
        assert_eq!(
            cursor.with_scroll(SliceAxes::SAGITTAL, -100, shape),
            Cursor([0, 5, 5])
        );
        assert_eq!(
            cursor.with_scroll(SliceAxes::CORONAL, 100, shape),
            Cursor([5, 19, 5])
        );
    }

    #[test]
    fn scroll_accumulator_carries_remainder() {
        let mut acc = ScrollAccumulator::default();
        assert_eq!(acc.feed(0, 30.0, 50.0), 0);
        assert_eq!(acc.feed(0, 30.0, 50.0), 1);
        assert_eq!(acc.feed(0, -120.0, 50.0), -2);
        assert_eq!(acc.feed(0, f32::NAN, 50.0), 0);
        acc.reset();
        assert_eq!(acc.feed(0, 49.0, 50.0), 0);
        assert_eq!(acc.feed(0, 10.0, 0.0), 0);
    }

    #[test]
    fn scrolling_another_plane_drops_remainder() {
        let mut acc = ScrollAccumulator::default();
        assert_eq!(acc.feed(0, 40.0, 50.0), 0);
        assert_eq!(acc.feed(1, 40.0, 50.0), 0);
        assert_eq!(acc.feed(1, 10.0, 50.0), 1);

        assert_eq!(acc.feed(2, 40.0, 50.0), 0);
        acc.reset();
        assert_eq!(acc.feed(2, 10.0, 50.0), 0);
    }
}
