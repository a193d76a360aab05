use std::time::Duration;

/// Tunables shared by every window of a viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Initial inner size of a window showing 2-D layers.
    pub flat_window_size: [f32; 2],
    /// Initial inner size of a window showing 3-D layers.
    pub volume_window_size: [f32; 2],
    pub legend_width: f32,
    /// Wheel distance that moves the cursor by one slice.
    pub scroll_points_per_slice: f32,
    /// Upper display level as a quantile of each slice; 1.0 uses the maximum.
    pub level_quantile: f32,
    /// How often pending view requests are picked up while a producer is connected.
    pub poll_interval: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            flat_window_size: [520.0, 340.0],
            volume_window_size: [1120.0, 380.0],
            legend_width: 200.0,
            scroll_points_per_slice: 50.0,
            level_quantile: 1.0,
            poll_interval: Duration::from_millis(50),
        }
    }
}
