//! Plot viewports: one overlaid image for 2-D windows, three orthogonal
//! cross-sections with a crosshair cursor for 3-D windows.

use eframe::egui::{
    self, Color32, ColorImage, PointerButton, TextureHandle, TextureOptions, vec2,
};
use egui_plot::{HLine, Plot, PlotImage, PlotPoint, PlotResponse, PlotUi, VLine};
use log::{debug, warn};
use ndarray::{ArrayView2, Ix2, Ix3};

use crate::{
    colormap::{ColorMap, LUT_SIZE},
    config::ViewerConfig,
    layer::Layer,
    render::{Levels, render_slice},
    slice::{Cursor, ScrollAccumulator, SliceAxes, extract_slice},
};

/// Crosshair colour per volume axis.
pub const AXIS_COLORS: [Color32; 3] = [Color32::RED, Color32::GREEN, Color32::BLUE];
const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

fn layer_lut(layer: &Layer) -> Vec<Color32> {
    layer
        .colormap
        .as_ref()
        .map_or_else(ColorMap::grayscale, Clone::clone)
        .lookup_table(LUT_SIZE)
}

/// One texture per layer for a single plot.
#[derive(Default)]
struct LayerTextures {
    handles: Vec<TextureHandle>,
}

impl LayerTextures {
    fn upload(&mut self, ctx: &egui::Context, name: &str, images: Vec<ColorImage>) {
        self.handles.truncate(images.len());
        for (index, image) in images.into_iter().enumerate() {
            match self.handles.get_mut(index) {
                Some(handle) => handle.set(image, TextureOptions::NEAREST),
                None => self.handles.push(ctx.load_texture(
                    format!("{name}-layer-{index}"),
                    image,
                    TextureOptions::NEAREST,
                )),
            }
        }
    }
}

fn render_layer(layer: &Layer, data: ArrayView2<f32>, config: &ViewerConfig) -> ColorImage {
    let levels = Levels::auto(data, config.level_quantile);
    render_slice(data, &layer_lut(layer), levels)
}

fn locked_plot(id: egui::Id, size: [usize; 2]) -> Plot<'static> {
    Plot::new(id)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .include_x(0.0)
        .include_x(size[0] as f64)
        .include_y(0.0)
        .include_y(size[1] as f64)
}

fn draw_layers(
    plot_ui: &mut PlotUi,
    layers: &[Layer],
    textures: &LayerTextures,
    size: [usize; 2],
) {
    let (w, h) = (size[0] as f32, size[1] as f32);
    let center = PlotPoint::new(w as f64 / 2.0, h as f64 / 2.0);
    for (layer, texture) in layers.iter().zip(&textures.handles) {
        if layer.visible {
            plot_ui.image(PlotImage::new(&layer.name, texture.id(), center, vec2(w, h)));
        }
    }
}

pub struct FlatView {
    shape: [usize; 2],
    textures: LayerTextures,
    stale: bool,
}

impl FlatView {
    pub fn new(shape: [usize; 2]) -> Self {
        Self {
            shape,
            textures: LayerTextures::default(),
            stale: true,
        }
    }

    pub fn reshape(&mut self, shape: [usize; 2]) {
        self.shape = shape;
        self.stale = true;
    }

    fn refresh(
        &mut self,
        ctx: &egui::Context,
        id: egui::Id,
        layers: &[Layer],
        config: &ViewerConfig,
    ) {
        if !self.stale && self.textures.handles.len() == layers.len() {
            return;
        }
        let images = layers
            .iter()
            .filter_map(|layer| match layer.data.view().into_dimensionality::<Ix2>() {
                Ok(data) => Some(render_layer(layer, data, config)),
                Err(err) => {
                    warn!("layer {} is not 2-D: {err}", layer.name);
                    None
                }
            })
            .collect();
        self.textures.upload(ctx, &format!("{id:?}"), images);
        self.stale = false;
        debug!("uploaded {} flat textures", self.textures.handles.len());
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        id: egui::Id,
        layers: &[Layer],
        config: &ViewerConfig,
    ) {
        if self.shape.contains(&0) {
            ui.label("empty data");
            return;
        }
        self.refresh(ui.ctx(), id, layers, config);
        let shape = self.shape;
        let textures = &self.textures;
        locked_plot(id.with("plot"), shape).show(ui, |plot_ui| {
            draw_layers(plot_ui, layers, textures, shape);
        });
    }
}

pub struct VolumeView {
    shape: [usize; 3],
    cursor: Cursor,
    planes: [LayerTextures; 3],
    scroll: ScrollAccumulator,
    stale: bool,
}

impl VolumeView {
    pub fn new(shape: [usize; 3]) -> Self {
        Self {
            shape,
            cursor: Cursor::centered(shape),
            planes: Default::default(),
            scroll: ScrollAccumulator::default(),
            stale: true,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Adopt a new shape, keeping the cursor where it still fits.
    pub fn reshape(&mut self, shape: [usize; 3]) {
        self.shape = shape;
        self.cursor = Cursor::clamped(self.cursor.as_i64(), shape);
        self.scroll.reset();
        self.stale = true;
    }

    pub fn move_cursor(&mut self, requested: [i64; 3]) {
        let cursor = Cursor::clamped(requested, self.shape);
        if cursor != self.cursor {
            debug!("cursor moved to {:?}", cursor.0);
            self.cursor = cursor;
            self.stale = true;
        }
    }

    fn refresh(
        &mut self,
        ctx: &egui::Context,
        id: egui::Id,
        layers: &[Layer],
        config: &ViewerConfig,
    ) {
        if !self.stale && self.planes[0].handles.len() == layers.len() {
            return;
        }
        let volumes: Vec<_> = layers
            .iter()
            .filter_map(|layer| match layer.data.view().into_dimensionality::<Ix3>() {
                Ok(volume) => Some((layer, volume)),
                Err(err) => {
                    warn!("layer {} is not 3-D: {err}", layer.name);
                    None
                }
            })
            .collect();

        for (plane, (name, axes)) in self.planes.iter_mut().zip(SliceAxes::ALL) {
            let images = volumes
                .iter()
                .map(|(layer, volume)| {
                    render_layer(layer, extract_slice(volume.view(), axes, self.cursor), config)
                })
                .collect();
            plane.upload(ctx, &format!("{id:?}-{name}"), images);
        }
        self.stale = false;
        debug!("uploaded slices at {:?}", self.cursor.0);
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        id: egui::Id,
        layers: &[Layer],
        config: &ViewerConfig,
    ) {
        if self.shape.contains(&0) {
            ui.label("empty data");
            return;
        }
        self.refresh(ui.ctx(), id, layers, config);

        let mut requested = None;
        let shape = self.shape;
        let cursor = self.cursor;
        let planes = &self.planes;
        let scroll = &mut self.scroll;

        ui.columns(3, |columns| {
            for (plane, ((column, textures), (name, axes))) in
                columns.iter_mut().zip(planes).zip(SliceAxes::ALL).enumerate()
            {
                column.label(name);
                let size = axes.plane_size(shape);
                let response = locked_plot(id.with(name), size).show(column, |plot_ui| {
                    draw_layers(plot_ui, layers, textures, size);
                    draw_crosshair(plot_ui, axes, cursor);
                });
                let wheel = WheelInput {
                    plane,
                    scroll: &mut *scroll,
                    points_per_slice: config.scroll_points_per_slice,
                };
                let moved = pointer_to_cursor(column, &response, axes, cursor, shape, wheel);
                if moved.is_some() {
                    requested = moved;
                }
            }
        });

        if let Some(moved) = requested {
            self.move_cursor(moved.as_i64());
        }
    }
}

/// Colours of the `(vertical, horizontal)` crosshair lines. Each line takes
/// the colour of the axis it runs along.
fn crosshair_colors(axes: SliceAxes) -> (Color32, Color32) {
    (AXIS_COLORS[axes.y], AXIS_COLORS[axes.x])
}

fn draw_crosshair(plot_ui: &mut PlotUi, axes: SliceAxes, cursor: Cursor) {
    // lines run through voxel centres
    let x = cursor.0[axes.x] as f64 + 0.5;
    let y = cursor.0[axes.y] as f64 + 0.5;
    let (vertical, horizontal) = crosshair_colors(axes);
    plot_ui.vline(VLine::new(AXIS_NAMES[axes.y], x).color(vertical).width(1.0));
    plot_ui.hline(HLine::new(AXIS_NAMES[axes.x], y).color(horizontal).width(1.0));
}

struct WheelInput<'a> {
    plane: usize,
    scroll: &'a mut ScrollAccumulator,
    points_per_slice: f32,
}

fn pointer_to_cursor(
    ui: &egui::Ui,
    plot: &PlotResponse<()>,
    axes: SliceAxes,
    cursor: Cursor,
    shape: [usize; 3],
    wheel: WheelInput<'_>,
) -> Option<Cursor> {
    let response = &plot.response;
    if (response.clicked() || response.dragged_by(PointerButton::Primary))
        && let Some(pos) = response.interact_pointer_pos()
    {
        let point = plot.transform.value_from_position(pos);
        return Some(cursor.with_click(axes, [point.x, point.y], shape));
    }
    if response.hovered() {
        let delta = ui.input(|i| i.raw_scroll_delta.y);
        let steps = wheel
            .scroll
            .feed(wheel.plane, delta, wheel.points_per_slice);
        if steps != 0 {
            return Some(cursor.with_scroll(axes, steps, shape));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;

    #[test]
    fn volume_view_starts_centered_and_clean_cursor_moves() {
        let mut view = VolumeView::new([4, 6, 8]);
        assert_eq!(view.cursor(), Cursor([2, 3, 4]));
        assert!(view.stale);

        view.stale = false;
        view.move_cursor([2, 3, 4]);
        assert!(!view.stale);

        view.move_cursor([-1, 100, 5]);
        assert_eq!(view.cursor(), Cursor([0, 5, 5]));
        assert!(view.stale);
    }

    #[test]
    fn reshape_reclamps_cursor() {
        let mut view = VolumeView::new([10, 10, 10]);
        view.move_cursor([9, 9, 9]);
        view.reshape([4, 12, 2]);
        assert_eq!(view.cursor(), Cursor([3, 9, 1]));
    }

    #[test]
    fn reshape_drops_pending_scroll() {
        let mut view = VolumeView::new([10, 10, 10]);
        assert_eq!(view.scroll.feed(0, 40.0, 50.0), 0);
        view.reshape([10, 10, 10]);
        assert_eq!(view.scroll.feed(0, 40.0, 50.0), 0);
        assert_eq!(view.scroll.feed(0, 10.0, 50.0), 1);
    }

    #[test]
    fn crosshair_lines_take_the_colour_of_their_axis() {
        assert_eq!(
            crosshair_colors(SliceAxes::AXIAL),
            (Color32::GREEN, Color32::RED)
        );
        assert_eq!(
            crosshair_colors(SliceAxes::CORONAL),
            (Color32::BLUE, Color32::RED)
        );
        assert_eq!(
            crosshair_colors(SliceAxes::SAGITTAL),
            (Color32::BLUE, Color32::GREEN)
        );
    }

    #[test]
    fn layers_without_colormap_render_grayscale() {
        let layer = Layer::new("a", ArrayD::zeros(IxDyn(&[2, 2])));
        let lut = layer_lut(&layer);
        assert_eq!(lut.first(), Some(&Color32::BLACK));
        assert_eq!(lut.last(), Some(&Color32::WHITE));

        let tinted = layer.with_colormap(ColorMap::tint(Color32::BLUE));
        assert_eq!(layer_lut(&tinted)[0], Color32::TRANSPARENT);
    }
}
