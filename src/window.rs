use eframe::egui::{self, Key, RichText};
use log::{debug, info};

use crate::{
    config::ViewerConfig,
    error::Result,
    keys::{KeyCallbacks, KeyOutcome, OVERLAY_KEYS, dispatch_key},
    layer::{Geometry, Layer, validate_layers},
    slice::Cursor,
    viewport::{FlatView, VolumeView},
};

pub type WindowId = u32;

pub enum WindowView {
    Flat(FlatView),
    Volume(VolumeView),
}

impl WindowView {
    fn for_geometry(geometry: Geometry) -> Self {
        match geometry {
            Geometry::Flat(shape) => WindowView::Flat(FlatView::new(shape)),
            Geometry::Volume(shape) => WindowView::Volume(VolumeView::new(shape)),
        }
    }
}

/// A viewer window: a legend of layers next to one or three plot viewports.
pub struct ViewerWindow {
    id: WindowId,
    layers: Vec<Layer>,
    callbacks: KeyCallbacks,
    geometry: Geometry,
    view: WindowView,
}

impl ViewerWindow {
    pub fn new(id: WindowId, layers: Vec<Layer>, callbacks: KeyCallbacks) -> Result<Self> {
        let geometry = validate_layers(&layers)?;
        info!(
            "opening window {id} with {} layers of shape {geometry}",
            layers.len()
        );
        Ok(Self {
            id,
            layers,
            callbacks,
            geometry,
            view: WindowView::for_geometry(geometry),
        })
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> String {
        format!("hdav {} ({})", self.id, self.geometry)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Current cursor for 3-D windows.
    pub fn cursor(&self) -> Option<Cursor> {
        match &self.view {
            WindowView::Volume(view) => Some(view.cursor()),
            WindowView::Flat(_) => None,
        }
    }

    /// Move the cursor of a 3-D window, clamped to the data bounds. No-op for 2-D windows.
    pub fn move_cursor(&mut self, requested: [i64; 3]) {
        if let WindowView::Volume(view) = &mut self.view {
            view.move_cursor(requested);
        }
    }

    /// Replace layers and key callbacks wholesale.
    pub fn update_layers(&mut self, layers: Vec<Layer>, callbacks: KeyCallbacks) -> Result<()> {
        let geometry = validate_layers(&layers)?;
        match (&mut self.view, geometry) {
            (WindowView::Flat(view), Geometry::Flat(shape)) => view.reshape(shape),
            (WindowView::Volume(view), Geometry::Volume(shape)) => view.reshape(shape),
            (view, _) => *view = WindowView::for_geometry(geometry),
        }
        debug!(
            "window {} now shows {} layers of shape {geometry}",
            self.id,
            layers.len()
        );
        self.geometry = geometry;
        self.layers = layers;
        self.callbacks = callbacks;
        Ok(())
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        let outcome = dispatch_key(key, &mut self.callbacks, &mut self.layers);
        if let KeyOutcome::Toggled { layer } = outcome {
            debug!(
                "window {}: layer {} visible = {}",
                self.id, self.layers[layer].name, self.layers[layer].visible
            );
        }
        outcome
    }

    /// Draw the window into its own viewport.
    pub fn show(&mut self, ctx: &egui::Context, config: &ViewerConfig) {
        let pressed: Vec<Key> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(*key),
                    _ => None,
                })
                .collect()
        });
        for key in pressed {
            self.handle_key(key);
        }

        let id = egui::Id::new(("hdav-window", self.id));
        egui::SidePanel::left(id.with("legend"))
            .exact_width(config.legend_width)
            .resizable(false)
            .show(ctx, |ui| draw_legend(ui, &mut self.layers));

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.view {
            WindowView::Flat(view) => view.show(ui, id, &self.layers, config),
            WindowView::Volume(view) => view.show(ui, id, &self.layers, config),
        });
    }
}

fn draw_legend(ui: &mut egui::Ui, layers: &mut [Layer]) {
    for (i, layer) in layers.iter_mut().take(OVERLAY_KEYS.len()).enumerate() {
        let text = RichText::new(format!("{}   {}", i + 1, layer.name));
        let text = if layer.visible { text } else { text.weak() };
        if ui.selectable_label(layer.visible, text).clicked() {
            layer.toggle();
        }
    }
}
