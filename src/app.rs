use std::{
    error::Error,
    sync::mpsc::{Receiver, Sender, TryRecvError, channel},
    thread,
};

use eframe::egui::{self, ViewportBuilder, ViewportCommand, ViewportId};
use log::{debug, info, warn};

use crate::{
    config::ViewerConfig,
    error::{Result, ViewerError},
    keys::KeyCallbacks,
    layer::{Geometry, Layer, validate_layers},
    registry::{Registration, Registry},
    window::WindowId,
};

/// Messages from a producer thread to the running viewer.
pub enum ViewRequest {
    Show {
        window_id: WindowId,
        layers: Vec<Layer>,
        callbacks: KeyCallbacks,
    },
    Close {
        window_id: WindowId,
    },
}

/// Sends layers to a viewer running on another thread. Calls return immediately.
#[derive(Clone)]
pub struct ViewerHandle {
    sender: Sender<ViewRequest>,
}

impl ViewerHandle {
    /// Show `layers` in window `window_id`, opening it or replacing its layers.
    ///
    /// Layers are validated here, so shape errors surface on the calling thread.
    pub fn view(
        &self,
        layers: Vec<Layer>,
        window_id: WindowId,
        callbacks: KeyCallbacks,
    ) -> Result<()> {
        validate_layers(&layers)?;
        self.send(ViewRequest::Show {
            window_id,
            layers,
            callbacks,
        })
    }

    pub fn close(&self, window_id: WindowId) -> Result<()> {
        self.send(ViewRequest::Close { window_id })
    }

    fn send(&self, request: ViewRequest) -> Result<()> {
        self.sender.send(request).map_err(|_| ViewerError::Closed)
    }
}

/// Windows registered up front and shown by a blocking event loop.
#[derive(Default)]
pub struct Viewer {
    config: ViewerConfig,
    registry: Registry,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
        }
    }

    pub fn view(
        &mut self,
        layers: Vec<Layer>,
        window_id: WindowId,
        callbacks: KeyCallbacks,
    ) -> Result<Registration> {
        self.registry.show(window_id, layers, callbacks)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the event loop until every window has been closed.
    pub fn run(self) -> Result<()> {
        run_app(self.config, self.registry, None)
    }
}

/// Show `layers` in window `window_id` and block until the user closes it.
pub fn view(layers: Vec<Layer>, window_id: WindowId, callbacks: KeyCallbacks) -> Result<()> {
    let mut viewer = Viewer::default();
    viewer.view(layers, window_id, callbacks)?;
    viewer.run()
}

/// Run the event loop on this thread while `producer` feeds it from a worker thread.
///
/// The loop keeps running while the producer is alive, and afterwards until
/// every window is closed. A producer that stops with [`ViewerError::Closed`]
/// because the viewer went away counts as success.
pub fn run_interactive<F>(config: ViewerConfig, producer: F) -> Result<()>
where
    F: FnOnce(ViewerHandle) -> std::result::Result<(), Box<dyn Error + Send + Sync>>
        + Send
        + 'static,
{
    let (sender, receiver) = channel();
    let handle = ViewerHandle { sender };
    let worker = thread::Builder::new()
        .name("hdav-producer".into())
        .spawn(move || producer(handle))
        .map_err(|err| ViewerError::Producer(err.to_string()))?;

    let ui_result = run_app(config, Registry::new(), Some(receiver));

    let produced = worker
        .join()
        .map_err(|_| ViewerError::Producer("producer thread panicked".into()))?;
    ui_result?;

    match produced {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast::<ViewerError>() {
            Ok(err) if matches!(*err, ViewerError::Closed) => Ok(()),
            Ok(err) => Err(*err),
            Err(other) => Err(ViewerError::Producer(other.to_string())),
        },
    }
}

fn run_app(
    config: ViewerConfig,
    registry: Registry,
    requests: Option<Receiver<ViewRequest>>,
) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("hdav")
            .with_inner_size([380.0, 240.0]),
        ..Default::default()
    };

    info!("starting viewer with {} window(s)", registry.len());
    eframe::run_native(
        "hdav",
        options,
        Box::new(move |_cc| {
            let app = ViewerApp {
                config,
                registry,
                requests,
            };
            Ok(Box::new(app))
        }),
    )?;
    info!("viewer closed");

    Ok(())
}

struct ViewerApp {
    config: ViewerConfig,
    registry: Registry,
    requests: Option<Receiver<ViewRequest>>,
}

fn viewport_id(window_id: WindowId) -> ViewportId {
    ViewportId::from_hash_of(("hdav-viewport", window_id))
}

impl ViewerApp {
    fn poll_requests(&mut self) {
        let Some(requests) = &self.requests else {
            return;
        };
        let mut disconnected = false;
        loop {
            match requests.try_recv() {
                Ok(request) => apply_request(&mut self.registry, request),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            info!("producer finished");
            self.requests = None;
        }
    }

    fn window_size(&self, geometry: Geometry) -> [f32; 2] {
        match geometry {
            Geometry::Flat(_) => self.config.flat_window_size,
            Geometry::Volume(_) => self.config.volume_window_size,
        }
    }

    fn draw_control(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("hdav");
            if self.registry.is_empty() {
                ui.label("Waiting for layers...");
                return;
            }
            egui::Grid::new("hdav-windows")
                .striped(true)
                .num_columns(4)
                .show(ui, |ui| {
                    for window in self.registry.iter() {
                        ui.monospace(window.id().to_string());
                        ui.label(format!(
                            "{} ({} layers)",
                            window.geometry(),
                            window.layers().len()
                        ));
                        match window.cursor() {
                            Some(cursor) => ui.monospace(format!("{:?}", cursor.0)),
                            None => ui.label(""),
                        };
                        if ui.button("Focus").clicked() {
                            ctx.send_viewport_cmd_to(
                                viewport_id(window.id()),
                                ViewportCommand::Focus,
                            );
                        }
                        ui.end_row();
                    }
                });
        });
    }
}

fn apply_request(registry: &mut Registry, request: ViewRequest) {
    match request {
        ViewRequest::Show {
            window_id,
            layers,
            callbacks,
        } => match registry.show(window_id, layers, callbacks) {
            Ok(registration) => debug!("window {window_id}: {registration:?}"),
            Err(err) => warn!("rejected layers for window {window_id}: {err}"),
        },
        ViewRequest::Close { window_id } => {
            registry.close(window_id);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_requests();
        self.draw_control(ctx);

        let mut closed = Vec::new();
        for id in self.registry.ids() {
            let size = match self.registry.get(id) {
                Some(window) => self.window_size(window.geometry()),
                None => continue,
            };
            let Some(window) = self.registry.get_mut(id) else {
                continue;
            };
            let config = &self.config;
            ctx.show_viewport_immediate(
                viewport_id(id),
                ViewportBuilder::default()
                    .with_title(window.title())
                    .with_inner_size(size),
                |ctx, _class| {
                    if ctx.input(|i| i.viewport().close_requested()) {
                        closed.push(id);
                        return;
                    }
                    window.show(ctx, config);
                },
            );
        }
        for id in closed {
            self.registry.close(id);
        }

        if self.requests.is_some() {
            ctx.request_repaint_after(self.config.poll_interval);
        } else if self.registry.is_empty() {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;

    fn layer(shape: &[usize]) -> Layer {
        Layer::new("a", ArrayD::zeros(IxDyn(shape)))
    }

    fn app_with_channel() -> (ViewerApp, ViewerHandle) {
        let (sender, receiver) = channel();
        let app = ViewerApp {
            config: ViewerConfig::default(),
            registry: Registry::new(),
            requests: Some(receiver),
        };
        (app, ViewerHandle { sender })
    }

    #[test]
    fn handle_validates_before_sending() {
        let (mut app, handle) = app_with_channel();
        let result = handle.view(vec![layer(&[2, 2]), layer(&[2, 3])], 0, KeyCallbacks::new());
        assert!(matches!(result, Err(ViewerError::ShapeMismatch { .. })));
        app.poll_requests();
        assert!(app.registry.is_empty());
    }

    #[test]
    fn requests_are_applied_in_order() {
        let (mut app, handle) = app_with_channel();
        handle.view(vec![layer(&[2, 2])], 0, KeyCallbacks::new()).unwrap();
        handle
            .view(vec![layer(&[2, 2]), layer(&[2, 2])], 0, KeyCallbacks::new())
            .unwrap();
        handle.view(vec![layer(&[2, 2, 2])], 5, KeyCallbacks::new()).unwrap();
        handle.close(5).unwrap();
        app.poll_requests();

        assert_eq!(app.registry.ids(), vec![0]);
        assert_eq!(app.registry.get(0).unwrap().layers().len(), 2);
        assert!(app.requests.is_some());
    }

    #[test]
    fn dropped_handle_disconnects() {
        let (mut app, handle) = app_with_channel();
        handle.view(vec![layer(&[2, 2])], 1, KeyCallbacks::new()).unwrap();
        drop(handle);
        app.poll_requests();
        assert_eq!(app.registry.len(), 1);
        assert!(app.requests.is_none());
    }

    #[test]
    fn handle_reports_closed_viewer() {
        let (app, handle) = app_with_channel();
        drop(app);
        assert!(matches!(
            handle.view(vec![layer(&[2, 2])], 0, KeyCallbacks::new()),
            Err(ViewerError::Closed)
        ));
    }

    #[test]
    fn viewer_registers_before_running() {
        let mut viewer = Viewer::default();
        assert_eq!(
            viewer
                .view(vec![layer(&[4, 4, 4])], 2, KeyCallbacks::new())
                .unwrap(),
            Registration::Created
        );
        assert_eq!(
            viewer
                .view(vec![layer(&[4, 4, 4])], 2, KeyCallbacks::new())
                .unwrap(),
            Registration::Updated
        );
        assert_eq!(viewer.registry().len(), 1);
    }
}
