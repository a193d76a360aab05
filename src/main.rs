mod phantom;

use std::{error::Error, thread, time::Duration};

use clap::Parser;
use eframe::egui::Color32;
use hdav::{ColorMap, Key, KeyCallbacks, Layer, Viewer, ViewerConfig, run_interactive};
use log::info;

#[derive(Parser, Debug)]
struct Args {
    /// Dimensionality of the generated phantom.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=3))]
    dims: u8,
    /// Edge length of the phantom in voxels.
    #[arg(long, default_value_t = 96)]
    size: usize,
    /// Window to show the layers in.
    #[arg(long, default_value_t = 0)]
    window_id: u32,
    /// Keep feeding updated layers while the window is open.
    #[arg(long)]
    interactive: bool,
    /// Upper display level as a quantile of each slice.
    #[arg(long, default_value_t = 1.0)]
    level_quantile: f32,
}

fn layers(shape: &[usize], ball_radius: f32, offset: f32) -> Vec<Layer> {
    vec![
        Layer::new("background", phantom::background(shape)),
        Layer::new("ball", phantom::ball(shape, ball_radius, offset))
            .with_colormap(ColorMap::tint(Color32::from_rgb(255, 64, 64))),
        Layer::new("gradient", phantom::gradient(shape))
            .with_colormap(ColorMap::hot())
            .hidden(),
    ]
}

fn callbacks() -> KeyCallbacks {
    let mut callbacks = KeyCallbacks::new();
    callbacks.insert(Key::Q, Box::new(|| info!("Q pressed")));
    callbacks
}

fn main() -> Result<(), Box<dyn Error + Sync + Send>> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let shape = vec![args.size; args.dims as usize];
    info!("phantom shape: {shape:?}");

    let config = ViewerConfig {
        level_quantile: args.level_quantile,
        ..Default::default()
    };

    if !args.interactive {
        let mut viewer = Viewer::new(config);
        viewer.view(layers(&shape, 0.25, 0.0), args.window_id, callbacks())?;
        viewer.run()?;
        return Ok(());
    }

    let window_id = args.window_id;
    run_interactive(config, move |handle| {
        for step in 0..20 {
            let offset = 0.15 * (step as f32 * 0.3).sin();
            handle.view(layers(&shape, 0.2, offset), window_id, callbacks())?;
            thread::sleep(Duration::from_millis(500));
        }
        info!("done producing");
        Ok(())
    })?;

    Ok(())
}
