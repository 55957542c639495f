mod app;
mod config;
mod scene;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use winit::dpi::LogicalSize;

use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::window::{Runtime, RuntimeConfig};

use app::ViewerApp;
use config::ViewerConfig;

const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;

#[derive(Parser, Debug)]
#[command(version, about = "Textured cube lit by orbiting point lights and a flashlight")]
struct Cli {
    /// Window width in logical pixels
    #[arg(value_parser = clap::value_parser!(u32).range(1..), requires = "height")]
    width: Option<u32>,

    /// Window height in logical pixels
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Directory holding the container and emissive images
    #[arg(long, value_name = "DIR")]
    textures: Option<PathBuf>,

    /// Log filter in env_logger syntax, e.g. "debug" or "lumen_engine=trace"
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

impl Cli {
    fn window_size(&self) -> LogicalSize<f64> {
        let width = self.width.unwrap_or(DEFAULT_WIDTH);
        let height = self.height.unwrap_or(DEFAULT_HEIGHT);
        LogicalSize::new(width as f64, height as f64)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let runtime = RuntimeConfig {
        title: "lumen".to_string(),
        initial_size: cli.window_size(),
        grab_cursor: true,
    };
    let viewer = ViewerConfig {
        texture_dir: cli.textures,
        ..ViewerConfig::default()
    };

    log::info!(
        "opening {}x{} window",
        runtime.initial_size.width,
        runtime.initial_size.height
    );
    Runtime::run(runtime, GpuInit::default(), ViewerApp::new(viewer))
}
