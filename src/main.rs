//! ASL letter recognition application: camera capture, cascaded
//! classification, and overlay display.

use anyhow::Result;
use asl_recognition::app::{AppConfig, GestureApp, GuiMode, VideoSource};
use asl_recognition::config::Config;
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to process instead of the camera
    #[arg(short, long)]
    video: Option<String>,

    /// GUI display mode (window, none)
    #[arg(short, long, default_value = "window")]
    gui: String,

    /// Disable mirroring of the camera image
    #[arg(long)]
    no_flip: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("ASL Letter Recognition");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if args.no_flip {
        config.display.flip_horizontal = false;
    }

    config.validate().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Build application configuration
    let app_config = AppConfig {
        video_source: if let Some(video_path) = args.video {
            VideoSource::File(video_path)
        } else {
            VideoSource::Camera(args.cam)
        },
        gui_mode: match args.gui.as_str() {
            "none" => GuiMode::None,
            _ => GuiMode::Window,
        },
    };

    // Create and run application
    let mut app = GestureApp::new(app_config, config)?;
    app.run()?;

    Ok(())
}
