// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::scenes::DemoScene;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-engine")]
#[command(about = "Scene graph engine demo", long_about = None)]
pub struct Cli {
    /// Demo scene to load
    #[arg(long, value_enum, default_value_t = DemoScene::Showcase)]
    pub scene: DemoScene,

    /// Run without a window, stepping a fixed number of frames
    #[arg(long)]
    pub headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Fixed frame delta in seconds for headless mode
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub delta: f32,

    /// JSON engine configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Override window height
    #[arg(long)]
    pub height: Option<u32>,

    /// Disable console output beyond warnings
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
