use anyhow::Context;
use clap::Parser;
use log::info;

use scene_engine::app::App;
use scene_engine::cli::Cli;
use scene_engine::config::EngineConfig;
use scene_engine::core::{Engine, FixedFrames, LogBackend};
use scene_engine::scenes;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.no_ui { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }
    config.validate()?;

    let mut engine = Engine::new(config, LogBackend::new());
    scenes::build(&mut engine, cli.scene).context("building scene")?;

    if cli.headless {
        engine.initialize()?;
        let ran = engine.run(FixedFrames::new(cli.delta, cli.frames))?;
        engine.deinitialize();
        info!("Headless run finished: {} frames", ran);
        return Ok(());
    }

    println!("Controls: WASD to move, Space toggles mouse look, Escape to quit");
    let frames = App::new(engine).run()?;
    info!("Exited after {} frames", frames);
    Ok(())
}
