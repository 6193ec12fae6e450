//! Demo scenes built entirely through the public engine API

mod aircraft;
mod common;
mod showcase;

pub use aircraft::create_aircraft_scene;
pub use common::bind_standard_events;
pub use showcase::create_showcase_scene;

use clap::ValueEnum;

use crate::core::{Engine, RenderBackend};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DemoScene {
    /// Lit tabletop, spline-following lamp, fly camera
    #[default]
    Showcase,
    /// Keyframed aircraft hierarchy
    Aircraft,
}

/// Populate `engine` with the chosen scene. Call before `Engine::initialize`.
pub fn build<B: RenderBackend>(engine: &mut Engine<B>, scene: DemoScene) -> Result<()> {
    log::info!("Building scene: {:?}", scene);
    match scene {
        DemoScene::Showcase => create_showcase_scene(engine),
        DemoScene::Aircraft => create_aircraft_scene(engine),
    }
}
