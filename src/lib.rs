pub mod animation;
pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod math;
pub mod render;
pub mod scene;
pub mod scenes;

pub use crate::core::{Engine, FrameContext, LoopControl, RenderBackend};
pub use error::{EngineError, Result};
pub use scene::{ObjectHandle, SceneGraph, Transform};
