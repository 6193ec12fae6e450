//! Engine context, frame loop, frame sources and render backends

mod backend;
mod context;
mod engine;
mod frame;
mod timer;

pub use backend::{LogBackend, NullBackend, RenderBackend};
pub use context::{FrameContext, LoopControl};
pub use engine::{Engine, EngineState};
pub use frame::{FixedFrames, FrameInfo, FrameIterator};
pub use timer::Throttled;
