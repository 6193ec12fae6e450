//! Declarative render-stage pipeline

mod pipeline;
mod stage;

pub use pipeline::RenderPipeline;
pub use stage::{
    Attachment, PipelineLink, RenderStage, StageFlags, StageKind, StageLinks, StageParameter,
    Viewport,
};
