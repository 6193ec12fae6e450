use log::{info, trace};

use super::frame::FrameInfo;
use super::timer::Throttled;
use crate::error::Result;
use crate::render::RenderPipeline;
use crate::scene::SceneGraph;

/// Consumes the final scene state each frame
pub trait RenderBackend {
    /// Called once before the first frame. Failures abort startup.
    fn initialize(&mut self, _scene: &SceneGraph, _pipeline: &RenderPipeline) -> Result<()> {
        Ok(())
    }

    /// Draw one frame from propagated world transforms
    fn render(&mut self, frame: &FrameInfo, scene: &SceneGraph, pipeline: &RenderPipeline) -> Result<()>;

    fn deinitialize(&mut self) {}

    /// Target resolution changed
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Draws nothing; counts frames
#[derive(Debug, Default, Clone)]
pub struct NullBackend {
    frames_rendered: u64,
    last_frame: Option<FrameInfo>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn last_frame(&self) -> Option<FrameInfo> {
        self.last_frame
    }
}

impl RenderBackend for NullBackend {
    fn render(&mut self, frame: &FrameInfo, _scene: &SceneGraph, _pipeline: &RenderPipeline) -> Result<()> {
        self.frames_rendered += 1;
        self.last_frame = Some(*frame);
        Ok(())
    }
}

/// Logs the pipeline graph at startup and frame statistics once per interval
#[derive(Debug)]
pub struct LogBackend {
    stats: Throttled,
    frames_in_interval: u32,
    frames_rendered: u64,
}

const STATS_INTERVAL: f32 = 1.0;

impl Default for LogBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBackend {
    pub fn new() -> Self {
        Self {
            stats: Throttled::new(STATS_INTERVAL),
            frames_in_interval: 0,
            frames_rendered: 0,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl RenderBackend for LogBackend {
    fn initialize(&mut self, scene: &SceneGraph, pipeline: &RenderPipeline) -> Result<()> {
        info!(
            "Render pipeline: {} stages, scene: {} objects",
            pipeline.len(),
            scene.len()
        );
        for (index, stage) in pipeline.enabled_stages() {
            let color = pipeline.resolve_link(index, &stage.links().color)?;
            info!(
                "  [{index}] {} {:?} shader={} color<-{}",
                stage.name(),
                stage.kind(),
                stage.shader_program().unwrap_or("-"),
                color.map_or_else(|| "screen".to_string(), |i| i.to_string())
            );
        }
        trace!("pipeline graph: {}", serde_json::to_string(pipeline)?);
        Ok(())
    }

    fn render(&mut self, frame: &FrameInfo, scene: &SceneGraph, _pipeline: &RenderPipeline) -> Result<()> {
        self.frames_rendered += 1;
        self.frames_in_interval += 1;

        let interval = self.stats.elapsed() + frame.delta;
        if self.stats.try_tick(frame.delta) {
            let fps = self.frames_in_interval as f32 / interval;
            match scene.active_camera() {
                Some(camera) => info!(
                    "frame {} | {:.1} fps | t={:.2}s | camera at {:.2}",
                    frame.number,
                    fps,
                    frame.time,
                    scene.world_matrix(camera)?.w_axis.truncate()
                ),
                None => info!("frame {} | {:.1} fps | t={:.2}s", frame.number, fps, frame.time),
            }
            self.frames_in_interval = 0;
        }
        Ok(())
    }

    fn deinitialize(&mut self) {
        info!("Rendered {} frames", self.frames_rendered);
    }

    fn resize(&mut self, width: u32, height: u32) {
        info!("Resized to {width}x{height}");
    }
}
