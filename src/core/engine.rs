use log::{debug, info, trace, warn};

use super::backend::{NullBackend, RenderBackend};
use super::context::{FrameContext, LoopControl};
use super::frame::FrameInfo;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::input::InputController;
use crate::render::RenderPipeline;
use crate::scene::SceneGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Created,
    Running,
    Deinitialized,
}

/// Explicit engine context: owns the scene, input, render pipeline and
/// backend, and runs the frame loop.
///
/// Each [`step`](Self::step) runs the phases in a fixed order:
/// 1. input dispatch (events, then axes)
/// 2. behaviors and animations
/// 3. world transform propagation
/// 4. backend render
///
/// A stop request is only honoured between frames.
pub struct Engine<B: RenderBackend = NullBackend> {
    config: EngineConfig,
    scene: SceneGraph,
    input: InputController,
    pipeline: RenderPipeline,
    backend: B,
    control: LoopControl,
    state: EngineState,
    frames: u64,
    time: f32,
}

impl Engine<NullBackend> {
    /// Engine with a [`NullBackend`] and default config
    pub fn headless() -> Self {
        Self::new(EngineConfig::default(), NullBackend::new())
    }
}

impl<B: RenderBackend> Engine<B> {
    pub fn new(config: EngineConfig, backend: B) -> Self {
        let mut scene = SceneGraph::new();
        scene.set_resolution(config.window.width, config.window.height);
        Self {
            config,
            scene,
            input: InputController::new(),
            pipeline: RenderPipeline::new(),
            backend,
            control: LoopControl::new(),
            state: EngineState::Created,
            frames: 0,
            time: 0.0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut RenderPipeline {
        &mut self.pipeline
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn control(&self) -> &LoopControl {
        &self.control
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds since initialize
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Validate the pipeline and start the backend. Any failure here is a
    /// `Setup` error.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state == EngineState::Running {
            return Err(EngineError::State("engine already initialized".into()));
        }

        self.pipeline
            .validate()
            .map_err(|e| EngineError::Setup(format!("invalid render pipeline: {e}")))?;
        self.backend
            .initialize(&self.scene, &self.pipeline)
            .map_err(|e| EngineError::Setup(format!("backend failed to start: {e}")))?;

        self.scene.update_world_transforms();
        self.control.clear_stop();
        self.state = EngineState::Running;
        self.frames = 0;
        self.time = 0.0;
        info!(
            "Engine initialized: {} objects, {} render stages",
            self.scene.len(),
            self.pipeline.len()
        );
        Ok(())
    }

    /// Run one frame covering `delta` seconds (clamped to the configured maximum)
    pub fn step(&mut self, delta: f32) -> Result<FrameInfo> {
        if self.state != EngineState::Running {
            return Err(EngineError::State(format!(
                "cannot step engine in state {:?}",
                self.state
            )));
        }

        let delta = if delta.is_finite() {
            delta.clamp(0.0, self.config.max_frame_delta)
        } else {
            0.0
        };
        self.time += delta;
        let frame = FrameInfo::new(self.frames, self.time, delta);
        trace!("frame {} dt={:.4}", frame.number, delta);

        {
            let mut ctx = FrameContext::new(&mut self.scene, &mut self.control, delta);
            self.input.dispatch(&mut ctx);
        }

        self.scene.animate(delta);
        self.scene.update_world_transforms();

        if let Err(err) = self.backend.render(&frame, &self.scene, &self.pipeline) {
            warn!("render failed on frame {}: {err}", frame.number);
        }

        self.frames += 1;
        Ok(frame)
    }

    /// Step through `frames` until they run out or a stop is requested.
    /// Returns the number of frames run.
    pub fn run<I>(&mut self, frames: I) -> Result<u64>
    where
        I: IntoIterator<Item = FrameInfo>,
    {
        let start = self.frames;
        for frame in frames {
            if self.control.is_stop_requested() {
                break;
            }
            self.step(frame.delta)?;
        }
        let ran = self.frames - start;
        debug!("Frame loop exited after {ran} frames");
        Ok(ran)
    }

    /// Request the loop to exit after the current frame
    pub fn stop(&mut self) {
        self.control.request_stop();
    }

    pub fn should_stop(&self) -> bool {
        self.control.is_stop_requested()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.set_resolution(width, height);
        self.backend.resize(width, height);
    }

    pub fn deinitialize(&mut self) {
        if self.state == EngineState::Running {
            self.backend.deinitialize();
            info!("Engine deinitialized after {} frames", self.frames);
        }
        self.state = EngineState::Deinitialized;
    }
}
