use crate::scene::SceneGraph;

/// Loop-level requests made by listeners during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopControl {
    stop_requested: bool,
    game_mode: bool,
}

impl LoopControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the frame loop to exit once the current frame completes
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub(crate) fn clear_stop(&mut self) {
        self.stop_requested = false;
    }

    /// Captured-pointer mode, in which pointer deltas feed axes
    pub fn game_mode(&self) -> bool {
        self.game_mode
    }

    pub fn set_game_mode(&mut self, enabled: bool) {
        self.game_mode = enabled;
    }

    pub fn toggle_game_mode(&mut self) {
        self.game_mode = !self.game_mode;
    }
}

/// What an input listener may touch while it runs
pub struct FrameContext<'a> {
    pub scene: &'a mut SceneGraph,
    pub control: &'a mut LoopControl,
    /// Seconds covered by the frame being dispatched
    pub delta: f32,
}

impl<'a> FrameContext<'a> {
    pub fn new(scene: &'a mut SceneGraph, control: &'a mut LoopControl, delta: f32) -> Self {
        Self { scene, control, delta }
    }
}
