use glam::{Vec2, Vec3, Vec4};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StageKind {
    /// Draws scene geometry
    Geometry,
    /// Full-screen pass over a linked framebuffer
    Quad,
}

/// Uniform value handed to a stage's shader program
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum StageParameter {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

/// Which stage's framebuffer an attachment is taken from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PipelineLink {
    /// Default framebuffer (the screen)
    None,
    First,
    Second,
    /// Nearest enabled stage before this one
    Previous,
    /// This stage's own framebuffer
    Current,
    /// Last enabled stage
    Last,
    /// A stage by name
    Stage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Attachment {
    /// Color textures sampled by the stage
    Color,
    /// Depth/stencil buffer the stage tests against
    DepthStencil,
    /// Framebuffer the stage draws into
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageLinks {
    pub color: PipelineLink,
    pub depth_stencil: PipelineLink,
    pub draw: PipelineLink,
}

impl Default for StageLinks {
    fn default() -> Self {
        Self {
            color: PipelineLink::Current,
            depth_stencil: PipelineLink::Current,
            draw: PipelineLink::Current,
        }
    }
}

impl StageLinks {
    pub fn get(&self, attachment: Attachment) -> &PipelineLink {
        match attachment {
            Attachment::Color => &self.color,
            Attachment::DepthStencil => &self.depth_stencil,
            Attachment::Draw => &self.draw,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attachment, &PipelineLink)> {
        [
            (Attachment::Color, &self.color),
            (Attachment::DepthStencil, &self.depth_stencil),
            (Attachment::Draw, &self.draw),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageFlags {
    /// Render into an offscreen framebuffer; off means straight to screen
    pub framebuffer: bool,
    pub depth_test: bool,
    pub face_culling: bool,
    pub multisample: bool,
    pub stencil_test: bool,
    pub clear_color: bool,
    pub clear_depth: bool,
    pub clear_stencil: bool,
}

impl StageFlags {
    fn for_kind(kind: StageKind) -> Self {
        let geometry = kind == StageKind::Geometry;
        Self {
            framebuffer: true,
            depth_test: geometry,
            face_culling: geometry,
            multisample: false,
            stencil_test: false,
            clear_color: true,
            clear_depth: true,
            clear_stencil: true,
        }
    }
}

/// Normalized viewport rectangle within the draw target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub u: f32,
    pub v: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            u: 0.0,
            v: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Viewport {
    /// Pixel rectangle `(x, y, width, height)` for a target of the given size
    pub fn to_pixels(&self, target_width: u32, target_height: u32) -> (u32, u32, u32, u32) {
        let w = target_width as f32;
        let h = target_height as f32;
        (
            (self.u * w) as u32,
            (self.v * h) as u32,
            (self.width * w) as u32,
            (self.height * h) as u32,
        )
    }
}

/// One entry of the render pipeline
#[derive(Debug, Clone, Serialize)]
pub struct RenderStage {
    name: String,
    kind: StageKind,
    shader: Option<String>,
    parameters: IndexMap<String, StageParameter>,
    links: StageLinks,
    flags: StageFlags,
    viewport: Viewport,
    enabled: bool,
}

impl RenderStage {
    pub fn new(name: impl Into<String>, kind: StageKind) -> Self {
        Self {
            name: name.into(),
            kind,
            shader: None,
            parameters: IndexMap::new(),
            links: StageLinks::default(),
            flags: StageFlags::for_kind(kind),
            viewport: Viewport::default(),
            enabled: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn shader_program(&self) -> Option<&str> {
        self.shader.as_deref()
    }

    pub fn set_shader_program(&mut self, program: impl Into<String>) -> &mut Self {
        self.shader = Some(program.into());
        self
    }

    // === Parameters ===

    pub fn set_parameter(&mut self, name: impl Into<String>, value: StageParameter) -> &mut Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn set_parameter_float(&mut self, name: impl Into<String>, value: f32) -> &mut Self {
        self.set_parameter(name, StageParameter::Float(value))
    }

    pub fn set_parameter_vec2(&mut self, name: impl Into<String>, value: impl Into<Vec2>) -> &mut Self {
        self.set_parameter(name, StageParameter::Vec2(value.into()))
    }

    pub fn set_parameter_vec3(&mut self, name: impl Into<String>, value: impl Into<Vec3>) -> &mut Self {
        self.set_parameter(name, StageParameter::Vec3(value.into()))
    }

    pub fn set_parameter_vec4(&mut self, name: impl Into<String>, value: impl Into<Vec4>) -> &mut Self {
        self.set_parameter(name, StageParameter::Vec4(value.into()))
    }

    pub fn parameter(&self, name: &str) -> Result<StageParameter> {
        self.parameters
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::not_found("stage parameter", name))
    }

    /// Parameters in the order they were first set
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &StageParameter)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    // === Links ===

    pub fn links(&self) -> &StageLinks {
        &self.links
    }

    pub fn set_link(&mut self, attachment: Attachment, link: PipelineLink) -> &mut Self {
        match attachment {
            Attachment::Color => self.links.color = link,
            Attachment::DepthStencil => self.links.depth_stencil = link,
            Attachment::Draw => self.links.draw = link,
        }
        self
    }

    pub fn set_color_link(&mut self, link: PipelineLink) -> &mut Self {
        self.set_link(Attachment::Color, link)
    }

    pub fn set_depth_stencil_link(&mut self, link: PipelineLink) -> &mut Self {
        self.set_link(Attachment::DepthStencil, link)
    }

    pub fn set_draw_link(&mut self, link: PipelineLink) -> &mut Self {
        self.set_link(Attachment::Draw, link)
    }

    // === Flags ===

    pub fn flags(&self) -> &StageFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut StageFlags {
        &mut self.flags
    }

    /// Disabling the framebuffer sends the stage's output to the screen
    pub fn set_framebuffer_enabled(&mut self, enabled: bool) -> &mut Self {
        self.flags.framebuffer = enabled;
        if !enabled {
            self.links.draw = PipelineLink::None;
        }
        self
    }

    pub fn set_depth_test_enabled(&mut self, enabled: bool) -> &mut Self {
        self.flags.depth_test = enabled;
        self
    }

    pub fn set_face_culling_enabled(&mut self, enabled: bool) -> &mut Self {
        self.flags.face_culling = enabled;
        self
    }

    pub fn set_multisample_enabled(&mut self, enabled: bool) -> &mut Self {
        self.flags.multisample = enabled;
        self
    }

    pub fn set_stencil_test_enabled(&mut self, enabled: bool) -> &mut Self {
        self.flags.stencil_test = enabled;
        self
    }

    pub fn set_clear_on_frame(&mut self, color: bool, depth: bool, stencil: bool) -> &mut Self {
        self.flags.clear_color = color;
        self.flags.clear_depth = depth;
        self.flags.clear_stencil = stencil;
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, u: f32, v: f32, width: f32, height: f32) -> Result<&mut Self> {
        let in_unit = |x: f32| (0.0..=1.0).contains(&x);
        if !(in_unit(u) && in_unit(v) && in_unit(width) && in_unit(height))
            || u + width > 1.0
            || v + height > 1.0
        {
            return Err(EngineError::invalid(format!(
                "viewport ({u}, {v}, {width}, {height}) of stage '{}' leaves the unit square",
                self.name
            )));
        }
        self.viewport = Viewport { u, v, width, height };
        Ok(self)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_sets_default_flags() {
        let geometry = RenderStage::new("base", StageKind::Geometry);
        assert!(geometry.flags().depth_test);
        let quad = RenderStage::new("post", StageKind::Quad);
        assert!(!quad.flags().depth_test);
        assert!(!quad.flags().face_culling);
        assert_eq!(quad.links(), &StageLinks::default());
    }

    #[test]
    fn parameters_keep_first_set_order() {
        let mut stage = RenderStage::new("fxaa", StageKind::Quad);
        stage
            .set_parameter_float("fMaxSpan", 4.0)
            .set_parameter_vec2("vInvResolution", [1.0 / 800.0, 1.0 / 600.0])
            .set_parameter_float("fMaxSpan", 8.0);
        let names: Vec<&str> = stage.parameters().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["fMaxSpan", "vInvResolution"]);
        assert_eq!(stage.parameter("fMaxSpan").unwrap(), StageParameter::Float(8.0));
        assert!(stage.parameter("fGamma").is_err());
    }

    #[test]
    fn disabling_framebuffer_draws_to_screen() {
        let mut stage = RenderStage::new("gamma", StageKind::Quad);
        stage.set_framebuffer_enabled(false);
        assert_eq!(stage.links().get(Attachment::Draw), &PipelineLink::None);
    }

    #[test]
    fn viewport_must_fit() {
        let mut stage = RenderStage::new("split", StageKind::Quad);
        assert!(stage.set_viewport(0.5, 0.0, 0.5, 1.0).is_ok());
        assert!(stage.set_viewport(0.6, 0.0, 0.5, 1.0).is_err());
        assert!(stage.set_viewport(-0.1, 0.0, 0.5, 1.0).is_err());
        assert_eq!(stage.viewport().to_pixels(800, 600), (400, 0, 400, 600));
    }
}
