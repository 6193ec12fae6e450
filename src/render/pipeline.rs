use log::debug;
use serde::Serialize;

use super::stage::{PipelineLink, RenderStage, StageKind};
use crate::error::{EngineError, Result};

/// Ordered render stages with their framebuffer links.
///
/// The pipeline is purely declarative: it stores and orders stages and
/// resolves links to stage indices. Executing it is up to the
/// [`RenderBackend`](crate::core::RenderBackend).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderPipeline {
    stages: Vec<RenderStage>,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Append a stage. Names must be unique.
    pub fn add_stage(&mut self, name: impl Into<String>, kind: StageKind) -> Result<&mut RenderStage> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::invalid("stage name must not be empty"));
        }
        if self.index_of(&name).is_some() {
            return Err(EngineError::invalid(format!("render stage '{name}' already exists")));
        }
        debug!("render: add {kind:?} stage '{name}' at {}", self.stages.len());
        self.stages.push(RenderStage::new(name, kind));
        let last = self.stages.len() - 1;
        Ok(&mut self.stages[last])
    }

    pub fn add_geometry_stage(&mut self, name: impl Into<String>) -> Result<&mut RenderStage> {
        self.add_stage(name, StageKind::Geometry)
    }

    pub fn add_quad_stage(&mut self, name: impl Into<String>) -> Result<&mut RenderStage> {
        self.add_stage(name, StageKind::Quad)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name() == name)
    }

    pub fn stage(&self, name: &str) -> Result<&RenderStage> {
        self.stages
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| EngineError::not_found("render stage", name))
    }

    pub fn stage_mut(&mut self, name: &str) -> Result<&mut RenderStage> {
        self.stages
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| EngineError::not_found("render stage", name))
    }

    pub fn stages(&self) -> &[RenderStage] {
        &self.stages
    }

    /// Enabled stages with their indices, in execution order
    pub fn enabled_stages(&self) -> impl Iterator<Item = (usize, &RenderStage)> {
        self.stages.iter().enumerate().filter(|(_, s)| s.is_enabled())
    }

    /// Index of the stage whose framebuffer `link` refers to when seen
    /// from stage `index`. `None` means the default framebuffer, which is
    /// also what `Current` means for a stage without its own framebuffer.
    pub fn resolve_link(&self, index: usize, link: &PipelineLink) -> Result<Option<usize>> {
        if index >= self.stages.len() {
            return Err(EngineError::not_found("render stage", index.to_string()));
        }

        let nth_enabled = |n: usize| self.enabled_stages().nth(n).map(|(i, _)| i);
        let resolved = match link {
            PipelineLink::None => None,
            PipelineLink::Current => self.stages[index].flags().framebuffer.then_some(index),
            PipelineLink::First => nth_enabled(0),
            PipelineLink::Second => nth_enabled(1),
            PipelineLink::Previous => self.stages[..index]
                .iter()
                .rposition(RenderStage::is_enabled),
            PipelineLink::Last => self.enabled_stages().last().map(|(i, _)| i),
            PipelineLink::Stage(name) => Some(
                self.index_of(name)
                    .ok_or_else(|| EngineError::not_found("render stage", name.as_str()))?,
            ),
        };
        Ok(resolved)
    }

    /// Check that every enabled stage's links resolve to a stage that
    /// renders into a framebuffer.
    pub fn validate(&self) -> Result<()> {
        for (index, stage) in self.enabled_stages() {
            if stage.kind() == StageKind::Quad && stage.shader_program().is_none() {
                return Err(EngineError::invalid(format!(
                    "quad stage '{}' has no shader program",
                    stage.name()
                )));
            }

            for (attachment, link) in stage.links().iter() {
                let Some(source) = self.resolve_link(index, link)? else {
                    continue;
                };
                let target = &self.stages[source];
                if !target.flags().framebuffer {
                    return Err(EngineError::invalid(format!(
                        "stage '{}' links {attachment:?} to '{}', which has no framebuffer",
                        stage.name(),
                        target.name()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Attachment;

    fn post_chain() -> RenderPipeline {
        let mut p = RenderPipeline::new();
        p.add_geometry_stage("base").unwrap();
        p.add_quad_stage("hdr")
            .unwrap()
            .set_shader_program("post_hdr_shader")
            .set_color_link(PipelineLink::Previous);
        p.add_quad_stage("fxaa")
            .unwrap()
            .set_shader_program("post_fxaa_shader")
            .set_color_link(PipelineLink::Previous);
        p.add_quad_stage("gamma")
            .unwrap()
            .set_shader_program("post_gamma_shader")
            .set_color_link(PipelineLink::Previous)
            .set_framebuffer_enabled(false);
        p
    }

    #[test]
    fn duplicate_stage_names_are_rejected() {
        let mut p = post_chain();
        assert!(matches!(p.add_quad_stage("hdr"), Err(EngineError::InvalidArgument(_))));
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn previous_skips_disabled_stages() {
        let mut p = post_chain();
        assert_eq!(p.resolve_link(2, &PipelineLink::Previous).unwrap(), Some(1));
        p.stage_mut("hdr").unwrap().set_enabled(false);
        assert_eq!(p.resolve_link(2, &PipelineLink::Previous).unwrap(), Some(0));
        assert_eq!(p.resolve_link(0, &PipelineLink::Previous).unwrap(), None);
    }

    #[test]
    fn positional_links() {
        let p = post_chain();
        assert_eq!(p.resolve_link(3, &PipelineLink::First).unwrap(), Some(0));
        assert_eq!(p.resolve_link(3, &PipelineLink::Second).unwrap(), Some(1));
        assert_eq!(p.resolve_link(1, &PipelineLink::Last).unwrap(), Some(3));
        assert_eq!(p.resolve_link(2, &PipelineLink::Current).unwrap(), Some(2));
        assert_eq!(p.resolve_link(2, &PipelineLink::None).unwrap(), None);
        assert_eq!(
            p.resolve_link(3, &PipelineLink::Stage("base".into())).unwrap(),
            Some(0)
        );
    }

    #[test]
    fn unknown_named_link_is_not_found() {
        let mut p = post_chain();
        p.stage_mut("fxaa")
            .unwrap()
            .set_link(Attachment::Color, PipelineLink::Stage("bloom".into()));
        assert!(matches!(p.validate(), Err(EngineError::NotFound { .. })));
    }

    #[test]
    fn post_chain_validates() {
        post_chain().validate().unwrap();
    }

    #[test]
    fn linking_to_screen_stage_is_invalid() {
        let mut p = post_chain();
        p.add_quad_stage("overlay")
            .unwrap()
            .set_shader_program("overlay_shader")
            .set_color_link(PipelineLink::Stage("gamma".into()));
        assert!(matches!(p.validate(), Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn quad_without_shader_is_invalid() {
        let mut p = RenderPipeline::new();
        p.add_quad_stage("bare").unwrap();
        assert!(p.validate().is_err());
    }
}
