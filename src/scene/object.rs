use glam::{Mat4, Vec3};

use super::graph::SceneGraph;
use super::linear_path::LinearPath;
use super::path::Path;
use super::spline_path::SplinePath;
use super::transform::Transform;
use crate::animation::AnimationObject;
use crate::error::Result;

/// Index of an object inside its [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub(crate) usize);

impl ObjectHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared light state. A disabled light contributes no color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub enabled: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            enabled: false,
        }
    }
}

impl Light {
    pub fn effective_color(&self) -> Vec3 {
        if self.enabled {
            self.color
        } else {
            Vec3::ZERO
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

impl Attenuation {
    /// Intensity factor at `distance` from the light
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointLight {
    pub light: Light,
    pub attenuation: Attenuation,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectionalLight {
    pub light: Light,
}

/// Cone light; cutoff angles are in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub light: Light,
    pub attenuation: Attenuation,
    pub inner_cutoff: f32,
    pub outer_cutoff: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            light: Light::default(),
            attenuation: Attenuation::default(),
            inner_cutoff: 45.0,
            outer_cutoff: 45.0,
        }
    }
}

/// Produces a projection for a render target of the given aspect ratio
pub trait Camera {
    fn projection(&self, aspect: f32) -> Mat4;
}

/// Vertical field of view in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera for PerspectiveCamera {
    fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
    }
}

/// View volume `width` units across; height follows the aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    pub width: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera for OrthographicCamera {
    fn projection(&self, aspect: f32) -> Mat4 {
        let half_w = self.width * 0.5;
        let half_h = half_w / aspect;
        Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, self.near, self.far)
    }
}

#[derive(Debug)]
pub enum ObjectKind {
    /// Pure transform node, used as a pivot or group
    Empty,
    /// Renderable, referencing assets by name
    Mesh { mesh: String, material: String },
    PointLight(PointLight),
    DirectionalLight(DirectionalLight),
    SpotLight(SpotLight),
    PerspectiveCamera(PerspectiveCamera),
    OrthographicCamera(OrthographicCamera),
    SplinePath(SplinePath),
    LinearPath(LinearPath),
    Animation(AnimationObject),
}

impl ObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Mesh { .. } => "mesh",
            Self::PointLight(_) => "point light",
            Self::DirectionalLight(_) => "directional light",
            Self::SpotLight(_) => "spot light",
            Self::PerspectiveCamera(_) => "perspective camera",
            Self::OrthographicCamera(_) => "orthographic camera",
            Self::SplinePath(_) => "spline path",
            Self::LinearPath(_) => "linear path",
            Self::Animation(_) => "animation",
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match self {
            Self::PointLight(l) => Some(&l.light),
            Self::DirectionalLight(l) => Some(&l.light),
            Self::SpotLight(l) => Some(&l.light),
            _ => None,
        }
    }

    pub fn light_mut(&mut self) -> Option<&mut Light> {
        match self {
            Self::PointLight(l) => Some(&mut l.light),
            Self::DirectionalLight(l) => Some(&mut l.light),
            Self::SpotLight(l) => Some(&mut l.light),
            _ => None,
        }
    }

    pub fn camera(&self) -> Option<&dyn Camera> {
        match self {
            Self::PerspectiveCamera(c) => Some(c),
            Self::OrthographicCamera(c) => Some(c),
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&dyn Path> {
        match self {
            Self::SplinePath(p) => Some(p),
            Self::LinearPath(p) => Some(p),
            _ => None,
        }
    }
}

/// Per-frame logic attached to an object, run in the animation phase
pub trait Behavior {
    fn on_frame(&mut self, owner: ObjectHandle, scene: &mut SceneGraph, delta: f32) -> Result<()>;
}

/// Rotates the owner at a constant rate (degrees per second per Euler
/// axis), writing the accumulated angle as an absolute rotation.
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    rate: Vec3,
    angle: Vec3,
}

impl Spin {
    pub fn new(rate: impl Into<Vec3>) -> Self {
        Self {
            rate: rate.into(),
            angle: Vec3::ZERO,
        }
    }

    /// Yaw only
    pub fn yaw(degrees_per_second: f32) -> Self {
        Self::new([0.0, degrees_per_second, 0.0])
    }

    pub fn angle(&self) -> Vec3 {
        self.angle
    }
}

impl Behavior for Spin {
    fn on_frame(&mut self, owner: ObjectHandle, scene: &mut SceneGraph, delta: f32) -> Result<()> {
        let a = self.angle + self.rate * delta;
        self.angle = Vec3::new(a.x.rem_euclid(360.0), a.y.rem_euclid(360.0), a.z.rem_euclid(360.0));
        scene.transform_mut(owner)?.rotate(self.angle);
        Ok(())
    }
}

/// Yaws the owner incrementally, one revolution per `period` seconds
/// scaled by `time_scale`.
#[derive(Debug, Clone, Copy)]
pub struct Orbit {
    pub period: f32,
    pub time_scale: f32,
}

impl Orbit {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            time_scale: 1.0,
        }
    }
}

impl Behavior for Orbit {
    fn on_frame(&mut self, owner: ObjectHandle, scene: &mut SceneGraph, delta: f32) -> Result<()> {
        if self.period <= 0.0 {
            return Ok(());
        }
        let degrees = 360.0 / self.period * delta * self.time_scale;
        scene.transform_mut(owner)?.rotate_by([0.0, degrees, 0.0]);
        Ok(())
    }
}

/// A named node of the scene graph
pub struct SceneObject {
    pub(crate) name: String,
    pub(crate) handle: ObjectHandle,
    pub(crate) transform: Transform,
    pub(crate) parent: Option<ObjectHandle>,
    pub(crate) children: Vec<ObjectHandle>,
    pub(crate) world: Mat4,
    pub(crate) kind: ObjectKind,
    pub(crate) behaviors: Vec<Box<dyn Behavior>>,
}

impl std::fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneObject")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("kind", &self.kind.label())
            .field("behaviors", &self.behaviors.len())
            .finish()
    }
}

impl SceneObject {
    pub(crate) fn new(name: String, handle: ObjectHandle, kind: ObjectKind) -> Self {
        Self {
            name,
            handle,
            transform: Transform::new(),
            parent: None,
            children: Vec::new(),
            world: Mat4::IDENTITY,
            kind,
            behaviors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn parent(&self) -> Option<ObjectHandle> {
        self.parent
    }

    /// Children in attach order
    pub fn children(&self) -> &[ObjectHandle] {
        &self.children
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    pub fn add_behavior(&mut self, behavior: impl Behavior + 'static) -> &mut Self {
        self.behaviors.push(Box::new(behavior));
        self
    }

    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn disabled_light_is_dark() {
        let mut light = Light::default();
        assert_eq!(light.effective_color(), Vec3::ZERO);
        light.enabled = true;
        assert_eq!(light.effective_color(), Vec3::ONE);
    }

    #[test]
    fn default_attenuation_is_constant() {
        let a = Attenuation::default();
        assert_eq!(a.factor(0.0), 1.0);
        assert_eq!(a.factor(10.0), 1.0);
        let q = Attenuation { constant: 0.0, linear: 0.0, quadratic: 1.0 };
        assert_eq!(q.factor(2.0), 0.25);
    }

    #[test]
    fn perspective_projects_near_plane_to_minus_one() {
        let cam = PerspectiveCamera { fov: 60.0, near: 0.5, far: 10.0 };
        let clip = cam.projection(4.0 / 3.0) * Vec4::new(0.0, 0.0, -0.5, 1.0);
        assert!((clip.z / clip.w + 1.0).abs() < 1e-5);
    }

    #[test]
    fn orthographic_height_follows_aspect() {
        let cam = OrthographicCamera { width: 4.0, near: 0.1, far: 10.0 };
        let p = cam.projection(2.0);
        let edge = p * Vec4::new(2.0, 1.0, -1.0, 1.0);
        assert!((edge.x - 1.0).abs() < 1e-5);
        assert!((edge.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn kind_capabilities() {
        assert!(ObjectKind::PointLight(PointLight::default()).light().is_some());
        assert!(ObjectKind::Empty.light().is_none());
        assert!(ObjectKind::SplinePath(SplinePath::new()).path().is_some());
        let cam = ObjectKind::PerspectiveCamera(PerspectiveCamera { fov: 45.0, near: 0.1, far: 100.0 });
        assert!(cam.camera().is_some());
        assert_eq!(cam.label(), "perspective camera");
    }
}
