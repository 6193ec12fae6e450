//! Local translation / rotation / scale of a scene object.
//!
//! Absolute mutators (`translate`, `rotate`, `scale`) overwrite the
//! component, relative mutators (`*_by`) compose with the current value.
//! Every mutator applies immediately and returns `&mut Self` so calls can
//! be chained:
//!
//! ```
//! use scene_engine::scene::Transform;
//! use glam::Vec3;
//!
//! let mut t = Transform::new();
//! t.scale_uniform(0.5).translate([0.0, 1.1, 0.0]);
//! assert_eq!(t.translation(), Vec3::new(0.0, 1.1, 0.0));
//! ```

use glam::{Mat4, Quat, Vec3};

use crate::math::{euler_to_quat, quat_to_euler};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a local matrix
    pub fn from_matrix(m: Mat4) -> Self {
        let mut t = Self::default();
        t.set_matrix(m);
        t
    }

    /// Local matrix: scale first, then rotate, then translate
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Overwrite all components by decomposing `m`
    pub fn set_matrix(&mut self, m: Mat4) -> &mut Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        self.scale = scale;
        self.rotation = rotation.normalize();
        self.translation = translation;
        self
    }

    // === Translation ===

    pub fn translate(&mut self, t: impl Into<Vec3>) -> &mut Self {
        self.translation = t.into();
        self
    }

    pub fn translate_by(&mut self, t: impl Into<Vec3>) -> &mut Self {
        self.translation += t.into();
        self
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    // === Rotation ===

    /// Set rotation from Euler angles in degrees (pitch X, yaw Y, roll Z)
    pub fn rotate(&mut self, euler_degrees: impl Into<Vec3>) -> &mut Self {
        self.rotation = euler_to_quat(euler_degrees.into());
        self
    }

    pub fn rotate_quat(&mut self, q: Quat) -> &mut Self {
        self.rotation = q.normalize();
        self
    }

    /// Set rotation to `degrees` around `axis`
    pub fn rotate_axis_angle(&mut self, axis: impl Into<Vec3>, degrees: f32) -> &mut Self {
        let axis = axis.into().normalize_or_zero();
        self.rotation = if axis == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_axis_angle(axis, degrees.to_radians())
        };
        self
    }

    /// Compose an Euler delta (degrees) in local space: `rotation * delta`
    pub fn rotate_by(&mut self, euler_degrees: impl Into<Vec3>) -> &mut Self {
        let delta = euler_to_quat(euler_degrees.into());
        self.rotation = (self.rotation * delta).normalize();
        self
    }

    /// Compose a quaternion delta in parent space: `delta * rotation`
    pub fn rotate_by_quat(&mut self, delta: Quat) -> &mut Self {
        self.rotation = (delta * self.rotation).normalize();
        self
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Rotation as Euler angles in degrees
    pub fn euler(&self) -> Vec3 {
        quat_to_euler(self.rotation)
    }

    // === Scale ===

    pub fn scale(&mut self, s: impl Into<Vec3>) -> &mut Self {
        self.scale = s.into();
        self
    }

    pub fn scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::splat(s);
        self
    }

    /// Multiply the current scale componentwise
    pub fn scale_by(&mut self, s: impl Into<Vec3>) -> &mut Self {
        self.scale *= s.into();
        self
    }

    pub fn scale_uniform_by(&mut self, s: f32) -> &mut Self {
        self.scale *= s;
        self
    }

    pub fn scaling(&self) -> Vec3 {
        self.scale
    }
}
