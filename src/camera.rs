//! Input-driven fly movement for any scene object.
//!
//! The controller is not a camera type: it registers the movement axes on
//! an [`InputController`] and binds listeners that move whichever object
//! handle it is attached to.

use glam::{Quat, Vec3};

use crate::config::ControlsConfig;
use crate::error::Result;
use crate::input::{InputController, InputKey, ModifierSet, PointerAxis};
use crate::scene::ObjectHandle;

pub const AXIS_MOVE_FORWARD: &str = "moveforward";
pub const AXIS_MOVE_RIGHT: &str = "moveright";
pub const AXIS_PITCH: &str = "camerapitch";
pub const AXIS_YAW: &str = "camerayaw";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyController {
    /// Distance per frame at full axis deflection
    pub speed: f32,
    /// Degrees per pointer unit
    pub sensitivity: f32,
}

impl Default for FlyController {
    fn default() -> Self {
        Self::from_config(&ControlsConfig::default())
    }
}

impl FlyController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self { speed, sensitivity }
    }

    pub fn from_config(controls: &ControlsConfig) -> Self {
        Self::new(controls.speed, controls.sensitivity)
    }

    /// Map WASD and pointer motion to the movement axes. Calling this for
    /// an input that already has the axes adds duplicate contributions.
    pub fn register_axes(input: &mut InputController) -> Result<()> {
        input.create_axis_key(AXIS_MOVE_FORWARD, InputKey::KeyW, ModifierSet::NONE, 1.0)?;
        input.create_axis_key(AXIS_MOVE_FORWARD, InputKey::KeyS, ModifierSet::NONE, -1.0)?;
        input.create_axis_key(AXIS_MOVE_RIGHT, InputKey::KeyD, ModifierSet::NONE, 1.0)?;
        input.create_axis_key(AXIS_MOVE_RIGHT, InputKey::KeyA, ModifierSet::NONE, -1.0)?;
        input.create_axis_pointer(AXIS_PITCH, PointerAxis::MouseY, 1.0)?;
        input.create_axis_pointer(AXIS_YAW, PointerAxis::MouseX, 1.0)?;
        Ok(())
    }

    /// Register the axes if missing, then bind movement of `target` to them
    pub fn attach(&self, input: &mut InputController, target: ObjectHandle) -> Result<()> {
        if !input.has_axis(AXIS_MOVE_FORWARD) {
            Self::register_axes(input)?;
        }

        let speed = self.speed;
        let sensitivity = self.sensitivity;

        input.bind_axis(AXIS_MOVE_RIGHT, move |ctx, value| {
            if value == 0.0 {
                return Ok(());
            }
            let right = ctx.scene.right(target)?;
            ctx.scene.transform_mut(target)?.translate_by(right * value * speed);
            Ok(())
        })?;

        // Cameras look down -Z
        input.bind_axis(AXIS_MOVE_FORWARD, move |ctx, value| {
            if value == 0.0 {
                return Ok(());
            }
            let forward = ctx.scene.forward(target)?;
            ctx.scene.transform_mut(target)?.translate_by(-forward * value * speed);
            Ok(())
        })?;

        input.bind_axis(AXIS_PITCH, move |ctx, value| {
            if value != 0.0 {
                ctx.scene
                    .transform_mut(target)?
                    .rotate_by(Vec3::new(value * sensitivity, 0.0, 0.0));
            }
            Ok(())
        })?;

        // Yaw about the parent's up axis so pitch never turns into roll
        input.bind_axis(AXIS_YAW, move |ctx, value| {
            if value != 0.0 {
                ctx.scene
                    .transform_mut(target)?
                    .rotate_by_quat(Quat::from_rotation_y((value * sensitivity).to_radians()));
            }
            Ok(())
        })?;

        Ok(())
    }
}
