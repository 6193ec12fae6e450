use std::any::Any;

use glam::{Quat, Vec3};

use crate::error::{EngineError, Result};
use crate::math::{lerp, slerp};
use crate::scene::SceneGraph;

/// Receives the interpolated value each tick; may mutate any live scene state
pub type UpdateFn<P> = Box<dyn FnMut(&mut SceneGraph, P) -> Result<()>>;

/// `(v0, v1, u) -> value` with `u` in [0, 1]
pub type InterpolateFn<P> = Box<dyn Fn(P, P, f32) -> P>;

/// Values that can be keyframed
pub trait Animatable: Copy + std::fmt::Debug + 'static {
    /// Natural interpolation for the type (lerp, or slerp for rotations)
    fn interpolate(a: Self, b: Self, u: f32) -> Self;
}

impl Animatable for f32 {
    fn interpolate(a: Self, b: Self, u: f32) -> Self {
        lerp(a, b, u)
    }
}

impl Animatable for Vec3 {
    fn interpolate(a: Self, b: Self, u: f32) -> Self {
        a.lerp(b, u)
    }
}

impl Animatable for Quat {
    fn interpolate(a: Self, b: Self, u: f32) -> Self {
        slerp(a, b, u)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<P> {
    pub time: f32,
    pub value: P,
}

/// One named, independently keyframed value
pub struct AnimationProperty<P: Animatable> {
    name: String,
    keyframes: Vec<Keyframe<P>>,
    update: UpdateFn<P>,
    interpolate: InterpolateFn<P>,
}

impl<P: Animatable> AnimationProperty<P> {
    /// Create with the initial value keyed at time 0
    pub fn new(
        name: impl Into<String>,
        initial: P,
        update: UpdateFn<P>,
        interpolate: InterpolateFn<P>,
    ) -> Self {
        Self {
            name: name.into(),
            keyframes: vec![Keyframe { time: 0.0, value: initial }],
            update,
            interpolate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyframes(&self) -> &[Keyframe<P>] {
        &self.keyframes
    }

    /// Insert keeping times strictly increasing. An existing time is
    /// overwritten, an earlier time is inserted at its sorted position.
    pub fn add_keyframe(&mut self, time: f32, value: P) -> Result<()> {
        if !time.is_finite() || time < 0.0 {
            return Err(EngineError::invalid(format!(
                "keyframe time for '{}' must be finite and non-negative, got {time}",
                self.name
            )));
        }

        let index = self.keyframes.partition_point(|k| k.time < time);
        match self.keyframes.get_mut(index) {
            Some(existing) if existing.time == time => existing.value = value,
            _ => self.keyframes.insert(index, Keyframe { time, value }),
        }
        Ok(())
    }

    pub fn last_time(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    /// Interpolated value at `time`, clamped to the first and last keyframes
    pub fn value_at(&self, time: f32) -> P {
        let first = self.keyframes[0];
        let last = self.keyframes[self.keyframes.len() - 1];

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let upper = self.keyframes.partition_point(|k| k.time <= time);
        let k0 = self.keyframes[upper - 1];
        let k1 = self.keyframes[upper];
        let u = (time - k0.time) / (k1.time - k0.time);
        (self.interpolate)(k0.value, k1.value, u)
    }
}

/// Type-erased view used by [`super::AnimationObject`]
pub(crate) trait PropertyTrack {
    fn name(&self) -> &str;
    fn span(&self) -> f32;
    fn apply(&mut self, time: f32, scene: &mut SceneGraph) -> Result<()>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<P: Animatable> PropertyTrack for AnimationProperty<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn span(&self) -> f32 {
        self.last_time()
    }

    fn apply(&mut self, time: f32, scene: &mut SceneGraph) -> Result<()> {
        let value = self.value_at(time);
        (self.update)(scene, value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(initial: f32) -> AnimationProperty<f32> {
        AnimationProperty::new(
            "t",
            initial,
            Box::new(|_, _| Ok(())),
            Box::new(f32::interpolate),
        )
    }

    #[test]
    fn initial_value_is_keyed_at_zero() {
        let p = scalar(3.0);
        assert_eq!(p.keyframes(), &[Keyframe { time: 0.0, value: 3.0 }]);
        assert_eq!(p.value_at(10.0), 3.0);
    }

    #[test]
    fn out_of_order_keyframes_are_sorted() {
        let mut p = scalar(0.0);
        p.add_keyframe(4.0, 4.0).unwrap();
        p.add_keyframe(2.0, 2.0).unwrap();
        let times: Vec<f32> = p.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn same_time_overwrites() {
        let mut p = scalar(0.0);
        p.add_keyframe(5.0, 1.0).unwrap();
        p.add_keyframe(5.0, 7.0).unwrap();
        assert_eq!(p.keyframes().len(), 2);
        assert_eq!(p.value_at(5.0), 7.0);
    }

    #[test]
    fn invalid_times_are_rejected() {
        let mut p = scalar(0.0);
        assert!(p.add_keyframe(-1.0, 0.0).is_err());
        assert!(p.add_keyframe(f32::NAN, 0.0).is_err());
        assert!(p.add_keyframe(f32::INFINITY, 0.0).is_err());
    }

    #[test]
    fn brackets_and_clamps() {
        let mut p = scalar(0.0);
        p.add_keyframe(5.0, 1.0).unwrap();
        p.add_keyframe(10.0, 3.0).unwrap();
        assert_eq!(p.value_at(-2.0), 0.0);
        assert_eq!(p.value_at(2.5), 0.5);
        assert_eq!(p.value_at(5.0), 1.0);
        assert_eq!(p.value_at(7.5), 2.0);
        assert_eq!(p.value_at(12.0), 3.0);
    }

    #[test]
    fn custom_interpolator_is_used() {
        let mut p = AnimationProperty::new(
            "step",
            0.0f32,
            Box::new(|_, _| Ok(())),
            Box::new(|a: f32, b: f32, u: f32| if u < 0.5 { a } else { b }),
        );
        p.add_keyframe(1.0, 10.0).unwrap();
        assert_eq!(p.value_at(0.4), 0.0);
        assert_eq!(p.value_at(0.6), 10.0);
    }
}
