//! Keyframed property animation
//!
//! An [`AnimationObject`] owns any number of typed properties, each with
//! its own keyframes, interpolation and update callback. Animations live
//! in the scene graph and are ticked once per frame by the engine.

mod object;
mod property;

pub use object::AnimationObject;
pub use property::{Animatable, AnimationProperty, InterpolateFn, Keyframe, UpdateFn};
