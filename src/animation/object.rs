use log::{debug, warn};

use super::property::{Animatable, AnimationProperty, InterpolateFn, PropertyTrack, UpdateFn};
use crate::error::{EngineError, Result};
use crate::scene::SceneGraph;

/// A clock driving a set of named keyframed properties.
///
/// While playing, each tick advances the clock by the frame delta and
/// hands every property's interpolated value to its update callback.
/// Looping wraps the clock modulo the span (the latest keyframe across
/// all properties); otherwise the final values are delivered once and
/// playback stops.
pub struct AnimationObject {
    properties: Vec<Box<dyn PropertyTrack>>,
    clock: f32,
    playing: bool,
    looping: bool,
}

impl std::fmt::Debug for AnimationObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationObject")
            .field("properties", &self.property_names())
            .field("clock", &self.clock)
            .field("playing", &self.playing)
            .field("looping", &self.looping)
            .finish()
    }
}

impl Default for AnimationObject {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationObject {
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            clock: 0.0,
            playing: false,
            looping: false,
        }
    }

    /// Register a property keyed at time 0 with `initial`, using the
    /// type's natural interpolation.
    pub fn add_property<P, F>(
        &mut self,
        name: impl Into<String>,
        initial: P,
        update: F,
    ) -> Result<&mut AnimationProperty<P>>
    where
        P: Animatable,
        F: FnMut(&mut SceneGraph, P) -> Result<()> + 'static,
    {
        self.add_property_with(name, initial, update, P::interpolate)
    }

    /// Register a property with a custom interpolation function
    pub fn add_property_with<P, F, I>(
        &mut self,
        name: impl Into<String>,
        initial: P,
        update: F,
        interpolate: I,
    ) -> Result<&mut AnimationProperty<P>>
    where
        P: Animatable,
        F: FnMut(&mut SceneGraph, P) -> Result<()> + 'static,
        I: Fn(P, P, f32) -> P + 'static,
    {
        let name = name.into();
        if self.properties.iter().any(|p| p.name() == name) {
            return Err(EngineError::invalid(format!(
                "animation property '{name}' already exists"
            )));
        }

        let update: UpdateFn<P> = Box::new(update);
        let interpolate: InterpolateFn<P> = Box::new(interpolate);
        self.properties
            .push(Box::new(AnimationProperty::new(name, initial, update, interpolate)));

        // just pushed
        let last = self.properties.len() - 1;
        self.properties[last]
            .as_any_mut()
            .downcast_mut::<AnimationProperty<P>>()
            .ok_or_else(|| EngineError::State("property type mismatch".into()))
    }

    /// Key `value` at `time` on the named property. Fails with `NotFound`
    /// for an unknown name and `InvalidArgument` when `P` differs from the
    /// property's declared type.
    pub fn add_keyframe<P: Animatable>(
        &mut self,
        name: &str,
        time: f32,
        value: P,
    ) -> Result<&mut Self> {
        self.property_mut::<P>(name)?.add_keyframe(time, value)?;
        Ok(self)
    }

    pub fn property<P: Animatable>(&self, name: &str) -> Result<&AnimationProperty<P>> {
        let track = self
            .properties
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| EngineError::not_found("animation property", name))?;
        track
            .as_any()
            .downcast_ref::<AnimationProperty<P>>()
            .ok_or_else(|| type_mismatch::<P>(name))
    }

    pub fn property_mut<P: Animatable>(&mut self, name: &str) -> Result<&mut AnimationProperty<P>> {
        let track = self
            .properties
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| EngineError::not_found("animation property", name))?;
        track
            .as_any_mut()
            .downcast_mut::<AnimationProperty<P>>()
            .ok_or_else(|| type_mismatch::<P>(name))
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name()).collect()
    }

    /// Value the named property would deliver at `time`
    pub fn value_at<P: Animatable>(&self, name: &str, time: f32) -> Result<P> {
        Ok(self.property::<P>(name)?.value_at(time))
    }

    /// Latest keyframe time across all properties
    pub fn span(&self) -> f32 {
        self.properties
            .iter()
            .map(|p| p.span())
            .fold(0.0, f32::max)
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) -> &mut Self {
        self.looping = looping;
        self
    }

    /// Start or resume. A finished non-looping run restarts from zero.
    pub fn play(&mut self) -> &mut Self {
        if !self.looping && self.clock >= self.span() && self.clock > 0.0 {
            self.clock = 0.0;
        }
        self.playing = true;
        self
    }

    /// Halt, keeping the clock
    pub fn pause(&mut self) -> &mut Self {
        self.playing = false;
        self
    }

    /// Halt and rewind to zero
    pub fn stop(&mut self) -> &mut Self {
        self.playing = false;
        self.clock = 0.0;
        self
    }

    /// Move the clock without delivering values
    pub fn seek(&mut self, time: f32) -> Result<&mut Self> {
        if !time.is_finite() || time < 0.0 {
            return Err(EngineError::invalid(format!(
                "seek time must be finite and non-negative, got {time}"
            )));
        }
        self.clock = time;
        Ok(self)
    }

    /// Advance by `delta` and deliver the current values. A failing update
    /// callback is logged and does not prevent the others from running.
    pub fn tick(&mut self, delta: f32, scene: &mut SceneGraph) {
        if !self.playing {
            return;
        }

        let span = self.span();
        self.clock += delta.max(0.0);

        let mut finished = false;
        if self.looping {
            if self.clock > span {
                self.clock = if span > 0.0 { self.clock % span } else { 0.0 };
            }
        } else if self.clock >= span {
            self.clock = span;
            finished = true;
        }

        for track in &mut self.properties {
            if let Err(err) = track.apply(self.clock, scene) {
                warn!("animation property '{}' update failed: {err}", track.name());
            }
        }

        if finished {
            debug!("animation finished at {:.3}s", self.clock);
            self.playing = false;
        }
    }
}

fn type_mismatch<P>(name: &str) -> EngineError {
    EngineError::invalid(format!(
        "animation property '{name}' does not hold values of type {}",
        std::any::type_name::<P>()
    ))
}
