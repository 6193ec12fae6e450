use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, trace, warn};

use super::key::{InputKey, InputTrigger, ModifierSet, PointerAxis};
use crate::core::FrameContext;
use crate::error::{EngineError, Result};

/// Listener for a named axis, called once per frame with the summed value
pub type AxisListener = Box<dyn FnMut(&mut FrameContext<'_>, f32) -> Result<()>>;

/// Listener for a named event, called once per triggering frame
pub type EventListener = Box<dyn FnMut(&mut FrameContext<'_>) -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum AxisSource {
    Key {
        key: InputKey,
        modifiers: ModifierSet,
        scale: f32,
    },
    Pointer {
        axis: PointerAxis,
        scale: f32,
    },
}

struct InputAxis {
    sources: Vec<AxisSource>,
    listeners: Vec<AxisListener>,
    value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EventBinding {
    key: InputKey,
    trigger: InputTrigger,
    modifiers: ModifierSet,
}

struct InputEvent {
    bindings: Vec<EventBinding>,
    listeners: Vec<EventListener>,
    pending: bool,
}

/// Device state plus named axes and events.
///
/// Device callbacks (`key_pressed`, `pointer_moved`, ...) only record
/// state. [`dispatch`](Self::dispatch) runs once per frame: first every
/// event triggered since the previous dispatch, then every axis with its
/// summed value. Listeners run in registration order and a failing
/// listener is logged without affecting the others.
#[derive(Default)]
pub struct InputController {
    axes: IndexMap<String, InputAxis>,
    events: IndexMap<String, InputEvent>,
    held: HashSet<InputKey>,
    pointer: [f32; 4],
    last_cursor: Option<(f32, f32)>,
    game_mode: bool,
}

impl std::fmt::Debug for InputController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputController")
            .field("axes", &self.axes.keys().collect::<Vec<_>>())
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .field("held", &self.held)
            .field("game_mode", &self.game_mode)
            .finish()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    // === Registration ===

    /// Add a key contribution to the axis `name`, creating the axis if
    /// needed. The key contributes `scale` while held together with at
    /// least `modifiers`.
    pub fn create_axis_key(
        &mut self,
        name: &str,
        key: InputKey,
        modifiers: impl Into<ModifierSet>,
        scale: f32,
    ) -> Result<()> {
        let modifiers = modifiers.into();
        validate_modifiers(key, modifiers)?;
        validate_scale(scale)?;
        self.axis_entry(name).sources.push(AxisSource::Key { key, modifiers, scale });
        debug!("input: mapped key axis '{name}' <- {key:?} {modifiers:?} x{scale}");
        Ok(())
    }

    /// Add a pointer channel contribution to the axis `name`
    pub fn create_axis_pointer(&mut self, name: &str, axis: PointerAxis, scale: f32) -> Result<()> {
        validate_scale(scale)?;
        self.axis_entry(name).sources.push(AxisSource::Pointer { axis, scale });
        debug!("input: mapped pointer axis '{name}' <- {axis:?} x{scale}");
        Ok(())
    }

    pub fn bind_axis<F>(&mut self, name: &str, listener: F) -> Result<()>
    where
        F: FnMut(&mut FrameContext<'_>, f32) -> Result<()> + 'static,
    {
        let axis = self
            .axes
            .get_mut(name)
            .ok_or_else(|| EngineError::not_found("axis", name))?;
        axis.listeners.push(Box::new(listener));
        Ok(())
    }

    /// Map `key` + `trigger` + exact `modifiers` to the event `name`.
    /// Creating an existing name adds another binding to it.
    pub fn create_event(
        &mut self,
        name: &str,
        key: InputKey,
        trigger: InputTrigger,
        modifiers: impl Into<ModifierSet>,
    ) -> Result<()> {
        let modifiers = modifiers.into();
        validate_modifiers(key, modifiers)?;
        let event = self.events.entry(name.to_string()).or_insert_with(|| InputEvent {
            bindings: Vec::new(),
            listeners: Vec::new(),
            pending: false,
        });
        event.bindings.push(EventBinding { key, trigger, modifiers });
        debug!("input: mapped key event '{name}' <- {key:?} {trigger:?} {modifiers:?}");
        Ok(())
    }

    pub fn bind_event<F>(&mut self, name: &str, listener: F) -> Result<()>
    where
        F: FnMut(&mut FrameContext<'_>) -> Result<()> + 'static,
    {
        let event = self
            .events
            .get_mut(name)
            .ok_or_else(|| EngineError::not_found("event", name))?;
        event.listeners.push(Box::new(listener));
        Ok(())
    }

    fn axis_entry(&mut self, name: &str) -> &mut InputAxis {
        self.axes.entry(name.to_string()).or_insert_with(|| InputAxis {
            sources: Vec::new(),
            listeners: Vec::new(),
            value: 0.0,
        })
    }

    pub fn has_axis(&self, name: &str) -> bool {
        self.axes.contains_key(name)
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Value delivered to the axis listeners on the last dispatch
    pub fn axis_value(&self, name: &str) -> Result<f32> {
        self.axes
            .get(name)
            .map(|a| a.value)
            .ok_or_else(|| EngineError::not_found("axis", name))
    }

    // === Device state ===

    pub fn is_held(&self, key: InputKey) -> bool {
        self.held.contains(&key)
    }

    /// Modifiers produced by currently held keys
    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers_excluding(None)
    }

    fn modifiers_excluding(&self, except: Option<InputKey>) -> ModifierSet {
        self.held
            .iter()
            .filter(|&&k| Some(k) != except)
            .filter_map(|k| k.modifier())
            .collect()
    }

    /// Record a key going down. Repeats while already held are ignored.
    pub fn key_pressed(&mut self, key: InputKey) {
        if self.held.insert(key) {
            trace!("input: {key:?} pressed");
            self.mark_events(key, InputTrigger::Press);
        }
    }

    /// Record a key going up. Releasing a key that is not held is ignored.
    pub fn key_released(&mut self, key: InputKey) {
        if self.held.remove(&key) {
            trace!("input: {key:?} released");
            self.mark_events(key, InputTrigger::Release);
        }
    }

    fn mark_events(&mut self, key: InputKey, trigger: InputTrigger) {
        let modifiers = self.modifiers_excluding(Some(key));
        for event in self.events.values_mut() {
            if event
                .bindings
                .iter()
                .any(|b| b.key == key && b.trigger == trigger && b.modifiers == modifiers)
            {
                event.pending = true;
            }
        }
    }

    /// Absolute cursor position. In game mode the change since the last
    /// position feeds `MouseX`/`MouseY` as `previous - current`.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let (true, Some((px, py))) = (self.game_mode, self.last_cursor) {
            self.pointer[PointerAxis::MouseX.index()] += px - x;
            self.pointer[PointerAxis::MouseY.index()] += py - y;
        }
        self.last_cursor = Some((x, y));
    }

    /// Raw relative motion, same sign convention as [`pointer_moved`](Self::pointer_moved)
    pub fn pointer_delta(&mut self, dx: f32, dy: f32) {
        if self.game_mode {
            self.pointer[PointerAxis::MouseX.index()] -= dx;
            self.pointer[PointerAxis::MouseY.index()] -= dy;
        }
    }

    pub fn scrolled(&mut self, dx: f32, dy: f32) {
        if self.game_mode {
            self.pointer[PointerAxis::MouseScrollX.index()] += dx;
            self.pointer[PointerAxis::MouseScrollY.index()] += dy;
        }
    }

    /// Pointer delta accumulated for `axis` since the last dispatch
    pub fn pointer(&self, axis: PointerAxis) -> f32 {
        self.pointer[axis.index()]
    }

    pub fn game_mode(&self) -> bool {
        self.game_mode
    }

    pub fn set_game_mode(&mut self, enabled: bool) {
        if self.game_mode != enabled {
            debug!("input: game mode {}", if enabled { "on" } else { "off" });
        }
        self.game_mode = enabled;
        self.pointer = [0.0; 4];
        self.last_cursor = None;
    }

    /// Drop all held keys and pending triggers, e.g. on focus loss
    pub fn clear_state(&mut self) {
        self.held.clear();
        self.pointer = [0.0; 4];
        self.last_cursor = None;
        for event in self.events.values_mut() {
            event.pending = false;
        }
    }

    // === Dispatch ===

    fn sample(&self, source: &AxisSource) -> f32 {
        match *source {
            AxisSource::Key { key, modifiers, scale } => {
                if self.held.contains(&key) && modifiers.is_subset(self.modifiers_excluding(Some(key))) {
                    scale
                } else {
                    0.0
                }
            }
            AxisSource::Pointer { axis, scale } => self.pointer[axis.index()] * scale,
        }
    }

    /// Fire pending events, then deliver every axis value, then reset
    /// pointer deltas. Game-mode changes requested by listeners through
    /// `ctx.control` take effect after dispatch.
    pub fn dispatch(&mut self, ctx: &mut FrameContext<'_>) {
        ctx.control.set_game_mode(self.game_mode);

        for (name, event) in &mut self.events {
            if !std::mem::take(&mut event.pending) {
                continue;
            }
            trace!("input: event '{name}'");
            for listener in &mut event.listeners {
                if let Err(err) = listener(ctx) {
                    warn!("input: listener for event '{name}' failed: {err}");
                }
            }
        }

        let values: Vec<f32> = self
            .axes
            .values()
            .map(|axis| axis.sources.iter().map(|s| self.sample(s)).sum())
            .collect();

        for ((name, axis), value) in self.axes.iter_mut().zip(values) {
            axis.value = value;
            for listener in &mut axis.listeners {
                if let Err(err) = listener(ctx, value) {
                    warn!("input: listener for axis '{name}' failed: {err}");
                }
            }
        }

        self.pointer = [0.0; 4];

        if ctx.control.game_mode() != self.game_mode {
            self.set_game_mode(ctx.control.game_mode());
        }
    }
}

fn validate_modifiers(key: InputKey, modifiers: ModifierSet) -> Result<()> {
    match key.modifier() {
        Some(own) if modifiers.contains(own) => Err(EngineError::invalid(format!(
            "{key:?} cannot require its own modifier {own:?}"
        ))),
        _ => Ok(()),
    }
}

fn validate_scale(scale: f32) -> Result<()> {
    if scale.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid(format!("axis scale must be finite, got {scale}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoopControl;
    use crate::input::InputModifier;
    use crate::scene::SceneGraph;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn dispatch(input: &mut InputController, control: &mut LoopControl) {
        let mut scene = SceneGraph::new();
        let mut ctx = FrameContext::new(&mut scene, control, 1.0 / 60.0);
        input.dispatch(&mut ctx);
    }

    fn counter() -> (Rc<RefCell<u32>>, impl FnMut(&mut FrameContext<'_>) -> Result<()>) {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        (count, move |_: &mut FrameContext<'_>| {
            *sink.borrow_mut() += 1;
            Ok(())
        })
    }

    #[test]
    fn binding_unknown_names_fails() {
        let mut input = InputController::new();
        assert!(matches!(
            input.bind_axis("nope", |_, _| Ok(())),
            Err(EngineError::NotFound { kind: "axis", .. })
        ));
        assert!(matches!(
            input.bind_event("nope", |_| Ok(())),
            Err(EngineError::NotFound { kind: "event", .. })
        ));
    }

    #[test]
    fn modifier_key_cannot_require_itself() {
        let mut input = InputController::new();
        let err = input
            .create_event("x", InputKey::KeyLeftShift, InputTrigger::Press, InputModifier::Shift)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        assert!(input
            .create_event("x", InputKey::KeyLeftShift, InputTrigger::Press, InputModifier::Control)
            .is_ok());
    }

    #[test]
    fn event_requires_exact_modifiers() {
        let mut input = InputController::new();
        let mut control = LoopControl::new();
        input
            .create_event("save", InputKey::KeyS, InputTrigger::Press, InputModifier::Control)
            .unwrap();
        let (count, listener) = counter();
        input.bind_event("save", listener).unwrap();

        input.key_pressed(InputKey::KeyS);
        dispatch(&mut input, &mut control);
        assert_eq!(*count.borrow(), 0);
        input.key_released(InputKey::KeyS);

        input.key_pressed(InputKey::KeyLeftControl);
        input.key_pressed(InputKey::KeyLeftShift);
        input.key_pressed(InputKey::KeyS);
        dispatch(&mut input, &mut control);
        assert_eq!(*count.borrow(), 0);
        input.key_released(InputKey::KeyS);
        input.key_released(InputKey::KeyLeftShift);

        input.key_pressed(InputKey::KeyS);
        dispatch(&mut input, &mut control);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn axis_modifiers_must_be_held() {
        let mut input = InputController::new();
        let mut control = LoopControl::new();
        input
            .create_axis_key("sprint", InputKey::KeyW, InputModifier::Shift, 2.0)
            .unwrap();

        input.key_pressed(InputKey::KeyW);
        dispatch(&mut input, &mut control);
        assert_eq!(input.axis_value("sprint").unwrap(), 0.0);

        input.key_pressed(InputKey::KeyRightShift);
        input.key_pressed(InputKey::KeyLeftAlt);
        dispatch(&mut input, &mut control);
        assert_eq!(input.axis_value("sprint").unwrap(), 2.0);
    }

    #[test]
    fn pointer_deltas_need_game_mode_and_reset_each_frame() {
        let mut input = InputController::new();
        let mut control = LoopControl::new();
        input.create_axis_pointer("yaw", PointerAxis::MouseX, 0.5).unwrap();

        input.pointer_moved(10.0, 10.0);
        input.pointer_moved(4.0, 10.0);
        dispatch(&mut input, &mut control);
        assert_eq!(input.axis_value("yaw").unwrap(), 0.0);

        input.set_game_mode(true);
        input.pointer_moved(10.0, 10.0);
        input.pointer_moved(4.0, 10.0);
        input.pointer_delta(2.0, 0.0);
        dispatch(&mut input, &mut control);
        assert_eq!(input.axis_value("yaw").unwrap(), 2.0);

        dispatch(&mut input, &mut control);
        assert_eq!(input.axis_value("yaw").unwrap(), 0.0);
    }

    #[test]
    fn listener_can_toggle_game_mode() {
        let mut input = InputController::new();
        let mut control = LoopControl::new();
        input
            .create_event("mousemode", InputKey::KeySpace, InputTrigger::Release, ModifierSet::NONE)
            .unwrap();
        input
            .bind_event("mousemode", |ctx| {
                ctx.control.toggle_game_mode();
                Ok(())
            })
            .unwrap();

        input.key_pressed(InputKey::KeySpace);
        dispatch(&mut input, &mut control);
        assert!(!input.game_mode());

        input.key_released(InputKey::KeySpace);
        dispatch(&mut input, &mut control);
        assert!(input.game_mode());
        assert!(control.game_mode());
    }

    #[test]
    fn failing_listener_is_isolated() {
        let mut input = InputController::new();
        let mut control = LoopControl::new();
        input
            .create_event("go", InputKey::KeyEnter, InputTrigger::Press, ModifierSet::NONE)
            .unwrap();
        input
            .bind_event("go", |_| Err(EngineError::State("broken".into())))
            .unwrap();
        let (count, listener) = counter();
        input.bind_event("go", listener).unwrap();

        input.key_pressed(InputKey::KeyEnter);
        dispatch(&mut input, &mut control);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn clear_state_drops_held_keys() {
        let mut input = InputController::new();
        input.key_pressed(InputKey::KeyA);
        input.key_pressed(InputKey::KeyLeftAlt);
        assert_eq!(input.modifiers(), ModifierSet::from(InputModifier::Alt));
        input.clear_state();
        assert!(!input.is_held(InputKey::KeyA));
        assert!(input.modifiers().is_empty());
    }
}
