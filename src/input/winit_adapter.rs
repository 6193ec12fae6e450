use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::InputController;
use super::key::InputKey;

/// Pixels per scroll line when a device reports pixel deltas
const PIXELS_PER_LINE: f32 = 20.0;

/// Bridges winit window/device events to an [`InputController`]
#[derive(Debug, Clone, Default)]
pub struct WinitAdapter {
    /// Take pointer motion from raw device events instead of cursor
    /// positions. Set while the cursor is locked.
    raw_motion: bool,
}

impl WinitAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw_motion(&mut self, enabled: bool) {
        self.raw_motion = enabled;
    }

    pub fn raw_motion(&self) -> bool {
        self.raw_motion
    }

    /// Feed a window event. Returns true if it was consumed as input.
    pub fn process_window_event(&mut self, input: &mut InputController, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return false;
                };
                let Some(key) = keycode_to_key(code) else {
                    return false;
                };
                match event.state {
                    ElementState::Pressed => input.key_pressed(key),
                    ElementState::Released => input.key_released(key),
                }
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(key) = mouse_button_to_key(*button) else {
                    return false;
                };
                match state {
                    ElementState::Pressed => input.key_pressed(key),
                    ElementState::Released => input.key_released(key),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                if !self.raw_motion {
                    input.pointer_moved(position.x as f32, position.y as f32);
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                    MouseScrollDelta::PixelDelta(p) => {
                        (p.x as f32 / PIXELS_PER_LINE, p.y as f32 / PIXELS_PER_LINE)
                    }
                };
                input.scrolled(dx, dy);
                true
            }
            WindowEvent::Focused(false) => {
                input.clear_state();
                true
            }
            _ => false,
        }
    }

    pub fn process_device_event(&mut self, input: &mut InputController, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.raw_motion {
                input.pointer_delta(*dx as f32, *dy as f32);
            }
        }
    }
}

/// Map a winit key code to an engine key
pub fn keycode_to_key(code: KeyCode) -> Option<InputKey> {
    use InputKey::*;
    Some(match code {
        KeyCode::KeyA => KeyA,
        KeyCode::KeyB => KeyB,
        KeyCode::KeyC => KeyC,
        KeyCode::KeyD => KeyD,
        KeyCode::KeyE => KeyE,
        KeyCode::KeyF => KeyF,
        KeyCode::KeyG => KeyG,
        KeyCode::KeyH => KeyH,
        KeyCode::KeyI => KeyI,
        KeyCode::KeyJ => KeyJ,
        KeyCode::KeyK => KeyK,
        KeyCode::KeyL => KeyL,
        KeyCode::KeyM => KeyM,
        KeyCode::KeyN => KeyN,
        KeyCode::KeyO => KeyO,
        KeyCode::KeyP => KeyP,
        KeyCode::KeyQ => KeyQ,
        KeyCode::KeyR => KeyR,
        KeyCode::KeyS => KeyS,
        KeyCode::KeyT => KeyT,
        KeyCode::KeyU => KeyU,
        KeyCode::KeyV => KeyV,
        KeyCode::KeyW => KeyW,
        KeyCode::KeyX => KeyX,
        KeyCode::KeyY => KeyY,
        KeyCode::KeyZ => KeyZ,
        KeyCode::Digit0 => Key0,
        KeyCode::Digit1 => Key1,
        KeyCode::Digit2 => Key2,
        KeyCode::Digit3 => Key3,
        KeyCode::Digit4 => Key4,
        KeyCode::Digit5 => Key5,
        KeyCode::Digit6 => Key6,
        KeyCode::Digit7 => Key7,
        KeyCode::Digit8 => Key8,
        KeyCode::Digit9 => Key9,
        KeyCode::ArrowUp => KeyUp,
        KeyCode::ArrowDown => KeyDown,
        KeyCode::ArrowLeft => KeyLeft,
        KeyCode::ArrowRight => KeyRight,
        KeyCode::Escape => KeyEsc,
        KeyCode::Enter | KeyCode::NumpadEnter => KeyEnter,
        KeyCode::Space => KeySpace,
        KeyCode::ControlLeft => KeyLeftControl,
        KeyCode::ControlRight => KeyRightControl,
        KeyCode::ShiftLeft => KeyLeftShift,
        KeyCode::ShiftRight => KeyRightShift,
        KeyCode::AltLeft => KeyLeftAlt,
        KeyCode::AltRight => KeyRightAlt,
        _ => return None,
    })
}

pub fn mouse_button_to_key(button: MouseButton) -> Option<InputKey> {
    match button {
        MouseButton::Left => Some(InputKey::MouseLeft),
        MouseButton::Middle => Some(InputKey::MouseMiddle),
        MouseButton::Right => Some(InputKey::MouseRight),
        _ => None,
    }
}
