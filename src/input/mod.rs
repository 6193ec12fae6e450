//! Input dispatch: named axes sampled every frame and named events fired
//! on key transitions.

mod controller;
mod key;
mod winit_adapter;

pub use controller::{AxisListener, EventListener, InputController};
pub use key::{InputKey, InputModifier, InputTrigger, ModifierSet, PointerAxis};
pub use winit_adapter::{keycode_to_key, mouse_button_to_key, WinitAdapter};
