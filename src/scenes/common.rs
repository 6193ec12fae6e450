use crate::error::Result;
use crate::input::{InputController, InputKey, InputTrigger, ModifierSet};

/// Esc exits, Space (on release) toggles pointer capture
pub fn bind_standard_events(input: &mut InputController) -> Result<()> {
    input.create_event("exit", InputKey::KeyEsc, InputTrigger::Press, ModifierSet::NONE)?;
    input.bind_event("exit", |ctx| {
        ctx.control.request_stop();
        Ok(())
    })?;

    input.create_event("mousemode", InputKey::KeySpace, InputTrigger::Release, ModifierSet::NONE)?;
    input.bind_event("mousemode", |ctx| {
        ctx.control.toggle_game_mode();
        Ok(())
    })?;
    Ok(())
}
