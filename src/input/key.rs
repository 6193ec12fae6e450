use std::fmt;

/// Physical keys and mouse buttons that can back an event or axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputKey {
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    KeyUp,
    KeyDown,
    KeyLeft,
    KeyRight,
    KeyEsc,
    KeyEnter,
    KeySpace,
    KeyLeftControl,
    KeyRightControl,
    KeyLeftShift,
    KeyRightShift,
    KeyLeftAlt,
    KeyRightAlt,
    MouseLeft,
    MouseMiddle,
    MouseRight,
}

impl InputKey {
    /// The modifier this key produces while held, if any
    pub fn modifier(self) -> Option<InputModifier> {
        match self {
            Self::KeyLeftControl | Self::KeyRightControl => Some(InputModifier::Control),
            Self::KeyLeftShift | Self::KeyRightShift => Some(InputModifier::Shift),
            Self::KeyLeftAlt | Self::KeyRightAlt => Some(InputModifier::Alt),
            _ => None,
        }
    }

    pub fn is_mouse_button(self) -> bool {
        matches!(self, Self::MouseLeft | Self::MouseMiddle | Self::MouseRight)
    }
}

/// Continuous pointer channels, reported as per-frame deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAxis {
    MouseX,
    MouseY,
    MouseScrollX,
    MouseScrollY,
}

impl PointerAxis {
    pub(crate) fn index(self) -> usize {
        match self {
            Self::MouseX => 0,
            Self::MouseY => 1,
            Self::MouseScrollX => 2,
            Self::MouseScrollY => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputTrigger {
    /// released -> held
    Press,
    /// held -> released
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputModifier {
    Control,
    Alt,
    Shift,
}

impl InputModifier {
    fn bit(self) -> u8 {
        match self {
            Self::Control => 1,
            Self::Alt => 1 << 1,
            Self::Shift => 1 << 2,
        }
    }
}

/// A set of modifiers
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const NONE: ModifierSet = ModifierSet(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, modifier: InputModifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn insert(&mut self, modifier: InputModifier) {
        self.0 |= modifier.bit();
    }

    pub fn remove(&mut self, modifier: InputModifier) {
        self.0 &= !modifier.bit();
    }

    pub fn contains(self, modifier: InputModifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Every modifier in `self` is also in `other`
    pub fn is_subset(self, other: ModifierSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = InputModifier> {
        [InputModifier::Control, InputModifier::Alt, InputModifier::Shift]
            .into_iter()
            .filter(move |m| self.contains(*m))
    }
}

impl fmt::Debug for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<InputModifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = InputModifier>>(iter: I) -> Self {
        let mut set = Self::NONE;
        for m in iter {
            set.insert(m);
        }
        set
    }
}

impl<const N: usize> From<[InputModifier; N]> for ModifierSet {
    fn from(modifiers: [InputModifier; N]) -> Self {
        modifiers.into_iter().collect()
    }
}

impl From<InputModifier> for ModifierSet {
    fn from(modifier: InputModifier) -> Self {
        Self::NONE.with(modifier)
    }
}
