use serde::Deserialize;

bitflags::bitflags! {
    /// Modifier mask of a keyboard
    ///
    /// The bits follow the order of the modifiers of the default xkb keymap, so the mask
    /// reported by a backend can be used as is.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifiersState: u32 {
        /// The "shift" key
        const SHIFT = 1;
        /// The "Caps lock" key
        const CAPS = 2;
        /// The "control" key
        const CTRL = 4;
        /// The "alt" key
        const ALT = 8;
        /// Usually the "Num lock" key
        const MOD2 = 16;
        /// Unused by most keymaps
        const MOD3 = 32;
        /// The "logo" key
        ///
        /// Also known as the "windows" key on most keyboards
        const LOGO = 64;
        /// Usually "AltGr"
        const MOD5 = 128;
    }
}

/// Modifier used to start interactive move, resize and rotate grabs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaKey {
    /// Shift
    Shift,
    /// Control
    Ctrl,
    /// Alt
    Alt,
    /// Logo
    #[default]
    Logo,
    /// Mod5, usually AltGr
    Mod5,
}

impl MetaKey {
    /// Modifier bit of this key
    pub fn modifier(&self) -> ModifiersState {
        match self {
            MetaKey::Shift => ModifiersState::SHIFT,
            MetaKey::Ctrl => ModifiersState::CTRL,
            MetaKey::Alt => ModifiersState::ALT,
            MetaKey::Logo => ModifiersState::LOGO,
            MetaKey::Mod5 => ModifiersState::MOD5,
        }
    }
}
