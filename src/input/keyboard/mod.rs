//! Keyboard-related types for the input core

use smallvec::SmallVec;
use tracing::trace;

use super::{Seat, SeatHandler};
use crate::{
    backend::input::{DeviceId, KeyState, KeyboardKeyEvent, KeyboardModifiersEvent},
    desktop::SurfaceId,
};

mod modifiers_state;
pub use modifiers_state::{MetaKey, ModifiersState};

/// State of a keyboard attached to a seat
#[derive(Debug, Clone)]
pub struct KeyboardState {
    device: DeviceId,
    meta_key: MetaKey,
    pressed: SmallVec<[u32; 8]>,
    modifiers: ModifiersState,
}

impl KeyboardState {
    /// Track a new keyboard using the given meta modifier
    pub fn new(device: DeviceId, meta_key: MetaKey) -> Self {
        KeyboardState {
            device,
            meta_key,
            pressed: SmallVec::new(),
            modifiers: ModifiersState::empty(),
        }
    }

    /// Device backing this keyboard
    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Update the state of a key, returning whether anything changed
    pub fn key(&mut self, key_code: u32, state: KeyState) -> bool {
        match state {
            KeyState::Pressed => {
                if self.pressed.contains(&key_code) {
                    return false;
                }
                self.pressed.push(key_code);
                true
            }
            KeyState::Released => {
                let before = self.pressed.len();
                self.pressed.retain(|k| *k != key_code);
                before != self.pressed.len()
            }
        }
    }

    /// Keycodes currently pressed, in press order
    pub fn pressed_keys(&self) -> &[u32] {
        &self.pressed
    }

    /// Current modifier mask
    pub fn modifiers(&self) -> ModifiersState {
        self.modifiers
    }

    /// Replace the modifier mask
    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Meta modifier configured for this keyboard
    pub fn meta_key(&self) -> MetaKey {
        self.meta_key
    }

    /// Change the meta modifier of this keyboard
    pub fn set_meta_key(&mut self, meta_key: MetaKey) {
        self.meta_key = meta_key;
    }

    /// Whether the meta modifier is part of the current mask
    pub fn has_meta_pressed(&self) -> bool {
        self.modifiers.contains(self.meta_key.modifier())
    }
}

impl Seat {
    /// Handle a key event of one of the keyboards of this seat
    pub fn keyboard_key<D: SeatHandler>(&mut self, data: &mut D, event: &KeyboardKeyEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);

        let Some(keyboard) = self.keyboards.get_mut(&event.device) else {
            trace!(device = event.device.0, "Key event of an unknown keyboard");
            return;
        };
        if !keyboard.key(event.key_code, event.state) {
            return;
        }
        self.active_keyboard = Some(event.device);

        if self.keyboard_focus.is_some() {
            data.keyboard_key(self.id, event.time, event.key_code, event.state);
        }
    }

    /// Handle a modifier change of one of the keyboards of this seat
    pub fn keyboard_modifiers<D: SeatHandler>(&mut self, data: &mut D, event: &KeyboardModifiersEvent) {
        let _span = self.span.clone().entered();

        let Some(keyboard) = self.keyboards.get_mut(&event.device) else {
            return;
        };
        if keyboard.modifiers() == event.modifiers {
            return;
        }
        keyboard.set_modifiers(event.modifiers);
        self.active_keyboard = Some(event.device);

        if self.keyboard_focus.is_some() {
            data.keyboard_modifiers(self.id, event.modifiers);
        }
    }

    /// Returns true if any keyboard of this seat holds its meta modifier
    pub fn has_meta_pressed(&self) -> bool {
        self.keyboards.values().any(KeyboardState::has_meta_pressed)
    }

    /// Keyboard used for the keys and modifiers sent on focus changes
    pub fn active_keyboard(&self) -> Option<&KeyboardState> {
        self.active_keyboard
            .and_then(|device| self.keyboards.get(&device))
            .or_else(|| self.keyboards.values().last())
    }

    /// Surface currently holding the keyboard focus
    pub fn keyboard_focus(&self) -> Option<SurfaceId> {
        self.keyboard_focus
    }

    pub(super) fn keyboard_enter<D: SeatHandler>(&mut self, data: &mut D, surface: SurfaceId) {
        if self.keyboard_focus == Some(surface) {
            return;
        }
        self.keyboard_focus = Some(surface);

        let (keys, modifiers) = match self.active_keyboard() {
            Some(keyboard) => (keyboard.pressed_keys().to_vec(), keyboard.modifiers()),
            None => (Vec::new(), ModifiersState::empty()),
        };
        data.keyboard_enter(self.id, surface, &keys, modifiers);
    }

    pub(super) fn keyboard_clear_focus<D: SeatHandler>(&mut self, data: &mut D) {
        if self.keyboard_focus.take().is_some() {
            data.keyboard_clear_focus(self.id);
        }
    }
}
