//! Common traits for input backends to receive input from.

mod tablet;

pub use tablet::{
    ProximityState, TabletToolAxes, TabletToolAxisEvent, TabletToolButtonEvent, TabletToolCapabilities,
    TabletToolDescriptor, TabletToolProximityEvent, TabletToolTipEvent, TabletToolTipState, TabletToolType,
    ToolId,
};

use crate::{
    input::keyboard::ModifiersState,
    utils::{ids::foreign_id, Logical, Point, Raw},
};

foreign_id!(
    /// An input device, as identified by the backend
    DeviceId
);

/// Linux event code of the left mouse button
pub const BTN_LEFT: u32 = 0x110;
/// Linux event code of the right mouse button
pub const BTN_RIGHT: u32 = 0x111;
/// Linux event code of the middle mouse button
pub const BTN_MIDDLE: u32 = 0x112;

/// Kind of an input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// A keyboard
    Keyboard,
    /// A mouse or a touchpad
    Pointer,
    /// A touchscreen
    Touch,
    /// A drawing tablet, reporting tablet tools
    TabletTool,
    /// The button pad of a drawing tablet
    TabletPad,
}

/// Description of a newly attached input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Identity of the device
    pub id: DeviceId,
    /// Human readable name, matched against the device configuration
    pub name: String,
    /// Kind of device
    pub kind: DeviceKind,
    /// Output the backend associates with the device, like a built-in touchscreen
    pub output_name: Option<String>,
}

/// State of key on a keyboard. Either pressed or released
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeyState {
    /// Key is released
    Released,
    /// Key is pressed
    Pressed,
}

/// A particular mouse button
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Middle mouse button
    Middle,
    /// Right mouse button
    Right,
    /// Other mouse button with its event code
    Other(u32),
}

impl From<u32> for MouseButton {
    fn from(code: u32) -> Self {
        match code {
            BTN_LEFT => MouseButton::Left,
            BTN_RIGHT => MouseButton::Right,
            BTN_MIDDLE => MouseButton::Middle,
            other => MouseButton::Other(other),
        }
    }
}

impl From<MouseButton> for u32 {
    fn from(button: MouseButton) -> u32 {
        match button {
            MouseButton::Left => BTN_LEFT,
            MouseButton::Right => BTN_RIGHT,
            MouseButton::Middle => BTN_MIDDLE,
            MouseButton::Other(code) => code,
        }
    }
}

/// State of a button on a pointer device, like mouse or tablet tool. Either pressed or released
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ButtonState {
    /// Button is released
    Released,
    /// Button is pressed
    Pressed,
}

/// Source of an axis when scrolling
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AxisSource {
    /// Finger. Mostly used for trackpads.
    Finger,
    /// Continous scrolling device. Almost identical to `Finger`
    Continuous,
    /// Scroll wheel.
    Wheel,
    /// Scrolling through tilting the scroll wheel.
    WheelTilt,
}

/// Slot of a different touch event.
///
/// Touch events are groubed by slots, usually to identify different
/// fingers on a multi-touch enabled input device. Events should only
/// be interpreted in the context of other events on the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchSlot(pub u32);

impl From<u32> for TouchSlot {
    fn from(id: u32) -> Self {
        TouchSlot(id)
    }
}

/// A key of a keyboard changed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardKeyEvent {
    /// Keyboard the key belongs to
    pub device: DeviceId,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Linux key code
    pub key_code: u32,
    /// New state of the key
    pub state: KeyState,
}

/// The modifiers of a keyboard changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardModifiersEvent {
    /// The keyboard
    pub device: DeviceId,
    /// Modifiers now active
    pub modifiers: ModifiersState,
}

/// Relative motion of a pointer device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMotionEvent {
    /// The pointer device
    pub device: DeviceId,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Accelerated motion
    pub delta: Point<f64, Logical>,
}

/// Absolute motion of a pointer device, like a virtual machine mouse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMotionAbsoluteEvent {
    /// The pointer device
    pub device: DeviceId,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Normalized position over the mapped area
    pub position: Point<f64, Raw>,
}

/// A button of a pointer device changed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerButtonEvent {
    /// The pointer device
    pub device: DeviceId,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Linux event code of the button
    pub button: u32,
    /// New state of the button
    pub state: ButtonState,
}

/// Scroll motion of a pointer device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerAxisEvent {
    /// The pointer device
    pub device: DeviceId,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Source of the scroll motion
    pub source: AxisSource,
    /// Horizontal scroll amount
    pub horizontal: f64,
    /// Vertical scroll amount
    pub vertical: f64,
    /// Horizontal amount in discrete wheel steps
    pub horizontal_discrete: i32,
    /// Vertical amount in discrete wheel steps
    pub vertical_discrete: i32,
}

/// A new touch point appeared
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchDownEvent {
    /// The touch device
    pub device: DeviceId,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Slot of the touch point
    pub slot: TouchSlot,
    /// Normalized position over the mapped area
    pub position: Point<f64, Raw>,
}

/// A touch point moved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchMotionEvent {
    /// The touch device
    pub device: DeviceId,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Slot of the touch point
    pub slot: TouchSlot,
    /// Normalized position over the mapped area
    pub position: Point<f64, Raw>,
}

/// A touch point was lifted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchUpEvent {
    /// The touch device
    pub device: DeviceId,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Slot of the touch point
    pub slot: TouchSlot,
}

/// Different events that can be generated by an input backend
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// An input device was connected
    DeviceAdded(DeviceDescriptor),
    /// An input device was disconnected
    DeviceRemoved(DeviceId),
    /// A keyboard event occurred
    Keyboard(KeyboardKeyEvent),
    /// The modifiers of a keyboard changed
    KeyboardModifiers(KeyboardModifiersEvent),
    /// A relative pointer motion occurred
    PointerMotion(PointerMotionEvent),
    /// An absolute pointer motion occurs
    PointerMotionAbsolute(PointerMotionAbsoluteEvent),
    /// A pointer button was pressed or released
    PointerButton(PointerButtonEvent),
    /// A pointer axis was actionned
    PointerAxis(PointerAxisEvent),
    /// A new touchpoint appeared
    TouchDown(TouchDownEvent),
    /// A touchpoint moved
    TouchMotion(TouchMotionEvent),
    /// A touchpoint was removed
    TouchUp(TouchUpEvent),
    /// A tablet tool axis was changed
    TabletToolAxis(TabletToolAxisEvent),
    /// A tablet tool entered or left the proximity of its tablet
    TabletToolProximity(TabletToolProximityEvent),
    /// A tablet tool tip changed state
    TabletToolTip(TabletToolTipEvent),
    /// A tablet tool button was pressed or released
    TabletToolButton(TabletToolButtonEvent),
}

impl InputEvent {
    /// Whether this event counts as user activity
    pub fn is_activity(&self) -> bool {
        !matches!(self, InputEvent::DeviceAdded(_) | InputEvent::DeviceRemoved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_button_codes() {
        assert_eq!(MouseButton::Left, MouseButton::from(0x110));
        assert_eq!(MouseButton::Other(0x113), MouseButton::from(0x113));
        assert_eq!(BTN_MIDDLE, u32::from(MouseButton::Middle));
    }
}
