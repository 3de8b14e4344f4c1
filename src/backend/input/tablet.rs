use super::{ButtonState, DeviceId};
use crate::utils::{ids::foreign_id, Logical, Point, Raw};
use bitflags::bitflags;

foreign_id!(
    /// A physical tablet tool, as identified by the backend
    ToolId
);

/// Description of physical tablet tool
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct TabletToolDescriptor {
    /// Identity of the tool
    pub id: ToolId,
    /// The tool type is the high-level type of the tool and usually decides the interaction expected from this tool.
    pub tool_type: TabletToolType,
    /// Tool capabilities
    pub capabilities: TabletToolCapabilities,
}

/// Describes the physical type of tool. The physical type of tool generally defines its base usage.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum TabletToolType {
    /// A generic pen.
    Pen,
    /// Eraser
    Eraser,
    /// A paintbrush-like tool.
    Brush,
    /// Physical drawing tool, e.g. Wacom Inking Pen
    Pencil,
    /// An airbrush-like tool.
    Airbrush,
    /// A mouse bound to the tablet.
    Mouse,
    /// A mouse tool with a lens.
    Lens,
    /// A rotary device with positional and rotation data.
    Totem,
    /// Type of the device is not known or does not match any known ones
    Unknown,
}

impl TabletToolType {
    /// Whether the tool reports relative motion, like a mouse
    pub fn is_relative(&self) -> bool {
        matches!(self, TabletToolType::Mouse)
    }
}

bitflags! {
    /// Describes extra capabilities on a tablet.
    ///
    /// Any tool must provide x and y values, extra axes are device-specific.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TabletToolCapabilities: u32 {
        /// Tilt axes
        const TILT = 1;
        /// Pressure axis
        const PRESSURE = 2;
        /// Distance axis
        const DISTANCE = 4;
        /// Z-rotation axis
        const ROTATION = 16;
        /// Slider axis
        const SLIDER = 32;
        /// Wheel axis
        const WHEEL = 64;
    }
}

bitflags! {
    /// Axes updated by a [`TabletToolAxisEvent`]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TabletToolAxes: u32 {
        /// Horizontal position
        const X = 1;
        /// Vertical position
        const Y = 2;
        /// Distance to the tablet
        const DISTANCE = 4;
        /// Pressure on the tip
        const PRESSURE = 8;
        /// Tilt around the x axis
        const TILT_X = 16;
        /// Tilt around the y axis
        const TILT_Y = 32;
        /// Z-rotation
        const ROTATION = 64;
        /// Slider position
        const SLIDER = 128;
        /// Wheel rotation
        const WHEEL = 256;
    }
}

/// Axis motion of a tablet tool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletToolAxisEvent {
    /// Tablet the tool is used on
    pub device: DeviceId,
    /// The tool
    pub tool: TabletToolDescriptor,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Axes carrying a new value in this event
    pub updated_axes: TabletToolAxes,
    /// Absolute position on the tablet
    pub position: Point<f64, Raw>,
    /// Relative motion, for mouse-like tools
    pub delta: Point<f64, Logical>,
    /// Pressure, normalized to `0.0..=1.0`
    pub pressure: f64,
    /// Distance, normalized to `0.0..=1.0`
    pub distance: f64,
    /// Tilt along the x axis, in degrees
    pub tilt_x: f64,
    /// Tilt along the y axis, in degrees
    pub tilt_y: f64,
    /// Z-rotation, in degrees
    pub rotation: f64,
    /// Slider position, normalized to `-1.0..=1.0`
    pub slider: f64,
    /// Wheel delta, in degrees
    pub wheel_delta: f64,
}

impl TabletToolAxisEvent {
    /// An axis event only moving the tool
    pub fn motion(device: DeviceId, tool: TabletToolDescriptor, time: u32, position: Point<f64, Raw>) -> Self {
        TabletToolAxisEvent {
            device,
            tool,
            time,
            updated_axes: TabletToolAxes::X | TabletToolAxes::Y,
            position,
            delta: Point::default(),
            pressure: 0.0,
            distance: 0.0,
            tilt_x: 0.0,
            tilt_y: 0.0,
            rotation: 0.0,
            slider: 0.0,
            wheel_delta: 0.0,
        }
    }
}

/// Describes the proximity of a tablet tool.
///
/// On some hardware a tool goes out of proximity when it ceases to touch the surface. On
/// other hardware, the tool is still detectable within a short distance (a few cm) off
/// the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProximityState {
    /// Out of proximity
    Out,
    /// In proximity
    In,
}

/// A tablet tool entered or left the detection range of the tablet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletToolProximityEvent {
    /// Tablet the tool is used on
    pub device: DeviceId,
    /// The tool
    pub tool: TabletToolDescriptor,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Absolute position on the tablet
    pub position: Point<f64, Raw>,
    /// New proximity state
    pub state: ProximityState,
}

/// The tip contact state for a tool on a device.
///
/// The tip contact state of a tool is a binary state signalling whether the tool is
/// touching the surface of the tablet device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabletToolTipState {
    /// Not touching the surface
    Up,
    /// Touching the surface
    Down,
}

/// A tablet tool touched or left the surface of the tablet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletToolTipEvent {
    /// Tablet the tool is used on
    pub device: DeviceId,
    /// The tool
    pub tool: TabletToolDescriptor,
    /// Timestamp in milliseconds
    pub time: u32,
    /// New tip state
    pub state: TabletToolTipState,
}

/// A button of a tablet tool changed state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletToolButtonEvent {
    /// Tablet the tool is used on
    pub device: DeviceId,
    /// The tool
    pub tool: TabletToolDescriptor,
    /// Timestamp in milliseconds
    pub time: u32,
    /// Button code
    pub button: u32,
    /// New state of the button
    pub state: ButtonState,
}
