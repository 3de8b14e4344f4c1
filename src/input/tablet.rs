//! Tablet tools and pads
//!
//! A tool hovering a surface whose client bound the tablet protocol is driven natively:
//! proximity, motion, tip and axes are forwarded to that surface. Over any other surface
//! the tool falls back to emulating a pointer, moving the cursor and pressing buttons
//! with its tip.

use smallvec::SmallVec;
use tracing::debug;

use super::{Seat, SeatHandler};
use crate::{
    backend::input::{
        ButtonState, DeviceId, MouseButton, ProximityState, TabletToolAxes, TabletToolAxisEvent,
        TabletToolButtonEvent, TabletToolDescriptor, TabletToolProximityEvent, TabletToolTipEvent,
        TabletToolTipState, TabletToolType, ToolId,
    },
    desktop::SurfaceId,
    utils::{Logical, Point, Raw},
};

/// Value of one axis of a tablet tool, as forwarded to the surface in proximity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TabletToolAxisValue {
    /// Pressure on the tip, normalized to `[0, 1]`
    Pressure(f64),
    /// Distance to the tablet, normalized to `[0, 1]`
    Distance(f64),
    /// Tilt in degrees, both axes are always sent together
    Tilt {
        /// Tilt around the x axis
        x: f64,
        /// Tilt around the y axis
        y: f64,
    },
    /// Z-rotation in degrees
    Rotation(f64),
    /// Slider position, normalized to `[-1, 1]`
    Slider(f64),
    /// Wheel rotation in degrees
    Wheel(f64),
}

/// A tablet tool known to a seat
#[derive(Debug, Clone, PartialEq)]
pub struct TabletTool {
    descriptor: TabletToolDescriptor,
    tablet: DeviceId,
    fallback: bool,
    tilt_x: f64,
    tilt_y: f64,
    proximity: Option<SurfaceId>,
}

impl TabletTool {
    /// Description of the tool
    pub fn descriptor(&self) -> &TabletToolDescriptor {
        &self.descriptor
    }

    /// Tablet the tool was last used on
    pub fn tablet(&self) -> DeviceId {
        self.tablet
    }

    /// Whether the tool is driven through the tablet protocol rather than emulating a pointer
    pub fn is_native(&self) -> bool {
        !self.fallback
    }

    /// Surface the tool is in proximity of
    pub fn proximity(&self) -> Option<SurfaceId> {
        self.proximity
    }
}

impl Seat {
    /// A tablet tool known to this seat
    pub fn tablet_tool(&self, id: ToolId) -> Option<&TabletTool> {
        self.tablet_tools.get(&id)
    }

    fn tablet_tool_entry(&mut self, tablet: DeviceId, descriptor: TabletToolDescriptor) -> &mut TabletTool {
        let tool = self.tablet_tools.entry(descriptor.id).or_insert_with(|| TabletTool {
            descriptor,
            tablet,
            fallback: false,
            tilt_x: 0.0,
            tilt_y: 0.0,
            proximity: None,
        });
        tool.tablet = tablet;
        tool
    }

    /// Handle axis motion of a tablet tool
    pub fn tablet_tool_axis<D: SeatHandler>(&mut self, data: &mut D, event: &TabletToolAxisEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);
        self.set_visible(data, true);

        let tool = self.tablet_tool_entry(event.device, event.tool);
        if event.updated_axes.contains(TabletToolAxes::TILT_X) {
            tool.tilt_x = event.tilt_x;
        }
        if event.updated_axes.contains(TabletToolAxes::TILT_Y) {
            tool.tilt_y = event.tilt_y;
        }
        let (tilt_x, tilt_y) = (tool.tilt_x, tool.tilt_y);

        if event.tool.tool_type.is_relative() {
            let location = self.cursor.location + event.delta;
            self.cursor.location = self.clamp_location(data, location);
        } else {
            self.move_tool_absolute(data, event.device, event.updated_axes, event.position);
        }
        self.tablet_tool_position(data, event.device, event.tool.id, event.time);

        if !self.tablet_tools.get(&event.tool.id).map_or(false, TabletTool::is_native) {
            return;
        }
        let axes = event.updated_axes;
        let mut values = SmallVec::<[TabletToolAxisValue; 6]>::new();
        if axes.contains(TabletToolAxes::PRESSURE) {
            values.push(TabletToolAxisValue::Pressure(event.pressure));
        }
        if axes.contains(TabletToolAxes::DISTANCE) {
            values.push(TabletToolAxisValue::Distance(event.distance));
        }
        if axes.intersects(TabletToolAxes::TILT_X | TabletToolAxes::TILT_Y) {
            values.push(TabletToolAxisValue::Tilt { x: tilt_x, y: tilt_y });
        }
        if axes.contains(TabletToolAxes::ROTATION) {
            values.push(TabletToolAxisValue::Rotation(event.rotation));
        }
        if axes.contains(TabletToolAxes::SLIDER) {
            values.push(TabletToolAxisValue::Slider(event.slider));
        }
        if axes.contains(TabletToolAxes::WHEEL) {
            values.push(TabletToolAxisValue::Wheel(event.wheel_delta));
        }
        for value in values {
            data.tablet_tool_axis(self.id, event.tool.id, value);
        }
    }

    /// Handle a tablet tool entering or leaving proximity of the tablet
    pub fn tablet_tool_proximity<D: SeatHandler>(&mut self, data: &mut D, event: &TabletToolProximityEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);

        match event.state {
            ProximityState::In => {
                self.set_visible(data, true);
                self.tablet_tool_entry(event.device, event.tool);
                if !event.tool.tool_type.is_relative() {
                    self.move_tool_absolute(
                        data,
                        event.device,
                        TabletToolAxes::X | TabletToolAxes::Y,
                        event.position,
                    );
                }
                self.tablet_tool_position(data, event.device, event.tool.id, event.time);
            }
            ProximityState::Out => {
                let Some(tool) = self.tablet_tools.get_mut(&event.tool.id) else {
                    return;
                };
                if tool.proximity.take().is_some() {
                    data.tablet_tool_proximity_out(self.id, event.tool.id);
                }
            }
        }
    }

    /// Handle the tip of a tablet tool touching or leaving the tablet
    pub fn tablet_tool_tip<D: SeatHandler>(&mut self, data: &mut D, event: &TabletToolTipEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);

        let tool = self.tablet_tool_entry(event.device, event.tool);
        let native = tool.is_native() && tool.proximity.is_some();
        let location = self.cursor.location;

        if !native {
            let button = if event.tool.tool_type == TabletToolType::Eraser {
                MouseButton::Right
            } else {
                MouseButton::Left
            };
            let state = match event.state {
                TabletToolTipState::Down => ButtonState::Pressed,
                TabletToolTipState::Up => ButtonState::Released,
            };
            self.press_button(data, Some(event.device), false, event.time, button, state, location);
            return;
        }

        match event.state {
            TabletToolTipState::Down => {
                data.tablet_tool_down(self.id, event.tool.id);
                let under = data.surface_under(location);
                self.focus_under(data, under);
            }
            TabletToolTipState::Up => data.tablet_tool_up(self.id, event.tool.id),
        }
    }

    /// Handle a button of a tablet tool
    pub fn tablet_tool_button<D: SeatHandler>(&mut self, data: &mut D, event: &TabletToolButtonEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);

        let tool = self.tablet_tool_entry(event.device, event.tool);
        if tool.is_native() && tool.proximity.is_some() {
            data.tablet_tool_button(self.id, event.tool.id, event.button, event.state);
            return;
        }

        let location = self.cursor.location;
        self.press_button(
            data,
            Some(event.device),
            false,
            event.time,
            MouseButton::Right,
            event.state,
            location,
        );
    }

    fn move_tool_absolute<D: SeatHandler>(
        &mut self,
        data: &mut D,
        tablet: DeviceId,
        axes: TabletToolAxes,
        position: Point<f64, Raw>,
    ) {
        if !axes.intersects(TabletToolAxes::X | TabletToolAxes::Y) {
            return;
        }
        let Some(absolute) = self.absolute_to_layout(data, tablet, position) else {
            return;
        };

        let mut location: Point<f64, Logical> = self.cursor.location;
        if axes.contains(TabletToolAxes::X) {
            location.x = absolute.x;
        }
        if axes.contains(TabletToolAxes::Y) {
            location.y = absolute.y;
        }
        self.cursor.location = self.clamp_location(data, location);
    }

    fn tablet_tool_position<D: SeatHandler>(&mut self, data: &mut D, tablet: DeviceId, id: ToolId, time: u32) {
        let under = data.surface_under(self.cursor.location);
        let target = under
            .surface
            .filter(|surface| data.surface_accepts_tablet(*surface, tablet))
            .filter(|surface| self.allow_input(data.surface_client(*surface)));

        let Some(tool) = self.tablet_tools.get_mut(&id) else {
            return;
        };

        let Some(surface) = target else {
            if tool.proximity.take().is_some() {
                data.tablet_tool_proximity_out(self.id, id);
            }
            if !tool.fallback {
                debug!(tool = id.0, "Tablet tool falls back to pointer emulation");
                tool.fallback = true;
            }
            self.update_position(data, time);
            return;
        };

        let was_fallback = std::mem::replace(&mut tool.fallback, false);
        let previous = tool.proximity.replace(surface);
        let descriptor = tool.descriptor;
        if was_fallback {
            debug!(tool = id.0, "Switching tablet tool back to native mode");
            self.drop_grab(data);
        }

        if previous != Some(surface) {
            if previous.is_some() {
                data.tablet_tool_proximity_out(self.id, id);
            }
            data.tablet_tool_proximity_in(self.id, tablet, &descriptor, surface);
        }
        data.tablet_tool_motion(self.id, id, under.local);
    }

    pub(super) fn remove_tablet_tools<D: SeatHandler>(&mut self, data: &mut D, tablet: DeviceId) {
        let removed: SmallVec<[(ToolId, bool); 2]> = self
            .tablet_tools
            .values()
            .filter(|tool| tool.tablet == tablet)
            .map(|tool| (tool.descriptor.id, tool.proximity.is_some()))
            .collect();
        for (id, in_proximity) in removed {
            if in_proximity {
                data.tablet_tool_proximity_out(self.id, id);
            }
            self.tablet_tools.shift_remove(&id);
        }
    }

    pub(super) fn tablet_pads_enter<D: SeatHandler>(&mut self, data: &mut D, surface: SurfaceId) {
        let pads: SmallVec<[(DeviceId, DeviceId); 2]> = self
            .devices
            .iter()
            .filter_map(|(id, device)| device.docked_tablet().map(|tablet| (*id, tablet)))
            .collect();
        for (pad, tablet) in pads {
            data.tablet_pad_enter(self.id, pad, tablet, surface);
        }
    }
}
