//! Touch handling of the input core
//!
//! Touch points are forwarded to the surface under them. The first two concurrent points
//! additionally emulate a left and a right button press, and a touch starting close to an
//! output edge may turn into an edge swipe running one of the configured commands.

use indexmap::IndexMap;
use tracing::debug;

use super::{Seat, SeatHandler};
use crate::{
    backend::input::{ButtonState, MouseButton, TouchDownEvent, TouchMotionEvent, TouchSlot, TouchUpEvent},
    desktop::{ClientId, SurfaceId},
    utils::{Logical, Point},
};

mod gesture;
pub use gesture::{Side, TouchGesture};

/// A touch point delivered to a client
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Surface currently receiving the point, if any
    pub surface: Option<SurfaceId>,
    /// Client owning that surface
    pub client: Option<ClientId>,
    /// Latest location of the point, in layout coordinates
    pub location: Point<f64, Logical>,
}

/// Touch state of a seat
#[derive(Debug, Default)]
pub struct TouchState {
    points: IndexMap<TouchSlot, TouchPoint>,
    primary: Option<TouchSlot>,
    primary_location: Point<f64, Logical>,
    gesture: Option<TouchGesture>,
}

impl TouchState {
    /// Number of touch points delivered to clients
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// A touch point by slot
    pub fn point(&self, slot: TouchSlot) -> Option<&TouchPoint> {
        self.points.get(&slot)
    }

    /// Slot of the point driving the emulated buttons and touch drags
    pub fn primary(&self) -> Option<TouchSlot> {
        self.primary
    }

    /// Latest location of the primary point
    pub fn primary_location(&self) -> Point<f64, Logical> {
        self.primary_location
    }

    /// Edge swipe in progress, if any
    pub fn gesture(&self) -> Option<&TouchGesture> {
        self.gesture.as_ref()
    }

    pub(super) fn points_mut(&mut self) -> impl Iterator<Item = (&TouchSlot, &mut TouchPoint)> {
        self.points.iter_mut()
    }
}

fn emulated_button(num_points: usize) -> Option<MouseButton> {
    match num_points {
        1 => Some(MouseButton::Left),
        2 => Some(MouseButton::Right),
        _ => None,
    }
}

impl Seat {
    /// Touch state of this seat
    pub fn touch(&self) -> &TouchState {
        &self.touch
    }

    /// Handle a new touch point
    pub fn touch_down<D: SeatHandler>(&mut self, data: &mut D, event: &TouchDownEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);

        let Some(location) = self.absolute_to_layout(data, event.device, event.position) else {
            return;
        };
        self.force_hide_cursor(data);

        if self.touch.gesture.take().is_some() {
            debug!("Gesture cancelled by another touch point");
        } else if self.touch.points.is_empty() {
            let bounds = data
                .output_under(location)
                .and_then(|output| data.output_geometry(output));
            if let Some(bounds) = bounds {
                self.touch.gesture = TouchGesture::begin(
                    event.slot,
                    location,
                    bounds.to_f64(),
                    self.config.gesture.edge_margin,
                );
                if let Some(gesture) = &self.touch.gesture {
                    debug!(side = ?gesture.side(), "Gesture possibly begun");
                }
            }
        }

        let under = data.surface_under(location);
        let Some(surface) = under.surface else {
            return;
        };
        let client = data.surface_client(surface);
        if !self.allow_input(client) {
            return;
        }
        if !data.touch_down(self.id, surface, event.time, event.slot, under.local) {
            return;
        }

        self.touch.points.insert(
            event.slot,
            TouchPoint {
                surface: Some(surface),
                client,
                location,
            },
        );
        if let Some(button) = emulated_button(self.touch.points.len()) {
            self.touch.primary = Some(event.slot);
            self.touch.primary_location = location;
            self.press_button(
                data,
                Some(event.device),
                true,
                event.time,
                button,
                ButtonState::Pressed,
                location,
            );
        }
    }

    /// Handle a lifted touch point
    pub fn touch_up<D: SeatHandler>(&mut self, data: &mut D, event: &TouchUpEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);

        if let Some(gesture) = self.touch.gesture.take() {
            if gesture.slot() == event.slot && gesture.finish(self.config.gesture.min_travel) {
                debug!(side = ?gesture.side(), "Swipe gesture detected");
                let command = gesture.side().command(&self.config.gesture).to_owned();
                data.run_command(&command);
            } else {
                debug!("Gesture cancelled");
            }
        }

        if !self.touch.points.contains_key(&event.slot) {
            return;
        }

        if let Some(button) = emulated_button(self.touch.points.len()) {
            let location = self.touch.primary_location;
            self.press_button(
                data,
                Some(event.device),
                true,
                event.time,
                button,
                ButtonState::Released,
                location,
            );
        }

        self.touch.points.shift_remove(&event.slot);
        if self.touch.primary == Some(event.slot) {
            self.touch.primary = None;
        }
        data.touch_up(self.id, event.time, event.slot);
    }

    /// Handle a moving touch point
    pub fn touch_motion<D: SeatHandler>(&mut self, data: &mut D, event: &TouchMotionEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);

        let Some(location) = self.absolute_to_layout(data, event.device, event.position) else {
            return;
        };
        if let Some(gesture) = self.touch.gesture.as_mut().filter(|g| g.slot() == event.slot) {
            gesture.update(location);
        }
        if !self.touch.points.contains_key(&event.slot) {
            return;
        }

        let under = data.surface_under(location);
        let target = under
            .surface
            .map(|surface| (surface, data.surface_client(surface)))
            .filter(|(_, client)| self.allow_input(*client));

        let Some(point) = self.touch.points.get_mut(&event.slot) else {
            return;
        };
        point.location = location;
        match target {
            Some((surface, client)) => {
                if point.surface != Some(surface) {
                    point.surface = Some(surface);
                    point.client = client;
                    data.touch_point_focus(self.id, surface, event.time, event.slot, under.local);
                }
                data.touch_motion(self.id, event.time, event.slot, under.local);
            }
            None => {
                if point.surface.take().is_some() {
                    point.client = None;
                    data.touch_point_clear_focus(self.id, event.time, event.slot);
                }
            }
        }

        if self.touch.primary == Some(event.slot) {
            self.touch.primary_location = location;
            self.update_drag_icons(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::emulated_button;
    use crate::backend::input::MouseButton;

    #[test]
    fn first_two_points_emulate_buttons() {
        assert_eq!(Some(MouseButton::Left), emulated_button(1));
        assert_eq!(Some(MouseButton::Right), emulated_button(2));
        assert_eq!(None, emulated_button(3));
    }
}
