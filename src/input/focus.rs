use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;
use tracing::debug;

use super::{Seat, SeatHandler, SeatId};
use crate::desktop::{ClientId, LayerFocus, ViewId};

/// Views focused by every seat, shared between the seats of an [`Input`](super::Input)
#[derive(Debug, Clone, Default)]
pub(super) struct FocusTracker(Rc<RefCell<IndexMap<SeatId, ViewId>>>);

impl FocusTracker {
    pub(super) fn set(&self, seat: SeatId, view: Option<ViewId>) {
        let mut focused = self.0.borrow_mut();
        match view {
            Some(view) => {
                focused.insert(seat, view);
            }
            None => {
                focused.shift_remove(&seat);
            }
        }
    }

    pub(super) fn is_focused(&self, view: ViewId) -> bool {
        self.0.borrow().values().any(|focused| *focused == view)
    }

    fn is_focused_by_other(&self, seat: SeatId, view: ViewId) -> bool {
        self.0
            .borrow()
            .iter()
            .any(|(other, focused)| *other != seat && *focused == view)
    }

    pub(super) fn remove(&self, seat: SeatId) {
        self.0.borrow_mut().shift_remove(&seat);
    }
}

impl Seat {
    /// Whether input of this seat may be delivered to a client
    pub fn allow_input(&self, client: Option<ClientId>) -> bool {
        match self.exclusive_client {
            Some(exclusive) => client == Some(exclusive),
            None => true,
        }
    }

    /// Focus a view, or clear the focus
    ///
    /// The view gets the keyboard focus unless a layer surface holds it. Clearing the
    /// focus clears the keyboard focus, even from a focused layer surface, and ends any
    /// compositor grab.
    pub fn set_focus<D: SeatHandler>(&mut self, data: &mut D, view: Option<ViewId>) {
        let _span = self.span.clone().entered();
        let state = match view {
            Some(view) => match data.view(view) {
                Some(state) => Some(state),
                None => {
                    debug!(view = view.0, "Refusing focus to an unknown view");
                    return;
                }
            },
            None => None,
        };
        if let Some(state) = &state {
            if !self.allow_input(state.client) {
                debug!("Input disallowed for view");
                return;
            }
        }

        let previous = self.focused_view;
        if let Some(view) = view {
            self.seat_view(view);
        }
        self.focused_view = view;
        self.focus.set(self.id, view);

        if let Some(previous) = previous.filter(|previous| Some(*previous) != view) {
            let suppress = state
                .as_ref()
                .map_or(false, |state| state.kind.suppresses_deactivation());
            if !suppress && !self.focus.is_focused(previous) {
                data.activate_view(previous, false);
            }
        }

        let (Some(view), Some(state)) = (view, state) else {
            self.has_focus = false;
            self.drop_grab(data);
            self.keyboard_clear_focus(data);
            data.input_method_focus(self.id, None);
            return;
        };

        data.damage(state.geometry.to_i32_round());
        if self.focused_layer.is_some() {
            return;
        }

        data.activate_view(view, true);
        self.has_focus = true;
        if let Some(surface) = state.surface {
            self.keyboard_enter(data, surface);
            if !self.keyboards.is_empty() {
                self.tablet_pads_enter(data, surface);
            }
            data.input_method_focus(self.id, Some(surface));
        }
        self.update_focus(data);
    }

    /// Hand the keyboard focus to a layer surface, or give it back to the focused view
    ///
    /// Surfaces on the top and overlay layers keep the keyboard focus until it is cleared,
    /// surfaces below only get it until a view is focused.
    pub fn set_focus_layer<D: SeatHandler>(&mut self, data: &mut D, layer: Option<LayerFocus>) {
        let _span = self.span.clone().entered();
        let Some(layer) = layer else {
            if self.focused_layer.take().is_some() {
                let view = self.focused_view;
                self.set_focus(data, view);
            }
            return;
        };

        if !self.allow_input(Some(layer.client)) {
            debug!("Input disallowed for layer surface");
            return;
        }
        if self.focused_layer == Some(layer) {
            return;
        }

        if self.has_focus {
            if let Some(view) = self.focused_view {
                self.keyboard_clear_focus(data);
                if !self.focus.is_focused_by_other(self.id, view) {
                    data.activate_view(view, false);
                }
            }
        }
        self.has_focus = false;
        if layer.layer.is_above_views() {
            self.focused_layer = Some(layer);
        }

        self.keyboard_enter(data, layer.surface);
        data.input_method_focus(self.id, Some(layer.surface));
        self.update_focus(data);
    }

    /// Restrict the input of this seat to one client, or lift the restriction
    ///
    /// Every focus held by another client is cleared.
    pub fn set_exclusive_client<D: SeatHandler>(&mut self, data: &mut D, client: Option<ClientId>, time: u32) {
        let _span = self.span.clone().entered();
        self.exclusive_client = client;
        let Some(client) = client else {
            return;
        };

        if self.focused_layer.map_or(false, |layer| layer.client != client) {
            self.set_focus_layer(data, None);
        }
        if let Some(view) = self.focused_view {
            if data.view(view).and_then(|state| state.client) != Some(client) {
                self.set_focus(data, None);
            }
        }
        if self
            .cursor
            .pointer_focus_client
            .map_or(false, |focused| focused != client)
        {
            self.pointer_clear_focus(data);
        }
        for (slot, point) in self.touch.points_mut() {
            if point.surface.is_some() && point.client != Some(client) {
                point.surface = None;
                point.client = None;
                data.touch_point_clear_focus(self.id, time, *slot);
            }
        }
    }
}
