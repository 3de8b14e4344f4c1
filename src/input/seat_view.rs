use tracing::debug;

use super::{
    pointer::{resize_icon, ResizeEdge},
    Seat, SeatHandler,
};
use crate::{
    backend::input::{ButtonState, MouseButton},
    desktop::{DecoPart, ViewId},
    utils::{Logical, Point},
};

/// Per-seat interaction state of a view
///
/// Created the first time a seat interacts with a view and dropped when the view is
/// unmapped or destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatView {
    view: ViewId,
    deco_grabbed: bool,
}

impl SeatView {
    /// The view
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Whether the left button was pressed on the decorations of the view and not released yet
    pub fn is_deco_grabbed(&self) -> bool {
        self.deco_grabbed
    }
}

fn deco_edges(part: DecoPart) -> ResizeEdge {
    let mut edges = ResizeEdge::empty();
    if part.contains(DecoPart::LEFT_BORDER) {
        edges |= ResizeEdge::LEFT;
    } else if part.contains(DecoPart::RIGHT_BORDER) {
        edges |= ResizeEdge::RIGHT;
    }
    if part.contains(DecoPart::BOTTOM_BORDER) {
        edges |= ResizeEdge::BOTTOM;
    } else if part.contains(DecoPart::TOP_BORDER) {
        edges |= ResizeEdge::TOP;
    }
    edges
}

impl Seat {
    /// Interaction state of this seat with a view, if it interacted with it
    pub fn seat_view_of(&self, view: ViewId) -> Option<&SeatView> {
        self.views.get(&view)
    }

    pub(super) fn seat_view(&mut self, view: ViewId) -> &mut SeatView {
        self.views.entry(view).or_insert_with(|| SeatView {
            view,
            deco_grabbed: false,
        })
    }

    pub(super) fn deco_motion<D: SeatHandler>(&mut self, data: &mut D, view: ViewId, local: Point<f64, Logical>) {
        let part = data.deco_part_at(view, local);
        let edges = deco_edges(part);

        if self.seat_view(view).deco_grabbed {
            self.seat_view(view).deco_grabbed = false;
            if part.contains(DecoPart::TITLEBAR) {
                self.begin_move(data, view);
            } else if !edges.is_empty() {
                self.begin_resize(data, view, edges);
            }
            return;
        }

        if !edges.is_empty() {
            self.show_named(data, resize_icon(edges));
        } else if part.contains(DecoPart::TITLEBAR) {
            self.show_default_image(data);
        }
    }

    pub(super) fn deco_leave<D: SeatHandler>(&mut self, data: &mut D, view: ViewId) {
        self.show_default_image(data);
        if let Some(seat_view) = self.views.get_mut(&view) {
            seat_view.deco_grabbed = false;
        }
    }

    pub(super) fn deco_button<D: SeatHandler>(
        &mut self,
        data: &mut D,
        view: ViewId,
        local: Point<f64, Logical>,
        button: MouseButton,
        state: ButtonState,
    ) {
        self.seat_view(view).deco_grabbed = button == MouseButton::Left && state == ButtonState::Pressed;

        match state {
            ButtonState::Pressed => self.set_focus(data, Some(view)),
            ButtonState::Released => {
                if data.deco_part_at(view, local).contains(DecoPart::TITLEBAR) {
                    self.show_default_image(data);
                }
            }
        }
    }

    /// Drop every reference this seat holds on a view going away
    ///
    /// If the view held the focus or its decorations were under the cursor, the focus moves
    /// to the topmost remaining visible view.
    pub(super) fn remove_seat_view<D: SeatHandler>(&mut self, data: &mut D, view: ViewId) {
        let focused = self.focused_view == Some(view);
        let hovered = self.cursor.pointer_view == Some(view);
        let deco_hovered = hovered && self.cursor.surface.is_none();
        self.views.shift_remove(&view);

        let grabbed = self
            .cursor
            .grab
            .map_or(false, |grab| grab.start_data().view == view);
        if grabbed || focused {
            self.drop_grab(data);
        }
        if hovered {
            self.cursor.pointer_view = None;
        }
        if focused {
            self.focused_view = None;
            self.has_focus = false;
            self.focus.set(self.id, None);
        }

        if focused || deco_hovered {
            let next = data.visible_views().into_iter().rev().find(|candidate| *candidate != view);
            debug!(view = view.0, next = ?next.map(|v| v.0), "View gone, moving focus");
            self.set_focus(data, next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_combine_two_edges() {
        assert_eq!(
            ResizeEdge::BOTTOM | ResizeEdge::LEFT,
            deco_edges(DecoPart::LEFT_BORDER | DecoPart::BOTTOM_BORDER)
        );
        assert_eq!(ResizeEdge::TOP, deco_edges(DecoPart::TOP_BORDER));
        assert!(deco_edges(DecoPart::TITLEBAR).is_empty());
    }
}
