//! Drag icons of drag'n'drop operations
//!
//! The icon of a drag started with the pointer follows the cursor, the icon of a drag
//! started with a touch point follows that point while it is down.

use crate::{
    backend::input::TouchSlot,
    desktop::{DesktopHandler, SurfaceId},
    input::{Seat, SeatHandler},
    utils::{ids::foreign_id, Logical, Point, Rectangle},
};

foreign_id!(
    /// A drag icon
    DragIconId
);

/// What a drag icon follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragIconOrigin {
    /// The cursor of the seat
    Pointer,
    /// A touch point of the seat
    Touch(TouchSlot),
}

/// A drag icon of a seat
#[derive(Debug, Clone, PartialEq)]
pub struct DragIcon {
    id: DragIconId,
    surface: SurfaceId,
    origin: DragIconOrigin,
    location: Point<f64, Logical>,
    mapped: bool,
}

impl DragIcon {
    /// Id of the icon
    pub fn id(&self) -> DragIconId {
        self.id
    }

    /// Surface showing the icon
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// What the icon follows
    pub fn origin(&self) -> DragIconOrigin {
        self.origin
    }

    /// Location of the icon in layout coordinates
    pub fn location(&self) -> Point<f64, Logical> {
        self.location
    }

    /// Whether the icon is shown
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    fn damage<D: DesktopHandler>(&self, data: &mut D) {
        if !self.mapped {
            return;
        }
        if let Some(size) = data.surface_size(self.surface) {
            data.damage(Rectangle::new(self.location.to_i32_round(), size));
        }
    }
}

impl Seat {
    /// Start showing a drag icon for a drag started by this seat
    pub fn new_drag_icon<D: SeatHandler>(
        &mut self,
        data: &mut D,
        id: DragIconId,
        surface: SurfaceId,
        origin: DragIconOrigin,
    ) {
        let location = self.cursor.location;
        self.drag_icons.insert(
            id,
            DragIcon {
                id,
                surface,
                origin,
                location,
                mapped: false,
            },
        );
        self.update_drag_icons(data);
    }

    /// The surface of a drag icon got mapped
    pub fn drag_icon_map<D: SeatHandler>(&mut self, data: &mut D, id: DragIconId) {
        if let Some(icon) = self.drag_icons.get_mut(&id) {
            icon.mapped = true;
            icon.damage(data);
        }
    }

    /// The surface of a drag icon got unmapped
    pub fn drag_icon_unmap<D: SeatHandler>(&mut self, data: &mut D, id: DragIconId) {
        if let Some(icon) = self.drag_icons.get_mut(&id) {
            icon.damage(data);
            icon.mapped = false;
        }
    }

    /// The surface of a drag icon committed new content
    pub fn drag_icon_commit<D: SeatHandler>(&mut self, data: &mut D, id: DragIconId) {
        if let Some(icon) = self.drag_icons.get(&id) {
            icon.damage(data);
        }
    }

    /// Forget a drag icon whose drag ended
    pub fn destroy_drag_icon<D: SeatHandler>(&mut self, data: &mut D, id: DragIconId) -> Option<DragIcon> {
        let icon = self.drag_icons.shift_remove(&id)?;
        icon.damage(data);
        Some(icon)
    }

    /// Drag icons of this seat
    pub fn drag_icons(&self) -> impl Iterator<Item = &DragIcon> {
        self.drag_icons.values()
    }

    pub(in crate::input) fn update_drag_icons<D: SeatHandler>(&mut self, data: &mut D) {
        for icon in self.drag_icons.values_mut() {
            let location = match icon.origin {
                DragIconOrigin::Pointer => Some(self.cursor.location),
                DragIconOrigin::Touch(slot) => self.touch.point(slot).map(|point| point.location),
            };
            let Some(location) = location.filter(|location| *location != icon.location) else {
                continue;
            };

            icon.damage(data);
            icon.location = location;
            icon.damage(data);
        }
    }
}
