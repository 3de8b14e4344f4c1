pub use cursor_icon::CursorIcon;

use super::grab::ResizeEdge;
use crate::{
    desktop::SurfaceId,
    utils::{Logical, Point},
};

/// Possible status of the cursor image of a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorImageStatus {
    /// The cursor should be hidden
    Hidden,
    /// The compositor should draw the named cursor of its theme
    Named(CursorIcon),
    /// The cursor should be drawn using this surface as an image
    Surface {
        /// The surface provided by the client
        surface: SurfaceId,
        /// Location of the hotspot of the pointer in the surface
        hotspot: Point<i32, Logical>,
    },
}

impl CursorImageStatus {
    /// Default named cursor
    pub fn default_named() -> Self {
        CursorImageStatus::Named(CursorIcon::Default)
    }
}

/// Errors of the cursor image handling
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    /// The cursor theme could not be loaded
    #[error("Cannot load cursor theme {0}")]
    ThemeUnavailable(String),
}

/// Named cursor shown while resizing along some edges
pub fn resize_icon(edges: ResizeEdge) -> CursorIcon {
    const ICONS: [(ResizeEdge, CursorIcon); 8] = [
        (ResizeEdge::TOP, CursorIcon::NResize),
        (ResizeEdge::BOTTOM, CursorIcon::SResize),
        (ResizeEdge::LEFT, CursorIcon::WResize),
        (ResizeEdge::RIGHT, CursorIcon::EResize),
        (ResizeEdge::TOP_LEFT, CursorIcon::NwResize),
        (ResizeEdge::TOP_RIGHT, CursorIcon::NeResize),
        (ResizeEdge::BOTTOM_LEFT, CursorIcon::SwResize),
        (ResizeEdge::BOTTOM_RIGHT, CursorIcon::SeResize),
    ];

    ICONS
        .iter()
        .find(|(candidate, _)| *candidate == edges)
        .map(|(_, icon)| *icon)
        .unwrap_or(CursorIcon::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_diagonal_icons() {
        assert_eq!(CursorIcon::SeResize, resize_icon(ResizeEdge::BOTTOM | ResizeEdge::RIGHT));
        assert_eq!(CursorIcon::NResize, resize_icon(ResizeEdge::TOP));
        assert_eq!(CursorIcon::Default, resize_icon(ResizeEdge::empty()));
    }
}
