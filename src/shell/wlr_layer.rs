//! Layer-shell surface state
//!
//! These types describe what a layer-shell client requested for its surface: the stacking
//! layer, the edges it anchors to, the margins and the exclusive zone it wants to reserve.
//! The placement itself is computed by [`LayerMap`](crate::desktop::LayerMap).

use crate::utils::{Logical, Size};

/// Available layers for surfaces
///
/// These values indicate which layers a surface can be rendered in.
/// They are ordered by z depth, bottom-most first.
/// Traditional shell surfaces will typically be rendered between the bottom and top layers.
/// Multiple surfaces can share a single layer, and are then ordered by creation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// The lowest layer, used usualy for wallpapers
    #[default]
    Background,
    /// The layer bellow the windows and above the wallpaper
    Bottom,
    /// The layer above the windows and bellow overlay
    Top,
    /// The top layer above all other layers
    Overlay,
}

impl Layer {
    /// All layers, top-most first
    pub const TOP_DOWN: [Layer; 4] = [Layer::Overlay, Layer::Top, Layer::Bottom, Layer::Background];

    /// Layers able to hold on to keyboard focus, top-most first
    pub const FOCUSABLE: [Layer; 2] = [Layer::Overlay, Layer::Top];

    /// Whether surfaces on this layer are stacked above regular views
    pub fn is_above_views(&self) -> bool {
        *self >= Layer::Top
    }
}

/// Types of keyboard interaction possible for a layer shell surface
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardInteractivity {
    /// The surface is not interested in keyboard events
    /// and the compositor should never assign it the keyboard focus.
    ///
    /// This is the default value, set for newly created layer shell surfaces.
    #[default]
    None,
    /// Request exclusive keyboard focus if this surface is above the shell surface layer.
    ///
    /// For the top and overlay layers, the seat will always give exclusive keyboard focus
    /// to the top-most layer which has keyboard interactivity set to exclusive.
    Exclusive,
    /// The surface may be focused and unfocused by the user, e.g. by clicking it.
    OnDemand,
}

impl KeyboardInteractivity {
    /// Whether a click on the surface may hand it the keyboard focus
    pub fn can_receive_keyboard_focus(&self) -> bool {
        !matches!(self, KeyboardInteractivity::None)
    }
}

impl From<bool> for KeyboardInteractivity {
    fn from(interactive: bool) -> Self {
        if interactive {
            KeyboardInteractivity::Exclusive
        } else {
            KeyboardInteractivity::None
        }
    }
}

bitflags::bitflags! {
    /// Anchor bitflags, describing how the layers surface should be positioned and sized
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Anchor: u32 {
        /// The top edge of the anchor rectangle
        const TOP = 1;
        /// The bottom edge of the anchor rectangle
        const BOTTOM = 2;
        /// The left edge of the anchor rectangle
        const LEFT = 4;
        /// The right edge of the anchor rectangle
        const RIGHT = 8;
    }
}

impl Anchor {
    /// Check if anchored horizontally
    ///
    /// If it is anchored to `left` and `right` anchor at the same time
    /// it returns `true`
    pub fn anchored_horizontally(&self) -> bool {
        self.contains(Self::LEFT) && self.contains(Self::RIGHT)
    }

    /// Check if anchored vertically
    ///
    /// If it is anchored to `top` and `bottom` anchor at the same time
    /// it returns `true`
    pub fn anchored_vertically(&self) -> bool {
        self.contains(Self::TOP) && self.contains(Self::BOTTOM)
    }

    /// The output edge an exclusive zone is reserved against.
    ///
    /// Only surfaces anchored to exactly three edges reserve space, on the edge
    /// opposite to the one left free. Any other combination reserves nothing.
    pub fn reserved_edge(&self) -> Option<Edge> {
        let horizontal = Anchor::LEFT | Anchor::RIGHT;
        let vertical = Anchor::TOP | Anchor::BOTTOM;

        if *self == horizontal | Anchor::TOP {
            Some(Edge::Top)
        } else if *self == horizontal | Anchor::BOTTOM {
            Some(Edge::Bottom)
        } else if *self == vertical | Anchor::LEFT {
            Some(Edge::Left)
        } else if *self == vertical | Anchor::RIGHT {
            Some(Edge::Right)
        } else {
            None
        }
    }
}

/// One edge of an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
    /// Left edge
    Left,
    /// Right edge
    Right,
}

/// Exclusive zone descriptor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExclusiveZone {
    /// Requests that the compositor avoids occluding an area with other surfaces.
    ///
    /// A exclusive zone value is the distance from the edge in surface-local coordinates to consider exclusive.
    /// It is only honored for surfaces anchored to an edge and both perpendicular edges.
    Exclusive(u32),
    /// The surface would like to be moved to avoid occluding surfaces with a exclusive zone.
    #[default]
    Neutral,
    /// The surface would not like to be moved to accommodate for other surfaces,
    /// and the compositor should extend it all the way to the edges it is anchored to.
    DontCare,
}

impl ExclusiveZone {
    /// Whether this surface takes part in the exclusive arrangement pass
    pub fn is_exclusive(&self) -> bool {
        matches!(self, ExclusiveZone::Exclusive(_))
    }
}

impl From<i32> for ExclusiveZone {
    /// Only `-1` extends the surface over exclusive zones, other negative values are neutral
    fn from(v: i32) -> Self {
        match v {
            -1 => Self::DontCare,
            v if v > 0 => Self::Exclusive(v as u32),
            _ => Self::Neutral,
        }
    }
}

impl From<ExclusiveZone> for i32 {
    fn from(z: ExclusiveZone) -> i32 {
        match z {
            ExclusiveZone::Exclusive(v) => v as i32,
            ExclusiveZone::Neutral => 0,
            ExclusiveZone::DontCare => -1,
        }
    }
}

/// Describes distance from the anchor point of the output, in surface-local coordinates.
///
/// If surface did not anchor curtain edge, margin for that edge is ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    /// Distance from [`Anchor::TOP`]
    pub top: i32,
    /// Distance from [`Anchor::RIGHT`]
    pub right: i32,
    /// Distance from [`Anchor::BOTTOM`]
    pub bottom: i32,
    /// Distance from [`Anchor::LEFT`]
    pub left: i32,
}

/// Double-buffered state of a layer surface, as committed by its client
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayerSurfaceCachedState {
    /// The size requested by the client, a zero axis asks to be stretched
    pub size: Size<i32, Logical>,
    /// Anchor bitflags, describing how the layers surface should be positioned and sized
    pub anchor: Anchor,
    /// Descripton of exclusive zone
    pub exclusive_zone: ExclusiveZone,
    /// Describes distance from the anchor point of the output
    pub margin: Margins,
    /// Defines how keyboard events are delivered to the surface
    pub keyboard_interactivity: KeyboardInteractivity,
    /// The layer that the surface is rendered on
    pub layer: Layer,
}
