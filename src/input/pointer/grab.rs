use std::f64::consts::PI;

use crate::{
    backend::input::DeviceId,
    desktop::ViewId,
    utils::{Logical, Point, Rectangle},
};

/// Number of rotation steps per half turn
const ROTATION_STEPS: f64 = 12.0;

/// Data about the event that started a compositor grab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabStartData {
    /// The grabbed view
    pub view: ViewId,
    /// Device whose press started the grab, if any
    pub device: Option<DeviceId>,
    /// Cursor location when the grab started
    pub location: Point<f64, Logical>,
    /// Geometry of the view when the grab started
    ///
    /// For a maximized view this is the geometry it had before being maximized.
    pub geometry: Rectangle<f64, Logical>,
    /// Rotation of the view when the grab started
    pub rotation: f64,
}

bitflags::bitflags! {
    /// Edges of a view following the cursor during a resize
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ResizeEdge: u32 {
        /// Top edge
        const TOP = 1;
        /// Bottom edge
        const BOTTOM = 2;
        /// Left edge
        const LEFT = 4;
        /// Right edge
        const RIGHT = 8;

        /// Top left corner
        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        /// Bottom left corner
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        /// Top right corner
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        /// Bottom right corner
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

/// Interactive move of a view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveGrab {
    /// Start of the grab
    pub start_data: GrabStartData,
}

impl MoveGrab {
    /// Location of the view for a cursor location
    pub fn location(&self, cursor: Point<f64, Logical>) -> Point<f64, Logical> {
        let delta = cursor - self.start_data.location;
        self.start_data.geometry.loc + delta
    }
}

/// Interactive resize of a view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGrab {
    /// Start of the grab
    pub start_data: GrabStartData,
    /// Edges following the cursor
    pub edges: ResizeEdge,
}

impl ResizeGrab {
    /// Geometry of the view for a cursor location
    ///
    /// Width and height never go below 1. When a dimension is clamped, the location is
    /// adjusted so the opposite edge does not move.
    pub fn geometry(&self, cursor: Point<f64, Logical>) -> Rectangle<f64, Logical> {
        let initial = self.start_data.geometry;
        let delta = cursor - self.start_data.location;

        let (x, width) = resize_axis(
            initial.loc.x,
            initial.size.w,
            delta.x,
            self.edges.contains(ResizeEdge::LEFT),
            self.edges.contains(ResizeEdge::RIGHT),
        );
        let (y, height) = resize_axis(
            initial.loc.y,
            initial.size.h,
            delta.y,
            self.edges.contains(ResizeEdge::TOP),
            self.edges.contains(ResizeEdge::BOTTOM),
        );

        Rectangle::new((x, y).into(), (width, height).into())
    }
}

fn resize_axis(start: f64, length: f64, delta: f64, start_edge: bool, end_edge: bool) -> (f64, f64) {
    if start_edge {
        let length = length - delta;
        if length < 1.0 {
            (start + delta + length - 1.0, 1.0)
        } else {
            (start + delta, length)
        }
    } else if end_edge {
        (start, (length + delta).max(1.0))
    } else {
        (start, length.max(1.0))
    }
}

/// Interactive rotation of a view around its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateGrab {
    /// Start of the grab
    pub start_data: GrabStartData,
}

impl RotateGrab {
    /// Rotation of the view for a cursor location, in radians
    pub fn rotation(&self, cursor: Point<f64, Logical>) -> f64 {
        let center = self.start_data.geometry.center();
        let u = self.start_data.location - center;
        let v = cursor - center;
        self.start_data.rotation + quantize_angle(u, v)
    }
}

/// Angle between two vectors, snapped to steps of a twelfth of a half turn
pub fn quantize_angle(u: Point<f64, Logical>, v: Point<f64, Logical>) -> f64 {
    let cross = u.x * v.y - u.y * v.x;
    let dot = v.x * u.x + v.y * u.y;
    let angle = cross.atan2(dot);
    (angle / PI * ROTATION_STEPS).round() / (ROTATION_STEPS / PI)
}

/// An interactive operation of the compositor on a view
///
/// At most one exists per seat. While none is active the cursor is in passthrough mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompositorGrab {
    /// The view follows the cursor
    Move(MoveGrab),
    /// Some edges of the view follow the cursor
    Resize(ResizeGrab),
    /// The view rotates around its center
    Rotate(RotateGrab),
}

impl CompositorGrab {
    /// Data about the start of the grab
    pub fn start_data(&self) -> &GrabStartData {
        match self {
            CompositorGrab::Move(grab) => &grab.start_data,
            CompositorGrab::Resize(grab) => &grab.start_data,
            CompositorGrab::Rotate(grab) => &grab.start_data,
        }
    }

    /// Mode of the cursor while this grab is active
    pub fn mode(&self) -> CursorMode {
        match self {
            CompositorGrab::Move(_) => CursorMode::Move,
            CompositorGrab::Resize(_) => CursorMode::Resize,
            CompositorGrab::Rotate(_) => CursorMode::Rotate,
        }
    }
}

/// What the cursor currently does
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorMode {
    /// Events go to the surface under the cursor
    #[default]
    Passthrough,
    /// A view is being moved
    Move,
    /// A view is being resized
    Resize,
    /// A view is being rotated
    Rotate,
}
