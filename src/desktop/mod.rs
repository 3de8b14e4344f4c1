//! Desktop abstractions consumed by the input core
//!
//! The compositor owns every output, view and surface. This module describes the narrow
//! view of them the input code needs, through the [`DesktopHandler`] trait, and provides
//! the per-output [`LayerMap`] that places layer-shell surfaces.
//!
//! All objects owned by the compositor are referenced through opaque ids. The input core
//! never keeps them alive: when an object goes away, the compositor reports it through
//! the matching [`Input`](crate::input::Input) notification and every reference held by
//! a seat is dropped synchronously.

mod layer;

pub use self::layer::{Arrangement, LayerError, LayerMap, LayerSurface};

use crate::{
    shell::wlr_layer::Layer,
    utils::{ids::foreign_id, Logical, Point, Rectangle, Size, Transform},
};

foreign_id!(
    /// A wayland client connection
    ClientId
);
foreign_id!(
    /// A `wl_surface`
    SurfaceId
);
foreign_id!(
    /// An interactive window
    ViewId
);
foreign_id!(
    /// A physical output of the layout
    OutputId
);
foreign_id!(
    /// A layer-shell surface
    LayerSurfaceId
);

/// Kind of a view, as far as focus handling is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// A regular xdg-shell toplevel
    Toplevel,
    /// A managed X11 window
    Xwayland,
    /// An unmanaged X11 window, like a menu or a tooltip
    OverrideRedirect,
}

impl ViewKind {
    /// Whether focusing a view of this kind leaves the previously focused view activated
    pub fn suppresses_deactivation(&self) -> bool {
        matches!(self, ViewKind::OverrideRedirect)
    }
}

/// Snapshot of a view's state, as provided by [`DesktopHandler::view`]
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Kind of view
    pub kind: ViewKind,
    /// Main surface of the view, if it is mapped
    pub surface: Option<SurfaceId>,
    /// Client owning the view
    pub client: Option<ClientId>,
    /// Geometry of the view in layout coordinates
    pub geometry: Rectangle<f64, Logical>,
    /// Rotation of the view, in radians
    pub rotation: f64,
    /// Whether the view is currently maximized
    pub maximized: bool,
    /// Geometry the view had before it was maximized
    pub saved_geometry: Option<Rectangle<f64, Logical>>,
}

impl ViewState {
    /// Geometry an interactive grab starts from
    ///
    /// Maximized views start from the geometry they had before being maximized.
    pub fn grab_geometry(&self) -> Rectangle<f64, Logical> {
        if self.maximized {
            self.saved_geometry.unwrap_or(self.geometry)
        } else {
            self.geometry
        }
    }
}

/// Result of a hit-test against the scene
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SurfaceUnder {
    /// Surface under the point, if any
    pub surface: Option<SurfaceId>,
    /// View owning the point, if any
    ///
    /// A view may be hit without a surface when the point lies on its decorations.
    pub view: Option<ViewId>,
    /// Point relative to the surface, or to the view when no surface was hit
    pub local: Point<f64, Logical>,
}

impl SurfaceUnder {
    /// Nothing under the point
    pub fn none() -> Self {
        SurfaceUnder::default()
    }
}

bitflags::bitflags! {
    /// Parts of the server-side decorations of a view
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct DecoPart: u32 {
        /// The titlebar
        const TITLEBAR = 1;
        /// The left border
        const LEFT_BORDER = 2;
        /// The right border
        const RIGHT_BORDER = 4;
        /// The top border
        const TOP_BORDER = 8;
        /// The bottom border
        const BOTTOM_BORDER = 16;
    }
}

/// Layer surface the keyboard focus can be handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerFocus {
    /// Output the surface is placed on
    pub output: OutputId,
    /// The layer surface
    pub layer_surface: LayerSurfaceId,
    /// Its `wl_surface`
    pub surface: SurfaceId,
    /// Client owning the surface
    pub client: ClientId,
    /// Layer the surface is stacked on
    pub layer: Layer,
}

/// Scene queries and window-management requests of the embedding compositor
pub trait DesktopHandler {
    /// Hit-test the scene at a point of the layout
    fn surface_under(&self, location: Point<f64, Logical>) -> SurfaceUnder;

    /// Output containing a point of the layout
    fn output_under(&self, location: Point<f64, Logical>) -> Option<OutputId>;

    /// All outputs of the layout, in layout order
    fn outputs(&self) -> Vec<OutputId>;

    /// Geometry of an output in layout coordinates
    fn output_geometry(&self, output: OutputId) -> Option<Rectangle<i32, Logical>>;

    /// Connector name of an output, like `DP-1`
    fn output_name(&self, output: OutputId) -> Option<String>;

    /// Current transform of an output
    fn output_transform(&self, _output: OutputId) -> Transform {
        Transform::Normal
    }

    /// Bounding box of the whole layout
    fn layout_bounds(&self) -> Option<Rectangle<i32, Logical>> {
        self.outputs()
            .into_iter()
            .filter_map(|output| self.output_geometry(output))
            .reduce(|acc, geo| acc.merge(geo))
    }

    /// Output at the center of the layout, or the first output
    fn center_output(&self) -> Option<OutputId> {
        let center = self.layout_bounds()?.to_f64().center();
        self.output_under(center)
            .or_else(|| self.outputs().into_iter().next())
    }

    /// Output containing a point of the layout, else the output closest to it
    fn output_nearest(&self, location: Point<f64, Logical>) -> Option<OutputId> {
        self.output_under(location)
            .or_else(|| closest_output_point(self, location).map(|(output, _)| output))
    }

    /// Move a point onto the closest point that is part of an output
    fn clamp_to_layout(&self, location: Point<f64, Logical>) -> Point<f64, Logical> {
        if self.output_under(location).is_some() {
            return location;
        }
        closest_output_point(self, location).map_or(location, |(_, point)| point)
    }

    /// Layer map of an output
    fn layer_map(&self, output: OutputId) -> Option<&LayerMap>;

    /// Mutable layer map of an output
    fn layer_map_mut(&mut self, output: OutputId) -> Option<&mut LayerMap>;

    /// Find the layer surface backed by a `wl_surface`
    fn layer_surface_for(&self, surface: SurfaceId) -> Option<(OutputId, LayerSurfaceId)> {
        self.outputs().into_iter().find_map(|output| {
            self.layer_map(output)
                .and_then(|map| map.layer_for_surface(surface))
                .map(|layer| (output, layer.id()))
        })
    }

    /// Client owning a surface
    fn surface_client(&self, surface: SurfaceId) -> Option<ClientId>;

    /// Size of a surface, used to damage drag icons
    fn surface_size(&self, _surface: SurfaceId) -> Option<Size<i32, Logical>> {
        None
    }

    /// Whether the client of a surface bound the tablet protocol for this tablet
    fn surface_accepts_tablet(&self, surface: SurfaceId, tablet: crate::backend::input::DeviceId) -> bool;

    /// Current state of a view
    fn view(&self, view: ViewId) -> Option<ViewState>;

    /// Visible views, bottom-most first
    fn visible_views(&self) -> Vec<ViewId>;

    /// Decoration parts of a view at a view-local point
    fn deco_part_at(&self, _view: ViewId, _location: Point<f64, Logical>) -> DecoPart {
        DecoPart::empty()
    }

    /// Move a view to a new location
    fn move_view(&mut self, view: ViewId, location: Point<f64, Logical>);

    /// Move and resize a view
    fn move_resize_view(&mut self, view: ViewId, geometry: Rectangle<f64, Logical>);

    /// Rotate a view, in radians
    fn rotate_view(&mut self, view: ViewId, rotation: f64);

    /// Maximize or restore a view
    fn maximize_view(&mut self, view: ViewId, maximized: bool);

    /// Activate or deactivate a view
    fn activate_view(&mut self, view: ViewId, activated: bool);

    /// Send a configure with a new size to a layer surface
    fn configure_layer(&mut self, layer: LayerSurfaceId, size: Size<i32, Logical>);

    /// Close a layer surface
    fn close_layer(&mut self, layer: LayerSurfaceId);

    /// The area of an output left to regular views changed
    fn usable_area_changed(&mut self, _output: OutputId, _area: Rectangle<i32, Logical>) {}

    /// Schedule a redraw of a region of the layout
    fn damage(&mut self, region: Rectangle<i32, Logical>);

    /// Run a compositor command, like `switch_workspace next`
    fn run_command(&mut self, command: &str);
}

fn closest_output_point<D: DesktopHandler + ?Sized>(
    data: &D,
    location: Point<f64, Logical>,
) -> Option<(OutputId, Point<f64, Logical>)> {
    let mut closest: Option<(f64, OutputId, Point<f64, Logical>)> = None;
    for (output, geo) in data
        .outputs()
        .into_iter()
        .filter_map(|output| data.output_geometry(output).map(|geo| (output, geo)))
        .filter(|(_, geo)| !geo.is_empty())
    {
        let candidate = clamp_into(location, geo);
        let distance = (candidate.x - location.x).powi(2) + (candidate.y - location.y).powi(2);
        if closest.map_or(true, |(best, _, _)| distance < best) {
            closest = Some((distance, output, candidate));
        }
    }
    closest.map(|(_, output, point)| (output, point))
}

pub(crate) fn clamp_into(location: Point<f64, Logical>, geo: Rectangle<i32, Logical>) -> Point<f64, Logical> {
    let max_x = (geo.loc.x + geo.size.w - 1) as f64;
    let max_y = (geo.loc.y + geo.size.h - 1) as f64;
    (
        location.x.clamp(geo.loc.x as f64, max_x),
        location.y.clamp(geo.loc.y as f64, max_y),
    )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_stays_on_last_pixel() {
        let geo = Rectangle::new((1920, 0).into(), (1280, 1024).into());
        let clamped = clamp_into((4000.0, -10.0).into(), geo);
        assert_eq!(Point::from((3199.0, 0.0)), clamped);
    }

    #[test]
    fn maximized_view_grabs_from_saved_geometry() {
        let saved = Rectangle::new((100.0, 100.0).into(), (640.0, 480.0).into());
        let view = ViewState {
            kind: ViewKind::Toplevel,
            surface: None,
            client: None,
            geometry: Rectangle::new((0.0, 0.0).into(), (1920.0, 1080.0).into()),
            rotation: 0.0,
            maximized: true,
            saved_geometry: Some(saved),
        };
        assert_eq!(saved, view.grab_geometry());
        assert!(ViewKind::OverrideRedirect.suppresses_deactivation());
        assert!(!ViewKind::Toplevel.suppresses_deactivation());
    }
}
