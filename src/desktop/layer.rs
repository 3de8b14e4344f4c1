use indexmap::IndexMap;
use tracing::{trace, warn};

use super::{ClientId, LayerFocus, LayerSurfaceId, OutputId, SurfaceId};
use crate::{
    shell::wlr_layer::{Anchor, Edge, ExclusiveZone, Layer, LayerSurfaceCachedState},
    utils::{Logical, Point, Rectangle, Size},
};

/// Errors of the layer-shell placement
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// The layer surface is already mapped to this map
    #[error("Layer surface {0:?} is already mapped")]
    AlreadyMapped(LayerSurfaceId),
    /// No output could host a layer surface that did not pick one
    #[error("No output available to place the layer surface")]
    NoOutputAtPoint,
    /// The committed placement does not fit the output, the surface got closed
    #[error("Layer surface {0:?} has a negative size after arrangement")]
    InvalidGeometry(LayerSurfaceId),
    /// The layer surface is not known to this map
    #[error("Unknown layer surface {0:?}")]
    UnknownSurface(LayerSurfaceId),
}

/// A layer-shell surface placed on an output
#[derive(Debug, Clone)]
pub struct LayerSurface {
    id: LayerSurfaceId,
    surface: SurfaceId,
    client: ClientId,
    namespace: String,
    state: LayerSurfaceCachedState,
    geometry: Rectangle<i32, Logical>,
    configured_size: Option<Size<i32, Logical>>,
    mapped: bool,
    closed: bool,
}

impl LayerSurface {
    /// Track a new layer surface with the state its client requested
    pub fn new(
        id: LayerSurfaceId,
        surface: SurfaceId,
        client: ClientId,
        namespace: impl Into<String>,
        state: LayerSurfaceCachedState,
    ) -> Self {
        LayerSurface {
            id,
            surface,
            client,
            namespace: namespace.into(),
            state,
            geometry: Rectangle::zero(),
            configured_size: None,
            mapped: false,
            closed: false,
        }
    }

    /// Id of this layer surface
    pub fn id(&self) -> LayerSurfaceId {
        self.id
    }

    /// The underlying `wl_surface`
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Client owning this surface
    pub fn client(&self) -> ClientId {
        self.client
    }

    /// Namespace the client gave this surface
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Last committed state
    pub fn state(&self) -> &LayerSurfaceCachedState {
        &self.state
    }

    /// Replace the committed state, returning the previous one
    pub fn set_state(&mut self, state: LayerSurfaceCachedState) -> LayerSurfaceCachedState {
        std::mem::replace(&mut self.state, state)
    }

    /// Layer this surface is stacked on
    pub fn layer(&self) -> Layer {
        self.state.layer
    }

    /// Geometry computed by the last arrangement, in output-local coordinates
    pub fn geometry(&self) -> Rectangle<i32, Logical> {
        self.geometry
    }

    /// Whether the surface is currently mapped
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Mark the surface mapped or unmapped
    pub fn set_mapped(&mut self, mapped: bool) {
        self.mapped = mapped;
    }

    /// Whether the surface was closed for an invalid placement
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Focus target describing this surface
    pub fn focus(&self, output: OutputId) -> LayerFocus {
        LayerFocus {
            output,
            layer_surface: self.id,
            surface: self.surface,
            client: self.client,
            layer: self.state.layer,
        }
    }

    fn placement(&self, bounds: Rectangle<i32, Logical>) -> Option<Rectangle<i32, Logical>> {
        let state = &self.state;
        let margin = &state.margin;

        let (x, width) = place_axis(
            bounds.loc.x,
            bounds.size.w,
            state.size.w,
            state.anchor.contains(Anchor::LEFT),
            state.anchor.contains(Anchor::RIGHT),
            margin.left,
            margin.right,
        );
        let (y, height) = place_axis(
            bounds.loc.y,
            bounds.size.h,
            state.size.h,
            state.anchor.contains(Anchor::TOP),
            state.anchor.contains(Anchor::BOTTOM),
            margin.top,
            margin.bottom,
        );

        if width < 0 || height < 0 {
            return None;
        }

        Some(Rectangle::new((x, y).into(), (width, height).into()))
    }
}

/// Place a surface along one axis of `bounds`, returning its offset and length
fn place_axis(
    start: i32,
    length: i32,
    desired: i32,
    anchor_start: bool,
    anchor_end: bool,
    margin_start: i32,
    margin_end: i32,
) -> (i32, i32) {
    match (anchor_start, anchor_end) {
        (true, true) if desired == 0 => (start + margin_start, length - margin_start - margin_end),
        // an explicit size between both edges sticks to the start edge, inside both margins
        (true, true) => (start + margin_start, desired - margin_start - margin_end),
        (true, false) => (start + margin_start, desired),
        (false, true) => (start + (length - desired) - margin_end, desired),
        _ => (start + (length / 2 - desired / 2), desired),
    }
}

/// Outcome of a [`LayerMap::arrange`] run
///
/// The map itself never talks to clients or seats, the caller applies these effects.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Arrangement {
    /// Area of the output left to regular views
    pub usable_area: Rectangle<i32, Logical>,
    /// Surfaces whose size changed and need a configure
    pub configures: Vec<(LayerSurfaceId, Size<i32, Logical>)>,
    /// Surfaces closed because their placement did not fit
    pub closed: Vec<LayerSurfaceId>,
    /// Surfaces whose location changed
    pub moved: Vec<LayerSurfaceId>,
    /// Top-most keyboard-interactive surface above the views
    pub keyboard_focus: Option<LayerFocus>,
}

/// Map of [`LayerSurface`]s on an output
#[derive(Debug)]
pub struct LayerMap {
    output: OutputId,
    layers: IndexMap<LayerSurfaceId, LayerSurface>,
    output_size: Size<i32, Logical>,
    zone: Rectangle<i32, Logical>,
}

impl LayerMap {
    /// Create an empty map for an output of the given logical size
    pub fn new(output: OutputId, output_size: Size<i32, Logical>) -> Self {
        LayerMap {
            output,
            layers: IndexMap::new(),
            output_size,
            zone: Rectangle::from_size(output_size),
        }
    }

    /// Output this map belongs to
    pub fn output(&self) -> OutputId {
        self.output
    }

    /// Logical size of the output
    pub fn output_size(&self) -> Size<i32, Logical> {
        self.output_size
    }

    /// Update the logical size of the output. Call [`LayerMap::arrange`] afterwards.
    pub fn set_output_size(&mut self, size: Size<i32, Logical>) {
        self.output_size = size;
    }

    /// Add a [`LayerSurface`] to this map, on top of its layer.
    pub fn map_layer(&mut self, layer: LayerSurface) -> Result<(), LayerError> {
        if self.layers.contains_key(&layer.id) {
            return Err(LayerError::AlreadyMapped(layer.id));
        }
        self.layers.insert(layer.id, layer);
        Ok(())
    }

    /// Remove a [`LayerSurface`] from this map.
    pub fn unmap_layer(&mut self, layer: LayerSurfaceId) -> Option<LayerSurface> {
        self.layers.shift_remove(&layer)
    }

    /// Return the area of this output, that is not exclusive to any [`LayerSurface`]s.
    pub fn non_exclusive_zone(&self) -> Rectangle<i32, Logical> {
        self.zone
    }

    /// Get a layer surface by id
    pub fn layer(&self, layer: LayerSurfaceId) -> Option<&LayerSurface> {
        self.layers.get(&layer)
    }

    /// Get a mutable layer surface by id
    pub fn layer_mut(&mut self, layer: LayerSurfaceId) -> Option<&mut LayerSurface> {
        self.layers.get_mut(&layer)
    }

    /// Iterator over all [`LayerSurface`]s, in insertion order.
    pub fn layers(&self) -> impl DoubleEndedIterator<Item = &LayerSurface> {
        self.layers.values()
    }

    /// Iterator over all [`LayerSurface`]s on a given layer, in insertion order.
    pub fn layers_on(&self, layer: Layer) -> impl DoubleEndedIterator<Item = &LayerSurface> {
        self.layers.values().filter(move |l| l.layer() == layer)
    }

    /// Returns the [`LayerSurface`] backed by a given `wl_surface`, if any.
    pub fn layer_for_surface(&self, surface: SurfaceId) -> Option<&LayerSurface> {
        self.layers.values().find(|l| l.surface == surface)
    }

    /// Returns a mapped [`LayerSurface`] under an output-local point on a given layer, if any.
    pub fn layer_under<P: Into<Point<f64, Logical>>>(&self, layer: Layer, point: P) -> Option<&LayerSurface> {
        let point = point.into();
        self.layers_on(layer)
            .rev()
            .find(|l| l.mapped && !l.closed && l.geometry.to_f64().contains(point))
    }

    /// Returns layers count
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer surface is placed on this output
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Recompute the geometry of every layer surface.
    ///
    /// Exclusive surfaces are placed first, top-most layer first, each reserving its
    /// zone from the usable area. The remaining surfaces are then placed inside what is
    /// left, or inside the whole output if they do not care about exclusive zones.
    #[profiling::function]
    pub fn arrange(&mut self) -> Arrangement {
        let _span = tracing::trace_span!("layer_map", output = self.output.0).entered();

        let full_area = Rectangle::from_size(self.output_size);
        let mut usable_area = full_area;
        let mut arrangement = Arrangement::default();
        trace!("Arranging layers into {:?}", self.output_size);

        for layer in Layer::TOP_DOWN {
            self.arrange_layer(layer, full_area, &mut usable_area, true, &mut arrangement);
        }
        let exclusive_area = usable_area;
        for layer in Layer::TOP_DOWN {
            self.arrange_layer(layer, full_area, &mut usable_area, false, &mut arrangement);
        }
        debug_assert_eq!(exclusive_area, usable_area);

        trace!("Remaining zone {:?}", usable_area);
        self.zone = usable_area;
        arrangement.usable_area = usable_area;
        arrangement.keyboard_focus = self.topmost_keyboard_interactive();
        arrangement
    }

    fn arrange_layer(
        &mut self,
        layer: Layer,
        full_area: Rectangle<i32, Logical>,
        usable_area: &mut Rectangle<i32, Logical>,
        exclusive: bool,
        arrangement: &mut Arrangement,
    ) {
        for surface in self
            .layers
            .values_mut()
            .rev()
            .filter(|l| l.layer() == layer && !l.closed)
        {
            let state = surface.state;
            if state.exclusive_zone.is_exclusive() != exclusive {
                continue;
            }

            let bounds = match state.exclusive_zone {
                ExclusiveZone::DontCare => full_area,
                ExclusiveZone::Neutral | ExclusiveZone::Exclusive(_) => *usable_area,
            };

            let Some(geometry) = surface.placement(bounds) else {
                warn!(
                    layer_surface = surface.id.0,
                    namespace = surface.namespace.as_str(),
                    "Layer surface does not fit its output, closing it"
                );
                surface.closed = true;
                arrangement.closed.push(surface.id);
                continue;
            };

            let old_geometry = std::mem::replace(&mut surface.geometry, geometry);
            if let ExclusiveZone::Exclusive(amount) = state.exclusive_zone {
                if let Some(edge) = state.anchor.reserved_edge() {
                    reserve(usable_area, edge, amount as i32, &state);
                }
            }

            trace!(
                layer_surface = surface.id.0,
                "Setting layer to pos {:?} and size {:?}",
                geometry.loc,
                geometry.size
            );
            if surface.configured_size != Some(geometry.size) {
                surface.configured_size = Some(geometry.size);
                arrangement.configures.push((surface.id, geometry.size));
            }
            if old_geometry.loc != geometry.loc {
                arrangement.moved.push(surface.id);
            }
        }
    }

    fn topmost_keyboard_interactive(&self) -> Option<LayerFocus> {
        Layer::FOCUSABLE.iter().find_map(|layer| {
            self.layers_on(*layer)
                .rev()
                .find(|l| !l.closed && l.state.keyboard_interactivity.can_receive_keyboard_focus())
                .map(|l| l.focus(self.output))
        })
    }
}

fn reserve(zone: &mut Rectangle<i32, Logical>, edge: Edge, amount: i32, state: &LayerSurfaceCachedState) {
    match edge {
        Edge::Top => {
            let amount = amount + state.margin.top;
            zone.loc.y += amount;
            zone.size.h -= amount;
        }
        Edge::Bottom => {
            zone.size.h -= amount + state.margin.bottom;
        }
        Edge::Left => {
            let amount = amount + state.margin.left;
            zone.loc.x += amount;
            zone.size.w -= amount;
        }
        Edge::Right => {
            zone.size.w -= amount + state.margin.right;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::wlr_layer::{KeyboardInteractivity, Margins};
    use proptest::prelude::*;

    const OUTPUT: OutputId = OutputId(1);

    fn state(layer: Layer, anchor: Anchor, size: (i32, i32), zone: i32) -> LayerSurfaceCachedState {
        LayerSurfaceCachedState {
            size: size.into(),
            anchor,
            exclusive_zone: zone.into(),
            layer,
            ..Default::default()
        }
    }

    fn surface(id: u64, state: LayerSurfaceCachedState) -> LayerSurface {
        LayerSurface::new(LayerSurfaceId(id), SurfaceId(100 + id), ClientId(7), "test", state)
    }

    fn map() -> LayerMap {
        LayerMap::new(OUTPUT, (1920, 1080).into())
    }

    #[test]
    fn top_bar_reserves_its_height_and_margin() {
        let mut map = map();
        let mut bar = state(
            Layer::Top,
            Anchor::TOP | Anchor::LEFT | Anchor::RIGHT,
            (0, 30),
            30,
        );
        bar.margin = Margins {
            top: 5,
            ..Default::default()
        };
        map.map_layer(surface(1, bar)).unwrap();

        let arrangement = map.arrange();
        assert_eq!(
            Rectangle::new((0, 35).into(), (1920, 1045).into()),
            arrangement.usable_area
        );
        assert_eq!(
            Rectangle::new((0, 5).into(), (1920, 30).into()),
            map.layer(LayerSurfaceId(1)).unwrap().geometry()
        );
        assert_eq!(vec![(LayerSurfaceId(1), Size::from((1920, 30)))], arrangement.configures);
    }

    #[test]
    fn non_exclusive_surfaces_avoid_reserved_area() {
        let mut map = map();
        map.map_layer(surface(
            1,
            state(Layer::Top, Anchor::TOP | Anchor::LEFT | Anchor::RIGHT, (0, 40), 40),
        ))
        .unwrap();
        map.map_layer(surface(2, state(Layer::Bottom, Anchor::all(), (0, 0), 0)))
            .unwrap();
        map.map_layer(surface(3, state(Layer::Background, Anchor::all(), (0, 0), -1)))
            .unwrap();

        map.arrange();
        assert_eq!(
            Rectangle::new((0, 40).into(), (1920, 1040).into()),
            map.layer(LayerSurfaceId(2)).unwrap().geometry()
        );
        assert_eq!(
            Rectangle::new((0, 0).into(), (1920, 1080).into()),
            map.layer(LayerSurfaceId(3)).unwrap().geometry()
        );
    }

    #[test]
    fn unanchored_surface_is_centered() {
        let mut map = map();
        map.map_layer(surface(1, state(Layer::Overlay, Anchor::empty(), (301, 201), 0)))
            .unwrap();
        map.arrange();
        assert_eq!(
            Rectangle::new((810, 440).into(), (301, 201).into()),
            map.layer(LayerSurfaceId(1)).unwrap().geometry()
        );
    }

    #[test]
    fn right_anchor_applies_right_margin() {
        let mut map = map();
        let mut dock = state(Layer::Top, Anchor::RIGHT, (64, 400), 0);
        dock.margin.right = 8;
        map.map_layer(surface(1, dock)).unwrap();
        map.arrange();
        assert_eq!(
            Rectangle::new((1848, 340).into(), (64, 400).into()),
            map.layer(LayerSurfaceId(1)).unwrap().geometry()
        );
    }

    #[test]
    fn negative_size_closes_surface() {
        let mut map = map();
        let mut broken = state(Layer::Top, Anchor::LEFT | Anchor::RIGHT, (0, 20), 0);
        broken.margin.left = 1500;
        broken.margin.right = 1500;
        map.map_layer(surface(1, broken)).unwrap();

        let arrangement = map.arrange();
        assert_eq!(vec![LayerSurfaceId(1)], arrangement.closed);
        assert!(map.layer(LayerSurfaceId(1)).unwrap().is_closed());
        assert!(arrangement.configures.is_empty());

        let again = map.arrange();
        assert!(again.closed.is_empty());
    }

    #[test]
    fn later_exclusive_surfaces_stack_inward() {
        let mut map = map();
        let bar = state(Layer::Top, Anchor::TOP | Anchor::LEFT | Anchor::RIGHT, (0, 30), 30);
        map.map_layer(surface(1, bar)).unwrap();
        map.map_layer(surface(2, bar)).unwrap();

        let arrangement = map.arrange();
        // most recently added surface is placed first
        assert_eq!(0, map.layer(LayerSurfaceId(2)).unwrap().geometry().loc.y);
        assert_eq!(30, map.layer(LayerSurfaceId(1)).unwrap().geometry().loc.y);
        assert_eq!(60, arrangement.usable_area.loc.y);
    }

    #[test]
    fn arrangement_is_idempotent() {
        let mut map = map();
        map.map_layer(surface(
            1,
            state(Layer::Top, Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT, (0, 48), 48),
        ))
        .unwrap();
        map.map_layer(surface(2, state(Layer::Overlay, Anchor::empty(), (200, 100), 0)))
            .unwrap();

        let first = map.arrange();
        assert_eq!(2, first.configures.len());

        let second = map.arrange();
        assert_eq!(first.usable_area, second.usable_area);
        assert!(second.configures.is_empty());
        assert!(second.moved.is_empty());
    }

    #[test]
    fn topmost_exclusive_keyboard_surface_wins() {
        let mut map = map();
        let mut lock = state(Layer::Overlay, Anchor::all(), (0, 0), -1);
        lock.keyboard_interactivity = KeyboardInteractivity::Exclusive;
        let mut launcher = state(Layer::Top, Anchor::empty(), (400, 300), 0);
        launcher.keyboard_interactivity = KeyboardInteractivity::Exclusive;
        let mut wallpaper = state(Layer::Background, Anchor::all(), (0, 0), -1);
        wallpaper.keyboard_interactivity = KeyboardInteractivity::Exclusive;

        map.map_layer(surface(1, launcher)).unwrap();
        map.map_layer(surface(2, wallpaper)).unwrap();
        assert_eq!(
            Some(LayerSurfaceId(1)),
            map.arrange().keyboard_focus.map(|f| f.layer_surface)
        );

        map.map_layer(surface(3, lock)).unwrap();
        assert_eq!(
            Some(LayerSurfaceId(3)),
            map.arrange().keyboard_focus.map(|f| f.layer_surface)
        );

        map.unmap_layer(LayerSurfaceId(3));
        map.unmap_layer(LayerSurfaceId(1));
        assert_eq!(None, map.arrange().keyboard_focus);
    }

    #[test]
    fn on_demand_surfaces_take_keyboard_focus() {
        let mut map = map();
        let mut panel = state(Layer::Top, Anchor::TOP | Anchor::LEFT | Anchor::RIGHT, (0, 30), 30);
        panel.keyboard_interactivity = KeyboardInteractivity::OnDemand;
        let mut notification = state(Layer::Overlay, Anchor::TOP | Anchor::RIGHT, (300, 80), 0);
        notification.keyboard_interactivity = KeyboardInteractivity::None;

        map.map_layer(surface(1, panel)).unwrap();
        map.map_layer(surface(2, notification)).unwrap();
        assert_eq!(
            Some(LayerSurfaceId(1)),
            map.arrange().keyboard_focus.map(|f| f.layer_surface)
        );

        let mut background = state(Layer::Bottom, Anchor::all(), (0, 0), 0);
        background.keyboard_interactivity = KeyboardInteractivity::OnDemand;
        map.unmap_layer(LayerSurfaceId(1));
        map.map_layer(surface(3, background)).unwrap();
        assert_eq!(None, map.arrange().keyboard_focus);
    }

    #[test]
    fn sized_surface_between_both_edges_sticks_to_the_start_margin() {
        let mut map = map();
        let mut toast = state(Layer::Overlay, Anchor::LEFT | Anchor::RIGHT, (600, 100), 0);
        toast.margin.left = 20;
        toast.margin.right = 30;
        map.map_layer(surface(1, toast)).unwrap();

        map.arrange();
        assert_eq!(
            Rectangle::new((20, 490).into(), (550, 100).into()),
            map.layer(LayerSurfaceId(1)).unwrap().geometry()
        );
    }

    #[test]
    fn only_minus_one_ignores_reserved_area() {
        let mut map = map();
        map.map_layer(surface(
            1,
            state(Layer::Top, Anchor::TOP | Anchor::LEFT | Anchor::RIGHT, (0, 40), 40),
        ))
        .unwrap();
        map.map_layer(surface(2, state(Layer::Bottom, Anchor::all(), (0, 0), -2)))
            .unwrap();

        map.arrange();
        assert_eq!(
            Rectangle::new((0, 40).into(), (1920, 1040).into()),
            map.layer(LayerSurfaceId(2)).unwrap().geometry()
        );
    }

    #[test]
    fn double_map_is_rejected() {
        let mut map = map();
        map.map_layer(surface(1, Default::default())).unwrap();
        assert!(matches!(
            map.map_layer(surface(1, Default::default())),
            Err(LayerError::AlreadyMapped(LayerSurfaceId(1)))
        ));
    }

    fn any_state() -> impl Strategy<Value = LayerSurfaceCachedState> {
        (0u32..16, 0..4usize, 0i32..600, 0i32..600, -1i32..80, 0i32..40).prop_map(
            |(anchor, layer, w, h, zone, margin)| LayerSurfaceCachedState {
                size: (w, h).into(),
                anchor: Anchor::from_bits_truncate(anchor),
                exclusive_zone: zone.into(),
                margin: Margins {
                    top: margin,
                    right: margin,
                    bottom: margin,
                    left: margin,
                },
                layer: Layer::TOP_DOWN[layer],
                ..Default::default()
            },
        )
    }

    proptest! {
        #[test]
        fn arranging_again_is_a_no_op(states in proptest::collection::vec(any_state(), 0..12)) {
            let mut map = map();
            for (id, state) in states.into_iter().enumerate() {
                map.map_layer(surface(id as u64, state)).unwrap();
            }

            let first = map.arrange();
            let geometries: Vec<_> = map.layers().map(LayerSurface::geometry).collect();
            let second = map.arrange();

            prop_assert_eq!(first.usable_area, second.usable_area);
            prop_assert!(second.configures.is_empty());
            prop_assert!(second.moved.is_empty());
            prop_assert!(second.closed.is_empty());
            prop_assert_eq!(geometries, map.layers().map(LayerSurface::geometry).collect::<Vec<_>>());
        }
    }
}
