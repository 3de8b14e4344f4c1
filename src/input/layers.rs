use smallvec::SmallVec;
use tracing::{debug, warn};

use super::{Input, SeatHandler};
use crate::{
    desktop::{DesktopHandler, LayerError, LayerSurface, LayerSurfaceId, OutputId, SurfaceId},
    shell::wlr_layer::LayerSurfaceCachedState,
    utils::{Logical, Rectangle, Size},
};

fn damage_layer<D: DesktopHandler>(data: &mut D, output: OutputId, geometry: Rectangle<i32, Logical>) {
    let Some(output_geometry) = data.output_geometry(output) else {
        return;
    };
    data.damage(Rectangle::new(output_geometry.loc + geometry.loc, geometry.size));
}

fn layer_geometry<D: DesktopHandler>(
    data: &D,
    output: OutputId,
    layer: LayerSurfaceId,
) -> Option<(Rectangle<i32, Logical>, bool)> {
    data.layer_map(output)
        .and_then(|map| map.layer(layer))
        .map(|layer| (layer.geometry(), layer.is_mapped()))
}

impl Input {
    /// Place the layer surfaces of an output and apply the results
    ///
    /// Configures are sent to surfaces whose size changed, seats whose cursor is over a
    /// surface that moved get their pointer focus re-synthesized, and the keyboard focus
    /// of every seat goes to the topmost keyboard-interactive surface above the views, or
    /// back to the focused view if there is none.
    #[profiling::function]
    pub fn arrange_layers<D: SeatHandler>(&mut self, data: &mut D, output: OutputId) {
        let Some(map) = data.layer_map_mut(output) else {
            return;
        };
        let previous_area = map.non_exclusive_zone();
        let arrangement = map.arrange();

        if arrangement.usable_area != previous_area {
            debug!(output = output.0, area = ?arrangement.usable_area, "Usable area changed");
            data.usable_area_changed(output, arrangement.usable_area);
        }
        for layer in &arrangement.closed {
            data.close_layer(*layer);
        }
        for (layer, size) in &arrangement.configures {
            data.configure_layer(*layer, *size);
        }

        if !arrangement.moved.is_empty() {
            let moved: SmallVec<[SurfaceId; 4]> = arrangement
                .moved
                .iter()
                .filter_map(|layer| data.layer_map(output).and_then(|map| map.layer(*layer)))
                .map(LayerSurface::surface)
                .collect();
            let time = self.clock.now_msec();
            for seat in self.seats.values_mut() {
                let under = data.surface_under(seat.cursor.location());
                if under.surface.map_or(false, |surface| moved.contains(&surface)) {
                    seat.update_position(data, time);
                }
            }
        }

        for seat in self.seats.values_mut() {
            seat.set_focus_layer(data, arrangement.keyboard_focus);
        }
    }

    /// Arrange the layer surfaces of every output
    pub fn arrange_all<D: SeatHandler>(&mut self, data: &mut D) {
        for output in data.outputs() {
            self.arrange_layers(data, output);
        }
    }

    /// Place a new layer surface on an output
    ///
    /// Without an output requested by the client, the surface goes to the output nearest
    /// to the cursor of the last active seat, else to the output at the center of the layout.
    /// If there is no output at all the surface is closed.
    pub fn new_layer_surface<D: SeatHandler>(
        &mut self,
        data: &mut D,
        layer: LayerSurface,
        output: Option<OutputId>,
    ) -> Result<OutputId, LayerError> {
        let id = layer.id();
        let output = output
            .or_else(|| {
                self.last_active_seat()
                    .and_then(|seat| data.output_nearest(seat.cursor.location()))
            })
            .or_else(|| {
                warn!(layer_surface = id.0, "No output near the cursor, using the center output");
                data.center_output()
            });

        let Some(map) = output.and_then(|output| data.layer_map_mut(output)) else {
            warn!(layer_surface = id.0, "No output for layer surface, closing it");
            data.close_layer(id);
            return Err(LayerError::NoOutputAtPoint);
        };
        let output = map.output();
        if let Err(err) = map.map_layer(layer) {
            data.close_layer(id);
            return Err(err);
        }

        debug!(layer_surface = id.0, output = output.0, "New layer surface");
        self.arrange_layers(data, output);
        Ok(output)
    }

    /// Apply a committed state of a layer surface
    ///
    /// Fails if the new state cannot be placed on the output, in which case the surface
    /// has been closed.
    pub fn layer_commit<D: SeatHandler>(
        &mut self,
        data: &mut D,
        output: OutputId,
        id: LayerSurfaceId,
        state: LayerSurfaceCachedState,
        buffer_size_changed: bool,
    ) -> Result<(), LayerError> {
        let layer = data
            .layer_map_mut(output)
            .and_then(|map| map.layer_mut(id))
            .ok_or(LayerError::UnknownSurface(id))?;
        let old_geometry = layer.geometry();
        let old_state = layer.set_state(state);
        let layer_changed = old_state.layer != state.layer;

        self.arrange_layers(data, output);

        let closed = data
            .layer_map(output)
            .and_then(|map| map.layer(id))
            .map_or(false, LayerSurface::is_closed);
        if closed {
            return Err(LayerError::InvalidGeometry(id));
        }
        let Some((geometry, mapped)) = layer_geometry(data, output, id) else {
            return Ok(());
        };
        let geometry_changed = geometry != old_geometry;
        if mapped {
            if geometry_changed || layer_changed {
                damage_layer(data, output, old_geometry);
            }
            damage_layer(data, output, geometry);
        }
        if geometry_changed || buffer_size_changed {
            self.update_cursor_focus(data);
        }
        Ok(())
    }

    /// A layer surface got mapped
    pub fn layer_mapped<D: SeatHandler>(&mut self, data: &mut D, output: OutputId, id: LayerSurfaceId) {
        let Some(layer) = data.layer_map_mut(output).and_then(|map| map.layer_mut(id)) else {
            return;
        };
        layer.set_mapped(true);

        self.arrange_layers(data, output);
        if let Some((geometry, _)) = layer_geometry(data, output, id) {
            damage_layer(data, output, geometry);
        }
        self.update_cursor_focus(data);
    }

    /// A layer surface got unmapped
    pub fn layer_unmapped<D: SeatHandler>(&mut self, data: &mut D, output: OutputId, id: LayerSurfaceId) {
        let Some(layer) = data.layer_map_mut(output).and_then(|map| map.layer_mut(id)) else {
            return;
        };
        layer.set_mapped(false);
        let geometry = layer.geometry();

        damage_layer(data, output, geometry);
        self.arrange_layers(data, output);
        self.update_cursor_focus(data);
    }

    /// A layer surface got destroyed
    pub fn layer_destroyed<D: SeatHandler>(&mut self, data: &mut D, output: OutputId, id: LayerSurfaceId) {
        let Some(layer) = data.layer_map_mut(output).and_then(|map| map.unmap_layer(id)) else {
            return;
        };
        if layer.is_mapped() {
            damage_layer(data, output, layer.geometry());
        }

        for seat in self.seats.values_mut() {
            if seat.focused_layer.map_or(false, |focus| focus.layer_surface == id) {
                seat.set_focus_layer(data, None);
            }
        }
        self.arrange_layers(data, output);
        self.update_cursor_focus(data);
    }

    /// An output was added to the layout
    pub fn output_added<D: SeatHandler>(&mut self, data: &mut D, output: OutputId) {
        debug!(output = output.0, "Output added");
        for seat in self.seats.values_mut() {
            seat.configure_cursor(data);
        }
        self.arrange_layers(data, output);
    }

    /// An output changed its size
    pub fn output_resized<D: SeatHandler>(&mut self, data: &mut D, output: OutputId, size: Size<i32, Logical>) {
        let Some(map) = data.layer_map_mut(output) else {
            return;
        };
        map.set_output_size(size);
        self.arrange_layers(data, output);
    }

    /// An output changed its transform
    pub fn output_transform_changed<D: SeatHandler>(&mut self, data: &mut D, output: OutputId) {
        for seat in self.seats.values_mut() {
            seat.output_transform_changed(data, output);
        }
    }

    /// An output is about to be removed from the layout
    ///
    /// Its layer surfaces are closed and every mapping of a device to it is dropped.
    pub fn output_destroyed<D: SeatHandler>(&mut self, data: &mut D, output: OutputId) {
        debug!(output = output.0, "Output destroyed");
        let layers: SmallVec<[LayerSurfaceId; 8]> = data
            .layer_map(output)
            .map(|map| map.layers().map(LayerSurface::id).collect())
            .unwrap_or_default();
        for layer in layers {
            data.close_layer(layer);
        }

        for seat in self.seats.values_mut() {
            seat.forget_output(output);
            if seat.focused_layer.map_or(false, |focus| focus.output == output) {
                seat.set_focus_layer(data, None);
            }
        }
        self.update_cursor_focus(data);
    }
}
