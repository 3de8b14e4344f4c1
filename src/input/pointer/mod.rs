//! Pointer handling of the input core
//!
//! Every seat owns one [`Cursor`]. While no compositor grab is active the cursor is in
//! passthrough mode: motion is hit-tested against the scene and forwarded to the surface
//! under the cursor. A press with the meta modifier held starts a [`CompositorGrab`]
//! instead, moving, resizing or rotating the view under the cursor until the button is
//! released.

use tracing::{debug, error, trace, warn};

use super::{pointer_constraints::PointerConstraints, Seat, SeatHandler};
use crate::{
    backend::input::{
        ButtonState, DeviceId, MouseButton, PointerAxisEvent, PointerButtonEvent, PointerMotionAbsoluteEvent,
        PointerMotionEvent,
    },
    desktop::{clamp_into, ClientId, DesktopHandler, OutputId, SurfaceId, SurfaceUnder, ViewId},
    input::pointer_constraints::{ConstraintError, ConstraintId, PointerConstraint},
    utils::{Logical, Point, Region},
};

mod cursor_image;
pub use cursor_image::{resize_icon, CursorError, CursorIcon, CursorImageStatus};

mod grab;
pub use grab::{
    quantize_angle, CompositorGrab, CursorMode, GrabStartData, MoveGrab, ResizeEdge, ResizeGrab, RotateGrab,
};

/// The cursor of a seat
#[derive(Debug)]
pub struct Cursor {
    pub(super) location: Point<f64, Logical>,
    pub(super) visible: bool,
    pub(super) grab: Option<CompositorGrab>,
    pub(super) constraints: PointerConstraints,
    pub(super) image: CursorImageStatus,
    pub(super) default_image: CursorIcon,
    pub(super) theme_loaded: bool,
    /// Client whose cursor image is currently shown
    pub(super) cursor_client: Option<ClientId>,
    /// Surface found under the cursor by the last hit-test
    pub(super) surface: Option<SurfaceId>,
    /// Layout location of the origin of the focused surface
    pub(super) focus_origin: Option<Point<f64, Logical>>,
    pub(super) pointer_focus: Option<SurfaceId>,
    pub(super) pointer_focus_client: Option<ClientId>,
    pub(super) pointer_view: Option<ViewId>,
    pub(super) mapped_output: Option<OutputId>,
}

impl Cursor {
    pub(super) fn new() -> Self {
        Cursor {
            location: Point::default(),
            visible: true,
            grab: None,
            constraints: PointerConstraints::default(),
            image: CursorImageStatus::Hidden,
            default_image: CursorIcon::Default,
            theme_loaded: true,
            cursor_client: None,
            surface: None,
            focus_origin: None,
            pointer_focus: None,
            pointer_focus_client: None,
            pointer_view: None,
            mapped_output: None,
        }
    }

    /// Location of the cursor in layout coordinates
    pub fn location(&self) -> Point<f64, Logical> {
        self.location
    }

    /// Whether the cursor is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// What the cursor currently does
    pub fn mode(&self) -> CursorMode {
        self.grab.as_ref().map_or(CursorMode::Passthrough, CompositorGrab::mode)
    }

    /// The active compositor grab, if any
    pub fn grab(&self) -> Option<&CompositorGrab> {
        self.grab.as_ref()
    }

    /// Image currently shown for the cursor
    pub fn image(&self) -> CursorImageStatus {
        self.image
    }

    /// Named image shown when no client sets one
    pub fn default_image(&self) -> CursorIcon {
        self.default_image
    }

    /// Pointer constraints known to this seat
    pub fn constraints(&self) -> &PointerConstraints {
        &self.constraints
    }

    /// Surface holding the pointer focus
    pub fn pointer_focus(&self) -> Option<SurfaceId> {
        self.pointer_focus
    }

    /// View under the cursor
    pub fn pointer_view(&self) -> Option<ViewId> {
        self.pointer_view
    }

    /// Output the cursor is restricted to
    pub fn mapped_output(&self) -> Option<OutputId> {
        self.mapped_output
    }
}

impl Seat {
    /// The cursor of this seat
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Handle relative motion of one of the pointers of this seat
    pub fn pointer_motion<D: SeatHandler>(&mut self, data: &mut D, event: &PointerMotionEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);
        self.set_visible(data, true);

        let Some(delta) = self.confine_motion(data, event.delta) else {
            trace!("Relative motion dropped by the pointer constraint");
            return;
        };
        self.cursor.location = self.clamp_location(data, self.cursor.location + delta);
        self.update_position(data, event.time);
    }

    /// Handle absolute motion of one of the pointers of this seat
    pub fn pointer_motion_absolute<D: SeatHandler>(&mut self, data: &mut D, event: &PointerMotionAbsoluteEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);
        self.set_visible(data, true);

        let Some(location) = self.absolute_to_layout(data, event.device, event.position) else {
            return;
        };
        if self.cursor.constraints.active().is_some() {
            if let Some(origin) = self.cursor.focus_origin {
                if !self.cursor.constraints.confine_region().contains_f64(location - origin) {
                    trace!("Absolute motion outside of the pointer constraint dropped");
                    return;
                }
            }
        }
        self.cursor.location = self.clamp_location(data, location);
        self.update_position(data, event.time);
    }

    /// Handle a button of one of the pointers of this seat
    pub fn pointer_button<D: SeatHandler>(&mut self, data: &mut D, event: &PointerButtonEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);
        self.set_visible(data, true);

        let location = self.cursor.location;
        self.press_button(
            data,
            Some(event.device),
            false,
            event.time,
            MouseButton::from(event.button),
            event.state,
            location,
        );
    }

    /// Handle scrolling of one of the pointers of this seat
    pub fn pointer_axis<D: SeatHandler>(&mut self, data: &mut D, event: &PointerAxisEvent) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);
        self.set_visible(data, true);

        if self.cursor.pointer_focus.is_some() {
            data.pointer_axis(self.id, event);
        }
    }

    /// Handle a client request to change the cursor image
    ///
    /// Only the client holding the pointer focus may set the image, and only while the
    /// cursor is shown and no compositor grab is active. `None` hides the cursor.
    pub fn request_set_cursor<D: SeatHandler>(
        &mut self,
        data: &mut D,
        client: ClientId,
        surface: Option<SurfaceId>,
        hotspot: Point<i32, Logical>,
    ) {
        let _span = self.span.clone().entered();
        data.notify_activity(self.id);

        if !self.cursor.visible {
            return;
        }
        if self.cursor.pointer_focus_client != Some(client) || self.cursor.grab.is_some() {
            debug!(client = client.0, "Denying request to set cursor from unfocused client");
            return;
        }

        let status = match surface {
            Some(surface) => CursorImageStatus::Surface { surface, hotspot },
            None => CursorImageStatus::Hidden,
        };
        self.set_cursor_image(data, status);
        self.cursor.cursor_client = Some(client);
    }

    /// Move the cursor to a location of the layout and refresh the pointer focus
    ///
    /// Warps are honoured even while a pointer constraint is active.
    pub fn warp<D: SeatHandler>(&mut self, data: &mut D, location: Point<f64, Logical>) {
        let _span = self.span.clone().entered();
        self.cursor.location = self.clamp_location(data, location);
        self.update_focus(data);
    }

    /// Apply the current cursor location according to the cursor mode
    #[profiling::function]
    pub fn update_position<D: SeatHandler>(&mut self, data: &mut D, time: u32) {
        match self.cursor.grab {
            None => self.passthrough_cursor(data, Some(time)),
            Some(grab) => {
                if data.view(grab.start_data().view).is_none() {
                    debug!("Grabbed view is gone, cancelling compositor grab");
                    self.drop_grab(data);
                    return;
                }
                self.apply_grab(data, &grab);
            }
        }
    }

    /// Re-synthesize the pointer focus without an input event
    pub fn update_focus<D: SeatHandler>(&mut self, data: &mut D) {
        self.passthrough_cursor(data, None);
    }

    fn passthrough_cursor<D: SeatHandler>(&mut self, data: &mut D, time: Option<u32>) {
        let under = data.surface_under(self.cursor.location);
        let client = under.surface.and_then(|surface| data.surface_client(surface));
        if under.surface.is_some() && !self.allow_input(client) {
            debug!("Input disallowed for surface");
            return;
        }

        if self.cursor.cursor_client != client {
            if self.cursor.visible {
                self.show_default_image(data);
            }
            self.cursor.cursor_client = client;
        }

        if let Some(previous) = self.cursor.pointer_view {
            if self.cursor.surface.is_none() && (under.surface.is_some() || under.view != Some(previous)) {
                self.deco_leave(data, previous);
            }
        }
        self.cursor.pointer_view = under.view;
        if let Some(view) = under.view {
            self.seat_view(view);
            if under.surface.is_none() {
                self.deco_motion(data, view, under.local);
            }
        }

        self.cursor.surface = under.surface;
        match under.surface {
            Some(surface) => {
                let entered = self.pointer_enter(data, surface, client, under.local);
                if let (false, Some(time)) = (entered, time) {
                    data.pointer_motion(self.id, time, under.local);
                }
            }
            None => self.pointer_clear_focus(data),
        }

        self.update_drag_icons(data);
    }

    /// Give the pointer focus to a surface, returning whether the focus changed
    fn pointer_enter<D: SeatHandler>(
        &mut self,
        data: &mut D,
        surface: SurfaceId,
        client: Option<ClientId>,
        local: Point<f64, Logical>,
    ) -> bool {
        self.cursor.focus_origin = Some(self.cursor.location - local);
        if self.cursor.pointer_focus == Some(surface) {
            return false;
        }

        trace!(surface = surface.0, ?local, "Pointer entered surface");
        self.cursor.pointer_focus = Some(surface);
        self.cursor.pointer_focus_client = client;
        data.pointer_enter(self.id, surface, local);

        let constraint = self.cursor.constraints.for_surface(surface).map(|c| c.id);
        self.constrain(data, constraint, local);
        true
    }

    pub(super) fn pointer_clear_focus<D: SeatHandler>(&mut self, data: &mut D) {
        self.cursor.focus_origin = None;
        if self.cursor.pointer_focus.take().is_none() {
            return;
        }
        self.cursor.pointer_focus_client = None;
        data.pointer_clear_focus(self.id);
        self.constrain(data, None, Point::default());
    }

    /// Handle a button press or release at a location of the layout
    ///
    /// Touch points emulate presses through this as well, in which case nothing is sent
    /// to the pointer focus.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn press_button<D: SeatHandler>(
        &mut self,
        data: &mut D,
        device: Option<DeviceId>,
        is_touch: bool,
        time: u32,
        button: MouseButton,
        state: ButtonState,
        location: Point<f64, Logical>,
    ) {
        let under = data.surface_under(location);

        if !is_touch && self.cursor.pointer_focus.is_some() {
            data.pointer_button(self.id, time, button.into(), state);
        }

        let meta_view = under
            .view
            .filter(|_| state == ButtonState::Pressed && self.has_meta_pressed());
        if let Some(view) = meta_view {
            self.set_focus(data, Some(view));
            match button {
                MouseButton::Left => self.start_grab(
                    data,
                    view,
                    device,
                    |start_data| CompositorGrab::Move(MoveGrab { start_data }),
                    CursorIcon::Move,
                ),
                MouseButton::Right => {
                    let Some(geometry) = data.view(view).map(|state| state.geometry) else {
                        return;
                    };
                    let mut edges = if under.local.x < geometry.size.w / 2.0 {
                        ResizeEdge::LEFT
                    } else {
                        ResizeEdge::RIGHT
                    };
                    edges |= if under.local.y < geometry.size.h / 2.0 {
                        ResizeEdge::TOP
                    } else {
                        ResizeEdge::BOTTOM
                    };
                    self.start_grab(
                        data,
                        view,
                        device,
                        move |start_data| CompositorGrab::Resize(ResizeGrab { start_data, edges }),
                        resize_icon(edges),
                    );
                }
                MouseButton::Middle => self.start_grab(
                    data,
                    view,
                    device,
                    |start_data| CompositorGrab::Rotate(RotateGrab { start_data }),
                    CursorIcon::Grabbing,
                ),
                MouseButton::Other(_) => {}
            }
            return;
        }

        if let (Some(_), None, Some(pointer_view)) = (under.view, under.surface, self.cursor.pointer_view) {
            self.deco_button(data, pointer_view, under.local, button, state);
        }

        match state {
            ButtonState::Released => {
                if self.cursor.grab.is_some() {
                    self.end_compositor_grab(data);
                }
                if !is_touch {
                    self.update_position(data, time);
                }
            }
            ButtonState::Pressed => self.focus_under(data, under),
        }
    }

    /// Focus the view or layer surface a press landed on
    pub(super) fn focus_under<D: SeatHandler>(&mut self, data: &mut D, under: SurfaceUnder) {
        if let (Some(view), Some(surface)) = (under.view, under.surface) {
            if data.view(view).and_then(|state| state.surface) == Some(surface) {
                self.set_focus(data, Some(view));
            }
        }
        if let Some(surface) = under.surface {
            self.focus_layer_surface(data, surface);
        }
    }

    fn focus_layer_surface<D: SeatHandler>(&mut self, data: &mut D, surface: SurfaceId) {
        let Some((output, layer)) = data.layer_surface_for(surface) else {
            return;
        };
        let focus = data
            .layer_map(output)
            .and_then(|map| map.layer(layer))
            .filter(|layer| layer.state().keyboard_interactivity.can_receive_keyboard_focus())
            .map(|layer| layer.focus(output));
        if let Some(focus) = focus {
            self.set_focus_layer(data, Some(focus));
        }
    }

    /// Start moving a view with the cursor
    pub fn begin_move<D: SeatHandler>(&mut self, data: &mut D, view: ViewId) {
        self.start_grab(
            data,
            view,
            None,
            |start_data| CompositorGrab::Move(MoveGrab { start_data }),
            CursorIcon::Move,
        );
    }

    /// Start resizing some edges of a view with the cursor
    pub fn begin_resize<D: SeatHandler>(&mut self, data: &mut D, view: ViewId, edges: ResizeEdge) {
        self.start_grab(
            data,
            view,
            None,
            move |start_data| CompositorGrab::Resize(ResizeGrab { start_data, edges }),
            resize_icon(edges),
        );
    }

    /// Start rotating a view around its center with the cursor
    pub fn begin_rotate<D: SeatHandler>(&mut self, data: &mut D, view: ViewId) {
        self.start_grab(
            data,
            view,
            None,
            |start_data| CompositorGrab::Rotate(RotateGrab { start_data }),
            CursorIcon::Grabbing,
        );
    }

    fn start_grab<D: SeatHandler>(
        &mut self,
        data: &mut D,
        view: ViewId,
        device: Option<DeviceId>,
        grab: impl FnOnce(GrabStartData) -> CompositorGrab,
        icon: CursorIcon,
    ) {
        if let Some(active) = &self.cursor.grab {
            debug!(mode = ?active.mode(), "A compositor grab is already active");
            return;
        }
        let Some(state) = data.view(view) else {
            return;
        };

        let grab = grab(GrabStartData {
            view,
            device,
            location: self.cursor.location,
            geometry: state.grab_geometry(),
            rotation: state.rotation,
        });
        debug!(view = view.0, mode = ?grab.mode(), "Compositor grab started");
        self.cursor.grab = Some(grab);

        if state.maximized {
            data.maximize_view(view, false);
        }
        self.pointer_clear_focus(data);
        self.show_named(data, icon);
    }

    fn apply_grab<D: SeatHandler>(&mut self, data: &mut D, grab: &CompositorGrab) {
        let location = self.cursor.location;
        match grab {
            CompositorGrab::Move(grab) => data.move_view(grab.start_data.view, grab.location(location)),
            CompositorGrab::Resize(grab) => {
                data.move_resize_view(grab.start_data.view, grab.geometry(location))
            }
            CompositorGrab::Rotate(grab) => data.rotate_view(grab.start_data.view, grab.rotation(location)),
        }
    }

    /// End the active compositor grab, applying the geometry reached by the cursor
    pub fn end_compositor_grab<D: SeatHandler>(&mut self, data: &mut D) {
        let Some(grab) = self.cursor.grab.take() else {
            return;
        };
        if data.view(grab.start_data().view).is_some() {
            self.apply_grab(data, &grab);
        }
        debug!(mode = ?grab.mode(), "Compositor grab ended");
        self.show_default_image(data);
    }

    /// Abort the active compositor grab, restoring the view to its state at grab start
    pub fn cancel_compositor_grab<D: SeatHandler>(&mut self, data: &mut D) {
        let Some(grab) = self.cursor.grab.take() else {
            return;
        };
        let start = grab.start_data();
        if data.view(start.view).is_some() {
            match grab {
                CompositorGrab::Move(_) => data.move_view(start.view, start.geometry.loc),
                CompositorGrab::Resize(_) => data.move_resize_view(start.view, start.geometry),
                CompositorGrab::Rotate(_) => data.rotate_view(start.view, start.rotation),
            }
        }
        debug!(mode = ?grab.mode(), "Compositor grab cancelled");
        self.show_default_image(data);
    }

    /// Return to passthrough mode, leaving the view where it is
    pub(super) fn drop_grab<D: SeatHandler>(&mut self, data: &mut D) {
        if self.cursor.grab.take().is_some() {
            self.show_default_image(data);
        }
    }

    /// Switch the active pointer constraint
    ///
    /// The previously active constraint is deactivated before the new one is activated.
    /// If `local`, the cursor location relative to the constrained surface, lies outside
    /// the region of the new constraint, the cursor is warped to the center of its first
    /// rectangle.
    pub fn constrain<D: SeatHandler>(
        &mut self,
        data: &mut D,
        constraint: Option<ConstraintId>,
        local: Point<f64, Logical>,
    ) {
        let active = self.cursor.constraints.active().map(|c| c.id);
        if active == constraint {
            if constraint.is_some() {
                self.cursor.constraints.refresh_region();
            }
            return;
        }

        if let Some(previous) = self.cursor.constraints.deactivate() {
            debug!(constraint = previous.0, "Pointer constraint deactivated");
            data.constraint_deactivated(self.id, previous);
        }
        let Some(id) = constraint else {
            return;
        };

        let region: Region = match self.cursor.constraints.activate(id) {
            Ok(constraint) => constraint.region.clone(),
            Err(err) => {
                warn!(?err, "Cannot activate pointer constraint");
                return;
            }
        };
        debug!(constraint = id.0, "Pointer constraint activated");
        data.constraint_activated(self.id, id);

        if !region.contains_f64(local) {
            if let Some(rect) = region.first_rect() {
                let target = self.cursor.location - local + rect.to_f64().center();
                self.cursor.location = self.clamp_location(data, target);
            }
        }
    }

    /// Register a pointer constraint requested by a client
    ///
    /// The constraint becomes active right away if its surface is under the cursor.
    pub fn new_constraint<D: SeatHandler>(
        &mut self,
        data: &mut D,
        constraint: PointerConstraint,
    ) -> Result<(), ConstraintError> {
        let _span = self.span.clone().entered();
        let (id, surface) = (constraint.id, constraint.surface);
        self.cursor.constraints.insert(constraint)?;

        let under = data.surface_under(self.cursor.location);
        if under.surface == Some(surface) {
            self.constrain(data, Some(id), under.local);
        }
        Ok(())
    }

    /// Apply a committed state of a pointer constraint
    ///
    /// If the active constraint's surface is no longer under the cursor, the pointer focus
    /// is updated instead and [`ConstraintError::StaleConstraintTarget`] is returned.
    pub fn constraint_commit<D: SeatHandler>(
        &mut self,
        data: &mut D,
        id: ConstraintId,
        region: Region,
        cursor_hint: Option<Point<f64, Logical>>,
    ) -> Result<(), ConstraintError> {
        let _span = self.span.clone().entered();
        let constraint = self
            .cursor
            .constraints
            .get_mut(id)
            .ok_or(ConstraintError::UnknownConstraint(id))?;
        constraint.region = region;
        if cursor_hint.is_some() {
            constraint.cursor_hint = cursor_hint;
        }
        let surface = constraint.surface;

        if self.cursor.constraints.active().map(|c| c.id) != Some(id) {
            return Ok(());
        }
        let under = data.surface_under(self.cursor.location);
        if under.surface != Some(surface) {
            debug!(constraint = id.0, "Constrained surface is no longer under the cursor");
            self.update_focus(data);
            return Err(ConstraintError::StaleConstraintTarget(id));
        }
        self.constrain(data, Some(id), under.local);
        Ok(())
    }

    /// Forget a destroyed pointer constraint
    ///
    /// If it was active, the cursor is warped to the last cursor hint of the client.
    pub fn destroy_constraint<D: SeatHandler>(&mut self, data: &mut D, id: ConstraintId) -> Option<PointerConstraint> {
        let was_active = self.cursor.constraints.active().map(|c| c.id) == Some(id);
        let constraint = self.cursor.constraints.remove(id)?;
        if was_active {
            if let (Some(hint), Some(origin)) = (constraint.cursor_hint, self.cursor.focus_origin) {
                self.cursor.location = self.clamp_location(data, origin + hint);
            }
        }
        Some(constraint)
    }

    fn confine_motion<D: DesktopHandler>(
        &self,
        data: &D,
        delta: Point<f64, Logical>,
    ) -> Option<Point<f64, Logical>> {
        if self.cursor.constraints.active().is_none() {
            return Some(delta);
        }
        let confine = self.cursor.constraints.confine_region();
        if confine.is_empty() {
            return None;
        }

        let rotated = self
            .cursor
            .pointer_view
            .and_then(|view| data.view(view))
            .map_or(false, |view| view.rotation != 0.0);
        let Some(origin) = self.cursor.focus_origin.filter(|_| !rotated) else {
            return Some(delta);
        };
        let from = self.cursor.location - origin;
        confine.confine(from, from + delta).map(|to| to - from)
    }

    pub(super) fn clamp_location<D: DesktopHandler>(
        &self,
        data: &D,
        location: Point<f64, Logical>,
    ) -> Point<f64, Logical> {
        match self
            .cursor
            .mapped_output
            .and_then(|output| data.output_geometry(output))
            .filter(|geometry| !geometry.is_empty())
        {
            Some(geometry) => clamp_into(location, geometry),
            None => data.clamp_to_layout(location),
        }
    }

    /// Show or hide the cursor
    pub fn set_visible<D: SeatHandler>(&mut self, data: &mut D, visible: bool) {
        if self.cursor.visible == visible {
            return;
        }
        self.cursor.visible = visible;
        if visible {
            self.show_default_image(data);
        } else {
            self.set_cursor_image(data, CursorImageStatus::Hidden);
        }
    }

    pub(super) fn force_hide_cursor<D: SeatHandler>(&mut self, data: &mut D) {
        self.cursor.visible = true;
        self.set_visible(data, false);
    }

    pub(super) fn show_default_image<D: SeatHandler>(&mut self, data: &mut D) {
        let icon = self.cursor.default_image;
        self.show_named(data, icon);
    }

    pub(super) fn show_named<D: SeatHandler>(&mut self, data: &mut D, icon: CursorIcon) {
        let status = if self.cursor.visible && self.capabilities.contains(super::SeatCapabilities::POINTER) {
            CursorImageStatus::Named(icon)
        } else {
            CursorImageStatus::Hidden
        };
        self.set_cursor_image(data, status);
    }

    fn set_cursor_image<D: SeatHandler>(&mut self, data: &mut D, status: CursorImageStatus) {
        if matches!(status, CursorImageStatus::Named(_)) && !self.cursor.theme_loaded {
            return;
        }
        if self.cursor.image == status {
            return;
        }
        self.cursor.image = status;
        data.cursor_image(self.id, status);
    }

    /// Load the cursor theme configured for this seat
    ///
    /// If the theme cannot be loaded the seat never sets a named cursor image.
    pub fn configure_xcursor<D: SeatHandler>(&mut self, data: &mut D) {
        let _span = self.span.clone().entered();
        let config = self.config.clone();
        let cursor_config = config.get_cursor(&self.name);

        if let Some(cursor_config) = cursor_config {
            match cursor_config.default_icon() {
                Ok(icon) => self.cursor.default_image = icon,
                Err(err) => warn!(?err, "Invalid default cursor image"),
            }
        }

        let theme = cursor_config.and_then(|c| c.theme.as_deref());
        let size = cursor_config.map_or(24, |c| c.size);
        match data.load_cursor_theme(self.id, theme, size) {
            Ok(()) => self.cursor.theme_loaded = true,
            Err(err) => {
                error!(?err, ?theme, "Cannot load cursor theme");
                self.cursor.theme_loaded = false;
            }
        }

        self.show_default_image(data);
    }
}
