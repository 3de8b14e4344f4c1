//! Input routing
//!
//! This module decides which surface receives the pointer, touch, tablet and keyboard input
//! of every seat, and what a cursor drag does to the geometry of a view.
//!
//! ## How to use it
//!
//! Create an [`Input`] from a [`Config`], register seats with [`Input::new_seat`] and feed
//! it the events of the backend through [`Input::process_input_event`]. The compositor state
//! implements [`SeatHandler`], through which the input core queries the scene and reports
//! focus changes and client notifications.
//!
//! The [`Input`] is meant to be stored beside the compositor state rather than inside of
//! it, so that both can be borrowed mutably at the same time:
//!
//! ```text
//! struct Compositor {
//!     input: Input,
//!     state: State, // implements SeatHandler
//! }
//!
//! compositor.input.process_input_event(&mut compositor.state, seat, event);
//! ```
//!
//! Every object owned by the compositor is referenced by an opaque id. When one goes away,
//! the matching notification ([`Input::view_destroyed`], [`Input::layer_destroyed`],
//! [`Input::output_destroyed`], ...) drops every reference the seats hold on it.

use std::{io, rc::Rc};

use indexmap::IndexMap;
use tracing::{debug, info_span, warn};

use crate::{
    backend::input::{ButtonState, DeviceId, InputEvent, KeyState, PointerAxisEvent, TabletToolDescriptor, ToolId, TouchSlot},
    config::Config,
    desktop::{ClientId, DesktopHandler, LayerFocus, OutputId, SurfaceId, ViewId},
    utils::{Clock, Logical, Monotonic, Point, Subscriptions},
};

mod device;
pub mod dnd;
mod focus;
pub mod keyboard;
mod layers;
pub mod pointer;
pub mod pointer_constraints;
mod seat_view;
mod tablet;
pub mod touch;

pub use self::device::{Device, DeviceError, SeatCapabilities};
pub use self::seat_view::SeatView;
pub use self::tablet::{TabletTool, TabletToolAxisValue};

use self::{
    dnd::{DragIcon, DragIconId},
    focus::FocusTracker,
    keyboard::{KeyboardState, ModifiersState},
    pointer::{Cursor, CursorError, CursorImageStatus},
    pointer_constraints::ConstraintId,
    touch::TouchState,
};

crate::utils::ids::id_gen!(seat_id);

/// Identity of a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId(u32);

/// Handler trait for seats
///
/// Notifications are only sent for surfaces the seat considers focused. Coordinates
/// passed along are relative to the surface receiving them.
pub trait SeatHandler: DesktopHandler {
    /// The pointer entered a surface
    fn pointer_enter(&mut self, seat: SeatId, surface: SurfaceId, location: Point<f64, Logical>);

    /// The pointer moved over the focused surface
    fn pointer_motion(&mut self, seat: SeatId, time: u32, location: Point<f64, Logical>);

    /// A button was pressed or released over the focused surface
    fn pointer_button(&mut self, seat: SeatId, time: u32, button: u32, state: ButtonState);

    /// Scroll over the focused surface
    fn pointer_axis(&mut self, seat: SeatId, event: &PointerAxisEvent);

    /// The pointer left the focused surface
    fn pointer_clear_focus(&mut self, seat: SeatId);

    /// A surface got the keyboard focus
    fn keyboard_enter(&mut self, seat: SeatId, surface: SurfaceId, keys: &[u32], modifiers: ModifiersState);

    /// The keyboard focus was cleared
    fn keyboard_clear_focus(&mut self, seat: SeatId);

    /// A key was pressed or released while a surface holds the keyboard focus
    fn keyboard_key(&mut self, _seat: SeatId, _time: u32, _key_code: u32, _state: KeyState) {}

    /// The modifiers changed while a surface holds the keyboard focus
    fn keyboard_modifiers(&mut self, _seat: SeatId, _modifiers: ModifiersState) {}

    /// A touch point went down on a surface
    ///
    /// Returns whether the client of the surface accepted the touch point.
    fn touch_down(
        &mut self,
        seat: SeatId,
        surface: SurfaceId,
        time: u32,
        slot: TouchSlot,
        location: Point<f64, Logical>,
    ) -> bool;

    /// A touch point was lifted
    fn touch_up(&mut self, seat: SeatId, time: u32, slot: TouchSlot);

    /// A touch point moved
    fn touch_motion(&mut self, seat: SeatId, time: u32, slot: TouchSlot, location: Point<f64, Logical>);

    /// A touch point moved onto another surface
    fn touch_point_focus(
        &mut self,
        seat: SeatId,
        surface: SurfaceId,
        time: u32,
        slot: TouchSlot,
        location: Point<f64, Logical>,
    );

    /// A touch point moved off every surface it may be delivered to
    fn touch_point_clear_focus(&mut self, seat: SeatId, time: u32, slot: TouchSlot);

    /// A tablet tool came in proximity of a surface
    fn tablet_tool_proximity_in(
        &mut self,
        seat: SeatId,
        tablet: DeviceId,
        tool: &TabletToolDescriptor,
        surface: SurfaceId,
    );

    /// A tablet tool left the proximity of its surface
    fn tablet_tool_proximity_out(&mut self, seat: SeatId, tool: ToolId);

    /// A tablet tool moved over its surface
    fn tablet_tool_motion(&mut self, seat: SeatId, tool: ToolId, location: Point<f64, Logical>);

    /// The tip of a tablet tool touched the tablet
    fn tablet_tool_down(&mut self, seat: SeatId, tool: ToolId);

    /// The tip of a tablet tool left the tablet
    fn tablet_tool_up(&mut self, seat: SeatId, tool: ToolId);

    /// An axis of a tablet tool changed
    fn tablet_tool_axis(&mut self, seat: SeatId, tool: ToolId, value: TabletToolAxisValue);

    /// A button of a tablet tool was pressed or released
    fn tablet_tool_button(&mut self, seat: SeatId, tool: ToolId, button: u32, state: ButtonState);

    /// A surface got the focus of a tablet pad
    fn tablet_pad_enter(&mut self, seat: SeatId, pad: DeviceId, tablet: DeviceId, surface: SurfaceId);

    /// A pointer constraint became active
    fn constraint_activated(&mut self, seat: SeatId, constraint: ConstraintId);

    /// A pointer constraint stopped being active
    fn constraint_deactivated(&mut self, seat: SeatId, constraint: ConstraintId);

    /// The image of the cursor changed
    fn cursor_image(&mut self, seat: SeatId, image: CursorImageStatus);

    /// The capabilities of a seat changed
    fn seat_capabilities(&mut self, _seat: SeatId, _capabilities: SeatCapabilities) {}

    /// The surface text input is sent to changed
    fn input_method_focus(&mut self, _seat: SeatId, _surface: Option<SurfaceId>) {}

    /// Rotate the events of an input device, in degrees clockwise
    fn set_device_rotation(&mut self, _seat: SeatId, _device: DeviceId, _degrees: u32) -> Result<(), DeviceError> {
        Err(DeviceError::BackendUnsupported)
    }

    /// Load a cursor theme for a seat
    fn load_cursor_theme(&mut self, _seat: SeatId, _theme: Option<&str>, _size: u32) -> Result<(), CursorError> {
        Ok(())
    }

    /// A seat received user input, used to reset idle timers
    fn notify_activity(&mut self, _seat: SeatId) {}
}

/// A seat, one group of input devices sharing a cursor and a keyboard focus
#[derive(Debug)]
pub struct Seat {
    id: SeatId,
    name: String,
    span: tracing::Span,
    config: Rc<Config>,

    focus: FocusTracker,
    focused_view: Option<ViewId>,
    has_focus: bool,
    focused_layer: Option<LayerFocus>,
    keyboard_focus: Option<SurfaceId>,
    exclusive_client: Option<ClientId>,

    cursor: Cursor,
    devices: IndexMap<DeviceId, Device>,
    keyboards: IndexMap<DeviceId, KeyboardState>,
    active_keyboard: Option<DeviceId>,
    capabilities: SeatCapabilities,
    transform_listeners: Subscriptions<OutputId, DeviceId>,

    views: IndexMap<ViewId, SeatView>,
    touch: TouchState,
    tablet_tools: IndexMap<ToolId, TabletTool>,
    drag_icons: IndexMap<DragIconId, DragIcon>,
}

impl Seat {
    fn new(name: String, config: Rc<Config>, focus: FocusTracker) -> Seat {
        let span = info_span!("input_seat", name);
        Seat {
            id: SeatId(seat_id::next()),
            name,
            span,
            config,
            focus,
            focused_view: None,
            has_focus: false,
            focused_layer: None,
            keyboard_focus: None,
            exclusive_client: None,
            cursor: Cursor::new(),
            devices: IndexMap::new(),
            keyboards: IndexMap::new(),
            active_keyboard: None,
            capabilities: SeatCapabilities::empty(),
            transform_listeners: Subscriptions::default(),
            views: IndexMap::new(),
            touch: TouchState::default(),
            tablet_tools: IndexMap::new(),
            drag_icons: IndexMap::new(),
        }
    }

    /// Identity of this seat
    pub fn id(&self) -> SeatId {
        self.id
    }

    /// Name of this seat, like `seat0`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// View focused by this seat
    pub fn focused_view(&self) -> Option<ViewId> {
        self.focused_view
    }

    /// Whether the focused view holds the keyboard focus
    pub fn view_has_keyboard_focus(&self) -> bool {
        self.has_focus
    }

    /// Layer surface holding the keyboard focus above the views
    pub fn focused_layer(&self) -> Option<LayerFocus> {
        self.focused_layer
    }

    /// Client all input of this seat is restricted to
    pub fn exclusive_client(&self) -> Option<ClientId> {
        self.exclusive_client
    }

    fn reconfigure<D: SeatHandler>(&mut self, data: &mut D, config: Rc<Config>) {
        self.config = config;
        for (id, keyboard) in self.keyboards.iter_mut() {
            if let Some(device) = self.devices.get(id) {
                keyboard.set_meta_key(self.config.meta_key(&device.descriptor().name));
            }
        }
        self.configure_cursor(data);
        self.configure_xcursor(data);
    }
}

impl Drop for Seat {
    fn drop(&mut self) {
        self.focus.remove(self.id);
        seat_id::remove(self.id.0);
    }
}

/// Registry of the seats of the compositor
#[derive(Debug)]
pub struct Input {
    seats: IndexMap<SeatId, Seat>,
    config: Rc<Config>,
    focus: FocusTracker,
    last_active: Option<SeatId>,
    exclusive_client: Option<ClientId>,
    clock: Clock<Monotonic>,
}

impl Input {
    /// Create an empty registry
    pub fn new(config: Config) -> io::Result<Input> {
        Ok(Input {
            seats: IndexMap::new(),
            config: Rc::new(config),
            focus: FocusTracker::default(),
            last_active: None,
            exclusive_client: None,
            clock: Clock::new()?,
        })
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration and apply it to every seat
    pub fn set_config<D: SeatHandler>(&mut self, data: &mut D, config: Config) {
        self.config = Rc::new(config);
        for seat in self.seats.values_mut() {
            seat.reconfigure(data, self.config.clone());
        }
    }

    /// Create a new seat
    pub fn new_seat<D: SeatHandler>(&mut self, data: &mut D, name: impl Into<String>) -> SeatId {
        let mut seat = Seat::new(name.into(), self.config.clone(), self.focus.clone());
        let id = seat.id;
        debug!(seat = %seat.name, "New seat");

        seat.exclusive_client = self.exclusive_client;
        seat.configure_cursor(data);
        seat.configure_xcursor(data);
        self.seats.insert(id, seat);
        id
    }

    /// Remove a seat
    ///
    /// The view it focused is deactivated unless another seat focuses it too.
    pub fn remove_seat<D: SeatHandler>(&mut self, data: &mut D, id: SeatId) -> bool {
        let Some(seat) = self.seats.shift_remove(&id) else {
            return false;
        };
        if self.last_active == Some(id) {
            self.last_active = None;
        }
        let focused = seat.focused_view;
        drop(seat);

        if let Some(view) = focused.filter(|view| !self.focus.is_focused(*view)) {
            data.activate_view(view, false);
        }
        true
    }

    /// A seat by id
    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.seats.get(&id)
    }

    /// A mutable seat by id
    pub fn seat_mut(&mut self, id: SeatId) -> Option<&mut Seat> {
        self.seats.get_mut(&id)
    }

    /// All seats, in creation order
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.values()
    }

    /// A seat by name
    pub fn seat_by_name(&self, name: &str) -> Option<&Seat> {
        self.seats.values().find(|seat| seat.name == name)
    }

    /// Seat that received user input last, or the first seat
    pub fn last_active_seat(&self) -> Option<&Seat> {
        self.last_active
            .and_then(|id| self.seats.get(&id))
            .or_else(|| self.seats.values().next())
    }

    /// Current time of the monotonic clock of the input core, in milliseconds
    pub fn now_msec(&self) -> u32 {
        self.clock.now_msec()
    }

    /// Dispatch an event of the backend to a seat
    #[profiling::function]
    pub fn process_input_event<D: SeatHandler>(&mut self, data: &mut D, seat: SeatId, event: InputEvent) {
        let Some(target) = self.seats.get_mut(&seat) else {
            warn!(?seat, "Input event for an unknown seat");
            return;
        };
        if event.is_activity() {
            self.last_active = Some(seat);
        }

        match event {
            InputEvent::DeviceAdded(descriptor) => {
                if let Err(err) = target.add_device(data, descriptor) {
                    warn!(?err, "Failed to add input device");
                }
            }
            InputEvent::DeviceRemoved(device) => {
                if let Err(err) = target.remove_device(data, device) {
                    warn!(?err, "Failed to remove input device");
                }
            }
            InputEvent::Keyboard(event) => target.keyboard_key(data, &event),
            InputEvent::KeyboardModifiers(event) => target.keyboard_modifiers(data, &event),
            InputEvent::PointerMotion(event) => target.pointer_motion(data, &event),
            InputEvent::PointerMotionAbsolute(event) => target.pointer_motion_absolute(data, &event),
            InputEvent::PointerButton(event) => target.pointer_button(data, &event),
            InputEvent::PointerAxis(event) => target.pointer_axis(data, &event),
            InputEvent::TouchDown(event) => target.touch_down(data, &event),
            InputEvent::TouchMotion(event) => target.touch_motion(data, &event),
            InputEvent::TouchUp(event) => target.touch_up(data, &event),
            InputEvent::TabletToolAxis(event) => target.tablet_tool_axis(data, &event),
            InputEvent::TabletToolProximity(event) => target.tablet_tool_proximity(data, &event),
            InputEvent::TabletToolTip(event) => target.tablet_tool_tip(data, &event),
            InputEvent::TabletToolButton(event) => target.tablet_tool_button(data, &event),
        }
    }

    /// Restrict the input of every seat to one client, or lift the restriction
    pub fn set_exclusive_client<D: SeatHandler>(&mut self, data: &mut D, client: Option<ClientId>) {
        let time = self.clock.now_msec();
        self.exclusive_client = client;
        for seat in self.seats.values_mut() {
            seat.set_exclusive_client(data, client, time);
        }
        self.arrange_all(data);
    }

    /// Re-synthesize the pointer focus of every seat
    pub fn update_cursor_focus<D: SeatHandler>(&mut self, data: &mut D) {
        for seat in self.seats.values_mut() {
            seat.update_focus(data);
        }
    }

    /// Whether any seat focuses a view
    pub fn view_has_focus(&self, view: ViewId) -> bool {
        self.focus.is_focused(view)
    }

    /// Output under the cursor of a seat
    pub fn current_output<D: DesktopHandler>(&self, data: &D, seat: SeatId) -> Option<OutputId> {
        let seat = self.seats.get(&seat)?;
        data.output_under(seat.cursor.location())
    }

    /// A view got unmapped
    pub fn view_unmapped<D: SeatHandler>(&mut self, data: &mut D, view: ViewId) {
        for seat in self.seats.values_mut() {
            seat.remove_seat_view(data, view);
        }
    }

    /// A view got destroyed
    pub fn view_destroyed<D: SeatHandler>(&mut self, data: &mut D, view: ViewId) {
        self.view_unmapped(data, view);
    }
}
