#![allow(dead_code)]

use std::collections::HashMap;

use indexmap::IndexMap;
use tablecloth_input::{
    backend::input::{
        ButtonState, DeviceDescriptor, DeviceId, DeviceKind, InputEvent, KeyboardModifiersEvent, PointerAxisEvent,
        PointerButtonEvent, PointerMotionEvent, TabletToolDescriptor, ToolId, TouchSlot,
    },
    config::Config,
    desktop::{
        ClientId, DecoPart, DesktopHandler, LayerMap, LayerSurfaceId, OutputId, SurfaceId, SurfaceUnder, ViewId,
        ViewKind, ViewState,
    },
    input::{
        keyboard::ModifiersState, pointer::CursorImageStatus, pointer_constraints::ConstraintId, Input, SeatHandler,
        DeviceError, SeatId, TabletToolAxisValue,
    },
    shell::wlr_layer::Layer,
    utils::{Logical, Point, Rectangle, Size, Transform},
};

pub const KEYBOARD: DeviceId = DeviceId(1);
pub const MOUSE: DeviceId = DeviceId(2);
pub const TOUCHSCREEN: DeviceId = DeviceId(3);

/// Width of the borders drawn around decorated views
pub const DECO_BORDER: f64 = 4.0;
/// Height of the titlebar drawn above decorated views, inside the top border
pub const DECO_TITLEBAR: f64 = 20.0;

/// Everything the input core told the compositor, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PointerEnter(SurfaceId, Point<f64, Logical>),
    PointerMotion(Point<f64, Logical>),
    PointerButton(u32, ButtonState),
    PointerAxis,
    PointerClearFocus,
    KeyboardEnter(SurfaceId),
    KeyboardClearFocus,
    TouchDown(SurfaceId, TouchSlot),
    TouchUp(TouchSlot),
    TouchMotion(TouchSlot, Point<f64, Logical>),
    TouchPointFocus(SurfaceId, TouchSlot),
    TouchPointClearFocus(TouchSlot),
    TabletProximityIn(ToolId, SurfaceId),
    TabletProximityOut(ToolId),
    TabletMotion(ToolId, Point<f64, Logical>),
    TabletDown(ToolId),
    TabletUp(ToolId),
    TabletAxis(ToolId, TabletToolAxisValue),
    TabletButton(ToolId, u32, ButtonState),
    TabletPadEnter(DeviceId, SurfaceId),
    ConstraintActivated(ConstraintId),
    ConstraintDeactivated(ConstraintId),
    CursorImage(CursorImageStatus),
    DeviceRotation(DeviceId, u32),
    Activate(ViewId, bool),
    Maximize(ViewId, bool),
    ConfigureLayer(LayerSurfaceId, Size<i32, Logical>),
    CloseLayer(LayerSurfaceId),
    UsableArea(OutputId, Rectangle<i32, Logical>),
    Command(String),
}

#[derive(Debug)]
pub struct TestOutput {
    pub name: String,
    pub geometry: Rectangle<i32, Logical>,
    pub transform: Transform,
    pub layers: LayerMap,
}

/// A scene of outputs, views and layer surfaces recording every notification
#[derive(Debug, Default)]
pub struct TestDesktop {
    pub outputs: IndexMap<OutputId, TestOutput>,
    /// Views, bottom-most first
    pub views: IndexMap<ViewId, ViewState>,
    pub clients: HashMap<SurfaceId, ClientId>,
    pub tablet_surfaces: Vec<SurfaceId>,
    /// Views drawn with server-side decorations
    pub decorated: Vec<ViewId>,
    pub events: Vec<Event>,
}

impl TestDesktop {
    pub fn new() -> Self {
        TestDesktop::default()
    }

    pub fn add_output(&mut self, id: u64, name: &str, geometry: Rectangle<i32, Logical>) -> OutputId {
        let id = OutputId(id);
        self.outputs.insert(
            id,
            TestOutput {
                name: name.to_owned(),
                geometry,
                transform: Transform::Normal,
                layers: LayerMap::new(id, geometry.size),
            },
        );
        id
    }

    pub fn add_view(&mut self, id: u64, client: u64, geometry: Rectangle<f64, Logical>) -> ViewId {
        let view = ViewId(id);
        let surface = SurfaceId(id);
        self.clients.insert(surface, ClientId(client));
        self.views.insert(
            view,
            ViewState {
                kind: ViewKind::Toplevel,
                surface: Some(surface),
                client: Some(ClientId(client)),
                geometry,
                rotation: 0.0,
                maximized: false,
                saved_geometry: None,
            },
        );
        view
    }

    /// Draw a titlebar and borders around a view
    pub fn decorate(&mut self, view: ViewId) {
        self.decorated.push(view);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn commands(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Command(command) => Some(command.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn position_of(&self, wanted: &Event) -> Option<usize> {
        self.events.iter().position(|event| event == wanted)
    }

    fn layer_surface_under(&self, layers: &[Layer], location: Point<f64, Logical>) -> Option<SurfaceUnder> {
        self.outputs.values().find_map(|output| {
            let local = location - output.geometry.loc.to_f64();
            layers.iter().find_map(|layer| {
                output.layers.layer_under(*layer, local).map(|surface| SurfaceUnder {
                    surface: Some(surface.surface()),
                    view: None,
                    local: local - surface.geometry().loc.to_f64(),
                })
            })
        })
    }
}

impl DesktopHandler for TestDesktop {
    fn surface_under(&self, location: Point<f64, Logical>) -> SurfaceUnder {
        if let Some(under) = self.layer_surface_under(&[Layer::Overlay, Layer::Top], location) {
            return under;
        }
        let view = self.views.iter().rev().find_map(|(id, state)| {
            let local = location - state.geometry.loc;
            if state.geometry.contains(location) {
                Some(SurfaceUnder {
                    surface: state.surface,
                    view: Some(*id),
                    local,
                })
            } else if self.decorated.contains(id) && deco_frame(state.geometry).contains(location) {
                Some(SurfaceUnder {
                    surface: None,
                    view: Some(*id),
                    local,
                })
            } else {
                None
            }
        });
        if let Some(under) = view {
            return under;
        }
        self.layer_surface_under(&[Layer::Bottom, Layer::Background], location)
            .unwrap_or_else(SurfaceUnder::none)
    }

    fn output_under(&self, location: Point<f64, Logical>) -> Option<OutputId> {
        self.outputs
            .iter()
            .find(|(_, output)| output.geometry.to_f64().contains(location))
            .map(|(id, _)| *id)
    }

    fn outputs(&self) -> Vec<OutputId> {
        self.outputs.keys().copied().collect()
    }

    fn output_geometry(&self, output: OutputId) -> Option<Rectangle<i32, Logical>> {
        self.outputs.get(&output).map(|output| output.geometry)
    }

    fn output_name(&self, output: OutputId) -> Option<String> {
        self.outputs.get(&output).map(|output| output.name.clone())
    }

    fn output_transform(&self, output: OutputId) -> Transform {
        self.outputs
            .get(&output)
            .map_or(Transform::Normal, |output| output.transform)
    }

    fn layer_map(&self, output: OutputId) -> Option<&LayerMap> {
        self.outputs.get(&output).map(|output| &output.layers)
    }

    fn layer_map_mut(&mut self, output: OutputId) -> Option<&mut LayerMap> {
        self.outputs.get_mut(&output).map(|output| &mut output.layers)
    }

    fn surface_client(&self, surface: SurfaceId) -> Option<ClientId> {
        if let Some(client) = self.clients.get(&surface) {
            return Some(*client);
        }
        self.outputs
            .values()
            .find_map(|output| output.layers.layer_for_surface(surface))
            .map(|layer| layer.client())
    }

    fn surface_accepts_tablet(&self, surface: SurfaceId, _tablet: DeviceId) -> bool {
        self.tablet_surfaces.contains(&surface)
    }

    fn view(&self, view: ViewId) -> Option<ViewState> {
        self.views.get(&view).cloned()
    }

    fn visible_views(&self) -> Vec<ViewId> {
        self.views.keys().copied().collect()
    }

    fn deco_part_at(&self, view: ViewId, local: Point<f64, Logical>) -> DecoPart {
        let Some(state) = self.views.get(&view).filter(|_| self.decorated.contains(&view)) else {
            return DecoPart::empty();
        };
        let size = state.geometry.size;
        let mut part = DecoPart::empty();
        if local.x < 0.0 {
            part |= DecoPart::LEFT_BORDER;
        } else if local.x >= size.w {
            part |= DecoPart::RIGHT_BORDER;
        }
        if local.y >= size.h {
            part |= DecoPart::BOTTOM_BORDER;
        } else if local.y < -DECO_TITLEBAR {
            part |= DecoPart::TOP_BORDER;
        }
        if part.is_empty() && local.y < 0.0 {
            part |= DecoPart::TITLEBAR;
        }
        part
    }

    fn move_view(&mut self, view: ViewId, location: Point<f64, Logical>) {
        if let Some(state) = self.views.get_mut(&view) {
            state.geometry.loc = location;
        }
    }

    fn move_resize_view(&mut self, view: ViewId, geometry: Rectangle<f64, Logical>) {
        if let Some(state) = self.views.get_mut(&view) {
            state.geometry = geometry;
        }
    }

    fn rotate_view(&mut self, view: ViewId, rotation: f64) {
        if let Some(state) = self.views.get_mut(&view) {
            state.rotation = rotation;
        }
    }

    fn maximize_view(&mut self, view: ViewId, maximized: bool) {
        if let Some(state) = self.views.get_mut(&view) {
            if !maximized {
                if let Some(saved) = state.saved_geometry.take() {
                    state.geometry = saved;
                }
            }
            state.maximized = maximized;
        }
        self.events.push(Event::Maximize(view, maximized));
    }

    fn activate_view(&mut self, view: ViewId, activated: bool) {
        self.events.push(Event::Activate(view, activated));
    }

    fn configure_layer(&mut self, layer: LayerSurfaceId, size: Size<i32, Logical>) {
        self.events.push(Event::ConfigureLayer(layer, size));
    }

    fn close_layer(&mut self, layer: LayerSurfaceId) {
        self.events.push(Event::CloseLayer(layer));
    }

    fn usable_area_changed(&mut self, output: OutputId, area: Rectangle<i32, Logical>) {
        self.events.push(Event::UsableArea(output, area));
    }

    fn damage(&mut self, _region: Rectangle<i32, Logical>) {}

    fn run_command(&mut self, command: &str) {
        self.events.push(Event::Command(command.to_owned()));
    }
}

impl SeatHandler for TestDesktop {
    fn pointer_enter(&mut self, _seat: SeatId, surface: SurfaceId, location: Point<f64, Logical>) {
        self.events.push(Event::PointerEnter(surface, location));
    }

    fn pointer_motion(&mut self, _seat: SeatId, _time: u32, location: Point<f64, Logical>) {
        self.events.push(Event::PointerMotion(location));
    }

    fn pointer_button(&mut self, _seat: SeatId, _time: u32, button: u32, state: ButtonState) {
        self.events.push(Event::PointerButton(button, state));
    }

    fn pointer_axis(&mut self, _seat: SeatId, _event: &PointerAxisEvent) {
        self.events.push(Event::PointerAxis);
    }

    fn pointer_clear_focus(&mut self, _seat: SeatId) {
        self.events.push(Event::PointerClearFocus);
    }

    fn keyboard_enter(&mut self, _seat: SeatId, surface: SurfaceId, _keys: &[u32], _modifiers: ModifiersState) {
        self.events.push(Event::KeyboardEnter(surface));
    }

    fn keyboard_clear_focus(&mut self, _seat: SeatId) {
        self.events.push(Event::KeyboardClearFocus);
    }

    fn touch_down(
        &mut self,
        _seat: SeatId,
        surface: SurfaceId,
        _time: u32,
        slot: TouchSlot,
        _location: Point<f64, Logical>,
    ) -> bool {
        self.events.push(Event::TouchDown(surface, slot));
        true
    }

    fn touch_up(&mut self, _seat: SeatId, _time: u32, slot: TouchSlot) {
        self.events.push(Event::TouchUp(slot));
    }

    fn touch_motion(&mut self, _seat: SeatId, _time: u32, slot: TouchSlot, location: Point<f64, Logical>) {
        self.events.push(Event::TouchMotion(slot, location));
    }

    fn touch_point_focus(
        &mut self,
        _seat: SeatId,
        surface: SurfaceId,
        _time: u32,
        slot: TouchSlot,
        _location: Point<f64, Logical>,
    ) {
        self.events.push(Event::TouchPointFocus(surface, slot));
    }

    fn touch_point_clear_focus(&mut self, _seat: SeatId, _time: u32, slot: TouchSlot) {
        self.events.push(Event::TouchPointClearFocus(slot));
    }

    fn tablet_tool_proximity_in(
        &mut self,
        _seat: SeatId,
        _tablet: DeviceId,
        tool: &TabletToolDescriptor,
        surface: SurfaceId,
    ) {
        self.events.push(Event::TabletProximityIn(tool.id, surface));
    }

    fn tablet_tool_proximity_out(&mut self, _seat: SeatId, tool: ToolId) {
        self.events.push(Event::TabletProximityOut(tool));
    }

    fn tablet_tool_motion(&mut self, _seat: SeatId, tool: ToolId, location: Point<f64, Logical>) {
        self.events.push(Event::TabletMotion(tool, location));
    }

    fn tablet_tool_down(&mut self, _seat: SeatId, tool: ToolId) {
        self.events.push(Event::TabletDown(tool));
    }

    fn tablet_tool_up(&mut self, _seat: SeatId, tool: ToolId) {
        self.events.push(Event::TabletUp(tool));
    }

    fn tablet_tool_axis(&mut self, _seat: SeatId, tool: ToolId, value: TabletToolAxisValue) {
        self.events.push(Event::TabletAxis(tool, value));
    }

    fn tablet_tool_button(&mut self, _seat: SeatId, tool: ToolId, button: u32, state: ButtonState) {
        self.events.push(Event::TabletButton(tool, button, state));
    }

    fn tablet_pad_enter(&mut self, _seat: SeatId, pad: DeviceId, _tablet: DeviceId, surface: SurfaceId) {
        self.events.push(Event::TabletPadEnter(pad, surface));
    }

    fn constraint_activated(&mut self, _seat: SeatId, constraint: ConstraintId) {
        self.events.push(Event::ConstraintActivated(constraint));
    }

    fn constraint_deactivated(&mut self, _seat: SeatId, constraint: ConstraintId) {
        self.events.push(Event::ConstraintDeactivated(constraint));
    }

    fn cursor_image(&mut self, _seat: SeatId, image: CursorImageStatus) {
        self.events.push(Event::CursorImage(image));
    }

    fn set_device_rotation(&mut self, _seat: SeatId, device: DeviceId, degrees: u32) -> Result<(), DeviceError> {
        self.events.push(Event::DeviceRotation(device, degrees));
        Ok(())
    }
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn device(id: DeviceId, name: &str, kind: DeviceKind) -> DeviceDescriptor {
    DeviceDescriptor {
        id,
        name: name.to_owned(),
        kind,
        output_name: None,
    }
}

/// A desktop with one 1920x1080 output, and an input core with one seat holding a
/// keyboard and a mouse
pub fn setup(config: Config) -> (TestDesktop, Input, SeatId) {
    init_logging();
    let mut desktop = TestDesktop::new();
    desktop.add_output(1, "DP-1", Rectangle::new((0, 0).into(), (1920, 1080).into()));

    let mut input = Input::new(config).expect("monotonic clock");
    let seat = input.new_seat(&mut desktop, "seat0");
    input.process_input_event(
        &mut desktop,
        seat,
        InputEvent::DeviceAdded(device(KEYBOARD, "keyboard", DeviceKind::Keyboard)),
    );
    input.process_input_event(
        &mut desktop,
        seat,
        InputEvent::DeviceAdded(device(MOUSE, "mouse", DeviceKind::Pointer)),
    );
    desktop.take_events();

    (desktop, input, seat)
}

pub fn set_modifiers(desktop: &mut TestDesktop, input: &mut Input, seat: SeatId, modifiers: ModifiersState) {
    input.process_input_event(
        desktop,
        seat,
        InputEvent::KeyboardModifiers(KeyboardModifiersEvent {
            device: KEYBOARD,
            modifiers,
        }),
    );
}

pub fn button(desktop: &mut TestDesktop, input: &mut Input, seat: SeatId, button: u32, state: ButtonState) {
    input.process_input_event(
        desktop,
        seat,
        InputEvent::PointerButton(PointerButtonEvent {
            device: MOUSE,
            time: 0,
            button,
            state,
        }),
    );
}

pub fn motion(desktop: &mut TestDesktop, input: &mut Input, seat: SeatId, delta: (f64, f64)) {
    input.process_input_event(
        desktop,
        seat,
        InputEvent::PointerMotion(PointerMotionEvent {
            device: MOUSE,
            time: 0,
            delta: delta.into(),
        }),
    );
}

/// Area covered by a view of the given geometry and its decorations
fn deco_frame(geometry: Rectangle<f64, Logical>) -> Rectangle<f64, Logical> {
    Rectangle::new(
        (
            geometry.loc.x - DECO_BORDER,
            geometry.loc.y - DECO_BORDER - DECO_TITLEBAR,
        )
            .into(),
        (
            geometry.size.w + 2.0 * DECO_BORDER,
            geometry.size.h + 2.0 * DECO_BORDER + DECO_TITLEBAR,
        )
            .into(),
    )
}

pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Rectangle<f64, Logical> {
    Rectangle::new((x, y).into(), (w, h).into())
}
