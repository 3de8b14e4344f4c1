use smallvec::SmallVec;
use tracing::{debug, warn};

use super::{keyboard::KeyboardState, Seat, SeatHandler};
use crate::{
    backend::input::{DeviceDescriptor, DeviceId, DeviceKind},
    desktop::{DesktopHandler, OutputId},
    utils::{Logical, Point, Raw, SubscriptionToken},
};

bitflags::bitflags! {
    /// Capabilities advertised by a seat
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct SeatCapabilities: u32 {
        /// The seat has a pointer
        const POINTER = 1;
        /// The seat has a keyboard
        const KEYBOARD = 2;
        /// The seat has a touchscreen
        const TOUCH = 4;
    }
}

/// Errors of the device handling
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The backend cannot apply the requested setting
    #[error("The backend does not support this device setting")]
    BackendUnsupported,
    /// The device is not attached to the seat
    #[error("Device {0:?} is not attached to this seat")]
    UnknownDevice(DeviceId),
    /// The device is already attached to the seat
    #[error("Device {0:?} is already attached to this seat")]
    AlreadyAttached(DeviceId),
}

/// An input device attached to a seat
#[derive(Debug)]
pub struct Device {
    descriptor: DeviceDescriptor,
    mapped_output: Option<OutputId>,
    transform_token: Option<SubscriptionToken>,
    docked_tablet: Option<DeviceId>,
}

impl Device {
    /// Description of the device given by the backend
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// Output absolute motion of this device maps to
    pub fn mapped_output(&self) -> Option<OutputId> {
        self.mapped_output
    }

    /// Tablet this pad is docked to
    pub fn docked_tablet(&self) -> Option<DeviceId> {
        self.docked_tablet
    }

    fn follows_output_transform(&self) -> bool {
        matches!(
            self.descriptor.kind,
            DeviceKind::Pointer | DeviceKind::Touch | DeviceKind::TabletTool
        )
    }
}

fn output_by_name<D: DesktopHandler>(data: &D, name: &str) -> Option<OutputId> {
    data.outputs()
        .into_iter()
        .find(|output| data.output_name(*output).as_deref() == Some(name))
}

impl Seat {
    /// Attach an input device to this seat
    pub fn add_device<D: SeatHandler>(
        &mut self,
        data: &mut D,
        descriptor: DeviceDescriptor,
    ) -> Result<(), DeviceError> {
        let _span = self.span.clone().entered();
        let id = descriptor.id;
        if self.devices.contains_key(&id) {
            return Err(DeviceError::AlreadyAttached(id));
        }

        debug!(device = %descriptor.name, kind = ?descriptor.kind, "Adding device to seat");
        if descriptor.kind == DeviceKind::Keyboard {
            let meta_key = self.config.meta_key(&descriptor.name);
            self.keyboards.insert(id, KeyboardState::new(id, meta_key));
        }
        self.devices.insert(
            id,
            Device {
                descriptor,
                mapped_output: None,
                transform_token: None,
                docked_tablet: None,
            },
        );

        self.configure_cursor(data);
        self.update_capabilities(data);
        Ok(())
    }

    /// Detach an input device from this seat
    ///
    /// A compositor grab started by the device is cancelled, and tools of a removed
    /// tablet leave proximity.
    pub fn remove_device<D: SeatHandler>(
        &mut self,
        data: &mut D,
        id: DeviceId,
    ) -> Result<DeviceDescriptor, DeviceError> {
        let _span = self.span.clone().entered();
        let device = self.devices.shift_remove(&id).ok_or(DeviceError::UnknownDevice(id))?;
        debug!(device = %device.descriptor.name, "Removing device from seat");

        if let Some(token) = &device.transform_token {
            self.transform_listeners.cancel(token);
        }
        if self
            .cursor
            .grab
            .map_or(false, |grab| grab.start_data().device == Some(id))
        {
            self.cancel_compositor_grab(data);
        }

        match device.descriptor.kind {
            DeviceKind::Keyboard => {
                self.keyboards.shift_remove(&id);
                if self.active_keyboard == Some(id) {
                    self.active_keyboard = None;
                }
            }
            DeviceKind::TabletTool => self.remove_tablet_tools(data, id),
            _ => {}
        }
        for pad in self.devices.values_mut() {
            if pad.docked_tablet == Some(id) {
                pad.docked_tablet = None;
            }
        }

        self.update_capabilities(data);
        Ok(device.descriptor)
    }

    /// Devices attached to this seat
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// A device attached to this seat
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    /// Capabilities currently advertised by this seat
    pub fn capabilities(&self) -> SeatCapabilities {
        self.capabilities
    }

    /// Dock a tablet pad to a tablet
    ///
    /// The pad follows the keyboard focus of the seat from now on.
    pub fn dock_tablet_pad<D: SeatHandler>(
        &mut self,
        data: &mut D,
        pad: DeviceId,
        tablet: DeviceId,
    ) -> Result<(), DeviceError> {
        if !self.devices.contains_key(&tablet) {
            return Err(DeviceError::UnknownDevice(tablet));
        }
        let device = self.devices.get_mut(&pad).ok_or(DeviceError::UnknownDevice(pad))?;
        device.docked_tablet = Some(tablet);

        if let Some(surface) = self.keyboard_focus {
            data.tablet_pad_enter(self.id, pad, tablet, surface);
        }
        Ok(())
    }

    /// Apply the output mappings of the configuration to the cursor and every device
    pub fn configure_cursor<D: SeatHandler>(&mut self, data: &mut D) {
        let config = self.config.clone();
        self.cursor.mapped_output = config
            .get_cursor(&self.name)
            .and_then(|cursor| cursor.mapped_output.as_deref())
            .and_then(|name| output_by_name(data, name));

        let ids: SmallVec<[DeviceId; 8]> = self.devices.keys().copied().collect();
        for id in ids {
            self.configure_device(data, id);
        }

        let location = self.cursor.location;
        self.cursor.location = self.clamp_location(data, location);
    }

    fn configure_device<D: SeatHandler>(&mut self, data: &mut D, id: DeviceId) {
        let config = self.config.clone();
        let Some(device) = self.devices.get_mut(&id) else {
            return;
        };

        let output_name = config
            .get_device(&device.descriptor.name)
            .and_then(|device| device.mapped_output.clone())
            .or_else(|| device.descriptor.output_name.clone());
        let output = output_name
            .as_deref()
            .and_then(|name| output_by_name(data, name));
        if output_name.is_some() && output.is_none() {
            debug!(device = %device.descriptor.name, output = ?output_name, "Mapped output not found");
        }

        if device.mapped_output != output {
            if let Some(token) = device.transform_token.take() {
                self.transform_listeners.cancel(&token);
            }
            device.mapped_output = output;
            if let (Some(output), true) = (output, device.follows_output_transform()) {
                device.transform_token = Some(self.transform_listeners.subscribe(output, id));
            }
        }

        if let (Some(output), true) = (output, device.follows_output_transform()) {
            self.rotate_device(data, id, output);
        }
    }

    /// Rotate the devices mapped to an output along with it
    pub fn output_transform_changed<D: SeatHandler>(&mut self, data: &mut D, output: OutputId) {
        let devices: SmallVec<[DeviceId; 4]> = self.transform_listeners.subscribers(&output).copied().collect();
        for device in devices {
            self.rotate_device(data, device, output);
        }
    }

    pub(super) fn forget_output(&mut self, output: OutputId) {
        self.transform_listeners.cancel_all(&output);
        for device in self.devices.values_mut() {
            if device.mapped_output == Some(output) {
                device.mapped_output = None;
                device.transform_token = None;
            }
        }
        if self.cursor.mapped_output == Some(output) {
            self.cursor.mapped_output = None;
        }
    }

    fn rotate_device<D: SeatHandler>(&mut self, data: &mut D, device: DeviceId, output: OutputId) {
        let transform = data.output_transform(output);
        let degrees = if transform.flipped() {
            debug!(?transform, "Flipped output transforms are not applied to input devices");
            0
        } else {
            transform.degrees()
        };

        match data.set_device_rotation(self.id, device, degrees) {
            Ok(()) => debug!(device = device.0, degrees, "Rotated input device"),
            Err(DeviceError::BackendUnsupported) => {
                debug!(device = device.0, "Backend cannot rotate input device")
            }
            Err(err) => warn!(?err, "Failed to rotate input device"),
        }
    }

    pub(super) fn update_capabilities<D: SeatHandler>(&mut self, data: &mut D) {
        let capabilities = self
            .devices
            .values()
            .fold(SeatCapabilities::empty(), |caps, device| {
                caps | match device.descriptor.kind {
                    DeviceKind::Keyboard => SeatCapabilities::KEYBOARD,
                    DeviceKind::Pointer | DeviceKind::TabletTool => SeatCapabilities::POINTER,
                    DeviceKind::Touch => SeatCapabilities::TOUCH,
                    DeviceKind::TabletPad => SeatCapabilities::empty(),
                }
            });
        if capabilities == self.capabilities {
            return;
        }

        debug!(?capabilities, "Seat capabilities changed");
        self.capabilities = capabilities;
        data.seat_capabilities(self.id, capabilities);
        self.show_default_image(data);
    }

    /// Map a normalized absolute position of a device into the layout
    ///
    /// The position covers the output the device is mapped to, else the output of the
    /// cursor, else the whole layout.
    pub fn absolute_to_layout<D: DesktopHandler>(
        &self,
        data: &D,
        device: DeviceId,
        position: Point<f64, Raw>,
    ) -> Option<Point<f64, Logical>> {
        let area = self
            .devices
            .get(&device)
            .and_then(|device| device.mapped_output)
            .or(self.cursor.mapped_output)
            .and_then(|output| data.output_geometry(output))
            .or_else(|| data.layout_bounds())?;

        Some(
            (
                area.loc.x as f64 + position.x * area.size.w as f64,
                area.loc.y as f64 + position.y * area.size.h as f64,
            )
                .into(),
        )
    }
}
