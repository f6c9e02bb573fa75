//! Report endpoints, and constructors for the USB HID classes backing each transport.

use usb_device::bus::{UsbBus, UsbBusAllocator};
use usb_device::{Result, UsbError};
use usbd_hid::descriptor::{KeyboardReport, MouseReport, SerializedDescriptor, SystemControlReport};
use usbd_hid::hid_class::{HIDClass, HidProtocol};

use crate::descriptors::{
    ABSOLUTE_MOUSE_REPORT_DESCRIPTOR, CONSUMER_REPORT_DESCRIPTOR, NKRO_KEYBOARD_REPORT_DESCRIPTOR,
};
use crate::hid_settings::{
    boot_keyboard_settings, generic_settings, nkro_keyboard_settings, POLL_MS,
};

/// An interrupt endpoint pair that input reports are pushed to and output reports are pulled
/// from.
pub trait HidEndpoint {
    /// Pushes an input report to the host.
    ///
    /// Returns [UsbError::WouldBlock] if the previous report has not been collected yet.
    fn push_report(&mut self, report: &[u8]) -> Result<usize>;

    /// Pulls an output report (e.g. keyboard LEDs) from the host.
    fn pull_report(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(UsbError::WouldBlock)
    }
}

impl<B: UsbBus> HidEndpoint for HIDClass<'_, B> {
    fn push_report(&mut self, report: &[u8]) -> Result<usize> {
        self.push_raw_input(report)
    }

    fn pull_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.pull_raw_output(buf)
    }
}

impl<E: HidEndpoint + ?Sized> HidEndpoint for &mut E {
    fn push_report(&mut self, report: &[u8]) -> Result<usize> {
        (**self).push_report(report)
    }

    fn pull_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).pull_report(buf)
    }
}

/// Creates the HID class for a [BootKeyboard](crate::keyboard::boot::BootKeyboard).
pub fn boot_keyboard_class<B: UsbBus>(usb_bus: &UsbBusAllocator<B>) -> HIDClass<'_, B> {
    HIDClass::new_with_settings(
        usb_bus,
        KeyboardReport::desc(),
        POLL_MS,
        boot_keyboard_settings(),
    )
}

/// Creates the HID class for an [NkroKeyboard](crate::keyboard::nkro::NkroKeyboard).
pub fn nkro_keyboard_class<B: UsbBus>(usb_bus: &UsbBusAllocator<B>) -> HIDClass<'_, B> {
    HIDClass::new_with_settings(
        usb_bus,
        NKRO_KEYBOARD_REPORT_DESCRIPTOR,
        POLL_MS,
        nkro_keyboard_settings(),
    )
}

/// Creates the HID class for [ConsumerControl](crate::keyboard::consumer::ConsumerControl).
pub fn consumer_control_class<B: UsbBus>(usb_bus: &UsbBusAllocator<B>) -> HIDClass<'_, B> {
    HIDClass::new_ep_in_with_settings(
        usb_bus,
        CONSUMER_REPORT_DESCRIPTOR,
        POLL_MS,
        generic_settings(HidProtocol::Generic),
    )
}

/// Creates the HID class for [SystemControl](crate::keyboard::system_control::SystemControl).
pub fn system_control_class<B: UsbBus>(usb_bus: &UsbBusAllocator<B>) -> HIDClass<'_, B> {
    HIDClass::new_ep_in_with_settings(
        usb_bus,
        SystemControlReport::desc(),
        POLL_MS,
        generic_settings(HidProtocol::Generic),
    )
}

/// Creates the HID class for a [Mouse](crate::mouse::Mouse).
pub fn mouse_class<B: UsbBus>(usb_bus: &UsbBusAllocator<B>) -> HIDClass<'_, B> {
    HIDClass::new_ep_in_with_settings(
        usb_bus,
        MouseReport::desc(),
        POLL_MS,
        generic_settings(HidProtocol::Mouse),
    )
}

/// Creates the HID class for an [AbsoluteMouse](crate::mouse::absolute::AbsoluteMouse).
pub fn absolute_mouse_class<B: UsbBus>(usb_bus: &UsbBusAllocator<B>) -> HIDClass<'_, B> {
    HIDClass::new_ep_in_with_settings(
        usb_bus,
        ABSOLUTE_MOUSE_REPORT_DESCRIPTOR,
        POLL_MS,
        generic_settings(HidProtocol::Generic),
    )
}
