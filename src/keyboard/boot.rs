use usb_device::{Result, UsbError};

use crate::endpoint::HidEndpoint;
use crate::hid_report_observer::HIDReportObserver;
use crate::hid_settings::HIDReport;

use super::*;

/// Boot protocol keyboard report.
///
/// Layout (8 bytes):
/// ```text
/// Byte 0: Modifier keys (bitfield, bit 0 = Left Ctrl .. bit 7 = Right GUI)
/// Byte 1: Reserved (0x00)
/// Byte 2-7: Up to 6 simultaneous key codes
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootKeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub keycodes: Keycodes,
}

impl BootKeyboardReport {
    pub const SIZE: usize = 8;

    /// Serialises the report into `buf`, returning the number of bytes written (0 if `buf` is too
    /// small).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < Self::SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..Self::SIZE].copy_from_slice(&self.keycodes);
        Self::SIZE
    }
}

/// Six-key rollover keyboard speaking the boot protocol.
pub struct BootKeyboard<E> {
    endpoint: E,
    report: BootKeyboardReport,
    last_report: BootKeyboardReport,
    observer: HIDReportObserver,
    leds: u8,
}

impl<E: HidEndpoint> BootKeyboard<E> {
    /// Creates a new [BootKeyboard] sending reports to `endpoint`.
    pub fn new(endpoint: E) -> Self {
        Self::new_with_observer(endpoint, HIDReportObserver::default())
    }

    /// Creates a new [BootKeyboard] sending reports to `endpoint`.
    ///
    /// Allows setting a custom [HIDReportObserver] implementation for firing a callback function
    /// on HID report events.
    pub fn new_with_observer(endpoint: E, observer: HIDReportObserver) -> Self {
        Self {
            endpoint,
            report: BootKeyboardReport::default(),
            last_report: BootKeyboardReport::default(),
            observer,
            leds: 0,
        }
    }

    /// Gets a reference to the current keyboard report.
    pub fn report(&self) -> &BootKeyboardReport {
        &self.report
    }

    /// Gets a reference to the last keyboard report sent to the host.
    pub fn last_report(&self) -> &BootKeyboardReport {
        &self.last_report
    }

    /// Gets a reference to the report endpoint.
    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Gets a mutable reference to the report endpoint.
    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }

    /// Consumes the [BootKeyboard], and returns the underlying endpoint.
    pub fn into_endpoint(self) -> E {
        self.endpoint
    }

    /// Gets whether the current report differs from the last sent report.
    pub fn report_changed(&self) -> bool {
        self.report != self.last_report
    }

    /// Gets whether the provided key is pressed in the current keyboard report.
    pub fn is_key_pressed(&self, key: u8) -> bool {
        is_printable(key) && utils::contains_slot(&self.report.keycodes, key)
    }

    /// Gets whether the provided key was pressed in the previous keyboard report.
    pub fn was_key_pressed(&self, key: u8) -> bool {
        is_printable(key) && utils::contains_slot(&self.last_report.keycodes, key)
    }

    /// Returns true if *any* modifier will be sent during this key report
    pub fn is_any_modifier_active(&self) -> bool {
        self.report.modifier > 0
    }

    /// Returns true if *any* modifier was being sent during the previous key report
    pub fn was_any_modifier_active(&self) -> bool {
        self.last_report.modifier > 0
    }

    /// Reads the LED output report, if the host sent one.
    pub fn update_leds(&mut self) -> Result<()> {
        let mut buf = [0u8; 1];
        match self.endpoint.pull_report(&mut buf) {
            Ok(len) if len > 0 => {
                self.leds = buf[0];
                Ok(())
            }
            Ok(_) | Err(UsbError::WouldBlock) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Sends the current report without comparing it to the last sent report.
    pub fn send_report_unchecked(&mut self) -> Result<()> {
        let mut buf = [0u8; BootKeyboardReport::SIZE];
        let len = self.report.serialize(&mut buf);

        // replace the Ok(usize) with Ok(())
        let ret = self.endpoint.push_report(&buf[..len]).map(|_| ());
        self.observer
            .observe_report(&HIDReport::Keyboard(self.report), &ret);

        if ret.is_ok() {
            self.last_report = self.report;
        }

        ret
    }
}

impl<E: HidEndpoint> KeyboardTransport for BootKeyboard<E> {
    fn press(&mut self, key: u8) -> usize {
        if is_modifier(key) {
            self.report.modifier |= key_to_modifier_bitfield(key);
            1
        } else if is_printable(key) {
            utils::insert_slot(&mut self.report.keycodes, key) as usize
        } else {
            0
        }
    }

    fn release(&mut self, key: u8) -> usize {
        if is_modifier(key) {
            self.report.modifier &= !key_to_modifier_bitfield(key);
        } else {
            utils::remove_slot(&mut self.report.keycodes, key);
        }

        1
    }

    fn release_all(&mut self) {
        self.report.modifier = 0;
        self.report.keycodes = ZERO_KEYS;
    }

    fn send_report(&mut self) -> Result<()> {
        if self.report_changed() {
            self.send_report_unchecked()
        } else {
            Ok(())
        }
    }

    fn is_modifier_active(&self, key: u8) -> bool {
        is_modifier(key) && self.report.modifier & key_to_modifier_bitfield(key) != 0
    }

    fn was_modifier_active(&self, key: u8) -> bool {
        is_modifier(key) && self.last_report.modifier & key_to_modifier_bitfield(key) != 0
    }

    fn leds(&self) -> u8 {
        self.leds
    }
}
