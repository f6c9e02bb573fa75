use usb_device::{Result, UsbError};

use crate::endpoint::HidEndpoint;
use crate::hid_report_observer::HIDReportObserver;
use crate::hid_settings::HIDReport;

use super::*;

/// Number of bytes in the NKRO key bitmap, one bit per usage `0x00..=0xDF`.
pub const KEY_BYTES: usize = 28;

/// NKRO keyboard report: a modifier bitfield followed by the key bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NkroKeyboardReport {
    pub modifier: u8,
    pub keys: [u8; KEY_BYTES],
}

impl NkroKeyboardReport {
    pub const SIZE: usize = 1 + KEY_BYTES;

    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < Self::SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1..Self::SIZE].copy_from_slice(&self.keys);
        Self::SIZE
    }
}

/// N-key rollover keyboard.
pub struct NkroKeyboard<E> {
    endpoint: E,
    report: NkroKeyboardReport,
    last_report: NkroKeyboardReport,
    observer: HIDReportObserver,
    leds: u8,
}

impl<E: HidEndpoint> NkroKeyboard<E> {
    /// Creates a new [NkroKeyboard] sending reports to `endpoint`.
    pub fn new(endpoint: E) -> Self {
        Self::new_with_observer(endpoint, HIDReportObserver::default())
    }

    /// Creates a new [NkroKeyboard] with a custom [HIDReportObserver].
    pub fn new_with_observer(endpoint: E, observer: HIDReportObserver) -> Self {
        Self {
            endpoint,
            report: NkroKeyboardReport::default(),
            last_report: NkroKeyboardReport::default(),
            observer,
            leds: 0,
        }
    }

    pub fn report(&self) -> &NkroKeyboardReport {
        &self.report
    }

    pub fn last_report(&self) -> &NkroKeyboardReport {
        &self.last_report
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }

    /// Gets whether the keys have changed between the last and current keyboard report.
    pub fn keys_changed(&self) -> bool {
        self.last_report.keys != self.report.keys
    }

    /// Gets whether the provided key is pressed in the current keyboard report.
    pub fn is_key_pressed(&self, key: u8) -> bool {
        is_printable(key)
            && self.report.keys[key_to_index(key)] & key_to_printable_bitfield(key) != 0
    }

    /// Gets whether the provided key was pressed in the previous keyboard report.
    pub fn was_key_pressed(&self, key: u8) -> bool {
        is_printable(key)
            && self.last_report.keys[key_to_index(key)] & key_to_printable_bitfield(key) != 0
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

    // Pushes `staged`, and records it as the last sent report on success.
    fn push_staged(&mut self, staged: NkroKeyboardReport) -> Result<()> {
        let mut buf = [0u8; NkroKeyboardReport::SIZE];
        let len = staged.serialize(&mut buf);

        let ret = self.endpoint.push_report(&buf[..len]).map(|_| ());
        self.observer
            .observe_report(&HIDReport::NKROKeyboard(staged), &ret);

        if ret.is_ok() {
            self.last_report = staged;
        }

        ret
    }
}

impl<E: HidEndpoint> KeyboardTransport for NkroKeyboard<E> {
    fn press(&mut self, key: u8) -> usize {
        if is_printable(key) {
            self.report.keys[key_to_index(key)] |= key_to_printable_bitfield(key);
            1
        } else if is_modifier(key) {
            self.report.modifier |= key_to_modifier_bitfield(key);
            1
        } else {
            0
        }
    }

    fn release(&mut self, key: u8) -> usize {
        if is_printable(key) {
            self.report.keys[key_to_index(key)] &= !key_to_printable_bitfield(key);
            1
        } else if is_modifier(key) {
            self.report.modifier &= !key_to_modifier_bitfield(key);
            1
        } else {
            0
        }
    }

    fn release_all(&mut self) {
        self.report = NkroKeyboardReport::default();
    }

    /// Sending the current HID report to the host:
    ///
    /// Depending on the differences between the current and previous HID reports, we
    /// might need to send one or two extra reports to guarantee that the host will
    /// process the changes in the correct order. There are two important scenarios
    /// to consider:
    ///
    /// 1. If a non-modifier keycode toggles off in the same report as a modifier
    /// changes, the host might process the modifier change first. For example, if
    /// both `shift` and `4` toggle off in the same report (most likely from a
    /// `LSHIFT(Key_4)` key being released), and that key has been held long enough
    /// to trigger character repeat, we could end up with a plain `4` in the output
    /// at the end of the repeat: `$$$$4` instead of `$$$$$`.
    ///
    /// 2. If a non-modifier keycode toggles on in the same report as a modifier
    /// changes, the host might process the non-modifer first. For example, pressing
    /// and holding an `LSHIFT(Key_4)` key might result in `4$$$` rather than `$$$$`.
    ///
    /// Therefore, each call to `send_report()` sends (up to) three reports to the
    /// host to guarantee the correct order of processing:
    ///
    /// 1. A report with toggled-off non-modifiers removed.
    /// 2. A report with changes to modifiers.
    /// 3. A report with toggled-on non-modifiers added.
    fn send_report(&mut self) -> Result<()> {
        let mut staged = self.last_report;

        if staged.modifier != self.report.modifier {
            let mut non_modifiers_toggled_off = false;

            for (last_key, key) in staged.keys.iter_mut().zip(self.report.keys.iter()) {
                let released_keys = *last_key & !key;
                if released_keys != 0 {
                    *last_key &= !released_keys;
                    non_modifiers_toggled_off = true;
                }
            }

            if non_modifiers_toggled_off {
                self.push_staged(staged)?;
            }

            staged.modifier = self.report.modifier;
            self.push_staged(staged)?;
        }

        if staged.keys != self.report.keys {
            staged.keys = self.report.keys;
            self.push_staged(staged)?;
        }

        Ok(())
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
