//! Relative and absolute pointer devices.
//!
//! Mouse events are forwarded 1:1 by the facade, without modifier handling or event fan-out.

use usb_device::Result;

use crate::endpoint::HidEndpoint;
use crate::hid_report_observer::HIDReportObserver;
use crate::hid_settings::HIDReport;

pub mod absolute;

pub const MOUSE_LEFT: u8 = 1 << 0;
pub const MOUSE_RIGHT: u8 = 1 << 1;
pub const MOUSE_MIDDLE: u8 = 1 << 2;
pub const MOUSE_PREV: u8 = 1 << 3;
pub const MOUSE_NEXT: u8 = 1 << 4;

/// Relative mouse report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub v_wheel: i8,
    pub h_wheel: i8,
}

impl MouseReport {
    pub const SIZE: usize = 5;

    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < Self::SIZE {
            return 0;
        }
        buf[0] = self.buttons;
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        buf[3] = self.v_wheel as u8;
        buf[4] = self.h_wheel as u8;
        Self::SIZE
    }

    /// Returns true if the report moves the cursor or either wheel.
    pub fn is_moving(&self) -> bool {
        self.x != 0 || self.y != 0 || self.v_wheel != 0 || self.h_wheel != 0
    }
}

/// Relative mouse side of the HID transport contract.
pub trait MouseTransport {
    /// Begin the mouse reports (no-op by default).
    fn begin(&mut self) {}

    /// Set the cursor and wheel deltas for the next report.
    fn move_by(&mut self, x: i8, y: i8, v_wheel: i8, h_wheel: i8);

    /// Press and release `buttons`, sending a report for each.
    fn click(&mut self, buttons: u8) -> Result<()>;

    fn press(&mut self, buttons: u8);

    fn release(&mut self, buttons: u8);

    fn release_all(&mut self);

    /// Send the current report if the buttons changed, or the cursor or a wheel moves.
    fn send_report(&mut self) -> Result<()>;
}

/// Relative (boot protocol compatible) mouse.
pub struct Mouse<E> {
    endpoint: E,
    report: MouseReport,
    last_buttons: u8,
    observer: HIDReportObserver,
}

impl<E: HidEndpoint> Mouse<E> {
    pub fn new(endpoint: E) -> Self {
        Self::new_with_observer(endpoint, HIDReportObserver::default())
    }

    pub fn new_with_observer(endpoint: E, observer: HIDReportObserver) -> Self {
        Self {
            endpoint,
            report: MouseReport::default(),
            last_buttons: 0,
            observer,
        }
    }

    pub fn report(&self) -> &MouseReport {
        &self.report
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }

    /// Gets whether any of `buttons` is held in the current report.
    pub fn is_pressed(&self, buttons: u8) -> bool {
        self.report.buttons & buttons != 0
    }
}

impl<E: HidEndpoint> MouseTransport for Mouse<E> {
    fn move_by(&mut self, x: i8, y: i8, v_wheel: i8, h_wheel: i8) {
        self.report.x = x;
        self.report.y = y;
        self.report.v_wheel = v_wheel;
        self.report.h_wheel = h_wheel;
    }

    fn click(&mut self, buttons: u8) -> Result<()> {
        self.press(buttons);
        self.send_report()?;
        self.release(buttons);
        self.send_report()
    }

    fn press(&mut self, buttons: u8) {
        self.report.buttons |= buttons;
    }

    fn release(&mut self, buttons: u8) {
        self.report.buttons &= !buttons;
    }

    fn release_all(&mut self) {
        self.report = MouseReport::default();
    }

    fn send_report(&mut self) -> Result<()> {
        // If the button state has not changed, and neither the cursor nor the wheel is being
        // told to move, there is no need to send a report.
        if self.report.buttons == self.last_buttons && !self.report.is_moving() {
            return Ok(());
        }

        let mut buf = [0u8; MouseReport::SIZE];
        let len = self.report.serialize(&mut buf);

        let ret = self.endpoint.push_report(&buf[..len]).map(|_| ());
        self.observer
            .observe_report(&HIDReport::Mouse(self.report), &ret);

        if ret.is_ok() {
            // movement is relative, consumed once reported
            self.last_buttons = self.report.buttons;
            self.move_by(0, 0, 0, 0);
        }

        ret
    }
}
