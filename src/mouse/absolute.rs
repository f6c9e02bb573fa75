use usb_device::Result;

use crate::endpoint::HidEndpoint;
use crate::hid_report_observer::HIDReportObserver;
use crate::hid_settings::HIDReport;

/// Largest coordinate on either axis.
pub const ABSOLUTE_MAX: u16 = 0x7fff;

/// Absolute pointer (graphics tablet style) report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsoluteMouseReport {
    pub buttons: u8,
    pub x: u16,
    pub y: u16,
    pub wheel: i8,
}

impl AbsoluteMouseReport {
    pub const SIZE: usize = 6;

    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < Self::SIZE {
            return 0;
        }
        buf[0] = self.buttons;
        buf[1..3].copy_from_slice(&self.x.to_le_bytes());
        buf[3..5].copy_from_slice(&self.y.to_le_bytes());
        buf[5] = self.wheel as u8;
        Self::SIZE
    }
}

/// Absolute mouse side of the HID transport contract.
///
/// Every state change is reported to the host immediately.
pub trait AbsoluteMouseTransport {
    /// Begin the absolute mouse reports (no-op by default).
    fn begin(&mut self) {}

    /// Move the pointer relative to its current position, saturating at the axis limits.
    fn move_by(&mut self, x: i8, y: i8, wheel: i8) -> Result<()>;

    /// Move the pointer to an absolute position.
    fn move_to(&mut self, x: u16, y: u16, wheel: i8) -> Result<()>;

    fn click(&mut self, buttons: u8) -> Result<()>;

    fn press(&mut self, buttons: u8) -> Result<()>;

    fn release(&mut self, buttons: u8) -> Result<()>;

    fn release_all(&mut self) -> Result<()>;

    /// Send the current pointer state.
    fn send_report(&mut self) -> Result<()>;
}

/// Absolute positioning mouse.
pub struct AbsoluteMouse<E> {
    endpoint: E,
    report: AbsoluteMouseReport,
    observer: HIDReportObserver,
}

impl<E: HidEndpoint> AbsoluteMouse<E> {
    pub fn new(endpoint: E) -> Self {
        Self::new_with_observer(endpoint, HIDReportObserver::default())
    }

    pub fn new_with_observer(endpoint: E, observer: HIDReportObserver) -> Self {
        Self {
            endpoint,
            report: AbsoluteMouseReport::default(),
            observer,
        }
    }

    pub fn report(&self) -> &AbsoluteMouseReport {
        &self.report
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }
}

fn offset_axis(position: u16, delta: i8) -> u16 {
    (i32::from(position) + i32::from(delta)).clamp(0, i32::from(ABSOLUTE_MAX)) as u16
}

impl<E: HidEndpoint> AbsoluteMouseTransport for AbsoluteMouse<E> {
    fn move_by(&mut self, x: i8, y: i8, wheel: i8) -> Result<()> {
        let x = offset_axis(self.report.x, x);
        let y = offset_axis(self.report.y, y);
        self.move_to(x, y, wheel)
    }

    fn move_to(&mut self, x: u16, y: u16, wheel: i8) -> Result<()> {
        self.report.x = x.min(ABSOLUTE_MAX);
        self.report.y = y.min(ABSOLUTE_MAX);
        self.report.wheel = wheel;
        self.send_report()
    }

    fn click(&mut self, buttons: u8) -> Result<()> {
        self.press(buttons)?;
        self.release(buttons)
    }

    fn press(&mut self, buttons: u8) -> Result<()> {
        self.report.buttons |= buttons;
        self.send_report()
    }

    fn release(&mut self, buttons: u8) -> Result<()> {
        self.report.buttons &= !buttons;
        self.send_report()
    }

    fn release_all(&mut self) -> Result<()> {
        self.report.buttons = 0;
        self.send_report()
    }

    fn send_report(&mut self) -> Result<()> {
        let mut buf = [0u8; AbsoluteMouseReport::SIZE];
        let len = self.report.serialize(&mut buf);

        let ret = self.endpoint.push_report(&buf[..len]).map(|_| ());
        self.observer
            .observe_report(&HIDReport::MouseAbsolute(self.report), &ret);

        if ret.is_ok() {
            self.report.wheel = 0;
        }

        ret
    }
}
