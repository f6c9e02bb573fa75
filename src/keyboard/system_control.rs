use usb_device::Result;

use crate::endpoint::HidEndpoint;
use crate::hid_report_observer::HIDReportObserver;
use crate::hid_settings::HIDReport;

/// Returns true for usages in the Generic Desktop system control range (Power Down to
/// System Display LCD Autoscale).
pub const fn is_system_control(code: u8) -> bool {
    code >= 0x81 && code <= 0xb7
}

/// System control side of the HID transport contract.
///
/// System control reports hold a single usage and are sent as soon as it changes.
pub trait SystemControlTransport {
    /// Begin the system control reports (no-op by default).
    fn begin(&mut self) {}

    /// Press a system control usage, and send the report.
    fn press(&mut self, code: u8) -> Result<()>;

    /// Release a system control usage, and send the report.
    fn release(&mut self, code: u8) -> Result<()>;

    /// Release whatever usage is held, and send the report.
    fn release_all(&mut self) -> Result<()>;

    /// Send the current report if it changed since the last sent report.
    fn send_report(&mut self) -> Result<()>;
}

/// System control (power, sleep, wake) device.
pub struct SystemControl<E> {
    endpoint: E,
    report: u8,
    last_report: u8,
    observer: HIDReportObserver,
}

impl<E: HidEndpoint> SystemControl<E> {
    pub fn new(endpoint: E) -> Self {
        Self::new_with_observer(endpoint, HIDReportObserver::default())
    }

    pub fn new_with_observer(endpoint: E, observer: HIDReportObserver) -> Self {
        Self {
            endpoint,
            report: 0,
            last_report: 0,
            observer,
        }
    }

    /// Gets the usage held in the current report (0 if none).
    pub fn report(&self) -> u8 {
        self.report
    }

    pub fn last_report(&self) -> u8 {
        self.last_report
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }
}

impl<E: HidEndpoint> SystemControlTransport for SystemControl<E> {
    fn press(&mut self, code: u8) -> Result<()> {
        if is_system_control(code) {
            self.report = code;
        }
        self.send_report()
    }

    fn release(&mut self, code: u8) -> Result<()> {
        if self.report == code {
            self.report = 0;
        }
        self.send_report()
    }

    fn release_all(&mut self) -> Result<()> {
        self.report = 0;
        self.send_report()
    }

    fn send_report(&mut self) -> Result<()> {
        if self.report == self.last_report {
            return Ok(());
        }

        let ret = self.endpoint.push_report(&[self.report]).map(|_| ());
        self.observer
            .observe_report(&HIDReport::SystemControl(self.report), &ret);

        if ret.is_ok() {
            self.last_report = self.report;
        }

        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::tests::RecordingEndpoint;

    const POWER_DOWN: u8 = 0x81;
    const SLEEP: u8 = 0x82;

    #[test]
    fn test_press_release_send_immediately() {
        let mut system = SystemControl::new(RecordingEndpoint::default());

        system.press(SLEEP).unwrap();
        assert_eq!(system.last_report(), SLEEP);

        // releasing a usage that is not held keeps the report
        system.release(POWER_DOWN).unwrap();
        assert_eq!(system.report(), SLEEP);

        system.release(SLEEP).unwrap();

        assert_eq!(
            system.endpoint().reports,
            [[SLEEP].to_vec(), [0].to_vec()]
        );
    }

    #[test]
    fn test_out_of_range_usage_is_ignored() {
        let mut system = SystemControl::new(RecordingEndpoint::default());

        system.press(0x04).unwrap();

        assert_eq!(system.report(), 0);
        assert!(system.endpoint().reports.is_empty());
    }

    #[test]
    fn test_release_all() {
        let mut system = SystemControl::new(RecordingEndpoint::default());

        system.press(POWER_DOWN).unwrap();
        system.press(SLEEP).unwrap();
        system.release_all().unwrap();

        assert_eq!(system.endpoint().reports.len(), 3);
        assert_eq!(system.last_report(), 0);
    }
}
