use usb_device::Result;

use crate::hid_settings::{HIDReport, HIDReportId};

/// Callback function fired after an HID report is pushed to the host.
pub type SendReportHook = fn(id: HIDReportId, report: &HIDReport, result: &Result<()>);

#[derive(Clone, Copy)]
pub struct HIDReportObserver {
    send_report_hook: Option<SendReportHook>,
}

impl HIDReportObserver {
    #[allow(non_upper_case_globals)]
    const NopSendReportHook: SendReportHook =
        |_id: HIDReportId, _report: &HIDReport, _result: &Result<()>| {};

    /// Creates a new [HIDReportObserver].
    pub const fn new(send_report_hook: SendReportHook) -> Self {
        Self {
            send_report_hook: Some(send_report_hook),
        }
    }

    /// Creates an [HIDReportObserver] with a no-op [SendReportHook].
    pub const fn nop() -> Self {
        Self {
            send_report_hook: Some(Self::NopSendReportHook),
        }
    }

    /// Reports a pushed HID report to the currently set [SendReportHook].
    pub fn observe_report(&self, report: &HIDReport, result: &Result<()>) {
        if let Some(send_report_hook) = self.send_report_hook {
            send_report_hook(report.id(), report, result);
        }
    }

    /// Gets the currently set [SendReportHook].
    pub fn hook(&self) -> Option<SendReportHook> {
        self.send_report_hook
    }

    /// Sets the [SendReportHook].
    pub fn set_hook(&mut self, new_hook: SendReportHook) {
        self.send_report_hook = Some(new_hook);
    }
}

impl Default for HIDReportObserver {
    fn default() -> Self {
        Self::nop()
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static OBSERVED: AtomicUsize = AtomicUsize::new(0);

    fn count_system_control(id: HIDReportId, report: &HIDReport, result: &Result<()>) {
        if id == HIDReportId::SystemControl && *report == HIDReport::SystemControl(0x82) {
            assert!(result.is_ok());
            OBSERVED.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_observe_report() {
        let mut observer = HIDReportObserver::default();
        observer.observe_report(&HIDReport::SystemControl(0x82), &Ok(()));
        assert_eq!(OBSERVED.load(Ordering::SeqCst), 0);

        observer.set_hook(count_system_control);
        observer.observe_report(&HIDReport::SystemControl(0x82), &Ok(()));
        assert_eq!(OBSERVED.load(Ordering::SeqCst), 1);
        assert!(observer.hook().is_some());
    }
}
