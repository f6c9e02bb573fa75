use usb_device::Result;

use crate::endpoint::HidEndpoint;
use crate::hid_report_observer::HIDReportObserver;
use crate::hid_settings::HIDReport;

/// Number of consumer usages that can be held at the same time.
pub const CONSUMER_SLOTS: usize = 4;

/// Consumer control report: up to four 16-bit consumer usages, free slots are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    pub usages: [u16; CONSUMER_SLOTS],
}

impl ConsumerReport {
    pub const SIZE: usize = CONSUMER_SLOTS * 2;

    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < Self::SIZE {
            return 0;
        }
        for (chunk, usage) in buf.chunks_exact_mut(2).zip(self.usages.iter()) {
            chunk.copy_from_slice(&usage.to_le_bytes());
        }
        Self::SIZE
    }
}

/// Consumer control side of the HID transport contract.
pub trait ConsumerTransport {
    /// Begin the consumer control reports (no-op by default).
    fn begin(&mut self) {}

    /// Add a consumer usage to the current report.
    fn press(&mut self, usage: u16);

    /// Remove a consumer usage from the current report.
    fn release(&mut self, usage: u16);

    /// Remove every consumer usage from the current report.
    fn release_all(&mut self);

    /// Send the current report if it changed since the last sent report.
    fn send_report(&mut self) -> Result<()>;
}

/// Consumer control (media keys, volume, browser keys) device.
pub struct ConsumerControl<E> {
    endpoint: E,
    report: ConsumerReport,
    last_report: ConsumerReport,
    observer: HIDReportObserver,
}

impl<E: HidEndpoint> ConsumerControl<E> {
    pub fn new(endpoint: E) -> Self {
        Self::new_with_observer(endpoint, HIDReportObserver::default())
    }

    pub fn new_with_observer(endpoint: E, observer: HIDReportObserver) -> Self {
        Self {
            endpoint,
            report: ConsumerReport::default(),
            last_report: ConsumerReport::default(),
            observer,
        }
    }

    pub fn report(&self) -> &ConsumerReport {
        &self.report
    }

    pub fn last_report(&self) -> &ConsumerReport {
        &self.last_report
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }

    /// Gets whether the provided usage is held in the current report.
    pub fn is_pressed(&self, usage: u16) -> bool {
        utils::contains_slot(&self.report.usages, usage)
    }
}

impl<E: HidEndpoint> ConsumerTransport for ConsumerControl<E> {
    fn press(&mut self, usage: u16) {
        if !utils::insert_slot(&mut self.report.usages, usage) {
            #[cfg(feature = "defmt")]
            defmt::debug!("consumer report full, dropping usage {=u16:#x}", usage);
        }
    }

    fn release(&mut self, usage: u16) {
        utils::remove_slot(&mut self.report.usages, usage);
    }

    fn release_all(&mut self) {
        self.report = ConsumerReport::default();
    }

    fn send_report(&mut self) -> Result<()> {
        if self.report == self.last_report {
            return Ok(());
        }

        let mut buf = [0u8; ConsumerReport::SIZE];
        let len = self.report.serialize(&mut buf);

        let ret = self.endpoint.push_report(&buf[..len]).map(|_| ());
        self.observer
            .observe_report(&HIDReport::ConsumerControl(self.report), &ret);

        if ret.is_ok() {
            self.last_report = self.report;
        }

        ret
    }
}
