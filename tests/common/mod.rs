//! Recording fakes shared by the facade tests.
//!
//! Every transport and dispatcher appends to one shared log, so tests can assert the relative
//! order of transport calls and dispatcher notifications.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use kbd_hid::keyboard::consumer::ConsumerTransport;
use kbd_hid::keyboard::system_control::SystemControlTransport;
use kbd_hid::keyboard::KeyboardTransport;
use kbd_hid::mouse::absolute::AbsoluteMouseTransport;
use kbd_hid::mouse::MouseTransport;
use kbd_hid::usb_device::{Result, UsbError};
use kbd_hid::{ConnectionMask, Devices, DispatchError, DispatchResult, EventDispatcher, HidEndpoint};

pub type Log = Rc<RefCell<Vec<Call>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    KeyPress(ConnectionMask, u8),
    KeyRelease(ConnectionMask, u8),
    KeyReleaseAll(ConnectionMask),
    KeySendReport(ConnectionMask),
    ConsumerPress(ConnectionMask, u16),
    ConsumerRelease(ConnectionMask, u16),
    SystemPress(ConnectionMask, u8),
    SystemRelease(ConnectionMask, u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    KeyboardBegin,
    KeyPress(u8),
    KeyRelease(u8),
    KeyReleaseAll,
    KeySend,
    ConsumerBegin,
    ConsumerPress(u16),
    ConsumerRelease(u16),
    ConsumerReleaseAll,
    ConsumerSend,
    SystemBegin,
    SystemPress(u8),
    SystemRelease(u8),
    MouseBegin,
    MouseMove(i8, i8, i8, i8),
    MouseClick(u8),
    MousePress(u8),
    MouseRelease(u8),
    MouseReleaseAll,
    MouseSend,
    AbsoluteBegin,
    AbsoluteMoveBy(i8, i8, i8),
    AbsoluteMoveTo(u16, u16, i8),
    AbsoluteClick(u8),
    AbsolutePress(u8),
    AbsoluteRelease(u8),
    AbsoluteReleaseAll,
    AbsoluteSend,
    Dispatch(&'static str, Event),
}

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Takes the recorded calls, leaving the log empty.
pub fn drain(log: &Log) -> Vec<Call> {
    log.borrow_mut().drain(..).collect()
}

/// Keyboard that tracks modifiers in a pending and a sent report.
pub struct FakeKeyboard {
    log: Log,
    pending_modifiers: u8,
    sent_modifiers: u8,
    pub leds: u8,
    pub fail_send: bool,
}

fn modifier_bit(key: u8) -> u8 {
    if (0xe0..=0xe7).contains(&key) {
        1 << (key - 0xe0)
    } else {
        0
    }
}

impl KeyboardTransport for FakeKeyboard {
    fn begin(&mut self) {
        self.log.borrow_mut().push(Call::KeyboardBegin);
    }

    fn press(&mut self, key: u8) -> usize {
        self.log.borrow_mut().push(Call::KeyPress(key));
        self.pending_modifiers |= modifier_bit(key);
        1
    }

    fn release(&mut self, key: u8) -> usize {
        self.log.borrow_mut().push(Call::KeyRelease(key));
        self.pending_modifiers &= !modifier_bit(key);
        1
    }

    fn release_all(&mut self) {
        self.log.borrow_mut().push(Call::KeyReleaseAll);
        self.pending_modifiers = 0;
    }

    fn send_report(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Call::KeySend);
        if self.fail_send {
            return Err(UsbError::WouldBlock);
        }
        self.sent_modifiers = self.pending_modifiers;
        Ok(())
    }

    fn is_modifier_active(&self, key: u8) -> bool {
        self.pending_modifiers & modifier_bit(key) != 0
    }

    fn was_modifier_active(&self, key: u8) -> bool {
        self.sent_modifiers & modifier_bit(key) != 0
    }

    fn leds(&self) -> u8 {
        self.leds
    }
}

pub struct FakeConsumer {
    log: Log,
}

impl ConsumerTransport for FakeConsumer {
    fn begin(&mut self) {
        self.log.borrow_mut().push(Call::ConsumerBegin);
    }

    fn press(&mut self, usage: u16) {
        self.log.borrow_mut().push(Call::ConsumerPress(usage));
    }

    fn release(&mut self, usage: u16) {
        self.log.borrow_mut().push(Call::ConsumerRelease(usage));
    }

    fn release_all(&mut self) {
        self.log.borrow_mut().push(Call::ConsumerReleaseAll);
    }

    fn send_report(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Call::ConsumerSend);
        Ok(())
    }
}

pub struct FakeSystemControl {
    log: Log,
    pub fail: bool,
}

impl FakeSystemControl {
    fn result(&self) -> Result<()> {
        if self.fail {
            Err(UsbError::InvalidState)
        } else {
            Ok(())
        }
    }
}

impl SystemControlTransport for FakeSystemControl {
    fn begin(&mut self) {
        self.log.borrow_mut().push(Call::SystemBegin);
    }

    fn press(&mut self, code: u8) -> Result<()> {
        self.log.borrow_mut().push(Call::SystemPress(code));
        self.result()
    }

    fn release(&mut self, code: u8) -> Result<()> {
        self.log.borrow_mut().push(Call::SystemRelease(code));
        self.result()
    }

    fn release_all(&mut self) -> Result<()> {
        self.result()
    }

    fn send_report(&mut self) -> Result<()> {
        self.result()
    }
}

pub struct FakeMouse {
    log: Log,
}

impl MouseTransport for FakeMouse {
    fn begin(&mut self) {
        self.log.borrow_mut().push(Call::MouseBegin);
    }

    fn move_by(&mut self, x: i8, y: i8, v_wheel: i8, h_wheel: i8) {
        self.log
            .borrow_mut()
            .push(Call::MouseMove(x, y, v_wheel, h_wheel));
    }

    fn click(&mut self, buttons: u8) -> Result<()> {
        self.log.borrow_mut().push(Call::MouseClick(buttons));
        Ok(())
    }

    fn press(&mut self, buttons: u8) {
        self.log.borrow_mut().push(Call::MousePress(buttons));
    }

    fn release(&mut self, buttons: u8) {
        self.log.borrow_mut().push(Call::MouseRelease(buttons));
    }

    fn release_all(&mut self) {
        self.log.borrow_mut().push(Call::MouseReleaseAll);
    }

    fn send_report(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Call::MouseSend);
        Ok(())
    }
}

pub struct FakeAbsoluteMouse {
    log: Log,
}

impl AbsoluteMouseTransport for FakeAbsoluteMouse {
    fn begin(&mut self) {
        self.log.borrow_mut().push(Call::AbsoluteBegin);
    }

    fn move_by(&mut self, x: i8, y: i8, wheel: i8) -> Result<()> {
        self.log.borrow_mut().push(Call::AbsoluteMoveBy(x, y, wheel));
        Ok(())
    }

    fn move_to(&mut self, x: u16, y: u16, wheel: i8) -> Result<()> {
        self.log.borrow_mut().push(Call::AbsoluteMoveTo(x, y, wheel));
        Ok(())
    }

    fn click(&mut self, buttons: u8) -> Result<()> {
        self.log.borrow_mut().push(Call::AbsoluteClick(buttons));
        Ok(())
    }

    fn press(&mut self, buttons: u8) -> Result<()> {
        self.log.borrow_mut().push(Call::AbsolutePress(buttons));
        Ok(())
    }

    fn release(&mut self, buttons: u8) -> Result<()> {
        self.log.borrow_mut().push(Call::AbsoluteRelease(buttons));
        Ok(())
    }

    fn release_all(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Call::AbsoluteReleaseAll);
        Ok(())
    }

    fn send_report(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Call::AbsoluteSend);
        Ok(())
    }
}

pub type FakeDevices =
    Devices<FakeKeyboard, FakeConsumer, FakeSystemControl, FakeMouse, FakeAbsoluteMouse>;

pub fn fake_devices(log: &Log) -> FakeDevices {
    Devices {
        keyboard: FakeKeyboard {
            log: log.clone(),
            pending_modifiers: 0,
            sent_modifiers: 0,
            leds: 0,
            fail_send: false,
        },
        consumer: FakeConsumer { log: log.clone() },
        system_control: FakeSystemControl {
            log: log.clone(),
            fail: false,
        },
        mouse: FakeMouse { log: log.clone() },
        absolute_mouse: FakeAbsoluteMouse { log: log.clone() },
    }
}

/// Dispatcher recording every notification under its name.
pub struct Recorder {
    name: &'static str,
    log: Log,
    pub fail_with: Option<DispatchError>,
}

impl Recorder {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_with: None,
        }
    }

    fn record(&mut self, event: Event) -> DispatchResult {
        self.log.borrow_mut().push(Call::Dispatch(self.name, event));
        match self.fail_with {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl EventDispatcher for Recorder {
    fn key_press(&mut self, mask: ConnectionMask, key_code: u8) -> DispatchResult {
        self.record(Event::KeyPress(mask, key_code))
    }

    fn key_release(&mut self, mask: ConnectionMask, key_code: u8) -> DispatchResult {
        self.record(Event::KeyRelease(mask, key_code))
    }

    fn key_release_all(&mut self, mask: ConnectionMask) -> DispatchResult {
        self.record(Event::KeyReleaseAll(mask))
    }

    fn key_send_report(&mut self, mask: ConnectionMask) -> DispatchResult {
        self.record(Event::KeySendReport(mask))
    }

    fn consumer_press(&mut self, mask: ConnectionMask, usage: u16) -> DispatchResult {
        self.record(Event::ConsumerPress(mask, usage))
    }

    fn consumer_release(&mut self, mask: ConnectionMask, usage: u16) -> DispatchResult {
        self.record(Event::ConsumerRelease(mask, usage))
    }

    fn system_press(&mut self, mask: ConnectionMask, code: u8) -> DispatchResult {
        self.record(Event::SystemPress(mask, code))
    }

    fn system_release(&mut self, mask: ConnectionMask, code: u8) -> DispatchResult {
        self.record(Event::SystemRelease(mask, code))
    }
}

/// Endpoint keeping every pushed report.
#[derive(Default)]
pub struct ReportLog {
    pub reports: Vec<Vec<u8>>,
}

impl HidEndpoint for ReportLog {
    fn push_report(&mut self, report: &[u8]) -> Result<usize> {
        self.reports.push(report.to_vec());
        Ok(report.len())
    }
}
