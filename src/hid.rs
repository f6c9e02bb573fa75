//! HID facade: turns key, consumer, system control and mouse events into transport calls.
//!
//! Keyboard, consumer control and system control events are forwarded to their transport and
//! then fanned out to every registered [EventDispatcher](crate::EventDispatcher). Mouse and
//! absolute mouse events go straight to their transport.
//!
//! # Composite keys
//!
//! Pressing a [Key] with modifier flags presses each held modifier first, in a fixed order
//! (Shift, Control, Left Alt, Right Alt, GUI), then the base key code. Every modifier goes
//! through its own state transition:
//!
//! ```text
//! Idle -> ModifierRequested -+-> Flushed ------+-> BaseKeyPressed
//!                            +-> AlreadyActive -+
//! ```
//!
//! Some hosts (ChromeOS 51-60 at least) drop the modifier when it shows up in the same report as
//! the key it modifies, so `Shift + [` does not produce a `{`. A modifier that was not part of
//! the last report sent to the host is therefore flushed in a report of its own before anything
//! else is pressed. Releases need no such ordering.

use core::cell::Cell;

use crate::error::Result;
use crate::event_dispatcher::{DispatchResult, Dispatchers, EventDispatcher};
use crate::key::{consumer_usage, ConnectionMask, Key};
use crate::keyboard::consumer::ConsumerTransport;
use crate::keyboard::system_control::SystemControlTransport;
use crate::keyboard::KeyboardTransport;
use crate::mouse::absolute::AbsoluteMouseTransport;
use crate::mouse::MouseTransport;

/// Outcome of pressing a single modifier of a composite key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModifierPress {
    /// The modifier was missing from the last sent report, and a report was flushed.
    Flushed,
    /// The modifier was already in the last sent report, nothing was flushed.
    AlreadyActive,
}

/// The transports the facade drives, one per device class.
pub struct Devices<K, C, S, M, A> {
    pub keyboard: K,
    pub consumer: C,
    pub system_control: S,
    pub mouse: M,
    pub absolute_mouse: A,
}

/// Stateless HID facade over injected transports and event dispatchers.
pub struct Hid<'a, K, C, S, M, A, const N: usize> {
    devices: Devices<K, C, S, M, A>,
    dispatchers: Dispatchers<'a, N>,
    connection_mask: &'a Cell<ConnectionMask>,
    dispatch_failures: usize,
}

impl<'a, K, C, S, M, A, const N: usize> Hid<'a, K, C, S, M, A, N>
where
    K: KeyboardTransport,
    C: ConsumerTransport,
    S: SystemControlTransport,
    M: MouseTransport,
    A: AbsoluteMouseTransport,
{
    /// Creates a new [Hid] facade.
    ///
    /// `connection_mask` stays owned by the caller; the facade reads it on every dispatch.
    pub fn new(
        devices: Devices<K, C, S, M, A>,
        dispatchers: Dispatchers<'a, N>,
        connection_mask: &'a Cell<ConnectionMask>,
    ) -> Self {
        Self {
            devices,
            dispatchers,
            connection_mask,
            dispatch_failures: 0,
        }
    }

    pub fn devices(&self) -> &Devices<K, C, S, M, A> {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut Devices<K, C, S, M, A> {
        &mut self.devices
    }

    pub fn dispatchers(&self) -> &Dispatchers<'a, N> {
        &self.dispatchers
    }

    /// Gets the number of dispatcher notifications that failed so far.
    pub fn dispatch_failures(&self) -> usize {
        self.dispatch_failures
    }

    /// Consumes the facade, returning the transports and the dispatcher registry.
    pub fn into_parts(self) -> (Devices<K, C, S, M, A>, Dispatchers<'a, N>) {
        (self.devices, self.dispatchers)
    }

    fn dispatch<F>(&mut self, mut notify: F)
    where
        F: FnMut(&mut dyn EventDispatcher, ConnectionMask) -> DispatchResult,
    {
        let mask = self.connection_mask.get();
        self.dispatch_failures += self.dispatchers.apply(|d| notify(d, mask));
    }

    // Keyboard events

    pub fn initialize_keyboard(&mut self) {
        self.devices.keyboard.begin();
    }

    /// Presses the base key code of `key`, ignoring its flags.
    pub fn press_raw_key(&mut self, key: Key) {
        self.devices.keyboard.press(key.key_code);
        self.dispatch(|d, mask| d.key_press(mask, key.key_code));
    }

    /// Presses a modifier key, flushing a report if the host has not seen it yet.
    ///
    /// Only the last *sent* report is consulted: a modifier that is pending in the current
    /// report but was never sent still triggers the flush.
    pub fn press_modifier_key(&mut self, modifier: Key) -> Result<ModifierPress> {
        self.press_raw_key(modifier);

        if self.was_modifier_key_active(modifier) {
            Ok(ModifierPress::AlreadyActive)
        } else {
            #[cfg(feature = "defmt")]
            defmt::trace!("flushing modifier {=u8:#x}", modifier.key_code);
            self.send_keyboard_report()?;
            Ok(ModifierPress::Flushed)
        }
    }

    /// Presses every modifier held by `key`, then `key` itself.
    ///
    /// All presses are carried out even when a flush fails; the first error is returned.
    pub fn press_key(&mut self, key: Key) -> Result<()> {
        let mut result = Ok(());

        for modifier in key.flags.held_modifiers() {
            result = result.and(self.press_modifier_key(modifier).map(|_| ()));
        }

        self.press_raw_key(key);

        result
    }

    /// Releases the base key code of `key`, ignoring its flags.
    pub fn release_raw_key(&mut self, key: Key) {
        self.devices.keyboard.release(key.key_code);
        self.dispatch(|d, mask| d.key_release(mask, key.key_code));
    }

    /// Releases every modifier held by `key`, then `key` itself. Never flushes.
    pub fn release_key(&mut self, key: Key) {
        for modifier in key.flags.held_modifiers() {
            self.release_raw_key(modifier);
        }

        self.release_raw_key(key);
    }

    /// Releases every keyboard key and every consumer usage.
    ///
    /// Dispatchers are told about the keyboard release only; consumer usages are released on the
    /// transport without a dispatcher notification.
    pub fn release_all_keys(&mut self) {
        self.devices.keyboard.release_all();
        self.dispatch(|d, mask| d.key_release_all(mask));

        self.devices.consumer.release_all();
    }

    /// Returns true if the modifier will be sent with the next report.
    pub fn is_modifier_key_active(&self, modifier: Key) -> bool {
        self.devices.keyboard.is_modifier_active(modifier.key_code)
    }

    /// Returns true if the modifier was part of the last report sent to the host.
    pub fn was_modifier_key_active(&self, modifier: Key) -> bool {
        self.devices.keyboard.was_modifier_active(modifier.key_code)
    }

    pub fn keyboard_leds(&self) -> u8 {
        self.devices.keyboard.leds()
    }

    /// Sends the pending keyboard and consumer control reports.
    ///
    /// Both transports are flushed even if the first one fails; the first error is returned.
    pub fn send_keyboard_report(&mut self) -> Result<()> {
        self.dispatch(|d, mask| d.key_send_report(mask));

        let keyboard = self.devices.keyboard.send_report();
        let consumer = self.devices.consumer.send_report();
        let result = keyboard.and(consumer);

        #[cfg(feature = "defmt")]
        if let Err(err) = &result {
            defmt::warn!("keyboard report failed: {}", defmt::Debug2Format(err));
        }

        result.map_err(Into::into)
    }

    // Consumer control events

    pub fn initialize_consumer_control(&mut self) {
        self.devices.consumer.begin();
    }

    pub fn press_consumer_control(&mut self, key: Key) {
        let usage = consumer_usage(key);
        self.devices.consumer.press(usage);
        self.dispatch(|d, mask| d.consumer_press(mask, usage));
    }

    pub fn release_consumer_control(&mut self, key: Key) {
        let usage = consumer_usage(key);
        self.devices.consumer.release(usage);
        self.dispatch(|d, mask| d.consumer_release(mask, usage));
    }

    // System control events

    pub fn initialize_system_control(&mut self) {
        self.devices.system_control.begin();
    }

    /// Presses a system control key. Dispatchers are notified even if the transport fails.
    pub fn press_system_control(&mut self, key: Key) -> Result<()> {
        let result = self.devices.system_control.press(key.key_code);
        self.dispatch(|d, mask| d.system_press(mask, key.key_code));
        result.map_err(Into::into)
    }

    /// Releases a system control key. Dispatchers are notified even if the transport fails.
    pub fn release_system_control(&mut self, key: Key) -> Result<()> {
        let result = self.devices.system_control.release(key.key_code);
        self.dispatch(|d, mask| d.system_release(mask, key.key_code));
        result.map_err(Into::into)
    }

    // Mouse events

    pub fn initialize_mouse(&mut self) {
        self.devices.mouse.begin();
    }

    pub fn move_mouse(&mut self, x: i8, y: i8, v_wheel: i8, h_wheel: i8) {
        self.devices.mouse.move_by(x, y, v_wheel, h_wheel);
    }

    pub fn click_mouse_buttons(&mut self, buttons: u8) -> Result<()> {
        Ok(self.devices.mouse.click(buttons)?)
    }

    pub fn press_mouse_buttons(&mut self, buttons: u8) {
        self.devices.mouse.press(buttons);
    }

    pub fn release_mouse_buttons(&mut self, buttons: u8) {
        self.devices.mouse.release(buttons);
    }

    pub fn release_all_mouse_buttons(&mut self) {
        self.devices.mouse.release_all();
    }

    pub fn send_mouse_report(&mut self) -> Result<()> {
        Ok(self.devices.mouse.send_report()?)
    }

    // Absolute mouse (graphics tablet) events

    pub fn initialize_absolute_mouse(&mut self) {
        self.devices.absolute_mouse.begin();
    }

    pub fn move_absolute_mouse(&mut self, x: i8, y: i8, wheel: i8) -> Result<()> {
        Ok(self.devices.absolute_mouse.move_by(x, y, wheel)?)
    }

    pub fn move_absolute_mouse_to(&mut self, x: u16, y: u16, wheel: i8) -> Result<()> {
        Ok(self.devices.absolute_mouse.move_to(x, y, wheel)?)
    }

    pub fn click_absolute_mouse_buttons(&mut self, buttons: u8) -> Result<()> {
        Ok(self.devices.absolute_mouse.click(buttons)?)
    }

    pub fn press_absolute_mouse_buttons(&mut self, buttons: u8) -> Result<()> {
        Ok(self.devices.absolute_mouse.press(buttons)?)
    }

    pub fn release_absolute_mouse_buttons(&mut self, buttons: u8) -> Result<()> {
        Ok(self.devices.absolute_mouse.release(buttons)?)
    }

    pub fn release_all_absolute_mouse_buttons(&mut self) -> Result<()> {
        Ok(self.devices.absolute_mouse.release_all()?)
    }

    pub fn send_absolute_mouse_report(&mut self) -> Result<()> {
        Ok(self.devices.absolute_mouse.send_report()?)
    }
}
