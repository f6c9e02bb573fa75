use usb_device::Result;

pub mod boot;
pub mod consumer;
pub mod nkro;
pub mod system_control;

pub type Keycodes = [u8; 6];

pub(crate) const ZERO_KEYS: Keycodes = [0u8; 6];

/// Last usage that fits the printable key bitmap.
pub const KEYPAD_HEXADECIMAL: u8 = 0xdd;
pub const LEFT_CONTROL: u8 = 0xe0;
pub const RIGHT_GUI: u8 = 0xe7;

pub const fn is_printable(key: u8) -> bool {
    key <= KEYPAD_HEXADECIMAL
}

pub const fn is_modifier(key: u8) -> bool {
    key >= LEFT_CONTROL && key <= RIGHT_GUI
}

pub(crate) const fn key_to_index(key: u8) -> usize {
    (key / 8) as usize
}

pub(crate) const fn key_to_printable_bitfield(key: u8) -> u8 {
    1 << (key % 8)
}

pub(crate) const fn key_to_modifier_bitfield(key: u8) -> u8 {
    1 << (key - LEFT_CONTROL)
}

/// Keyboard side of the HID transport contract.
///
/// Implementations keep two reports: the pending report edited by [press](Self::press) and
/// [release](Self::release), and the last report actually sent to the host.
pub trait KeyboardTransport {
    /// Begin the keyboard reports (no-op by default).
    fn begin(&mut self) {}

    /// Press a key, and add it to the current report.
    ///
    /// Returns 1 if the key was added (or was already present), 0 otherwise.
    fn press(&mut self, key: u8) -> usize;

    /// Release a key if it is present in the current report.
    ///
    /// Returns 1 if the key can be reported by this keyboard, 0 otherwise.
    fn release(&mut self, key: u8) -> usize;

    /// Release all keys and modifiers registered in the current report.
    fn release_all(&mut self);

    /// Send the current report to the host if it differs from the last sent report.
    fn send_report(&mut self) -> Result<()>;

    /// Returns true if the modifer key passed in will be sent during this key report
    /// Returns false in all other cases
    fn is_modifier_active(&self, key: u8) -> bool;

    /// Returns true if the modifer key passed in was being sent during the previous key report
    /// Returns false in all other cases
    fn was_modifier_active(&self, key: u8) -> bool;

    /// Gets the LED state last reported by the host.
    fn leds(&self) -> u8;

    /// End the keyboard reports.
    fn end(&mut self) -> Result<()> {
        self.release_all();
        self.send_report()
    }
}
