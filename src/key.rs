use crate::keyboard::{LEFT_CONTROL, RIGHT_GUI};

/// Bitmask of flags carried alongside a key code.
///
/// For regular keys the low bits select which modifiers are logically held with the key. Synthetic
/// keys (with [KeyFlags::SYNTHETIC] set) reuse the low bits to tag the key type, and are routed
/// through the consumer or system control channels instead of being pressed as keyboard keys.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyFlags(u8);

impl KeyFlags {
    pub const NONE: Self = Self(0);
    pub const CTRL_HELD: Self = Self(0b0000_0001);
    pub const LALT_HELD: Self = Self(0b0000_0010);
    pub const RALT_HELD: Self = Self(0b0000_0100);
    pub const SHIFT_HELD: Self = Self(0b0000_1000);
    pub const GUI_HELD: Self = Self(0b0001_0000);
    pub const SYNTHETIC: Self = Self(0b0100_0000);
    pub const RESERVED: Self = Self(0b1000_0000);

    pub const IS_SYSCTL: Self = Self(0b0000_0001);
    pub const IS_INTERNAL: Self = Self(0b0000_0010);
    pub const SWITCH_TO_KEYMAP: Self = Self(0b0000_0100);
    pub const IS_CONSUMER: Self = Self(0b0000_1000);

    /// Creates [KeyFlags] from raw bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Gets the raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the modifier keys held by these flags, in expansion order.
    ///
    /// The order is fixed (Shift, Control, Left Alt, Right Alt, GUI) and does not depend on the
    /// order the bits were set in. Only the modifier bits are read, other flags are ignored.
    pub fn held_modifiers(self) -> impl Iterator<Item = Key> {
        MODIFIER_EXPANSION
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|&(_, modifier)| modifier)
    }
}

impl core::ops::BitOr for KeyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl core::ops::BitOrAssign for KeyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A key code together with its [KeyFlags].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key {
    pub key_code: u8,
    pub flags: KeyFlags,
}

impl Key {
    /// Creates a new [Key].
    pub const fn new(key_code: u8, flags: KeyFlags) -> Self {
        Self { key_code, flags }
    }

    /// Creates a plain keyboard [Key] with no flags.
    pub const fn from_code(key_code: u8) -> Self {
        Self::new(key_code, KeyFlags::NONE)
    }

    /// Creates a consumer control [Key] from a 10-bit consumer usage.
    ///
    /// The low byte becomes the key code, the two high bits are stored in the low flag bits.
    pub const fn consumer(usage: u16) -> Self {
        let high = ((usage >> 8) & 0x03) as u8;

        Self::new(
            usage as u8,
            KeyFlags::from_bits(KeyFlags::SYNTHETIC.0 | KeyFlags::IS_CONSUMER.0 | high),
        )
    }

    /// Creates a system control [Key].
    pub const fn system_control(code: u8) -> Self {
        Self::new(
            code,
            KeyFlags::from_bits(KeyFlags::SYNTHETIC.0 | KeyFlags::IS_SYSCTL.0),
        )
    }

    /// Gets the packed 16-bit representation, flags in the high byte.
    pub const fn raw(self) -> u16 {
        ((self.flags.0 as u16) << 8) | self.key_code as u16
    }

    /// Returns a copy with `flags` added.
    pub const fn with_flags(self, flags: KeyFlags) -> Self {
        Self::new(self.key_code, self.flags.union(flags))
    }

    pub const fn is_synthetic(self) -> bool {
        self.flags.contains(KeyFlags::SYNTHETIC)
    }

    pub const fn is_consumer(self) -> bool {
        self.is_synthetic() && self.flags.contains(KeyFlags::IS_CONSUMER)
    }

    pub const fn is_system_control(self) -> bool {
        self.is_synthetic() && self.flags.contains(KeyFlags::IS_SYSCTL)
    }

    /// Returns true if the key code is one of the eight keyboard modifiers.
    pub const fn is_modifier(self) -> bool {
        crate::keyboard::is_modifier(self.key_code)
    }
}

/// Maps a consumer [Key] to its 10-bit consumer usage.
pub const fn consumer_usage(key: Key) -> u16 {
    key.raw() & 0x03ff
}

pub const KEY_LEFT_CONTROL: Key = Key::from_code(LEFT_CONTROL);
pub const KEY_LEFT_SHIFT: Key = Key::from_code(0xe1);
pub const KEY_LEFT_ALT: Key = Key::from_code(0xe2);
pub const KEY_LEFT_GUI: Key = Key::from_code(0xe3);
pub const KEY_RIGHT_CONTROL: Key = Key::from_code(0xe4);
pub const KEY_RIGHT_SHIFT: Key = Key::from_code(0xe5);
pub const KEY_RIGHT_ALT: Key = Key::from_code(0xe6);
pub const KEY_RIGHT_GUI: Key = Key::from_code(RIGHT_GUI);

// Flag to modifier mapping, in the order modifiers are pressed and released.
static MODIFIER_EXPANSION: [(KeyFlags, Key); 5] = [
    (KeyFlags::SHIFT_HELD, KEY_LEFT_SHIFT),
    (KeyFlags::CTRL_HELD, KEY_LEFT_CONTROL),
    (KeyFlags::LALT_HELD, KEY_LEFT_ALT),
    (KeyFlags::RALT_HELD, KEY_RIGHT_ALT),
    (KeyFlags::GUI_HELD, KEY_LEFT_GUI),
];

/// Selects which transport(s) an event is destined for.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionMask(u8);

impl ConnectionMask {
    pub const NONE: Self = Self(0);
    pub const USB: Self = Self(0b01);
    pub const WIRELESS: Self = Self(0b10);
    pub const ALL: Self = Self(0b11);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl core::ops::BitOr for ConnectionMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_codes() {
        assert_eq!(KEY_LEFT_CONTROL.key_code, 0xe0);
        assert_eq!(KEY_RIGHT_GUI.key_code, 0xe7);
        assert!(KEY_LEFT_SHIFT.is_modifier());
        assert!(!Key::from_code(0x2f).is_modifier());
    }

    #[test]
    fn test_held_modifiers_order() {
        // bits set in reverse expansion order
        let flags = KeyFlags::GUI_HELD
            | KeyFlags::RALT_HELD
            | KeyFlags::LALT_HELD
            | KeyFlags::CTRL_HELD
            | KeyFlags::SHIFT_HELD;

        let mut held = flags.held_modifiers();
        assert_eq!(held.next(), Some(KEY_LEFT_SHIFT));
        assert_eq!(held.next(), Some(KEY_LEFT_CONTROL));
        assert_eq!(held.next(), Some(KEY_LEFT_ALT));
        assert_eq!(held.next(), Some(KEY_RIGHT_ALT));
        assert_eq!(held.next(), Some(KEY_LEFT_GUI));
        assert_eq!(held.next(), None);

        let mut held = (KeyFlags::GUI_HELD | KeyFlags::CTRL_HELD).held_modifiers();
        assert_eq!(held.next(), Some(KEY_LEFT_CONTROL));
        assert_eq!(held.next(), Some(KEY_LEFT_GUI));
        assert_eq!(held.next(), None);

        assert_eq!(KeyFlags::NONE.held_modifiers().count(), 0);
    }

    #[test]
    fn test_held_modifiers_follow_bits_only() {
        let flags = KeyFlags::SYNTHETIC | KeyFlags::RESERVED | KeyFlags::SHIFT_HELD;
        let mut held = flags.held_modifiers();
        assert_eq!(held.next(), Some(KEY_LEFT_SHIFT));
        assert_eq!(held.next(), None);

        // IS_SYSCTL shares its bit with CTRL_HELD
        let power = Key::system_control(0x81);
        assert!(power.is_system_control());
        assert!(!power.is_consumer());
        let mut held = power.flags.held_modifiers();
        assert_eq!(held.next(), Some(KEY_LEFT_CONTROL));
        assert_eq!(held.next(), None);
    }

    #[test]
    fn test_consumer_usage() {
        let volume_up = Key::consumer(0x00e9);
        assert!(volume_up.is_consumer());
        assert_eq!(volume_up.key_code, 0xe9);
        assert_eq!(consumer_usage(volume_up), 0x00e9);

        // AC Back uses the high usage bits
        let browser_back = Key::consumer(0x0224);
        assert_eq!(browser_back.key_code, 0x24);
        assert_eq!(consumer_usage(browser_back), 0x0224);
    }

    #[test]
    fn test_raw() {
        let key = Key::new(0x2f, KeyFlags::SHIFT_HELD);
        assert_eq!(key.raw(), 0x082f);
        assert_eq!(
            Key::from_code(0x04).with_flags(KeyFlags::CTRL_HELD).flags,
            KeyFlags::CTRL_HELD
        );
    }

    #[test]
    fn test_connection_mask() {
        let mask = ConnectionMask::USB | ConnectionMask::WIRELESS;
        assert_eq!(mask, ConnectionMask::ALL);
        assert!(mask.contains(ConnectionMask::USB));
        assert!(!ConnectionMask::USB.intersects(ConnectionMask::WIRELESS));
    }
}
