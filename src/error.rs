//! Error types for the HID facade.
//!
//! Transports report failures with [usb_device::UsbError], the facade wraps them in [Error].
//! Dispatcher failures use [DispatchError] and never leave the fan-out loop.

use core::fmt;

use usb_device::UsbError;

/// Convenience alias for facade results.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by facade operations.
#[derive(Debug)]
pub enum Error {
    /// The underlying USB stack rejected a report.
    Usb(UsbError),
    /// The dispatcher registry has no free slot left.
    RegistryFull,
}

impl From<UsbError> for Error {
    fn from(err: UsbError) -> Self {
        Self::Usb(err)
    }
}

// UsbError only implements Debug, so USB errors compare by variant.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Usb(a), Self::Usb(b)) => {
                core::mem::discriminant(a) == core::mem::discriminant(b)
            }
            (Self::RegistryFull, Self::RegistryFull) => true,
            _ => false,
        }
    }
}

impl Eq for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usb(err) => write!(f, "USB error: {err:?}"),
            Self::RegistryFull => f.write_str("event dispatcher registry is full"),
        }
    }
}

/// Failure reported by an [EventDispatcher](crate::EventDispatcher).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// The dispatcher's transport is not connected or not configured yet.
    NotReady,
    /// The dispatcher could not queue the event.
    BufferFull,
    /// The dispatcher refused the event.
    Rejected,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => f.write_str("dispatcher not ready"),
            Self::BufferFull => f.write_str("dispatcher buffer full"),
            Self::Rejected => f.write_str("dispatcher rejected the event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usb_errors_convert() {
        let err: Error = UsbError::WouldBlock.into();
        assert_eq!(err, Error::Usb(UsbError::WouldBlock));
        assert_ne!(err, Error::Usb(UsbError::BufferOverflow));
        assert_ne!(err, Error::RegistryFull);
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::RegistryFull.to_string(),
            "event dispatcher registry is full"
        );
        assert_eq!(
            Error::Usb(UsbError::WouldBlock).to_string(),
            "USB error: WouldBlock"
        );
        assert_eq!(DispatchError::NotReady.to_string(), "dispatcher not ready");
    }
}
