use heapless::Vec;

use crate::error::{DispatchError, Error, Result};
use crate::key::ConnectionMask;

/// Result of a single dispatcher notification.
pub type DispatchResult = core::result::Result<(), DispatchError>;

/// Observer notified of keyboard, consumer control and system control events.
///
/// Every method receives the connection mask active at the time of the event, so a dispatcher
/// bound to one transport can ignore events meant for another. All methods default to doing
/// nothing.
pub trait EventDispatcher {
    fn key_press(&mut self, _mask: ConnectionMask, _key_code: u8) -> DispatchResult {
        Ok(())
    }

    fn key_release(&mut self, _mask: ConnectionMask, _key_code: u8) -> DispatchResult {
        Ok(())
    }

    fn key_release_all(&mut self, _mask: ConnectionMask) -> DispatchResult {
        Ok(())
    }

    fn key_send_report(&mut self, _mask: ConnectionMask) -> DispatchResult {
        Ok(())
    }

    fn consumer_press(&mut self, _mask: ConnectionMask, _usage: u16) -> DispatchResult {
        Ok(())
    }

    fn consumer_release(&mut self, _mask: ConnectionMask, _usage: u16) -> DispatchResult {
        Ok(())
    }

    fn system_press(&mut self, _mask: ConnectionMask, _code: u8) -> DispatchResult {
        Ok(())
    }

    fn system_release(&mut self, _mask: ConnectionMask, _code: u8) -> DispatchResult {
        Ok(())
    }
}

/// Ordered, fixed-capacity registry of [EventDispatcher]s.
///
/// Populated during initialization, then only iterated. Dispatchers are notified in the order
/// they were registered.
pub struct Dispatchers<'a, const N: usize> {
    dispatchers: Vec<&'a mut dyn EventDispatcher, N>,
}

impl<'a, const N: usize> Dispatchers<'a, N> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            dispatchers: Vec::new(),
        }
    }

    /// Appends a dispatcher to the registry.
    pub fn register(&mut self, dispatcher: &'a mut dyn EventDispatcher) -> Result<()> {
        self.dispatchers
            .push(dispatcher)
            .map_err(|_| Error::RegistryFull)
    }

    pub fn len(&self) -> usize {
        self.dispatchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatchers.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Calls `notify` on every dispatcher, in registration order.
    ///
    /// A failing dispatcher does not stop the remaining ones from being notified. Returns the
    /// number of dispatchers that failed.
    pub fn apply<F>(&mut self, mut notify: F) -> usize
    where
        F: FnMut(&mut dyn EventDispatcher) -> DispatchResult,
    {
        let mut failures = 0;

        for (_index, dispatcher) in self.dispatchers.iter_mut().enumerate() {
            if let Err(_err) = notify(&mut **dispatcher) {
                #[cfg(feature = "defmt")]
                defmt::warn!("event dispatcher {} failed: {}", _index, _err);
                failures += 1;
            }
        }

        failures
    }
}

impl<const N: usize> Default for Dispatchers<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
