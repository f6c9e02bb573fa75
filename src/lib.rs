#![cfg_attr(not(test), no_std)]

//! HID event facade for mechanical keyboard firmware.
//!
//! [Hid] expands composite keys into modifier and base key presses, fans keyboard, consumer and
//! system control events out to registered [EventDispatcher]s, and drives one transport per HID
//! device class. The transports in [keyboard] and [mouse] implement the transport contracts on
//! top of a [HidEndpoint], which [usbd_hid::hid_class::HIDClass] provides.

mod descriptors;
mod endpoint;
mod error;
mod event_dispatcher;
mod hid;
mod hid_report_observer;
mod hid_settings;
mod key;
pub mod keyboard;
pub mod mouse;

pub use descriptors::*;
pub use endpoint::*;
pub use error::*;
pub use event_dispatcher::*;
pub use hid::*;
pub use hid_report_observer::*;
pub use hid_settings::*;
pub use key::*;

/// Re-export of the [usb-device](https://docs.rs/usb-device/latest/usb_device/) library.
pub use usb_device;
/// Re-export of the [usbd-hid](https://docs.rs/usbd-hid/latest/usbd_hid) library.
pub use usbd_hid;
