use usbd_hid::hid_class::{HidClassSettings, HidCountryCode, HidProtocol, HidSubClass, ProtocolModeConfig};

use crate::keyboard::boot::BootKeyboardReport;
use crate::keyboard::consumer::ConsumerReport;
use crate::keyboard::nkro::NkroKeyboardReport;
use crate::mouse::absolute::AbsoluteMouseReport;
use crate::mouse::MouseReport;

/// Report ids, numbered after the composite device layout the reports come from.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HIDReportId {
    Mouse = 1,
    Keyboard = 2,
    ConsumerControl = 4,
    SystemControl = 5,
    MouseAbsolute = 7,
    NKROKeyboard = 8,
}

/// A report as it was pushed to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HIDReport {
    Keyboard(BootKeyboardReport),
    NKROKeyboard(NkroKeyboardReport),
    ConsumerControl(ConsumerReport),
    SystemControl(u8),
    Mouse(MouseReport),
    MouseAbsolute(AbsoluteMouseReport),
}

impl HIDReport {
    /// Gets the [HIDReportId] matching the report type.
    pub const fn id(&self) -> HIDReportId {
        match self {
            Self::Keyboard(_) => HIDReportId::Keyboard,
            Self::NKROKeyboard(_) => HIDReportId::NKROKeyboard,
            Self::ConsumerControl(_) => HIDReportId::ConsumerControl,
            Self::SystemControl(_) => HIDReportId::SystemControl,
            Self::Mouse(_) => HIDReportId::Mouse,
            Self::MouseAbsolute(_) => HIDReportId::MouseAbsolute,
        }
    }
}

// Polling interval for the host to check USB device reports.
// Higher interval results in better power usage, but slower response time.
// Lower interval results in faster response times, and more power consumption.
pub const POLL_MS: u8 = if cfg!(feature = "high-performance") {
    10
} else if cfg!(feature = "best-effort") {
    255
} else {
    128
};

/// Gets the keyboard locale selected by the locale cargo features.
pub const fn keyboard_locale() -> HidCountryCode {
    if cfg!(feature = "arabic") {
        HidCountryCode::Arabic
    } else if cfg!(feature = "belgian") {
        HidCountryCode::Belgian
    } else if cfg!(feature = "canadian-bilingual") {
        HidCountryCode::CanadianBilingual
    } else if cfg!(feature = "canadian-french") {
        HidCountryCode::CanadianFrench
    } else if cfg!(feature = "czech") {
        HidCountryCode::CzechRepublic
    } else if cfg!(feature = "danish") {
        HidCountryCode::Danish
    } else if cfg!(feature = "finnish") {
        HidCountryCode::Finnish
    } else if cfg!(feature = "french") {
        HidCountryCode::French
    } else if cfg!(feature = "german") {
        HidCountryCode::German
    } else if cfg!(feature = "greek") {
        HidCountryCode::Greek
    } else if cfg!(feature = "hebrew") {
        HidCountryCode::Hebrew
    } else if cfg!(feature = "hungary") {
        HidCountryCode::Hungary
    } else if cfg!(feature = "international") {
        HidCountryCode::InternationalISO
    } else if cfg!(feature = "italian") {
        HidCountryCode::Italian
    } else if cfg!(feature = "japanese") {
        HidCountryCode::JapanKatakana
    } else if cfg!(feature = "korean") {
        HidCountryCode::Korean
    } else if cfg!(feature = "latin-america") {
        HidCountryCode::LatinAmerica
    } else if cfg!(feature = "netherlands") {
        HidCountryCode::NetherlandsDutch
    } else if cfg!(feature = "norwegian") {
        HidCountryCode::Norwegian
    } else if cfg!(feature = "farsi") {
        HidCountryCode::PersianFarsi
    } else if cfg!(feature = "poland") {
        HidCountryCode::Poland
    } else if cfg!(feature = "portuguese") {
        HidCountryCode::Portuguese
    } else if cfg!(feature = "russia") {
        HidCountryCode::Russia
    } else if cfg!(feature = "slovakia") {
        HidCountryCode::Slovakia
    } else if cfg!(feature = "spanish") {
        HidCountryCode::Spanish
    } else if cfg!(feature = "swedish") {
        HidCountryCode::Swedish
    } else if cfg!(feature = "swiss-french") {
        HidCountryCode::SwissFrench
    } else if cfg!(feature = "swiss-german") {
        HidCountryCode::SwissGerman
    } else if cfg!(feature = "switzerland") {
        HidCountryCode::Switzerland
    } else if cfg!(feature = "taiwan") {
        HidCountryCode::Taiwan
    } else if cfg!(feature = "turkish-q") {
        HidCountryCode::TurkishQ
    } else if cfg!(feature = "uk") {
        HidCountryCode::UK
    } else if cfg!(feature = "us") {
        HidCountryCode::US
    } else if cfg!(feature = "yugoslavia") {
        HidCountryCode::Yugoslavia
    } else if cfg!(feature = "turkish-f") {
        HidCountryCode::TurkishF
    } else {
        HidCountryCode::NotSupported
    }
}

/// Class settings for the boot protocol keyboard.
pub const fn boot_keyboard_settings() -> HidClassSettings {
    HidClassSettings {
        subclass: HidSubClass::Boot,
        protocol: HidProtocol::Keyboard,
        config: ProtocolModeConfig::ForceBoot,
        locale: keyboard_locale(),
    }
}

/// Class settings for the NKRO (report protocol) keyboard.
pub const fn nkro_keyboard_settings() -> HidClassSettings {
    HidClassSettings {
        subclass: HidSubClass::NoSubClass,
        protocol: HidProtocol::Keyboard,
        config: ProtocolModeConfig::DefaultBehavior,
        locale: keyboard_locale(),
    }
}

/// Class settings for report-only devices (consumer control, system control, mice).
pub const fn generic_settings(protocol: HidProtocol) -> HidClassSettings {
    HidClassSettings {
        subclass: HidSubClass::NoSubClass,
        protocol,
        config: ProtocolModeConfig::DefaultBehavior,
        locale: HidCountryCode::NotSupported,
    }
}
