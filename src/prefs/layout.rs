//! EEPROM register layout
//!
//! The compile-time address map: every named setting is assigned a fixed
//! slot offset, derived once by chaining strides. Offsets are a persisted
//! contract — a slot address must never be reassigned to a different
//! logical setting while devices in the field hold data.
//!
//! The short zone packs 1-byte slots and keeps room for future scalar
//! settings, so the string zone starts at a fixed boundary and adding a
//! scalar never shifts the longer slots.

use bitflags::bitflags;
use heapless::String;

use crate::prefs::value::PrefValue;

/// Total preference region size in bytes
///
/// Can safely grow, but never shrink below the end of the last slot.
pub const EEPROM_SIZE: u32 = 512;

/// Validity marker length in bytes
pub const MARKER_LEN: u32 = 2;

/// Marker content for a validly written slot
pub const VALID_MARKER: [u8; 2] = *b"Ok";

/// Short-slot stride: 1 payload byte + marker
pub const SLOT_STRIDE: u32 = 1 + MARKER_LEN;

/// Maximum text length in characters (an md5 hex digest fits exactly)
pub const MAX_TEXT_LEN: usize = 32;

/// Text payload width: characters + NUL terminator
pub const TEXT_WIDTH: u32 = MAX_TEXT_LEN as u32 + 1;

/// Text-slot stride: payload + marker + 1 spare byte
pub const TEXT_STRIDE: u32 = TEXT_WIDTH + SLOT_STRIDE;

/// Zone boundary: addresses below it are 1-byte slots, at or above it
/// 33-byte text slots
pub const SHORT_ZONE_END: u32 = 127;

// Short settings zone
pub const MODE_ADDR: u32 = 0;
pub const RED_ADDR: u32 = MODE_ADDR + SLOT_STRIDE; // 3
pub const GREEN_ADDR: u32 = RED_ADDR + SLOT_STRIDE; // 6
pub const BLUE_ADDR: u32 = GREEN_ADDR + SLOT_STRIDE; // 9
pub const LED_INVERT_ADDR: u32 = BLUE_ADDR + SLOT_STRIDE; // 12
pub const TX_POWER_ADDR: u32 = LED_INVERT_ADDR + SLOT_STRIDE; // 15
pub const AP_ENABLED_ADDR: u32 = TX_POWER_ADDR + SLOT_STRIDE; // 18
pub const STA_ENABLED_ADDR: u32 = AP_ENABLED_ADDR + SLOT_STRIDE; // 21
// Slots 24..127 are reserved for future scalar settings.

// String settings zone
pub const HOSTNAME_ADDR: u32 = SHORT_ZONE_END + 1; // 128
pub const ADMIN_PASSWORD_ADDR: u32 = HOSTNAME_ADDR + TEXT_STRIDE; // 164
pub const AP_SSID_ADDR: u32 = ADMIN_PASSWORD_ADDR + TEXT_STRIDE; // 200
pub const AP_PSK_ADDR: u32 = AP_SSID_ADDR + TEXT_STRIDE; // 236
pub const STA_SSID_0_ADDR: u32 = AP_PSK_ADDR + TEXT_STRIDE; // 272
pub const STA_PSK_0_ADDR: u32 = STA_SSID_0_ADDR + TEXT_STRIDE; // 308
pub const STA_SSID_1_ADDR: u32 = STA_PSK_0_ADDR + TEXT_STRIDE; // 344
pub const STA_PSK_1_ADDR: u32 = STA_SSID_1_ADDR + TEXT_STRIDE; // 380
pub const STA_SSID_2_ADDR: u32 = STA_PSK_1_ADDR + TEXT_STRIDE; // 416
pub const STA_PSK_2_ADDR: u32 = STA_SSID_2_ADDR + TEXT_STRIDE; // 452

/// Slot payload width for an address, derived from its zone
pub const fn slot_width(address: u32) -> u32 {
    if address < SHORT_ZONE_END {
        1
    } else {
        TEXT_WIDTH
    }
}

bitflags! {
    /// Setting attribute flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SettingFlags: u8 {
        /// Value is a credential; log it redacted
        const SECRET = 0b0000_0001;
    }
}

/// Named settings of the lamp firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// Active light mode
    Mode,
    /// Red channel level
    Red,
    /// Green channel level
    Green,
    /// Blue channel level
    Blue,
    /// Invert LED drive (common-anode wiring)
    LedInvert,
    /// WiFi TX power (0-20)
    TxPower,
    /// Start the access point at boot
    ApEnabled,
    /// Join a stored network at boot
    StaEnabled,
    /// DHCP/OTA hostname
    Hostname,
    /// Admin password (md5 hex digest)
    AdminPassword,
    /// Access point SSID
    ApSsid,
    /// Access point passphrase
    ApPsk,
    /// Stored network 0 SSID
    StaSsid0,
    /// Stored network 0 passphrase
    StaPsk0,
    /// Stored network 1 SSID
    StaSsid1,
    /// Stored network 1 passphrase
    StaPsk1,
    /// Stored network 2 SSID
    StaSsid2,
    /// Stored network 2 passphrase
    StaPsk2,
}

/// All defined settings, in address order
pub const SETTINGS: [Setting; 18] = [
    Setting::Mode,
    Setting::Red,
    Setting::Green,
    Setting::Blue,
    Setting::LedInvert,
    Setting::TxPower,
    Setting::ApEnabled,
    Setting::StaEnabled,
    Setting::Hostname,
    Setting::AdminPassword,
    Setting::ApSsid,
    Setting::ApPsk,
    Setting::StaSsid0,
    Setting::StaPsk0,
    Setting::StaSsid1,
    Setting::StaPsk1,
    Setting::StaSsid2,
    Setting::StaPsk2,
];

impl Setting {
    /// Slot offset in the preference region
    pub const fn offset(self) -> u32 {
        match self {
            Setting::Mode => MODE_ADDR,
            Setting::Red => RED_ADDR,
            Setting::Green => GREEN_ADDR,
            Setting::Blue => BLUE_ADDR,
            Setting::LedInvert => LED_INVERT_ADDR,
            Setting::TxPower => TX_POWER_ADDR,
            Setting::ApEnabled => AP_ENABLED_ADDR,
            Setting::StaEnabled => STA_ENABLED_ADDR,
            Setting::Hostname => HOSTNAME_ADDR,
            Setting::AdminPassword => ADMIN_PASSWORD_ADDR,
            Setting::ApSsid => AP_SSID_ADDR,
            Setting::ApPsk => AP_PSK_ADDR,
            Setting::StaSsid0 => STA_SSID_0_ADDR,
            Setting::StaPsk0 => STA_PSK_0_ADDR,
            Setting::StaSsid1 => STA_SSID_1_ADDR,
            Setting::StaPsk1 => STA_PSK_1_ADDR,
            Setting::StaSsid2 => STA_SSID_2_ADDR,
            Setting::StaPsk2 => STA_PSK_2_ADDR,
        }
    }

    /// Whether the slot lives in the string zone
    pub const fn is_text(self) -> bool {
        self.offset() >= SHORT_ZONE_END
    }

    /// Slot payload width in bytes
    pub const fn width(self) -> u32 {
        slot_width(self.offset())
    }

    /// Setting name for logs and diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Setting::Mode => "MODE",
            Setting::Red => "RED",
            Setting::Green => "GREEN",
            Setting::Blue => "BLUE",
            Setting::LedInvert => "LED_INVERT",
            Setting::TxPower => "TX_POWER",
            Setting::ApEnabled => "AP_ENABLED",
            Setting::StaEnabled => "STA_ENABLED",
            Setting::Hostname => "HOSTNAME",
            Setting::AdminPassword => "ADMIN_PASS",
            Setting::ApSsid => "AP_SSID",
            Setting::ApPsk => "AP_PSK",
            Setting::StaSsid0 => "STA_SSID_0",
            Setting::StaPsk0 => "STA_PSK_0",
            Setting::StaSsid1 => "STA_SSID_1",
            Setting::StaPsk1 => "STA_PSK_1",
            Setting::StaSsid2 => "STA_SSID_2",
            Setting::StaPsk2 => "STA_PSK_2",
        }
    }

    /// Attribute flags
    pub fn flags(self) -> SettingFlags {
        match self {
            Setting::AdminPassword
            | Setting::ApPsk
            | Setting::StaPsk0
            | Setting::StaPsk1
            | Setting::StaPsk2 => SettingFlags::SECRET,
            _ => SettingFlags::empty(),
        }
    }

    /// Compiled-in default, used when no valid preference is stored
    pub fn default_value(self) -> PrefValue {
        match self {
            Setting::Mode => PrefValue::Scalar(0),
            Setting::Red | Setting::Green | Setting::Blue => PrefValue::Scalar(255),
            // Common-anode wiring drives the LED inverted
            Setting::LedInvert => PrefValue::Scalar(1),
            Setting::TxPower => PrefValue::Scalar(1),
            Setting::ApEnabled => PrefValue::Scalar(1),
            Setting::StaEnabled => PrefValue::Scalar(0),
            Setting::Hostname => text_default("moon"),
            // md5("admin"); replaced on first password change
            Setting::AdminPassword => text_default("21232f297a57a5a743894a0e4a801fc3"),
            Setting::ApSsid => text_default("Moonlight"),
            Setting::ApPsk
            | Setting::StaSsid0
            | Setting::StaPsk0
            | Setting::StaSsid1
            | Setting::StaPsk1
            | Setting::StaSsid2
            | Setting::StaPsk2 => PrefValue::Text(String::new()),
        }
    }
}

fn text_default(s: &str) -> PrefValue {
    PrefValue::Text(String::try_from(s).unwrap_or_default())
}
