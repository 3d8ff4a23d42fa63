#![cfg_attr(not(test), no_std)]

//! moon_prefs - EEPROM preference storage for the Moonlight WiFi lamp
//!
//! This library provides the persistent preference store used by the lamp
//! firmware: a fixed register layout in EEPROM (or an EEPROM emulation over
//! a flash sector) holding scalar and string settings, each guarded by a
//! two-byte validity marker. WiFi setup, the admin interface, LED driving,
//! and OTA update are consumers of this store and live in the firmware.

// Platform abstraction layer (device traits, flash-backed EEPROM, mocks)
pub mod platform;

// Preference storage (register layout, typed values, load/save)
pub mod prefs;

// Note: Logging macros (log_info!, log_warn!, log_error!, log_debug!)
// are exported at crate root via #[macro_export] in logging
pub mod logging;
