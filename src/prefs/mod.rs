//! Preference Storage System
//!
//! This module provides the EEPROM-backed preference store for persistent
//! lamp configuration. Every setting owns a fixed slot: a payload (1 byte
//! in the short zone, 33 bytes in the string zone) followed by a 2-byte
//! validity marker that distinguishes "written and intact" from "never
//! written / erased".
//!
//! # Region Layout
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │ Short settings zone        0 - 126         │
//! │   1-byte slots, stride 3:                  │
//! │   mode, red, green, blue, LED invert,      │
//! │   TX power, AP enabled, STA enabled,       │
//! │   reserved slots up to the boundary        │
//! ├────────────────────────────────────────────┤
//! │ String settings zone     128 - 486         │
//! │   33-byte slots, stride 36:                │
//! │   hostname, admin password, AP SSID/PSK,   │
//! │   three STA SSID/PSK pairs                 │
//! └────────────────────────────────────────────┘
//! ```
//!
//! A slot is valid iff the two bytes following its payload equal `b"Ok"`.
//! Saving an empty payload erases the slot (zero-fills payload and marker);
//! that is the only deletion path.
//!
//! # Example
//!
//! ```no_run
//! use moon_prefs::platform::EepromInterface;
//! use moon_prefs::prefs::{PrefStore, PrefValue, Setting};
//!
//! fn boot<E: EepromInterface>(eeprom: E) {
//!     let mut store = PrefStore::new(eeprom);
//!
//!     // Falls back to the compiled-in default until first save
//!     let hostname = store.load_setting_or_default(Setting::Hostname);
//!
//!     store.save_setting(Setting::Mode, &PrefValue::Scalar(2));
//!     let _ = hostname;
//! }
//! ```

pub mod layout;
pub mod store;
pub mod value;

pub use layout::{Setting, SettingFlags, EEPROM_SIZE, MAX_TEXT_LEN};
pub use store::PrefStore;
pub use value::PrefValue;
