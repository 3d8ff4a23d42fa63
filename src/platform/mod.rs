//! Platform abstraction layer
//!
//! This module isolates all device access behind traits. The preference
//! store only talks to an [`EepromInterface`]; boards without a true EEPROM
//! use [`FlashEeprom`], which emulates one on top of a [`FlashInterface`]
//! sector. Concrete HAL bindings live in the consuming firmware.

pub mod error;
pub mod traits;

// EEPROM emulation over a flash sector (hardware-independent)
pub mod flash_eeprom;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{EepromError, FlashError, PlatformError, Result};
pub use flash_eeprom::FlashEeprom;
pub use traits::{EepromInterface, FlashInterface};
