//! EEPROM interface trait
//!
//! This module defines the byte-addressable persistent storage interface the
//! preference store is built on. Implementations may be a real EEPROM part
//! or an emulation over a flash sector (see
//! [`FlashEeprom`](crate::platform::flash_eeprom::FlashEeprom)).

use crate::platform::Result;

/// EEPROM interface trait
///
/// Access follows a scoped cycle: [`begin`](EepromInterface::begin) opens
/// the region at its configured size, byte operations run inside the
/// window, [`commit`](EepromInterface::commit) makes writes durable, and
/// [`end`](EepromInterface::end) releases the device. Byte operations
/// outside a window fail with `EepromError::NotOpen`.
///
/// # Device Characteristics
///
/// - Storage is byte-addressable; addresses are relative to the start of
///   the preference region, not absolute device addresses.
/// - Writes are buffered until `commit`; an `end` without a `commit` may
///   discard them (emulated devices do, real EEPROM parts may not).
/// - There is no internal locking. A single caller at a time, or external
///   mutual exclusion, is assumed.
pub trait EepromInterface {
    /// Open the region for access
    ///
    /// Sizes the accessible window to `size` bytes starting at address 0.
    /// On emulated devices this reads the backing sector into RAM.
    ///
    /// # Errors
    ///
    /// Returns `EepromError::InvalidAddress` if `size` is zero or exceeds
    /// [`capacity`](EepromInterface::capacity).
    fn begin(&mut self, size: u32) -> Result<()>;

    /// Read one byte
    ///
    /// # Errors
    ///
    /// Returns `EepromError::NotOpen` outside a begin/end window and
    /// `EepromError::InvalidAddress` if `address` is outside the opened
    /// region.
    fn read_byte(&mut self, address: u32) -> Result<u8>;

    /// Write one byte
    ///
    /// The write is not durable until [`commit`](EepromInterface::commit)
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `EepromError::NotOpen` outside a begin/end window and
    /// `EepromError::InvalidAddress` if `address` is outside the opened
    /// region.
    fn write_byte(&mut self, address: u32, value: u8) -> Result<()>;

    /// Flush buffered writes to the device
    ///
    /// A no-op when nothing was written since `begin`.
    ///
    /// # Errors
    ///
    /// Returns `EepromError::CommitFailed` if the device could not be
    /// programmed.
    fn commit(&mut self) -> Result<()>;

    /// Release the region
    ///
    /// Uncommitted writes are discarded on emulated devices.
    fn end(&mut self);

    /// Get total region capacity in bytes
    fn capacity(&self) -> u32;
}
