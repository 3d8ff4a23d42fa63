//! Flash interface trait
//!
//! This module defines the raw flash interface backing the EEPROM
//! emulation. Boards without a discrete EEPROM reserve one flash sector for
//! preference storage and access it through this trait.
//!
//! # Flash Characteristics
//!
//! - Flash is organized in blocks (typically 4 KB sectors)
//! - Erase operations set all bytes to 0xFF
//! - Write operations can only change bits from 1 to 0 (erase first to
//!   reset them)
//! - Erase and write are blocking and can take 100ms+
//!
//! # Safety Invariants
//!
//! - Only one owner per flash instance (no concurrent access)
//! - Implementations must validate addresses so the firmware region cannot
//!   be erased or written

use crate::platform::Result;

/// Flash interface trait
pub trait FlashInterface {
    /// Read data from flash
    ///
    /// Reads `buf.len()` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns `FlashError::InvalidAddress` if the range is out of bounds.
    /// Returns `FlashError::ReadFailed` if the read operation fails.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Write data to flash
    ///
    /// The target range must have been erased; writing only clears bits.
    ///
    /// # Errors
    ///
    /// Returns `FlashError::InvalidAddress` if the range is out of bounds
    /// or inside a protected region.
    /// Returns `FlashError::WriteFailed` if the write operation fails.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase a flash region
    ///
    /// Sets all bytes in the region to 0xFF. `address` must be
    /// block-aligned and `size` a multiple of
    /// [`block_size`](FlashInterface::block_size).
    ///
    /// # Errors
    ///
    /// Returns `FlashError::InvalidAddress` on misalignment, out-of-bounds,
    /// or protected-region targets.
    /// Returns `FlashError::EraseFailed` if the erase operation fails.
    fn erase(&mut self, address: u32, size: u32) -> Result<()>;

    /// Get the minimum erasable unit size in bytes
    fn block_size(&self) -> u32;

    /// Get total flash capacity in bytes
    fn capacity(&self) -> u32;
}
