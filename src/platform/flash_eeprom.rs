//! EEPROM emulation over a flash sector
//!
//! ESP-class modules have no discrete EEPROM; the preference region is one
//! reserved flash sector shadowed in RAM. [`begin`](EepromInterface::begin)
//! reads the sector into the shadow buffer, byte operations run against the
//! shadow, and [`commit`](EepromInterface::commit) erases and reprograms the
//! sector only when a byte actually changed. An
//! [`end`](EepromInterface::end) without a commit discards pending writes.

use heapless::Vec;

use crate::platform::error::{EepromError, PlatformError};
use crate::platform::traits::{EepromInterface, FlashInterface};
use crate::platform::Result;

/// Largest supported sector shadow (one 4 KB flash sector)
pub const SECTOR_SHADOW_MAX: usize = 4096;

/// EEPROM emulation over one flash sector
///
/// `base` is the absolute flash address of the reserved sector; EEPROM
/// addresses handed to the byte operations are relative to it. `base` must
/// be block-aligned so the sector can be erased independently.
pub struct FlashEeprom<F: FlashInterface> {
    flash: F,
    base: u32,
    /// RAM shadow of the sector; empty outside a begin/end window
    shadow: Vec<u8, SECTOR_SHADOW_MAX>,
    dirty: bool,
}

impl<F: FlashInterface> FlashEeprom<F> {
    /// Create an EEPROM emulation on the sector starting at `base`
    pub fn new(flash: F, base: u32) -> Self {
        Self {
            flash,
            base,
            shadow: Vec::new(),
            dirty: false,
        }
    }

    /// Consume the emulation and return the underlying flash device
    pub fn into_inner(self) -> F {
        self.flash
    }
}

impl<F: FlashInterface> EepromInterface for FlashEeprom<F> {
    fn begin(&mut self, size: u32) -> Result<()> {
        if size == 0 || size > self.capacity() {
            return Err(EepromError::InvalidAddress.into());
        }
        if !(self.base).is_multiple_of(self.flash.block_size()) {
            return Err(PlatformError::InvalidConfig);
        }

        self.shadow.clear();
        self.shadow
            .resize(size as usize, 0)
            .map_err(|_| PlatformError::InvalidConfig)?;
        self.flash.read(self.base, &mut self.shadow)?;
        self.dirty = false;
        Ok(())
    }

    fn read_byte(&mut self, address: u32) -> Result<u8> {
        if self.shadow.is_empty() {
            return Err(EepromError::NotOpen.into());
        }
        self.shadow
            .get(address as usize)
            .copied()
            .ok_or_else(|| EepromError::InvalidAddress.into())
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        if self.shadow.is_empty() {
            return Err(EepromError::NotOpen.into());
        }
        let byte = self
            .shadow
            .get_mut(address as usize)
            .ok_or(EepromError::InvalidAddress)?;
        if *byte != value {
            *byte = value;
            self.dirty = true;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.shadow.is_empty() {
            return Err(EepromError::NotOpen.into());
        }
        if !self.dirty {
            return Ok(());
        }

        // Whole-sector erase: flash bits only clear, so the sector must be
        // reset before the shadow is programmed back.
        let block_size = self.flash.block_size();
        self.flash.erase(self.base, block_size)?;
        self.flash.write(self.base, &self.shadow)?;
        self.dirty = false;
        Ok(())
    }

    fn end(&mut self) {
        self.shadow.clear();
        self.dirty = false;
    }

    fn capacity(&self) -> u32 {
        self.flash.block_size().min(SECTOR_SHADOW_MAX as u32)
    }
}
