//! Mock EEPROM implementation for testing
//!
//! Provides an in-memory EEPROM for unit tests. Bytes written through the
//! interface land immediately (like a discrete EEPROM part); `commit` is
//! tracked for durability accounting. The device counts the write
//! operations that reach it, which is how the tests observe the store's
//! diff-before-write behavior.

use std::vec::Vec;

use crate::platform::error::EepromError;
use crate::platform::traits::EepromInterface;
use crate::platform::Result;

/// Default capacity, matching the preference region size
const DEFAULT_CAPACITY: u32 = 512;

/// Mock EEPROM implementation
///
/// Supports:
/// - Byte read/write with begin/end window enforcement
/// - Write and commit counting for wear assertions
/// - Corruption injection for marker-validation tests
/// - Forced commit failure for error-path tests
#[derive(Debug)]
pub struct MockEeprom {
    /// Device contents (0xFF is the erased state)
    storage: Vec<u8>,
    /// Size of the currently open window, if any
    open_size: Option<u32>,
    /// Uncommitted writes pending
    dirty: bool,
    /// Number of write operations that reached storage
    write_count: u32,
    /// Number of commits that flushed pending writes
    commit_count: u32,
    /// Force the next commits to fail
    fail_commit: bool,
}

impl MockEeprom {
    /// Create a mock EEPROM with the default 512-byte capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a mock EEPROM with an explicit capacity
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            storage: vec![0xFF; capacity as usize],
            open_size: None,
            dirty: false,
            write_count: 0,
            commit_count: 0,
            fail_commit: false,
        }
    }

    /// Get device contents (for test verification)
    pub fn contents(&self, address: u32, len: usize) -> &[u8] {
        &self.storage[address as usize..address as usize + len]
    }

    /// Overwrite bytes directly, bypassing the interface
    ///
    /// Writes a fixed corrupt pattern to simulate decayed or torn data.
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        for byte in &mut self.storage[address as usize..address as usize + len] {
            *byte = 0xAA;
        }
    }

    /// Number of write operations that reached storage
    pub fn write_count(&self) -> u32 {
        self.write_count
    }

    /// Number of commits that flushed pending writes
    pub fn commit_count(&self) -> u32 {
        self.commit_count
    }

    /// Reset the write and commit counters
    pub fn reset_counters(&mut self) {
        self.write_count = 0;
        self.commit_count = 0;
    }

    /// Make subsequent commits fail
    pub fn set_fail_commit(&mut self, fail: bool) {
        self.fail_commit = fail;
    }

    fn check_access(&self, address: u32) -> Result<()> {
        let size = self.open_size.ok_or(EepromError::NotOpen)?;
        if address >= size {
            return Err(EepromError::InvalidAddress.into());
        }
        Ok(())
    }
}

impl Default for MockEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl EepromInterface for MockEeprom {
    fn begin(&mut self, size: u32) -> Result<()> {
        if size == 0 || size > self.capacity() {
            return Err(EepromError::InvalidAddress.into());
        }
        self.open_size = Some(size);
        Ok(())
    }

    fn read_byte(&mut self, address: u32) -> Result<u8> {
        self.check_access(address)?;
        Ok(self.storage[address as usize])
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        self.check_access(address)?;
        self.storage[address as usize] = value;
        self.write_count += 1;
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.open_size.is_none() {
            return Err(EepromError::NotOpen.into());
        }
        if self.fail_commit {
            return Err(EepromError::CommitFailed.into());
        }
        if self.dirty {
            self.commit_count += 1;
            self.dirty = false;
        }
        Ok(())
    }

    fn end(&mut self) {
        self.open_size = None;
    }

    fn capacity(&self) -> u32 {
        self.storage.len() as u32
    }
}
