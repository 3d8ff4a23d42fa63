//! Preference store
//!
//! Durably persists and retrieves fixed-width settings by slot address.
//! Every access runs inside a scoped device window (open at the configured
//! region size, operate, commit if mutating, release on every exit path),
//! and payload bytes are only written when they differ from what the device
//! already holds, to limit wear on the flash-backed medium.
//!
//! The byte-level operations [`load`](PrefStore::load) and
//! [`save`](PrefStore::save) report success as a boolean: a missing or
//! invalid marker is a normal negative result, not an error. The typed
//! layer ([`load_setting`](PrefStore::load_setting) and friends) wraps them
//! for the rest of the firmware.

use crate::platform::traits::EepromInterface;
use crate::platform::Result;
use crate::prefs::layout::{
    slot_width, Setting, SettingFlags, EEPROM_SIZE, MARKER_LEN, TEXT_WIDTH, VALID_MARKER,
};
use crate::prefs::value::PrefValue;
use crate::{log_debug, log_error, log_info, log_warn};

/// Preference store over an EEPROM device
///
/// Owns its device; access is single-threaded, callers on multiple tasks
/// must serialize externally.
pub struct PrefStore<E: EepromInterface> {
    eeprom: E,
}

impl<E: EepromInterface> PrefStore<E> {
    /// Create a store over `eeprom`
    pub fn new(eeprom: E) -> Self {
        Self { eeprom }
    }

    /// Consume the store and return the device
    pub fn into_inner(self) -> E {
        self.eeprom
    }

    /// Load the slot at `address` into `out`
    ///
    /// `out` must be at least the slot width (1 byte in the short zone,
    /// [`TEXT_WIDTH`] in the string zone). Returns `false` and leaves `out`
    /// untouched when no valid preference is stored there; on success text
    /// payloads are copied up to and including their NUL terminator.
    pub fn load(&mut self, address: u32, out: &mut [u8]) -> bool {
        let width = slot_width(address);
        if out.len() < width as usize {
            log_error!("load buffer too small for slot at address {}", address);
            return false;
        }

        match self.with_eeprom(|ee| read_slot(ee, address, width, out)) {
            Ok(true) => {
                log_debug!("loaded setting at address {}", address);
                true
            }
            Ok(false) => {
                log_info!("no valid preference stored at address {}", address);
                false
            }
            Err(e) => {
                log_error!("EEPROM read failed at address {}: {}", address, e);
                false
            }
        }
    }

    /// Save `data` into the slot at `address`
    ///
    /// Short-zone slots consume exactly 1 byte. String-zone slots take the
    /// NUL-terminated prefix of `data`, capped at the slot width; trailing
    /// bytes up to the width boundary are zero-filled so no residue of a
    /// longer previous value survives. An empty payload (empty `data`, or a
    /// leading NUL on a string slot) erases the slot instead — payload and
    /// marker are zero-filled, leaving it invalid.
    ///
    /// Returns `true` only after the device commit succeeded.
    pub fn save(&mut self, address: u32, data: &[u8]) -> bool {
        let width = slot_width(address);
        let payload_len = payload_len(width, data);

        let result = self.with_eeprom(|ee| {
            if payload_len == 0 {
                erase_slot(ee, address, width)?;
            } else {
                write_slot(ee, address, width, data, payload_len)?;
            }
            ee.commit()
        });

        match result {
            Ok(()) if payload_len == 0 => {
                log_info!("erased preference stored at address {}", address);
                true
            }
            Ok(()) => {
                log_debug!("saved setting at address {}", address);
                true
            }
            Err(e) => {
                log_error!("EEPROM write failed at address {}: {}", address, e);
                false
            }
        }
    }

    /// Load a named setting as a typed value
    ///
    /// `None` when nothing valid is stored, or when a stored text payload
    /// cannot be decoded.
    pub fn load_setting(&mut self, setting: Setting) -> Option<PrefValue> {
        let width = setting.width() as usize;
        let mut buf = [0u8; TEXT_WIDTH as usize];
        if !self.load(setting.offset(), &mut buf[..width]) {
            return None;
        }

        let value = if setting.is_text() {
            match PrefValue::decode_text(&buf[..width]) {
                Some(v) => v,
                None => {
                    log_warn!("stored text for {} failed to decode", setting.name());
                    return None;
                }
            }
        } else {
            PrefValue::Scalar(buf[0])
        };

        log_value(setting, &value, "loaded");
        Some(value)
    }

    /// Load a named setting, falling back to its compiled-in default
    pub fn load_setting_or_default(&mut self, setting: Setting) -> PrefValue {
        self.load_setting(setting)
            .unwrap_or_else(|| setting.default_value())
    }

    /// Save a named setting from a typed value
    ///
    /// A value from the wrong zone (scalar for a string slot or vice versa)
    /// is rejected. Saving an empty text erases the slot.
    pub fn save_setting(&mut self, setting: Setting, value: &PrefValue) -> bool {
        if value.is_text() != setting.is_text() {
            log_error!("value type does not match the slot zone of {}", setting.name());
            return false;
        }

        let mut buf = [0u8; TEXT_WIDTH as usize];
        let len = value.encode(&mut buf);
        let saved = self.save(setting.offset(), &buf[..len]);
        if saved {
            log_value(setting, value, "saved");
        }
        saved
    }

    /// Erase a named setting, returning its slot to the unwritten state
    pub fn erase_setting(&mut self, setting: Setting) -> bool {
        self.save(setting.offset(), &[])
    }

    /// Run `f` inside a scoped device window
    ///
    /// The device is opened at the configured region size and released on
    /// every exit path, including failures inside `f`.
    fn with_eeprom<T>(&mut self, f: impl FnOnce(&mut E) -> Result<T>) -> Result<T> {
        self.eeprom.begin(EEPROM_SIZE)?;
        let result = f(&mut self.eeprom);
        self.eeprom.end();
        result
    }
}

/// Logical payload length for a save: 1 for scalar slots, text length
/// including the terminator for string slots, 0 when the input resolves
/// empty (which erases the slot)
fn payload_len(width: u32, data: &[u8]) -> usize {
    if data.is_empty() {
        return 0;
    }
    if width == 1 {
        return 1;
    }
    let chars = data
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(data.len())
        .min(width as usize - 1);
    if chars == 0 {
        0
    } else {
        chars + 1
    }
}

/// Diff-before-write: skip the device write when the stored byte already
/// matches the new value
fn write_byte_if_changed<E: EepromInterface>(ee: &mut E, address: u32, value: u8) -> Result<()> {
    if ee.read_byte(address)? != value {
        ee.write_byte(address, value)?;
    }
    Ok(())
}

fn read_slot<E: EepromInterface>(
    ee: &mut E,
    address: u32,
    width: u32,
    out: &mut [u8],
) -> Result<bool> {
    let mut marker = [0u8; MARKER_LEN as usize];
    for (i, byte) in marker.iter_mut().enumerate() {
        *byte = ee.read_byte(address + width + i as u32)?;
    }
    if marker != VALID_MARKER {
        return Ok(false);
    }

    for i in 0..width {
        let byte = ee.read_byte(address + i)?;
        out[i as usize] = byte;
        if width > 1 && byte == 0 {
            break;
        }
    }
    Ok(true)
}

fn write_slot<E: EepromInterface>(
    ee: &mut E,
    address: u32,
    width: u32,
    data: &[u8],
    payload_len: usize,
) -> Result<()> {
    // Full slot image: payload, terminator, and zero tail in one place, so
    // shorter overwrites clear every stale byte through the same diff loop.
    let mut image = [0u8; TEXT_WIDTH as usize];
    if width == 1 {
        image[0] = data[0];
    } else {
        let chars = payload_len - 1;
        image[..chars].copy_from_slice(&data[..chars]);
    }

    for i in 0..width {
        write_byte_if_changed(ee, address + i, image[i as usize])?;
    }
    for (i, &byte) in VALID_MARKER.iter().enumerate() {
        write_byte_if_changed(ee, address + width + i as u32, byte)?;
    }
    Ok(())
}

fn erase_slot<E: EepromInterface>(ee: &mut E, address: u32, width: u32) -> Result<()> {
    for i in 0..width + MARKER_LEN {
        write_byte_if_changed(ee, address + i, 0)?;
    }
    Ok(())
}

fn log_value(setting: Setting, value: &PrefValue, verb: &str) {
    if setting.flags().contains(SettingFlags::SECRET) {
        log_debug!("{} {} (redacted)", verb, setting.name());
        return;
    }
    match value {
        PrefValue::Scalar(v) => log_debug!("{} {}: {}", verb, setting.name(), v),
        PrefValue::Text(s) => log_debug!("{} {}: {}", verb, setting.name(), s.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockEeprom, MockFlash};
    use crate::platform::FlashEeprom;
    use crate::prefs::layout::{
        ADMIN_PASSWORD_ADDR, HOSTNAME_ADDR, MODE_ADDR, STA_ENABLED_ADDR, STA_PSK_2_ADDR,
    };

    fn store() -> PrefStore<MockEeprom> {
        PrefStore::new(MockEeprom::new())
    }

    #[test]
    fn test_round_trip_scalar() {
        let mut store = store();
        assert!(store.save(MODE_ADDR, &[0x05]));

        let mut out = [0u8; 1];
        assert!(store.load(MODE_ADDR, &mut out));
        assert_eq!(out[0], 0x05);

        // Payload at the slot offset, sentinel right behind it
        let ee = store.into_inner();
        assert_eq!(ee.contents(MODE_ADDR, 3), &[0x05, b'O', b'k']);
    }

    #[test]
    fn test_round_trip_text() {
        let mut store = store();
        assert!(store.save(HOSTNAME_ADDR, b"wifi\0"));

        let mut out = [0u8; TEXT_WIDTH as usize];
        assert!(store.load(HOSTNAME_ADDR, &mut out));
        assert_eq!(&out[..5], b"wifi\0");

        let ee = store.into_inner();
        assert_eq!(ee.contents(HOSTNAME_ADDR, 5), b"wifi\0");
        assert_eq!(ee.contents(HOSTNAME_ADDR + TEXT_WIDTH, 2), b"Ok");
    }

    #[test]
    fn test_absence() {
        let mut store = store();
        let mut out = [0xEEu8; TEXT_WIDTH as usize];
        assert!(!store.load(HOSTNAME_ADDR, &mut out));
        // Buffer untouched on a negative result
        assert!(out.iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn test_erase_idempotence() {
        let mut store = store();
        assert!(store.save(HOSTNAME_ADDR, b"wifi\0"));
        assert!(store.save(HOSTNAME_ADDR, b""));

        let mut out = [0u8; TEXT_WIDTH as usize];
        assert!(!store.load(HOSTNAME_ADDR, &mut out));

        // A second erase is a no-op at the device level
        let ee = store.into_inner();
        let writes_after_first = ee.write_count();
        let mut store = PrefStore::new(ee);
        assert!(store.save(HOSTNAME_ADDR, b""));
        assert!(!store.load(HOSTNAME_ADDR, &mut out));
        assert_eq!(store.into_inner().write_count(), writes_after_first);
    }

    #[test]
    fn test_shrink_leaves_no_residue() {
        let mut store = store();
        assert!(store.save(HOSTNAME_ADDR, b"a-much-longer-hostname\0"));
        assert!(store.save(HOSTNAME_ADDR, b"moon\0"));

        let mut out = [0u8; TEXT_WIDTH as usize];
        assert!(store.load(HOSTNAME_ADDR, &mut out));
        assert_eq!(&out[..5], b"moon\0");

        // Every payload byte past the terminator is zero on the device
        let ee = store.into_inner();
        let payload = ee.contents(HOSTNAME_ADDR, TEXT_WIDTH as usize);
        assert_eq!(&payload[..4], b"moon");
        assert!(payload[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_non_overlap_across_zones() {
        let mut store = store();
        assert!(store.save(STA_ENABLED_ADDR, &[1]));
        assert!(store.save(HOSTNAME_ADDR, b"moon\0"));
        assert!(store.save(ADMIN_PASSWORD_ADDR, b"21232f297a57a5a743894a0e4a801fc3\0"));

        let mut scalar = [0u8; 1];
        assert!(store.load(STA_ENABLED_ADDR, &mut scalar));
        assert_eq!(scalar[0], 1);

        let mut text = [0u8; TEXT_WIDTH as usize];
        assert!(store.load(HOSTNAME_ADDR, &mut text));
        assert_eq!(&text[..5], b"moon\0");

        assert!(store.load(ADMIN_PASSWORD_ADDR, &mut text));
        assert_eq!(&text[..33], b"21232f297a57a5a743894a0e4a801fc3\0");
    }

    #[test]
    fn test_identical_resave_writes_nothing() {
        let mut store = store();
        assert!(store.save(HOSTNAME_ADDR, b"moon\0"));

        let ee = store.into_inner();
        let writes = ee.write_count();
        let commits = ee.commit_count();

        let mut store = PrefStore::new(ee);
        assert!(store.save(HOSTNAME_ADDR, b"moon\0"));

        let ee = store.into_inner();
        assert_eq!(ee.write_count(), writes);
        assert_eq!(ee.commit_count(), commits);
    }

    #[test]
    fn test_partial_overwrite_only_touches_changed_bytes() {
        let mut store = store();
        assert!(store.save(HOSTNAME_ADDR, b"moon\0"));

        let ee = store.into_inner();
        let writes = ee.write_count();
        let mut store = PrefStore::new(ee);

        // Same length, one byte differs
        assert!(store.save(HOSTNAME_ADDR, b"moot\0"));
        assert_eq!(store.into_inner().write_count(), writes + 1);
    }

    #[test]
    fn test_scalar_empty_save_erases() {
        let mut store = store();
        assert!(store.save(MODE_ADDR, &[7]));
        assert!(store.save(MODE_ADDR, &[]));

        let mut out = [0u8; 1];
        assert!(!store.load(MODE_ADDR, &mut out));
        assert_eq!(store.into_inner().contents(MODE_ADDR, 3), &[0, 0, 0]);
    }

    #[test]
    fn test_scalar_zero_is_a_value() {
        let mut store = store();
        assert!(store.save(MODE_ADDR, &[0]));

        let mut out = [0xEEu8; 1];
        assert!(store.load(MODE_ADDR, &mut out));
        assert_eq!(out[0], 0);
    }

    #[test]
    fn test_corrupted_marker_reads_as_absent() {
        let mut store = store();
        assert!(store.save(HOSTNAME_ADDR, b"moon\0"));

        let mut ee = store.into_inner();
        ee.inject_corruption(HOSTNAME_ADDR + TEXT_WIDTH, 2);

        let mut store = PrefStore::new(ee);
        let mut out = [0u8; TEXT_WIDTH as usize];
        assert!(!store.load(HOSTNAME_ADDR, &mut out));
    }

    #[test]
    fn test_commit_failure_fails_the_save() {
        let mut ee = MockEeprom::new();
        ee.set_fail_commit(true);
        let mut store = PrefStore::new(ee);
        assert!(!store.save(MODE_ADDR, &[1]));
    }

    #[test]
    fn test_out_of_range_address_fails() {
        let mut store = store();
        let mut out = [0u8; TEXT_WIDTH as usize];
        // Slot would extend past the region end
        assert!(!store.save(500, b"x\0"));
        assert!(!store.load(500, &mut out));
        assert!(!store.save(EEPROM_SIZE + 8, b"x\0"));
    }

    #[test]
    fn test_undersized_load_buffer_rejected() {
        let mut store = store();
        assert!(store.save(HOSTNAME_ADDR, b"moon\0"));
        let mut out = [0u8; 4];
        assert!(!store.load(HOSTNAME_ADDR, &mut out));
    }

    #[test]
    fn test_text_without_terminator_is_capped() {
        let mut store = store();
        // 40 bytes, no NUL anywhere: only width-1 characters survive
        let long = [b'x'; 40];
        assert!(store.save(HOSTNAME_ADDR, &long));

        let mut out = [0u8; TEXT_WIDTH as usize];
        assert!(store.load(HOSTNAME_ADDR, &mut out));
        assert!(out[..32].iter().all(|&b| b == b'x'));
        assert_eq!(out[32], 0);
    }

    #[test]
    fn test_setting_round_trip() {
        let mut store = store();
        let hostname = PrefValue::text("moon").unwrap();
        assert!(store.save_setting(Setting::Hostname, &hostname));
        assert!(store.save_setting(Setting::Mode, &PrefValue::Scalar(2)));

        assert_eq!(store.load_setting(Setting::Hostname), Some(hostname));
        assert_eq!(
            store.load_setting(Setting::Mode),
            Some(PrefValue::Scalar(2))
        );
    }

    #[test]
    fn test_setting_zone_mismatch_rejected() {
        let mut store = store();
        assert!(!store.save_setting(Setting::Mode, &PrefValue::text("moon").unwrap()));
        assert!(!store.save_setting(Setting::Hostname, &PrefValue::Scalar(1)));
        assert_eq!(store.load_setting(Setting::Mode), None);
    }

    #[test]
    fn test_setting_default_fallback() {
        let mut store = store();
        assert_eq!(
            store.load_setting_or_default(Setting::ApSsid).as_text(),
            Some("Moonlight")
        );

        assert!(store.save_setting(Setting::ApSsid, &PrefValue::text("Lantern").unwrap()));
        assert_eq!(
            store.load_setting_or_default(Setting::ApSsid).as_text(),
            Some("Lantern")
        );
    }

    #[test]
    fn test_empty_text_save_erases_setting() {
        let mut store = store();
        assert!(store.save_setting(Setting::ApPsk, &PrefValue::text("hunter2ok").unwrap()));
        assert!(store.save_setting(Setting::ApPsk, &PrefValue::Text(heapless::String::new())));
        assert_eq!(store.load_setting(Setting::ApPsk), None);
    }

    #[test]
    fn test_erase_setting() {
        let mut store = store();
        assert!(store.save_setting(Setting::Mode, &PrefValue::Scalar(3)));
        assert!(store.erase_setting(Setting::Mode));
        assert_eq!(store.load_setting(Setting::Mode), None);
        // Erasing an already-empty slot still succeeds
        assert!(store.erase_setting(Setting::Mode));
    }

    #[test]
    fn test_values_survive_store_rebuild() {
        let mut store = store();
        assert!(store.save_setting(Setting::Blue, &PrefValue::Scalar(127)));

        let mut store = PrefStore::new(store.into_inner());
        assert_eq!(
            store.load_setting(Setting::Blue),
            Some(PrefValue::Scalar(127))
        );
    }

    #[test]
    fn test_store_over_flash_eeprom() {
        let mut store = PrefStore::new(FlashEeprom::new(MockFlash::new(), 4096));
        assert!(store.save_setting(Setting::Hostname, &PrefValue::text("moon").unwrap()));
        assert_eq!(
            store.load_setting(Setting::Hostname),
            Some(PrefValue::text("moon").unwrap())
        );
    }

    #[test]
    fn test_torn_flash_commit_reads_as_absent() {
        let mut flash = MockFlash::new();
        flash.simulate_power_loss();
        let mut store = PrefStore::new(FlashEeprom::new(flash, 4096));

        // The commit only programs half the sector; the high slot's marker
        // never makes it to flash
        assert!(store.save(STA_PSK_2_ADDR, b"secret\0"));

        let mut out = [0u8; TEXT_WIDTH as usize];
        assert!(!store.load(STA_PSK_2_ADDR, &mut out));
    }
}
