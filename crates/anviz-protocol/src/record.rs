//! Attendance record decoding.
//!
//! A `VerifyRecord` message carries a fixed 14-byte payload:
//!
//! ```text
//! 0..=4   employee id (5 bytes, encoding not declared by the device)
//! 5..=8   seconds since 2000-01-02T00:00:00Z (u32, little-endian)
//! 9       backup id   (verification method, nibble-packed)
//! 10      record type (bit 7 door opened, bits 0-3 attendance status)
//! 11..=13 work type   (opaque)
//! ```

use anviz_core::constants::{EMPLOYEE_ID_LEN, NUMERIC_ID_LIMIT, VERIFY_RECORD_LEN};
use anviz_core::{DeviceTime, Error, Result};
use serde::{Deserialize, Serialize};

/// Decoded attendance/verification event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRecord {
    pub employee_id: String,
    pub timestamp: DeviceTime,
    pub backup_id: u8,
    pub record_type: u8,
    pub work_type: [u8; 3],
}

impl VerifyRecord {
    /// Decode a record from a `VerifyRecord` payload.
    ///
    /// Bytes past the first 14 are ignored.
    ///
    /// # Errors
    /// Returns `Error::PayloadTooShort` if fewer than 14 bytes are supplied.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() < VERIFY_RECORD_LEN {
            return Err(Error::PayloadTooShort {
                len: payload.len(),
                expected: VERIFY_RECORD_LEN,
            });
        }

        let mut id = [0u8; EMPLOYEE_ID_LEN];
        id.copy_from_slice(&payload[0..5]);

        let secs = u32::from_le_bytes([payload[5], payload[6], payload[7], payload[8]]);

        let mut work_type = [0u8; 3];
        work_type.copy_from_slice(&payload[11..14]);

        Ok(VerifyRecord {
            employee_id: decode_employee_id(&id),
            timestamp: DeviceTime::from_secs(secs),
            backup_id: payload[9],
            record_type: payload[10],
            work_type,
        })
    }
}

/// Recover an employee id from its 5-byte wire field.
///
/// The terminal does not say how the id was stored, so three readings are
/// tried in order and the first that applies wins:
///
/// 1. the first 4 bytes as a little-endian `u32` in `1..100_000_000`, as decimal
/// 2. the bytes in `1..=126`, joined as ASCII text
/// 3. all 5 bytes as uppercase hex
///
/// ```
/// use anviz_protocol::decode_employee_id;
///
/// assert_eq!(decode_employee_id(&[0x01, 0x00, 0x00, 0x00, 0x00]), "1");
/// assert_eq!(decode_employee_id(b"AB12\0"), "AB12");
/// assert_eq!(decode_employee_id(&[0xFF; 5]), "FFFFFFFFFF");
/// ```
pub fn decode_employee_id(raw: &[u8; EMPLOYEE_ID_LEN]) -> String {
    let numeric = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    if numeric > 0 && numeric < NUMERIC_ID_LIMIT {
        return numeric.to_string();
    }

    let ascii: String = raw
        .iter()
        .filter(|&&b| (1..=126).contains(&b))
        .map(|&b| char::from(b))
        .collect();
    if !ascii.is_empty() {
        return ascii;
    }

    raw.iter().map(|b| format!("{b:02X}")).collect()
}
