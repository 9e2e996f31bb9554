//! Protocol-level constants for the Anviz EP300Pro push protocol.
//!
//! Terminals open a raw TCP connection to the gateway and push binary frames:
//!
//! ```text
//! offset  0      1..=4       5        6..=7     8..=9        10..       last 2
//!        +------+-----------+--------+---------+------------+---------+----------+
//!        | 0xA5 | device id | cmd    | flags   | len (LE)   | payload | checksum |
//!        +------+-----------+--------+---------+------------+---------+----------+
//! ```
//!
//! A frame whose length field is zero ends after the 10-byte header.
//!
//! # Usage
//!
//! ```
//! use anviz_core::constants::*;
//!
//! assert_eq!(START_MARKER, 0xA5);
//! assert_eq!(HEADER_LEN + VERIFY_RECORD_LEN + CHECKSUM_LEN, 26);
//! ```

// ============================================================================
// Framing
// ============================================================================

/// Sentinel byte that opens every frame in both directions.
pub const START_MARKER: u8 = 0xA5;

/// Fixed header size: marker, device id, command, flags and length field.
pub const HEADER_LEN: usize = 10;

/// Trailing checksum bytes that follow a non-empty payload.
pub const CHECKSUM_LEN: usize = 2;

/// Offset of the 4-byte device identifier.
pub const DEVICE_ID_OFFSET: usize = 1;

/// Offset of the command byte.
pub const COMMAND_OFFSET: usize = 5;

/// Offset of the little-endian payload length field.
pub const LENGTH_OFFSET: usize = 8;

/// Offset of the first payload byte.
pub const PAYLOAD_OFFSET: usize = HEADER_LEN;

// ============================================================================
// Acknowledgment
// ============================================================================

/// Responder identifier the gateway writes into every ACK (bytes 1-4).
pub const ACK_RESPONDER_ID: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// ACK frames are header-only.
pub const ACK_LEN: usize = HEADER_LEN;

// ============================================================================
// Verify record layout
// ============================================================================

/// Minimum payload size of a verify record.
pub const VERIFY_RECORD_LEN: usize = 14;

/// Width of the raw employee id field.
pub const EMPLOYEE_ID_LEN: usize = 5;

/// Numeric employee ids must be strictly below this value.
pub const NUMERIC_ID_LIMIT: u32 = 100_000_000;

// ============================================================================
// Time
// ============================================================================

/// Unix timestamp of the device epoch, 2000-01-02T00:00:00Z.
pub const DEVICE_EPOCH_UNIX: i64 = 946_771_200;

/// Format used when rendering device timestamps in logs.
pub const DEVICE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Network defaults
// ============================================================================

/// Port the terminals are configured to push to.
pub const DEFAULT_TCP_PORT: u16 = 8888;

/// Idle deadline used by the raw-dump debug listener, in seconds.
pub const DEFAULT_DEBUG_IDLE_SECS: u64 = 30;

/// Read buffer size for the raw-dump debug listener.
pub const DEBUG_READ_BUFFER: usize = 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_fit_inside_header() {
        assert!(DEVICE_ID_OFFSET + ACK_RESPONDER_ID.len() <= COMMAND_OFFSET);
        assert!(LENGTH_OFFSET + 2 == HEADER_LEN);
        assert_eq!(PAYLOAD_OFFSET, HEADER_LEN);
    }

    #[test]
    fn test_device_epoch_is_one_day_after_y2k() {
        // 2000-01-01T00:00:00Z
        let y2k = 946_684_800;
        assert_eq!(DEVICE_EPOCH_UNIX - y2k, 86_400);
    }
}
