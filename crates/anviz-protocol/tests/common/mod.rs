//! Frame builders shared by the protocol integration tests.

#![allow(dead_code)]

use anviz_protocol::CommandCode;

/// Device id the test terminal reports in bytes 1-4.
pub const TEST_DEVICE: [u8; 4] = [0x00, 0x00, 0x30, 0x39];

/// Build a 10-byte header declaring `len` payload bytes.
pub fn header(command: CommandCode, len: u16) -> Vec<u8> {
    let [lo, hi] = len.to_le_bytes();
    let mut raw = vec![0xA5];
    raw.extend_from_slice(&TEST_DEVICE);
    raw.extend_from_slice(&[command.as_byte(), 0x00, 0x00, lo, hi]);
    raw
}

/// Build a complete frame: header, payload and the 2-byte trailer.
///
/// Empty payloads produce a header-only frame.
pub fn frame(command: CommandCode, payload: &[u8]) -> Vec<u8> {
    let mut raw = header(command, payload.len() as u16);
    if !payload.is_empty() {
        raw.extend_from_slice(payload);
        raw.extend_from_slice(&[0x00, 0x5A]);
    }
    raw
}

/// Build a 14-byte verify record payload.
pub fn verify_payload(
    id: [u8; 5],
    timestamp: u32,
    backup_id: u8,
    record_type: u8,
    work_type: [u8; 3],
) -> Vec<u8> {
    let mut payload = Vec::with_capacity(14);
    payload.extend_from_slice(&id);
    payload.extend_from_slice(&timestamp.to_le_bytes());
    payload.push(backup_id);
    payload.push(record_type);
    payload.extend_from_slice(&work_type);
    payload
}

/// The check-in by finger #1 of employee 1 at the device epoch.
pub fn epoch_check_in() -> Vec<u8> {
    verify_payload([0x01, 0, 0, 0, 0], 0, 0x10, 0x00, [0, 0, 0])
}
