use crate::checksum::xor_checksum;
use crate::commands::CommandCode;
use crate::frame::{Frame, declared_length};
use anviz_core::constants::{
    CHECKSUM_LEN, COMMAND_OFFSET, DEVICE_ID_OFFSET, HEADER_LEN, LENGTH_OFFSET, PAYLOAD_OFFSET,
};
use anviz_core::{DeviceId, Error, Result};
use bytes::Bytes;

/// Decoded Anviz protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Byte 0 as received. The connection layer validates it before decoding.
    pub start_marker: u8,
    pub device_id: DeviceId,
    pub command: CommandCode,
    /// Declared payload length; zero for header-only frames.
    pub length: u16,
    /// Exactly `length` bytes, `None` when `length == 0`.
    pub payload: Option<Bytes>,
    pub checksum: u8,
    /// Size of the frame this message was decoded from.
    pub frame_len: usize,
}

impl Message {
    /// Decode a message from raw frame bytes.
    ///
    /// Copies the input once; use `Message::try_from(&frame)` to share the
    /// frame buffer instead.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        Self::decode_bytes(&Bytes::copy_from_slice(frame))
    }

    fn decode_bytes(data: &Bytes) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(Error::FrameTooShort { len: data.len() });
        }

        let start_marker = data[0];
        let mut id = [0u8; 4];
        id.copy_from_slice(&data[DEVICE_ID_OFFSET..COMMAND_OFFSET]);
        let device_id = DeviceId::new(id);
        let command = CommandCode::from_byte(data[COMMAND_OFFSET]);

        // Header-only frame: byte 8 doubles as the checksum.
        if data.len() == HEADER_LEN {
            return Ok(Message {
                start_marker,
                device_id,
                command,
                length: 0,
                payload: None,
                checksum: data[LENGTH_OFFSET],
                frame_len: HEADER_LEN,
            });
        }

        let length = declared_length(data);
        let payload_end = PAYLOAD_OFFSET + usize::from(length);
        let expected = payload_end + CHECKSUM_LEN;
        if data.len() < expected {
            return Err(Error::InvalidLength {
                declared: length,
                expected,
                actual: data.len(),
            });
        }

        let payload = (length > 0).then(|| data.slice(PAYLOAD_OFFSET..payload_end));

        Ok(Message {
            start_marker,
            device_id,
            command,
            length,
            payload,
            checksum: data[data.len() - 1],
            frame_len: data.len(),
        })
    }

    /// Payload bytes, empty for header-only messages.
    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or_default()
    }

    /// Lowercase hex of the payload, for diagnostics.
    pub fn payload_hex(&self) -> String {
        hex::encode(self.payload_bytes())
    }

    /// Compare the XOR of every byte of `raw` with the declared checksum.
    ///
    /// The dispatch path only calls this when a [`ChecksumPolicy`] other than
    /// `Ignore` is configured.
    ///
    /// [`ChecksumPolicy`]: crate::ChecksumPolicy
    pub fn verify_checksum(&self, raw: &[u8]) -> bool {
        xor_checksum(raw) == self.checksum
    }
}

impl TryFrom<&Frame> for Message {
    type Error = Error;

    fn try_from(frame: &Frame) -> Result<Self> {
        Message::decode_bytes(frame.bytes())
    }
}

impl TryFrom<Frame> for Message {
    type Error = Error;

    fn try_from(frame: Frame) -> Result<Self> {
        Message::decode_bytes(frame.bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cmd: u8, len: u16) -> Vec<u8> {
        let [lo, hi] = len.to_le_bytes();
        vec![0xA5, 0x12, 0x34, 0x56, 0x78, cmd, 0x00, 0x00, lo, hi]
    }

    #[test]
    fn test_decode_header_only() {
        let mut raw = header(0x7F, 0);
        raw[8] = 0x5A;
        raw[9] = 0x00;
        let msg = Message::decode(&raw).unwrap();

        assert_eq!(msg.start_marker, 0xA5);
        assert_eq!(msg.command, CommandCode::Heartbeat);
        assert_eq!(msg.length, 0);
        assert!(msg.payload.is_none());
        assert_eq!(msg.checksum, 0x5A);
        assert_eq!(msg.device_id, DeviceId::new([0x12, 0x34, 0x56, 0x78]));
        assert_eq!(msg.frame_len, 10);
    }

    #[test]
    fn test_decode_with_payload() {
        let mut raw = header(0xDF, 3);
        raw.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        raw.extend_from_slice(&[0x11, 0x22]);

        let msg = Message::decode(&raw).unwrap();
        assert_eq!(msg.command, CommandCode::VerifyRecord);
        assert_eq!(msg.length, 3);
        assert_eq!(msg.payload_bytes(), &[0xAA, 0xBB, 0xCC]);
        assert_eq!(msg.checksum, 0x22);
        assert_eq!(msg.payload_hex(), "aabbcc");
    }

    #[test]
    fn test_decode_too_short() {
        let err = Message::decode(&[0xA5, 0, 0, 0, 1, 0x7F, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::FrameTooShort { len: 9 }));

        let err = Message::decode(&[]).unwrap_err();
        assert!(matches!(err, Error::FrameTooShort { len: 0 }));
    }

    #[test]
    fn test_decode_invalid_length() {
        let mut raw = header(0xDF, 14);
        raw.extend_from_slice(&[0u8; 5]);

        let err = Message::decode(&raw).unwrap_err();
        match err {
            Error::InvalidLength {
                declared,
                expected,
                actual,
            } => {
                assert_eq!(declared, 14);
                assert_eq!(expected, 26);
                assert_eq!(actual, 15);
            }
            other => panic!("Expected InvalidLength, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_zero_length_with_trailer() {
        // Longer than a header but declaring no payload: only the trailer follows.
        let mut raw = header(0x05, 0);
        raw.extend_from_slice(&[0x01, 0x02]);

        let msg = Message::decode(&raw).unwrap();
        assert_eq!(msg.length, 0);
        assert!(msg.payload.is_none());
        assert_eq!(msg.checksum, 0x02);
    }

    #[test]
    fn test_decode_does_not_validate_start_marker() {
        let mut raw = header(0x7F, 0);
        raw[0] = 0x00;
        let msg = Message::decode(&raw).unwrap();
        assert_eq!(msg.start_marker, 0x00);
    }

    #[test]
    fn test_try_from_frame_shares_buffer() {
        let mut raw = header(0x03, 2);
        raw.extend_from_slice(&[0x01, 0x02, 0x00, 0x00]);
        let frame = Frame::from(raw);

        let msg = Message::try_from(&frame).unwrap();
        let payload = msg.payload.as_ref().unwrap();
        assert_eq!(payload.as_ref(), &[0x01, 0x02]);
        assert_eq!(
            payload.as_ptr(),
            frame.as_bytes()[PAYLOAD_OFFSET..].as_ptr()
        );
    }

    #[test]
    fn test_verify_checksum() {
        let raw = [0xA5, 0x00, 0x00, 0x00, 0x01, 0x7F, 0x00, 0x00, 0x00, 0x00];
        let msg = Message::decode(&raw).unwrap();
        // 0xA5 ^ 0x01 ^ 0x7F = 0xDB, declared is byte 8 = 0x00
        assert!(!msg.verify_checksum(&raw));

        let mut matching = raw;
        matching[8] = 0xDB;
        let msg = Message::decode(&matching).unwrap();
        // Byte 8 takes part in the XOR too: 0xDB ^ 0xDB = 0
        assert!(!msg.verify_checksum(&matching));

        let zero = [0u8; 10];
        let msg = Message::decode(&zero).unwrap();
        assert!(msg.verify_checksum(&zero));
    }
}
