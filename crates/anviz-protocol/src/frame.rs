use crate::commands::CommandCode;
use anviz_core::constants::{
    ACK_LEN, ACK_RESPONDER_ID, CHECKSUM_LEN, COMMAND_OFFSET, HEADER_LEN, LENGTH_OFFSET,
    START_MARKER,
};
use bytes::Bytes;
use std::fmt;

/// One delimited unit of bytes read from a terminal connection.
///
/// A frame holds exactly one protocol message in wire format: the 10-byte
/// header, followed by `length` payload bytes and a 2-byte checksum when the
/// length field is non-zero. Frames are produced by [`AnvizCodec`] and turned
/// into a [`Message`] with `Message::try_from(&frame)`.
///
/// # Basic Usage
/// ```
/// use anviz_protocol::{Frame, Message, CommandCode};
///
/// let frame = Frame::from_bytes(&[0xA5, 0, 0, 0, 1, 0x7F, 0, 0, 0, 0]);
/// let msg = Message::try_from(&frame).unwrap();
/// assert_eq!(msg.command, CommandCode::Heartbeat);
/// ```
///
/// [`AnvizCodec`]: crate::AnvizCodec
/// [`Message`]: crate::Message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Bytes,
}

impl Frame {
    pub fn new(data: Bytes) -> Self {
        Frame { data }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the underlying buffer; slicing it does not copy.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lowercase hex rendering used in diagnostics.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

impl From<Vec<u8>> for Frame {
    fn from(v: Vec<u8>) -> Self {
        Frame::new(Bytes::from(v))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Payload length declared in bytes 8-9 of a header (little-endian).
///
/// `header` must hold at least [`HEADER_LEN`] bytes.
#[inline]
pub fn declared_length(header: &[u8]) -> u16 {
    u16::from_le_bytes([header[LENGTH_OFFSET], header[LENGTH_OFFSET + 1]])
}

/// Total wire size of a frame whose header declares `length` payload bytes.
///
/// Header-only frames carry no trailing checksum bytes.
#[inline]
pub fn frame_len(length: u16) -> usize {
    if length == 0 {
        HEADER_LEN
    } else {
        HEADER_LEN + usize::from(length) + CHECKSUM_LEN
    }
}

/// Encode the 10-byte acknowledgment for a received command.
///
/// ```text
/// A5 | 00 00 00 01 | cmd | 00 00 | 00 00
/// ```
pub fn encode_ack(command: CommandCode) -> [u8; ACK_LEN] {
    let mut ack = [0u8; ACK_LEN];
    ack[0] = START_MARKER;
    ack[1..COMMAND_OFFSET].copy_from_slice(&ACK_RESPONDER_ID);
    ack[COMMAND_OFFSET] = command.as_byte();
    ack
}
