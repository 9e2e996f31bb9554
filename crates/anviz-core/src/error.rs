use std::fmt;
use thiserror::Error;

/// Point in the framing cycle at which a stream ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStage {
    /// Fewer than the fixed header bytes were received.
    Header,
    /// The header was complete but the payload and checksum were not.
    Payload,
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameStage::Header => f.write_str("header"),
            FrameStage::Payload => f.write_str("payload"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    // Framing errors
    #[error("Frame too short: {len} bytes (minimum 10)")]
    FrameTooShort { len: usize },

    #[error(
        "Invalid frame length: header declares {declared} payload bytes, frame has {actual} bytes (expected {expected})"
    )]
    InvalidLength {
        declared: u16,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid start marker: 0x{0:02X}")]
    InvalidStartMarker(u8),

    #[error("Stream ended inside {stage}: expected {expected} bytes, received {received}")]
    TruncatedFrame {
        stage: FrameStage,
        expected: usize,
        received: usize,
    },

    // Decode errors
    #[error("Verify record payload too short: {len} bytes (expected at least {expected})")]
    PayloadTooShort { len: usize, expected: usize },

    #[error("Checksum mismatch: declared 0x{declared:02X}, computed 0x{computed:02X}")]
    ChecksumMismatch { declared: u8, computed: u8 },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
