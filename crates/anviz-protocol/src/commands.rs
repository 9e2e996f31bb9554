//! Command codes carried in byte 5 of every Anviz frame.
//!
//! The terminal pushes a handful of message kinds; the gateway echoes the same
//! code back in its acknowledgment. Codes the gateway does not know are kept
//! verbatim in [`CommandCode::Unknown`] so they can still be acknowledged.
//!
//! # Examples
//!
//! ```
//! use anviz_protocol::CommandCode;
//!
//! let cmd = CommandCode::from_byte(0xDF);
//! assert_eq!(cmd, CommandCode::VerifyRecord);
//! assert_eq!(cmd.as_byte(), 0xDF);
//!
//! let unknown = CommandCode::from_byte(0x42);
//! assert_eq!(unknown, CommandCode::Unknown(0x42));
//! assert_eq!(unknown.to_string(), "Unknown (0x42)");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Command codes for Anviz push messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandCode {
    Heartbeat,      // 0x7F
    VerifyRecord,   // 0xDF
    UserInfo,       // 0x03
    TimeSync,       // 0x04
    DeviceInfo,     // 0x05
    FingerTemplate, // 0x06
    AccessControl,  // 0x07

    /// Any code outside the known set, with its raw value.
    Unknown(u8),
}

impl CommandCode {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0x7F => CommandCode::Heartbeat,
            0xDF => CommandCode::VerifyRecord,
            0x03 => CommandCode::UserInfo,
            0x04 => CommandCode::TimeSync,
            0x05 => CommandCode::DeviceInfo,
            0x06 => CommandCode::FingerTemplate,
            0x07 => CommandCode::AccessControl,
            other => CommandCode::Unknown(other),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            CommandCode::Heartbeat => 0x7F,
            CommandCode::VerifyRecord => 0xDF,
            CommandCode::UserInfo => 0x03,
            CommandCode::TimeSync => 0x04,
            CommandCode::DeviceInfo => 0x05,
            CommandCode::FingerTemplate => 0x06,
            CommandCode::AccessControl => 0x07,
            CommandCode::Unknown(b) => *b,
        }
    }

    /// Returns `true` if the code is one the gateway recognizes.
    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, CommandCode::Unknown(_))
    }
}

impl From<u8> for CommandCode {
    fn from(b: u8) -> Self {
        CommandCode::from_byte(b)
    }
}

impl From<CommandCode> for u8 {
    fn from(cmd: CommandCode) -> Self {
        cmd.as_byte()
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandCode::Heartbeat => f.write_str("Heartbeat"),
            CommandCode::VerifyRecord => f.write_str("Verify Record"),
            CommandCode::UserInfo => f.write_str("User Info"),
            CommandCode::TimeSync => f.write_str("Time Sync"),
            CommandCode::DeviceInfo => f.write_str("Device Info"),
            CommandCode::FingerTemplate => f.write_str("Finger Template"),
            CommandCode::AccessControl => f.write_str("Access Control"),
            CommandCode::Unknown(b) => write!(f, "Unknown (0x{b:02X})"),
        }
    }
}
