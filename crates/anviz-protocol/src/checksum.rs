//! Checksum handling.
//!
//! Terminals append a checksum to every frame, but units in the field are
//! known to send values the XOR rule does not reproduce. Whether a mismatch
//! matters is therefore a deployment decision expressed as a [`ChecksumPolicy`].

use crate::message::Message;
use anviz_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// XOR of every byte in `data`.
pub fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, b| acc ^ b)
}

/// What the connection handler does with a frame whose checksum does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    /// Never compute the checksum. Matches the behavior terminals are deployed against.
    #[default]
    Ignore,
    /// Log mismatches and process the message anyway.
    Warn,
    /// Log mismatches, drop the message and withhold the ACK.
    Enforce,
}

/// Result of applying a [`ChecksumPolicy`] to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumOutcome {
    Accept,
    /// The checksum did not match but the policy lets the message through.
    Mismatch { declared: u8, computed: u8 },
    /// The checksum did not match and the message must be dropped.
    Reject { declared: u8, computed: u8 },
}

impl ChecksumOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ChecksumOutcome::Reject { .. })
    }
}

impl ChecksumPolicy {
    pub fn evaluate(&self, message: &Message, raw: &[u8]) -> ChecksumOutcome {
        if *self == ChecksumPolicy::Ignore || message.verify_checksum(raw) {
            return ChecksumOutcome::Accept;
        }

        let declared = message.checksum;
        let computed = xor_checksum(raw);
        match self {
            ChecksumPolicy::Enforce => ChecksumOutcome::Reject { declared, computed },
            _ => ChecksumOutcome::Mismatch { declared, computed },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumPolicy::Ignore => "ignore",
            ChecksumPolicy::Warn => "warn",
            ChecksumPolicy::Enforce => "enforce",
        }
    }
}

impl fmt::Display for ChecksumPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(ChecksumPolicy::Ignore),
            "warn" => Ok(ChecksumPolicy::Warn),
            "enforce" => Ok(ChecksumPolicy::Enforce),
            other => Err(Error::Config(format!(
                "unknown checksum policy '{other}' (expected ignore, warn or enforce)"
            ))),
        }
    }
}
