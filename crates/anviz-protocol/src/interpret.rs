//! Semantic interpretation of verify records.
//!
//! `backup_id` and `record_type` are bit-packed. This module turns them into
//! labels suitable for logs and downstream consumers. Every input maps to a
//! label; there is no failure path.

use crate::record::VerifyRecord;
use anviz_core::constants::DEVICE_TIME_FORMAT;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the user verified at the terminal, derived from `backup_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationMode {
    /// Finger slot 1-10, taken from the high nibble.
    Fingerprint(u8),
    Card,
    Password,
    /// Low nibble set but no recognized flag; holds the whole byte.
    Other(u8),
    Unknown,
}

impl VerificationMode {
    /// Classify a `backup_id` byte.
    ///
    /// The high-nibble fingerprint check runs first, so `0x18` is a
    /// fingerprint even though bit 3 (card) is also set.
    pub fn from_backup_id(backup_id: u8) -> Self {
        let high = backup_id >> 4;
        let low = backup_id & 0x0F;

        if (1..=10).contains(&high) {
            VerificationMode::Fingerprint(high)
        } else if backup_id & 0x08 != 0 {
            VerificationMode::Card
        } else if backup_id & 0x04 != 0 {
            VerificationMode::Password
        } else if low > 0 {
            VerificationMode::Other(backup_id)
        } else {
            VerificationMode::Unknown
        }
    }
}

impl fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationMode::Fingerprint(n) => write!(f, "Fingerprint #{n}"),
            VerificationMode::Card => f.write_str("Card"),
            VerificationMode::Password => f.write_str("Password"),
            VerificationMode::Other(b) => write!(f, "Other(0x{b:02X})"),
            VerificationMode::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Attendance status from the low 4 bits of `record_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    CheckIn,
    CheckOut,
    BreakOut,
    BreakIn,
    OvertimeIn,
    OvertimeOut,
    Other(u8),
}

impl AttendanceStatus {
    pub fn from_record_type(record_type: u8) -> Self {
        match record_type & 0x0F {
            0 => AttendanceStatus::CheckIn,
            1 => AttendanceStatus::CheckOut,
            2 => AttendanceStatus::BreakOut,
            3 => AttendanceStatus::BreakIn,
            4 => AttendanceStatus::OvertimeIn,
            5 => AttendanceStatus::OvertimeOut,
            n => AttendanceStatus::Other(n),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::CheckIn => f.write_str("Check-in"),
            AttendanceStatus::CheckOut => f.write_str("Check-out"),
            AttendanceStatus::BreakOut => f.write_str("Break-out"),
            AttendanceStatus::BreakIn => f.write_str("Break-in"),
            AttendanceStatus::OvertimeIn => f.write_str("Overtime-in"),
            AttendanceStatus::OvertimeOut => f.write_str("Overtime-out"),
            AttendanceStatus::Other(n) => write!(f, "Status {n}"),
        }
    }
}

/// Bit 7 of `record_type`.
#[inline]
pub fn door_opened(record_type: u8) -> bool {
    record_type & 0x80 != 0
}

/// Human view of one verify record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub employee_id: String,
    pub mode: VerificationMode,
    pub status: AttendanceStatus,
    pub door_opened: bool,
    pub time: DateTime<Utc>,
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User: {} | Mode: {} | Status: {} | Door: {} | Time: {}",
            self.employee_id,
            self.mode,
            self.status,
            self.door_opened,
            self.time.format(DEVICE_TIME_FORMAT)
        )
    }
}

/// Map a decoded record to its labels.
pub fn interpret(record: &VerifyRecord) -> Interpretation {
    Interpretation {
        employee_id: record.employee_id.clone(),
        mode: VerificationMode::from_backup_id(record.backup_id),
        status: AttendanceStatus::from_record_type(record.record_type),
        door_opened: door_opened(record.record_type),
        time: record.timestamp.to_utc(),
    }
}
