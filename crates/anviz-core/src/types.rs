use crate::constants::{DEVICE_EPOCH_UNIX, DEVICE_TIME_FORMAT};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal identifier carried in bytes 1-4 of every frame.
///
/// The gateway treats it as opaque; it is only surfaced in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeviceId([u8; 4]);

impl DeviceId {
    pub const fn new(bytes: [u8; 4]) -> Self {
        DeviceId(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

/// Seconds elapsed since the device epoch (2000-01-02T00:00:00Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceTime(u32);

impl DeviceTime {
    pub const fn from_secs(secs: u32) -> Self {
        DeviceTime(secs)
    }

    #[must_use]
    pub fn as_secs(&self) -> u32 {
        self.0
    }

    /// Convert to an absolute UTC instant.
    ///
    /// Every `u32` offset lands well inside chrono's range, so this cannot fail.
    #[must_use]
    pub fn to_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(DEVICE_EPOCH_UNIX + i64::from(self.0))
    }
}

impl fmt::Display for DeviceTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_utc().format(DEVICE_TIME_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(0, 2000, 1, 2, 0, 0, 0)]
    #[case(86_400, 2000, 1, 3, 0, 0, 0)]
    #[case(3_661, 2000, 1, 2, 1, 1, 1)]
    #[case(u32::MAX, 2136, 2, 8, 6, 28, 15)]
    fn test_device_time_to_utc(
        #[case] secs: u32,
        #[case] y: i32,
        #[case] mo: u32,
        #[case] d: u32,
        #[case] h: u32,
        #[case] mi: u32,
        #[case] s: u32,
    ) {
        let expected = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap();
        assert_eq!(DeviceTime::from_secs(secs).to_utc(), expected);
    }

    #[test]
    fn test_device_time_display() {
        assert_eq!(DeviceTime::from_secs(0).to_string(), "2000-01-02 00:00:00");
        assert_eq!(
            DeviceTime::from_secs(86_400 + 45).to_string(),
            "2000-01-03 00:00:45"
        );
    }

    #[test]
    fn test_device_id_display() {
        let id = DeviceId::new([0x00, 0x0A, 0xBC, 0x01]);
        assert_eq!(id.to_string(), "000ABC01");
        assert_eq!(id.as_bytes(), &[0x00, 0x0A, 0xBC, 0x01]);
    }
}
