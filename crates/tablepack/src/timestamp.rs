//! The MessagePack timestamp extension (type `-1`).
//!
//! Decode-only: a timestamp becomes an RFC 3339 string and is encoded back
//! as an ordinary string. The 96-bit layout carries signed seconds, so
//! instants before 1970 are valid.

use chrono::{DateTime, SecondsFormat, Utc};
use tablepack_buffers::Reader;

use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    /// Parses the 32-, 64- or 96-bit timestamp payload.
    pub fn from_ext(data: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(data);
        let ts = match data.len() {
            4 => Timestamp {
                seconds: reader.u32()? as i64,
                nanos: 0,
            },
            8 => {
                let packed = reader.u64()?;
                Timestamp {
                    seconds: (packed & 0x3_ffff_ffff) as i64,
                    nanos: (packed >> 34) as u32,
                }
            }
            12 => {
                let nanos = reader.u32()?;
                let seconds = reader.i64()?;
                Timestamp { seconds, nanos }
            }
            len => return Err(DecodeError::InvalidTimestamp(len)),
        };
        if ts.nanos >= 1_000_000_000 {
            return Err(DecodeError::InvalidTimestamp(data.len()));
        }
        Ok(ts)
    }

    /// Fails only when `seconds` lies beyond the calendar `chrono` can
    /// represent (roughly ±262000 years).
    pub fn to_date_time(&self) -> Result<DateTime<Utc>, DecodeError> {
        DateTime::from_timestamp(self.seconds, self.nanos).ok_or(
            DecodeError::TimestampOutOfRange {
                seconds: self.seconds,
            },
        )
    }

    /// UTC rendering with second precision, e.g. `2024-01-01T00:00:00Z`.
    /// Negative seconds are instants before 1970.
    pub fn to_rfc3339(&self) -> Result<String, DecodeError> {
        let time = self.to_date_time()?;
        Ok(time.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}
