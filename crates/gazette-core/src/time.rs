//! Calendar days in a fixed local time zone
//!
//! Daily report buckets are keyed by the unix timestamp of local midnight.
//! "Local" is a fixed UTC offset (no DST), `+07:00` unless configured
//! otherwise.

use std::fmt;
use std::str::FromStr;

use ::time::UtcOffset;
use snafu::{ResultExt as _, Snafu};

use crate::Timestamp;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Snafu)]
pub enum DayOffsetError {
    #[snafu(display("Invalid UTC offset: {value}"))]
    Parse {
        value: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("UTC offset out of range: {hours}h"))]
    OutOfRange {
        hours: i8,
        source: ::time::error::ComponentRange,
    },
}

/// Fixed UTC offset that defines where a reporting day starts and ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOffset(UtcOffset);

impl Default for DayOffset {
    fn default() -> Self {
        Self::UTC_PLUS_7
    }
}

impl DayOffset {
    pub const UTC: Self = Self(UtcOffset::UTC);
    pub const UTC_PLUS_7: Self = Self(match UtcOffset::from_hms(7, 0, 0) {
        Ok(offset) => offset,
        Err(_) => panic!("Valid offset"),
    });

    pub fn from_hours(hours: i8) -> Result<Self, DayOffsetError> {
        Ok(Self(
            UtcOffset::from_hms(hours, 0, 0).context(OutOfRangeSnafu { hours })?,
        ))
    }

    /// Timestamp of the local midnight starting the day `ts` falls on
    pub fn start_of_day(self, ts: Timestamp) -> Timestamp {
        let offset_secs = i64::from(self.0.whole_seconds());
        let local = i64::try_from(ts.0)
            .unwrap_or(i64::MAX)
            .saturating_add(offset_secs);
        let day_start = local.div_euclid(SECS_PER_DAY) * SECS_PER_DAY - offset_secs;
        // Local days that started before the epoch are clamped to it
        Timestamp(u64::try_from(day_start).unwrap_or(0))
    }

    /// Local calendar date of `ts`, if representable
    pub fn date(self, ts: Timestamp) -> Option<::time::Date> {
        let utc = ::time::OffsetDateTime::from_unix_timestamp(i64::try_from(ts.0).ok()?).ok()?;
        Some(utc.to_offset(self.0).date())
    }
}

impl fmt::Display for DayOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, _) = self.0.as_hms();
        write!(f, "{:+03}:{:02}", h, m.unsigned_abs())
    }
}

impl FromStr for DayOffset {
    type Err = DayOffsetError;

    /// Parses whole hours, e.g. `7`, `+7` or `-5`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hours = s
            .trim()
            .trim_start_matches('+')
            .parse::<i8>()
            .context(ParseSnafu { value: s })?;
        Self::from_hours(hours)
    }
}

#[cfg(test)]
mod tests;
