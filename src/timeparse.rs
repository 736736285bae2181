//! Parsing of `--before` / `--after` values.
//!
//! Accepted forms:
//!
//! - `now`, `today`, `yesterday` (midnight in the naive timezone)
//! - RFC 3339: `2024-03-01T12:00:00Z`, `2024-03-01T12:00:00+02:00`
//! - `2024-03-01`, `2024-03-01 12:00`, `2024-03-01 12:00:00`, and the same
//!   with a `T` separator; interpreted in the naive timezone
//! - `@1709294400` (epoch seconds)
//! - `3 days ago`, `90 min ago`, `2h ago`

use crate::error::{AwslogError, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Timezone used for date-times written without an offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NaiveTimezone {
    /// The machine's local timezone
    #[default]
    Local,
    Utc,
}

impl NaiveTimezone {
    fn to_utc(self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Utc => Some(Utc.from_utc_datetime(&naive)),
            Self::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    fn today(self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Utc => now.date_naive(),
            Self::Local => now.with_timezone(&Local).date_naive(),
        }
    }
}

/// Parse a free-form time bound relative to `now`.
pub fn parse_time_bound(
    input: &str,
    now: DateTime<Utc>,
    timezone: NaiveTimezone,
) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    let lowered = trimmed.to_ascii_lowercase();
    let invalid = || AwslogError::date_parse(input);

    let midnight = |date: NaiveDate| date.and_hms_opt(0, 0, 0).and_then(|dt| timezone.to_utc(dt));

    match lowered.as_str() {
        "" => return Err(invalid()),
        "now" => return Ok(now),
        "today" => return midnight(timezone.today(now)).ok_or_else(invalid),
        "yesterday" => {
            return timezone
                .today(now)
                .pred_opt()
                .and_then(midnight)
                .ok_or_else(invalid)
        }
        _ => {}
    }

    if let Some(epoch) = trimmed.strip_prefix('@') {
        let seconds: i64 = epoch.trim().parse().map_err(|_| invalid())?;
        return DateTime::from_timestamp(seconds, 0).ok_or_else(invalid);
    }

    if let Some(relative) = lowered.strip_suffix("ago") {
        let offset = parse_relative(relative).ok_or_else(invalid)?;
        return now.checked_sub_signed(offset).ok_or_else(invalid);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return timezone.to_utc(naive).ok_or_else(invalid);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return midnight(date).ok_or_else(invalid);
    }

    Err(invalid())
}

/// `3 days`, `90min`, `2 h`
fn parse_relative(s: &str) -> Option<Duration> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit())?;
    let (num_str, unit) = s.split_at(split);
    let value: i64 = num_str.parse().ok()?;

    let unit_seconds: i64 = match unit.trim() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        _ => return None,
    };
    Duration::try_seconds(value.checked_mul(unit_seconds)?)
}
