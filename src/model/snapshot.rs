//! Configuration snapshots and the time window they are fetched in.

use crate::normalize::NormalizedValue;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Timestamp format used in diff headers.
pub const CAPTURE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recorded configuration state of a resource.
///
/// Snapshots are only built by the history fetcher and keep the order the
/// service delivered them in (newest first).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// When AWS Config captured this state
    pub capture_time: DateTime<Utc>,
    /// Resource ARN at capture time
    pub arn: String,
    /// Configuration item status (`OK`, `ResourceDeleted`, ...)
    pub status: Option<String>,
    /// Canonicalized configuration document
    pub configuration: NormalizedValue,
    /// Relationships payload exactly as delivered
    pub relationships: Value,
    /// Canonicalized supplementary configuration, if any was recorded
    pub supplementary: Option<NormalizedValue>,
}

impl Snapshot {
    /// Capture time rendered for diff headers.
    #[must_use]
    pub fn formatted_time(&self) -> String {
        self.capture_time.format(CAPTURE_TIME_FORMAT).to_string()
    }

    /// Whether the resource no longer existed when this was captured.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(
            self.status.as_deref(),
            Some("ResourceDeleted" | "ResourceDeletedNotRecorded")
        )
    }
}

/// Exclusive bounds on capture time. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    /// Only snapshots captured strictly after this instant
    pub after: Option<DateTime<Utc>>,
    /// Only snapshots captured strictly before this instant
    pub before: Option<DateTime<Utc>>,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(after: Option<DateTime<Utc>>, before: Option<DateTime<Utc>>) -> Self {
        Self { after, before }
    }

    /// A window with neither bound.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            after: None,
            before: None,
        }
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.after.map_or(true, |after| instant > after)
            && self.before.map_or(true, |before| instant < before)
    }

    /// True when `after` is not earlier than `before`, which no snapshot can
    /// satisfy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!((self.after, self.before), (Some(after), Some(before)) if after >= before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_unbounded_window_contains_everything() {
        let window = TimeWindow::unbounded();
        assert!(window.contains(at(0)));
        assert!(!window.is_empty());
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let window = TimeWindow::new(Some(at(1)), Some(at(3)));
        assert!(!window.contains(at(1)));
        assert!(window.contains(at(2)));
        assert!(!window.contains(at(3)));
    }

    #[test]
    fn test_inverted_window_is_empty() {
        assert!(TimeWindow::new(Some(at(3)), Some(at(1))).is_empty());
        assert!(TimeWindow::new(Some(at(2)), Some(at(2))).is_empty());
    }

    #[test]
    fn test_formatted_time() {
        let snapshot = Snapshot {
            capture_time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap(),
            arn: "arn:aws:ec2:eu-west-1:123456789012:instance/i-1".to_string(),
            status: Some("ResourceDeleted".to_string()),
            configuration: NormalizedValue::default(),
            relationships: Value::Null,
            supplementary: None,
        };
        assert_eq!(snapshot.formatted_time(), "2024-03-01 09:05:07");
        assert!(snapshot.is_deleted());
    }
}
