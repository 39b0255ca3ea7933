//! Click event model for asynchronous daily counting.

use chrono::{DateTime, NaiveDate, Utc};

/// A successful redirect, queued for the background click worker.
///
/// Carries the code rather than the link id: a cache hit never loads the link,
/// and the code is unique and immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates an event stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            clicked_at: Utc::now(),
        }
    }

    /// UTC day the click is counted under.
    pub fn day(&self) -> NaiveDate {
        self.clicked_at.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_click_event_creation() {
        let event = ClickEvent::new("abc12345");
        assert_eq!(event.code, "abc12345");
        assert!(event.clicked_at <= Utc::now());
    }

    #[test]
    fn test_day_uses_utc_date() {
        let event = ClickEvent {
            code: "abc12345".to_string(),
            clicked_at: Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap(),
        };
        assert_eq!(event.day(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }
}
