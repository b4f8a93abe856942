use chrono::{DateTime, Duration, Utc};

/// How far back the per-device message query reaches.
pub const MESSAGE_WINDOW_MINUTES: i64 = 10;

/// One window is computed per invocation and shared by every device,
/// so the whole batch reflects the same snapshot instant.
#[derive(Debug, PartialEq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn trailing_minutes(end: DateTime<Utc>, minutes: i64) -> Self {
        TimeRange {
            start: end - Duration::minutes(minutes),
            end,
        }
    }

    pub fn start_param(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn end_param(&self) -> String {
        self.end.to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use crate::time_range::{TimeRange, MESSAGE_WINDOW_MINUTES};
    use chrono::{DateTime, Utc};
    use std::str::FromStr;

    #[test]
    fn test_trailing_minutes() {
        let now = DateTime::<Utc>::from_str("2023-05-01T12:30:00+00:00").unwrap();

        let range = TimeRange::trailing_minutes(now, MESSAGE_WINDOW_MINUTES);
        assert_eq!(
            range,
            TimeRange {
                start: DateTime::<Utc>::from_str("2023-05-01T12:20:00+00:00").unwrap(),
                end: now,
            }
        );
    }

    #[test]
    fn test_params_are_rfc3339_utc() {
        let now = DateTime::<Utc>::from_str("2023-05-01T12:30:00+00:00").unwrap();

        let range = TimeRange::trailing_minutes(now, 10);
        assert_eq!(range.start_param(), "2023-05-01T12:20:00+00:00");
        assert_eq!(range.end_param(), "2023-05-01T12:30:00+00:00");
    }
}
