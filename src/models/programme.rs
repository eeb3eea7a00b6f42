use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single programme from the EPG feed.
///
/// `None` timestamps mark values that failed to parse. Such entries, and
/// entries whose start is after their stop, are kept but never returned by a
/// current-programme lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgrammeEntry {
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub stop: Option<DateTime<Utc>>,
}

impl ProgrammeEntry {
    pub const UNKNOWN_TITLE: &'static str = "Unknown";

    pub fn new(
        title: impl Into<String>,
        start: Option<DateTime<Utc>>,
        stop: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title: title.into(),
            start,
            stop,
        }
    }

    /// Both timestamps are valid and ordered
    pub fn is_lookup_eligible(&self) -> bool {
        matches!((self.start, self.stop), (Some(start), Some(stop)) if start <= stop)
    }

    /// Whether `now` lies inside `[start, stop]`, bounds inclusive
    pub fn is_airing_at(&self, now: DateTime<Utc>) -> bool {
        match (self.start, self.stop) {
            (Some(start), Some(stop)) => start <= stop && start <= now && now <= stop,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_airing_bounds_are_inclusive() {
        let entry = ProgrammeEntry::new("News", Some(at(10, 0)), Some(at(11, 0)));
        assert!(entry.is_airing_at(at(10, 0)));
        assert!(entry.is_airing_at(at(10, 30)));
        assert!(entry.is_airing_at(at(11, 0)));
        assert!(!entry.is_airing_at(at(9, 59)));
        assert!(!entry.is_airing_at(at(11, 1)));
    }

    #[test]
    fn test_invalid_timestamps_are_ineligible() {
        let no_stop = ProgrammeEntry::new("News", Some(at(10, 0)), None);
        assert!(!no_stop.is_lookup_eligible());
        assert!(!no_stop.is_airing_at(at(10, 0)));

        let reversed = ProgrammeEntry::new("News", Some(at(11, 0)), Some(at(10, 0)));
        assert!(!reversed.is_lookup_eligible());
        assert!(!reversed.is_airing_at(at(10, 30)));

        let instant = ProgrammeEntry::new("Ident", Some(at(10, 0)), Some(at(10, 0)));
        assert!(instant.is_lookup_eligible());
        assert!(instant.is_airing_at(at(10, 0)));
    }
}
