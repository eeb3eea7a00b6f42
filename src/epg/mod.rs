//! In-memory EPG index
//!
//! The index maps a channel id to its programmes in document order. It is
//! built in one pass from a parsed XMLTV document and never mutated
//! afterwards; a refresh builds a fresh index and swaps it into the
//! [`EpgStore`].
//!
//! Retention rules applied while building:
//!
//! - programmes without a channel id are dropped
//! - programmes must start inside `[now, now + window]`; an unparseable start
//!   is never inside the window
//! - each channel keeps at most `max_per_channel` programmes, first come first
//!   kept
//!
//! An unparseable stop does not drop the programme. It is stored and simply
//! never matches a current-programme lookup.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::convert::Infallible;
use tracing::debug;

use crate::config::EpgConfig;
use crate::models::ProgrammeEntry;
use crate::utils::{parse_xmltv_timestamp, XmltvProgramme};

pub mod store;

pub use store::EpgStore;

/// Which programmes survive a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub window: Duration,
    pub max_per_channel: usize,
}

impl RetentionPolicy {
    pub fn new(window: std::time::Duration, max_per_channel: usize) -> Self {
        Self {
            // Out-of-range windows saturate to a century
            window: Duration::from_std(window).unwrap_or_else(|_| Duration::days(36_500)),
            max_per_channel,
        }
    }
}

impl From<&EpgConfig> for RetentionPolicy {
    fn from(config: &EpgConfig) -> Self {
        Self::new(config.window, config.max_programmes_per_channel)
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from(&EpgConfig::default())
    }
}

/// Counters collected while building an index; only used for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub kept: usize,
    pub missing_channel: usize,
    pub outside_window: usize,
    pub over_channel_limit: usize,
}

#[derive(Debug, Clone, Default)]
pub struct EpgIndex {
    channels: HashMap<String, Vec<ProgrammeEntry>>,
    built_at: Option<DateTime<Utc>>,
}

impl EpgIndex {
    /// The index served before the first successful refresh
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from parsed programmes as of `now`.
    pub fn build<I>(programmes: I, policy: &RetentionPolicy, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = XmltvProgramme>,
    {
        match Self::try_build(programmes.into_iter().map(Ok::<_, Infallible>), policy, now) {
            Ok(index) => index,
            Err(never) => match never {},
        }
    }

    /// Build an index from a fallible programme stream, such as
    /// [`XmltvProgrammes`](crate::utils::XmltvProgrammes).
    ///
    /// Programmes are filtered as they arrive, so only retained entries are
    /// held in memory. The first error aborts the build.
    pub fn try_build<I, E>(
        programmes: I,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<XmltvProgramme, E>>,
    {
        let window_end = now
            .checked_add_signed(policy.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut channels: HashMap<String, Vec<ProgrammeEntry>> = HashMap::new();
        let mut stats = BuildStats::default();

        for programme in programmes {
            let programme = programme?;
            let Some(channel) = programme.channel else {
                stats.missing_channel += 1;
                continue;
            };

            let start = parse_xmltv_timestamp(&programme.start)
                .filter(|start| *start >= now && *start <= window_end);
            let Some(start) = start else {
                stats.outside_window += 1;
                continue;
            };

            let entries = channels.entry(channel).or_default();
            if entries.len() >= policy.max_per_channel {
                stats.over_channel_limit += 1;
                continue;
            }

            entries.push(ProgrammeEntry::new(
                programme
                    .title
                    .unwrap_or_else(|| ProgrammeEntry::UNKNOWN_TITLE.to_string()),
                Some(start),
                parse_xmltv_timestamp(&programme.stop),
            ));
            stats.kept += 1;
        }

        debug!(
            "Built EPG index: channels={} kept={} missing_channel={} outside_window={} over_channel_limit={}",
            channels.len(),
            stats.kept,
            stats.missing_channel,
            stats.outside_window,
            stats.over_channel_limit
        );

        Ok(Self {
            channels,
            built_at: Some(now),
        })
    }

    /// First programme, in document order, airing at `now`.
    pub fn current_programme(
        &self,
        channel_id: &str,
        now: DateTime<Utc>,
    ) -> Option<&ProgrammeEntry> {
        self.channels
            .get(channel_id)?
            .iter()
            .find(|entry| entry.is_airing_at(now))
    }

    /// Programmes stored for a channel; empty when the channel is unknown
    pub fn programmes(&self, channel_id: &str) -> &[ProgrammeEntry] {
        self.channels
            .get(channel_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn channels(&self) -> impl Iterator<Item = (&str, &[ProgrammeEntry])> {
        self.channels
            .iter()
            .map(|(id, entries)| (id.as_str(), entries.as_slice()))
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn programme_count(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// When the index was built; `None` for the initial empty index
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// Same programmes for the same channels, ignoring build time
    pub fn same_content(&self, other: &EpgIndex) -> bool {
        self.channels == other.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
    }

    fn stamp(dt: DateTime<Utc>) -> String {
        dt.format("%Y%m%d%H%M%S +0000").to_string()
    }

    fn programme(
        channel: &str,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        title: &str,
    ) -> XmltvProgramme {
        XmltvProgramme {
            channel: Some(channel.to_string()),
            start: stamp(start),
            stop: stamp(stop),
            title: Some(title.to_string()),
        }
    }

    #[test]
    fn test_current_programme_scenario() {
        let index = EpgIndex::build(
            vec![programme("5", at(10, 0), at(11, 0), "Morning News")],
            &RetentionPolicy::default(),
            at(9, 0),
        );

        let found = index.current_programme("5", at(10, 30)).unwrap();
        assert_eq!(found.title, "Morning News");
        assert!(index.current_programme("5", at(11, 30)).is_none());
    }

    #[test]
    fn test_unknown_channel_has_no_programme() {
        let index = EpgIndex::build(
            vec![programme("5", at(10, 0), at(11, 0), "Morning News")],
            &RetentionPolicy::default(),
            at(9, 0),
        );
        assert!(index.current_programme("6", at(10, 30)).is_none());
        assert!(index.programmes("6").is_empty());
        assert!(EpgIndex::empty().current_programme("5", at(10, 30)).is_none());
    }

    #[test]
    fn test_first_overlapping_entry_wins() {
        let index = EpgIndex::build(
            vec![
                programme("5", at(10, 0), at(12, 0), "Long Film"),
                programme("5", at(10, 15), at(10, 45), "Short"),
            ],
            &RetentionPolicy::default(),
            at(9, 0),
        );
        assert_eq!(index.current_programme("5", at(10, 30)).unwrap().title, "Long Film");
    }

    #[test]
    fn test_programmes_outside_window_are_dropped() {
        let now = at(9, 0);
        let index = EpgIndex::build(
            vec![
                programme("5", at(8, 0), at(10, 0), "Already started"),
                programme("5", at(9, 0), at(10, 0), "Starts now"),
                programme("5", now + Duration::hours(24), now + Duration::hours(25), "Window edge"),
                programme("5", now + Duration::hours(25), now + Duration::hours(26), "Tomorrow"),
            ],
            &RetentionPolicy::default(),
            now,
        );

        let titles: Vec<&str> = index.programmes("5").iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Starts now", "Window edge"]);
        for entry in index.programmes("5") {
            let start = entry.start.unwrap();
            assert!(start >= now && start <= now + Duration::hours(24));
        }
    }

    #[test]
    fn test_per_channel_limit_keeps_first_entries() {
        let now = at(0, 0);
        let programmes: Vec<XmltvProgramme> = (0..15)
            .map(|i| {
                let start = now + Duration::minutes(30 * i);
                programme("5", start, start + Duration::minutes(30), &format!("Show {i}"))
            })
            .chain(std::iter::once(programme("7", at(1, 0), at(2, 0), "Other")))
            .collect();

        let index = EpgIndex::build(programmes, &RetentionPolicy::default(), now);

        let entries = index.programmes("5");
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].title, "Show 0");
        assert_eq!(entries[9].title, "Show 9");
        assert_eq!(index.programmes("7").len(), 1);
        assert_eq!(index.programme_count(), 11);
    }

    #[test]
    fn test_custom_policy_limit() {
        let policy = RetentionPolicy::new(std::time::Duration::from_secs(3600), 2);
        let now = at(0, 0);
        let index = EpgIndex::build(
            vec![
                programme("5", at(0, 0), at(0, 10), "A"),
                programme("5", at(0, 10), at(0, 20), "B"),
                programme("5", at(0, 20), at(0, 30), "C"),
                programme("5", at(2, 0), at(3, 0), "Outside"),
            ],
            &policy,
            now,
        );
        assert_eq!(index.programmes("5").len(), 2);
    }

    #[test]
    fn test_missing_channel_and_bad_start_are_dropped() {
        let now = at(9, 0);
        let mut orphan = programme("5", at(10, 0), at(11, 0), "Orphan");
        orphan.channel = None;
        let mut bad_start = programme("5", at(10, 0), at(11, 0), "Bad start");
        bad_start.start = "Invalid Date".to_string();

        let index = EpgIndex::build(vec![orphan, bad_start], &RetentionPolicy::default(), now);
        assert!(index.is_empty());
    }

    #[test]
    fn test_bad_stop_is_stored_but_never_current() {
        let mut bad_stop = programme("5", at(10, 0), at(11, 0), "Bad stop");
        bad_stop.stop = String::new();
        let reversed = programme("5", at(10, 0), at(9, 30), "Reversed");

        let index = EpgIndex::build(
            vec![bad_stop, reversed],
            &RetentionPolicy::default(),
            at(9, 0),
        );

        assert_eq!(index.programmes("5").len(), 2);
        assert!(index.programmes("5").iter().all(|e| !e.is_lookup_eligible()));
        assert!(index.current_programme("5", at(10, 0)).is_none());
    }

    #[test]
    fn test_every_entry_is_ordered_or_ineligible() {
        let index = EpgIndex::build(
            vec![
                programme("a", at(10, 0), at(11, 0), "Ok"),
                programme("a", at(12, 0), at(11, 0), "Reversed"),
            ],
            &RetentionPolicy::default(),
            at(9, 0),
        );
        for (_, entries) in index.channels() {
            for entry in entries {
                let ordered = matches!((entry.start, entry.stop), (Some(s), Some(e)) if s <= e);
                assert!(ordered || !entry.is_lookup_eligible());
            }
        }
    }

    #[test]
    fn test_missing_title_defaults_to_unknown() {
        let mut untitled = programme("5", at(10, 0), at(11, 0), "");
        untitled.title = None;
        let index = EpgIndex::build(vec![untitled], &RetentionPolicy::default(), at(9, 0));
        assert_eq!(index.programmes("5")[0].title, "Unknown");
    }

    #[test]
    fn test_same_content_ignores_build_time() {
        let feed = vec![programme("5", at(10, 0), at(11, 0), "News")];
        let first = EpgIndex::build(feed.clone(), &RetentionPolicy::default(), at(9, 0));
        let second = EpgIndex::build(feed, &RetentionPolicy::default(), at(9, 1));
        assert!(first.same_content(&second));
        assert_ne!(first.built_at(), second.built_at());
    }

    #[test]
    fn test_try_build_stops_at_first_error() {
        let programmes = vec![
            Ok(programme("5", at(10, 0), at(11, 0), "News")),
            Err("syntax error"),
            Ok(programme("5", at(11, 0), at(12, 0), "Weather")),
        ];

        let result = EpgIndex::try_build(programmes, &RetentionPolicy::default(), at(9, 0));

        assert_eq!(result.err(), Some("syntax error"));
    }

    #[test]
    fn test_try_build_holds_only_retained_entries() {
        // A large feed for one channel, produced lazily
        let programmes = (0..50_000).map(|i| {
            let start = at(10, 0) + Duration::seconds(i);
            Ok::<_, Infallible>(programme("5", start, start + Duration::seconds(1), "Slot"))
        });

        let index = EpgIndex::try_build(programmes, &RetentionPolicy::default(), at(9, 0)).unwrap();

        assert_eq!(index.programme_count(), 10);
        assert_eq!(index.programmes("5")[0].start, Some(at(10, 0)));
    }
}
