//! Wall-clock date-time handling.
//!
//! This module carries event times as what a human wrote (the six components
//! year/month/day/hour/minute/second) without ever anchoring them to an
//! instant on a universal timeline. The extraction collaborator and the
//! rendering host may sit in different timezones; handing the raw string to a
//! generic zoned parser on either side would silently shift the very numbers
//! users care about. So the primary path is a pattern match that pulls the
//! components out as plain integers, and a [`WallClock`] is a validated
//! [`NaiveDateTime`] built from exactly those integers (a naive value has no
//! timezone to corrupt).
//!
//! Generic chrono parsing exists only as a best-effort fallback for strings
//! that do not match the pattern; that path may shift values under unusual
//! inputs and the tradeoff is accepted.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;

/// Events with no stated end run this long by convention.
pub const DEFAULT_EVENT_SECONDS: i64 = 3600;

/// Leading wall-clock pattern: `YYYY-MM-DDTHH:mm:ss`.
///
/// Anchored at the start only, so trailing offsets (`-07:00`, `Z`) and
/// fractional seconds are ignored rather than applied.
static WALL_CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2}):(\d{2})")
        .expect("Invalid wall-clock regex")
});

/// Fallback formats tried, in order, for strings the pattern rejects.
const LENIENT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A wall-clock date-time: six components, no timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WallClock(NaiveDateTime);

impl WallClock {
    /// Parses the leading `YYYY-MM-DDTHH:mm:ss` of `input`.
    ///
    /// Anything after the seconds field (a `Z`, a UTC offset, fractional
    /// seconds) is dropped: the characters the human wrote are the value.
    /// Returns `None` if the pattern does not match or the components do not
    /// form a real date-time.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = WALL_CLOCK_RE.captures(input)?;
        let field = |i: usize| caps[i].parse::<u32>().ok();

        let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, field(2)?, field(3)?)?;
        let datetime = date.and_hms_opt(field(4)?, field(5)?, field(6)?)?;
        Some(Self(datetime))
    }

    /// Parses `input`, falling back to generic chrono parsing when the
    /// wall-clock pattern does not match.
    ///
    /// The fallback accepts RFC 3339 and a handful of common layouts. Offsets
    /// consumed there keep the local (written) clock value rather than
    /// normalizing to UTC.
    pub fn parse_lenient(input: &str) -> Option<Self> {
        if let Some(parsed) = Self::parse(input) {
            return Some(parsed);
        }

        let trimmed = input.trim();
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
            return Some(Self(dt.naive_local()));
        }
        for format in LENIENT_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(Self(dt));
            }
        }
        // Date-only input defaults the time of day to midnight.
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(Self);
        }
        None
    }

    /// The compact `YYYYMMDDTHHmmss` token used in calendar links and ICS
    /// `DTSTART`/`DTEND` fields.
    ///
    /// Composed digit-for-digit from the stored components; independent of
    /// the host timezone by construction.
    pub fn compact(&self) -> String {
        format!(
            "{:04}{:02}{:02}T{:02}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }

    /// Human-readable display, e.g. `Fri, Mar 15, 2024, 09:00 AM`.
    pub fn display(&self) -> String {
        self.0.format("%a, %b %-d, %Y, %I:%M %p").to_string()
    }

    /// Returns a wall clock `seconds` later, computed on the component tuple.
    pub fn plus_seconds(&self, seconds: i64) -> Self {
        Self(self.0 + Duration::seconds(seconds))
    }
}

/// The resolved start/end pair for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    /// When the event starts.
    pub start: WallClock,
    /// When the event ends.
    pub end: WallClock,
}

impl EventWindow {
    /// Resolves an event's date strings into a start/end pair.
    ///
    /// A missing or unparseable end defaults to start plus one hour
    /// ([`DEFAULT_EVENT_SECONDS`]). Returns `None` only when the start cannot
    /// be parsed even leniently.
    pub fn resolve(start: &str, end: Option<&str>) -> Option<Self> {
        let start = WallClock::parse_lenient(start)?;
        let end = end
            .and_then(WallClock::parse_lenient)
            .unwrap_or_else(|| start.plus_seconds(DEFAULT_EVENT_SECONDS));
        Some(Self { start, end })
    }
}
