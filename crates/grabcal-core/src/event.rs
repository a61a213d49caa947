//! Event types for extracted calendar events.
//!
//! This module provides the core data model:
//! - [`EventRecord`]: one detected event with wall-clock times
//! - [`ExtractionResult`]: the three-way outcome of an extraction request
//!
//! Date fields are carried as wall-clock ISO strings (`YYYY-MM-DDTHH:mm:ss`)
//! with the timezone held separately in [`EventRecord::timezone`]. They are
//! never converted to UTC on the way through; see [`crate::time`] for why.

use serde::{Deserialize, Serialize};

/// One detected calendar event.
///
/// `start_date` and `end_date` are wall-clock strings as stated in the source
/// text. When `end_date` is absent the event is one hour long by convention.
/// When `timezone` is absent the caller-supplied fallback timezone applies at
/// render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// The event title.
    pub title: String,
    /// Wall-clock start, `YYYY-MM-DDTHH:mm:ss`.
    pub start_date: String,
    /// Wall-clock end, if one was stated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// The event location, if stated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// A short description, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// IANA timezone identifier (e.g. `America/Los_Angeles`), if the source
    /// text named one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl EventRecord {
    /// Creates a new event with the required fields.
    pub fn new(title: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start_date: start_date.into(),
            end_date: None,
            location: None,
            description: None,
            timezone: None,
        }
    }

    /// Builder method to set the end date.
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Returns the event's timezone, or the given fallback when none was
    /// extracted from the source text.
    pub fn timezone_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.timezone.as_deref().unwrap_or(fallback)
    }
}

/// The outcome of one extraction request.
///
/// Produced once per request by the extraction contract, consumed once by the
/// renderer, then discarded. `Failed` covers both collaborator failures and
/// the designed "no event found" outcome; the caller distinguishes neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionResult {
    /// Exactly one event was found.
    Single {
        /// The detected event.
        event: EventRecord,
    },
    /// Several events were found, in source order.
    Multiple {
        /// The detected events (length >= 1).
        events: Vec<EventRecord>,
    },
    /// Nothing usable was found, or the extraction collaborator failed.
    Failed {
        /// A human-readable message for display.
        message: String,
    },
}

impl ExtractionResult {
    /// Creates a `Failed` result with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns true if this result carries no events.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns the detected events, in source order.
    pub fn events(&self) -> &[EventRecord] {
        match self {
            Self::Single { event } => std::slice::from_ref(event),
            Self::Multiple { events } => events,
            Self::Failed { .. } => &[],
        }
    }
}
