//! Wire schema, policy prompt, and validation for the extraction call.
//!
//! The model is asked for structured JSON matching [`response_schema`]; its
//! reply deserializes into [`WireResponse`] and must then survive
//! [`validate`] before becoming an [`ExtractionResult`]. Validation is where
//! untrusted model output gets cleaned up: empty titles, unparseable dates,
//! and unrecognized timezones never make it into the domain model.

use grabcal_core::{EventRecord, ExtractionResult, WallClock, timezone};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::error::{ExtractError, ExtractResult};

/// Cap announced to the model for multi-event pages.
pub const MAX_EVENTS: usize = 5;

/// Fallback message when the model reports an error without one.
const DEFAULT_ERROR_MESSAGE: &str = "No event found in the provided text.";

/// The model's structured reply.
#[derive(Debug, Deserialize)]
pub struct WireResponse {
    /// Outcome discriminator.
    pub status: WireStatus,
    /// Human-readable message accompanying an error status.
    #[serde(default)]
    pub message: Option<String>,
    /// Detected events, in source order.
    #[serde(default)]
    pub events: Vec<WireEvent>,
}

/// Outcome discriminator of the model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireStatus {
    /// Exactly one event was found.
    Success,
    /// Several events were found.
    Multiple,
    /// No event was found.
    Error,
}

/// One event as the model reports it, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    /// The event title.
    pub title: String,
    /// Wall-clock start string.
    pub start_date: String,
    /// Wall-clock end string, if stated.
    #[serde(default)]
    pub end_date: Option<String>,
    /// The event location, if stated.
    #[serde(default)]
    pub location: Option<String>,
    /// A short description, if available.
    #[serde(default)]
    pub description: Option<String>,
    /// Timezone name or abbreviation, if the text named one.
    #[serde(default)]
    pub timezone: Option<String>,
}

/// The JSON schema handed to the model as `responseSchema`.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "status": {
                "type": "STRING",
                "enum": ["success", "multiple", "error"],
            },
            "message": {
                "type": "STRING",
                "description": "Why no event could be extracted; only for status \"error\"",
            },
            "events": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "startDate": {
                            "type": "STRING",
                            "description": "Wall-clock ISO 8601 date-time, YYYY-MM-DDTHH:mm:ss",
                        },
                        "endDate": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "timezone": {
                            "type": "STRING",
                            "description": "IANA timezone name, e.g. America/Los_Angeles",
                        },
                    },
                    "required": ["title", "startDate"],
                },
            },
        },
        "required": ["status"],
    })
}

/// Builds the policy prompt for one request.
pub fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract event information from the following text.\n\
         \n\
         If you find exactly one event, return status \"success\" with the event details.\n\
         If you find multiple events (up to {MAX_EVENTS}), return status \"multiple\" with an array of events.\n\
         If no event is found, return status \"error\" with a short message explaining what was missing.\n\
         \n\
         For dates:\n\
         - Use ISO 8601 format (YYYY-MM-DDTHH:mm:ss) with the clock values exactly as stated in the text\n\
         - Do NOT convert times to UTC or to any other timezone\n\
         - If the text mentions a timezone or abbreviation (e.g. PST, EST, America/Los_Angeles), put its IANA name in the timezone field\n\
         - If the text mentions no timezone, leave the timezone field out\n\
         - If no time of day is given, use 00:00:00\n\
         - If no end is stated, leave endDate out\n\
         \n\
         Text to analyze:\n\
         {text}"
    )
}

/// Validates a wire reply into an [`ExtractionResult`].
///
/// A reported error status is a designed outcome and passes through as
/// `Failed`. A success/multiple status with zero surviving events is a
/// schema violation and becomes an `InvalidResponse` error.
pub fn validate(response: WireResponse) -> ExtractResult<ExtractionResult> {
    match response.status {
        WireStatus::Error => {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
            Ok(ExtractionResult::Failed { message })
        }
        WireStatus::Success | WireStatus::Multiple => {
            let mut events: Vec<EventRecord> = response
                .events
                .into_iter()
                .filter_map(validate_event)
                .collect();

            if events.is_empty() {
                return Err(ExtractError::invalid_response(
                    "model reported events but none passed validation",
                ));
            }

            if response.status == WireStatus::Success || events.len() == 1 {
                Ok(ExtractionResult::Single {
                    event: events.swap_remove(0),
                })
            } else {
                Ok(ExtractionResult::Multiple { events })
            }
        }
    }
}

/// Cleans one wire event into an [`EventRecord`], or drops it.
fn validate_event(wire: WireEvent) -> Option<EventRecord> {
    let title = wire.title.trim();
    if title.is_empty() {
        warn!("dropping extracted event with empty title");
        return None;
    }
    if WallClock::parse_lenient(&wire.start_date).is_none() {
        warn!(start = %wire.start_date, "dropping extracted event with unparseable start");
        return None;
    }

    let mut event = EventRecord::new(title, wire.start_date);
    if let Some(end) = non_empty(wire.end_date) {
        event = event.with_end_date(end);
    }
    if let Some(location) = non_empty(wire.location) {
        event = event.with_location(location);
    }
    if let Some(description) = non_empty(wire.description) {
        event = event.with_description(description);
    }
    if let Some(raw) = non_empty(wire.timezone) {
        match timezone::resolve(&raw) {
            Some(resolved) => event = event.with_timezone(resolved),
            None => warn!(timezone = %raw, "dropping unrecognized timezone"),
        }
    }
    Some(event)
}

/// Treats empty or whitespace-only model output as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_event(title: &str, start: &str) -> WireEvent {
        WireEvent {
            title: title.to_string(),
            start_date: start.to_string(),
            end_date: None,
            location: None,
            description: None,
            timezone: None,
        }
    }

    mod prompt {
        use super::*;

        #[test]
        fn carries_policy_and_text() {
            let prompt = extraction_prompt("Concert on Friday");
            assert!(prompt.contains("status \"success\""));
            assert!(prompt.contains("status \"multiple\""));
            assert!(prompt.contains("status \"error\""));
            assert!(prompt.contains("Do NOT convert times to UTC"));
            assert!(prompt.ends_with("Concert on Friday"));
        }

        #[test]
        fn announces_the_event_cap() {
            assert!(extraction_prompt("x").contains("up to 5"));
        }

        #[test]
        fn does_not_bake_in_a_timezone() {
            // The fallback timezone applies at render time, not in the model.
            let prompt = extraction_prompt("Concert on Friday");
            assert!(prompt.contains("leave the timezone field out"));
            assert!(!prompt.contains("browser timezone"));
        }
    }

    mod schema_shape {
        use super::*;

        #[test]
        fn declares_required_fields() {
            let schema = response_schema();
            assert_eq!(schema["required"][0], "status");
            let event_required = &schema["properties"]["events"]["items"]["required"];
            assert_eq!(event_required[0], "title");
            assert_eq!(event_required[1], "startDate");
        }
    }

    mod deserialization {
        use super::*;

        #[test]
        fn parses_full_reply() {
            let reply: WireResponse = serde_json::from_str(
                r#"{
                    "status": "success",
                    "events": [{
                        "title": "Tech Conference",
                        "startDate": "2024-03-15T09:00:00",
                        "endDate": "2024-03-15T17:00:00",
                        "location": "San Francisco",
                        "timezone": "America/Los_Angeles"
                    }]
                }"#,
            )
            .unwrap();
            assert_eq!(reply.status, WireStatus::Success);
            assert_eq!(reply.events.len(), 1);
            assert_eq!(reply.events[0].end_date.as_deref(), Some("2024-03-15T17:00:00"));
        }

        #[test]
        fn missing_optionals_default() {
            let reply: WireResponse =
                serde_json::from_str(r#"{"status": "error", "message": "no event"}"#).unwrap();
            assert_eq!(reply.status, WireStatus::Error);
            assert!(reply.events.is_empty());
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn error_status_is_a_designed_outcome() {
            let result = validate(WireResponse {
                status: WireStatus::Error,
                message: Some("Nothing datelike on this page".to_string()),
                events: vec![],
            })
            .unwrap();
            assert_eq!(
                result,
                ExtractionResult::failed("Nothing datelike on this page")
            );
        }

        #[test]
        fn error_without_message_gets_default() {
            let result = validate(WireResponse {
                status: WireStatus::Error,
                message: None,
                events: vec![],
            })
            .unwrap();
            match result {
                ExtractionResult::Failed { message } => assert!(!message.is_empty()),
                other => panic!("expected Failed, got {other:?}"),
            }
        }

        #[test]
        fn success_takes_the_first_valid_event() {
            let result = validate(WireResponse {
                status: WireStatus::Success,
                message: None,
                events: vec![
                    wire_event("Gala", "2025-06-01T19:30:00"),
                    wire_event("Afterparty", "2025-06-01T23:00:00"),
                ],
            })
            .unwrap();
            match result {
                ExtractionResult::Single { event } => assert_eq!(event.title, "Gala"),
                other => panic!("expected Single, got {other:?}"),
            }
        }

        #[test]
        fn multiple_keeps_source_order() {
            let result = validate(WireResponse {
                status: WireStatus::Multiple,
                message: None,
                events: vec![
                    wire_event("First", "2024-03-15T09:00:00"),
                    wire_event("Second", "2024-03-16T09:00:00"),
                    wire_event("Third", "2024-03-17T09:00:00"),
                ],
            })
            .unwrap();
            let titles: Vec<_> = result.events().iter().map(|e| e.title.as_str()).collect();
            assert_eq!(titles, ["First", "Second", "Third"]);
        }

        #[test]
        fn multiple_with_one_survivor_collapses_to_single() {
            let result = validate(WireResponse {
                status: WireStatus::Multiple,
                message: None,
                events: vec![
                    wire_event("Kept", "2024-03-15T09:00:00"),
                    wire_event("", "2024-03-16T09:00:00"),
                ],
            })
            .unwrap();
            assert!(matches!(result, ExtractionResult::Single { .. }));
        }

        #[test]
        fn invalid_events_are_dropped() {
            let result = validate(WireResponse {
                status: WireStatus::Multiple,
                message: None,
                events: vec![
                    wire_event("Valid", "2024-03-15T09:00:00"),
                    wire_event("  ", "2024-03-16T09:00:00"),
                    wire_event("Bad date", "whenever"),
                    wire_event("Also valid", "2024-03-17T09:00:00"),
                ],
            })
            .unwrap();
            assert_eq!(result.events().len(), 2);
        }

        #[test]
        fn zero_survivors_is_invalid_response() {
            let err = validate(WireResponse {
                status: WireStatus::Success,
                message: None,
                events: vec![wire_event("", "nope")],
            })
            .unwrap_err();
            assert_eq!(
                err.code(),
                crate::error::ExtractErrorCode::InvalidResponse
            );
        }

        #[test]
        fn abbreviated_timezone_is_canonicalized() {
            let mut event = wire_event("Gala", "2025-06-01T19:30:00");
            event.timezone = Some("PST".to_string());
            let result = validate(WireResponse {
                status: WireStatus::Success,
                message: None,
                events: vec![event],
            })
            .unwrap();
            assert_eq!(
                result.events()[0].timezone.as_deref(),
                Some("America/Los_Angeles")
            );
        }

        #[test]
        fn unknown_timezone_is_dropped_not_fatal() {
            let mut event = wire_event("Gala", "2025-06-01T19:30:00");
            event.timezone = Some("Mars/Olympus_Mons".to_string());
            let result = validate(WireResponse {
                status: WireStatus::Success,
                message: None,
                events: vec![event],
            })
            .unwrap();
            assert!(result.events()[0].timezone.is_none());
        }

        #[test]
        fn empty_string_optionals_become_absent() {
            let mut event = wire_event("Gala", "2025-06-01T19:30:00");
            event.location = Some("".to_string());
            event.description = Some("   ".to_string());
            let result = validate(WireResponse {
                status: WireStatus::Success,
                message: None,
                events: vec![event],
            })
            .unwrap();
            assert!(result.events()[0].location.is_none());
            assert!(result.events()[0].description.is_none());
        }
    }
}
