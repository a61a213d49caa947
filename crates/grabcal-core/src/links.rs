//! Calendar link construction for "Add to Calendar" actions.
//!
//! Builds the two link targets the rendered fragment offers:
//! - a Google Calendar event-template deep link
//! - an ICS calendar file packed into a `data:` URI for download
//!
//! Both carry the wall-clock compact tokens from [`crate::time`] verbatim;
//! the timezone travels separately (`ctz` parameter, `TZID` property) so no
//! clock value is ever shifted during link construction. Absent optional
//! fields are omitted entirely rather than sent as empty parameters.

use urlencoding::encode;

use crate::event::EventRecord;
use crate::time::EventWindow;

const GOOGLE_CALENDAR_BASE: &str = "https://calendar.google.com/calendar/render";
const ICS_PRODID: &str = "-//grabcal//EN";

/// The pair of action links for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLinks {
    /// Google Calendar `render?action=TEMPLATE` deep link.
    pub google: String,
    /// `data:text/calendar` URI holding a minimal ICS file.
    pub ics: String,
}

impl CalendarLinks {
    /// Builds both links for an event.
    ///
    /// `timezone` is the effective timezone (the event's own, or the
    /// request fallback); `None` omits timezone information from both links.
    pub fn build(event: &EventRecord, window: &EventWindow, timezone: Option<&str>) -> Self {
        Self {
            google: google_calendar_url(event, window, timezone),
            ics: ics_data_uri(event, window, timezone),
        }
    }
}

/// Builds a Google Calendar event-template URL.
///
/// `text` and `dates` are always present; `location`, `details`, and `ctz`
/// appear only when the event supplies them.
pub fn google_calendar_url(
    event: &EventRecord,
    window: &EventWindow,
    timezone: Option<&str>,
) -> String {
    let mut url = format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}",
        GOOGLE_CALENDAR_BASE,
        encode(&event.title),
        window.start.compact(),
        window.end.compact()
    );

    if let Some(ref location) = event.location {
        url.push_str("&location=");
        url.push_str(&encode(location));
    }
    if let Some(ref description) = event.description {
        url.push_str("&details=");
        url.push_str(&encode(description));
    }
    if let Some(tz) = timezone {
        url.push_str("&ctz=");
        url.push_str(&encode(tz));
    }

    url
}

/// Builds a `data:text/calendar` URI containing a minimal ICS file.
pub fn ics_data_uri(event: &EventRecord, window: &EventWindow, timezone: Option<&str>) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", ICS_PRODID),
        "BEGIN:VEVENT".to_string(),
        format!("DTSTART:{}", window.start.compact()),
        format!("DTEND:{}", window.end.compact()),
        format!("SUMMARY:{}", event.title),
    ];

    if let Some(ref description) = event.description {
        // ICS text values carry literal newlines as the two characters "\n".
        lines.push(format!("DESCRIPTION:{}", description.replace('\n', "\\n")));
    }
    if let Some(ref location) = event.location {
        lines.push(format!("LOCATION:{}", location));
    }
    if let Some(tz) = timezone {
        lines.push(format!("TZID:{}", tz));
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    format!(
        "data:text/calendar;charset=utf-8,{}",
        encode(&lines.join("\n"))
    )
}
