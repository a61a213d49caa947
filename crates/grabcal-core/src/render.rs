//! HTML fragment rendering for extraction results.
//!
//! Maps an [`ExtractionResult`] to one of three fragment shapes: a single
//! event card, a capped list of event cards, or an error notice. The output
//! is always a fragment meant for injection into a host container (a modal),
//! never a full document.
//!
//! Every user-supplied value, including constructed link URLs, passes
//! through the one shared [`html_escape`] at its interpolation point, so
//! extracted text can never inject markup into the fragment. Rendering is a
//! pure function of its inputs: the same result renders to the same bytes.

use crate::event::{EventRecord, ExtractionResult};
use crate::links::CalendarLinks;
use crate::time::EventWindow;

/// Maximum number of events rendered in a multi-event fragment.
///
/// Extraction may return more; the fragment stays bounded regardless.
pub const MAX_RENDERED_EVENTS: usize = 5;

/// Stylesheet shared by all three fragment shapes.
const FRAGMENT_STYLE: &str = "\
<style>
  .grabcal-container { padding: 30px; }
  .grabcal-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 20px; }
  .grabcal-header h2 { margin: 0; font-size: 22px; color: #333; }
  .grabcal-close { background: none; border: none; font-size: 28px; color: #999; cursor: pointer; padding: 0; width: 32px; height: 32px; line-height: 1; }
  .grabcal-close:hover { color: #333; }
  .grabcal-details { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
  .grabcal-details p { margin: 8px 0; font-size: 14px; color: #666; line-height: 1.5; }
  .grabcal-details strong { color: #333; }
  .grabcal-item { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 15px; }
  .grabcal-item h3 { margin: 0 0 10px 0; font-size: 18px; color: #333; }
  .grabcal-item p { margin: 5px 0; font-size: 14px; color: #666; }
  .grabcal-item-buttons { display: flex; gap: 10px; margin-top: 12px; }
  .grabcal-buttons { display: flex; gap: 10px; flex-direction: column; }
  .grabcal-button { display: block; padding: 14px; text-align: center; text-decoration: none; border-radius: 6px; font-weight: 500; font-size: 14px; flex: 1; }
  .grabcal-button-primary { background: #4285f4; color: white; }
  .grabcal-button-secondary { background: #34a853; color: white; }
  .grabcal-button:hover { opacity: 0.9; }
  .grabcal-error { background: #fee; border: 1px solid #fcc; padding: 20px; border-radius: 8px; color: #c33; }
  .grabcal-error p { margin: 0 0 10px 0; font-size: 14px; line-height: 1.5; }
  .grabcal-hint { color: #999; font-size: 13px; }
</style>
";

/// Escapes text for HTML interpolation.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders an extraction result as an HTML fragment.
///
/// `fallback_timezone` applies to events that carry no timezone of their own.
pub fn render(result: &ExtractionResult, fallback_timezone: &str) -> String {
    match result {
        ExtractionResult::Failed { message } => render_error(message),
        ExtractionResult::Single { event } => render_single(event, fallback_timezone),
        ExtractionResult::Multiple { events } => render_multiple(events, fallback_timezone),
    }
}

/// Renders the error fragment.
///
/// Used both for failed extractions (HTTP 200) and for rejected requests
/// (HTTP 400); the transport status is the caller's concern.
pub fn render_error(message: &str) -> String {
    format!(
        "{style}\
<div class=\"grabcal-container\">\n\
  {header}\n\
  <div class=\"grabcal-error\">\n\
    <p>{message}</p>\n\
    <p class=\"grabcal-hint\">Try selecting the event text on the page before retrying.</p>\n\
  </div>\n\
</div>\n",
        style = FRAGMENT_STYLE,
        header = header("No Event Found"),
        message = html_escape(message),
    )
}

fn render_single(event: &EventRecord, fallback_timezone: &str) -> String {
    let mut details = String::new();
    details.push_str(&detail_row("Title", &event.title));
    push_date_rows(&mut details, event);
    if let Some(ref location) = event.location {
        details.push_str(&detail_row("Location", location));
    }
    if let Some(ref description) = event.description {
        details.push_str(&detail_row("Description", description));
    }

    format!(
        "{style}\
<div class=\"grabcal-container\">\n\
  {header}\n\
  <div class=\"grabcal-details\">\n\
{details}\
  </div>\n\
  <div class=\"grabcal-buttons\">\n\
{buttons}\
  </div>\n\
</div>\n",
        style = FRAGMENT_STYLE,
        header = header("Event Found"),
        buttons = action_buttons(event, fallback_timezone, "event.ics"),
    )
}

fn render_multiple(events: &[EventRecord], fallback_timezone: &str) -> String {
    let items: String = events
        .iter()
        .take(MAX_RENDERED_EVENTS)
        .enumerate()
        .map(|(index, event)| render_item(event, fallback_timezone, index))
        .collect();

    format!(
        "{style}\
<div class=\"grabcal-container\">\n\
  {header}\n\
{items}\
</div>\n",
        style = FRAGMENT_STYLE,
        header = header("Multiple Events Found"),
    )
}

fn render_item(event: &EventRecord, fallback_timezone: &str, index: usize) -> String {
    let start = EventWindow::resolve(&event.start_date, event.end_date.as_deref())
        .map(|w| w.start.display())
        .unwrap_or_else(|| event.start_date.clone());

    let mut body = format!(
        "  <div class=\"grabcal-item\">\n\
    <h3>{}</h3>\n\
    <p><strong>Date:</strong> {}</p>\n",
        html_escape(&event.title),
        html_escape(&start),
    );
    if let Some(ref location) = event.location {
        body.push_str(&format!(
            "    <p><strong>Location:</strong> {}</p>\n",
            html_escape(location)
        ));
    }
    body.push_str(&format!(
        "    <div class=\"grabcal-item-buttons\">\n{}    </div>\n  </div>\n",
        action_buttons(event, fallback_timezone, &format!("event-{index}.ics")),
    ));
    body
}

fn header(title: &str) -> String {
    format!(
        "<div class=\"grabcal-header\">\n\
    <h2>{}</h2>\n\
    <button class=\"grabcal-close\" data-close-modal aria-label=\"Close\">&times;</button>\n\
  </div>",
        html_escape(title)
    )
}

fn detail_row(label: &str, value: &str) -> String {
    format!(
        "    <p><strong>{}:</strong> {}</p>\n",
        label,
        html_escape(value)
    )
}

/// Appends the formatted date rows for the single-event card.
///
/// An unparseable start (possible only if upstream validation is bypassed)
/// falls back to showing the raw string, links omitted by `action_buttons`.
fn push_date_rows(details: &mut String, event: &EventRecord) {
    match EventWindow::resolve(&event.start_date, event.end_date.as_deref()) {
        Some(window) => {
            details.push_str(&detail_row("Date", &window.start.display()));
            if event.end_date.is_some() {
                details.push_str(&detail_row("End", &window.end.display()));
            }
        }
        None => details.push_str(&detail_row("Date", &event.start_date)),
    }
}

/// Renders the Google Calendar / ICS download link pair for one event.
///
/// Returns an empty string when the event's start cannot be resolved; a card
/// without working links beats a link pointing at a garbage date.
fn action_buttons(event: &EventRecord, fallback_timezone: &str, ics_name: &str) -> String {
    let Some(window) = EventWindow::resolve(&event.start_date, event.end_date.as_deref()) else {
        return String::new();
    };
    let timezone = event.timezone_or(fallback_timezone);
    let links = CalendarLinks::build(event, &window, Some(timezone));

    format!(
        "    <a href=\"{}\" target=\"_blank\" class=\"grabcal-button grabcal-button-primary\">Add to Google Calendar</a>\n\
    <a href=\"{}\" download=\"{}\" class=\"grabcal-button grabcal-button-secondary\">Download ICS File</a>\n",
        html_escape(&links.google),
        html_escape(&links.ics),
        html_escape(ics_name),
    )
}
