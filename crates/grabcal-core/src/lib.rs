//! Core types: events, wall-clock time, calendar links, fragment rendering

pub mod event;
pub mod links;
pub mod render;
pub mod time;
pub mod timezone;
pub mod tracing;

pub use event::{EventRecord, ExtractionResult};
pub use links::{google_calendar_url, ics_data_uri, CalendarLinks};
pub use render::{html_escape, render, render_error, MAX_RENDERED_EVENTS};
pub use time::{EventWindow, WallClock, DEFAULT_EVENT_SECONDS};
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
