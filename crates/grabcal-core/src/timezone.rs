//! Timezone identifier handling.
//!
//! Extracted timezones are kept as IANA identifiers (`America/Los_Angeles`)
//! rather than ambiguous abbreviations (`PST`). The inference collaborator is
//! asked to resolve abbreviations itself, but its output is not trusted:
//! everything passes through [`resolve`] before reaching a calendar link.
//!
//! Abbreviations are checked before the IANA database because the database
//! contains a few bare legacy zones (`EST`, `MST`) that would otherwise
//! swallow common US abbreviations without their daylight-saving siblings.

use std::str::FromStr;

use chrono_tz::Tz;

/// Returns true if `id` names a zone in the IANA database.
pub fn is_iana(id: &str) -> bool {
    Tz::from_str(id).is_ok()
}

/// Resolves a timezone string to an IANA identifier.
///
/// Accepts IANA names as-is and maps well-known abbreviations to a canonical
/// zone. Returns `None` for anything unrecognized; callers should drop such
/// values and fall back to the request's timezone.
pub fn resolve(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(iana) = abbreviation_to_iana(trimmed) {
        return Some(iana.to_string());
    }
    if is_iana(trimmed) {
        return Some(trimmed.to_string());
    }
    None
}

/// Maps a common timezone abbreviation to its usual IANA zone.
///
/// Abbreviations are inherently ambiguous (IST is India, Ireland, or Israel
/// depending on who you ask); this table picks the most common reading.
fn abbreviation_to_iana(abbr: &str) -> Option<&'static str> {
    let key = abbr.to_ascii_uppercase();
    let iana = match key.as_str() {
        "PT" | "PST" | "PDT" => "America/Los_Angeles",
        "MT" | "MST" | "MDT" => "America/Denver",
        "CT" | "CST" | "CDT" => "America/Chicago",
        "ET" | "EST" | "EDT" => "America/New_York",
        "AKST" | "AKDT" => "America/Anchorage",
        "HST" => "Pacific/Honolulu",
        "AST" | "ADT" => "America/Halifax",
        "GMT" | "UT" | "UTC" => "UTC",
        "BST" => "Europe/London",
        "CET" | "CEST" => "Europe/Paris",
        "EET" | "EEST" => "Europe/Helsinki",
        "WET" | "WEST" => "Europe/Lisbon",
        "IST" => "Asia/Kolkata",
        "JST" => "Asia/Tokyo",
        "KST" => "Asia/Seoul",
        "HKT" => "Asia/Hong_Kong",
        "SGT" => "Asia/Singapore",
        "AEST" | "AEDT" => "Australia/Sydney",
        "ACST" | "ACDT" => "Australia/Adelaide",
        "AWST" => "Australia/Perth",
        "NZST" | "NZDT" => "Pacific/Auckland",
        _ => return None,
    };
    Some(iana)
}
