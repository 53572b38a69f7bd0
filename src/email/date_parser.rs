//! Parsing of `Date:` header values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::debug;

use crate::error::{BackupError, Result};

/// Formats tried, in order, once RFC 2822 parsing failed.
///
/// The order matters: a malformed value may match more than one pattern.
const FALLBACK_FORMATS: &[(&str, bool)] = &[
    ("%a, %d %b %Y %H:%M:%S %z", true),
    ("%a, %d %b %Y %H:%M:%S", false),
    ("%d %b %Y %H:%M:%S %z", true),
    ("%Y-%m-%d %H:%M:%S%z", true),
];

/// Parses a header date into a time-zone aware point in time.
///
/// Returns `None` when no strategy understands the value. Values without an
/// explicit offset are taken as UTC.
pub fn parse_email_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let value = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(&value) {
        return Some(date);
    }

    for (format, has_offset) in FALLBACK_FORMATS {
        let parsed = if *has_offset {
            DateTime::parse_from_str(&value, format).ok()
        } else {
            NaiveDateTime::parse_from_str(&value, format)
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        };

        if let Some(date) = parsed {
            debug!("Date '{}' matched fallback format '{}'", value, format);
            return Some(date);
        }
    }

    debug!("Unable to parse date '{}'", value);
    None
}

/// Finds the `Date:` header in a raw message and returns its unfolded value.
pub fn extract_date_header(raw_message: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw_message);
    let mut value: Option<String> = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break; // end of headers
        }

        if line.starts_with([' ', '\t']) {
            // continuation of the previous field
            if let Some(value) = value.as_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if value.is_some() {
            break;
        }

        if let Some((name, rest)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("date") {
                value = Some(rest.trim().to_string());
            }
        }
    }

    value
}

/// Parses a cutoff given either as RFC 3339 or as a bare `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_cutoff(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| Utc.from_local_datetime(&naive).single())
        .ok_or_else(|| {
            BackupError::Config(format!(
                "'{}' is not a date (expected YYYY-MM-DD or RFC 3339)",
                raw
            ))
        })
}
