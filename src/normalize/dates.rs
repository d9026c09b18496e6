//! Date and date-time recognition.
//!
//! Upstream services format timestamps in many ways. Every text scalar is
//! tried against [`PATTERNS`] in order; the first that parses the whole
//! string decides the display format.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Display format for date-only values, e.g. `1 January 2024`.
pub const DATE_FORMAT: &str = "%-d %B %Y";
/// Display format for times that carried seconds.
pub const DATE_TIME_SECONDS_FORMAT: &str = "%-d %B %Y, %-I:%M:%S %p";
/// Display format for times given to the minute.
pub const DATE_TIME_MINUTES_FORMAT: &str = "%-d %B %Y, %-I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Date,
    Seconds,
    Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Date,
    Naive,
    Offset,
}

struct Pattern {
    format: &'static str,
    kind: Kind,
    precision: Precision,
}

const fn pattern(format: &'static str, kind: Kind, precision: Precision) -> Pattern {
    Pattern {
        format,
        kind,
        precision,
    }
}

/// Accepted input formats, first match wins.
const PATTERNS: &[Pattern] = &[
    pattern("%Y-%m-%d", Kind::Date, Precision::Date),
    pattern("%d/%m/%Y", Kind::Date, Precision::Date),
    pattern("%Y-%m-%dT%H:%M:%S", Kind::Naive, Precision::Seconds),
    pattern("%Y-%m-%dT%H:%M:%S%.f", Kind::Naive, Precision::Seconds),
    pattern("%Y-%m-%d %H:%M:%S", Kind::Naive, Precision::Seconds),
    pattern("%Y-%m-%d %H:%M:%S%.f", Kind::Naive, Precision::Seconds),
    pattern("%Y-%m-%dT%H:%M", Kind::Naive, Precision::Minutes),
    pattern("%Y-%m-%d %H:%M", Kind::Naive, Precision::Minutes),
    pattern("%d/%m/%Y %H:%M:%S", Kind::Naive, Precision::Seconds),
    pattern("%d/%m/%Y %H:%M", Kind::Naive, Precision::Minutes),
    pattern("%Y-%m-%dT%H:%M:%S%:z", Kind::Offset, Precision::Seconds),
    pattern("%Y-%m-%dT%H:%M:%S%.f%:z", Kind::Offset, Precision::Seconds),
    pattern("%Y-%m-%d %H:%M:%S%:z", Kind::Offset, Precision::Seconds),
    pattern("%Y-%m-%d %H:%M:%S%.f%:z", Kind::Offset, Precision::Seconds),
    pattern("%Y-%m-%dT%H:%M%:z", Kind::Offset, Precision::Minutes),
];

/// Reformat `text` for display if it is a recognized date or date-time.
///
/// Offset timestamps are shown in their own local time; no zone
/// conversion happens. Returns `None` when nothing matches.
pub fn format_date_like(text: &str) -> Option<String> {
    let trimmed = text.trim();
    // cheap reject before trying every pattern
    if trimmed.len() < 8 || !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let offset_input = zulu_to_offset(trimmed);

    PATTERNS.iter().find_map(|p| {
        let naive = match p.kind {
            Kind::Date => NaiveDate::parse_from_str(trimmed, p.format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            Kind::Naive => NaiveDateTime::parse_from_str(trimmed, p.format).ok(),
            Kind::Offset => DateTime::parse_from_str(&offset_input, p.format)
                .ok()
                .map(|dt| dt.naive_local()),
        }?;

        let display = match p.precision {
            Precision::Date => DATE_FORMAT,
            Precision::Seconds => DATE_TIME_SECONDS_FORMAT,
            Precision::Minutes => DATE_TIME_MINUTES_FORMAT,
        };
        Some(naive.format(display).to_string())
    })
}

/// `2024-01-01T10:00:00Z` becomes `2024-01-01T10:00:00+00:00`.
fn zulu_to_offset(text: &str) -> String {
    match text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        Some(stem) => format!("{}+00:00", stem),
        None => text.to_string(),
    }
}
