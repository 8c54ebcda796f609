//! Source timestamp normalization
//!
//! Detail pages and JSONP payloads carry timestamps in the source site's
//! local time, in a handful of formats. Parsing applies a fixed UTC offset
//! (a site-level constant, never inferred per item) and normalizes to
//! `DateTime<Utc>`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Naive formats accepted from source sites, tried in order
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parses a source timestamp and normalizes it to UTC
///
/// Timestamps that carry their own offset (RFC 3339 / RFC 2822) are honored
/// as written. Naive timestamps are interpreted at `offset_hours` east of
/// UTC. Returns `None` when no known format matches; callers treat a missing
/// date as a degraded field, not an item failure.
pub fn parse_with_offset(raw: &str, offset_hours: i32) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset = FixedOffset::east_opt(offset_hours.checked_mul(3600)?)?;

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local_to_utc(naive, offset);
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return local_to_utc(date.and_hms_opt(0, 0, 0)?, offset);
        }
    }

    None
}

fn local_to_utc(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    naive
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
