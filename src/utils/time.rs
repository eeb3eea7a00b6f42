//! XMLTV timestamp parsing
//!
//! XMLTV uses a compact `YYYYMMDDhhmmss ±hhmm` form. Trailing fields may be
//! omitted (`YYYYMMDDhhmm`, `YYYYMMDD`) and the offset is optional, meaning
//! UTC. Anything else is rejected so that callers can treat the value as an
//! invalid date.

use chrono::{DateTime, NaiveDateTime, Utc};

const FULL_STAMP_LEN: usize = 14;

/// Parse an XMLTV timestamp into UTC, or `None` if it is not a valid date.
pub fn parse_xmltv_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, offset) = value.split_at(digits_end);
    let offset = offset.trim();

    if !matches!(digits.len(), 8 | 10 | 12 | 14) {
        return None;
    }

    let mut stamp = String::with_capacity(FULL_STAMP_LEN);
    stamp.push_str(digits);
    while stamp.len() < FULL_STAMP_LEN {
        stamp.push('0');
    }

    if offset.is_empty() {
        NaiveDateTime::parse_from_str(&stamp, "%Y%m%d%H%M%S")
            .ok()
            .map(|dt| dt.and_utc())
    } else {
        DateTime::parse_from_str(&format!("{stamp} {offset}"), "%Y%m%d%H%M%S %z")
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
