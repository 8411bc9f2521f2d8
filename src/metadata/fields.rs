//! Decoders for the sub-fields some upstreams wrap in vendor-specific text.
//!
//! None of these fail: anything that cannot be decoded comes back as its
//! zero value so the rest of the track still shows.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:([0-9.]+)S)?$").expect("duration pattern is valid")
});

/// Characters wrapping the millisecond payload in `/Date(1605627484420+0000)/`.
const EPOCH_WRAPPER: &str = "\\/Date()";

/// Decode a `PT#H#M#S` token into seconds.
///
/// Each component is optional and decoded on its own; a missing or
/// unparsable component counts as zero, and so does a token that does not
/// match the grammar at all.
pub(crate) fn parse_iso_duration(token: &str) -> f64 {
    let Some(caps) = ISO_DURATION.captures(token.trim()) else {
        return 0.0;
    };

    let component = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    };

    component(1) * 3600.0 + component(2) * 60.0 + component(3)
}

/// Decode a `/Date(<millis>[+-offset])/` start time.
///
/// The offset suffix is dropped before parsing; the result is the payload
/// read as epoch milliseconds, truncated to whole seconds.
pub(crate) fn parse_wrapped_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let inner = raw.trim().trim_matches(|c: char| EPOCH_WRAPPER.contains(c));

    // Skip the first char so a leading sign stays part of the number.
    let end = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)
        .unwrap_or(inner.len());

    let millis = inner[..end].parse::<i64>().ok()?;
    from_epoch_millis(millis)
}

/// Decode `YYYY-MM-DD HH:MM:SS[.frac]±HH:MM` (or the RFC 3339 `T` form).
pub(crate) fn parse_offset_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.trim().replacen(' ', "T", 1);
    DateTime::parse_from_rfc3339(&normalized)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Epoch milliseconds to a timestamp. Zero and negative values mean unknown.
pub(crate) fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    if millis <= 0 {
        return None;
    }
    DateTime::from_timestamp(millis / 1000, 0)
}
