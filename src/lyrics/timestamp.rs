use crate::foundation::error::{ClipError, ClipResult};

/// Parse a `MM:SS.hh` lyric timestamp into seconds.
///
/// Minutes are an unsigned integer of any width; seconds are a non-negative decimal below 60.
/// Anything else is a [`ClipError::MalformedTimestamp`].
pub fn parse_timestamp(value: &str) -> ClipResult<f64> {
    let trimmed = value.trim();
    let Some((mins, secs)) = trimmed.split_once(':') else {
        return Err(ClipError::malformed_timestamp(value, "missing ':' separator"));
    };
    if mins.is_empty() || !mins.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClipError::malformed_timestamp(
            value,
            "minutes must be an unsigned integer",
        ));
    }
    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(ClipError::malformed_timestamp(
            value,
            "seconds must be a non-negative decimal",
        ));
    }
    let mins: u64 = mins
        .parse()
        .map_err(|_| ClipError::malformed_timestamp(value, "minutes out of range"))?;
    let secs: f64 = secs
        .parse()
        .map_err(|_| ClipError::malformed_timestamp(value, "seconds are not a number"))?;
    if secs >= 60.0 {
        return Err(ClipError::malformed_timestamp(value, "seconds must be < 60"));
    }
    Ok((mins as f64) * 60.0 + secs)
}

/// Format seconds back into `MM:SS.hh`.
pub fn format_timestamp(secs: f64) -> String {
    let centis = (secs.max(0.0) * 100.0).round() as u64;
    let mins = centis / 6000;
    let rem = centis % 6000;
    format!("{:02}:{:02}.{:02}", mins, rem / 100, rem % 100)
}
