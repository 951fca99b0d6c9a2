//! Lyric track model, parsing and window alignment.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ClipError, ClipResult};

pub mod align;
pub mod lrc;
pub mod timestamp;

/// One raw lyric record as produced by the lyrics collaborator: `{"time": "MM:SS.hh", "lyric": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LyricRecord {
    /// `MM:SS.hh` onset.
    pub time: String,
    /// Line text, possibly empty.
    pub lyric: String,
}

/// A lyric line with its onset in absolute track seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LyricLine {
    /// Onset in seconds from the start of the source track.
    pub timestamp: f64,
    /// Line text, possibly empty.
    pub text: String,
}

impl LyricLine {
    pub fn new(timestamp: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }

    /// Whether this line carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl TryFrom<&LyricRecord> for LyricLine {
    type Error = ClipError;

    fn try_from(record: &LyricRecord) -> ClipResult<Self> {
        Ok(Self {
            timestamp: timestamp::parse_timestamp(&record.time)?,
            text: record.lyric.clone(),
        })
    }
}

/// A clip-relative text interval produced by [`align::align`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedTextEntry {
    /// First instant the text is visible, seconds from clip start.
    pub start: f64,
    /// Last instant the text is visible, seconds from clip start.
    pub end: f64,
    /// Text to draw; may contain explicit line breaks.
    pub text: String,
}

impl TimedTextEntry {
    /// Whether the entry is visible at `t` (both ends inclusive).
    pub fn is_visible_at(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Convert raw records into timed lines, preserving order.
///
/// A single malformed timestamp fails the whole track: without it the track has no reliable
/// total order.
pub fn lines_from_records(records: &[LyricRecord]) -> ClipResult<Vec<LyricLine>> {
    records.iter().map(LyricLine::try_from).collect()
}

/// Load a lyric track from a JSON record array or an `.lrc` file.
pub fn load_lyric_track(path: &Path) -> ClipResult<Vec<LyricLine>> {
    let text = std::fs::read_to_string(path).map_err(|e| ClipError::missing_asset(path, e))?;
    let is_lrc = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("lrc"));

    let records = if is_lrc {
        lrc::parse_lrc(&text)
    } else {
        serde_json::from_str::<Vec<LyricRecord>>(&text)
            .with_context(|| format!("parse lyric records '{}'", path.display()))?
    };
    let lines = lines_from_records(&records)?;
    tracing::debug!(path = %path.display(), lines = lines.len(), "loaded lyric track");
    Ok(lines)
}

#[cfg(test)]
#[path = "../../tests/unit/lyrics/track.rs"]
mod tests;
