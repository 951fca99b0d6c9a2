//! Lyric window alignment.
//!
//! Both public entry points run the same two-step pipeline over an immutable slice:
//!
//! 1. [`prune_blank_lines`] drops blank lines, except the very last line of the track, which is
//!    kept as the end-of-song marker.
//! 2. [`windowed_lines`] walks the pruned lines in their given order, skips everything before
//!    the window, rebases onsets to the window start and bounds each line by its successor's
//!    onset, clamped to the window.

use crate::foundation::core::ClipWindow;
use crate::lyrics::{LyricLine, TimedTextEntry};

/// A pruned line positioned inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowedLine<'a> {
    /// Source line.
    pub line: &'a LyricLine,
    /// Onset relative to the window start, without lead-in.
    pub rel_start: f64,
    /// Successor onset relative to the window start, or the window duration.
    pub end: f64,
    /// Whether `end` was clamped to the window boundary.
    pub terminal: bool,
}

/// Drop blank lines, keeping a blank last line as the end-of-song marker.
pub fn prune_blank_lines(lines: &[LyricLine]) -> Vec<&LyricLine> {
    let last = lines.len().saturating_sub(1);
    lines
        .iter()
        .enumerate()
        .filter(|(i, line)| *i == last || !line.is_blank())
        .map(|(_, line)| line)
        .collect()
}

/// Position pruned lines inside `window`.
///
/// The walk stops after the first terminal line. The end-of-song marker only bounds its
/// predecessor and is never positioned itself.
pub fn windowed_lines(window: ClipWindow, lines: &[LyricLine]) -> Vec<WindowedLine<'_>> {
    let kept = prune_blank_lines(lines);
    let duration = window.duration();
    let mut out = Vec::new();

    for (i, line) in kept.iter().copied().enumerate() {
        if line.timestamp < window.start {
            continue;
        }
        if line.timestamp >= window.end || line.is_blank() {
            break;
        }

        let rel_start = line.timestamp - window.start;
        let (end, terminal) = match kept.get(i + 1) {
            Some(next) if next.timestamp < window.end => (next.timestamp - window.start, false),
            _ => (duration, true),
        };
        out.push(WindowedLine {
            line,
            rel_start,
            end,
            terminal,
        });
        if terminal {
            break;
        }
    }
    out
}

/// Align a lyric track to `window`, producing clip-relative timed text entries.
///
/// Every onset is delayed by `lead_in` seconds; a negative or non-finite lead-in counts as zero.
/// An onset that would fall before the previous entry's end (out-of-order input) is moved up to
/// it, and an entry whose onset does not precede its end is dropped, so the output is always
/// sorted, non-overlapping and inside `[0, duration]`. An empty result means no text is drawn;
/// it is not an error.
#[tracing::instrument(level = "debug", skip(lines), fields(line_count = lines.len()))]
pub fn align(window: ClipWindow, lines: &[LyricLine], lead_in: f64) -> Vec<TimedTextEntry> {
    let lead_in = if lead_in.is_finite() { lead_in.max(0.0) } else { 0.0 };
    let mut out = Vec::<TimedTextEntry>::new();
    for w in windowed_lines(window, lines) {
        let prev_end = out.last().map_or(0.0, |e| e.end);
        let start = (w.rel_start + lead_in).max(prev_end);
        if start >= w.end {
            tracing::debug!(
                text = %w.line.text,
                start,
                end = w.end,
                "dropping lyric entry with empty display interval"
            );
            continue;
        }
        out.push(TimedTextEntry {
            start,
            end: w.end,
            text: w.line.text.clone(),
        });
    }
    out
}

/// Collapse the lines inside `window` into one text block, one line per lyric.
///
/// Used as descriptive context for the clip rather than as a timed overlay.
pub fn window_text(window: ClipWindow, lines: &[LyricLine]) -> String {
    let mut out = String::new();
    for w in windowed_lines(window, lines) {
        out.push_str(&w.line.text);
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/lyrics/align.rs"]
mod tests;
