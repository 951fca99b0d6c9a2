use std::sync::LazyLock;

use regex::Regex;

use crate::lyrics::LyricRecord;

static LRC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2}:\d{2}\.\d{2})\] ?(.*)").expect("LRC line pattern is valid")
});

/// Extract every `[MM:SS.hh] text` occurrence from line-timed lyrics.
///
/// Unmatched lines (metadata tags such as `[ar:...]`, blank lines) are skipped. Lyric text is
/// trimmed; an empty text is kept, since a trailing blank line marks the end of the song.
pub fn parse_lrc(text: &str) -> Vec<LyricRecord> {
    LRC_LINE
        .captures_iter(text)
        .map(|caps| LyricRecord {
            time: caps[1].to_owned(),
            lyric: caps[2].trim().to_owned(),
        })
        .collect()
}
