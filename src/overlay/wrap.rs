//! Greedy character-count word wrapping.
//!
//! Widths are counted in Unicode scalar values. Text is split into alternating whitespace and
//! word chunks (words also split after interior hyphens), then packed greedily. Whitespace at the
//! edges of wrapped lines is dropped, except leading whitespace on the first line. Words longer
//! than the width are broken, preferring a break right after a hyphen.

const TAB_SIZE: usize = 8;

/// Split `text` on explicit line breaks and wrap each line to `width` characters.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    text.split('\n').flat_map(|line| wrap_line(line, width)).collect()
}

/// Wrap one line to `width` characters.
///
/// An empty or all-whitespace line wraps to a single empty line.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let expanded = expand_tabs(line);
    let mut chunks = split_chunks(&expanded);
    chunks.reverse();

    let mut lines = Vec::<String>::new();
    while !chunks.is_empty() {
        let mut cur_line = Vec::<String>::new();
        let mut cur_len = 0usize;

        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        while let Some(chunk) = chunks.last() {
            let len = char_len(chunk);
            if cur_len + len > width {
                break;
            }
            cur_len += len;
            cur_line.extend(chunks.pop());
        }

        if chunks.last().is_some_and(|c| char_len(c) > width) {
            break_long_word(&mut chunks, &mut cur_line, cur_len, width);
        }

        if cur_line.last().is_some_and(|c| is_blank(c)) {
            cur_line.pop();
        }
        if !cur_line.is_empty() {
            lines.push(cur_line.concat());
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn break_long_word(chunks: &mut Vec<String>, cur_line: &mut Vec<String>, cur_len: usize, width: usize) {
    let space_left = width.saturating_sub(cur_len).max(1);
    let Some(chunk) = chunks.pop() else {
        return;
    };
    let chars: Vec<char> = chunk.chars().collect();

    let mut end = space_left;
    if chars.len() > space_left
        && let Some(hyphen) = chars[..space_left].iter().rposition(|c| *c == '-')
        && hyphen > 0
        && chars[..hyphen].iter().any(|c| *c != '-')
    {
        end = hyphen + 1;
    }
    let end = end.min(chars.len());

    cur_line.push(chars[..end].iter().collect());
    let rest: String = chars[end..].iter().collect();
    if !rest.is_empty() {
        chunks.push(rest);
    }
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0usize;
    for c in line.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - col % TAB_SIZE;
                out.extend(std::iter::repeat_n(' ', pad));
                col += pad;
            }
            '\r' => {
                out.push(c);
                col = 0;
            }
            _ => {
                out.push(c);
                col += 1;
            }
        }
    }
    out
}

/// Alternating whitespace runs and words, words further split after interior hyphens.
fn split_chunks(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut cur_ws: Option<bool> = None;
    for c in text.chars() {
        let ws = c.is_whitespace();
        if cur_ws.is_some_and(|prev| prev != ws) {
            push_chunk(&mut out, std::mem::take(&mut cur), !ws);
        }
        cur.push(c);
        cur_ws = Some(ws);
    }
    if let Some(ws) = cur_ws {
        push_chunk(&mut out, cur, ws);
    }
    out
}

fn push_chunk(out: &mut Vec<String>, chunk: String, is_ws: bool) {
    if is_ws {
        out.push(chunk);
    } else {
        out.extend(split_hyphenated(&chunk));
    }
}

/// `well-known` splits into `well-` and `known`; leading or doubled hyphens do not split.
fn split_hyphenated(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..chars.len().saturating_sub(1) {
        if chars[i] == '-' && chars[i - 1].is_alphanumeric() && chars[i + 1].is_alphabetic() {
            out.push(chars[start..=i].iter().collect());
            start = i + 1;
        }
    }
    out.push(chars[start..].iter().collect());
    out
}

fn is_blank(chunk: &str) -> bool {
    chunk.trim().is_empty()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/wrap.rs"]
mod tests;
