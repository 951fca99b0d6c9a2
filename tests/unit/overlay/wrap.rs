use super::*;

#[test]
fn long_unbroken_run_splits_without_loss() {
    let text = "x".repeat(70);
    let lines = wrap_line(&text, 35);
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.chars().count() <= 35));
    assert_eq!(lines.concat(), text);
}

#[test]
fn words_pack_greedily_and_edges_are_trimmed() {
    let lines = wrap_line("the quick brown fox jumps over the lazy dog", 10);
    assert_eq!(
        lines,
        vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
    );
}

#[test]
fn empty_and_blank_lines_wrap_to_one_empty_line() {
    assert_eq!(wrap_line("", 35), vec![String::new()]);
    assert_eq!(wrap_line("   \t ", 35), vec![String::new()]);
}

#[test]
fn leading_whitespace_survives_on_first_line_only() {
    assert_eq!(wrap_line("  hi there", 35), vec!["  hi there"]);
    assert_eq!(wrap_line("  aaaa bbbb", 6), vec!["  aaaa", "bbbb"]);
}

#[test]
fn explicit_breaks_are_wrapped_independently() {
    let lines = wrap_text("first line\n\nsecond", 35);
    assert_eq!(lines, vec!["first line", "", "second"]);
}

#[test]
fn hyphenated_words_break_after_the_hyphen() {
    assert_eq!(
        wrap_line("a well-known phrase", 8),
        vec!["a well-", "known", "phrase"]
    );
    assert_eq!(split_hyphenated("--x"), vec!["--x"]);
    assert_eq!(split_hyphenated("x-1"), vec!["x-1"]);
}

#[test]
fn long_word_prefers_hyphen_break() {
    assert_eq!(wrap_line("x-12345678", 5), vec!["x-", "12345", "678"]);
    assert_eq!(wrap_line("abc-defghijkl", 6), vec!["abc-de", "fghijk", "l"]);
}

#[test]
fn multibyte_text_counts_scalar_values() {
    let text = "ශ්‍රී ලංකා ".repeat(6);
    for line in wrap_line(&text, 35) {
        assert!(line.chars().count() <= 35, "{line:?}");
    }
    let sinhala = "අ".repeat(40);
    let lines = wrap_line(&sinhala, 35);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].chars().count(), 35);
}
