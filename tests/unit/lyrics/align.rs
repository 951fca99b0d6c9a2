use super::*;

fn win(start: f64, end: f64) -> ClipWindow {
    ClipWindow::new(start, end).unwrap()
}

fn track(lines: &[(f64, &str)]) -> Vec<LyricLine> {
    lines.iter().map(|(t, s)| LyricLine::new(*t, *s)).collect()
}

/// SplitMix64, enough to sweep inputs deterministically.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[test]
fn reference_track_yields_single_terminal_entry() {
    let lines = track(&[(0.0, "A"), (5.0, "B"), (10.0, "")]);
    let entries = align(win(2.0, 8.0), &lines, 0.10);
    assert_eq!(entries.len(), 1);
    assert!((entries[0].start - 3.10).abs() < 1e-9);
    assert_eq!(entries[0].end, 6.0);
    assert_eq!(entries[0].text, "B");
}

#[test]
fn successor_onset_bounds_each_entry_without_lead_in() {
    let lines = track(&[(10.0, "a"), (12.0, "b"), (15.0, "c"), (30.0, "d")]);
    let entries = align(win(10.0, 20.0), &lines, 0.10);
    let spans: Vec<(f64, f64, &str)> = entries
        .iter()
        .map(|e| (e.start, e.end, e.text.as_str()))
        .collect();
    assert_eq!(spans.len(), 3);
    assert!((spans[0].0 - 0.10).abs() < 1e-9);
    assert_eq!(spans[0].1, 2.0);
    assert!((spans[1].0 - 2.10).abs() < 1e-9);
    assert_eq!(spans[1].1, 5.0);
    assert_eq!(spans[2].1, 10.0);
    assert_eq!(spans[2].2, "c");
}

#[test]
fn blank_lines_are_pruned_except_the_last() {
    let lines = track(&[(0.0, "a"), (1.0, ""), (2.0, "  "), (3.0, "b"), (4.0, "")]);
    let kept: Vec<&str> = prune_blank_lines(&lines)
        .into_iter()
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(kept, vec!["a", "b", ""]);

    // With "" at 1.0 pruned, "a" runs until "b".
    let entries = align(win(0.0, 10.0), &lines, 0.0);
    assert_eq!(entries.len(), 2);
    assert_eq!((entries[0].start, entries[0].end), (0.0, 3.0));
    assert_eq!((entries[1].start, entries[1].end), (3.0, 4.0));
}

#[test]
fn last_line_without_successor_extends_to_window_end() {
    let lines = track(&[(1.0, "a"), (3.0, "b")]);
    let entries = align(win(0.0, 6.0), &lines, 0.0);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].start, 3.0);
    assert_eq!(entries[1].end, 6.0);

    let windowed = windowed_lines(win(0.0, 6.0), &lines);
    assert!(windowed[1].terminal);
    assert!(!windowed[0].terminal);
}

#[test]
fn end_marker_inside_window_only_bounds_its_predecessor() {
    let lines = track(&[(1.0, "a"), (3.0, "")]);
    let entries = align(win(0.0, 6.0), &lines, 0.0);
    assert_eq!(entries.len(), 1);
    assert_eq!((entries[0].start, entries[0].end), (1.0, 3.0));
}

#[test]
fn empty_results_are_not_errors() {
    assert!(align(win(0.0, 5.0), &[], 0.1).is_empty());
    let late = track(&[(9.0, "x"), (12.0, "y")]);
    assert!(align(win(2.0, 8.0), &late, 0.1).is_empty());
    let early = track(&[(0.0, "x"), (1.0, "y")]);
    assert!(align(win(2.0, 8.0), &early, 0.1).is_empty());
}

#[test]
fn lead_in_past_successor_drops_the_entry() {
    let lines = track(&[(1.0, "a"), (1.05, "b"), (4.0, "c")]);
    let entries = align(win(0.0, 8.0), &lines, 0.10);
    let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["b", "c"]);
}

#[test]
fn negative_lead_in_keeps_every_line() {
    let lines = track(&[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
    let entries = align(win(0.0, 10.0), &lines, -0.05);
    let spans: Vec<(f64, f64, &str)> = entries
        .iter()
        .map(|e| (e.start, e.end, e.text.as_str()))
        .collect();
    assert_eq!(
        spans,
        vec![(1.0, 2.0, "a"), (2.0, 3.0, "b"), (3.0, 10.0, "c")]
    );
    assert_eq!(align(win(0.0, 10.0), &lines, f64::NAN), entries);
}

#[test]
fn out_of_order_onset_starts_at_previous_end() {
    let lines = track(&[(1.0, "a"), (4.0, "b"), (3.0, "c"), (6.0, "d")]);
    let entries = align(win(0.0, 8.0), &lines, 0.0);
    let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
    // "a" runs until 4.0, so "b" (bounded by 3.0) is empty and "c" waits for "a" to end.
    assert_eq!(texts, vec!["a", "c", "d"]);
    assert_eq!((entries[0].start, entries[0].end), (1.0, 4.0));
    assert_eq!((entries[1].start, entries[1].end), (4.0, 6.0));
}

#[test]
fn lead_in_past_window_end_drops_terminal_entry() {
    let lines = track(&[(7.95, "late"), (9.0, "next")]);
    assert!(align(win(2.0, 8.0), &lines, 0.10).is_empty());
}

#[test]
fn invariants_hold_for_generated_tracks() {
    let mut rng = Rng(0x5eed);
    for _ in 0..500 {
        let n = (rng.next_u64() % 12) as usize;
        let mut t = 0.0;
        let mut lines = Vec::with_capacity(n);
        for i in 0..n {
            t += rng.unit() * 4.0;
            let text = if rng.next_u64() % 5 == 0 {
                String::new()
            } else {
                format!("line {i}")
            };
            lines.push(LyricLine::new(t, text));
        }
        let start = rng.unit() * 20.0;
        let window = win(start, start + 0.5 + rng.unit() * 15.0);
        let lead_in = rng.unit() * 0.3;

        let entries = align(window, &lines, lead_in);
        let duration = window.duration();
        for e in &entries {
            assert!(e.start >= 0.0, "{e:?}");
            assert!(e.start < e.end, "{e:?}");
            assert!(e.end <= duration + 1e-9, "{e:?} in {window:?}");
        }
        for pair in entries.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(pair[0].end <= pair[1].start);
        }
    }
}

#[test]
fn alignment_is_deterministic() {
    let lines = track(&[(0.5, "a"), (2.25, "b"), (4.0, "c\nd"), (9.0, "")]);
    let a = align(win(1.0, 7.0), &lines, 0.1);
    let b = align(win(1.0, 7.0), &lines, 0.1);
    assert_eq!(a, b);
    assert_eq!(a[1].text, "c\nd");
}

#[test]
fn window_text_joins_windowed_lines() {
    let lines = track(&[(0.0, "A"), (3.0, "B"), (4.0, ""), (5.0, "C"), (10.0, "")]);
    assert_eq!(window_text(win(2.0, 8.0), &lines), "B\nC\n");
    assert_eq!(window_text(win(20.0, 28.0), &lines), "");
}
