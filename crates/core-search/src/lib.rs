//! Match index over buffer lines with a cycling "current match" cursor.
//!
//! Matching is case-insensitive and non-overlapping, scanning each line left to
//! right and resuming after the end of every hit. ANSI escape sequences are
//! skipped while matching so decorated text still matches on its visible
//! characters. Reported positions are char columns into the stored line, and
//! each hit carries its stored width, which includes any escapes it spans.
//!
//! The index is a snapshot of the lines it was built from. Edits made after a
//! `search` are not reflected until the next `search`.

use std::sync::OnceLock;

use core_text::Position;
use regex::Regex;
use tracing::{debug, trace};

fn ansi_pattern() -> Option<&'static Regex> {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    // OSC (BEL or ST terminated), CSI, then the remaining two-byte ESC forms.
    ANSI.get_or_init(|| {
        Regex::new(r"\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b[@-Z\\-_]").ok()
    })
    .as_ref()
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Visible chars of `line`, case-folded, each paired with its char column in `line`.
fn visible_chars(line: &str) -> Vec<(char, usize)> {
    let escapes: Vec<(usize, usize)> = ansi_pattern()
        .map(|re| re.find_iter(line).map(|m| (m.start(), m.end())).collect())
        .unwrap_or_default();
    let mut out = Vec::with_capacity(line.len());
    let mut esc = escapes.iter().peekable();
    for (col, (byte, ch)) in line.char_indices().enumerate() {
        while esc.next_if(|&&(_, end)| end <= byte).is_some() {}
        if esc.peek().is_some_and(|&&(start, _)| start <= byte) {
            continue;
        }
        out.push((fold(ch), col));
    }
    out
}

/// Non-overlapping case-insensitive hits of `needle` in `line` as
/// (start column, width) in stored chars.
fn find_in_line(line: &str, needle: &[char]) -> Vec<(usize, usize)> {
    let hay = visible_chars(line);
    let mut hits = Vec::new();
    if needle.is_empty() || needle.len() > hay.len() {
        return hits;
    }
    let mut start = 0;
    while start + needle.len() <= hay.len() {
        let window = &hay[start..start + needle.len()];
        if window.iter().map(|(c, _)| *c).eq(needle.iter().copied()) {
            let first = window[0].1;
            let last = window[needle.len() - 1].1;
            hits.push((first, last + 1 - first));
            start += needle.len();
        } else {
            start += 1;
        }
    }
    hits
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchIndex {
    query: String,
    matches: Vec<Position>,
    /// Stored char width of each match, parallel to `matches`.
    widths: Vec<usize>,
    current: Option<usize>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index for `query` over `lines`. A blank query clears all state.
    pub fn search<S: AsRef<str>>(&mut self, lines: &[S], query: &str) -> usize {
        let query = query.trim();
        if query.is_empty() {
            self.clear();
            return 0;
        }
        let needle: Vec<char> = query.chars().map(fold).collect();
        let mut matches = Vec::new();
        let mut widths = Vec::new();
        for (line_idx, line) in lines.iter().enumerate() {
            for (col, width) in find_in_line(line.as_ref(), &needle) {
                matches.push(Position::new(line_idx, col));
                widths.push(width);
            }
        }
        self.query = query.to_string();
        self.current = if matches.is_empty() { None } else { Some(0) };
        self.matches = matches;
        self.widths = widths;
        debug!(
            target: "search",
            query_len = self.query.chars().count(),
            lines = lines.len(),
            matches = self.matches.len(),
            "search_indexed"
        );
        self.matches.len()
    }

    /// Advance the current match cyclically. `None` when there are no matches.
    pub fn next_match(&mut self) -> Option<Position> {
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        let idx = self.current.map_or(0, |c| (c + 1) % n);
        self.current = Some(idx);
        trace!(target: "search", idx, total = n, "next_match");
        Some(self.matches[idx])
    }

    /// Step back to the previous match cyclically. `None` when there are no matches.
    pub fn prev_match(&mut self) -> Option<Position> {
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        let idx = self.current.map_or(n - 1, |c| (c + n - 1) % n);
        self.current = Some(idx);
        trace!(target: "search", idx, total = n, "prev_match");
        Some(self.matches[idx])
    }

    /// Matches on `line`, in column order.
    pub fn matches_for_line(&self, line: usize) -> Vec<Position> {
        self.matches.iter().copied().filter(|m| m.line == line).collect()
    }

    /// Matches on `line` with their stored widths, in column order.
    pub fn spans_for_line(&self, line: usize) -> Vec<(Position, usize)> {
        self.matches
            .iter()
            .copied()
            .zip(self.widths.iter().copied())
            .filter(|(m, _)| m.line == line)
            .collect()
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.widths.clear();
        self.current = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[Position] {
        &self.matches
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn current_match(&self) -> Option<Position> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    #[test]
    fn finds_all_non_overlapping_matches() {
        let mut s = SearchIndex::new();
        let n = s.search(&["test test", "x", "test"], "test");
        assert_eq!(n, 3);
        assert_eq!(s.matches(), &[p(0, 0), p(0, 5), p(2, 0)]);
        assert_eq!(s.current_match(), Some(p(0, 0)));
    }

    #[test]
    fn overlapping_candidates_resume_after_match() {
        let mut s = SearchIndex::new();
        s.search(&["aaaa"], "aa");
        assert_eq!(s.matches(), &[p(0, 0), p(0, 2)]);
    }

    #[test]
    fn case_insensitive() {
        let mut s = SearchIndex::new();
        s.search(&["Hello HELLO hello"], "hElLo");
        assert_eq!(s.matches().len(), 3);
    }

    #[test]
    fn query_is_trimmed() {
        let mut s = SearchIndex::new();
        s.search(&["abc"], "  b ");
        assert_eq!(s.query(), "b");
        assert_eq!(s.matches(), &[p(0, 1)]);
    }

    #[test]
    fn empty_query_clears_state() {
        let mut s = SearchIndex::new();
        s.search(&["abc"], "a");
        assert!(s.has_matches());
        s.search(&["abc"], "   ");
        assert!(!s.has_matches());
        assert_eq!(s.query(), "");
        assert_eq!(s.current_match(), None);
    }

    #[test]
    fn ansi_sequences_are_skipped_and_columns_stay_stored() {
        let mut s = SearchIndex::new();
        s.search(&["\x1b[31mred\x1b[0m word"], "word");
        assert_eq!(s.matches(), &[p(0, 13)]);
        assert_eq!(s.spans_for_line(0), vec![(p(0, 13), 4)]);
        s.search(&["\x1b[31mred\x1b[0m text"], "red");
        assert_eq!(s.spans_for_line(0), vec![(p(0, 5), 3)]);
    }

    #[test]
    fn match_across_escape_spans_the_escape() {
        let mut s = SearchIndex::new();
        s.search(&["\x1b[1mbo\x1b[0mld"], "bold");
        assert_eq!(s.spans_for_line(0), vec![(p(0, 4), 8)]);
    }

    #[test]
    fn osc_title_sequence_is_skipped_whole() {
        let mut s = SearchIndex::new();
        s.search(&["\x1b]0;title\x07x title"], "title");
        assert_eq!(s.matches(), &[p(0, 12)]);
        s.search(&["\x1b]8;;http://a\x1b\\link"], "link");
        assert_eq!(s.matches(), &[p(0, 15)]);
        s.search(&["\x1b]0;title\x07"], "title");
        assert!(!s.has_matches());
    }

    #[test]
    fn columns_are_char_offsets() {
        let mut s = SearchIndex::new();
        s.search(&["ééé x"], "x");
        assert_eq!(s.matches(), &[p(0, 4)]);
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut s = SearchIndex::new();
        s.search(&["test test", "x", "test"], "test");
        assert_eq!(s.next_match(), Some(p(0, 5)));
        assert_eq!(s.next_match(), Some(p(2, 0)));
        assert_eq!(s.next_match(), Some(p(0, 0)));
        assert_eq!(s.prev_match(), Some(p(2, 0)));
        assert_eq!(s.prev_match(), Some(p(0, 5)));
    }

    #[test]
    fn navigation_without_matches_is_none() {
        let mut s = SearchIndex::new();
        assert_eq!(s.next_match(), None);
        assert_eq!(s.prev_match(), None);
        s.search(&["abc"], "zzz");
        assert_eq!(s.next_match(), None);
        assert_eq!(s.current_match(), None);
    }

    #[test]
    fn matches_for_line_filters_without_moving_current() {
        let mut s = SearchIndex::new();
        s.search(&["test test", "x", "test"], "test");
        s.next_match();
        assert_eq!(s.matches_for_line(0), vec![p(0, 0), p(0, 5)]);
        assert!(s.matches_for_line(1).is_empty());
        assert_eq!(s.current_match(), Some(p(0, 5)));
    }

    #[test]
    fn clear_resets_everything() {
        let mut s = SearchIndex::new();
        s.search(&["abc abc"], "abc");
        s.clear();
        assert_eq!(s, SearchIndex::new());
    }
}
