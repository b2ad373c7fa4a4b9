//! Rope-backed line buffer with an owned cursor.
//!
//! The buffer stores its lines joined by `\n` inside a `ropey::Rope` with no
//! trailing newline, so `line_count()` is exactly the number of logical lines
//! and an empty rope already represents the single empty line every buffer
//! must hold.
//!
//! Invariants (hold after every public call):
//! * `line_count() >= 1`.
//! * `cursor.line < line_count()` and `cursor.col <= line_len(cursor.line)`.
//!
//! Columns are `char` offsets within a line. One `char` is one column; wide
//! glyphs and grapheme clusters are not special cased.

use anyhow::Result;
use ropey::Rope;

/// A position inside a buffer expressed as (line index, char column within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.col = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.col > max_len {
            self.col = max_len;
        }
    }
}

/// Cursor navigation direction as decoded by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Point-in-time copy of buffer content and cursor.
///
/// Rope clones share structure and copy on write, so a snapshot never observes
/// edits made to the live buffer after it was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSnapshot {
    rope: Rope,
    cursor: Position,
}

impl BufferSnapshot {
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Owned copy of every line (without separators).
    pub fn lines(&self) -> Vec<String> {
        collect_lines(&self.rope)
    }
}

/// A text buffer backed by a `ropey::Rope`, owning its cursor and modified flag.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    cursor: Position,
    modified: bool,
    pub name: String,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor)
            .field("modified", &self.modified)
            .finish()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::empty("untitled")
    }
}

impl Buffer {
    /// A buffer holding exactly one empty line.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            rope: Rope::new(),
            cursor: Position::origin(),
            modified: false,
            name: name.into(),
        }
    }

    /// Construct a buffer from LF-normalized text. A single trailing newline
    /// terminates the last line rather than opening a new empty one.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        let body = content.strip_suffix('\n').unwrap_or(content);
        Ok(Self {
            rope: Rope::from_str(body),
            cursor: Position::origin(),
            modified: false,
            name: name.into(),
        })
    }

    /// Construct a buffer from discrete lines. An empty iterator yields one empty line.
    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for (i, l) in lines.into_iter().enumerate() {
            if i > 0 {
                joined.push('\n');
            }
            joined.push_str(l.as_ref());
        }
        Self {
            rope: Rope::from_str(&joined),
            cursor: Position::origin(),
            modified: false,
            name: name.into(),
        }
    }

    /// Total number of lines in the buffer (never zero).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Return the requested line without its separator.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Char length of a line excluding its separator (0 when out of range).
    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(idx);
        let n = slice.len_chars();
        if n > 0 && slice.char(n - 1) == '\n' {
            n - 1
        } else {
            n
        }
    }

    /// Owned copy of every line (without separators).
    pub fn lines(&self) -> Vec<String> {
        collect_lines(&self.rope)
    }

    /// Whole buffer content joined by `\n` (no trailing newline).
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor to `pos`, clamping it into the buffer.
    pub fn set_cursor(&mut self, pos: Position) {
        let mut p = pos;
        let count = self.line_count();
        p.clamp_to(count, |l| self.line_len(l));
        self.cursor = p;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag (called only after a successful save).
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    fn cursor_char_index(&self) -> usize {
        self.rope.line_to_char(self.cursor.line) + self.cursor.col
    }

    /// Insert `c` at the cursor and advance one column. A `'\n'` splits the line.
    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let idx = self.cursor_char_index();
        self.rope.insert_char(idx, c);
        self.cursor.col += 1;
        self.modified = true;
    }

    /// Backspace: remove the char before the cursor, joining with the previous
    /// line at column 0. Returns false (no-op) at the buffer origin.
    pub fn delete_char(&mut self) -> bool {
        if self.cursor.col > 0 {
            let idx = self.cursor_char_index();
            self.rope.remove(idx - 1..idx);
            self.cursor.col -= 1;
            self.modified = true;
            return true;
        }
        if self.cursor.line == 0 {
            return false;
        }
        let prev_line = self.cursor.line - 1;
        let join_col = self.line_len(prev_line);
        // The separator sits right before the first char of the current line.
        let newline_idx = self.rope.line_to_char(self.cursor.line) - 1;
        self.rope.remove(newline_idx..newline_idx + 1);
        self.cursor = Position::new(prev_line, join_col);
        self.modified = true;
        true
    }

    /// Split the current line at the cursor. Cursor moves to the start of the new line.
    pub fn insert_newline(&mut self) {
        let idx = self.cursor_char_index();
        self.rope.insert_char(idx, '\n');
        self.cursor = Position::new(self.cursor.line + 1, 0);
        self.modified = true;
    }

    /// Insert `width` spaces at the cursor.
    pub fn insert_tab(&mut self, width: usize) {
        if width == 0 {
            return;
        }
        let idx = self.cursor_char_index();
        self.rope.insert(idx, &" ".repeat(width));
        self.cursor.col += width;
        self.modified = true;
    }

    /// Insert a multi-line block as whole lines ahead of the cursor line.
    ///
    /// The block is split on newlines (CRLF / CR accepted; one trailing newline
    /// does not add an empty line) and the resulting N lines are placed before
    /// the current line. The cursor line advances by N so it stays on the line
    /// it was on; the column is left untouched. Returns the number of lines
    /// inserted (0 for empty input).
    pub fn insert_block(&mut self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let body = normalized.strip_suffix('\n').unwrap_or(&normalized);
        let inserted = body.split('\n').count();
        let at = self.rope.line_to_char(self.cursor.line);
        let mut chunk = String::with_capacity(body.len() + 1);
        chunk.push_str(body);
        chunk.push('\n');
        self.rope.insert(at, &chunk);
        self.cursor.line += inserted;
        self.modified = true;
        inserted
    }

    /// Move the cursor one step. Returns false when already at the buffer edge.
    pub fn move_cursor(&mut self, dir: Direction) -> bool {
        let Position { line, col } = self.cursor;
        match dir {
            Direction::Up => {
                if line == 0 {
                    return false;
                }
                self.cursor.line -= 1;
                self.cursor.col = col.min(self.line_len(line - 1));
            }
            Direction::Down => {
                if line + 1 >= self.line_count() {
                    return false;
                }
                self.cursor.line += 1;
                self.cursor.col = col.min(self.line_len(line + 1));
            }
            Direction::Left => {
                if col > 0 {
                    self.cursor.col -= 1;
                } else if line > 0 {
                    self.cursor = Position::new(line - 1, self.line_len(line - 1));
                } else {
                    return false;
                }
            }
            Direction::Right => {
                if col < self.line_len(line) {
                    self.cursor.col += 1;
                } else if line + 1 < self.line_count() {
                    self.cursor = Position::new(line + 1, 0);
                } else {
                    return false;
                }
            }
        }
        true
    }

    /// Capture content + cursor by value.
    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            rope: self.rope.clone(),
            cursor: self.cursor,
        }
    }

    /// Replace content + cursor with a copy of `snap`. Marks the buffer
    /// modified only when the content actually differs.
    pub fn restore(&mut self, snap: &BufferSnapshot) {
        if self.rope != snap.rope {
            self.modified = true;
        }
        self.rope = snap.rope.clone();
        self.set_cursor(snap.cursor);
    }
}

fn collect_lines(rope: &Rope) -> Vec<String> {
    rope.lines()
        .map(|l| {
            let mut s = l.to_string();
            if s.ends_with('\n') {
                s.pop();
            }
            s
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::from_lines("t", lines.iter().copied())
    }

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::from_str("test", "hello\nworld\n").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "hello");
        assert_eq!(b.line(1).unwrap(), "world");
        assert_eq!(b.line(2), None);
    }

    #[test]
    fn unicode_separators_are_not_line_breaks() {
        let b = Buffer::from_str("t", "a\u{2028}b\u{85}c\u{b}d\nz").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line_len(0), 7);
        assert_eq!(b.line(1).unwrap(), "z");
    }

    #[test]
    fn empty_buffer_has_one_line() {
        let b = Buffer::from_lines("t", Vec::<String>::new());
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.lines(), vec![String::new()]);
        assert_eq!(Buffer::from_str("t", "").unwrap().line_count(), 1);
    }

    #[test]
    fn insert_char_middle() {
        let mut b = buf(&["abc"]);
        b.set_cursor(Position::new(0, 1));
        b.insert_char('X');
        assert_eq!(b.line(0).unwrap(), "aXbc");
        assert_eq!(b.cursor(), Position::new(0, 2));
        assert!(b.is_modified());
    }

    #[test]
    fn delete_char_before_cursor() {
        let mut b = buf(&["abc"]);
        b.set_cursor(Position::new(0, 3));
        assert!(b.delete_char());
        assert_eq!(b.line(0).unwrap(), "ab");
        assert_eq!(b.cursor().col, 2);
    }

    #[test]
    fn delete_char_joins_lines() {
        let mut b = buf(&["ab", "cd"]);
        b.set_cursor(Position::new(1, 0));
        assert!(b.delete_char());
        assert_eq!(b.lines(), vec!["abcd"]);
        assert_eq!(b.cursor(), Position::new(0, 2));
    }

    #[test]
    fn delete_char_at_origin_noop() {
        let mut b = buf(&["hi", "there"]);
        assert!(!b.delete_char());
        assert_eq!(b.lines(), vec!["hi", "there"]);
        assert_eq!(b.cursor(), Position::origin());
        assert!(!b.is_modified());
    }

    #[test]
    fn insert_newline_split() {
        let mut b = buf(&["abcd"]);
        b.set_cursor(Position::new(0, 2));
        b.insert_newline();
        assert_eq!(b.lines(), vec!["ab", "cd"]);
        assert_eq!(b.cursor(), Position::new(1, 0));
    }

    #[test]
    fn insert_newline_at_end_creates_empty_line() {
        let mut b = buf(&["abc"]);
        b.set_cursor(Position::new(0, 3));
        b.insert_newline();
        assert_eq!(b.lines(), vec!["abc", ""]);
        assert_eq!(b.cursor(), Position::new(1, 0));
    }

    #[test]
    fn newline_then_delete_round_trip() {
        let mut b = buf(&["hello world"]);
        b.set_cursor(Position::new(0, 5));
        b.insert_newline();
        b.delete_char();
        assert_eq!(b.lines(), vec!["hello world"]);
        assert_eq!(b.cursor(), Position::new(0, 5));
    }

    #[test]
    fn insert_then_split_then_join_scenario() {
        let mut b = buf(&["abc"]);
        b.insert_char('X');
        assert_eq!(b.lines(), vec!["Xabc"]);
        assert_eq!(b.cursor(), Position::new(0, 1));
        b.insert_newline();
        assert_eq!(b.lines(), vec!["X", "abc"]);
        assert_eq!(b.cursor(), Position::new(1, 0));
        b.delete_char();
        assert_eq!(b.lines(), vec!["Xabc"]);
        assert_eq!(b.cursor(), Position::new(0, 1));
    }

    #[test]
    fn move_right_wraps_to_next_line() {
        let mut b = buf(&["ab", "cd"]);
        b.set_cursor(Position::new(0, 2));
        assert!(b.move_cursor(Direction::Right));
        assert_eq!(b.cursor(), Position::new(1, 0));
    }

    #[test]
    fn move_left_wraps_to_previous_line_end() {
        let mut b = buf(&["abc", "d"]);
        b.set_cursor(Position::new(1, 0));
        assert!(b.move_cursor(Direction::Left));
        assert_eq!(b.cursor(), Position::new(0, 3));
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut b = buf(&["long line", "ab", "another long"]);
        b.set_cursor(Position::new(0, 7));
        assert!(b.move_cursor(Direction::Down));
        assert_eq!(b.cursor(), Position::new(1, 2));
        // column is clamped, not remembered
        assert!(b.move_cursor(Direction::Down));
        assert_eq!(b.cursor(), Position::new(2, 2));
    }

    #[test]
    fn moves_at_edges_are_noops() {
        let mut b = buf(&["ab"]);
        assert!(!b.move_cursor(Direction::Up));
        assert!(!b.move_cursor(Direction::Left));
        assert!(!b.move_cursor(Direction::Down));
        b.set_cursor(Position::new(0, 2));
        assert!(!b.move_cursor(Direction::Right));
        assert_eq!(b.cursor(), Position::new(0, 2));
    }

    #[test]
    fn insert_tab_inserts_spaces_at_cursor() {
        let mut b = buf(&["ab"]);
        b.set_cursor(Position::new(0, 1));
        b.insert_tab(3);
        assert_eq!(b.line(0).unwrap(), "a   b");
        assert_eq!(b.cursor(), Position::new(0, 4));
    }

    #[test]
    fn insert_block_places_lines_before_cursor_line() {
        let mut b = buf(&["one", "two", "three"]);
        b.set_cursor(Position::new(1, 2));
        let n = b.insert_block("x\ny\n");
        assert_eq!(n, 2);
        assert_eq!(b.lines(), vec!["one", "x", "y", "two", "three"]);
        // cursor follows the line it was on; column untouched
        assert_eq!(b.cursor(), Position::new(3, 2));
    }

    #[test]
    fn insert_block_normalizes_crlf_and_ignores_empty() {
        let mut b = buf(&["z"]);
        assert_eq!(b.insert_block(""), 0);
        assert!(!b.is_modified());
        assert_eq!(b.insert_block("a\r\nb"), 2);
        assert_eq!(b.lines(), vec!["a", "b", "z"]);
        assert_eq!(b.cursor().line, 2);
    }

    #[test]
    fn set_cursor_clamps() {
        let mut b = buf(&["abc", "d"]);
        b.set_cursor(Position::new(10, 10));
        assert_eq!(b.cursor(), Position::new(1, 1));
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let mut b = buf(&["abc"]);
        let snap = b.snapshot();
        b.insert_char('Z');
        b.insert_newline();
        assert_eq!(snap.lines(), vec!["abc"]);
        assert_eq!(snap.cursor(), Position::origin());
    }

    #[test]
    fn snapshot_restore_round_trip_is_noop() {
        let mut b = buf(&["abc", "def"]);
        b.set_cursor(Position::new(1, 2));
        let snap = b.snapshot();
        b.restore(&snap);
        assert_eq!(b.lines(), vec!["abc", "def"]);
        assert_eq!(b.cursor(), Position::new(1, 2));
        assert!(!b.is_modified(), "identical restore must not mark modified");
    }

    #[test]
    fn restore_does_not_alias_snapshot() {
        let mut b = buf(&["abc"]);
        let snap = b.snapshot();
        b.insert_char('Q');
        b.restore(&snap);
        b.insert_char('R');
        assert_eq!(snap.lines(), vec!["abc"]);
        assert_eq!(b.lines(), vec!["Rabc"]);
    }

    #[test]
    fn non_ascii_columns_are_chars() {
        let mut b = buf(&["héllo"]);
        b.set_cursor(Position::new(0, 2));
        b.insert_char('ß');
        assert_eq!(b.line(0).unwrap(), "héßllo");
        assert_eq!(b.line_len(0), 6);
        b.delete_char();
        b.delete_char();
        assert_eq!(b.line(0).unwrap(), "hllo");
    }
}
