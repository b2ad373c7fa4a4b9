use core_text::{Buffer, BufferSnapshot};
use tracing::trace;

/// Default number of snapshots retained in undo history.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// A full-state snapshot for undo/redo: buffer content, cursor, and the
/// viewport origin at capture time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSnapshot {
    pub buffer: BufferSnapshot,
    pub viewport_first_line: usize,
}

impl EditSnapshot {
    pub fn capture(buffer: &Buffer, viewport_first_line: usize) -> Self {
        Self {
            buffer: buffer.snapshot(),
            viewport_first_line,
        }
    }

    fn apply(&self, buffer: &mut Buffer, viewport_first_line: &mut usize) {
        buffer.restore(&self.buffer);
        *viewport_first_line = self.viewport_first_line;
    }
}

/// Bounded undo stack plus unbounded redo stack.
///
/// Saving a new snapshot evicts the oldest entry once the bound is exceeded and
/// always clears redo. Undo/redo swap the live state with the popped snapshot.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<EditSnapshot>,
    redo_stack: Vec<EditSnapshot>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn save(&mut self, snap: EditSnapshot) {
        let lines = snap.buffer.line_count();
        self.undo_stack.push(snap);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), lines, "push_snapshot");
        if self.undo_stack.len() > self.max_depth {
            let _ = self.undo_stack.remove(0);
            trace!(target: "state.undo", max_depth = self.max_depth, "undo_stack_trimmed");
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    pub fn undo(&mut self, buffer: &mut Buffer, viewport_first_line: &mut usize) -> bool {
        let Some(last) = self.undo_stack.pop() else {
            trace!(target: "state.undo", "undo_empty");
            return false;
        };
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        self.redo_stack
            .push(EditSnapshot::capture(buffer, *viewport_first_line));
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), "redo_push_from_undo");
        last.apply(buffer, viewport_first_line);
        true
    }

    pub fn redo(&mut self, buffer: &mut Buffer, viewport_first_line: &mut usize) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            trace!(target: "state.undo", "redo_empty");
            return false;
        };
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
        // Redo is not a new edit: push directly so the redo chain survives.
        self.undo_stack
            .push(EditSnapshot::capture(buffer, *viewport_first_line));
        if self.undo_stack.len() > self.max_depth {
            let _ = self.undo_stack.remove(0);
        }
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "undo_push_from_redo");
        next.apply(buffer, viewport_first_line);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Position;

    fn buf(s: &str) -> Buffer {
        Buffer::from_str("t", s).unwrap()
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        let mut h = History::default();
        let mut b = buf("abc");
        let mut first = 0;
        assert!(!h.undo(&mut b, &mut first));
        assert!(!h.redo(&mut b, &mut first));
        assert_eq!(b.lines(), vec!["abc"]);
    }

    #[test]
    fn save_mutate_undo_restores_then_redo_reapplies() {
        let mut h = History::default();
        let mut b = buf("abc");
        let mut first = 3;
        h.save(EditSnapshot::capture(&b, first));
        b.insert_char('X');
        first = 7;
        assert!(h.undo(&mut b, &mut first));
        assert_eq!(b.lines(), vec!["abc"]);
        assert_eq!(b.cursor(), Position::origin());
        assert_eq!(first, 3);
        assert!(h.redo(&mut b, &mut first));
        assert_eq!(b.lines(), vec!["Xabc"]);
        assert_eq!(b.cursor(), Position::new(0, 1));
        assert_eq!(first, 7);
    }

    #[test]
    fn new_save_clears_redo() {
        let mut h = History::default();
        let mut b = buf("abc");
        let mut first = 0;
        h.save(EditSnapshot::capture(&b, first));
        b.insert_char('1');
        h.undo(&mut b, &mut first);
        assert_eq!(h.redo_depth(), 1);
        h.save(EditSnapshot::capture(&b, first));
        assert_eq!(h.redo_depth(), 0);
        assert!(!h.redo(&mut b, &mut first));
    }

    #[test]
    fn depth_is_bounded_and_oldest_evicted() {
        let mut h = History::new(100);
        let mut b = buf("");
        for i in 0..101 {
            b.insert_char(char::from(b'a' + (i % 26) as u8));
            h.save(EditSnapshot::capture(&b, 0));
        }
        assert_eq!(h.undo_depth(), 100);
        let mut first = 0;
        let mut last = None;
        while h.undo(&mut b, &mut first) {
            last = Some(b.text());
        }
        // snapshot #0 (one char) was evicted; the oldest surviving holds two chars
        assert_eq!(last.unwrap().chars().count(), 2);
    }

    #[test]
    fn redo_chain_survives_multiple_steps() {
        let mut h = History::default();
        let mut b = buf("");
        let mut first = 0;
        for c in ['a', 'b', 'c'] {
            h.save(EditSnapshot::capture(&b, first));
            b.insert_char(c);
        }
        assert!(h.undo(&mut b, &mut first));
        assert!(h.undo(&mut b, &mut first));
        assert_eq!(b.text(), "a");
        assert!(h.redo(&mut b, &mut first));
        assert!(h.redo(&mut b, &mut first));
        assert_eq!(b.text(), "abc");
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn snapshot_survives_live_mutation() {
        let mut h = History::default();
        let mut b = buf("keep");
        h.save(EditSnapshot::capture(&b, 0));
        for _ in 0..4 {
            b.delete_char();
        }
        b.set_cursor(Position::new(0, 4));
        for _ in 0..4 {
            b.delete_char();
        }
        let mut first = 0;
        h.undo(&mut b, &mut first);
        assert_eq!(b.text(), "keep");
    }
}
