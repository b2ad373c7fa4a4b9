//! High-level editor model: editor state plus the single view onto it.
//!
//! A `View` owns presentation state (the first visible line and the number of
//! text rows available), while the cursor stays with the buffer inside
//! `EditorState`. Keeping the viewport out of `core-state` lets history
//! snapshots carry the viewport origin without the state crate knowing about
//! terminal geometry.
//!
//! Core invariants (must hold after every public call):
//! * `view.first_line <= max(0, line_count - text_rows)`.
//! * After `follow_cursor`, the cursor line lies inside
//!   `first_line..first_line + text_rows` whenever `text_rows > 0`.

use core_state::EditorState;

mod frame;
pub use frame::{FrameLine, HighlightSpan, RenderFrame, StatusInfo};

/// Terminal rows assumed when the terminal reports none.
pub const DEFAULT_TERMINAL_ROWS: usize = 24;
/// Rows reserved below the text area (status / prompt line).
pub const STATUS_ROWS: usize = 1;

/// Compute the first visible line that keeps `cursor_line` on screen.
///
/// Scrolls the minimum amount: up to the cursor when it is above the window,
/// down so the cursor is on the last row when it is below. The result is
/// clamped to `[0, max(0, line_count - visible_rows)]`.
pub fn compute_viewport_start(
    cursor_line: usize,
    line_count: usize,
    first_line: usize,
    visible_rows: usize,
) -> usize {
    if visible_rows == 0 {
        return 0;
    }
    let mut first = first_line;
    if cursor_line < first {
        first = cursor_line;
    } else if cursor_line >= first + visible_rows {
        first = cursor_line + 1 - visible_rows;
    }
    first.min(line_count.saturating_sub(visible_rows))
}

/// Number of text rows for a terminal of `terminal_rows` rows. Zero falls back
/// to `fallback_rows`.
pub fn text_rows_for(terminal_rows: usize, fallback_rows: usize) -> usize {
    let rows = if terminal_rows == 0 {
        fallback_rows
    } else {
        terminal_rows
    };
    rows.saturating_sub(STATUS_ROWS).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub first_line: usize,
    pub text_rows: usize,
}

impl Default for View {
    fn default() -> Self {
        Self::new(text_rows_for(DEFAULT_TERMINAL_ROWS, DEFAULT_TERMINAL_ROWS))
    }
}

impl View {
    pub fn new(text_rows: usize) -> Self {
        Self {
            first_line: 0,
            text_rows,
        }
    }

    /// Scroll to keep `cursor_line` visible. Returns true if the first line changed.
    pub fn follow_cursor(&mut self, cursor_line: usize, line_count: usize) -> bool {
        let new_first =
            compute_viewport_start(cursor_line, line_count, self.first_line, self.text_rows);
        if new_first != self.first_line {
            tracing::trace!(target: "model.view", old = self.first_line, new = new_first, "viewport_scrolled");
            self.first_line = new_first;
            true
        } else {
            false
        }
    }

    /// Buffer line range currently on screen.
    pub fn visible_range(&self, line_count: usize) -> std::ops::Range<usize> {
        let start = self.first_line.min(line_count);
        let end = (self.first_line + self.text_rows).min(line_count);
        start..end
    }
}

pub struct EditorModel {
    state: EditorState,
    view: View,
}

impl EditorModel {
    pub fn new(state: EditorState) -> Self {
        Self::with_view(View::default(), state)
    }

    pub fn with_view(view: View, state: EditorState) -> Self {
        Self { state, view }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }
    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Borrow the state and the view mutably at the same time.
    pub fn split_state_and_view(&mut self) -> (&mut EditorState, &mut View) {
        (&mut self.state, &mut self.view)
    }

    /// Recompute the viewport from the current cursor and buffer length.
    pub fn follow_cursor(&mut self) -> bool {
        let cursor_line = self.state.buffer.cursor().line;
        let line_count = self.state.buffer.line_count();
        self.view.follow_cursor(cursor_line, line_count)
    }

    /// Apply a new terminal height and keep the cursor visible.
    pub fn resize(&mut self, text_rows: usize) -> bool {
        self.view.text_rows = text_rows.max(1);
        self.follow_cursor()
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame::build(&self.state, &self.view)
    }
}
