//! Buffer mutation.
//!
//! Typing edits (char, backspace, tab) coalesce through the history debounce:
//! the first edit of a burst parks the pre-edit snapshot. Structural edits
//! (newline, paste) commit any parked burst and save a snapshot of their own
//! before mutating.

use super::DispatchResult;
use core_model::View;
use core_state::EditorState;
use core_text::Position;
use std::time::Instant;

pub(crate) fn insert_char(
    c: char,
    state: &mut EditorState,
    view: &View,
    now: Instant,
) -> DispatchResult {
    if c == '\n' {
        return newline(state, view);
    }
    if c.is_control() {
        return DispatchResult::clean();
    }
    let before = state.buffer.cursor();
    state.record_typing(now, view.first_line);
    state.buffer.insert_char(c);
    tracing::trace!(target: "actions.dispatch", op = "insert_char", line = before.line, col = before.col, "edit");
    DispatchResult::dirty()
}

pub(crate) fn delete_char(state: &mut EditorState, view: &View, now: Instant) -> DispatchResult {
    let before = state.buffer.cursor();
    if before == Position::origin() {
        tracing::trace!(target: "actions.dispatch", op = "delete_char", "noop_at_origin");
        return DispatchResult::clean();
    }
    state.record_typing(now, view.first_line);
    state.buffer.delete_char();
    let after = state.buffer.cursor();
    tracing::trace!(target: "actions.dispatch", op = "delete_char", line = before.line, col = before.col, to_line = after.line, to_col = after.col, "edit");
    DispatchResult::dirty()
}

pub(crate) fn newline(state: &mut EditorState, view: &View) -> DispatchResult {
    let before = state.buffer.cursor();
    state.record_discrete(view.first_line);
    state.buffer.insert_newline();
    tracing::trace!(target: "actions.dispatch", op = "newline", line = before.line, col = before.col, "edit");
    DispatchResult::dirty()
}

pub(crate) fn tab(
    width: usize,
    state: &mut EditorState,
    view: &View,
    now: Instant,
) -> DispatchResult {
    if width == 0 {
        return DispatchResult::clean();
    }
    state.record_typing(now, view.first_line);
    state.buffer.insert_tab(width);
    tracing::trace!(target: "actions.dispatch", op = "tab", width, "edit");
    DispatchResult::dirty()
}

pub(crate) fn paste(text: &str, state: &mut EditorState, view: &View) -> DispatchResult {
    if text.is_empty() {
        return DispatchResult::clean();
    }
    state.record_discrete(view.first_line);
    let inserted = state.buffer.insert_block(text);
    tracing::debug!(target: "actions.dispatch", op = "paste", bytes = text.len(), lines = inserted, "edit");
    DispatchResult::dirty()
}
