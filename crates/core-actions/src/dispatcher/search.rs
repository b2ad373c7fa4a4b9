//! Search: running a query and cycling the cursor through its matches.
//!
//! The index is not rebuilt on edits; cycling after an edit lands on the
//! stored positions, clamped to the current buffer.

use super::DispatchResult;
use core_state::EditorState;
use core_text::Position;
use std::time::Instant;

/// Index `query` over the buffer and jump to the first match.
pub(crate) fn run_query(query: &str, state: &mut EditorState, now: Instant) -> DispatchResult {
    let lines = state.buffer.lines();
    let count = state.search.search(&lines, query);
    if state.search.query().is_empty() {
        state.set_ephemeral("Search cleared", now);
        return DispatchResult::dirty();
    }
    let shown = state.search.query().to_string();
    match state.search.current_match() {
        Some(first) => {
            jump(first, state);
            let noun = if count == 1 { "match" } else { "matches" };
            state.set_ephemeral(format!("{count} {noun} for \"{shown}\""), now);
        }
        None => state.set_ephemeral(format!("No matches for \"{shown}\""), now),
    }
    DispatchResult::dirty()
}

pub(crate) fn handle_next(state: &mut EditorState) -> DispatchResult {
    match state.search.next_match() {
        Some(pos) => {
            jump(pos, state);
            DispatchResult::dirty()
        }
        None => DispatchResult::clean(),
    }
}

pub(crate) fn handle_prev(state: &mut EditorState) -> DispatchResult {
    match state.search.prev_match() {
        Some(pos) => {
            jump(pos, state);
            DispatchResult::dirty()
        }
        None => DispatchResult::clean(),
    }
}

fn jump(pos: Position, state: &mut EditorState) {
    state.buffer.set_cursor(pos);
    tracing::trace!(target: "actions.dispatch", op = "search_jump", line = pos.line, col = pos.col, "motion");
}
