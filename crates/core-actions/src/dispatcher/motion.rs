//! Cursor movement. Moves never touch history or the modified flag.

use super::DispatchResult;
use core_state::EditorState;
use core_text::Direction;

pub(crate) fn handle_move(dir: Direction, state: &mut EditorState) -> DispatchResult {
    let before = state.buffer.cursor();
    if !state.buffer.move_cursor(dir) {
        tracing::trace!(target: "actions.dispatch", op = "move", ?dir, "at_edge");
        return DispatchResult::clean();
    }
    let after = state.buffer.cursor();
    tracing::trace!(target: "actions.dispatch", op = "move", ?dir, line = before.line, col = before.col, to_line = after.line, to_col = after.col, "motion");
    DispatchResult::dirty()
}
