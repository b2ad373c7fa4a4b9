//! Undo / Redo. Both commit a pending typing burst first, then restore the
//! snapshot including its viewport origin.

use super::DispatchResult;
use core_model::View;
use core_state::EditorState;

pub(crate) fn handle_undo(state: &mut EditorState, view: &mut View) -> DispatchResult {
    if state.undo(&mut view.first_line) {
        tracing::trace!(target: "actions.dispatch", op = "undo", undo_depth = state.undo_depth(), redo_depth = state.redo_depth(), "history");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_redo(state: &mut EditorState, view: &mut View) -> DispatchResult {
    if state.redo(&mut view.first_line) {
        tracing::trace!(target: "actions.dispatch", op = "redo", undo_depth = state.undo_depth(), redo_depth = state.redo_depth(), "history");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
