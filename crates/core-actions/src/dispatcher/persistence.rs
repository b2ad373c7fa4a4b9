//! Saving the buffer through the session's `PersistenceSink`.
//!
//! A failed write leaves buffer contents and the modified flag untouched and
//! surfaces the error on the status line.

use super::{DispatchEnv, DispatchResult, prompt};
use crate::io_ops::display_name;
use core_state::{EditorState, PromptKind};

pub(crate) fn handle_save(state: &mut EditorState, env: &mut DispatchEnv<'_>) -> DispatchResult {
    if state.file_name.is_none() {
        return prompt::begin(PromptKind::SaveAs, state);
    }
    write_current(state, env)
}

/// Write the buffer to `state.file_name`, prompting for one when unset.
pub(crate) fn write_current(state: &mut EditorState, env: &mut DispatchEnv<'_>) -> DispatchResult {
    let Some(path) = state.file_name.clone() else {
        return prompt::begin(PromptKind::SaveAs, state);
    };
    let lines = state.buffer.lines();
    match env.sink.write(&path, &lines, state.original_line_ending) {
        Ok(()) => {
            state.buffer.mark_saved();
            tracing::info!(target: "actions.dispatch", op = "save", path = %path.display(), lines = lines.len(), "saved");
            state.set_ephemeral(format!("✓ Saved to {}", display_name(&path)), env.now);
        }
        Err(e) => {
            tracing::error!(target: "actions.dispatch", op = "save", path = %path.display(), error = %e, "save_failed");
            state.set_ephemeral(format!("✗ Error saving file: {e}"), env.now);
        }
    }
    DispatchResult::dirty()
}
