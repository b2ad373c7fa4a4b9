//! Dispatcher applying `Action` to the editor model.
//!
//! Sub-modules:
//! * `edit`        - buffer mutation (insert/delete/newline/tab/paste)
//! * `motion`      - cursor movement
//! * `undo`        - undo / redo
//! * `prompt`      - Save-as / Search prompt editing and submission
//! * `search`      - match cycling and running a query
//! * `persistence` - writing the buffer through the `PersistenceSink`
//!
//! Every mutating command follows the same order: record history (save or
//! debounce), mutate, let the buffer mark itself modified, recompute the
//! viewport. The viewport step happens here once for every dirty result.
//!
//! Mode gate: while a prompt is capturing, only prompt actions are accepted;
//! in Normal mode prompt actions are ignored. Rejections are logged and leave
//! state untouched.

use crate::Action;
use crate::io_ops::PersistenceSink;
use core_model::EditorModel;
use std::time::Instant;

mod edit;
mod motion;
mod persistence;
mod prompt;
mod search;
mod undo;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Something visible changed; repaint.
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }
}

/// Collaborators and settings a dispatch may need besides the model.
pub struct DispatchEnv<'a> {
    pub sink: &'a mut dyn PersistenceSink,
    pub tab_width: usize,
    pub now: Instant,
}

/// Apply an action to the model. Returns `DispatchResult` describing whether
/// a render is needed (`dirty`) or the editor should exit (`quit`).
pub fn dispatch(
    action: Action,
    model: &mut EditorModel,
    env: &mut DispatchEnv<'_>,
) -> DispatchResult {
    let (state, view) = model.split_state_and_view();

    if state.is_capturing() != action.is_prompt_action() {
        tracing::debug!(
            target: "actions.dispatch",
            action = action.name(),
            capturing = state.is_capturing(),
            "action_rejected"
        );
        return DispatchResult::clean();
    }
    tracing::trace!(target: "actions.dispatch", action = action.name(), "dispatch");

    let result = match action {
        Action::InsertChar(c) => edit::insert_char(c, state, view, env.now),
        Action::DeleteChar => edit::delete_char(state, view, env.now),
        Action::Newline => edit::newline(state, view),
        Action::Tab => edit::tab(env.tab_width, state, view, env.now),
        Action::Paste(text) => edit::paste(&text, state, view),
        Action::Move(dir) => motion::handle_move(dir, state),
        Action::Undo => undo::handle_undo(state, view),
        Action::Redo => undo::handle_redo(state, view),
        Action::Save => persistence::handle_save(state, env),
        Action::Find => prompt::begin(core_state::PromptKind::Search, state),
        Action::FindNext => search::handle_next(state),
        Action::FindPrev => search::handle_prev(state),
        Action::Quit => DispatchResult::quit(),
        Action::PromptChar(_)
        | Action::PromptBackspace
        | Action::PromptSubmit
        | Action::PromptCancel => prompt::handle_prompt_action(action, state, env),
    };

    if result.dirty {
        view.follow_cursor(state.buffer.cursor().line, state.buffer.line_count());
    }
    result
}
