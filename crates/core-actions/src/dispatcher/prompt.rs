//! Prompt capture: the Save-as and Search prompts.
//!
//! Entering a prompt switches the state to `CapturingAuxiliaryInput`; the
//! prompt keeps receiving keystrokes through the normal dispatch path until
//! it is submitted or cancelled, which always returns to `Normal`.

use super::{DispatchEnv, DispatchResult, persistence, search};
use crate::Action;
use core_state::{EditorState, PromptKind};
use std::path::PathBuf;

pub(crate) fn begin(kind: PromptKind, state: &mut EditorState) -> DispatchResult {
    state.begin_prompt(kind);
    DispatchResult::dirty()
}

pub(crate) fn handle_prompt_action(
    action: Action,
    state: &mut EditorState,
    env: &mut DispatchEnv<'_>,
) -> DispatchResult {
    match action {
        Action::PromptChar(ch) => {
            state.prompt.push_char(ch);
            DispatchResult::dirty()
        }
        Action::PromptBackspace => {
            state.prompt.backspace();
            DispatchResult::dirty()
        }
        Action::PromptSubmit => submit(state, env),
        Action::PromptCancel => cancel(state, env),
        _ => DispatchResult::clean(),
    }
}

fn submit(state: &mut EditorState, env: &mut DispatchEnv<'_>) -> DispatchResult {
    let Some((kind, value)) = state.end_prompt() else {
        return DispatchResult::dirty();
    };
    let value = value.trim();
    match kind {
        PromptKind::SaveAs => {
            if value.is_empty() {
                tracing::debug!(target: "actions.dispatch", op = "save_as", "save_cancelled_empty_name");
                state.set_ephemeral("Save cancelled", env.now);
                return DispatchResult::dirty();
            }
            state.file_name = Some(PathBuf::from(value));
            persistence::write_current(state, env)
        }
        PromptKind::Search => search::run_query(value, state, env.now),
    }
}

fn cancel(state: &mut EditorState, env: &mut DispatchEnv<'_>) -> DispatchResult {
    if let Some((PromptKind::SaveAs, _)) = state.end_prompt() {
        state.set_ephemeral("Save cancelled", env.now);
    }
    DispatchResult::dirty()
}
