//! Editing commands: the `Action` vocabulary, key translation, dispatch and
//! the `EditSession` that ties them to persistence.
//!
//! Flow: `key_translator` turns one decoded terminal event into at most one
//! `Action`; `EditSession::dispatch` routes it through `dispatcher`, which
//! mutates the `EditorModel` and reports whether a repaint or exit is needed.

pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;
pub mod session;

pub use dispatcher::{DispatchEnv, DispatchResult, dispatch};
pub use io_ops::{FsSink, LoadOutcome, PersistenceSink, SaveError, load_buffer};
pub use key_translator::{translate_input, translate_key};
pub use session::{EditSession, SessionOptions};

use core_text::Direction;

/// One logical editor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    InsertChar(char),
    DeleteChar,
    Newline,
    Move(Direction),
    Tab,
    Undo,
    Redo,
    Save,
    Find,
    FindNext,
    FindPrev,
    /// Multi-line block inserted ahead of the cursor line.
    Paste(String),
    Quit,
    PromptChar(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,
}

impl Action {
    /// Payload-free name for logs. Typed characters and pasted text never reach the log.
    pub fn name(&self) -> &'static str {
        match self {
            Action::InsertChar(_) => "insert_char",
            Action::DeleteChar => "delete_char",
            Action::Newline => "newline",
            Action::Move(_) => "move",
            Action::Tab => "tab",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::Save => "save",
            Action::Find => "find",
            Action::FindNext => "find_next",
            Action::FindPrev => "find_prev",
            Action::Paste(_) => "paste",
            Action::Quit => "quit",
            Action::PromptChar(_) => "prompt_char",
            Action::PromptBackspace => "prompt_backspace",
            Action::PromptSubmit => "prompt_submit",
            Action::PromptCancel => "prompt_cancel",
        }
    }

    /// Actions that edit the prompt line rather than the buffer.
    pub fn is_prompt_action(&self) -> bool {
        matches!(
            self,
            Action::PromptChar(_)
                | Action::PromptBackspace
                | Action::PromptSubmit
                | Action::PromptCancel
        )
    }
}
