//! Editor state: the single buffer, input mode, history, prompt and status metadata.
//!
//! Undo history:
//! - `undo::History` holds bounded undo and unbounded redo stacks of full snapshots.
//! - Typing edits (character insert, backspace, tab) go through
//!   `debounce::HistoryDebounce`: the first edit of a burst parks the pre-edit
//!   snapshot and later edits only extend its deadline. The snapshot is committed
//!   when the deadline passes (`poll_history`) or when any other history-relevant
//!   command runs (`flush_pending_history`).
//! - Structural edits (newline, paste) flush any pending burst and then save
//!   immediately, so each one is an undo step of its own.
//!
//! Prompt capture:
//! - `Mode::CapturingAuxiliaryInput` is active while `prompt` collects a file
//!   name or a search query. Keystrokes are routed to the prompt by the
//!   dispatcher; this crate only stores the text.
//!
//! Viewport origin lives in `core-model::View`; callers pass it by `&mut` into
//! the history operations so snapshots can carry and restore it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use core_search::SearchIndex;
use core_text::Buffer;
use tracing::trace;

pub mod debounce;
pub mod line_ending;
pub mod undo;

pub use debounce::{DEFAULT_DEBOUNCE_MS, HistoryDebounce};
pub use line_ending::{LineEnding, NormalizedText, normalize_line_endings};
pub use undo::{DEFAULT_HISTORY_DEPTH, EditSnapshot, History};

/// Default lifetime of transient status messages.
pub const DEFAULT_STATUS_TTL_MS: u64 = 2000;

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keystrokes edit and navigate the buffer.
    #[default]
    Normal,
    /// A prompt owns the input stream until it is submitted or cancelled.
    CapturingAuxiliaryInput,
}

/// What a prompt collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    SaveAs,
    Search,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::SaveAs => "Save as: ",
            PromptKind::Search => "Search: ",
        }
    }
}

/// Single-line prompt buffer.
#[derive(Debug, Default, Clone)]
pub struct PromptState {
    kind: Option<PromptKind>,
    buf: String,
}

impl PromptState {
    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }
    pub fn kind(&self) -> Option<PromptKind> {
        self.kind
    }
    pub fn buffer(&self) -> &str {
        &self.buf
    }
    /// Start a fresh prompt, discarding any previous partial value.
    pub fn begin(&mut self, kind: PromptKind) {
        self.kind = Some(kind);
        self.buf.clear();
    }
    pub fn push_char(&mut self, ch: char) {
        self.buf.push(ch);
    }
    pub fn backspace(&mut self) {
        self.buf.pop();
    }
    /// Close the prompt and hand back what it collected.
    pub fn take(&mut self) -> Option<(PromptKind, String)> {
        let kind = self.kind.take()?;
        Some((kind, std::mem::take(&mut self.buf)))
    }
}

/// Transient status message.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Top-level editor state container (single buffer).
pub struct EditorState {
    pub buffer: Buffer,
    pub mode: Mode,
    pub file_name: Option<PathBuf>,
    pub prompt: PromptState,
    pub ephemeral_status: Option<EphemeralMessage>,
    pub original_line_ending: LineEnding,
    pub search: SearchIndex,
    pub status_ttl: Duration,
    history: History,
    debounce: HistoryDebounce,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self::with_history(buffer, History::default(), HistoryDebounce::default())
    }

    pub fn with_history(buffer: Buffer, history: History, debounce: HistoryDebounce) -> Self {
        Self {
            buffer,
            mode: Mode::Normal,
            file_name: None,
            prompt: PromptState::default(),
            ephemeral_status: None,
            original_line_ending: LineEnding::Lf,
            search: SearchIndex::new(),
            status_ttl: Duration::from_millis(DEFAULT_STATUS_TTL_MS),
            history,
            debounce,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.mode, Mode::CapturingAuxiliaryInput)
    }

    /// Set a status message expiring after the configured TTL.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, now: Instant) {
        let ttl = self.status_ttl;
        self.set_ephemeral_for(msg, now, ttl);
    }

    pub fn set_ephemeral_for<S: Into<String>>(&mut self, msg: S, now: Instant, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: now + ttl,
        });
    }

    /// Tick ephemeral status; returns true if message expired and was cleared.
    pub fn tick_ephemeral(&mut self, now: Instant) -> bool {
        if let Some(m) = &self.ephemeral_status
            && now >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    pub fn begin_prompt(&mut self, kind: PromptKind) {
        self.flush_pending_history();
        self.prompt.begin(kind);
        self.mode = Mode::CapturingAuxiliaryInput;
        trace!(target: "state.prompt", ?kind, "prompt_begin");
    }

    /// Leave capture mode, returning the prompt's collected value.
    pub fn end_prompt(&mut self) -> Option<(PromptKind, String)> {
        self.mode = Mode::Normal;
        let out = self.prompt.take();
        trace!(target: "state.prompt", kind = ?out.as_ref().map(|(k, _)| *k), "prompt_end");
        out
    }

    /// Typing edit: park the pre-edit snapshot (once per burst) and extend the deadline.
    pub fn record_typing(&mut self, now: Instant, viewport_first_line: usize) {
        let buffer = &self.buffer;
        self.debounce
            .schedule(now, || EditSnapshot::capture(buffer, viewport_first_line));
    }

    /// Structural edit: commit any pending burst then save the current state.
    pub fn record_discrete(&mut self, viewport_first_line: usize) {
        self.flush_pending_history();
        self.history
            .save(EditSnapshot::capture(&self.buffer, viewport_first_line));
    }

    /// Commit a parked burst snapshot, if any. Returns whether one was committed.
    pub fn flush_pending_history(&mut self) -> bool {
        match self.debounce.flush() {
            Some(snap) => {
                self.history.save(snap);
                true
            }
            None => false,
        }
    }

    /// Commit the parked burst snapshot once its deadline has passed.
    pub fn poll_history(&mut self, now: Instant) -> bool {
        match self.debounce.poll(now) {
            Some(snap) => {
                self.history.save(snap);
                true
            }
            None => false,
        }
    }

    pub fn has_pending_history(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn undo(&mut self, viewport_first_line: &mut usize) -> bool {
        self.flush_pending_history();
        self.history.undo(&mut self.buffer, viewport_first_line)
    }

    pub fn redo(&mut self, viewport_first_line: &mut usize) -> bool {
        self.flush_pending_history();
        self.history.redo(&mut self.buffer, viewport_first_line)
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(text: &str) -> EditorState {
        EditorState::new(Buffer::from_str("t", text).unwrap())
    }

    #[test]
    fn starts_in_normal_mode_unmodified() {
        let st = state("Hello");
        assert_eq!(st.mode, Mode::Normal);
        assert!(!st.is_modified());
        assert_eq!(st.undo_depth(), 0);
    }

    #[test]
    fn ephemeral_lifecycle() {
        let mut st = state("");
        let t0 = Instant::now();
        st.set_ephemeral("Saved", t0);
        assert!(!st.tick_ephemeral(t0 + Duration::from_millis(1999)));
        assert!(st.ephemeral_status.is_some());
        assert!(st.tick_ephemeral(t0 + Duration::from_millis(2000)));
        assert!(st.ephemeral_status.is_none());
        assert!(!st.tick_ephemeral(t0 + Duration::from_millis(5000)));
    }

    #[test]
    fn prompt_begin_take_round_trip() {
        let mut st = state("");
        st.begin_prompt(PromptKind::Search);
        assert!(st.is_capturing());
        st.prompt.push_char('a');
        st.prompt.push_char('b');
        st.prompt.backspace();
        assert_eq!(st.prompt.buffer(), "a");
        assert_eq!(st.end_prompt(), Some((PromptKind::Search, "a".to_string())));
        assert_eq!(st.mode, Mode::Normal);
        assert!(!st.prompt.is_active());
    }

    #[test]
    fn typing_burst_is_single_undo_step() {
        let mut st = state("");
        let t0 = Instant::now();
        for (i, c) in "abc".chars().enumerate() {
            st.record_typing(t0 + Duration::from_millis(100 * i as u64), 0);
            st.buffer.insert_char(c);
        }
        assert_eq!(st.undo_depth(), 0);
        assert!(st.poll_history(t0 + Duration::from_millis(800)));
        assert_eq!(st.undo_depth(), 1);
        let mut first = 0;
        assert!(st.undo(&mut first));
        assert_eq!(st.buffer.text(), "");
    }

    #[test]
    fn undo_flushes_pending_burst_first() {
        let mut st = state("x");
        st.record_typing(Instant::now(), 0);
        st.buffer.insert_char('y');
        let mut first = 0;
        assert!(st.undo(&mut first), "pending burst is committed and undone");
        assert_eq!(st.buffer.text(), "x");
        assert_eq!(st.redo_depth(), 1);
    }

    #[test]
    fn discrete_edit_commits_burst_then_saves() {
        let mut st = state("");
        st.record_typing(Instant::now(), 0);
        st.buffer.insert_char('a');
        st.record_discrete(0);
        st.buffer.insert_newline();
        assert_eq!(st.undo_depth(), 2);
        let mut first = 0;
        st.undo(&mut first);
        assert_eq!(st.buffer.text(), "a");
        st.undo(&mut first);
        assert_eq!(st.buffer.text(), "");
    }

    #[test]
    fn prompt_label_text() {
        assert_eq!(PromptKind::SaveAs.label(), "Save as: ");
        assert_eq!(PromptKind::Search.label(), "Search: ");
    }
}
