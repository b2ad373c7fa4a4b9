//! `EditSession`: the single owner of editing state.
//!
//! Wraps the `EditorModel` (state + view), the persistence sink and the few
//! settings dispatch needs. The runtime feeds it `Action`s and periodic ticks
//! and paints whatever `frame()` returns; nothing here touches the terminal.

use std::path::Path;
use std::time::{Duration, Instant};

use core_config::Config;
use core_model::{EditorModel, RenderFrame, View, text_rows_for};
use core_state::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_HISTORY_DEPTH, DEFAULT_STATUS_TTL_MS, EditorState, History,
    HistoryDebounce, Mode,
};
use core_text::Buffer;

use crate::dispatcher::{DispatchEnv, DispatchResult, dispatch};
use crate::io_ops::{FsSink, PersistenceSink, load_buffer};
use crate::Action;

/// Tunables resolved from configuration and terminal geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub tab_width: usize,
    pub history_depth: usize,
    pub debounce_window: Duration,
    pub status_ttl: Duration,
    pub text_rows: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tab_width: 3,
            history_depth: DEFAULT_HISTORY_DEPTH,
            debounce_window: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            status_ttl: Duration::from_millis(DEFAULT_STATUS_TTL_MS),
            text_rows: View::default().text_rows,
        }
    }
}

impl SessionOptions {
    /// Options from `cfg` for a terminal `terminal_rows` tall (0 = unknown).
    pub fn from_config(cfg: &Config, terminal_rows: u16) -> Self {
        let (_, fallback_rows) = cfg.fallback_size();
        Self {
            tab_width: cfg.tab_width(),
            history_depth: cfg.history_depth(),
            debounce_window: cfg.debounce_window(),
            status_ttl: cfg.status_ttl(),
            text_rows: text_rows_for(terminal_rows as usize, fallback_rows as usize),
        }
    }
}

pub struct EditSession<S: PersistenceSink = FsSink> {
    model: EditorModel,
    sink: S,
    tab_width: usize,
}

impl<S: PersistenceSink> EditSession<S> {
    pub fn new(buffer: Buffer, opts: &SessionOptions, sink: S) -> Self {
        let mut state = EditorState::with_history(
            buffer,
            History::new(opts.history_depth),
            HistoryDebounce::new(opts.debounce_window),
        );
        state.status_ttl = opts.status_ttl;
        Self {
            model: EditorModel::with_view(View::new(opts.text_rows.max(1)), state),
            sink,
            tab_width: opts.tab_width,
        }
    }

    /// Start a session on `path` (or an empty unnamed buffer). Load problems
    /// are reported on the status line, never as errors.
    pub fn open(path: Option<&Path>, opts: &SessionOptions, sink: S, now: Instant) -> Self {
        let Some(path) = path else {
            return Self::new(Buffer::default(), opts, sink);
        };
        let loaded = load_buffer(path);
        let mut session = Self::new(loaded.buffer, opts, sink);
        let state = session.model.state_mut();
        state.file_name = loaded.file_name;
        state.original_line_ending = loaded.line_ending;
        if let Some(notice) = loaded.notice {
            state.set_ephemeral(notice, now);
        }
        session
    }

    pub fn dispatch(&mut self, action: Action, now: Instant) -> DispatchResult {
        let mut env = DispatchEnv {
            sink: &mut self.sink,
            tab_width: self.tab_width,
            now,
        };
        dispatch(action, &mut self.model, &mut env)
    }

    /// Periodic housekeeping: commit an expired typing burst and expire the
    /// status message. Returns true when the screen needs a repaint.
    pub fn tick(&mut self, now: Instant) -> bool {
        let state = self.model.state_mut();
        if state.poll_history(now) {
            tracing::trace!(target: "actions.session", "debounced_history_committed");
        }
        state.tick_ephemeral(now)
    }

    /// Apply a new text area height. Returns true if the viewport moved.
    pub fn resize(&mut self, text_rows: usize) -> bool {
        self.model.resize(text_rows)
    }

    pub fn frame(&self) -> RenderFrame {
        self.model.frame()
    }

    pub fn mode(&self) -> Mode {
        self.model.state().mode
    }

    pub fn state(&self) -> &EditorState {
        self.model.state()
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
