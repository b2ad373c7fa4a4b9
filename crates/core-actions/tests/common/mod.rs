#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{Action, DispatchResult, EditSession, PersistenceSink, translate_key};
use core_events::{KeyCode, KeyEvent};
use std::time::Instant;

/// Feed keys through the translator into the session, like the runtime does.
pub fn press<S: PersistenceSink>(session: &mut EditSession<S>, keys: &[KeyEvent]) -> DispatchResult {
    let mut last = DispatchResult::clean();
    for key in keys {
        if let Some(action) = translate_key(session.mode(), key) {
            last = session.dispatch(action, Instant::now());
        }
    }
    last
}

pub fn typed(text: &str) -> Vec<KeyEvent> {
    text.chars()
        .map(|c| match c {
            '\n' => KeyEvent::plain(KeyCode::Enter),
            c => KeyEvent::plain(KeyCode::Char(c)),
        })
        .collect()
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::plain(code)
}

pub fn dispatch_all<S: PersistenceSink>(session: &mut EditSession<S>, actions: Vec<Action>) {
    for a in actions {
        session.dispatch(a, Instant::now());
    }
}
