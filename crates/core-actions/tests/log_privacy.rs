//! Edit, paste and search logging carries sizes and positions, never buffer text.
mod common;
use common::*;

use core_actions::{Action, EditSession, FsSink, SessionOptions};
use core_events::{KeyCode, KeyEvent};
use core_text::Buffer;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(BufferWriter {
            inner: buffer.clone(),
        })
        .finish();
    with_default(subscriber, f);
    let out = buffer.lock().unwrap().clone();
    String::from_utf8(out).unwrap()
}

#[test]
fn typed_pasted_and_searched_text_stays_out_of_logs() {
    let logs = capture(|| {
        let mut s = EditSession::new(Buffer::default(), &SessionOptions::default(), FsSink);
        press(&mut s, &typed("zebra"));
        s.dispatch(Action::Paste("quokka\nwombat".into()), Instant::now());
        press(&mut s, &[KeyEvent::ctrl('f')]);
        press(&mut s, &typed("zebra"));
        press(&mut s, &[key(KeyCode::Enter)]);
        assert_eq!(s.state().search.matches().len(), 1);
    });
    assert!(logs.contains("actions.dispatch"), "{logs}");
    assert!(logs.contains("search_indexed"), "{logs}");
    for secret in ["zebra", "quokka", "wombat"] {
        assert!(!logs.contains(secret), "{secret} leaked:\n{logs}");
    }
}

#[test]
fn paste_logs_size_and_line_count() {
    let logs = capture(|| {
        let mut s = EditSession::new(Buffer::default(), &SessionOptions::default(), FsSink);
        s.dispatch(Action::Paste("ab\ncd".into()), Instant::now());
    });
    let line = logs
        .lines()
        .find(|l| l.contains("op=\"paste\""))
        .unwrap_or_else(|| panic!("no paste event in:\n{logs}"));
    assert!(line.contains("bytes=5"), "{line}");
    assert!(line.contains("lines=2"), "{line}");
}
