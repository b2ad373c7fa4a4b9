//! Async input service: decodes `crossterm` terminal events into `InputEvent`s.

mod async_service;
pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;

use core_events::{Event, KeyCode, KeyModifiers};
use crossterm::event::{KeyCode as CKeyCode, KeyModifiers as CMods};
use tokio::task::JoinHandle;

#[inline]
pub(crate) fn log_paste(payload: &str) {
    tracing::trace!(
        target: "input.paste",
        len = payload.len(),
        lines = payload.lines().count(),
        "paste_received"
    );
}

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Returns `None` for keys the editor has no use for (media keys, lock keys, ...).
pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let mapped = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::F(n) => KeyCode::F(*n),
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing::dispatcher::Dispatch;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::layer::Layer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::registry::Registry;

    #[derive(Clone, Default)]
    struct Capture {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    #[derive(Clone, Debug)]
    struct CapturedEvent {
        target: String,
        fields: Vec<(String, String)>,
    }

    #[derive(Default)]
    struct FieldCollector {
        fields: Vec<(String, String)>,
    }

    impl Visit for FieldCollector {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    impl<S> Layer<S> for Capture
    where
        S: Subscriber,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut collector = FieldCollector::default();
            event.record(&mut collector);
            let meta = event.metadata();
            self.events.lock().unwrap().push(CapturedEvent {
                target: meta.target().to_string(),
                fields: collector.fields,
            });
        }
    }

    #[test]
    fn paste_log_redacts_content() {
        let capture = Capture::default();
        let events = capture.events.clone();
        let subscriber = Registry::default().with(capture);
        let dispatch = Dispatch::new(subscriber);

        tracing::dispatcher::with_default(&dispatch, || {
            log_paste("secret paste payload 💣\nsecond line");
        });

        let events = events.lock().unwrap();
        let event = events
            .iter()
            .find(|e| e.target == "input.paste")
            .expect("missing input.paste event");
        assert!(event.fields.iter().any(|(name, v)| name == "lines" && v == "2"));
        for (_, value) in &event.fields {
            assert!(
                !value.contains("secret paste payload"),
                "event leaked raw paste content: {value}"
            );
            assert!(!value.contains("💣"), "event leaked emoji from paste content: {value}");
        }
    }

    #[test]
    fn modifiers_map_bitwise() {
        let m = map_mods(CMods::CONTROL | CMods::SHIFT);
        assert!(m.contains(KeyModifiers::CTRL));
        assert!(m.contains(KeyModifiers::SHIFT));
        assert!(!m.contains(KeyModifiers::ALT));
    }

    #[test]
    fn unsupported_keys_are_dropped() {
        assert_eq!(map_key_code(&CKeyCode::Home), None);
        assert_eq!(map_key_code(&CKeyCode::Char('x')), Some(KeyCode::Char('x')));
        assert_eq!(map_key_code(&CKeyCode::Backspace), Some(KeyCode::Backspace));
    }
}
