use crate::{log_paste, map_key_code, map_mods};
use core_events::{Event, InputEvent, KeyEvent};
use crossterm::event::{
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKind,
    KeyModifiers as CMods,
};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task forwarding decoded `EventStream` items into the runtime channel.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let stream = EventStream::new();
        AsyncEventStreamTask::new(sender, stream, listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        let reason = loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                result = self.stream.next() => result,
            };
            let Some(result) = maybe_result else {
                break ExitReason::StreamEnded;
            };
            let event = match result {
                Ok(ev) => decode(ev),
                Err(err) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    break ExitReason::StreamError;
                }
            };
            if let Some(event) = event
                && self.sender.send(Event::Input(event)).await.is_err()
            {
                break ExitReason::ChannelClosed;
            }
        };
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }
}

/// Translate one crossterm event. `None` for events the editor ignores
/// (key releases, mouse, focus changes, unsupported keys).
fn decode(ev: CEvent) -> Option<InputEvent> {
    match ev {
        CEvent::Key(key) => decode_key(key),
        CEvent::Resize(w, h) => {
            trace!(target: "input.event", w, h, "resize");
            Some(InputEvent::Resize(w, h))
        }
        CEvent::Paste(data) => {
            log_paste(&data);
            Some(InputEvent::Paste(data))
        }
        _ => None,
    }
}

fn decode_key(key: CKeyEvent) -> Option<InputEvent> {
    if !matches!(key.kind, CKind::Press | CKind::Repeat) {
        return None;
    }
    if matches!(key.code, CKeyCode::Char('c')) && key.modifiers.contains(CMods::CONTROL) {
        trace!(target: "input.event", kind = "ctrl_c");
        return Some(InputEvent::CtrlC);
    }
    let code = map_key_code(&key.code)?;
    let mods = map_mods(key.modifiers);
    trace!(
        target: "input.event",
        kind = "keypress",
        repeat = matches!(key.kind, CKind::Repeat),
        mods = ?mods,
        printable = matches!(code, core_events::KeyCode::Char(_))
    );
    Some(InputEvent::Key(KeyEvent::new(code, mods)))
}
