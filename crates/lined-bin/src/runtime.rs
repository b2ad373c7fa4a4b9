//! Event loop: one `Event` at a time from the shared channel into the session.
//!
//! `Editor` is the synchronous part (event -> session -> repaint decision) so
//! it can be driven directly in tests; `EditorRuntime` wraps it with the
//! channel, the spawned event sources and shutdown sequencing.

use std::fmt;
use std::time::{Duration, Instant};

use core_actions::{EditSession, PersistenceSink, translate_input};
use core_events::{Event, InputEvent};
use core_model::text_rows_for;
use core_render::RenderSink;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownReason {
    ActionQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue { repaint: bool },
    Break { reason: ShutdownReason },
}

/// Session plus the sink it paints to.
pub(crate) struct Editor<R: RenderSink, S: PersistenceSink> {
    session: EditSession<S>,
    renderer: R,
    fallback_rows: usize,
}

impl<R: RenderSink, S: PersistenceSink> Editor<R, S> {
    pub(crate) fn new(session: EditSession<S>, renderer: R, fallback_rows: usize) -> Self {
        Self {
            session,
            renderer,
            fallback_rows,
        }
    }

    pub(crate) fn handle_event(&mut self, event: &Event, now: Instant) -> LoopControl {
        match event {
            Event::Input(InputEvent::Resize(cols, rows)) => self.handle_resize(*cols, *rows),
            Event::Input(input) => self.handle_input(input, now),
            Event::Tick => LoopControl::Continue {
                repaint: self.session.tick(now),
            },
            Event::RenderRequested => LoopControl::Continue { repaint: true },
            Event::Shutdown => LoopControl::Break {
                reason: ShutdownReason::ShutdownEvent,
            },
        }
    }

    fn handle_input(&mut self, input: &InputEvent, now: Instant) -> LoopControl {
        let Some(action) = translate_input(self.session.mode(), input) else {
            return LoopControl::Continue { repaint: false };
        };
        let result = self.session.dispatch(action, now);
        if result.quit {
            info!(target: "runtime", "quit_requested");
            LoopControl::Break {
                reason: ShutdownReason::ActionQuit,
            }
        } else {
            LoopControl::Continue {
                repaint: result.dirty,
            }
        }
    }

    fn handle_resize(&mut self, cols: u16, rows: u16) -> LoopControl {
        let text_rows = text_rows_for(rows as usize, self.fallback_rows);
        trace!(target: "runtime", cols, rows, text_rows, "resize");
        self.renderer.set_columns(cols);
        self.session.resize(text_rows);
        LoopControl::Continue { repaint: true }
    }

    pub(crate) fn render(&mut self) {
        if let Err(e) = self.renderer.paint(&self.session.frame()) {
            error!(target: "render", ?e, "render_error");
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &EditSession<S> {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn renderer(&self) -> &R {
        &self.renderer
    }
}

pub(crate) struct EditorRuntime<R: RenderSink, S: PersistenceSink> {
    editor: Editor<R, S>,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
}

impl<R: RenderSink, S: PersistenceSink> EditorRuntime<R, S> {
    pub(crate) fn new(
        editor: Editor<R, S>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: JoinHandle<()>,
        input_shutdown: core_input::AsyncInputShutdown,
        source_handles: Vec<JoinHandle<()>>,
    ) -> Self {
        Self {
            editor,
            rx,
            tx: Some(tx),
            source_handles,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
        }
    }

    pub(crate) async fn run(&mut self) {
        self.editor.render();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            match self.editor.handle_event(&event, Instant::now()) {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue { repaint } => {
                    if repaint {
                        self.editor.render();
                    }
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", %reason, stage = "begin", "shutdown_stage");
        // Sources stop once their sends fail.
        drop(self.tx.take());

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(())) => trace!(target: "runtime.shutdown", "event_source_task_stopped"),
                Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "event_source_task_error"),
                Err(_) => warn!(target: "runtime.shutdown", "event_source_task_timeout"),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take()
            && let Err(err) = handle.await
        {
            error!(target: "runtime.shutdown", ?err, "input_task_join_failed");
        }
        info!(target: "runtime.shutdown", %reason, stage = "complete", "shutdown_stage");
    }
}
