//! Core event types and async event sources for the line editor runtime.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

/// Capacity of the bounded runtime channel. Producers (input task, tick source)
/// await on a full channel rather than dropping events, so keystrokes are never lost.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Default interval of the built-in tick source.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// Periodic tick driving debounce commits and status message expiry.
    Tick,
    RenderRequested,
    Shutdown,
}

/// Normalized terminal input.
#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Bracketed paste payload. Never logged verbatim; log only its length.
    Paste(String),
    /// Ctrl-C surfaced distinctly: cancels a prompt, otherwise quits.
    CtrlC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }
}

/// Normalized logical key codes consumed by the key translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Trait implemented by any async event producer. Implementors hold their
/// configuration and spawn one background task that pushes `Event`s into the
/// shared channel, stopping once a send fails (consumer dropped).
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }
    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }
    pub fn len(&self) -> usize {
        self.sources.len()
    }
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
    /// Spawn all registered sources, each with its own `Sender` clone. Sources
    /// are drained, so a second call spawns nothing. During shutdown drop the
    /// last `Sender` before awaiting the handles so sources observe closure.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Emits `Event::Tick` every configured interval.
pub struct TickEventSource {
    interval: Duration,
}

impl TickEventSource {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for TickEventSource {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    tracing::debug!(target: "runtime.events", "tick source stopping: channel closed");
                    break;
                }
            }
        })
    }
}
