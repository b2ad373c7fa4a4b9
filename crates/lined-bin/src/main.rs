//! lined entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::{EditSession, FsSink, SessionOptions};
use core_config::load_from;
use core_events::{DEFAULT_TICK_INTERVAL, EVENT_CHANNEL_CAP, Event, EventSourceRegistry, TickEventSource};
use core_render::CrosstermRenderer;
use core_terminal::{CrosstermBackend, CrosstermGeometry, TerminalBackend, TerminalGeometry};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;

use runtime::{Editor, EditorRuntime};

const LOG_FILE: &str = "lined.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lined", version, about = "A small terminal line editor")]
struct Args {
    /// File to open. Created on first save if it does not exist.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `lined.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    editor: Editor<CrosstermRenderer, FsSink>,
    _terminal_guard: core_terminal::TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self, args: &Args) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();
        let config = load_from(args.config.clone())?;

        info!(target: "runtime", "startup");
        self.backend.set_title("lined")?;
        let guard = self.backend.enter_guard()?;

        let (fallback_cols, fallback_rows) = config.fallback_size();
        let geometry = CrosstermGeometry::new(fallback_cols, fallback_rows);
        let (cols, rows) = geometry.size();
        let opts = SessionOptions::from_config(&config, geometry.rows());
        let session = EditSession::open(args.path.as_deref(), &opts, FsSink, Instant::now());
        info!(
            target: "runtime.startup",
            path = args.path.as_deref().map(|p| p.display().to_string()),
            config_override = args.config.is_some(),
            cols,
            rows,
            text_rows = opts.text_rows,
            "bootstrap_complete"
        );

        Ok(RuntimeContext {
            editor: Editor::new(session, CrosstermRenderer::new(cols), fallback_rows as usize),
            _terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        // Otherwise a subscriber is already installed; the guard drops and its writer stops.
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse before raw mode so usage errors print normally.
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let context = startup.run(&args)?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(DEFAULT_TICK_INTERVAL));
    let source_handles = registry.spawn_all(&tx);

    let RuntimeContext {
        editor,
        _terminal_guard,
    } = context;
    let mut runtime = EditorRuntime::new(editor, tx, rx, input_task, input_shutdown, source_handles);
    runtime.run().await;
    info!(target: "runtime", "exit");
    Ok(())
}
