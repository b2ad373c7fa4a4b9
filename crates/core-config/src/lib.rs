//! Configuration loading and parsing.
//!
//! Parses `lined.toml` (or an override path provided by the binary). Every
//! section and field is optional; absent values take the built-in defaults.
//! A missing file is not an error. A file that fails to parse is logged and
//! replaced by defaults so a typo never prevents the editor from starting.
//! Unknown fields are ignored.
//!
//! ```toml
//! [history]
//! max_depth = 100      # undo snapshots retained
//! debounce_ms = 500    # typing burst window
//!
//! [editor]
//! tab_width = 3        # spaces inserted by Tab
//!
//! [status]
//! message_ttl_ms = 2000
//!
//! [terminal]
//! fallback_rows = 24   # used when the terminal reports no size
//! fallback_columns = 80
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "lined.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "HistoryConfig::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::default_max_depth(),
            debounce_ms: Self::default_debounce_ms(),
        }
    }
}

impl HistoryConfig {
    const fn default_max_depth() -> usize {
        100
    }
    const fn default_debounce_ms() -> u64 {
        500
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        3
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    #[serde(default = "StatusConfig::default_ttl")]
    pub message_ttl_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            message_ttl_ms: Self::default_ttl(),
        }
    }
}

impl StatusConfig {
    const fn default_ttl() -> u64 {
        2000
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TerminalConfig {
    #[serde(default = "TerminalConfig::default_rows")]
    pub fallback_rows: u16,
    #[serde(default = "TerminalConfig::default_columns")]
    pub fallback_columns: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            fallback_rows: Self::default_rows(),
            fallback_columns: Self::default_columns(),
        }
    }
}

impl TerminalConfig {
    const fn default_rows() -> u16 {
        24
    }
    const fn default_columns() -> u16 {
        80
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Original file text when one was read and parsed.
    pub raw: Option<String>,
    pub file: ConfigFile,
}

/// Config path: `./lined.toml` when present, else the platform config dir
/// (`$XDG_CONFIG_HOME/lined/lined.toml`, `%APPDATA%\lined\lined.toml`, ...).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("lined").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                file,
            };
            cfg.sanitize();
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Raise zero / degenerate values to the smallest usable setting.
    fn sanitize(&mut self) {
        let f = &mut self.file;
        if f.history.max_depth == 0 {
            warn!(target: "config", field = "history.max_depth", "config_value_clamped");
            f.history.max_depth = 1;
        }
        if f.editor.tab_width == 0 {
            warn!(target: "config", field = "editor.tab_width", "config_value_clamped");
            f.editor.tab_width = 1;
        }
        if f.terminal.fallback_rows < 2 {
            warn!(target: "config", field = "terminal.fallback_rows", "config_value_clamped");
            f.terminal.fallback_rows = 2;
        }
        if f.terminal.fallback_columns == 0 {
            warn!(target: "config", field = "terminal.fallback_columns", "config_value_clamped");
            f.terminal.fallback_columns = 1;
        }
    }

    pub fn history_depth(&self) -> usize {
        self.file.history.max_depth
    }
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.file.history.debounce_ms)
    }
    pub fn tab_width(&self) -> usize {
        self.file.editor.tab_width
    }
    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.file.status.message_ttl_ms)
    }
    pub fn fallback_size(&self) -> (u16, u16) {
        (
            self.file.terminal.fallback_columns,
            self.file.terminal.fallback_rows,
        )
    }
}
