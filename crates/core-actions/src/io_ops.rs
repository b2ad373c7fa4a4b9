//! File IO: loading a buffer from disk and the persistence sink used by save.
//!
//! Loading normalizes line endings (CRLF / CR -> LF) and remembers the
//! original style so a save writes the file back the way it came in. Every
//! saved line is terminated, including the last one.

use std::io;
use std::path::{Path, PathBuf};

use core_state::{LineEnding, normalize_line_endings};
use core_text::Buffer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SaveError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        SaveError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Destination for saved buffer contents. Called exactly once per save.
pub trait PersistenceSink {
    fn write(
        &mut self,
        path: &Path,
        lines: &[String],
        ending: LineEnding,
    ) -> Result<(), SaveError>;
}

/// Writes straight to the file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl PersistenceSink for FsSink {
    fn write(
        &mut self,
        path: &Path,
        lines: &[String],
        ending: LineEnding,
    ) -> Result<(), SaveError> {
        let content = serialize_lines(lines, ending);
        std::fs::write(path, content.as_bytes()).map_err(|e| {
            tracing::error!(target: "io", path = %path.display(), error = %e, "file_write_error");
            SaveError::io(path, e)
        })?;
        tracing::info!(
            target: "io",
            path = %path.display(),
            lines = lines.len(),
            bytes = content.len(),
            "file_written"
        );
        Ok(())
    }
}

/// Join lines with `ending`, terminating the last line too.
pub fn serialize_lines(lines: &[String], ending: LineEnding) -> String {
    let sep = ending.as_str();
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + sep.len()).sum());
    for line in lines {
        out.push_str(line);
        out.push_str(sep);
    }
    out
}

/// Last path component for status messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result of opening a path at startup.
#[derive(Debug)]
pub struct LoadOutcome {
    pub buffer: Buffer,
    pub line_ending: LineEnding,
    /// Save target. Absent when the file exists but could not be used.
    pub file_name: Option<PathBuf>,
    /// Status line notice for the user (new file, unreadable file, ...).
    pub notice: Option<String>,
}

impl LoadOutcome {
    fn empty(file_name: Option<PathBuf>, notice: Option<String>) -> Self {
        Self {
            buffer: Buffer::default(),
            line_ending: LineEnding::Lf,
            file_name,
            notice,
        }
    }
}

/// Open `path` into a buffer. Never fails: a missing file opens empty with
/// the path kept as save target; unreadable or non-UTF-8 content opens an
/// empty unnamed buffer with a warning notice.
pub fn load_buffer(path: &Path) -> LoadOutcome {
    let name = display_name(path);
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(target: "io", path = %path.display(), "file_not_found_new_buffer");
            return LoadOutcome::empty(Some(path.to_path_buf()), Some(format!("New file: {name}")));
        }
        Err(e) => {
            tracing::error!(target: "io", path = %path.display(), error = %e, "file_open_error");
            return LoadOutcome::empty(None, Some(format!("⚠ Could not read {name}: {e}")));
        }
    };
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(
                target: "io",
                path = %path.display(),
                valid_up_to = e.utf8_error().valid_up_to(),
                "file_not_utf8"
            );
            return LoadOutcome::empty(None, Some(format!("⚠ {name} is not valid UTF-8")));
        }
    };
    let norm = normalize_line_endings(&content);
    if norm.mixed {
        tracing::warn!(target: "io", path = %path.display(), chosen = ?norm.original, "mixed_line_endings");
    }
    match Buffer::from_str(name, &norm.normalized) {
        Ok(buffer) => {
            tracing::info!(
                target: "io",
                path = %path.display(),
                lines = buffer.line_count(),
                ending = ?norm.original,
                "file_loaded"
            );
            LoadOutcome {
                buffer,
                line_ending: norm.original,
                file_name: Some(path.to_path_buf()),
                notice: None,
            }
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, "buffer_create_failed");
            LoadOutcome::empty(None, Some(format!("⚠ Could not load {}", display_name(path))))
        }
    }
}
