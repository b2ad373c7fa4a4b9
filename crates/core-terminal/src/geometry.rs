//! Terminal size queries with a configured fallback.
//!
//! Some environments (pipes, CI, detached sessions) report `0x0` or fail the
//! size query outright; both cases resolve to the fallback size.

use tracing::debug;

pub trait TerminalGeometry {
    fn rows(&self) -> u16;
    fn columns(&self) -> u16;
}

/// Live size from crossterm, falling back to a fixed size when unavailable.
#[derive(Debug, Clone, Copy)]
pub struct CrosstermGeometry {
    fallback_columns: u16,
    fallback_rows: u16,
}

impl Default for CrosstermGeometry {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl CrosstermGeometry {
    pub fn new(fallback_columns: u16, fallback_rows: u16) -> Self {
        Self {
            fallback_columns,
            fallback_rows,
        }
    }

    /// Current (columns, rows).
    pub fn size(&self) -> (u16, u16) {
        resolve(
            crossterm::terminal::size().ok(),
            self.fallback_columns,
            self.fallback_rows,
        )
    }
}

impl TerminalGeometry for CrosstermGeometry {
    fn rows(&self) -> u16 {
        self.size().1
    }
    fn columns(&self) -> u16 {
        self.size().0
    }
}

/// Constant size, for tests and headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedGeometry {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalGeometry for FixedGeometry {
    fn rows(&self) -> u16 {
        self.rows
    }
    fn columns(&self) -> u16 {
        self.columns
    }
}

fn resolve(reported: Option<(u16, u16)>, fallback_columns: u16, fallback_rows: u16) -> (u16, u16) {
    match reported {
        Some((c, r)) => {
            let cols = if c == 0 { fallback_columns } else { c };
            let rows = if r == 0 { fallback_rows } else { r };
            if c == 0 || r == 0 {
                debug!(target: "terminal", reported_cols = c, reported_rows = r, "size_fallback_partial");
            }
            (cols, rows)
        }
        None => {
            debug!(target: "terminal", "size_query_failed_using_fallback");
            (fallback_columns, fallback_rows)
        }
    }
}
