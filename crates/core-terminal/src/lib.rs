//! Terminal backend abstraction and crossterm implementation.
//!
//! Entering the terminal switches to raw mode and the alternate screen and
//! turns on bracketed paste so pasted blocks arrive as one event. Leaving
//! undoes all three; `TerminalGuard` makes leaving happen on every exit path.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;

pub mod geometry;
pub use geometry::{CrosstermGeometry, FixedGeometry, TerminalGeometry};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste, Hide)?;
            self.entered = true;
            tracing::debug!(target: "terminal", "entered raw mode");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            tracing::debug!(target: "terminal", "left raw mode");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_without_enter_is_noop() {
        let mut b = CrosstermBackend::new();
        assert!(!b.is_entered());
        assert!(b.leave().is_ok());
        assert!(!b.is_entered());
    }
}
