//! Terminal command queue.
//!
//! A frame is translated into an ordered list of primitive commands which are
//! queued onto the output and flushed once, so the terminal never shows a half
//! painted frame. Positions are absolute with a (0,0) origin.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

use crate::CellFlags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    HideCursor,
    MoveTo(u16, u16),
    ClearLine,
    Style(CellFlags),
    Print(String),
    /// Final cursor placement; also makes the cursor visible again.
    ShowCursorAt(u16, u16),
}

#[derive(Default, Debug)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn hide_cursor(&mut self) {
        self.cmds.push(Command::HideCursor);
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn style(&mut self, flags: CellFlags) {
        self.cmds.push(Command::Style(flags));
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn show_cursor_at(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::ShowCursorAt(x, y));
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Queue every command onto `out` and flush. Returns the number of commands emitted.
    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<usize> {
        let count = self.cmds.len();
        for c in self.cmds {
            match c {
                Command::HideCursor => queue!(out, Hide)?,
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Style(flags) => {
                    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                    if flags.contains(CellFlags::GUTTER) {
                        queue!(out, SetForegroundColor(Color::Yellow))?;
                    }
                    if flags.contains(CellFlags::REVERSE) {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    if flags.contains(CellFlags::CURRENT) {
                        queue!(out, SetAttribute(Attribute::Underlined))?;
                    }
                }
                Command::Print(s) => queue!(out, Print(s))?,
                Command::ShowCursorAt(x, y) => queue!(out, MoveTo(x, y), Show)?,
            }
        }
        out.flush()?;
        Ok(count)
    }
}
