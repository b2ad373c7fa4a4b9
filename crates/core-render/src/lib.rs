//! Rendering: `RenderFrame` -> cell grid -> terminal commands.
//!
//! Painting happens in two steps. `compose` lays the frame out on a `Frame`
//! grid (gutter, text, search highlights, status row) and works out where the
//! terminal cursor goes. The grid is then walked row by row, grouping runs of
//! equally styled cells into single `Print` commands on a `writer::Writer`.
//!
//! Layout:
//! - rows `0..text_rows` hold buffer lines, each prefixed by a yellow
//!   right-aligned line number gutter of `digits(total_lines) + 1` columns;
//! - the last row is the status line, or the active prompt with its label
//!   shown in reverse video;
//! - one `char` occupies one column. Lines scroll horizontally together so the
//!   cursor column stays on screen; text outside the window is clipped.
//!
//! Search hits are reverse video; the current hit is additionally underlined.

use anyhow::Result;
use bitflags::bitflags;
use core_model::{RenderFrame, STATUS_ROWS};
use std::io::{Stdout, Write, stdout};

pub mod status;
pub mod writer;

use writer::Writer;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // search hit / prompt label
        const GUTTER  = 0b0000_0010; // line number
        const CURRENT = 0b0000_0100; // active search hit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            flags: CellFlags::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Write `text` starting at (x,y), clipped to the row. Returns the column after the last char.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, flags: CellFlags) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            let Some(idx) = self.index(col, y) else { break };
            self.cells[idx] = Cell { ch, flags };
            col += 1;
        }
        col
    }

    pub fn apply_flags_span(&mut self, x: u16, y: u16, span_width: u16, flags: CellFlags) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    /// Runs of equally styled cells on row `y`, left to right.
    pub fn row_runs(&self, y: u16) -> Vec<(CellFlags, String)> {
        let mut runs: Vec<(CellFlags, String)> = Vec::new();
        if y >= self.height {
            return runs;
        }
        let start = y as usize * self.width as usize;
        for cell in &self.cells[start..start + self.width as usize] {
            match runs.last_mut() {
                Some((flags, text)) if *flags == cell.flags => text.push(cell.ch),
                _ => runs.push((cell.flags, cell.ch.to_string())),
            }
        }
        runs
    }

    /// Row text without styling, trailing blanks trimmed (tests / diagnostics).
    pub fn line_text(&self, y: u16) -> String {
        self.row_runs(y)
            .into_iter()
            .map(|(_, t)| t)
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}

/// Columns taken by the line number gutter, trailing space included.
pub fn gutter_width(total_lines: usize) -> usize {
    let mut digits = 1;
    let mut n = total_lines.max(1);
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits + 1
}

/// Keep `cursor_col` inside a window of `text_cols` columns starting at `first_col`.
pub fn horizontal_offset(cursor_col: usize, first_col: usize, text_cols: usize) -> usize {
    let cols = text_cols.max(1);
    if cursor_col < first_col {
        cursor_col
    } else if cursor_col >= first_col + cols {
        cursor_col + 1 - cols
    } else {
        first_col
    }
}

fn to_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

/// Lay out `frame` on a grid `width` columns wide with text starting at
/// column `first_col`. Returns the grid and the terminal cursor position (x, y).
pub fn compose(frame: &RenderFrame, width: u16, first_col: usize) -> (Frame, (u16, u16)) {
    let text_rows = to_u16(frame.text_rows);
    let height = text_rows.saturating_add(STATUS_ROWS as u16);
    let mut grid = Frame::new(width, height);
    let gutter = gutter_width(frame.status.total_lines);
    let gutter_w = to_u16(gutter);

    for (row, line) in frame.lines.iter().enumerate().take(frame.text_rows) {
        let y = to_u16(row);
        let number = format!("{:>w$} ", line.line_number, w = gutter - 1);
        grid.put_str(0, y, &number, CellFlags::GUTTER);
        // Raw control chars would move the terminal cursor; show them as '?'.
        let text: String = line
            .text
            .chars()
            .skip(first_col)
            .map(|c| if c.is_control() { '?' } else { c })
            .collect();
        grid.put_str(gutter_w, y, &text, CellFlags::empty());
        for span in &line.highlights {
            let end = span.start_col + span.len;
            if end <= first_col {
                continue;
            }
            let start = span.start_col.max(first_col);
            let mut flags = CellFlags::REVERSE;
            if span.current {
                flags |= CellFlags::CURRENT;
            }
            grid.apply_flags_span(
                gutter_w.saturating_add(to_u16(start - first_col)),
                y,
                to_u16(end - start),
                flags,
            );
        }
    }

    let status_y = height.saturating_sub(1);
    let last_col = width.saturating_sub(1);
    let cursor = match &frame.status.prompt {
        Some((label, value)) => {
            let after_label = grid.put_str(0, status_y, label, CellFlags::REVERSE);
            let end = grid.put_str(after_label, status_y, value, CellFlags::empty());
            (end.min(last_col), status_y)
        }
        None => {
            let text = status::build_status_line(&frame.status, width);
            grid.put_str(0, status_y, &text, CellFlags::empty());
            let (row, col) = frame.cursor_screen;
            let x = gutter_w
                .saturating_add(to_u16(col.saturating_sub(first_col)))
                .min(last_col);
            (x, to_u16(row).min(text_rows.saturating_sub(1)))
        }
    };
    (grid, cursor)
}

/// Anything that can put a `RenderFrame` on screen.
pub trait RenderSink {
    fn paint(&mut self, frame: &RenderFrame) -> Result<()>;
    /// Terminal width changed.
    fn set_columns(&mut self, _columns: u16) {}
}

/// Full-frame painter over crossterm commands.
pub struct CrosstermRenderer<W: Write = Stdout> {
    out: W,
    columns: u16,
    /// Horizontal scroll, kept between frames.
    first_col: usize,
    frames: u64,
}

impl CrosstermRenderer<Stdout> {
    pub fn new(columns: u16) -> Self {
        Self::with_writer(stdout(), columns)
    }
}

impl<W: Write> CrosstermRenderer<W> {
    pub fn with_writer(out: W, columns: u16) -> Self {
        Self {
            out,
            columns: columns.max(1),
            first_col: 0,
            frames: 0,
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn first_col(&self) -> usize {
        self.first_col
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for CrosstermRenderer<W> {
    fn paint(&mut self, frame: &RenderFrame) -> Result<()> {
        if frame.status.prompt.is_none() {
            let text_cols = (self.columns as usize).saturating_sub(gutter_width(frame.status.total_lines));
            self.first_col = horizontal_offset(frame.cursor_screen.1, self.first_col, text_cols);
        }
        let (grid, (cx, cy)) = compose(frame, self.columns, self.first_col);
        let mut writer = Writer::new();
        writer.hide_cursor();
        for y in 0..grid.height {
            writer.move_to(0, y);
            writer.clear_line();
            for (flags, text) in grid.row_runs(y) {
                writer.style(flags);
                writer.print(text);
            }
            writer.style(CellFlags::empty());
        }
        writer.show_cursor_at(cx, cy);
        let commands = writer.flush_to(&mut self.out)?;
        self.frames += 1;
        tracing::trace!(
            target: "render",
            frame = self.frames,
            rows = grid.height,
            cols = grid.width,
            commands,
            "frame_painted"
        );
        Ok(())
    }

    fn set_columns(&mut self, columns: u16) {
        self.columns = columns.max(1);
    }
}
