//! Status line composition.
//!
//! Format while editing:
//! `<name>[*] Ln X, Col Y | N lines`
//! * `<name>` is the file name as given, or `[No Name]` before a save target exists.
//! * `*` appears only when the buffer is modified.
//! * Position is 1-based.
//!
//! A pending ephemeral message is right-aligned when it fits next to the base
//! text and dropped otherwise. While a prompt is active the row shows the
//! prompt instead (`Save as: <value>`), so no editing segments are composed.
//!
//! Two stages: `compose_status` produces ordered `StatusSegment`s, then
//! `format_status` renders them.

use std::borrow::Cow;
use std::fmt::Write as _;

use core_model::StatusInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    /// File name including the trailing modified marker.
    FileName(Cow<'a, str>),
    /// 1-based cursor line & column.
    Position { line_1: usize, col_1: usize },
    LineCount(usize),
    /// Prompt label and the value typed so far.
    Prompt { label: &'a str, value: &'a str },
}

pub fn compose_status(info: &StatusInfo) -> Vec<StatusSegment<'_>> {
    if let Some((label, value)) = &info.prompt {
        return vec![StatusSegment::Prompt { label, value }];
    }
    let name = info.file_name.as_deref().unwrap_or("[No Name]");
    let file_segment: Cow<'_, str> = if info.modified {
        format!("{name}*").into()
    } else {
        name.into()
    };
    vec![
        StatusSegment::FileName(file_segment),
        StatusSegment::Position {
            line_1: info.cursor.line + 1,
            col_1: info.cursor.col + 1,
        },
        StatusSegment::LineCount(info.total_lines),
    ]
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(48);
    for seg in segments {
        match seg {
            StatusSegment::FileName(name) => s.push_str(name),
            StatusSegment::Position { line_1, col_1 } => {
                let _ = write!(s, " Ln {line_1}, Col {col_1}");
            }
            StatusSegment::LineCount(n) => {
                let noun = if *n == 1 { "line" } else { "lines" };
                let _ = write!(s, " | {n} {noun}");
            }
            StatusSegment::Prompt { label, value } => {
                s.push_str(label);
                s.push_str(value);
            }
        }
    }
    s
}

/// Full status row text for a terminal `width` columns wide, message included.
pub fn build_status_line(info: &StatusInfo, width: u16) -> String {
    let mut base = format_status(&compose_status(info));
    if info.prompt.is_some() {
        return base;
    }
    if let Some(msg) = info.message.as_deref() {
        let width = width as usize;
        let base_len = base.chars().count();
        let msg_len = msg.chars().count();
        if width > 0 && base_len + 1 + msg_len <= width {
            let pad = width - msg_len - base_len;
            base.extend(std::iter::repeat_n(' ', pad));
            base.push_str(msg);
        }
    }
    base
}
