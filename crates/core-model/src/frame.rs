//! Render-ready snapshot of what the terminal should show.
//!
//! Built from `EditorState` + `View` after every dispatch so the renderer never
//! reaches back into editing state.

use core_state::EditorState;
use core_text::Position;

use crate::View;

/// Search hit on a visible line, in char columns of the line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start_col: usize,
    pub len: usize,
    /// This span is the active search match.
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLine {
    /// 1-based line number as displayed in the gutter.
    pub line_number: usize,
    pub text: String,
    pub highlights: Vec<HighlightSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub file_name: Option<String>,
    pub cursor: Position,
    pub total_lines: usize,
    pub modified: bool,
    pub message: Option<String>,
    /// Active prompt as (label, typed value).
    pub prompt: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub lines: Vec<FrameLine>,
    /// Cursor relative to the text area: (row, col) with col in buffer chars.
    pub cursor_screen: (usize, usize),
    pub text_rows: usize,
    pub status: StatusInfo,
}

impl RenderFrame {
    pub fn build(state: &EditorState, view: &View) -> Self {
        let buffer = &state.buffer;
        let line_count = buffer.line_count();
        let current = state.search.current_match();
        let lines = view
            .visible_range(line_count)
            .map(|idx| {
                let highlights = state
                    .search
                    .spans_for_line(idx)
                    .into_iter()
                    .map(|(m, len)| HighlightSpan {
                        start_col: m.col,
                        len,
                        current: current == Some(m),
                    })
                    .collect();
                FrameLine {
                    line_number: idx + 1,
                    text: buffer.line(idx).unwrap_or_default(),
                    highlights,
                }
            })
            .collect();
        let cursor = buffer.cursor();
        let prompt = state
            .prompt
            .kind()
            .map(|k| (k.label().to_string(), state.prompt.buffer().to_string()));
        Self {
            lines,
            cursor_screen: (cursor.line.saturating_sub(view.first_line), cursor.col),
            text_rows: view.text_rows,
            status: StatusInfo {
                file_name: state
                    .file_name
                    .as_ref()
                    .map(|p| p.display().to_string()),
                cursor,
                total_lines: line_count,
                modified: state.is_modified(),
                message: state.ephemeral_status.as_ref().map(|m| m.text.clone()),
                prompt,
            },
        }
    }
}
