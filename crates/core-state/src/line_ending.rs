//! Line ending detection and LF normalization for loaded files.

/// Line ending style detected from source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Result of normalizing line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// LF-only content.
    pub normalized: String,
    /// Majority style in the input (LF when there were no breaks).
    pub original: LineEnding,
    /// More than one style was present.
    pub mixed: bool,
}

/// Rewrite CRLF and lone CR to LF, reporting the dominant original style.
/// Ties resolve CRLF > LF > CR.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                crlf += 1;
                out.push('\n');
            }
            '\r' => {
                cr += 1;
                out.push('\n');
            }
            '\n' => {
                lf += 1;
                out.push('\n');
            }
            other => out.push(other),
        }
    }
    let counts = [(LineEnding::Crlf, crlf), (LineEnding::Lf, lf), (LineEnding::Cr, cr)];
    let mut original = LineEnding::Lf;
    let mut max = 0;
    for (style, n) in counts {
        if n > max {
            max = n;
            original = style;
        }
    }
    let mixed = counts.iter().filter(|(_, n)| *n > 0).count() > 1;
    NormalizedText {
        normalized: out,
        original,
        mixed,
    }
}
