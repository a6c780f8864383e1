// Chunk: docs/chunks/flat_buffer - Flat UTF-16 text buffer with line-start index

/// Position in the buffer as (line, column) where both are 0-indexed.
///
/// Columns are measured in UTF-16 code units from the start of the line.
/// A position may sit anywhere within a line's span, including on the
/// line's terminator or at the very end of the buffer. The buffer's
/// extent is also a `Position`: the last line number paired with the
/// length of the last line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Compare by line first, then by column
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.col.cmp(&other.col),
            ord => ord,
        }
    }
}
