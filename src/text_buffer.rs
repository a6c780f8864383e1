// Chunk: docs/chunks/flat_buffer - Flat UTF-16 text buffer with line-start index
// Chunk: docs/chunks/buffer_slices - Borrowed slice views and buffer composition

//! TextBuffer is the main public API for line-indexed text storage.
//!
//! It pairs flat UTF-16 content with a line index so line count, line
//! access, and the extent never require rescanning the content. Buffers are
//! append-only: content enters through construction, streaming decode, or
//! appending slices of other buffers, and composition carries the source's
//! already-computed line structure along with its units.

use std::fmt;

use crate::line_index::{CR, LineIndex};
use crate::slice::TextSlice;
use crate::types::Position;

/// A flat text buffer with line boundary tracking.
///
/// Content is stored as a contiguous run of UTF-16 code units alongside the
/// offsets where each line starts. `\n`, `\r\n`, and lone `\r` all terminate
/// lines. Two buffers are equal when both their content and their line
/// starts are element-wise equal, so a buffer assembled from slices compares
/// equal to one built directly from the same text.
#[derive(Clone, PartialEq, Eq)]
pub struct TextBuffer {
    content: Vec<u16>,
    line_index: LineIndex,
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self {
            content: Vec::new(),
            line_index: LineIndex::new(),
        }
    }

    /// Creates a text buffer from the UTF-16 code units of the given string.
    ///
    /// Note: We don't implement `FromStr` because it requires returning
    /// `Result`, but building a TextBuffer from a string cannot fail.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        let content: Vec<u16> = text.encode_utf16().collect();
        let mut line_index = LineIndex::new();
        line_index.rebuild(&content);
        Self {
            content,
            line_index,
        }
    }

    /// Creates a text buffer holding a copy of the given slice.
    ///
    /// The new buffer's line starts are the slice's interior line starts
    /// translated to start at zero; the slice's units are not rescanned. A
    /// slice boundary that splits a `\r\n` pair therefore keeps the source's
    /// line structure: the orphaned half does not become a terminator of its
    /// own.
    pub fn from_slice(slice: TextSlice<'_>) -> Self {
        let content = slice.units().to_vec();
        let mut line_index = LineIndex::new();
        line_index.append_rebased(slice.interior_line_starts(), slice.start_offset(), 0);
        Self {
            content,
            line_index,
        }
    }

    /// Internal constructor for content and index built together.
    pub(crate) fn from_parts(content: Vec<u16>, line_index: LineIndex) -> Self {
        Self {
            content,
            line_index,
        }
    }

    // ==================== Accessors ====================

    /// Returns the total code-unit count in the buffer.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the buffer's content as raw code units, terminators included.
    pub fn units(&self) -> &[u16] {
        &self.content
    }

    /// Returns the number of lines in the buffer.
    ///
    /// Always at least 1 (even for an empty buffer).
    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    /// Returns the offsets where each line starts. The first is always 0.
    pub fn line_starts(&self) -> &[usize] {
        self.line_index.line_starts()
    }

    /// Returns the content of the given line, excluding its terminator.
    ///
    /// For a `\r\n` terminated line both units are excluded. The last
    /// line has no terminator and runs to the end of the buffer. Panics
    /// if `line` is out of range.
    pub fn line_units(&self, line: usize) -> &[u16] {
        let line_count = self.line_count();
        assert!(
            line < line_count,
            "line {} out of range ({} lines)",
            line,
            line_count
        );
        let start = self.line_index.line_starts()[line];
        let end = match self.line_index.line_start(line + 1) {
            Some(next) => {
                // The next line starts just past this line's terminator.
                // A \r\n terminator leaves its \r behind after the -1; an
                // empty line (end == start) has nothing to trim.
                let mut end = next - 1;
                if end > start && self.content[end - 1] == CR {
                    end -= 1;
                }
                end
            }
            // The last line is unterminated and runs to the end of the
            // content, so a trailing \r carried in by composition stays.
            None => self.content.len(),
        };
        &self.content[start..end]
    }

    /// Returns the length of the given line, excluding its terminator.
    ///
    /// Panics if `line` is out of range.
    pub fn line_len(&self, line: usize) -> usize {
        self.line_units(line).len()
    }

    /// Returns the buffer's extent: the last line number paired with the
    /// number of units after the last line start.
    ///
    /// Content ending in a terminator yields an extent with column 0, on
    /// the empty line the terminator opened.
    pub fn extent(&self) -> Position {
        let last_line = self.line_count() - 1;
        Position::new(last_line, self.content.len() - self.line_index.last_start())
    }

    /// Returns the position of the given code-unit offset.
    ///
    /// An offset inside a line's terminator maps to that line, and the
    /// buffer length itself maps to the extent. Panics if `offset` is past
    /// the end.
    pub fn position_at_offset(&self, offset: usize) -> Position {
        assert!(
            offset <= self.content.len(),
            "offset {} beyond end {}",
            offset,
            self.content.len()
        );
        let line = self.line_index.line_at_offset(offset);
        Position::new(line, offset - self.line_index.line_starts()[line])
    }

    // ==================== Slicing ====================

    /// Returns a borrowed view of the range `[start, end)`.
    ///
    /// Both positions must name existing lines, their columns must lie
    /// within the line's span (content plus terminator), and `start` must
    /// not come after `end`. A column equal to a line's full span names the
    /// same offset as the next line's column 0; it is resolved to that
    /// spelling, so both address the buffer identically. Violations are
    /// programmer errors and panic.
    pub fn slice(&self, start: Position, end: Position) -> TextSlice<'_> {
        assert!(
            start <= end,
            "slice range inverted: start {:?}, end {:?}",
            start,
            end
        );
        let (start, start_offset) = self.resolve(start);
        let (end, end_offset) = self.resolve(end);
        debug_assert!(start_offset <= end_offset);
        TextSlice::new(self, start, end, start_offset, end_offset)
    }

    /// Returns a view of the whole buffer, from the origin to the extent.
    pub fn as_slice(&self) -> TextSlice<'_> {
        self.slice(Position::default(), self.extent())
    }

    /// Resolves a position to its canonical spelling and absolute offset,
    /// validating it.
    ///
    /// The canonical form of a line's one-past-the-span column is the next
    /// line's column 0. Resolving before slicing keeps the line arithmetic
    /// on slices (notably which line starts count as interior) independent
    /// of which spelling the caller used.
    fn resolve(&self, pos: Position) -> (Position, usize) {
        let line_count = self.line_count();
        assert!(
            pos.line < line_count,
            "line {} out of range ({} lines)",
            pos.line,
            line_count
        );
        let start = self.line_index.line_starts()[pos.line];
        let (span, next) = match self.line_index.line_start(pos.line + 1) {
            Some(next) => (next - start, Some(next)),
            None => (self.content.len() - start, None),
        };
        assert!(
            pos.col <= span,
            "column {} exceeds line {} span of {}",
            pos.col,
            pos.line,
            span
        );
        match next {
            Some(next) if pos.col == span => (Position::new(pos.line + 1, 0), next),
            _ => (pos, start + pos.col),
        }
    }

    // ==================== Composition ====================

    /// Appends a slice of another buffer to this one.
    ///
    /// The slice's units are copied and its interior line starts are
    /// translated into this buffer's coordinates, so the cost beyond the
    /// copy is proportional to the number of line breaks in the slice. The
    /// borrow rules prevent appending a buffer's slice to itself.
    pub fn append(&mut self, slice: TextSlice<'_>) {
        let base = self.content.len();
        self.content.extend_from_slice(slice.units());
        self.line_index
            .append_rebased(slice.interior_line_starts(), slice.start_offset(), base);
    }

    /// Builds a buffer from two slices joined in order.
    pub fn concat(first: TextSlice<'_>, second: TextSlice<'_>) -> TextBuffer {
        let mut result = TextBuffer::new();
        result.append(first);
        result.append(second);
        result
    }

    /// Builds a buffer from three slices joined in order.
    pub fn concat3(
        first: TextSlice<'_>,
        second: TextSlice<'_>,
        third: TextSlice<'_>,
    ) -> TextBuffer {
        let mut result = TextBuffer::new();
        result.append(first);
        result.append(second);
        result.append(third);
        result
    }

    // ==================== Validation ====================

    /// Verifies the line index agrees with a ground-truth rebuild from the
    /// content. Only valid where the content was produced by scanning
    /// (construction or decode), not by slice composition, which may
    /// legitimately preserve a split `\r\n` from its source. Compiled out
    /// in release builds.
    #[cfg(debug_assertions)]
    pub(crate) fn assert_line_index_consistent(&self) {
        let mut expected = LineIndex::new();
        expected.rebuild(&self.content);
        assert_eq!(
            self.line_index.line_starts(),
            expected.line_starts(),
            "line index drift detected (buffer len {})",
            self.content.len(),
        );
    }

    #[cfg(not(debug_assertions))]
    pub(crate) fn assert_line_index_consistent(&self) {}
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextBuffer {
    /// Renders the content with low code units as literal characters and the
    /// rest as escaped numerics, followed by the raw line starts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextBuffer {{ content: \"")?;
        for &unit in &self.content {
            if unit < 255 {
                write!(f, "{}", (unit as u8) as char)?;
            } else {
                write!(f, "\\u{{{:04x}}}", unit)?;
            }
        }
        write!(f, "\", line_starts: {:?} }}", self.line_index.line_starts())
    }
}
