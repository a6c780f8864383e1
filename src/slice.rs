// Chunk: docs/chunks/buffer_slices - Borrowed slice views and buffer composition

//! Read-only views over a range of a text buffer.
//!
//! A [`TextSlice`] is the unit of composition: buffers are appended to and
//! concatenated from slices, never from raw unit arrays, so the line
//! structure already computed for the source travels with the content. The
//! borrow on the source buffer means a slice can never outlive the content
//! it points into, and a buffer with outstanding slices cannot be appended
//! to.

use crate::text_buffer::TextBuffer;
use crate::types::Position;

/// A borrowed half-open range `[start, end)` of a [`TextBuffer`].
///
/// Construct one with [`TextBuffer::slice`] or [`TextBuffer::as_slice`].
/// Offsets are resolved once at construction, so every accessor here is
/// cheap and infallible.
#[derive(Debug, Clone, Copy)]
pub struct TextSlice<'a> {
    text: &'a TextBuffer,
    start: Position,
    end: Position,
    start_offset: usize,
    end_offset: usize,
}

impl<'a> TextSlice<'a> {
    pub(crate) fn new(
        text: &'a TextBuffer,
        start: Position,
        end: Position,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Self {
            text,
            start,
            end,
            start_offset,
            end_offset,
        }
    }

    /// Returns the position where the slice begins.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Returns the position where the slice ends (exclusive).
    pub fn end(&self) -> Position {
        self.end
    }

    /// Returns the absolute code-unit offset of the slice start.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Returns the absolute code-unit offset of the slice end.
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// Returns the number of code units in the slice.
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Returns true if the slice covers no units.
    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Returns the code units the slice covers.
    pub fn units(&self) -> &'a [u16] {
        &self.text.units()[self.start_offset..self.end_offset]
    }

    /// Returns the source buffer's line starts for rows strictly inside the
    /// range, in the source's coordinate space.
    ///
    /// These are the rows `(start.line, end.line]`: every line boundary the
    /// slice's content crosses. Appending the slice elsewhere translates
    /// exactly these offsets instead of rescanning the units.
    pub fn interior_line_starts(&self) -> &'a [usize] {
        &self.text.line_starts()[self.start.line + 1..self.end.line + 1]
    }

    /// Iterates over the slice's code units.
    pub fn iter(&self) -> impl Iterator<Item = u16> + 'a {
        self.units().iter().copied()
    }
}
