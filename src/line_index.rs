// Chunk: docs/chunks/flat_buffer - Flat UTF-16 text buffer with line-start index

//! Line index for tracking line boundaries in the text buffer.
//!
//! Maintains an array of line start offsets for O(1) line count and O(1) line
//! access. Recognizes all three terminator forms: `\n`, `\r\n`, and lone `\r`.
//! The index can be built in one pass over complete content, or extended
//! incrementally as content arrives in chunks during streaming decode.

/// Line feed code unit.
pub(crate) const LF: u16 = b'\n' as u16;
/// Carriage return code unit.
pub(crate) const CR: u16 = b'\r' as u16;

/// Scanner state carried across chunk boundaries during incremental indexing.
///
/// A `\r` at the end of one chunk terminates a line, but whether the next
/// line starts immediately after it depends on the first unit of the next
/// chunk (a following `\n` belongs to the same `\r\n` terminator). The state
/// defers that decision until the next unit is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrState {
    /// No undecided carriage return.
    Idle,
    /// The previous unit was `\r`; the following line's start is pending.
    SawCr,
}

/// Tracks line boundaries in a text buffer.
///
/// The line index maintains a list of code-unit offsets where each line
/// starts. The first entry is always 0, and entries are strictly increasing.
/// This enables O(1) access to line count and O(log n) lookup of which line
/// contains a given offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Code-unit offsets where each line starts. line_starts[0] = 0 always.
    /// Each entry points to the first unit of that line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new line index with a single empty line.
    pub fn new() -> Self {
        Self {
            line_starts: vec![0],
        }
    }

    /// Rebuilds the line index from complete content in a single pass.
    ///
    /// With the full content available, a `\r\n` pair is recognized by
    /// looking ahead one unit, so no scanner state is needed.
    pub fn rebuild(&mut self, units: &[u16]) {
        self.line_starts.clear();
        self.line_starts.push(0);

        let mut offset = 0;
        while offset < units.len() {
            match units[offset] {
                LF => {
                    self.line_starts.push(offset + 1);
                    offset += 1;
                }
                CR => {
                    if units.get(offset + 1) == Some(&LF) {
                        self.line_starts.push(offset + 2);
                        offset += 2;
                    } else {
                        self.line_starts.push(offset + 1);
                        offset += 1;
                    }
                }
                _ => offset += 1,
            }
        }
    }

    /// Extends the index over newly arrived units during streaming decode.
    ///
    /// `units` are the units produced since the last scan and `base` is their
    /// absolute offset in the full content. The returned state must be passed
    /// to the next `scan_chunk` call, and to [`LineIndex::finish`] once the
    /// stream ends, so a `\r` sitting on a chunk boundary is resolved against
    /// the unit that follows it rather than being counted twice.
    pub fn scan_chunk(&mut self, units: &[u16], base: usize, mut state: CrState) -> CrState {
        for (i, &unit) in units.iter().enumerate() {
            let offset = base + i;
            match unit {
                LF => {
                    // A pending \r was the first half of \r\n: one terminator,
                    // and the next line starts after the \n.
                    state = CrState::Idle;
                    self.line_starts.push(offset + 1);
                }
                CR => {
                    if state == CrState::SawCr {
                        // The previous \r stood alone; the line it ended
                        // starts here.
                        self.line_starts.push(offset);
                    }
                    state = CrState::SawCr;
                }
                _ => {
                    if state == CrState::SawCr {
                        self.line_starts.push(offset);
                        state = CrState::Idle;
                    }
                }
            }
        }
        state
    }

    /// Resolves a carriage return left pending at the end of the stream.
    ///
    /// `end` is the total content length; a trailing lone `\r` terminates a
    /// final empty line starting there.
    pub fn finish(&mut self, state: CrState, end: usize) {
        if state == CrState::SawCr {
            self.line_starts.push(end);
        }
    }

    /// Returns the number of lines in the buffer.
    ///
    /// A buffer always has at least one line (even if empty).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the code-unit offset where the given line starts.
    ///
    /// Returns None if the line index is out of bounds.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Returns the start offset of the last line.
    pub fn last_start(&self) -> usize {
        self.line_starts[self.line_starts.len() - 1]
    }

    /// Returns the line number containing the given code-unit offset.
    ///
    /// Uses binary search for O(log n) lookup.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Appends line starts recorded in another buffer's coordinate space.
    ///
    /// Each start is translated from offsets relative to `from_base` (the
    /// source range's first offset) to this index's space beginning at
    /// `to_base` (the destination length before the content was appended).
    /// Carrying the starts over instead of rescanning the appended units is
    /// what keeps composition proportional to the number of line breaks.
    pub fn append_rebased(&mut self, starts: &[usize], from_base: usize, to_base: usize) {
        self.line_starts.reserve(starts.len());
        for &start in starts {
            debug_assert!(start >= from_base, "line start precedes its range");
            self.line_starts.push(to_base + (start - from_base));
        }
        debug_assert!(
            self.line_starts.windows(2).all(|pair| pair[0] < pair[1]),
            "line starts out of order after rebase"
        );
    }

    /// Returns the raw line_starts array.
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
