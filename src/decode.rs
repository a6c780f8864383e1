// Chunk: docs/chunks/streaming_decode - Streaming byte-stream decode into a text buffer

//! Streaming construction of a [`TextBuffer`] from encoded bytes.
//!
//! The decode loop reads fixed-size chunks from the source, converts them to
//! UTF-16 through a stateful decoder, and extends the line index over just
//! the units each round produced. Decoding is total: unknown encodings yield
//! an empty buffer, each unrecoverable byte becomes a replacement character,
//! and the output grows geometrically when the size hint falls short. A
//! multi-byte sequence cut by a chunk boundary is carried inside the decoder
//! until the following read completes it.

use std::io::{ErrorKind, Read};

use encoding_rs::{Decoder, DecoderResult, Encoding};

use crate::line_index::{CrState, LineIndex};
use crate::text_buffer::TextBuffer;

/// Factor applied to the output length when the decoder runs out of room.
const OUTPUT_GROWTH_FACTOR: usize = 2;
/// Smallest output length to grow to, so a zero size hint still makes progress.
const MIN_OUTPUT_UNITS: usize = 64;
/// Unicode replacement character, written once per unrecoverable byte.
const REPLACEMENT: u16 = 0xFFFD;
/// Consumed bytes retained for malformed-input recovery. Malformed reports
/// cover at most a few bytes, so this always spans the reported sequence.
const RECOVERY_TAIL: usize = 16;

impl TextBuffer {
    /// Builds a buffer by decoding a byte stream, reporting progress as it
    /// reads.
    ///
    /// `size_hint` pre-sizes the output in code units (the source's byte
    /// length is a fine guess; too small only costs regrowth). The stream is
    /// read `chunk_size` bytes at a time, and `progress` receives the
    /// cumulative byte count once per non-empty read. `encoding_label` is a
    /// WHATWG encoding label such as `"utf-8"`, `"utf-16le"`, or
    /// `"shift_jis"`; an unrecognized label yields an empty buffer.
    ///
    /// Decoding never fails once started: each unrecoverable input byte
    /// becomes one U+FFFD and a read error simply ends the stream.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use flat_text::TextBuffer;
    ///
    /// let bytes = b"one\r\ntwo";
    /// let buffer = TextBuffer::decode(Cursor::new(&bytes[..]), bytes.len(), "utf-8", 4, |_| {});
    /// assert_eq!(buffer.line_count(), 2);
    /// let expected: Vec<u16> = "one".encode_utf16().collect();
    /// assert_eq!(buffer.line_units(0), expected);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn decode<R, F>(
        mut source: R,
        size_hint: usize,
        encoding_label: &str,
        chunk_size: usize,
        mut progress: F,
    ) -> TextBuffer
    where
        R: Read,
        F: FnMut(usize),
    {
        assert!(chunk_size > 0, "chunk_size must be non-zero");

        let encoding = match Encoding::for_label(encoding_label.as_bytes()) {
            Some(encoding) => encoding,
            None => return TextBuffer::new(),
        };
        let mut conversion = Conversion::new(encoding);

        let mut content = vec![0u16; size_hint];
        // Units produced so far; the vector's length is output capacity.
        let mut written = 0;
        // Units already scanned by the line index.
        let mut indexed = 0;
        let mut line_index = LineIndex::new();
        let mut cr_state = CrState::Idle;

        let mut chunk = vec![0u8; chunk_size];
        let mut total_bytes = 0;

        loop {
            let bytes_read = match source.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                // An unreadable source ends the stream; keep what decoded.
                Err(_) => break,
            };
            if bytes_read == 0 {
                break;
            }
            total_bytes += bytes_read;
            progress(total_bytes);

            written = conversion.convert(&chunk[..bytes_read], &mut content, written, false);
            cr_state = line_index.scan_chunk(&content[indexed..written], indexed, cr_state);
            indexed = written;
        }

        // End of stream: flush the decoder so a dangling partial sequence is
        // reported as malformed, then resolve a pending carriage return.
        written = conversion.convert(&[], &mut content, written, true);
        cr_state = line_index.scan_chunk(&content[indexed..written], indexed, cr_state);
        line_index.finish(cr_state, written);

        content.truncate(written);
        let buffer = TextBuffer::from_parts(content, line_index);
        buffer.assert_line_index_consistent();
        buffer
    }
}

/// Stateful byte-to-UTF-16 conversion with byte-granular recovery.
///
/// The decoder reports malformed input a whole sequence at a time, but the
/// recovery contract is one replacement character per unrecoverable byte:
/// only the first byte of a reported sequence is replaced, and the rest are
/// re-examined, so a valid sequence beginning inside a bad one still
/// decodes. `recent` keeps the tail of consumed input so those bytes are
/// available to re-feed, including across chunk boundaries.
struct Conversion {
    decoder: Decoder,
    recent: Vec<u8>,
}

impl Conversion {
    fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder_without_bom_handling(),
            recent: Vec::with_capacity(RECOVERY_TAIL),
        }
    }

    /// Feeds one round of input through the decoder, growing the output and
    /// writing replacement characters as needed. Returns the new unit count.
    fn convert(
        &mut self,
        mut input: &[u8],
        content: &mut Vec<u16>,
        mut written: usize,
        last: bool,
    ) -> usize {
        // Bytes queued for re-examination after a malformed byte was
        // replaced; drained before any remaining fresh input.
        let mut replay: Vec<u8> = Vec::new();
        loop {
            let feeding_replay = !replay.is_empty();
            let feed: &[u8] = if feeding_replay { &replay } else { input };
            // The final-call flag holds only for the last bytes this round
            // will feed.
            let feed_is_final = last && (!feeding_replay || input.is_empty());
            let (result, bytes_read, units_written) = self.decoder.decode_to_utf16_without_replacement(
                feed,
                &mut content[written..],
                feed_is_final,
            );
            written += units_written;
            self.remember(&feed[..bytes_read]);
            if feeding_replay {
                replay.drain(..bytes_read);
            } else {
                input = &input[bytes_read..];
            }
            match result {
                DecoderResult::InputEmpty => {
                    if replay.is_empty() && input.is_empty() {
                        return written;
                    }
                }
                DecoderResult::OutputFull => grow(content),
                DecoderResult::Malformed(bad, extra) => {
                    self.requeue_after_first(bad as usize + extra as usize, &mut replay);
                    if written == content.len() {
                        grow(content);
                    }
                    content[written] = REPLACEMENT;
                    written += 1;
                }
            }
        }
    }

    /// Records consumed bytes, keeping only the tail recovery can reach.
    fn remember(&mut self, consumed: &[u8]) {
        self.recent.extend_from_slice(consumed);
        if self.recent.len() > RECOVERY_TAIL {
            let excess = self.recent.len() - RECOVERY_TAIL;
            self.recent.drain(..excess);
        }
    }

    /// Removes a reported malformed sequence (plus any bytes consumed just
    /// past it) from the consumed tail and queues everything after its
    /// first byte for re-examination. The first byte is the one the caller
    /// replaces.
    fn requeue_after_first(&mut self, reported: usize, replay: &mut Vec<u8>) {
        debug_assert!(
            reported >= 1 && reported <= self.recent.len(),
            "malformed report of {} bytes exceeds retained tail of {}",
            reported,
            self.recent.len()
        );
        let sequence = self.recent.split_off(self.recent.len() - reported);
        replay.splice(..0, sequence[1..].iter().copied());
    }
}

/// Doubles the output length, from a floor that guarantees progress.
fn grow(content: &mut Vec<u16>) {
    let new_len = (content.len() * OUTPUT_GROWTH_FACTOR).max(MIN_OUTPUT_UNITS);
    content.resize(new_len, 0);
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn utf16(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    fn decode_str(bytes: &[u8], label: &str, chunk_size: usize) -> TextBuffer {
        TextBuffer::decode(Cursor::new(bytes), bytes.len(), label, chunk_size, |_| {})
    }

    // ==================== Basic decoding ====================

    #[test]
    fn test_decode_utf8() {
        let buffer = decode_str(b"ab\ncd", "utf-8", 16);
        assert_eq!(buffer, TextBuffer::from_str("ab\ncd"));
    }

    #[test]
    fn test_decode_empty_stream() {
        let buffer = decode_str(b"", "utf-8", 16);
        assert_eq!(buffer, TextBuffer::new());
    }

    #[test]
    fn test_decode_unknown_label_yields_empty_buffer() {
        let buffer = decode_str(b"ab\ncd", "no-such-encoding", 16);
        assert_eq!(buffer, TextBuffer::new());
        assert_eq!(buffer.line_starts(), [0]);
    }

    #[test]
    fn test_decode_windows_1252() {
        let buffer = decode_str(b"caf\xe9\nau lait", "windows-1252", 16);
        assert_eq!(buffer, TextBuffer::from_str("café\nau lait"));
    }

    #[test]
    fn test_decode_utf16le() {
        let buffer = decode_str(b"h\x00i\x00\n\x00!\x00", "utf-16le", 16);
        assert_eq!(buffer, TextBuffer::from_str("hi\n!"));
    }

    // ==================== Recovery ====================

    #[test]
    fn test_decode_invalid_byte_becomes_replacement() {
        let buffer = decode_str(b"ab\xffcd", "utf-8", 16);
        assert_eq!(buffer.units(), utf16("ab\u{fffd}cd"));
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn test_decode_truncated_sequence_at_eof() {
        // 0xE2 0x82 is the first two bytes of a three-byte sequence; with
        // the stream ended, each dangling byte is replaced in turn (0x82
        // alone is no more decodable than 0xE2 was).
        let buffer = decode_str(b"ab\xe2\x82", "utf-8", 16);
        assert_eq!(buffer.units(), utf16("ab\u{fffd}\u{fffd}"));
    }

    #[test]
    fn test_decode_replaces_each_unrecoverable_byte() {
        // Two truncated three-byte sequences back to back: all four bytes
        // are unrecoverable, one marker each.
        let buffer = decode_str(b"a\xe2\x82\xe2\x82b", "utf-8", 16);
        assert_eq!(
            buffer.units(),
            utf16("a\u{fffd}\u{fffd}\u{fffd}\u{fffd}b")
        );
    }

    #[test]
    fn test_decode_resumes_inside_reported_sequence() {
        // 'A' is not a continuation byte, so only the 0xE2 is replaced and
        // the 'A' decodes normally.
        let buffer = decode_str(b"\xe2A\n", "utf-8", 16);
        assert_eq!(buffer.units(), utf16("\u{fffd}A\n"));
    }

    #[test]
    fn test_decode_odd_trailing_byte_utf16le() {
        let buffer = decode_str(b"a\x00b", "utf-16le", 16);
        assert_eq!(buffer.units(), utf16("a\u{fffd}"));
    }

    // ==================== Chunking ====================

    #[test]
    fn test_decode_single_byte_chunks() {
        let buffer = decode_str(b"ab\ncd\r\nef\rgh", "utf-8", 1);
        assert_eq!(buffer.line_starts(), [0, 3, 7, 10]);
        assert_eq!(buffer, TextBuffer::from_str("ab\ncd\r\nef\rgh"));
    }

    #[test]
    fn test_decode_crlf_split_across_reads_is_one_break() {
        let buffer = decode_str(b"a\r\nb", "utf-8", 1);
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_starts(), [0, 3]);
    }

    #[test]
    fn test_decode_multibyte_sequence_split_across_reads() {
        // Shift_JIS: 0x93 0xFA is one two-byte character.
        let buffer = decode_str(b"a\x93\xfab", "shift_jis", 1);
        assert_eq!(buffer, TextBuffer::from_str("a日b"));
    }

    // ==================== Growth ====================

    #[test]
    fn test_decode_grows_from_zero_hint() {
        let text = "x".repeat(200) + "\n" + &"y".repeat(100);
        let buffer = TextBuffer::decode(Cursor::new(text.as_bytes()), 0, "utf-8", 32, |_| {});
        assert_eq!(buffer, TextBuffer::from_str(&text));
    }

    #[test]
    fn test_decode_replacement_at_full_output() {
        // Hint exactly covers the leading units, forcing growth for U+FFFD.
        let buffer = TextBuffer::decode(Cursor::new(&b"ab\xff"[..]), 2, "utf-8", 16, |_| {});
        assert_eq!(buffer.units(), utf16("ab\u{fffd}"));
    }

    // ==================== Progress ====================

    #[test]
    fn test_decode_progress_reports_cumulative_bytes() {
        let mut reports = Vec::new();
        TextBuffer::decode(Cursor::new(&b"0123456789"[..]), 10, "utf-8", 4, |n| {
            reports.push(n)
        });
        assert_eq!(reports, [4, 8, 10]);
    }

    #[test]
    fn test_decode_no_progress_for_empty_stream() {
        let mut calls = 0;
        TextBuffer::decode(Cursor::new(&b""[..]), 0, "utf-8", 4, |_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_decode_no_progress_for_unknown_label() {
        let mut calls = 0;
        TextBuffer::decode(Cursor::new(&b"abc"[..]), 3, "bogus", 4, |_| calls += 1);
        assert_eq!(calls, 0);
    }
}
