// Chunk: docs/chunks/flat_buffer - Flat UTF-16 text buffer with line-start index
// Chunk: docs/chunks/buffer_slices - Borrowed slice views and buffer composition
// Chunk: docs/chunks/streaming_decode - Streaming byte-stream decode into a text buffer

//! flat-text: a line-indexed flat text buffer.
//!
//! This crate stores text as a contiguous run of UTF-16 code units paired
//! with an index of line-start offsets, so line count, line access, and the
//! buffer extent are cheap reads rather than scans. It is designed as the
//! storage layer under editors and diff engines that address text by
//! (line, column) coordinates.
//!
//! # Overview
//!
//! The main type is [`TextBuffer`], which provides:
//! - Construction from strings, from borrowed slices, or by streaming decode
//!   of an encoded byte source
//! - Line-based access in (line, column) coordinates, with `\n`, `\r\n`, and
//!   lone `\r` all recognized as terminators
//! - Append-only composition: slices of existing buffers are appended or
//!   concatenated, carrying their line structure instead of rescanning
//!
//! [`TextSlice`] is a borrowed view of a buffer range. The borrow ties every
//! slice to its source, so content a slice points into can never be appended
//! to or dropped while the slice is live.
//!
//! # Example
//!
//! ```
//! use flat_text::{Position, TextBuffer};
//!
//! let buffer = TextBuffer::from_str("alpha\nbeta\r\ngamma");
//! assert_eq!(buffer.line_count(), 3);
//! assert_eq!(buffer.extent(), Position::new(2, 5));
//!
//! let expected: Vec<u16> = "beta".encode_utf16().collect();
//! assert_eq!(buffer.line_units(1), expected);
//!
//! // Reassemble a buffer from slices; line structure comes along.
//! let head = buffer.slice(Position::new(0, 0), Position::new(1, 0));
//! let tail = buffer.slice(Position::new(1, 0), buffer.extent());
//! assert_eq!(TextBuffer::concat(head, tail), buffer);
//! ```
//!
//! # Streaming Decode
//!
//! [`TextBuffer::decode`] builds a buffer from any [`std::io::Read`] source
//! in fixed-size chunks, converting from a WHATWG-labelled encoding and
//! reporting cumulative progress after every read. Decoding is total:
//! unknown labels produce an empty buffer and undecodable bytes become
//! U+FFFD replacement characters.

mod decode;
mod line_index;
mod slice;
mod text_buffer;
mod types;

pub use slice::TextSlice;
pub use text_buffer::TextBuffer;
pub use types::Position;
