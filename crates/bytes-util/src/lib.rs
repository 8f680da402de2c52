//! Bit-level reading and writing over byte buffers, plus zero-copy helpers
//! for cursors over [`bytes::Bytes`].
//!
//! The [`BitReader`] is a positional cursor over an immutable byte slice,
//! consuming bits MSB-first across byte boundaries. The [`BitWriter`] is its
//! mirror, accumulating bits into an owned buffer; it exists mostly so tests
//! can assemble bitstreams the same way the parsers consume them.
//!
//! [`BytesCursorExt`] adds O(1) sub-slice extraction to `io::Cursor<Bytes>`,
//! which the byte-level demuxers use to hand out payloads without copying.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(unsafe_code)]

mod bit_read;
mod bit_write;
mod bytes_cursor;

pub use bit_read::BitReader;
pub use bit_write::BitWriter;
pub use bytes_cursor::{BytesCursor, BytesCursorExt};
