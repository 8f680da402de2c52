use std::io;

use crate::Amf0Marker;

/// Errors produced while decoding AMF0 data.
#[derive(Debug, thiserror::Error)]
pub enum Amf0ReadError {
    /// A marker byte outside the AMF0 table.
    #[error("unknown marker: {0}")]
    UnknownMarker(u8),
    /// A marker we recognize but do not decode (references, typed objects,
    /// AMF3 escapes).
    #[error("unsupported type: {0:?}")]
    UnsupportedType(Amf0Marker),
    /// A string payload was not valid UTF-8.
    #[error("string parse error: {0}")]
    StringParse(#[from] std::str::Utf8Error),
    /// The buffer ended inside a value.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// `decode_with_type` found a different marker than requested.
    #[error("wrong type: expected {expected:?}, got {got:?}")]
    WrongType {
        /// The marker the caller asked for.
        expected: Amf0Marker,
        /// The marker actually present.
        got: Amf0Marker,
    },
}

/// Errors produced while encoding AMF0 data.
#[derive(Debug, thiserror::Error)]
pub enum Amf0WriteError {
    /// An IO error from the underlying writer.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
