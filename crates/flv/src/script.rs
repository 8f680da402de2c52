use std::io;

use amf0::{Amf0Decoder, Amf0Marker, Amf0ReadError, Amf0Value};
use bytes::Bytes;
use bytes_util::BytesCursorExt;

/// A decoded script data tag: an AMF0 string name followed by one value.
///
/// The tag that matters is `onMetaData`, whose value is an ECMA array (or
/// object) describing the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptData {
    /// The script name, `"onMetaData"` for metadata tags.
    pub name: String,
    /// The value following the name.
    pub value: Amf0Value,
}

impl ScriptData {
    /// Decodes a script tag payload.
    pub fn demux(reader: &mut io::Cursor<Bytes>) -> Result<Self, Amf0ReadError> {
        let buf = reader.extract_remaining();
        let mut decoder = Amf0Decoder::new(&buf);

        let name = match decoder.decode_with_type(Amf0Marker::String)? {
            Amf0Value::String(name) => name,
            value => {
                return Err(Amf0ReadError::WrongType {
                    expected: Amf0Marker::String,
                    got: value.marker(),
                })
            }
        };
        let value = decoder.decode()?;

        Ok(Self { name, value })
    }
}
