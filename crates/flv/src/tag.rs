use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;

/// Size of an FLV tag header.
pub const FLV_TAG_HEADER_SIZE: usize = 11;

/// Size of the `previousTagSize` field between tags.
pub const PREVIOUS_TAG_SIZE_LEN: usize = 4;

/// FLV tag type.
///
/// The three defined types are audio (8), video (9) and script data (18).
/// Anything else (including the encrypted variants, which set higher bits)
/// ends up as [`FlvTagType::Unknown`] and is skipped by the demuxer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlvTagType {
    /// Audio tag (8)
    Audio,
    /// Video tag (9)
    Video,
    /// Script data tag (18)
    ScriptData,
    /// Any other tag type
    Unknown(u8),
}

impl From<u8> for FlvTagType {
    fn from(value: u8) -> Self {
        match value {
            8 => FlvTagType::Audio,
            9 => FlvTagType::Video,
            18 => FlvTagType::ScriptData,
            other => FlvTagType::Unknown(other),
        }
    }
}

/// The fixed 11-byte tag header preceding every tag payload.
///
/// The timestamp is 24 bits plus an extension byte that forms the *upper*
/// 8 bits, giving a 32-bit signed millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlvTagHeader {
    /// The tag type (the low 5 bits of the first byte).
    pub tag_type: FlvTagType,
    /// Payload size in bytes.
    pub data_size: u32,
    /// Tag timestamp in milliseconds.
    pub timestamp_ms: i32,
    /// Stream id; 0 in every conformant stream.
    pub stream_id: u32,
}

impl FlvTagHeader {
    /// Reads a tag header from the cursor.
    pub fn demux(reader: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let tag_type = FlvTagType::from(reader.read_u8()? & 0x1F);
        let data_size = reader.read_u24::<BigEndian>()?;
        let timestamp = reader.read_u24::<BigEndian>()? | ((reader.read_u8()? as u32) << 24);
        let stream_id = reader.read_u24::<BigEndian>()?;

        Ok(FlvTagHeader {
            tag_type,
            data_size,
            timestamp_ms: timestamp as i32,
            stream_id,
        })
    }
}
