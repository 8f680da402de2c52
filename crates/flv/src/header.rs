use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;

use crate::error::FlvError;

/// Size of the fixed FLV file header.
pub const FLV_HEADER_SIZE: usize = 9;

/// The 9-byte FLV file header.
///
/// Layout: `'F' 'L' 'V'`, a version byte, a flags byte (bit 2 = audio
/// present, bit 0 = video present), and a 4-byte `data_offset` that points
/// at the first `previousTagSize` field (9 for version 1 files, larger if a
/// future header grows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlvHeader {
    /// The version byte, 1 for every stream seen in the wild.
    pub version: u8,
    /// Whether the flags byte announces audio tags.
    pub has_audio: bool,
    /// Whether the flags byte announces video tags.
    pub has_video: bool,
    /// Offset of the byte after the header, at least 9.
    pub data_offset: u32,
}

impl FlvHeader {
    /// Parses the header from the start of the cursor.
    ///
    /// A wrong signature or an impossible `data_offset` is a
    /// [`FlvError::InvalidHeader`]; the whole stream is rejected on it.
    pub fn parse(reader: &mut io::Cursor<Bytes>) -> Result<Self, FlvError> {
        let signature = reader.read_u24::<BigEndian>()?;
        if signature != u32::from_be_bytes([0, b'F', b'L', b'V']) {
            return Err(FlvError::InvalidHeader("bad signature"));
        }

        let version = reader.read_u8()?;
        let flags = reader.read_u8()?;
        let has_audio = flags & 0b0000_0100 != 0;
        let has_video = flags & 0b0000_0001 != 0;

        let data_offset = reader.read_u32::<BigEndian>()?;
        if (data_offset as usize) < FLV_HEADER_SIZE {
            return Err(FlvError::InvalidHeader("data offset inside header"));
        }

        Ok(FlvHeader {
            version,
            has_audio,
            has_video,
            data_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(flags: u8) -> Bytes {
        let mut data = b"FLV\x01".to_vec();
        data.push(flags);
        data.extend_from_slice(&9u32.to_be_bytes());
        data.into()
    }

    #[test]
    fn test_parse_header() {
        let mut reader = io::Cursor::new(header_bytes(0x05));
        let header = FlvHeader::parse(&mut reader).unwrap();

        assert_eq!(header.version, 1);
        assert!(header.has_audio);
        assert!(header.has_video);
        assert_eq!(header.data_offset, 9);
        assert_eq!(reader.position(), 9);
    }

    #[test]
    fn test_flag_combinations() {
        let audio_only = FlvHeader::parse(&mut io::Cursor::new(header_bytes(0x04))).unwrap();
        assert!(audio_only.has_audio && !audio_only.has_video);

        let video_only = FlvHeader::parse(&mut io::Cursor::new(header_bytes(0x01))).unwrap();
        assert!(!video_only.has_audio && video_only.has_video);
    }

    #[test]
    fn test_bad_signature() {
        let mut data = b"FMV\x01\x05".to_vec();
        data.extend_from_slice(&9u32.to_be_bytes());

        let result = FlvHeader::parse(&mut io::Cursor::new(Bytes::from(data)));
        assert!(matches!(result, Err(FlvError::InvalidHeader(_))));
    }

    #[test]
    fn test_bad_data_offset() {
        let mut data = b"FLV\x01\x05".to_vec();
        data.extend_from_slice(&4u32.to_be_bytes());

        let result = FlvHeader::parse(&mut io::Cursor::new(Bytes::from(data)));
        assert!(matches!(result, Err(FlvError::InvalidHeader(_))));
    }
}
