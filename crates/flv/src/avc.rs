use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use bytes_util::BytesCursorExt;
use h264::AVCDecoderConfigurationRecord;

/// The `avcPacketType` byte of an AVC video tag body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvcPacketType {
    /// AVC decoder configuration record (0)
    SequenceHeader,
    /// One or more length-prefixed NAL units (1)
    Nalu,
    /// End of sequence marker (2)
    EndOfSequence,
    /// Any other value
    Unknown(u8),
}

impl From<u8> for AvcPacketType {
    fn from(value: u8) -> Self {
        match value {
            0 => AvcPacketType::SequenceHeader,
            1 => AvcPacketType::Nalu,
            2 => AvcPacketType::EndOfSequence,
            other => AvcPacketType::Unknown(other),
        }
    }
}

/// An AVC video tag body.
/// Defined in the FLV specification, AVCVIDEOPACKET.
#[derive(Debug, Clone, PartialEq)]
pub enum AvcPacket {
    /// An AVC decoder configuration record.
    SequenceHeader(AVCDecoderConfigurationRecord),
    /// Length-prefixed NAL unit data with its composition time offset.
    Nalu {
        /// PTS minus DTS in milliseconds, sign-extended from 24 bits.
        composition_time: i32,
        /// The NAL unit data, still length-prefixed.
        data: Bytes,
    },
    /// End of sequence; carries no payload.
    EndOfSequence,
    /// A packet type we do not understand.
    Unknown {
        /// The unrecognized packet type byte.
        packet_type: u8,
        /// The remaining payload.
        data: Bytes,
    },
}

impl AvcPacket {
    /// Demuxes an AVC packet from a video tag body (cursor positioned after
    /// the frame type / codec id byte).
    pub fn demux(reader: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let packet_type = AvcPacketType::from(reader.read_u8()?);
        let composition_time = sign_extend_24(reader.read_u24::<BigEndian>()?);

        match packet_type {
            AvcPacketType::SequenceHeader => Ok(AvcPacket::SequenceHeader(
                AVCDecoderConfigurationRecord::parse(reader)?,
            )),
            AvcPacketType::Nalu => Ok(AvcPacket::Nalu {
                composition_time,
                data: reader.extract_remaining(),
            }),
            AvcPacketType::EndOfSequence => Ok(AvcPacket::EndOfSequence),
            AvcPacketType::Unknown(packet_type) => Ok(AvcPacket::Unknown {
                packet_type,
                data: reader.extract_remaining(),
            }),
        }
    }
}

/// Sign-extends a 24-bit two's-complement value to an i32.
pub(crate) fn sign_extend_24(value: u32) -> i32 {
    ((value << 8) as i32) >> 8
}
