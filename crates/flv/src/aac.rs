use bytes::Bytes;

/// The `aacPacketType` byte of an AAC audio tag body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AacPacketType {
    /// AudioSpecificConfig (0)
    SequenceHeader,
    /// A raw AAC frame (1)
    Raw,
    /// Any other value
    Unknown(u8),
}

impl From<u8> for AacPacketType {
    fn from(value: u8) -> Self {
        match value {
            0 => AacPacketType::SequenceHeader,
            1 => AacPacketType::Raw,
            other => AacPacketType::Unknown(other),
        }
    }
}

/// An AAC audio tag body, split on its packet type.
/// Defined in the FLV specification, AACAUDIODATA.
#[derive(Debug, Clone, PartialEq)]
pub enum AacPacket {
    /// An AudioSpecificConfig payload.
    SequenceHeader(Bytes),
    /// A raw AAC frame.
    Raw(Bytes),
    /// A packet type we do not understand.
    Unknown {
        /// The unrecognized packet type byte.
        packet_type: u8,
        /// The remaining payload.
        data: Bytes,
    },
}

impl AacPacket {
    /// Splits an AAC tag body (everything after the audio tag header byte)
    /// into its packet type and payload.
    pub fn demux(body: Bytes) -> Option<Self> {
        let packet_type = AacPacketType::from(*body.first()?);
        let data = body.slice(1..);

        Some(match packet_type {
            AacPacketType::SequenceHeader => AacPacket::SequenceHeader(data),
            AacPacketType::Raw => AacPacket::Raw(data),
            AacPacketType::Unknown(packet_type) => AacPacket::Unknown { packet_type, data },
        })
    }
}
