use std::io;

/// The frame type nibble of a video tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFrameType {
    /// Key frame; for AVC, a seekable frame (1)
    KeyFrame,
    /// Inter frame (2)
    InterFrame,
    /// Disposable inter frame, H.263 only (3)
    DisposableInterFrame,
    /// Generated key frame, reserved for server use (4)
    GeneratedKeyFrame,
    /// Video info/command frame; the payload is not picture data (5)
    VideoInfoFrame,
}

impl TryFrom<u8> for VideoFrameType {
    type Error = io::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VideoFrameType::KeyFrame),
            2 => Ok(VideoFrameType::InterFrame),
            3 => Ok(VideoFrameType::DisposableInterFrame),
            4 => Ok(VideoFrameType::GeneratedKeyFrame),
            5 => Ok(VideoFrameType::VideoInfoFrame),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid video frame type: {other}"),
            )),
        }
    }
}

/// The codec id nibble of a video tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodecId {
    /// Sorenson H.263 (2)
    SorensonH263,
    /// Screen video (3)
    ScreenVideo,
    /// On2 VP6 (4)
    On2Vp6,
    /// On2 VP6 with alpha channel (5)
    On2Vp6Alpha,
    /// AVC / H.264 (7)
    Avc,
    /// Any other value
    Unknown(u8),
}

impl From<u8> for VideoCodecId {
    fn from(value: u8) -> Self {
        match value {
            2 => VideoCodecId::SorensonH263,
            3 => VideoCodecId::ScreenVideo,
            4 => VideoCodecId::On2Vp6,
            5 => VideoCodecId::On2Vp6Alpha,
            7 => VideoCodecId::Avc,
            other => VideoCodecId::Unknown(other),
        }
    }
}

/// The unpacked first byte of a video tag:
/// `frameType(4) | codecId(4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoTagHeader {
    /// The frame type nibble.
    pub frame_type: VideoFrameType,
    /// The codec id nibble.
    pub codec_id: VideoCodecId,
}

impl VideoTagHeader {
    /// Unpacks the header byte.
    pub fn demux(byte: u8) -> io::Result<Self> {
        Ok(VideoTagHeader {
            frame_type: VideoFrameType::try_from(byte >> 4)?,
            codec_id: VideoCodecId::from(byte & 0x0F),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demux_header_byte() {
        let header = VideoTagHeader::demux(0x17).unwrap();
        assert_eq!(header.frame_type, VideoFrameType::KeyFrame);
        assert_eq!(header.codec_id, VideoCodecId::Avc);

        let header = VideoTagHeader::demux(0x27).unwrap();
        assert_eq!(header.frame_type, VideoFrameType::InterFrame);

        let header = VideoTagHeader::demux(0x52).unwrap();
        assert_eq!(header.frame_type, VideoFrameType::VideoInfoFrame);
        assert_eq!(header.codec_id, VideoCodecId::SorensonH263);
    }

    #[test]
    fn test_unknown_codec() {
        let header = VideoTagHeader::demux(0x1C).unwrap();
        assert_eq!(header.codec_id, VideoCodecId::Unknown(12));
    }

    #[test]
    fn test_invalid_frame_type() {
        assert!(VideoTagHeader::demux(0x07).is_err());
        assert!(VideoTagHeader::demux(0x67).is_err());
    }
}
