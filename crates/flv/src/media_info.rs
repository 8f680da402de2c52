use amf0::Amf0Value;
use bytes::Bytes;

/// The consolidated description of a demuxed stream.
///
/// A single flat record with optional fields, merged from the FLV header,
/// `onMetaData` script tags, the AVC decoder configuration record (and the
/// SPS inside it), the first audio tag and the runtime frame-rate sampler.
/// Later, more precise sources win: script-data dimensions yield to SPS
/// dimensions, the VUI frame rate yields to the measured one.
///
/// [`with_defaults`](MediaInfo::with_defaults) fills the presentation
/// fields consumers always want populated; the defaults are applied at
/// emission time so a later precise value can still land in the record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaInfo {
    /// Audio announced by the FLV header flags.
    pub has_audio: Option<bool>,
    /// Video announced by the FLV header flags.
    pub has_video: Option<bool>,

    /// `"aac"` or `"mp3"`.
    pub audio_codec: Option<&'static str>,
    /// `"avc"`.
    pub video_codec: Option<&'static str>,

    /// Sample rate in Hz from the audio tag header.
    pub audio_sample_rate: Option<u32>,
    /// Channel count from the audio tag header.
    pub audio_channel_count: Option<u32>,
    /// Rolling audio bitrate in kbit/s.
    pub audio_data_rate: Option<u32>,
    /// Rolling video bitrate in kbit/s.
    pub video_data_rate: Option<u32>,

    /// Cropped width in pixels, from the SPS (or script data before it).
    pub width: Option<u32>,
    /// Cropped height in pixels, from the SPS (or script data before it).
    pub height: Option<u32>,

    /// `profile_idc` from the AVC configuration record.
    pub profile: Option<u8>,
    /// `level_idc` from the AVC configuration record.
    pub level: Option<u8>,

    /// Owned copy of the first SPS NAL payload.
    pub sps: Option<Bytes>,
    /// Owned copy of the first PPS NAL payload.
    pub pps: Option<Bytes>,

    /// `"4:2:0"`, `"4:2:2"` or `"4:4:4"`.
    pub chroma_format: Option<&'static str>,
    /// Luma bit depth.
    pub bit_depth: Option<u8>,
    /// ffmpeg-style pixel format name (`"yuv420p"`, `"yuv422p10le"`, ...).
    pub pix_fmt: Option<&'static str>,

    /// `"full"` or `"limited"`.
    pub color_range: Option<&'static str>,
    /// Colour primaries name (`"bt709"`, `"bt2020"`, ...).
    pub color_primaries: Option<&'static str>,
    /// Transfer characteristics name (`"bt709"`, `"smpte2084"`, ...).
    pub color_transfer: Option<&'static str>,
    /// Matrix coefficients name (`"bt709"`, `"bt2020nc"`, ...).
    pub color_space: Option<&'static str>,

    /// Raw `colour_primaries` code.
    pub color_primaries_raw: Option<u8>,
    /// Raw `transfer_characteristics` code.
    pub transfer_characteristics: Option<u8>,
    /// Raw `matrix_coefficients` code.
    pub matrix_coefficients: Option<u8>,

    /// Frames per second, the latest best estimate.
    pub frame_rate: Option<f64>,
    /// Frames per second, the latest best estimate.
    pub fps: Option<f64>,

    /// The decoded `onMetaData` value.
    pub metadata: Option<Amf0Value>,
}

impl MediaInfo {
    /// Returns a copy with unset presentation fields replaced by the
    /// broadcast defaults: BT.709, limited range, 4:2:0 at 8 bits.
    pub fn with_defaults(&self) -> MediaInfo {
        let mut info = self.clone();
        info.pix_fmt.get_or_insert("yuv420p");
        info.color_range.get_or_insert("limited");
        info.color_space.get_or_insert("bt709");
        info.color_transfer.get_or_insert("bt709");
        info.color_primaries.get_or_insert("bt709");
        info.chroma_format.get_or_insert("4:2:0");
        info.bit_depth.get_or_insert(8);
        info
    }

    /// The RFC 6381 codec string for the video track, e.g. `avc1.4228`
    /// for Baseline level 4.0.
    pub fn video_mime_codec(&self) -> Option<String> {
        match (self.video_codec, self.profile, self.level) {
            (Some("avc"), Some(profile), Some(level)) => {
                Some(format!("avc1.{profile:02x}{level:02x}"))
            }
            _ => None,
        }
    }

    /// The RFC 6381 codec string for the audio track.
    pub fn audio_mime_codec(&self) -> Option<&'static str> {
        match self.audio_codec {
            Some("aac") => Some("mp4a.40.2"),
            Some("mp3") => Some("mp4a.6b"),
            _ => None,
        }
    }
}
