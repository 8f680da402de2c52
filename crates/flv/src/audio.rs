use std::io;

use bytes::Bytes;
use bytes_util::BytesCursorExt;

/// FLV audio codec ids (the `soundFormat` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundFormat {
    /// Linear PCM, platform endian (0)
    Pcm,
    /// ADPCM (1)
    Adpcm,
    /// MP3 (2)
    Mp3,
    /// Linear PCM, little endian (3)
    PcmLe,
    /// Nellymoser 16 kHz mono (4)
    Nellymoser16kMono,
    /// Nellymoser 8 kHz mono (5)
    Nellymoser8kMono,
    /// Nellymoser (6)
    Nellymoser,
    /// G.711 A-law (7)
    G711ALaw,
    /// G.711 mu-law (8)
    G711MuLaw,
    /// AAC (10)
    Aac,
    /// Speex (11)
    Speex,
    /// MP3 8 kHz (14)
    Mp38k,
    /// Device-specific sound (15)
    DeviceSpecific,
    /// Any other value
    Unknown(u8),
}

impl From<u8> for SoundFormat {
    fn from(value: u8) -> Self {
        match value {
            0 => SoundFormat::Pcm,
            1 => SoundFormat::Adpcm,
            2 => SoundFormat::Mp3,
            3 => SoundFormat::PcmLe,
            4 => SoundFormat::Nellymoser16kMono,
            5 => SoundFormat::Nellymoser8kMono,
            6 => SoundFormat::Nellymoser,
            7 => SoundFormat::G711ALaw,
            8 => SoundFormat::G711MuLaw,
            10 => SoundFormat::Aac,
            11 => SoundFormat::Speex,
            14 => SoundFormat::Mp38k,
            15 => SoundFormat::DeviceSpecific,
            other => SoundFormat::Unknown(other),
        }
    }
}

/// The FLV `soundRate` index table, in Hz.
pub const SOUND_RATE_HZ: [u32; 4] = [5500, 11025, 22050, 44100];

/// The unpacked first byte of an audio tag:
/// `soundFormat(4) | soundRate(2) | soundSize(1) | soundType(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTagHeader {
    /// The codec.
    pub sound_format: SoundFormat,
    /// Index into [`SOUND_RATE_HZ`].
    pub sound_rate: u8,
    /// 0 = 8-bit samples, 1 = 16-bit samples.
    pub sound_size: u8,
    /// 0 = mono, 1 = stereo.
    pub sound_type: u8,
}

impl AudioTagHeader {
    /// Reads the header byte from the cursor.
    pub fn demux(reader: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let mut byte = [0u8; 1];
        io::Read::read_exact(reader, &mut byte)?;
        let spec = byte[0];

        Ok(AudioTagHeader {
            sound_format: SoundFormat::from(spec >> 4),
            sound_rate: (spec >> 2) & 0b11,
            sound_size: (spec >> 1) & 0b1,
            sound_type: spec & 0b1,
        })
    }

    /// The sample rate in Hz announced by the tag header.
    pub fn sample_rate(&self) -> u32 {
        SOUND_RATE_HZ[self.sound_rate as usize]
    }

    /// Channel count announced by the tag header.
    pub fn channel_count(&self) -> u32 {
        self.sound_type as u32 + 1
    }
}

const MPEG1_SAMPLE_RATES: [u32; 4] = [44100, 48000, 32000, 0];
const MPEG2_SAMPLE_RATES: [u32; 4] = [22050, 24000, 16000, 0];
const MPEG25_SAMPLE_RATES: [u32; 4] = [11025, 12000, 8000, 0];

const LAYER1_BITRATES_KBPS: [u32; 16] =
    [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0];
const LAYER2_BITRATES_KBPS: [u32; 16] =
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0];
const LAYER3_BITRATES_KBPS: [u32; 16] =
    [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0];

/// Fields of an MPEG audio frame header, read off the first MP3 frame to
/// describe the track more precisely than the FLV tag byte can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mp3FrameHeader {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// 1 or 2.
    pub channel_count: u32,
    /// Nominal bitrate in kilobits per second (0 = free format).
    pub bitrate_kbps: u32,
}

impl Mp3FrameHeader {
    /// Parses the 4-byte MPEG audio frame header at the start of `data`.
    ///
    /// Returns `None` when the sync word is absent or the version/layer/
    /// index fields are reserved values.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 4 || data[0] != 0xFF || data[1] & 0xE0 != 0xE0 {
            return None;
        }

        let version = (data[1] >> 3) & 0b11;
        let layer = (data[1] >> 1) & 0b11;
        let bitrate_index = (data[2] >> 4) & 0b1111;
        let sample_rate_index = ((data[2] >> 2) & 0b11) as usize;
        let channel_mode = (data[3] >> 6) & 0b11;

        let sample_rate = match version {
            0 => MPEG25_SAMPLE_RATES[sample_rate_index],
            2 => MPEG2_SAMPLE_RATES[sample_rate_index],
            3 => MPEG1_SAMPLE_RATES[sample_rate_index],
            _ => 0,
        };
        if sample_rate == 0 {
            return None;
        }

        let bitrate_kbps = match layer {
            1 => LAYER3_BITRATES_KBPS[bitrate_index as usize],
            2 => LAYER2_BITRATES_KBPS[bitrate_index as usize],
            3 => LAYER1_BITRATES_KBPS[bitrate_index as usize],
            _ => return None,
        };

        Some(Mp3FrameHeader {
            sample_rate,
            channel_count: if channel_mode == 3 { 1 } else { 2 },
            bitrate_kbps,
        })
    }
}

/// Splits an audio tag payload into its header byte and body.
pub fn demux_audio_tag(mut payload: io::Cursor<Bytes>) -> io::Result<(AudioTagHeader, Bytes)> {
    let header = AudioTagHeader::demux(&mut payload)?;
    Ok((header, payload.extract_remaining()))
}
