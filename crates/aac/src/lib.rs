//! Decoding of AAC AudioSpecificConfig headers.
//!
//! Only the leading fields are parsed: the audio object type, the sampling
//! frequency and the channel configuration. That is what an FLV AAC sequence
//! header carries that matters for describing the stream.
//!
//! ## License
//!
//! This project is licensed under the MIT or Apache-2.0 license. You can
//! choose between one of them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

use std::io;

use bytes_util::BitReader;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// The leading fields of an AudioSpecificConfig.
/// ISO/IEC 14496-3 - 1.6.2.1 (Table 1.19)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct AudioSpecificConfig {
    /// Audio object type (2 = AAC LC for nearly every live stream)
    pub audio_object_type: AudioObjectType,
    /// Sampling frequency in Hz
    pub sampling_frequency: u32,
    /// Channel configuration (1 = mono, 2 = stereo, ...)
    pub channel_configuration: u8,
}

/// Audio object type.
/// ISO/IEC 14496-3 - 1.5.1.2.6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AudioObjectType {
    /// AAC main
    AacMain,
    /// AAC LC
    AacLowComplexity,
    /// Any other object type
    Unknown(u16),
}

impl AudioObjectType {
    /// Converts the object type to its numeric code.
    pub const fn as_u16(&self) -> u16 {
        match self {
            AudioObjectType::AacMain => 1,
            AudioObjectType::AacLowComplexity => 2,
            AudioObjectType::Unknown(value) => *value,
        }
    }

    /// Converts a numeric code to an object type.
    pub const fn from_u16(value: u16) -> Self {
        match value {
            1 => AudioObjectType::AacMain,
            2 => AudioObjectType::AacLowComplexity,
            _ => AudioObjectType::Unknown(value),
        }
    }
}

impl From<u16> for AudioObjectType {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl From<AudioObjectType> for u16 {
    fn from(value: AudioObjectType) -> Self {
        value.as_u16()
    }
}

/// Sampling frequency index.
///
/// Commonly used frequencies are encoded in 4 bits; 0xF escapes to an
/// explicit 24-bit frequency.
/// ISO/IEC 14496-3 - 1.6.2.4 (Table 1.22)
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[must_use]
pub enum SampleFrequencyIndex {
    /// 96000 Hz
    Freq96000 = 0x0,
    /// 88200 Hz
    Freq88200 = 0x1,
    /// 64000 Hz
    Freq64000 = 0x2,
    /// 48000 Hz
    Freq48000 = 0x3,
    /// 44100 Hz
    Freq44100 = 0x4,
    /// 32000 Hz
    Freq32000 = 0x5,
    /// 24000 Hz
    Freq24000 = 0x6,
    /// 22050 Hz
    Freq22050 = 0x7,
    /// 16000 Hz
    Freq16000 = 0x8,
    /// 12000 Hz
    Freq12000 = 0x9,
    /// 11025 Hz
    Freq11025 = 0xA,
    /// 8000 Hz
    Freq8000 = 0xB,
    /// 7350 Hz
    Freq7350 = 0xC,
    /// Reserved
    FreqReserved = 0xD,
    /// Reserved
    FreqReserved2 = 0xE,
    /// Escape: the frequency follows as an explicit 24-bit value
    FreqEscape = 0xF,
}

impl SampleFrequencyIndex {
    /// The frequency in Hz, or `None` for reserved/escape indices.
    pub const fn to_freq(&self) -> Option<u32> {
        match self {
            SampleFrequencyIndex::Freq96000 => Some(96000),
            SampleFrequencyIndex::Freq88200 => Some(88200),
            SampleFrequencyIndex::Freq64000 => Some(64000),
            SampleFrequencyIndex::Freq48000 => Some(48000),
            SampleFrequencyIndex::Freq44100 => Some(44100),
            SampleFrequencyIndex::Freq32000 => Some(32000),
            SampleFrequencyIndex::Freq24000 => Some(24000),
            SampleFrequencyIndex::Freq22050 => Some(22050),
            SampleFrequencyIndex::Freq16000 => Some(16000),
            SampleFrequencyIndex::Freq12000 => Some(12000),
            SampleFrequencyIndex::Freq11025 => Some(11025),
            SampleFrequencyIndex::Freq8000 => Some(8000),
            SampleFrequencyIndex::Freq7350 => Some(7350),
            SampleFrequencyIndex::FreqReserved => None,
            SampleFrequencyIndex::FreqReserved2 => None,
            SampleFrequencyIndex::FreqEscape => None,
        }
    }
}

impl AudioSpecificConfig {
    /// Parses the leading fields of an AudioSpecificConfig.
    ///
    /// - audio object type (5 bits, 31 escapes to `32 + 6 bits`)
    /// - sampling frequency index (4 bits, 0xF escapes to 24 bits)
    /// - channel configuration (4 bits)
    pub fn parse(data: &[u8]) -> io::Result<Self> {
        let mut reader = BitReader::new(data);

        let mut audio_object_type = reader.read_bits(5)? as u16;
        if audio_object_type == 31 {
            audio_object_type = 32 + reader.read_bits(6)? as u16;
        }

        let index = SampleFrequencyIndex::from_u8(reader.read_bits(4)? as u8)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "invalid sampling frequency index")
            })?;

        let sampling_frequency = match index {
            SampleFrequencyIndex::FreqEscape => reader.read_bits(24)?,
            _ => index.to_freq().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "reserved sampling frequency index")
            })?,
        };

        let channel_configuration = reader.read_bits(4)? as u8;

        Ok(Self {
            audio_object_type: audio_object_type.into(),
            sampling_frequency,
            channel_configuration,
        })
    }
}
