use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::{Buf, Bytes};
use bytes_util::BytesCursorExt;

/// The AVC decoder configuration record carried in container formats (and
/// FLV video tags with an AVC sequence header).
/// ISO/IEC 14496-15 - 5.3.2.1.2
#[derive(Debug, Clone, PartialEq)]
pub struct AVCDecoderConfigurationRecord {
    /// Always 1 until the spec says otherwise.
    pub configuration_version: u8,

    /// The `profile_idc` byte copied from the SPS.
    pub profile_indication: u8,

    /// The constraint flags byte copied from the SPS.
    pub profile_compatibility: u8,

    /// The `level_idc` byte copied from the SPS.
    pub level_indication: u8,

    /// NAL unit length prefix size minus one (3 for the usual 4-byte
    /// prefixes).
    pub length_size_minus_one: u8,

    /// SPS NAL unit payloads, still emulation-prevention encoded.
    pub sps: Vec<Bytes>,

    /// PPS NAL unit payloads, still emulation-prevention encoded.
    pub pps: Vec<Bytes>,

    /// The chroma/bit-depth trailer present for profiles other than
    /// Baseline/Main/Extended. Encoders omit it often enough that `None`
    /// is accepted for any profile.
    pub extended_config: Option<AvccExtendedConfig>,
}

/// The profile-specific trailer of a configuration record.
/// ISO/IEC 14496-15 - 5.3.2.1.2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvccExtendedConfig {
    /// The `chroma_format_idc` (2 bits; 6 reserved).
    pub chroma_format_idc: u8,

    /// Luma bit depth minus 8 (3 bits; 5 reserved).
    pub bit_depth_luma_minus8: u8,

    /// Chroma bit depth minus 8 (3 bits; 5 reserved).
    pub bit_depth_chroma_minus8: u8,
}

impl AVCDecoderConfigurationRecord {
    /// Parses a configuration record, extracting the SPS/PPS payloads as
    /// zero-copy slices of the input.
    pub fn parse(reader: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let configuration_version = reader.read_u8()?;
        let profile_indication = reader.read_u8()?;
        let profile_compatibility = reader.read_u8()?;
        let level_indication = reader.read_u8()?;
        let length_size_minus_one = reader.read_u8()? & 0b0000_0011;

        let num_sps = reader.read_u8()? & 0b0001_1111;
        let mut sps = Vec::with_capacity(num_sps as usize);
        for _ in 0..num_sps {
            let len = reader.read_u16::<BigEndian>()?;
            sps.push(reader.extract_bytes(len as usize)?);
        }

        let num_pps = reader.read_u8()?;
        let mut pps = Vec::with_capacity(num_pps as usize);
        for _ in 0..num_pps {
            let len = reader.read_u16::<BigEndian>()?;
            pps.push(reader.extract_bytes(len as usize)?);
        }

        // The trailer is defined for every profile outside 66/77/88, but
        // plenty of encoders leave it off. Parse it only when bytes remain.
        let extended_config = match profile_indication {
            66 | 77 | 88 => None,
            _ if reader.has_remaining() => {
                let chroma_format_idc = reader.read_u8()? & 0b0000_0011;
                let bit_depth_luma_minus8 = reader.read_u8()? & 0b0000_0111;
                let bit_depth_chroma_minus8 = reader.read_u8()? & 0b0000_0111;

                // sequence parameter set extensions, rarely present and not
                // needed for stream description
                let num_sps_ext = reader.read_u8()?;
                for _ in 0..num_sps_ext {
                    let len = reader.read_u16::<BigEndian>()?;
                    reader.extract_bytes(len as usize)?;
                }

                Some(AvccExtendedConfig {
                    chroma_format_idc,
                    bit_depth_luma_minus8,
                    bit_depth_chroma_minus8,
                })
            }
            _ => None,
        };

        Ok(Self {
            configuration_version,
            profile_indication,
            profile_compatibility,
            level_indication,
            length_size_minus_one,
            sps,
            pps,
            extended_config,
        })
    }
}
