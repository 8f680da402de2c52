use std::io;

use bytes_util::BitReader;
use expgolomb::ExpGolombReaderExt;

/// The chroma format / bit depth block carried by high-profile-family SPSs.
/// ISO/IEC-14496-10-2022 - 7.3.2.1.1
#[derive(Debug, Clone, PartialEq)]
pub struct SpsExtended {
    /// Chroma sampling relative to luma: 0 = monochrome, 1 = 4:2:0,
    /// 2 = 4:2:2, 3 = 4:4:4.
    pub chroma_format_idc: u8,

    /// When `chroma_format_idc` is 3, whether the three colour planes are
    /// coded separately.
    pub separate_colour_plane_flag: bool,

    /// Luma bit depth minus 8.
    pub bit_depth_luma_minus8: u8,

    /// Chroma bit depth minus 8.
    pub bit_depth_chroma_minus8: u8,
}

impl Default for SpsExtended {
    fn default() -> Self {
        // 4:2:0 at 8 bits, the values inferred for profiles without this
        // block. ISO/IEC-14496-10-2022 - 7.4.2.1.1
        Self {
            chroma_format_idc: 1,
            separate_colour_plane_flag: false,
            bit_depth_luma_minus8: 0,
            bit_depth_chroma_minus8: 0,
        }
    }
}

impl SpsExtended {
    pub(crate) fn parse_into(&mut self, r: &mut BitReader<'_>) -> io::Result<()> {
        self.chroma_format_idc = r.read_ue()? as u8;
        if self.chroma_format_idc == 3 {
            self.separate_colour_plane_flag = r.read_bit()?;
        }

        self.bit_depth_luma_minus8 = r.read_ue()? as u8;
        self.bit_depth_chroma_minus8 = r.read_ue()? as u8;
        r.skip_bits(1)?; // qpprime_y_zero_transform_bypass_flag

        if r.read_bit()? {
            // seq_scaling_matrix_present_flag: the lists are not needed for
            // stream description, only walked over.
            let count = if self.chroma_format_idc == 3 { 12 } else { 8 };
            for i in 0..count {
                if r.read_bit()? {
                    skip_scaling_list(r, if i < 6 { 16 } else { 64 })?;
                }
            }
        }

        Ok(())
    }
}

/// Walks one scaling list. ISO/IEC-14496-10-2022 - 7.3.2.1.1.1
fn skip_scaling_list(r: &mut BitReader<'_>, size: u32) -> io::Result<()> {
    let mut last_scale: i64 = 8;
    let mut next_scale: i64 = 8;

    for _ in 0..size {
        if next_scale != 0 {
            let delta_scale = r.read_se()?;
            next_scale = (last_scale + delta_scale + 256).rem_euclid(256);
        }
        if next_scale != 0 {
            last_scale = next_scale;
        }
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use bytes_util::BitWriter;
    use expgolomb::ExpGolombWriterExt;

    use super::*;

    fn parse(data: &[u8]) -> io::Result<SpsExtended> {
        let mut ext = SpsExtended::default();
        ext.parse_into(&mut BitReader::new(data))?;
        Ok(ext)
    }

    #[test]
    fn test_plain_420() {
        let mut w = BitWriter::new();
        w.write_ue(1);
        w.write_ue(0);
        w.write_ue(0);
        w.write_bit(false);
        w.write_bit(false);

        let ext = parse(&w.finish()).unwrap();
        assert_eq!(ext, SpsExtended::default());
    }

    #[test]
    fn test_high_bit_depth_422() {
        let mut w = BitWriter::new();
        w.write_ue(2);
        w.write_ue(2);
        w.write_ue(2);
        w.write_bit(false);
        w.write_bit(false);

        let ext = parse(&w.finish()).unwrap();
        assert_eq!(ext.chroma_format_idc, 2);
        assert_eq!(ext.bit_depth_luma_minus8, 2);
        assert_eq!(ext.bit_depth_chroma_minus8, 2);
    }

    #[test]
    fn test_scaling_list_early_termination() {
        // a delta that drives next_scale to zero stops the delta reads for
        // the rest of the list
        let mut w = BitWriter::new();
        w.write_ue(1);
        w.write_ue(0);
        w.write_ue(0);
        w.write_bit(false);
        w.write_bit(true); // seq_scaling_matrix_present_flag
        w.write_bit(true); // list 0 present
        w.write_se(-8); // next_scale = 0, list falls back to defaults
        for _ in 1..8 {
            w.write_bit(false);
        }

        let ext = parse(&w.finish()).unwrap();
        assert_eq!(ext.chroma_format_idc, 1);
    }

    #[test]
    fn test_truncated_block() {
        let mut w = BitWriter::new();
        w.write_ue(3);
        let err = parse(&w.finish());
        // chroma 3 wants the separate-colour-plane bit and more; with only
        // padding left this reads zeros until the data runs out
        assert!(err.is_err());
    }
}
