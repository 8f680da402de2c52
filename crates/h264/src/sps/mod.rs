use std::io;

use bytes_util::BitReader;
use expgolomb::ExpGolombReaderExt;

use crate::rbsp::ebsp_to_rbsp;

mod sps_ext;
mod vui;

pub use sps_ext::SpsExtended;
pub use vui::{
    color_primaries_name, matrix_coefficients_name, transfer_characteristics_name, VuiInfo,
};

/// Profiles whose SPS carries the chroma format / bit depth block.
/// ISO/IEC-14496-10-2022 - 7.3.2.1.1
const HIGH_PROFILE_IDCS: &[u8] = &[100, 110, 122, 244, 44, 83, 86, 118, 128, 138, 139, 134, 135];

/// A parsed Sequence Parameter Set.
/// ISO/IEC-14496-10-2022 - 7.3.2.1.1
///
/// Parsing is best-effort on truncated input: everything decoded before the
/// data ran out is retained and the remaining fields keep their defaults.
/// Encoders that cut the VUI short therefore still yield profile, level and
/// dimensions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sps {
    /// The `profile_idc` byte of the coded video sequence.
    pub profile_idc: u8,

    /// The six `constraint_setN_flag` bits followed by the two reserved
    /// zero bits, exactly as they appear in the bitstream.
    pub profile_compatibility: u8,

    /// The `level_idc` byte of the coded video sequence.
    pub level_idc: u8,

    /// The chroma format / bit depth block present for the profiles in
    /// [`HIGH_PROFILE_IDCS`]. `None` for Baseline/Main/Extended, which are
    /// always 4:2:0 at 8 bits.
    pub ext: Option<SpsExtended>,

    /// Cropped luma width in pixels. 0 until the dimension fields have been
    /// parsed.
    pub width: u32,

    /// Cropped luma height in pixels. 0 until the dimension fields have been
    /// parsed.
    pub height: u32,

    /// VUI parameters, present when `vui_parameters_present_flag` is set.
    pub vui: Option<VuiInfo>,
}

impl Sps {
    /// Parses an SPS from an RBSP (emulation prevention already removed),
    /// including the leading NAL unit header byte.
    ///
    /// Input that ends mid-SPS produces a partial record rather than an
    /// error; genuinely malformed syntax (an over-long exp-Golomb run) is
    /// still rejected.
    pub fn parse(rbsp: &[u8]) -> io::Result<Self> {
        let mut sps = Sps::default();
        let mut reader = BitReader::new(rbsp);

        match sps.parse_into(&mut reader) {
            Ok(()) => Ok(sps),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(sps),
            Err(e) => Err(e),
        }
    }

    /// Parses an SPS from an EBSP, i.e. a NAL unit payload as it appears in
    /// an AVC decoder configuration record.
    pub fn parse_ebsp(data: &[u8]) -> io::Result<Self> {
        Self::parse(&ebsp_to_rbsp(data))
    }

    fn parse_into(&mut self, r: &mut BitReader<'_>) -> io::Result<()> {
        r.skip_bits(8)?; // nal unit header
        self.profile_idc = r.read_u8()?;
        self.profile_compatibility = r.read_u8()?;
        self.level_idc = r.read_u8()?;
        r.read_ue()?; // seq_parameter_set_id

        if HIGH_PROFILE_IDCS.contains(&self.profile_idc) {
            let ext = self.ext.insert(SpsExtended::default());
            ext.parse_into(r)?;
        }

        r.read_ue()?; // log2_max_frame_num_minus4
        let pic_order_cnt_type = r.read_ue()?;
        if pic_order_cnt_type == 0 {
            r.read_ue()?; // log2_max_pic_order_cnt_lsb_minus4
        } else if pic_order_cnt_type == 1 {
            r.skip_bits(1)?; // delta_pic_order_always_zero_flag
            r.read_se()?; // offset_for_non_ref_pic
            r.read_se()?; // offset_for_top_to_bottom_field
            let num_ref_frames_in_pic_order_cnt_cycle = r.read_ue()?;
            for _ in 0..num_ref_frames_in_pic_order_cnt_cycle {
                r.read_se()?; // offset_for_ref_frame
            }
        }

        r.read_ue()?; // max_num_ref_frames
        r.skip_bits(1)?; // gaps_in_frame_num_value_allowed_flag

        let pic_width_in_mbs_minus1 = r.read_ue()?;
        let pic_height_in_map_units_minus1 = r.read_ue()?;
        let frame_mbs_only_flag = r.read_bit()?;
        if !frame_mbs_only_flag {
            r.skip_bits(1)?; // mb_adaptive_frame_field_flag
        }
        r.skip_bits(1)?; // direct_8x8_inference_flag

        let mut width = (pic_width_in_mbs_minus1 + 1) * 16;
        let mut height = (2 - frame_mbs_only_flag as u64) * (pic_height_in_map_units_minus1 + 1) * 16;

        if r.read_bit()? {
            // frame_cropping_flag
            let left = r.read_ue()?;
            let right = r.read_ue()?;
            let top = r.read_ue()?;
            let bottom = r.read_ue()?;
            width = width.saturating_sub((left + right) * 2);
            height = height.saturating_sub((top + bottom) * 2);
        }

        self.width = width.min(u32::MAX as u64) as u32;
        self.height = height.min(u32::MAX as u64) as u32;

        if r.read_bit()? {
            // vui_parameters_present_flag
            let vui = self.vui.insert(VuiInfo::default());
            vui.parse_into(r)?;
        }

        Ok(())
    }

    /// The `chroma_format_idc`, defaulting to 1 (4:2:0) for profiles
    /// without the extension block.
    pub fn chroma_format_idc(&self) -> u8 {
        self.ext.as_ref().map_or(1, |ext| ext.chroma_format_idc)
    }

    /// Chroma subsampling as the conventional string.
    ///
    /// Monochrome streams report "4:2:0", and so do 4:4:4 streams with
    /// separately coded colour planes report "4:4:4".
    pub fn chroma_format(&self) -> &'static str {
        match self.chroma_format_idc() {
            2 => "4:2:2",
            3 => "4:4:4",
            _ => "4:2:0",
        }
    }

    /// Luma bit depth.
    pub fn bit_depth(&self) -> u8 {
        8 + self.ext.as_ref().map_or(0, |ext| ext.bit_depth_luma_minus8)
    }

    /// The ffmpeg-style pixel format name derived from chroma format and
    /// bit depth.
    pub fn pixel_format(&self) -> &'static str {
        match (self.chroma_format_idc(), self.bit_depth() > 8) {
            (2, false) => "yuv422p",
            (2, true) => "yuv422p10le",
            (3, false) => "yuv444p",
            (3, true) => "yuv444p10le",
            (_, false) => "yuv420p",
            (_, true) => "yuv420p10le",
        }
    }

    /// Frames per second from VUI timing info, when present.
    pub fn frame_rate(&self) -> Option<f64> {
        self.vui.as_ref().and_then(|vui| vui.fps)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use bytes_util::BitWriter;
    use expgolomb::ExpGolombWriterExt;

    use super::*;

    /// Writes everything from `seq_parameter_set_id` up to (excluding) the
    /// dimension fields, with all-zero choices.
    fn write_sps_prelude(w: &mut BitWriter, profile_idc: u8, level_idc: u8) {
        w.write_bits(0x67, 8); // nal unit header (type 7)
        w.write_bits(profile_idc as u64, 8);
        w.write_bits(0, 8); // constraint flags
        w.write_bits(level_idc as u64, 8);
        w.write_ue(0); // seq_parameter_set_id
    }

    fn write_sps_counters(w: &mut BitWriter) {
        w.write_ue(0); // log2_max_frame_num_minus4
        w.write_ue(0); // pic_order_cnt_type
        w.write_ue(0); // log2_max_pic_order_cnt_lsb_minus4
        w.write_ue(0); // max_num_ref_frames
        w.write_bit(false); // gaps_in_frame_num_value_allowed_flag
    }

    #[test]
    fn test_baseline_320x240() {
        let mut w = BitWriter::new();
        write_sps_prelude(&mut w, 66, 30);
        write_sps_counters(&mut w);
        w.write_ue(19); // pic_width_in_mbs_minus1
        w.write_ue(14); // pic_height_in_map_units_minus1
        w.write_bit(true); // frame_mbs_only_flag
        w.write_bit(false); // direct_8x8_inference_flag
        w.write_bit(false); // frame_cropping_flag
        w.write_bit(false); // vui_parameters_present_flag

        let sps = Sps::parse(&w.finish()).unwrap();

        assert_eq!(sps.profile_idc, 66);
        assert_eq!(sps.level_idc, 30);
        assert_eq!(sps.ext, None);
        assert_eq!(sps.width, 320);
        assert_eq!(sps.height, 240);
        assert_eq!(sps.chroma_format(), "4:2:0");
        assert_eq!(sps.bit_depth(), 8);
        assert_eq!(sps.pixel_format(), "yuv420p");
        assert_eq!(sps.vui, None);
        assert_eq!(sps.frame_rate(), None);
    }

    #[test]
    fn test_uncropped_1920x1088_and_cropped_1080() {
        for (crop_bottom, expected_height) in [(None, 1088), (Some(4), 1080)] {
            let mut w = BitWriter::new();
            write_sps_prelude(&mut w, 77, 40);
            write_sps_counters(&mut w);
            w.write_ue(119); // pic_width_in_mbs_minus1
            w.write_ue(67); // pic_height_in_map_units_minus1
            w.write_bit(true); // frame_mbs_only_flag
            w.write_bit(false); // direct_8x8_inference_flag
            match crop_bottom {
                None => w.write_bit(false),
                Some(bottom) => {
                    w.write_bit(true);
                    w.write_ue(0); // left
                    w.write_ue(0); // right
                    w.write_ue(0); // top
                    w.write_ue(bottom);
                }
            }
            w.write_bit(false); // vui_parameters_present_flag

            let sps = Sps::parse(&w.finish()).unwrap();
            assert_eq!(sps.width, 1920);
            assert_eq!(sps.height, expected_height);
        }
    }

    #[test]
    fn test_high10_with_colorimetry() {
        let mut w = BitWriter::new();
        write_sps_prelude(&mut w, 110, 51);
        // extension block
        w.write_ue(1); // chroma_format_idc
        w.write_ue(2); // bit_depth_luma_minus8
        w.write_ue(2); // bit_depth_chroma_minus8
        w.write_bit(false); // qpprime_y_zero_transform_bypass_flag
        w.write_bit(false); // seq_scaling_matrix_present_flag
        write_sps_counters(&mut w);
        w.write_ue(239); // 3840 wide
        w.write_ue(134); // 2160 tall
        w.write_bit(true); // frame_mbs_only_flag
        w.write_bit(false); // direct_8x8_inference_flag
        w.write_bit(false); // frame_cropping_flag

        w.write_bit(true); // vui_parameters_present_flag
        w.write_bit(false); // aspect_ratio_info_present_flag
        w.write_bit(false); // overscan_info_present_flag
        w.write_bit(true); // video_signal_type_present_flag
        w.write_bits(5, 3); // video_format: unspecified
        w.write_bit(true); // video_full_range_flag
        w.write_bit(true); // colour_description_present_flag
        w.write_bits(9, 8); // colour_primaries: bt2020
        w.write_bits(16, 8); // transfer_characteristics: smpte2084
        w.write_bits(9, 8); // matrix_coefficients: bt2020nc
        w.write_bit(false); // chroma_loc_info_present_flag
        w.write_bit(true); // timing_info_present_flag
        w.write_bits(1, 32); // num_units_in_tick
        w.write_bits(60, 32); // time_scale
        w.write_bit(true); // fixed_frame_rate_flag
        w.write_bit(false); // nal_hrd_parameters_present_flag
        w.write_bit(false); // vcl_hrd_parameters_present_flag
        w.write_bit(false); // pic_struct_present_flag
        w.write_bit(false); // bitstream_restriction_flag

        let sps = Sps::parse(&w.finish()).unwrap();

        insta::assert_debug_snapshot!(sps, @r#"
        Sps {
            profile_idc: 110,
            profile_compatibility: 0,
            level_idc: 51,
            ext: Some(
                SpsExtended {
                    chroma_format_idc: 1,
                    separate_colour_plane_flag: false,
                    bit_depth_luma_minus8: 2,
                    bit_depth_chroma_minus8: 2,
                },
            ),
            width: 3840,
            height: 2160,
            vui: Some(
                VuiInfo {
                    video_format: 5,
                    full_range: true,
                    color_primaries: 9,
                    transfer_characteristics: 16,
                    matrix_coefficients: 9,
                    fps: Some(
                        30.0,
                    ),
                },
            ),
        }
        "#);

        assert_eq!(sps.bit_depth(), 10);
        assert_eq!(sps.pixel_format(), "yuv420p10le");
        let vui = sps.vui.as_ref().unwrap();
        assert_eq!(vui.color_primaries_name(), "bt2020");
        assert_eq!(vui.transfer_characteristics_name(), "smpte2084");
        assert_eq!(vui.matrix_coefficients_name(), "bt2020nc");
    }

    #[test]
    fn test_interlaced_height_doubles() {
        let mut w = BitWriter::new();
        write_sps_prelude(&mut w, 77, 30);
        write_sps_counters(&mut w);
        w.write_ue(44); // 720 wide
        w.write_ue(17); // 18 map units
        w.write_bit(false); // frame_mbs_only_flag: fields
        w.write_bit(false); // mb_adaptive_frame_field_flag
        w.write_bit(false); // direct_8x8_inference_flag
        w.write_bit(false); // frame_cropping_flag
        w.write_bit(false); // vui_parameters_present_flag

        let sps = Sps::parse(&w.finish()).unwrap();
        assert_eq!(sps.width, 720);
        assert_eq!(sps.height, 576);
    }

    #[test]
    fn test_chroma_444_with_separate_planes() {
        let mut w = BitWriter::new();
        write_sps_prelude(&mut w, 244, 51);
        w.write_ue(3); // chroma_format_idc
        w.write_bit(true); // separate_colour_plane_flag
        w.write_ue(0);
        w.write_ue(0);
        w.write_bit(false);
        w.write_bit(false);
        write_sps_counters(&mut w);
        w.write_ue(7);
        w.write_ue(7);
        w.write_bit(true);
        w.write_bit(false);
        w.write_bit(false);
        w.write_bit(false);

        let sps = Sps::parse(&w.finish()).unwrap();
        let ext = sps.ext.as_ref().unwrap();
        assert!(ext.separate_colour_plane_flag);
        assert_eq!(sps.chroma_format(), "4:4:4");
        assert_eq!(sps.pixel_format(), "yuv444p");
    }

    #[test]
    fn test_monochrome_reports_420() {
        let mut w = BitWriter::new();
        write_sps_prelude(&mut w, 100, 31);
        w.write_ue(0); // chroma_format_idc: monochrome
        w.write_ue(0);
        w.write_ue(0);
        w.write_bit(false);
        w.write_bit(false);
        write_sps_counters(&mut w);
        w.write_ue(7);
        w.write_ue(7);
        w.write_bit(true);
        w.write_bit(false);
        w.write_bit(false);
        w.write_bit(false);

        let sps = Sps::parse(&w.finish()).unwrap();
        assert_eq!(sps.chroma_format(), "4:2:0");
        assert_eq!(sps.pixel_format(), "yuv420p");
    }

    #[test]
    fn test_scaling_matrix_is_skipped() {
        let mut w = BitWriter::new();
        write_sps_prelude(&mut w, 100, 40);
        w.write_ue(1); // chroma_format_idc
        w.write_ue(0);
        w.write_ue(0);
        w.write_bit(false); // qpprime
        w.write_bit(true); // seq_scaling_matrix_present_flag
        for i in 0..8 {
            // supply a list for every even index, defaults otherwise
            let present = i % 2 == 0;
            w.write_bit(present);
            if present {
                let size = if i < 6 { 16 } else { 64 };
                for _ in 0..size {
                    w.write_se(1); // delta_scale, keeps next_scale nonzero
                }
            }
        }
        write_sps_counters(&mut w);
        w.write_ue(39); // 640
        w.write_ue(29); // 480
        w.write_bit(true);
        w.write_bit(false);
        w.write_bit(false);
        w.write_bit(false);

        let sps = Sps::parse(&w.finish()).unwrap();
        assert_eq!(sps.width, 640);
        assert_eq!(sps.height, 480);
    }

    #[test]
    fn test_truncated_sps_is_partial() {
        let mut w = BitWriter::new();
        write_sps_prelude(&mut w, 100, 42);
        let data = w.finish();

        let sps = Sps::parse(&data).unwrap();
        assert_eq!(sps.profile_idc, 100);
        assert_eq!(sps.level_idc, 42);
        // nothing after the prelude was present
        assert_eq!(sps.width, 0);
        assert_eq!(sps.height, 0);
        assert_eq!(sps.vui, None);
    }

    #[test]
    fn test_truncated_vui_keeps_dimensions() {
        let mut w = BitWriter::new();
        write_sps_prelude(&mut w, 66, 30);
        write_sps_counters(&mut w);
        w.write_ue(19);
        w.write_ue(14);
        w.write_bit(true);
        w.write_bit(false);
        w.write_bit(false); // frame_cropping_flag
        w.write_bit(true); // vui_parameters_present_flag
        w.write_bit(false); // aspect_ratio_info_present_flag
        w.write_bit(false); // overscan_info_present_flag
        w.write_bit(true); // video_signal_type_present_flag
        w.write_bits(5, 3); // video_format
        w.write_bit(true); // video_full_range_flag
        // stream cut before colour_description_present_flag
        let mut data = w.finish();
        // drop the zero padding so the cut lands mid-field
        data.truncate(data.len() - 1);

        let sps = Sps::parse(&data).unwrap();
        assert_eq!(sps.width, 320);
        assert_eq!(sps.height, 240);
        let vui = sps.vui.expect("partial vui retained");
        assert_eq!(vui.color_primaries, 2);
        assert_eq!(vui.transfer_characteristics, 2);
        assert_eq!(vui.matrix_coefficients, 2);
    }

    #[test]
    fn test_empty_input() {
        let sps = Sps::parse(&[]).unwrap();
        assert_eq!(sps, Sps::default());
    }
}
