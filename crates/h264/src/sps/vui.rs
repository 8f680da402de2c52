use std::io;

use bytes_util::BitReader;
use expgolomb::ExpGolombReaderExt;

/// Extended_SAR: the aspect ratio is carried as explicit 16-bit dimensions.
/// ISO/IEC-14496-10-2022 - E.2.1 (Table E-1)
const EXTENDED_SAR: u32 = 255;

/// The VUI fields that describe a stream: video signal type, colorimetry
/// and the timing-derived frame rate.
/// ISO/IEC-14496-10-2022 - E.2.1
///
/// Absent colour description fields keep code 2 ("unspecified") and a
/// limited range, per the defaults in Table E-2.
#[derive(Debug, Clone, PartialEq)]
pub struct VuiInfo {
    /// The `video_format` code (component, PAL, NTSC, ...); 5 means
    /// unspecified.
    pub video_format: u8,

    /// The `video_full_range_flag`: full-swing instead of studio-swing
    /// sample values.
    pub full_range: bool,

    /// The `colour_primaries` code of Table E-3.
    pub color_primaries: u8,

    /// The `transfer_characteristics` code of Table E-4.
    pub transfer_characteristics: u8,

    /// The `matrix_coefficients` code of Table E-5.
    pub matrix_coefficients: u8,

    /// Frames per second derived from timing info:
    /// `time_scale / (2 * num_units_in_tick)`, when both are nonzero.
    pub fps: Option<f64>,
}

impl Default for VuiInfo {
    fn default() -> Self {
        Self {
            video_format: 5,
            full_range: false,
            color_primaries: 2,
            transfer_characteristics: 2,
            matrix_coefficients: 2,
            fps: None,
        }
    }
}

impl VuiInfo {
    pub(crate) fn parse_into(&mut self, r: &mut BitReader<'_>) -> io::Result<()> {
        if r.read_bit()? {
            // aspect_ratio_info_present_flag
            let aspect_ratio_idc = r.read_bits(8)?;
            if aspect_ratio_idc == EXTENDED_SAR {
                r.skip_bits(32)?; // sar_width + sar_height
            }
        }

        if r.read_bit()? {
            // overscan_info_present_flag
            r.skip_bits(1)?; // overscan_appropriate_flag
        }

        if r.read_bit()? {
            // video_signal_type_present_flag
            self.video_format = r.read_bits(3)? as u8;
            self.full_range = r.read_bit()?;
            if r.read_bit()? {
                // colour_description_present_flag
                self.color_primaries = r.read_u8()?;
                self.transfer_characteristics = r.read_u8()?;
                self.matrix_coefficients = r.read_u8()?;
            }
        }

        if r.read_bit()? {
            // chroma_loc_info_present_flag
            r.read_ue()?; // chroma_sample_loc_type_top_field
            r.read_ue()?; // chroma_sample_loc_type_bottom_field
        }

        if r.read_bit()? {
            // timing_info_present_flag
            let num_units_in_tick = r.read_bits(32)?;
            let time_scale = r.read_bits(32)?;
            r.skip_bits(1)?; // fixed_frame_rate_flag
            if num_units_in_tick > 0 && time_scale > 0 {
                self.fps = Some(time_scale as f64 / (2.0 * num_units_in_tick as f64));
            }
        }

        let nal_hrd_present = r.read_bit()?;
        if nal_hrd_present {
            skip_hrd_parameters(r)?;
        }
        let vcl_hrd_present = r.read_bit()?;
        if vcl_hrd_present {
            skip_hrd_parameters(r)?;
        }
        if nal_hrd_present || vcl_hrd_present {
            r.skip_bits(1)?; // low_delay_hrd_flag
        }

        r.skip_bits(1)?; // pic_struct_present_flag

        if r.read_bit()? {
            // bitstream_restriction_flag
            r.skip_bits(1)?; // motion_vectors_over_pic_boundaries_flag
            for _ in 0..6 {
                r.read_ue()?;
            }
        }

        Ok(())
    }

    /// The colour primaries as a string name.
    pub fn color_primaries_name(&self) -> &'static str {
        color_primaries_name(self.color_primaries)
    }

    /// The transfer characteristics as a string name.
    pub fn transfer_characteristics_name(&self) -> &'static str {
        transfer_characteristics_name(self.transfer_characteristics)
    }

    /// The matrix coefficients as a string name.
    pub fn matrix_coefficients_name(&self) -> &'static str {
        matrix_coefficients_name(self.matrix_coefficients)
    }
}

/// Walks one hrd_parameters() structure. ISO/IEC-14496-10-2022 - E.1.2
fn skip_hrd_parameters(r: &mut BitReader<'_>) -> io::Result<()> {
    let cpb_cnt_minus1 = r.read_ue()?;
    r.skip_bits(8)?; // bit_rate_scale + cpb_size_scale
    for _ in 0..=cpb_cnt_minus1 {
        r.read_ue()?; // bit_rate_value_minus1
        r.read_ue()?; // cpb_size_value_minus1
        r.skip_bits(1)?; // cbr_flag
    }
    // initial_cpb_removal_delay_length_minus1, cpb_removal_delay_length_minus1,
    // dpb_output_delay_length_minus1, time_offset_length
    r.skip_bits(20)?;
    Ok(())
}

/// Names a `colour_primaries` code. ISO/IEC-14496-10-2022 - E.2.1 (Table E-3)
pub fn color_primaries_name(code: u8) -> &'static str {
    match code {
        1 => "bt709",
        2 => "unspecified",
        4 => "bt470m",
        5 => "bt470bg",
        6 => "smpte170m",
        7 => "smpte240m",
        8 => "film",
        9 => "bt2020",
        10 => "smpte428",
        11 => "smpte431",
        12 => "smpte432",
        22 => "jedec-p22",
        _ => "unknown",
    }
}

/// Names a `transfer_characteristics` code. ISO/IEC-14496-10-2022 - E.2.1
/// (Table E-4)
pub fn transfer_characteristics_name(code: u8) -> &'static str {
    match code {
        1 => "bt709",
        2 => "unspecified",
        4 => "gamma22",
        5 => "gamma28",
        6 => "smpte170m",
        7 => "smpte240m",
        8 => "linear",
        9 => "log100",
        10 => "log316",
        11 => "iec61966-2-4",
        12 => "bt1361e",
        13 => "srgb",
        14 => "bt2020-10",
        15 => "bt2020-12",
        16 => "smpte2084",
        17 => "smpte428",
        18 => "hlg",
        _ => "unknown",
    }
}

/// Names a `matrix_coefficients` code. ISO/IEC-14496-10-2022 - E.2.1
/// (Table E-5)
pub fn matrix_coefficients_name(code: u8) -> &'static str {
    match code {
        0 => "gbrap",
        1 => "bt709",
        2 => "unspecified",
        4 => "fcc",
        5 => "bt470bg",
        6 => "smpte170m",
        7 => "smpte240m",
        8 => "ycgco",
        9 => "bt2020nc",
        10 => "bt2020c",
        12 => "smpte2085",
        13 => "chroma-derived-nc",
        14 => "chroma-derived-c",
        15 => "ictcp",
        _ => "unknown",
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use bytes_util::BitWriter;
    use expgolomb::ExpGolombWriterExt;

    use super::*;

    fn parse(data: &[u8]) -> io::Result<VuiInfo> {
        let mut vui = VuiInfo::default();
        vui.parse_into(&mut BitReader::new(data))?;
        Ok(vui)
    }

    #[test]
    fn test_all_flags_clear() {
        // every presence flag clear, zero padding behind
        let vui = parse(&[0x00, 0x00]).unwrap();
        assert_eq!(vui, VuiInfo::default());
    }

    #[test]
    fn test_extended_sar_is_skipped() {
        let mut w = BitWriter::new();
        w.write_bit(true); // aspect_ratio_info_present_flag
        w.write_bits(EXTENDED_SAR as u64, 8);
        w.write_bits(16, 16); // sar_width
        w.write_bits(9, 16); // sar_height
        w.write_bits(0, 8); // remaining flags clear

        let vui = parse(&w.finish()).unwrap();
        assert_eq!(vui, VuiInfo::default());
    }

    #[test]
    fn test_signal_type_without_description() {
        let mut w = BitWriter::new();
        w.write_bit(false); // aspect ratio
        w.write_bit(false); // overscan
        w.write_bit(true); // video_signal_type_present_flag
        w.write_bits(1, 3); // video_format: PAL
        w.write_bit(true); // full range
        w.write_bit(false); // colour_description_present_flag
        w.write_bits(0, 6); // remaining flags clear

        let vui = parse(&w.finish()).unwrap();
        assert_eq!(vui.video_format, 1);
        assert!(vui.full_range);
        assert_eq!(vui.color_primaries, 2);
        assert_eq!(vui.transfer_characteristics, 2);
        assert_eq!(vui.matrix_coefficients, 2);
        assert_eq!(vui.color_primaries_name(), "unspecified");
    }

    #[test]
    fn test_timing_info_fps() {
        let mut w = BitWriter::new();
        w.write_bits(0, 4); // aspect, overscan, signal, chroma loc clear
        w.write_bit(true); // timing_info_present_flag
        w.write_bits(1001, 32); // num_units_in_tick
        w.write_bits(60000, 32); // time_scale
        w.write_bit(true); // fixed_frame_rate_flag
        w.write_bits(0, 4); // hrd x2, pic_struct, restriction clear

        let vui = parse(&w.finish()).unwrap();
        let fps = vui.fps.unwrap();
        assert!((fps - 29.97).abs() < 0.001);
    }

    #[test]
    fn test_zero_tick_units_yield_no_fps() {
        let mut w = BitWriter::new();
        w.write_bits(0, 4);
        w.write_bit(true);
        w.write_bits(0, 32); // num_units_in_tick: zero
        w.write_bits(60000, 32);
        w.write_bit(false);
        w.write_bits(0, 4);

        let vui = parse(&w.finish()).unwrap();
        assert_eq!(vui.fps, None);
    }

    #[test]
    fn test_hrd_parameters_are_walked() {
        let mut w = BitWriter::new();
        w.write_bits(0, 5); // everything up to hrd clear
        w.write_bit(true); // nal_hrd_parameters_present_flag
        w.write_ue(1); // cpb_cnt_minus1: two entries
        w.write_bits(0, 8); // scales
        for _ in 0..2 {
            w.write_ue(1000);
            w.write_ue(1000);
            w.write_bit(false);
        }
        w.write_bits(0, 20); // length fields
        w.write_bit(false); // vcl_hrd_parameters_present_flag
        w.write_bit(false); // low_delay_hrd_flag
        w.write_bit(false); // pic_struct_present_flag
        w.write_bit(true); // bitstream_restriction_flag
        w.write_bit(true); // motion_vectors_over_pic_boundaries_flag
        for _ in 0..6 {
            w.write_ue(2);
        }

        let vui = parse(&w.finish()).unwrap();
        assert_eq!(vui, VuiInfo::default());
    }

    #[test]
    fn test_color_name_tables() {
        assert_eq!(color_primaries_name(1), "bt709");
        assert_eq!(color_primaries_name(9), "bt2020");
        assert_eq!(color_primaries_name(22), "jedec-p22");
        assert_eq!(color_primaries_name(3), "unknown");

        assert_eq!(transfer_characteristics_name(13), "srgb");
        assert_eq!(transfer_characteristics_name(16), "smpte2084");
        assert_eq!(transfer_characteristics_name(18), "hlg");
        assert_eq!(transfer_characteristics_name(3), "unknown");

        assert_eq!(matrix_coefficients_name(0), "gbrap");
        assert_eq!(matrix_coefficients_name(10), "bt2020c");
        assert_eq!(matrix_coefficients_name(15), "ictcp");
        assert_eq!(matrix_coefficients_name(11), "unknown");
    }
}
