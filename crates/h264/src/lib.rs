//! Parsing of H.264 headers: the Sequence Parameter Set (including VUI
//! colorimetry and timing) and the AVC decoder configuration record carried
//! by container formats.
//!
//! This crate only decodes headers; it does not touch slice data. The
//! parsers are lenient where real-world streams are sloppy: a truncated SPS
//! yields the fields that were present, and configuration records without
//! the profile-specific trailer are accepted.
//!
//! ## Examples
//!
//! ```rust
//! use std::io;
//!
//! use bytes::Bytes;
//! use h264::{AVCDecoderConfigurationRecord, Sps};
//!
//! # let bytes = Bytes::from(b"\x01\x42\x00\x1e\xff\xe1\x00\x08\x67\x42\x00\x1e\xf8\x28\x3e\x20\x01\x00\x00".to_vec());
//! let record = AVCDecoderConfigurationRecord::parse(&mut io::Cursor::new(bytes)).unwrap();
//! let sps = Sps::parse_ebsp(&record.sps[0]).unwrap();
//! assert_eq!((sps.width, sps.height), (320, 240));
//! ```
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

mod config;
mod rbsp;
mod sps;

pub use config::{AVCDecoderConfigurationRecord, AvccExtendedConfig};
pub use rbsp::ebsp_to_rbsp;
pub use sps::{
    color_primaries_name, matrix_coefficients_name, transfer_characteristics_name, Sps,
    SpsExtended, VuiInfo,
};
