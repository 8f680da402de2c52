//! Exp-Golomb coded numbers, as used throughout the H.264 parameter set
//! syntax.
//!
//! The traits extend the [`BitReader`] and [`BitWriter`] from the
//! [`bytes-util`](bytes_util) crate:
//!
//! ```rust
//! use bytes_util::{BitReader, BitWriter};
//! use expgolomb::{ExpGolombReaderExt, ExpGolombWriterExt};
//!
//! let mut writer = BitWriter::new();
//! writer.write_ue(3);
//! writer.write_se(-2);
//! let data = writer.finish();
//!
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.read_ue().unwrap(), 3);
//! assert_eq!(reader.read_se().unwrap(), -2);
//! ```
//!
//! See: <https://en.wikipedia.org/wiki/Exponential-Golomb_coding>
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

use bytes_util::{BitReader, BitWriter};

/// Decoding of Exp-Golomb numbers from a [`BitReader`].
pub trait ExpGolombReaderExt {
    /// Reads an unsigned Exp-Golomb number: a run of `k` leading zero bits,
    /// a one bit, then `k` suffix bits; the value is `2^k - 1 + suffix`.
    ///
    /// Runs longer than 32 zero bits are rejected as invalid data.
    fn read_ue(&mut self) -> io::Result<u64>;

    /// Reads a signed Exp-Golomb number, mapping the unsigned code `v` to
    /// `0, 1, -1, 2, -2, …`.
    fn read_se(&mut self) -> io::Result<i64> {
        let v = self.read_ue()?;
        if v % 2 == 0 {
            Ok(-((v / 2) as i64))
        } else {
            Ok((v / 2) as i64 + 1)
        }
    }
}

impl ExpGolombReaderExt for BitReader<'_> {
    fn read_ue(&mut self) -> io::Result<u64> {
        let mut leading_zeros: u32 = 0;
        while !self.read_bit()? {
            leading_zeros += 1;
            if leading_zeros > 32 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "exp-golomb code longer than 32 bits",
                ));
            }
        }

        if leading_zeros == 0 {
            return Ok(0);
        }

        let suffix = self.read_bits(leading_zeros)? as u64;
        Ok((1u64 << leading_zeros) - 1 + suffix)
    }
}

/// Encoding of Exp-Golomb numbers into a [`BitWriter`].
pub trait ExpGolombWriterExt {
    /// Writes an unsigned Exp-Golomb number.
    fn write_ue(&mut self, value: u64);

    /// Writes a signed Exp-Golomb number.
    fn write_se(&mut self, value: i64) {
        let mapped = if value <= 0 {
            value.unsigned_abs() * 2
        } else {
            value as u64 * 2 - 1
        };
        self.write_ue(mapped);
    }
}

impl ExpGolombWriterExt for BitWriter {
    fn write_ue(&mut self, value: u64) {
        let coded = value + 1;
        let width = 64 - coded.leading_zeros();
        self.write_bits(0, width - 1);
        self.write_bits(coded, width);
    }
}
