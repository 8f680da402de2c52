//! An AMF0 decoder and encoder.
//!
//! AMF0 is the serialization format carried by FLV script-data tags
//! (`onMetaData` and friends). The decoder walks the tagged union into owned
//! [`Amf0Value`]s; [`Amf0Decoder::position`] reports how many bytes were
//! consumed so callers can account for trailing data.
//!
//! ```rust
//! use amf0::{Amf0Decoder, Amf0Value};
//!
//! let bytes = [0x01, 0x01]; // boolean true
//! let mut decoder = Amf0Decoder::new(&bytes);
//! assert_eq!(decoder.decode().unwrap(), Amf0Value::Boolean(true));
//! assert_eq!(decoder.position(), 2);
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

mod decode;
mod define;
mod encode;
mod errors;

pub use decode::Amf0Decoder;
pub use define::{Amf0Marker, Amf0Value};
pub use encode::Amf0Encoder;
pub use errors::{Amf0ReadError, Amf0WriteError};
