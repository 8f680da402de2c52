//! # FLV demultiplexer
//!
//! An incremental parser for live FLV byte streams, built for feeding an
//! fMP4 transmuxer: it splits tags, computes PTS/DTS, decodes the AVC and
//! AAC configuration headers, and consolidates everything it learns about
//! the stream into a single [`MediaInfo`] record (dimensions, codecs,
//! H.264 colorimetry, frame rate, bitrates).
//!
//! The entry point is [`FlvDemuxer`]: construct it with a set of
//! [`DemuxerCallbacks`], then push byte ranges through
//! [`FlvDemuxer::parse_chunks`]. The return value tells how many bytes were
//! consumed; a partially received tag is simply re-presented in the next
//! call.
//!
//! ```no_run
//! use bytes::Bytes;
//! use flv::{DemuxerCallbacks, FlvDemuxer};
//!
//! let mut callbacks = DemuxerCallbacks::default();
//! callbacks.on_media_info = Some(Box::new(|info| {
//!     println!("{}x{:?}", info.width.unwrap_or(0), info.video_codec);
//! }));
//!
//! let mut demuxer = FlvDemuxer::new(callbacks);
//! # let chunk: Bytes = Bytes::new();
//! let consumed = demuxer.parse_chunks(chunk, 0).unwrap();
//! ```
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(unsafe_code)]

pub mod aac;
pub mod audio;
pub mod avc;
pub mod demuxer;
pub mod error;
pub mod header;
pub mod media_info;
pub mod script;
mod stats;
pub mod tag;
pub mod video;

pub use demuxer::{DemuxerCallbacks, FlvDemuxer, Track, TrackKind};
pub use error::FlvError;
pub use media_info::MediaInfo;
