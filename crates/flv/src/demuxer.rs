//! The incremental FLV demuxer.
//!
//! [`FlvDemuxer::parse_chunks`] accepts arbitrary byte ranges of a live FLV
//! stream and returns how many bytes it consumed. A tag that is only
//! partially present is not touched: parsing rewinds to the tag boundary
//! and the caller re-presents the unconsumed remainder prepended to the
//! next chunk. Feeding the same stream through any chunking produces the
//! same callback sequence.
//!
//! One demuxer instance handles one stream. Demuxed payloads are handed to
//! the callbacks as refcounted slices of the input chunk; stream-level
//! descriptions accumulate in [`MediaInfo`] and are pushed through
//! `on_media_info` whenever something structural is learned.

use std::io::Cursor;
use std::time::Instant;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use bytes_util::BytesCursorExt;
use tracing::{debug, warn};

use aac::AudioSpecificConfig;
use amf0::Amf0Value;
use h264::{AVCDecoderConfigurationRecord, Sps};

use crate::aac::AacPacket;
use crate::audio::{self, AudioTagHeader, Mp3FrameHeader, SoundFormat};
use crate::avc::AvcPacket;
use crate::error::FlvError;
use crate::header::{FlvHeader, FLV_HEADER_SIZE};
use crate::media_info::MediaInfo;
use crate::script::ScriptData;
use crate::stats::FrameRateEstimator;
use crate::tag::{FlvTagHeader, FlvTagType, FLV_TAG_HEADER_SIZE, PREVIOUS_TAG_SIZE_LEN};
use crate::video::{VideoCodecId, VideoFrameType, VideoTagHeader};

/// Which elementary stream a payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// The audio track.
    Audio,
    /// The video track.
    Video,
}

/// Identity and running sequence counter for one elementary stream.
///
/// Two tracks exist for the lifetime of a demuxer; ids are stable
/// (audio = 0, video = 1) and `sequence_number` counts payloads handed to
/// `on_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    /// Audio or video.
    pub kind: TrackKind,
    /// Stable track id.
    pub id: u32,
    /// Number of payloads emitted so far.
    pub sequence_number: u32,
}

/// Callback slot for demuxed payloads: `(track, data, pts, dts)`,
/// timestamps in stream milliseconds.
pub type OnData = Box<dyn FnMut(&Track, Bytes, i64, i64)>;
/// Callback slot for consolidated stream descriptions.
pub type OnMediaInfo = Box<dyn FnMut(&MediaInfo)>;
/// Callback slot for decoded script-data values.
pub type OnScriptData = Box<dyn FnMut(&Amf0Value)>;
/// Callback slot for `(pts, dts)` of every video frame tag.
pub type OnTimestamp = Box<dyn FnMut(i64, i64)>;

/// The capability record handed to the demuxer at construction. Every slot
/// is optional; unset slots are simply not invoked.
///
/// Callbacks run synchronously inside [`FlvDemuxer::parse_chunks`] and must
/// not block. Payload [`Bytes`] alias the input chunk; holding on to them
/// keeps that chunk alive.
#[derive(Default)]
pub struct DemuxerCallbacks {
    /// Demuxed audio/video payloads, in tag order per track.
    pub on_data: Option<OnData>,
    /// Consolidated stream description; invoked again when refined.
    pub on_media_info: Option<OnMediaInfo>,
    /// Decoded script-data values, once per script tag.
    pub on_script_data: Option<OnScriptData>,
    /// `(pts, dts)` of every video frame tag.
    pub on_timestamp: Option<OnTimestamp>,
}

impl std::fmt::Debug for DemuxerCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemuxerCallbacks")
            .field("on_data", &self.on_data.is_some())
            .field("on_media_info", &self.on_media_info.is_some())
            .field("on_script_data", &self.on_script_data.is_some())
            .field("on_timestamp", &self.on_timestamp.is_some())
            .finish()
    }
}

/// The incremental FLV demuxer. See the [module docs](self) for the
/// feeding protocol.
#[derive(Debug)]
pub struct FlvDemuxer {
    callbacks: DemuxerCallbacks,
    media_info: MediaInfo,

    first_parse: bool,
    audio_initial_dispatched: bool,
    media_info_dispatched: bool,
    dimensions_from_sps: bool,
    seen_keyframe: bool,

    audio_track: Track,
    video_track: Track,

    audio_bytes: u64,
    video_bytes: u64,
    begin_time_ms: Option<i64>,
    end_time_ms: i64,

    frame_rate: FrameRateEstimator,
    epoch: Instant,
}

impl FlvDemuxer {
    /// Creates a demuxer for a single stream.
    pub fn new(callbacks: DemuxerCallbacks) -> Self {
        Self {
            callbacks,
            media_info: MediaInfo::default(),
            first_parse: true,
            audio_initial_dispatched: false,
            media_info_dispatched: false,
            dimensions_from_sps: false,
            seen_keyframe: false,
            audio_track: Track {
                kind: TrackKind::Audio,
                id: 0,
                sequence_number: 0,
            },
            video_track: Track {
                kind: TrackKind::Video,
                id: 1,
                sequence_number: 0,
            },
            audio_bytes: 0,
            video_bytes: 0,
            begin_time_ms: None,
            end_time_ms: 0,
            frame_rate: FrameRateEstimator::default(),
            epoch: Instant::now(),
        }
    }

    /// The current consolidated stream description (without emission
    /// defaults applied).
    pub fn media_info(&self) -> &MediaInfo {
        &self.media_info
    }

    /// Feeds the next byte range of the stream.
    ///
    /// `byte_start` is the stream offset of `chunk`'s first byte. The first
    /// call must start at offset 0 and consumes the FLV file header plus
    /// the `previousTagSize0` field; fewer than 13 bytes consume nothing.
    ///
    /// Returns the number of bytes consumed. When it is less than
    /// `chunk.len()`, the tail holds an incomplete tag: re-present those
    /// bytes, followed by newer data, in the next call.
    ///
    /// Fails only on an invalid FLV header; per-tag problems are logged and
    /// the tag skipped.
    pub fn parse_chunks(&mut self, chunk: Bytes, byte_start: usize) -> Result<usize, FlvError> {
        let mut cursor = Cursor::new(chunk);

        if self.first_parse {
            if byte_start != 0 {
                warn!(byte_start, "first chunk does not start at stream offset 0");
            }
            if cursor.get_ref().len() < FLV_HEADER_SIZE + PREVIOUS_TAG_SIZE_LEN {
                return Ok(0);
            }

            let header = FlvHeader::parse(&mut cursor)?;
            let body_start = header.data_offset as usize;
            if cursor.get_ref().len() < body_start + PREVIOUS_TAG_SIZE_LEN {
                return Ok(0);
            }
            cursor.set_position(body_start as u64);

            self.media_info.has_audio = Some(header.has_audio);
            self.media_info.has_video = Some(header.has_video);

            let prev_tag_size0 = cursor.read_u32::<BigEndian>()?;
            if prev_tag_size0 != 0 {
                warn!(prev_tag_size0, "previousTagSize0 is not zero");
            }
            self.first_parse = false;
        }

        loop {
            let tag_start = cursor.position() as usize;
            let remaining = cursor.get_ref().len() - tag_start;
            if remaining < FLV_TAG_HEADER_SIZE + PREVIOUS_TAG_SIZE_LEN {
                break;
            }

            let tag = FlvTagHeader::demux(&mut cursor)?;
            let tag_total =
                FLV_TAG_HEADER_SIZE + tag.data_size as usize + PREVIOUS_TAG_SIZE_LEN;
            if remaining < tag_total {
                // incomplete tag: rewind so the caller re-presents it whole
                cursor.set_position(tag_start as u64);
                break;
            }

            let payload = cursor.extract_bytes(tag.data_size as usize)?;

            if tag.stream_id != 0 {
                warn!(stream_id = tag.stream_id, "skipping tag with nonzero stream id");
            } else {
                let timestamp = tag.timestamp_ms as i64;
                if self.begin_time_ms.is_none() {
                    self.begin_time_ms = Some(timestamp);
                }
                self.end_time_ms = timestamp;

                match tag.tag_type {
                    FlvTagType::Audio => {
                        self.audio_bytes += tag.data_size as u64;
                        self.handle_audio_tag(payload, timestamp);
                    }
                    FlvTagType::Video => {
                        self.video_bytes += tag.data_size as u64;
                        self.handle_video_tag(payload, timestamp);
                    }
                    FlvTagType::ScriptData => self.handle_script_tag(payload),
                    FlvTagType::Unknown(tag_type) => {
                        warn!(tag_type, "unsupported tag type, skipped");
                    }
                }
            }

            let prev_tag_size = cursor.read_u32::<BigEndian>()?;
            if prev_tag_size as usize != FLV_TAG_HEADER_SIZE + tag.data_size as usize {
                warn!(prev_tag_size, "previousTagSize does not match the tag before it");
            }
        }

        self.update_data_rates();

        Ok(cursor.position() as usize)
    }

    fn handle_audio_tag(&mut self, payload: Bytes, timestamp: i64) {
        if payload.len() < 2 {
            warn!("audio tag too short, missing sound data");
            return;
        }

        let (header, body) = match audio::demux_audio_tag(Cursor::new(payload)) {
            Ok(parts) => parts,
            Err(e) => {
                warn!(error = %e, "failed to read audio tag header");
                return;
            }
        };

        match header.sound_format {
            SoundFormat::Aac => {
                let Some(packet) = AacPacket::demux(body) else {
                    warn!("AAC tag without packet type byte");
                    return;
                };
                match packet {
                    AacPacket::SequenceHeader(config) => {
                        match AudioSpecificConfig::parse(&config) {
                            Ok(asc) => debug!(
                                object_type = asc.audio_object_type.as_u16(),
                                sampling_frequency = asc.sampling_frequency,
                                channels = asc.channel_configuration,
                                "parsed AudioSpecificConfig"
                            ),
                            Err(e) => warn!(error = %e, "undecodable AudioSpecificConfig"),
                        }
                        if self.audio_initial_dispatched {
                            debug!("duplicate AAC sequence header, ignored");
                        }
                        self.populate_aac_info(&header);
                    }
                    AacPacket::Raw(frame) => {
                        self.populate_aac_info(&header);
                        self.emit_audio(frame, timestamp);
                    }
                    AacPacket::Unknown { packet_type, .. } => {
                        warn!(packet_type, "unsupported AAC packet type, skipped");
                    }
                }
            }
            SoundFormat::Mp3 => {
                if !self.audio_initial_dispatched {
                    self.audio_initial_dispatched = true;
                    self.media_info.has_audio = Some(true);
                    self.media_info.audio_codec = Some("mp3");
                    self.media_info.audio_sample_rate = Some(header.sample_rate());
                    self.media_info.audio_channel_count = Some(header.channel_count());
                    if let Some(frame) = Mp3FrameHeader::parse(&body) {
                        self.media_info.audio_sample_rate = Some(frame.sample_rate);
                        self.media_info.audio_channel_count = Some(frame.channel_count);
                        if frame.bitrate_kbps > 0 {
                            self.media_info.audio_data_rate = Some(frame.bitrate_kbps);
                        }
                    }
                    self.dispatch_media_info();
                }
                self.emit_audio(body, timestamp);
            }
            format => {
                debug!(?format, "passing through audio payload of uninteresting codec");
                self.emit_audio(body, timestamp);
            }
        }
    }

    fn populate_aac_info(&mut self, header: &AudioTagHeader) {
        if self.audio_initial_dispatched {
            return;
        }
        self.audio_initial_dispatched = true;
        self.media_info.has_audio = Some(true);
        self.media_info.audio_codec = Some("aac");
        self.media_info.audio_sample_rate = Some(header.sample_rate());
        self.media_info.audio_channel_count = Some(header.channel_count());
        self.dispatch_media_info();
    }

    fn handle_video_tag(&mut self, payload: Bytes, timestamp: i64) {
        if payload.len() < 5 {
            warn!("video tag too short, missing AVC packet header");
            return;
        }

        let header = match VideoTagHeader::demux(payload[0]) {
            Ok(header) => header,
            Err(e) => {
                warn!(error = %e, "skipping undecodable video tag header");
                return;
            }
        };
        if header.codec_id != VideoCodecId::Avc {
            warn!(codec = ?header.codec_id, "unsupported video codec, skipped");
            return;
        }
        if header.frame_type == VideoFrameType::VideoInfoFrame {
            debug!("video info/command frame, skipped");
            return;
        }

        let mut cursor = Cursor::new(payload);
        cursor.set_position(1);
        let packet = match AvcPacket::demux(&mut cursor) {
            Ok(packet) => packet,
            Err(e) => {
                warn!(error = %e, "failed to demux AVC packet");
                return;
            }
        };

        match packet {
            AvcPacket::SequenceHeader(config) => self.handle_avc_config(config),
            AvcPacket::Nalu {
                composition_time,
                data,
            } => {
                let dts = timestamp;
                let pts = dts + composition_time as i64;

                if header.frame_type == VideoFrameType::KeyFrame && !self.seen_keyframe {
                    self.seen_keyframe = true;
                    debug!(pts, "first keyframe");
                }

                let now_ms = self.epoch.elapsed().as_secs_f64() * 1000.0;
                if let Some(update) = self.frame_rate.push(pts, now_ms) {
                    self.media_info.frame_rate = Some(update.fps);
                    self.media_info.fps = Some(update.fps);
                    if update.significant && self.media_info_dispatched {
                        self.dispatch_media_info();
                    }
                }

                if let Some(cb) = &mut self.callbacks.on_timestamp {
                    cb(pts, dts);
                }
                self.emit_video(data, pts, dts);
            }
            AvcPacket::EndOfSequence => debug!("AVC end of sequence"),
            AvcPacket::Unknown { packet_type, .. } => {
                warn!(packet_type, "unknown AVC packet type, skipped");
            }
        }
    }

    fn handle_avc_config(&mut self, config: AVCDecoderConfigurationRecord) {
        self.media_info.has_video = Some(true);
        self.media_info.video_codec = Some("avc");
        self.media_info.profile = Some(config.profile_indication);
        self.media_info.level = Some(config.level_indication);

        // owned copies: media info outlives the chunk these slices are from
        if let Some(pps) = config.pps.first() {
            self.media_info.pps = Some(Bytes::copy_from_slice(pps));
        }

        match config.sps.first() {
            None => warn!("AVC configuration record carries no SPS"),
            Some(sps_bytes) => {
                self.media_info.sps = Some(Bytes::copy_from_slice(sps_bytes));
                match Sps::parse_ebsp(sps_bytes) {
                    Err(e) => warn!(error = %e, "undecodable SPS"),
                    Ok(sps) => {
                        if sps.width > 0 && sps.height > 0 {
                            self.media_info.width = Some(sps.width);
                            self.media_info.height = Some(sps.height);
                            self.dimensions_from_sps = true;
                        }
                        self.media_info.chroma_format = Some(sps.chroma_format());
                        self.media_info.bit_depth = Some(sps.bit_depth());
                        self.media_info.pix_fmt = Some(sps.pixel_format());

                        if let Some(vui) = &sps.vui {
                            self.media_info.color_range =
                                Some(if vui.full_range { "full" } else { "limited" });
                            self.media_info.color_primaries = Some(vui.color_primaries_name());
                            self.media_info.color_transfer =
                                Some(vui.transfer_characteristics_name());
                            self.media_info.color_space = Some(vui.matrix_coefficients_name());
                            self.media_info.color_primaries_raw = Some(vui.color_primaries);
                            self.media_info.transfer_characteristics =
                                Some(vui.transfer_characteristics);
                            self.media_info.matrix_coefficients = Some(vui.matrix_coefficients);
                            if let Some(fps) = vui.fps {
                                self.media_info.frame_rate = Some(fps);
                                self.media_info.fps = Some(fps);
                            }
                        }

                        debug!(
                            width = sps.width,
                            height = sps.height,
                            profile = config.profile_indication,
                            level = config.level_indication,
                            pix_fmt = sps.pixel_format(),
                            "parsed AVC decoder configuration record"
                        );
                    }
                }
            }
        }

        self.dispatch_media_info();
    }

    fn handle_script_tag(&mut self, payload: Bytes) {
        let script = match ScriptData::demux(&mut Cursor::new(payload)) {
            Ok(script) => script,
            Err(e) => {
                warn!(error = %e, "failed to decode script tag");
                return;
            }
        };

        if script.name != "onMetaData" {
            debug!(name = %script.name, "forwarding script tag without merging");
            if let Some(cb) = &mut self.callbacks.on_script_data {
                cb(&script.value);
            }
            return;
        }
        if self.media_info.metadata.is_some() {
            warn!("found another onMetaData tag");
        }

        let value = script.value;

        let width = value.get("width").and_then(Amf0Value::as_number);
        let height = value.get("height").and_then(Amf0Value::as_number);
        if let (Some(width), Some(height)) = (width, height) {
            // the SPS is authoritative once parsed
            if !self.dimensions_from_sps && width > 0.0 && height > 0.0 {
                self.media_info.width = Some(width.round() as u32);
                self.media_info.height = Some(height.round() as u32);
            }
        }

        if let Some(framerate) = value.get("framerate").and_then(Amf0Value::as_number) {
            if framerate > 0.0 {
                self.media_info.frame_rate = Some(framerate);
                self.media_info.fps = Some(framerate);
            }
        }
        if let Some(rate) = value.get("audiodatarate").and_then(Amf0Value::as_number) {
            if rate > 0.0 {
                self.media_info.audio_data_rate = Some(rate.round() as u32);
            }
        }
        if let Some(rate) = value.get("videodatarate").and_then(Amf0Value::as_number) {
            if rate > 0.0 {
                self.media_info.video_data_rate = Some(rate.round() as u32);
            }
        }

        if let Some(cb) = &mut self.callbacks.on_script_data {
            cb(&value);
        }
        self.media_info.metadata = Some(value);
        self.dispatch_media_info();
    }

    fn dispatch_media_info(&mut self) {
        self.media_info_dispatched = true;
        if let Some(cb) = &mut self.callbacks.on_media_info {
            cb(&self.media_info.with_defaults());
        }
    }

    fn emit_audio(&mut self, data: Bytes, timestamp: i64) {
        if data.is_empty() {
            return;
        }
        self.audio_track.sequence_number += 1;
        if let Some(cb) = &mut self.callbacks.on_data {
            cb(&self.audio_track, data, timestamp, timestamp);
        }
    }

    fn emit_video(&mut self, data: Bytes, pts: i64, dts: i64) {
        if data.is_empty() {
            return;
        }
        self.video_track.sequence_number += 1;
        if let Some(cb) = &mut self.callbacks.on_data {
            cb(&self.video_track, data, pts, dts);
        }
    }

    fn update_data_rates(&mut self) {
        let Some(begin) = self.begin_time_ms else {
            return;
        };
        let duration_s = (self.end_time_ms - begin) as f64 / 1000.0;
        if duration_s <= 0.0 {
            return;
        }

        if self.audio_bytes > 0 {
            self.media_info.audio_data_rate =
                Some((self.audio_bytes as f64 * 8.0 / duration_s / 1000.0).round() as u32);
        }
        if self.video_bytes > 0 {
            self.media_info.video_data_rate =
                Some((self.video_bytes as f64 * 8.0 / duration_s / 1000.0).round() as u32);
        }
    }
}
