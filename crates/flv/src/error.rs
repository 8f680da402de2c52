use thiserror::Error;

/// Errors surfaced by the demuxer.
///
/// Only unrecoverable conditions become errors: a stream that does not
/// start with an FLV header, or broken tag framing. Everything else (odd
/// tag types, undecodable script data, truncated parameter sets) is logged
/// and skipped.
#[derive(Debug, Error)]
pub enum FlvError {
    /// The stream does not begin with a valid FLV header.
    #[error("invalid FLV header: {0}")]
    InvalidHeader(&'static str),

    /// An I/O error from the underlying cursor; with in-memory buffers this
    /// only means "ran out of bytes mid-structure".
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
