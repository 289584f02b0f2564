use std::io;
use thiserror::Error;

use crate::status::{MAX_STATUS_CODE, MIN_STATUS_CODE};

/// Errors raised by [`Stream`](crate::stream::Stream) operations.
///
/// The capability variants are produced when an operation is attempted
/// against a stream that was opened (or detached) without the required
/// capability. `Io` wraps a fault of the underlying resource itself.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream is not readable")]
    NotReadable,

    #[error("stream is not writable")]
    NotWritable,

    #[error("stream is not seekable")]
    NotSeekable,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StreamError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Error for position queries on a stream whose resource is gone.
    pub(crate) fn detached() -> Self {
        Self::Io { source: io::Error::new(io::ErrorKind::NotConnected, "stream detached") }
    }
}

/// Errors raised by [`Message`](crate::message::Message) and
/// [`Response`](crate::response::Response) mutators.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("header {name} does not exist")]
    UnknownHeader { name: String },

    #[error("invalid status code {code}, valid range {min} - {max}")]
    InvalidStatusCode { code: u16, min: u16, max: u16 },

    #[error("stream error: {source}")]
    Stream {
        #[from]
        source: StreamError,
    },
}

impl MessageError {
    pub fn unknown_header<S: ToString>(name: S) -> Self {
        Self::UnknownHeader { name: name.to_string() }
    }

    pub fn invalid_status_code(code: u16) -> Self {
        Self::InvalidStatusCode { code, min: MIN_STATUS_CODE, max: MAX_STATUS_CODE }
    }
}
