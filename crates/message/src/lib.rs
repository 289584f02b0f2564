//! Immutable HTTP message values with stream-backed bodies
//!
//! This crate models an HTTP message as an immutable value: a protocol
//! version, a case-normalized header collection and a body backed by a
//! seekable byte stream, plus a response specialization carrying a status
//! code and an optional pre-serialized raw payload. It owns no network,
//! parsing or framing surface; it is the in-memory value representation and
//! its mutation discipline only.
//!
//! # Features
//!
//! - Copy-on-write mutation: every `with_*` call returns a new value, the
//!   original is never altered
//! - Header names stored case-preservingly, looked up case-insensitively
//!   through a canonical form
//! - One stream contract over in-memory buffers and externally supplied
//!   handles, with capability flags derived from the open mode
//! - Raw-body precedence for responses, with the falsy-vs-absent rule
//!   (`0` and `"0"` are not empty)
//! - Typed errors for every fallible operation
//!
//! # Example
//!
//! ```
//! use micro_message::{RawBody, Response};
//!
//! let response = Response::new("hello world\r\n")
//!     .with_added_header("Content-Type", "text/plain");
//!
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.reason_phrase(), "OK");
//! assert_eq!(response.header_line("content-type"), "text/plain");
//!
//! // mutators never touch the receiver
//! let replaced = response.with_header("CONTENT-TYPE", "text/html").unwrap();
//! assert_eq!(response.header_line("Content-Type"), "text/plain");
//! assert_eq!(replaced.header_line("Content-Type"), "text/html");
//!
//! let payload = replaced.response_body().unwrap();
//! assert_eq!(payload, Some(RawBody::Bytes("hello world\r\n".into())));
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`stream`]: the byte stream abstraction backing message bodies
//! - [`message`]: the immutable message value and its mutation protocol
//! - [`response`]: the response specialization (status, reason, raw body)
//! - [`header`]: canonical header names and the ordered header collection
//! - [`status`]: status code bounds and the default reason phrase table
//! - [`error`]: typed errors for stream I/O and message mutation
//!
//! # Core Components
//!
//! ## Streams
//!
//! A [`stream::Stream`] wraps exactly one resource for its lifetime: a
//! private in-memory buffer or an adopted external handle. Capability flags
//! (readable/writable/seekable) derive from how the resource was opened and
//! gate every operation. [`stream::Stream::materialize_lossy`] is the one
//! deliberately never-failing path: it converts any failure into an empty
//! string because stringification contexts expect a plain value.
//!
//! ## Messages and sharing
//!
//! Mutators copy the header collection and share the body stream by
//! reference ([`stream::SharedStream`]), so all values descended from the
//! message that first adopted a stream alias one read/write/seek cursor.
//! Only `with_body` replaces the reference. Sharing is single-threaded by
//! construction; cross-thread use requires external synchronization of the
//! body cursor.
//!
//! ## A non-obvious contract
//!
//! [`message::Message::with_header`] is REPLACE-ONLY: it fails when the
//! header does not already exist, instead of creating it. First creation
//! goes through `with_added_header`. This diverges from the common
//! create-or-replace expectation and is kept deliberately; see the method
//! docs.
//!
//! # Error Handling
//!
//! The crate uses custom error types that implement `std::error::Error`:
//!
//! - [`error::StreamError`]: capability violations and I/O faults
//! - [`error::MessageError`]: precondition violations on mutators
//!
//! No failure is retried or swallowed internally, except inside the
//! documented `materialize_lossy` backstop.

pub mod error;
pub mod header;
pub mod message;
pub mod response;
pub mod status;
pub mod stream;

mod utils;
pub(crate) use utils::ensure;

pub use error::{MessageError, StreamError};
pub use header::{FieldValues, Headers, canonicalize};
pub use message::{BodyInput, Message};
pub use response::{RawBody, Response};
pub use stream::{Capabilities, RawResource, SharedStream, Stream};
