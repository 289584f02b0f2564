//! Immutable HTTP response value.
//!
//! A [`Response`] is a [`Message`] plus a validated status code, an optional
//! explicit reason phrase and an optional pre-serialized raw body. The raw
//! body, when non-empty, takes precedence over the stream body whenever the
//! rendered payload is queried.

use bytes::Bytes;
use http::Version;

use crate::ensure;
use crate::error::{MessageError, StreamError};
use crate::header::{FieldValues, Headers};
use crate::message::{BodyInput, Message};
use crate::status::default_reason_phrase;
use crate::stream::SharedStream;

pub use crate::status::{MAX_STATUS_CODE, MIN_STATUS_CODE};

/// A pre-serialized response payload, independent of the stream body.
///
/// This is a tagged value rather than a string because "absent" and "falsy"
/// are distinguished: the integer `0` and the text `"0"` are NOT empty,
/// while `Null`, `Bool(false)`, empty text and empty bytes are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawBody {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Text(String),
    Bytes(Bytes),
}

impl RawBody {
    /// True for the absent/falsy values, with the `0`/`"0"` exception.
    pub fn is_empty(&self) -> bool {
        match self {
            RawBody::Null => true,
            RawBody::Bool(b) => !b,
            RawBody::Integer(_) => false,
            RawBody::Text(s) => s.is_empty(),
            RawBody::Bytes(b) => b.is_empty(),
        }
    }
}

impl From<&str> for RawBody {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawBody {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for RawBody {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Bytes> for RawBody {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

/// An immutable HTTP response value.
///
/// All message mutators are forwarded and re-wrap into a `Response`,
/// preserving status, reason phrase and raw body. Like [`Message`], every
/// mutator returns a new instance sharing the body stream by reference.
#[derive(Debug, Clone)]
pub struct Response {
    message: Message,
    status: u16,
    reason: String,
    raw_body: RawBody,
}

impl Response {
    /// Creates a `200 OK` response with no headers.
    pub fn new(body: impl Into<BodyInput>) -> Self {
        Self { message: Message::new(body), status: 200, reason: String::new(), raw_body: RawBody::Null }
    }

    /// Creates a response from explicit parts.
    ///
    /// # Errors
    ///
    /// [`MessageError::InvalidStatusCode`] if `status` is out of range; the
    /// code is rejected, never clamped.
    pub fn from_parts(body: impl Into<BodyInput>, status: u16, headers: Headers) -> Result<Self, MessageError> {
        Self::assert_status_code(status)?;
        Ok(Self {
            message: Message::from_parts(body, headers, Version::default()),
            status,
            reason: String::new(),
            raw_body: RawBody::Null,
        })
    }

    /// True iff `code` lies in the valid `100..=599` range.
    pub fn is_status_code_valid(code: u16) -> bool {
        (MIN_STATUS_CODE..=MAX_STATUS_CODE).contains(&code)
    }

    /// # Errors
    ///
    /// [`MessageError::InvalidStatusCode`] naming the valid range.
    pub fn assert_status_code(code: u16) -> Result<(), MessageError> {
        ensure!(Self::is_status_code_valid(code), MessageError::invalid_status_code(code));
        Ok(())
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// The explicitly set reason phrase if non-empty, otherwise the default
    /// phrase for the status code, otherwise the empty string. Never fails.
    pub fn reason_phrase(&self) -> &str {
        if self.reason.is_empty() {
            default_reason_phrase(self.status).unwrap_or("")
        } else {
            &self.reason
        }
    }

    /// Returns a new response with the given status and reason phrase.
    ///
    /// The phrase is taken verbatim: passing an empty phrase clears any
    /// previously set explicit phrase, falling back to the default table.
    ///
    /// # Errors
    ///
    /// [`MessageError::InvalidStatusCode`] if `code` is out of range.
    pub fn with_status(&self, code: u16, reason_phrase: impl Into<String>) -> Result<Self, MessageError> {
        Self::assert_status_code(code)?;
        let mut new = self.clone();
        new.status = code;
        new.reason = reason_phrase.into();
        Ok(new)
    }

    pub fn raw_body(&self) -> &RawBody {
        &self.raw_body
    }

    /// See [`RawBody::is_empty`]: `0` and `"0"` are NOT empty.
    pub fn is_raw_body_empty(&self) -> bool {
        self.raw_body.is_empty()
    }

    /// Returns a new response carrying the given raw body.
    pub fn with_raw_body(&self, raw_body: impl Into<RawBody>) -> Self {
        let mut new = self.clone();
        new.raw_body = raw_body.into();
        new
    }

    /// True iff the stream body's full content is empty. Never fails.
    pub fn is_body_empty(&self) -> bool {
        self.message.body().borrow_mut().is_empty()
    }

    /// The rendered response payload.
    ///
    /// The raw body wins when non-empty; otherwise the stream body is
    /// rewound and fully materialized; otherwise `None`. A merely missing
    /// body never raises.
    ///
    /// # Errors
    ///
    /// [`StreamError`] if the stream read itself faults.
    pub fn response_body(&self) -> Result<Option<RawBody>, StreamError> {
        if !self.is_raw_body_empty() {
            return Ok(Some(self.raw_body.clone()));
        }
        if !self.is_body_empty() {
            let mut stream = self.message.body().borrow_mut();
            stream.rewind()?;
            return Ok(Some(RawBody::Bytes(stream.contents()?)));
        }
        Ok(None)
    }

    /// True for statuses that carry no message body per HTTP semantics:
    /// 1xx, 204 and 304.
    pub fn is_body_less_response(&self) -> bool {
        matches!(self.status, 100..=199 | 204 | 304)
    }

    /// The underlying message value.
    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn protocol_version(&self) -> Version {
        self.message.protocol_version()
    }

    pub fn headers(&self) -> &Headers {
        self.message.headers()
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.message.has_header(name)
    }

    pub fn header(&self, name: &str) -> &[String] {
        self.message.header(name)
    }

    pub fn header_line(&self, name: &str) -> String {
        self.message.header_line(name)
    }

    pub fn body(&self) -> &SharedStream {
        self.message.body()
    }

    pub fn with_protocol_version(&self, version: Version) -> Self {
        self.map_message(self.message.with_protocol_version(version))
    }

    /// REPLACE-ONLY, like [`Message::with_header`].
    ///
    /// # Errors
    ///
    /// [`MessageError::UnknownHeader`] if no entry exists for `name`.
    pub fn with_header(&self, name: &str, values: impl Into<FieldValues>) -> Result<Self, MessageError> {
        Ok(self.map_message(self.message.with_header(name, values)?))
    }

    pub fn with_added_header(&self, name: &str, values: impl Into<FieldValues>) -> Self {
        self.map_message(self.message.with_added_header(name, values))
    }

    pub fn without_header(&self, name: &str) -> Self {
        self.map_message(self.message.without_header(name))
    }

    pub fn with_body(&self, body: SharedStream) -> Self {
        self.map_message(self.message.with_body(body))
    }

    fn map_message(&self, message: Message) -> Self {
        Self { message, status: self.status, reason: self.reason.clone(), raw_body: self.raw_body.clone() }
    }
}

#[cfg(test)]
mod tests {
    use crate::stream::Stream;

    use super::*;

    #[test]
    fn status_validation_boundaries() {
        assert!(!Response::is_status_code_valid(99));
        assert!(Response::is_status_code_valid(100));
        assert!(Response::is_status_code_valid(599));
        assert!(!Response::is_status_code_valid(600));
    }

    #[test]
    fn out_of_range_status_is_rejected() {
        let err = Response::from_parts(BodyInput::Empty, 600, Headers::new()).unwrap_err();
        assert!(matches!(err, MessageError::InvalidStatusCode { code: 600, min: 100, max: 599 }));

        let response = Response::new(BodyInput::Empty);
        assert!(matches!(response.with_status(99, ""), Err(MessageError::InvalidStatusCode { .. })));
    }

    #[test]
    fn reason_phrase_falls_back_to_the_table() {
        let response = Response::new(BodyInput::Empty);
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.reason_phrase(), "OK");

        let not_found = response.with_status(404, "").unwrap();
        assert_eq!(not_found.reason_phrase(), "Not Found");

        let unassigned = response.with_status(598, "").unwrap();
        assert_eq!(unassigned.reason_phrase(), "");
    }

    #[test]
    fn explicit_reason_phrase_wins_until_cleared() {
        let response = Response::new(BodyInput::Empty).with_status(404, "Gone Fishing").unwrap();
        assert_eq!(response.reason_phrase(), "Gone Fishing");

        let cleared = response.with_status(404, "").unwrap();
        assert_eq!(cleared.reason_phrase(), "Not Found");
    }

    #[test]
    fn body_less_statuses() {
        let response = Response::new(BodyInput::Empty);
        for code in [100, 150, 199, 204, 304] {
            assert!(response.with_status(code, "").unwrap().is_body_less_response(), "code {code}");
        }
        for code in [200, 203, 301, 404, 500] {
            assert!(!response.with_status(code, "").unwrap().is_body_less_response(), "code {code}");
        }
    }

    #[test]
    fn raw_body_emptiness_distinguishes_falsy_from_absent() {
        assert!(RawBody::Null.is_empty());
        assert!(RawBody::Bool(false).is_empty());
        assert!(RawBody::Text(String::new()).is_empty());
        assert!(RawBody::Bytes(Bytes::new()).is_empty());

        assert!(!RawBody::Integer(0).is_empty());
        assert!(!RawBody::Text("0".to_owned()).is_empty());
        assert!(!RawBody::Bool(true).is_empty());
        assert!(!RawBody::Text("x".to_owned()).is_empty());
    }

    #[test]
    fn raw_body_zero_wins_over_stream_content() {
        let response = Response::new("stream content").with_raw_body(0i64);

        assert!(!response.is_raw_body_empty());
        assert_eq!(response.response_body().unwrap(), Some(RawBody::Integer(0)));
    }

    #[test]
    fn null_raw_body_yields_stream_content() {
        let response = Response::new("hello");

        assert!(response.is_raw_body_empty());
        assert!(!response.is_body_empty());
        assert_eq!(response.response_body().unwrap(), Some(RawBody::Bytes(Bytes::from_static(b"hello"))));
    }

    #[test]
    fn missing_body_yields_none() {
        let response = Response::new(BodyInput::Empty);
        assert!(response.is_body_empty());
        assert_eq!(response.response_body().unwrap(), None);
    }

    #[test]
    fn detached_body_is_treated_as_missing() {
        let response = Response::new("payload");
        response.body().borrow_mut().detach();

        // detached stream still reports a size of 0, so the body is treated
        // as missing rather than faulting
        assert_eq!(response.response_body().unwrap(), None);
    }

    #[test]
    fn mutators_preserve_status_and_raw_body() {
        let response = Response::new(BodyInput::Empty)
            .with_added_header("X-Test", "v")
            .with_status(201, "Made")
            .unwrap()
            .with_raw_body("payload");

        let mutated = response
            .with_header("X-Test", "w")
            .unwrap()
            .with_added_header("X-More", "m")
            .without_header("X-Gone")
            .with_protocol_version(Version::HTTP_10);

        assert_eq!(mutated.status_code(), 201);
        assert_eq!(mutated.reason_phrase(), "Made");
        assert_eq!(mutated.raw_body(), &RawBody::Text("payload".to_owned()));
        assert_eq!(mutated.header_line("x-test"), "w");
        assert_eq!(mutated.protocol_version(), Version::HTTP_10);

        // original unchanged
        assert_eq!(response.header_line("x-test"), "v");
        assert_eq!(response.protocol_version(), Version::HTTP_11);
    }

    #[test]
    fn with_body_swaps_the_stream() {
        let response = Response::new("old");
        let swapped = response.with_body(Stream::from_string("new").into_shared());

        assert_eq!(swapped.response_body().unwrap(), Some(RawBody::Bytes(Bytes::from_static(b"new"))));
        assert_eq!(response.response_body().unwrap(), Some(RawBody::Bytes(Bytes::from_static(b"old"))));
    }

    #[test]
    fn clones_share_the_stream_body() {
        let response = Response::new("shared");
        let clone = response.with_status(204, "").unwrap();

        assert!(std::rc::Rc::ptr_eq(response.body(), clone.body()));
    }
}
