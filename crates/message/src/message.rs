//! Immutable HTTP message value.
//!
//! A [`Message`] holds a protocol version, a case-normalized header
//! collection and a stream-backed body. Once constructed its observable
//! header/version state never changes: every `with_*` mutator returns a new
//! `Message`. Mutation copies the header map (cheap, small) and re-shares
//! the body stream by reference; only [`with_body`](Message::with_body)
//! replaces the stream reference. Mutating the shared stream in place is the
//! caller's responsibility, the message types never do so internally.

use std::fmt;

use http::Version;

use crate::ensure;
use crate::error::MessageError;
use crate::header::{FieldValues, Headers};
use crate::stream::{Capabilities, RawResource, SharedStream, Stream};

/// Body content supplied at construction time.
///
/// Resolved exactly once into a concrete [`Stream`]: a pre-built stream is
/// adopted as-is, an external handle is wrapped via
/// [`Stream::from_resource`], text and empty bodies get a private in-memory
/// buffer.
pub enum BodyInput {
    Empty,
    Text(String),
    Resource { handle: Box<dyn RawResource>, caps: Capabilities },
    Stream(SharedStream),
}

impl BodyInput {
    pub(crate) fn into_stream(self) -> SharedStream {
        match self {
            BodyInput::Empty => Stream::new().into_shared(),
            BodyInput::Text(content) => Stream::from_string(content).into_shared(),
            BodyInput::Resource { handle, caps } => Stream::from_resource(handle, caps).into_shared(),
            BodyInput::Stream(stream) => stream,
        }
    }
}

impl fmt::Debug for BodyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyInput::Empty => f.debug_tuple("Empty").finish(),
            BodyInput::Text(content) => f.debug_tuple("Text").field(&content.len()).finish(),
            BodyInput::Resource { caps, .. } => f.debug_tuple("Resource").field(caps).finish(),
            BodyInput::Stream(_) => f.debug_tuple("Stream").finish(),
        }
    }
}

impl From<&str> for BodyInput {
    fn from(content: &str) -> Self {
        Self::Text(content.to_owned())
    }
}

impl From<String> for BodyInput {
    fn from(content: String) -> Self {
        Self::Text(content)
    }
}

impl From<Option<String>> for BodyInput {
    fn from(content: Option<String>) -> Self {
        content.map_or(Self::Empty, Self::Text)
    }
}

impl From<Stream> for BodyInput {
    fn from(stream: Stream) -> Self {
        Self::Stream(stream.into_shared())
    }
}

impl From<SharedStream> for BodyInput {
    fn from(stream: SharedStream) -> Self {
        Self::Stream(stream)
    }
}

/// An immutable HTTP message: protocol version, headers, stream-backed body.
///
/// Cloning a `Message` (directly or through a `with_*` mutator) copies the
/// header collection and shares the body stream by reference, so all clones
/// descended from the message that first adopted a stream alias one cursor.
#[derive(Debug, Clone)]
pub struct Message {
    version: Version,
    headers: Headers,
    body: SharedStream,
}

impl Message {
    /// Creates a message with no headers and the default protocol version.
    pub fn new(body: impl Into<BodyInput>) -> Self {
        Self::from_parts(body, Headers::new(), Version::default())
    }

    /// Creates a message from explicit parts.
    pub fn from_parts(body: impl Into<BodyInput>, headers: Headers, version: Version) -> Self {
        Self { version, headers, body: body.into().into_stream() }
    }

    pub fn protocol_version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// Returns the value sequence for `name`, empty slice if absent.
    pub fn header(&self, name: &str) -> &[String] {
        self.headers.get(name)
    }

    /// Returns the values for `name` joined with `,`, empty string if absent.
    pub fn header_line(&self, name: &str) -> String {
        self.headers.line(name)
    }

    /// The shared body stream handle.
    pub fn body(&self) -> &SharedStream {
        &self.body
    }

    /// Returns a new message with the given protocol version.
    pub fn with_protocol_version(&self, version: Version) -> Self {
        let mut new = self.clone();
        new.version = version;
        new
    }

    /// Returns a new message with the values for an *existing* header
    /// replaced.
    ///
    /// This operation is REPLACE-ONLY: if the canonical name is absent it
    /// fails with [`MessageError::UnknownHeader`] rather than creating the
    /// header. First creation goes through
    /// [`with_added_header`](Message::with_added_header). On success the
    /// supplied casing becomes the stored original name and the entry moves
    /// to the end of enumeration order.
    ///
    /// # Errors
    ///
    /// [`MessageError::UnknownHeader`] if no entry exists for `name`.
    pub fn with_header(&self, name: &str, values: impl Into<FieldValues>) -> Result<Self, MessageError> {
        ensure!(self.headers.contains(name), MessageError::unknown_header(name));
        let mut new = self.clone();
        new.headers.replace(name, values);
        Ok(new)
    }

    /// Returns a new message with `values` appended to the entry for `name`,
    /// creating the entry if absent.
    pub fn with_added_header(&self, name: &str, values: impl Into<FieldValues>) -> Self {
        let mut new = self.clone();
        new.headers.insert(name, values);
        new
    }

    /// Returns a new message without any entry for `name`.
    pub fn without_header(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.headers.remove(name);
        new
    }

    /// Returns a new message whose body is the given stream.
    ///
    /// This is the one mutator that replaces the stream reference instead of
    /// sharing it.
    pub fn with_body(&self, body: SharedStream) -> Self {
        let mut new = self.clone();
        new.body = body;
        new
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn default_protocol_version_is_1_1() {
        let message = Message::new("body");
        assert_eq!(message.protocol_version(), Version::HTTP_11);
    }

    #[test]
    fn header_round_trip() {
        let message = Message::new(BodyInput::Empty).with_added_header("X-Test", "v1");
        assert_eq!(message.header_line("X-Test"), "v1");

        let message = message.with_added_header("X-Test", "v2");
        assert_eq!(message.header_line("X-Test"), "v1,v2");
        assert_eq!(message.header("x-test"), ["v1", "v2"]);
    }

    #[test]
    fn with_header_is_replace_only() {
        let message = Message::new(BodyInput::Empty);
        let err = message.with_header("Nonexistent", "v").unwrap_err();
        assert!(matches!(err, MessageError::UnknownHeader { .. }));
    }

    #[test]
    fn with_header_replaces_existing_values() {
        let message = Message::new(BodyInput::Empty).with_added_header("X-Test", ["v1", "v2"]);
        let replaced = message.with_header("x-TEST", "v3").unwrap();

        assert_eq!(replaced.header_line("X-Test"), "v3");
        assert_eq!(message.header_line("X-Test"), "v1,v2");
    }

    #[test]
    fn mutators_leave_the_original_untouched() {
        let original = Message::from_parts("hello", Headers::from_iter([("X-A", "1")]), Version::HTTP_11);
        let snapshot = original.headers().clone();

        let _ = original.with_header("X-A", "2").unwrap();
        let _ = original.with_added_header("X-B", "3");
        let _ = original.without_header("X-A");
        let _ = original.with_protocol_version(Version::HTTP_10);
        let _ = original.with_body(Stream::new().into_shared());

        assert_eq!(original.headers(), &snapshot);
        assert_eq!(original.protocol_version(), Version::HTTP_11);
    }

    #[test]
    fn clones_share_the_body_stream() {
        let message = Message::new("shared");
        let clone = message.with_added_header("X-Test", "v");

        assert!(Rc::ptr_eq(message.body(), clone.body()));
    }

    #[test]
    fn with_body_replaces_the_stream_reference() {
        let message = Message::new("old");
        let replacement = Stream::from_string("new").into_shared();
        let swapped = message.with_body(Rc::clone(&replacement));

        assert!(!Rc::ptr_eq(message.body(), swapped.body()));
        assert!(Rc::ptr_eq(swapped.body(), &replacement));
        assert_eq!(message.body().borrow_mut().materialize_lossy(), "old");
        assert_eq!(swapped.body().borrow_mut().materialize_lossy(), "new");
    }

    #[test]
    fn body_inputs_normalize_to_streams() {
        let empty = Message::new(BodyInput::Empty);
        assert!(Stream::is_stream_empty(empty.body()));

        let text = Message::new("abc");
        assert_eq!(text.body().borrow_mut().size(), 3);

        let none: Option<String> = None;
        let from_none = Message::new(none);
        assert!(Stream::is_stream_empty(from_none.body()));

        let handle: Box<dyn RawResource> = Box::new(std::io::Cursor::new(b"xyz".to_vec()));
        let external = Message::new(BodyInput::Resource { handle, caps: Capabilities::read_only() });
        assert_eq!(external.body().borrow_mut().size(), 3);

        let prebuilt = Stream::from_string("pre").into_shared();
        let adopted = Message::new(Rc::clone(&prebuilt));
        assert!(Rc::ptr_eq(adopted.body(), &prebuilt));
    }
}
