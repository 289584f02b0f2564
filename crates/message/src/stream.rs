//! Byte stream abstraction backing message bodies.
//!
//! A [`Stream`] wraps exactly one underlying byte resource for its lifetime:
//! either a private in-memory buffer or an externally supplied handle adopted
//! through [`Stream::from_resource`]. All read/write/seek access goes through
//! one cursor, and readability/writability/seekability are derived from how
//! the resource was opened, never stored independently of it.
//!
//! Streams are shared between message clones by reference through
//! [`SharedStream`]. Sharing is single-threaded by construction (`Rc` +
//! `RefCell`); callers that move messages across threads must externally
//! synchronize any access to the body cursor.

use std::cell::RefCell;
use std::fmt;
use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom, Write};
use std::rc::Rc;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::ensure;
use crate::error::StreamError;

/// The resource provider boundary: any already-open handle exposing the
/// read/write/seek primitives can back a [`Stream`].
///
/// Which of those primitives are actually permitted is declared separately
/// via [`Capabilities`] when the handle is adopted, mirroring the open mode
/// of the resource.
pub trait RawResource: Read + Write + Seek {}

impl<T: Read + Write + Seek> RawResource for T {}

/// A stream shared by all message clones descended from the message that
/// first adopted it. The cursor is a mutable resource: clones alias it.
pub type SharedStream = Rc<RefCell<Stream>>;

/// Capability flags derived from the open mode of a resource.
///
/// Queries on [`Stream`] always reflect the current resource state: once a
/// stream is closed or detached, every flag reads false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    read: bool,
    write: bool,
    seek: bool,
}

impl Capabilities {
    pub const fn new(read: bool, write: bool, seek: bool) -> Self {
        Self { read, write, seek }
    }

    /// Full access, the mode of a private in-memory buffer.
    pub const fn read_write() -> Self {
        Self::new(true, true, true)
    }

    pub const fn read_only() -> Self {
        Self::new(true, false, true)
    }

    /// No access at all, the terminal state after close/detach.
    pub const fn none() -> Self {
        Self::new(false, false, false)
    }

    /// Same access with seeking removed, for resources with a forward-only
    /// cursor such as pipes.
    pub const fn non_seekable(self) -> Self {
        Self::new(self.read, self.write, false)
    }

    pub const fn is_readable(&self) -> bool {
        self.read
    }

    pub const fn is_writable(&self) -> bool {
        self.write
    }

    pub const fn is_seekable(&self) -> bool {
        self.seek
    }
}

enum Resource {
    Memory(Cursor<Vec<u8>>),
    External(Box<dyn RawResource>),
}

impl Resource {
    fn io(&mut self) -> &mut dyn RawResource {
        match self {
            Resource::Memory(cursor) => cursor,
            Resource::External(handle) => handle.as_mut(),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Memory(cursor) => f.debug_tuple("Memory").field(&cursor.get_ref().len()).finish(),
            Resource::External(_) => f.debug_tuple("External").finish(),
        }
    }
}

/// A seekable byte stream wrapping a single underlying resource.
///
/// Created from string content, from an adopted external handle, or empty.
/// Destroyed explicitly by the owner via [`close`](Stream::close) or
/// [`detach`](Stream::detach); there is no implicit finalization guarantee
/// beyond the resource's own `Drop`.
#[derive(Debug)]
pub struct Stream {
    resource: Option<Resource>,
    caps: Capabilities,
    eof: bool,
}

impl Default for Stream {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream {
    /// Creates a stream over an empty private in-memory buffer.
    pub fn new() -> Self {
        Self { resource: Some(Resource::Memory(Cursor::new(Vec::new()))), caps: Capabilities::read_write(), eof: false }
    }

    /// Creates a stream over a private in-memory buffer holding `content`.
    ///
    /// The cursor is left at the end of the written content, as if the
    /// caller had written it: reading requires a [`rewind`](Stream::rewind)
    /// first.
    pub fn from_string(content: impl AsRef<[u8]>) -> Self {
        let buf = content.as_ref().to_vec();
        let len = buf.len() as u64;
        let mut cursor = Cursor::new(buf);
        cursor.set_position(len);
        Self { resource: Some(Resource::Memory(cursor)), caps: Capabilities::read_write(), eof: false }
    }

    /// Adopts an already-open external handle, without copying.
    ///
    /// `caps` must mirror the mode the handle was opened with; operations
    /// the mode does not permit fail with the matching capability error
    /// before the handle is touched.
    pub fn from_resource(handle: Box<dyn RawResource>, caps: Capabilities) -> Self {
        Self { resource: Some(Resource::External(handle)), caps, eof: false }
    }

    /// Wraps this stream into the shared handle message clones alias.
    pub fn into_shared(self) -> SharedStream {
        Rc::new(RefCell::new(self))
    }

    /// Returns true iff the full content of `stream` is empty.
    pub fn is_stream_empty(stream: &SharedStream) -> bool {
        stream.borrow_mut().is_empty()
    }

    pub fn is_readable(&self) -> bool {
        self.caps.is_readable()
    }

    pub fn is_writable(&self) -> bool {
        self.caps.is_writable()
    }

    pub fn is_seekable(&self) -> bool {
        self.caps.is_seekable()
    }

    /// True once a read has hit the end of the resource. Cleared by
    /// seek/rewind/write.
    pub fn eof(&self) -> bool {
        self.eof
    }

    /// Reads up to `length` bytes from the current position.
    ///
    /// # Errors
    ///
    /// [`StreamError::NotReadable`] if the resource was not opened readable,
    /// [`StreamError::Io`] on an underlying read fault.
    pub fn read(&mut self, length: usize) -> Result<Bytes, StreamError> {
        ensure!(self.is_readable(), StreamError::NotReadable);
        let Some(resource) = self.resource.as_mut() else {
            return Err(StreamError::NotReadable);
        };

        let mut buf = vec![0u8; length];
        let mut filled = 0;
        while filled < length {
            match resource.io().read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(StreamError::io(e)),
            }
        }
        buf.truncate(filled);
        self.eof = filled < length;
        Ok(Bytes::from(buf))
    }

    /// Writes `data` at the current position, returning the byte count.
    ///
    /// # Errors
    ///
    /// [`StreamError::NotWritable`] if the resource was not opened writable,
    /// [`StreamError::Io`] on an underlying write fault.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        ensure!(self.is_writable(), StreamError::NotWritable);
        let Some(resource) = self.resource.as_mut() else {
            return Err(StreamError::NotWritable);
        };

        resource.io().write_all(data)?;
        self.eof = false;
        Ok(data.len())
    }

    /// Moves the cursor, returning the new absolute position.
    ///
    /// # Errors
    ///
    /// [`StreamError::NotSeekable`] if the resource has a forward-only
    /// cursor, [`StreamError::Io`] on an underlying seek fault.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        ensure!(self.is_seekable(), StreamError::NotSeekable);
        let Some(resource) = self.resource.as_mut() else {
            return Err(StreamError::NotSeekable);
        };

        let position = resource.io().seek(pos)?;
        self.eof = false;
        Ok(position)
    }

    /// Moves the cursor back to the start of the resource.
    pub fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Returns the current cursor offset.
    ///
    /// # Errors
    ///
    /// [`StreamError::Io`] if the position cannot be determined, including
    /// on a closed or detached stream.
    pub fn tell(&mut self) -> Result<u64, StreamError> {
        let Some(resource) = self.resource.as_mut() else {
            return Err(StreamError::detached());
        };
        Ok(resource.io().stream_position()?)
    }

    /// Reads from the current position to the end of the resource.
    ///
    /// # Errors
    ///
    /// [`StreamError::NotReadable`] / [`StreamError::Io`], as for
    /// [`read`](Stream::read).
    pub fn contents(&mut self) -> Result<Bytes, StreamError> {
        ensure!(self.is_readable(), StreamError::NotReadable);
        let Some(resource) = self.resource.as_mut() else {
            return Err(StreamError::NotReadable);
        };

        let mut buf = Vec::new();
        resource.io().read_to_end(&mut buf)?;
        self.eof = true;
        Ok(Bytes::from(buf))
    }

    /// Materializes the full content: rewinds, then reads to the end.
    ///
    /// # Errors
    ///
    /// Any capability or I/O error of the rewind and read steps.
    pub fn try_materialize(&mut self) -> Result<Bytes, StreamError> {
        ensure!(self.is_readable(), StreamError::NotReadable);
        self.rewind()?;
        self.contents()
    }

    /// Best-effort full-content materialization as a string.
    ///
    /// This is the stringification path: it never fails. Any capability or
    /// I/O error is swallowed (and logged) into an empty string, and
    /// non-UTF-8 content is replaced lossily.
    pub fn materialize_lossy(&mut self) -> String {
        match self.try_materialize() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!(cause = %e, "stream materialization failed, yielding empty string");
                String::new()
            }
        }
    }

    /// Byte length of the full content, 0 if it cannot be determined.
    ///
    /// Equivalent to the length of [`materialize_lossy`](Stream::materialize_lossy)
    /// output; the in-memory backend answers from the buffer length without
    /// moving the cursor.
    pub fn size(&mut self) -> u64 {
        if let Some(Resource::Memory(cursor)) = &self.resource {
            return cursor.get_ref().len() as u64;
        }
        self.try_materialize().map(|bytes| bytes.len() as u64).unwrap_or(0)
    }

    /// True iff [`size`](Stream::size) is zero.
    pub fn is_empty(&mut self) -> bool {
        self.size() == 0
    }

    /// Releases the underlying resource.
    ///
    /// Afterwards every capability query returns false, so read/write/seek
    /// fail with the matching capability error and [`tell`](Stream::tell)
    /// fails with an I/O error.
    pub fn close(&mut self) {
        if self.resource.take().is_some() {
            trace!("stream closed");
        }
        self.caps = Capabilities::none();
        self.eof = false;
    }

    /// Severs this stream from its resource, dropping the handle.
    ///
    /// The stream is unusable for I/O afterwards: subsequent read, write and
    /// seek calls fail (capability queries all return false), they are not
    /// silent no-ops.
    pub fn detach(&mut self) {
        if self.resource.take().is_some() {
            trace!("stream detached");
        }
        self.caps = Capabilities::none();
        self.eof = false;
    }
}
