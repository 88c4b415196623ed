//! Byte suppliers feeding the refill buffer.
//!
//! A [`ByteSource`] is the only collaborator the stream blocks on: `read` may
//! wait for more bytes, and returning `Ok(0)` marks the source exhausted for
//! good. Everything else in the pipeline is synchronous and in-memory.

use core::convert::Infallible;
use core::fmt;

/// Supplies raw bytes on demand.
///
/// `read` fills a prefix of `dst` and returns how many bytes were written.
/// `Ok(0)` means the source is exhausted and will never yield more bytes;
/// implementations must not return `Ok(0)` transiently.
pub trait ByteSource {
    /// Error reported by a failed read; propagated verbatim as
    /// [`StreamError::Source`](crate::StreamError::Source).
    type Error: fmt::Debug + fmt::Display;

    /// Reads up to `dst.len()` bytes into `dst`. May block.
    fn read(&mut self, dst: &mut [u8]) -> Result<usize, Self::Error>;
}

/// In-memory source over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    rest: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Wraps `bytes`; reads hand out the slice front-to-back.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }
}

impl ByteSource for SliceSource<'_> {
    type Error = Infallible;

    fn read(&mut self, dst: &mut [u8]) -> Result<usize, Infallible> {
        let n = dst.len().min(self.rest.len());
        dst[..n].copy_from_slice(&self.rest[..n]);
        self.rest = &self.rest[n..];
        Ok(n)
    }
}

/// In-memory source that yields at most `chunk` bytes per read.
///
/// Exists to exercise refill boundaries: a small chunk size forces tokens to
/// straddle reads regardless of buffer capacity.
#[derive(Debug, Clone)]
pub struct ChunkedSource<'a> {
    rest: &'a [u8],
    chunk: usize,
}

impl<'a> ChunkedSource<'a> {
    /// Wraps `bytes`, capping each read at `chunk` bytes (minimum 1).
    #[must_use]
    pub fn new(bytes: &'a [u8], chunk: usize) -> Self {
        Self {
            rest: bytes,
            chunk: chunk.max(1),
        }
    }
}

impl ByteSource for ChunkedSource<'_> {
    type Error = Infallible;

    fn read(&mut self, dst: &mut [u8]) -> Result<usize, Infallible> {
        let n = self.chunk.min(dst.len()).min(self.rest.len());
        dst[..n].copy_from_slice(&self.rest[..n]);
        self.rest = &self.rest[n..];
        Ok(n)
    }
}

/// Adapter over any [`std::io::Read`], retrying interrupted reads.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoSource<R> {
    /// Wraps a reader (a file, a socket, locked stdin, ...).
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
    type Error = std::io::Error;

    fn read(&mut self, dst: &mut [u8]) -> Result<usize, std::io::Error> {
        loop {
            match self.inner.read(dst) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                other => return other,
            }
        }
    }
}
