//! The fixed-capacity byte window between the source and the tokenizer.
//!
//! Why this exists
//! - Streaming lexing needs a bounded window that can drop consumed bytes
//!   from the front and append fresh bytes at the back without reallocating.
//!   The classic two-buffer scheme (scan in a front buffer, relocate an
//!   in-flight partial token into a back buffer before reading more) is
//!   collapsed here into one owned array plus an in-place compaction: when
//!   the window has drifted to the end of the array, the live bytes are
//!   copied back to index 0 before the next read.
//!
//! Invariants
//! - Bytes outside `[offset, offset + len)` are stale and are never exposed
//!   as token content.
//! - Once the source reports exhaustion, up to [`LOOKAHEAD`] NUL bytes past
//!   the window end are zeroed so terminator-driven grammars can resolve
//!   their final token without reading stale memory. Padding is never
//!   counted in `len`; end of input is the explicit `exhausted` flag, not a
//!   sentinel byte.
//! - `refill` never shrinks the window; it grows it or leaves it unchanged.

use alloc::boxed::Box;
use alloc::vec;
use bstr::BStr;
use core::fmt;

use crate::source::ByteSource;
use crate::trace::trace;

/// Bytes of lookahead the tokenizer may need past a token boundary.
pub(crate) const LOOKAHEAD: usize = 4;

/// What a call to [`FillBuffer::refill`] achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refill {
    /// The window grew by this many bytes.
    Grew(usize),
    /// The source is exhausted; no bytes were added.
    Exhausted,
    /// The window already fills the whole buffer. With a scan still
    /// undecided this is the token-too-large condition: no refill can ever
    /// supply the missing lookahead.
    Full,
}

/// A fixed-capacity byte window, refilled in place for the stream's
/// lifetime.
pub struct FillBuffer {
    data: Box<[u8]>,
    offset: usize,
    len: usize,
    exhausted: bool,
}

impl FillBuffer {
    /// Allocates a buffer of `capacity` bytes. The allocation is made once
    /// and never grows; capacity sufficiency is the caller's contract (see
    /// [`TokenStream::open`](crate::TokenStream::open)).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            offset: 0,
            len: 0,
            exhausted: false,
        }
    }

    /// The live bytes `[offset, offset + len)`.
    #[must_use]
    pub fn window(&self) -> &[u8] {
        &self.data[self.offset..self.offset + self.len]
    }

    /// The live bytes plus NUL padding once the source is exhausted.
    ///
    /// Before exhaustion this is exactly [`window`](Self::window); after it,
    /// up to [`LOOKAHEAD`] zeroed bytes follow the window so a scan can see
    /// a terminator after the final token.
    #[must_use]
    pub fn scan_window(&self) -> &[u8] {
        if self.exhausted {
            let end = (self.offset + self.len + LOOKAHEAD).min(self.data.len());
            &self.data[self.offset..end]
        } else {
            self.window()
        }
    }

    /// Number of live bytes in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window holds no live bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total capacity of the underlying array.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Whether the source has reported end of input.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// A range of physical bytes; used to materialize delivered tokens whose
    /// window has already been advanced past them.
    pub(crate) fn slice(&self, start: usize, len: usize) -> &[u8] {
        &self.data[start..start + len]
    }

    /// Consumes `n` bytes from the front of the window.
    ///
    /// The bytes stay physically in place until a later refill overwrites or
    /// compacts them, which is what lets a just-delivered token remain
    /// readable until the next pull.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.len, "advance past window end");
        self.offset += n;
        self.len -= n;
    }

    /// Reads more bytes from `source` into the unused tail, compacting
    /// first when the window has drifted to the end of the array.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error verbatim; the window is unchanged
    /// in that case.
    pub fn refill<S: ByteSource>(&mut self, source: &mut S) -> Result<Refill, S::Error> {
        if self.exhausted {
            return Ok(Refill::Exhausted);
        }
        if self.len == self.data.len() {
            return Ok(Refill::Full);
        }
        if self.offset + self.len == self.data.len() {
            // Window reaches the physical end: relocate it to the front so
            // the remaining capacity becomes one contiguous tail.
            trace!(
                "compact: moving {} live bytes from offset {} to 0",
                self.len, self.offset
            );
            self.data.copy_within(self.offset..self.offset + self.len, 0);
            self.offset = 0;
        }
        let tail = self.offset + self.len;
        let n = source.read(&mut self.data[tail..])?;
        if n == 0 {
            self.exhausted = true;
            self.pad_for_lookahead();
            trace!("refill: source exhausted at window len {}", self.len);
            return Ok(Refill::Exhausted);
        }
        self.len += n;
        trace!("refill: read {} bytes, window len {}", n, self.len);
        Ok(Refill::Grew(n))
    }

    /// Zeroes up to [`LOOKAHEAD`] bytes past the window end. Called exactly
    /// when exhaustion is first observed; later advances keep
    /// `offset + len` constant, so the padded region stays in place.
    fn pad_for_lookahead(&mut self) {
        let start = self.offset + self.len;
        let end = (start + LOOKAHEAD).min(self.data.len());
        if start < end {
            self.data[start..end].fill(0);
        }
    }
}

// Test-only helper: overwrite every byte the scan contract says is out of
// reach, so a scan influenced by them becomes observable.
#[cfg(test)]
impl FillBuffer {
    pub(crate) fn test_poison_beyond_scan_window(&mut self, value: u8) {
        let end = self.offset + self.len + if self.exhausted { LOOKAHEAD } else { 0 };
        let end = end.min(self.data.len());
        for b in &mut self.data[end..] {
            *b = value;
        }
        for b in &mut self.data[..self.offset] {
            *b = value;
        }
    }
}

impl fmt::Debug for FillBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillBuffer")
            .field("capacity", &self.data.len())
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("exhausted", &self.exhausted)
            .field("window", &BStr::new(self.window()))
            .finish()
    }
}
