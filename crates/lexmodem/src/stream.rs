//! The pull loop: scan, refill on demand, deliver borrowed tokens.
//!
//! This is the single retry policy for the whole pipeline. The only retry
//! is re-scanning after a refill, and a refill either grows the window,
//! observes end of input, or reports the window full — so every pull
//! terminates, the full-with-undecided case surfacing as the fatal
//! token-too-large configuration error rather than a busy loop.

use alloc::vec::Vec;
use core::fmt;
use thiserror::Error;

use crate::buffer::{FillBuffer, LOOKAHEAD, Refill};
use crate::grammar::Grammar;
use crate::source::ByteSource;
use crate::token::Token;
use crate::tokenizer::{Classified, Tokenizer};
use crate::trace::trace;

/// Terminal failure of a [`TokenStream`]. Every variant ends iteration;
/// none are recoverable within the stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError<K: fmt::Debug, E: fmt::Debug + fmt::Display> {
    /// The input does not match the grammar from the current position.
    /// `byte` is the first unmatched byte, or `None` when the source ended
    /// mid-token.
    #[error("lexical error: no rule accepts byte {byte:?} (partial token {kind:?})")]
    Lex {
        /// Partial token kind matched before the failure, if any.
        kind: Option<K>,
        /// The offending byte, if the failure was not a truncation.
        byte: Option<u8>,
    },
    /// A token needs more lookahead than the buffer can ever hold. This is
    /// a configuration error, distinct from bad input: retrying without
    /// enlarging the capacity would loop forever.
    #[error("token does not fit the buffer capacity of {capacity} bytes")]
    TokenTooLarge {
        /// The configured buffer capacity.
        capacity: usize,
    },
    /// The requested capacity cannot even hold the lookahead reserve.
    #[error("capacity {capacity} is smaller than the 4-byte lookahead reserve")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
    /// The source failed; propagated verbatim.
    #[error("source error: {0}")]
    Source(E),
    /// A pull after a previous terminal error.
    #[error("stream already terminated by an earlier error")]
    Poisoned,
}

/// How a batch pull ended, when it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal<K> {
    /// Clean end of input.
    End,
    /// Grammar failure after the batch's last token; same payload as
    /// [`StreamError::Lex`].
    Lex {
        /// Partial token kind matched before the failure, if any.
        kind: Option<K>,
        /// The offending byte, if the failure was not a truncation.
        byte: Option<u8>,
    },
}

/// Up to `max_tokens` tokens from one [`TokenStream::next_batch`] call.
///
/// All tokens borrow the stream's buffer and are valid until the next pull.
/// `terminal` is set when the stream finished (cleanly or not) within this
/// batch; a batch with `terminal: None` simply stopped at a refill boundary
/// or at the requested count.
#[derive(Debug)]
pub struct Batch<'buf, K> {
    /// The collected tokens, in input order.
    pub tokens: Vec<Token<'buf, K>>,
    /// Set when the stream terminated inside this batch.
    pub terminal: Option<Terminal<K>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Live,
    Ended,
    Poisoned,
}

/// Drives a [`Tokenizer`] over a [`FillBuffer`] fed from a [`ByteSource`],
/// yielding only successful tokens, a terminal error, or a clean end.
#[derive(Debug)]
pub struct TokenStream<S, G: Grammar> {
    source: S,
    tokenizer: Tokenizer<G>,
    buffer: FillBuffer,
    /// Bytes of the token delivered by the previous pull, consumed lazily at
    /// the start of the next one so the delivered borrow stays readable.
    pending_advance: usize,
    status: Status,
}

impl<S: ByteSource, G: Grammar> TokenStream<S, G> {
    /// Allocates one buffer of `capacity` bytes, primes it with an initial
    /// read, and returns a stream ready for pulls.
    ///
    /// `capacity` must be large enough for the longest token the grammar
    /// can produce plus 4 bytes of lookahead. Sufficiency is not checkable
    /// here; a too-small capacity surfaces later as
    /// [`StreamError::TokenTooLarge`].
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidCapacity`] when `capacity` cannot hold even
    /// the lookahead reserve, or [`StreamError::Source`] if the priming
    /// read fails.
    pub fn open(
        source: S,
        grammar: G,
        capacity: usize,
    ) -> Result<Self, StreamError<G::Kind, S::Error>> {
        if capacity < LOOKAHEAD {
            return Err(StreamError::InvalidCapacity { capacity });
        }
        let mut stream = Self {
            source,
            tokenizer: Tokenizer::new(grammar),
            buffer: FillBuffer::new(capacity),
            pending_advance: 0,
            status: Status::Live,
        };
        stream
            .buffer
            .refill(&mut stream.source)
            .map_err(StreamError::Source)?;
        Ok(stream)
    }

    /// The configured buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The injected grammar.
    #[must_use]
    pub fn grammar(&self) -> &G {
        self.tokenizer.grammar()
    }

    /// Pulls the next token.
    ///
    /// Returns `Ok(Some(token))` per recognized token, `Ok(None)` at clean
    /// end of input (and on every pull thereafter). The token borrows the
    /// stream's buffer and is valid until the next pull; copy it out with
    /// [`Token::to_owned`] to keep it.
    ///
    /// # Errors
    ///
    /// Any [`StreamError`]; all of them are terminal, and later pulls
    /// report [`StreamError::Poisoned`].
    pub fn next(&mut self) -> Result<Option<Token<'_, G::Kind>>, StreamError<G::Kind, S::Error>> {
        match self.status {
            Status::Ended => return Ok(None),
            Status::Poisoned => return Err(StreamError::Poisoned),
            Status::Live => {}
        }
        self.settle()?;
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match self.tokenizer.classify(&self.buffer) {
                Classified::Token { kind, len } => {
                    if self.tokenizer.grammar().is_trivia(kind) {
                        self.buffer.advance(len);
                        continue;
                    }
                    self.pending_advance = len;
                    let bytes = &self.buffer.window()[..len];
                    return Ok(Some(Token {
                        kind,
                        bytes,
                        cost: attempts,
                    }));
                }
                Classified::Undecided => self.refill_or_fail()?,
                Classified::Fail { kind, byte } => {
                    self.status = Status::Poisoned;
                    trace!("scan failed: kind {:?}, byte {:?}", kind, byte);
                    return Err(StreamError::Lex { kind, byte });
                }
                Classified::End => {
                    self.status = Status::Ended;
                    return Ok(None);
                }
            }
        }
    }

    /// Pulls up to `max_tokens` tokens in one call.
    ///
    /// Amortizes per-pull overhead while preserving the borrowing rule:
    /// every token in the batch stays valid until the next pull, which is
    /// why a batch never refills once it holds a token (a refill may move
    /// the bytes under it). A batch that stops early at such a boundary
    /// has `terminal: None`; pull again for the rest. A `max_tokens` of
    /// zero is treated as one, so every call makes progress.
    ///
    /// # Errors
    ///
    /// As for [`next`](Self::next). A grammar failure *after* collected
    /// tokens is reported in-band as [`Terminal::Lex`] so the tokens are
    /// not lost; the following pull returns [`StreamError::Poisoned`].
    pub fn next_batch(
        &mut self,
        max_tokens: usize,
    ) -> Result<Batch<'_, G::Kind>, StreamError<G::Kind, S::Error>> {
        match self.status {
            Status::Ended => {
                return Ok(Batch {
                    tokens: Vec::new(),
                    terminal: Some(Terminal::End),
                });
            }
            Status::Poisoned => return Err(StreamError::Poisoned),
            Status::Live => {}
        }
        self.settle()?;
        let max_tokens = max_tokens.max(1);
        let mut spans: Vec<(G::Kind, usize, usize, u32)> = Vec::new();
        let mut terminal = None;
        let mut attempts: u32 = 0;
        while spans.len() < max_tokens && terminal.is_none() {
            attempts += 1;
            match self.tokenizer.classify(&self.buffer) {
                Classified::Token { kind, len } => {
                    let start = self.buffer.offset();
                    self.buffer.advance(len);
                    if !self.tokenizer.grammar().is_trivia(kind) {
                        spans.push((kind, start, len, attempts));
                        attempts = 0;
                    }
                }
                Classified::Undecided => {
                    if !spans.is_empty() {
                        // Refilling may compact the buffer under the spans
                        // collected so far; end the batch at the boundary.
                        break;
                    }
                    self.refill_or_fail()?;
                }
                Classified::Fail { kind, byte } => {
                    self.status = Status::Poisoned;
                    if spans.is_empty() {
                        return Err(StreamError::Lex { kind, byte });
                    }
                    terminal = Some(Terminal::Lex { kind, byte });
                }
                Classified::End => {
                    self.status = Status::Ended;
                    terminal = Some(Terminal::End);
                }
            }
        }
        let tokens = spans
            .iter()
            .map(|&(kind, start, len, cost)| Token {
                kind,
                bytes: self.buffer.slice(start, len),
                cost,
            })
            .collect();
        Ok(Batch { tokens, terminal })
    }

    /// Applies the previous pull's deferred consumption, then refills
    /// eagerly when the window has dropped below the lookahead reserve.
    fn settle(&mut self) -> Result<(), StreamError<G::Kind, S::Error>> {
        let n = core::mem::take(&mut self.pending_advance);
        if n > 0 {
            self.buffer.advance(n);
        }
        if self.buffer.len() < LOOKAHEAD && !self.buffer.is_exhausted() {
            if let Err(e) = self.buffer.refill(&mut self.source) {
                self.status = Status::Poisoned;
                return Err(StreamError::Source(e));
            }
        }
        Ok(())
    }

    /// Refills after an `Undecided` scan. A full window here means the
    /// grammar needs more lookahead than the capacity can ever supply.
    fn refill_or_fail(&mut self) -> Result<(), StreamError<G::Kind, S::Error>> {
        match self.buffer.refill(&mut self.source) {
            Ok(Refill::Full) => {
                self.status = Status::Poisoned;
                Err(StreamError::TokenTooLarge {
                    capacity: self.buffer.capacity(),
                })
            }
            Ok(Refill::Grew(_) | Refill::Exhausted) => Ok(()),
            Err(e) => {
                self.status = Status::Poisoned;
                Err(StreamError::Source(e))
            }
        }
    }
}
