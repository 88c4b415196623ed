//! A streaming, incremental lexer over a fixed-capacity refill buffer.
//!
//! `lexmodem` turns an on-demand byte source into a sequence of typed tokens
//! without ever holding the whole input in memory. One [`FillBuffer`] of
//! caller-chosen capacity is allocated per stream and refilled in place; when
//! a token would be split across a refill boundary, the live bytes are
//! compacted to the front of the buffer so the scan can resume with more
//! input appended at the same logical position.
//!
//! The grammar is injected: the core walks the buffer and drives the
//! refill/retry protocol, while a [`Grammar`] implementation owns the
//! byte-level classification and the token-kind set. Each scan attempt
//! resolves to one of four outcomes — a complete token, "undecided, feed me
//! more bytes", a lexical failure, or a clean end of input.
//!
//! Tokens are borrowed views into the buffer and are valid only until the
//! next pull; the borrow checker enforces this. Call
//! [`Token::to_owned`] to retain one past that point.
//!
//! ```
//! use lexmodem::{Grammar, Scan, SliceSource, TokenStream};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind {
//!     Word,
//!     Gap,
//! }
//!
//! struct Words;
//!
//! impl Grammar for Words {
//!     type Kind = Kind;
//!
//!     fn scan(&self, window: &[u8]) -> Scan<Kind> {
//!         let (kind, more): (Kind, fn(u8) -> bool) = match window[0] {
//!             b'a'..=b'z' => (Kind::Word, |b: u8| b.is_ascii_lowercase()),
//!             b' ' => (Kind::Gap, |b: u8| b == b' '),
//!             _ => return Scan::Reject { kind: None, at: 0 },
//!         };
//!         match window.iter().skip(1).position(|&b| !more(b)) {
//!             Some(i) => Scan::Token { kind, len: i + 1 },
//!             None => Scan::Partial(kind),
//!         }
//!     }
//!
//!     fn is_trivia(&self, kind: Kind) -> bool {
//!         kind == Kind::Gap
//!     }
//! }
//!
//! let mut stream = TokenStream::open(SliceSource::new(b"hello world"), Words, 16)?;
//! let first = stream.next()?.unwrap();
//! assert_eq!(first.bytes, b"hello".as_slice());
//! let second = stream.next()?.unwrap();
//! assert_eq!(second.bytes, b"world".as_slice());
//! assert!(stream.next()?.is_none());
//! # Ok::<(), lexmodem::StreamError<Kind, core::convert::Infallible>>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod clike;
mod grammar;
mod source;
mod stream;
mod token;
mod tokenizer;
mod trace;

pub use buffer::{FillBuffer, Refill};
pub use clike::{CKind, CLike};
pub use grammar::{Grammar, Scan};
#[cfg(feature = "std")]
pub use source::IoSource;
pub use source::{ByteSource, ChunkedSource, SliceSource};
pub use stream::{Batch, StreamError, Terminal, TokenStream};
pub use token::{OwnedToken, ScanOutcome, Token};
pub use tokenizer::Tokenizer;
