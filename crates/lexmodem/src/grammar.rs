//! The injected classification capability.
//!
//! The core treats the automaton tables and the token-kind set as supplied
//! artifacts: a [`Grammar`] classifies the bytes at the front of the scan
//! window and the engine owns everything else (refill, retry, end-of-input,
//! delivery). This keeps the lexer engine separate from any generated
//! grammar, and lets tests inject tiny purpose-built grammars.

/// A grammar's verdict for the token starting at `window[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan<K> {
    /// A complete token of `len` bytes (`1 <= len <= window.len()`).
    Token {
        /// Kind tag for the recognized token.
        kind: K,
        /// Token length in bytes.
        len: usize,
    },
    /// The whole window is a valid prefix of a `K` token, but the boundary
    /// cannot be decided from the bytes seen so far.
    Partial(K),
    /// No rule accepts `window[at]` from the state reached there. `kind` is
    /// the partial classification at that point, if any.
    Reject {
        /// Partial token kind matched before the offending byte, if any.
        kind: Option<K>,
        /// Index of the offending byte within the window.
        at: usize,
    },
}

/// A deterministic, lookahead-bounded tokenization automaton.
///
/// `scan` is invoked with the scan window: the live buffer bytes, followed —
/// only once the source is exhausted — by up to 4 NUL padding bytes. The
/// padding lets terminator-driven rules (runs, two-byte operators) resolve
/// at true end of input exactly as they would mid-stream; a [`Scan::Token`]
/// must still never extend into it. Implementations must index only within
/// the given slice and must be pure functions of it.
pub trait Grammar {
    /// Closed set of token tags; opaque to the engine.
    type Kind: Copy + Eq + core::fmt::Debug;

    /// Classifies the token starting at `window[0]`. Never called with an
    /// empty window.
    fn scan(&self, window: &[u8]) -> Scan<Self::Kind>;

    /// Kinds the stream consumes without yielding (e.g. inter-token
    /// whitespace in grammars that do not surface it). Defaults to none.
    fn is_trivia(&self, kind: Self::Kind) -> bool {
        let _ = kind;
        false
    }
}
