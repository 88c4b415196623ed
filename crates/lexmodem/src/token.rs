//! Token values and per-scan outcomes.

use alloc::vec::Vec;
use bstr::BStr;
use core::fmt;

/// A classified byte range, borrowed from the producing stream's buffer.
///
/// The borrow is scoped to the pull that produced it: the next pull needs
/// `&mut` access to the stream, so the compiler retires every outstanding
/// token first. Use [`to_owned`](Self::to_owned) to retain one.
#[derive(Clone, Copy)]
pub struct Token<'buf, K> {
    /// Kind tag assigned by the grammar.
    pub kind: K,
    /// The token's bytes inside the buffer window.
    pub bytes: &'buf [u8],
    /// Opaque diagnostic: scan attempts (initial scan plus post-refill
    /// rescans) spent producing this token. Never affects correctness,
    /// and excluded from equality.
    pub cost: u32,
}

// Equality is over what was recognized, not how many rescans it took.
impl<K: PartialEq> PartialEq for Token<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.bytes == other.bytes
    }
}

impl<K: Eq> Eq for Token<'_, K> {}

impl<K> Token<'_, K> {
    /// Token length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the token is empty (grammars are required not to produce
    /// zero-length tokens, so this is always false for engine output).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The token bytes as a conventionally-printable byte string.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        BStr::new(self.bytes)
    }

    /// Copies the token out of the buffer so it can outlive the next pull.
    #[must_use]
    pub fn to_owned(&self) -> OwnedToken<K>
    where
        K: Copy,
    {
        OwnedToken {
            kind: self.kind,
            bytes: self.bytes.to_vec(),
            cost: self.cost,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Token<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("bytes", &self.as_bstr())
            .field("cost", &self.cost)
            .finish()
    }
}

/// An owned copy of a [`Token`], detached from the buffer.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnedToken<K> {
    /// Kind tag assigned by the grammar.
    pub kind: K,
    /// The token's bytes.
    pub bytes: Vec<u8>,
    /// Diagnostic counter carried over from the borrowed token; excluded
    /// from equality.
    pub cost: u32,
}

impl<K: PartialEq> PartialEq for OwnedToken<K> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.bytes == other.bytes
    }
}

impl<K: Eq> Eq for OwnedToken<K> {}

impl<K: fmt::Debug> fmt::Debug for OwnedToken<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedToken")
            .field("kind", &self.kind)
            .field("bytes", &BStr::new(&self.bytes))
            .field("cost", &self.cost)
            .finish()
    }
}

/// Result of one [`Tokenizer::scan`](crate::Tokenizer::scan) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome<'buf, K> {
    /// A complete token lies at the front of the window.
    Success(Token<'buf, K>),
    /// The available bytes are a strict prefix of some token; refill and
    /// rescan. No bytes were consumed.
    Undecided,
    /// No rule accepts the input from the current position.
    Fail {
        /// Partial token kind matched before the failure, if any.
        kind: Option<K>,
        /// The offending byte, or `None` when the source ended mid-token.
        byte: Option<u8>,
    },
    /// Input is exhausted with no partial token pending.
    End,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Word,
    }

    #[test]
    fn equality_ignores_cost() {
        let cheap = Token {
            kind: Kind::Word,
            bytes: b"abc".as_slice(),
            cost: 1,
        };
        let pricey = Token {
            kind: Kind::Word,
            bytes: b"abc".as_slice(),
            cost: 5,
        };
        assert_eq!(cheap, pricey);
        assert_eq!(cheap.to_owned(), pricey.to_owned());
        assert_ne!(
            cheap,
            Token {
                kind: Kind::Word,
                bytes: b"abd".as_slice(),
                cost: 1,
            }
        );
    }
}
