//! One scan step: buffer window in, four-way outcome out.
//!
//! The tokenizer is stateless per call. An `Undecided` outcome consumes
//! nothing, so after a refill the next call re-runs the grammar from the
//! same window start with more bytes appended — O(window) per attempt, and
//! nothing to invalidate when the buffer compacts.

use crate::buffer::FillBuffer;
use crate::grammar::{Grammar, Scan};
use crate::token::{ScanOutcome, Token};

/// Wraps an injected [`Grammar`] and resolves its verdicts against the
/// buffer's end-of-input state.
#[derive(Debug)]
pub struct Tokenizer<G> {
    grammar: G,
}

/// [`ScanOutcome`] minus the borrowed token payload; what the stream's
/// drive loop branches on before it materializes a window slice.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Classified<K> {
    Token { kind: K, len: usize },
    Undecided,
    Fail { kind: Option<K>, byte: Option<u8> },
    End,
}

impl<G: Grammar> Tokenizer<G> {
    /// Wraps `grammar`.
    pub fn new(grammar: G) -> Self {
        Self { grammar }
    }

    /// The injected grammar.
    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Runs one scan attempt over the buffer's window.
    ///
    /// Outcome resolution:
    /// - empty window: [`ScanOutcome::End`] if the source is exhausted
    ///   (clean end, no partial token pending), otherwise
    ///   [`ScanOutcome::Undecided`];
    /// - grammar [`Scan::Partial`] with the source exhausted: a truncated
    ///   construct is an explicit [`ScanOutcome::Fail`], never a silent
    ///   end — no further bytes can arrive to resolve it;
    /// - grammar [`Scan::Reject`] at a padding byte past the live window is
    ///   likewise reported as a truncation (`byte: None`).
    ///
    /// The tokenizer never advances the buffer; consuming a successful
    /// token's bytes is the caller's job, after delivery.
    pub fn scan<'buf>(&self, buf: &'buf FillBuffer) -> ScanOutcome<'buf, G::Kind> {
        match self.classify(buf) {
            Classified::Token { kind, len } => ScanOutcome::Success(Token {
                kind,
                bytes: &buf.window()[..len],
                cost: 1,
            }),
            Classified::Undecided => ScanOutcome::Undecided,
            Classified::Fail { kind, byte } => ScanOutcome::Fail { kind, byte },
            Classified::End => ScanOutcome::End,
        }
    }

    pub(crate) fn classify(&self, buf: &FillBuffer) -> Classified<G::Kind> {
        let live = buf.len();
        if live == 0 {
            return if buf.is_exhausted() {
                Classified::End
            } else {
                Classified::Undecided
            };
        }
        match self.grammar.scan(buf.scan_window()) {
            Scan::Token { kind, len } => {
                debug_assert!(len >= 1, "grammar produced an empty token");
                debug_assert!(len <= live, "grammar claimed padding bytes as token content");
                Classified::Token {
                    kind,
                    len: len.clamp(1, live),
                }
            }
            Scan::Partial(kind) => {
                if buf.is_exhausted() {
                    Classified::Fail {
                        kind: Some(kind),
                        byte: None,
                    }
                } else {
                    Classified::Undecided
                }
            }
            Scan::Reject { kind, at } => {
                if at < live {
                    Classified::Fail {
                        kind,
                        byte: Some(buf.window()[at]),
                    }
                } else {
                    Classified::Fail { kind, byte: None }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::FillBuffer;
    use crate::source::SliceSource;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Digits,
    }

    struct Digits;

    impl Grammar for Digits {
        type Kind = Kind;

        fn scan(&self, window: &[u8]) -> Scan<Kind> {
            if !window[0].is_ascii_digit() {
                return Scan::Reject { kind: None, at: 0 };
            }
            match window.iter().skip(1).position(|b| !b.is_ascii_digit()) {
                Some(i) => Scan::Token {
                    kind: Kind::Digits,
                    len: i + 1,
                },
                None => Scan::Partial(Kind::Digits),
            }
        }
    }

    fn primed(input: &[u8], capacity: usize, drain: bool) -> FillBuffer {
        let mut buf = FillBuffer::new(capacity);
        let mut src = SliceSource::new(input);
        buf.refill(&mut src).unwrap();
        if drain {
            // Second refill observes the empty source and flips the flag.
            buf.refill(&mut src).unwrap();
        }
        buf
    }

    #[test]
    fn complete_token_in_window() {
        let buf = primed(b"123x", 16, false);
        let tok = Tokenizer::new(Digits);
        match tok.scan(&buf) {
            ScanOutcome::Success(t) => {
                assert_eq!(t.kind, Kind::Digits);
                assert_eq!(t.bytes, b"123".as_slice());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn prefix_is_undecided_while_source_is_live() {
        let buf = primed(b"123", 16, false);
        let tok = Tokenizer::new(Digits);
        assert!(matches!(tok.scan(&buf), ScanOutcome::Undecided));
    }

    #[test]
    fn prefix_resolves_via_padding_once_exhausted() {
        let buf = primed(b"123", 16, true);
        let tok = Tokenizer::new(Digits);
        match tok.scan(&buf) {
            ScanOutcome::Success(t) => assert_eq!(t.bytes, b"123".as_slice()),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn reject_reports_offending_byte() {
        let buf = primed(b"x", 16, false);
        let tok = Tokenizer::new(Digits);
        assert!(matches!(
            tok.scan(&buf),
            ScanOutcome::Fail {
                kind: None,
                byte: Some(b'x')
            }
        ));
    }

    #[test]
    fn poison_beyond_the_window_never_influences_classification() {
        let tok = Tokenizer::new(Digits);
        // Live source: the scan sees exactly the three live bytes, so the
        // digit poison past the window must not extend the run.
        let mut buf = primed(b"123", 16, false);
        buf.test_poison_beyond_scan_window(b'5');
        assert!(matches!(tok.scan(&buf), ScanOutcome::Undecided));

        // Exhausted source: only the NUL padding may be seen, not the
        // poison beyond it.
        let mut buf = primed(b"123", 16, true);
        buf.test_poison_beyond_scan_window(b'5');
        match tok.scan(&buf) {
            ScanOutcome::Success(t) => assert_eq!(t.bytes, b"123".as_slice()),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn empty_window_is_end_only_when_exhausted() {
        let tok = Tokenizer::new(Digits);
        // Never refilled: empty but the source might still deliver.
        let fresh = FillBuffer::new(16);
        assert!(matches!(tok.scan(&fresh), ScanOutcome::Undecided));
        // An empty read flips the flag on the first refill.
        let drained = primed(b"", 16, false);
        assert!(drained.is_exhausted());
        assert!(matches!(tok.scan(&drained), ScanOutcome::End));
    }
}
