//! Shared fixtures for the integration tests: a digit-run grammar with
//! whitespace trivia, and a helper that drains a stream into owned tokens.
#![allow(missing_docs, dead_code)]

use lexmodem::{ByteSource, Grammar, OwnedToken, Scan, TokenStream};

/// Kinds for the digit-run grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DKind {
    Digits,
    Space,
}

/// Maximal runs of ASCII digits form one `Digits` token; whitespace runs
/// are trivia; anything else is rejected.
pub struct DigitRuns;

impl Grammar for DigitRuns {
    type Kind = DKind;

    fn scan(&self, window: &[u8]) -> Scan<DKind> {
        let (kind, more): (DKind, fn(u8) -> bool) = match window[0] {
            b'0'..=b'9' => (DKind::Digits, |b: u8| b.is_ascii_digit()),
            b' ' | b'\t' | b'\n' | b'\r' => {
                (DKind::Space, |b: u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            }
            _ => return Scan::Reject { kind: None, at: 0 },
        };
        match window.iter().skip(1).position(|&b| !more(b)) {
            Some(i) => Scan::Token { kind, len: i + 1 },
            None => Scan::Partial(kind),
        }
    }

    fn is_trivia(&self, kind: DKind) -> bool {
        kind == DKind::Space
    }
}

/// How a drained stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ending {
    End,
    Error(String),
}

/// Pulls a stream to completion, copying every token out.
pub fn drain<S, G>(mut stream: TokenStream<S, G>) -> (Vec<OwnedToken<G::Kind>>, Ending)
where
    S: ByteSource,
    G: Grammar,
{
    let mut tokens = Vec::new();
    loop {
        match stream.next() {
            Ok(Some(token)) => tokens.push(token.to_owned()),
            Ok(None) => return (tokens, Ending::End),
            Err(e) => return (tokens, Ending::Error(e.to_string())),
        }
    }
}

/// `drain` for streams built over an in-memory slice.
pub fn drain_slice<G: Grammar>(
    input: &[u8],
    grammar: G,
    capacity: usize,
) -> (Vec<OwnedToken<G::Kind>>, Ending) {
    let stream = TokenStream::open(lexmodem::SliceSource::new(input), grammar, capacity)
        .expect("open must accept this capacity");
    drain(stream)
}
