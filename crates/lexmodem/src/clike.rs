//! A self-contained C-like grammar, mostly useful as a worked example of
//! the [`Grammar`] contract over a small but realistic token set.
//!
//! Keywords, typenames and plain identifiers all fall under
//! [`CKind::Identifier`]; every operator and separator — line comments
//! included — is [`CKind::Punctuation`]. Whitespace is a real token here,
//! not trivia: a consumer that wants to drop it can filter on kind.

use crate::grammar::{Grammar, Scan};

/// Token kinds of the C-like grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CKind {
    /// A run of ASCII digits.
    Number,
    /// `[A-Za-z_][A-Za-z0-9_]*`.
    Identifier,
    /// A run of space, tab, CR and LF bytes.
    Whitespace,
    /// A double-quoted literal with backslash escapes.
    String,
    /// `'x'` or `'\x'`.
    Character,
    /// Separators, one- and two-byte operators, `...`, and `//` comments.
    Punctuation,
}

/// The C-like grammar. Stateless; one value serves any number of streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct CLike;

impl Grammar for CLike {
    type Kind = CKind;

    fn scan(&self, window: &[u8]) -> Scan<CKind> {
        match window[0] {
            b'0'..=b'9' => run(window, CKind::Number, |b| b.is_ascii_digit()),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => run(window, CKind::Identifier, |b| {
                b.is_ascii_alphanumeric() || b == b'_'
            }),
            b' ' | b'\t' | b'\n' | b'\r' => run(window, CKind::Whitespace, |b| {
                matches!(b, b' ' | b'\t' | b'\n' | b'\r')
            }),
            b'"' => string(window),
            b'\'' => character(window),
            b',' | b';' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b':' => Scan::Token {
                kind: CKind::Punctuation,
                len: 1,
            },
            b'!' | b'%' | b'<' | b'>' | b'=' | b'?' | b'*' | b'/' | b'+' | b'-' | b'.' | b'^'
            | b'&' | b'|' => punctuation(window),
            _ => Scan::Reject { kind: None, at: 0 },
        }
    }
}

/// Arbitrary-length run: the boundary is the first byte failing `pred`, so
/// the length stays undecided while the window holds nothing else.
fn run(window: &[u8], kind: CKind, pred: impl Fn(u8) -> bool) -> Scan<CKind> {
    match window.iter().skip(1).position(|&b| !pred(b)) {
        Some(i) => Scan::Token { kind, len: i + 1 },
        None => Scan::Partial(kind),
    }
}

/// `string ::= D-Quote { Esc-Seq | Char } D-Quote`, rejected at a raw
/// newline so an unterminated literal fails on the line it started.
fn string(window: &[u8]) -> Scan<CKind> {
    let mut i = 1;
    while i < window.len() {
        match window[i] {
            b'"' => {
                return Scan::Token {
                    kind: CKind::String,
                    len: i + 1,
                };
            }
            b'\\' => {
                if i + 1 >= window.len() {
                    return Scan::Partial(CKind::String);
                }
                i += 2;
            }
            b'\n' | b'\r' => {
                return Scan::Reject {
                    kind: Some(CKind::String),
                    at: i,
                };
            }
            _ => i += 1,
        }
    }
    Scan::Partial(CKind::String)
}

/// `character ::= S-Quote ( Esc-Seq | Char ) S-Quote`.
fn character(window: &[u8]) -> Scan<CKind> {
    if window.len() < 2 {
        return Scan::Partial(CKind::Character);
    }
    // A non-backslash second byte means a simple literal: exactly one byte
    // between the quotes. Otherwise an escape sequence makes it four bytes.
    if window[1] != b'\\' {
        if window.len() < 3 {
            Scan::Partial(CKind::Character)
        } else if window[2] == b'\'' {
            Scan::Token {
                kind: CKind::Character,
                len: 3,
            }
        } else {
            Scan::Reject {
                kind: Some(CKind::Character),
                at: 2,
            }
        }
    } else if window.len() < 4 {
        Scan::Partial(CKind::Character)
    } else if window[3] == b'\'' {
        Scan::Token {
            kind: CKind::Character,
            len: 4,
        }
    } else {
        Scan::Reject {
            kind: Some(CKind::Character),
            at: 3,
        }
    }
}

/// Operators needing one byte of lookahead to pick between the one- and
/// two-byte forms, plus the `...` and `//` special cases.
fn punctuation(window: &[u8]) -> Scan<CKind> {
    if window.len() < 2 {
        return Scan::Partial(CKind::Punctuation);
    }
    let suc = window[1];
    let len = match window[0] {
        // In the simple cases, just an equal sign may follow.
        b'!' | b'^' | b'=' | b'*' | b'%' => {
            if suc == b'=' {
                2
            } else {
                1
            }
        }
        b'&' => {
            if suc == b'&' || suc == b'=' {
                2
            } else {
                1
            }
        }
        b'|' => {
            if suc == b'|' || suc == b'=' {
                2
            } else {
                1
            }
        }
        b'?' => {
            if suc == b':' {
                2
            } else {
                1
            }
        }
        b'+' => {
            if suc == b'+' || suc == b'=' {
                2
            } else {
                1
            }
        }
        b'-' => {
            if suc == b'-' || suc == b'>' || suc == b'=' {
                2
            } else {
                1
            }
        }
        b'<' => {
            if suc == b'<' || suc == b'=' {
                2
            } else {
                1
            }
        }
        b'>' => {
            if suc == b'>' || suc == b'=' {
                2
            } else {
                1
            }
        }
        b'.' => {
            if suc == b'.' {
                if window.len() < 3 {
                    return Scan::Partial(CKind::Punctuation);
                }
                if window[2] == b'.' { 3 } else { 1 }
            } else {
                1
            }
        }
        b'/' => {
            if suc == b'/' {
                return line_comment(window);
            }
            if suc == b'=' { 2 } else { 1 }
        }
        // The router only sends the bytes above here.
        _ => unreachable!(),
    };
    Scan::Token {
        kind: CKind::Punctuation,
        len,
    }
}

/// A `//` comment runs to the newline, which is not part of it.
fn line_comment(window: &[u8]) -> Scan<CKind> {
    match window
        .iter()
        .skip(2)
        .position(|&b| b == b'\n' || b == b'\r')
    {
        Some(i) => Scan::Token {
            kind: CKind::Punctuation,
            len: i + 2,
        },
        None => Scan::Partial(CKind::Punctuation),
    }
}
