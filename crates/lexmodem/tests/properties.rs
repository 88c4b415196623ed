//! Randomized properties of the pull protocol.
#![allow(missing_docs)]

mod common;

use common::{DKind, DigitRuns, Ending, drain_slice};
use lexmodem::{CLike, ChunkedSource, TokenStream};
use quickcheck_macros::quickcheck;

/// Maps an arbitrary seed onto the C-like grammar's alphabet so random
/// inputs are mostly lexable and occasionally fail mid-construct.
fn materialize(seed: &[u8]) -> Vec<u8> {
    const ALPHABET: &[u8] = b"ab1 ;+-*/=<>!&|.,(){}'\"x\n";
    seed.iter()
        .map(|&b| ALPHABET[b as usize % ALPHABET.len()])
        .collect()
}

#[quickcheck]
fn lossless_coverage(seed: Vec<u8>) -> bool {
    let input = materialize(&seed);
    let (tokens, ending) = drain_slice(&input, CLike, 64);
    let rebuilt: Vec<u8> = tokens.iter().flat_map(|t| t.bytes.clone()).collect();
    match ending {
        // Clean end: the tokens tile the entire input.
        Ending::End => rebuilt == input,
        // Any failure: the tokens tile a prefix, with no gaps or overlaps.
        Ending::Error(_) => input.starts_with(&rebuilt),
    }
}

#[quickcheck]
fn capacity_never_changes_the_token_sequence(runs: Vec<(u8, u8)>) -> bool {
    let mut input = Vec::new();
    for &(digit, len) in &runs {
        let byte = b'0' + digit % 10;
        for _ in 0..(len % 6 + 1) {
            input.push(byte);
        }
        input.push(b' ');
    }
    // Longest token is 6 bytes, so every capacity >= 10 must agree.
    let small = drain_slice(&input, DigitRuns, 10);
    let large = drain_slice(&input, DigitRuns, 64);
    let view = |(tokens, ending): &(Vec<lexmodem::OwnedToken<DKind>>, Ending)| {
        (
            tokens
                .iter()
                .map(|t| (t.kind, t.bytes.clone()))
                .collect::<Vec<_>>(),
            ending.clone(),
        )
    };
    view(&small) == view(&large)
}

#[quickcheck]
fn chunking_never_changes_the_token_sequence(seed: Vec<u8>, chunk: u8) -> bool {
    let input = materialize(&seed);
    let whole = drain_slice(&input, CLike, 64);
    let stream = TokenStream::open(
        ChunkedSource::new(&input, usize::from(chunk % 7 + 1)),
        CLike,
        64,
    )
    .expect("capacity is valid");
    let chunked = common::drain(stream);
    let view = |(tokens, ending): &(Vec<lexmodem::OwnedToken<lexmodem::CKind>>, Ending)| {
        (
            tokens
                .iter()
                .map(|t| (t.kind, t.bytes.clone()))
                .collect::<Vec<_>>(),
            ending.clone(),
        )
    };
    view(&whole) == view(&chunked)
}
