//! Scan/refill tracing, compiled in with `RUSTFLAGS="--cfg trace_lexer"` on
//! `std` builds and absent otherwise.

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(all(trace_lexer, feature = "std"))]
        ::std::eprintln!($($arg)*);
    }};
}

pub(crate) use trace;
