//! Zero-cost logging helpers.
//!
//! With the `tracing` feature enabled these forward to the `tracing` crate;
//! without it (the default) they expand to nothing, so the hot paths carry
//! no logging overhead at all.
//!
//! ```bash
//! # Normal build - no logging
//! cargo build --release
//!
//! # Watch rebalances and resizes while replaying a command file
//! RUST_LOG=pma=debug cargo run --features tracing --bin replay -- in.txt out.txt
//! ```

#![allow(unused_macros, unused_imports)]

/// Trace-level logging (per-placement detail). No-op without the `tracing`
/// feature.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging (rebalances, grows, shrinks). No-op without the
/// `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
