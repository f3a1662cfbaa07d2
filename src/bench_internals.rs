//! Re-exports for Criterion benchmarks.
//!
//! Gated behind `#[cfg(feature = "bench")]` in `lib.rs`.
//! Not part of the public API; intended only for `benches/`.

pub use crate::chunk_shape::{refine_candidate, sweep_common_candidate};
