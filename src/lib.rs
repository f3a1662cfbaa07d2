//! Balanced chunk shapes for large labeled N-dimensional arrays.
//!
//! Given an array shape and an element budget per chunk, [`compute_chunk_shape`]
//! picks one block size per dimension so that every size fits its dimension,
//! the chunk holds at most the budget, and the budget is spread evenly rather
//! than spent on a single axis. A [`PreferencePlan`] lets callers give some
//! axes first claim on the budget.
//!
//! Around that core sit the pieces that feed and consume it: byte sizes
//! ([`parse_byte_size`], [`element_budget`]), storage chunk grids
//! ([`ChunkRequest`]) and stepwise loading ([`load_steps`], [`BlockIter`]).

mod blocks;
mod chunk_shape;
mod errors;
mod layout;
mod limits;
mod size;

#[cfg(feature = "python")]
mod py;

#[cfg(feature = "bench")]
pub mod bench_internals;

pub use blocks::{block_intervals, BlockIntervals, BlockIter};
pub use chunk_shape::{
    compute_chunk_shape, solve, AxisRange, ChunkShape, NamedPreferencePlan, PreferenceGroup,
    PreferencePlan, SolveStage,
};
pub use errors::ChunkError;
pub use layout::{load_steps, regular_chunk_grid, ChunkRequest};
pub use size::{element_budget, format_byte_size, parse_byte_size};
