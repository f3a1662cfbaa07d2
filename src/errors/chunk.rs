use snafu::prelude::*;

use crate::chunk_shape::SolveStage;

/// Error type for chunk-shape computation and its collaborators.
///
/// Every variant is a caller error: nothing here is transient, and no partial
/// chunk shape is produced when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChunkError {
    #[snafu(display("no axis can have size 0 (axis {axis})"))]
    DegenerateShape { axis: usize },

    #[snafu(display("number of elements can't be zero"))]
    InvalidBudget,

    #[snafu(display(
        "axis {} appears in preference groups {} and {}",
        axis,
        first_group,
        second_group
    ))]
    OverlappingPreference {
        axis: usize,
        first_group: usize,
        second_group: usize,
    },

    #[snafu(display(
        "preference group {} references axis {}, but the array has {} dimensions",
        group,
        axis,
        ndim
    ))]
    AxisOutOfBounds {
        axis: usize,
        ndim: usize,
        group: usize,
    },

    #[snafu(display("unknown dimension: {}", name))]
    UnknownDimension { name: String },

    #[snafu(display("axis {} has an invalid range [{}, {}]", axis, lo, hi))]
    InvalidRange { axis: usize, lo: u64, hi: u64 },

    #[snafu(display(
        "{}: the smallest product between the ranges ({}) is greater than {}",
        stage,
        min_product,
        budget
    ))]
    InfeasibleBudget {
        min_product: u64,
        budget: u64,
        stage: SolveStage,
    },

    #[snafu(display("{}: the smallest product between the ranges overflows u64", stage))]
    ProductOverflow { stage: SolveStage },

    #[snafu(display(
        "refining {} dimensions exceeds the limit of {}; set ZARRCHUNK_MAX_REFINE_DIMS to override",
        ndim,
        max
    ))]
    TooManyDimensions { ndim: usize, max: usize },

    #[snafu(display("invalid byte size: '{}'", input))]
    InvalidByteSize { input: String },

    #[snafu(display("itemsize can't be zero"))]
    InvalidItemSize,

    #[snafu(display(
        "size ({} bytes) divided by itemsize ({} bytes) can't be less than 1",
        bytes,
        item_size
    ))]
    BudgetBelowItemSize { bytes: u64, item_size: u64 },

    #[snafu(display("step for axis {} can't be zero", axis))]
    InvalidStep { axis: usize },

    #[snafu(display(
        "shape has {} dimensions but {} were given",
        expected,
        got
    ))]
    DimensionMismatch { expected: usize, got: usize },

    #[snafu(display("failed to build chunk grid: {}", msg))]
    ChunkGrid { msg: String },
}

impl ChunkError {
    /// The solve stage an infeasibility was detected in, if any.
    pub fn stage(&self) -> Option<SolveStage> {
        match self {
            ChunkError::InfeasibleBudget { stage, .. } | ChunkError::ProductOverflow { stage } => {
                Some(*stage)
            }
            _ => None,
        }
    }
}

#[cfg(feature = "python")]
impl From<ChunkError> for pyo3::PyErr {
    fn from(error: ChunkError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(error.to_string())
    }
}
