//! Storage-layout hand-off: turn a byte budget into a chunk shape for an
//! array's encoding, or into the step sizes of a bulk incremental load.

use snafu::prelude::*;
use tracing::{debug, info};
use zarrs::array::chunk_grid::regular::RegularChunkGrid;
use zarrs::array::ChunkGrid;

use crate::chunk_shape::{compute_chunk_shape, ChunkShape, Extents, PreferencePlan};
use crate::errors::chunk::{
    ChunkError, DegenerateShapeSnafu, DimensionMismatchSnafu, InvalidItemSizeSnafu,
};
use crate::limits;
use crate::size::{element_budget, format_byte_size};

/// Chunk sizing for one array: its shape, the byte size of one element, a
/// byte budget per chunk and the axes to favour.
#[derive(Debug, Clone)]
pub struct ChunkRequest {
    shape: Extents,
    item_size: u64,
    byte_budget: Option<u64>,
    plan: PreferencePlan,
}

impl ChunkRequest {
    pub fn new(shape: &[u64], item_size: u64) -> Self {
        Self {
            shape: Extents::from_slice(shape),
            item_size,
            byte_budget: None,
            plan: PreferencePlan::none(),
        }
    }

    /// Bytes per chunk. Defaults to `ZARRCHUNK_CHUNK_SIZE`, or 4096.
    pub fn with_byte_budget(mut self, bytes: u64) -> Self {
        self.byte_budget = Some(bytes);
        self
    }

    pub fn with_preference(mut self, plan: PreferencePlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    pub fn byte_budget(&self) -> u64 {
        self.byte_budget.unwrap_or_else(limits::default_chunk_bytes)
    }

    pub fn element_budget(&self) -> Result<u64, ChunkError> {
        element_budget(self.byte_budget(), self.item_size)
    }

    pub fn chunk_shape(&self) -> Result<ChunkShape, ChunkError> {
        let budget = self.element_budget()?;
        let chunk = compute_chunk_shape(&self.shape, budget, &self.plan)?;
        let elements = chunk.num_elements();
        info!(
            chunk = %chunk,
            bytes = elements * self.item_size,
            elements,
            item_size = self.item_size,
            "setting chunks"
        );
        Ok(chunk)
    }

    /// The regular Zarr chunk grid for the computed chunk shape.
    pub fn chunk_grid(&self) -> Result<ChunkGrid, ChunkError> {
        let chunk = self.chunk_shape()?;
        regular_chunk_grid(&self.shape, &chunk)
    }
}

/// Build a regular Zarr chunk grid over `shape` with chunks of `chunk`.
pub fn regular_chunk_grid(shape: &[u64], chunk: &ChunkShape) -> Result<ChunkGrid, ChunkError> {
    ensure!(
        shape.len() == chunk.len(),
        DimensionMismatchSnafu {
            expected: shape.len(),
            got: chunk.len(),
        }
    );
    let grid = RegularChunkGrid::new(shape.to_vec(), chunk.to_nonzero().into())
        .map_err(|e| ChunkError::ChunkGrid { msg: e.to_string() })?;
    Ok(ChunkGrid::new(grid))
}

/// Step sizes for loading an array in pieces of at most `byte_budget` bytes.
///
/// Returns `None` when the whole array already fits, so it can be loaded in
/// one go. The budget defaults to `ZARRCHUNK_LOAD_SIZE`, or 20MB.
pub fn load_steps(
    shape: &[u64],
    item_size: u64,
    byte_budget: Option<u64>,
    plan: &PreferencePlan,
) -> Result<Option<ChunkShape>, ChunkError> {
    ensure!(item_size > 0, InvalidItemSizeSnafu);
    for (axis, &extent) in shape.iter().enumerate() {
        ensure!(extent >= 1, DegenerateShapeSnafu { axis });
    }
    let bytes = byte_budget.unwrap_or_else(limits::default_load_bytes);

    let total = shape
        .iter()
        .try_fold(item_size, |acc, &extent| acc.checked_mul(extent));
    if let Some(total) = total.filter(|&total| total <= bytes) {
        debug!(total = %format_byte_size(total), "array fits in one load");
        return Ok(None);
    }

    let budget = element_budget(bytes, item_size)?;
    let steps = compute_chunk_shape(shape, budget, plan)?;
    info!(
        total = %total.map(format_byte_size).unwrap_or_else(|| "more than 16.0EB".to_string()),
        steps = %steps,
        "loading by step"
    );
    Ok(Some(steps))
}
