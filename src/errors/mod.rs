pub(crate) mod chunk;

pub use chunk::ChunkError;
