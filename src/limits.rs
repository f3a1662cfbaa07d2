use crate::size::parse_byte_size;

const DEFAULT_MAX_REFINE_DIMS: usize = 16;
// Refinement enumerates 2^N candidates; beyond this even an override is refused.
const HARD_MAX_REFINE_DIMS: usize = 32;

const DEFAULT_CHUNK_BYTES: u64 = 4096;
const DEFAULT_LOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Largest dimensionality the +0/+1 refinement will enumerate.
pub(crate) fn max_refine_dims() -> usize {
    refine_dims_from(std::env::var("ZARRCHUNK_MAX_REFINE_DIMS").ok().as_deref())
}

/// Default byte budget when sizing storage chunks.
pub(crate) fn default_chunk_bytes() -> u64 {
    bytes_from(
        std::env::var("ZARRCHUNK_CHUNK_SIZE").ok().as_deref(),
        DEFAULT_CHUNK_BYTES,
    )
}

/// Default byte budget for one step of a bulk incremental load.
pub(crate) fn default_load_bytes() -> u64 {
    bytes_from(
        std::env::var("ZARRCHUNK_LOAD_SIZE").ok().as_deref(),
        DEFAULT_LOAD_BYTES,
    )
}

fn refine_dims_from(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&v| v > 0)
        .map(|v| v.min(HARD_MAX_REFINE_DIMS))
        .unwrap_or(DEFAULT_MAX_REFINE_DIMS)
}

fn bytes_from(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| parse_byte_size(v).ok())
        .filter(|&v| v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refine_dims_defaults_and_caps() {
        assert_eq!(refine_dims_from(None), DEFAULT_MAX_REFINE_DIMS);
        assert_eq!(refine_dims_from(Some("0")), DEFAULT_MAX_REFINE_DIMS);
        assert_eq!(refine_dims_from(Some("abc")), DEFAULT_MAX_REFINE_DIMS);
        assert_eq!(refine_dims_from(Some(" 8 ")), 8);
        assert_eq!(refine_dims_from(Some("500")), HARD_MAX_REFINE_DIMS);
    }

    #[test]
    fn byte_limits_accept_human_sizes() {
        assert_eq!(bytes_from(Some("20MB"), 1), 20 * 1024 * 1024);
        assert_eq!(bytes_from(Some("512"), 1), 512);
        assert_eq!(bytes_from(Some("nope"), 7), 7);
        assert_eq!(bytes_from(Some("0KB"), 7), 7);
        assert_eq!(bytes_from(None, DEFAULT_CHUNK_BYTES), 4096);
    }
}
