use std::fmt;
use std::num::NonZeroU64;

use smallvec::SmallVec;

/// Per-dimension sizes, inline for the dimensionality of typical gridded data.
pub(crate) type Extents = SmallVec<[u64; 4]>;

/// Where in a chunk-shape computation the solver was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStage {
    /// A direct call to the axis-group solver.
    Direct,
    /// The solve for the preference group at this index.
    Group(usize),
    /// The final solve over the axes not named by any preference group.
    Remainder,
}

impl fmt::Display for SolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStage::Direct => write!(f, "solve"),
            SolveStage::Group(index) => write!(f, "preference group {index}"),
            SolveStage::Remainder => write!(f, "remaining axes"),
        }
    }
}

/// A computed chunk shape: one block size per dimension.
///
/// Each value lies within `[1, extent]` of its dimension and the product of
/// all values is within the element budget it was computed for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkShape(Extents);

impl ChunkShape {
    pub(crate) fn new(values: impl Into<Extents>) -> Self {
        Self(values.into())
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of elements in one chunk.
    pub fn num_elements(&self) -> u64 {
        self.0.iter().product()
    }

    /// The chunk shape in the non-zero form expected by zarrs chunk grids.
    pub fn to_nonzero(&self) -> Vec<NonZeroU64> {
        self.0
            .iter()
            .map(|&v| NonZeroU64::new(v).unwrap_or(NonZeroU64::MIN))
            .collect()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.0.to_vec()
    }
}

impl AsRef<[u64]> for ChunkShape {
    fn as_ref(&self) -> &[u64] {
        &self.0
    }
}

impl From<ChunkShape> for Vec<u64> {
    fn from(shape: ChunkShape) -> Self {
        shape.0.into_vec()
    }
}

impl fmt::Display for ChunkShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_as_tuple() {
        let shape = ChunkShape::new(Extents::from_slice(&[6, 6, 5, 5]));
        assert_eq!(shape.to_string(), "(6, 6, 5, 5)");
        assert_eq!(shape.num_elements(), 900);
    }

    #[test]
    fn empty_shape_has_one_element() {
        let shape = ChunkShape::new(Extents::new());
        assert!(shape.is_empty());
        assert_eq!(shape.num_elements(), 1);
        assert_eq!(shape.to_string(), "()");
    }

    #[test]
    fn nonzero_conversion_keeps_values() {
        let shape = ChunkShape::new(Extents::from_slice(&[400, 2, 1]));
        let nz: Vec<u64> = shape.to_nonzero().iter().map(|v| v.get()).collect();
        assert_eq!(nz, vec![400, 2, 1]);
    }
}
