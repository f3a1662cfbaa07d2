use smallvec::SmallVec;
use snafu::prelude::*;

use crate::errors::chunk::{
    AxisOutOfBoundsSnafu, ChunkError, OverlappingPreferenceSnafu, UnknownDimensionSnafu,
};

/// Axes sharing one priority level. Stored sorted and without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PreferenceGroup(SmallVec<[usize; 4]>);

impl PreferenceGroup {
    pub fn new(axes: impl IntoIterator<Item = usize>) -> Self {
        let mut axes: SmallVec<[usize; 4]> = axes.into_iter().collect();
        axes.sort_unstable();
        axes.dedup();
        Self(axes)
    }

    pub fn axes(&self) -> &[usize] {
        &self.0
    }

    pub fn contains(&self, axis: usize) -> bool {
        self.0.binary_search(&axis).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<usize> for PreferenceGroup {
    fn from(axis: usize) -> Self {
        Self::new([axis])
    }
}

impl<const N: usize> From<[usize; N]> for PreferenceGroup {
    fn from(axes: [usize; N]) -> Self {
        Self::new(axes)
    }
}

impl From<Vec<usize>> for PreferenceGroup {
    fn from(axes: Vec<usize>) -> Self {
        Self::new(axes)
    }
}

impl From<&[usize]> for PreferenceGroup {
    fn from(axes: &[usize]) -> Self {
        Self::new(axes.iter().copied())
    }
}

/// Ordered priority groups; earlier groups claim the element budget first.
///
/// Axes named by no group are sized together after every group is locked.
///
/// ```
/// use _core::PreferencePlan;
///
/// // Axes 2 and 3 equally first, then axis 1, then axis 0.
/// let plan = PreferencePlan::none().then([2, 3]).then(1).then(0);
/// assert_eq!(plan.groups().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PreferencePlan(Vec<PreferenceGroup>);

impl PreferencePlan {
    /// A plan with no preferences: all axes are sized together.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn new<G: Into<PreferenceGroup>>(groups: impl IntoIterator<Item = G>) -> Self {
        Self(groups.into_iter().map(Into::into).collect())
    }

    /// Append a lower-priority group.
    pub fn then(mut self, group: impl Into<PreferenceGroup>) -> Self {
        self.0.push(group.into());
        self
    }

    pub fn groups(&self) -> &[PreferenceGroup] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Axes of an `ndim`-dimensional array not named by any group.
    pub fn unmentioned_axes(&self, ndim: usize) -> Vec<usize> {
        (0..ndim)
            .filter(|&axis| !self.0.iter().any(|g| g.contains(axis)))
            .collect()
    }

    /// Check every axis is in bounds and belongs to at most one group.
    pub(crate) fn validate(&self, ndim: usize) -> Result<(), ChunkError> {
        let mut owner: Vec<Option<usize>> = vec![None; ndim];
        for (group, axes) in self.0.iter().enumerate() {
            for &axis in axes.axes() {
                ensure!(axis < ndim, AxisOutOfBoundsSnafu { axis, ndim, group });
                if let Some(first_group) = owner[axis] {
                    return OverlappingPreferenceSnafu {
                        axis,
                        first_group,
                        second_group: group,
                    }
                    .fail();
                }
                owner[axis] = Some(group);
            }
        }
        Ok(())
    }
}

/// A preference plan written with dimension names instead of axis indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedPreferencePlan(Vec<Vec<String>>);

impl NamedPreferencePlan {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a lower-priority group of dimension names.
    pub fn then<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.0.push(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.0
    }

    /// Map names to axis indices using the array's dimension names.
    pub fn resolve<S: AsRef<str>>(&self, dims: &[S]) -> Result<PreferencePlan, ChunkError> {
        let mut groups = Vec::with_capacity(self.0.len());
        for names in &self.0 {
            let mut axes = SmallVec::<[usize; 4]>::new();
            for name in names {
                let axis = dims
                    .iter()
                    .position(|d| d.as_ref() == name)
                    .context(UnknownDimensionSnafu { name: name.as_str() })?;
                axes.push(axis);
            }
            groups.push(PreferenceGroup::new(axes));
        }
        Ok(PreferencePlan(groups))
    }
}
