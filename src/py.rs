use pyo3::prelude::*;

use crate::blocks::block_intervals;
use crate::chunk_shape::{compute_chunk_shape, PreferenceGroup, PreferencePlan};
use crate::size::{format_byte_size, parse_byte_size};

/// One entry of `pref_axes`: a single axis, or axes of equal preference.
#[derive(FromPyObject)]
enum PrefAxes {
    Axis(usize),
    Group(Vec<usize>),
}

impl From<PrefAxes> for PreferenceGroup {
    fn from(entry: PrefAxes) -> Self {
        match entry {
            PrefAxes::Axis(axis) => PreferenceGroup::from(axis),
            PrefAxes::Group(axes) => PreferenceGroup::from(axes),
        }
    }
}

/// Calculate how to best split an array of `shape` in chunks of at most
/// `numel` elements, favouring `pref_axes` in order.
#[pyfunction]
#[pyo3(signature = (shape, numel, pref_axes=None))]
fn shape2chunk(shape: Vec<u64>, numel: u64, pref_axes: Option<Vec<PrefAxes>>) -> PyResult<Vec<u64>> {
    let plan = pref_axes.map(PreferencePlan::new).unwrap_or_default();
    Ok(compute_chunk_shape(&shape, numel, &plan)?.into())
}

#[pyfunction]
fn humanize_file_size(size: u64) -> String {
    format_byte_size(size)
}

#[pyfunction]
fn dehumanize_file_size(size: &str) -> PyResult<u64> {
    Ok(parse_byte_size(size)?)
}

/// `(start, stop)` pairs covering `[0, length)` in steps of `step`.
#[pyfunction]
fn length_to_slices_of_indexes(length: u64, step: u64) -> PyResult<Vec<(u64, u64)>> {
    Ok(block_intervals(length, step)?
        .map(|r| (r.start, r.end))
        .collect())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(shape2chunk, m)?)?;
    m.add_function(wrap_pyfunction!(humanize_file_size, m)?)?;
    m.add_function(wrap_pyfunction!(dehumanize_file_size, m)?)?;
    m.add_function(wrap_pyfunction!(length_to_slices_of_indexes, m)?)?;
    Ok(())
}
