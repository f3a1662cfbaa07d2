//! Overflow-safe products over block sizes.

/// Product of `values`, or `None` once a partial product exceeds `limit`.
///
/// Values are at least 1, so a partial product over the limit stays over it
/// and the multiplication never needs to run past `u64::MAX`.
pub(crate) fn bounded_product(values: impl IntoIterator<Item = u64>, limit: u64) -> Option<u64> {
    let mut acc: u64 = 1;
    for v in values {
        acc = acc.checked_mul(v)?;
        if acc > limit {
            return None;
        }
    }
    Some(acc)
}

/// Product of `values`, or `None` on overflow.
pub(crate) fn checked_product(values: impl IntoIterator<Item = u64>) -> Option<u64> {
    values
        .into_iter()
        .try_fold(1u64, |acc, v| acc.checked_mul(v))
}
