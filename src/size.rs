//! Human-readable byte sizes and byte-to-element budget conversion.

use std::sync::LazyLock;

use regex::Regex;
use snafu::prelude::*;

use crate::errors::chunk::{
    BudgetBelowItemSizeSnafu, ChunkError, InvalidByteSizeSnafu, InvalidItemSizeSnafu,
};

static BYTE_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d*)?|\.\d+)\s*([kmgtpe]?b)?\s*$")
        .expect("byte size pattern is valid")
});

const UNITS: [&str; 6] = ["KB", "MB", "GB", "TB", "PB", "EB"];

/// Parse a size such as `"20MB"`, `"2.5 gb"` or `"4096"` into bytes.
///
/// Units are powers of 1024. Fractional results truncate toward zero.
pub fn parse_byte_size(input: &str) -> Result<u64, ChunkError> {
    let caps = BYTE_SIZE
        .captures(input)
        .context(InvalidByteSizeSnafu { input })?;
    let number = &caps[1];
    let shift = caps.get(2).map(|m| unit_shift(m.as_str())).unwrap_or(0);
    let multiplier = 1u64 << shift;

    let bytes = match number.parse::<u64>() {
        Ok(whole) => whole.checked_mul(multiplier),
        Err(_) => number.parse::<f64>().ok().and_then(|value| {
            let bytes = (value * multiplier as f64).trunc();
            (bytes.is_finite() && bytes <= u64::MAX as f64).then_some(bytes as u64)
        }),
    };
    bytes.context(InvalidByteSizeSnafu { input })
}

/// Format bytes with the largest unit that keeps the value below 1024.
pub fn format_byte_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next;
    }
    format!("{size:.1}{unit}")
}

/// Number of whole elements of `item_size` bytes that fit in `bytes`.
pub fn element_budget(bytes: u64, item_size: u64) -> Result<u64, ChunkError> {
    ensure!(item_size > 0, InvalidItemSizeSnafu);
    let elements = bytes / item_size;
    ensure!(elements >= 1, BudgetBelowItemSizeSnafu { bytes, item_size });
    Ok(elements)
}

fn unit_shift(unit: &str) -> u32 {
    match unit.to_ascii_uppercase().as_str() {
        "KB" => 10,
        "MB" => 20,
        "GB" => 30,
        "TB" => 40,
        "PB" => 50,
        "EB" => 60,
        _ => 0,
    }
}
