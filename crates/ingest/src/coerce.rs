//! Cell coercion rules. Bad or blank cells fall back to a default instead of
//! failing the whole sheet.

use replenish_core::domain::sku::DEFAULT_RANK;

/// Parses a numeric cell. Blank, non-numeric and non-finite values yield `default`.
pub fn number_or(cell: &str, default: f64) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => default,
    }
}

/// Sales and stock quantities: missing means zero and negatives clamp to zero.
pub fn quantity(cell: &str) -> f64 {
    number_or(cell, 0.0).max(0.0)
}

/// Box quantity truncates toward zero; anything below one is an unorderable SKU.
pub fn box_quantity(cell: &str) -> u32 {
    let value = number_or(cell, 0.0);
    if value < 1.0 {
        return 0;
    }
    value.trunc().min(f64::from(u32::MAX)) as u32
}

/// Rank rounds up so a fractional 200.4 does not sneak under the top-rank cutoff.
pub fn rank(cell: &str) -> u32 {
    let value = number_or(cell, f64::from(DEFAULT_RANK));
    if value < 0.0 {
        return DEFAULT_RANK;
    }
    value.ceil().min(f64::from(u32::MAX)) as u32
}

pub fn text(cell: &str) -> String {
    cell.trim().to_string()
}
