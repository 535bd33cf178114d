//! Canonical number rendering.

/// Render a number the one way the tree format writes numbers.
///
/// No grouping separators, no exponent, no trailing `.0` on integral values,
/// and the shortest digits that read back to the same `f64`. Negative zero
/// renders as `"0"`. The output does not depend on locale or on any earlier
/// call.
///
/// ```
/// use sheetxml_core::format_number;
///
/// assert_eq!(format_number(1000.0), "1000");
/// assert_eq!(format_number(-2.5), "-2.5");
/// assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
/// ```
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.0
        return "0".to_string();
    }
    value.to_string()
}
