//! Numeric parsing and fixed-precision formatting for datapoint values.

/// Significant digits carried by formatted datapoint values. Enough to be
/// lossless for the precision the source actually carries while hiding
/// floating-point noise from upstream aggregation.
pub const VALUE_SIGNIFICANT_DIGITS: i32 = 7;

/// Parse a value cell as f64. Empty and non-numeric cells yield `None`.
pub fn parse_value(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parse a key cell as an integer, accepting the `2015.0` form float
/// sources produce for integral values.
pub fn parse_integer(cell: &str) -> Option<i64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value.abs() < 9.007_199_254_740_992e15 {
        Some(value as i64)
    } else {
        None
    }
}

/// Format a value to `digits` significant digits without trailing zeros or
/// scientific notation.
pub fn format_significant(value: f64, digits: i32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = digits - 1 - magnitude;
    if decimals <= 0 {
        let scale = 10f64.powi(-decimals);
        let rounded = (value / scale).round() * scale;
        format!("{rounded:.0}")
    } else {
        let precision = decimals as usize;
        let formatted = format!("{value:.precision$}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
