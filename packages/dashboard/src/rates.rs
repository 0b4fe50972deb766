//! Derived-rate arithmetic and display formatting.
//!
//! All rates are computed at view time, never stored. Every division is
//! guarded against a zero denominator and yields 0 instead of an error.

/// Divides two counts, returning 0.0 when the denominator is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn safe_rate(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Formats a count with thousands separators (`1234567` → `"1,234,567"`).
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a rate as a percentage with two decimals (`0.142` → `"14.20%"`).
#[must_use]
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_yields_zero() {
        assert!((safe_rate(10, 0) - 0.0).abs() < f64::EPSILON);
        assert!((safe_rate(0, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nonzero_rate() {
        assert!((safe_rate(70, 500) - 0.14).abs() < f64::EPSILON);
    }

    #[test]
    fn counts_group_by_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(0.14), "14.00%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(1.0), "100.00%");
    }
}
