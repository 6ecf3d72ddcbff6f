//! Human-readable formatting for sizes, ratios and counts

const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Format a byte count with decimal (SI) units and three significant digits.
///
/// ```
/// use optidash_core::format::pretty_bytes;
///
/// assert_eq!(pretty_bytes(200), "200 B");
/// assert_eq!(pretty_bytes(1500), "1.5 kB");
/// assert_eq!(pretty_bytes(-1500), "-1.5 kB");
/// ```
pub fn pretty_bytes(bytes: i64) -> String {
    let sign = if bytes < 0 { "-" } else { "" };
    let magnitude = bytes.unsigned_abs();

    if magnitude < 1000 {
        return format!("{sign}{magnitude} B");
    }

    let mut value = magnitude as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    format!("{sign}{} {}", three_significant(value), UNITS[unit])
}

/// Render `value` (1 <= value < 1000) with three significant digits, trailing zeros trimmed.
fn three_significant(value: f64) -> String {
    let integer_digits = if value >= 100.0 {
        3
    } else if value >= 10.0 {
        2
    } else {
        1
    };
    let rendered = format!("{:.*}", 3 - integer_digits, value);

    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        rendered
    }
}

/// Format a percentage with two decimals, without the `%` sign.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}")
}

/// Share of `part` in `whole` as a percentage, 0 when `whole` is 0.
pub fn percent_of(part: i64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Format a count with singular/plural
pub fn format_count(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pretty_bytes_small() {
        assert_eq!(pretty_bytes(0), "0 B");
        assert_eq!(pretty_bytes(999), "999 B");
    }

    #[test]
    fn test_pretty_bytes_units() {
        assert_eq!(pretty_bytes(1000), "1 kB");
        assert_eq!(pretty_bytes(12_345), "12.3 kB");
        assert_eq!(pretty_bytes(123_456), "123 kB");
        assert_eq!(pretty_bytes(5_000_000), "5 MB");
        assert_eq!(pretty_bytes(1_250_000_000), "1.25 GB");
    }

    #[test]
    fn test_pretty_bytes_negative() {
        assert_eq!(pretty_bytes(-200), "-200 B");
        assert_eq!(pretty_bytes(-1500), "-1.5 kB");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(percent_of(200, 1500)), "13.33");
        assert_eq!(format_percent(percent_of(200, 1000)), "20.00");
        assert_eq!(percent_of(10, 0), 0.0);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "image", "images"), "1 image");
        assert_eq!(format_count(0, "image", "images"), "0 images");
        assert_eq!(format_count(5, "image", "images"), "5 images");
    }

    proptest! {
        #[test]
        fn prop_percent_of_whole_is_bounded(part in 0i64..1_000_000, extra in 0u64..1_000_000) {
            let whole = part as u64 + extra;
            let pct = percent_of(part, whole);
            prop_assert!((0.0..=100.0).contains(&pct));
        }

        #[test]
        fn prop_pretty_bytes_has_unit(bytes in any::<i64>()) {
            let rendered = pretty_bytes(bytes);
            prop_assert!(UNITS.iter().any(|unit| rendered.ends_with(unit)));
        }
    }
}
