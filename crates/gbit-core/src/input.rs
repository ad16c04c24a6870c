//! Lenient parsing for user-supplied goal fields.

use tracing::warn;

/// Parse a numeric field, treating garbage as zero.
///
/// Blank, unparseable, and non-finite input all yield `0.0` with a warning.
#[must_use]
pub fn parse_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        Ok(_) | Err(_) => {
            warn!(input = trimmed, "not a usable number; using 0");
            0.0
        }
    }
}

/// Empty or whitespace-only links mean "no link".
#[must_use]
pub fn normalize_link(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert!((parse_numeric("12") - 12.0).abs() < f64::EPSILON);
        assert!((parse_numeric(" 2.5 ") - 2.5).abs() < f64::EPSILON);
        assert!((parse_numeric("-40") + 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn garbage_is_zero() {
        for raw in ["", "abc", "NaN", "inf", "1e999", "12kg"] {
            assert!(parse_numeric(raw).abs() < f64::EPSILON, "{raw}");
        }
    }

    #[test]
    fn blank_link_is_none() {
        assert_eq!(normalize_link(None), None);
        assert_eq!(normalize_link(Some("   ")), None);
        assert_eq!(
            normalize_link(Some(" https://example.com ")),
            Some("https://example.com".to_string())
        );
    }
}
