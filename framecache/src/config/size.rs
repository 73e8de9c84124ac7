//! Human-readable size parsing (e.g., "64KB", "2MB").

use thiserror::Error;

/// Error parsing a size string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '64KB', '2MB', or '1048576'")]
pub struct SizeParseError {
    input: String,
}

impl SizeParseError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

const UNITS: &[(&str, usize)] = &[
    ("GB", 1024 * 1024 * 1024),
    ("G", 1024 * 1024 * 1024),
    ("MB", 1024 * 1024),
    ("M", 1024 * 1024),
    ("KB", 1024),
    ("K", 1024),
];

/// Parse a human-readable size string into bytes.
///
/// Bare numbers are bytes; `KB`/`MB`/`GB` (or `K`/`M`/`G`) suffixes use
/// 1024-based multipliers. Case-insensitive and whitespace tolerant.
///
/// # Examples
///
/// ```
/// use framecache::config::parse_size;
///
/// assert_eq!(parse_size("1048576").unwrap(), 1024 * 1024);
/// assert_eq!(parse_size("64KB").unwrap(), 64 * 1024);
/// assert_eq!(parse_size("2 mb").unwrap(), 2 * 1024 * 1024);
/// ```
pub fn parse_size(s: &str) -> Result<usize, SizeParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SizeParseError::new(s));
    }

    let upper = trimmed.to_uppercase();
    let (num_str, multiplier) = UNITS
        .iter()
        .find(|(suffix, _)| upper.ends_with(suffix))
        .map(|(suffix, mult)| (trimmed[..trimmed.len() - suffix.len()].trim(), *mult))
        .unwrap_or((trimmed, 1));

    let num: usize = num_str.parse().map_err(|_| SizeParseError::new(s))?;
    num.checked_mul(multiplier)
        .ok_or_else(|| SizeParseError::new(s))
}

/// Format a byte count as a human-readable string.
///
/// Falls back to the raw byte count when the value is not an even multiple
/// of a unit.
///
/// # Examples
///
/// ```
/// use framecache::config::format_size;
///
/// assert_eq!(format_size(64 * 1024), "64KB");
/// assert_eq!(format_size(2 * 1024 * 1024), "2MB");
/// assert_eq!(format_size(1000), "1000");
/// ```
pub fn format_size(bytes: usize) -> String {
    for (suffix, mult) in [
        ("GB", 1024 * 1024 * 1024),
        ("MB", 1024 * 1024),
        ("KB", 1024usize),
    ] {
        if bytes >= mult && bytes % mult == 0 {
            return format!("{}{}", bytes / mult, suffix);
        }
    }
    format!("{}", bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse_size("0").unwrap(), 0);
        assert_eq!(parse_size("1024").unwrap(), 1024);
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("1k").unwrap(), 1024);
        assert_eq!(parse_size("64KB").unwrap(), 64 * 1024);
        assert_eq!(parse_size("2MB").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_size("2m").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_size("1GB").unwrap(), 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_whitespace_and_case() {
        assert_eq!(parse_size("  2GB  ").unwrap(), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("2 gb").unwrap(), 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("2TB").is_err());
        assert!(parse_size("-1KB").is_err());
        assert!(parse_size("1.5MB").is_err());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(1024), "1KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3GB");
        assert_eq!(format_size(1000), "1000");
        assert_eq!(format_size(0), "0");
    }

    #[test]
    fn test_parse_format_roundtrip() {
        for s in ["64KB", "2MB", "1GB"] {
            assert_eq!(format_size(parse_size(s).unwrap()), s);
        }
    }
}
