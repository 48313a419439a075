//! Human-readable size parsing (e.g., "2GB", "500MB").

use thiserror::Error;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Error parsing a size string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '2GB', '500MB', or '1024KB'")]
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

/// Parse a human-readable size string into bytes.
///
/// Bare numbers are bytes; `K`/`KB`, `M`/`MB` and `G`/`GB` suffixes are
/// binary multiples. Case-insensitive, whitespace tolerant.
///
/// ```
/// use coverwall::config::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("256MB").unwrap(), 256 * 1024 * 1024);
/// assert_eq!(parse_size("2 gb").unwrap(), 2 * 1024 * 1024 * 1024);
/// ```
pub fn parse_size(s: &str) -> Result<u64, SizeParseError> {
    let trimmed = s.trim();
    let upper = trimmed.to_uppercase();

    let (digits, multiplier) = [("GB", GB), ("G", GB), ("MB", MB), ("M", MB), ("KB", KB), ("K", KB)]
        .iter()
        .find_map(|(suffix, multiplier)| {
            upper
                .strip_suffix(suffix)
                .map(|rest| (rest.trim().to_string(), *multiplier))
        })
        .unwrap_or_else(|| (upper.clone(), 1));

    if digits.is_empty() {
        return Err(SizeParseError::new(s));
    }

    let value: u64 = digits.parse().map_err(|_| SizeParseError::new(s))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| SizeParseError::new(s))
}

/// Format a byte count using the largest exact suffix.
pub fn format_size(bytes: u64) -> String {
    if bytes >= GB && bytes % GB == 0 {
        format!("{}GB", bytes / GB)
    } else if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        bytes.to_string()
    }
}
