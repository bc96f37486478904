use std::sync::OnceLock;

use regex::Regex;

use crate::error::CvrError;
use crate::model::CvrNumber;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_RESULT_SIZE: i64 = 100;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, CvrError> {
    if input.len() > max_len {
        return Err(CvrError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(CvrError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a company name or name prefix: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, CvrError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

fn cvr_pattern() -> Result<&'static Regex, CvrError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]{8}$"))
        .as_ref()
        .map_err(|e| CvrError::InvalidInput(format!("CVR number pattern: {}", e)))
}

/// Validate a CVR number: exactly 8 ASCII digits. Spaces inside the number
/// (`"12 34 56 78"`) are accepted and removed.
pub fn validate_cvr_number(input: &str) -> Result<CvrNumber, CvrError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if !cvr_pattern()?.is_match(&compact) {
        return Err(CvrError::InvalidInput(format!(
            "CVR number must be exactly 8 digits, got '{}'",
            input.trim()
        )));
    }
    compact
        .parse::<CvrNumber>()
        .map_err(|e| CvrError::InvalidInput(format!("invalid CVR number '{}': {}", compact, e)))
}

/// Validate a result size for name searches (1-100).
pub fn validate_size(size: i64) -> Result<i64, CvrError> {
    if !(1..=MAX_RESULT_SIZE).contains(&size) {
        return Err(CvrError::InvalidInput(format!(
            "size must be between 1 and {}",
            MAX_RESULT_SIZE
        )));
    }
    Ok(size)
}
