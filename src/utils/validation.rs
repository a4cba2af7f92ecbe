use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use crate::utils::datetime::parse_moscow_datetime;

/// Minimum number of characters after the `@` of a channel handle.
const MIN_HANDLE_LEN: usize = 5;

/// Check a channel handle like `@example_channel` and return it trimmed.
pub fn validate_channel_handle(input: &str) -> Result<String> {
    let handle = input.trim();

    let name = handle
        .strip_prefix('@')
        .ok_or_else(|| anyhow!("Channel handle must start with '@'"))?;

    if name.chars().count() < MIN_HANDLE_LEN {
        return Err(anyhow!(
            "Channel handle must have at least {} characters after '@'",
            MIN_HANDLE_LEN
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(anyhow!("Channel handle can only contain letters, digits and underscores"));
    }

    Ok(handle.to_string())
}

/// Check that `input` is exactly `DD.MM.YYYY HH:MM` (after trimming) and a
/// real calendar moment, and return it as a UTC instant.
pub fn validate_post_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let bytes = input.as_bytes();

    if bytes.len() != 16 {
        return Err(anyhow!("Date must look like DD.MM.YYYY HH:MM"));
    }

    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            2 | 5 => *b == b'.',
            10 => *b == b' ',
            13 => *b == b':',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return Err(anyhow!("Date must look like DD.MM.YYYY HH:MM"));
        }
    }

    parse_moscow_datetime(input)
}

/// Post text or caption must have something other than whitespace.
pub fn validate_post_text(text: Option<&str>) -> Result<&str> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(anyhow!("Post content cannot be empty")),
    }
}
