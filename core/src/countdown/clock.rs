//! `HH:MM:SS` parsing and formatting

use thiserror::Error;

/// Why an edited duration was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("expected HH:MM:SS, got {0} field(s)")]
    FieldCount(usize),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("duration must be greater than zero")]
    Zero,

    #[error("duration is too large")]
    TooLarge,
}

/// Parse `HH:MM:SS` into total seconds.
///
/// Each field is a non-negative integer; minutes and seconds are not capped
/// at 59 (`00:00:90` is 90 seconds). Surrounding whitespace is ignored.
pub fn parse_hms(input: &str) -> Result<u32, TimeParseError> {
    let fields: Vec<&str> = input.trim().split(':').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(TimeParseError::FieldCount(fields.len()));
    }

    let mut total: u64 = 0;
    for (field, unit) in fields.iter().zip([3600u64, 60, 1]) {
        let value: u64 = field
            .parse()
            .map_err(|_| TimeParseError::InvalidNumber(field.to_string()))?;
        total = value
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or(TimeParseError::TooLarge)?;
    }

    match u32::try_from(total) {
        Ok(0) => Err(TimeParseError::Zero),
        Ok(secs) => Ok(secs),
        Err(_) => Err(TimeParseError::TooLarge),
    }
}

/// Format seconds as zero-padded `HH:MM:SS` (hours are not wrapped)
pub fn format_hms(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
