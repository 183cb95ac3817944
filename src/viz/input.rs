//! Validation of values typed into the operation prompt

use std::ops::RangeInclusive;
use thiserror::Error;

pub const VALUE_RANGE: RangeInclusive<i64> = -999..=999;
/// Longest label that still fits a stack/queue/list cell
pub const MAX_LABEL_LEN: usize = 6;
pub const MAX_TEXT_LEN: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("please enter a value")]
    Empty,

    #[error("'{0}' is not a whole number")]
    NotInteger(String),

    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("'{value}' is longer than {max} characters")]
    TooLong { value: String, max: usize },

    #[error("structure is full ({0} elements)")]
    Full(usize),

    #[error("{0} does not apply here")]
    Unsupported(&'static str),
}

/// Integer for heaps and trees
pub fn parse_value(raw: &str) -> Result<i64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputError::NotInteger(trimmed.to_string()))?;
    if !VALUE_RANGE.contains(&value) {
        return Err(InputError::OutOfRange {
            value,
            min: *VALUE_RANGE.start(),
            max: *VALUE_RANGE.end(),
        });
    }
    Ok(value)
}

/// Free-form item for stacks, queues and lists
pub fn parse_label(raw: &str) -> Result<String, InputError> {
    bounded(raw, MAX_LABEL_LEN)
}

/// Text or pattern for string search
pub fn parse_text(raw: &str) -> Result<String, InputError> {
    bounded(raw, MAX_TEXT_LEN)
}

fn bounded(raw: &str, max: usize) -> Result<String, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    if trimmed.chars().count() > max {
        return Err(InputError::TooLong {
            value: trimmed.to_string(),
            max,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 42 "), Ok(42));
        assert_eq!(parse_value("-999"), Ok(-999));
        assert_eq!(parse_value(""), Err(InputError::Empty));
        assert_eq!(parse_value("4.5"), Err(InputError::NotInteger("4.5".into())));
        assert!(matches!(
            parse_value("1000"),
            Err(InputError::OutOfRange { value: 1000, .. })
        ));
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("  x1 "), Ok("x1".to_string()));
        assert_eq!(parse_label("   "), Err(InputError::Empty));
        assert!(matches!(parse_label("abcdefg"), Err(InputError::TooLong { max: 6, .. })));
    }
}
