use crate::utils::error::{GradebookError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GradebookError::ValidationError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GradebookError::ValidationError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GradebookError::ValidationError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // written so that NaN fails as well
    if !(value >= min && value <= max) {
        return Err(GradebookError::ValidationError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses a numeric score typed by a user, then checks it against the allowed range.
pub fn parse_score(field_name: &str, raw: &str, min: f64, max: f64) -> Result<f64> {
    let score: f64 = raw
        .trim()
        .parse()
        .map_err(|_| GradebookError::ValidationError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Value is not a number".to_string(),
        })?;
    validate_range(field_name, score, min, max)?;
    Ok(score)
}

/// Parses a 1-based menu selection in `1..=max` (or `0..=max` when `allow_zero`).
pub fn parse_choice(raw: &str, max: usize, allow_zero: bool) -> Option<usize> {
    let choice: usize = raw.trim().parse().ok()?;
    let min = if allow_zero { 0 } else { 1 };
    (min..=max).contains(&choice).then_some(choice)
}
