use crate::utils::error::{EvalError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EvalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EvalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_date_order(field_name: &str, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(EvalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{} .. {}", start, end),
            reason: "End date must not be before start date".to_string(),
        });
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();

    if formats.is_empty() {
        return Err(EvalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    for format in formats {
        if !allowed_set.contains(format.as_str()) {
            return Err(EvalError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!("Unsupported format. Valid formats: {}", allowed.join(", ")),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EvalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input.checkins", "checkins.csv").is_ok());
        assert!(validate_path("input.checkins", "").is_err());
        assert!(validate_path("input.checkins", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_date_order() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert!(validate_date_order("period", start, end).is_ok());
        assert!(validate_date_order("period", start, start).is_ok());
        assert!(validate_date_order("period", end, start).is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_output_formats("output.formats", &formats, &["csv", "json"]).is_ok());
        assert!(validate_output_formats("output.formats", &[], &["csv", "json"]).is_err());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_output_formats("output.formats", &invalid, &["csv", "json"]).is_err());
    }
}
