use crate::utils::error::{NormalizeError, Result};
use std::collections::HashSet;
use std::hash::Hash;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(NormalizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(NormalizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(NormalizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(NormalizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty".to_string(),
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
    if value < min || value > max {
        return Err(NormalizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 確認清單中沒有重複項目，回傳第一個重複值
pub fn validate_unique<T>(field_name: &str, values: &[T]) -> Result<()>
where
    T: Eq + Hash + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(NormalizeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Value appears more than once".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("distinct_threshold", 10, 1).is_ok());
        assert!(validate_positive_number("distinct_threshold", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("redundancy.level", 3u8, 1, 5).is_ok());
        assert!(validate_range("redundancy.level", 0u8, 1, 5).is_err());
        assert!(validate_range("redundancy.level", 6u8, 1, 5).is_err());
    }

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("levels", &[1, 2, 3]).is_ok());
        assert!(validate_unique("levels", &[1, 2, 2]).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("session.delimiter", ",").is_ok());
        // 空白字元本身就是合法的分隔符
        assert!(validate_non_empty_string("session.delimiter", "\t").is_ok());
        assert!(validate_non_empty_string("session.delimiter", " ").is_ok());
        assert!(validate_non_empty_string("session.delimiter", "").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data", "patients.csv").is_ok());
        assert!(validate_path("data", "").is_err());
    }
}
