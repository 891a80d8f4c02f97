use crate::utils::error::{CostError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_positive_number<T>(field_name: &str, value: T, min_value: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min_value {
        return Err(CostError::config(
            field_name,
            format!("value {} must be at least {}", value, min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_negative_price(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CostError::config(
            field_name,
            format!("price {} must be a finite, non-negative amount", value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CostError::config(
            field_name,
            "value cannot be empty or whitespace-only",
        ));
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
        return Err(CostError::config(
            field_name,
            format!("value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

/// 名稱不分大小寫、前後空白必須唯一
pub fn validate_unique_names<'a, I>(field_name: &str, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        let key = name.trim().to_uppercase();
        if !seen.insert(key) {
            return Err(CostError::config(
                field_name,
                format!("duplicate name `{}`", name.trim()),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("grouping_window_minutes", 20, 1).is_ok());
        assert!(validate_positive_number("grouping_window_minutes", 0, 1).is_err());
        assert!(validate_positive_number("grouping_window_minutes", -5, 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_non_negative_price("flat_prices.1", 45000.0).is_ok());
        assert!(validate_non_negative_price("flat_prices.1", -1.0).is_err());
        assert!(validate_non_negative_price("flat_prices.1", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("evening_cutoff_hour", 12, 1, 23).is_ok());
        assert!(validate_range("evening_cutoff_hour", 24, 1, 23).is_err());
    }

    #[test]
    fn test_validate_unique_names() {
        assert!(validate_unique_names("vehicle_types", ["Berline", "Hiace"]).is_ok());
        assert!(validate_unique_names("vehicle_types", ["Berline", " berline "]).is_err());
    }
}
