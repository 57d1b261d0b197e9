//! Food category catalog.
//!
//! The built-in categories and their per-day-type limits, plus parsing of
//! the external override parameter that lets a deployment customize limits
//! without a config file. Parsing never fails the caller: a malformed
//! override falls back to the defaults with a warning.

use once_cell::sync::Lazy;
use shared::{CategoryDefinition, UnitLimits};
use thiserror::Error;
use tracing::{info, warn};

static DEFAULT_CATEGORIES: Lazy<Vec<CategoryDefinition>> = Lazy::new(|| {
    vec![
        CategoryDefinition {
            id: "carbs".to_string(),
            name: "Carbs".to_string(),
            max_units: UnitLimits { normal: 2.5, sport: 4.5 },
            color: "#E99D42".to_string(),
            bg_color: "#FFEFD6".to_string(),
        },
        CategoryDefinition {
            id: "proteins".to_string(),
            name: "Proteins".to_string(),
            max_units: UnitLimits { normal: 3.5, sport: 3.0 },
            color: "#4C72B0".to_string(),
            bg_color: "#E1EAFA".to_string(),
        },
        CategoryDefinition {
            id: "fats".to_string(),
            name: "Fats".to_string(),
            max_units: UnitLimits { normal: 1.0, sport: 1.0 },
            color: "#DD6E6E".to_string(),
            bg_color: "#FBECEC".to_string(),
        },
        CategoryDefinition {
            id: "vegetables".to_string(),
            name: "Vegetables".to_string(),
            max_units: UnitLimits { normal: 2.5, sport: 2.5 },
            color: "#55AD7A".to_string(),
            bg_color: "#E7F5EE".to_string(),
        },
    ]
});

/// The built-in category set with default limits
pub fn default_categories() -> Vec<CategoryDefinition> {
    DEFAULT_CATEGORIES.clone()
}

/// Why an override parameter could not be applied
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverrideParseError {
    #[error("expected at least {expected} limit values, got {got}")]
    TooFewValues { expected: usize, got: usize },
    #[error("limit value {0:?} is not a non-negative integer")]
    InvalidValue(String),
}

/// Load the category catalog, applying an optional limits override.
///
/// The override is the value of the external `u=` parameter: limits scaled
/// by 10 and joined with `-`, the first four being normal-day limits in
/// catalog order, optionally followed by four sport-day limits. When the
/// sport values are absent, sport limits equal the normal ones. A malformed
/// override logs a warning and yields the defaults.
pub fn load_categories(override_param: Option<&str>) -> Vec<CategoryDefinition> {
    let Some(raw) = override_param else {
        return default_categories();
    };
    match parse_override(raw) {
        Ok(categories) => {
            info!("applied category limit override: {}", raw);
            categories
        }
        Err(err) => {
            warn!("invalid limit override {:?}, using defaults: {}", raw, err);
            default_categories()
        }
    }
}

fn parse_override(raw: &str) -> Result<Vec<CategoryDefinition>, OverrideParseError> {
    let values = raw
        .split('-')
        .map(|token| {
            let token = token.trim();
            match token.parse::<i64>() {
                Ok(scaled) if scaled >= 0 => Ok(scaled as f64 / 10.0),
                _ => Err(OverrideParseError::InvalidValue(token.to_string())),
            }
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let mut categories = default_categories();
    let count = categories.len();
    if values.len() < count {
        return Err(OverrideParseError::TooFewValues {
            expected: count,
            got: values.len(),
        });
    }

    let has_sport_values = values.len() >= count * 2;
    for (i, category) in categories.iter_mut().enumerate() {
        category.max_units.normal = values[i];
        category.max_units.sport = if has_sport_values {
            values[count + i]
        } else {
            values[i]
        };
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DayType;

    #[test]
    fn test_default_catalog() {
        let categories = default_categories();
        let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["carbs", "proteins", "fats", "vegetables"]);
        assert_eq!(categories[0].max_units.normal, 2.5);
        assert_eq!(categories[0].max_units.sport, 4.5);
        assert_eq!(categories[1].max_units.sport, 3.0);
    }

    #[test]
    fn test_override_normal_only_defaults_sport_to_normal() {
        let categories = load_categories(Some("25-35-10-25"));
        assert_eq!(categories[0].max_units.normal, 2.5);
        assert_eq!(categories[1].max_units.normal, 3.5);
        assert_eq!(categories[2].max_units.normal, 1.0);
        assert_eq!(categories[3].max_units.normal, 2.5);
        for category in &categories {
            assert_eq!(category.max_units.sport, category.max_units.normal);
        }
    }

    #[test]
    fn test_override_with_sport_values() {
        let categories = load_categories(Some("25-35-10-25-45-30-10-25"));
        assert_eq!(categories[0].max_units.normal, 2.5);
        assert_eq!(categories[0].max_units.sport, 4.5);
        assert_eq!(categories[1].max_units.sport, 3.0);
        assert_eq!(
            categories[3].max_units.for_day_type(DayType::Sport),
            Some(2.5)
        );
    }

    #[test]
    fn test_override_too_few_values_falls_back() {
        let categories = load_categories(Some("25-35"));
        assert_eq!(categories, default_categories());
    }

    #[test]
    fn test_override_non_numeric_falls_back() {
        let categories = load_categories(Some("25-abc-10-25"));
        assert_eq!(categories, default_categories());
    }

    #[test]
    fn test_override_empty_token_falls_back() {
        let categories = load_categories(Some("25--35-10-25"));
        assert_eq!(categories, default_categories());
    }

    #[test]
    fn test_no_override_uses_defaults() {
        assert_eq!(load_categories(None), default_categories());
    }

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(
            parse_override("25").unwrap_err(),
            OverrideParseError::TooFewValues { expected: 4, got: 1 }
        );
        assert_eq!(
            parse_override("25-x-10-25").unwrap_err(),
            OverrideParseError::InvalidValue("x".to_string())
        );
    }
}
