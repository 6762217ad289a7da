//! Form validation boundary
//!
//! Profile inputs are stored as the free text the user typed. Before any
//! formula runs, the calculators pass those strings through here: parse,
//! reject anything that is not a plain decimal number, then check the value
//! against a range that depends on the selected unit system.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::units::UnitSystem;

/// Plain decimal numbers only: no exponents, signs, `inf` or `NaN`
const NUMERIC_FIELD_PATTERN: &str = r"^\d+(\.\d+)?$|^\.\d+$";

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NUMERIC_FIELD_PATTERN).expect("numeric field pattern is valid"))
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a free-text numeric field
pub fn parse_number(field: &str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    if !numeric_pattern().is_match(trimmed) {
        return Err(ValidationError::new(field, "must be a number"));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::new(field, "must be a number"))
}

// ============================================================================
// Ranges
// ============================================================================

/// Accepted inclusive range for a field in the given unit system
///
/// Returns None for fields without a range check.
pub fn field_range(field: &str, unit_system: UnitSystem) -> Option<(f64, f64)> {
    let metric = unit_system == UnitSystem::Metric;
    let range = match field {
        // 50-300 cm covers infants to tallest recorded humans
        "height" => if metric { (50.0, 300.0) } else { (20.0, 120.0) },
        "weight" => if metric { (20.0, 500.0) } else { (44.0, 1100.0) },
        "waist" | "hip" | "neck" | "bust" => if metric { (20.0, 250.0) } else { (8.0, 100.0) },
        "lift_weight" => if metric { (1.0, 1000.0) } else { (2.0, 2200.0) },
        "age" => (1.0, 120.0),
        "body_fat" => (2.0, 70.0),
        "bmi" => (10.0, 100.0),
        "bmr" => (500.0, 10000.0),
        "resting_heart_rate" => (20.0, 300.0),
        "reps" => (1.0, 30.0),
        "sets" => (1.0, 100.0),
        "met" => (0.9, 25.0),
        // 24 hours
        "minutes" => (1.0, 1440.0),
        _ => return None,
    };
    Some(range)
}

/// Check a parsed value against [`field_range`]
pub fn validate_range(field: &str, value: f64, unit_system: UnitSystem) -> Result<f64, ValidationError> {
    if value.is_nan() || value.is_infinite() {
        return Err(ValidationError::new(field, "must be a valid number"));
    }
    if let Some((min, max)) = field_range(field, unit_system) {
        if value < min {
            return Err(ValidationError::new(field, &format!("must be at least {}", min)));
        }
        if value > max {
            return Err(ValidationError::new(field, &format!("must be at most {}", max)));
        }
    }
    Ok(value)
}

/// Parse a free-text measurement and range-check it
pub fn validate_measurement(
    field: &str,
    raw: &str,
    unit_system: UnitSystem,
) -> Result<f64, ValidationError> {
    let value = parse_number(field, raw)?;
    validate_range(field, value, unit_system)
}

/// Parse a whole-number field (reps, sets)
pub fn validate_count(field: &str, raw: &str) -> Result<u32, ValidationError> {
    let value = validate_measurement(field, raw, UnitSystem::Metric)?;
    if value.fract() != 0.0 {
        return Err(ValidationError::new(field, "must be a whole number"));
    }
    Ok(value as u32)
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "height" => "Height",
        "weight" => "Weight",
        "age" => "Age",
        "gender" => "Gender",
        "waist" => "Waist",
        "hip" => "Hip",
        "neck" => "Neck",
        "bust" => "Bust",
        "activity_level" => "Activity Level",
        "lift_weight" => "Weight Lifted",
        "reps" => "Repetitions",
        "sets" => "Sets",
        "met" => "MET Value",
        "minutes" => "Duration (minutes)",
        "resting_heart_rate" => "Resting Heart Rate",
        "body_fat" | "bodyFat" | "bodyFatPercentage" => "Body Fat %",
        "bmi" => "BMI",
        "bmr" => "BMR",
        "calorieNeeds" | "dailyCalorieNeeds" => "Daily Calorie Needs",
        "idealWeight" => "Ideal Weight",
        "preferences" => "Preferences",
        _ => field_name,
    }
}

/// Convert a list of technical field names to user-friendly labels
pub fn get_missing_fields_labels(fields: &[String]) -> Vec<String> {
    fields
        .iter()
        .map(|f| get_field_display_label(f).to_string())
        .collect()
}
