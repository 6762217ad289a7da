//! Unit conversion module
//!
//! Every calculator accepts values in the unit system the user picked and
//! normalizes them to metric before running a formula. The conversions live
//! here so that formulas never see imperial numbers by accident.
//!
//! # Design Principles
//!
//! 1. **One switch**: a single [`UnitSystem`] decides the unit of every field
//! 2. **Type Safety**: units are explicit enums, not bare strings
//! 3. **Conversion at Boundaries**: convert on input/output, not inside formulas

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilograms in one pound
pub const KG_PER_LB: f64 = 0.453_592_37;

/// Centimeters in one inch
pub const CM_PER_INCH: f64 = 2.54;

/// Milliliters in one US fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.573_529_562_5;

// ============================================================================
// Unit System
// ============================================================================

/// The unit system every raw input in a profile is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Unit used for body weight and lifted loads
    pub fn weight_unit(&self) -> WeightUnit {
        match self {
            UnitSystem::Metric => WeightUnit::Kg,
            UnitSystem::Imperial => WeightUnit::Lbs,
        }
    }

    /// Unit used for height and circumferences (waist, hip, neck, bust)
    pub fn length_unit(&self) -> LengthUnit {
        match self {
            UnitSystem::Metric => LengthUnit::Cm,
            UnitSystem::Imperial => LengthUnit::Inches,
        }
    }

    /// Unit used for water volume
    pub fn volume_unit(&self) -> VolumeUnit {
        match self {
            UnitSystem::Metric => VolumeUnit::Liters,
            UnitSystem::Imperial => VolumeUnit::FluidOunces,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / KG_PER_LB,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length unit for height and body circumferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Cm,
    Inches,
}

impl LengthUnit {
    /// Convert from this unit to centimeters
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Cm => value,
            LengthUnit::Inches => value * CM_PER_INCH,
        }
    }

    /// Convert from centimeters to this unit
    pub fn from_cm(&self, cm: f64) -> f64 {
        match self {
            LengthUnit::Cm => cm,
            LengthUnit::Inches => cm / CM_PER_INCH,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::Inches => "in",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Water volume unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnit {
    #[default]
    Liters,
    FluidOunces,
}

impl VolumeUnit {
    /// Convert from this unit to liters
    pub fn to_liters(&self, value: f64) -> f64 {
        match self {
            VolumeUnit::Liters => value,
            VolumeUnit::FluidOunces => value * ML_PER_FL_OZ / 1000.0,
        }
    }

    /// Convert from liters to this unit
    pub fn from_liters(&self, liters: f64) -> f64 {
        match self {
            VolumeUnit::Liters => liters,
            VolumeUnit::FluidOunces => liters * 1000.0 / ML_PER_FL_OZ,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            VolumeUnit::Liters => "L",
            VolumeUnit::FluidOunces => "fl oz",
        }
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

// ============================================================================
// Height Display Helper
// ============================================================================

/// Height in whole feet and inches, used when displaying imperial heights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeetInchesHeight {
    pub feet: i32,
    /// Always 0-11
    pub inches: i32,
}

impl FeetInchesHeight {
    /// Create from total inches, rounded to the nearest inch before splitting
    pub fn from_total_inches(total_inches: f64) -> Self {
        let total = total_inches.round() as i32;
        Self {
            feet: total.div_euclid(12),
            inches: total.rem_euclid(12),
        }
    }
}

impl fmt::Display for FeetInchesHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}\"", self.feet, self.inches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Weight conversion round-trip preserves value
        #[test]
        fn prop_weight_roundtrip_kg(kg in 20.0f64..500.0) {
            let lbs = WeightUnit::Lbs.from_kg(kg);
            let back_to_kg = WeightUnit::Lbs.to_kg(lbs);
            prop_assert!((kg - back_to_kg).abs() < 0.0001,
                "Round-trip failed: {} -> {} -> {}", kg, lbs, back_to_kg);
        }

        #[test]
        fn prop_length_roundtrip_cm(cm in 50.0f64..250.0) {
            let inches = LengthUnit::Inches.from_cm(cm);
            let back_to_cm = LengthUnit::Inches.to_cm(inches);
            prop_assert!((cm - back_to_cm).abs() < 0.0001);
        }

        #[test]
        fn prop_volume_roundtrip_liters(liters in 0.5f64..10.0) {
            let oz = VolumeUnit::FluidOunces.from_liters(liters);
            let back = VolumeUnit::FluidOunces.to_liters(oz);
            prop_assert!((liters - back).abs() < 0.0001);
        }

        /// Property: Metric units are identity conversions
        #[test]
        fn prop_metric_identity(value in 0.0f64..500.0) {
            prop_assert_eq!(WeightUnit::Kg.to_kg(value), value);
            prop_assert_eq!(LengthUnit::Cm.to_cm(value), value);
            prop_assert_eq!(VolumeUnit::Liters.to_liters(value), value);
        }
    }

    #[test]
    fn test_known_conversions() {
        // 100 lb = 45.359 kg
        assert!((WeightUnit::Lbs.to_kg(100.0) - 45.359).abs() < 0.001);
        // 70 in = 177.8 cm
        assert!((LengthUnit::Inches.to_cm(70.0) - 177.8).abs() < 0.001);
        // 1 L = 33.814 fl oz
        assert!((VolumeUnit::FluidOunces.from_liters(1.0) - 33.814).abs() < 0.001);
    }

    #[test]
    fn test_unit_system_units() {
        assert_eq!(UnitSystem::Metric.weight_unit(), WeightUnit::Kg);
        assert_eq!(UnitSystem::Metric.length_unit(), LengthUnit::Cm);
        assert_eq!(UnitSystem::Imperial.weight_unit(), WeightUnit::Lbs);
        assert_eq!(UnitSystem::Imperial.length_unit(), LengthUnit::Inches);
        assert_eq!(UnitSystem::Imperial.volume_unit(), VolumeUnit::FluidOunces);
    }

    #[test]
    fn test_unit_system_parsing() {
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("stone".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_feet_inches_display() {
        let height = FeetInchesHeight::from_total_inches(74.0);
        assert_eq!(height.feet, 6);
        assert_eq!(format!("{}", height), "6'2\"");
    }

    #[test]
    fn test_feet_inches_carries_into_feet() {
        assert_eq!(FeetInchesHeight::from_total_inches(71.6).to_string(), "6'0\"");
        assert_eq!(FeetInchesHeight::from_total_inches(71.4).to_string(), "5'11\"");
        assert_eq!(
            FeetInchesHeight::from_total_inches(59.5),
            FeetInchesHeight { feet: 5, inches: 0 }
        );
    }
}
