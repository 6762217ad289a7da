//! Category classifiers
//!
//! Step functions mapping a score to the band that contains it. Every table
//! uses strictly ascending exclusive upper bounds and ends in a catch-all
//! band, so each classifier is total: a score on a boundary belongs to the
//! band above it (BMI 18.5 is "Normal weight").
//!
//! Some tables look alike (the two BMI tables, for instance). They are kept
//! separate on purpose: each calculator owns its labels and cut-offs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::formulas::Gender;

macro_rules! impl_display_label {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

// ============================================================================
// BMI
// ============================================================================

/// BMI category used by the BMI calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// <18.5 Underweight, <25 Normal weight, <30 Overweight, else Obese
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    match bmi {
        v if v < 18.5 => BmiCategory::Underweight,
        v if v < 25.0 => BmiCategory::NormalWeight,
        v if v < 30.0 => BmiCategory::Overweight,
        _ => BmiCategory::Obese,
    }
}

/// WHO BMI class, used where obesity needs to be graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhoBmiClass {
    SeverelyUnderweight,
    Underweight,
    Normal,
    Overweight,
    ObeseClass1,
    ObeseClass2,
    ObeseClass3,
}

impl WhoBmiClass {
    /// Get the BMI range for this class
    pub fn range(&self) -> (f64, f64) {
        match self {
            WhoBmiClass::SeverelyUnderweight => (0.0, 16.0),
            WhoBmiClass::Underweight => (16.0, 18.5),
            WhoBmiClass::Normal => (18.5, 25.0),
            WhoBmiClass::Overweight => (25.0, 30.0),
            WhoBmiClass::ObeseClass1 => (30.0, 35.0),
            WhoBmiClass::ObeseClass2 => (35.0, 40.0),
            WhoBmiClass::ObeseClass3 => (40.0, f64::INFINITY),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WhoBmiClass::SeverelyUnderweight => "Severely Underweight",
            WhoBmiClass::Underweight => "Underweight",
            WhoBmiClass::Normal => "Normal/Healthy",
            WhoBmiClass::Overweight => "Overweight",
            WhoBmiClass::ObeseClass1 => "Obese (Class I)",
            WhoBmiClass::ObeseClass2 => "Obese (Class II)",
            WhoBmiClass::ObeseClass3 => "Obese (Class III)",
        }
    }
}

/// Classify BMI into a WHO class
pub fn classify_bmi_who(bmi: f64) -> WhoBmiClass {
    match bmi {
        v if v < 16.0 => WhoBmiClass::SeverelyUnderweight,
        v if v < 18.5 => WhoBmiClass::Underweight,
        v if v < 25.0 => WhoBmiClass::Normal,
        v if v < 30.0 => WhoBmiClass::Overweight,
        v if v < 35.0 => WhoBmiClass::ObeseClass1,
        v if v < 40.0 => WhoBmiClass::ObeseClass2,
        _ => WhoBmiClass::ObeseClass3,
    }
}

// ============================================================================
// Body Fat
// ============================================================================

/// Body fat zone (ACE chart)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatZone {
    EssentialFat,
    Athletes,
    Fitness,
    Average,
    Obese,
}

impl BodyFatZone {
    pub fn label(&self) -> &'static str {
        match self {
            BodyFatZone::EssentialFat => "Essential fat",
            BodyFatZone::Athletes => "Athletes",
            BodyFatZone::Fitness => "Fitness",
            BodyFatZone::Average => "Average",
            BodyFatZone::Obese => "Obese",
        }
    }
}

/// Classify body fat percentage; men and women use separate tables
pub fn classify_body_fat(body_fat_percent: f64, gender: Gender) -> BodyFatZone {
    match gender {
        Gender::Male => match body_fat_percent {
            v if v < 6.0 => BodyFatZone::EssentialFat,
            v if v < 14.0 => BodyFatZone::Athletes,
            v if v < 18.0 => BodyFatZone::Fitness,
            v if v < 25.0 => BodyFatZone::Average,
            _ => BodyFatZone::Obese,
        },
        Gender::Female => match body_fat_percent {
            v if v < 14.0 => BodyFatZone::EssentialFat,
            v if v < 21.0 => BodyFatZone::Athletes,
            v if v < 25.0 => BodyFatZone::Fitness,
            v if v < 32.0 => BodyFatZone::Average,
            _ => BodyFatZone::Obese,
        },
    }
}

// ============================================================================
// Waist-to-Height Ratio
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhtrCategory {
    TakeCare,
    Ok,
    ConsiderAction,
    TakeAction,
}

impl WhtrCategory {
    pub fn label(&self) -> &'static str {
        match self {
            WhtrCategory::TakeCare => "Take care",
            WhtrCategory::Ok => "OK",
            WhtrCategory::ConsiderAction => "Consider action",
            WhtrCategory::TakeAction => "Take action",
        }
    }
}

/// <0.4 Take care, <0.5 OK, <0.6 Consider action, else Take action
pub fn classify_waist_to_height(ratio: f64) -> WhtrCategory {
    match ratio {
        v if v < 0.4 => WhtrCategory::TakeCare,
        v if v < 0.5 => WhtrCategory::Ok,
        v if v < 0.6 => WhtrCategory::ConsiderAction,
        _ => WhtrCategory::TakeAction,
    }
}

// ============================================================================
// VO2max
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vo2MaxRating {
    Poor,
    Fair,
    Good,
    Excellent,
    Superior,
}

impl Vo2MaxRating {
    pub fn label(&self) -> &'static str {
        match self {
            Vo2MaxRating::Poor => "Poor",
            Vo2MaxRating::Fair => "Fair",
            Vo2MaxRating::Good => "Good",
            Vo2MaxRating::Excellent => "Excellent",
            Vo2MaxRating::Superior => "Superior",
        }
    }
}

/// Classify VO2max (ml/kg/min) with gendered tables
pub fn classify_vo2_max(vo2_max: f64, gender: Gender) -> Vo2MaxRating {
    let bounds: [f64; 4] = match gender {
        Gender::Male => [30.0, 37.0, 44.0, 51.0],
        Gender::Female => [25.0, 31.0, 37.0, 44.0],
    };

    match vo2_max {
        v if v < bounds[0] => Vo2MaxRating::Poor,
        v if v < bounds[1] => Vo2MaxRating::Fair,
        v if v < bounds[2] => Vo2MaxRating::Good,
        v if v < bounds[3] => Vo2MaxRating::Excellent,
        _ => Vo2MaxRating::Superior,
    }
}

// ============================================================================
// Diabetes Risk
// ============================================================================

/// Diabetes in the family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FamilyHistory {
    #[default]
    None,
    /// Grandparent, aunt, uncle or first cousin
    SecondDegree,
    /// Parent, sibling or child
    FirstDegree,
}

/// Answers scored by the diabetes risk questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiabetesRiskFactors {
    pub age_years: f64,
    pub bmi: f64,
    pub waist_cm: f64,
    pub gender: Gender,
    /// At least 30 minutes of activity every day
    pub physically_active: bool,
    /// Vegetables, fruit or berries every day
    pub daily_vegetables: bool,
    pub blood_pressure_medication: bool,
    pub high_blood_glucose_history: bool,
    pub family_history: FamilyHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiabetesRisk {
    Low,
    SlightlyElevated,
    Moderate,
    High,
    VeryHigh,
}

impl DiabetesRisk {
    pub fn label(&self) -> &'static str {
        match self {
            DiabetesRisk::Low => "Low",
            DiabetesRisk::SlightlyElevated => "Slightly elevated",
            DiabetesRisk::Moderate => "Moderate",
            DiabetesRisk::High => "High",
            DiabetesRisk::VeryHigh => "Very high",
        }
    }
}

fn age_points(age_years: f64) -> u32 {
    match age_years {
        v if v < 45.0 => 0,
        v if v < 55.0 => 2,
        v if v < 65.0 => 3,
        _ => 4,
    }
}

fn bmi_points(bmi: f64) -> u32 {
    match bmi {
        v if v < 25.0 => 0,
        v if v < 30.0 => 1,
        _ => 3,
    }
}

fn waist_points(waist_cm: f64, gender: Gender) -> u32 {
    let (low, high) = match gender {
        Gender::Male => (94.0, 102.0),
        Gender::Female => (80.0, 88.0),
    };
    match waist_cm {
        v if v < low => 0,
        v if v < high => 3,
        _ => 4,
    }
}

/// Questionnaire score (0-26)
pub fn diabetes_risk_score(factors: &DiabetesRiskFactors) -> u32 {
    let mut score = age_points(factors.age_years)
        + bmi_points(factors.bmi)
        + waist_points(factors.waist_cm, factors.gender);

    if !factors.physically_active {
        score += 2;
    }
    if !factors.daily_vegetables {
        score += 1;
    }
    if factors.blood_pressure_medication {
        score += 2;
    }
    if factors.high_blood_glucose_history {
        score += 5;
    }
    score += match factors.family_history {
        FamilyHistory::None => 0,
        FamilyHistory::SecondDegree => 3,
        FamilyHistory::FirstDegree => 5,
    };
    score
}

/// <7 Low, <12 Slightly elevated, <15 Moderate, <21 High, else Very high
pub fn classify_diabetes_risk(score: u32) -> DiabetesRisk {
    match score {
        0..=6 => DiabetesRisk::Low,
        7..=11 => DiabetesRisk::SlightlyElevated,
        12..=14 => DiabetesRisk::Moderate,
        15..=20 => DiabetesRisk::High,
        _ => DiabetesRisk::VeryHigh,
    }
}

impl_display_label!(
    BmiCategory,
    WhoBmiClass,
    BodyFatZone,
    WhtrCategory,
    Vo2MaxRating,
    DiabetesRisk,
);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(12.0, BmiCategory::Underweight)]
    #[case(18.49, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::NormalWeight)]
    #[case(22.857, BmiCategory::NormalWeight)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(29.99, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obese)]
    fn test_bmi_bands(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    #[test]
    fn test_bmi_labels() {
        assert_eq!(classify_bmi(22.857).label(), "Normal weight");
        assert_eq!(classify_bmi(18.5).to_string(), "Normal weight");
    }

    #[test]
    fn test_who_bmi_classes() {
        assert_eq!(classify_bmi_who(15.0), WhoBmiClass::SeverelyUnderweight);
        assert_eq!(classify_bmi_who(17.0), WhoBmiClass::Underweight);
        assert_eq!(classify_bmi_who(22.0), WhoBmiClass::Normal);
        assert_eq!(classify_bmi_who(27.0), WhoBmiClass::Overweight);
        assert_eq!(classify_bmi_who(32.0), WhoBmiClass::ObeseClass1);
        assert_eq!(classify_bmi_who(37.0), WhoBmiClass::ObeseClass2);
        assert_eq!(classify_bmi_who(40.0), WhoBmiClass::ObeseClass3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: a WHO class always contains the score it was picked for
        #[test]
        fn prop_who_class_range_contains_score(bmi in 0.0f64..80.0) {
            let (low, high) = classify_bmi_who(bmi).range();
            prop_assert!(bmi >= low && bmi < high);
        }

        /// Property: classifiers are monotone; a larger score never lands in a lower band
        #[test]
        fn prop_bmi_monotone(a in 0.0f64..60.0, b in 0.0f64..60.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_bmi(lo) as u8 <= classify_bmi(hi) as u8);
            prop_assert!(classify_waist_to_height(lo / 60.0) as u8 <= classify_waist_to_height(hi / 60.0) as u8);
        }
    }

    #[rstest]
    #[case(5.99, Gender::Male, BodyFatZone::EssentialFat)]
    #[case(6.0, Gender::Male, BodyFatZone::Athletes)]
    #[case(17.0, Gender::Male, BodyFatZone::Fitness)]
    #[case(20.0, Gender::Male, BodyFatZone::Average)]
    #[case(25.0, Gender::Male, BodyFatZone::Obese)]
    #[case(13.9, Gender::Female, BodyFatZone::EssentialFat)]
    #[case(20.0, Gender::Female, BodyFatZone::Athletes)]
    #[case(21.0, Gender::Female, BodyFatZone::Fitness)]
    #[case(28.0, Gender::Female, BodyFatZone::Average)]
    #[case(32.0, Gender::Female, BodyFatZone::Obese)]
    fn test_body_fat_zones(
        #[case] body_fat: f64,
        #[case] gender: Gender,
        #[case] expected: BodyFatZone,
    ) {
        assert_eq!(classify_body_fat(body_fat, gender), expected);
    }

    #[test]
    fn test_waist_to_height_bands() {
        assert_eq!(classify_waist_to_height(0.39), WhtrCategory::TakeCare);
        assert_eq!(classify_waist_to_height(0.4), WhtrCategory::Ok);
        assert_eq!(classify_waist_to_height(0.5), WhtrCategory::ConsiderAction);
        assert_eq!(classify_waist_to_height(0.6), WhtrCategory::TakeAction);
    }

    #[test]
    fn test_vo2_max_ratings() {
        assert_eq!(classify_vo2_max(48.45, Gender::Male), Vo2MaxRating::Excellent);
        assert_eq!(classify_vo2_max(48.45, Gender::Female), Vo2MaxRating::Superior);
        assert_eq!(classify_vo2_max(29.9, Gender::Male), Vo2MaxRating::Poor);
        assert_eq!(classify_vo2_max(25.0, Gender::Female), Vo2MaxRating::Fair);
    }

    fn low_risk_factors() -> DiabetesRiskFactors {
        DiabetesRiskFactors {
            age_years: 30.0,
            bmi: 22.0,
            waist_cm: 80.0,
            gender: Gender::Male,
            physically_active: true,
            daily_vegetables: true,
            blood_pressure_medication: false,
            high_blood_glucose_history: false,
            family_history: FamilyHistory::None,
        }
    }

    #[test]
    fn test_diabetes_risk_low() {
        let score = diabetes_risk_score(&low_risk_factors());
        assert_eq!(score, 0);
        assert_eq!(classify_diabetes_risk(score), DiabetesRisk::Low);
    }

    #[test]
    fn test_diabetes_risk_accumulates() {
        let factors = DiabetesRiskFactors {
            age_years: 58.0,
            bmi: 31.0,
            waist_cm: 90.0,
            gender: Gender::Female,
            physically_active: false,
            family_history: FamilyHistory::FirstDegree,
            ..low_risk_factors()
        };
        // 3 (age) + 3 (bmi) + 4 (waist) + 2 (inactive) + 5 (family)
        let score = diabetes_risk_score(&factors);
        assert_eq!(score, 17);
        assert_eq!(classify_diabetes_risk(score), DiabetesRisk::High);
    }

    #[test]
    fn test_diabetes_risk_bands() {
        assert_eq!(classify_diabetes_risk(6), DiabetesRisk::Low);
        assert_eq!(classify_diabetes_risk(7), DiabetesRisk::SlightlyElevated);
        assert_eq!(classify_diabetes_risk(11), DiabetesRisk::SlightlyElevated);
        assert_eq!(classify_diabetes_risk(12), DiabetesRisk::Moderate);
        assert_eq!(classify_diabetes_risk(14), DiabetesRisk::Moderate);
        assert_eq!(classify_diabetes_risk(15), DiabetesRisk::High);
        assert_eq!(classify_diabetes_risk(20), DiabetesRisk::High);
        assert_eq!(classify_diabetes_risk(21), DiabetesRisk::VeryHigh);
        assert_eq!(classify_diabetes_risk(26), DiabetesRisk::VeryHigh);
    }
}
