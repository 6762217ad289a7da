//! Formula library
//!
//! One pure function per calculator. Every function maps a fixed set of
//! numeric inputs to a number (or a small struct of numbers). Formulas take
//! metric values unless the name says otherwise; the calculators module
//! normalizes user input before calling in here.
//!
//! Inputs are not guarded against zero divisors or non-finite values. Callers
//! run the validation boundary first.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::{UnitSystem, WeightUnit};

// ============================================================================
// Shared Input Types
// ============================================================================

/// Gender used for physiological formulas and gendered threshold tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Activity level, the multiplier key shared by the energy and needs formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise or physical job",
        }
    }

    fn index(&self) -> usize {
        match self {
            ActivityLevel::Sedentary => 0,
            ActivityLevel::LightlyActive => 1,
            ActivityLevel::ModeratelyActive => 2,
            ActivityLevel::VeryActive => 3,
            ActivityLevel::ExtraActive => 4,
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" | "light" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" | "moderate" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" | "active" => Ok(ActivityLevel::VeryActive),
            "extra_active" | "extra" => Ok(ActivityLevel::ExtraActive),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

/// Training goal, selects the protein table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProteinGoal {
    #[default]
    Maintain,
    LoseFat,
    BuildMuscle,
}

impl ProteinGoal {
    fn index(&self) -> usize {
        match self {
            ProteinGoal::Maintain => 0,
            ProteinGoal::LoseFat => 1,
            ProteinGoal::BuildMuscle => 2,
        }
    }
}

// ============================================================================
// BMI and BSA
// ============================================================================

/// Imperial BMI conversion factor
pub const BMI_IMPERIAL_FACTOR: f64 = 703.0;

/// Metric BMI: weight(kg) / height(m)²
pub fn bmi_metric(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Imperial BMI: weight(lb) / height(in)² × 703
pub fn bmi_imperial(weight_lb: f64, height_in: f64) -> f64 {
    weight_lb / (height_in * height_in) * BMI_IMPERIAL_FACTOR
}

/// BMI from values expressed in the given unit system
pub fn bmi(unit_system: UnitSystem, weight: f64, height: f64) -> f64 {
    match unit_system {
        UnitSystem::Metric => bmi_metric(weight, height),
        UnitSystem::Imperial => bmi_imperial(weight, height),
    }
}

/// Weight range (kg) giving a BMI of 18.5-25 at the given height
pub fn healthy_weight_range_kg(height_cm: f64) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    let height_m_sq = height_m * height_m;
    (18.5 * height_m_sq, 25.0 * height_m_sq)
}

/// Body surface area in m² (Du Bois)
///
/// BSA = 0.007184 × height(cm)^0.725 × weight(kg)^0.425
pub fn body_surface_area(height_cm: f64, weight_kg: f64) -> f64 {
    0.007184 * height_cm.powf(0.725) * weight_kg.powf(0.425)
}

// ============================================================================
// Energy: BMR, RMR, TDEE
// ============================================================================

/// Basal Metabolic Rate using Mifflin-St Jeor
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: f64, gender: Gender) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + mifflin_gender_offset(gender)
}

fn mifflin_gender_offset(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    }
}

/// Resting Metabolic Rate using the revised Harris-Benedict equation
///
/// Men: 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
pub fn rmr_harris_benedict(weight_kg: f64, height_cm: f64, age_years: f64, gender: Gender) -> f64 {
    match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years,
        Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years,
    }
}

/// BMR using Katch-McArdle (lean mass based)
///
/// BMR = 370 + 21.6 × LBM(kg), LBM = weight × (1 - body_fat_percent/100)
pub fn bmr_katch_mcardle(weight_kg: f64, body_fat_percent: f64) -> f64 {
    let lean_body_mass = weight_kg * (1.0 - body_fat_percent / 100.0);
    370.0 + 21.6 * lean_body_mass
}

/// Daily calorie floor applied to the weight-loss target
pub const MIN_LOSS_CALORIES: f64 = 1200.0;

/// Calorie needs derived from a BMR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieNeeds {
    /// Activity multiplier used
    pub activity_multiplier: f64,
    /// Total Daily Energy Expenditure
    pub maintenance: f64,
    /// Calories for weight loss: 500 deficit, floored at 1200 and never above maintenance
    pub weight_loss: f64,
    /// Calories for weight gain (500 surplus)
    pub weight_gain: f64,
}

/// Total Daily Energy Expenditure: TDEE = BMR × activity multiplier
pub fn calorie_needs(bmr: f64, activity_level: ActivityLevel) -> CalorieNeeds {
    let multiplier = activity_level.multiplier();
    let tdee = bmr * multiplier;
    CalorieNeeds {
        activity_multiplier: multiplier,
        maintenance: tdee,
        weight_loss: (tdee - 500.0).max(MIN_LOSS_CALORIES).min(tdee),
        weight_gain: tdee + 500.0,
    }
}

/// Metabolic age never reported below this
pub const METABOLIC_AGE_FLOOR: f64 = 18.0;

/// Metabolic age: the age at which Mifflin-St Jeor predicts the same BMR as
/// the lean-mass based Katch-McArdle equation.
///
/// Lean, high-BMR users push the raw value below zero; the result is floored
/// at 18 years rather than corrected.
pub fn metabolic_age(weight_kg: f64, height_cm: f64, body_fat_percent: f64, gender: Gender) -> f64 {
    let measured = bmr_katch_mcardle(weight_kg, body_fat_percent);
    let raw =
        (10.0 * weight_kg + 6.25 * height_cm + mifflin_gender_offset(gender) - measured) / 5.0;
    raw.max(METABOLIC_AGE_FLOOR)
}

// ============================================================================
// Body Composition
// ============================================================================

/// Body fat percentage using the US Navy circumference method (all cm)
///
/// Men: 495 / (1.0324 - 0.19077 × log10(waist - neck) + 0.15456 × log10(height)) - 450
/// Women: 495 / (1.29579 - 0.35004 × log10(waist + hip - neck) + 0.22100 × log10(height)) - 450
pub fn body_fat_navy(
    gender: Gender,
    height_cm: f64,
    waist_cm: f64,
    neck_cm: f64,
    hip_cm: f64,
) -> f64 {
    let density = match gender {
        Gender::Male => {
            1.0324 - 0.19077 * (waist_cm - neck_cm).log10() + 0.15456 * height_cm.log10()
        }
        Gender::Female => {
            1.29579 - 0.35004 * (waist_cm + hip_cm - neck_cm).log10()
                + 0.22100 * height_cm.log10()
        }
    };
    495.0 / density - 450.0
}

/// Body density in g/cm³ from body fat percentage (Siri, solved for density)
pub fn body_density(body_fat_percent: f64) -> f64 {
    495.0 / (body_fat_percent + 450.0)
}

/// Lean body mass in kg (Boer)
///
/// Men: 0.407 × weight(kg) + 0.267 × height(cm) - 19.2
/// Women: 0.252 × weight(kg) + 0.473 × height(cm) - 48.3
pub fn lean_body_mass_boer(weight_kg: f64, height_cm: f64, gender: Gender) -> f64 {
    match gender {
        Gender::Male => 0.407 * weight_kg + 0.267 * height_cm - 19.2,
        Gender::Female => 0.252 * weight_kg + 0.473 * height_cm - 48.3,
    }
}

/// Waist-to-height ratio; both values in the same unit
pub fn waist_to_height_ratio(waist: f64, height: f64) -> f64 {
    waist / height
}

/// Lift divided by bodyweight; both values in the same unit
pub fn strength_to_weight_ratio(lift: f64, bodyweight: f64) -> f64 {
    lift / bodyweight
}

// ============================================================================
// Ideal Weight
// ============================================================================

/// Hamwi ideal weight with its ±10% band, in kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealWeightRange {
    pub ideal_kg: f64,
    pub min_kg: f64,
    pub max_kg: f64,
}

impl IdealWeightRange {
    /// Format the band in the given unit, e.g. `"68.9 - 84.2 kg"`
    pub fn format(&self, unit: WeightUnit) -> String {
        format!(
            "{:.1} - {:.1} {}",
            unit.from_kg(self.min_kg),
            unit.from_kg(self.max_kg),
            unit
        )
    }
}

/// Ideal body weight (Hamwi)
///
/// Men: 48.0 kg + 2.7 kg per inch over 5 ft
/// Women: 45.5 kg + 2.2 kg per inch over 5 ft
pub fn ideal_weight_hamwi(height_cm: f64, gender: Gender) -> IdealWeightRange {
    let height_inches = height_cm / 2.54;
    let inches_over_5ft = (height_inches - 60.0).max(0.0);

    let ideal_kg = match gender {
        Gender::Male => 48.0 + 2.7 * inches_over_5ft,
        Gender::Female => 45.5 + 2.2 * inches_over_5ft,
    };

    IdealWeightRange {
        ideal_kg,
        min_kg: ideal_kg * 0.9,
        max_kg: ideal_kg * 1.1,
    }
}

// ============================================================================
// Body Shape
// ============================================================================

/// Body shape decided from bust/waist/hip circumferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    Hourglass,
    Pear,
    InvertedTriangle,
    Rectangle,
}

impl BodyShape {
    pub fn label(&self) -> &'static str {
        match self {
            BodyShape::Hourglass => "Hourglass",
            BodyShape::Pear => "Pear",
            BodyShape::InvertedTriangle => "Inverted Triangle",
            BodyShape::Rectangle => "Rectangle",
        }
    }
}

impl fmt::Display for BodyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bust and hip count as balanced within this fraction of the larger one
const SHAPE_BALANCE_BAND: f64 = 0.05;
/// A defined waist is at least this fraction smaller than bust/hip
const SHAPE_WAIST_BAND: f64 = 0.25;

/// Classify body shape. Any length unit works as long as all three match.
///
/// Checked in order hourglass, pear, inverted triangle; rectangle otherwise.
pub fn body_shape(bust: f64, waist: f64, hip: f64) -> BodyShape {
    let waist_ceiling = 1.0 - SHAPE_WAIST_BAND;
    let balanced = (bust - hip).abs() <= SHAPE_BALANCE_BAND * bust.max(hip);

    if balanced && waist <= waist_ceiling * bust.min(hip) {
        BodyShape::Hourglass
    } else if hip > bust * (1.0 + SHAPE_BALANCE_BAND) && waist / hip >= waist_ceiling {
        BodyShape::Pear
    } else if bust > hip * (1.0 + SHAPE_BALANCE_BAND) && waist / bust >= waist_ceiling {
        BodyShape::InvertedTriangle
    } else {
        BodyShape::Rectangle
    }
}

// ============================================================================
// Strength
// ============================================================================

/// One-rep max (Epley): weight × (1 + reps/30)
pub fn one_rep_max(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + reps as f64 / 30.0)
}

/// Percentage of 1RM and the rep band it is typically lifted for
pub const ONE_REP_MAX_BANDS: [(u32, &str); 8] = [
    (95, "2-3"),
    (90, "3-4"),
    (85, "5-6"),
    (80, "7-8"),
    (75, "9-10"),
    (70, "11-12"),
    (65, "13-14"),
    (60, "15+"),
];

/// One row of the 1RM percentage table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageRow {
    pub percent: u32,
    pub weight: f64,
    pub reps: String,
}

/// Training loads for each band of [`ONE_REP_MAX_BANDS`]
pub fn one_rep_max_table(one_rep_max: f64) -> Vec<PercentageRow> {
    ONE_REP_MAX_BANDS
        .iter()
        .map(|(percent, reps)| PercentageRow {
            percent: *percent,
            weight: one_rep_max * *percent as f64 / 100.0,
            reps: (*reps).to_string(),
        })
        .collect()
}

/// Training volume load: sets × reps × weight
pub fn workout_volume(sets: u32, reps: u32, weight: f64) -> f64 {
    sets as f64 * reps as f64 * weight
}

/// Calories burned for an activity of the given MET value
///
/// kcal = MET × 3.5 × weight(kg) / 200 × minutes
pub fn met_calories(met: f64, weight_kg: f64, minutes: f64) -> f64 {
    met * 3.5 * weight_kg / 200.0 * minutes
}

// ============================================================================
// Cardio
// ============================================================================

/// Age-predicted maximum heart rate: 220 - age
pub fn max_heart_rate(age_years: f64) -> f64 {
    220.0 - age_years
}

/// VO2max in ml/kg/min (Uth-Sørensen-Overgaard-Pedersen)
///
/// VO2max = 15.3 × HRmax / HRrest
pub fn vo2_max(age_years: f64, resting_heart_rate: f64) -> f64 {
    15.3 * max_heart_rate(age_years) / resting_heart_rate
}

/// A target heart-rate zone in beats per minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateZone {
    pub name: String,
    pub min_intensity: u32,
    pub max_intensity: u32,
    pub min_bpm: f64,
    pub max_bpm: f64,
}

const HEART_RATE_ZONES: [(&str, u32, u32); 5] = [
    ("Very light", 50, 60),
    ("Light", 60, 70),
    ("Moderate", 70, 80),
    ("Hard", 80, 90),
    ("Maximum", 90, 100),
];

/// Target zones using the Karvonen heart-rate-reserve method
pub fn heart_rate_zones(age_years: f64, resting_heart_rate: f64) -> Vec<HeartRateZone> {
    let reserve = max_heart_rate(age_years) - resting_heart_rate;
    let at = |intensity: u32| resting_heart_rate + reserve * intensity as f64 / 100.0;

    HEART_RATE_ZONES
        .iter()
        .map(|(name, low, high)| HeartRateZone {
            name: (*name).to_string(),
            min_intensity: *low,
            max_intensity: *high,
            min_bpm: at(*low),
            max_bpm: at(*high),
        })
        .collect()
}

// ============================================================================
// Daily Needs (water and macronutrients)
// ============================================================================

// Each table is indexed by `ActivityLevel::index`. Metric tables are per kg of
// bodyweight, imperial tables per lb; they are tabulated independently.

/// Liters of water per kg
const WATER_L_PER_KG: [f64; 5] = [0.030, 0.035, 0.040, 0.045, 0.050];
/// Fluid ounces of water per lb
const WATER_OZ_PER_LB: [f64; 5] = [0.46, 0.54, 0.61, 0.69, 0.77];

/// Grams of protein per kg, columns: maintain, lose fat, build muscle
const PROTEIN_G_PER_KG: [[f64; 3]; 5] = [
    [0.8, 1.2, 1.6],
    [1.0, 1.4, 1.8],
    [1.2, 1.6, 2.0],
    [1.4, 1.8, 2.2],
    [1.6, 2.0, 2.4],
];
/// Grams of protein per lb, columns: maintain, lose fat, build muscle
const PROTEIN_G_PER_LB: [[f64; 3]; 5] = [
    [0.36, 0.55, 0.73],
    [0.45, 0.64, 0.82],
    [0.55, 0.73, 0.91],
    [0.64, 0.82, 1.0],
    [0.73, 0.91, 1.1],
];

const CARB_G_PER_KG: [f64; 5] = [3.0, 4.0, 5.0, 6.0, 7.0];
const CARB_G_PER_LB: [f64; 5] = [1.4, 1.8, 2.3, 2.7, 3.2];

const FAT_G_PER_KG: [f64; 5] = [0.8, 0.9, 1.0, 1.1, 1.2];
const FAT_G_PER_LB: [f64; 5] = [0.36, 0.41, 0.45, 0.5, 0.55];

/// Daily water intake. Weight is in the unit system's weight unit; the result
/// is in its volume unit (liters or fluid ounces).
pub fn water_intake(unit_system: UnitSystem, weight: f64, activity_level: ActivityLevel) -> f64 {
    let table = match unit_system {
        UnitSystem::Metric => &WATER_L_PER_KG,
        UnitSystem::Imperial => &WATER_OZ_PER_LB,
    };
    weight * table[activity_level.index()]
}

/// Daily protein target in grams
pub fn protein_target(
    unit_system: UnitSystem,
    weight: f64,
    activity_level: ActivityLevel,
    goal: ProteinGoal,
) -> f64 {
    let table = match unit_system {
        UnitSystem::Metric => &PROTEIN_G_PER_KG,
        UnitSystem::Imperial => &PROTEIN_G_PER_LB,
    };
    weight * table[activity_level.index()][goal.index()]
}

/// Daily carbohydrate target in grams
pub fn carb_target(unit_system: UnitSystem, weight: f64, activity_level: ActivityLevel) -> f64 {
    let table = match unit_system {
        UnitSystem::Metric => &CARB_G_PER_KG,
        UnitSystem::Imperial => &CARB_G_PER_LB,
    };
    weight * table[activity_level.index()]
}

/// Daily fat target in grams
pub fn fat_target(unit_system: UnitSystem, weight: f64, activity_level: ActivityLevel) -> f64 {
    let table = match unit_system {
        UnitSystem::Metric => &FAT_G_PER_KG,
        UnitSystem::Imperial => &FAT_G_PER_LB,
    };
    weight * table[activity_level.index()]
}
