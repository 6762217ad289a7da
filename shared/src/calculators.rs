//! Calculators
//!
//! Each calculator takes the current [`Profile`] and the submitted form,
//! validates the form in the profile's unit system, runs its formula,
//! classifies the result, and returns a [`Calculation`]: the result to show
//! plus the [`ProfilePatch`] that records inputs and outputs for the next
//! calculator. Calculators never touch the store themselves.
//!
//! Forms carry raw text exactly as typed. `from_profile` builds a form
//! pre-filled with what the profile already knows.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifiers::{
    classify_bmi, classify_bmi_who, classify_body_fat, classify_diabetes_risk,
    classify_vo2_max, classify_waist_to_height, diabetes_risk_score, BmiCategory, BodyFatZone,
    DiabetesRisk, DiabetesRiskFactors, FamilyHistory, Vo2MaxRating, WhoBmiClass, WhtrCategory,
};
use crate::errors::CalculatorError;
use crate::formulas::{self, ActivityLevel, BodyShape, CalorieNeeds, Gender, HeartRateZone};
use crate::formulas::{PercentageRow, ProteinGoal};
use crate::profile::{Profile, ProfilePatch, ProfileStore};
use crate::units::UnitSystem;
use crate::validation::{validate_count, validate_measurement, ValidationError};

// ============================================================================
// Outcome Types
// ============================================================================

/// Inline notice shown next to a result without blocking it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub field: String,
    pub message: String,
}

/// A finished calculation and the profile changes it implies
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation<T> {
    pub result: T,
    pub patch: ProfilePatch,
    pub advisories: Vec<Advisory>,
}

impl<T> Calculation<T> {
    fn new(calculator: &'static str, result: T, patch: ProfilePatch) -> Self {
        debug!(calculator, "Calculation complete");
        Self {
            result,
            patch,
            advisories: Vec::new(),
        }
    }

    fn with_advisories(mut self, advisories: Vec<Advisory>) -> Self {
        self.advisories = advisories;
        self
    }

    /// Write the patch into the store
    pub fn apply_to(&self, store: &mut ProfileStore) {
        store.patch(&self.patch);
    }
}

pub type CalculatorResult<T> = Result<Calculation<T>, CalculatorError>;

// ============================================================================
// Helpers
// ============================================================================

fn required<T>(field: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::new(field, "is required"))
}

fn typed(raw: &str) -> Option<String> {
    Some(raw.trim().to_string())
}

fn length_cm(field: &str, raw: &str, unit_system: UnitSystem) -> Result<f64, ValidationError> {
    let value = validate_measurement(field, raw, unit_system)?;
    Ok(unit_system.length_unit().to_cm(value))
}

fn weight_kg(field: &str, raw: &str, unit_system: UnitSystem) -> Result<f64, ValidationError> {
    let value = validate_measurement(field, raw, unit_system)?;
    Ok(unit_system.weight_unit().to_kg(value))
}

/// Resolve a value that another calculator normally produces
///
/// A manually entered value takes precedence. When only the manual value is
/// available an advisory explains where it came from; when neither is, the
/// calculation cannot run.
fn resolve_prerequisite(
    stored: Option<f64>,
    manual: &str,
    field: &'static str,
    producer: &'static str,
    unit_system: UnitSystem,
) -> Result<(f64, Vec<Advisory>), CalculatorError> {
    if !manual.trim().is_empty() {
        let value = validate_measurement(field, manual, unit_system)?;
        let advisories = if stored.is_none() {
            vec![Advisory {
                field: field.to_string(),
                message: format!(
                    "No {} result in this session; using the value entered. Run the {} calculator for a computed value.",
                    producer, producer
                ),
            }]
        } else {
            Vec::new()
        };
        return Ok((value, advisories));
    }

    match stored {
        Some(value) => Ok((value, Vec::new())),
        None => Err(CalculatorError::MissingPrerequisite { field, producer }),
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Height and weight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyForm {
    pub height: String,
    pub weight: String,
}

impl BodyForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            height: profile.height.clone(),
            weight: profile.weight.clone(),
        }
    }
}

/// Inputs shared by the energy equations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnergyForm {
    pub height: String,
    pub weight: String,
    pub age: String,
    pub gender: Option<Gender>,
}

impl EnergyForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            height: profile.height.clone(),
            weight: profile.weight.clone(),
            age: profile.age.clone(),
            gender: profile.gender,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalorieNeedsForm {
    /// Manual BMR, used when no BMR result is in the profile
    pub bmr: String,
    pub activity_level: Option<ActivityLevel>,
}

impl CalorieNeedsForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            bmr: String::new(),
            activity_level: profile.activity_level,
        }
    }
}

/// US Navy tape measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyFatForm {
    pub gender: Option<Gender>,
    pub height: String,
    pub waist: String,
    pub neck: String,
    /// Only used for women
    pub hip: String,
}

impl BodyFatForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            gender: profile.gender,
            height: profile.height.clone(),
            waist: profile.waist.clone(),
            neck: profile.neck.clone(),
            hip: profile.hip.clone(),
        }
    }
}

/// A single value normally produced by another calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyDensityForm {
    pub body_fat: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeightGenderForm {
    pub height: String,
    pub gender: Option<Gender>,
}

impl HeightGenderForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            height: profile.height.clone(),
            gender: profile.gender,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeanBodyMassForm {
    pub height: String,
    pub weight: String,
    pub gender: Option<Gender>,
}

impl LeanBodyMassForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            height: profile.height.clone(),
            weight: profile.weight.clone(),
            gender: profile.gender,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OneRepMaxForm {
    pub lift_weight: String,
    pub reps: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrengthToWeightForm {
    /// Manual lift, used when no one-rep max is in the profile
    pub lift_weight: String,
    pub weight: String,
}

impl StrengthToWeightForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            lift_weight: String::new(),
            weight: profile.weight.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardioForm {
    pub age: String,
    pub gender: Option<Gender>,
    pub resting_heart_rate: String,
}

impl CardioForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            age: profile.age.clone(),
            gender: profile.gender,
            resting_heart_rate: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaistToHeightForm {
    pub waist: String,
    pub height: String,
}

impl WaistToHeightForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            waist: profile.waist.clone(),
            height: profile.height.clone(),
        }
    }
}

/// Weight and activity, the inputs of the water and macro tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NeedsForm {
    pub weight: String,
    pub activity_level: Option<ActivityLevel>,
    /// Protein only
    pub goal: ProteinGoal,
}

impl NeedsForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            weight: profile.weight.clone(),
            activity_level: profile.activity_level,
            goal: ProteinGoal::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetabolicAgeForm {
    pub height: String,
    pub weight: String,
    pub gender: Option<Gender>,
    /// Manual body fat, used when no body fat result is in the profile
    pub body_fat: String,
}

impl MetabolicAgeForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            height: profile.height.clone(),
            weight: profile.weight.clone(),
            gender: profile.gender,
            body_fat: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyShapeForm {
    pub bust: String,
    pub waist: String,
    pub hip: String,
}

impl BodyShapeForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            bust: profile.bust.clone(),
            waist: profile.waist.clone(),
            hip: profile.hip.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiabetesRiskForm {
    pub age: String,
    pub gender: Option<Gender>,
    pub waist: String,
    /// Manual BMI, used when no BMI result is in the profile
    pub bmi: String,
    pub physically_active: bool,
    pub daily_vegetables: bool,
    pub blood_pressure_medication: bool,
    pub high_blood_glucose_history: bool,
    pub family_history: FamilyHistory,
}

impl DiabetesRiskForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            age: profile.age.clone(),
            gender: profile.gender,
            waist: profile.waist.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutVolumeForm {
    pub sets: String,
    pub reps: String,
    pub lift_weight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaloriesBurnedForm {
    pub weight: String,
    pub met: String,
    pub minutes: String,
}

impl CaloriesBurnedForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            weight: profile.weight.clone(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
    pub who_class: WhoBmiClass,
    /// Weight band for a BMI of 18.5-25 at this height, e.g. `"56.7 - 76.6 kg"`
    pub healthy_weight: String,
}

/// A single number in a named unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyFatResult {
    pub body_fat: f64,
    pub zone: BodyFatZone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealWeightResult {
    /// Hamwi ideal weight in the profile's weight unit
    pub ideal: f64,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneRepMaxResult {
    pub one_rep_max: f64,
    pub unit: String,
    pub table: Vec<PercentageRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vo2MaxResult {
    pub vo2_max: f64,
    pub rating: Vo2MaxRating,
    pub max_heart_rate: f64,
    pub zones: Vec<HeartRateZone>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaistToHeightResult {
    pub ratio: f64,
    pub category: WhtrCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiabetesRiskResult {
    pub score: u32,
    pub risk: DiabetesRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyShapeResult {
    pub shape: BodyShape,
    pub label: String,
}

// ============================================================================
// Body Metrics
// ============================================================================

/// BMI with both category tables and the healthy weight band
pub fn calculate_bmi(profile: &Profile, form: &BodyForm) -> CalculatorResult<BmiResult> {
    let unit_system = profile.unit_system;
    let height = validate_measurement("height", &form.height, unit_system)?;
    let weight = validate_measurement("weight", &form.weight, unit_system)?;

    let bmi = formulas::bmi(unit_system, weight, height);
    let (min_kg, max_kg) =
        formulas::healthy_weight_range_kg(unit_system.length_unit().to_cm(height));
    let weight_unit = unit_system.weight_unit();
    let healthy_weight = format!(
        "{:.1} - {:.1} {}",
        weight_unit.from_kg(min_kg),
        weight_unit.from_kg(max_kg),
        weight_unit
    );

    let patch = ProfilePatch {
        height: typed(&form.height),
        weight: typed(&form.weight),
        bmi: Some(bmi),
        ..Default::default()
    };
    let result = BmiResult {
        bmi,
        category: classify_bmi(bmi),
        who_class: classify_bmi_who(bmi),
        healthy_weight,
    };
    Ok(Calculation::new("bmi", result, patch))
}

/// Body surface area in m²
pub fn calculate_body_surface_area(profile: &Profile, form: &BodyForm) -> CalculatorResult<f64> {
    let unit_system = profile.unit_system;
    let height_cm = length_cm("height", &form.height, unit_system)?;
    let weight_kg = weight_kg("weight", &form.weight, unit_system)?;

    let patch = ProfilePatch {
        height: typed(&form.height),
        weight: typed(&form.weight),
        ..Default::default()
    };
    Ok(Calculation::new(
        "body_surface_area",
        formulas::body_surface_area(height_cm, weight_kg),
        patch,
    ))
}

/// US Navy body fat percentage
pub fn calculate_body_fat(profile: &Profile, form: &BodyFatForm) -> CalculatorResult<BodyFatResult> {
    let unit_system = profile.unit_system;
    let gender = required("gender", form.gender)?;
    let height_cm = length_cm("height", &form.height, unit_system)?;
    let waist_cm = length_cm("waist", &form.waist, unit_system)?;
    let neck_cm = length_cm("neck", &form.neck, unit_system)?;
    let hip_cm = match gender {
        Gender::Female => length_cm("hip", &form.hip, unit_system)?,
        Gender::Male => 0.0,
    };

    let girth = match gender {
        Gender::Male => waist_cm - neck_cm,
        Gender::Female => waist_cm + hip_cm - neck_cm,
    };
    if girth <= 0.0 {
        return Err(ValidationError::new("neck", "must be smaller than the waist").into());
    }

    let body_fat = formulas::body_fat_navy(gender, height_cm, waist_cm, neck_cm, hip_cm);
    if !(2.0..=70.0).contains(&body_fat) {
        return Err(
            ValidationError::new("waist", "measurements give an implausible body fat").into(),
        );
    }

    let patch = ProfilePatch {
        gender: Some(gender),
        height: typed(&form.height),
        waist: typed(&form.waist),
        neck: typed(&form.neck),
        hip: (gender == Gender::Female).then(|| form.hip.trim().to_string()),
        body_fat: Some(body_fat),
        ..Default::default()
    };
    let result = BodyFatResult {
        body_fat,
        zone: classify_body_fat(body_fat, gender),
    };
    Ok(Calculation::new("body_fat", result, patch))
}

/// Body density from the body fat result or a manual value
pub fn calculate_body_density(profile: &Profile, form: &BodyDensityForm) -> CalculatorResult<f64> {
    let (body_fat, advisories) = resolve_prerequisite(
        profile.body_fat,
        &form.body_fat,
        "body_fat",
        "Body Fat",
        profile.unit_system,
    )?;

    let density = formulas::body_density(body_fat);
    let patch = ProfilePatch {
        body_density: Some(density),
        ..Default::default()
    };
    Ok(Calculation::new("body_density", density, patch).with_advisories(advisories))
}

/// Lean body mass in the profile's weight unit
pub fn calculate_lean_body_mass(
    profile: &Profile,
    form: &LeanBodyMassForm,
) -> CalculatorResult<Quantity> {
    let unit_system = profile.unit_system;
    let gender = required("gender", form.gender)?;
    let height_cm = length_cm("height", &form.height, unit_system)?;
    let weight_kg = weight_kg("weight", &form.weight, unit_system)?;

    let weight_unit = unit_system.weight_unit();
    let lbm_kg = formulas::lean_body_mass_boer(weight_kg, height_cm, gender);
    let patch = ProfilePatch {
        gender: Some(gender),
        height: typed(&form.height),
        weight: typed(&form.weight),
        ..Default::default()
    };
    Ok(Calculation::new(
        "lean_body_mass",
        Quantity::new(weight_unit.from_kg(lbm_kg), weight_unit.abbreviation()),
        patch,
    ))
}

/// Hamwi ideal weight, stored as the formatted band
pub fn calculate_ideal_weight(
    profile: &Profile,
    form: &HeightGenderForm,
) -> CalculatorResult<IdealWeightResult> {
    let unit_system = profile.unit_system;
    let gender = required("gender", form.gender)?;
    let height_cm = length_cm("height", &form.height, unit_system)?;

    let weight_unit = unit_system.weight_unit();
    let ideal = formulas::ideal_weight_hamwi(height_cm, gender);
    let range = ideal.format(weight_unit);

    let patch = ProfilePatch {
        gender: Some(gender),
        height: typed(&form.height),
        ideal_weight: Some(range.clone()),
        ..Default::default()
    };
    let result = IdealWeightResult {
        ideal: weight_unit.from_kg(ideal.ideal_kg),
        range,
    };
    Ok(Calculation::new("ideal_weight", result, patch))
}

pub fn calculate_waist_to_height(
    profile: &Profile,
    form: &WaistToHeightForm,
) -> CalculatorResult<WaistToHeightResult> {
    let unit_system = profile.unit_system;
    let waist = validate_measurement("waist", &form.waist, unit_system)?;
    let height = validate_measurement("height", &form.height, unit_system)?;

    let ratio = formulas::waist_to_height_ratio(waist, height);
    let patch = ProfilePatch {
        waist: typed(&form.waist),
        height: typed(&form.height),
        waist_to_height_ratio: Some(ratio),
        ..Default::default()
    };
    let result = WaistToHeightResult {
        ratio,
        category: classify_waist_to_height(ratio),
    };
    Ok(Calculation::new("waist_to_height", result, patch))
}

pub fn calculate_body_shape(
    profile: &Profile,
    form: &BodyShapeForm,
) -> CalculatorResult<BodyShapeResult> {
    let unit_system = profile.unit_system;
    let bust = validate_measurement("bust", &form.bust, unit_system)?;
    let waist = validate_measurement("waist", &form.waist, unit_system)?;
    let hip = validate_measurement("hip", &form.hip, unit_system)?;

    let shape = formulas::body_shape(bust, waist, hip);
    let patch = ProfilePatch {
        bust: typed(&form.bust),
        waist: typed(&form.waist),
        hip: typed(&form.hip),
        body_shape: Some(shape),
        ..Default::default()
    };
    let result = BodyShapeResult {
        shape,
        label: shape.label().to_string(),
    };
    Ok(Calculation::new("body_shape", result, patch))
}

// ============================================================================
// Energy
// ============================================================================

struct EnergyInputs {
    height_cm: f64,
    weight_kg: f64,
    age: f64,
    gender: Gender,
}

fn energy_inputs(unit_system: UnitSystem, form: &EnergyForm) -> Result<EnergyInputs, ValidationError> {
    Ok(EnergyInputs {
        gender: required("gender", form.gender)?,
        height_cm: length_cm("height", &form.height, unit_system)?,
        weight_kg: weight_kg("weight", &form.weight, unit_system)?,
        age: validate_measurement("age", &form.age, unit_system)?,
    })
}

fn energy_patch(form: &EnergyForm, gender: Gender) -> ProfilePatch {
    ProfilePatch {
        height: typed(&form.height),
        weight: typed(&form.weight),
        age: typed(&form.age),
        gender: Some(gender),
        ..Default::default()
    }
}

/// Mifflin-St Jeor BMR in kcal/day
pub fn calculate_bmr(profile: &Profile, form: &EnergyForm) -> CalculatorResult<f64> {
    let inputs = energy_inputs(profile.unit_system, form)?;
    let bmr = formulas::bmr_mifflin(inputs.weight_kg, inputs.height_cm, inputs.age, inputs.gender);

    let patch = ProfilePatch {
        bmr: Some(bmr),
        ..energy_patch(form, inputs.gender)
    };
    Ok(Calculation::new("bmr", bmr, patch))
}

/// Harris-Benedict RMR in kcal/day
pub fn calculate_rmr(profile: &Profile, form: &EnergyForm) -> CalculatorResult<f64> {
    let inputs = energy_inputs(profile.unit_system, form)?;
    let rmr =
        formulas::rmr_harris_benedict(inputs.weight_kg, inputs.height_cm, inputs.age, inputs.gender);

    let patch = ProfilePatch {
        rmr: Some(rmr),
        ..energy_patch(form, inputs.gender)
    };
    Ok(Calculation::new("rmr", rmr, patch))
}

/// TDEE from the BMR result (or a manual BMR) and an activity level
pub fn calculate_calorie_needs(
    profile: &Profile,
    form: &CalorieNeedsForm,
) -> CalculatorResult<CalorieNeeds> {
    let activity_level = required("activity_level", form.activity_level)?;
    let (bmr, advisories) =
        resolve_prerequisite(profile.bmr, &form.bmr, "bmr", "BMR", profile.unit_system)?;

    let needs = formulas::calorie_needs(bmr, activity_level);
    // A manual BMR only fills the gap; it never replaces a computed one
    let patch = ProfilePatch {
        activity_level: Some(activity_level),
        bmr: profile.bmr.is_none().then_some(bmr),
        calorie_needs: Some(needs.maintenance),
        ..Default::default()
    };
    Ok(Calculation::new("calorie_needs", needs, patch).with_advisories(advisories))
}

/// Metabolic age from the body fat result (or a manual value)
pub fn calculate_metabolic_age(
    profile: &Profile,
    form: &MetabolicAgeForm,
) -> CalculatorResult<f64> {
    let unit_system = profile.unit_system;
    let gender = required("gender", form.gender)?;
    let height_cm = length_cm("height", &form.height, unit_system)?;
    let weight_kg = weight_kg("weight", &form.weight, unit_system)?;
    let (body_fat, advisories) = resolve_prerequisite(
        profile.body_fat,
        &form.body_fat,
        "body_fat",
        "Body Fat",
        unit_system,
    )?;

    let age = formulas::metabolic_age(weight_kg, height_cm, body_fat, gender);
    let patch = ProfilePatch {
        gender: Some(gender),
        height: typed(&form.height),
        weight: typed(&form.weight),
        metabolic_age: Some(age),
        ..Default::default()
    };
    Ok(Calculation::new("metabolic_age", age, patch).with_advisories(advisories))
}

// ============================================================================
// Daily Needs
// ============================================================================

fn needs_inputs(
    unit_system: UnitSystem,
    form: &NeedsForm,
) -> Result<(f64, ActivityLevel), ValidationError> {
    let activity_level = required("activity_level", form.activity_level)?;
    let weight = validate_measurement("weight", &form.weight, unit_system)?;
    Ok((weight, activity_level))
}

fn needs_patch(form: &NeedsForm, activity_level: ActivityLevel) -> ProfilePatch {
    ProfilePatch {
        weight: typed(&form.weight),
        activity_level: Some(activity_level),
        ..Default::default()
    }
}

/// Daily water in liters or fluid ounces
pub fn calculate_water_intake(profile: &Profile, form: &NeedsForm) -> CalculatorResult<Quantity> {
    let unit_system = profile.unit_system;
    let (weight, activity_level) = needs_inputs(unit_system, form)?;

    let water = formulas::water_intake(unit_system, weight, activity_level);
    let patch = ProfilePatch {
        water_intake: Some(water),
        ..needs_patch(form, activity_level)
    };
    Ok(Calculation::new(
        "water_intake",
        Quantity::new(water, unit_system.volume_unit().abbreviation()),
        patch,
    ))
}

/// Daily protein in grams for the form's goal
pub fn calculate_protein(profile: &Profile, form: &NeedsForm) -> CalculatorResult<Quantity> {
    let unit_system = profile.unit_system;
    let (weight, activity_level) = needs_inputs(unit_system, form)?;

    let grams = formulas::protein_target(unit_system, weight, activity_level, form.goal);
    Ok(Calculation::new(
        "protein",
        Quantity::new(grams, "g"),
        needs_patch(form, activity_level),
    ))
}

/// Daily carbohydrate in grams
pub fn calculate_carbs(profile: &Profile, form: &NeedsForm) -> CalculatorResult<Quantity> {
    let unit_system = profile.unit_system;
    let (weight, activity_level) = needs_inputs(unit_system, form)?;

    let grams = formulas::carb_target(unit_system, weight, activity_level);
    Ok(Calculation::new(
        "carbs",
        Quantity::new(grams, "g"),
        needs_patch(form, activity_level),
    ))
}

/// Daily fat in grams
pub fn calculate_fat(profile: &Profile, form: &NeedsForm) -> CalculatorResult<Quantity> {
    let unit_system = profile.unit_system;
    let (weight, activity_level) = needs_inputs(unit_system, form)?;

    let grams = formulas::fat_target(unit_system, weight, activity_level);
    Ok(Calculation::new(
        "fat",
        Quantity::new(grams, "g"),
        needs_patch(form, activity_level),
    ))
}

// ============================================================================
// Strength and Training
// ============================================================================

/// Epley one-rep max with the percentage table, in the profile's weight unit
pub fn calculate_one_rep_max(
    profile: &Profile,
    form: &OneRepMaxForm,
) -> CalculatorResult<OneRepMaxResult> {
    let unit_system = profile.unit_system;
    let lift = validate_measurement("lift_weight", &form.lift_weight, unit_system)?;
    let reps = validate_count("reps", &form.reps)?;

    let one_rep_max = formulas::one_rep_max(lift, reps);
    let patch = ProfilePatch {
        one_rep_max: Some(one_rep_max),
        ..Default::default()
    };
    let result = OneRepMaxResult {
        one_rep_max,
        unit: unit_system.weight_unit().abbreviation().to_string(),
        table: formulas::one_rep_max_table(one_rep_max),
    };
    Ok(Calculation::new("one_rep_max", result, patch))
}

/// Lift over bodyweight, using the one-rep max result unless a lift is entered
pub fn calculate_strength_to_weight(
    profile: &Profile,
    form: &StrengthToWeightForm,
) -> CalculatorResult<f64> {
    let unit_system = profile.unit_system;
    let bodyweight = validate_measurement("weight", &form.weight, unit_system)?;
    let (lift, advisories) = resolve_prerequisite(
        profile.one_rep_max,
        &form.lift_weight,
        "lift_weight",
        "One-Rep Max",
        unit_system,
    )?;

    let ratio = formulas::strength_to_weight_ratio(lift, bodyweight);
    let patch = ProfilePatch {
        weight: typed(&form.weight),
        strength_to_weight_ratio: Some(ratio),
        ..Default::default()
    };
    Ok(Calculation::new("strength_to_weight", ratio, patch).with_advisories(advisories))
}

/// Total volume load (sets × reps × weight) in the profile's weight unit
pub fn calculate_workout_volume(
    profile: &Profile,
    form: &WorkoutVolumeForm,
) -> CalculatorResult<Quantity> {
    let unit_system = profile.unit_system;
    let sets = validate_count("sets", &form.sets)?;
    let reps = validate_count("reps", &form.reps)?;
    let lift = validate_measurement("lift_weight", &form.lift_weight, unit_system)?;

    Ok(Calculation::new(
        "workout_volume",
        Quantity::new(
            formulas::workout_volume(sets, reps, lift),
            unit_system.weight_unit().abbreviation(),
        ),
        ProfilePatch::default(),
    ))
}

/// Calories burned for a MET value and duration
pub fn calculate_calories_burned(
    profile: &Profile,
    form: &CaloriesBurnedForm,
) -> CalculatorResult<f64> {
    let unit_system = profile.unit_system;
    let weight_kg = weight_kg("weight", &form.weight, unit_system)?;
    let met = validate_measurement("met", &form.met, unit_system)?;
    let minutes = validate_measurement("minutes", &form.minutes, unit_system)?;

    let patch = ProfilePatch {
        weight: typed(&form.weight),
        ..Default::default()
    };
    Ok(Calculation::new(
        "calories_burned",
        formulas::met_calories(met, weight_kg, minutes),
        patch,
    ))
}

// ============================================================================
// Cardio
// ============================================================================

/// VO2max with its rating and the Karvonen training zones
pub fn calculate_vo2_max(profile: &Profile, form: &CardioForm) -> CalculatorResult<Vo2MaxResult> {
    let unit_system = profile.unit_system;
    let gender = required("gender", form.gender)?;
    let age = validate_measurement("age", &form.age, unit_system)?;
    let resting = validate_measurement("resting_heart_rate", &form.resting_heart_rate, unit_system)?;

    let max_heart_rate = formulas::max_heart_rate(age);
    if resting >= max_heart_rate {
        return Err(ValidationError::new(
            "resting_heart_rate",
            "must be below the age-predicted maximum",
        )
        .into());
    }

    let vo2_max = formulas::vo2_max(age, resting);
    let patch = ProfilePatch {
        age: typed(&form.age),
        gender: Some(gender),
        ..Default::default()
    };
    let result = Vo2MaxResult {
        vo2_max,
        rating: classify_vo2_max(vo2_max, gender),
        max_heart_rate,
        zones: formulas::heart_rate_zones(age, resting),
    };
    Ok(Calculation::new("vo2_max", result, patch))
}

// ============================================================================
// Risk
// ============================================================================

/// Diabetes risk score, using the BMI result unless a BMI is entered
pub fn calculate_diabetes_risk(
    profile: &Profile,
    form: &DiabetesRiskForm,
) -> CalculatorResult<DiabetesRiskResult> {
    let unit_system = profile.unit_system;
    let gender = required("gender", form.gender)?;
    let age = validate_measurement("age", &form.age, unit_system)?;
    let waist_cm = length_cm("waist", &form.waist, unit_system)?;
    let (bmi, advisories) =
        resolve_prerequisite(profile.bmi, &form.bmi, "bmi", "BMI", unit_system)?;

    let factors = DiabetesRiskFactors {
        age_years: age,
        bmi,
        waist_cm,
        gender,
        physically_active: form.physically_active,
        daily_vegetables: form.daily_vegetables,
        blood_pressure_medication: form.blood_pressure_medication,
        high_blood_glucose_history: form.high_blood_glucose_history,
        family_history: form.family_history,
    };
    let score = diabetes_risk_score(&factors);

    let patch = ProfilePatch {
        age: typed(&form.age),
        gender: Some(gender),
        waist: typed(&form.waist),
        ..Default::default()
    };
    let result = DiabetesRiskResult {
        score,
        risk: classify_diabetes_risk(score),
    };
    Ok(Calculation::new("diabetes_risk", result, patch).with_advisories(advisories))
}
