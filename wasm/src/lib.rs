//! Health Calculators WASM Module
//!
//! Browser bindings for the calculators. The UI shell owns one
//! [`CalculatorSession`] per page load; every calculator method takes the
//! submitted form as JSON, runs it against the session's profile, applies the
//! resulting patch and returns the outcome as JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

use health_calculators_shared::calculators::{self, *};
use health_calculators_shared::{
    CalculatorError, FeetInchesHeight, Profile, ProfilePatch, ProfileStore,
    RecommendationRequest, UnitSystem,
};

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
enum SessionError {
    #[error("Malformed form data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    #[error("{0}")]
    UnitSystem(String),
}

impl SessionError {
    /// JSON body handed back to the UI: `{"error", "kind", "field"?}`
    fn to_json(&self) -> String {
        let (kind, field) = match self {
            SessionError::Json(_) => ("malformed_form", None),
            SessionError::Calculator(CalculatorError::InvalidInput(e)) => {
                ("invalid_input", Some(e.field.clone()))
            }
            SessionError::Calculator(CalculatorError::MissingPrerequisite { field, .. }) => {
                ("missing_prerequisite", Some(field.to_string()))
            }
            SessionError::UnitSystem(_) => ("invalid_unit_system", None),
        };
        serde_json::json!({
            "error": self.to_string(),
            "kind": kind,
            "field": field,
        })
        .to_string()
    }
}

impl From<SessionError> for JsValue {
    fn from(err: SessionError) -> Self {
        JsValue::from_str(&err.to_json())
    }
}

// ============================================================================
// Session
// ============================================================================

/// One user's calculator session, holding the shared profile
#[wasm_bindgen]
#[derive(Default)]
pub struct CalculatorSession {
    store: ProfileStore,
}

impl CalculatorSession {
    /// Parse the form, run the calculator, apply its patch
    fn run<F, T, C>(&mut self, form_json: &str, calculator: C) -> Result<String, SessionError>
    where
        F: DeserializeOwned,
        T: Serialize,
        C: FnOnce(&Profile, &F) -> CalculatorResult<T>,
    {
        let form: F = serde_json::from_str(form_json)?;
        let calculation = calculator(self.store.read(), &form)?;
        calculation.apply_to(&mut self.store);
        Ok(serde_json::to_string(&calculation)?)
    }

    fn profile_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self.store.read())?)
    }

    fn apply_patch(&mut self, patch_json: &str) -> Result<(), SessionError> {
        let patch: ProfilePatch = serde_json::from_str(patch_json)?;
        self.store.patch(&patch);
        Ok(())
    }

    fn switch_unit_system(&mut self, unit_system: &str) -> Result<(), SessionError> {
        let unit_system: UnitSystem = unit_system.parse().map_err(SessionError::UnitSystem)?;
        self.store.set_unit_system(unit_system);
        Ok(())
    }

    /// Manual fallback fields stay blank; the calculator reads stored results itself
    fn form_for(&self, calculator: &str) -> Result<String, SessionError> {
        let profile = self.store.read();
        let json = match calculator {
            "bmi" | "body_surface_area" => serde_json::to_string(&BodyForm::from_profile(profile)),
            "bmr" | "rmr" => serde_json::to_string(&EnergyForm::from_profile(profile)),
            "calorie_needs" => serde_json::to_string(&CalorieNeedsForm::from_profile(profile)),
            "body_fat" => serde_json::to_string(&BodyFatForm::from_profile(profile)),
            "body_density" => serde_json::to_string(&BodyDensityForm::default()),
            "ideal_weight" => serde_json::to_string(&HeightGenderForm::from_profile(profile)),
            "lean_body_mass" => serde_json::to_string(&LeanBodyMassForm::from_profile(profile)),
            "waist_to_height" => serde_json::to_string(&WaistToHeightForm::from_profile(profile)),
            "body_shape" => serde_json::to_string(&BodyShapeForm::from_profile(profile)),
            "metabolic_age" => serde_json::to_string(&MetabolicAgeForm::from_profile(profile)),
            "water_intake" | "protein" | "carbs" | "fat" => {
                serde_json::to_string(&NeedsForm::from_profile(profile))
            }
            "strength_to_weight" => {
                serde_json::to_string(&StrengthToWeightForm::from_profile(profile))
            }
            "vo2_max" => serde_json::to_string(&CardioForm::from_profile(profile)),
            "diabetes_risk" => serde_json::to_string(&DiabetesRiskForm::from_profile(profile)),
            "calories_burned" => serde_json::to_string(&CaloriesBurnedForm::from_profile(profile)),
            // Forms with nothing to pre-fill
            _ => Ok("{}".to_string()),
        };
        Ok(json?)
    }
}

#[wasm_bindgen]
impl CalculatorSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CalculatorSession {
        CalculatorSession::default()
    }

    /// Current profile as JSON
    pub fn profile(&self) -> Result<String, JsValue> {
        Ok(self.profile_json()?)
    }

    /// Merge a partial profile (JSON) into the session
    pub fn patch(&mut self, patch_json: &str) -> Result<(), JsValue> {
        Ok(self.apply_patch(patch_json)?)
    }

    /// Switch to `"metric"` or `"imperial"`, clearing the profile
    pub fn set_unit_system(&mut self, unit_system: &str) -> Result<(), JsValue> {
        Ok(self.switch_unit_system(unit_system)?)
    }

    /// Clear the profile, keeping the unit system
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Form pre-filled from the profile for the named calculator
    pub fn form(&self, calculator: &str) -> Result<String, JsValue> {
        Ok(self.form_for(calculator)?)
    }

    /// Request body for `POST /api/v1/recommendations`
    pub fn recommendation_snapshot(&self, preferences: &str) -> Result<String, JsValue> {
        let request = RecommendationRequest::from_profile(self.store.read(), preferences);
        Ok(serde_json::to_string(&request).map_err(SessionError::from)?)
    }

    pub fn bmi(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_bmi)?)
    }

    pub fn body_surface_area(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_body_surface_area)?)
    }

    pub fn bmr(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_bmr)?)
    }

    pub fn rmr(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_rmr)?)
    }

    pub fn calorie_needs(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_calorie_needs)?)
    }

    pub fn body_fat(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_body_fat)?)
    }

    pub fn body_density(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_body_density)?)
    }

    pub fn ideal_weight(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_ideal_weight)?)
    }

    pub fn lean_body_mass(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_lean_body_mass)?)
    }

    pub fn waist_to_height(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_waist_to_height)?)
    }

    pub fn body_shape(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_body_shape)?)
    }

    pub fn metabolic_age(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_metabolic_age)?)
    }

    pub fn water_intake(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_water_intake)?)
    }

    pub fn protein(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_protein)?)
    }

    pub fn carbs(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_carbs)?)
    }

    pub fn fat(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_fat)?)
    }

    pub fn one_rep_max(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_one_rep_max)?)
    }

    pub fn strength_to_weight(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_strength_to_weight)?)
    }

    pub fn workout_volume(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_workout_volume)?)
    }

    pub fn calories_burned(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_calories_burned)?)
    }

    pub fn vo2_max(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_vo2_max)?)
    }

    pub fn diabetes_risk(&mut self, form_json: &str) -> Result<String, JsValue> {
        Ok(self.run(form_json, calculators::calculate_diabetes_risk)?)
    }
}

// ============================================================================
// Stateless helpers
// ============================================================================

/// Imperial height for display, e.g. `6'2"`
#[wasm_bindgen]
pub fn format_height_imperial(total_inches: f64) -> String {
    FeetInchesHeight::from_total_inches(total_inches).to_string()
}

/// Convert a weight between `"metric"` and `"imperial"` units
#[wasm_bindgen]
pub fn convert_weight(value: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    let from: UnitSystem = from.parse().map_err(SessionError::UnitSystem)?;
    let to: UnitSystem = to.parse().map_err(SessionError::UnitSystem)?;
    let kg = from.weight_unit().to_kg(value);
    Ok(to.weight_unit().from_kg(kg))
}

/// Convert a length between `"metric"` and `"imperial"` units
#[wasm_bindgen]
pub fn convert_length(value: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    let from: UnitSystem = from.parse().map_err(SessionError::UnitSystem)?;
    let to: UnitSystem = to.parse().map_err(SessionError::UnitSystem)?;
    let cm = from.length_unit().to_cm(value);
    Ok(to.length_unit().from_cm(cm))
}

/// Convert a water volume between `"metric"` (L) and `"imperial"` (fl oz)
#[wasm_bindgen]
pub fn convert_volume(value: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    let from: UnitSystem = from.parse().map_err(SessionError::UnitSystem)?;
    let to: UnitSystem = to.parse().map_err(SessionError::UnitSystem)?;
    let liters = from.volume_unit().to_liters(value);
    Ok(to.volume_unit().from_liters(liters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bmi_updates_profile() {
        let mut session = CalculatorSession::new();
        let out = session
            .run(r#"{"height":"175","weight":"70"}"#, calculate_bmi)
            .unwrap();
        let out = parse(&out);
        assert_eq!(out["result"]["category"], "normal_weight");
        assert!(out["advisories"].as_array().unwrap().is_empty());

        let profile = parse(&session.profile_json().unwrap());
        assert!((profile["bmi"].as_f64().unwrap() - 22.857).abs() < 0.001);
        assert_eq!(profile["height"], "175");
    }

    #[test]
    fn test_bmr_feeds_calorie_needs() {
        let mut session = CalculatorSession::new();
        session
            .run(
                r#"{"height":"180","weight":"80","age":"30","gender":"male"}"#,
                calculate_bmr,
            )
            .unwrap();

        let form = parse(&session.form_for("calorie_needs").unwrap());
        assert_eq!(form["bmr"], "");

        let out = session
            .run(
                r#"{"activityLevel":"moderately_active"}"#,
                calculate_calorie_needs,
            )
            .unwrap();
        let out = parse(&out);
        assert!((out["result"]["maintenance"].as_f64().unwrap() - 2759.0).abs() < 1e-9);
        assert_eq!(session.store.read().bmr, Some(1780.0));
    }

    #[test]
    fn test_one_rep_max_feeds_strength_to_weight_form() {
        let mut session = CalculatorSession::new();
        session
            .run(r#"{"liftWeight":"900","reps":"5"}"#, calculate_one_rep_max)
            .unwrap();
        let one_rep_max = session.store.read().one_rep_max.unwrap();
        assert!((one_rep_max - 1050.0).abs() < 1e-9);

        let mut form = parse(&session.form_for("strength_to_weight").unwrap());
        assert_eq!(form["liftWeight"], "");
        form["weight"] = Value::from("100");

        let out = session
            .run(&form.to_string(), calculate_strength_to_weight)
            .unwrap();
        let out = parse(&out);
        assert!((out["result"].as_f64().unwrap() - 10.5).abs() < 1e-9);
        assert!(out["advisories"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_prerequisite_error_json() {
        let mut session = CalculatorSession::new();
        let err = session
            .run(r#"{"activityLevel":"sedentary"}"#, calculate_calorie_needs)
            .unwrap_err();
        let body = parse(&err.to_json());
        assert_eq!(body["kind"], "missing_prerequisite");
        assert_eq!(body["field"], "bmr");
        assert!(session.store.read().calorie_needs.is_none());
    }

    #[test]
    fn test_invalid_input_leaves_profile_untouched() {
        let mut session = CalculatorSession::new();
        let err = session
            .run(r#"{"height":"tall","weight":"70"}"#, calculate_bmi)
            .unwrap_err();
        let body = parse(&err.to_json());
        assert_eq!(body["kind"], "invalid_input");
        assert_eq!(body["field"], "height");
        assert!(session.store.read().is_blank());
    }

    #[test]
    fn test_malformed_json() {
        let mut session = CalculatorSession::new();
        let err = session.run("not json", calculate_bmi).unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
    }

    #[test]
    fn test_unit_switch_resets() {
        let mut session = CalculatorSession::new();
        session.apply_patch(r#"{"weight":"70","bmi":22.9}"#).unwrap();
        session.switch_unit_system("imperial").unwrap();

        assert_eq!(*session.store.read(), Profile::new(UnitSystem::Imperial));
        assert!(session.switch_unit_system("furlongs").is_err());
    }

    #[test]
    fn test_snapshot_from_session() {
        let mut session = CalculatorSession::new();
        session.apply_patch(r#"{"bmi":22.9,"bmr":1780}"#).unwrap();
        let json = session.recommendation_snapshot("vegetarian").unwrap();
        let request: RecommendationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.bmr, Some(1780.0));
        assert_eq!(request.preferences, "vegetarian");
        assert_eq!(
            request.missing_fields(),
            vec!["bodyFatPercentage", "idealWeight", "dailyCalorieNeeds"]
        );
    }

    #[test]
    fn test_unknown_form_is_empty() {
        let session = CalculatorSession::new();
        assert_eq!(session.form_for("one_rep_max").unwrap(), "{}");
    }

    #[test]
    fn test_format_height_imperial() {
        assert_eq!(format_height_imperial(74.0), "6'2\"");
        assert_eq!(format_height_imperial(71.6), "6'0\"");
    }

    #[test]
    fn test_convert_weight() {
        let lb = convert_weight(100.0, "metric", "imperial").unwrap();
        assert!((lb - 220.462).abs() < 0.001);
        let same = convert_weight(70.0, "metric", "metric").unwrap();
        assert!((same - 70.0).abs() < 1e-12);
    }

    #[test]
    fn test_convert_volume() {
        let oz = convert_volume(2.0, "metric", "imperial").unwrap();
        assert!((oz - 67.628).abs() < 0.001);
        let liters = convert_volume(oz, "imperial", "metric").unwrap();
        assert!((liters - 2.0).abs() < 1e-9);
    }
}
