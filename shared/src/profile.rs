//! Shared profile store
//!
//! Holds the measurements a user has typed and the results calculators have
//! produced, so one calculator can hand values to another (BMI into diabetes
//! risk, BMR into calorie needs).
//!
//! The store is an owned value passed to whoever drives the calculators; there
//! is no global. Patching builds a new [`Profile`] from the old one, which
//! keeps snapshots cheap to compare in tests.
//!
//! Changing the unit system throws away every other field. That reset is the
//! only thing keeping metric and imperial values from mixing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::formulas::{ActivityLevel, BodyShape, Gender};
use crate::units::UnitSystem;

/// The user's measurements and derived results for one session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub unit_system: UnitSystem,

    // Raw inputs as typed, in `unit_system` units
    pub height: String,
    pub weight: String,
    pub age: String,
    pub waist: String,
    pub hip: String,
    pub neck: String,
    pub bust: String,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,

    // Derived results
    pub bmi: Option<f64>,
    pub body_fat: Option<f64>,
    pub ideal_weight: Option<String>,
    pub bmr: Option<f64>,
    pub rmr: Option<f64>,
    pub calorie_needs: Option<f64>,
    pub one_rep_max: Option<f64>,
    pub water_intake: Option<f64>,
    pub metabolic_age: Option<f64>,
    pub waist_to_height_ratio: Option<f64>,
    pub strength_to_weight_ratio: Option<f64>,
    pub body_density: Option<f64>,
    pub body_shape: Option<BodyShape>,
}

impl Profile {
    /// An empty profile in the given unit system
    pub fn new(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            ..Default::default()
        }
    }

    /// Return a copy with every field set in `patch` overlaid
    ///
    /// Fields the patch leaves as `None` keep their current value.
    pub fn merged(&self, patch: &ProfilePatch) -> Profile {
        let mut next = self.clone();

        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = &patch.$field {
                        next.$field = value.clone();
                    }
                )*
            };
        }

        overlay!(height, weight, age, waist, hip, neck, bust);

        macro_rules! overlay_optional {
            ($($field:ident),* $(,)?) => {
                $(
                    if patch.$field.is_some() {
                        next.$field = patch.$field.clone();
                    }
                )*
            };
        }

        overlay_optional!(
            gender,
            activity_level,
            bmi,
            body_fat,
            ideal_weight,
            bmr,
            rmr,
            calorie_needs,
            one_rep_max,
            water_intake,
            metabolic_age,
            waist_to_height_ratio,
            strength_to_weight_ratio,
            body_density,
            body_shape,
        );

        next
    }

    /// True when no field other than the unit system is set
    pub fn is_blank(&self) -> bool {
        *self == Profile::new(self.unit_system)
    }
}

/// A partial profile; `None` means "leave unchanged"
///
/// The unit system is deliberately absent: it only changes through
/// [`ProfileStore::set_unit_system`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub height: Option<String>,
    pub weight: Option<String>,
    pub age: Option<String>,
    pub waist: Option<String>,
    pub hip: Option<String>,
    pub neck: Option<String>,
    pub bust: Option<String>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,

    pub bmi: Option<f64>,
    pub body_fat: Option<f64>,
    pub ideal_weight: Option<String>,
    pub bmr: Option<f64>,
    pub rmr: Option<f64>,
    pub calorie_needs: Option<f64>,
    pub one_rep_max: Option<f64>,
    pub water_intake: Option<f64>,
    pub metabolic_age: Option<f64>,
    pub waist_to_height_ratio: Option<f64>,
    pub strength_to_weight_ratio: Option<f64>,
    pub body_density: Option<f64>,
    pub body_shape: Option<BodyShape>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }
}

/// Owner of the session's single [`Profile`]
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profile: Profile,
}

impl ProfileStore {
    /// Start a session with an empty metric profile
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit_system(unit_system: UnitSystem) -> Self {
        Self {
            profile: Profile::new(unit_system),
        }
    }

    /// Current profile
    pub fn read(&self) -> &Profile {
        &self.profile
    }

    /// Shallow-merge `patch` into the profile; later writes win
    pub fn patch(&mut self, patch: &ProfilePatch) {
        if patch.is_empty() {
            return;
        }
        self.profile = self.profile.merged(patch);
        debug!(unit_system = %self.profile.unit_system, "Profile patched");
    }

    /// Switch unit system, discarding every other field
    ///
    /// Always resets, even when `unit_system` is already selected.
    pub fn set_unit_system(&mut self, unit_system: UnitSystem) {
        let previous = self.profile.unit_system;
        self.profile = Profile::new(unit_system);
        debug!(from = %previous, to = %unit_system, "Unit system changed, profile reset");
    }

    /// Clear every field but keep the current unit system
    pub fn reset(&mut self) {
        self.set_unit_system(self.profile.unit_system);
    }
}
