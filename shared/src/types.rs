//! Recommendation gateway request and response types
//!
//! The wire shape is fixed: `{bmi, bodyFatPercentage, idealWeight, bmr,
//! dailyCalorieNeeds, preferences}` in, `{recommendations}` or `{error}` out.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::GatewayError;
use crate::profile::Profile;
use crate::validation::get_missing_fields_labels;

/// Recommendation request as it arrives on the wire
///
/// Every field is optional here so that a missing one can be reported by name
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_calorie_needs: Option<f64>,
    pub preferences: String,
}

impl RecommendationRequest {
    /// Aggregate the derived results a profile has collected so far
    pub fn from_profile(profile: &Profile, preferences: impl Into<String>) -> Self {
        Self {
            bmi: profile.bmi,
            body_fat_percentage: profile.body_fat,
            ideal_weight: profile.ideal_weight.clone(),
            bmr: profile.bmr,
            daily_calorie_needs: profile.calorie_needs,
            preferences: preferences.into(),
        }
    }

    /// Wire names of the required metrics that are absent
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.bmi.is_none() {
            missing.push("bmi".to_string());
        }
        if self.body_fat_percentage.is_none() {
            missing.push("bodyFatPercentage".to_string());
        }
        if self.ideal_weight.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("idealWeight".to_string());
        }
        if self.bmr.is_none() {
            missing.push("bmr".to_string());
        }
        if self.daily_calorie_needs.is_none() {
            missing.push("dailyCalorieNeeds".to_string());
        }
        missing
    }

    /// Check completeness and ranges, producing the snapshot sent upstream
    pub fn into_snapshot(self) -> Result<RecommendationSnapshot, GatewayError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(GatewayError::InvalidSnapshot(format!(
                "missing {}",
                get_missing_fields_labels(&missing).join(", ")
            )));
        }

        let snapshot = RecommendationSnapshot {
            bmi: self.bmi.unwrap_or_default(),
            body_fat_percentage: self.body_fat_percentage.unwrap_or_default(),
            ideal_weight: self.ideal_weight.unwrap_or_default(),
            bmr: self.bmr.unwrap_or_default(),
            daily_calorie_needs: self.daily_calorie_needs.unwrap_or_default(),
            preferences: self.preferences,
        };

        snapshot
            .validate()
            .map_err(|e| GatewayError::InvalidSnapshot(e.to_string()))?;

        Ok(snapshot)
    }
}

/// A complete, range-checked set of metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSnapshot {
    #[validate(range(min = 10.0, max = 100.0))]
    pub bmi: f64,
    #[validate(range(min = 2.0, max = 70.0))]
    pub body_fat_percentage: f64,
    #[validate(length(min = 1, max = 64))]
    pub ideal_weight: String,
    #[validate(range(min = 500.0, max = 10000.0))]
    pub bmr: f64,
    #[validate(range(min = 500.0, max = 20000.0))]
    pub daily_calorie_needs: f64,
    #[validate(length(max = 2000))]
    pub preferences: String,
}

/// Successful gateway response. Failures use the backend's `{error, code}` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfilePatch;

    fn complete_request() -> RecommendationRequest {
        RecommendationRequest {
            bmi: Some(22.9),
            body_fat_percentage: Some(16.4),
            ideal_weight: Some("65.6 - 80.2 kg".to_string()),
            bmr: Some(1780.0),
            daily_calorie_needs: Some(2759.0),
            preferences: "vegetarian, runs twice a week".to_string(),
        }
    }

    #[test]
    fn test_complete_request_validates() {
        let snapshot = complete_request().into_snapshot().unwrap();
        assert_eq!(snapshot.bmr, 1780.0);
        assert_eq!(snapshot.ideal_weight, "65.6 - 80.2 kg");
    }

    #[test]
    fn test_missing_fields_are_named() {
        let request = RecommendationRequest {
            bmr: None,
            ideal_weight: Some("  ".to_string()),
            ..complete_request()
        };
        assert_eq!(request.missing_fields(), vec!["idealWeight", "bmr"]);

        let err = request.into_snapshot().unwrap_err();
        assert_eq!(err.to_string(), "Invalid snapshot: missing Ideal Weight, BMR");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let request = RecommendationRequest {
            bmi: Some(500.0),
            ..complete_request()
        };
        assert!(matches!(
            request.into_snapshot(),
            Err(GatewayError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_from_profile() {
        let profile = Profile::default().merged(&ProfilePatch {
            bmi: Some(22.9),
            calorie_needs: Some(2759.0),
            ..Default::default()
        });
        let request = RecommendationRequest::from_profile(&profile, "none");
        assert_eq!(request.bmi, Some(22.9));
        assert_eq!(request.daily_calorie_needs, Some(2759.0));
        assert_eq!(
            request.missing_fields(),
            vec!["bodyFatPercentage", "idealWeight", "bmr"]
        );
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(complete_request()).unwrap();
        assert_eq!(json["bodyFatPercentage"], 16.4);
        assert_eq!(json["dailyCalorieNeeds"], 2759.0);
        assert_eq!(json["idealWeight"], "65.6 - 80.2 kg");

        let parsed: RecommendationRequest = serde_json::from_str(r#"{"bmi": 21.0}"#).unwrap();
        assert_eq!(parsed.bmi, Some(21.0));
        assert!(parsed.preferences.is_empty());
    }

    #[test]
    fn test_response_shape() {
        let ok: RecommendationResponse =
            serde_json::from_str(r#"{"recommendations":"Walk daily."}"#).unwrap();
        assert_eq!(ok.recommendations, "Walk daily.");
        assert!(serde_json::from_str::<RecommendationResponse>(r#"{"error":"down"}"#).is_err());
    }
}
