//! Core domain types for the wellness health-metrics engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Health profiles (biometric and lifestyle inputs)
//! - Assessments (BMI, category, score, recommendations)
//! - Stored profiles and assessment log records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Input Types
// ============================================================================

/// Self-reported activity level
///
/// `Other` carries an unrecognized label after normalization (trimmed and
/// lower-cased, so `" Extreme "` becomes `"extreme"`). The engine scores it
/// with the lowest activity bucket; the validator rejects it in strict mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Other(String),
}

impl ActivityLevel {
    /// Parse an activity label (case-insensitive, accepts common aliases)
    ///
    /// Unknown labels are kept in their normalized form.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" | "lightly_active" => ActivityLevel::Light,
            "moderate" | "moderately_active" => ActivityLevel::Moderate,
            "active" | "very_active" => ActivityLevel::Active,
            other => ActivityLevel::Other(other.to_string()),
        }
    }

    /// Canonical label used for serialization
    pub fn as_str(&self) -> &str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Other(label) => label.as_str(),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActivityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(ActivityLevel::parse(&label))
    }
}

/// Biometric and lifestyle inputs for one assessment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthProfile {
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub sleep_hours: f64,
    pub water_glasses: u32,
    pub activity_level: ActivityLevel,
}

/// Partial update to a stored profile; `None` fields keep their stored value
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub age_years: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub water_glasses: Option<u32>,
    pub activity_level: Option<ActivityLevel>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }

    /// True when the patch touches a field that feeds BMI, score or recommendations
    pub fn affects_assessment(&self) -> bool {
        self.height_cm.is_some()
            || self.weight_kg.is_some()
            || self.sleep_hours.is_some()
            || self.water_glasses.is_some()
            || self.activity_level.is_some()
    }

    /// Merge supplied fields over `base`, returning the new profile
    pub fn apply_to(&self, base: &HealthProfile) -> HealthProfile {
        HealthProfile {
            age_years: self.age_years.unwrap_or(base.age_years),
            height_cm: self.height_cm.unwrap_or(base.height_cm),
            weight_kg: self.weight_kg.unwrap_or(base.weight_kg),
            sleep_hours: self.sleep_hours.unwrap_or(base.sleep_hours),
            water_glasses: self.water_glasses.unwrap_or(base.water_glasses),
            activity_level: self
                .activity_level
                .clone()
                .unwrap_or_else(|| base.activity_level.clone()),
        }
    }
}

// ============================================================================
// Output Types
// ============================================================================

/// BMI category over a half-open, lower-inclusive partition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    #[serde(rename = "Severe Thinness")]
    SevereThinness,
    #[serde(rename = "Moderate Thinness")]
    ModerateThinness,
    #[serde(rename = "Mild Thinness")]
    MildThinness,
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Obese Class I")]
    ObeseI,
    #[serde(rename = "Obese Class II")]
    ObeseII,
    #[serde(rename = "Obese Class III")]
    ObeseIII,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::SevereThinness => "Severe Thinness",
            BmiCategory::ModerateThinness => "Moderate Thinness",
            BmiCategory::MildThinness => "Mild Thinness",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObeseI => "Obese Class I",
            BmiCategory::ObeseII => "Obese Class II",
            BmiCategory::ObeseIII => "Obese Class III",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recommendation urgency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Rule group a recommendation came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "BMI")]
    Bmi,
    Sleep,
    Hydration,
    Activity,
    General,
}

/// A single templated recommendation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub topic: Topic,
    pub priority: Priority,
    pub message: String,
}

/// Derived metrics for one profile, recomputed on every call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub health_score: u8,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// Persistence Types
// ============================================================================

/// A profile as kept by the profile store, keyed by normalized email
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredProfile {
    pub email: String,
    pub profile: HealthProfile,
    pub assessment: HealthAssessment,
    pub updated_at: DateTime<Utc>,
}

/// One line of the assessment log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub email: Option<String>,
    pub assessed_at: DateTime<Utc>,
    pub profile: HealthProfile,
    pub assessment: HealthAssessment,
}

impl AssessmentRecord {
    pub fn new(
        email: Option<String>,
        profile: HealthProfile,
        assessment: HealthAssessment,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            assessed_at: Utc::now(),
            profile,
            assessment,
        }
    }
}
