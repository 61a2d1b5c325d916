//! Composite health score.
//!
//! The score is the sum of four independently bucketed sub-scores:
//! - BMI (max 30)
//! - Sleep (max 30)
//! - Water intake (max 20)
//! - Activity level (max 20)

use crate::bmi::compute_bmi;
use crate::{ActivityLevel, Error, HealthProfile, Result};
use serde::Serialize;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Individual sub-score contributions for one profile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub bmi: i32,
    pub sleep: i32,
    pub water: i32,
    pub activity: i32,
}

impl ScoreBreakdown {
    /// Sum of the sub-scores clamped to [0, 100]
    ///
    /// The lower bound cannot be hit with the current tables (minimum 20) but
    /// stays in place for future table edits.
    pub fn total(&self) -> u8 {
        let sum = self.bmi + self.sleep + self.water + self.activity;
        sum.clamp(MIN_SCORE, MAX_SCORE) as u8
    }
}

/// Compute the 0-100 health score for a profile
///
/// BMI is always derived here from weight and height, even when the caller
/// already has it, so the score and the reported BMI cannot disagree.
pub fn compute_score(profile: &HealthProfile) -> Result<u8> {
    let breakdown = score_breakdown(profile)?;
    let score = breakdown.total();
    tracing::debug!("Health score {} from {:?}", score, breakdown);
    Ok(score)
}

/// Compute each sub-score for a profile
pub fn score_breakdown(profile: &HealthProfile) -> Result<ScoreBreakdown> {
    let bmi = compute_bmi(profile.weight_kg, profile.height_cm)?;

    if !profile.sleep_hours.is_finite() || profile.sleep_hours < 0.0 {
        return Err(Error::InvalidInput {
            field: "sleepHours",
        });
    }

    Ok(ScoreBreakdown {
        bmi: bmi_points(bmi),
        sleep: sleep_points(profile.sleep_hours),
        water: water_points(profile.water_glasses),
        activity: activity_points(&profile.activity_level),
    })
}

fn bmi_points(bmi: f64) -> i32 {
    if (18.5..=24.9).contains(&bmi) {
        30
    } else if (17.0..18.5).contains(&bmi) || (bmi > 24.9 && bmi <= 27.0) {
        20
    } else if (16.0..17.0).contains(&bmi) || (bmi > 27.0 && bmi <= 30.0) {
        10
    } else {
        5
    }
}

fn sleep_points(hours: f64) -> i32 {
    if (7.0..=9.0).contains(&hours) {
        30
    } else if (6.0..7.0).contains(&hours) {
        20
    } else if (5.0..6.0).contains(&hours) {
        10
    } else {
        5
    }
}

fn water_points(glasses: u32) -> i32 {
    if glasses >= 8 {
        20
    } else if glasses >= 6 {
        15
    } else if glasses >= 4 {
        10
    } else {
        5
    }
}

fn activity_points(level: &ActivityLevel) -> i32 {
    match level {
        ActivityLevel::Sedentary => 5,
        ActivityLevel::Light => 10,
        ActivityLevel::Moderate => 15,
        ActivityLevel::Active => 20,
        ActivityLevel::Other(label) => {
            tracing::warn!(
                "Unrecognized activity level {:?}, scoring as sedentary",
                label
            );
            5
        }
    }
}
