//! Health assessment engine.
//!
//! Combines the BMI calculator, categorizer, score engine and recommendation
//! generator into a single pure call. No state is kept between calls.

use crate::bmi::{categorize, compute_bmi};
use crate::recommend::recommend;
use crate::score::compute_score;
use crate::{HealthAssessment, HealthProfile, Result};

/// Assess a profile
///
/// BMI is computed once for the reported fields and re-derived inside
/// [`compute_score`], so the score always matches the reported BMI.
pub fn assess(profile: &HealthProfile) -> Result<HealthAssessment> {
    let bmi = compute_bmi(profile.weight_kg, profile.height_cm)?;
    let health_score = compute_score(profile)?;
    let bmi_category = categorize(bmi)?;
    let recommendations = recommend(profile, bmi)?;

    tracing::debug!(
        "Assessed profile: bmi {} ({}), score {}, {} recommendations",
        bmi,
        bmi_category,
        health_score,
        recommendations.len()
    );

    Ok(HealthAssessment {
        bmi,
        bmi_category,
        health_score,
        recommendations,
    })
}
