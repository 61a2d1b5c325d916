//! Boundary validation for health profiles.
//!
//! Runs before the engine. The engine itself only rejects values it cannot
//! compute with; domain checks and strict enum handling live here.

use crate::config::{Range, ValidationConfig};
use crate::{ActivityLevel, Error, HealthProfile, Result};

/// Validate a profile against the configured field domains
///
/// Fields are checked in data-model order and the first violation is
/// returned.
pub fn validate(profile: &HealthProfile, config: &ValidationConfig) -> Result<()> {
    check_range("ageYears", f64::from(profile.age_years), config.age_years)?;
    check_range("heightCm", profile.height_cm, config.height_cm)?;
    check_range("weightKg", profile.weight_kg, config.weight_kg)?;
    check_range("sleepHours", profile.sleep_hours, config.sleep_hours)?;
    check_range(
        "waterGlasses",
        f64::from(profile.water_glasses),
        config.water_glasses,
    )?;

    if let ActivityLevel::Other(label) = &profile.activity_level {
        if config.strict_activity_level {
            return Err(Error::UnrecognizedEnum {
                field: "activityLevel",
                value: label.clone(),
            });
        }
        tracing::debug!("Accepting unrecognized activity level {:?}", label);
    }

    Ok(())
}

fn check_range(field: &'static str, value: f64, range: Range) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidInput { field });
    }
    if !range.contains(value) {
        return Err(Error::OutOfRange {
            field,
            value,
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}
