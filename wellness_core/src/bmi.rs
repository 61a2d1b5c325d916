//! Body Mass Index calculation and categorization.

use crate::{BmiCategory, Error, Result};

/// Compute BMI from weight (kg) and height (cm), rounded to 2 decimal places
///
/// Rounding is half-away-from-zero. Non-finite inputs and non-positive
/// weight or height are rejected instead of yielding `NaN`/`Infinity`.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Result<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(Error::InvalidInput { field: "weightKg" });
    }
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(Error::InvalidInput { field: "heightCm" });
    }

    let height_m = height_cm / 100.0;
    let raw = weight_kg / (height_m * height_m);
    if !raw.is_finite() {
        // Subnormal heights can still overflow the quotient
        return Err(Error::InvalidInput { field: "heightCm" });
    }

    Ok(round2(raw))
}

/// Categorize a BMI value
///
/// Non-finite values have no category and are rejected.
pub fn categorize(bmi: f64) -> Result<BmiCategory> {
    if !bmi.is_finite() {
        return Err(Error::InvalidInput { field: "bmi" });
    }

    let category = if bmi < 16.0 {
        BmiCategory::SevereThinness
    } else if bmi < 17.0 {
        BmiCategory::ModerateThinness
    } else if bmi < 18.5 {
        BmiCategory::MildThinness
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else if bmi < 35.0 {
        BmiCategory::ObeseI
    } else if bmi < 40.0 {
        BmiCategory::ObeseII
    } else {
        BmiCategory::ObeseIII
    };

    Ok(category)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_bmi() {
        assert_eq!(compute_bmi(70.0, 175.0).unwrap(), 22.86);
        assert_eq!(compute_bmi(98.0, 175.0).unwrap(), 32.0);
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(18.499), 18.5);
    }

    #[test]
    fn test_zero_height_is_invalid() {
        match compute_bmi(70.0, 0.0) {
            Err(Error::InvalidInput { field }) => assert_eq!(field, "heightCm"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_inputs_are_invalid() {
        assert!(matches!(
            compute_bmi(f64::NAN, 175.0),
            Err(Error::InvalidInput { field: "weightKg" })
        ));
        assert!(matches!(
            compute_bmi(70.0, f64::INFINITY),
            Err(Error::InvalidInput { field: "heightCm" })
        ));
        assert!(matches!(
            compute_bmi(-5.0, 175.0),
            Err(Error::InvalidInput { field: "weightKg" })
        ));
        assert!(matches!(
            compute_bmi(70.0, f64::MIN_POSITIVE),
            Err(Error::InvalidInput { field: "heightCm" })
        ));
    }

    #[test]
    fn test_monotonic_in_weight_and_height() {
        let mut previous = 0.0;
        for weight in (30..=300).step_by(5) {
            let bmi = compute_bmi(weight as f64, 175.0).unwrap();
            assert!(bmi > previous, "bmi must grow with weight at {}kg", weight);
            previous = bmi;
        }

        let mut previous = f64::MAX;
        for height in (100..=250).step_by(5) {
            let bmi = compute_bmi(70.0, height as f64).unwrap();
            assert!(bmi < previous, "bmi must shrink with height at {}cm", height);
            previous = bmi;
        }
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(categorize(16.0).unwrap(), BmiCategory::ModerateThinness);
        assert_eq!(categorize(16.0 - f64::EPSILON * 16.0).unwrap(), BmiCategory::SevereThinness);
        assert_eq!(categorize(25.0).unwrap(), BmiCategory::Overweight);
        assert_eq!(categorize(24.9).unwrap(), BmiCategory::Normal);
        assert_eq!(categorize(17.0).unwrap(), BmiCategory::MildThinness);
        assert_eq!(categorize(18.5).unwrap(), BmiCategory::Normal);
        assert_eq!(categorize(30.0).unwrap(), BmiCategory::ObeseI);
        assert_eq!(categorize(35.0).unwrap(), BmiCategory::ObeseII);
        assert_eq!(categorize(40.0).unwrap(), BmiCategory::ObeseIII);
        assert_eq!(categorize(0.0).unwrap(), BmiCategory::SevereThinness);
        assert_eq!(categorize(f64::MAX).unwrap(), BmiCategory::ObeseIII);
    }

    #[test]
    fn test_categories_are_ordered_without_gaps() {
        let mut previous = categorize(10.0).unwrap();
        let mut transitions = 0;
        let mut bmi = 10.0;
        while bmi < 50.0 {
            let current = categorize(bmi).unwrap();
            if current != previous {
                transitions += 1;
                previous = current;
            }
            bmi += 0.01;
        }
        assert_eq!(transitions, 7);
    }

    #[test]
    fn test_categorize_rejects_non_finite() {
        for bmi in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                categorize(bmi),
                Err(Error::InvalidInput { field: "bmi" })
            ));
        }
    }
}
