//! Templated recommendations.
//!
//! Four independent rule groups are evaluated in a fixed order (BMI, sleep,
//! hydration, activity), each contributing at most one recommendation. When
//! nothing fires a single general recommendation is returned, so the result
//! is never empty.

use crate::{ActivityLevel, Error, HealthProfile, Priority, Recommendation, Result, Topic};

/// Generate recommendations for a profile and its already computed BMI
///
/// Non-finite BMI and non-finite or negative sleep are rejected; they match
/// no threshold and must not fall through to the general recommendation.
pub fn recommend(profile: &HealthProfile, bmi: f64) -> Result<Vec<Recommendation>> {
    if !bmi.is_finite() {
        return Err(Error::InvalidInput { field: "bmi" });
    }
    if !profile.sleep_hours.is_finite() || profile.sleep_hours < 0.0 {
        return Err(Error::InvalidInput {
            field: "sleepHours",
        });
    }

    let mut recommendations: Vec<Recommendation> = [
        bmi_rule(bmi),
        sleep_rule(profile.sleep_hours),
        hydration_rule(profile.water_glasses),
        activity_rule(&profile.activity_level),
    ]
    .into_iter()
    .flatten()
    .collect();

    if recommendations.is_empty() {
        recommendations.push(Recommendation {
            topic: Topic::General,
            priority: Priority::Low,
            message: "Great job! You're maintaining healthy habits. Keep it up!".into(),
        });
    }

    Ok(recommendations)
}

fn bmi_rule(bmi: f64) -> Option<Recommendation> {
    let (priority, message) = if bmi > 30.0 {
        (
            Priority::High,
            "Your BMI is in the obese range. Consider consulting a healthcare provider \
             about a safe weight management plan.",
        )
    } else if bmi > 25.0 {
        (
            Priority::Medium,
            "Your BMI is above the healthy range. A modest calorie deficit combined with \
             regular exercise can help.",
        )
    } else if bmi < 18.5 {
        (
            Priority::Medium,
            "Your BMI is below the healthy range. Consider nutrient-dense meals and talk \
             to a professional about healthy weight gain.",
        )
    } else {
        return None;
    };

    Some(Recommendation {
        topic: Topic::Bmi,
        priority,
        message: message.into(),
    })
}

fn sleep_rule(hours: f64) -> Option<Recommendation> {
    let (priority, message) = if hours < 6.0 {
        (
            Priority::High,
            "You're not getting enough sleep. Aim for 7-9 hours per night to support \
             recovery and focus.",
        )
    } else if hours > 9.0 {
        (
            Priority::Low,
            "You may be oversleeping. 7-9 hours per night is usually enough for adults.",
        )
    } else {
        return None;
    };

    Some(Recommendation {
        topic: Topic::Sleep,
        priority,
        message: message.into(),
    })
}

fn hydration_rule(glasses: u32) -> Option<Recommendation> {
    if glasses >= 8 {
        return None;
    }

    Some(Recommendation {
        topic: Topic::Hydration,
        priority: Priority::Medium,
        message: format!(
            "You're drinking {} glasses of water a day. Try to reach at least 8 glasses.",
            glasses
        ),
    })
}

fn activity_rule(level: &ActivityLevel) -> Option<Recommendation> {
    let (priority, message) = match level {
        ActivityLevel::Sedentary => (
            Priority::High,
            "Your lifestyle is sedentary. Start with a 20-30 minute walk most days of the week.",
        ),
        ActivityLevel::Light => (
            Priority::Medium,
            "Try to add more moderate activity, aiming for 150 minutes per week.",
        ),
        _ => return None,
    };

    Some(Recommendation {
        topic: Topic::Activity,
        priority,
        message: message.into(),
    })
}
