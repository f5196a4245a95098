//! Lifestyle recommendations attached to every weekly plan

use crate::health_metrics::{ActivityLevel, Goal, UserHealth};

const GENERAL: &[&str] = &[
    "Drink at least 8 glasses of water daily",
    "Stay hydrated during workouts",
    "Aim for 7-9 hours of sleep per night",
    "Maintain consistent sleep schedule",
];

const SEDENTARY: &[&str] = &[
    "Try to incorporate more movement throughout the day",
    "Consider taking short walks during breaks",
];

const GRADUAL_PROGRESSION: &str =
    "Increase workout volume gradually, adding no more than one session per week";

fn goal_advice(goal: Goal) -> &'static [&'static str] {
    match goal {
        Goal::Lose => &[
            "Focus on creating a sustainable calorie deficit",
            "Include high-protein foods to maintain muscle mass",
            "Consider tracking food intake to ensure you're meeting your goals",
        ],
        Goal::Gain => &[
            "Focus on progressive overload in your workouts",
            "Ensure you're eating enough protein for muscle growth",
            "Consider meal timing around workouts",
        ],
        Goal::Maintain => &[
            "Maintain a balanced diet with variety",
            "Stay consistent with your workout routine",
            "Monitor your progress and adjust as needed",
        ],
    }
}

/// Advice gated on goal and activity level
pub fn build_recommendations(health: &UserHealth) -> Vec<String> {
    let mut recommendations: Vec<String> = GENERAL.iter().map(|s| s.to_string()).collect();

    if health.activity_level == ActivityLevel::Sedentary {
        recommendations.extend(SEDENTARY.iter().map(|s| s.to_string()));
    }
    if health.activity_level.is_beginner() {
        recommendations.push(GRADUAL_PROGRESSION.to_string());
    }

    recommendations.extend(goal_advice(health.goal).iter().map(|s| s.to_string()));
    recommendations
}
