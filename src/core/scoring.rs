use crate::models::{Location, RecommendationLevel, ScoringContext, UserProfile};

/// Number of model inputs
pub const FEATURE_COUNT: usize = 12;

/// Feature names in the order the model was trained on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "u_hist", "u_adv", "u_nat", "u_rel", "l_hist", "l_adv", "l_nat", "l_rel", "l_outdoor",
    "l_lat", "l_lng", "c_raining",
];

/// Lowest score a prediction is reported with
pub const MIN_SCORE: f64 = 1.0;
/// Highest score a prediction is reported with
pub const MAX_SCORE: f64 = 10.0;

/// Classification thresholds (inclusive lower bounds)
pub const HIGHLY_RECOMMENDED_THRESHOLD: f64 = 7.5;
pub const RECOMMENDED_THRESHOLD: f64 = 6.0;
pub const MIGHT_ENJOY_THRESHOLD: f64 = 4.0;

/// Fixed-order model input
///
/// The order must match [`FEATURE_NAMES`]; reordering silently corrupts
/// predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(profile: &UserProfile, location: &Location, context: ScoringContext) -> Self {
        Self([
            profile.historical,
            profile.adventure,
            profile.nature,
            profile.religious,
            location.historical,
            location.adventure,
            location.nature,
            location.religious,
            flag(location.outdoor),
            location.latitude,
            location.longitude,
            flag(context.raining),
        ])
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[inline]
fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// A pre-trained enjoyment model
///
/// Implementations are loaded once and evaluated concurrently from many
/// request handlers, so they must be immutable after construction.
pub trait EnjoymentScorer: Send + Sync {
    /// Raw model output for one feature vector
    fn evaluate(&self, features: &FeatureVector) -> f64;

    /// Short human-readable description for startup logs
    fn describe(&self) -> String;
}

/// Clamp raw model output into the reported score range
///
/// Non-finite output maps to the lower bound.
#[inline]
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(MIN_SCORE, MAX_SCORE)
    } else {
        MIN_SCORE
    }
}

/// Map an enjoyment score to its recommendation level
pub fn classify(score: f64) -> RecommendationLevel {
    if score >= HIGHLY_RECOMMENDED_THRESHOLD {
        RecommendationLevel::HighlyRecommended
    } else if score >= RECOMMENDED_THRESHOLD {
        RecommendationLevel::Recommended
    } else if score >= MIGHT_ENJOY_THRESHOLD {
        RecommendationLevel::MightEnjoy
    } else {
        RecommendationLevel::NotRecommended
    }
}
