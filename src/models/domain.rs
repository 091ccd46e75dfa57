use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use validator::Validate;

use crate::error::{EngineError, EngineResult};

/// Tourist location with static affinity attributes
///
/// Deserialized from the reference dataset, whose columns are
/// `Location_Name, l_hist, l_adv, l_nat, l_rel, l_outdoor, l_lat, l_lng`.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Location {
    #[validate(length(min = 1, max = 200))]
    #[serde(rename = "Location_Name", alias = "name")]
    pub name: String,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "l_hist")]
    pub historical: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "l_adv")]
    pub adventure: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "l_nat")]
    pub nature: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "l_rel")]
    pub religious: f64,
    #[serde(rename = "l_outdoor", deserialize_with = "deserialize_flag")]
    pub outdoor: bool,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(rename = "l_lat")]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(rename = "l_lng")]
    pub longitude: f64,
}

impl Location {
    /// Name used for catalog lookups: trimmed and lower-cased
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Validator's range checks let NaN through, so check finiteness separately
    pub fn is_finite(&self) -> bool {
        [
            self.historical,
            self.adventure,
            self.nature,
            self.religious,
            self.latitude,
            self.longitude,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Accepts `0/1`, `0.0/1.0`, `true/false` and `yes/no` for the outdoor column
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid outdoor flag '{}', expected 0 or 1",
            other
        ))),
    }
}

/// User interest profile, each preference in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "u_hist")]
    pub historical: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "u_adv")]
    pub adventure: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "u_nat")]
    pub nature: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "u_rel")]
    pub religious: f64,
}

impl UserProfile {
    pub fn new(historical: f64, adventure: f64, nature: f64, religious: f64) -> Self {
        Self {
            historical,
            adventure,
            nature,
            religious,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.historical, self.adventure, self.nature, self.religious]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Context flags fed to the scorer alongside profile and location
///
/// Rain is a static placeholder until a live weather feed exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringContext {
    pub raining: bool,
}

/// Discrete label derived from the enjoyment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationLevel {
    #[serde(rename = "HIGHLY RECOMMENDED")]
    HighlyRecommended,
    #[serde(rename = "RECOMMENDED")]
    Recommended,
    #[serde(rename = "MIGHT ENJOY")]
    MightEnjoy,
    #[serde(rename = "NOT RECOMMENDED")]
    NotRecommended,
}

impl RecommendationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighlyRecommended => "HIGHLY RECOMMENDED",
            Self::Recommended => "RECOMMENDED",
            Self::MightEnjoy => "MIGHT ENJOY",
            Self::NotRecommended => "NOT RECOMMENDED",
        }
    }
}

impl fmt::Display for RecommendationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a recommendation search is anchored
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// A catalog location, resolved by name
    Named(String),
    /// Raw GPS coordinates
    Coordinates { latitude: f64, longitude: f64 },
}

impl Origin {
    /// Build an origin from the optional request fields
    ///
    /// Exactly one of `target` or the full coordinate pair must be present.
    /// A blank target counts as absent.
    pub fn from_parts(
        target: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> EngineResult<Self> {
        let target = target.map(str::trim).filter(|t| !t.is_empty());

        match (target, latitude, longitude) {
            (Some(name), None, None) => Ok(Self::Named(name.to_string())),
            (None, Some(latitude), Some(longitude)) => Ok(Self::Coordinates { latitude, longitude }),
            (Some(_), _, _) => Err(EngineError::invalid(
                "Provide either 'target_location' or 'current_lat'/'current_lng', not both",
            )),
            (None, Some(_), None) | (None, None, Some(_)) => Err(EngineError::invalid(
                "Both 'current_lat' and 'current_lng' must be provided together",
            )),
            (None, None, None) => Err(EngineError::invalid(
                "Either 'target_location' or both 'current_lat' and 'current_lng' must be provided",
            )),
        }
    }
}

/// How the search origin was specified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    Location,
    Gps,
}

/// Resolved search origin
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOrigin {
    pub kind: OriginKind,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Single-location prediction
#[derive(Debug, Clone)]
pub struct Prediction<'a> {
    pub location: &'a Location,
    pub score: f64,
    pub level: RecommendationLevel,
}

/// Candidate that survived the distance filter, with its score
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub rank: usize,
    pub location: &'a Location,
    pub distance_km: f64,
    pub score: f64,
    pub level: RecommendationLevel,
}

/// Result of a recommendation search
#[derive(Debug, Clone)]
pub struct Recommendations<'a> {
    pub origin: SearchOrigin,
    pub total_candidates: usize,
    pub items: Vec<ScoredCandidate<'a>>,
}
