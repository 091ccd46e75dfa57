use serde::{Deserialize, Serialize};

use crate::models::domain::{
    Location, OriginKind, Prediction, RecommendationLevel, Recommendations, ScoredCandidate,
    SearchOrigin, UserProfile,
};

/// Location feature values used in a prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationAttributes {
    pub l_hist: f64,
    pub l_adv: f64,
    pub l_nat: f64,
    pub l_rel: f64,
    pub l_outdoor: f64,
    pub l_lat: f64,
    pub l_lng: f64,
}

impl From<&Location> for LocationAttributes {
    fn from(location: &Location) -> Self {
        Self {
            l_hist: location.historical,
            l_adv: location.adventure,
            l_nat: location.nature,
            l_rel: location.religious,
            l_outdoor: flag(location.outdoor),
            l_lat: location.latitude,
            l_lng: location.longitude,
        }
    }
}

/// Response for the predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub location_name: String,
    pub predicted_score: f64,
    pub recommendation_level: RecommendationLevel,
    pub location_attributes: LocationAttributes,
}

impl From<Prediction<'_>> for PredictionResponse {
    fn from(prediction: Prediction<'_>) -> Self {
        Self {
            location_name: prediction.location.name.clone(),
            predicted_score: prediction.score,
            recommendation_level: prediction.level,
            location_attributes: LocationAttributes::from(prediction.location),
        }
    }
}

/// Key location attributes shown alongside a recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlights {
    pub historical: f64,
    pub adventure: f64,
    pub nature: f64,
    pub religious: f64,
    pub outdoor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub rank: usize,
    pub location_name: String,
    pub predicted_score: f64,
    pub recommendation_level: RecommendationLevel,
    pub distance_km: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub highlights: Highlights,
}

impl From<&ScoredCandidate<'_>> for RecommendationItem {
    fn from(candidate: &ScoredCandidate<'_>) -> Self {
        let location = candidate.location;
        Self {
            rank: candidate.rank,
            location_name: location.name.clone(),
            predicted_score: candidate.score,
            recommendation_level: candidate.level,
            distance_km: candidate.distance_km,
            latitude: location.latitude,
            longitude: location.longitude,
            highlights: Highlights {
                historical: location.historical,
                adventure: location.adventure,
                nature: location.nature,
                religious: location.religious,
                outdoor: flag(location.outdoor),
            },
        }
    }
}

/// Search origin as echoed back to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchOriginInfo {
    #[serde(rename = "type")]
    pub kind: OriginKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl From<SearchOrigin> for SearchOriginInfo {
    fn from(origin: SearchOrigin) -> Self {
        Self {
            kind: origin.kind,
            name: origin.name,
            lat: origin.latitude,
            lng: origin.longitude,
        }
    }
}

/// Response for the recommend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub search_origin: SearchOriginInfo,
    pub total_candidates: usize,
    pub recommendations: Vec<RecommendationItem>,
    pub max_distance_km: f64,
    pub user_profile: UserProfile,
}

impl RecommendationsResponse {
    pub fn new(
        result: Recommendations<'_>,
        max_distance_km: f64,
        user_profile: UserProfile,
    ) -> Self {
        Self {
            recommendations: result.items.iter().map(RecommendationItem::from).collect(),
            search_origin: SearchOriginInfo::from(result.origin),
            total_candidates: result.total_candidates,
            max_distance_km,
            user_profile,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
    pub locations_loaded: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
