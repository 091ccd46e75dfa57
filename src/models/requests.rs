use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::EngineResult;
use crate::models::domain::{Origin, UserProfile};

/// Request to predict the enjoyment score for one location
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(nested)]
    pub user_profile: UserProfile,
    #[validate(length(min = 1, max = 200))]
    pub location_name: String,
}

/// Request for ranked nearby recommendations
///
/// Either `target_location` or both `current_lat` and `current_lng` must be set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(nested)]
    pub user_profile: UserProfile,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub target_location: Option<String>,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub current_lat: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub current_lng: Option<f64>,
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, max = 500.0))]
    pub max_distance_km: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 20))]
    pub top_n: Option<usize>,
}

impl RecommendRequest {
    pub fn origin(&self) -> EngineResult<Origin> {
        Origin::from_parts(
            self.target_location.as_deref(),
            self.current_lat,
            self.current_lng,
        )
    }
}
