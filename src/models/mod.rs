// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Location, Origin, OriginKind, Prediction, RecommendationLevel, Recommendations,
    ScoredCandidate, ScoringContext, SearchOrigin, UserProfile,
};
pub use requests::{PredictRequest, RecommendRequest};
pub use responses::{
    ErrorResponse, HealthResponse, Highlights, LocationAttributes, PredictionResponse,
    RecommendationItem, RecommendationsResponse, SearchOriginInfo,
};
