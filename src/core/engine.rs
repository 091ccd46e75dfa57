use std::path::Path;

use validator::Validate;

use crate::core::{
    catalog::LocationCatalog,
    distance::is_valid_coordinate,
    ensemble::TreeEnsemble,
    filters::nearby_candidates,
    scoring::{clamp_score, classify, EnjoymentScorer, FeatureVector},
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Location, Origin, OriginKind, Prediction, RecommendationLevel, Recommendations,
    ScoredCandidate, ScoringContext, SearchOrigin, UserProfile,
};

/// Readiness figures reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub model_loaded: bool,
    pub locations_loaded: usize,
    pub is_ready: bool,
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Origin resolution (catalog lookup or raw GPS)
/// 2. Candidate generation by great-circle distance
/// 3. Model scoring and classification
/// 4. Ranking (score descending, distance ascending) and top-N truncation
///
/// Holds only immutable state, so one instance serves all requests.
pub struct RecommendationEngine {
    catalog: LocationCatalog,
    scorer: Box<dyn EnjoymentScorer>,
    context: ScoringContext,
}

impl RecommendationEngine {
    pub fn new<S: EnjoymentScorer + 'static>(catalog: LocationCatalog, scorer: S) -> Self {
        Self {
            catalog,
            scorer: Box::new(scorer),
            context: ScoringContext::default(),
        }
    }

    /// Load the reference dataset and the tree ensemble from disk
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        locations_path: P,
        model_path: Q,
    ) -> EngineResult<Self> {
        let scorer = TreeEnsemble::load(model_path)?;
        let catalog = LocationCatalog::load(locations_path)?;
        Ok(Self::new(catalog, scorer))
    }

    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    pub fn scorer_description(&self) -> String {
        self.scorer.describe()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            model_loaded: true,
            locations_loaded: self.catalog.len(),
            is_ready: !self.catalog.is_empty(),
        }
    }

    /// Score a single user/location pair
    pub fn score(&self, profile: &UserProfile, location: &Location) -> (f64, RecommendationLevel) {
        let features = FeatureVector::new(profile, location, self.context);
        let score = clamp_score(self.scorer.evaluate(&features));
        (score, classify(score))
    }

    /// Predict the enjoyment score for one named location
    pub fn predict(&self, profile: &UserProfile, location_name: &str) -> EngineResult<Prediction<'_>> {
        validate_profile(profile)?;

        let location = self.catalog.lookup(location_name)?;
        let (score, level) = self.score(profile, location);

        tracing::debug!("Predicted {:.3} ({}) for {}", score, level, location.name);

        Ok(Prediction {
            location,
            score,
            level,
        })
    }

    /// Rank the best locations within `max_distance_km` of the origin
    ///
    /// Returns at most `top_n` entries ranked 1..=k. An empty radius is not
    /// an error.
    pub fn recommend(
        &self,
        profile: &UserProfile,
        origin: &Origin,
        max_distance_km: f64,
        top_n: usize,
    ) -> EngineResult<Recommendations<'_>> {
        validate_profile(profile)?;
        if !max_distance_km.is_finite() || max_distance_km < 0.0 {
            return Err(EngineError::invalid(format!(
                "max_distance_km must be a non-negative number, got {}",
                max_distance_km
            )));
        }

        let origin = self.resolve_origin(origin)?;

        // Stage 2: Candidate generation
        let candidates = nearby_candidates(
            self.catalog.all(),
            origin.latitude,
            origin.longitude,
            max_distance_km,
        );
        let total_candidates = candidates.len();

        // Stage 3: Scoring
        let mut scored: Vec<ScoredCandidate<'_>> = candidates
            .into_iter()
            .map(|candidate| {
                let (score, level) = self.score(profile, candidate.location);
                ScoredCandidate {
                    rank: 0,
                    location: candidate.location,
                    distance_km: candidate.distance_km,
                    score,
                    level,
                }
            })
            .collect();

        // Stage 4: Sort by score (descending) and then by distance (ascending).
        // The sort is stable, so full ties keep dataset order.
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.distance_km.total_cmp(&b.distance_km))
        });
        scored.truncate(top_n);
        for (i, candidate) in scored.iter_mut().enumerate() {
            candidate.rank = i + 1;
        }

        tracing::debug!(
            "Ranked {} of {} candidates within {} km of ({}, {})",
            scored.len(),
            total_candidates,
            max_distance_km,
            origin.latitude,
            origin.longitude
        );

        Ok(Recommendations {
            origin,
            total_candidates,
            items: scored,
        })
    }

    fn resolve_origin(&self, origin: &Origin) -> EngineResult<SearchOrigin> {
        match origin {
            Origin::Named(name) => {
                let location = self.catalog.lookup(name)?;
                Ok(SearchOrigin {
                    kind: OriginKind::Location,
                    name: Some(location.name.clone()),
                    latitude: location.latitude,
                    longitude: location.longitude,
                })
            }
            Origin::Coordinates {
                latitude,
                longitude,
            } => {
                if !is_valid_coordinate(*latitude, *longitude) {
                    return Err(EngineError::invalid(format!(
                        "coordinates ({}, {}) are outside valid bounds",
                        latitude, longitude
                    )));
                }
                Ok(SearchOrigin {
                    kind: OriginKind::Gps,
                    name: None,
                    latitude: *latitude,
                    longitude: *longitude,
                })
            }
        }
    }
}

fn validate_profile(profile: &UserProfile) -> EngineResult<()> {
    if !profile.is_finite() {
        return Err(EngineError::invalid("user_profile values must be finite numbers"));
    }
    profile
        .validate()
        .map_err(|e| EngineError::invalid(format!("user_profile: {}", e)))
}
