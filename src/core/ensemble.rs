//! Gradient boosted tree ensemble evaluated from an XGBoost JSON model
//!
//! Only the parts of the format needed for regression inference are read:
//! the tree arrays under `learner.gradient_booster.model.trees` and the
//! base score under `learner.learner_model_param`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::scoring::{EnjoymentScorer, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::error::{EngineError, EngineResult};

/// Objectives whose prediction is the raw margin
const IDENTITY_OBJECTIVES: [&str; 5] = [
    "reg:squarederror",
    "reg:linear",
    "reg:pseudohubererror",
    "reg:absoluteerror",
    "reg:quantileerror",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf {
        value: f32,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
}

/// One regression tree; node 0 is the root
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Walk from the root to a leaf and return its value
    ///
    /// Children always have larger indices than their parent (checked at
    /// load time), so the walk terminates.
    pub fn predict(&self, features: &FeatureVector) -> f32 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = features.get(feature).unwrap_or(f64::NAN);
                    idx = if value.is_nan() {
                        if default_left {
                            left
                        } else {
                            right
                        }
                    } else if (value as f32) < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn from_raw(id: usize, raw: RawTree) -> EngineResult<Self> {
        let n = raw.left_children.len();
        if n == 0 {
            return Err(EngineError::model_unavailable(format!("tree {} has no nodes", id)));
        }
        if raw.right_children.len() != n
            || raw.split_indices.len() != n
            || raw.split_conditions.len() != n
            || (!raw.default_left.is_empty() && raw.default_left.len() != n)
        {
            return Err(EngineError::model_unavailable(format!(
                "tree {} has mismatched node arrays",
                id
            )));
        }
        if let Some(node) = raw.split_type.iter().position(|&t| t != 0) {
            return Err(EngineError::model_unavailable(format!(
                "tree {} node {} uses a categorical split",
                id, node
            )));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = raw.left_children[i];
            let right = raw.right_children[i];

            if left == -1 {
                nodes.push(Node::Leaf {
                    value: raw.split_conditions[i] as f32,
                });
                continue;
            }

            let child = |c: i64| -> EngineResult<usize> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| {
                        EngineError::model_unavailable(format!(
                            "tree {} node {} has invalid child {}",
                            id, i, c
                        ))
                    })
            };

            let feature = usize::try_from(raw.split_indices[i])
                .ok()
                .filter(|&f| f < FEATURE_COUNT)
                .ok_or_else(|| {
                    EngineError::model_unavailable(format!(
                        "tree {} node {} splits on unknown feature {}",
                        id, i, raw.split_indices[i]
                    ))
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: raw.split_conditions[i] as f32,
                left: child(left)?,
                right: child(right)?,
                default_left: raw.default_left.get(i).map(Flag::is_set).unwrap_or(false),
            });
        }

        Ok(Self { nodes })
    }
}

/// Additive ensemble of regression trees
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    base_score: f32,
    trees: Vec<RegressionTree>,
    objective: String,
}

impl TreeEnsemble {
    /// Load a model saved with XGBoost's `save_model("*.json")`
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::model_unavailable(format!("{}: {}", path.display(), e))
        })?;

        let model = Self::from_json(&json)?;
        tracing::info!("Model loaded from {} ({})", path.display(), model.describe());
        Ok(model)
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        let raw: RawModel = serde_json::from_str(json).map_err(EngineError::model_unavailable)?;
        let learner = raw.learner;

        let objective = learner
            .objective
            .map(|o| o.name)
            .unwrap_or_else(|| "reg:squarederror".to_string());
        if !IDENTITY_OBJECTIVES.contains(&objective.as_str()) {
            return Err(EngineError::model_unavailable(format!(
                "unsupported objective '{}'",
                objective
            )));
        }

        let params = learner.learner_model_param;
        if let Some(num_feature) = params.num_feature.as_deref() {
            if num_feature.trim() != FEATURE_COUNT.to_string() {
                return Err(EngineError::model_unavailable(format!(
                    "model expects {} features, engine provides {}",
                    num_feature, FEATURE_COUNT
                )));
            }
        }
        if let Some(num_target) = params.num_target.as_deref() {
            if num_target.trim() != "1" {
                return Err(EngineError::model_unavailable(format!(
                    "multi-target models are not supported (num_target = {})",
                    num_target
                )));
            }
        }
        if !learner.feature_names.is_empty() && learner.feature_names != FEATURE_NAMES {
            return Err(EngineError::model_unavailable(format!(
                "feature names {:?} do not match expected order {:?}",
                learner.feature_names, FEATURE_NAMES
            )));
        }

        let base_score = parse_base_score(&params.base_score)?;

        if learner.gradient_booster.name != "gbtree" {
            return Err(EngineError::model_unavailable(format!(
                "unsupported booster '{}'",
                learner.gradient_booster.name
            )));
        }
        let booster = learner
            .gradient_booster
            .model
            .ok_or_else(|| EngineError::model_unavailable("booster has no model section"))?;

        let mut trees = booster
            .trees
            .into_iter()
            .enumerate()
            .map(|(id, tree)| RegressionTree::from_raw(id, tree))
            .collect::<EngineResult<Vec<_>>>()?;

        // Early-stopped models predict with the trees up to the best round only
        if let Some(best) = learner.attributes.get("best_iteration") {
            let best: usize = best.trim().parse().map_err(|_| {
                EngineError::model_unavailable(format!("invalid best_iteration '{}'", best))
            })?;
            let per_round = booster.gbtree_model_param.parallel_trees()?;
            let keep = (best + 1).saturating_mul(per_round);
            if keep < trees.len() {
                tracing::info!("Using {} of {} trees (best_iteration = {})", keep, trees.len(), best);
                trees.truncate(keep);
            }
        }

        Ok(Self {
            base_score,
            trees,
            objective,
        })
    }

    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

impl EnjoymentScorer for TreeEnsemble {
    /// Accumulates in f32 starting from the base score, one tree at a time
    fn evaluate(&self, features: &FeatureVector) -> f64 {
        let prediction = self
            .trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict(features));
        f64::from(prediction)
    }

    fn describe(&self) -> String {
        format!(
            "{} trees, objective {}, base score {}",
            self.trees.len(),
            self.objective,
            self.base_score
        )
    }
}

/// Base score is stored as a string: `"5E-1"`, or `"[5E-1]"` in newer releases
fn parse_base_score(raw: &str) -> EngineResult<f32> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let mut parts = trimmed.split(',');
    let first = parts.next().unwrap_or_default().trim();
    if parts.next().is_some() {
        return Err(EngineError::model_unavailable(format!(
            "base score '{}' has more than one value",
            raw
        )));
    }

    first
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EngineError::model_unavailable(format!("invalid base score '{}'", raw)))
}

#[derive(Debug, Deserialize)]
struct RawModel {
    learner: RawLearner,
}

#[derive(Debug, Deserialize)]
struct RawLearner {
    gradient_booster: RawBooster,
    learner_model_param: RawModelParam,
    #[serde(default)]
    objective: Option<RawObjective>,
    #[serde(default)]
    feature_names: Vec<String>,
    #[serde(default)]
    attributes: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawBooster {
    name: String,
    #[serde(default)]
    model: Option<RawGbtree>,
}

#[derive(Debug, Deserialize)]
struct RawGbtree {
    trees: Vec<RawTree>,
    #[serde(default)]
    gbtree_model_param: RawGbtreeParam,
}

#[derive(Debug, Default, Deserialize)]
struct RawGbtreeParam {
    #[serde(default)]
    num_parallel_tree: Option<String>,
}

impl RawGbtreeParam {
    fn parallel_trees(&self) -> EngineResult<usize> {
        match self.num_parallel_tree.as_deref() {
            None => Ok(1),
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    EngineError::model_unavailable(format!("invalid num_parallel_tree '{}'", raw))
                }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTree {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    #[serde(default)]
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<i64>,
}

/// `default_left` is written as integers by current releases and as booleans by older ones
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(i) => *i != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawModelParam {
    base_score: String,
    #[serde(default)]
    num_feature: Option<String>,
    #[serde(default)]
    num_target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawObjective {
    name: String,
}
