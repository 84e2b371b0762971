//! Heading classifier capability and the loadable model artifact.
//!
//! The pipeline only sees [`HeadingClassifier`]: a batch of feature vectors
//! in, one `0`/`1` prediction per vector out. [`HeadingModel`] is the
//! implementation backed by a trained artifact stored as JSON.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::outline::{FeatureVector, FEATURE_NAMES};

const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Predicts whether lines are headings.
///
/// Implementations are shared read-only across documents, so they must not
/// mutate state during prediction.
pub trait HeadingClassifier: Send + Sync {
    /// Predict `1` (heading) or `0` for each feature vector, in input order.
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<u8>>;
}

impl<F> HeadingClassifier for F
where
    F: Fn(&FeatureVector) -> u8 + Send + Sync,
{
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<u8>> {
        Ok(batch.iter().map(|features| self(features)).collect())
    }
}

/// One node of a binary decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, otherwise to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

/// A decision tree stored as a flat node list, root at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Check that evaluation always terminates on a leaf.
    fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::ModelLoad("decision tree has no nodes".to_string()));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(Error::ModelLoad(format!(
                            "node {} splits on feature {} (only {} features)",
                            index, feature, FEATURE_COUNT
                        )));
                    }
                    for child in [left, right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(Error::ModelLoad(format!(
                                "node {} has invalid child index {}",
                                index, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { class } => {
                    if class > 1 {
                        return Err(Error::ModelLoad(format!(
                            "leaf {} has class {} (expected 0 or 1)",
                            index, class
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn predict_one(&self, x: &[f64; FEATURE_COUNT]) -> u8 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { class } => return class,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// The estimator inside a model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    DecisionTree(DecisionTree),
    /// Majority vote; a tie predicts 0.
    RandomForest { trees: Vec<DecisionTree> },
    /// Predicts 1 when `coefficients · x + intercept >= 0`.
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

impl Estimator {
    fn kind(&self) -> &'static str {
        match self {
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::RandomForest { .. } => "random_forest",
            Estimator::Logistic { .. } => "logistic",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Estimator::DecisionTree(tree) => tree.validate(),
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(Error::ModelLoad("random forest has no trees".to_string()));
                }
                trees.iter().try_for_each(DecisionTree::validate)
            }
            Estimator::Logistic { coefficients, .. } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(Error::ModelLoad(format!(
                        "logistic model has {} coefficients, expected {}",
                        coefficients.len(),
                        FEATURE_COUNT
                    )));
                }
                Ok(())
            }
        }
    }

    fn predict_one(&self, x: &[f64; FEATURE_COUNT]) -> u8 {
        match self {
            Estimator::DecisionTree(tree) => tree.predict_one(x),
            Estimator::RandomForest { trees } => {
                let votes = trees.iter().filter(|t| t.predict_one(x) == 1).count();
                u8::from(votes * 2 > trees.len())
            }
            Estimator::Logistic {
                coefficients,
                intercept,
            } => {
                let score: f64 = coefficients.iter().zip(x).map(|(w, v)| w * v).sum();
                u8::from(score + intercept >= 0.0)
            }
        }
    }
}

/// A trained heading classifier loaded from a JSON artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingModel {
    /// Input columns; must equal [`FEATURE_NAMES`].
    pub features: Vec<String>,
    pub model: Estimator,
}

impl HeadingModel {
    /// Load and validate a model artifact.
    ///
    /// A missing file is reported as [`Error::ModelNotFound`], anything else
    /// that prevents loading as [`Error::ModelLoad`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ModelNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(Error::ModelLoad(format!("{}: {}", path.display(), e)));
            }
        };

        let model = Self::from_json(&data)?;
        log::info!(
            "Loaded {} model from {}",
            model.model.kind(),
            path.display()
        );
        Ok(model)
    }

    /// Parse and validate a model artifact from a JSON string.
    pub fn from_json(data: &str) -> Result<Self> {
        let model: HeadingModel =
            serde_json::from_str(data).map_err(|e| Error::ModelLoad(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Estimator kind, as named in the artifact.
    pub fn kind(&self) -> &'static str {
        self.model.kind()
    }

    fn validate(&self) -> Result<()> {
        if self.features.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(Error::ModelLoad(format!(
                "model features {:?} do not match {:?}",
                self.features, FEATURE_NAMES
            )));
        }
        self.model.validate()
    }
}

impl HeadingClassifier for HeadingModel {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<u8>> {
        Ok(batch
            .iter()
            .map(|features| self.model.predict_one(&features.to_array()))
            .collect())
    }
}
