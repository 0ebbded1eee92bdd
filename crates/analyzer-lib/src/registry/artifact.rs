//! Trained classifier artifacts
//!
//! The artifact files under the models directory decode into [`Classifier`]
//! values: either a single fitted model or a voting ensemble over named
//! members. Every variant exposes the same surface - a hard label and a
//! two-class probability vector whose index 0 is the bankruptcy class.

use crate::error::ArtifactError;
use crate::models::ClassLabel;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A pre-fit classifier loaded from persisted storage
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum Classifier {
    Logistic(LogisticRegression),
    NearestNeighbors(NearestNeighbors),
    DecisionTree(DecisionTree),
    Voting(VotingClassifier),
}

impl Classifier {
    /// Short tag for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Logistic(_) => "logistic_regression",
            Classifier::NearestNeighbors(_) => "nearest_neighbors",
            Classifier::DecisionTree(_) => "decision_tree",
            Classifier::Voting(_) => "voting_ensemble",
        }
    }

    /// Hard class label: argmax of the probability vector, first index
    /// winning ties
    pub fn predict(&self, input: &[f64]) -> Result<ClassLabel, ArtifactError> {
        let [p0, p1] = self.predict_probability(input)?;
        let index = if p0 >= p1 { 0 } else { 1 };
        Ok(ClassLabel::from_index(index))
    }

    /// Two-class probability vector `[p_bankruptcy, p_solvent]`, summing
    /// to 1
    pub fn predict_probability(&self, input: &[f64]) -> Result<[f64; 2], ArtifactError> {
        match self {
            Classifier::Logistic(model) => model.predict_probability(input),
            Classifier::NearestNeighbors(model) => model.predict_probability(input),
            Classifier::DecisionTree(model) => model.predict_probability(input),
            Classifier::Voting(model) => model.predict_probability(input),
        }
    }
}

/// Binary logistic regression: probability of the solvent class is
/// sigmoid(w . x + b)
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct LogisticRegression {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    fn predict_probability(&self, input: &[f64]) -> Result<[f64; 2], ArtifactError> {
        if input.len() != self.weights.len() {
            return Err(ArtifactError::DimensionMismatch {
                expected: self.weights.len(),
                actual: input.len(),
            });
        }
        let z: f64 = self
            .weights
            .iter()
            .zip(input)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        let p_solvent = 1.0 / (1.0 + (-z).exp());
        Ok([1.0 - p_solvent, p_solvent])
    }
}

/// k-nearest-neighbors over the stored training set; probabilities are
/// neighborhood vote fractions
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct NearestNeighbors {
    pub points: Vec<Vec<f64>>,
    /// Class index per training point, 0 = bankruptcy
    pub labels: Vec<u8>,
    pub k: usize,
}

impl NearestNeighbors {
    fn predict_probability(&self, input: &[f64]) -> Result<[f64; 2], ArtifactError> {
        if self.points.is_empty() || self.labels.len() != self.points.len() {
            return Err(ArtifactError::EmptyNeighbors);
        }
        let expected = self.points[0].len();
        if input.len() != expected {
            return Err(ArtifactError::DimensionMismatch {
                expected,
                actual: input.len(),
            });
        }

        let mut distances: Vec<(f64, u8)> = self
            .points
            .iter()
            .zip(&self.labels)
            .map(|(point, &label)| {
                let dist: f64 = point
                    .iter()
                    .zip(input)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum();
                (dist, label)
            })
            .collect();
        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let k = self.k.clamp(1, distances.len());
        let bankrupt_votes = distances[..k].iter().filter(|(_, label)| *label == 0).count();
        let p0 = bankrupt_votes as f64 / k as f64;
        Ok([p0, 1.0 - p0])
    }
}

/// One node of a fitted decision tree
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Route left when `input[feature] <= threshold`, otherwise right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Training-sample counts per class at this leaf
    Leaf { counts: [u64; 2] },
}

/// Decision tree classifier; node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn predict_probability(&self, input: &[f64]) -> Result<[f64; 2], ArtifactError> {
        if self.nodes.is_empty() {
            return Err(ArtifactError::CorruptTree(0));
        }
        let mut index = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has
        // nodes; anything longer means a cycle
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                None => return Err(ArtifactError::CorruptTree(index)),
                Some(TreeNode::Leaf { counts }) => {
                    let total = counts[0] + counts[1];
                    if total == 0 {
                        return Ok([0.5, 0.5]);
                    }
                    let p0 = counts[0] as f64 / total as f64;
                    return Ok([p0, 1.0 - p0]);
                }
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = *input.get(*feature).ok_or(
                        ArtifactError::DimensionMismatch {
                            expected: feature + 1,
                            actual: input.len(),
                        },
                    )?;
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
        Err(ArtifactError::CorruptTree(index))
    }
}

/// How a voting ensemble combines its members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "lowercase")]
pub enum VotingKind {
    /// Average the members' probability vectors
    Soft,
    /// Majority vote on hard labels; probabilities are vote fractions
    Hard,
}

/// One named member of a voting ensemble
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct VotingMember {
    pub name: String,
    pub classifier: Classifier,
}

/// Voting ensemble over several base classifiers
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct VotingClassifier {
    pub members: Vec<VotingMember>,
    pub voting: VotingKind,
}

impl VotingClassifier {
    fn predict_probability(&self, input: &[f64]) -> Result<[f64; 2], ArtifactError> {
        if self.members.is_empty() {
            return Err(ArtifactError::EmptyEnsemble);
        }
        match self.voting {
            VotingKind::Soft => {
                let mut sum = [0.0, 0.0];
                for member in &self.members {
                    let [p0, p1] = member.classifier.predict_probability(input)?;
                    sum[0] += p0;
                    sum[1] += p1;
                }
                let n = self.members.len() as f64;
                Ok([sum[0] / n, sum[1] / n])
            }
            VotingKind::Hard => {
                let mut bankrupt_votes = 0usize;
                for member in &self.members {
                    if member.classifier.predict(input)? == ClassLabel::Bankruptcy {
                        bankrupt_votes += 1;
                    }
                }
                let p0 = bankrupt_votes as f64 / self.members.len() as f64;
                Ok([p0, 1.0 - p0])
            }
        }
    }
}
