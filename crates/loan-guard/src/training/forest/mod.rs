//! Bagged ensemble of CART trees with probability averaging.

mod tree;

pub use tree::{DecisionTree, Node, NodeIndex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::screening::ProbabilisticClassifier;
use tree::TreeParams;

/// Hyperparameters for [`RandomForestClassifier::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestOptions {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestError {
    #[error("cannot fit a forest on an empty feature matrix")]
    Empty,
    #[error("feature rows have inconsistent widths (expected {expected}, found {found})")]
    Ragged { expected: usize, found: usize },
    #[error("{features} feature rows but {targets} targets")]
    LengthMismatch { features: usize, targets: usize },
    #[error("forest needs at least one tree")]
    NoTrees,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    n_features: usize,
    n_classes: usize,
    options: ForestOptions,
    trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    /// Fit on row-major `features` against class codes `0..n_classes`.
    ///
    /// Each tree sees a bootstrap sample of the rows and considers
    /// `floor(sqrt(n_features))` candidate features per split.
    pub fn fit(
        features: &[Vec<f64>],
        targets: &[usize],
        options: ForestOptions,
    ) -> Result<Self, ForestError> {
        if options.n_trees == 0 {
            return Err(ForestError::NoTrees);
        }
        let n_features = match features.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(ForestError::Empty),
        };
        if let Some(row) = features.iter().find(|row| row.len() != n_features) {
            return Err(ForestError::Ragged {
                expected: n_features,
                found: row.len(),
            });
        }
        if features.len() != targets.len() {
            return Err(ForestError::LengthMismatch {
                features: features.len(),
                targets: targets.len(),
            });
        }

        let n_classes = targets.iter().copied().max().map(|max| max + 1).unwrap_or(0);
        let params = TreeParams {
            n_classes,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
            max_depth: options.max_depth,
        };

        let n_samples = features.len();
        let mut seeds = StdRng::seed_from_u64(options.seed);
        let trees = (0..options.n_trees)
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(seeds.gen());
                let bootstrap = (0..n_samples)
                    .map(|_| rng.gen_range(0..n_samples))
                    .collect();
                DecisionTree::fit(features, targets, bootstrap, &params, &mut rng)
            })
            .collect::<Vec<_>>();

        debug!(
            trees = trees.len(),
            n_features,
            n_classes,
            mean_nodes = trees.iter().map(DecisionTree::node_count).sum::<usize>() / trees.len(),
            "random forest fitted"
        );

        Ok(Self {
            n_features,
            n_classes,
            options,
            trees,
        })
    }

    pub fn options(&self) -> ForestOptions {
        self.options
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Mean of the per-tree leaf distributions.
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.predict_proba(row)) {
                *total += p;
            }
        }
        let n_trees = self.trees.len().max(1) as f64;
        totals.iter_mut().for_each(|total| *total /= n_trees);
        totals
    }

    /// Index of the most probable class; ties resolve to the lower code.
    pub fn predict(&self, row: &[f64]) -> usize {
        argmax(&self.predict_proba(row))
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = index;
        }
    }
    best
}

impl ProbabilisticClassifier for RandomForestClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        RandomForestClassifier::predict_proba(self, features)
    }
}
