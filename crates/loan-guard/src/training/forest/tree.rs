use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const MIN_SAMPLES_SPLIT: usize = 2;

pub type NodeIndex = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Class frequencies of the training samples that reached this leaf.
    Leaf { distribution: Vec<f64> },
    /// Samples with `value <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: NodeIndex,
        right: NodeIndex,
    },
}

/// CART classification tree split on Gini impurity, stored as a flat node arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

pub(crate) struct TreeParams {
    pub n_classes: usize,
    pub max_features: usize,
    pub max_depth: Option<usize>,
}

impl DecisionTree {
    /// Grow a tree over `samples`, which may repeat indices (bootstrap draws).
    pub(crate) fn fit<R: Rng>(
        features: &[Vec<f64>],
        targets: &[usize],
        samples: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut builder = TreeBuilder {
            features,
            targets,
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(samples, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    pub fn predict_proba(&self, row: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: NodeIndex) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct TreeBuilder<'a, R> {
    features: &'a [Vec<f64>],
    targets: &'a [usize],
    params: &'a TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
}

impl<R: Rng> TreeBuilder<'_, R> {
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> NodeIndex {
        let counts = self.class_counts(&samples);
        let occupied = counts.iter().filter(|count| **count > 0).count();
        let depth_exhausted = self
            .params
            .max_depth
            .map(|limit| depth >= limit)
            .unwrap_or(false);

        if occupied <= 1 || samples.len() < MIN_SAMPLES_SPLIT || depth_exhausted {
            return self.leaf(&counts, samples.len());
        }

        let Some(split) = self.best_split(&samples) else {
            return self.leaf(&counts, samples.len());
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|sample| self.features[*sample][split.feature] <= split.threshold);

        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });
        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        index
    }

    fn leaf(&mut self, counts: &[usize], total: usize) -> NodeIndex {
        let total = total.max(1) as f64;
        let distribution = counts.iter().map(|count| *count as f64 / total).collect();
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.params.n_classes];
        for sample in samples {
            counts[self.targets[*sample]] += 1;
        }
        counts
    }

    /// Visit features in random order; keep drawing past `max_features` until a valid split exists.
    fn best_split(&mut self, samples: &[usize]) -> Option<SplitCandidate> {
        let n_features = self.features.first().map(Vec::len).unwrap_or_default();
        let mut order: Vec<usize> = (0..n_features).collect();
        order.shuffle(&mut *self.rng);

        let mut best: Option<SplitCandidate> = None;
        for (visited, feature) in order.into_iter().enumerate() {
            if visited >= self.params.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_threshold(samples, feature) {
                let improves = best
                    .as_ref()
                    .map(|current| candidate.impurity < current.impurity)
                    .unwrap_or(true);
                if improves {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn best_threshold(&self, samples: &[usize], feature: usize) -> Option<SplitCandidate> {
        let mut column: Vec<(f64, usize)> = samples
            .iter()
            .map(|sample| (self.features[*sample][feature], self.targets[*sample]))
            .collect();
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total = column.len();
        let mut left = vec![0usize; self.params.n_classes];
        let mut right = vec![0usize; self.params.n_classes];
        for (_, class) in &column {
            right[*class] += 1;
        }

        let mut best: Option<SplitCandidate> = None;
        for position in 0..total - 1 {
            let (value, class) = column[position];
            left[class] += 1;
            right[class] -= 1;

            let next = column[position + 1].0;
            if next <= value {
                continue;
            }

            let n_left = position + 1;
            let n_right = total - n_left;
            let impurity = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / total as f64;

            if best
                .as_ref()
                .map(|current| impurity < current.impurity)
                .unwrap_or(true)
            {
                let mut threshold = value + (next - value) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
        best
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|count| {
            let p = *count as f64 / total;
            p * p
        })
        .sum::<f64>()
}
