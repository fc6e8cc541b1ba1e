//! Gini decision tree over an index arena
//!
//! Nodes live in a flat `Vec` with index links instead of boxed
//! recursion, which keeps the serialized form simple and walkable.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// Growth limits for a single tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of features sampled at each split
    pub feature_subsample: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Fraction of class-1 training rows that reached this leaf
    Leaf { prob: f64 },
    /// Rows with `value <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// One fitted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    root: usize,
}

fn gini(pos: usize, n: usize) -> f64 {
    let p = pos as f64 / n as f64;
    let q = 1.0 - p;
    1.0 - p * p - q * q
}

fn weighted_gini(left_pos: usize, left_n: usize, right_pos: usize, right_n: usize) -> f64 {
    let n = (left_n + right_n) as f64;
    (left_n as f64 * gini(left_pos, left_n) + right_n as f64 * gini(right_pos, right_n)) / n
}

struct Grower<'a> {
    x: &'a Array2<f64>,
    y: &'a [u32],
    params: &'a TreeParams,
    nodes: Vec<Node>,
}

impl Grower<'_> {
    fn leaf(&mut self, pos: usize, n: usize) -> usize {
        self.nodes.push(Node::Leaf {
            prob: pos as f64 / n as f64,
        });
        self.nodes.len() - 1
    }

    /// Best (weighted gini, feature, threshold) over the given
    /// features; first strict improvement wins so ties resolve by
    /// iteration order.
    fn best_split(
        &self,
        rows: &[usize],
        pos: usize,
        features: impl IntoIterator<Item = usize>,
    ) -> Option<(f64, usize, f64)> {
        let n = rows.len();
        let mut best: Option<(f64, usize, f64)> = None;
        for feature in features {
            let mut pairs: Vec<(f64, u32)> = rows
                .iter()
                .map(|&r| (self.x[[r, feature]], self.y[r]))
                .collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_n = 0usize;
            let mut left_pos = 0usize;
            for i in 0..n - 1 {
                left_n += 1;
                left_pos += usize::from(pairs[i].1 == 1);
                if pairs[i].0 == pairs[i + 1].0 {
                    continue;
                }
                let right_n = n - left_n;
                let right_pos = pos - left_pos;
                if left_n < self.params.min_samples_leaf || right_n < self.params.min_samples_leaf
                {
                    continue;
                }
                let score = weighted_gini(left_pos, left_n, right_pos, right_n);
                if best.map_or(true, |(current, _, _)| score < current) {
                    best = Some((score, feature, (pairs[i].0 + pairs[i + 1].0) / 2.0));
                }
            }
        }
        best
    }

    fn grow(&mut self, rows: &[usize], depth: usize, rng: &mut StdRng) -> usize {
        let n = rows.len();
        let pos = rows.iter().filter(|&&r| self.y[r] == 1).count();

        let depth_capped = self.params.max_depth.is_some_and(|d| depth >= d);
        if pos == 0 || pos == n || n < self.params.min_samples_split || depth_capped {
            return self.leaf(pos, n);
        }

        let k = self.params.feature_subsample.clamp(1, self.x.ncols());
        let sampled = index::sample(rng, self.x.ncols(), k);

        // constant draws don't count against the subsample: fall back
        // to the full feature set before giving up on a node
        let mut best = self.best_split(rows, pos, sampled.iter());
        if best.is_none() && k < self.x.ncols() {
            best = self.best_split(rows, pos, 0..self.x.ncols());
        }

        let Some((_, feature, threshold)) = best else {
            // every feature is constant over these rows
            return self.leaf(pos, n);
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .copied()
            .partition(|&r| self.x[[r, feature]] <= threshold);
        let left = self.grow(&left_rows, depth + 1, rng);
        let right = self.grow(&right_rows, depth + 1, rng);
        self.nodes.push(Node::Split {
            feature,
            threshold,
            left,
            right,
        });
        self.nodes.len() - 1
    }
}

impl DecisionTree {
    /// Grow a tree on the given row subset (typically a bootstrap
    /// sample). Deterministic for a given rng state.
    pub fn fit(
        x: &Array2<f64>,
        y: &[u32],
        rows: &[usize],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> DecisionTree {
        let mut grower = Grower {
            x,
            y,
            params,
            nodes: Vec::new(),
        };
        let root = grower.grow(rows, 0, rng);
        DecisionTree {
            nodes: grower.nodes,
            root,
        }
    }

    /// P(class 1) for one feature row.
    pub fn predict_proba_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = self.root;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { prob } => return *prob,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}
