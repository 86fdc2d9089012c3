//! Compact fitted model exported from a grown [`RegressionTree`].

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::TreeError;
use crate::node::{Node, NodeId, Side};
use crate::tree::RegressionTree;

/// A fitted regression tree without per-row training data.
///
/// Stored as an arena-based `Vec<Node>` with [`NodeId`] references, root at
/// index 0. Node ids match the [`RegressionTree`] the model was exported from.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TreeModel {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_predictors: usize,
}

impl RegressionTree {
    /// Export the current tree shape as a [`TreeModel`].
    #[must_use]
    pub fn to_model(&self) -> TreeModel {
        let nodes = (0..self.n_nodes())
            .map(|index| {
                let node = self.node(NodeId::new(index));
                match (node.split_rule(), node.children()) {
                    (Some(rule), Some((left, right))) => Node::Split {
                        rule,
                        left,
                        right,
                        cost: node.unsplit_cost(),
                        n_rows: node.n_rows(),
                        cost_decrease: node.unsplit_cost()
                            - self.node(left).unsplit_cost()
                            - self.node(right).unsplit_cost(),
                    },
                    _ => Node::Leaf {
                        prediction: node.unsplit_prediction(),
                        cost: node.unsplit_cost(),
                        n_rows: node.n_rows(),
                    },
                }
            })
            .collect();
        TreeModel {
            nodes,
            n_predictors: self.n_predictors(),
        }
    }
}

impl TreeModel {
    /// Predict the response for one row.
    ///
    /// Traverses from the root: at each `Split`, goes left when
    /// `row[predictor] < threshold`, right otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionArityMismatch`] when `row.len() != n_predictors`.
    pub fn predict(&self, row: &[f64]) -> Result<f64, TreeError> {
        if row.len() != self.n_predictors {
            return Err(TreeError::PredictionArityMismatch {
                expected: self.n_predictors,
                got: row.len(),
            });
        }
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { prediction, .. } => return Ok(*prediction),
                Node::Split {
                    rule, left, right, ..
                } => {
                    idx = match rule.side(row) {
                        Side::Left => left.index(),
                        Side::Right => right.index(),
                    };
                }
            }
        }
    }

    /// Predict a batch of rows in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionArityMismatch`] if any row has the wrong width.
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, TreeError> {
        rows.into_par_iter().map(|row| self.predict(row)).collect()
    }

    /// Return the number of predictors this model was trained on.
    #[must_use]
    pub fn n_predictors(&self) -> usize {
        self.n_predictors
    }

    /// Return the node arena, root first.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the total training cost of the leaves.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(Node::cost)
            .sum()
    }

    /// Return the maximum depth of the tree. A single leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0usize;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, d)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { left, right, .. } => {
                    stack.push((left.index(), d + 1));
                    stack.push((right.index(), d + 1));
                }
            }
        }
        max_depth
    }

    /// Compute per-predictor importances from split cost decreases.
    ///
    /// Each `Split` node's `cost_decrease` is accumulated by predictor, then the
    /// totals are normalized to sum to 1.0. All zeros for a single-leaf tree.
    #[must_use]
    pub fn predictor_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_predictors];
        for node in &self.nodes {
            if let Node::Split {
                rule,
                cost_decrease,
                ..
            } = node
            {
                totals[rule.predictor] += cost_decrease;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use crate::{Node, RegressionTree, TreeConfig, TreeError};

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x0: Vec<f64> = (0..30).map(f64::from).collect();
        let x1: Vec<f64> = (0..30).map(|i| f64::from(i % 3)).collect();
        let y: Vec<f64> = (0..30)
            .map(|i| match i {
                0..10 => 1.0,
                10..20 => 4.0,
                _ => 8.0,
            })
            .collect();
        (vec![x0, x1], y)
    }

    #[test]
    fn model_predictions_match_tree() {
        let (predictors, responses) = step_data();
        let tree = TreeConfig::new()
            .with_min_rows_per_node(5)
            .fit(&predictors, &responses)
            .unwrap();
        let model = tree.to_model();
        assert_eq!(model.n_nodes(), tree.n_nodes());
        assert_eq!(model.n_leaves(), tree.n_leaves());
        assert!((model.cost() - tree.cost()).abs() < 1e-12);
        for row in [[0.0, 0.0], [9.5, 1.0], [15.0, 2.0], [29.0, 0.0], [-3.0, 7.0]] {
            assert_eq!(model.predict(&row).unwrap(), tree.predict(&row).unwrap());
        }
    }

    #[test]
    fn single_leaf_model() {
        let tree = RegressionTree::new(vec![vec![1.0, 2.0]], vec![3.0, 5.0]).unwrap();
        let model = tree.to_model();
        assert_eq!(model.n_nodes(), 1);
        assert_eq!(model.depth(), 0);
        assert_eq!(model.predictor_importances(), vec![0.0]);
        assert!(matches!(model.nodes()[0], Node::Leaf { n_rows: 2, .. }));
        assert!((model.predict(&[100.0]).unwrap() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn step_function_depth_and_importances() {
        let (predictors, responses) = step_data();
        let model = TreeConfig::new()
            .with_min_rows_per_node(5)
            .fit(&predictors, &responses)
            .unwrap()
            .to_model();
        assert_eq!(model.n_leaves(), 3);
        assert_eq!(model.depth(), 2);
        let importances = model.predictor_importances();
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-10);
        assert!((importances[0] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn batch_matches_single() {
        let (predictors, responses) = step_data();
        let model = TreeConfig::new()
            .with_min_rows_per_node(5)
            .fit(&predictors, &responses)
            .unwrap()
            .to_model();
        let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i), 0.0]).collect();
        let batch = model.predict_batch(&rows).unwrap();
        for (row, got) in rows.iter().zip(&batch) {
            assert_eq!(*got, model.predict(row).unwrap());
        }
        assert!((batch[0] - 1.0).abs() < 1e-12);
        assert!((batch[15] - 4.0).abs() < 1e-12);
        assert!((batch[25] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn batch_rejects_wrong_width() {
        let model = RegressionTree::new(vec![vec![1.0], vec![2.0]], vec![0.0])
            .unwrap()
            .to_model();
        let err = model.predict_batch(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::PredictionArityMismatch {
                expected: 2,
                got: 1
            }
        ));
    }
}
