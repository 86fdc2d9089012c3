use tracing::debug;

use crate::{
    TreeError,
    config::SplitTolerance,
    node::{NodeId, Side, SplitRule},
    split::{SplitCandidate, search_predictor},
};

/// Routing test and child ids of an internal node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Children {
    rule: SplitRule,
    left: NodeId,
    right: NodeId,
}

/// One node of a growing [`RegressionTree`].
///
/// A node owns its rows: every predictor column and the response vector
/// restricted to the rows that reached it. Split results are cached per
/// predictor and never recomputed. Once split, the rows of an internal node are
/// inert; its children hold their own copies.
#[derive(Debug, Clone)]
pub struct TreeNode {
    predictors: Vec<Vec<f64>>,
    responses: Vec<f64>,
    unsplit_prediction: f64,
    unsplit_cost: f64,
    children: Option<Children>,
    best_splits: Vec<Option<SplitCandidate>>,
}

impl TreeNode {
    fn new(predictors: Vec<Vec<f64>>, responses: Vec<f64>) -> Self {
        let n = responses.len() as f64;
        let unsplit_prediction = responses.iter().sum::<f64>() / n;
        let unsplit_cost = responses
            .iter()
            .map(|&y| (y - unsplit_prediction).powi(2))
            .sum();
        let best_splits = vec![None; predictors.len()];
        Self {
            predictors,
            responses,
            unsplit_prediction,
            unsplit_cost,
            children: None,
            best_splits,
        }
    }

    /// Return the number of rows this node owns.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.responses.len()
    }

    /// Return the mean response of this node's rows.
    #[must_use]
    pub fn unsplit_prediction(&self) -> f64 {
        self.unsplit_prediction
    }

    /// Return the squared-error cost of this node's rows about their mean.
    #[must_use]
    pub fn unsplit_cost(&self) -> f64 {
        self.unsplit_cost
    }

    /// Return `true` if this node has not been split.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Return the routing test of an internal node.
    #[must_use]
    pub fn split_rule(&self) -> Option<SplitRule> {
        self.children.map(|c| c.rule)
    }

    /// Return the `(left, right)` child ids of an internal node.
    #[must_use]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children.map(|c| (c.left, c.right))
    }

    /// Return the cached split search for `predictor`, if it has run.
    #[must_use]
    pub fn cached_split(&self, predictor: usize) -> Option<&SplitCandidate> {
        self.best_splits.get(predictor).and_then(Option::as_ref)
    }

    /// Return the response values of this node's rows.
    #[must_use]
    pub fn responses(&self) -> &[f64] {
        &self.responses
    }

    /// Return the predictor column `predictor` restricted to this node's rows.
    #[must_use]
    pub fn predictor(&self, predictor: usize) -> Option<&[f64]> {
        self.predictors.get(predictor).map(Vec::as_slice)
    }

    fn best_split(&mut self, predictor: usize) -> &SplitCandidate {
        let Self {
            predictors,
            responses,
            best_splits,
            ..
        } = self;
        best_splits[predictor]
            .get_or_insert_with(|| search_predictor(&predictors[predictor], responses))
    }

    /// Search every predictor and return the lowest-cost one, lowest index on ties.
    fn best_split_choice(&mut self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for predictor in 0..self.best_splits.len() {
            let cost = self.best_split(predictor).cost();
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((predictor, cost));
            }
        }
        best
    }

    /// Copy this node's rows into two new nodes, preserving row order on each side.
    fn partition(&self, assignment: &[Side]) -> (TreeNode, TreeNode) {
        let (left_predictors, right_predictors): (Vec<_>, Vec<_>) = self
            .predictors
            .iter()
            .map(|column| split_column(column, assignment))
            .unzip();
        let (left_responses, right_responses) = split_column(&self.responses, assignment);
        (
            TreeNode::new(left_predictors, left_responses),
            TreeNode::new(right_predictors, right_responses),
        )
    }
}

fn split_column(values: &[f64], assignment: &[Side]) -> (Vec<f64>, Vec<f64>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (&value, &side) in values.iter().zip(assignment) {
        match side {
            Side::Left => left.push(value),
            Side::Right => right.push(value),
        }
    }
    (left, right)
}

/// Check column shapes and values for a column-major dataset.
pub(crate) fn validate_columns(predictors: &[Vec<f64>], responses: &[f64]) -> Result<(), TreeError> {
    let n_rows = responses.len();
    for (predictor, column) in predictors.iter().enumerate() {
        if column.len() != n_rows {
            return Err(TreeError::ColumnLengthMismatch {
                predictor,
                expected: n_rows,
                got: column.len(),
            });
        }
    }
    if n_rows == 0 {
        return Err(TreeError::EmptyDataset);
    }
    if let Some(row) = responses.iter().position(|y| !y.is_finite()) {
        return Err(TreeError::NonFiniteValue {
            predictor: None,
            row,
        });
    }
    for (predictor, column) in predictors.iter().enumerate() {
        if let Some(row) = column.iter().position(|x| !x.is_finite()) {
            return Err(TreeError::NonFiniteValue {
                predictor: Some(predictor),
                row,
            });
        }
    }
    Ok(())
}

/// A CART regression tree grown greedily by squared-error cost.
///
/// Nodes live in an arena addressed by [`NodeId`]; the root is
/// [`NodeId::ROOT`] and children are appended as splits are enacted. Each call
/// to [`enact_best_split`](Self::enact_best_split) performs the single split,
/// anywhere in the tree, that lowers the total cost the most.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
    n_predictors: usize,
    tolerance: SplitTolerance,
}

impl RegressionTree {
    /// Create a single-leaf tree over a column-major dataset with default tolerances.
    ///
    /// # Errors
    ///
    /// | Variant                             | When                                          |
    /// |-------------------------------------|-----------------------------------------------|
    /// | [`TreeError::ColumnLengthMismatch`] | a predictor column length differs from `responses` |
    /// | [`TreeError::EmptyDataset`]         | `responses` is empty                          |
    /// | [`TreeError::NonFiniteValue`]       | any value is NaN or infinite                  |
    pub fn new(predictors: Vec<Vec<f64>>, responses: Vec<f64>) -> Result<Self, TreeError> {
        Self::with_tolerance(predictors, responses, SplitTolerance::default())
    }

    /// Create a single-leaf tree using the given split tolerance.
    ///
    /// # Errors
    ///
    /// Same as [`RegressionTree::new`].
    pub fn with_tolerance(
        predictors: Vec<Vec<f64>>,
        responses: Vec<f64>,
        tolerance: SplitTolerance,
    ) -> Result<Self, TreeError> {
        validate_columns(&predictors, &responses)?;
        let n_predictors = predictors.len();
        Ok(Self {
            nodes: vec![TreeNode::new(predictors, responses)],
            n_predictors,
            tolerance,
        })
    }

    /// Return the number of predictor columns.
    #[must_use]
    pub fn n_predictors(&self) -> usize {
        self.n_predictors
    }

    /// Return the split tolerance.
    #[must_use]
    pub fn tolerance(&self) -> SplitTolerance {
        self.tolerance
    }

    /// Return the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &TreeNode {
        self.node(NodeId::ROOT)
    }

    /// Return the total number of nodes, internal and leaf.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the leaf ids in left-to-right order.
    #[must_use]
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            match self.nodes[id.index()].children {
                None => leaves.push(id),
                Some(c) => {
                    stack.push(c.right);
                    stack.push(c.left);
                }
            }
        }
        leaves
    }

    /// Return the number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the total squared-error cost of the tree's leaves.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost_of(NodeId::ROOT)
    }

    fn cost_of(&self, id: NodeId) -> f64 {
        let node = &self.nodes[id.index()];
        match node.children {
            None => node.unsplit_cost,
            Some(c) => self.cost_of(c.left) + self.cost_of(c.right),
        }
    }

    /// Return the best split of the root on `predictor`, searching on first use.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictorOutOfRange`] if `predictor >= n_predictors`.
    pub fn find_best_split(&mut self, predictor: usize) -> Result<&SplitCandidate, TreeError> {
        self.find_best_split_at(NodeId::ROOT, predictor)
    }

    /// Return the best split of node `id` on `predictor`, searching on first use.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictorOutOfRange`] if `predictor >= n_predictors`.
    pub fn find_best_split_at(
        &mut self,
        id: NodeId,
        predictor: usize,
    ) -> Result<&SplitCandidate, TreeError> {
        if predictor >= self.n_predictors {
            return Err(TreeError::PredictorOutOfRange {
                index: predictor,
                n_predictors: self.n_predictors,
            });
        }
        Ok(self.nodes[id.index()].best_split(predictor))
    }

    /// Return the lowest total tree cost reachable with exactly one more split.
    ///
    /// Leaves with `min_rows_per_node` rows or fewer are never split. Returns
    /// the current [`cost`](Self::cost) when no leaf can improve.
    pub fn best_achievable_split_cost(&mut self, min_rows_per_node: usize) -> f64 {
        self.achievable_cost(NodeId::ROOT, min_rows_per_node)
    }

    fn achievable_cost(&mut self, id: NodeId, min_rows_per_node: usize) -> f64 {
        match self.nodes[id.index()].children {
            Some(children) => {
                let (via_left, via_right) = self.branch_costs(children, min_rows_per_node);
                via_left.min(via_right)
            }
            None => {
                let node = &mut self.nodes[id.index()];
                if node.n_rows() <= min_rows_per_node {
                    return node.unsplit_cost;
                }
                match node.best_split_choice() {
                    Some((predictor, cost))
                        if node
                            .cached_split(predictor)
                            .is_some_and(|c| c.threshold().is_some()) =>
                    {
                        cost
                    }
                    _ => node.unsplit_cost,
                }
            }
        }
    }

    /// Total cost after improving the left child, and after improving the right.
    fn branch_costs(&mut self, children: Children, min_rows_per_node: usize) -> (f64, f64) {
        let left_best = self.achievable_cost(children.left, min_rows_per_node);
        let right_best = self.achievable_cost(children.right, min_rows_per_node);
        (
            left_best + self.cost_of(children.right),
            self.cost_of(children.left) + right_best,
        )
    }

    /// Perform the single split that most reduces total tree cost.
    ///
    /// Returns `false` when no leaf larger than `min_rows_per_node` has a split
    /// that clears the tree's [`SplitTolerance`]. Once this returns `false` it
    /// keeps returning `false`.
    pub fn enact_best_split(&mut self, min_rows_per_node: usize) -> bool {
        self.enact_at(NodeId::ROOT, min_rows_per_node)
    }

    fn enact_at(&mut self, id: NodeId, min_rows_per_node: usize) -> bool {
        match self.nodes[id.index()].children {
            Some(children) => {
                let (via_left, via_right) = self.branch_costs(children, min_rows_per_node);
                if via_left <= via_right {
                    self.enact_at(children.left, min_rows_per_node)
                } else {
                    self.enact_at(children.right, min_rows_per_node)
                }
            }
            None => self.split_leaf(id, min_rows_per_node),
        }
    }

    fn split_leaf(&mut self, id: NodeId, min_rows_per_node: usize) -> bool {
        let tolerance = self.tolerance;
        let node = &mut self.nodes[id.index()];
        if node.n_rows() <= min_rows_per_node {
            return false;
        }
        let Some((predictor, cost)) = node.best_split_choice() else {
            return false;
        };
        if !tolerance.accepts(cost, node.unsplit_cost) {
            return false;
        }

        let Some(candidate) = node.cached_split(predictor) else {
            return false;
        };
        let Some(threshold) = candidate.threshold() else {
            return false;
        };
        let (left, right) = node.partition(candidate.assignment());
        let unsplit_cost = node.unsplit_cost;
        let (n_left, n_right) = (left.n_rows(), right.n_rows());

        let left_id = NodeId::new(self.nodes.len());
        let right_id = NodeId::new(self.nodes.len() + 1);
        self.nodes.push(left);
        self.nodes.push(right);
        self.nodes[id.index()].children = Some(Children {
            rule: SplitRule {
                predictor,
                threshold,
            },
            left: left_id,
            right: right_id,
        });

        debug!(
            node = %id,
            predictor,
            threshold,
            n_left,
            n_right,
            cost_before = unsplit_cost,
            cost_after = cost,
            "split enacted"
        );

        true
    }

    /// Predict the response for one row of predictor values.
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
        let mut id = NodeId::ROOT;
        loop {
            let node = &self.nodes[id.index()];
            match node.children {
                None => return Ok(node.unsplit_prediction),
                Some(c) => {
                    id = match c.rule.side(row) {
                        Side::Left => c.left,
                        Side::Right => c.right,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twelve_row_tree() -> RegressionTree {
        let predictors = vec![(1..=12).map(f64::from).collect()];
        let responses = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        RegressionTree::new(predictors, responses).unwrap()
    }

    /// Four quadrants of `per_quadrant` rows with constant responses.
    fn checkerboard(per_quadrant: usize) -> RegressionTree {
        let quadrants = [(0.0, 0.0, 0.0), (0.0, 1.0, 0.1), (1.0, 0.0, 3.1), (1.0, 1.0, 2.9)];
        let mut x0 = Vec::new();
        let mut x1 = Vec::new();
        let mut y = Vec::new();
        for _ in 0..per_quadrant {
            for &(a, b, mean) in &quadrants {
                x0.push(a);
                x1.push(b);
                y.push(mean);
            }
        }
        RegressionTree::new(vec![x0, x1], y).unwrap()
    }

    #[test]
    fn two_row_split() {
        let mut tree = RegressionTree::new(vec![vec![1.0, 2.0], vec![-2.0, 2.0]], vec![7.0, 4.0])
            .unwrap();
        let split = tree.find_best_split(0).unwrap();
        assert_eq!(split.assignment(), &[Side::Left, Side::Right]);
        assert!(split.cost().abs() < 1e-12);
        assert_eq!(split.threshold(), Some(1.5));
        assert_eq!(split.prediction_pair(), Some((7.0, 4.0)));
    }

    #[test]
    fn twelve_row_split() {
        let mut tree = twelve_row_tree();
        let split = tree.find_best_split(0).unwrap();
        assert!((split.cost() - 7.0 / 8.0).abs() < 1e-12);
        assert_eq!(split.threshold(), Some(8.5));
        let expected: Vec<Side> = (0..12)
            .map(|i| if i < 8 { Side::Left } else { Side::Right })
            .collect();
        assert_eq!(split.assignment(), expected.as_slice());
        let (left, right) = split.prediction_pair().unwrap();
        assert!((left - 1.0 / 8.0).abs() < 1e-12);
        assert!((right - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_predictor() {
        let mut tree = twelve_row_tree();
        let err = tree.find_best_split(1).unwrap_err();
        assert!(matches!(
            err,
            TreeError::PredictorOutOfRange {
                index: 1,
                n_predictors: 1
            }
        ));
        assert!(tree.root().cached_split(0).is_none());
        assert!(tree.root().cached_split(1).is_none());
    }

    #[test]
    fn split_search_is_cached() {
        let mut tree = twelve_row_tree();
        assert!(tree.root().cached_split(0).is_none());
        let first = tree.find_best_split(0).unwrap().clone();
        assert_eq!(tree.root().cached_split(0), Some(&first));
        assert_eq!(tree.find_best_split(0).unwrap(), &first);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let cases = vec![
            (vec![vec![1.0, 2.0, 3.0]], vec![1.0, 2.0]),
            (vec![vec![1.0]], vec![1.0, 2.0]),
            (vec![vec![1.0, 2.0], vec![1.0]], vec![1.0, 2.0]),
            (vec![vec![1.0], vec![1.0, 2.0]], vec![1.0, 2.0]),
            (vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0]], vec![1.0, 2.0]),
            (vec![vec![]], vec![1.0]),
        ];
        for (predictors, responses) in cases {
            let err = RegressionTree::new(predictors.clone(), responses.clone()).unwrap_err();
            assert!(
                matches!(err, TreeError::ColumnLengthMismatch { .. }),
                "expected length mismatch for {predictors:?} / {responses:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn mismatch_reports_offending_predictor() {
        let err = RegressionTree::new(vec![vec![1.0, 2.0], vec![3.0]], vec![0.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::ColumnLengthMismatch {
                predictor: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn empty_and_non_finite_rejected() {
        let err = RegressionTree::new(vec![vec![]], vec![]).unwrap_err();
        assert!(matches!(err, TreeError::EmptyDataset));

        let err = RegressionTree::new(vec![vec![1.0, 2.0]], vec![0.0, f64::NAN]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::NonFiniteValue {
                predictor: None,
                row: 1
            }
        ));

        let err =
            RegressionTree::new(vec![vec![1.0, f64::INFINITY]], vec![0.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::NonFiniteValue {
                predictor: Some(0),
                row: 1
            }
        ));
    }

    #[test]
    fn fresh_tree_is_a_single_leaf() {
        let tree = twelve_row_tree();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.leaves(), vec![NodeId::ROOT]);
        assert!((tree.root().unsplit_prediction() - 5.0 / 12.0).abs() < 1e-12);
        // 5 ones among 12 rows: 5 - 25/12.
        assert!((tree.cost() - (5.0 - 25.0 / 12.0)).abs() < 1e-12);
    }

    #[test]
    fn checkerboard_grows_four_quadrant_leaves() {
        let mut tree = checkerboard(6);
        let mut previous = tree.cost();
        for _ in 0..3 {
            assert!(tree.enact_best_split(10));
            let current = tree.cost();
            assert!(current < previous, "cost {current} did not drop below {previous}");
            previous = current;
        }
        assert!(!tree.enact_best_split(10));

        let mut predictions: Vec<f64> = tree
            .leaves()
            .iter()
            .map(|&id| tree.node(id).unsplit_prediction())
            .collect();
        predictions.sort_by(f64::total_cmp);
        let expected = [0.0, 0.1, 2.9, 3.1];
        assert_eq!(predictions.len(), 4);
        for (got, want) in predictions.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "leaf mean {got} != {want}");
        }
    }

    #[test]
    fn checkerboard_first_split_is_on_the_big_gap() {
        let mut tree = checkerboard(6);
        assert!(tree.enact_best_split(10));
        let rule = tree.root().split_rule().unwrap();
        assert_eq!(rule.predictor, 0);
        assert!((rule.threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn growth_picks_the_larger_improvement_first() {
        let mut tree = checkerboard(6);
        tree.enact_best_split(10);
        let (left, right) = tree.root().children().unwrap();
        // The right half (3.1 vs 2.9) has more to gain than the left (0.0 vs 0.1).
        let expected = tree.best_achievable_split_cost(10);
        assert!(tree.enact_best_split(10));
        assert!(tree.node(left).is_leaf());
        assert!(!tree.node(right).is_leaf());
        assert!((tree.cost() - expected).abs() < 1e-9);
    }

    #[test]
    fn terminal_state_is_idempotent() {
        let mut tree = checkerboard(6);
        while tree.enact_best_split(10) {}
        let n_nodes = tree.n_nodes();
        for _ in 0..3 {
            assert!(!tree.enact_best_split(10));
        }
        assert_eq!(tree.n_nodes(), n_nodes);
    }

    #[test]
    fn min_rows_floor_blocks_splitting() {
        let mut tree = twelve_row_tree();
        assert!(!tree.enact_best_split(12));
        assert!((tree.best_achievable_split_cost(12) - tree.cost()).abs() < f64::EPSILON);
        assert!(tree.enact_best_split(11));
    }

    #[test]
    fn no_predictors_cannot_split() {
        let mut tree = RegressionTree::new(vec![], (0..20).map(f64::from).collect()).unwrap();
        assert!(!tree.enact_best_split(1));
        assert!((tree.best_achievable_split_cost(1) - tree.cost()).abs() < f64::EPSILON);
        assert!((tree.predict(&[]).unwrap() - 9.5).abs() < 1e-12);
    }

    #[test]
    fn unsplittable_leaf_reports_its_own_cost() {
        // A constant column never yields a threshold; the running-sum cost of
        // these large responses drifts from the two-pass leaf cost.
        let responses: Vec<f64> = (0..40).map(|i| 1e9 + f64::from(i) * 0.1).collect();
        let mut tree = RegressionTree::new(vec![vec![3.0; 40]], responses).unwrap();
        assert!(tree.find_best_split(0).unwrap().threshold().is_none());
        assert_eq!(tree.best_achievable_split_cost(1), tree.cost());
        assert!(!tree.enact_best_split(1));
    }

    #[test]
    fn lower_index_wins_tied_predictors() {
        let column: Vec<f64> = (0..12).map(f64::from).collect();
        let responses: Vec<f64> = (0..12).map(|i| if i < 6 { 0.0 } else { 1.0 }).collect();
        let mut tree =
            RegressionTree::new(vec![column.clone(), column], responses).unwrap();
        assert!(tree.enact_best_split(10));
        assert_eq!(tree.root().split_rule().unwrap().predictor, 0);
    }

    #[test]
    fn children_preserve_row_order() {
        let predictors = vec![
            vec![5.0, 1.0, 4.0, 2.0, 3.0, 6.0, 0.0, 7.0, 8.0, 9.0, 10.0, 11.0],
            (0..12).map(f64::from).collect(),
        ];
        let responses = vec![9.0, 0.0, 9.0, 0.0, 0.0, 9.0, 0.0, 9.0, 9.0, 9.0, 9.0, 9.0];
        let mut tree = RegressionTree::new(predictors, responses).unwrap();
        assert!(tree.enact_best_split(10));
        let (left, right) = tree.root().children().unwrap();
        assert_eq!(tree.node(left).predictor(1).unwrap(), &[1.0, 3.0, 4.0, 6.0]);
        assert_eq!(
            tree.node(right).predictor(1).unwrap(),
            &[0.0, 2.0, 5.0, 7.0, 8.0, 9.0, 10.0, 11.0]
        );
        assert_eq!(tree.node(left).n_rows() + tree.node(right).n_rows(), 12);
    }

    #[test]
    fn predict_routes_by_threshold() {
        let mut tree = checkerboard(6);
        while tree.enact_best_split(10) {}
        assert!((tree.predict(&[0.0, 0.0]).unwrap() - 0.0).abs() < 1e-9);
        assert!((tree.predict(&[0.0, 1.0]).unwrap() - 0.1).abs() < 1e-9);
        assert!((tree.predict(&[1.0, 0.0]).unwrap() - 3.1).abs() < 1e-9);
        assert!((tree.predict(&[1.0, 1.0]).unwrap() - 2.9).abs() < 1e-9);
        // At-threshold values go right.
        assert!((tree.predict(&[0.5, 0.5]).unwrap() - 2.9).abs() < 1e-9);
    }

    #[test]
    fn predict_arity_mismatch() {
        let tree = checkerboard(6);
        let err = tree.predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::PredictionArityMismatch {
                expected: 2,
                got: 1
            }
        ));
    }
}
