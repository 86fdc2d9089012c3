use std::fmt;

/// Index into a node arena, identifying a specific node in a regression tree.
///
/// The same index addresses a node in the growing [`RegressionTree`] and in
/// the [`TreeModel`] exported from it.
///
/// [`RegressionTree`]: crate::RegressionTree
/// [`TreeModel`]: crate::TreeModel
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which child a row is routed to by a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Predictor value strictly below the threshold.
    Left,
    /// Predictor value at or above the threshold.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("L"),
            Side::Right => f.write_str("R"),
        }
    }
}

/// The test an internal node applies to route a row.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SplitRule {
    /// Predictor column the split tests.
    pub predictor: usize,
    /// Rows with `row[predictor] < threshold` go left.
    pub threshold: f64,
}

impl SplitRule {
    /// Return the side a row falls on.
    #[must_use]
    pub fn side(&self, row: &[f64]) -> Side {
        if row[self.predictor] < self.threshold {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// A node in an exported [`TreeModel`](crate::TreeModel) arena.
///
/// Children are referenced by [`NodeId`] rather than pointers, which keeps the
/// model trivially serializable.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Node {
    /// An interior split node.
    Split {
        /// The routing test.
        rule: SplitRule,
        /// Index of the left child node.
        left: NodeId,
        /// Index of the right child node.
        right: NodeId,
        /// Unsplit squared-error cost of the rows that reached this node.
        cost: f64,
        /// Number of training rows that reached this node.
        n_rows: usize,
        /// Unsplit cost minus the combined cost of the two children when split.
        cost_decrease: f64,
    },
    /// A terminal leaf node.
    Leaf {
        /// Mean response of the leaf's training rows.
        prediction: f64,
        /// Squared-error cost of the leaf's training rows.
        cost: f64,
        /// Number of training rows in this leaf.
        n_rows: usize,
    },
}

impl Node {
    /// Return the unsplit cost at this node.
    #[must_use]
    pub fn cost(&self) -> f64 {
        match self {
            Node::Split { cost, .. } | Node::Leaf { cost, .. } => *cost,
        }
    }

    /// Return the number of training rows that reached this node.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        match self {
            Node::Split { n_rows, .. } | Node::Leaf { n_rows, .. } => *n_rows,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
