//! Configuration builder for regression tree training.

use tracing::{info, instrument};

use crate::error::TreeError;
use crate::tree::RegressionTree;

/// Margins a candidate split must beat before it is enacted.
///
/// A split is accepted only when its cost is strictly below
/// `unsplit_cost * (1 - relative)` and strictly below `unsplit_cost - absolute`.
/// Both margins stop growth on improvements that are floating-point noise.
/// The defaults suit responses of roughly unit magnitude; responses many
/// orders of magnitude larger or smaller may need the absolute margin rescaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitTolerance {
    relative: f64,
    absolute: f64,
}

impl SplitTolerance {
    /// Default relative improvement margin.
    pub const DEFAULT_RELATIVE: f64 = 1e-8;
    /// Default absolute improvement margin.
    pub const DEFAULT_ABSOLUTE: f64 = 1e-10;

    /// Create a tolerance from explicit margins.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidTolerance`] if either margin is negative or
    /// not finite.
    pub fn new(relative: f64, absolute: f64) -> Result<Self, TreeError> {
        for (name, value) in [("relative", relative), ("absolute", absolute)] {
            if !value.is_finite() || value < 0.0 {
                return Err(TreeError::InvalidTolerance { name, value });
            }
        }
        Ok(Self { relative, absolute })
    }

    /// Return the relative margin.
    #[must_use]
    pub fn relative(&self) -> f64 {
        self.relative
    }

    /// Return the absolute margin.
    #[must_use]
    pub fn absolute(&self) -> f64 {
        self.absolute
    }

    /// Return `true` if `candidate_cost` is a material improvement on `unsplit_cost`.
    #[must_use]
    pub fn accepts(&self, candidate_cost: f64, unsplit_cost: f64) -> bool {
        candidate_cost < unsplit_cost * (1.0 - self.relative)
            && candidate_cost < unsplit_cost - self.absolute
    }
}

impl Default for SplitTolerance {
    fn default() -> Self {
        Self {
            relative: Self::DEFAULT_RELATIVE,
            absolute: Self::DEFAULT_ABSOLUTE,
        }
    }
}

/// Configuration for growing a regression tree to convergence.
///
/// Construct via [`TreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default                   |
/// |---------------------|---------------------------|
/// | `min_rows_per_node` | 10                        |
/// | `tolerance`         | relative 1e-8, absolute 1e-10 |
#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub(crate) min_rows_per_node: usize,
    pub(crate) tolerance: SplitTolerance,
}

impl TreeConfig {
    /// Default minimum size a leaf must exceed before it may be split.
    pub const DEFAULT_MIN_ROWS_PER_NODE: usize = 10;

    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_rows_per_node: Self::DEFAULT_MIN_ROWS_PER_NODE,
            tolerance: SplitTolerance::default(),
        }
    }

    /// Set the minimum number of rows a leaf must exceed to be split.
    #[must_use]
    pub fn with_min_rows_per_node(mut self, min_rows_per_node: usize) -> Self {
        self.min_rows_per_node = min_rows_per_node;
        self
    }

    /// Set the improvement margins for enacting a split.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: SplitTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Return the minimum rows per node.
    #[must_use]
    pub fn min_rows_per_node(&self) -> usize {
        self.min_rows_per_node
    }

    /// Return the split tolerance.
    #[must_use]
    pub fn tolerance(&self) -> SplitTolerance {
        self.tolerance
    }

    /// Build a tree over the column-major dataset and grow it until no split
    /// is enacted.
    ///
    /// `predictors[predictor][row]`, one inner `Vec` per predictor column.
    /// `responses[row]`, the continuous response.
    ///
    /// # Errors
    ///
    /// | Variant                             | When                                           |
    /// |-------------------------------------|------------------------------------------------|
    /// | [`TreeError::InvalidMinRowsPerNode`] | `min_rows_per_node` is zero                   |
    /// | [`TreeError::ColumnLengthMismatch`]  | a predictor column length differs from `responses` |
    /// | [`TreeError::EmptyDataset`]          | `responses` is empty                          |
    /// | [`TreeError::NonFiniteValue`]        | any value is NaN or infinite                  |
    #[instrument(
        skip(self, predictors, responses),
        fields(n_rows = responses.len(), n_predictors = predictors.len())
    )]
    pub fn fit(
        &self,
        predictors: &[Vec<f64>],
        responses: &[f64],
    ) -> Result<RegressionTree, TreeError> {
        if self.min_rows_per_node == 0 {
            return Err(TreeError::InvalidMinRowsPerNode {
                min_rows_per_node: self.min_rows_per_node,
            });
        }

        let mut tree =
            RegressionTree::with_tolerance(predictors.to_vec(), responses.to_vec(), self.tolerance)?;
        let initial_cost = tree.cost();

        let mut n_splits = 0usize;
        while tree.enact_best_split(self.min_rows_per_node) {
            n_splits += 1;
        }

        info!(
            n_splits,
            n_leaves = tree.n_leaves(),
            initial_cost,
            final_cost = tree.cost(),
            "regression tree grown"
        );

        Ok(tree)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{SplitTolerance, TreeConfig};
    use crate::TreeError;

    #[test]
    fn defaults() {
        let config = TreeConfig::new();
        assert_eq!(config.min_rows_per_node(), 10);
        assert_eq!(config.tolerance(), SplitTolerance::default());
        assert!((config.tolerance().relative() - 1e-8).abs() < f64::EPSILON);
        assert!((config.tolerance().absolute() - 1e-10).abs() < f64::EPSILON);
    }

    #[test]
    fn tolerance_requires_both_margins() {
        let tol = SplitTolerance::default();
        assert!(tol.accepts(0.5, 1.0));
        // Inside the relative margin.
        assert!(!tol.accepts(1.0 - 1e-9, 1.0));
        // Below the relative margin but inside the absolute one.
        assert!(!tol.accepts(1e-12 * (1.0 - 1e-7), 1e-12));
        assert!(!tol.accepts(0.0, 0.0));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let err = SplitTolerance::new(-1.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidTolerance {
                name: "relative",
                ..
            }
        ));
        let err = SplitTolerance::new(0.0, f64::NAN).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidTolerance {
                name: "absolute",
                ..
            }
        ));
    }

    #[test]
    fn zero_min_rows_rejected() {
        let err = TreeConfig::new()
            .with_min_rows_per_node(0)
            .fit(&[vec![1.0, 2.0]], &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidMinRowsPerNode {
                min_rows_per_node: 0
            }
        ));
    }

    #[test]
    fn fit_grows_to_convergence() {
        let predictors = vec![(0..40).map(f64::from).collect::<Vec<_>>()];
        let responses: Vec<f64> = (0..40).map(|i| if i < 20 { 1.0 } else { 5.0 }).collect();
        let mut tree = TreeConfig::new().fit(&predictors, &responses).unwrap();
        assert_eq!(tree.n_leaves(), 2);
        assert!(tree.cost().abs() < 1e-9);
        assert!(!tree.enact_best_split(10));
    }
}
