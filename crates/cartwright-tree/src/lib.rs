//! Regression trees: grow, evaluate, predict, persist.
//!
//! Provides a CART regression tree grown greedily by squared-error cost. Each
//! growth step enacts the single split, anywhere in the tree, that most lowers
//! total cost; split searches are cached per node and predictor. Grown trees
//! export to a compact [`TreeModel`] for batch prediction and bincode
//! serialization, and [`CrossValidation`] scores a [`TreeConfig`] on
//! modulus folds.

mod config;
mod cost;
mod error;
mod eval;
mod model;
mod node;
mod serialize;
mod split;
mod tree;

pub use config::{SplitTolerance, TreeConfig};
pub use cost::CostTracker;
pub use error::TreeError;
pub use eval::{Baseline, CrossValidation, CrossValidationResult, FoldScore, baseline};
pub use model::TreeModel;
pub use node::{Node, NodeId, Side, SplitRule};
pub use split::SplitCandidate;
pub use tree::{RegressionTree, TreeNode};
