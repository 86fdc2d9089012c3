//! Model serialization and deserialization via bincode.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::TreeError;
use crate::model::TreeModel;
use crate::node::Node;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Versioned envelope for the serialized model.
#[derive(serde::Serialize, serde::Deserialize)]
struct ModelEnvelope {
    /// Format version for compatibility checking.
    format_version: u32,
    /// Number of predictors the model was trained on.
    n_predictors: usize,
    /// Number of nodes in the tree.
    n_nodes: usize,
    /// The serialized tree.
    model: TreeModel,
}

impl TreeModel {
    /// Save the model to a binary file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::SerializeModel`] | bincode encoding failed |
    /// | [`TreeError::WriteModel`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TreeError> {
        let path = path.as_ref();

        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            n_predictors: self.n_predictors,
            n_nodes: self.nodes.len(),
            model: self.clone(),
        };

        let bytes =
            bincode::serialize(&envelope).map_err(|e| TreeError::SerializeModel { source: e })?;

        std::fs::write(path, &bytes).map_err(|e| TreeError::WriteModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(
            size_bytes = bytes.len(),
            n_nodes = self.nodes.len(),
            "model saved"
        );

        Ok(())
    }

    /// Load a model from a binary file, rejecting other format versions.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::ReadModel`] | file read failed |
    /// | [`TreeError::DeserializeModel`] | bincode decoding failed |
    /// | [`TreeError::IncompatibleModelVersion`] | format version mismatch |
    /// | [`TreeError::InvalidModel`] | the node arena is not a well-formed tree |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TreeError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| TreeError::ReadModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        let envelope: ModelEnvelope =
            bincode::deserialize(&bytes).map_err(|e| TreeError::DeserializeModel {
                path: path.to_path_buf(),
                source: e,
            })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(TreeError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
                path: path.to_path_buf(),
            });
        }

        check_arena(&envelope).map_err(|reason| TreeError::InvalidModel {
            path: path.to_path_buf(),
            reason,
        })?;

        debug!(
            n_predictors = envelope.n_predictors,
            n_nodes = envelope.n_nodes,
            "model loaded"
        );

        Ok(envelope.model)
    }
}

/// Check that the envelope describes a tree `predict` can walk.
///
/// Children are appended after their parent on export, so every child id must
/// exceed its parent's index; this also rules out cycles.
fn check_arena(envelope: &ModelEnvelope) -> Result<(), String> {
    let model = &envelope.model;
    let n_nodes = model.nodes.len();
    if n_nodes == 0 {
        return Err("node arena is empty".to_string());
    }
    if envelope.n_nodes != n_nodes {
        return Err(format!(
            "envelope records {} nodes, arena has {n_nodes}",
            envelope.n_nodes
        ));
    }
    if envelope.n_predictors != model.n_predictors {
        return Err(format!(
            "envelope records {} predictors, model has {}",
            envelope.n_predictors, model.n_predictors
        ));
    }
    for (index, node) in model.nodes.iter().enumerate() {
        let Node::Split {
            rule, left, right, ..
        } = node
        else {
            continue;
        };
        if rule.predictor >= model.n_predictors {
            return Err(format!(
                "node {index} splits on predictor {} of {}",
                rule.predictor, model.n_predictors
            ));
        }
        if !rule.threshold.is_finite() {
            return Err(format!("node {index} has threshold {}", rule.threshold));
        }
        for child in [left, right] {
            if child.index() <= index || child.index() >= n_nodes {
                return Err(format!("node {index} has child {child} outside {}..{n_nodes}", index + 1));
            }
        }
    }
    Ok(())
}
