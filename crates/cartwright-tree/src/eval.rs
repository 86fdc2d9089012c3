//! Modulus k-fold cross-validation and constant-prediction baseline.

use tracing::{debug, info, instrument};

use crate::config::TreeConfig;
use crate::error::TreeError;
use crate::tree::validate_columns;

/// Rate and accuracy of always predicting the majority outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Mean response.
    pub rate: f64,
    /// The constant prediction: 1.0 when `rate > 0.5`, else 0.0.
    pub prediction: f64,
    /// `1 - mean |prediction - response|`.
    pub accuracy: f64,
}

/// Score the constant majority prediction against `responses`.
///
/// # Errors
///
/// Returns [`TreeError::EmptyDataset`] when `responses` is empty.
pub fn baseline(responses: &[f64]) -> Result<Baseline, TreeError> {
    if responses.is_empty() {
        return Err(TreeError::EmptyDataset);
    }
    let n = responses.len() as f64;
    let rate = responses.iter().sum::<f64>() / n;
    let prediction = if rate > 0.5 { 1.0 } else { 0.0 };
    let mean_error = responses.iter().map(|y| (prediction - y).abs()).sum::<f64>() / n;
    Ok(Baseline {
        rate,
        prediction,
        accuracy: 1.0 - mean_error,
    })
}

/// Cross-validation configuration.
///
/// Row `i` belongs to fold `i % n_folds`. Construct via [`CrossValidation::new`].
///
/// # Defaults
///
/// | Parameter            | Default |
/// |----------------------|---------|
/// | `accuracy_tolerance` | 0.5     |
#[derive(Debug, Clone)]
pub struct CrossValidation {
    n_folds: usize,
    accuracy_tolerance: f64,
}

/// Scores for one held-out fold.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldScore {
    /// Zero-based fold index.
    pub fold: usize,
    /// Rows used to grow the tree.
    pub n_training: usize,
    /// Rows held out.
    pub n_validation: usize,
    /// Leaves in the grown tree.
    pub n_leaves: usize,
    /// Accuracy on the training rows.
    pub training_accuracy: f64,
    /// Accuracy on the held-out rows.
    pub validation_accuracy: f64,
}

/// Results of k-fold cross-validation.
#[derive(Debug, Clone)]
pub struct CrossValidationResult {
    /// Per-fold scores, in fold order.
    pub folds: Vec<FoldScore>,
    /// Mean in-sample accuracy across folds.
    pub mean_training_accuracy: f64,
    /// Mean held-out accuracy across folds.
    pub mean_validation_accuracy: f64,
    /// Number of rows in the dataset.
    pub n_rows: usize,
    /// Number of predictor columns.
    pub n_predictors: usize,
}

impl CrossValidation {
    /// Create a new cross-validation config with the given number of folds.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidFoldCount`] if `n_folds` < 2.
    pub fn new(n_folds: usize) -> Result<Self, TreeError> {
        if n_folds < 2 {
            return Err(TreeError::InvalidFoldCount { n_folds });
        }
        Ok(Self {
            n_folds,
            accuracy_tolerance: 0.5,
        })
    }

    /// A prediction counts as correct when it is strictly within this distance of the response.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidAccuracyTolerance`] unless the tolerance is
    /// finite and positive.
    pub fn with_accuracy_tolerance(mut self, accuracy_tolerance: f64) -> Result<Self, TreeError> {
        if !accuracy_tolerance.is_finite() || accuracy_tolerance <= 0.0 {
            return Err(TreeError::InvalidAccuracyTolerance {
                value: accuracy_tolerance,
            });
        }
        self.accuracy_tolerance = accuracy_tolerance;
        Ok(self)
    }

    /// Return the number of folds.
    #[must_use]
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// Return the accuracy tolerance.
    #[must_use]
    pub fn accuracy_tolerance(&self) -> f64 {
        self.accuracy_tolerance
    }

    /// Grow one tree per fold on the other folds and score it on both.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::ColumnLengthMismatch`] | predictor and response lengths differ |
    /// | [`TreeError::EmptyDataset`] | zero rows |
    /// | [`TreeError::EmptyFold`] | fewer rows than folds |
    /// | Other tree errors | From underlying training |
    #[instrument(
        skip_all,
        fields(n_folds = self.n_folds, n_rows = responses.len())
    )]
    pub fn evaluate(
        &self,
        config: &TreeConfig,
        predictors: &[Vec<f64>],
        responses: &[f64],
    ) -> Result<CrossValidationResult, TreeError> {
        validate_columns(predictors, responses)?;
        let n_rows = responses.len();
        if n_rows < self.n_folds {
            return Err(TreeError::EmptyFold {
                fold: n_rows,
                n_folds: self.n_folds,
                n_rows,
            });
        }

        let mut folds = Vec::with_capacity(self.n_folds);
        for fold in 0..self.n_folds {
            let (training, validation): (Vec<usize>, Vec<usize>) =
                (0..n_rows).partition(|&row| row % self.n_folds != fold);

            let training_predictors = select_columns(predictors, &training);
            let training_responses = select(responses, &training);
            let model = config
                .fit(&training_predictors, &training_responses)?
                .to_model();

            let training_predictions = model.predict_batch(&rows(predictors, &training))?;
            let validation_predictions = model.predict_batch(&rows(predictors, &validation))?;

            let score = FoldScore {
                fold,
                n_training: training.len(),
                n_validation: validation.len(),
                n_leaves: model.n_leaves(),
                training_accuracy: self.accuracy(&training_predictions, &training_responses),
                validation_accuracy: self
                    .accuracy(&validation_predictions, &select(responses, &validation)),
            };
            debug!(
                fold,
                n_leaves = score.n_leaves,
                training_accuracy = score.training_accuracy,
                validation_accuracy = score.validation_accuracy,
                "fold evaluated"
            );
            folds.push(score);
        }

        let k = self.n_folds as f64;
        let mean_training_accuracy = folds.iter().map(|f| f.training_accuracy).sum::<f64>() / k;
        let mean_validation_accuracy =
            folds.iter().map(|f| f.validation_accuracy).sum::<f64>() / k;

        info!(
            mean_training_accuracy,
            mean_validation_accuracy, "cross-validation complete"
        );

        Ok(CrossValidationResult {
            folds,
            mean_training_accuracy,
            mean_validation_accuracy,
            n_rows,
            n_predictors: predictors.len(),
        })
    }

    fn accuracy(&self, predictions: &[f64], responses: &[f64]) -> f64 {
        let correct = predictions
            .iter()
            .zip(responses)
            .filter(|&(p, y)| (p - y).abs() < self.accuracy_tolerance)
            .count();
        correct as f64 / responses.len() as f64
    }
}

fn select(values: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| values[i]).collect()
}

fn select_columns(columns: &[Vec<f64>], indices: &[usize]) -> Vec<Vec<f64>> {
    columns.iter().map(|c| select(c, indices)).collect()
}

fn rows(columns: &[Vec<f64>], indices: &[usize]) -> Vec<Vec<f64>> {
    indices
        .iter()
        .map(|&i| columns.iter().map(|c| c[i]).collect())
        .collect()
}
