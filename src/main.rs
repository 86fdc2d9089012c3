use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use cartwright_io::{ColumnSpec, Dataset, MissingPolicy, PredictionWriter, TableReader};
use cartwright_tree::{CrossValidation, TreeConfig, TreeModel, baseline};

#[derive(Parser)]
#[command(name = "cartwright")]
#[command(about = "Greedy CART regression trees over CSV data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Input columns shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct ColumnArgs {
    /// Path to the input CSV file
    #[arg(long)]
    data: PathBuf,

    /// Predictor column: `name` for a numeric column, `name=value` for an indicator
    #[arg(long = "predictor", required = true)]
    predictors: Vec<String>,

    /// Drop rows with an empty cell in a selected column instead of failing
    #[arg(long, default_value_t = false)]
    skip_incomplete: bool,
}

impl ColumnArgs {
    fn reader(&self) -> TableReader {
        let specs = self.predictors.iter().map(|s| ColumnSpec::parse(s)).collect();
        let missing = if self.skip_incomplete {
            MissingPolicy::Skip
        } else {
            MissingPolicy::Reject
        };
        TableReader::new(&self.data, specs).with_missing_policy(missing)
    }
}

/// Tree growth parameters.
#[derive(Args, Debug, Clone)]
struct GrowthArgs {
    /// Leaves with this many rows or fewer are never split
    #[arg(long, default_value_t = TreeConfig::DEFAULT_MIN_ROWS_PER_NODE)]
    min_rows: usize,
}

impl GrowthArgs {
    fn config(&self) -> TreeConfig {
        TreeConfig::new().with_min_rows_per_node(self.min_rows)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Score the majority baseline and k-fold cross-validated trees
    Evaluate {
        #[command(flatten)]
        columns: ColumnArgs,

        /// Response column (numeric)
        #[arg(long)]
        response: String,

        /// Number of cross-validation folds
        #[arg(long, default_value_t = 4)]
        folds: usize,

        /// A prediction counts as correct when within this distance of the response
        #[arg(long, default_value_t = 0.5)]
        accuracy_tolerance: f64,

        #[command(flatten)]
        growth: GrowthArgs,
    },

    /// Grow a tree on the whole file and save it
    Train {
        #[command(flatten)]
        columns: ColumnArgs,

        /// Response column (numeric)
        #[arg(long)]
        response: String,

        /// Path for the trained model binary
        #[arg(long)]
        model: PathBuf,

        #[command(flatten)]
        growth: GrowthArgs,
    },

    /// Predict every row of a CSV with a saved model
    Predict {
        #[command(flatten)]
        columns: ColumnArgs,

        /// Path to the trained model binary
        #[arg(long)]
        model: PathBuf,

        /// Path for the `row,prediction` CSV
        #[arg(long)]
        output: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct BaselineOutput {
    rate: f64,
    prediction: f64,
    accuracy: f64,
}

#[derive(Serialize)]
struct FoldOutput {
    fold: usize,
    n_training: usize,
    n_validation: usize,
    n_leaves: usize,
    training_accuracy: f64,
    validation_accuracy: f64,
}

#[derive(Serialize)]
struct EvaluateOutput {
    n_rows: usize,
    n_skipped: usize,
    n_predictors: usize,
    min_rows_per_node: usize,
    baseline: BaselineOutput,
    folds: Vec<FoldOutput>,
    mean_training_accuracy: f64,
    mean_validation_accuracy: f64,
}

#[derive(Serialize)]
struct ImportanceOutput {
    name: String,
    importance: f64,
}

#[derive(Serialize)]
struct TrainOutput {
    model: String,
    n_rows: usize,
    n_skipped: usize,
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    initial_cost: f64,
    final_cost: f64,
    importances: Vec<ImportanceOutput>,
}

#[derive(Serialize)]
struct PredictOutput {
    output: String,
    n_rows: usize,
    n_skipped: usize,
    model_n_leaves: usize,
}

fn read_with_response(columns: &ColumnArgs, response: &str) -> Result<(Dataset, Vec<f64>)> {
    let dataset = columns
        .reader()
        .with_response(response)
        .read()
        .with_context(|| format!("failed to read {}", columns.data.display()))?;
    let Some(responses) = dataset.responses.clone() else {
        bail!("response column {response} was not loaded");
    };
    Ok((dataset, responses))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Evaluate {
            columns,
            response,
            folds,
            accuracy_tolerance,
            growth,
        } => {
            let (dataset, responses) = read_with_response(&columns, &response)?;
            let base = baseline(&responses).context("baseline failed")?;
            info!(
                rate = base.rate,
                accuracy = base.accuracy,
                "baseline scored"
            );

            let config = growth.config();
            let cv = CrossValidation::new(folds)
                .context("invalid fold count")?
                .with_accuracy_tolerance(accuracy_tolerance)
                .context("invalid accuracy tolerance")?;
            let result = cv
                .evaluate(&config, &dataset.predictors, &responses)
                .context("cross-validation failed")?;

            let output = EvaluateOutput {
                n_rows: result.n_rows,
                n_skipped: dataset.n_skipped,
                n_predictors: result.n_predictors,
                min_rows_per_node: config.min_rows_per_node(),
                baseline: BaselineOutput {
                    rate: base.rate,
                    prediction: base.prediction,
                    accuracy: base.accuracy,
                },
                folds: result
                    .folds
                    .iter()
                    .map(|f| FoldOutput {
                        fold: f.fold,
                        n_training: f.n_training,
                        n_validation: f.n_validation,
                        n_leaves: f.n_leaves,
                        training_accuracy: f.training_accuracy,
                        validation_accuracy: f.validation_accuracy,
                    })
                    .collect(),
                mean_training_accuracy: result.mean_training_accuracy,
                mean_validation_accuracy: result.mean_validation_accuracy,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Train {
            columns,
            response,
            model,
            growth,
        } => {
            let (dataset, responses) = read_with_response(&columns, &response)?;
            let tree = growth
                .config()
                .fit(&dataset.predictors, &responses)
                .context("training failed")?;
            let fitted = tree.to_model();
            fitted
                .save(&model)
                .with_context(|| format!("failed to save model to {}", model.display()))?;

            let importances = dataset
                .predictor_names
                .iter()
                .zip(fitted.predictor_importances())
                .map(|(name, importance)| ImportanceOutput {
                    name: name.clone(),
                    importance,
                })
                .collect();
            let output = TrainOutput {
                model: model.display().to_string(),
                n_rows: dataset.n_rows(),
                n_skipped: dataset.n_skipped,
                n_nodes: fitted.n_nodes(),
                n_leaves: fitted.n_leaves(),
                depth: fitted.depth(),
                initial_cost: tree.root().unsplit_cost(),
                final_cost: fitted.cost(),
                importances,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Predict {
            columns,
            model,
            output,
        } => {
            let fitted = TreeModel::load(&model)
                .with_context(|| format!("failed to load model from {}", model.display()))?;
            if fitted.n_predictors() != columns.predictors.len() {
                bail!(
                    "model expects {} predictors, got {} --predictor flags",
                    fitted.n_predictors(),
                    columns.predictors.len()
                );
            }

            let dataset = columns
                .reader()
                .read()
                .with_context(|| format!("failed to read {}", columns.data.display()))?;
            let predictions = fitted
                .predict_batch(&dataset.rows())
                .context("prediction failed")?;
            PredictionWriter::new(&output)
                .and_then(|writer| writer.write(&dataset.source_rows, &predictions))
                .with_context(|| format!("failed to write {}", output.display()))?;

            let summary = PredictOutput {
                output: output.display().to_string(),
                n_rows: predictions.len(),
                n_skipped: dataset.n_skipped,
                model_n_leaves: fitted.n_leaves(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
