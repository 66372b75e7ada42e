//! End-to-end training run: split, fit, evaluate, write artifacts.
//!
//! # Example
//!
//! ```no_run
//! use progression::training::train;
//!
//! let outcome = train("models", "ridge").unwrap();
//! println!("rmse = {}", outcome.metrics.rmse);
//! ```

use crate::datasets::{load_diabetes, Dataset};
use crate::error::Result;
use crate::format::{save_model, ArtifactPaths, MetricsDocument};
use crate::metrics::classification::{binarize, BinaryConfusion};
use crate::metrics::rmse;
use crate::model_selection::train_test_split;
use crate::pipeline::{ModelKind, Pipeline};
use crate::stats::DescriptiveStats;
use crate::traits::Estimator;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Seed for the split and for any randomized estimator.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of rows held out for evaluation.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Training targets at or above this percentile count as flagged.
pub const FLAG_PERCENTILE: f64 = 70.0;

/// Settings for one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Directory that receives `model.pkl` and `metrics.json`.
    pub out_dir: PathBuf,
    pub kind: ModelKind,
    pub seed: u64,
    pub test_size: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("models"),
            kind: ModelKind::Linear,
            seed: DEFAULT_SEED,
            test_size: DEFAULT_TEST_SIZE,
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub pipeline: Pipeline,
    pub metrics: MetricsDocument,
    pub paths: ArtifactPaths,
}

/// Trains the model selected by `kind` and writes both artifacts to `out_dir`.
///
/// The selector is validated before any data is touched.
///
/// # Errors
///
/// Returns `InvalidArgument` for an unknown `kind`, otherwise any error from
/// [`train_with_config`].
pub fn train(out_dir: impl AsRef<Path>, kind: &str) -> Result<TrainOutcome> {
    let kind: ModelKind = kind.parse()?;
    train_with_config(&TrainConfig {
        out_dir: out_dir.as_ref().to_path_buf(),
        kind,
        ..TrainConfig::default()
    })
}

/// Runs a full training pass on the bundled diabetes dataset.
///
/// Nothing is written unless fitting and evaluation succeed.
///
/// # Errors
///
/// Returns an error if splitting, fitting, evaluation or writing fails.
pub fn train_with_config(config: &TrainConfig) -> Result<TrainOutcome> {
    let dataset = load_diabetes()?;
    let (pipeline, metrics) = fit_and_evaluate(&dataset, config.kind, config.seed, config.test_size)?;

    let paths = ArtifactPaths::new(&config.out_dir);
    fs::create_dir_all(&paths.dir)?;
    write_artifacts(&pipeline, &metrics, &paths)?;
    info!(
        model = %paths.model.display(),
        metrics = %paths.metrics.display(),
        "wrote training artifacts"
    );

    Ok(TrainOutcome {
        pipeline,
        metrics,
        paths,
    })
}

/// Writes the model and metrics as a pair.
///
/// Both files are staged next to their targets and only renamed into place
/// once both are complete. If the second rename fails the fresh model is
/// removed again, so a reader never sees a model without its own metrics.
fn write_artifacts(
    pipeline: &Pipeline,
    metrics: &MetricsDocument,
    paths: &ArtifactPaths,
) -> Result<()> {
    let model_tmp = paths.model.with_extension("pkl.tmp");
    let metrics_tmp = paths.metrics.with_extension("json.tmp");

    let staged = save_model(pipeline, &model_tmp).and_then(|()| metrics.save(&metrics_tmp));
    if let Err(e) = staged {
        discard(&[model_tmp.as_path(), metrics_tmp.as_path()]);
        return Err(e);
    }

    if let Err(e) = fs::rename(&model_tmp, &paths.model) {
        discard(&[model_tmp.as_path(), metrics_tmp.as_path()]);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&metrics_tmp, &paths.metrics) {
        warn!(error = %e, "metrics rename failed, withdrawing model");
        discard(&[paths.model.as_path(), metrics_tmp.as_path()]);
        return Err(e.into());
    }
    Ok(())
}

fn discard(files: &[&Path]) {
    for file in files {
        if let Err(e) = fs::remove_file(file) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(file = %file.display(), error = %e, "could not remove partial artifact");
            }
        }
    }
}

/// Fits `kind` on a seeded split of `dataset` and scores the held-out rows.
///
/// Pure computation: no files are touched.
///
/// # Errors
///
/// Returns an error if the split is impossible or the estimator fails to fit.
pub fn fit_and_evaluate(
    dataset: &Dataset,
    kind: ModelKind,
    seed: u64,
    test_size: f64,
) -> Result<(Pipeline, MetricsDocument)> {
    let split = train_test_split(&dataset.data, &dataset.target, test_size, Some(seed))?;
    info!(
        %kind,
        seed,
        n_train = split.y_train.len(),
        n_test = split.y_test.len(),
        "split dataset"
    );

    let mut pipeline = Pipeline::for_kind(kind, seed);
    pipeline.fit(&split.x_train, &split.y_train)?;
    debug!(model = %pipeline.name(), "fitted pipeline");

    let y_pred = pipeline.predict(&split.x_test)?;
    let test_rmse = rmse(&y_pred, &split.y_test);

    let threshold = DescriptiveStats::new(&split.y_train).percentile(FLAG_PERCENTILE)?;
    let confusion = BinaryConfusion::from_flags(
        &binarize(y_pred.as_slice(), threshold),
        &binarize(split.y_test.as_slice(), threshold),
    );
    info!(
        rmse = test_rmse,
        threshold,
        precision = confusion.precision(),
        recall = confusion.recall(),
        "evaluated on held-out split"
    );

    let metrics = MetricsDocument {
        model_name: pipeline.name(),
        seed,
        rmse: f64::from(test_rmse),
        n_train: split.y_train.len(),
        n_test: split.y_test.len(),
        features: dataset.feature_names.clone(),
        flag_threshold: Some(f64::from(threshold)),
        precision_at_thresh: Some(f64::from(confusion.precision())),
        recall_at_thresh: Some(f64::from(confusion.recall())),
    };
    Ok((pipeline, metrics))
}
