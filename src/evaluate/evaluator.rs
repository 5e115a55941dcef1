use bon::Builder;
use futures::StreamExt;
use futures::stream;
use kdam::{BarExt, tqdm};
use serde::Serialize;

use crate::core::errors::{ConfigError, EvalError, OracleError};
use crate::{Example, LmUsage, Metric, Module, Prediction};

/// One scored dev example. `prediction` is `None` and `error` is `Some`
/// when the program invocation failed; the score is then 0.0.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecord {
    pub index: usize,
    pub example: Example,
    pub prediction: Option<Prediction>,
    pub score: f32,
    pub error: Option<String>,
}

/// Terminal artifact of an evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Mean metric score over the dev set (0.0 for an empty set).
    pub mean: f32,
    /// Number of dev examples, failed invocations included.
    pub count: usize,
    /// Total token usage of the successful invocations.
    pub usage: LmUsage,
    /// Per-example records in dev-set order, kept only when `keep_table`.
    pub table: Option<Vec<ScoreRecord>>,
}

/// Concurrent evaluation driver.
///
/// Dispatches one program invocation per dev example, bounded to
/// `num_workers` in flight, scores each completed prediction with the
/// metric, and aggregates. Stateless apart from this configuration, so one
/// `Evaluate` can be reused across programs and datasets.
///
/// Workers complete in arbitrary order; records are written back into an
/// index-addressed table so the optional `table` always follows dev-set
/// input order.
///
/// ```ignore
/// let evaluator = Evaluate::builder().num_workers(16).keep_table(true).build();
/// let summary = evaluator.evaluate(&program, &devset, &metric).await?;
/// ```
#[derive(Builder, Debug, Clone)]
pub struct Evaluate {
    /// Maximum concurrent in-flight program invocations (must be ≥ 1).
    #[builder(default = 8)]
    pub num_workers: usize,
    /// Render a progress bar while the run is in flight.
    #[builder(default = false)]
    pub display_progress: bool,
    /// Retain per-example [`ScoreRecord`]s in the summary. Off by default
    /// to bound memory on large dev sets.
    #[builder(default = false)]
    pub keep_table: bool,
}

impl Evaluate {
    /// Runs `module` over `devset` and aggregates metric scores.
    ///
    /// A failed invocation contributes a zero-score record and the run
    /// continues; the first metric failure aborts the run with
    /// [`EvalError::Oracle`] and no summary is returned.
    pub async fn evaluate<M, MT>(
        &self,
        module: &M,
        devset: &[Example],
        metric: &MT,
    ) -> Result<Summary, EvalError>
    where
        M: Module,
        MT: Metric,
    {
        if self.num_workers == 0 {
            return Err(ConfigError::ZeroWorkers.into());
        }

        let mut results = stream::iter(devset.iter().enumerate())
            .map(|(index, example)| async move {
                match module.forward(example.inputs()).await {
                    Ok(predicted) => {
                        let score = metric
                            .score(example, &predicted)
                            .await
                            .map_err(|source| OracleError { index, source })?;
                        Ok::<ScoreRecord, OracleError>(ScoreRecord {
                            index,
                            example: example.clone(),
                            prediction: Some(predicted.into_prediction()),
                            score,
                            error: None,
                        })
                    }
                    Err(err) => Ok(ScoreRecord {
                        index,
                        example: example.clone(),
                        prediction: None,
                        score: 0.0,
                        error: Some(format!("{err:#}")),
                    }),
                }
            })
            .buffer_unordered(self.num_workers);

        let mut progress = self
            .display_progress
            .then(|| tqdm!(total = devset.len(), desc = "Evaluating".to_string()));
        let mut slots: Vec<Option<ScoreRecord>> = Vec::new();
        if self.keep_table {
            slots.resize_with(devset.len(), || None);
        }

        let mut sum = 0.0f32;
        let mut usage = LmUsage::default();

        while let Some(result) = results.next().await {
            let record = result?;
            let index = record.index;
            sum += record.score;
            if let Some(prediction) = &record.prediction {
                usage = usage + prediction.usage().clone();
            }
            if let Some(bar) = progress.as_mut() {
                let _ = bar.update(1);
            }
            if self.keep_table {
                slots[index] = Some(record);
            }
        }

        let count = devset.len();
        let mean = if count == 0 { 0.0 } else { sum / count as f32 };
        let table = self
            .keep_table
            .then(|| slots.into_iter().flatten().collect());

        Ok(Summary {
            mean,
            count,
            usage,
            table,
        })
    }
}
