use anyhow::Result;

use crate::{Example, Prediction};

/// External scoring oracle: `(gold example, prediction) -> score`.
///
/// The score is numeric; callers decide what counts as passing (the
/// bootstrapper via its threshold, the evaluator by averaging raw scores).
/// An `Err` from `score` is an oracle failure and aborts the enclosing
/// compile or evaluate run — return a score, not an error, for ordinary
/// "this answer is wrong" outcomes.
///
/// Metrics are invoked through a shared reference from multiple evaluator
/// workers, so they must not rely on shared mutable state.
#[allow(async_fn_in_trait)]
pub trait Metric: Send + Sync {
    async fn score(&self, example: &Example, prediction: &Prediction) -> Result<f32>;
}

/// Adapts a plain closure into a [`Metric`], the usual way to supply one:
///
/// ```
/// use fewshot::FnMetric;
///
/// let metric = FnMetric::new(|example, prediction| {
///     Ok(if example.get("answer", None) == prediction.get("answer", None) {
///         1.0
///     } else {
///         0.0
///     })
/// });
/// ```
pub struct FnMetric<F> {
    f: F,
}

impl<F> FnMetric<F>
where
    F: Fn(&Example, &Prediction) -> Result<f32> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Metric for FnMetric<F>
where
    F: Fn(&Example, &Prediction) -> Result<f32> + Send + Sync,
{
    async fn score(&self, example: &Example, prediction: &Prediction) -> Result<f32> {
        (self.f)(example, prediction)
    }
}

/// Stock metric: 1.0 when the named field matches between gold example and
/// prediction, 0.0 otherwise. String values are compared trimmed; anything
/// else by value equality. A field missing on either side scores 0.0.
pub struct ExactMatch {
    pub field: String,
}

impl ExactMatch {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Metric for ExactMatch {
    async fn score(&self, example: &Example, prediction: &Prediction) -> Result<f32> {
        let (Some(gold), Some(predicted)) =
            (example.field(&self.field), prediction.field(&self.field))
        else {
            return Ok(0.0);
        };

        let matched = match (gold.as_str(), predicted.as_str()) {
            (Some(gold), Some(predicted)) => gold.trim() == predicted.trim(),
            _ => gold == predicted,
        };
        Ok(if matched { 1.0 } else { 0.0 })
    }
}
