use anyhow::Result;
use async_trait::async_trait;

use crate::{Example, LmUsage, Prediction};

/// One sub-computation of a pipeline, LM-backed or deterministic.
///
/// Steps are the injected generation capability: the core never assumes
/// anything about what happens inside `invoke`, only that an `Err` means
/// this one invocation produced nothing usable. Object-safe so pipelines
/// can hold heterogeneous steps.
#[async_trait]
pub trait Step: Send + Sync {
    async fn invoke(&self, inputs: Example) -> Result<Prediction>;
}

/// Adapts a plain closure into a [`Step`].
///
/// This is how deterministic fakes get injected in tests, and how quick
/// glue steps (field renames, lookups) slot into a pipeline without a
/// dedicated type.
///
/// ```
/// use fewshot::{FnStep, LmUsage, Prediction};
///
/// let upper = FnStep::new(|inputs| {
///     let text = inputs.get("text", None);
///     Ok(Prediction::new(
///         [("text".to_string(), text.as_str().unwrap_or_default().to_uppercase().into())],
///         LmUsage::default(),
///     ))
/// });
/// ```
pub struct FnStep<F> {
    f: F,
}

impl<F> FnStep<F>
where
    F: Fn(&Example) -> Result<Prediction> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Step for FnStep<F>
where
    F: Fn(&Example) -> Result<Prediction> + Send + Sync,
{
    async fn invoke(&self, inputs: Example) -> Result<Prediction> {
        (self.f)(&inputs)
    }
}

/// Echo step: repeats its input fields as outputs. Useful as a placeholder
/// while wiring a pipeline up.
pub struct EchoStep;

#[async_trait]
impl Step for EchoStep {
    async fn invoke(&self, inputs: Example) -> Result<Prediction> {
        Ok(Prediction::new(
            inputs.iter().map(|(k, v)| (k.clone(), v.clone())),
            LmUsage::default(),
        ))
    }
}
