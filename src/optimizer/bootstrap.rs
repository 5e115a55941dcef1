use bon::Builder;

use crate::core::errors::{CompileError, ConfigError, OracleError};
use crate::optimizer::{CompiledModule, Demonstration, Optimizer};
use crate::{Example, Metric, Module};

/// Demonstration-bootstrapping compiler.
///
/// Turns a zero-shot program into a few-shot one by running it over the
/// training set, keeping only the (input, prediction) pairs the metric
/// accepts, and attaching them — full traces included — to the returned
/// [`CompiledModule`]. A single deterministic-order pass: examples are
/// visited strictly in trainset order, so the first accepted
/// demonstrations are the ones retained, and re-running on the same
/// trainset with a deterministic program and metric reproduces the same
/// demonstration set.
///
/// # Hyperparameters
///
/// - **`max_bootstrapped_demos`** (default: 4) — stop collecting once this
///   many demonstrations are accepted, regardless of remaining examples.
/// - **`max_labeled_demos`** (default: 16) — second cap on the attached
///   set; the effective bound is the smaller of the two.
/// - **`max_rounds`** (default: 1) — attempts per training example. Extra
///   rounds only pay off when the underlying program is nondeterministic.
///   Must be ≥ 1.
/// - **`metric_threshold`** — acceptance bar. Unset, any score above zero
///   accepts (the truthy convention); `Some(t)` accepts scores ≥ t. This is
///   deliberately independent of anything the evaluator does with the same
///   metric.
///
/// # Failure semantics
///
/// A failed program invocation or a rejected prediction costs one round and
/// is otherwise harmless; an example that never passes is skipped. A metric
/// failure aborts compilation with [`CompileError::Oracle`].
///
/// # Cost
///
/// At most `trainset.len() × max_rounds` program invocations, fewer when
/// the demo cap is reached early.
///
/// ```ignore
/// let compiler = BootstrapFewShot::builder().max_bootstrapped_demos(4).build();
/// let compiled = compiler.compile(program, trainset, &metric).await?;
/// ```
#[derive(Builder, Debug, Clone)]
pub struct BootstrapFewShot {
    /// Demonstrations to collect before stopping early.
    #[builder(default = 4)]
    pub max_bootstrapped_demos: usize,
    /// Upper bound on the attached demonstration set.
    #[builder(default = 16)]
    pub max_labeled_demos: usize,
    /// Attempts per training example (must be ≥ 1).
    #[builder(default = 1)]
    pub max_rounds: usize,
    /// Acceptance bar; `None` accepts any score above zero.
    pub metric_threshold: Option<f32>,
}

impl BootstrapFewShot {
    fn accepts(&self, score: f32) -> bool {
        match self.metric_threshold {
            Some(threshold) => score >= threshold,
            None => score > 0.0,
        }
    }
}

impl Optimizer for BootstrapFewShot {
    async fn compile<M, MT>(
        &self,
        module: M,
        trainset: Vec<Example>,
        metric: &MT,
    ) -> Result<CompiledModule<M>, CompileError>
    where
        M: Module,
        MT: Metric,
    {
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroRounds.into());
        }

        // At most one demo per training example, whatever the caps say.
        let cap = self
            .max_bootstrapped_demos
            .min(self.max_labeled_demos)
            .min(trainset.len());
        let mut demos: Vec<Demonstration> = Vec::with_capacity(cap);

        for (index, example) in trainset.iter().enumerate() {
            if demos.len() >= cap {
                break;
            }

            for _round in 0..self.max_rounds {
                // A failed invocation is a rejection, not a fatal error; it
                // consumes one round like any other rejection.
                let Ok(predicted) = module.forward(example.inputs()).await else {
                    continue;
                };

                let score = metric
                    .score(example, &predicted)
                    .await
                    .map_err(|source| OracleError { index, source })?;

                if self.accepts(score) {
                    let (prediction, trace) = predicted.into_parts();
                    demos.push(Demonstration::new(example.clone(), prediction, trace));
                    break;
                }
            }
        }

        Ok(CompiledModule::new(module, demos))
    }
}
