use std::sync::Arc;

use anyhow::{Result, bail};

use crate::data::example::Fields;
use crate::{Example, LmUsage, Module, Predicted, Prediction, Step, StepRecord, Trace};

/// A program as an explicit, tagged sequence of [`Step`]s.
///
/// Each step sees the original input fields plus everything earlier steps
/// produced, and every step call is appended to the invocation's [`Trace`].
/// The final prediction carries the last step's fields, with token usage
/// summed across all steps; intermediate fields remain visible through the
/// trace.
///
/// ```
/// use fewshot::{EchoStep, Pipeline};
///
/// let program = Pipeline::new()
///     .step("draft", EchoStep)
///     .step("refine", EchoStep);
/// assert_eq!(program.len(), 2);
/// ```
#[derive(Default, Clone)]
pub struct Pipeline {
    steps: Vec<(String, Arc<dyn Step>)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, name: impl Into<String>, step: impl Step + 'static) -> Self {
        self.steps.push((name.into(), Arc::new(step)));
        self
    }

    pub fn step_arc(mut self, name: impl Into<String>, step: Arc<dyn Step>) -> Self {
        self.steps.push((name.into(), step));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

// Steps are opaque trait objects; show the tags instead.
impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.names())
            .finish()
    }
}

impl Module for Pipeline {
    async fn forward(&self, inputs: Example) -> Result<Predicted> {
        if self.steps.is_empty() {
            bail!("pipeline has no steps");
        }

        let mut trace = Trace::new();
        let mut usage = LmUsage::default();
        let mut fields: Fields = inputs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let mut last: Option<Prediction> = None;

        for (name, step) in &self.steps {
            let step_inputs = Example::new(
                fields.clone(),
                fields.keys().cloned().collect(),
                vec![],
            );
            let prediction = step.invoke(step_inputs.clone()).await?;

            trace.push(StepRecord {
                step: name.clone(),
                inputs: step_inputs,
                outputs: prediction.clone(),
            });
            for (key, value) in prediction.iter() {
                fields.insert(key.clone(), value.clone());
            }
            usage = usage + prediction.usage().clone();
            last = Some(prediction);
        }

        let Some(prediction) = last else {
            bail!("pipeline produced no prediction");
        };
        Ok(Predicted::new(prediction.with_usage(usage), trace))
    }
}
