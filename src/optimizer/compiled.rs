use serde::{Deserialize, Serialize};

use crate::{Example, Module, Predicted, Prediction, Trace};
use anyhow::Result;

/// A metric-validated (input, prediction) pair kept as a few-shot example,
/// together with the full trace of the invocation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Demonstration {
    pub example: Example,
    pub prediction: Prediction,
    pub trace: Trace,
}

impl Demonstration {
    pub fn new(example: Example, prediction: Prediction, trace: Trace) -> Self {
        Self {
            example,
            prediction,
            trace,
        }
    }

    /// Fuses the input fields and predicted output fields into one complete
    /// example, the shape prompt renderers consume.
    pub fn to_example(&self) -> Example {
        let inputs = self.example.inputs();
        Example::new(
            inputs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .chain(self.prediction.iter().map(|(k, v)| (k.clone(), v.clone())))
                .collect::<Vec<_>>(),
            self.example.input_keys().to_vec(),
            self.prediction.keys(),
        )
    }
}

/// A program plus the demonstration set attached by compilation.
///
/// Immutable once returned by [`Optimizer::compile`](crate::Optimizer::compile):
/// there is nothing to lock, so evaluator workers share it freely.
/// `forward` delegates to the wrapped program.
#[derive(Debug, Clone)]
pub struct CompiledModule<M> {
    module: M,
    demos: Vec<Demonstration>,
}

impl<M> CompiledModule<M> {
    pub fn new(module: M, demos: Vec<Demonstration>) -> Self {
        Self { module, demos }
    }

    pub fn demos(&self) -> &[Demonstration] {
        &self.demos
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn into_parts(self) -> (M, Vec<Demonstration>) {
        (self.module, self.demos)
    }
}

impl<M: Module> Module for CompiledModule<M> {
    async fn forward(&self, inputs: Example) -> Result<Predicted> {
        self.module.forward(inputs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmUsage;

    #[test]
    fn demonstration_fuses_inputs_and_outputs() {
        let example = Example::new(
            [
                ("question".to_string(), "2+2?".into()),
                ("answer".to_string(), "4".into()),
            ],
            vec!["question".to_string()],
            vec!["answer".to_string()],
        );
        let prediction = Prediction::new(
            [("answer".to_string(), "4".into())],
            LmUsage::default(),
        );

        let demo = Demonstration::new(example, prediction, Trace::new());
        let fused = demo.to_example();

        assert_eq!(fused.get("question", None), "2+2?");
        assert_eq!(fused.get("answer", None), "4");
        assert_eq!(fused.input_keys(), ["question".to_string()]);
        assert_eq!(fused.output_keys(), ["answer".to_string()]);
        assert!(fused.is_complete());
    }
}
