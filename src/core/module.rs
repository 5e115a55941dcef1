use anyhow::Result;
use futures::future::join_all;

use crate::{Example, Predicted};

/// The program capability: a callable unit of computation over [`Example`]s.
///
/// `forward` takes the input fields of an example and returns the final
/// prediction together with the trace of step calls. An `Err` from `forward`
/// means *this invocation* failed — the bootstrapper treats it as a
/// rejection and the evaluator as a zero-score record; neither aborts its
/// batch over it.
///
/// Implementations must be safely callable from multiple evaluator workers
/// through a shared reference.
#[allow(async_fn_in_trait)]
pub trait Module: Send + Sync {
    async fn forward(&self, inputs: Example) -> Result<Predicted>;

    async fn batch(&self, inputs: Vec<Example>) -> Result<Vec<Predicted>> {
        let futures: Vec<_> = inputs
            .iter()
            .map(|input| self.forward(input.clone()))
            .collect();

        let predictions = join_all(futures).await;
        predictions.into_iter().collect::<Result<Vec<_>>>()
    }
}
