pub mod bootstrap;
pub mod compiled;

pub use bootstrap::*;
pub use compiled::*;

use crate::core::errors::CompileError;
use crate::{Example, Metric, Module};

/// A compiler from candidate program + training set to a demonstration-
/// carrying [`CompiledModule`].
///
/// Compilation consumes the candidate and returns a new immutable artifact;
/// the candidate is never mutated in place, so a failed compile leaves
/// nothing half-built behind.
#[allow(async_fn_in_trait)]
pub trait Optimizer {
    async fn compile<M, MT>(
        &self,
        module: M,
        trainset: Vec<Example>,
        metric: &MT,
    ) -> Result<CompiledModule<M>, CompileError>
    where
        M: Module,
        MT: Metric;
}
