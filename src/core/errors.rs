//! Fatal error taxonomy for `compile` and `evaluate`.
//!
//! Per-example failures are *not* errors here: a program invocation that
//! fails is folded into a rejection (bootstrapping) or a zero-score record
//! (evaluation) and the batch keeps going. Only two conditions abort a run,
//! and both mean the result would be untrustworthy if we continued:
//!
//! 1. **Config** — a cap was invalid. Caught at call entry, before any
//!    LM budget is spent.
//! 2. **Oracle** — the metric itself failed. The metric is the correctness
//!    oracle for the whole batch; once it cannot be trusted, neither can
//!    any demonstration or score derived from it.
//!
//! A `compile` or `evaluate` call either returns a complete artifact or one
//! of these errors — never a partial one.

use thiserror::Error;

/// A configuration cap was invalid. Detected before any work begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_rounds` must be at least 1; a zero retry budget can never
    /// accept anything.
    #[error("max_rounds must be at least 1")]
    ZeroRounds,

    /// `num_workers` must be at least 1.
    #[error("num_workers must be at least 1")]
    ZeroWorkers,
}

/// The metric capability itself failed while scoring the example at
/// `index`. Always fatal to the enclosing run.
#[derive(Debug, Error)]
#[error("metric failed while scoring example {index}")]
pub struct OracleError {
    pub index: usize,
    #[source]
    pub source: anyhow::Error,
}

/// Failure of a [`compile`](crate::Optimizer::compile) call. No
/// `CompiledModule` is produced.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid compile configuration")]
    Config(#[from] ConfigError),

    #[error("metric failure aborted compilation")]
    Oracle(#[from] OracleError),
}

/// Failure of an [`evaluate`](crate::Evaluate::evaluate) call. No `Summary`
/// is produced.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid evaluation configuration")]
    Config(#[from] ConfigError),

    #[error("metric failure aborted evaluation")]
    Oracle(#[from] OracleError),
}
