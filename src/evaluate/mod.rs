//! Scoring a program against a labeled dataset.
//!
//! [`Evaluate`] drives one program invocation per dev example under bounded
//! concurrency and aggregates metric scores into a [`Summary`]. The same
//! [`Metric`] seam is used by the bootstrapper to accept demonstrations, so
//! a metric written once serves both workflows.

pub mod evaluator;
pub mod metrics;

pub use evaluator::*;
pub use metrics::*;
