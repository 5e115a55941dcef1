//! Bootstrap few-shot compilation and concurrent evaluation for LM pipelines.
//!
//! Two cooperating subsystems around a small data model:
//!
//! - [`BootstrapFewShot`] drives a training set through a candidate program,
//!   keeps the metric-validated traces as [`Demonstration`]s, and returns an
//!   immutable [`CompiledModule`].
//! - [`Evaluate`] scores a program against a labeled dev set under bounded
//!   concurrency and aggregates per-example scores into a [`Summary`].
//!
//! Programs are anything implementing [`Module`]; [`Pipeline`] composes
//! them from tagged [`Step`]s. Metrics are opaque [`Metric`] capabilities,
//! shared by both subsystems.

pub mod core;
pub mod data;
pub mod evaluate;
pub mod modules;
pub mod optimizer;

pub use crate::core::*;
pub use data::*;
pub use evaluate::*;
pub use modules::*;
pub use optimizer::*;

/// Builds an [`Example`], tagging each field as `"input"` or `"output"`:
///
/// ```
/// use fewshot::example;
///
/// let ex = example! {
///     "question": "input" => "What is 2+2?",
///     "answer": "output" => "4",
/// };
/// assert_eq!(ex.input_keys(), ["question".to_string()]);
/// ```
#[macro_export]
macro_rules! example {
    { $($key:literal : $field_type:literal => $value:expr),* $(,)? } => {{
        let mut fields = $crate::Fields::default();
        let mut input_keys: ::std::vec::Vec<::std::string::String> = ::std::vec![];
        let mut output_keys: ::std::vec::Vec<::std::string::String> = ::std::vec![];

        $(
            if $field_type == "input" {
                input_keys.push($key.to_string());
            } else {
                output_keys.push($key.to_string());
            }

            fields.insert($key.to_string(), $value.into());
        )*

        $crate::Example::new(fields, input_keys, output_keys)
    }};
}

/// Builds a [`Prediction`] with default usage accounting:
///
/// ```
/// use fewshot::prediction;
///
/// let pred = prediction! { "answer" => "4" };
/// assert_eq!(pred.get("answer", None), "4");
/// ```
#[macro_export]
macro_rules! prediction {
    { $($key:literal => $value:expr),* $(,)? } => {{
        let mut fields = $crate::Fields::default();
        $(
            fields.insert($key.to_string(), $value.into());
        )*

        $crate::Prediction::new(fields, $crate::LmUsage::default())
    }};
}
