use serde::{Deserialize, Serialize};

use crate::{Example, Prediction};

/// One step call inside a program invocation: the step's tag, the fields it
/// saw, and the fields it produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepRecord {
    pub step: String,
    pub inputs: Example,
    pub outputs: Prediction,
}

/// Ordered record of the step calls made by one program invocation.
///
/// A trace belongs to the invocation that produced it. It is either folded
/// into a [`Demonstration`](crate::Demonstration) during bootstrapping or
/// dropped with the [`Predicted`](crate::Predicted) that carried it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    records: Vec<StepRecord>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for Trace {
    type Item = StepRecord;
    type IntoIter = std::vec::IntoIter<StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
