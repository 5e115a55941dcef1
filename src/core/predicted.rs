use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{Prediction, Trace};

/// Result of one [`Module::forward`](crate::Module::forward): the final
/// prediction plus the trace of step calls that produced it.
///
/// Derefs to the prediction, so scoring code that only cares about the
/// output fields can ignore the trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predicted {
    prediction: Prediction,
    trace: Trace,
}

impl Predicted {
    pub fn new(prediction: Prediction, trace: Trace) -> Self {
        Self { prediction, trace }
    }

    pub fn prediction(&self) -> &Prediction {
        &self.prediction
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn into_prediction(self) -> Prediction {
        self.prediction
    }

    pub fn into_parts(self) -> (Prediction, Trace) {
        (self.prediction, self.trace)
    }
}

impl Deref for Predicted {
    type Target = Prediction;

    fn deref(&self) -> &Self::Target {
        &self.prediction
    }
}
