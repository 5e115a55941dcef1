use std::ops::Add;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::example::Fields;

/// Token accounting for one or more LM calls. Additive, so usage can be
/// summed across pipeline steps and across an evaluation run.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl LmUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

impl Add for LmUsage {
    type Output = LmUsage;

    fn add(self, other: LmUsage) -> Self {
        LmUsage {
            prompt_tokens: self.prompt_tokens + other.prompt_tokens,
            completion_tokens: self.completion_tokens + other.completion_tokens,
            total_tokens: self.total_tokens + other.total_tokens,
        }
    }
}

/// Output fields produced by one step or program invocation, plus the token
/// usage it cost. Equality compares fields only, not usage.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Prediction {
    data: Fields,
    lm_usage: LmUsage,
}

impl Prediction {
    pub fn new(data: impl IntoIterator<Item = (String, Value)>, lm_usage: LmUsage) -> Self {
        Self {
            data: data.into_iter().collect(),
            lm_usage,
        }
    }

    pub fn get(&self, key: &str, default: Option<&str>) -> Value {
        self.data
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.unwrap_or_default().into())
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.data.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn usage(&self) -> &LmUsage {
        &self.lm_usage
    }

    pub fn with_usage(mut self, lm_usage: LmUsage) -> Self {
        self.lm_usage = lm_usage;
        self
    }
}

impl PartialEq for Prediction {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
