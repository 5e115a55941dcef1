use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered field map shared by [`Example`] and [`Prediction`](crate::Prediction).
pub type Fields = IndexMap<String, Value>;

/// One input/output record flowing through a pipeline.
///
/// An `Example` is an ordered mapping of named fields to JSON values, with a
/// designation of which fields are inputs and which are expected outputs
/// (labels). Fields are fixed at construction; every transformation
/// ([`with_inputs`](Example::with_inputs), [`without`](Example::without),
/// [`inputs`](Example::inputs), [`labels`](Example::labels)) returns a new
/// `Example`. Equality and hashing look only at the field values, not at the
/// input/output designation.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Example {
    data: Fields,
    input_keys: Vec<String>,
    output_keys: Vec<String>,
}

impl Example {
    /// Builds an example from field pairs. When `output_keys` is empty and
    /// `input_keys` is not, every non-input field is treated as an output.
    pub fn new(
        data: impl IntoIterator<Item = (String, Value)>,
        input_keys: Vec<String>,
        output_keys: Vec<String>,
    ) -> Self {
        let data: Fields = data.into_iter().collect();
        let output_keys = if !output_keys.is_empty() {
            output_keys
        } else if !input_keys.is_empty() {
            data.keys()
                .filter(|key| !input_keys.contains(key))
                .cloned()
                .collect()
        } else {
            vec![]
        };

        Self {
            data,
            input_keys,
            output_keys,
        }
    }

    pub fn get(&self, key: &str, default: Option<&str>) -> Value {
        self.data
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.unwrap_or_default().into())
    }

    /// The field value, or `None` when the field is absent. Unlike
    /// [`get`](Example::get) this distinguishes a missing field from an
    /// empty one.
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

    pub fn input_keys(&self) -> &[String] {
        &self.input_keys
    }

    pub fn output_keys(&self) -> &[String] {
        &self.output_keys
    }

    /// Re-designates the input fields, returning a new example. Every field
    /// not named in `keys` becomes an output field.
    pub fn with_inputs(&self, keys: Vec<String>) -> Self {
        let output_keys = self
            .data
            .keys()
            .filter(|key| !keys.contains(key))
            .cloned()
            .collect();

        Self {
            data: self.data.clone(),
            input_keys: keys,
            output_keys,
        }
    }

    /// A new example restricted to the input fields. This is what gets fed
    /// to a program; the labels stay behind for the metric.
    pub fn inputs(&self) -> Self {
        Self {
            data: self
                .data
                .iter()
                .filter(|(key, _)| self.input_keys.contains(key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            input_keys: self.input_keys.clone(),
            output_keys: vec![],
        }
    }

    /// A new example restricted to the output (label) fields.
    pub fn labels(&self) -> Self {
        Self {
            data: self
                .data
                .iter()
                .filter(|(key, _)| self.output_keys.contains(key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            input_keys: vec![],
            output_keys: self.output_keys.clone(),
        }
    }

    pub fn without(&self, keys: Vec<String>) -> Self {
        Self {
            data: self
                .data
                .iter()
                .filter(|(key, _)| !keys.contains(key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            input_keys: self
                .input_keys
                .iter()
                .filter(|key| !keys.contains(key))
                .cloned()
                .collect(),
            output_keys: self
                .output_keys
                .iter()
                .filter(|key| !keys.contains(key))
                .cloned()
                .collect(),
        }
    }

    /// `true` when every designated output field is present, i.e. the
    /// example carries its labels.
    pub fn is_complete(&self) -> bool {
        self.output_keys.iter().all(|key| self.data.contains_key(key))
    }
}

impl PartialEq for Example {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Example {}

impl Hash for Example {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Map equality ignores insertion order, so hashing must too: digest
        // the pairs sorted by key. Value has no Hash impl; hash its JSON
        // rendering instead.
        let mut pairs: Vec<(&String, String)> = self
            .data
            .iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        pairs.sort();
        for (key, value) in pairs {
            key.hash(state);
            value.hash(state);
        }
    }
}
