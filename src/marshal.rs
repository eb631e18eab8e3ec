//! Witness input marshaling.
//!
//! The engine takes its witness as a single JSON object mapping signal
//! names to string-encoded field elements. Array values are flattened by the
//! engine into `name[i]` signals, so they are accepted here as well.

use crate::error::{BindingError, BindingResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::CString;

/// Value of one input signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WitnessValue {
    /// Decimal (or otherwise engine-parsable) literal.
    Scalar(String),
    /// Signal array, possibly nested.
    Array(Vec<WitnessValue>),
}

impl From<&str> for WitnessValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for WitnessValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<u64> for WitnessValue {
    fn from(value: u64) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl<T: Into<WitnessValue>> From<Vec<T>> for WitnessValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Named signal assignments fed to `prove`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessInputs(BTreeMap<String, WitnessValue>);

impl WitnessInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a signal, replacing any previous value.
    pub fn insert(&mut self, signal: impl Into<String>, value: impl Into<WitnessValue>) {
        self.0.insert(signal.into(), value.into());
    }

    /// Builder form of [`Self::insert`].
    pub fn with(mut self, signal: impl Into<String>, value: impl Into<WitnessValue>) -> Self {
        self.insert(signal, value);
        self
    }

    pub fn get(&self, signal: &str) -> Option<&WitnessValue> {
        self.0.get(signal)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for WitnessInputs
where
    K: Into<String>,
    V: Into<WitnessValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut inputs = Self::new();
        for (signal, value) in iter {
            inputs.insert(signal, value);
        }
        inputs
    }
}

/// Serialize witness inputs to the engine's JSON object string.
///
/// Fails before any engine call if the value cannot be serialized or is not
/// a JSON object. NUL bytes inside strings are escaped as `\u0000`, so the
/// payload is always a valid C string.
pub fn inputs_json<T>(inputs: &T) -> BindingResult<CString>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(inputs).map_err(|e| BindingError::Marshal(e.to_string()))?;
    if !value.is_object() {
        return Err(BindingError::Marshal(format!(
            "witness inputs must be a JSON object, got {}",
            json_kind(&value)
        )));
    }

    let text = serde_json::to_string(&value).map_err(|e| BindingError::Marshal(e.to_string()))?;
    // Unreachable while serde_json escapes U+0000.
    CString::new(text)
        .map_err(|_| BindingError::Marshal("payload contains a nul byte".to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
