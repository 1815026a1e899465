use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// A free-form configuration section for one plugin.
///
/// Sections mirror the original INI-style layout: a flat table of keys whose
/// meaning is defined by the plugin that owns the section (e.g. the dispatch
/// plugin's `command`, `command2`, `input2`, `timeout` keys). Lookups of
/// absent keys are an expected outcome and never an error; callers decide
/// whether a missing key is fatal.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PluginSection(HashMap<String, Value>);

impl PluginSection {
    /// Iterates over the key names present in this section.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the raw value for a key, if present.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a key's value as a string.
    ///
    /// Scalar values are stringified the way an INI file would present them;
    /// arrays and tables yield `None` since they have no scalar form.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Returns a key's value as a list of strings.
    ///
    /// Accepts a native array of strings or a single comma-separated string.
    pub fn get_str_list(&self, key: &str) -> Option<Vec<String>> {
        match self.0.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(s) => {
                Some(s.split(',').map(|part| part.trim().to_string()).collect())
            }
            _ => None,
        }
    }
}
