//! Named values sent alongside a drawing so the analysis can resolve
//! variables assigned in earlier submissions.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest accepted variable name, in characters.
pub const MAX_VARIABLE_NAME_LEN: usize = 64;

/// Ordered mapping of variable name to value.
///
/// Deserializes from either a JSON object or a string holding a JSON object,
/// since browser clients commonly send the mapping pre-stringified.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableContext(BTreeMap<String, Value>);

impl VariableContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` can be sent as a variable: 1-64 characters, each
    /// alphanumeric (any script) or `_`.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name.chars().count() <= MAX_VARIABLE_NAME_LEN
            && name.chars().all(|c| c.is_alphanumeric() || c == '_')
    }

    /// Assign `value` to `name`, replacing any previous value.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Remove every variable.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Compact JSON object text, e.g. `{"x":5}`.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

impl FromIterator<(String, Value)> for VariableContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for VariableContext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ContextVisitor)
    }
}

struct ContextVisitor;

impl<'de> Visitor<'de> for ContextVisitor {
    type Value = VariableContext;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of variable names to values, or a JSON string of one")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut vars = BTreeMap::new();
        while let Some((name, value)) = map.next_entry::<String, Value>()? {
            vars.insert(name, value);
        }
        Ok(VariableContext(vars))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            return Ok(VariableContext::new());
        }
        serde_json::from_str::<BTreeMap<String, Value>>(v)
            .map(VariableContext)
            .map_err(|e| E::custom(format!("variables string is not a JSON object: {e}")))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(VariableContext::new())
    }
}
