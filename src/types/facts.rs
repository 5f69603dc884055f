use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value::FactValue;

/// The facts a condition is evaluated against: one value per field name.
///
/// Deserializes straight from a flat JSON object of metrics, so a stats
/// snapshot can be fed in without reshaping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet {
    facts: HashMap<String, FactValue>,
}

impl FactSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fact, replacing any previous value for the name.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.facts.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<FactValue> {
        self.facts.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FactValue)> {
        self.facts.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<K: Into<String>, V: Into<FactValue>> FromIterator<(K, V)> for FactSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            facts: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
