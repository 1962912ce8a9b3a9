//! Short-key ⇄ label dictionary.
//!
//! Module content is stored under short keys (`p_n`); the human readable
//! projection shows labels (`Project Name`). Keys without an entry pass
//! through verbatim in both directions.

mod provider;

pub use provider::{BuiltinKeyMapping, JsonFileKeyMapping, KeyMappingProvider};

use crate::schema;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMapping {
    labels: BTreeMap<String, String>,
    reverse: BTreeMap<String, String>,
}

impl KeyMapping {
    pub fn new(labels: BTreeMap<String, String>) -> Self {
        let mut reverse = BTreeMap::new();
        for (key, label) in &labels {
            reverse.entry(label.clone()).or_insert_with(|| key.clone());
        }
        Self { labels, reverse }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Labels for every key declared by the builtin schema templates.
    pub fn builtin() -> Self {
        Self::new(
            schema::builtin_labels()
                .into_iter()
                .map(|(key, label)| (key.to_string(), label.to_string()))
                .collect(),
        )
    }

    /// Entries from `overrides` replace or extend this mapping.
    pub fn merged(self, overrides: KeyMapping) -> Self {
        let mut labels = self.labels;
        labels.extend(overrides.labels);
        Self::new(labels)
    }

    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn short_key<'a>(&'a self, label: &'a str) -> &'a str {
        self.reverse.get(label).map(String::as_str).unwrap_or(label)
    }

    /// Resolve a user-supplied name to a short key. Accepts the short key
    /// itself, its label, or the label in snake case (`project_name`).
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.labels.get_key_value(name) {
            return Some(key.as_str());
        }
        if let Some(key) = self.reverse.get(name) {
            return Some(key.as_str());
        }
        self.labels
            .iter()
            .find(|(_, label)| snake_case(label) == name)
            .map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.labels.iter()
    }
}

impl From<BTreeMap<String, String>> for KeyMapping {
    fn from(labels: BTreeMap<String, String>) -> Self {
        Self::new(labels)
    }
}

fn snake_case(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
