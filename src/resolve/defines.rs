use crate::error::RollError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*[=:]\s*(.*?)\s*$").unwrap());

/// Named replacement text, looked up by whole words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinesTable {
    entries: BTreeMap<String, String>,
}

impl DefinesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        log::debug!("define {} = {:?}", name, value);
        self.entries.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Reads `name = value` (or `name: value`) pairs separated by `;` or newlines.
    /// Values may hold commas, as selector lists do.
    /// Returns how many were stored. Nothing is stored if any pair is malformed.
    pub fn parse_assignments(&mut self, body: &str) -> Result<usize, RollError> {
        let mut pairs = Vec::new();
        for part in body.split(|c: char| matches!(c, ';' | '\n')) {
            if part.trim().is_empty() {
                continue;
            }
            let caps = ASSIGNMENT.captures(part).ok_or_else(|| {
                RollError::descriptive(format!("{:?} is not of the form name = value", part.trim()))
            })?;
            pairs.push((caps[1].to_string(), caps[2].to_string()));
        }
        let stored = pairs.len();
        self.extend(pairs);
        Ok(stored)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DefinesTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for DefinesTable {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
