use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label set attached to a metric sample.
///
/// Backed by a [`BTreeMap`] so that two label sets with the same pairs compare
/// and iterate identically regardless of insertion order.
#[derive(Default, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(pub BTreeMap<String, String>);

impl Labels {
    /// Create an empty label set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns `true` if no labels are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert or overwrite a label.
    ///
    /// Returns `self` for chaining.
    pub fn insert<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), val.into());
        self
    }

    /// Owned builder variant of [`Labels::insert`].
    pub fn with<K, V>(mut self, key: K, val: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), val.into());
        self
    }

    /// Get the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// Iterate through all labels as `(&str, &str)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Project the label set onto an ordered list of label names.
    ///
    /// Missing labels are reported as the empty string, which is how the
    /// exposition format treats an absent label.
    pub fn values_for<'a>(&'a self, names: &[&str]) -> Vec<&'a str> {
        names.iter().map(|n| self.get(n).unwrap_or("")).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Labels
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
