//! Immutable name sets used for include/exclude lists.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// An immutable set of metric names or name patterns.
///
/// Cloning is cheap: clones share the same backing storage, so one set can be
/// handed to any number of filters and threads. There is no way to mutate a
/// `NameSet` after it has been built.
///
/// A `null` or missing value in configuration deserializes to the empty set.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NameSet {
    names: Arc<HashSet<String>>,
}

impl NameSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is an element of the set. Case-sensitive, no trimming.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Iterate over the elements in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Elements in lexical order, for stable output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: Arc::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<Vec<&str>> for NameSet {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().collect()
    }
}

impl From<Vec<String>> for NameSet {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<HashSet<String>> for NameSet {
    fn from(names: HashSet<String>) -> Self {
        Self {
            names: Arc::new(names),
        }
    }
}

impl fmt::Debug for NameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.sorted()).finish()
    }
}

impl Serialize for NameSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted())
    }
}

impl<'de> Deserialize<'de> for NameSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names: Option<Vec<String>> = Option::deserialize(deserializer)?;
        Ok(names.map(NameSet::from).unwrap_or_default())
    }
}
