//! String-to-string maps that reject duplicate keys on insertion.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::DuplicateKey;

/// A string map model field.
///
/// Keys are validated when entries are added, not when the request is
/// marshaled: inserting a key twice fails immediately with [`DuplicateKey`].
/// Entries are kept sorted so the serialized form is deterministic.
/// Deserialization applies the same rule: an object with a repeated key is
/// rejected rather than keeping the last value.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::WireMap;
///
/// let map = WireMap::new()
///     .with_entry("epochs", "10").unwrap()
///     .with_entry("batch_size", "32").unwrap();
/// assert_eq!(map.get("epochs"), Some("10"));
///
/// assert!(map.with_entry("epochs", "20").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WireMap(BTreeMap<String, String>);

impl WireMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, failing if `key` is already present.
    pub fn try_insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DuplicateKey> {
        let key = key.into();
        if self.0.contains_key(&key) {
            return Err(DuplicateKey { key });
        }
        self.0.insert(key, value.into());
        Ok(())
    }

    /// Consuming form of [`try_insert`](WireMap::try_insert) for chaining.
    pub fn with_entry(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, DuplicateKey> {
        self.try_insert(key, value)?;
        Ok(self)
    }

    /// Builds a map from pairs, failing on the first repeated key.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, DuplicateKey>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |map, (k, v)| map.with_entry(k, v))
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'de> Deserialize<'de> for WireMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WireMapVisitor;

        impl<'de> Visitor<'de> for WireMapVisitor {
            type Value = WireMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of strings to strings")
            }

            fn visit_map<A>(self, mut access: A) -> Result<WireMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = WireMap::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    map.try_insert(key, value).map_err(de::Error::custom)?;
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(WireMapVisitor)
    }
}
