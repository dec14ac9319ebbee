use std::any::Any;
use std::collections::hash_map::{HashMap, Keys};
use std::fmt;

use crate::decoder::Value;
use crate::extractor::ROUTE_KEY;

/// Named values extracted from the metadata of one payload.
#[derive(Default)]
pub struct MetadataMap {
    inner: HashMap<String, Value>,
}

impl MetadataMap {
    pub fn new() -> MetadataMap {
        MetadataMap::default()
    }

    /// Inserts a value, returning the one previously stored under `key`.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Any + Send + Sync,
    {
        self.inner.insert(key.into(), Box::new(value))
    }

    pub fn insert_boxed<K>(&mut self, key: K, value: Value) -> Option<Value>
    where
        K: Into<String>,
    {
        self.inner.insert(key.into(), value)
    }

    /// Returns the value under `key` if it exists and has type `T`.
    pub fn get<T>(&self, key: &str) -> Option<&T>
    where
        T: Any,
    {
        self.inner.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get::<String>(key).map(String::as_str)
    }

    /// The extracted route, stored under [`ROUTE_KEY`].
    pub fn route(&self) -> Option<&str> {
        self.get_str(ROUTE_KEY)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.inner.keys()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for MetadataMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for (k, v) in self.inner.iter() {
            match v.downcast_ref::<String>() {
                Some(s) => m.entry(k, s),
                None => m.entry(k, &"..."),
            };
        }
        m.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let mut m = MetadataMap::new();
        assert!(m.is_empty());
        m.insert(ROUTE_KEY, String::from("toA"));
        m.insert("count", 3u32);
        assert_eq!(Some("toA"), m.route());
        assert_eq!(Some(&3u32), m.get::<u32>("count"));
        assert_eq!(None, m.get::<String>("count"));
        assert_eq!(None, m.get_str("missing"));

        let prev = m.insert("count", 4u32).unwrap();
        assert_eq!(Some(&3u32), prev.downcast_ref::<u32>());
        assert_eq!(2, m.len());
        assert!(m.remove("count").is_some());
        assert!(!m.contains_key("count"));
        assert_eq!(vec![ROUTE_KEY], m.keys().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn debug_format() {
        let mut m = MetadataMap::new();
        m.insert("a", String::from("b"));
        assert_eq!(r#"{"a": "b"}"#, format!("{:?}", m));
    }
}
