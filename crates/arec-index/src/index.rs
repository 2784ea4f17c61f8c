//! The [`Index`] structure.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use arec_types::ItemHash;
use serde_json::Value;
use tracing::debug;

use crate::error::{IndexError, IndexResult};

/// What a record exposes so an [`Index`] can hold it.
pub trait Indexable {
    /// Name of the record's type, as used for the post type tag.
    fn type_name(&self) -> &str;

    /// The record's canonical hash, once posted.
    fn canonical_hash(&self) -> Option<ItemHash>;

    /// The content value of `field`, if the record has one.
    fn field_value(&self, field: &str) -> Option<Value>;
}

/// Turn a content value into an index key.
///
/// Strings are used verbatim; numbers and booleans by their JSON text.
/// `null` has no key. Arrays and objects key by their compact JSON.
pub fn key_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Single-field lookup from a content value to a canonical record hash.
///
/// Keys are unique; adding a record whose key is already present replaces
/// the earlier hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Index {
    datatype: String,
    field: String,
    entries: BTreeMap<String, ItemHash>,
}

impl Index {
    /// Create an empty index over `field` of `datatype` records.
    pub fn new(datatype: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            datatype: datatype.into(),
            field: field.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Registry identity: `"{Datatype}.{field}"`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.datatype, self.field)
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<ItemHash> {
        self.entries.get(key).copied()
    }

    /// Record `record`'s canonical hash under its value of the indexed field.
    ///
    /// A record with a missing or `null` value has no key and is left out;
    /// `Ok(false)` reports that nothing was stored.
    pub fn add(&mut self, record: &impl Indexable) -> IndexResult<bool> {
        if record.type_name() != self.datatype {
            return Err(IndexError::TypeMismatch {
                index: self.name(),
                actual: record.type_name().to_string(),
            });
        }
        let hash = record
            .canonical_hash()
            .ok_or_else(|| IndexError::NotPersisted(self.datatype.clone()))?;
        let Some(key) = record.field_value(&self.field).as_ref().and_then(key_from_value) else {
            debug!(index = %self.name(), item_hash = %hash.short_hex(), "no key, record not indexed");
            return Ok(false);
        };

        debug!(index = %self.name(), key = %key, item_hash = %hash.short_hex(), "index entry added");
        self.entries.insert(key, hash);
        Ok(true)
    }

    /// Canonical hashes for `keys`, deduplicated and sorted.
    ///
    /// `None` selects every indexed record. Any absent key fails the whole
    /// lookup.
    pub fn resolve(&self, keys: Option<&[String]>) -> IndexResult<Vec<ItemHash>> {
        let hashes: BTreeSet<ItemHash> = match keys {
            None => self.entries.values().copied().collect(),
            Some(keys) => keys
                .iter()
                .map(|key| {
                    self.get(key).ok_or_else(|| IndexError::KeyNotFound {
                        index: self.name(),
                        key: key.clone(),
                    })
                })
                .collect::<IndexResult<_>>()?,
        };
        Ok(hashes.into_iter().collect())
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({}.{})", self.datatype, self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Doc {
        kind: &'static str,
        hash: Option<ItemHash>,
        content: Value,
    }

    impl Indexable for Doc {
        fn type_name(&self) -> &str {
            self.kind
        }

        fn canonical_hash(&self) -> Option<ItemHash> {
            self.hash
        }

        fn field_value(&self, field: &str) -> Option<Value> {
            self.content.get(field).cloned()
        }
    }

    fn doc(n: u8, content: Value) -> Doc {
        Doc {
            kind: "Book",
            hash: Some(ItemHash::from_hash([n; 32])),
            content,
        }
    }

    #[test]
    fn name_and_display() {
        let idx = Index::new("Book", "title");
        assert_eq!(idx.name(), "Book.title");
        assert_eq!(idx.to_string(), "Index(Book.title)");
        assert!(idx.is_empty());
    }

    #[test]
    fn add_then_get() {
        let mut idx = Index::new("Book", "title");
        idx.add(&doc(1, json!({"title": "Dune"}))).unwrap();
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.get("Dune"), Some(ItemHash::from_hash([1; 32])));
    }

    #[test]
    fn numeric_keys_use_json_text() {
        let mut idx = Index::new("Book", "year");
        idx.add(&doc(1, json!({"year": 1965}))).unwrap();
        assert!(idx.get("1965").is_some());
    }

    #[test]
    fn last_writer_wins() {
        let mut idx = Index::new("Book", "title");
        idx.add(&doc(1, json!({"title": "Dune"}))).unwrap();
        idx.add(&doc(2, json!({"title": "Dune"}))).unwrap();
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.get("Dune"), Some(ItemHash::from_hash([2; 32])));
    }

    #[test]
    fn add_rejects_other_type() {
        let mut idx = Index::new("Author", "name");
        let err = idx.add(&doc(1, json!({"name": "Herbert"}))).unwrap_err();
        assert!(matches!(err, IndexError::TypeMismatch { .. }));
    }

    #[test]
    fn add_rejects_unposted_record() {
        let mut idx = Index::new("Book", "title");
        let mut d = doc(1, json!({"title": "Dune"}));
        d.hash = None;
        assert!(matches!(idx.add(&d), Err(IndexError::NotPersisted(_))));
    }

    #[test]
    fn missing_or_null_field_is_skipped() {
        let mut idx = Index::new("Book", "title");
        assert!(!idx.add(&doc(1, json!({"year": 1965}))).unwrap());
        assert!(!idx.add(&doc(2, json!({"title": null}))).unwrap());
        assert!(idx.is_empty());
        assert!(idx.add(&doc(3, json!({"title": "Dune"}))).unwrap());
    }

    #[test]
    fn resolve_dedups_and_ignores_order() {
        let mut idx = Index::new("Book", "title");
        idx.add(&doc(1, json!({"title": "x"}))).unwrap();
        idx.add(&doc(2, json!({"title": "y"}))).unwrap();

        let forward = idx.resolve(Some(&["x".into(), "y".into()])).unwrap();
        let backward = idx.resolve(Some(&["y".into(), "x".into(), "y".into()])).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn resolve_all() {
        let mut idx = Index::new("Book", "title");
        idx.add(&doc(1, json!({"title": "x"}))).unwrap();
        idx.add(&doc(1, json!({"title": "x-renamed"}))).unwrap();
        assert_eq!(idx.resolve(None).unwrap(), vec![ItemHash::from_hash([1; 32])]);
    }

    #[test]
    fn resolve_missing_key() {
        let mut idx = Index::new("Book", "title");
        idx.add(&doc(1, json!({"title": "x"}))).unwrap();
        let err = idx.resolve(Some(&["x".into(), "z".into()])).unwrap_err();
        assert_eq!(
            err,
            IndexError::KeyNotFound {
                index: "Book.title".into(),
                key: "z".into()
            }
        );
    }
}
