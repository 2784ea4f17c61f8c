//! Per-type table of registered indices.

use std::collections::{BTreeMap, HashMap};

use crate::error::{IndexError, IndexResult};
use crate::index::{Index, Indexable};

/// Every index registered for every record type.
///
/// Indices are keyed by record type name, then by indexed field.
#[derive(Clone, Debug, Default)]
pub struct IndexRegistry {
    by_type: HashMap<String, BTreeMap<String, Index>>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an index over `field` of `datatype` records.
    ///
    /// Returns `false` (and keeps the existing entries) if that index was
    /// already registered.
    pub fn register(&mut self, datatype: &str, field: &str) -> bool {
        let indices = self.by_type.entry(datatype.to_string()).or_default();
        if indices.contains_key(field) {
            return false;
        }
        indices.insert(field.to_string(), Index::new(datatype, field));
        true
    }

    /// Look up an index by bare field name (`"title"`) or by its full
    /// identity (`"Book.title"`).
    pub fn get(&self, datatype: &str, name: &str) -> IndexResult<&Index> {
        let field = name
            .strip_prefix(datatype)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name);
        self.by_type
            .get(datatype)
            .and_then(|indices| indices.get(field))
            .ok_or_else(|| IndexError::UnknownIndex {
                datatype: datatype.to_string(),
                name: name.to_string(),
            })
    }

    /// Indices registered for `datatype`, ordered by field.
    pub fn indices(&self, datatype: &str) -> impl Iterator<Item = &Index> {
        self.by_type.get(datatype).into_iter().flat_map(|m| m.values())
    }

    /// Add `record` to every index registered for its type. Returns how many
    /// of them stored it.
    ///
    /// The record is checked before any index is touched, so a failure leaves
    /// every index unchanged.
    pub fn add_record(&mut self, record: &impl Indexable) -> IndexResult<usize> {
        let Some(indices) = self.by_type.get_mut(record.type_name()) else {
            return Ok(0);
        };
        if record.canonical_hash().is_none() {
            return Err(IndexError::NotPersisted(record.type_name().to_string()));
        }
        let mut stored = 0;
        for index in indices.values_mut() {
            if index.add(record)? {
                stored += 1;
            }
        }
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arec_types::ItemHash;
    use serde_json::{json, Value};

    struct Doc(Value);

    impl Indexable for Doc {
        fn type_name(&self) -> &str {
            "Book"
        }

        fn canonical_hash(&self) -> Option<ItemHash> {
            Some(ItemHash::from_hash([1; 32]))
        }

        fn field_value(&self, field: &str) -> Option<Value> {
            self.0.get(field).cloned()
        }
    }

    #[test]
    fn register_is_idempotent() {
        let mut reg = IndexRegistry::new();
        assert!(reg.register("Book", "title"));
        reg.add_record(&Doc(json!({"title": "Dune"}))).unwrap();
        assert!(!reg.register("Book", "title"));
        assert_eq!(reg.get("Book", "title").unwrap().len(), 1);
    }

    #[test]
    fn get_by_field_or_identity() {
        let mut reg = IndexRegistry::new();
        reg.register("Book", "title");
        assert_eq!(reg.get("Book", "title").unwrap().name(), "Book.title");
        assert_eq!(reg.get("Book", "Book.title").unwrap().name(), "Book.title");
    }

    #[test]
    fn unknown_index() {
        let mut reg = IndexRegistry::new();
        reg.register("Book", "title");
        let err = reg.get("Book", "isbn").unwrap_err();
        assert_eq!(
            err,
            IndexError::UnknownIndex {
                datatype: "Book".into(),
                name: "isbn".into()
            }
        );
        assert!(reg.get("Author", "title").is_err());
    }

    #[test]
    fn add_record_fills_every_index_of_its_type() {
        let mut reg = IndexRegistry::new();
        reg.register("Book", "title");
        reg.register("Book", "year");
        reg.register("Author", "name");

        let added = reg
            .add_record(&Doc(json!({"title": "Dune", "year": 1965})))
            .unwrap();
        assert_eq!(added, 2);
        assert!(reg.get("Book", "year").unwrap().get("1965").is_some());
        assert!(reg.get("Author", "name").unwrap().is_empty());
        assert_eq!(reg.indices("Book").count(), 2);
    }

    #[test]
    fn add_record_without_indices() {
        let mut reg = IndexRegistry::new();
        assert_eq!(reg.add_record(&Doc(json!({}))).unwrap(), 0);
    }

    #[test]
    fn record_without_a_key_skips_only_that_index() {
        let mut reg = IndexRegistry::new();
        reg.register("Book", "title");
        reg.register("Book", "year");

        let added = reg.add_record(&Doc(json!({"title": "Dune", "year": null}))).unwrap();
        assert_eq!(added, 1);
        assert!(reg.get("Book", "title").unwrap().get("Dune").is_some());
        assert!(reg.get("Book", "year").unwrap().is_empty());
    }
}
