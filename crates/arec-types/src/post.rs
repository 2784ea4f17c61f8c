use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::Address;
use crate::hash::ItemHash;

/// Kind of network message acknowledged by the post network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Post,
    Forget,
    Aggregate,
    Store,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Post => "POST",
            Self::Forget => "FORGET",
            Self::Aggregate => "AGGREGATE",
            Self::Store => "STORE",
        };
        f.write_str(name)
    }
}

/// A single post as returned by the network.
///
/// A post without `reference` originates a record: its own `item_hash` is the
/// record's canonical hash. A post with `reference` amends the record whose
/// canonical hash it names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub item_hash: ItemHash,
    /// Type tag; names the record type the content belongs to.
    #[serde(rename = "type")]
    pub post_type: String,
    pub channel: String,
    pub sender: Address,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ItemHash>,
    pub content: Value,
    /// Network-assigned sequence; larger is newer.
    #[serde(default)]
    pub time: u64,
}

impl RawPost {
    /// Returns `true` if this post amends an existing record.
    pub fn is_amend(&self) -> bool {
        self.reference.is_some()
    }

    /// The canonical hash of the record this post belongs to.
    pub fn canonical_hash(&self) -> ItemHash {
        self.reference.unwrap_or(self.item_hash)
    }

    /// Top-level field names of the content, in content order.
    ///
    /// Non-object content has no fields.
    pub fn field_names(&self) -> Vec<String> {
        match &self.content {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(reference: Option<ItemHash>) -> RawPost {
        RawPost {
            item_hash: ItemHash::from_hash([1; 32]),
            post_type: "Book".into(),
            channel: "AREC_TEST".into(),
            sender: Address::from_bytes([9; 20]),
            reference,
            content: json!({"title": "Dune", "year": 1965}),
            time: 1,
        }
    }

    #[test]
    fn original_is_its_own_canonical() {
        let p = post(None);
        assert!(!p.is_amend());
        assert_eq!(p.canonical_hash(), p.item_hash);
    }

    #[test]
    fn amend_points_at_reference() {
        let canonical = ItemHash::from_hash([2; 32]);
        let p = post(Some(canonical));
        assert!(p.is_amend());
        assert_eq!(p.canonical_hash(), canonical);
    }

    #[test]
    fn field_names_of_object_content() {
        let mut names = post(None).field_names();
        names.sort();
        assert_eq!(names, vec!["title", "year"]);
    }

    #[test]
    fn field_names_of_scalar_content() {
        let mut p = post(None);
        p.content = json!(42);
        assert!(p.field_names().is_empty());
    }

    #[test]
    fn wire_names() {
        let value = serde_json::to_value(post(Some(ItemHash::from_hash([3; 32])))).unwrap();
        assert_eq!(value["type"], "Book");
        assert!(value.get("ref").is_some());
        assert!(serde_json::to_value(post(None)).unwrap().get("ref").is_none());
    }

    #[test]
    fn message_type_display_matches_wire() {
        assert_eq!(MessageType::Post.to_string(), "POST");
        assert_eq!(
            serde_json::to_string(&MessageType::Forget).unwrap(),
            "\"FORGET\""
        );
    }
}
