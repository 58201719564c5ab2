//! Hierarchical project documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A node of a project/schema description.
///
/// Scalar data lives in `properties`; nested nodes are grouped by collection
/// name in `children` (e.g. `"schemas"`, `"tables"`). Both maps are ordered,
/// which keeps every encoding of a document canonical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Vec<Document>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with_property("name", name.into())
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, collection: impl Into<String>, child: Document) -> Self {
        self.children
            .entry(collection.into())
            .or_default()
            .push(child);
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.property("name").and_then(|v| v.as_str())
    }

    pub fn children(&self, collection: &str) -> &[Document] {
        self.children
            .get(collection)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .values()
            .flatten()
            .map(Document::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_and_lookup() {
        let doc = Document::named("inventory")
            .with_property("enabled", true)
            .with_child(
                "schemas",
                Document::named("public").with_child("tables", Document::named("item")),
            )
            .with_child("schemas", Document::named("audit"));

        assert_eq!(doc.name(), Some("inventory"));
        assert_eq!(doc.property("enabled"), Some(&json!(true)));
        assert_eq!(doc.children("schemas").len(), 2);
        assert_eq!(doc.children("schemas")[0].children("tables")[0].name(), Some("item"));
        assert!(doc.children("missing").is_empty());
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn test_empty_maps_are_omitted() {
        let value = serde_json::to_value(Document::named("x")).unwrap();
        assert_eq!(value, json!({"properties": {"name": "x"}}));

        let back: Document = serde_json::from_value(json!({})).unwrap();
        assert_eq!(back, Document::new());
    }
}
