//! Taxonomy records as delivered by a taxonomy source
//!
//! Records may arrive flat (every node names its `parent`) or nested (children
//! inline). The generator turns either shape into an indexed snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered generation inputs keyed by field name
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// A single taxonomy node as stored by taxonomy management
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyNodeRecord {
    pub id: String,
    pub slug: String,
    pub name: String,

    /// Parent identifier for flat input; implied by nesting otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Generation inputs, only meaningful on leaves
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,

    /// Inline children for nested input
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaxonomyNodeRecord>,
}

impl TaxonomyNodeRecord {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            parent: None,
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_child(mut self, child: TaxonomyNodeRecord) -> Self {
        self.children.push(child);
        self
    }
}
