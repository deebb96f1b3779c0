//! Node extraction: raw store nodes -> compact [`GraphNode`] records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EdgeTable;
use crate::store::RawNode;

/// A compact knowledge-base node: identifier, optional name and description,
/// and the values of the configured edge properties.
///
/// Immutable once extracted, apart from two downstream augmentations: the
/// hop engine sets `root` when the node matches a frontier entry, and the
/// merge stage sets `title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The original seed label this node traces back to. Propagated
    /// unchanged from the matched frontier entry, never re-derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Resolved page title, set by the merge stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Edge values keyed by property id, e.g. `"P31": ["Q2095"]`. Absent
    /// properties are simply not stored.
    #[serde(flatten)]
    pub edges: BTreeMap<String, Vec<String>>,
}

impl GraphNode {
    /// Values of one edge property; empty when the property is absent.
    pub fn edge(&self, property_id: &str) -> &[String] {
        self.edges.get(property_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether this node links to `target_id` via the given property.
    pub fn connects(&self, property_id: &str, target_id: &str) -> bool {
        self.edge(property_id).iter().any(|value| value == target_id)
    }
}

/// Convert a raw store node into a [`GraphNode`], keeping only the values of
/// configured edge properties plus the description.
///
/// Claims arrive one per line as `tag: value`; the split happens on the
/// first colon and both sides are trimmed. Lines without a colon carry no
/// property value and are skipped. If the description tag occurs more than
/// once, the last occurrence wins. A node without a resolvable name is
/// logged and extracted anyway; one malformed node never fails a scan.
pub fn extract_node(raw: &RawNode, edges: &EdgeTable) -> GraphNode {
    let useful_ids = edges.useful_ids();

    let mut node = GraphNode {
        id: raw.id.clone(),
        name: None,
        description: None,
        root: None,
        title: None,
        edges: BTreeMap::new(),
    };

    for claim in raw.claims.lines() {
        let Some((tag, value)) = claim.split_once(':') else {
            continue;
        };
        let tag = tag.trim();
        let value = value.trim();
        if useful_ids.contains(&tag) {
            node.edges
                .entry(tag.to_string())
                .or_default()
                .push(value.to_string());
        }
        if tag == "description" {
            node.description = Some(value.to_string());
        }
    }

    match &raw.name {
        Some(name) => node.name = Some(name.clone()),
        None => log::warn!("Error getting name for node with ID {}", raw.id),
    }

    node
}
