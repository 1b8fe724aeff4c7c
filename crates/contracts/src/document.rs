//! InputDocument - serialized input of the WorkItem Source
//!
//! Only `nodes[]` feeds the dispatcher; the remaining fields are decorative
//! and tolerated when present or absent.

use serde::{Deserialize, Serialize};

use crate::{Batch, WorkItem};

/// Root document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDocument {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub page: Option<i64>,

    #[serde(default)]
    pub is_non_profit: Option<bool>,

    #[serde(default)]
    pub address: Option<Address>,

    /// Call targets; missing or `null` means no work
    #[serde(default)]
    pub nodes: Option<Vec<Node>>,
}

/// Postal address (decorative)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// One call target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub url: String,
}

impl From<Node> for WorkItem {
    fn from(node: Node) -> Self {
        WorkItem::new(node.name, node.url)
    }
}

impl InputDocument {
    /// Number of call targets
    pub fn node_count(&self) -> usize {
        self.nodes.as_ref().map_or(0, Vec::len)
    }

    /// Convert the nodes into a batch, preserving document order
    pub fn into_batch(self) -> Batch {
        self.nodes
            .unwrap_or_default()
            .into_iter()
            .map(WorkItem::from)
            .collect()
    }
}
