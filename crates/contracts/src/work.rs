//! WorkItem / Batch - WorkItem Source output
//!
//! A `Batch` is built once per dispatch and discarded afterwards.

use serde::{Deserialize, Serialize};

/// One independent unit of work
///
/// Immutable once produced: the dispatcher reads `target` to run the call
/// and `label` for status lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    label: String,
    target: String,
}

impl WorkItem {
    /// Create a new work item
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }

    /// Human-readable label (used for logging)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Call target (e.g. a URL)
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Ordered sequence of work items processed by one dispatch
///
/// An empty batch is valid and means "no work".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    items: Vec<WorkItem>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there is nothing to dispatch
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in submission order
    pub fn iter(&self) -> std::slice::Iter<'_, WorkItem> {
        self.items.iter()
    }

    /// Item labels in submission order
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(WorkItem::label).collect()
    }

    /// Consume the batch, yielding its items
    pub fn into_items(self) -> Vec<WorkItem> {
        self.items
    }
}

impl From<Vec<WorkItem>> for Batch {
    fn from(items: Vec<WorkItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<WorkItem> for Batch {
    fn from_iter<I: IntoIterator<Item = WorkItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Batch {
    type Item = WorkItem;
    type IntoIter = std::vec::IntoIter<WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a WorkItem;
    type IntoIter = std::slice::Iter<'a, WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
