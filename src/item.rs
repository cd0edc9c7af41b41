//! Items and result snapshots.
//!
//! The terminal never owns the ranking: a search backend hands it immutable
//! [`ResultView`] snapshots, and the terminal only swaps the reference it holds.

use std::sync::Arc;

/// One candidate line as produced by a search backend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    /// Stable identity, unique per underlying record across search rounds
    pub id: usize,
    /// Display text
    pub text: String,
    /// Match spans in char coordinates, ascending and non-overlapping
    pub offsets: Vec<(usize, usize)>,
}

impl Item {
    /// Creates an item without match offsets
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            offsets: Vec::new(),
        }
    }

    /// Attaches match offsets to the item
    pub fn with_offsets(mut self, offsets: Vec<(usize, usize)>) -> Self {
        self.offsets = offsets;
        self
    }
}

/// Ranked snapshot of the items matching one query
pub trait ResultView: Send + Sync {
    /// Number of items in the snapshot
    fn len(&self) -> usize;
    /// Item at rank `index`, if any
    fn get(&self, index: usize) -> Option<&Item>;
    /// Whether the snapshot is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vec-backed [`ResultView`]
#[derive(Debug, Clone, Default)]
pub struct MatchedItems {
    items: Vec<Item>,
}

impl MatchedItems {
    /// Wraps a ranked list of items
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Wraps the items into a shareable snapshot
    pub fn into_view(self) -> Arc<dyn ResultView> {
        Arc::new(self)
    }
}

impl From<Vec<Item>> for MatchedItems {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl ResultView for MatchedItems {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }
}

/// The empty snapshot every session starts with
pub fn empty_view() -> Arc<dyn ResultView> {
    Arc::new(MatchedItems::default())
}
