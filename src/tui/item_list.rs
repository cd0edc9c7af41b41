use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;

use crate::item::{Item, ResultView, empty_view};

/// Cursor row and scroll offset over the current result list.
///
/// Rows are result indices: row 0 is the best match, wherever the layout draws it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Result index under the cursor
    pub cy: usize,
    /// Result index drawn on the first list row
    pub offset: usize,
    /// Whether the list grows downward from the top of the screen
    pub reverse: bool,
    /// Whether moving past either end wraps around
    pub cycle: bool,
}

impl Viewport {
    /// Creates a viewport at row 0
    pub fn new(reverse: bool, cycle: bool) -> Self {
        Self {
            reverse,
            cycle,
            ..Default::default()
        }
    }

    /// Brings `cy` and `offset` back in bounds for `count` results shown `height` at a time.
    ///
    /// After this, `offset <= cy < offset + height` and `cy < count` (both 0 for an empty list).
    pub fn constrain(&mut self, count: usize, height: usize) {
        let height = height.max(1);
        if count == 0 {
            self.cy = 0;
            self.offset = 0;
            return;
        }
        let row = self.cy as isize - self.offset as isize;

        self.cy = self.cy.min(count - 1);
        if self.cy > self.offset + (height - 1) {
            // Ceil
            self.offset = self.cy + 1 - height;
        } else if self.offset > self.cy {
            // Floor
            self.offset = self.cy;
        }

        // The list shrank below the window
        if count - self.offset < height {
            self.offset = count.saturating_sub(height);
            self.cy = (self.offset as isize + row).clamp(self.offset as isize, count as isize - 1) as usize;
        }
    }

    /// Moves the cursor by `delta` rows, upward on screen in the default layout
    pub fn vmove(&mut self, delta: isize, count: usize) {
        let delta = if self.reverse { -delta } else { delta };
        let mut dest = self.cy as isize + delta;
        if self.cycle && count > 0 {
            let max = count as isize - 1;
            if dest > max && self.cy as isize == max {
                dest = 0;
            } else if dest < 0 && self.cy == 0 {
                dest = max;
            }
        }
        self.vset(dest, count);
    }

    /// Puts the cursor on row `pos`, clamped to the list.
    ///
    /// Returns whether `pos` was in bounds.
    pub fn vset(&mut self, pos: isize, count: usize) -> bool {
        let max = count.saturating_sub(1) as isize;
        let clamped = pos.clamp(0, max);
        self.cy = clamped as usize;
        clamped == pos
    }
}

/// A selected item, as captured when it was selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// When the item was selected
    pub at: Instant,
    /// Item text at selection time
    pub text: String,
}

/// Multi-selection, keyed by item identity so it outlives result snapshots
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    selected: IndexMap<usize, Selection>,
}

impl SelectionSet {
    /// Adds `item`, returning false if it was already selected
    pub fn select(&mut self, item: &Item) -> bool {
        if self.selected.contains_key(&item.id) {
            return false;
        }
        self.selected.insert(
            item.id,
            Selection {
                at: Instant::now(),
                text: item.text.clone(),
            },
        );
        true
    }

    /// Removes the item with identity `id`, returning whether it was selected
    pub fn deselect(&mut self, id: usize) -> bool {
        self.selected.shift_remove(&id).is_some()
    }

    /// Selects `item`, or deselects it when it already is
    pub fn toggle(&mut self, item: &Item) {
        if !self.select(item) {
            self.deselect(item.id);
        }
    }

    /// Whether the item with identity `id` is selected
    pub fn contains(&self, id: usize) -> bool {
        self.selected.contains_key(&id)
    }

    /// Number of selected items
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected texts, oldest selection first
    pub fn texts_by_time(&self) -> Vec<String> {
        let mut selections: Vec<&Selection> = self.selected.values().collect();
        selections.sort_by_key(|sel| sel.at);
        selections.into_iter().map(|sel| sel.text.clone()).collect()
    }
}

/// Current results together with the cursor and the selection over them
pub struct ItemList {
    results: Arc<dyn ResultView>,
    /// Cursor and scroll position
    pub viewport: Viewport,
    /// Selected items
    pub selection: SelectionSet,
}

impl ItemList {
    /// Empty list with the given viewport
    pub fn new(viewport: Viewport) -> Self {
        Self {
            results: empty_view(),
            viewport,
            selection: SelectionSet::default(),
        }
    }

    /// Swaps in a new snapshot; the selection is kept as is
    pub fn set_results(&mut self, results: Arc<dyn ResultView>) {
        self.results = results;
    }

    /// Current result snapshot
    pub fn results(&self) -> &dyn ResultView {
        self.results.as_ref()
    }

    /// Number of results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether there are no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result at `index`
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.results.get(index)
    }

    /// Item under the cursor
    pub fn current(&self) -> Option<&Item> {
        self.results.get(self.viewport.cy)
    }

    /// Toggles the item under the cursor, returning whether there was one
    pub fn toggle_current(&mut self) -> bool {
        match self.results.get(self.viewport.cy) {
            Some(item) => {
                self.selection.toggle(item);
                true
            }
            None => false,
        }
    }

    /// Selects every result
    pub fn select_all(&mut self) {
        for idx in 0..self.results.len() {
            if let Some(item) = self.results.get(idx) {
                self.selection.select(item);
            }
        }
    }

    /// Deselects every result
    pub fn deselect_all(&mut self) {
        for idx in 0..self.results.len() {
            if let Some(item) = self.results.get(idx) {
                self.selection.deselect(item.id);
            }
        }
    }

    /// Toggles every result
    pub fn toggle_all(&mut self) {
        for idx in 0..self.results.len() {
            if let Some(item) = self.results.get(idx) {
                self.selection.toggle(item);
            }
        }
    }

    /// Moves the cursor by `delta` items
    pub fn vmove(&mut self, delta: isize) {
        let count = self.results.len();
        self.viewport.vmove(delta, count);
    }

    /// Moves the cursor to `pos`, returning whether it changed
    pub fn vset(&mut self, pos: isize) -> bool {
        let count = self.results.len();
        self.viewport.vset(pos, count)
    }

    /// Keeps the cursor visible in `height` rows
    pub fn constrain(&mut self, height: usize) {
        let count = self.results.len();
        self.viewport.constrain(count, height);
    }
}
