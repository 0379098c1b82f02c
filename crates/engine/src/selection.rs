//! Transient cart of chosen catalog item ids.
//!
//! Pure set semantics with stable insertion order - the composed order
//! message itemizes lines in selection order, so a `Vec` with a membership
//! check, not a hash set. Never persisted; rebuilt each session, optionally
//! seeded from an accepted recurring-order suggestion.

use mearim_core::ProductId;

/// The current product selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<ProductId>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Adds or removes `id` from the selection.
    ///
    /// Adding an already-selected id or removing an unselected one is a
    /// no-op; ids are trusted to belong to the current catalog.
    pub fn toggle(&mut self, id: &ProductId, included: bool) {
        if included {
            if !self.contains(id) {
                self.ids.push(id.clone());
            }
        } else {
            self.ids.retain(|existing| existing != id);
        }
    }

    /// Adds every id in `ids` that is not already selected, in order.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = ProductId>) {
        for id in ids {
            self.toggle(&id, true);
        }
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    /// Number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_preserves_insertion_order() {
        let mut selection = SelectionSet::new();
        selection.toggle(&ProductId::new("b"), true);
        selection.toggle(&ProductId::new("a"), true);
        selection.toggle(&ProductId::new("c"), true);

        let ids: Vec<_> = selection.ids().iter().map(ProductId::as_str).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_toggle_deduplicates() {
        let mut selection = SelectionSet::new();
        selection.toggle(&ProductId::new("a"), true);
        selection.toggle(&ProductId::new("a"), true);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle_off_and_clear() {
        let mut selection = SelectionSet::new();
        selection.toggle(&ProductId::new("a"), true);
        selection.toggle(&ProductId::new("b"), true);

        selection.toggle(&ProductId::new("a"), false);
        assert!(!selection.contains(&ProductId::new("a")));
        assert_eq!(selection.len(), 1);

        // Removing an unselected id is a no-op.
        selection.toggle(&ProductId::new("zzz"), false);
        assert_eq!(selection.len(), 1);

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_extend_skips_already_selected() {
        let mut selection = SelectionSet::new();
        selection.toggle(&ProductId::new("a"), true);
        selection.extend([ProductId::new("a"), ProductId::new("b")]);

        let ids: Vec<_> = selection.ids().iter().map(ProductId::as_str).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
