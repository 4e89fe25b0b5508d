//! Loaded batch plus the cursor the card view reads from

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::api::Catalog;
use crate::error::LoadError;
use crate::loader::{self, LoadReport};
use crate::state::Pokemon;

/// Ordered entities and a cursor; `cursor < items.len()` whenever non-empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    items: Vec<Pokemon>,
    cursor: usize,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Pokemon] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&Pokemon> {
        self.items.get(self.cursor)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    /// Swap in a whole new batch and rewind.
    pub fn replace(&mut self, items: Vec<Pokemon>) {
        self.items = items;
        self.cursor = 0;
    }

    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn retreat(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Clear, then fill with up to `requested` members of `category`.
    ///
    /// The collection is emptied before the first request, so a failed load
    /// leaves it empty rather than stale.
    ///
    /// The terminal app runs `loader::load_batch` in a task instead and hands
    /// the result to [`Collection::replace`] from the reducer.
    pub async fn load_by_category<C: Catalog + ?Sized>(
        &mut self,
        catalog: &C,
        category: &str,
        requested: usize,
        cancel: &CancellationToken,
    ) -> Result<LoadReport, LoadError> {
        self.clear();
        let batch = loader::load_batch(catalog, category, requested, cancel).await?;
        self.items.extend(batch.items);
        Ok(batch.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokemon(name: &str) -> Pokemon {
        Pokemon {
            name: name.into(),
            ..Default::default()
        }
    }

    fn collection(names: &[&str]) -> Collection {
        let mut collection = Collection::new();
        collection.replace(names.iter().map(|name| pokemon(name)).collect());
        collection
    }

    #[test]
    fn test_empty_collection() {
        let mut collection = Collection::new();
        assert!(collection.current().is_none());
        assert!(!collection.advance());
        assert!(!collection.retreat());
        assert_eq!(collection.cursor(), 0);
    }

    #[test]
    fn test_advance_stops_at_last() {
        let mut collection = collection(&["a", "b", "c"]);
        assert!(collection.advance());
        assert!(collection.advance());
        assert_eq!(collection.cursor(), 2);
        assert!(!collection.advance());
        assert!(!collection.advance());
        assert_eq!(collection.cursor(), 2);
        assert_eq!(collection.current().map(|p| p.name.as_str()), Some("c"));
    }

    #[test]
    fn test_retreat_stops_at_first() {
        let mut collection = collection(&["a", "b"]);
        assert!(!collection.retreat());
        collection.advance();
        assert!(collection.retreat());
        assert!(!collection.retreat());
        assert_eq!(collection.cursor(), 0);
    }

    #[test]
    fn test_replace_rewinds_cursor() {
        let mut collection = collection(&["a", "b", "c"]);
        collection.advance();
        collection.advance();
        collection.replace(vec![pokemon("x")]);
        assert_eq!(collection.cursor(), 0);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.current().map(|p| p.name.as_str()), Some("x"));
    }

    #[test]
    fn test_clear() {
        let mut collection = collection(&["a", "b"]);
        collection.advance();
        collection.clear();
        assert!(collection.is_empty());
        assert_eq!(collection.cursor(), 0);
    }
}
