//! Recipe history and favorites service.
//!
//! Both live in `recipes.json`. History is append-only up to a cap of 50
//! entries (oldest evicted first); reads return at most the 20 most recent,
//! newest first. Favorites are bare recipe ids with no backing recipe table.

use crate::models::{HistoryEntry, RecipesDoc};
use crate::store::{DocName, DocumentStore, StoreError};

/// Maximum number of history entries kept on disk.
pub const HISTORY_CAP: usize = 50;
/// Maximum number of history entries returned per read.
pub const HISTORY_PAGE: usize = 20;

/// Favorites and search history backed by the document store.
#[derive(Debug, Clone)]
pub struct RecipeBook {
    store: DocumentStore,
}

impl RecipeBook {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Toggles a recipe id in the favorites list.
    ///
    /// Returns the new state: true if the id is now favorited. A re-added id
    /// lands at the end of the list; its old position is not restored.
    pub fn toggle_favorite(&self, recipe_id: &str) -> Result<bool, StoreError> {
        self.store.update(DocName::Recipes, |doc: &mut RecipesDoc| {
            if let Some(pos) = doc.favorites.iter().position(|id| id == recipe_id) {
                doc.favorites.remove(pos);
                false
            } else {
                doc.favorites.push(recipe_id.to_string());
                true
            }
        })
    }

    /// Returns favorited recipe ids in stored (insertion) order.
    pub fn list_favorites(&self) -> Result<Vec<String>, StoreError> {
        let doc: RecipesDoc = self.store.load(DocName::Recipes)?;
        Ok(doc.favorites)
    }

    /// Appends a search to the history, evicting the oldest entries beyond
    /// [`HISTORY_CAP`].
    pub fn append_history(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        self.store.update(DocName::Recipes, |doc: &mut RecipesDoc| {
            doc.history.push(entry);
            let excess = doc.history.len().saturating_sub(HISTORY_CAP);
            if excess > 0 {
                doc.history.drain(..excess);
            }
        })
    }

    /// Returns the most recent searches, newest first, at most
    /// [`HISTORY_PAGE`] entries.
    pub fn list_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let doc: RecipesDoc = self.store.load(DocName::Recipes)?;
        Ok(doc
            .history
            .iter()
            .rev()
            .take(HISTORY_PAGE)
            .cloned()
            .collect())
    }

    /// Clears all history. Favorites are untouched.
    pub fn clear_history(&self) -> Result<(), StoreError> {
        self.store.update(DocName::Recipes, |doc: &mut RecipesDoc| {
            doc.history.clear();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (RecipeBook, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let book = RecipeBook::new(DocumentStore::new(temp_dir.path()));
        (book, temp_dir)
    }

    fn entry(label: &str) -> HistoryEntry {
        HistoryEntry {
            search_ingredients: vec![label.to_string()],
            recipes: Vec::new(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_toggle_favorite_twice() {
        let (book, _temp) = setup();

        assert!(book.toggle_favorite("recipe_1_0").unwrap());
        assert_eq!(book.list_favorites().unwrap(), vec!["recipe_1_0"]);

        assert!(!book.toggle_favorite("recipe_1_0").unwrap());
        assert!(book.list_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_retoggled_favorite_moves_to_end() {
        let (book, _temp) = setup();

        book.toggle_favorite("a").unwrap();
        book.toggle_favorite("b").unwrap();
        book.toggle_favorite("c").unwrap();

        // Remove "a" then re-add it: it reappears at the end.
        book.toggle_favorite("a").unwrap();
        book.toggle_favorite("a").unwrap();

        assert_eq!(book.list_favorites().unwrap(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_history_caps_at_fifty() {
        let (book, _temp) = setup();

        for i in 0..(HISTORY_CAP + 1) {
            book.append_history(HistoryEntry {
                search_ingredients: vec![format!("item{}", i)],
                recipes: Vec::new(),
                timestamp: String::new(),
            })
            .unwrap();
        }

        let doc: RecipesDoc = book.store.load(DocName::Recipes).unwrap();
        assert_eq!(doc.history.len(), HISTORY_CAP);
        // The very first entry was evicted.
        assert_eq!(doc.history[0].search_ingredients, vec!["item1"]);
        assert_eq!(
            doc.history.last().unwrap().search_ingredients,
            vec![format!("item{}", HISTORY_CAP)]
        );
    }

    #[test]
    fn test_list_history_newest_first_capped_at_twenty() {
        let (book, _temp) = setup();

        for i in 0..30 {
            book.append_history(HistoryEntry {
                search_ingredients: vec![format!("item{}", i)],
                recipes: Vec::new(),
                timestamp: String::new(),
            })
            .unwrap();
        }

        let history = book.list_history().unwrap();
        assert_eq!(history.len(), HISTORY_PAGE);
        assert_eq!(history[0].search_ingredients, vec!["item29"]);
        assert_eq!(
            history.last().unwrap().search_ingredients,
            vec!["item10"]
        );
    }

    #[test]
    fn test_clear_history_preserves_favorites() {
        let (book, _temp) = setup();

        book.toggle_favorite("recipe_1_0").unwrap();
        book.append_history(entry("chicken")).unwrap();

        book.clear_history().unwrap();

        assert!(book.list_history().unwrap().is_empty());
        assert_eq!(book.list_favorites().unwrap(), vec!["recipe_1_0"]);
    }
}
