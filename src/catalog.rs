//! Ingredient catalog service.
//!
//! The catalog is the vocabulary the ingredient picker offers. Entries are
//! stored lowercase, trimmed, unique under case-insensitive comparison, and
//! kept sorted in `ingredients.json`.

use crate::models::IngredientsDoc;
use crate::store::{DocName, DocumentStore, StoreError};

/// Minimum accepted length of a normalized ingredient.
pub const MIN_INGREDIENT_LEN: usize = 2;
/// Maximum accepted length of a normalized ingredient.
pub const MAX_INGREDIENT_LEN: usize = 50;

/// Errors from catalog operations.
#[derive(Debug)]
pub enum CatalogError {
    /// The input failed validation.
    Invalid(String),
    /// No matching ingredient in the catalog.
    NotFound,
    /// Underlying document read/write failed.
    Store(StoreError),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Invalid(msg) => write!(f, "{}", msg),
            CatalogError::NotFound => write!(f, "Ingredient not found"),
            CatalogError::Store(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        CatalogError::Store(e)
    }
}

/// Result of an [`IngredientCatalog::add`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// True if the ingredient was already present (no write happened).
    pub already_existed: bool,
    /// The stored ingredient: the existing entry's casing on a duplicate,
    /// the normalized input otherwise.
    pub ingredient: String,
}

/// Normalizes user input: lowercase, surrounding whitespace removed.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Ingredient vocabulary backed by the document store.
#[derive(Debug, Clone)]
pub struct IngredientCatalog {
    store: DocumentStore,
}

impl IngredientCatalog {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Returns all ingredients, sorted ascending.
    pub fn list(&self) -> Result<Vec<String>, CatalogError> {
        let mut doc: IngredientsDoc = self.store.load(DocName::Ingredients)?;
        doc.ingredients.sort();
        Ok(doc.ingredients)
    }

    /// Adds an ingredient after normalizing and validating it.
    ///
    /// A case-insensitive duplicate is reported via `already_existed` and
    /// leaves the document untouched.
    pub fn add(&self, raw: &str) -> Result<AddOutcome, CatalogError> {
        let normalized = normalize(raw);
        let len = normalized.chars().count();
        if len < MIN_INGREDIENT_LEN || len > MAX_INGREDIENT_LEN {
            return Err(CatalogError::Invalid(format!(
                "Ingredient must be between {} and {} characters",
                MIN_INGREDIENT_LEN, MAX_INGREDIENT_LEN
            )));
        }

        let mut doc: IngredientsDoc = self.store.load(DocName::Ingredients)?;

        if let Some(existing) = doc
            .ingredients
            .iter()
            .find(|item| item.to_lowercase() == normalized)
        {
            return Ok(AddOutcome {
                already_existed: true,
                ingredient: existing.clone(),
            });
        }

        doc.ingredients.push(normalized.clone());
        doc.ingredients.sort();
        self.store.save(DocName::Ingredients, &doc)?;

        Ok(AddOutcome {
            already_existed: false,
            ingredient: normalized,
        })
    }

    /// Removes an ingredient (case-insensitive match).
    ///
    /// Fails with [`CatalogError::NotFound`] when nothing matched; the
    /// document is only written when an entry was actually removed.
    pub fn remove(&self, raw: &str) -> Result<(), CatalogError> {
        let normalized = normalize(raw);

        let mut doc: IngredientsDoc = self.store.load(DocName::Ingredients)?;
        let initial_len = doc.ingredients.len();
        doc.ingredients
            .retain(|item| item.to_lowercase() != normalized);

        if doc.ingredients.len() == initial_len {
            return Err(CatalogError::NotFound);
        }

        self.store.save(DocName::Ingredients, &doc)?;
        Ok(())
    }
}
