//! Category management for taskdesk.
//!
//! Categories live in the `categories` collection in insertion order. The
//! category with id `default` is created by [`CategoryStore::open`] when
//! missing and can never be deleted.

use std::sync::Arc;

use tracing::info;

use crate::cascade::{self, CascadeReport};
use crate::config::DefaultCategoryConfig;
use crate::error::{Error, Result};
use crate::model::{Category, CategoryIndex, CategoryPayload, DEFAULT_CATEGORY_ID};
use crate::storage::{Backend, Collection};
use crate::validate;

pub struct CategoryStore<B: Backend> {
    backend: Arc<B>,
}

impl<B: Backend> Clone for CategoryStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> CategoryStore<B> {
    /// Open the store, creating the default category first if it is absent.
    pub fn open(backend: Arc<B>, default: &DefaultCategoryConfig) -> Result<Self> {
        let store = Self { backend };
        store.ensure_default(default)?;
        Ok(store)
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    fn ensure_default(&self, default: &DefaultCategoryConfig) -> Result<()> {
        let _guard = self.backend.lock(Collection::Categories)?;
        let mut categories = self.read_for_update()?;
        if categories.iter().any(Category::is_default) {
            return Ok(());
        }

        categories.push(Category {
            id: DEFAULT_CATEGORY_ID.to_string(),
            name: default.name.clone(),
            color: default.color.clone(),
        });
        self.backend.write_all(Collection::Categories, &categories)?;
        info!(name = %default.name, "created default category");
        Ok(())
    }

    fn read(&self) -> Vec<Category> {
        self.backend.read_all(Collection::Categories)
    }

    fn read_for_update(&self) -> Result<Vec<Category>> {
        self.backend.read_for_update(Collection::Categories)
    }

    /// All categories in insertion order
    pub fn list(&self) -> Vec<Category> {
        self.read()
    }

    pub fn get(&self, id: &str) -> Result<Category> {
        self.read()
            .into_iter()
            .find(|category| category.id == id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))
    }

    /// Lookup table from id to category
    pub fn index(&self) -> CategoryIndex {
        CategoryIndex::new(&self.read())
    }

    pub fn create(&self, payload: &CategoryPayload) -> Result<Category> {
        let fields = validate::validate_category(payload)?;

        let _guard = self.backend.lock(Collection::Categories)?;
        let mut categories = self.read_for_update()?;
        let category = Category {
            id: fresh_id(|candidate| categories.iter().any(|c| c.id == candidate)),
            name: fields.name,
            color: fields.color,
        };
        categories.push(category.clone());
        self.backend.write_all(Collection::Categories, &categories)?;

        info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Replace name and color of an existing category; the id never changes.
    pub fn update(&self, id: &str, payload: &CategoryPayload) -> Result<Category> {
        let fields = validate::validate_category(payload)?;

        let _guard = self.backend.lock(Collection::Categories)?;
        let mut categories = self.read_for_update()?;
        let Some(existing) = categories.iter_mut().find(|category| category.id == id) else {
            return Err(Error::CategoryNotFound(id.to_string()));
        };
        existing.name = fields.name;
        existing.color = fields.color;
        let updated = existing.clone();
        self.backend.write_all(Collection::Categories, &categories)?;

        info!(id = %updated.id, "category updated");
        Ok(updated)
    }

    /// Delete a category together with every task filed under it.
    pub fn delete(&self, id: &str) -> Result<CascadeReport> {
        cascade::delete_category_cascade(self.backend.as_ref(), id)
    }
}

/// Generate a UUID v4 id not already taken according to `taken`.
pub(crate) fn fresh_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = uuid::Uuid::new_v4().to_string();
        if candidate != DEFAULT_CATEGORY_ID && !taken(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use std::collections::HashSet;

    fn store() -> CategoryStore<MemoryBackend> {
        CategoryStore::open(Arc::new(MemoryBackend::new()), &DefaultCategoryConfig::default())
            .expect("open store")
    }

    #[test]
    fn open_creates_default_once() {
        let backend = Arc::new(MemoryBackend::new());
        let config = DefaultCategoryConfig::default();
        let store = CategoryStore::open(Arc::clone(&backend), &config).expect("open");
        CategoryStore::open(Arc::clone(&backend), &config).expect("reopen");

        let categories = store.list();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, DEFAULT_CATEGORY_ID);
        assert_eq!(categories[0].name, "Ostatní");
        assert_eq!(categories[0].color, "#999999");
    }

    #[test]
    fn open_keeps_existing_categories() {
        let backend = Arc::new(MemoryBackend::new());
        backend.put_raw(
            Collection::Categories,
            serde_json::json!([{ "id": "work", "name": "Work", "color": "#000000" }]),
        );
        let store = CategoryStore::open(backend, &DefaultCategoryConfig::default()).expect("open");
        let ids: Vec<String> = store.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["work".to_string(), DEFAULT_CATEGORY_ID.to_string()]);
    }

    #[test]
    fn create_stores_input_exactly() {
        let store = store();
        let created = store
            .create(&CategoryPayload::new("Škola", "#A1b2C3"))
            .expect("create");
        assert_eq!(created.name, "Škola");
        assert_eq!(created.color, "#A1b2C3");

        let listed = store.list();
        assert_eq!(listed.iter().filter(|c| c.id == created.id).count(), 1);
        assert_eq!(listed.last(), Some(&created));
    }

    #[test]
    fn sequential_creates_have_unique_ids() {
        let store = store();
        for idx in 0..20 {
            store
                .create(&CategoryPayload::new(format!("Cat {idx}"), "#112233"))
                .expect("create");
        }
        let ids: HashSet<String> = store.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 21);
    }

    #[test]
    fn create_rejects_invalid_payload_without_writing() {
        let store = store();
        let err = store
            .create(&CategoryPayload::new("x", "#112233"))
            .expect_err("short name");
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn update_replaces_name_and_color() {
        let store = store();
        let created = store
            .create(&CategoryPayload::new("Home", "#112233"))
            .expect("create");
        let updated = store
            .update(&created.id, &CategoryPayload::new("House", "#445566"))
            .expect("update");
        assert_eq!(updated.id, created.id);
        assert_eq!(store.get(&created.id).expect("get"), updated);
    }

    #[test]
    fn update_default_keeps_its_id() {
        let store = store();
        let updated = store
            .update(DEFAULT_CATEGORY_ID, &CategoryPayload::new("Other", "#000000"))
            .expect("update default");
        assert!(updated.is_default());
        assert_eq!(updated.name, "Other");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = store();
        let err = store
            .update("missing", &CategoryPayload::new("Home", "#112233"))
            .expect_err("missing");
        assert!(matches!(err, Error::CategoryNotFound(_)));
    }

    #[test]
    fn update_validates_before_lookup() {
        let store = store();
        let err = store
            .update("missing", &CategoryPayload::new("Home", "red"))
            .expect_err("invalid");
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn index_maps_ids() {
        let store = store();
        let created = store
            .create(&CategoryPayload::new("Home", "#112233"))
            .expect("create");
        let index = store.index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&created.id).map(|c| c.name.as_str()), Some("Home"));
        assert!(index.contains(DEFAULT_CATEGORY_ID));
    }
}
