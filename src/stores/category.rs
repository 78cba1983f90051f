//! The user's income and expense categories.

use crate::{
    Error, FinanceApi,
    models::{Category, CategoryId, NewCategory, TransactionKind},
    stores::RequestStatus,
};

/// The categories collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryStore {
    categories: Vec<Category>,
    status: RequestStatus,
}

impl CategoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The categories, in the order the server sent them.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The status of the latest request.
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Look up a category by ID.
    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    /// The categories for transactions of `kind`.
    pub fn of_kind(&self, kind: TransactionKind) -> Vec<&Category> {
        crate::filters::categories_of_kind(&self.categories, kind)
    }

    /// Replace the collection with the server's.
    pub async fn fetch(&mut self, api: &impl FinanceApi) -> Result<(), Error> {
        self.status.begin();

        let result = api.fetch_categories().await.and_then(|records| {
            records
                .into_iter()
                .map(Category::try_from)
                .collect::<Result<Vec<_>, _>>()
        });
        self.categories = self.status.settle(result, "Failed to fetch categories")?;

        tracing::info!("Fetched {} categories", self.categories.len());
        Ok(())
    }

    /// Create a category and add the server's copy to the collection.
    pub async fn create(
        &mut self,
        api: &impl FinanceApi,
        category: &NewCategory,
    ) -> Result<Category, Error> {
        self.status.begin();

        let result = api
            .create_category(category)
            .await
            .and_then(Category::try_from);
        let created = self.status.settle(result, "Failed to create category")?;

        tracing::info!("Created category {}", created.id);
        self.categories.push(created.clone());

        Ok(created)
    }

    /// Update a category and replace the local copy with the server's.
    pub async fn update(
        &mut self,
        api: &impl FinanceApi,
        id: &CategoryId,
        category: &NewCategory,
    ) -> Result<Category, Error> {
        self.status.begin();

        let result = api
            .update_category(id, category)
            .await
            .and_then(Category::try_from);
        let updated = self.status.settle(result, "Failed to update category")?;

        tracing::info!("Updated category {}", updated.id);
        if let Some(existing) = self
            .categories
            .iter_mut()
            .find(|existing| existing.id == updated.id)
        {
            *existing = updated.clone();
        }

        Ok(updated)
    }

    /// Delete a category and remove it from the collection.
    pub async fn delete(&mut self, api: &impl FinanceApi, id: &CategoryId) -> Result<(), Error> {
        self.status.begin();

        let result = api.delete_category(id).await;
        self.status.settle(result, "Failed to delete category")?;

        tracing::info!("Deleted category {id}");
        self.categories.retain(|category| &category.id != id);

        Ok(())
    }

    /// Forget the latest error.
    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }

    /// Empty the store, e.g. on logout.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
