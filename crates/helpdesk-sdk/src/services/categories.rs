use helpdesk_domain::{Category, CategoryForm, Id, Subcategory, SubcategoryForm};

use super::collect_pages;
use crate::{Client, ListParams, Page, Result};

pub struct CategoriesService {
    client: Client,
}

impl CategoriesService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn page(&self, params: ListParams) -> Result<Page<Category>> {
        let value = self.client.get_raw("/categories", &params.query()).await?;
        Page::from_value(value)
    }

    /// Every category, walking all pages. Feeds the ticket form pickers.
    pub async fn list_all(&self, page_size: u32) -> Result<Vec<Category>> {
        collect_pages(&self.client, "/categories", page_size).await
    }

    /// Returns the created category when the API echoes it.
    pub async fn create(&self, form: &CategoryForm) -> Result<Option<Category>> {
        self.client.post_optional("/categories", form).await
    }

    pub async fn rename(&self, id: &Id, form: &CategoryForm) -> Result<()> {
        self.client.put(&format!("/categories/{}", id), form).await
    }

    pub async fn delete(&self, id: &Id) -> Result<()> {
        tracing::info!(%id, "deleting category");
        self.client.delete(&format!("/categories/{}", id)).await
    }
}

pub struct SubcategoriesService {
    client: Client,
}

impl SubcategoriesService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn page(&self, params: ListParams) -> Result<Page<Subcategory>> {
        let value = self.client.get_raw("/subcategories", &params.query()).await?;
        Page::from_value(value)
    }

    pub async fn list_all(&self, page_size: u32) -> Result<Vec<Subcategory>> {
        collect_pages(&self.client, "/subcategories", page_size).await
    }

    pub async fn create(&self, form: &SubcategoryForm) -> Result<Option<Subcategory>> {
        self.client.post_optional("/subcategories", form).await
    }

    /// Renames only; the parent and SLA durations are left untouched.
    pub async fn rename(&self, id: &Id, form: &CategoryForm) -> Result<()> {
        self.client.put(&format!("/subcategories/{}", id), form).await
    }

    pub async fn delete(&self, id: &Id) -> Result<()> {
        tracing::info!(%id, "deleting subcategory");
        self.client.delete(&format!("/subcategories/{}", id)).await
    }
}
