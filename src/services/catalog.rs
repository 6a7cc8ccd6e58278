//! Categories and pages service

use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        category::{decode_url, Category, CategoryLink, CreateCategory},
        page::{CreatePage, Page},
    },
    repository::Repository,
};

/// Most liked categories and most viewed pages
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HomeListing {
    pub categories: Vec<CategoryLink>,
    pub pages: Vec<Page>,
}

/// A category looked up from its URL segment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryDetail {
    pub category_name: String,
    pub category_name_url: String,
    /// Absent when no category carries that name
    pub category: Option<Category>,
    pub pages: Vec<Page>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    top_n: i64,
}

impl CatalogService {
    pub fn new(repository: Repository, top_n: i64) -> Self {
        Self { repository, top_n }
    }

    /// Listing shown on the home page
    pub async fn home_listing(&self) -> AppResult<HomeListing> {
        let categories = self
            .repository
            .categories
            .top_by_likes(self.top_n)
            .await?
            .into_iter()
            .map(CategoryLink::from)
            .collect();
        let pages = self.repository.pages.top_by_views(self.top_n).await?;

        Ok(HomeListing { categories, pages })
    }

    /// Resolve a category from its URL segment. An unknown name is not an
    /// error: the detail simply has no category and no pages.
    pub async fn category_detail(&self, category_name_url: &str) -> AppResult<CategoryDetail> {
        let category_name = decode_url(category_name_url);
        let category = self.repository.categories.find_by_name(&category_name).await?;

        let pages = match &category {
            Some(c) => self.repository.pages.list_for_category(c.id).await?,
            None => Vec::new(),
        };

        Ok(CategoryDetail {
            category_name,
            category_name_url: category_name_url.to_string(),
            category,
            pages,
        })
    }

    /// Create a category from the submitted form
    pub async fn add_category(&self, form: CreateCategory) -> AppResult<Category> {
        let form = CreateCategory { name: form.name.trim().to_string() };
        form.validate()?;

        let category = self.repository.categories.create(&form).await?;
        tracing::info!("Category created: id={} name={:?}", category.id, category.name);
        Ok(category)
    }

    /// File a new page under the category named by `category_name_url`
    pub async fn add_page(&self, category_name_url: &str, form: CreatePage) -> AppResult<Page> {
        let form = form.normalized();
        form.validate()?;

        let category_name = decode_url(category_name_url);
        let category = self
            .repository
            .categories
            .find_by_name(&category_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", category_name)))?;

        let page = self.repository.pages.create(category.id, &form).await?;
        tracing::info!("Page created: id={} category={:?}", page.id, category.name);
        Ok(page)
    }
}
