//! Repository layer for database operations
//!
//! Handlers and services only see the store traits below; the PostgreSQL
//! implementations live in the submodules.

pub mod categories;
pub mod pages;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Category, CreateCategory, CreatePage, Page, User, UserProfile},
};

pub use users::NewAccount;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Top `limit` categories, most liked first
    async fn top_by_likes(&self, limit: i64) -> AppResult<Vec<Category>>;

    /// Look a category up by its exact name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// Insert a category with zero views and likes
    async fn create(&self, data: &CreateCategory) -> AppResult<Category>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Top `limit` pages, most viewed first
    async fn top_by_views(&self, limit: i64) -> AppResult<Vec<Page>>;

    async fn list_for_category(&self, category_id: i32) -> AppResult<Vec<Page>>;

    /// Insert a page under `category_id` with zero views
    async fn create(&self, category_id: i32, data: &CreatePage) -> AppResult<Page>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive username lookup
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn username_exists(&self, username: &str) -> AppResult<bool>;

    /// Insert a user and its profile atomically
    async fn create_with_profile(&self, account: &NewAccount) -> AppResult<(User, UserProfile)>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Round-trip to the database
    async fn ping(&self) -> AppResult<()>;
}

/// Connectivity check against the pool
pub struct PgHealth {
    pool: Pool<Postgres>,
}

#[async_trait]
impl HealthStore for PgHealth {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Main repository struct holding the data stores
#[derive(Clone)]
pub struct Repository {
    pub categories: Arc<dyn CategoryStore>,
    pub pages: Arc<dyn PageStore>,
    pub users: Arc<dyn UserStore>,
    pub health: Arc<dyn HealthStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            categories: Arc::new(categories::CategoriesRepository::new(pool.clone())),
            pages: Arc::new(pages::PagesRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            health: Arc::new(PgHealth { pool }),
        }
    }

    /// Assemble a repository from arbitrary store implementations
    pub fn from_stores(
        categories: Arc<dyn CategoryStore>,
        pages: Arc<dyn PageStore>,
        users: Arc<dyn UserStore>,
        health: Arc<dyn HealthStore>,
    ) -> Self {
        Self { categories, pages, users, health }
    }
}

/// Map a unique-constraint violation to a conflict, anything else to a database error
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: impl Into<String>) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(message.into()),
        _ => AppError::Database(e),
    }
}
