//! Pages repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{CreatePage, Page},
};

use super::PageStore;

#[derive(Clone)]
pub struct PagesRepository {
    pool: Pool<Postgres>,
}

impl PagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageStore for PagesRepository {
    async fn top_by_views(&self, limit: i64) -> AppResult<Vec<Page>> {
        let rows = sqlx::query_as::<_, Page>(
            "SELECT id, category_id, title, url, views FROM pages ORDER BY views DESC, id LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_for_category(&self, category_id: i32) -> AppResult<Vec<Page>> {
        let rows = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, category_id, title, url, views
            FROM pages
            WHERE category_id = $1
            ORDER BY views DESC, id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, category_id: i32, data: &CreatePage) -> AppResult<Page> {
        let row = sqlx::query_as::<_, Page>(
            r#"
            INSERT INTO pages (category_id, title, url, views)
            VALUES ($1, $2, $3, 0)
            RETURNING id, category_id, title, url, views
            "#,
        )
        .bind(category_id)
        .bind(&data.title)
        .bind(&data.url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
