//! Page model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Page record, a link filed under a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Page {
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub url: String,
    pub views: i32,
}

/// Add page form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePage {
    #[validate(length(min = 1, max = 128, message = "Title must be 1 to 128 characters"))]
    pub title: String,
    #[validate(
        url(message = "Invalid URL"),
        length(max = 200, message = "URL must be at most 200 characters")
    )]
    pub url: String,
}

impl CreatePage {
    /// Prefix scheme-less URLs with `http://` before validation
    pub fn normalized(mut self) -> Self {
        let url = self.url.trim();
        self.url = if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        };
        self
    }
}
