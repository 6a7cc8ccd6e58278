//! Category model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Category record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    /// Unique display name
    pub name: String,
    pub views: i32,
    pub likes: i32,
}

/// Category as listed on the home page, with its URL slug
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryLink {
    #[serde(flatten)]
    pub category: Category,
    /// Name encoded for use in a URL path segment
    pub url: String,
}

impl From<Category> for CategoryLink {
    fn from(category: Category) -> Self {
        let url = encode_url(&category.name);
        Self { category, url }
    }
}

/// Add category form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 128, message = "Name must be 1 to 128 characters"))]
    pub name: String,
}

/// Encode a category name for a URL path segment (spaces become underscores)
pub fn encode_url(name: &str) -> String {
    name.replace(' ', "_")
}

/// Recover a category name from its URL path segment
pub fn decode_url(url: &str) -> String {
    url.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encoding() {
        assert_eq!(encode_url("Other Frameworks"), "Other_Frameworks");
        assert_eq!(decode_url("Other_Frameworks"), "Other Frameworks");
        assert_eq!(encode_url("Python"), "Python");
    }

    #[test]
    fn test_category_link_serializes_flat() {
        let link = CategoryLink::from(Category {
            id: 1,
            name: "Django Tips".to_string(),
            views: 10,
            likes: 3,
        });
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value["name"], "Django Tips");
        assert_eq!(value["url"], "Django_Tips");
        assert_eq!(value["likes"], 3);
    }

    #[test]
    fn test_create_category_validation() {
        assert!(CreateCategory { name: "Rust".into() }.validate().is_ok());
        assert!(CreateCategory { name: String::new() }.validate().is_err());
        assert!(CreateCategory { name: "x".repeat(129) }.validate().is_err());
    }
}
