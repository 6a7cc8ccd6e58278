//! Data models for Rango

pub mod category;
pub mod page;
pub mod user;

// Re-export commonly used types
pub use category::{Category, CategoryLink, CreateCategory};
pub use page::{CreatePage, Page};
pub use user::{User, UserClaims, UserProfile};
