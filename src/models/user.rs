//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    /// Disabled accounts cannot log in
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

/// Extra profile data attached one-to-one to a user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub user_id: i32,
    pub website: Option<String>,
    /// Stored path of the uploaded picture
    pub picture: Option<String>,
}

/// Account part of the registration form
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct NewUser {
    #[validate(length(min = 1, max = 150, message = "Username must be 1 to 150 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile part of the registration form
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct NewProfile {
    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,
}

/// Uploaded picture held in memory until the account is saved
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Complete registration submission
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub user: NewUser,
    pub profile: NewProfile,
    pub picture: Option<PictureUpload>,
}

/// Login form
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    /// Username
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
