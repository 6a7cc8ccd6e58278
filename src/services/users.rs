//! Registration and authentication service

use std::path::{Path, PathBuf};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{PictureUpload, Registration, User, UserClaims, UserProfile},
    repository::{NewAccount, Repository},
};

const INVALID_LOGIN: &str = "Invalid login details supplied.";
const ACCOUNT_DISABLED: &str = "Your Rango account is disabled.";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    media_dir: PathBuf,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            config,
            media_dir: media_dir.into(),
        }
    }

    /// Register a new account with its profile
    pub async fn register(&self, registration: Registration) -> AppResult<(User, UserProfile)> {
        // Both halves of the form are checked before bailing out
        let user_check = registration.user.validate();
        let profile_check = registration.profile.validate();
        user_check?;
        profile_check?;

        let new_user = registration.user;
        if self.repository.users.username_exists(&new_user.username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = self.hash_password(&new_user.password)?;

        let picture = match registration.picture {
            Some(upload) => Some(self.store_picture(&upload).await?),
            None => None,
        };

        let account = NewAccount {
            username: new_user.username,
            email: new_user.email.filter(|e| !e.is_empty()),
            password_hash,
            website: registration.profile.website.filter(|w| !w.is_empty()),
            picture,
        };

        let (user, profile) = match self.repository.users.create_with_profile(&account).await {
            Ok(created) => created,
            Err(e) => {
                if let Some(path) = &account.picture {
                    if let Err(remove_err) = tokio::fs::remove_file(path).await {
                        tracing::warn!("Failed to remove orphaned picture {}: {}", path, remove_err);
                    }
                }
                return Err(e);
            }
        };
        tracing::info!("User registered: id={} username={:?}", user.id, user.username);
        Ok((user, profile))
    }

    /// Check credentials and issue a session token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = match self.repository.users.get_by_username(username).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Invalid login details for {:?}", username);
                return Err(AppError::Authentication(INVALID_LOGIN.to_string()));
            }
        };

        if !self.verify_password(&user, password)? {
            tracing::warn!("Invalid login details for {:?}", username);
            return Err(AppError::Authentication(INVALID_LOGIN.to_string()));
        }

        if !user.is_active {
            return Err(AppError::Authorization(ACCOUNT_DISABLED.to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User logged in: id={}", user.id);
        Ok((token, user))
    }

    /// Validate a session token
    pub fn verify_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Session lifetime in seconds
    pub fn session_lifetime_secs(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            exp: now + self.session_lifetime_secs(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Write an uploaded picture under the media directory, returning its path
    async fn store_picture(&self, upload: &PictureUpload) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.media_dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create media directory: {}", e)))?;

        let path = self.media_dir.join(picture_file_name(&upload.file_name));
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store picture: {}", e)))?;

        Ok(path.to_string_lossy().into_owned())
    }
}

/// Random file name keeping the upload's extension when it looks sane
fn picture_file_name(original: &str) -> String {
    let id = uuid::Uuid::new_v4();
    let extension = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", id, ext.to_ascii_lowercase()),
        None => id.to_string(),
    }
}
