//! HTTP handlers for the Rango site

pub mod auth;
pub mod categories;
pub mod health;
pub mod home;
pub mod openapi;
pub mod view;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::UserClaims, AppState};

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Where successful logins, logouts and category creation land
pub const HOME_PATH: &str = "/rango/";

/// Extractor for the logged-in user, from a Bearer header or the session cookie
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(|| AppError::Authentication("Login required".to_string()))?,
        };

        let claims = state.services.users.verify_token(&token)?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Build a site cookie (path `/`, HttpOnly)
pub(crate) fn site_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let site = Router::new()
        .route("/", get(|| async { Redirect::permanent(HOME_PATH) }))
        .route("/rango/", get(home::index))
        .route("/rango/about/", get(home::about))
        // Categories and pages
        .route("/rango/category/:category_name_url/", get(categories::show_category))
        .route(
            "/rango/category/:category_name_url/add_page/",
            get(categories::add_page_form).post(categories::add_page),
        )
        .route(
            "/rango/add_category/",
            get(categories::add_category_form).post(categories::add_category),
        )
        // Accounts
        .route("/rango/register/", get(auth::register_form).post(auth::register))
        .route("/rango/login/", get(auth::login_form).post(auth::login))
        .route("/rango/restricted/", get(auth::restricted))
        .route("/rango/logout/", get(auth::logout))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    site.merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::{
        config::AppConfig,
        repository::{MockCategoryStore, MockHealthStore, MockPageStore, MockUserStore, Repository},
        services::Services,
        AppState,
    };

    /// Application state backed by the given mock stores and a reachable database
    pub fn state(categories: MockCategoryStore, pages: MockPageStore, users: MockUserStore) -> AppState {
        let mut health = MockHealthStore::new();
        health.expect_ping().returning(|| Ok(()));
        state_with_health(categories, pages, users, health)
    }

    pub fn state_with_health(
        categories: MockCategoryStore,
        pages: MockPageStore,
        users: MockUserStore,
        health: MockHealthStore,
    ) -> AppState {
        let config = AppConfig::default();
        let repository = Repository::from_stores(
            Arc::new(categories),
            Arc::new(pages),
            Arc::new(users),
            Arc::new(health),
        );
        let services = Services::new(repository, config.auth.clone(), &config.site);
        AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }

    /// Mock stores that answer listings with nothing
    pub fn empty_state() -> AppState {
        let mut categories = MockCategoryStore::new();
        categories.expect_top_by_likes().returning(|_| Ok(Vec::new()));
        categories.expect_find_by_name().returning(|_| Ok(None));
        let mut pages = MockPageStore::new();
        pages.expect_top_by_views().returning(|_| Ok(Vec::new()));
        state(categories, pages, MockUserStore::new())
    }
}
