//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, categories, health, home, view};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rango API",
        version = "0.1.0",
        description = "Categories, pages and accounts of the Rango site. \
                       Page endpoints answer with `{template, context}` documents."
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Site
        home::index,
        home::about,
        categories::show_category,
        categories::add_category_form,
        categories::add_category,
        categories::add_page_form,
        categories::add_page,
        // Accounts
        auth::register_form,
        auth::register,
        auth::login_form,
        auth::login,
        auth::restricted,
        auth::logout,
    ),
    components(
        schemas(
            // Site
            home::IndexContext,
            home::AboutContext,
            categories::AddCategoryContext,
            categories::AddPageContext,
            crate::services::catalog::CategoryDetail,
            crate::models::category::Category,
            crate::models::category::CategoryLink,
            crate::models::category::CreateCategory,
            crate::models::page::Page,
            crate::models::page::CreatePage,
            view::FormField,
            view::Empty,
            // Accounts
            auth::RegisterContext,
            auth::RestrictedContext,
            crate::models::user::User,
            crate::models::user::UserProfile,
            crate::models::user::LoginRequest,
            crate::models::user::NewUser,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rango", description = "Categories and pages"),
        (name = "auth", description = "Registration and sessions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_site_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/rango/"));
        assert!(doc.paths.paths.contains_key("/rango/category/{category_name_url}/add_page/"));
        assert!(doc.paths.paths.contains_key("/rango/login/"));
    }
}
