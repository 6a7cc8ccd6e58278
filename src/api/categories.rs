//! Category and page endpoints

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        category::{decode_url, encode_url, CreateCategory},
        page::CreatePage,
    },
    services::catalog::CategoryDetail,
    AppState,
};

use super::{
    view::{FormField, View},
    HOME_PATH,
};

const CATEGORY_FIELDS: &[FormField] = &[FormField::new("name", "text", true, Some(128))];

const PAGE_FIELDS: &[FormField] = &[
    FormField::new("title", "text", true, Some(128)),
    FormField::new("url", "url", true, Some(200)),
];

#[derive(Debug, Serialize, ToSchema)]
pub struct AddCategoryContext {
    pub fields: Vec<FormField>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddPageContext {
    pub category_name_url: String,
    pub category_name: String,
    pub fields: Vec<FormField>,
}

/// Show a category and its pages
#[utoipa::path(
    get,
    path = "/rango/category/{category_name_url}/",
    tag = "rango",
    params(
        ("category_name_url" = String, Path, description = "Category name with spaces as underscores")
    ),
    responses(
        (status = 200, description = "Category context; `category` is null when unknown", body = CategoryDetail)
    )
)]
pub async fn show_category(
    State(state): State<AppState>,
    Path(category_name_url): Path<String>,
) -> AppResult<View<CategoryDetail>> {
    let detail = state.services.catalog.category_detail(&category_name_url).await?;
    Ok(View::new("rango/category.html", detail))
}

/// Blank add-category form
#[utoipa::path(
    get,
    path = "/rango/add_category/",
    tag = "rango",
    responses(
        (status = 200, description = "Form description", body = AddCategoryContext)
    )
)]
pub async fn add_category_form() -> View<AddCategoryContext> {
    View::new("rango/add_category.html", AddCategoryContext { fields: CATEGORY_FIELDS.to_vec() })
}

/// Create a category
#[utoipa::path(
    post,
    path = "/rango/add_category/",
    tag = "rango",
    request_body(content = CreateCategory, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to the home page"),
        (status = 400, description = "Invalid form"),
        (status = 409, description = "Category already exists")
    )
)]
pub async fn add_category(
    State(state): State<AppState>,
    Form(form): Form<CreateCategory>,
) -> AppResult<Redirect> {
    state.services.catalog.add_category(form).await?;
    Ok(Redirect::to(HOME_PATH))
}

/// Blank add-page form for a category
#[utoipa::path(
    get,
    path = "/rango/category/{category_name_url}/add_page/",
    tag = "rango",
    params(
        ("category_name_url" = String, Path, description = "Category name with spaces as underscores")
    ),
    responses(
        (status = 200, description = "Form description", body = AddPageContext)
    )
)]
pub async fn add_page_form(Path(category_name_url): Path<String>) -> View<AddPageContext> {
    let category_name = decode_url(&category_name_url);
    View::new(
        "rango/add_page.html",
        AddPageContext {
            category_name_url,
            category_name,
            fields: PAGE_FIELDS.to_vec(),
        },
    )
}

/// Add a page to a category
#[utoipa::path(
    post,
    path = "/rango/category/{category_name_url}/add_page/",
    tag = "rango",
    params(
        ("category_name_url" = String, Path, description = "Category name with spaces as underscores")
    ),
    request_body(content = CreatePage, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to the category"),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn add_page(
    State(state): State<AppState>,
    Path(category_name_url): Path<String>,
    Form(form): Form<CreatePage>,
) -> AppResult<Redirect> {
    state.services.catalog.add_page(&category_name_url, form).await?;
    let slug = encode_url(&decode_url(&category_name_url));
    Ok(Redirect::to(&format!("/rango/category/{}/", escape_segment(&slug))))
}

/// Percent-escape everything but unreserved characters so the segment is a valid `Location`
fn escape_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("%{:02X}", byte));
        }
    }
    escaped
}
