//! Rendered views
//!
//! A view pairs a template name with the context handed to it. The server
//! does not expand templates itself; it ships both to the client as JSON.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize)]
pub struct View<T> {
    pub template: &'static str,
    pub context: T,
}

impl<T: Serialize> View<T> {
    pub fn new(template: &'static str, context: T) -> Self {
        Self { template, context }
    }
}

impl<T: Serialize> IntoResponse for View<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Description of one input of a form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormField {
    pub name: &'static str,
    /// HTML input type
    pub input: &'static str,
    pub required: bool,
    pub max_length: Option<u32>,
}

impl FormField {
    pub const fn new(name: &'static str, input: &'static str, required: bool, max_length: Option<u32>) -> Self {
        Self { name, input, required, max_length }
    }
}

/// Context with no data
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Empty {}
