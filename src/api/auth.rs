//! Registration, login and logout

use axum::{extract::State, http::StatusCode, response::Redirect, Form};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar},
    Multipart,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        user::{LoginRequest, NewUser, PictureUpload, Registration},
        User, UserProfile,
    },
    AppState,
};

use super::{
    site_cookie,
    view::{Empty, FormField, View},
    AuthenticatedUser, HOME_PATH, SESSION_COOKIE,
};

const REGISTER_FIELDS: &[FormField] = &[
    FormField::new("username", "text", true, Some(150)),
    FormField::new("email", "email", false, Some(254)),
    FormField::new("password", "password", true, None),
    FormField::new("website", "url", false, Some(200)),
    FormField::new("picture", "file", false, None),
];

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterContext {
    pub registered: bool,
    pub fields: Vec<FormField>,
    pub user: Option<User>,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestrictedContext {
    pub username: String,
}

/// Blank registration form
#[utoipa::path(
    get,
    path = "/rango/register/",
    tag = "auth",
    responses(
        (status = 200, description = "Form description", body = RegisterContext)
    )
)]
pub async fn register_form() -> View<RegisterContext> {
    View::new(
        "rango/register.html",
        RegisterContext {
            registered: false,
            fields: REGISTER_FIELDS.to_vec(),
            user: None,
            profile: None,
        },
    )
}

/// Register a new account (multipart form with optional `picture` file)
#[utoipa::path(
    post,
    path = "/rango/register/",
    tag = "auth",
    request_body(
        content = NewUser,
        content_type = "multipart/form-data",
        description = "Account fields plus optional `website` and `picture` file"
    ),
    responses(
        (status = 201, description = "Account created", body = RegisterContext),
        (status = 400, description = "Invalid form"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, View<RegisterContext>)> {
    let registration = read_registration(multipart).await?;
    let (user, profile) = state.services.users.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        View::new(
            "rango/register.html",
            RegisterContext {
                registered: true,
                fields: REGISTER_FIELDS.to_vec(),
                user: Some(user),
                profile: Some(profile),
            },
        ),
    ))
}

async fn read_registration(mut multipart: Multipart) -> AppResult<Registration> {
    let mut registration = Registration::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => registration.user.username = field.text().await?.trim().to_string(),
            "email" => registration.user.email = non_empty(field.text().await?),
            "password" => registration.user.password = field.text().await?,
            "website" => registration.profile.website = non_empty(field.text().await?),
            "picture" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    registration.picture = Some(PictureUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => tracing::debug!("Ignoring registration field {:?}", other),
        }
    }

    Ok(registration)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Login form
#[utoipa::path(
    get,
    path = "/rango/login/",
    tag = "auth",
    responses(
        (status = 200, description = "Login page", body = Empty)
    )
)]
pub async fn login_form() -> View<Empty> {
    View::new("rango/login.html", Empty::default())
}

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/rango/login/",
    tag = "auth",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirect to the home page"),
        (status = 401, description = "Invalid login details"),
        (status = 403, description = "Account disabled")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> AppResult<(CookieJar, Redirect)> {
    let (token, _user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    let jar = jar.add(site_cookie(SESSION_COOKIE, token, state.config.site.secure_cookies));
    Ok((jar, Redirect::to(HOME_PATH)))
}

/// Page only visible to logged-in users
#[utoipa::path(
    get,
    path = "/rango/restricted/",
    tag = "auth",
    responses(
        (status = 200, description = "Restricted page", body = RestrictedContext),
        (status = 401, description = "Login required")
    )
)]
pub async fn restricted(AuthenticatedUser(claims): AuthenticatedUser) -> View<RestrictedContext> {
    View::new("rango/restricted.html", RestrictedContext { username: claims.sub })
}

/// Drop the session cookie
#[utoipa::path(
    get,
    path = "/rango/logout/",
    tag = "auth",
    responses(
        (status = 303, description = "Logged out, redirect to the home page"),
        (status = 401, description = "Login required")
    )
)]
pub async fn logout(
    AuthenticatedUser(claims): AuthenticatedUser,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    tracing::info!("User logged out: id={}", claims.user_id);
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to(HOME_PATH))
}
