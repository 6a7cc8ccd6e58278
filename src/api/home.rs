//! Home and about pages

use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{CategoryLink, Page},
    visits::{format_last_visit, VisitState, LAST_VISIT_COOKIE, VISITS_COOKIE},
    AppState,
};

use super::{site_cookie, view::View};

#[derive(Debug, Serialize, ToSchema)]
pub struct IndexContext {
    pub categories: Vec<CategoryLink>,
    pub pages: Vec<Page>,
    /// Distinct day-sessions seen for this client
    pub visits: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AboutContext {
    pub secondmessage: &'static str,
    pub visits: u64,
}

fn visit_state(jar: &CookieJar) -> VisitState {
    VisitState::from_cookies(
        jar.get(VISITS_COOKIE).map(|c| c.value()),
        jar.get(LAST_VISIT_COOKIE).map(|c| c.value()),
    )
}

/// Home page: top categories and pages, plus visit tracking
#[utoipa::path(
    get,
    path = "/rango/",
    tag = "rango",
    responses(
        (status = 200, description = "Home page context", body = IndexContext)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, View<IndexContext>)> {
    let listing = state.services.catalog.home_listing().await?;

    let update = visit_state(&jar).update(Utc::now().naive_utc());
    let jar = if update.persist {
        let secure = state.config.site.secure_cookies;
        tracing::debug!("Visit cookies updated: visits={}", update.count);
        jar.add(site_cookie(VISITS_COOKIE, update.count.to_string(), secure))
            .add(site_cookie(LAST_VISIT_COOKIE, format_last_visit(update.last_visit), secure))
    } else {
        jar
    };

    let context = IndexContext {
        categories: listing.categories,
        pages: listing.pages,
        visits: update.count,
    };
    Ok((jar, View::new("rango/index.html", context)))
}

/// About page
#[utoipa::path(
    get,
    path = "/rango/about/",
    tag = "rango",
    responses(
        (status = 200, description = "About page context", body = AboutContext)
    )
)]
pub async fn about(jar: CookieJar) -> View<AboutContext> {
    View::new(
        "rango/about.html",
        AboutContext {
            secondmessage: "This is another bold message",
            visits: visit_state(&jar).count,
        },
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{COOKIE, SET_COOKIE},
            Request, StatusCode,
        },
        response::Response,
    };
    use chrono::Duration;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::api::{create_router, test_support};

    async fn get_home(cookie: Option<String>) -> Response {
        let mut request = Request::builder().uri("/rango/");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        create_router(test_support::empty_state())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_first_visit_sets_baseline_cookies() {
        let response = get_home(None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookies(&response);
        assert!(cookies.iter().any(|c| c.starts_with("visits=0")));
        assert!(cookies.iter().any(|c| c.starts_with("last_visit=")));

        let body = body_json(response).await;
        assert_eq!(body["template"], "rango/index.html");
        assert_eq!(body["context"]["visits"], 0);
        assert!(body["context"]["categories"].is_array());
    }

    #[tokio::test]
    async fn test_recent_visit_leaves_cookies_alone() {
        let recent = format_last_visit(Utc::now().naive_utc() - Duration::hours(2));
        let response = get_home(Some(format!("visits=3; last_visit={}", recent))).await;

        assert!(set_cookies(&response).is_empty());
        let body = body_json(response).await;
        assert_eq!(body["context"]["visits"], 3);
    }

    #[tokio::test]
    async fn test_visit_after_a_day_increments() {
        let old = format_last_visit(Utc::now().naive_utc() - Duration::days(3));
        let response = get_home(Some(format!("visits=3; last_visit={}", old))).await;

        let cookies = set_cookies(&response);
        assert!(cookies.iter().any(|c| c.starts_with("visits=4")));
        let body = body_json(response).await;
        assert_eq!(body["context"]["visits"], 4);
    }

    #[tokio::test]
    async fn test_corrupted_last_visit_resets_baseline() {
        let response = get_home(Some("visits=5; last_visit=corrupted-string".to_string())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        assert!(cookies.iter().any(|c| c.starts_with("visits=5")));
        assert!(cookies.iter().any(|c| c.starts_with("last_visit=") && !c.contains("corrupted")));
    }

    #[tokio::test]
    async fn test_about_reports_visits_without_writing() {
        let response = create_router(test_support::empty_state())
            .oneshot(
                Request::builder()
                    .uri("/rango/about/")
                    .header(COOKIE, "visits=7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(set_cookies(&response).is_empty());
        let body = body_json(response).await;
        assert_eq!(body["context"]["visits"], 7);
        assert_eq!(body["context"]["secondmessage"], "This is another bold message");
    }
}
