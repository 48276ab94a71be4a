//! Axum request handlers: context extraction and response translation.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use common::error::NOT_FOUND_MESSAGE;
use common::protocol::{Cookie, HealthResponse};
use common::ResponseContent;

use super::state::AppState;
use crate::dispatch::RequestContext;

/// `GET|POST /api/{key}` — dispatch without a path id.
pub async fn dispatch_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
    method: Method,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Bytes,
) -> Response {
    run(state, key, None, method, query, &headers, jar, body).await
}

/// `GET|POST /api/{key}/{id}` — dispatch addressing a single entity.
///
/// The original routes constrain `{id}` to digits; a non-numeric id never
/// matches a resource and reports the standard not-found response.
pub async fn dispatch_key_id(
    State(state): State<AppState>,
    Path((key, raw_id)): Path<(String, String)>,
    method: Method,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Bytes,
) -> Response {
    let Ok(id) = raw_id.parse::<u64>() else {
        return to_response(ResponseContent::error(NOT_FOUND_MESSAGE, 404), Vec::new());
    };
    run(state, key, Some(id), method, query, &headers, jar, body).await
}

#[allow(clippy::too_many_arguments)]
async fn run(
    state: AppState,
    key: String,
    path_id: Option<u64>,
    method: Method,
    query: BTreeMap<String, String>,
    headers: &HeaderMap,
    jar: CookieJar,
    body: Bytes,
) -> Response {
    let domain = headers
        .get(state.domain_header_name.as_str())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("default")
        .to_owned();

    let mut ctx = RequestContext::new(method, domain)
        .with_maintenance(state.maintenance.is_active())
        .with_body(body.to_vec());
    ctx.query = query;
    ctx.path_id = path_id;
    for cookie in jar.iter() {
        ctx.cookies
            .insert(cookie.name().to_owned(), cookie.value().to_owned());
    }

    let (content, cookies) = state.dispatcher.handle(&key, &ctx).await;
    to_response(content, cookies)
}

/// `GET /health` — liveness and readiness check.
///
/// Returns `200 OK` once endpoints are registered, `503` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let endpoints_registered = state.dispatcher.endpoint_count();
    let cache_entries = state.cache.len().await;

    let (status_code, status_str) = if endpoints_registered > 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        endpoints_registered,
        cache_entries,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler, using the same envelope as the API surface.
pub async fn not_found() -> Response {
    to_response(ResponseContent::error(NOT_FOUND_MESSAGE, 404), Vec::new())
}

/// Translate a dispatcher outcome into the wire response.
fn to_response(content: ResponseContent, cookies: Vec<Cookie>) -> Response {
    let status =
        StatusCode::from_u16(content.http_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        content.to_body(),
    )
        .into_response();

    for cookie in cookies {
        let mut raw = format!("{}={}; Path={}", cookie.name, cookie.value, cookie.path);
        if let Some(secs) = cookie.max_age_secs {
            raw.push_str(&format!("; Max-Age={secs}"));
        }
        if let Ok(value) = HeaderValue::from_str(&raw) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::cache::ResponseCache;
    use crate::dispatch::Dispatcher;
    use crate::endpoints::register_all;
    use crate::maintenance::MaintenanceMode;
    use crate::server::router;
    use crate::store::ContentStore;
    use crate::token::{SystemClock, TokenVerifier};

    const PASSPHRASE: &str = "test-passphrase";
    const SECRET: &str = "test-secret";

    fn app_with(store: ContentStore, maintenance: MaintenanceMode) -> axum::Router {
        let cache = ResponseCache::new();
        let clock = Arc::new(SystemClock);
        let registry = register_all(store, cache.clone(), clock.clone(), 10);
        let verifier = TokenVerifier::new(PASSPHRASE, SECRET, clock);
        let dispatcher = Arc::new(Dispatcher::new(registry, cache.clone(), verifier));
        let state = AppState::new(dispatcher, cache, maintenance, "X-Agora-Domain".into());
        router::build(state)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn init_returns_success_envelope() {
        let app = app_with(ContentStore::new(), MaintenanceMode::default());
        let resp = app
            .oneshot(Request::builder().uri("/api/init").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["domain"], "default");
    }

    #[tokio::test]
    async fn domain_header_selects_the_tenant() {
        let app = app_with(ContentStore::new(), MaintenanceMode::default());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/init")
                    .header("X-Agora-Domain", "hamburg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["data"]["domain"], "hamburg");
    }

    #[tokio::test]
    async fn unknown_key_surfaces_as_500() {
        let app = app_with(ContentStore::new(), MaintenanceMode::default());
        let resp = app
            .oneshot(Request::builder().uri("/api/bogus").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"], "Unknown key: bogus");
    }

    #[tokio::test]
    async fn non_numeric_path_id_is_404() {
        let app = app_with(ContentStore::new(), MaintenanceMode::default());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/contributiondetails/first")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn maintenance_mode_replaces_handler_payloads() {
        let app = app_with(ContentStore::new(), MaintenanceMode::new(true));
        let resp = app
            .oneshot(Request::builder().uri("/api/init").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["maintenanceMode"], true);
    }

    #[tokio::test]
    async fn cached_maintenance_payload_outlives_the_flag() {
        // The maintenance branch lives inside handler bodies, so its payload
        // is cached like any other response and keeps being served after the
        // flag is cleared, until the endpoint tag is purged.
        let maintenance = MaintenanceMode::new(true);
        let app = app_with(ContentStore::new(), maintenance.clone());

        let first = app
            .clone()
            .oneshot(Request::builder().uri("/api/init").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(first).await["data"]["maintenanceMode"], true);

        maintenance.set(false);
        let second = app
            .oneshot(Request::builder().uri("/api/init").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(second).await["data"]["maintenanceMode"], true);
    }

    #[tokio::test]
    async fn rate_round_trip_sets_vote_cookies() {
        let store = ContentStore::new();
        let id = store
            .insert_contribution("title", "text", "cat", "rub", 100)
            .await;
        let app = app_with(store, MaintenanceMode::default());

        let token = TokenVerifier::new(PASSPHRASE, SECRET, Arc::new(SystemClock))
            .issue()
            .unwrap();
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/rate/{id}?token={token}"))
                    .body(Body::from(r#"{"rating": 1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let set_cookies: Vec<_> = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_owned())
            .collect();
        assert!(set_cookies.iter().any(|c| c.starts_with("agora_voted=")));
        assert!(set_cookies.iter().any(|c| c.starts_with("agora_voter=")));

        let json = body_json(resp).await;
        assert_eq!(json["data"]["upvotes"], 1);
    }

    #[tokio::test]
    async fn rate_without_token_is_500() {
        let store = ContentStore::new();
        let id = store
            .insert_contribution("title", "text", "cat", "rub", 100)
            .await;
        let app = app_with(store, MaintenanceMode::default());

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/rate/{id}"))
                    .body(Body::from(r#"{"rating": 1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn comment_refreshes_cached_details() {
        let store = ContentStore::new();
        let id = store
            .insert_contribution("title", "text", "cat", "rub", 100)
            .await;
        let app = app_with(store, MaintenanceMode::default());

        // Prime the details cache.
        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/contributiondetails/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(first).await["data"]["comments"], serde_json::json!([]));

        // Add a comment; its handler invalidates node:comments:{id}.
        let posted = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/addcomment")
                    .body(Body::from(format!(
                        r#"{{"node": {id}, "subject": "s", "comment": "c"}}"#
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(posted.status(), 200);

        // The cached details entry must have been purged.
        let second = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/contributiondetails/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(second).await;
        assert_eq!(json["data"]["comments"].as_array().unwrap().len(), 1);
    }
}
