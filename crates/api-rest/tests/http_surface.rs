//! End-to-end checks of the HTTP surface: status mapping, the bearer token
//! requirement, and the refreshed-token response header.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

use api_rest::{build_router, AppState, TOKEN_HEADER};
use carelink_core::{AuthService, CoreConfig, Database, DEFAULT_SESSION_TTL_SECS};

const ADMIN_EMAIL: &str = "root@carelink.test";
const ADMIN_PASSWORD: &str = "super-secret-pw";

fn test_router() -> (Router, TempDir) {
    let docs = TempDir::new().expect("create temp dir");
    let cfg = CoreConfig::new(
        docs.path().join("carelink.db"),
        docs.path().join("documents"),
        b"test-secret-test-secret-test-secret".to_vec(),
        DEFAULT_SESSION_TTL_SECS,
    )
    .expect("build config");
    let db = Database::open_in_memory().expect("open database");
    AuthService::new(&db, &cfg)
        .bootstrap_system_admin("Root Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
        .expect("bootstrap admin");

    let state = AppState {
        cfg: Arc::new(cfg),
        db: Arc::new(Mutex::new(db)),
    };
    (build_router(state), docs)
}

async fn body_json(body: Body) -> serde_json::Value {
    let bytes = to_bytes(body, usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON body")
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

async fn login(router: &Router) -> String {
    let res = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ))
        .await
        .expect("send request");
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.into_body()).await;
    body["token"].as_str().expect("token in body").to_string()
}

#[tokio::test]
async fn health_is_public() {
    let (router, _docs) = test_router();
    let res = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("send request");
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.into_body()).await;
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (router, _docs) = test_router();
    for uri in ["/patients", "/hospitals", "/referrals/incoming", "/tasks"] {
        let res = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("send request");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "for {uri}");
    }
}

#[tokio::test]
async fn bad_credentials_report_401() {
    let (router, _docs) = test_router();
    let res = router
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": "wrong" }),
        ))
        .await
        .expect("send request");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticated_responses_carry_a_refreshed_token() {
    let (router, _docs) = test_router();
    let token = login(&router).await;

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("send request");
    assert_eq!(res.status(), StatusCode::OK);
    let refreshed = res
        .headers()
        .get(TOKEN_HEADER)
        .expect("refreshed token header")
        .to_str()
        .expect("header is a string")
        .to_string();
    let body = body_json(res.into_body()).await;
    assert_eq!(body["email"], ADMIN_EMAIL);

    // The refreshed token is itself usable.
    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {refreshed}"))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("send request");
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn core_errors_map_onto_http_statuses() {
    let (router, _docs) = test_router();
    let token = login(&router).await;
    let auth = format!("Bearer {token}");

    // Forbidden: a system admin is not a doctor, so referral creation is
    // refused.
    let mut req = json_request(
        "POST",
        "/referrals",
        serde_json::json!({
            "patient_id": uuid::Uuid::new_v4(),
            "to_hospital_id": uuid::Uuid::new_v4(),
            "priority": "NORMAL",
            "reason": "x",
        }),
    );
    req.headers_mut()
        .insert(header::AUTHORIZATION, auth.parse().expect("header value"));
    let res = router.clone().oneshot(req).await.expect("send request");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Validation: a hospital with an empty name is a 400.
    let mut req = json_request(
        "POST",
        "/hospitals",
        serde_json::json!({ "name": " ", "kind": "General", "location": "Testville" }),
    );
    req.headers_mut()
        .insert(header::AUTHORIZATION, auth.parse().expect("header value"));
    let res = router.clone().oneshot(req).await.expect("send request");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res.into_body()).await;
    assert!(body["error"].as_str().expect("error message").contains("hospital name"));
}
