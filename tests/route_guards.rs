use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use fieldtrack::{
    auth::Role,
    routes::router,
    test_helpers::{access_token, mock_state},
};

const SECRET: &[u8] = b"test-secret";

fn attendance_payload() -> String {
    json!({
        "latitude": 1.0,
        "longitude": 2.0,
        "selfie_photo": "selfies/a.jpg"
    })
    .to_string()
}

#[tokio::test]
async fn health_route_works() {
    let app = router(mock_state(SECRET));

    let res = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn attendance_without_token_is_rejected() {
    let app = router(mock_state(SECRET));

    let res = app
        .oneshot(
            Request::builder()
                .uri("/attendance")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = router(mock_state(SECRET));

    let res = app
        .oneshot(
            Request::builder()
                .uri("/attendance")
                .header("authorization", "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_only_caller_cannot_check_in() {
    let state = mock_state(SECRET);
    let token = access_token(&state, &Uuid::new_v4(), vec![Role::Admin]);
    let app = router(state);

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/attendance")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(attendance_payload()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_only_caller_cannot_file_incident() {
    let state = mock_state(SECRET);
    let token = access_token(&state, &Uuid::new_v4(), vec![Role::Admin]);
    let app = router(state);

    let payload = json!({
        "latitude": 1.0,
        "longitude": 2.0,
        "photo": "photos/x.jpg"
    });
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/incidents")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let state = mock_state(SECRET);
    let token = access_token(&state, &Uuid::new_v4(), vec![Role::Staff]);
    let app = router(state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/admin/staff")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_incident_create_is_always_forbidden() {
    let state = mock_state(SECRET);
    let token = access_token(&state, &Uuid::new_v4(), vec![Role::Admin]);
    let app = router(state);

    let payload = json!({
        "latitude": 1.0,
        "longitude": 2.0,
        "photo": "photos/x.jpg"
    });
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/incidents")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn daily_summary_rejects_malformed_date() {
    let state = mock_state(SECRET);
    let token = access_token(&state, &Uuid::new_v4(), vec![Role::Admin]);
    let app = router(state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/admin/attendance/daily?date=2024-13-40")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["kind"], "format");
}

#[tokio::test]
async fn caller_without_roles_sees_empty_attendance_list() {
    let state = mock_state(SECRET);
    let token = access_token(&state, &Uuid::new_v4(), vec![]);
    let app = router(state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/attendance")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json, serde_json::json!([]));
}
