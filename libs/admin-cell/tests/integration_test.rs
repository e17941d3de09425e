use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{any, body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use admin_cell::router::admin_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

async fn create_test_app(config: &AppConfig) -> Router {
    admin_routes(Arc::new(config.clone()))
}

fn test_config(supabase_url: &str) -> AppConfig {
    let mut test_config = TestConfig::default();
    test_config.supabase_url = supabase_url.to_string();
    test_config.to_app_config()
}

fn admin_token() -> String {
    let test_config = TestConfig::default();
    let admin = TestUser::admin(&test_config.admin_email);
    JwtTestUtils::create_test_token(&admin, &test_config.jwt_secret, Some(1))
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}

fn post_request(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const ADMIN_SURFACES: [(&str, &str); 6] = [
    ("GET", "/admin/stats"),
    ("GET", "/admin/users"),
    ("GET", "/admin/reports"),
    ("GET", "/admin/bookings"),
    ("GET", "/admin/subscriptions"),
    ("POST", "/admin/subscriptions"),
];

#[tokio::test]
async fn test_admin_routes_require_a_token() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    for (http_method, uri) in ADMIN_SURFACES {
        let request = match http_method {
            "POST" => post_request(uri, json!({}), None),
            _ => get_request(uri, None),
        };

        let app = create_test_app(&config).await;
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {} {}",
            http_method,
            uri
        );
    }
}

#[tokio::test]
async fn test_admin_routes_reject_non_admin_users() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::default();
    let patient = TestUser::patient("someone@else.com");
    let token = JwtTestUtils::create_test_token(&patient, &test_config.jwt_secret, Some(1));

    for (http_method, uri) in ADMIN_SURFACES {
        let request = match http_method {
            "POST" => post_request(uri, json!({}), Some(&token)),
            _ => get_request(uri, Some(&token)),
        };

        let app = create_test_app(&config).await;
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "expected 403 for {} {}",
            http_method,
            uri
        );

        let body = response_json(response).await;
        assert_eq!(body["error"], "Forbidden");
    }
}

#[tokio::test]
async fn test_stats_aggregate_both_collections() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/health_reports"))
        .and(query_param("select", "user_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "user_id": "u1" },
            { "user_id": "u1" },
            { "user_id": "u2" },
            { "user_id": null }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_bookings"))
        .and(query_param("select", "status,amount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "status": "pending", "amount": 199 },
            { "status": "completed", "amount": 199 },
            { "status": "confirmed", "amount": null }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config).await;
    let response = app
        .oneshot(get_request("/admin/stats", Some(&admin_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["totalUsers"], 2);
    assert_eq!(body["stats"]["totalReports"], 4);
    assert_eq!(body["stats"]["totalBookings"], 3);
    assert_eq!(body["stats"]["totalRevenue"], 398);
    assert_eq!(body["stats"]["pendingBookings"], 1);
    assert_eq!(body["stats"]["completedBookings"], 1);
}

#[tokio::test]
async fn test_user_directory_is_built_from_stored_snapshots() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/health_reports"))
        .and(query_param("select", "user_id,user_email,created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "user_id": "u1", "user_email": "one@example.com", "created_at": "2024-02-01T00:00:00Z" },
            { "user_id": "u1", "user_email": "one@example.com", "created_at": "2024-02-02T00:00:00Z" },
            { "user_id": "u2", "user_email": null, "created_at": "2024-03-01T00:00:00Z" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_bookings"))
        .and(query_param("select", "user_id,name,email,created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "user_id": "u1", "name": "User One", "email": "one@example.com", "created_at": "2024-02-03T00:00:00Z" },
            { "user_id": null, "name": "Walk In", "email": "walkin@example.com", "created_at": "2024-02-04T00:00:00Z" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config).await;
    let response = app
        .oneshot(get_request("/admin/users", Some(&admin_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);

    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);

    // Newest first: u2 first appeared in March, u1 in February.
    assert_eq!(users[0]["id"], "u2");
    assert_eq!(users[0]["email"], "N/A");
    assert_eq!(users[0]["name"], "Anonymous");
    assert_eq!(users[0]["reportsCount"], 1);
    assert_eq!(users[0]["bookingsCount"], 0);

    assert_eq!(users[1]["id"], "u1");
    assert_eq!(users[1]["email"], "one@example.com");
    assert_eq!(users[1]["name"], "User One");
    assert_eq!(users[1]["reportsCount"], 2);
    assert_eq!(users[1]["bookingsCount"], 1);
}

#[tokio::test]
async fn test_listings_return_raw_rows_newest_first() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/health_reports"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::health_report_row(Some("u1"))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_bookings"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_row(Some("u1"), "confirmed", "paid"),
            MockSupabaseResponses::booking_row(None, "pending", "pending")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::subscription_row("u1", "pending")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = admin_token();

    let response = create_test_app(&config)
        .await
        .oneshot(get_request("/admin/reports", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["reports"].as_array().unwrap().len(), 1);

    let response = create_test_app(&config)
        .await
        .oneshot(get_request("/admin/bookings", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 2);
    assert_eq!(body["bookings"][0]["status"], "confirmed");

    let response = create_test_app(&config)
        .await
        .oneshot(get_request("/admin/subscriptions", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["subscriptions"][0]["status"], "pending");
}

#[tokio::test]
async fn test_approving_a_pending_subscription_opens_a_validity_window() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    let pending = MockSupabaseResponses::subscription_row("user-1", "pending");
    let id = pending["id"].as_str().unwrap().to_string();

    let mut approved = MockSupabaseResponses::subscription_row("user-1", "approved");
    approved["id"] = json!(id);

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([pending])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The patch must flip the status and write both validity dates.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/subscriptions"))
        .and(query_param("id", format!("eq.{}", id)))
        .and(body_partial_json(json!({ "status": "approved" })))
        .and(body_string_contains("\"start_date\""))
        .and(body_string_contains("\"end_date\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([approved])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config).await;
    let response = app
        .oneshot(post_request(
            "/admin/subscriptions",
            json!({ "subscriptionId": id, "action": "approve" }),
            Some(&admin_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Subscription approved successfully");
    assert_eq!(body["subscription"]["status"], "approved");
    assert!(body["subscription"]["start_date"].as_str().is_some());
    assert!(body["subscription"]["end_date"].as_str().is_some());
}

#[tokio::test]
async fn test_rejecting_leaves_validity_dates_unset() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    let pending = MockSupabaseResponses::subscription_row("user-1", "pending");
    let id = pending["id"].as_str().unwrap().to_string();

    let mut rejected = MockSupabaseResponses::subscription_row("user-1", "rejected");
    rejected["id"] = json!(id);

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([pending])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // A rejection patch must not touch the validity window.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/subscriptions"))
        .and(body_string_contains("start_date"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/subscriptions"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([rejected])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config).await;
    let response = app
        .oneshot(post_request(
            "/admin/subscriptions",
            json!({ "subscriptionId": id, "action": "reject" }),
            Some(&admin_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Subscription rejected successfully");
    assert_eq!(body["subscription"]["status"], "rejected");
    assert!(body["subscription"]["start_date"].is_null());
}

#[tokio::test]
async fn test_review_is_refused_once_finalized() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    let approved = MockSupabaseResponses::subscription_row("user-1", "approved");
    let id = approved["id"].as_str().unwrap().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([approved])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config).await;
    let response = app
        .oneshot(post_request(
            "/admin/subscriptions",
            json!({ "subscriptionId": id, "action": "approve" }),
            Some(&admin_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Subscription already approved");
}

#[tokio::test]
async fn test_review_requires_both_fields() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let token = admin_token();
    let bodies = vec![
        json!({}),
        json!({ "subscriptionId": "sub-1" }),
        json!({ "action": "approve" }),
        json!({ "subscriptionId": "  ", "action": "approve" }),
    ];

    for body in bodies {
        let app = create_test_app(&config).await;
        let response = app
            .oneshot(post_request("/admin/subscriptions", body.clone(), Some(&token)))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for body {}",
            body
        );

        let error = response_json(response).await;
        assert_eq!(error["error"], "Missing required fields");
    }
}

#[tokio::test]
async fn test_unknown_review_actions_are_rejected() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config).await;
    let response = app
        .oneshot(post_request(
            "/admin/subscriptions",
            json!({ "subscriptionId": "sub-1", "action": "escalate" }),
            Some(&admin_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Invalid action: escalate");
}

#[tokio::test]
async fn test_reviewing_a_missing_subscription_is_not_found() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config).await;
    let response = app
        .oneshot(post_request(
            "/admin/subscriptions",
            json!({ "subscriptionId": "missing", "action": "approve" }),
            Some(&admin_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Subscription not found");
}

#[tokio::test]
async fn test_store_failures_surface_a_stable_message() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockSupabaseResponses::error_response("connection refused", "08006"),
        ))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config).await;
    let response = app
        .oneshot(get_request("/admin/stats", Some(&admin_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Failed to fetch stats");
}
