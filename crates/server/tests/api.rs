use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use chrono::{Datelike, Utc};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, TokenKeys, router};

const SECRET: &[u8] = b"test-secret";

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
        tokens: Arc::new(TokenKeys::new(SECRET, 3600)),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Registers a user and returns a bearer token for it.
async fn signup(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"name": "Test", "email": email, "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn category_id(app: &Router, token: &str, name: &str) -> i64 {
    let (_, body) = send(app, "GET", "/transactions/categories", Some(token), None).await;
    body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .unwrap()["category_id"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn register_login_and_me() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;

    let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "alice@example.com");

    let user_id = body["user"]["user_id"].as_i64().unwrap() as i32;
    assert_eq!(TokenKeys::new(SECRET, 3600).verify(&token), Ok(user_id));
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app().await;
    signup(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"name": "Again", "email": "alice@example.com", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn bad_credentials_are_401() {
    let app = app().await;
    signup(&app, "alice@example.com").await;

    for (email, password) in [("alice@example.com", "wrong"), ("bob@example.com", "secret")] {
        let (status, body) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }
}

#[tokio::test]
async fn token_problems_are_reported() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/transactions/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization token is missing");

    let (status, body) = send(&app, "GET", "/transactions/", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid token");

    let expired = TokenKeys::new(SECRET, -3600).issue(1).unwrap();
    let (status, body) = send(&app, "GET", "/transactions/", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token has expired");
}

#[tokio::test]
async fn malformed_json_is_500() {
    let app = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn expense_shows_up_in_dashboard() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;
    let food = category_id(&app, &token, "Food & Dining").await;

    let (status, body) = send(
        &app,
        "POST",
        "/transactions/",
        Some(&token),
        Some(json!({"type": "expense", "amount": 50, "category_id": food, "date": "2024-03-05"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transaction"]["category_name"], "Food & Dining");
    assert_eq!(body["transaction"]["date"], "2024-03-05");

    let (status, body) = send(
        &app,
        "GET",
        "/reports/dashboard?month=3&year=2024",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_expenses"], 50.0);
    assert_eq!(body["month"], 3);
    assert_eq!(body["year"], 2024);
    assert_eq!(
        body["category_spending"],
        json!([{"category": "Food & Dining", "amount": 50.0}])
    );

    let (status, body) = send(
        &app,
        "GET",
        "/reports/dashboard?month=13&year=2024",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Month must be between 1 and 12");
}

#[tokio::test]
async fn transaction_validation_messages() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;
    let food = category_id(&app, &token, "Food & Dining").await;

    let (status, body) = send(
        &app,
        "POST",
        "/transactions",
        Some(&token),
        Some(json!({"type": "expense", "category_id": food})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Type, amount, and category are required");

    let (status, body) = send(
        &app,
        "POST",
        "/transactions",
        Some(&token),
        Some(json!({"type": "gift", "amount": "10", "category_id": food})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Type must be either income or expense");

    let (status, body) = send(
        &app,
        "GET",
        "/transactions/?start_date=yesterday",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format");
}

#[tokio::test]
async fn budget_twice_in_a_month_conflicts() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;
    let food = category_id(&app, &token, "Food & Dining").await;
    let budget = json!({"category_id": food.to_string(), "amount": "400"});

    let (status, body) = send(&app, "POST", "/budgets/", Some(&token), Some(budget.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["budget_id"].is_i64());

    let (status, body) = send(&app, "POST", "/budgets/", Some(&token), Some(budget)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Budget already exists for this category this month"
    );

    let (status, body) = send(&app, "GET", "/budgets", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["budgets"][0]["category_name"], "Food & Dining");
    assert_eq!(body["budgets"][0]["period"], "monthly");
    assert_eq!(body["budgets"][0]["spent"], 0.0);
}

#[tokio::test]
async fn contributions_update_progress() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/goals/",
        Some(&token),
        Some(json!({"name": "Bike", "target_amount": 300, "deadline": "2030-06-01T00:00:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["goal"]["deadline"], "2030-06-01");
    let goal_id = body["goal"]["goal_id"].as_i64().unwrap();

    let uri = format!("/goals/{goal_id}/contribute");
    send(&app, "POST", &uri, Some(&token), Some(json!({"amount": 60}))).await;
    let (status, body) = send(&app, "POST", &uri, Some(&token), Some(json!({"amount": 40}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"]["current_amount"], 100.0);
    assert_eq!(body["goal"]["progress"], 33.33);

    let (status, body) = send(&app, "POST", &uri, Some(&token), Some(json!({"amount": -1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Amount must be positive");

    let (status, body) = send(
        &app,
        "POST",
        "/goals",
        Some(&token),
        Some(json!({"name": "Car", "target_amount": 10, "deadline": "soon"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid deadline format");
}

#[tokio::test]
async fn foreign_rows_are_not_found() {
    let app = app().await;
    let alice = signup(&app, "alice@example.com").await;
    let bob = signup(&app, "bob@example.com").await;
    let food = category_id(&app, &alice, "Food & Dining").await;

    let (_, body) = send(
        &app,
        "POST",
        "/transactions/",
        Some(&alice),
        Some(json!({"type": "expense", "amount": 5, "category_id": food})),
    )
    .await;
    let tx_id = body["transaction"]["transaction_id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/budgets/",
        Some(&alice),
        Some(json!({"category_id": food, "amount": 100})),
    )
    .await;
    let budget_id = body["budget_id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/goals/",
        Some(&alice),
        Some(json!({"name": "Bike", "target_amount": 300})),
    )
    .await;
    let goal_id = body["goal"]["goal_id"].as_i64().unwrap();

    for (uri, error) in [
        (format!("/transactions/{tx_id}"), "Transaction not found"),
        (format!("/budgets/{budget_id}"), "Budget not found"),
        (format!("/goals/{goal_id}"), "Goal not found"),
    ] {
        let (status, body) = send(&app, "DELETE", &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], error);

        let (status, _) = send(&app, "DELETE", &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn monthly_trend_defaults_to_current_year() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "GET",
        "/reports/monthly-trend?year=nope",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let trend = body["monthly_trend"].as_array().unwrap();
    assert_eq!(trend.len(), 12);
    assert!(trend.iter().all(|m| m["income"] == 0.0 && m["savings"] == 0.0));
    assert_eq!(trend[11]["month"], 12);

    let (_, body) = send(&app, "GET", "/reports/dashboard", Some(&token), None).await;
    assert_eq!(body["year"], Utc::now().year());
}

#[tokio::test]
async fn out_of_range_months_are_rejected() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;

    for month in ["-1", "0", "13"] {
        let uri = format!("/reports/dashboard?month={month}&year=2024");
        let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "month={month}");
        assert_eq!(body["error"], "Month must be between 1 and 12");
    }
}

#[tokio::test]
async fn bad_path_ids_answer_with_json() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/transactions/abc",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "DELETE", "/goals/99999999999", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn routes_are_served_under_api_prefix() {
    let app = app().await;
    let token = signup(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, body) = send(&app, "GET", "/api/transactions/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["transactions"].is_array());

    let (status, _) = send(&app, "GET", "/api/transactions/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn spawned_server_answers_over_tcp() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr =
        server::spawn_with_listener(engine, TokenKeys::new(SECRET, 3600), listener).unwrap();

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /api/auth/me HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 401"), "{response}");
    assert!(response.contains("Authorization token is missing"));
}
