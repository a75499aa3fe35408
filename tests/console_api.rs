use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use operator_hub::{
    AppState,
    access::{CredentialStore, Feature, Plan, UserAccount},
    config::Config,
    error::DataError,
    providers::{
        ChatMessage, Fan, FanDirectory, FanId, MessagingBackend, Providers, Segment,
        stub::{StubAnalytics, StubFanDirectory},
    },
    router::create_router,
};

fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".into(),
        server_port: 0,
        api_base_uri: "/api".into(),
        jwt_secret: "integration-secret".into(),
        jwt_expiration_secs: 3600,
        rate_limit_window_secs: 60,
        rate_limit_requests: 10_000,
        send_timeout_ms: 1000,
    }
}

fn demo_app() -> Router {
    let credentials = Arc::new(CredentialStore::demo(Utc::now()));
    create_router(AppState::new(test_config(), credentials, Providers::stub()))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = body.map_or_else(Body::empty, |v| Body::from(v.to_string()));

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn premium_store(expires_at: DateTime<Utc>) -> CredentialStore {
    CredentialStore::new([UserAccount::new(
        "boss",
        "pw",
        Plan::Premium,
        expires_at,
        &["A", "B"],
        &[
            Feature::Chats,
            Feature::Content,
            Feature::Analytics,
            Feature::AiSuggestions,
        ],
    )])
}

fn two_fans() -> Vec<Fan> {
    vec![
        Fan {
            id: 1,
            name: "Vic".into(),
            segment: Segment::Vip,
            revenue: 500,
            has_new: false,
        },
        Fan {
            id: 2,
            name: "Fred".into(),
            segment: Segment::Free,
            revenue: 0,
            has_new: true,
        },
    ]
}

/// Fan directory whose contents the test can swap out between requests.
#[derive(Clone, Default)]
struct SharedFans(Arc<Mutex<Vec<Fan>>>);

impl SharedFans {
    fn set(&self, fans: Vec<Fan>) {
        *self.0.lock().unwrap() = fans;
    }
}

#[async_trait]
impl FanDirectory for SharedFans {
    async fn list_fans(&self, _account: &str) -> Result<Vec<Fan>, DataError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

/// Messaging backend that accepts messages long after any sane timeout.
struct SlowMessaging;

#[async_trait]
impl MessagingBackend for SlowMessaging {
    async fn get_history(&self, _fan_id: FanId) -> Result<Vec<ChatMessage>, DataError> {
        Ok(Vec::new())
    }

    async fn send_message(&self, _fan_id: FanId, _text: &str) -> Result<(), DataError> {
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        Ok(())
    }
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0, "login failed: {body}");
    body["resp_data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = demo_app();
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn premium_login_returns_full_dashboard() {
    let app = demo_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    let dashboard = &body["resp_data"]["dashboard"];
    assert_eq!(dashboard["username"], "admin");
    assert_eq!(dashboard["plan"]["plan"], "premium");
    assert_eq!(dashboard["current_account"], "AI_Girl_1");
    assert_eq!(dashboard["current_page"], "chats_page");
    assert!(dashboard["days_left"].as_i64().unwrap() >= 364);

    let locked: Vec<bool> = dashboard["navigation"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["locked"].as_bool().unwrap())
        .collect();
    assert_eq!(locked, vec![false, false, false]);
}

#[tokio::test]
async fn bad_credentials_are_reported_inline() {
    let app = demo_app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "demo", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1002);
    assert_eq!(body["msg"], "Invalid username or password");
    assert!(body.get("resp_data").is_none());

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "", "password": "" })),
    )
    .await;
    assert_eq!(body["code"], 1000);
}

#[tokio::test]
async fn expired_subscription_cannot_sign_in() {
    let store = CredentialStore::new([UserAccount::new(
        "lapsed",
        "pw",
        Plan::Basic,
        Utc::now() - Duration::days(1),
        &["A"],
        &[Feature::Chats],
    )]);
    let app = create_router(AppState::new(
        test_config(),
        Arc::new(store),
        Providers::stub(),
    ));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "lapsed", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1006);
}

#[tokio::test]
async fn console_routes_require_a_session() {
    let app = demo_app();

    let (status, body) = call(&app, Method::GET, "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1008);

    let (status, _) = call(&app, Method::GET, "/api/chats", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn trial_user_is_kept_off_locked_pages() {
    let app = demo_app();
    let token = login(&app, "demo", "demo").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/navigate",
        Some(&token),
        Some(json!({ "page": "content_page" })),
    )
    .await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["result"], "upgrade_required");
    assert_eq!(body["resp_data"]["page"], "chats_page");
    assert_eq!(body["resp_data"]["notice"]["feature"], "content");

    let (_, body) = call(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(body["resp_data"]["current_page"], "chats_page");

    let (_, body) = call(&app, Method::GET, "/api/analytics", Some(&token), None).await;
    assert_eq!(body["code"], 1003);

    let (_, body) = call(&app, Method::POST, "/api/chats/suggest", Some(&token), None).await;
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn navigation_persists_for_entitled_users() {
    let app = demo_app();
    let token = login(&app, "operator1", "password123").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/navigate",
        Some(&token),
        Some(json!({ "page": "content_page" })),
    )
    .await;
    assert_eq!(body["resp_data"]["result"], "navigated");

    let (_, body) = call(&app, Method::GET, "/api/page", Some(&token), None).await;
    assert_eq!(body["resp_data"]["page"], "content");
    assert!(body["resp_data"]["view"]["generated"].is_null());
}

#[tokio::test]
async fn fan_selection_follows_the_segment_filter() {
    let store = premium_store(Utc::now() + Duration::days(30));
    let providers = Providers::stub().with_fans(Arc::new(StubFanDirectory::new(two_fans())));
    let app = create_router(AppState::new(test_config(), Arc::new(store), providers));
    let token = login(&app, "boss", "pw").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/accounts/select",
        Some(&token),
        Some(json!({ "account": "A" })),
    )
    .await;
    assert_eq!(body["resp_data"]["current_account"], "A");

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/chats/select",
        Some(&token),
        Some(json!({ "fan_id": 2 })),
    )
    .await;
    assert_eq!(body["resp_data"]["selected_fan"]["id"], 2);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/chats/filter",
        Some(&token),
        Some(json!({ "segments": ["VIP"] })),
    )
    .await;
    assert_eq!(body["resp_data"]["selected_fan"]["id"], 1);
    assert_eq!(body["resp_data"]["fans"].as_array().unwrap().len(), 1);

    // fan 2 is filtered out now
    let (_, body) = call(
        &app,
        Method::POST,
        "/api/chats/select",
        Some(&token),
        Some(json!({ "fan_id": 2 })),
    )
    .await;
    assert_eq!(body["code"], 1009);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/chats/filter",
        Some(&token),
        Some(json!({ "segments": ["Buyer"] })),
    )
    .await;
    assert!(body["resp_data"]["selected_fan"].is_null());
    assert_eq!(
        body["resp_data"]["notice"],
        "No fans match the selected segments"
    );

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/accounts/select",
        Some(&token),
        Some(json!({ "account": "C" })),
    )
    .await;
    assert_eq!(body["code"], 1009);
}

#[tokio::test]
async fn suggestion_fills_the_draft_and_sending_clears_it() {
    let app = demo_app();
    let token = login(&app, "admin", "admin123").await;

    let (_, body) = call(&app, Method::POST, "/api/chats/suggest", Some(&token), None).await;
    assert_eq!(body["code"], 0);
    let draft = body["resp_data"]["draft"].as_str().unwrap();
    assert!(draft.contains("Mike"));

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/chats/send",
        Some(&token),
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(body["code"], 1000);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/chats/send",
        Some(&token),
        Some(json!({ "text": "See you tonight" })),
    )
    .await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["fan_id"], 1);
    assert_eq!(body["resp_data"]["view"]["draft"], "");
}

#[tokio::test]
async fn generated_variants_can_be_picked_and_saved() {
    let app = demo_app();
    let token = login(&app, "admin", "admin123").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/content/selection/save",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["code"], 1009);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/content/generate",
        Some(&token),
        Some(json!({ "prompt": "beach sunset", "variants": 3 })),
    )
    .await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["generated"]["variant_count"], 3);

    for index in [0, 2] {
        let uri = format!("/api/content/variants/{index}/toggle");
        let (_, body) = call(&app, Method::POST, &uri, Some(&token), None).await;
        assert_eq!(body["code"], 0);
    }

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/content/variants/7/toggle",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["code"], 1009);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/content/selection/save",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["count"], 2);
    assert_eq!(body["resp_data"]["message"], "Saved 2 variants");

    let (_, body) = call(&app, Method::POST, "/api/content/clear", Some(&token), None).await;
    assert!(body["resp_data"]["generated"].is_null());
    assert_eq!(body["resp_data"]["selected_count"], 0);
}

#[tokio::test]
async fn analytics_reflect_updated_goals() {
    let app = demo_app();
    let token = login(&app, "admin", "admin123").await;

    let (_, body) = call(&app, Method::GET, "/api/analytics", Some(&token), None).await;
    assert_eq!(body["code"], 0);
    let metrics = &body["resp_data"]["metrics"];
    assert_eq!(metrics["series"].as_array().unwrap().len(), 7);
    assert_eq!(metrics["top_fans"][0]["name"], "Dave");

    let (_, body) = call(
        &app,
        Method::PUT,
        "/api/analytics/goals",
        Some(&token),
        Some(json!({ "target_revenue": 5000, "target_subs": 50 })),
    )
    .await;
    assert_eq!(body["code"], 0);
    let goals = &body["resp_data"]["metrics"]["goals"];
    assert_eq!(goals["revenue"]["target"], 5000);
    assert_eq!(goals["revenue"]["remaining"], 0);
    assert_eq!(goals["subscribers"]["remaining"], 0);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = demo_app();
    let token = login(&app, "operator1", "password123").await;

    let (_, body) = call(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["authenticated"], false);

    let (status, _) = call(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn emptied_fan_directory_drops_the_selection() {
    let directory = SharedFans::default();
    directory.set(two_fans());
    let providers = Providers::stub().with_fans(Arc::new(directory.clone()));
    let store = premium_store(Utc::now() + Duration::days(30));
    let app = create_router(AppState::new(test_config(), Arc::new(store), providers));
    let token = login(&app, "boss", "pw").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/chats/select",
        Some(&token),
        Some(json!({ "fan_id": 2 })),
    )
    .await;
    assert_eq!(body["resp_data"]["selected_fan"]["id"], 2);

    directory.set(Vec::new());
    let (_, body) = call(&app, Method::GET, "/api/chats", Some(&token), None).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["notice"], "No fans available");
    assert!(body["resp_data"]["selected_fan"].is_null());

    // fan 2 is back, but the old selection must not come back with it
    directory.set(two_fans());
    let (_, body) = call(&app, Method::GET, "/api/chats", Some(&token), None).await;
    assert_eq!(body["resp_data"]["selected_fan"]["id"], 1);
}

#[tokio::test]
async fn unparseable_input_is_answered_in_the_envelope() {
    let app = demo_app();
    let token = login(&app, "admin", "admin123").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/content/generate",
        Some(&token),
        Some(json!({ "prompt": "beach sunset", "variants": 300 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1000);
    assert_eq!(body["msg"], "Variant count must be between 1 and 8");

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/content/generate",
        Some(&token),
        Some(json!({ "prompt": "beach sunset", "variants": 2 })),
    )
    .await;
    assert_eq!(body["code"], 0);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/content/variants/-1/toggle",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1009);
    assert_eq!(body["msg"], "Variant -1 does not exist, 2 variants were generated");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/content/variants/first/toggle",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1000);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/navigate",
        Some(&token),
        Some(json!({ "page": "settings_page" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1000);
    assert!(body["msg"].as_str().unwrap().contains("settings_page"));

    let (_, body) = call(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(body["resp_data"]["current_page"], "chats_page");
}

#[tokio::test]
async fn slow_messaging_backend_times_out() {
    let config = Config {
        send_timeout_ms: 50,
        ..test_config()
    };
    let providers = Providers::stub().with_messaging(Arc::new(SlowMessaging));
    let credentials = Arc::new(CredentialStore::demo(Utc::now()));
    let app = create_router(AppState::new(config, credentials, providers));
    let token = login(&app, "admin", "admin123").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/chats/send",
        Some(&token),
        Some(json!({ "text": "Still there?" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 5001);
}

#[tokio::test]
async fn plan_lapsing_mid_session_signs_the_operator_out() {
    let state = AppState::new(
        test_config(),
        Arc::new(premium_store(Utc::now() + Duration::milliseconds(400))),
        Providers::stub(),
    );
    let sessions = state.sessions.clone();
    let app = create_router(state);
    let token = login(&app, "boss", "pw").await;
    assert_eq!(sessions.len().await, 1);

    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    let (status, body) = call(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1007);
    assert!(sessions.is_empty().await);

    let (_, body) = call(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(body["code"], 1008);
}

#[tokio::test]
async fn empty_analytics_series_shows_a_notice() {
    let providers =
        Providers::stub().with_analytics(Arc::new(StubAnalytics::new(Vec::new())));
    let credentials = Arc::new(CredentialStore::demo(Utc::now()));
    let app = create_router(AppState::new(test_config(), credentials, providers));
    let token = login(&app, "admin", "admin123").await;

    let (status, body) = call(&app, Method::GET, "/api/analytics", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["account"], "AI_Girl_1");
    assert_eq!(body["resp_data"]["notice"], "No analytics data to display yet");
    assert!(body["resp_data"]["metrics"].is_null());
}

#[tokio::test]
async fn repeated_logins_without_logout_do_not_pile_up() {
    let config = Config {
        jwt_expiration_secs: 0,
        ..test_config()
    };
    let state = AppState::new(
        config,
        Arc::new(CredentialStore::demo(Utc::now())),
        Providers::stub(),
    );
    let sessions = state.sessions.clone();
    let app = create_router(state);

    // zero lifetime: each login sweeps the previous, already lapsed session
    for _ in 0..10 {
        call(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "admin123" })),
        )
        .await;
    }
    assert_eq!(sessions.len().await, 1);
}
