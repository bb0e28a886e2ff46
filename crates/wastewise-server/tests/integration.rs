use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;
use wastewise_core::config::Config;
use wastewise_core::store::Store;
use wastewise_core::types::{Product, User};
use wastewise_server::coach::{CoachBackend, GeminiClient};
use wastewise_server::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct TestApp {
    _dir: TempDir,
    state: AppState,
    token: String,
}

/// Initialize a project in a temp dir and register one household.
fn setup() -> TestApp {
    let dir = TempDir::new().unwrap();
    Config::default().save(dir.path()).unwrap();
    let state = AppState::open(dir.path()).unwrap();
    let token = state
        .store
        .create_user(&User::new("home@example.com", "Home", 3))
        .unwrap();
    TestApp {
        _dir: dir,
        state,
        token,
    }
}

fn setup_with_coach(coach: CoachBackend) -> TestApp {
    let dir = TempDir::new().unwrap();
    let store = Store::open_root(dir.path()).unwrap();
    let token = store
        .create_user(&User::new("home@example.com", "Home", 3))
        .unwrap();
    let state = AppState::new(dir.path().to_path_buf(), Config::default(), store, coach);
    TestApp {
        _dir: dir,
        state,
        token,
    }
}

async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut req = axum::http::Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => req.body(axum::body::Body::empty()).unwrap(),
    };
    let router = wastewise_server::build_router(app.state.clone());
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, Some(app.token.as_str()), None).await
}

async fn post(app: &TestApp, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(app.token.as_str()), Some(body)).await
}

fn waste(k: f64, p: f64, pa: f64, g: f64) -> serde_json::Value {
    serde_json::json!({ "kitchen_kg": k, "plastic_kg": p, "paper_kg": pa, "garden_kg": g })
}

// ---------------------------------------------------------------------------
// Health and auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_public() {
    let app = setup();
    let (status, json) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let app = setup();
    for uri in [
        "/api/calculations",
        "/api/waste-logs",
        "/api/nudges",
        "/api/ecopoints",
        "/api/events",
    ] {
        let (status, json) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(json, serde_json::json!({ "error": "Unauthorized" }));
    }
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let app = setup();
    let (status, _) = send(&app, "GET", "/api/nudges", Some("ww_nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn calculation_is_saved_and_awards_points() {
    let app = setup();
    let (status, json) = post(&app, "/api/calculations", waste(2.0, 1.0, 0.5, 1.5)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert!(json["calculation_id"].is_string());
    assert_eq!(json["results"]["biogasLiters"], 1.3);
    assert_eq!(json["results"]["electricityKwh"], 0.1);
    assert_eq!(json["results"]["costSavingsInr"], 1);
    assert_eq!(json["results"]["co2ReductionKg"], 383.3);
    assert_eq!(json["results"]["fertilizerKg"], 15.8);
    assert_eq!(json["results"]["monthlyProjection"]["biogas"], 37.5);
    assert_eq!(json["ecoPointsEarned"], 50);

    let (status, json) = get(&app, "/api/calculations").await;
    assert_eq!(status, StatusCode::OK);
    let calcs = json["calculations"].as_array().unwrap();
    assert_eq!(calcs.len(), 1);
    assert_eq!(calcs[0]["biogas_l"], 1.3);

    let (_, json) = get(&app, "/api/ecopoints").await;
    assert_eq!(json["totalEarned"], 50);
    assert_eq!(json["availablePoints"], 50);
    let activity = &json["recentActivities"][0];
    assert_eq!(activity["activity_type"], "waste_tracking");
    assert_eq!(
        activity["activity"],
        "Tracked 5.0kg of waste - Biogas: 1.3L, CO₂ saved: 383.3kg"
    );
}

#[tokio::test]
async fn calculation_out_of_range_lists_field_issues() {
    let app = setup();
    let (status, json) = post(&app, "/api/calculations", waste(11.0, 1.0, 0.5, 6.0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let paths: Vec<&str> = json["error"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["kitchen_kg", "garden_kg"]);

    let (_, json) = get(&app, "/api/calculations").await;
    assert!(json["calculations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn calculation_with_missing_field_is_bad_request() {
    let app = setup();
    let (status, json) = post(
        &app,
        "/api/calculations",
        serde_json::json!({ "kitchen_kg": 1.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"][0]["path"], "body");
}

#[tokio::test]
async fn calculation_history_is_capped() {
    let app = setup();
    for _ in 0..12 {
        let (status, _) = post(&app, "/api/calculations", waste(1.0, 0.0, 0.0, 1.0)).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, json) = get(&app, "/api/calculations").await;
    assert_eq!(json["calculations"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn preview_needs_no_auth_and_saves_nothing() {
    let app = setup();
    let (status, json) = send(
        &app,
        "POST",
        "/api/calculations/preview",
        None,
        Some(waste(10.0, 5.0, 3.0, 5.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"]["biogasLiters"], 5.5);
    assert_eq!(json["results"]["costSavingsInr"], 3);
    let weekly = json["weekly"].as_array().unwrap();
    assert_eq!(weekly.len(), 4);
    assert_eq!(weekly[0]["week"], "Week 1");

    let (_, json) = get(&app, "/api/calculations").await;
    assert!(json["calculations"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Waste logs and nudges
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nudges_start_with_logging_prompt() {
    let app = setup();
    let (status, json) = get(&app, "/api/nudges").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["nudges"],
        serde_json::json!([{
            "type": "info",
            "text": "Start logging your waste to get personalized insights!"
        }])
    );
}

#[tokio::test]
async fn logged_waste_drives_nudges() {
    let app = setup();
    let (status, json) = post(&app, "/api/waste-logs", waste(1.0, 0.5, 0.0, 0.5)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["log"]["total_kg"], 2.0);

    let (_, json) = get(&app, "/api/waste-logs").await;
    assert_eq!(json["logs"].as_array().unwrap().len(), 1);

    let (_, json) = get(&app, "/api/nudges").await;
    let nudges = json["nudges"].as_array().unwrap();
    assert_eq!(nudges.len(), 2);
    assert_eq!(nudges[0]["type"], "success");
    assert_eq!(
        nudges[0]["text"],
        "Amazing! You're generating only 2.0kg waste daily. Keep it up!"
    );
    assert_eq!(nudges[1]["type"], "tip");
    assert_eq!(
        nudges[1]["text"],
        "You could save ₹480 monthly by composting your organic waste!"
    );
}

#[tokio::test]
async fn heavy_plastic_log_triggers_warning() {
    let app = setup();
    post(&app, "/api/waste-logs", waste(2.0, 3.0, 0.0, 1.0)).await;
    let (_, json) = get(&app, "/api/nudges").await;
    let kinds: Vec<&str> = json["nudges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["warning", "tip"]);
}

#[tokio::test]
async fn old_logs_fall_outside_nudge_window() {
    let app = setup();
    let mut body = waste(1.0, 0.0, 0.0, 1.0);
    body["date"] = serde_json::json!("2020-01-01");
    let (status, _) = post(&app, "/api/waste-logs", body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, json) = get(&app, "/api/nudges").await;
    assert_eq!(json["nudges"][0]["type"], "info");
}

#[tokio::test]
async fn future_dated_log_is_rejected() {
    let app = setup();
    let mut body = waste(1.0, 0.0, 0.0, 1.0);
    body["date"] = serde_json::json!("2999-01-01");
    let (status, json) = post(&app, "/api/waste-logs", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"][0]["path"], "date");
}

// ---------------------------------------------------------------------------
// Eco points and store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn award_requires_points_and_activity() {
    let app = setup();
    for body in [
        serde_json::json!({ "activity": "composted" }),
        serde_json::json!({ "points": 0, "activity": "composted" }),
        serde_json::json!({ "points": 20, "activity": "" }),
    ] {
        let (status, json) = post(&app, "/api/ecopoints", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Points and activity are required");
    }

    let (status, json) = post(
        &app,
        "/api/ecopoints",
        serde_json::json!({ "points": 20, "activity": "Composted for a week" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (_, json) = get(&app, "/api/ecopoints").await;
    assert_eq!(json["totalEarned"], 20);
    assert_eq!(json["recentActivities"][0]["activity_type"], "general");
}

#[tokio::test]
async fn recent_activities_are_capped_at_five() {
    let app = setup();
    for i in 1..=7 {
        post(
            &app,
            "/api/ecopoints",
            serde_json::json!({ "points": i, "activity": format!("task {i}") }),
        )
        .await;
    }
    let (_, json) = get(&app, "/api/ecopoints").await;
    assert_eq!(json["totalEarned"], 28);
    assert_eq!(json["recentActivities"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn store_purchase_flow() {
    let app = setup();
    let product = Product::new("Cloth Bag", "Reusable", 50, "shopping", 1);
    app.state.store.insert_product(&product).unwrap();
    let product_id = product.id.to_string();

    let (status, json) = send(&app, "GET", "/api/ecostore", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["products"][0]["name"], "Cloth Bag");

    let (status, json) = post(&app, "/api/ecostore", serde_json::json!({ "productId": product_id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Insufficient eco points");

    post(
        &app,
        "/api/ecopoints",
        serde_json::json!({ "points": 80, "activity": "gift" }),
    )
    .await;

    let (status, json) = post(&app, "/api/ecostore", serde_json::json!({ "productId": product_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["purchase"]["points_spent"], 50);

    let (_, json) = get(&app, "/api/ecopoints").await;
    assert_eq!(json["totalSpent"], 50);
    assert_eq!(json["availablePoints"], 30);

    let (_, json) = send(&app, "GET", "/api/ecostore", None, None).await;
    assert!(json["products"].as_array().unwrap().is_empty());

    let (status, _) = post(&app, "/api/ecostore", serde_json::json!({ "productId": product_id })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn purchase_of_unknown_or_malformed_product() {
    let app = setup();
    let (status, _) = post(
        &app,
        "/api/ecostore",
        serde_json::json!({ "productId": uuid::Uuid::new_v4().to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/api/ecostore", serde_json::json!({ "productId": "bag" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/api/ecostore", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Locations and events
// ---------------------------------------------------------------------------

async fn add_bangalore_locations(app: &TestApp) {
    for location in wastewise_core::seed::demo_locations() {
        let (status, _) = send(
            app,
            "POST",
            "/api/locations",
            None,
            Some(serde_json::to_value(&location).unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn locations_filter_by_type() {
    let app = setup();
    add_bangalore_locations(&app).await;

    let (status, json) = send(&app, "GET", "/api/locations", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["locations"].as_array().unwrap().len(), 3);

    let (_, json) = send(&app, "GET", "/api/locations?type=compost", None, None).await;
    let locations = json["locations"].as_array().unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0]["name"], "Eco Compost Hub");
    assert!(locations[0].get("distance_km").is_none());
}

#[tokio::test]
async fn locations_filter_by_radius() {
    let app = setup();
    add_bangalore_locations(&app).await;

    let (status, json) = send(
        &app,
        "GET",
        "/api/locations?latitude=12.9716&longitude=77.5946&radius=3",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["locations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Community Biogas Digester - Bangalore", "Waste Pickup Route - Zone A"]
    );
    assert_eq!(json["locations"][0]["distance_km"], 0.0);

    let (_, json) = send(
        &app,
        "GET",
        "/api/locations?latitude=12.9716&longitude=77.5946",
        None,
        None,
    )
    .await;
    assert_eq!(json["locations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn locations_reject_bad_query_and_body() {
    let app = setup();
    let (status, _) = send(&app, "GET", "/api/locations?type=landfill", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/locations?latitude=abc&longitude=1", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        "POST",
        "/api/locations",
        None,
        Some(serde_json::json!({
            "name": "", "type": "digester", "address": "x", "latitude": 12.0, "longitude": 77.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"][0]["path"], "name");
}

#[tokio::test]
async fn donation_events_round_trip() {
    let app = setup();
    let (status, json) = post(
        &app,
        "/api/events",
        serde_json::json!({
            "event_name": "Wedding reception",
            "event_date": "2026-11-02",
            "food_quantity_kg": 25.5,
            "latitude": 12.97,
            "longitude": 77.59
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["event"]["event_date"], "2026-11-02");

    let (_, json) = get(&app, "/api/events").await;
    let events = json["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_name"], "Wedding reception");

    let (status, _) = post(
        &app,
        "/api/events",
        serde_json::json!({
            "event_name": "Bad date",
            "event_date": "next week",
            "food_quantity_kg": 1.0,
            "latitude": 12.97,
            "longitude": 77.59
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Coach
// ---------------------------------------------------------------------------

#[tokio::test]
async fn coach_requires_message() {
    let app = setup();
    let (status, json) = post(&app, "/api/coach", serde_json::json!({ "message": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Message is required");

    let (status, _) = post(&app, "/api/coach", serde_json::json!({ "message": 42 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn canned_coach_replies_and_records_recommendation() {
    let app = setup();
    post(&app, "/api/waste-logs", waste(3.0, 0.5, 0.5, 1.0)).await;

    let (status, json) = post(
        &app,
        "/api/coach",
        serde_json::json!({
            "message": "How can I use less plastic?",
            "conversationHistory": [
                { "role": "assistant", "content": "Hello!" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reply = json["response"].as_str().unwrap();
    assert!(reply.contains("household of 3"));
    assert!(json["timestamp"].is_string());

    let user = app.state.store.user_by_email("home@example.com").unwrap();
    let recs = app.state.store.recommendations_for(user.id).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].category, "coach");
    assert_eq!(recs[0].recommendation_text, reply);
}

#[tokio::test]
async fn canned_coach_introduces_itself_on_opening_greeting() {
    let app = setup();
    let (status, json) = post(&app, "/api/coach", serde_json::json!({ "message": "Hello" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], wastewise_core::coach::GREETING);
}

#[tokio::test]
async fn coach_backend_failure_is_generic_500() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let coach = CoachBackend::Gemini(GeminiClient::new(
        server.url(),
        "gemini-2.0-flash",
        "TEST_KEY",
        Some("secret".to_string()),
        0.7,
        500,
    ));
    let app = setup_with_coach(coach);
    let (status, json) = post(&app, "/api/coach", serde_json::json!({ "message": "hi" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to generate response. Please try again.");

    let user = app.state.store.user_by_email("home@example.com").unwrap();
    assert!(app.state.store.recommendations_for(user.id).unwrap().is_empty());
}

#[tokio::test]
async fn gemini_coach_reply_is_returned() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Start composting today."}]}}]}"#)
        .create_async()
        .await;

    let coach = CoachBackend::Gemini(GeminiClient::new(
        server.url(),
        "gemini-2.0-flash",
        "TEST_KEY",
        Some("secret".to_string()),
        0.7,
        500,
    ));
    let app = setup_with_coach(coach);
    let (status, json) = post(&app, "/api/coach", serde_json::json!({ "message": "hi" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Start composting today.");
}
