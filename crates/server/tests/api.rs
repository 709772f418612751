use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use farm_runtime::{Runtime, RuntimeConfig};
use farm_server::{AppState, build_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> (Runtime, Router) {
    let config = RuntimeConfig {
        session_idle_ttl: None,
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder().config(config).build().unwrap();
    let router = build_router(AppState::new(runtime.handle()));
    (runtime, router)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn farmer() -> Value {
    json!({
        "name": "Test Farmer",
        "bodyType": "average",
        "hairStyle": "short",
        "hairColor": "#8B4513",
        "skinTone": "#FDBB7D",
    })
}

async fn create_player(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/api/players", Some(farmer())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["player"]["id"].as_str().unwrap().to_owned()
}

async fn use_tool(app: &Router, id: &str, tool: &str, x: i64, y: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/api/players/{id}/use-tool"),
        Some(json!({ "tool": tool, "tileX": x, "tileY": y })),
    )
    .await
}

#[tokio::test]
async fn health_reports_ok() {
    let (_runtime, app) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn create_player_returns_profile_and_initial_state() {
    let (_runtime, app) = app();
    let (status, body) = send(&app, Method::POST, "/api/players", Some(farmer())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let player = &body["data"]["player"];
    assert_eq!(player["name"], "Test Farmer");
    assert_eq!(player["bodyType"], "average");
    assert_eq!(player["hairStyle"], "short");
    assert_eq!(player["hairColor"], "#8B4513");
    assert_eq!(player["skinTone"], "#FDBB7D");
    assert!(player["id"].is_string());
    assert!(player["createdAt"].is_string());
    assert!(player["lastActive"].is_string());

    let state = &body["data"]["gameState"];
    assert_eq!(state["player"]["id"], player["id"]);
    assert_eq!(state["game"]["day"], 1);
    assert_eq!(state["game"]["money"], 100);
    assert_eq!(state["game"]["energy"], 100);
    assert_eq!(state["game"]["maxEnergy"], 100);
    assert_eq!(state["game"]["seeds"], 5);
    assert_eq!(state["game"]["currentTool"], "hoe");
    assert_eq!(state["farm"]["width"], 20);
    assert_eq!(state["farm"]["height"], 15);
    assert_eq!(state["farm"]["tiles"].as_array().unwrap().len(), 15);
    assert_eq!(state["farm"]["tiles"][0].as_array().unwrap().len(), 20);
    assert_eq!(state["farm"]["tiles"][0][0]["type"], "grass");
    assert_eq!(state["camera"], json!({ "x": 0.0, "y": 0.0 }));
}

#[tokio::test]
async fn invalid_player_data_lists_every_reason() {
    let (_runtime, app) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/players",
        Some(json!({ "name": "   ", "bodyType": "giant", "hairStyle": "short", "hairColor": 7 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid player data");
    assert_eq!(
        body["details"],
        json!([
            "Name is required and must be a non-empty string",
            "Valid body type is required",
            "Valid hair color is required",
            "Valid skin tone is required",
        ])
    );
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (_runtime, app) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/players")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_player_is_not_found() {
    let (_runtime, app) = app();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/players/9b2f4c1e-0000-4000-8000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Player not found" }));

    let (status, _) = send(&app, Method::GET, "/api/players/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_player_wins_over_bad_tool_name() {
    let (_runtime, app) = app();
    let missing = "9b2f4c1e-0000-4000-8000-000000000000";

    let (status, body) = use_tool(&app, missing, "shovel", 0, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Player not found");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/players/{missing}/game-state"),
        Some(json!({ "gameState": { "game": { "currentTool": "axe" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Player not found");

    let (status, _) = use_tool(&app, "not-a-uuid", "HARVEST", 0, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create_player(&app).await;
    let (status, body) = use_tool(&app, &id, "HARVEST", 0, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid tool");
}

#[tokio::test]
async fn get_player_returns_current_state() {
    let (_runtime, app) = app();
    let id = create_player(&app).await;

    let (status, body) = send(&app, Method::GET, &format!("/api/players/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["player"]["id"], id.as_str());
    assert_eq!(body["data"]["gameState"]["player"]["name"], "Test Farmer");
}

#[tokio::test]
async fn tool_cycle_over_http() {
    let (_runtime, app) = app();
    let id = create_player(&app).await;

    let (status, body) = use_tool(&app, &id, "hoe", 2, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["energyCost"], 5);
    assert_eq!(body["data"]["harvestValue"], 0);
    assert_eq!(body["data"]["gameState"]["game"]["energy"], 95);
    assert_eq!(body["data"]["gameState"]["farm"]["tiles"][2][2]["type"], "tilled");

    let (_, body) = use_tool(&app, &id, "water", 2, 2).await;
    assert_eq!(body["data"]["energyCost"], 3);
    let tile = &body["data"]["gameState"]["farm"]["tiles"][2][2];
    assert_eq!(tile["watered"], true);
    assert!(tile["lastWatered"].is_string());

    let (_, body) = use_tool(&app, &id, "plant", 2, 2).await;
    assert_eq!(body["data"]["energyCost"], 2);
    let state = &body["data"]["gameState"];
    assert_eq!(state["game"]["seeds"], 4);
    assert_eq!(state["game"]["currentTool"], "plant");
    let tile = &state["farm"]["tiles"][2][2];
    assert_eq!(tile["type"], "planted");
    assert_eq!(tile["planted"], true);
    assert_eq!(tile["watered"], true);
    assert_eq!(tile["growthStage"], 1);
    assert_eq!(tile["growthTime"], 0);
    assert_eq!(tile["maxGrowthTime"], 300);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/players/{id}/update-crops"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["gameState"]["farm"]["tiles"][2][2]["growthTime"], 1);
}

#[tokio::test]
async fn tool_rejections_carry_game_state() {
    let (_runtime, app) = app();
    let id = create_player(&app).await;

    let (status, body) = use_tool(&app, &id, "hoe", 100, 100).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid tile coordinates");
    assert_eq!(body["data"]["gameState"]["game"]["energy"], 100);

    let (status, body) = use_tool(&app, &id, "water", 0, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot use this tool on this tile");

    let (status, body) = use_tool(&app, &id, "shovel", 0, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid tool");

    for x in 0..20 {
        let (status, _) = use_tool(&app, &id, "hoe", x, 0).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = use_tool(&app, &id, "hoe", 5, 5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Not enough energy");
    assert_eq!(body["data"]["gameState"]["game"]["energy"], 0);
}

#[tokio::test]
async fn game_state_update_moves_camera_and_selects_tool() {
    let (_runtime, app) = app();
    let id = create_player(&app).await;
    let uri = format!("/api/players/{id}/game-state");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "gameState": { "camera": { "x": 100, "y": 50 } } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["gameState"]["camera"], json!({ "x": 100.0, "y": 50.0 }));

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "gameState": { "camera": { "y": -20 }, "game": { "currentTool": "water" } }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let state = &body["data"]["gameState"];
    assert_eq!(state["camera"], json!({ "x": 100.0, "y": -20.0 }));
    assert_eq!(state["game"]["currentTool"], "water");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "gameState": { "camera": { "x": 0 }, "game": { "currentTool": "axe" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid tool");

    // The rejected update changed nothing.
    let (_, body) = send(&app, Method::GET, &format!("/api/players/{id}"), None).await;
    assert_eq!(body["data"]["gameState"]["camera"]["x"], 100.0);
}

#[tokio::test]
async fn rest_pick_tile_and_delete() {
    let (_runtime, app) = app();
    let id = create_player(&app).await;

    use_tool(&app, &id, "hoe", 0, 0).await;
    let (status, body) = send(&app, Method::POST, &format!("/api/players/{id}/rest"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["gameState"]["game"]["day"], 2);
    assert_eq!(body["data"]["gameState"]["game"]["energy"], 100);

    // With a zero camera the origin is the centre of tile (0, 0).
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/players/{id}/pick-tile"),
        Some(json!({ "screenX": 400.0, "screenY": 100.0, "originX": 400.0, "originY": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tile"], json!({ "x": 0, "y": 0 }));

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/players/{id}/pick-tile"),
        Some(json!({ "screenX": -5000.0, "screenY": -5000.0, "originX": 400.0, "originY": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tile"], Value::Null);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/players/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);

    let (status, _) = send(&app, Method::GET, &format!("/api/players/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
