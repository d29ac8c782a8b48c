mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use barista_server::app;
use barista_voice::LiveKitConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, body) = send(router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn agent_info_lists_tools_and_persona() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, body) = send(router, get("/api/agent")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["companyName"], "Starbucks");
    assert!(body["instructions"].as_str().unwrap().contains("barista"));
    let names: Vec<&str> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["save_order", "get_last_order"]);
}

#[tokio::test]
async fn save_order_tool_call_persists_and_replies() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, body) = send(
        router.clone(),
        post_json(
            "/api/agent/tools/save_order",
            json!({
                "arguments": {
                    "drink_type": "Latte",
                    "size": "Venti",
                    "milk": "Oat",
                    "extras": ["vanilla syrup", "extra shot"],
                    "name": "Jon"
                }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "Order saved! Total is ₹410.");

    let (status, order) = send(router, get("/api/orders/latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["drinkType"], "Latte");
    assert_eq!(order["price"], 410);
}

#[tokio::test]
async fn save_order_with_room_but_no_livekit_still_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, body) = send(
        router,
        post_json(
            "/api/agent/tools/save_order",
            json!({
                "room": "barista_room_1",
                "arguments": {
                    "drink_type": "Mocha",
                    "size": "Tall",
                    "milk": "Whole",
                    "extras": [],
                    "name": "Kat"
                }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "Order saved! Total is ₹250.");
}

#[tokio::test]
async fn get_last_order_tool_call_without_arguments() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, body) = send(
        router,
        post_json("/api/agent/tools/get_last_order", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "I couldn't find any previous orders.");
}

#[tokio::test]
async fn unknown_tool_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, body) = send(
        router,
        post_json("/api/agent/tools/brew_tea", json!({ "arguments": {} })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("brew_tea"));
}

#[tokio::test]
async fn malformed_arguments_are_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, _) = send(
        router,
        post_json(
            "/api/agent/tools/save_order",
            json!({ "arguments": { "drink_type": "Latte", "size": 3 } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_drink_type_is_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, body) = send(
        router.clone(),
        post_json(
            "/api/agent/tools/save_order",
            json!({
                "arguments": {
                    "drink_type": "",
                    "size": "Tall",
                    "milk": "Whole",
                    "extras": [],
                    "name": "Kat"
                }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("drink_type"));

    let (status, _) = send(router, get("/api/orders/latest")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_order_is_404_when_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, body) = send(router, get("/api/orders/latest")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no orders yet");
}

#[tokio::test]
async fn connection_details_unavailable_without_livekit() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::default()));

    let (status, _) = send(router, get("/api/connection-details")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn connection_details_issue_a_token() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::dev()));

    let (status, body) = send(
        router,
        get("/api/connection-details?room=counter&name=Priya"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serverUrl"], "ws://localhost:7880");
    assert_eq!(body["roomName"], "counter");
    assert_eq!(body["participantName"], "Priya");
    assert!(!body["participantToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn connection_details_generate_a_room_name() {
    let tmp = tempfile::tempdir().unwrap();
    let router = app(common::test_state(tmp.path(), LiveKitConfig::dev()));

    let (status, body) = send(router, get("/api/connection-details")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["roomName"]
        .as_str()
        .unwrap()
        .starts_with("barista_room_"));
    assert_eq!(body["participantName"], "user");
}
