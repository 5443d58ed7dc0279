use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lodging_store::{DocumentStore, MemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> Router {
    retreat_lodging::build().unwrap().into_router()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

async fn create(router: &Router, path: &str, body: Value) -> String {
    let (status, res) = send(router, "POST", path, Some(body)).await;
    assert_eq!(status, StatusCode::OK, "create {path}: {res}");
    res["id"].as_str().unwrap().to_string()
}

async fn room(router: &Router, name: &str, capacity: i64) -> String {
    create(router, "/rooms", json!({"name": name, "capacity": capacity})).await
}

async fn participant(router: &Router, name: &str) -> String {
    create(router, "/participants", json!({"full_name": name})).await
}

async fn assign(router: &Router, p: &str, r: &str, days: Value) -> (StatusCode, Value) {
    send(
        router,
        "POST",
        "/assignments",
        Some(json!({"participant_id": p, "room_id": r, "stay_days": days})),
    )
    .await
}

const MISSING: &str = "00000000-0000-4000-8000-000000000000";

#[tokio::test]
async fn banner_health_and_request_ids() {
    let router = router();

    let (status, body) = send(&router, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("retreat"));

    room(&router, "Cedar", 2).await;
    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "running");
    assert_eq!(body["store"], "connected");
    assert_eq!(body["collections"], json!({"assignments": 0, "participants": 0, "rooms": 1}));

    let res = router
        .clone()
        .oneshot(Request::builder().uri("/rooms").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(res.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn rooms_crud_round() {
    let router = router();

    let id = room(&router, "Cedar", 4).await;

    let (status, rooms) = send(&router, "GET", "/rooms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms.as_array().unwrap().len(), 1);
    let cedar = &rooms[0];
    assert_eq!(cedar["id"], id.as_str());
    assert_eq!(cedar["gender"], "mixed");
    assert_eq!(cedar["type"], "dorm");
    assert_eq!(cedar["cooling"], "ventilated");
    assert_eq!(cedar["amenities"], json!([]));
    assert!(cedar["created_at"].is_string());

    let (status, updated) = send(
        &router,
        "PATCH",
        &format!("/rooms/{id}"),
        Some(json!({"cooling": "air_conditioned", "floor": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["cooling"], "air_conditioned");
    assert_eq!(updated["name"], "Cedar");
    assert!(updated.get("floor").is_none());

    let (status, fetched) = send(&router, "GET", &format!("/rooms/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, removed) = send(&router, "DELETE", &format!("/rooms/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed, json!({"id": id, "deleted": true}));

    let (status, body) = send(&router, "DELETE", &format!("/rooms/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["name"], "NotFound");
}

#[tokio::test]
async fn room_payload_errors() {
    let router = router();

    let (status, body) = send(&router, "POST", "/rooms", Some(json!({"name": "Cedar", "capacity": 0}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["capacity"].is_array());

    let (status, _) = send(&router, "POST", "/rooms", Some(json!({"name": "Cedar", "capacity": 2, "cooling": "fan"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let id = room(&router, "Cedar", 2).await;

    for payload in [json!({}), json!({"floor": 3})] {
        let (status, body) = send(&router, "PATCH", &format!("/rooms/{id}"), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "no field to update");
    }

    let (status, _) = send(&router, "PATCH", &format!("/rooms/{MISSING}"), Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&router, "GET", "/rooms/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("invalid identifier"));
}

#[tokio::test]
async fn participants_crud_round() {
    let router = router();

    let id = create(
        &router,
        "/participants",
        json!({"full_name": "Ama Mensah", "email": "ama@example.org", "gender": "female"}),
    )
    .await;

    let (status, updated) = send(
        &router,
        "PATCH",
        &format!("/participants/{id}"),
        Some(json!({"parish": "St. Anne", "shoe_size": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["parish"], "St. Anne");
    assert_eq!(updated["full_name"], "Ama Mensah");
    assert!(updated.get("shoe_size").is_none());

    let (status, _) = send(&router, "POST", "/participants", Some(json!({"full_name": "Kofi", "email": "nope"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&router, "PATCH", &format!("/participants/{id}"), Some(json!({"age": 30}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no field to update");

    let (status, _) = send(&router, "DELETE", &format!("/participants/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn capacity_is_enforced_per_day() {
    let router = router();
    let a = room(&router, "A", 2).await;
    let p1 = participant(&router, "p1").await;
    let p2 = participant(&router, "p2").await;
    let p3 = participant(&router, "p3").await;

    assert_eq!(assign(&router, &p1, &a, json!([1])).await.0, StatusCode::OK);
    assert_eq!(assign(&router, &p2, &a, json!([1])).await.0, StatusCode::OK);

    let (status, body) = assign(&router, &p3, &a, json!([1])).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["name"], "Conflict");
    assert_eq!(body["data"]["day"], 1);
    assert_eq!(body["data"]["capacity"], 2);
    assert_eq!(body["data"]["assigned"], 2);
    assert_eq!(body["data"]["room_id"], a.as_str());

    assert_eq!(assign(&router, &p3, &a, json!([2])).await.0, StatusCode::OK);

    let (_, all) = send(&router, "GET", "/assignments", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn conflict_names_the_first_full_day_in_request_order() {
    let router = router();
    let a = room(&router, "A", 1).await;
    let p1 = participant(&router, "p1").await;
    let p2 = participant(&router, "p2").await;

    assign(&router, &p1, &a, json!([2, 3])).await;

    let (status, body) = assign(&router, &p2, &a, json!([1, 3, 2])).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["day"], 3);
}

#[tokio::test]
async fn invalid_days_and_ids_are_rejected_without_writes() {
    let router = router();
    let a = room(&router, "A", 2).await;
    let p = participant(&router, "p").await;

    let (status, body) = assign(&router, &p, &a, json!([1, 4])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("4"));

    // days are checked before identities
    let (status, body) = assign(&router, "bad", "bad", json!([0])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("day"));

    let (status, _) = assign(&router, "bad", &a, json!([1])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = assign(&router, MISSING, MISSING, json!([1])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().starts_with("Participant"));

    let (status, body) = assign(&router, &p, MISSING, json!([1])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().starts_with("Room"));

    let (status, _) = send(&router, "POST", "/assignments", Some(json!({"room_id": a}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, all) = send(&router, "GET", "/assignments", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn updates_merge_and_exclude_themselves() {
    let router = router();
    let a = room(&router, "A", 1).await;
    let b = room(&router, "B", 1).await;
    let p1 = participant(&router, "p1").await;
    let p2 = participant(&router, "p2").await;

    let (_, created) = assign(&router, &p1, &a, json!([1, 2])).await;
    let x = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(&router, "PATCH", &format!("/assignments/{x}"), Some(json!({"stay_days": [1, 2, 3]}))).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["stay_days"], json!([1, 2, 3]));
    assert_eq!(updated["participant_id"], p1.as_str());
    assert_eq!(updated["room_id"], a.as_str());

    // B is full on day 1, so moving X there conflicts
    assign(&router, &p2, &b, json!([1])).await;
    let (status, body) = send(&router, "PATCH", &format!("/assignments/{x}"), Some(json!({"room_id": b}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["day"], 1);

    let (status, body) = send(&router, "PATCH", &format!("/assignments/{x}"), Some(json!({"note": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no field to update");

    let (status, _) = send(&router, "PATCH", &format!("/assignments/{MISSING}"), Some(json!({"stay_days": [1]}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "PATCH", &format!("/assignments/{x}"), Some(json!({"stay_days": [5]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn referenced_rooms_and_participants_cannot_be_deleted() {
    let router = router();
    let a = room(&router, "A", 2).await;
    let p = participant(&router, "p").await;
    let (_, created) = assign(&router, &p, &a, json!([1])).await;
    let x = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&router, "DELETE", &format!("/rooms/{a}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"], json!({"id": a, "assignments": 1}));

    let (status, _) = send(&router, "DELETE", &format!("/participants/{p}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&router, "DELETE", &format!("/assignments/{x}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, "DELETE", &format!("/rooms/{a}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "DELETE", &format!("/participants/{p}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn assignments_filter_by_room_and_day() {
    let router = router();
    let a = room(&router, "A", 5).await;
    let b = room(&router, "B", 5).await;
    let p = participant(&router, "p").await;

    assign(&router, &p, &a, json!([1, 2])).await;
    assign(&router, &p, &a, json!([3])).await;
    assign(&router, &p, &b, json!([2])).await;

    let count = |v: &Value| v.as_array().unwrap().len();

    let (_, by_room) = send(&router, "GET", &format!("/assignments?room_id={a}"), None).await;
    assert_eq!(count(&by_room), 2);

    let (_, by_day) = send(&router, "GET", "/assignments?day=2", None).await;
    assert_eq!(count(&by_day), 2);

    let (_, both) = send(&router, "GET", &format!("/assignments?room_id={a}&day=2"), None).await;
    assert_eq!(count(&both), 1);

    let (_, blank) = send(&router, "GET", "/assignments?room_id=&day=", None).await;
    assert_eq!(count(&blank), 3);

    for uri in ["/assignments?day=4", "/assignments?day=two", "/assignments?room_id=lobby"] {
        let (status, _) = send(&router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn summary_reports_occupancy_and_totals() {
    let store = Arc::new(MemoryStore::new());
    let router = retreat_lodging::build_with_store(store.clone()).unwrap().into_router();

    let a = room(&router, "A", 1).await;
    send(
        &router,
        "POST",
        "/rooms",
        Some(json!({"name": "B", "capacity": 3, "type": "private", "cooling": "air_conditioned"})),
    )
    .await;
    let p1 = create(&router, "/participants", json!({"full_name": "p1", "gender": "male"})).await;
    participant(&router, "p2").await;
    assign(&router, &p1, &a, json!([1, 2])).await;

    // over-capacity written behind the service's back
    store
        .insert("assignments", json!({"participant_id": p1, "room_id": a, "stay_days": [1]}))
        .await
        .unwrap();

    let (status, s) = send(&router, "GET", "/summary", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(s["occupancy"][&a]["name"], "A");
    assert_eq!(s["occupancy"][&a]["days"]["1"], json!({"capacity": 1, "assigned": 2, "remaining": 0}));
    assert_eq!(s["occupancy"][&a]["days"]["2"], json!({"capacity": 1, "assigned": 1, "remaining": 0}));
    assert_eq!(s["occupancy"][&a]["days"]["3"], json!({"capacity": 1, "assigned": 0, "remaining": 1}));

    assert_eq!(s["totals"]["rooms"], 2);
    assert_eq!(s["totals"]["participants"], 2);
    assert_eq!(s["totals"]["assignments"], 2);
    assert_eq!(s["totals"]["days"]["1"], json!({"capacity": 4, "assigned": 2, "remaining": 2}));

    assert_eq!(s["cooling"], json!({"ventilated": 1, "air_conditioned": 1}));
    assert_eq!(s["room_types"], json!({"dorm": 1, "double": 0, "private": 1}));
    assert_eq!(s["genders"], json!({"male": 1, "female": 0, "unknown": 1}));
}

#[tokio::test]
async fn repeated_days_null_patches_and_malformed_ids() {
    let router = router();
    let a = room(&router, "A", 1).await;
    let p = participant(&router, "p").await;

    let (status, created) = assign(&router, &p, &a, json!([1, 1])).await;
    assert_eq!(status, StatusCode::OK);
    let x = created["id"].as_str().unwrap().to_string();

    let (status, same) = send(&router, "PATCH", &format!("/assignments/{x}"), Some(json!({"room_id": a}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same["stay_days"], json!([1, 1]));

    let (status, body) = send(&router, "PATCH", &format!("/rooms/{a}"), Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no field to update");

    for method in ["PATCH", "DELETE"] {
        let payload = (method == "PATCH").then(|| json!({"name": "B"}));
        let (status, body) = send(&router, method, "/rooms/not-an-id", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert!(body["message"].as_str().unwrap().contains("invalid identifier"));
    }
}
