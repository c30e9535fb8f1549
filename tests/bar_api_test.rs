use bar_registry::{create_app, AppState, BarService, HtmlRenderer, MemoryStore};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Starts the full router on an ephemeral port backed by an in-memory store.
async fn spawn_app() -> String {
    let service = BarService::new(Arc::new(MemoryStore::new()));
    let app = create_app(AppState::new(service, Arc::new(HtmlRenderer::default())));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", address)
}

async fn create(client: &Client, base: &str, bar: Value) -> Value {
    let res = client
        .post(format!("{}/bar", base))
        .json(&bar)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn test_get_list_of_bars() {
    let base = spawn_app().await;
    let client = Client::new();

    let empty = client.get(format!("{}/bar", base)).send().await.unwrap();
    assert_eq!(empty.status(), StatusCode::OK);
    assert_eq!(empty.json::<Value>().await.unwrap(), json!([]));

    create(
        &client,
        &base,
        json!({"name": "Natascha", "address": "Weserstr.", "placeId": "hjsgjhdsg56215673562"}),
    )
    .await;

    let res = client.get(format!("{}/bar", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body.is_array(), "Body should be an array");
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_a_new_bar() {
    let base = spawn_app().await;
    let client = Client::new();

    let body = create(
        &client,
        &base,
        json!({"name": "Aloma", "address": "Pannierstr.", "placeId": "skjhdkjah45435342"}),
    )
    .await;

    assert_eq!(body["name"], "Aloma");
    assert_eq!(body["address"], "Pannierstr.");
    assert_eq!(body["placeId"], "skjhdkjah45435342");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["openingHours"], json!({}));
    assert!(body["_id"].is_string());
}

#[tokio::test]
async fn test_avoid_creating_duplicates() {
    let base = spawn_app().await;
    let client = Client::new();
    let bar = json!({"name": "Berghain", "address": "Ostkreuz.", "placeId": "68768376adssds"});

    let first = create(&client, &base, bar.clone()).await;

    let duplicate = client
        .post(format!("{}/bar", base))
        .json(&bar)
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let all: Vec<Value> = client
        .get(format!("{}/bar", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.iter().filter(|b| b["_id"] == first["_id"]).count(), 1);
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_create_without_name_is_rejected() {
    let base = spawn_app().await;

    let res = Client::new()
        .post(format!("{}/bar", base))
        .json(&json!({"address": "Nowhere"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_a_bar() {
    let base = spawn_app().await;
    let client = Client::new();

    let bar = create(
        &client,
        &base,
        json!({"name": "Paloma", "address": "Reuterstr.", "placeId": "236826hhgsdjgwy", "rating": 4.5}),
    )
    .await;

    let fetch = client
        .get(format!("{}/bar/{}/json", base, bar["_id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();

    assert_eq!(fetch.status(), StatusCode::OK);
    assert_eq!(fetch.json::<Value>().await.unwrap(), bar);
}

#[tokio::test]
async fn test_fetch_with_unknown_or_malformed_id() {
    let base = spawn_app().await;
    let client = Client::new();

    let unknown = client
        .get(format!("{}/bar/{}/json", base, uuid::Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let malformed = client
        .get(format!("{}/bar/not-an-id/json", base))
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_a_bar() {
    let base = spawn_app().await;
    let client = Client::new();

    let bar = create(
        &client,
        &base,
        json!({"name": "Lagari", "address": "Hobrechstr.", "placeId": "7638263872"}),
    )
    .await;
    let id = bar["_id"].as_str().unwrap();

    let del = client
        .delete(format!("{}/bar/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(del.status(), StatusCode::OK);
    assert_eq!(del.text().await.unwrap(), "Bar deleted from the database");

    let fetch = client
        .get(format!("{}/bar/{}/json", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(fetch.status(), StatusCode::NOT_FOUND);

    let again = client
        .delete(format!("{}/bar/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_many_entries() {
    let base = spawn_app().await;
    let client = Client::new();
    let bars = json!([
        {"name": "K-fetisch", "address": "Hobrechstr.", "placeId": "iuweyeiuwhdskjsdh7"},
        {"name": "Wilders", "address": "Hermannpl.", "placeId": "kssddshdu77"}
    ]);

    let res = client
        .post(format!("{}/bar/add-many", base))
        .json(&bars)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), bars);

    let all: Vec<Value> = client
        .get(format!("{}/bar", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_add_many_with_duplicate_place_id() {
    let base = spawn_app().await;
    let client = Client::new();

    let res = client
        .post(format!("{}/bar/add-many", base))
        .json(&json!([
            {"name": "A", "placeId": "x"},
            {"name": "B", "placeId": "x"},
            {"name": "C", "placeId": "y"}
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let all: Vec<Value> = client
        .get(format!("{}/bar", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["name"], "A");
}

#[tokio::test]
async fn test_update_a_bar() {
    let base = spawn_app().await;
    let client = Client::new();

    let bar = create(
        &client,
        &base,
        json!({"name": "Aloma", "address": "Pannierstr.", "placeId": "skjhdkjah45435342", "neighbourhood": "Neukölln"}),
    )
    .await;
    let id = bar["_id"].as_str().unwrap();

    let update = client
        .post(format!("{}/bar/update", base))
        .json(&json!({"_id": id, "address": "Maybachufer."}))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);

    let fetched: Value = client
        .get(format!("{}/bar/{}/json", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fetched["address"], "Maybachufer.");
    let mut expected = bar.clone();
    expected["address"] = json!("Maybachufer.");
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn test_update_unknown_bar_is_not_found() {
    let base = spawn_app().await;

    let res = Client::new()
        .post(format!("{}/bar/update", base))
        .json(&json!({"_id": uuid::Uuid::new_v4().to_string(), "address": "Maybachufer."}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_by_neighbourhood() {
    let base = spawn_app().await;
    let client = Client::new();

    for (name, hood, place) in [
        ("Wilders", "Neukölln", "a1"),
        ("K-fetisch", "Neukölln", "a2"),
        ("Paloma", "Kreuzberg", "a3"),
    ] {
        create(
            &client,
            &base,
            json!({"name": name, "neighbourhood": hood, "placeId": place}),
        )
        .await;
    }

    let res = client
        .get(format!("{}/bar/Neukölln", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bars: Vec<Value> = res.json().await.unwrap();
    assert_eq!(bars.len(), 2);
    assert!(bars.iter().all(|b| b["neighbourhood"] == "Neukölln"));

    let none = client
        .get(format!("{}/bar/Mitte", base))
        .send()
        .await
        .unwrap();
    assert_eq!(none.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_neighbourhoods_named_like_routes() {
    let base = spawn_app().await;
    let client = Client::new();

    for path in ["/bar/update", "/bar/add-many"] {
        let res = client.get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "GET {}", path);

        let res = client.delete(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "DELETE {}", path);
    }

    create(
        &client,
        &base,
        json!({"name": "Odd", "neighbourhood": "update", "placeId": "u1"}),
    )
    .await;

    let res = client
        .get(format!("{}/bar/update", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bars: Vec<Value> = res.json().await.unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0]["name"], "Odd");
}

#[tokio::test]
async fn test_create_accepts_whole_float_postal_code() {
    let base = spawn_app().await;
    let client = Client::new();

    let body = create(
        &client,
        &base,
        json!({"name": "Paloma", "postalCode": 10999.0, "placeId": "pc1"}),
    )
    .await;
    assert_eq!(body["postalCode"], json!(10999));

    let fractional = client
        .post(format!("{}/bar", base))
        .json(&json!({"name": "Paloma", "postalCode": 10999.5, "placeId": "pc2"}))
        .send()
        .await
        .unwrap();
    assert!(fractional.status().is_client_error());
}

#[tokio::test]
async fn test_create_with_whitespace_name() {
    let base = spawn_app().await;
    let client = Client::new();

    let body = create(&client, &base, json!({"name": " ", "placeId": "ws1"})).await;
    assert_eq!(body["name"], " ");

    let empty = client
        .post(format!("{}/bar", base))
        .json(&json!({"name": "", "placeId": "ws2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_render_pages() {
    let base = spawn_app().await;
    let client = Client::new();

    let bar = create(
        &client,
        &base,
        json!({"name": "Matcha", "address": "Reuterstr.", "placeId": "6287687236ssdds", "neighbourhood": "Kreuzberg"}),
    )
    .await;

    for path in [
        "/".to_string(),
        "/bar/all".to_string(),
        "/bar/all/Kreuzberg".to_string(),
        "/bar/all/Nowhere".to_string(),
        format!("/bar/detail/{}", bar["_id"].as_str().unwrap()),
    ] {
        let page = client.get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(page.status(), StatusCode::OK, "GET {}", path);

        let content_type = page
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"), "GET {}", path);
    }

    let detail = client
        .get(format!("{}/bar/detail/{}", base, bar["_id"].as_str().unwrap()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(detail.contains("Matcha"));

    let missing = client
        .get(format!("{}/bar/detail/{}", base, uuid::Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_app().await;

    let res = Client::new()
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}
