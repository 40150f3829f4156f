use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;

use shopkit_infra::AppConfig;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod) with in-memory wiring, bound to an
        // ephemeral port.
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            use_persistent_stores: false,
            database_url: None,
            inventory_service_url: "http://127.0.0.1:9".to_string(),
            stock_check_timeout: Duration::from_millis(500),
        };

        let app = shopkit_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn set_level(client: &reqwest::Client, base_url: &str, sku_code: &str, quantity: i64) {
    let res = client
        .post(format!("{}/inventory/levels", base_url))
        .json(&json!({ "sku_code": sku_code, "quantity": quantity }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_catalog_roundtrip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({
            "sku_code": "iphone-13",
            "name": "iPhone 13",
            "description": "128GB, midnight",
            "price": 119_900,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    // Get
    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["sku_code"], "iphone-13");
    assert_eq!(fetched["price"], 119_900);

    // List
    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_product_name_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({ "sku_code": "x", "name": "   ", "price": 100 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stock_query_answers_every_requested_sku() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    set_level(&client, &srv.base_url, "iphone-13", 5).await;

    let res = client
        .get(format!(
            "{}/inventory?sku_code=iphone-13&sku_code=ghost",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let statuses: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(statuses.len(), 2);

    let by_sku = |code: &str| {
        statuses
            .iter()
            .find(|s| s["sku_code"] == code)
            .unwrap_or_else(|| panic!("no answer for {code}"))
            .clone()
    };
    assert_eq!(by_sku("iphone-13")["in_stock"], true);
    assert_eq!(by_sku("ghost")["in_stock"], false);
}

#[tokio::test]
async fn order_is_placed_when_every_sku_is_in_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    set_level(&client, &srv.base_url, "iphone-13", 5).await;
    set_level(&client, &srv.base_url, "pixel-8", 2).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "order_line_items": [
                { "sku_code": "iphone-13", "unit_price": 150, "quantity": 2 },
                { "sku_code": "pixel-8", "unit_price": 999, "quantity": 1 },
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let placed: serde_json::Value = res.json().await.unwrap();
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    // The admitted order is durably stored and readable.
    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["id"], order_id.as_str());
    assert_eq!(order["order_line_items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn order_is_rejected_when_any_sku_is_out_of_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    set_level(&client, &srv.base_url, "iphone-13", 5).await;
    set_level(&client, &srv.base_url, "pixel-8", 0).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "order_line_items": [
                { "sku_code": "iphone-13", "unit_price": 150, "quantity": 2 },
                { "sku_code": "pixel-8", "unit_price": 999, "quantity": 1 },
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "out_of_stock");
    assert_eq!(body["sku_codes"], json!(["pixel-8"]));
}

#[tokio::test]
async fn order_referencing_an_untracked_sku_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "order_line_items": [
                { "sku_code": "never-stocked", "unit_price": 150, "quantity": 1 },
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "out_of_stock");
}

#[tokio::test]
async fn empty_order_is_rejected_as_invalid() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "order_line_items": [] }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request");
}
