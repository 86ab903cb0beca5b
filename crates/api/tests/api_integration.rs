//! Integration tests for the API server.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use api::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use store::InMemoryRepository;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup(export_dir: &Path) -> axum::Router {
    let repo = Arc::new(InMemoryRepository::new());
    let state = Arc::new(AppState::new(repo, export_dir));
    api::create_app(state, get_metrics_handle())
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Seeds two products and one customer; returns their ids.
async fn seed(app: &axum::Router) -> (i64, i64, i64) {
    let (_, p1) = send(
        app,
        "POST",
        "/products",
        Some(json!({ "name": "Item 1", "price_cents": 100_000, "quantity": 10 })),
    )
    .await;
    let (_, p2) = send(
        app,
        "POST",
        "/products",
        Some(json!({ "name": "Item 2", "price_cents": 200_000, "quantity": 5 })),
    )
    .await;
    let (_, c1) = send(
        app,
        "POST",
        "/customers",
        Some(json!({ "name": "Client 1", "email": "client1@example.com", "phone": "+79991111111" })),
    )
    .await;
    (
        p1["id"].as_i64().unwrap(),
        p2["id"].as_i64().unwrap(),
        c1["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(dir.path());

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(dir.path());

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

mod products {
    use super::*;

    #[tokio::test]
    async fn create_get_and_update_quantity() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());

        let (status, created) = send(
            &app,
            "POST",
            "/products",
            Some(json!({ "name": "Laptop", "price_cents": 99_950, "description": "Thin", "quantity": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["price"], "999.50");
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/products/{id}/quantity"),
            Some(json!({ "quantity": 7 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["quantity"], 7);

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/products/{id}/quantity"),
            Some(json!({ "quantity": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_price_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());

        let (status, json) = send(
            &app,
            "POST",
            "/products",
            Some(json!({ "name": "Free", "price_cents": 0, "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());

        let (status, _) = send(&app, "GET", "/products/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/products/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn referenced_product_delete_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        let (p1, _, c1) = seed(&app).await;

        send(
            &app,
            "POST",
            "/orders",
            Some(json!({ "customer_id": c1, "items": [{ "product_id": p1, "quantity": 1 }] })),
        )
        .await;

        let (status, _) = send(&app, "DELETE", &format!("/products/{p1}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}

mod customers {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        seed(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            "/customers",
            Some(json!({ "name": "Other", "email": "client1@example.com", "phone": "+79992222222" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_email_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());

        let (status, _) = send(
            &app,
            "POST",
            "/customers",
            Some(json!({ "name": "Bad", "email": "nope", "phone": "+79992222222" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn address_update_and_orders_listing() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        let (p1, _, c1) = seed(&app).await;

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/customers/{c1}/address"),
            Some(json!({ "address": "Main st 1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["address"], "Main st 1");

        send(
            &app,
            "POST",
            "/orders",
            Some(json!({ "customer_id": c1, "items": [{ "product_id": p1, "quantity": 2 }] })),
        )
        .await;

        let (status, orders) = send(&app, "GET", &format!("/customers/{c1}/orders"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(orders.as_array().unwrap().len(), 1);

        let (_, customer) = send(&app, "GET", &format!("/customers/{c1}"), None).await;
        assert_eq!(customer["orders_count"], 1);
    }
}

mod orders {
    use super::*;

    #[tokio::test]
    async fn create_get_and_delete_order() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        let (p1, p2, c1) = seed(&app).await;

        let (status, created) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "customer_id": c1,
                "items": [
                    { "product_id": p1, "quantity": 2 },
                    { "product_id": p2, "quantity": 1 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["total_price_cents"], 400_000);
        assert_eq!(created["items_count"], 3);
        assert_eq!(created["status"], "pending");
        let id = created["id"].as_i64().unwrap();

        let (status, loaded) = send(&app, "GET", &format!("/orders/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loaded["items"].as_array().unwrap().len(), 2);

        let (status, _) = send(&app, "DELETE", &format!("/orders/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", &format!("/orders/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, customer) = send(&app, "GET", &format!("/customers/{c1}"), None).await;
        assert_eq!(customer["orders_count"], 1);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        let (_, _, c1) = seed(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({ "customer_id": c1, "items": [{ "product_id": 99, "quantity": 1 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn overflowing_quantity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        let (p1, _, c1) = seed(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "customer_id": c1,
                "items": [{ "product_id": p1, "quantity": i64::MAX / 2 + 1 }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, orders) = send(&app, "GET", "/orders", None).await;
        assert!(orders.as_array().unwrap().is_empty());
        let (_, customer) = send(&app, "GET", &format!("/customers/{c1}"), None).await;
        assert_eq!(customer["orders_count"], 0);
    }

    #[tokio::test]
    async fn status_update_validates_value() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        let (p1, _, c1) = seed(&app).await;
        let (_, created) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({ "customer_id": c1, "items": [{ "product_id": p1, "quantity": 1 }] })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/orders/{id}/status"),
            Some(json!({ "status": "shipped" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "shipped");

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/orders/{id}/status"),
            Some(json!({ "status": "lost" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_sorted_by_price() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        let (p1, p2, c1) = seed(&app).await;
        for product_id in [p2, p1] {
            send(
                &app,
                "POST",
                "/orders",
                Some(json!({ "customer_id": c1, "items": [{ "product_id": product_id, "quantity": 1 }] })),
            )
            .await;
        }

        let (status, orders) = send(&app, "GET", "/orders?sort=price", None).await;
        assert_eq!(status, StatusCode::OK);
        let totals: Vec<i64> = orders
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["total_price_cents"].as_i64().unwrap())
            .collect();
        assert_eq!(totals, vec![100_000, 200_000]);

        let (status, _) = send(&app, "GET", "/orders?sort=name", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod reports {
    use super::*;

    #[tokio::test]
    async fn summary_on_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());

        let (status, summary) = send(&app, "GET", "/reports/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["total_orders"], 0);
        assert_eq!(summary["average_order_value"], 0);
        assert_eq!(summary["average_items_per_order"], 0.0);
    }

    #[tokio::test]
    async fn rankings_and_distribution() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        let (p1, p2, c1) = seed(&app).await;
        send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "customer_id": c1,
                "items": [
                    { "product_id": p1, "quantity": 1 },
                    { "product_id": p2, "quantity": 3 }
                ]
            })),
        )
        .await;

        let (status, top) = send(&app, "GET", "/reports/top-products?n=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(top["products"].as_array().unwrap().len(), 1);
        assert_eq!(top["products"][0]["product_id"], p2);

        let (_, customers) = send(&app, "GET", "/reports/top-customers", None).await;
        assert_eq!(customers["customers"][0]["orders_count"], 1);

        let (_, statuses) = send(&app, "GET", "/reports/status-distribution", None).await;
        assert_eq!(statuses["statuses"][0]["status"], "pending");
        assert_eq!(statuses["statuses"][0]["count"], 1);

        let (_, sales) = send(&app, "GET", "/reports/sales-by-date", None).await;
        assert_eq!(sales["days"][0]["items"], 4);
    }
}

mod transfer {
    use super::*;

    #[tokio::test]
    async fn export_then_import_into_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        seed(&app).await;

        let (status, files) = send(&app, "POST", "/transfer/export/csv", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(files["products"].is_string());
        assert!(dir.path().join("customers.csv").exists());

        let fresh = setup(dir.path());
        let (status, report) = send(&fresh, "POST", "/transfer/import/csv", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["products_imported"], 2);
        assert_eq!(report["customers_imported"], 1);
    }

    #[tokio::test]
    async fn export_json_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let app = setup(dir.path());
        seed(&app).await;

        let (status, files) = send(&app, "POST", "/transfer/export/json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(files.as_object().unwrap().len(), 3);
        assert!(dir.path().join("orders.json").exists());
    }
}
