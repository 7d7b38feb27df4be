#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use stockroom_api::{
    config::AppConfig,
    db,
    entities::{product, sale},
    services::{product_service::RegisterProduct, sales::RecordSale},
    AppState,
};
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // Every pooled connection to sqlite::memory: is its own database
        Self::with_database("sqlite::memory:", 1).await
    }

    /// Construct a test application against `database_url` with a pool of
    /// up to `max_connections`.
    pub async fn with_database(database_url: &str, max_connections: u32) -> Self {
        let mut cfg = AppConfig::new(
            database_url.to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = max_connections;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = stockroom_api::build_router(state.clone());

        Self { router, state }
    }

    /// Registers a product, with an inventory row when `stock` is set.
    pub async fn product(
        &self,
        name: &str,
        category: &str,
        price: Decimal,
        stock: Option<i32>,
    ) -> product::Model {
        self.state
            .services
            .products
            .register_product(RegisterProduct {
                name: name.to_string(),
                category: category.to_string(),
                price,
                initial_stock: stock,
            })
            .await
            .expect("register product")
            .product
    }

    pub async fn sale(&self, product_id: i32, quantity: i32, at: DateTime<Utc>) -> sale::Model {
        self.state
            .services
            .sales
            .record_sale(RecordSale {
                product_id,
                quantity,
                sale_date: Some(at),
            })
            .await
            .expect("record sale")
    }

    /// Send a request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
