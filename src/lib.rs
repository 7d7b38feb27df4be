//! Stockroom API Library
//!
//! Inventory and sales management backend: products, stock levels with an
//! append-only audit history, sales, and revenue reporting over them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod aggregation;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod migrator;
pub mod queries;
pub mod services;

use axum::{
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use services::AppServices;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Routes served under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    let products = Router::new()
        .route("/products", get(handlers::products::list_products))
        .route(
            "/products/register",
            post(handlers::products::register_product),
        )
        .route("/products/:product_id", get(handlers::products::get_product));

    let sales = Router::new()
        .route(
            "/sales",
            get(handlers::sales::list_sales).post(handlers::sales::record_sale),
        )
        .route("/sales/revenue", get(handlers::sales::get_revenue))
        .route(
            "/sales/revenue/compare",
            get(handlers::sales::compare_revenue),
        )
        .route(
            "/sales/revenue/by-category",
            get(handlers::sales::revenue_by_category),
        )
        .route("/sales/summary", get(handlers::sales::sales_summary))
        .route("/sales/best-sellers", get(handlers::sales::best_sellers));

    let inventory = Router::new()
        .route(
            "/inventory",
            get(handlers::inventory::list_inventory).post(handlers::inventory::create_inventory),
        )
        .route(
            "/inventory/low-stock",
            get(handlers::inventory::get_low_stock_items),
        )
        .route(
            "/inventory/update",
            put(handlers::inventory::update_inventory),
        )
        .route(
            "/inventory/:product_id/history",
            get(handlers::inventory::get_inventory_history),
        );

    Router::new().merge(products).merge(sales).merge(inventory)
}

/// Full application router: health check, versioned API and HTTP tracing
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}
