//! Seed data script - populates the database with demo products, stock
//! history and sales
//!
//! Run with: cargo run --bin seed-data -- --force
//!
//! This creates:
//! - 25 products across 5 categories
//! - An inventory row per product with a short stock-change history
//! - A handful of sales per product spread over the last `--days` days

use chrono::{Duration, Utc};
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{info, warn};

use stockroom_api::{
    db,
    entities::{inventory, inventory_history, product, sale},
    services::{
        inventory::InventoryService,
        product_service::{ProductService, RegisterProduct},
        sales::{RecordSale, SalesService},
    },
};

const CATALOG: [(&str, [&str; 5]); 5] = [
    (
        "Electronics",
        [
            "Wireless Mouse",
            "Gaming Keyboard",
            "Smartphone",
            "Bluetooth Speaker",
            "PS5 Controller",
        ],
    ),
    (
        "Books",
        [
            "Atomic Habits",
            "The Great Gatsby",
            "Python Programming",
            "The Lean Startup",
            "1984",
        ],
    ),
    (
        "Toys",
        ["LEGO Set", "Remote Car", "Dollhouse", "Puzzle Box", "Action Figure"],
    ),
    (
        "Home",
        [
            "Vacuum Cleaner",
            "Electric Kettle",
            "LED Lamp",
            "Coffee Maker",
            "Wall Clock",
        ],
    ),
    (
        "Fashion",
        [
            "Men's T-Shirt",
            "Women's Jacket",
            "Sneakers",
            "Leather Belt",
            "Sunglasses",
        ],
    ),
];

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Populate the database with demo data")]
struct Cli {
    /// Database URL; falls back to DATABASE_URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://stockroom.db?mode=rwc")]
    database_url: String,

    /// Delete existing sales, history, inventory and products first
    #[arg(long)]
    force: bool,

    /// Spread sales over this many past days
    #[arg(long, default_value_t = 30)]
    days: i64,

    /// Upper bound of sales generated per product (lower bound is half)
    #[arg(long, default_value_t = 10)]
    sales_per_product: u32,

    /// RNG seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    if cli.days < 1 {
        anyhow::bail!("--days must be at least 1");
    }

    info!("=== Stockroom Seed Data ===");

    let mut options = ConnectOptions::new(cli.database_url.clone());
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(StdDuration::from_secs(10))
        .acquire_timeout(StdDuration::from_secs(10));

    info!("Connecting to database: {}", cli.database_url);
    let conn = Database::connect(options).await?;

    // Ensure tables exist
    db::run_migrations(&conn).await?;

    if cli.force {
        info!("Clearing existing data...");
        clear_data(&conn).await?;
    } else if product::Entity::find().count(&conn).await? > 0 {
        warn!("Data already exists. Skipping seeding (use --force to replace it).");
        return Ok(());
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let pool = Arc::new(conn);
    let products = ProductService::new(pool.clone());
    let inventory = InventoryService::new(pool.clone(), 10);
    let sales = SalesService::new(pool.clone());

    let mut product_count = 0;
    let mut history_count = 0;
    let mut sale_count = 0;

    for (category, names) in CATALOG.iter() {
        for name in names.iter() {
            let cents: i64 = rng.gen_range(1_000..=20_000);
            let registered = products
                .register_product(RegisterProduct {
                    name: name.to_string(),
                    category: category.to_string(),
                    price: Decimal::new(cents, 2),
                    initial_stock: Some(0),
                })
                .await?;
            let product_id = registered.product.id;
            product_count += 1;

            // Initial stock-in, then a few adjustments
            let mut stock = rng.gen_range(0..=150);
            inventory.set_stock(product_id, stock).await?;
            history_count += 1;

            for _ in 0..rng.gen_range(2..=4) {
                stock = (stock + rng.gen_range(-10..=20)).max(0);
                inventory.set_stock(product_id, stock).await?;
                history_count += 1;
            }

            let upper = cli.sales_per_product.max(1);
            let lower = (upper / 2).max(1);
            for _ in 0..rng.gen_range(lower..=upper) {
                let offset_secs = rng.gen_range(0..cli.days * 86_400);
                sales
                    .record_sale(RecordSale {
                        product_id,
                        quantity: rng.gen_range(1..=5),
                        sale_date: Some(Utc::now() - Duration::seconds(offset_secs)),
                    })
                    .await?;
                sale_count += 1;
            }
        }
    }

    info!("  Created {} products", product_count);
    info!("  Recorded {} stock changes", history_count);
    info!("  Recorded {} sales", sale_count);
    info!("=== Seed Data Complete ===");
    info!("Try these API calls:");
    info!("  curl http://localhost:8080/api/v1/products");
    info!("  curl http://localhost:8080/api/v1/inventory/low-stock");
    info!("  curl 'http://localhost:8080/api/v1/sales/summary?period=weekly'");
    info!("  curl http://localhost:8080/api/v1/sales/best-sellers");

    drop((products, inventory, sales));
    if let Ok(conn) = Arc::try_unwrap(pool) {
        db::close_pool(conn).await?;
    }

    Ok(())
}

async fn clear_data(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let sales = sale::Entity::delete_many().exec(conn).await?;
    let history = inventory_history::Entity::delete_many().exec(conn).await?;
    let stock = inventory::Entity::delete_many().exec(conn).await?;
    let products = product::Entity::delete_many().exec(conn).await?;
    info!(
        sales = sales.rows_affected,
        history = history.rows_affected,
        inventory = stock.rows_affected,
        products = products.rows_affected,
        "Existing data removed"
    );
    Ok(())
}
