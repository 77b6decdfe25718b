//! # Seed Data Generator
//!
//! Populates the database with a demo store for development: a shelf of
//! products with stock, plus one pending transaction ready to publish.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p mercato-db --bin seed
//!
//! # Generate a custom number of products
//! cargo run -p mercato-db --bin seed -- --count 60
//!
//! # Specify database path
//! cargo run -p mercato-db --bin seed -- --db ./data/mercato.db
//! ```

use chrono::Utc;
use std::env;
use uuid::Uuid;

use mercato_core::{Product, Transaction, TransactionStatus};
use mercato_db::{Database, DbConfig};

const DEMO_STORE_ID: i64 = 1;
const DEMO_ORGANIZATION_ID: i64 = 1;

/// Product names for realistic demo data
const NAMES: &[&str] = &[
    "Flat White",
    "Cappuccino",
    "Espresso Double",
    "Cold Brew 330ml",
    "Drip Coffee",
    "Croissant",
    "Pain au Chocolat",
    "Banana Bread Slice",
    "Blueberry Muffin",
    "Granola Pot",
    "Single Origin 250g",
    "House Blend 500g",
    "Decaf Blend 250g",
    "Oat Milk 1L",
    "Whole Milk 1L",
    "Sparkling Water 500ml",
    "Still Water 500ml",
    "Orange Juice 250ml",
    "Chai Latte",
    "Hot Chocolate",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = NAMES.len();
    let mut db_path = String::from("./mercato_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(NAMES.len());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mercato Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: {})", NAMES.len());
                println!("  -d, --db <PATH>    Database file path (default: ./mercato_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Mercato Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count(DEMO_STORE_ID).await?;
    if existing > 0 {
        println!("⚠ Store {} already has {} products", DEMO_STORE_ID, existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    for seed in 0..count {
        let product = generate_product(NAMES[seed % NAMES.len()], seed);
        db.products().insert(&product).await?;
        generated += 1;
    }

    println!("✓ Generated {} products", generated);

    // Open one pending sale so the publish flow has something to work on.
    let now = Utc::now();
    let transaction = Transaction {
        id: Uuid::new_v4().to_string(),
        store_id: DEMO_STORE_ID,
        organization_id: DEMO_ORGANIZATION_ID,
        user_id: "demo-cashier".to_string(),
        status: TransactionStatus::Pending,
        report_title: None,
        notes: Some("seeded demo sale".to_string()),
        gross_cents: 0,
        margin_cents: 0,
        created_at: now,
        updated_at: now,
        published_at: None,
    };
    db.reports().create(&transaction).await?;

    println!("✓ Opened pending transaction {}", transaction.id);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with plausible demo data.
fn generate_product(name: &str, seed: usize) -> Product {
    let now = Utc::now();

    // Base price $2.50-$18.49, cost 55-75% of price, stock 0-60.
    let price_cents = 250 + ((seed * 83) % 1600) as i64;
    let cost_pct = 55 + (seed % 20) as i64;
    let cost_cents = Some(price_cents * cost_pct / 100);
    let inventory_count = ((seed * 7) % 61) as i64;

    // Disambiguate repeated names when --count exceeds the name list.
    let full_name = if seed < NAMES.len() {
        name.to_string()
    } else {
        format!("{} #{}", name, seed / NAMES.len() + 1)
    };

    Product {
        id: Uuid::new_v4().to_string(),
        store_id: DEMO_STORE_ID,
        organization_id: DEMO_ORGANIZATION_ID,
        name: full_name,
        price_cents,
        cost_cents,
        inventory_count,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
