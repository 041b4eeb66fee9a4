//! # Seed Data Generator
//!
//! Populates the database with sample products and sales for development.
//!
//! ## Usage
//! ```bash
//! # One product per item/variant pair and 20 sales (default)
//! cargo run -p estoque-db --bin seed
//!
//! # Custom amounts
//! cargo run -p estoque-db --bin seed -- --count 50 --sales 100
//!
//! # Specify database path
//! cargo run -p estoque-db --bin seed -- --db ./data/estoque.db
//! ```
//!
//! Products are named `{item} {variant}` with a deterministic price
//! (R$ 0,50 - R$ 40,49) and stock (10 - 60). Sales go through the regular
//! upsert transaction, so stock drops accordingly.

use std::env;

use estoque_core::{LineItemRequest, Product, ProductInput};
use estoque_db::{upsert_sale, Database, DbConfig};

const ITEMS: &[&str] = &[
    "Caneta esferográfica",
    "Lápis grafite",
    "Borracha",
    "Apontador",
    "Caderno",
    "Régua",
    "Marca-texto",
    "Cola bastão",
    "Tesoura",
    "Grampeador",
    "Clipes",
    "Pasta",
    "Bloco de notas",
    "Envelope",
    "Fita adesiva",
];

const VARIANTS: &[(&str, i64)] = &[
    ("azul", 0),
    ("preto", 0),
    ("vermelho", 0),
    ("pequeno", -20),
    ("médio", 80),
    ("grande", 200),
    ("kit com 3", 350),
    ("kit com 10", 900),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let combinations = ITEMS.len() * VARIANTS.len();
    let mut count: usize = combinations;
    let mut sales: usize = 20;
    let mut db_path = String::from("./estoque_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(sales);
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
                println!("Estoque Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --count <N>    Number of products to generate (default and max: {})",
                    combinations
                );
                println!("  -s, --sales <N>    Number of sales to generate (default: 20)");
                println!("  -d, --db <PATH>    Database file path (default: ./estoque_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    if count > combinations {
        println!("⚠ Only {} item/variant combinations exist; capping --count", combinations);
        count = combinations;
    }

    println!("🌱 Estoque Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!("Sales:    {}", sales);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut products: Vec<Product> = Vec::with_capacity(count);

    'outer: for (item_idx, item) in ITEMS.iter().enumerate() {
        for (variant_idx, (variant, price_addon)) in VARIANTS.iter().enumerate() {
            if products.len() >= count {
                break 'outer;
            }

            let input = generate_product(item, variant, *price_addon, item_idx * 20 + variant_idx);
            match db.products().upsert(&input).await {
                Ok(product) => products.push(product),
                Err(e) => eprintln!("Failed to insert {}: {}", input.name, e),
            }
        }
    }

    println!("✓ Generated {} products in {:?}", products.len(), start.elapsed());

    if products.is_empty() {
        return Ok(());
    }

    println!();
    println!("Generating sales...");

    let mut created = 0;
    for n in 0..sales {
        let items: Vec<LineItemRequest> = (0..1 + n % 3)
            .map(|k| {
                let product = &products[(n * 7 + k * 13) % products.len()];
                LineItemRequest::new(&product.id, 1 + ((n + k) % 3) as i64)
            })
            .collect();

        match upsert_sale(&db, None, &items).await {
            Ok(_) => created += 1,
            Err(e) => eprintln!("Skipped sale {}: {}", n, e),
        }
    }

    let summaries = db.sales().list_summaries().await?;
    let revenue: estoque_core::Money = summaries.iter().map(|s| s.total()).sum();

    println!("✓ Generated {} sales, revenue {}", created, revenue);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds the form input for one sample product.
fn generate_product(item: &str, variant: &str, price_addon: i64, seed: usize) -> ProductInput {
    // R$ 0,70 - R$ 39,69 before the variant addon
    let base_price = 70 + ((seed * 37) % 3900) as i64;

    ProductInput {
        id: None,
        name: format!("{} {}", item, variant),
        price_cents: (base_price + price_addon).max(50),
        stock: 10 + (seed % 51) as i64,
    }
}
