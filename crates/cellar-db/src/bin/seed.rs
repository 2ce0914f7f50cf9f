//! # Seed Data Generator
//!
//! Populates the database with a realistic bottle-store catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p cellar-db --bin seed
//!
//! # Specify database path
//! cargo run -p cellar-db --bin seed -- --db ./data/cellar.db
//! ```
//!
//! ## Generated Data
//! A fixed catalog across every shelf category:
//! - Spirits (gin, vodka, whisky, cane)
//! - Wines (bottles and boxes)
//! - Beer (lager, opaque, ciders)
//! - Soft drinks (with expiry dates on the fridge stock)
//! - Cigarettes
//! - Snacks
//!
//! Plus a default store settings row. Staff accounts are not seeded; the
//! application bootstraps its own admin on first run.

use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;

use cellar_core::{Category, Money, Product, StoreSettings, DEFAULT_LOW_STOCK_THRESHOLD};
use cellar_db::repository::product::generate_product_id;
use cellar_db::{Database, DbConfig};

/// (name, barcode, price kwacha, cost kwacha, stock)
type SeedItem = (&'static str, &'static str, i64, i64, i64);

/// Catalog grouped by shelf: (category, supplier, shelf life in days, items).
///
/// Barcodes are EAN-13 shaped but not checksum-valid. A few items carry no
/// barcode at all, like the real shelf does.
const CATALOG: &[(Category, &str, Option<i64>, &[SeedItem])] = &[
    (
        Category::Spirits,
        "Press Trading",
        None,
        &[
            ("Malawi Gin 750ml", "6001234500017", 45_000, 30_000, 18),
            ("Malawi Vodka 750ml", "6001234500024", 42_000, 28_000, 14),
            ("Powers No.1 Cane 750ml", "6001234500031", 15_500, 10_200, 30),
            ("Gilbeys Gin 750ml", "6001234500048", 38_000, 26_500, 9),
            ("Smirnoff Vodka 750ml", "6001234500055", 52_000, 36_000, 7),
            ("Jameson Irish Whiskey 750ml", "6001234500062", 95_000, 68_000, 4),
            ("Captain Morgan Spiced Gold 750ml", "6001234500079", 48_000, 33_000, 6),
            ("Konyagi 500ml", "6001234500086", 12_000, 7_800, 22),
        ],
    ),
    (
        Category::Wines,
        "Southern Cellars",
        None,
        &[
            ("4th Street Sweet Red 750ml", "6001234600014", 14_500, 9_800, 16),
            ("Drostdy-Hof Claret 750ml", "6001234600021", 18_000, 12_500, 10),
            ("Overmeer Grand Cru 5L", "6001234600038", 42_000, 30_500, 5),
            ("Namaqua Sweet Rose 1L", "6001234600045", 16_500, 11_000, 12),
            ("Tall Horse Merlot 750ml", "6001234600052", 21_000, 14_800, 8),
            ("Amarula Cream 750ml", "6001234600069", 55_000, 39_000, 3),
        ],
    ),
    (
        Category::Beer,
        "Castel Malawi",
        None,
        &[
            ("Carlsberg Green 500ml", "6001234700011", 2_500, 1_700, 120),
            ("Carlsberg Special Brew 500ml", "6001234700028", 2_800, 1_900, 96),
            ("Kuche Kuche 500ml", "6001234700035", 2_200, 1_500, 144),
            ("Castel Beer 500ml", "6001234700042", 2_600, 1_750, 72),
            ("Doppel Munich Lager 500ml", "6001234700059", 2_900, 2_000, 48),
            ("Savanna Dry 330ml", "6001234700066", 4_500, 3_100, 36),
            ("Hunters Gold 330ml", "6001234700073", 4_200, 2_900, 24),
        ],
    ),
    (
        Category::SoftDrinks,
        "Southern Bottlers",
        Some(120),
        &[
            ("Coca-Cola 500ml", "6001234800018", 1_500, 1_000, 200),
            ("Fanta Orange 500ml", "6001234800025", 1_500, 1_000, 150),
            ("Sprite 500ml", "6001234800032", 1_500, 1_000, 130),
            ("Sobo Squash Orange 2L", "6001234800049", 6_500, 4_400, 20),
            ("Frozy Cocopina 500ml", "6001234800056", 1_200, 800, 80),
            ("Mineral Water 1L", "", 1_000, 600, 90),
            ("Chibuku Shake Shake 1L", "", 1_800, 1_200, 60),
        ],
    ),
    (
        Category::Cigarettes,
        "Limbe Leaf Distributors",
        None,
        &[
            ("Pall Mall 20s", "6001234900015", 5_500, 4_000, 40),
            ("Peter Stuyvesant 20s", "6001234900022", 6_800, 5_000, 25),
            ("Dunhill 20s", "6001234900039", 8_500, 6_300, 15),
            ("Life 20s", "6001234900046", 3_200, 2_200, 60),
            ("Rothmans 20s", "6001234900053", 6_000, 4_400, 30),
        ],
    ),
    (
        Category::Snacks,
        "Rab Processors",
        Some(180),
        &[
            ("Simba Chips 125g", "6001235000011", 3_500, 2_400, 45),
            ("Jiggies 100g", "6001235000028", 1_200, 750, 110),
            ("Roasted Groundnuts 100g", "", 1_500, 900, 70),
            ("Cashew Nuts 50g", "6001235000042", 4_000, 2_800, 18),
            ("Beef Biltong 50g", "6001235000059", 6_500, 4_600, 12),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG controls library logging; seed progress prints below
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cellar_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cellar POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cellar_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Cellar POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database (migrations run on open)
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Store settings, if never saved
    if db.settings_repo().get().await?.is_none() {
        let settings = StoreSettings {
            shop_name: "Chikondi Bottle Store".to_string(),
            address: "Area 23, Lilongwe".to_string(),
            phone: "+265 991 234 567".to_string(),
            email: "chikondi@example.mw".to_string(),
            receipt_footer: "Zikomo! Drink responsibly.".to_string(),
            ..StoreSettings::default()
        };
        db.settings_repo().upsert(&settings).await?;
        println!("✓ Store settings saved ({})", settings.shop_name);
    }

    // Insert the catalog
    println!();
    println!("Seeding catalog...");

    let mut seeded = 0;
    let start = std::time::Instant::now();

    for (category, supplier, shelf_life_days, items) in CATALOG {
        for item in *items {
            let product = seed_product(*category, supplier, *shelf_life_days, item);

            if let Err(e) = db.products().insert(&product).await {
                eprintln!("Failed to insert {}: {}", product.name, e);
                continue;
            }

            seeded += 1;
        }

        println!("  {:?}: {} items", category, items.len());
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Seeded {} products in {:?}", seeded, elapsed);

    // Spot checks
    println!();
    println!("Verifying...");

    let gin = db.products().get_by_barcode("6001234500017").await?;
    println!(
        "  Barcode 6001234500017: {}",
        gin.map(|p| p.name).unwrap_or_else(|| "NOT FOUND".to_string())
    );

    let catalog = db.catalog().await?;
    let low = catalog.iter().filter(|p| p.is_low_stock()).count();
    println!("  Low stock items: {}", low);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one catalog product from a seed row.
fn seed_product(
    category: Category,
    supplier: &str,
    shelf_life_days: Option<i64>,
    item: &SeedItem,
) -> Product {
    let now = Utc::now();
    let (name, barcode, price_kwacha, cost_kwacha, stock) = *item;

    let expires_on = shelf_life_days.map(|days| now.date_naive() + Duration::days(days));

    Product {
        id: generate_product_id(),
        name: name.to_string(),
        category,
        price: Money::from_kwacha(price_kwacha),
        cost: Money::from_kwacha(cost_kwacha),
        stock,
        barcode: barcode.to_string(),
        low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        expires_on,
        supplier: Some(supplier.to_string()),
        image_ref: None,
        created_at: now,
        updated_at: now,
    }
}
