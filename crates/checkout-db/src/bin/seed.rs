//! # Sample Data Loader
//!
//! Creates (or migrates) a checkout database and fills an empty inventory
//! with the sample fruit stand.
//!
//! ## Usage
//! ```bash
//! cargo run -p checkout-db --bin seed
//! cargo run -p checkout-db --bin seed -- --db ./data/checkout.db
//! ```

use std::env;

use checkout_db::{load_sample_data, Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./checkout_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(path) = args.get(i + 1) {
                    db_path = path.clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Checkout Sample Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./checkout_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("Database: {}", db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let report = load_sample_data(&db).await?;

    if report.skipped {
        println!("Inventory already populated, nothing to do.");
        println!("Delete the database file to start over.");
    } else {
        println!(
            "Created {} items and {} offers.",
            report.items_created, report.offers_created
        );
    }

    for item in db.items().list().await? {
        let offer = db.offers().find_by_item(item.id).await?;
        match offer {
            Some(offer) => println!(
                "  #{:<3} {:<10} {:>6}   {} for {}",
                item.id,
                item.name,
                item.unit_price(),
                offer.quantity,
                offer.terms().total_price
            ),
            None => println!("  #{:<3} {:<10} {:>6}", item.id, item.name, item.unit_price()),
        }
    }

    db.close().await;
    Ok(())
}
