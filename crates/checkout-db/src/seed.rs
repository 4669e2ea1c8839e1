//! # Sample Data
//!
//! A small fruit-stand inventory for development and demos.
//!
//! ```text
//! Item     Unit   Offer
//! ──────   ────   ───────────
//! Apple     30    2 for 45
//! Banana    50    3 for 130
//! Peach     60    -
//! Kiwi      20    -
//! ```

use tracing::{info, warn};

use crate::error::DbResult;
use crate::pool::Database;

/// `(name, unit price, optional (group size, group price))`
pub const SAMPLE_ITEMS: &[(&str, i64, Option<(i64, i64)>)] = &[
    ("Apple", 30, Some((2, 45))),
    ("Banana", 50, Some((3, 130))),
    ("Peach", 60, None),
    ("Kiwi", 20, None),
];

/// What [`load_sample_data`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub items_created: usize,
    pub offers_created: usize,

    /// The inventory already had items, so nothing was inserted.
    pub skipped: bool,
}

/// Inserts [`SAMPLE_ITEMS`] and their offers into an empty inventory.
///
/// Does nothing if any item exists, so running it on every startup is
/// safe.
pub async fn load_sample_data(db: &Database) -> DbResult<SeedReport> {
    let existing = db.items().count().await?;
    if existing > 0 {
        warn!(existing, "Inventory not empty, skipping sample data");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    let mut report = SeedReport::default();
    for (name, unit_price_cents, offer) in SAMPLE_ITEMS {
        let item = db.items().insert(name, *unit_price_cents).await?;
        report.items_created += 1;

        if let Some((quantity, total_price_cents)) = offer {
            db.offers()
                .insert(item.id, *quantity, *total_price_cents)
                .await?;
            report.offers_created += 1;
        }
    }

    info!(
        items = report.items_created,
        offers = report.offers_created,
        "Sample data loaded"
    );
    Ok(report)
}
