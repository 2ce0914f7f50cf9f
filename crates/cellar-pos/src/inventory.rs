//! # Inventory
//!
//! Catalog administration: create, edit, restock, and retire products,
//! plus the reorder and expiry watch lists.
//!
//! Every write lands in the audit log. Unlike checkout, a refused audit
//! append here is logged and swallowed; blocking a shelf edit over the
//! activity feed is not worth it.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::audit;
use crate::error::PosError;
use cellar_core::validation::{
    validate_barcode, validate_low_stock_threshold, validate_pricing, validate_product_name,
    validate_stock,
};
use cellar_core::{Category, Money, Product, Severity, User, DEFAULT_LOW_STOCK_THRESHOLD};
use cellar_db::repository::product::generate_product_id;
use cellar_db::Database;

/// New catalog entry request.
///
/// Money fields arrive as tambala; the register converts from the
/// kwacha the shopkeeper types.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub price: Money,
    pub cost: Money,
    pub stock: i64,
    /// Empty means no printed barcode; the product is keyed by name.
    #[serde(default)]
    pub barcode: String,
    /// Defaults to the system-wide threshold when omitted.
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// Catalog service.
#[derive(Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    /// Creates a new inventory service.
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    /// The full catalog, cached between writes.
    pub async fn catalog(&self) -> Result<Vec<Product>, PosError> {
        Ok(self.db.catalog().await?)
    }

    /// Fetches one product.
    pub async fn get(&self, id: &str) -> Result<Product, PosError> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| PosError::not_found("Product", id))
    }

    /// Barcode scan lookup.
    ///
    /// A miss is routine (new stock the shop has not entered yet), so it
    /// comes back as `None` rather than an error; the register offers
    /// the create form instead.
    pub async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, PosError> {
        Ok(self.db.products().get_by_barcode(barcode.trim()).await?)
    }

    /// Adds a product to the catalog.
    pub async fn create(&self, new: NewProduct, actor: &User) -> Result<Product, PosError> {
        validate_product_name(&new.name)?;
        validate_barcode(&new.barcode)?;
        validate_pricing(new.price, new.cost)?;
        validate_stock(new.stock)?;
        let threshold = new.low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        validate_low_stock_threshold(threshold)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: new.name.trim().to_string(),
            category: new.category,
            price: new.price,
            cost: new.cost,
            stock: new.stock,
            barcode: new.barcode.trim().to_string(),
            low_stock_threshold: threshold,
            expires_on: new.expires_on,
            supplier: new.supplier,
            image_ref: new.image_ref,
            created_at: now,
            updated_at: now,
        };

        self.db.products().insert(&product).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "product.created",
                format!("Added '{}' ({}) to the catalog", product.name, product.category),
                Severity::Info,
            ),
        )
        .await;

        info!(id = %product.id, name = %product.name, "Product created");

        Ok(product)
    }

    /// Saves edits to a product, replacing the stored record.
    ///
    /// The insert-or-replace semantics mean an id that has never been
    /// seen is admitted as a new row; the register only ever sends ids
    /// it got from the catalog.
    pub async fn save(&self, mut product: Product, actor: &User) -> Result<Product, PosError> {
        validate_product_name(&product.name)?;
        validate_barcode(&product.barcode)?;
        validate_pricing(product.price, product.cost)?;
        validate_stock(product.stock)?;
        validate_low_stock_threshold(product.low_stock_threshold)?;

        product.name = product.name.trim().to_string();
        product.barcode = product.barcode.trim().to_string();

        self.db.products().upsert(&product).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "product.updated",
                format!("Edited '{}'", product.name),
                Severity::Info,
            ),
        )
        .await;

        self.get(&product.id).await
    }

    /// Applies a signed stock delta: a restock or a shelf-count
    /// correction. The stored level clamps at zero.
    pub async fn adjust_stock(
        &self,
        id: &str,
        delta: i64,
        actor: &User,
    ) -> Result<Product, PosError> {
        let product = self.get(id).await?;

        self.db.products().adjust_stock(id, delta).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "stock.adjusted",
                format!("Adjusted '{}' stock by {:+}", product.name, delta),
                Severity::Info,
            ),
        )
        .await;

        self.get(id).await
    }

    /// Removes a product from the catalog.
    ///
    /// Past sales keep their own name/price/cost snapshots, so history
    /// and reports survive the removal untouched.
    pub async fn delete(&self, id: &str, actor: &User) -> Result<(), PosError> {
        let product = self.get(id).await?;

        self.db.products().delete(id).await?;

        audit::record(
            &self.db,
            audit::entry(
                &actor.display_name,
                "product.deleted",
                format!("Deleted '{}' from the catalog", product.name),
                Severity::Warning,
            ),
        )
        .await;

        info!(id = %id, name = %product.name, "Product deleted");

        Ok(())
    }

    /// Products at or below their reorder threshold, lowest stock first.
    pub async fn low_stock(&self) -> Result<Vec<Product>, PosError> {
        Ok(self.db.products().list_low_stock().await?)
    }

    /// Products expiring strictly before the cutoff, soonest first.
    pub async fn expiring_before(&self, cutoff: NaiveDate) -> Result<Vec<Product>, PosError> {
        Ok(self.db.products().list_expiring_before(cutoff).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
