//! # Catalog Snapshot Reader
//!
//! The engine's only external collaborator: something that can report the
//! current price, activity and stock for a batch of products.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_catalog_entries({A, B, C})                                      │
//! │       │                                                                 │
//! │       ├── Ok({A: entry, C: entry})   B unknown → simply absent         │
//! │       │                                                                 │
//! │       └── Err(Unavailable)           store down / errored              │
//! │                                                                         │
//! │  • Called once per reconciliation with every distinct product id       │
//! │  • Output keys are a subset of the input ids                           │
//! │  • Retries are the implementation's business, not the engine's        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`InMemoryCatalog`] is a complete in-process implementation used by
//! tests and by callers that already hold the catalog in memory.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use cartwise_core::validation::{validate_price_cents, validate_product_id, validate_stock};
use cartwise_core::{CatalogEntry, CoreError, ProductId};

// =============================================================================
// Errors
// =============================================================================

/// Catalog collaborator errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached or failed while reading.
    #[error("catalog unavailable: {reason}")]
    Unavailable { reason: String },

    /// A catalog mutation referenced an unknown product.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// A catalog mutation broke a business rule.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CatalogError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        CatalogError::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Reader Trait
// =============================================================================

/// Reads a consistent snapshot of catalog entries for a set of products.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Returns the entries that exist for `product_ids`. Unknown ids are
    /// absent from the map rather than errors.
    async fn fetch_catalog_entries(
        &self,
        product_ids: &HashSet<ProductId>,
    ) -> CatalogResult<HashMap<ProductId, CatalogEntry>>;
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// Direction of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    /// Units leave the shelf (an order was placed).
    Remove(i64),
    /// Units return to the shelf (restock, cancelled order).
    Restock(i64),
}

/// A catalog held in process memory.
///
/// ## Thread Safety
/// Entries live behind a `tokio::sync::RwLock`: concurrent reconciliations
/// read in parallel while stock updates take the write lock. A fetch copies
/// the requested entries out under one read guard, so every fetch sees one
/// consistent snapshot.
///
/// ## Test Controls
/// - [`fetch_count`](Self::fetch_count) counts served fetch calls
/// - [`set_unavailable`](Self::set_unavailable) simulates an outage
/// - [`with_latency`](Self::with_latency) delays every fetch
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: RwLock<HashMap<ProductId, CatalogEntry>>,
    outage: RwLock<Option<String>>,
    fetches: AtomicU64,
    latency: Option<Duration>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from entries, rejecting invalid ones.
    pub fn with_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> CatalogResult<Self> {
        let mut map = HashMap::new();
        for entry in entries {
            validate_entry(&entry)?;
            map.insert(entry.product_id.clone(), entry);
        }

        Ok(InMemoryCatalog {
            entries: RwLock::new(map),
            ..Self::default()
        })
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Inserts or replaces an entry.
    pub async fn upsert(&self, entry: CatalogEntry) -> CatalogResult<()> {
        validate_entry(&entry)?;
        debug!(product_id = %entry.product_id, "Upserting catalog entry");
        self.entries
            .write()
            .await
            .insert(entry.product_id.clone(), entry);
        Ok(())
    }

    /// Removes an entry; later fetches report it as absent.
    pub async fn remove(&self, product_id: &ProductId) -> Option<CatalogEntry> {
        self.entries.write().await.remove(product_id)
    }

    /// Activates or soft-deletes a product.
    pub async fn set_active(&self, product_id: &ProductId, active: bool) -> CatalogResult<()> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))?;
        entry.is_active = active;
        Ok(())
    }

    /// Applies a stock change and returns the new stock level.
    ///
    /// Removing more than is on hand fails with
    /// [`CoreError::InsufficientStock`] and leaves stock untouched.
    pub async fn adjust_stock(
        &self,
        product_id: &ProductId,
        adjustment: StockAdjustment,
    ) -> CatalogResult<i64> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))?;

        match adjustment {
            StockAdjustment::Remove(qty) => {
                validate_stock(qty).map_err(CoreError::from)?;
                if entry.available_stock < qty {
                    return Err(CoreError::InsufficientStock {
                        product_id: product_id.clone(),
                        available: entry.available_stock,
                        requested: qty,
                    }
                    .into());
                }
                entry.available_stock -= qty;
            }
            StockAdjustment::Restock(qty) => {
                validate_stock(qty).map_err(CoreError::from)?;
                entry.available_stock = entry.available_stock.saturating_add(qty);
            }
        }

        debug!(
            product_id = %product_id,
            stock = entry.available_stock,
            "Stock adjusted"
        );
        Ok(entry.available_stock)
    }

    /// Makes every later fetch fail (`Some(reason)`) or succeed again (`None`).
    pub async fn set_unavailable(&self, reason: Option<String>) {
        match &reason {
            Some(reason) => info!(%reason, "Catalog marked unavailable"),
            None => info!("Catalog available again"),
        }
        *self.outage.write().await = reason;
    }

    /// Number of fetches served so far, including failed ones.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of products held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn validate_entry(entry: &CatalogEntry) -> CatalogResult<()> {
    validate_product_id(entry.product_id.as_str()).map_err(CoreError::from)?;
    validate_price_cents(entry.unit_price.cents()).map_err(CoreError::from)?;
    validate_stock(entry.available_stock).map_err(CoreError::from)?;
    Ok(())
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn fetch_catalog_entries(
        &self,
        product_ids: &HashSet<ProductId>,
    ) -> CatalogResult<HashMap<ProductId, CatalogEntry>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(reason) = self.outage.read().await.clone() {
            return Err(CatalogError::Unavailable { reason });
        }

        let entries = self.entries.read().await;
        let found: HashMap<ProductId, CatalogEntry> = product_ids
            .iter()
            .filter_map(|id| entries.get(id).map(|e| (id.clone(), e.clone())))
            .collect();

        debug!(
            requested = product_ids.len(),
            found = found.len(),
            "Catalog fetch served"
        );
        Ok(found)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cartwise_core::Money;
    use std::sync::Arc;

    fn entry(id: &str, cents: i64, stock: i64) -> CatalogEntry {
        CatalogEntry::new(id, Money::from_cents(cents), true, stock)
    }

    fn ids(list: &[&str]) -> HashSet<ProductId> {
        list.iter().map(|s| ProductId::from(*s)).collect()
    }

    #[tokio::test]
    async fn test_fetch_returns_subset_for_known_ids() {
        let catalog = InMemoryCatalog::with_entries(vec![entry("A", 100, 1), entry("B", 200, 2)]).unwrap();

        let found = catalog
            .fetch_catalog_entries(&ids(&["A", "missing"]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&ProductId::from("A")));
        assert_eq!(catalog.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_outage_fails_fetch_and_still_counts() {
        let catalog = InMemoryCatalog::with_entries(vec![entry("A", 100, 1)]).unwrap();
        catalog.set_unavailable(Some("maintenance".into())).await;

        let err = catalog.fetch_catalog_entries(&ids(&["A"])).await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable { ref reason } if reason == "maintenance"));
        assert_eq!(catalog.fetch_count(), 1);

        catalog.set_unavailable(None).await;
        assert!(catalog.fetch_catalog_entries(&ids(&["A"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_invalid_entries() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.upsert(entry("A", -1, 1)).await.is_err());
        assert!(catalog.upsert(entry("A", 100, -1)).await.is_err());
        assert!(catalog.upsert(entry("  ", 100, 1)).await.is_err());
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn test_adjust_stock() {
        let catalog = InMemoryCatalog::with_entries(vec![entry("A", 100, 3)]).unwrap();
        let id = ProductId::from("A");

        assert_eq!(catalog.adjust_stock(&id, StockAdjustment::Remove(2)).await.unwrap(), 1);
        assert_eq!(catalog.adjust_stock(&id, StockAdjustment::Restock(4)).await.unwrap(), 5);

        let err = catalog
            .adjust_stock(&id, StockAdjustment::Remove(6))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Core(CoreError::InsufficientStock { available: 5, requested: 6, .. })
        ));

        let missing = ProductId::from("nope");
        assert!(matches!(
            catalog.adjust_stock(&missing, StockAdjustment::Restock(1)).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_set_active_and_remove() {
        let catalog = InMemoryCatalog::with_entries(vec![entry("A", 100, 3)]).unwrap();
        let id = ProductId::from("A");

        catalog.set_active(&id, false).await.unwrap();
        let found = catalog.fetch_catalog_entries(&ids(&["A"])).await.unwrap();
        assert!(!found[&id].is_active);

        assert!(catalog.remove(&id).await.is_some());
        assert_eq!(catalog.len().await, 0);
    }

    #[tokio::test]
    async fn test_shared_through_arc() {
        let catalog = Arc::new(InMemoryCatalog::with_entries(vec![entry("A", 100, 3)]).unwrap());
        let reader: Arc<dyn CatalogReader> = catalog.clone();

        reader.fetch_catalog_entries(&ids(&["A"])).await.unwrap();
        assert_eq!(catalog.fetch_count(), 1);
    }
}
