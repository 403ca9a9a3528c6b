//! # Cart Reconciler
//!
//! Adjusts requested cart quantities against live catalog truth.
//!
//! ## Reconcile Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         reconcile(requests)                             │
//! │                                                                         │
//! │  1. validate_requests()  ── qty <= 0 ──► Err(InvalidQuantity)          │
//! │         │                               (catalog never touched)         │
//! │         ▼                                                               │
//! │  2. empty cart? ───────── yes ─────────► Ok([])  (no fetch)            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  3. merge_requests()     duplicates summed, first position kept        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  4. ONE fetch for all ids, under a deadline                            │
//! │         │                                                               │
//! │         ├── error / timeout ───────────► Err(CatalogUnavailable)       │
//! │         ▼                                                               │
//! │  5. apply_snapshot()     drop missing/inactive/empty, clamp to stock   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │     Ok(lines in request order)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached between calls: every reconcile reads fresh stock.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use cartwise_core::cart::{apply_snapshot, merge_requests, product_ids};
use cartwise_core::validation::validate_requests;
use cartwise_core::{CatalogEntry, LineItemRequest, ProductId, Reconciliation, ReconciledLineItem};

use crate::catalog::CatalogReader;
use crate::error::{EngineError, EngineResult};
use crate::DEFAULT_FETCH_TIMEOUT_MS;

/// Reconciles carts against a [`CatalogReader`].
///
/// Cheap to clone and safe to share: it holds only the reader handle and
/// the fetch deadline, so concurrent reconciliations never share mutable
/// state.
#[derive(Clone)]
pub struct Reconciler {
    catalog: Arc<dyn CatalogReader>,
    fetch_timeout: Duration,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Creates a reconciler with the default fetch deadline.
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Reconciler {
            catalog,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }

    /// Overrides the fetch deadline.
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Reconciles a raw cart and returns the surviving lines.
    ///
    /// ## Errors
    /// - [`EngineError::InvalidQuantity`] if any line asks for <= 0 units
    /// - [`EngineError::CatalogUnavailable`] if the fetch fails or times out
    pub async fn reconcile(
        &self,
        requests: &[LineItemRequest],
    ) -> EngineResult<Vec<ReconciledLineItem>> {
        Ok(self.reconcile_detailed(requests).await?.items)
    }

    /// Like [`reconcile`](Self::reconcile), but also reports every clamp and
    /// drop, plus when the snapshot was taken.
    pub async fn reconcile_detailed(
        &self,
        requests: &[LineItemRequest],
    ) -> EngineResult<Reconciliation> {
        let span = info_span!(
            "reconcile",
            reconciliation_id = %Uuid::new_v4(),
            lines = requests.len()
        );

        self.reconcile_in_span(requests).instrument(span).await
    }

    async fn reconcile_in_span(&self, requests: &[LineItemRequest]) -> EngineResult<Reconciliation> {
        validate_requests(requests)?;

        if requests.is_empty() {
            debug!("Empty cart, skipping catalog fetch");
            return Ok(Reconciliation::empty(Utc::now()));
        }

        let merged = merge_requests(requests);
        let ids = product_ids(&merged);

        let snapshot = self.fetch_snapshot(&ids).await?;
        let reconciliation = apply_snapshot(&merged, &snapshot, Utc::now());

        for adjustment in &reconciliation.adjustments {
            debug!(product_id = %adjustment.product_id(), %adjustment, "Line adjusted");
        }

        info!(
            requested = merged.len(),
            kept = reconciliation.items.len(),
            adjusted = reconciliation.adjustments.len(),
            "Cart reconciled"
        );

        Ok(reconciliation)
    }

    /// The single catalog round-trip of a reconciliation.
    async fn fetch_snapshot(
        &self,
        ids: &HashSet<ProductId>,
    ) -> EngineResult<HashMap<ProductId, CatalogEntry>> {
        debug!(products = ids.len(), "Fetching catalog snapshot");

        match tokio::time::timeout(self.fetch_timeout, self.catalog.fetch_catalog_entries(ids)).await
        {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(err)) => {
                warn!(error = %err, "Catalog fetch failed");
                Err(err.into())
            }
            Err(_) => {
                let timeout_ms = self.fetch_timeout.as_millis() as u64;
                warn!(timeout_ms, "Catalog fetch timed out");
                Err(EngineError::CatalogUnavailable(format!(
                    "fetch timed out after {} ms",
                    timeout_ms
                )))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
