//! # Cart Reconciliation (pure steps)
//!
//! The I/O-free halves of reconciliation. The async catalog fetch sits
//! between them and lives in `cartwise-engine`.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reconciliation Pipeline                              │
//! │                                                                         │
//! │  [(B,1), (A,2), (A,3)]                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_requests()     qty <= 0 → InvalidQuantity (no fetch)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  merge_requests()  ← THIS MODULE                                       │
//! │       │            [(B,1), (A,5)]   first-occurrence order kept        │
//! │       ▼                                                                 │
//! │  catalog fetch {A, B}    (engine, one batched call)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_snapshot()  ← THIS MODULE                                       │
//! │                    drop missing/inactive/empty, clamp to stock         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::types::{
    CatalogEntry, LineAdjustment, LineItemRequest, ProductId, Reconciliation, ReconciledLineItem,
};

/// Collapses repeated lines for the same product into one.
///
/// Quantities are summed (saturating) and each product keeps the position
/// of its first occurrence. This models repeated "add to cart" clicks.
///
/// ```rust
/// use cartwise_core::cart::merge_requests;
/// use cartwise_core::LineItemRequest;
///
/// let merged = merge_requests(&[
///     LineItemRequest::new("B", 1),
///     LineItemRequest::new("A", 2),
///     LineItemRequest::new("A", 3),
/// ]);
/// assert_eq!(merged, vec![LineItemRequest::new("B", 1), LineItemRequest::new("A", 5)]);
/// ```
pub fn merge_requests(requests: &[LineItemRequest]) -> Vec<LineItemRequest> {
    let mut merged: Vec<LineItemRequest> = Vec::with_capacity(requests.len());
    let mut position: HashMap<&ProductId, usize> = HashMap::with_capacity(requests.len());

    for request in requests {
        match position.get(&request.product_id) {
            Some(&idx) => {
                let line = &mut merged[idx];
                line.requested_quantity = line
                    .requested_quantity
                    .saturating_add(request.requested_quantity);
            }
            None => {
                position.insert(&request.product_id, merged.len());
                merged.push(request.clone());
            }
        }
    }

    merged
}

/// The distinct product ids of a merged cart, for the batched fetch.
pub fn product_ids(requests: &[LineItemRequest]) -> HashSet<ProductId> {
    requests.iter().map(|r| r.product_id.clone()).collect()
}

/// Applies one catalog snapshot to merged cart lines.
///
/// ## Rules (per line, in order)
/// 1. No catalog entry        → dropped (`DroppedMissing`)
/// 2. Entry inactive          → dropped (`DroppedInactive`)
/// 3. No sellable stock       → dropped (`DroppedOutOfStock`)
/// 4. Requested > stock       → clamped to stock (`Clamped`)
/// 5. Otherwise               → kept as requested
///
/// Every emitted line satisfies `1 <= quantity <= available_stock`.
pub fn apply_snapshot(
    merged: &[LineItemRequest],
    snapshot: &HashMap<ProductId, CatalogEntry>,
    snapshot_taken_at: DateTime<Utc>,
) -> Reconciliation {
    let mut reconciliation = Reconciliation::empty(snapshot_taken_at);

    for request in merged {
        let product_id = &request.product_id;

        let entry = match snapshot.get(product_id) {
            Some(entry) => entry,
            None => {
                reconciliation
                    .adjustments
                    .push(LineAdjustment::DroppedMissing {
                        product_id: product_id.clone(),
                    });
                continue;
            }
        };

        if !entry.is_active {
            reconciliation
                .adjustments
                .push(LineAdjustment::DroppedInactive {
                    product_id: product_id.clone(),
                });
            continue;
        }

        let stock = entry.sellable_stock();
        if stock == 0 {
            reconciliation
                .adjustments
                .push(LineAdjustment::DroppedOutOfStock {
                    product_id: product_id.clone(),
                });
            continue;
        }

        let quantity = request.requested_quantity.min(stock);
        if quantity < request.requested_quantity {
            reconciliation.adjustments.push(LineAdjustment::Clamped {
                product_id: product_id.clone(),
                requested: request.requested_quantity,
                granted: quantity,
            });
        }

        reconciliation.items.push(ReconciledLineItem::new(
            product_id.clone(),
            entry.unit_price,
            quantity,
        ));
    }

    reconciliation
}

// =============================================================================
// Unit Tests
// =============================================================================
