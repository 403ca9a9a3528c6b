//! # Domain Types
//!
//! Core domain types used throughout Cartwise.
//!
//! ## Type Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │ LineItemRequest │   │  CatalogEntry   │   │ ReconciledLineItem   │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  product_id     │ + │  unit_price     │ ► │  product_id          │  │
//! │  │  requested_qty  │   │  is_active      │   │  unit_price          │  │
//! │  │  (from session) │   │  available_stock│   │  quantity (clamped)  │  │
//! │  └─────────────────┘   └─────────────────┘   │  line_total          │  │
//! │                                              └──────────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    TaxRate      │   │   StockStatus   │   │   LineAdjustment     │  │
//! │  │  bps (u32)      │   │  InStock        │   │  Clamped             │  │
//! │  │  850 = 8.5%     │   │  LowStock       │   │  DroppedMissing      │  │
//! │  └─────────────────┘   │  OutOfStock     │   │  DroppedInactive     │  │
//! │                        │  Unavailable    │   │  DroppedOutOfStock   │  │
//! │                        └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 850 bps = 8.5% = fraction 0.085
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product Identity
// =============================================================================

/// Opaque product identifier.
///
/// The engine never interprets the contents; the catalog decides what a
/// valid id looks like (UUID, database key, SKU...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Cart Input
// =============================================================================

/// One raw cart line as produced by the cart owner (user session/storage).
///
/// The quantity is not trusted: it is validated before any catalog access
/// and reclamped against live stock during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemRequest {
    pub product_id: ProductId,
    pub requested_quantity: i64,
}

impl LineItemRequest {
    pub fn new(product_id: impl Into<ProductId>, requested_quantity: i64) -> Self {
        LineItemRequest {
            product_id: product_id.into(),
            requested_quantity,
        }
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// A product as seen by the catalog at read time.
///
/// Owned by the catalog collaborator; read-only to the engine and possibly
/// stale by the time it is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogEntry {
    pub product_id: ProductId,

    /// Current price per unit.
    pub unit_price: Money,

    /// Inactive products are soft-deleted and never sold.
    pub is_active: bool,

    /// Units currently on hand.
    pub available_stock: i64,
}

impl CatalogEntry {
    pub fn new(
        product_id: impl Into<ProductId>,
        unit_price: Money,
        is_active: bool,
        available_stock: i64,
    ) -> Self {
        CatalogEntry {
            product_id: product_id.into(),
            unit_price,
            is_active,
            available_stock,
        }
    }

    /// Stock the engine is willing to sell. A negative count reported by a
    /// collaborator is treated as empty.
    #[inline]
    pub fn sellable_stock(&self) -> i64 {
        self.available_stock.max(0)
    }

    /// Customer-facing availability for this entry.
    pub fn availability(&self) -> StockStatus {
        if !self.is_active {
            return StockStatus::Unavailable;
        }

        match self.sellable_stock() {
            0 => StockStatus::OutOfStock,
            n if n > LOW_STOCK_THRESHOLD => StockStatus::InStock,
            n => StockStatus::LowStock { remaining: n },
        }
    }
}

// =============================================================================
// Availability
// =============================================================================

/// Availability label shown next to a product.
///
/// ```text
/// stock > 20        → InStock       "In Stock"
/// 0 < stock <= 20   → LowStock      "Only 3 left in stock"
/// stock == 0        → OutOfStock    "Out of Stock"
/// inactive          → Unavailable   "Currently unavailable"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock { remaining: i64 },
    OutOfStock,
    Unavailable,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "In Stock"),
            StockStatus::LowStock { remaining } => {
                write!(f, "Only {} left in stock", remaining)
            }
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
            StockStatus::Unavailable => write!(f, "Currently unavailable"),
        }
    }
}

// =============================================================================
// Reconciled Line Item
// =============================================================================

/// A cart line after reconciliation against one catalog snapshot.
///
/// Ephemeral: exists only for one pricing computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciledLineItem {
    pub product_id: ProductId,
    /// Price at snapshot time.
    pub unit_price: Money,
    /// Clamped to `1..=available_stock`.
    pub quantity: i64,
    /// `unit_price × quantity`.
    pub line_total: Money,
}

impl ReconciledLineItem {
    pub fn new(product_id: impl Into<ProductId>, unit_price: Money, quantity: i64) -> Self {
        ReconciledLineItem {
            product_id: product_id.into(),
            unit_price,
            quantity,
            line_total: unit_price.multiply_quantity(quantity),
        }
    }
}

// =============================================================================
// Line Adjustment
// =============================================================================

/// What reconciliation changed for one (deduplicated) cart line.
///
/// The surrounding layer uses these to tell the customer why their cart
/// differs from what they asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineAdjustment {
    /// Requested more than is on hand; quantity reduced.
    Clamped {
        product_id: ProductId,
        requested: i64,
        granted: i64,
    },
    /// The catalog has no such product.
    DroppedMissing { product_id: ProductId },
    /// The product exists but is not active.
    DroppedInactive { product_id: ProductId },
    /// Active product with no stock.
    DroppedOutOfStock { product_id: ProductId },
}

impl LineAdjustment {
    pub fn product_id(&self) -> &ProductId {
        match self {
            LineAdjustment::Clamped { product_id, .. }
            | LineAdjustment::DroppedMissing { product_id }
            | LineAdjustment::DroppedInactive { product_id }
            | LineAdjustment::DroppedOutOfStock { product_id } => product_id,
        }
    }

    /// True when the line was removed from the cart entirely.
    pub fn is_drop(&self) -> bool {
        !matches!(self, LineAdjustment::Clamped { .. })
    }
}

impl fmt::Display for LineAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineAdjustment::Clamped { granted, .. } => {
                write!(f, "Only {} items available in stock", granted)
            }
            LineAdjustment::DroppedMissing { product_id } => {
                write!(f, "Product {} no longer exists", product_id)
            }
            LineAdjustment::DroppedInactive { product_id } => {
                write!(f, "Product {} is no longer available", product_id)
            }
            LineAdjustment::DroppedOutOfStock { product_id } => {
                write!(f, "Product {} is out of stock", product_id)
            }
        }
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Result of reconciling one cart against one catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reconciliation {
    /// Surviving lines, in first-occurrence order of the request.
    pub items: Vec<ReconciledLineItem>,

    /// Clamps and drops, in the same order.
    pub adjustments: Vec<LineAdjustment>,

    /// When the catalog snapshot was read.
    #[ts(as = "String")]
    pub snapshot_taken_at: DateTime<Utc>,
}

impl Reconciliation {
    /// An empty reconciliation (no request lines, no catalog read).
    pub fn empty(snapshot_taken_at: DateTime<Utc>) -> Self {
        Reconciliation {
            items: Vec::new(),
            adjustments: Vec::new(),
            snapshot_taken_at,
        }
    }

    /// True when the reconciled cart differs from what was requested.
    pub fn was_adjusted(&self) -> bool {
        !self.adjustments.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(850);
        assert_eq!(rate.bps(), 850);
        assert!(!rate.is_zero());
        assert!(TaxRate::default().is_zero());
    }

    #[test]
    fn test_availability_labels() {
        let entry = |active, stock| CatalogEntry::new("A", Money::from_cents(100), active, stock);

        assert_eq!(entry(true, 21).availability(), StockStatus::InStock);
        assert_eq!(
            entry(true, 20).availability(),
            StockStatus::LowStock { remaining: 20 }
        );
        assert_eq!(entry(true, 0).availability(), StockStatus::OutOfStock);
        assert_eq!(entry(true, -4).availability(), StockStatus::OutOfStock);
        assert_eq!(entry(false, 50).availability(), StockStatus::Unavailable);

        assert_eq!(
            entry(true, 3).availability().to_string(),
            "Only 3 left in stock"
        );
    }

    #[test]
    fn test_line_total_is_price_times_quantity() {
        let item = ReconciledLineItem::new("A", Money::from_cents(1999), 3);
        assert_eq!(item.line_total.cents(), 5997);
    }

    #[test]
    fn test_adjustment_messages() {
        let clamp = LineAdjustment::Clamped {
            product_id: "A".into(),
            requested: 5,
            granted: 2,
        };
        assert_eq!(clamp.to_string(), "Only 2 items available in stock");
        assert!(!clamp.is_drop());

        let drop = LineAdjustment::DroppedInactive {
            product_id: "B".into(),
        };
        assert!(drop.is_drop());
        assert_eq!(drop.product_id().as_str(), "B");
    }

    #[test]
    fn test_product_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ProductId::from("sku-1")).unwrap();
        assert_eq!(json, "\"sku-1\"");
    }

    #[test]
    fn test_adjustment_serializes_with_kind_tag() {
        let adj = LineAdjustment::DroppedOutOfStock {
            product_id: "A".into(),
        };
        let json = serde_json::to_value(&adj).unwrap();
        assert_eq!(json["kind"], "dropped_out_of_stock");
        assert_eq!(json["product_id"], "A");
    }
}
