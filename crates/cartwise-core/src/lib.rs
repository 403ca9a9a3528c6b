//! # cartwise-core: Pure Pricing & Reconciliation Logic
//!
//! This crate is the **heart** of Cartwise. It contains all cart math as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cartwise Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront (HTTP routes, Cart/Checkout UI)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        cartwise-engine (catalog fetch, async reconcile)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cartwise-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  pricing  │  │   │
//! │  │   │ CatalogEn │  │   Money   │  │  merge    │  │ FeePolicy │  │   │
//! │  │   │ LineItem  │  │  TaxCalc  │  │  clamp    │  │  price    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItemRequest, CatalogEntry, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Request merging and snapshot application
//! - [`pricing`] - Fee policy and the pricing calculator
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cartwise_core::money::Money;
//! use cartwise_core::pricing::{price, FeePolicy};
//! use cartwise_core::ReconciledLineItem;
//!
//! let items = vec![ReconciledLineItem::new("A", Money::from_cents(1000), 1)];
//! let totals = price(&items, &FeePolicy::default());
//!
//! // $10.00 + $0.85 tax + $5.99 shipping
//! assert_eq!(totals.grand_total.cents(), 1684);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{price, summarize, CartSummary, FeePolicy, PricingResult};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default sales tax: 8.5%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 850;

/// Default free-shipping threshold: $35.00.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS: i64 = 3500;

/// Default flat shipping fee below the threshold: $5.99.
pub const DEFAULT_FLAT_SHIPPING_FEE_CENTS: i64 = 599;

/// Above this many units a product is simply "In Stock"; at or below it the
/// storefront shows "Only N left in stock".
pub const LOW_STOCK_THRESHOLD: i64 = 20;
