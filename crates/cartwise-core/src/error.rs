//! # Error Types
//!
//! Domain-specific error types for cartwise-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartwise-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cartwise-engine errors (separate crate)                               │
//! │  ├── CatalogError     - Catalog collaborator failures                  │
//! │  └── EngineError      - What the caller of reconcile/quote sees        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → HTTP/UI layer       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations in cart math and stock bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A cart line asked for zero or fewer units.
    ///
    /// ## When This Occurs
    /// - A client sent `quantity: 0` or a negative number
    /// - Detected before the catalog is touched
    #[error("Invalid quantity {quantity} for product {product_id}: must be at least 1")]
    InvalidQuantity { product_id: ProductId, quantity: i64 },

    /// Removing more units than the catalog holds.
    ///
    /// ## User Workflow
    /// ```text
    /// Order placed (qty: 5)
    ///      │
    ///      ▼
    /// Stock check: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: "A", available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// A catalog entry or fee setting broke a field rule.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level rule violations, named by the offending field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank after trimming.
    #[error("{field} cannot be empty")]
    Required { field: String },

    #[error("{field} exceeds {max} characters")]
    TooLong { field: String, max: usize },

    /// Outside the inclusive range `min..=max`.
    #[error("{field} must be in {min}..={max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
