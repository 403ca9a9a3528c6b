//! # Engine Error Types
//!
//! What callers of `reconcile`, `quote` and config loading see.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Engine Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌──────────────────────┐  ┌───────────────┐  │
//! │  │   Caller errors     │  │  Collaborator errors │  │ Configuration │  │
//! │  │                     │  │                      │  │               │  │
//! │  │  InvalidQuantity    │  │  CatalogUnavailable  │  │ InvalidConfig │  │
//! │  │  (before any I/O)   │  │  (fetch failed or    │  │ ConfigLoad-   │  │
//! │  │                     │  │   timed out)         │  │   Failed      │  │
//! │  └─────────────────────┘  └──────────────────────┘  └───────────────┘  │
//! │                                                                         │
//! │  Catalog bookkeeping: InsufficientStock, ProductNotFound, InvalidInput │
//! │                                                                         │
//! │  Both reconcile errors halt the call: no partial carts are returned.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use cartwise_core::{CoreError, ProductId, ValidationError};

use crate::catalog::CatalogError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    // =========================================================================
    // Reconciliation Errors
    // =========================================================================
    /// A cart line asked for zero or fewer units.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: i64 },

    /// The catalog could not be read (unreachable, errored or timed out).
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    // =========================================================================
    // Catalog Bookkeeping Errors
    // =========================================================================
    /// A stock removal asked for more units than are on hand.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// A catalog mutation named a product the catalog does not hold.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A catalog entry broke a field rule.
    #[error("Invalid input: {0}")]
    InvalidInput(ValidationError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are out of range.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Config file could not be written.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl EngineError {
    /// True when the same call may succeed later without changes.
    ///
    /// The engine never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::CatalogUnavailable(_))
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidQuantity {
                product_id,
                quantity,
            } => EngineError::InvalidQuantity {
                product_id,
                quantity,
            },
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => EngineError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            CoreError::Validation(v) => EngineError::InvalidInput(v),
        }
    }
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unavailable { reason } => EngineError::CatalogUnavailable(reason),
            CatalogError::NotFound(product_id) => EngineError::ProductNotFound(product_id),
            CatalogError::Core(core) => core.into(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_catalog_errors_are_retryable() {
        assert!(EngineError::CatalogUnavailable("down".into()).is_retryable());
        assert!(!EngineError::InvalidQuantity {
            product_id: "A".into(),
            quantity: 0
        }
        .is_retryable());
        assert!(!EngineError::InvalidConfig("bad".into()).is_retryable());
    }

    #[test]
    fn test_invalid_quantity_keeps_its_line() {
        let core = CoreError::InvalidQuantity {
            product_id: "A".into(),
            quantity: -2,
        };
        assert_eq!(
            EngineError::from(core),
            EngineError::InvalidQuantity {
                product_id: "A".into(),
                quantity: -2
            }
        );
    }

    #[test]
    fn test_stock_shortfall_is_not_retryable() {
        let err: EngineError = CatalogError::Core(CoreError::InsufficientStock {
            product_id: "A".into(),
            available: 3,
            requested: 5,
        })
        .into();

        assert_eq!(
            err,
            EngineError::InsufficientStock {
                product_id: "A".into(),
                available: 3,
                requested: 5
            }
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_bookkeeping_errors_keep_their_kind() {
        let err: EngineError = CatalogError::NotFound("ghost".into()).into();
        assert_eq!(err, EngineError::ProductNotFound("ghost".into()));

        let err: EngineError = CoreError::Validation(ValidationError::Required {
            field: "product_id".into(),
        })
        .into();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_catalog_error_becomes_unavailable() {
        let err: EngineError = CatalogError::Unavailable {
            reason: "connection refused".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Catalog unavailable: connection refused"
        );
    }
}
