//! # Validation Module
//!
//! Input validation for cart lines, catalog entries and fee settings.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront UI                                                │
//! │  └── Quantity pickers limited to in-stock amounts                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Cart lines: quantity >= 1, before any catalog fetch               │
//! │  ├── Catalog entries: price and stock non-negative                     │
//! │  └── Fee policy: rate <= 100%, amounts non-negative                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Reconciliation                                               │
//! │  └── Quantities clamped to live stock                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::LineItemRequest;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product id a catalog will accept.
pub const MAX_PRODUCT_ID_LEN: usize = 128;

// =============================================================================
// Cart Line Validators
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// There is no upper bound here: oversized requests are clamped to stock
/// during reconciliation rather than rejected.
///
/// ```rust
/// use cartwise_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Checks every cart line before any I/O happens.
///
/// Stops at the first offending line and reports it as
/// [`CoreError::InvalidQuantity`].
pub fn validate_requests(requests: &[LineItemRequest]) -> CoreResult<()> {
    for request in requests {
        if validate_quantity(request.requested_quantity).is_err() {
            return Err(CoreError::InvalidQuantity {
                product_id: request.product_id.clone(),
                quantity: request.requested_quantity,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must not be blank
/// - At most 128 characters
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product_id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
///
/// ```rust
/// use cartwise_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1999).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock count. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Fee Validators
// =============================================================================

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a fee or threshold amount in cents.
pub fn validate_fee_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_requests_reports_first_bad_line() {
        let requests = vec![
            LineItemRequest::new("A", 2),
            LineItemRequest::new("B", 0),
            LineItemRequest::new("C", -3),
        ];

        let err = validate_requests(&requests).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidQuantity {
                product_id: "B".into(),
                quantity: 0
            }
        );
    }

    #[test]
    fn test_validate_requests_accepts_empty_cart() {
        assert!(validate_requests(&[]).is_ok());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("64f1c0ffee").is_ok());
        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_stock_and_price() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(850).is_ok());
        assert!(validate_tax_rate_bps(10_000).is_ok());
        assert!(validate_tax_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_fee_cents() {
        assert!(validate_fee_cents("flat_shipping_fee", 599).is_ok());
        let err = validate_fee_cents("flat_shipping_fee", -1).unwrap_err();
        assert_eq!(err.to_string(), "flat_shipping_fee must be in 0..=9223372036854775807");
    }
}
