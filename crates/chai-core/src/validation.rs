//! # Validation Module
//!
//! Cart validation rules, run before any order is built.
//!
//! ## Validation Strategy
//! The host UI performs its own checks for immediate feedback; the engine
//! re-validates here so a buggy or bypassed frontend can never persist a
//! malformed order. Storage-level integrity is the serde schema itself.

use crate::error::ValidationError;
use crate::types::CartLine;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum representable tax rate: 100% in basis points.
const MAX_TAX_RATE_BPS: u32 = 10_000;

/// Validates a single cart line.
///
/// ## Rules
/// - quantity >= 1
/// - unit price >= 0
/// - tax rate within 0-100%
pub fn validate_cart_line(line: &CartLine) -> ValidationResult<()> {
    if line.quantity < 1 {
        return Err(ValidationError::InvalidQuantity {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
        });
    }

    if line.unit_price_cents < 0 {
        return Err(ValidationError::NegativePrice {
            product_id: line.product_id.clone(),
        });
    }

    if line.tax_rate_bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::TaxRateOutOfRange {
            product_id: line.product_id.clone(),
            bps: line.tax_rate_bps,
        });
    }

    Ok(())
}

/// Validates a whole cart, line by line.
///
/// Emptiness is checked separately at order creation (it maps to
/// [`crate::error::CoreError::EmptyCart`], not a line-level failure).
pub fn validate_cart(lines: &[CartLine]) -> ValidationResult<()> {
    for line in lines {
        validate_cart_line(line)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64, unit_price_cents: i64, tax_rate_bps: u32) -> CartLine {
        CartLine {
            product_id: "p1".to_string(),
            product_name: "Green Tea".to_string(),
            quantity,
            unit_price_cents,
            tax_rate_bps,
        }
    }

    #[test]
    fn test_valid_line() {
        assert!(validate_cart_line(&line(1, 500, 0)).is_ok());
        assert!(validate_cart_line(&line(99, 0, 10_000)).is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(matches!(
            validate_cart_line(&line(0, 500, 0)),
            Err(ValidationError::InvalidQuantity { quantity: 0, .. })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            validate_cart_line(&line(1, -1, 0)),
            Err(ValidationError::NegativePrice { .. })
        ));
    }

    #[test]
    fn test_tax_rate_over_100_percent_rejected() {
        assert!(matches!(
            validate_cart_line(&line(1, 500, 10_001)),
            Err(ValidationError::TaxRateOutOfRange { bps: 10_001, .. })
        ));
    }

    #[test]
    fn test_cart_reports_first_bad_line() {
        let lines = vec![line(1, 500, 0), line(-2, 500, 0)];
        assert!(validate_cart(&lines).is_err());
        assert!(validate_cart(&lines[..1]).is_ok());
    }
}
