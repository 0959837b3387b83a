//! # Pricing Module
//!
//! Turns cart lines into order items and order totals.
//!
//! ## Pricing Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per line:    pretax   = unit price × quantity                          │
//! │               tax      = pretax × rate   (rounded half-up, in bps)      │
//! │               gross    = pretax + tax    (the item's subtotal field)    │
//! │                                                                         │
//! │  Per order:   subtotal = Σ pretax                                       │
//! │               tax      = Σ tax                                          │
//! │               total    = subtotal + tax                                 │
//! │                                                                         │
//! │  Compliment:  every monetary figure above is forced to zero, but item   │
//! │               quantities and unit prices stay intact for the receipt    │
//! │               and for audit.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::money::Money;
use crate::types::{CartLine, OrderItem};

// =============================================================================
// Order Totals
// =============================================================================

/// Monetary summary of an order, computed from its cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    /// All-zero totals, used for compliment orders.
    pub const fn zero() -> Self {
        OrderTotals {
            subtotal: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        }
    }
}

/// Computes order-level totals over a set of cart lines.
///
/// `total == subtotal + tax` holds by construction.
pub fn order_totals(lines: &[CartLine]) -> OrderTotals {
    let subtotal: Money = lines.iter().map(CartLine::pretax_subtotal).sum();
    let tax: Money = lines.iter().map(CartLine::tax).sum();
    OrderTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Totals for an order, honoring the compliment flag.
pub fn order_totals_with_compliment(lines: &[CartLine], is_compliment: bool) -> OrderTotals {
    if is_compliment {
        OrderTotals::zero()
    } else {
        order_totals(lines)
    }
}

/// Totals for a token order: the sum over the expanded single-unit items.
///
/// Tax is rounded per unit here, not per line, so the order header always
/// equals the sum of its expanded items even when the two rounding schemes
/// disagree by a minor unit.
pub fn token_order_totals(lines: &[CartLine], is_compliment: bool) -> OrderTotals {
    if is_compliment {
        return OrderTotals::zero();
    }

    let mut subtotal = Money::zero();
    let mut tax = Money::zero();
    for line in lines {
        let unit = Money::from_cents(line.unit_price_cents);
        let unit_tax = unit.calculate_tax(crate::types::TaxRate::from_bps(line.tax_rate_bps));
        subtotal += unit.multiply_quantity(line.quantity);
        tax += unit_tax.multiply_quantity(line.quantity);
    }
    OrderTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

// =============================================================================
// Item Construction
// =============================================================================

/// Builds billing-style order items: one item per cart line, quantity
/// preserved.
///
/// Under compliment the item subtotal is zeroed; quantity, unit price and
/// tax rate are kept as-is.
pub fn billing_items(lines: &[CartLine], is_compliment: bool) -> Vec<OrderItem> {
    lines
        .iter()
        .map(|line| OrderItem {
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price_cents,
            tax_rate_bps: line.tax_rate_bps,
            subtotal_cents: if is_compliment {
                0
            } else {
                line.gross_subtotal().cents()
            },
            token_number: None,
            category: None,
        })
        .collect()
}

/// Builds one single-unit order item for a token expansion.
///
/// Token checkout expands a line of quantity N into N of these, each with
/// its own freshly allocated token; the caller supplies the token and the
/// resolved category.
pub fn token_unit_item(
    line: &CartLine,
    token_number: i64,
    category: &str,
    is_compliment: bool,
) -> OrderItem {
    let unit = CartLine {
        quantity: 1,
        ..line.clone()
    };
    OrderItem {
        product_id: line.product_id.clone(),
        product_name: line.product_name.clone(),
        quantity: 1,
        unit_price_cents: line.unit_price_cents,
        tax_rate_bps: line.tax_rate_bps,
        subtotal_cents: if is_compliment {
            0
        } else {
            unit.gross_subtotal().cents()
        },
        token_number: Some(token_number),
        category: Some(category.to_string()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
