//! # Report Module
//!
//! Sales report aggregation and CSV projection over a slice of the order log.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Report Pipeline                                   │
//! │                                                                         │
//! │  full order log                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filter by kind ──► billing orders  OR  token orders                    │
//! │       │             (same partition predicate as the query layer)       │
//! │       ▼                                                                 │
//! │  filter by [start, end] inclusive on timestamp                          │
//! │       │                                                                 │
//! │       ├──► build_sales_report() ──► totals, average, top-10 products    │
//! │       │                                                                 │
//! │       └──► to_csv() ──► one quoted row per order                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure; the store-side `Reports` repository feeds it the
//! order log.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Order;
use crate::TOP_PRODUCTS_LIMIT;

// =============================================================================
// Report Types
// =============================================================================

/// Which half of the billing/token partition a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReportKind {
    /// Standard checkout receipts (no tokens anywhere on the order).
    Billing,
    /// Orders with a queue token on the order or any item.
    Token,
}

/// The requested report window, echoed back verbatim.
///
/// Deliberately NOT the min/max of matched timestamps: the host renders the
/// window the user asked for, even when it is wider than the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

/// One row of the product ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopProduct {
    pub product_id: String,
    pub product_name: String,
    /// Units sold across the window.
    pub quantity: i64,
    /// Gross revenue: the sum of matched items' subtotal fields.
    pub revenue_cents: i64,
}

/// A derived sales report. Never persisted; recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesReport {
    pub total_sales_cents: i64,
    pub total_orders: u64,
    /// `total_sales / total_orders`, 0 when the window matched nothing.
    pub average_order_value_cents: i64,
    /// Sorted by revenue descending, at most [`TOP_PRODUCTS_LIMIT`] entries.
    pub top_products: Vec<TopProduct>,
    pub date_range: DateRange,
}

// =============================================================================
// Filtering
// =============================================================================

/// Whether an order belongs to the given report kind.
pub fn matches_kind(order: &Order, kind: ReportKind) -> bool {
    match kind {
        ReportKind::Billing => !order.is_token_order(),
        ReportKind::Token => order.is_token_order(),
    }
}

/// Filters the order log down to a report's scope: kind first, then the
/// inclusive `[start, end]` window on the creation timestamp.
pub fn report_scope<'a>(
    orders: &'a [Order],
    kind: ReportKind,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|o| matches_kind(o, kind))
        .filter(|o| o.timestamp >= start && o.timestamp <= end)
        .collect()
}

// =============================================================================
// Aggregation
// =============================================================================

/// Aggregates a pre-filtered scope into a [`SalesReport`].
///
/// ## Tie Behavior
/// Products are accumulated in first-occurrence order and ranked with a
/// stable sort, so equal-revenue products keep their insertion order - the
/// ranking is deterministic for a given log.
pub fn build_sales_report(
    scope: &[&Order],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> SalesReport {
    let total_sales: Money = scope.iter().map(|o| o.total()).sum();
    let total_orders = scope.len() as u64;
    let average = if total_orders > 0 {
        total_sales.cents() / total_orders as i64
    } else {
        0
    };

    // Group items by product, preserving first-occurrence order for
    // stable-sort tie behavior.
    let mut ranking: Vec<TopProduct> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for order in scope {
        for item in &order.items {
            match index.get(&item.product_id) {
                Some(&i) => {
                    ranking[i].quantity += item.quantity;
                    ranking[i].revenue_cents += item.subtotal_cents;
                }
                None => {
                    index.insert(item.product_id.clone(), ranking.len());
                    ranking.push(TopProduct {
                        product_id: item.product_id.clone(),
                        product_name: item.product_name.clone(),
                        quantity: item.quantity,
                        revenue_cents: item.subtotal_cents,
                    });
                }
            }
        }
    }
    ranking.sort_by(|a, b| b.revenue_cents.cmp(&a.revenue_cents));
    ranking.truncate(TOP_PRODUCTS_LIMIT);

    SalesReport {
        total_sales_cents: total_sales.cents(),
        total_orders,
        average_order_value_cents: average,
        top_products: ranking,
        date_range: DateRange { start, end },
    }
}

// =============================================================================
// CSV Projection
// =============================================================================

/// Fixed CSV header. Column order is part of the export contract.
const CSV_HEADER: &str = "orderId,tokenNumber,timestamp,subtotal,tax,total,itemsCount,userId";

/// Quotes a single CSV value, doubling internal quotes.
///
/// Every value is quoted, even pure numbers - a deliberate simplicity choice
/// over a type-aware writer.
fn csv_value(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

/// Projects a pre-filtered scope into CSV, one row per order.
///
/// The engine's responsibility ends at producing this string; writing it to
/// a file and sharing it are host concerns.
pub fn to_csv(scope: &[&Order]) -> String {
    let mut out = String::from(CSV_HEADER);
    for order in scope {
        let token = order.token_number.map(|t| t.to_string()).unwrap_or_default();
        let row = [
            csv_value(&order.id),
            csv_value(&token),
            csv_value(&order.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
            csv_value(&Money::from_cents(order.subtotal_cents).to_decimal_string()),
            csv_value(&Money::from_cents(order.tax_cents).to_decimal_string()),
            csv_value(&Money::from_cents(order.total_cents).to_decimal_string()),
            csv_value(&order.items.len().to_string()),
            csv_value(&order.user_id),
        ]
        .join(",");
        out.push('\n');
        out.push_str(&row);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
