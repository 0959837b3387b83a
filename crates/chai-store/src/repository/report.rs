//! # Report Repository
//!
//! Wires the stored order log to the pure aggregation and CSV code in
//! chai-core. Reports are derived views: nothing here is ever persisted.

use chrono::{DateTime, Utc};
use tracing::debug;

use chai_core::report::{build_sales_report, report_scope, to_csv};
use chai_core::types::Order;
use chai_core::{ReportKind, SalesReport};

use crate::keys;
use crate::store::Store;

/// Read-only report engine over the order log.
#[derive(Debug, Clone)]
pub struct Reports {
    store: Store,
}

impl Reports {
    pub(crate) fn new(store: Store) -> Self {
        Reports { store }
    }

    fn log(&self) -> Vec<Order> {
        self.store.get_array(keys::ORDERS)
    }

    /// Builds a sales report for one side of the billing/token partition
    /// over the inclusive `[start, end]` window.
    pub fn get(&self, kind: ReportKind, start: DateTime<Utc>, end: DateTime<Utc>) -> SalesReport {
        let log = self.log();
        let scope = report_scope(&log, kind, start, end);
        let report = build_sales_report(&scope, start, end);
        debug!(
            ?kind,
            orders = report.total_orders,
            total_cents = report.total_sales_cents,
            "Built sales report"
        );
        report
    }

    /// Exports the same scope as CSV. The caller owns writing the string to
    /// a file or share sheet.
    pub fn export_csv(&self, kind: ReportKind, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        let log = self.log();
        let scope = report_scope(&log, kind, start, end);
        to_csv(&scope)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chai_core::types::{CartLine, OrderOptions};
    use chrono::Duration;

    fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            product_name: format!("Product {product_id}"),
            quantity,
            unit_price_cents,
            tax_rate_bps: 0,
        }
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::hours(1), now + Duration::hours(1))
    }

    #[test]
    fn test_report_covers_only_requested_kind() {
        let store = Store::in_memory();
        let orders = store.orders();
        orders
            .create_order(&[line("p1", 1, 1000)], "u1", None, &OrderOptions::default())
            .unwrap();
        orders
            .create_order(&[line("p2", 1, 500)], "u1", Some(1), &OrderOptions::default())
            .unwrap();

        let (start, end) = window();
        let billing = store.reports().get(ReportKind::Billing, start, end);
        assert_eq!(billing.total_orders, 1);
        assert_eq!(billing.total_sales_cents, 1000);

        let token = store.reports().get(ReportKind::Token, start, end);
        assert_eq!(token.total_orders, 1);
        assert_eq!(token.total_sales_cents, 500);
    }

    #[test]
    fn test_empty_store_reports_zeroes() {
        let store = Store::in_memory();
        let (start, end) = window();
        let report = store.reports().get(ReportKind::Billing, start, end);
        assert_eq!(report.total_orders, 0);
        assert_eq!(report.average_order_value_cents, 0);
        assert!(report.top_products.is_empty());
        assert_eq!(report.date_range.start, start);
    }

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let store = Store::in_memory();
        store
            .orders()
            .create_order(&[line("p1", 2, 1000)], "u1", None, &OrderOptions::default())
            .unwrap();

        let (start, end) = window();
        let csv = store.reports().export_csv(ReportKind::Billing, start, end);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "orderId,tokenNumber,timestamp,subtotal,tax,total,itemsCount,userId"
        );
        assert!(lines.next().unwrap().ends_with("\"20.00\",\"0.00\",\"20.00\",\"1\",\"u1\""));
        assert_eq!(lines.next(), None);
    }
}
