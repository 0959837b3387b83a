//! # Order Repository
//!
//! Creation, querying and status transitions for the order log.
//!
//! ## Two Checkout Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_order (billing / legacy token)                                  │
//! │    cart line (qty 3) ──► one item, quantity 3                           │
//! │    optional caller-supplied token marks the whole order                 │
//! │                                                                         │
//! │  create_token_order (grouped tokens)                                    │
//! │    cart line (qty 3) ──► three items, quantity 1 each,                  │
//! │                          each with its own per-category token           │
//! │    order token = first token allocated                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence Shape
//! The order log is a single JSON array under one key. Every mutation is a
//! whole-collection read-modify-write; see the store docs for why that is
//! safe in-process and unsafe across processes.

use chrono::Utc;
use tracing::{debug, warn};

use chai_core::pricing::{
    billing_items, order_totals_with_compliment, token_order_totals, token_unit_item,
};
use chai_core::status::advance;
use chai_core::types::{
    generate_id, CartLine, Catalog, Order, OrderOptions, OrderStatus,
};
use chai_core::validation::validate_cart;
use chai_core::{CoreError, DEFAULT_CATEGORY};

use crate::error::StoreResult;
use crate::keys;
use crate::store::Store;

/// Repository over the order log.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    store: Store,
}

impl OrderRepository {
    pub(crate) fn new(store: Store) -> Self {
        OrderRepository { store }
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Creates a billing order, or a legacy single-token order when the
    /// caller supplies `token_number`.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let order = store.orders().create_order(
    ///     &cart, "user_1", None, &OrderOptions::default(),
    /// )?;
    /// ```
    pub fn create_order(
        &self,
        lines: &[CartLine],
        user_id: &str,
        token_number: Option<i64>,
        options: &OrderOptions,
    ) -> StoreResult<Order> {
        self.check_cart(lines)?;

        let totals = order_totals_with_compliment(lines, options.is_compliment);
        let order = Order {
            id: generate_id("order"),
            items: billing_items(lines, options.is_compliment),
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            token_number,
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
            // a token order always enters the queue in Preparing
            status: token_number.map(|_| OrderStatus::Preparing),
            payment_method: options.payment_method,
            is_compliment: options.is_compliment,
        };
        self.append(order)
    }

    /// Creates a token order: every cart line is expanded into `quantity`
    /// single-unit items, each carrying a fresh per-category token.
    ///
    /// Categories come from the catalog seam; a product that cannot be
    /// resolved (deleted since it was carted) falls back to
    /// [`DEFAULT_CATEGORY`]. Tokens are allocated in line order, then unit
    /// order, and the first one becomes the order-level token.
    pub fn create_token_order<C: Catalog>(
        &self,
        lines: &[CartLine],
        user_id: &str,
        catalog: &C,
        options: &OrderOptions,
    ) -> StoreResult<Order> {
        self.check_cart(lines)?;

        let allocator = self.store.tokens();
        let today = Utc::now().date_naive();

        let mut items = Vec::new();
        let mut first_token = None;
        for line in lines {
            let category = catalog
                .product_by_id(&line.product_id)
                .map(|p| p.category)
                .unwrap_or_else(|| {
                    warn!(
                        product_id = %line.product_id,
                        "Product not in catalog, grouping under {DEFAULT_CATEGORY}"
                    );
                    DEFAULT_CATEGORY.to_string()
                });

            for _ in 0..line.quantity {
                let token = allocator.next_for_category(&category, today);
                first_token.get_or_insert(token);
                items.push(token_unit_item(line, token, &category, options.is_compliment));
            }
        }

        let totals = token_order_totals(lines, options.is_compliment);
        let order = Order {
            id: generate_id("order"),
            items,
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            token_number: first_token,
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
            status: Some(OrderStatus::Preparing),
            payment_method: options.payment_method,
            is_compliment: options.is_compliment,
        };
        self.append(order)
    }

    fn check_cart(&self, lines: &[CartLine]) -> StoreResult<()> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validate_cart(lines).map_err(CoreError::from)?;
        Ok(())
    }

    fn append(&self, order: Order) -> StoreResult<Order> {
        let mut log: Vec<Order> = self.store.get_array(keys::ORDERS);
        log.push(order.clone());
        self.store.set_array(keys::ORDERS, &log);
        debug!(
            order_id = %order.id,
            token = ?order.token_number,
            total_cents = order.total_cents,
            items = order.items.len(),
            "Created order"
        );
        Ok(order)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The whole order log, in creation order.
    pub fn all(&self) -> Vec<Order> {
        self.store.get_array(keys::ORDERS)
    }

    /// Looks up one order by id.
    pub fn by_id(&self, id: &str) -> Option<Order> {
        self.all().into_iter().find(|o| o.id == id)
    }

    /// Orders created inside `[start, end]`, inclusive on both ends.
    pub fn by_date_range(
        &self,
        start: chrono::DateTime<Utc>,
        end: chrono::DateTime<Utc>,
    ) -> Vec<Order> {
        self.all()
            .into_iter()
            .filter(|o| o.timestamp >= start && o.timestamp <= end)
            .collect()
    }

    /// Orders with no token anywhere (the billing half of the partition).
    pub fn billing_orders(&self) -> Vec<Order> {
        self.all().into_iter().filter(|o| !o.is_token_order()).collect()
    }

    /// Orders with a token on the order or any item.
    pub fn token_orders(&self) -> Vec<Order> {
        self.all().into_iter().filter(|o| o.is_token_order()).collect()
    }

    /// Orders carrying `token` at the order level or on any item. Tokens
    /// restart per category per day, so several orders can match.
    pub fn by_token_number(&self, token: i64) -> Vec<Order> {
        self.all().into_iter().filter(|o| o.has_token(token)).collect()
    }

    // -------------------------------------------------------------------------
    // Status machine
    // -------------------------------------------------------------------------

    /// Advances a token order's queue status.
    ///
    /// ## Outcomes
    /// - unknown id ⇒ `Ok(None)`, nothing written
    /// - billing order ⇒ `CoreError::NotATokenOrder`
    /// - backward/skip/self transition ⇒ `CoreError::InvalidTransition`,
    ///   nothing written
    /// - legal transition ⇒ order updated in the log and returned
    ///
    /// A token order persisted without a status (older data) is treated as
    /// `Preparing`.
    pub fn update_status(&self, id: &str, new: OrderStatus) -> StoreResult<Option<Order>> {
        let mut log: Vec<Order> = self.store.get_array(keys::ORDERS);
        let Some(pos) = log.iter().position(|o| o.id == id) else {
            debug!(order_id = %id, "Status update for unknown order");
            return Ok(None);
        };

        let order = &log[pos];
        let Some(current) = order.queue_status() else {
            return Err(CoreError::NotATokenOrder(id.to_string()).into());
        };

        let next = advance(current, new)?;
        log[pos].status = Some(next);
        self.store.set_array(keys::ORDERS, &log);
        debug!(order_id = %id, from = ?current, to = ?next, "Order status advanced");
        Ok(Some(log[pos].clone()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use chai_core::types::{PaymentMethod, Product};

    struct FixedCatalog(HashMap<String, Product>);

    impl FixedCatalog {
        fn with(products: &[(&str, &str)]) -> Self {
            let map = products
                .iter()
                .map(|(id, category)| {
                    let mut p = Product::new("Fixture", 1000, *category, "SKU", 0);
                    p.id = id.to_string();
                    (id.to_string(), p)
                })
                .collect();
            FixedCatalog(map)
        }
    }

    impl Catalog for FixedCatalog {
        fn product_by_id(&self, id: &str) -> Option<Product> {
            self.0.get(id).cloned()
        }
    }

    fn line(product_id: &str, quantity: i64, unit_price_cents: i64, bps: u32) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            product_name: format!("Product {product_id}"),
            quantity,
            unit_price_cents,
            tax_rate_bps: bps,
        }
    }

    #[test]
    fn test_create_billing_order() {
        let store = Store::in_memory();
        let order = store
            .orders()
            .create_order(
                &[line("p1", 2, 1000, 1000)],
                "u1",
                None,
                &OrderOptions {
                    payment_method: Some(PaymentMethod::Cash),
                    is_compliment: false,
                },
            )
            .unwrap();

        assert_eq!(order.subtotal_cents, 2000);
        assert_eq!(order.tax_cents, 200);
        assert_eq!(order.total_cents, 2200);
        assert_eq!(order.status, None);
        assert!(!order.is_token_order());
        assert_eq!(store.orders().all().len(), 1);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let store = Store::in_memory();
        let err = store
            .orders()
            .create_order(&[], "u1", None, &OrderOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(store.orders().all().is_empty());
    }

    #[test]
    fn test_invalid_line_rejected_without_write() {
        let store = Store::in_memory();
        let result = store.orders().create_order(
            &[line("p1", 0, 1000, 0)],
            "u1",
            None,
            &OrderOptions::default(),
        );
        assert!(result.is_err());
        assert!(store.orders().all().is_empty());
    }

    #[test]
    fn test_legacy_token_order_via_supplied_token() {
        let store = Store::in_memory();
        let order = store
            .orders()
            .create_order(
                &[line("p1", 1, 500, 0)],
                "u1",
                Some(7),
                &OrderOptions::default(),
            )
            .unwrap();
        assert!(order.is_token_order());
        assert_eq!(order.status, Some(OrderStatus::Preparing));
        // items are NOT expanded in legacy mode
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].token_number, None);
    }

    #[test]
    fn test_compliment_zeroes_money_keeps_detail() {
        let store = Store::in_memory();
        let order = store
            .orders()
            .create_order(
                &[line("p1", 2, 1000, 1000)],
                "u1",
                None,
                &OrderOptions {
                    payment_method: None,
                    is_compliment: true,
                },
            )
            .unwrap();
        assert_eq!(order.total_cents, 0);
        assert_eq!(order.subtotal_cents, 0);
        assert_eq!(order.tax_cents, 0);
        assert!(order.is_compliment);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].unit_price_cents, 1000);
        assert_eq!(order.items[0].subtotal_cents, 0);
    }

    #[test]
    fn test_token_order_expands_per_unit() {
        let store = Store::in_memory();
        let catalog = FixedCatalog::with(&[("tea1", "Tea"), ("juice1", "Juice")]);

        let order = store
            .orders()
            .create_token_order(
                &[line("tea1", 2, 1000, 0), line("juice1", 1, 500, 0)],
                "u1",
                &catalog,
                &OrderOptions::default(),
            )
            .unwrap();

        assert_eq!(order.items.len(), 3);
        assert!(order.items.iter().all(|i| i.quantity == 1));
        // per-category numbering: Tea gets 1 and 2, Juice starts over at 1
        assert_eq!(order.items[0].token_number, Some(1));
        assert_eq!(order.items[0].category.as_deref(), Some("Tea"));
        assert_eq!(order.items[1].token_number, Some(2));
        assert_eq!(order.items[2].token_number, Some(1));
        assert_eq!(order.items[2].category.as_deref(), Some("Juice"));
        // order token = first allocated
        assert_eq!(order.token_number, Some(1));
        assert_eq!(order.status, Some(OrderStatus::Preparing));
    }

    #[test]
    fn test_token_order_header_equals_item_sum() {
        let store = Store::in_memory();
        let catalog = FixedCatalog::with(&[("tea1", "Tea")]);

        // per-unit rounding case: 3 × 10.00 @ 8.25%
        let order = store
            .orders()
            .create_token_order(
                &[line("tea1", 3, 1000, 825)],
                "u1",
                &catalog,
                &OrderOptions::default(),
            )
            .unwrap();

        let item_sum: i64 = order.items.iter().map(|i| i.subtotal_cents).sum();
        assert_eq!(order.total_cents, item_sum);
        assert_eq!(order.tax_cents, 249);
    }

    #[test]
    fn test_unknown_product_falls_back_to_other() {
        let store = Store::in_memory();
        let catalog = FixedCatalog::with(&[]);

        let order = store
            .orders()
            .create_token_order(
                &[line("ghost", 1, 500, 0)],
                "u1",
                &catalog,
                &OrderOptions::default(),
            )
            .unwrap();
        assert_eq!(order.items[0].category.as_deref(), Some(DEFAULT_CATEGORY));
    }

    #[test]
    fn test_queries_partition_the_log() {
        let store = Store::in_memory();
        let orders = store.orders();
        let catalog = FixedCatalog::with(&[("tea1", "Tea")]);

        let billing = orders
            .create_order(&[line("p1", 1, 500, 0)], "u1", None, &OrderOptions::default())
            .unwrap();
        let token = orders
            .create_token_order(
                &[line("tea1", 1, 500, 0)],
                "u1",
                &catalog,
                &OrderOptions::default(),
            )
            .unwrap();

        assert_eq!(orders.all().len(), 2);
        assert_eq!(orders.billing_orders().len(), 1);
        assert_eq!(orders.billing_orders()[0].id, billing.id);
        assert_eq!(orders.token_orders().len(), 1);
        assert_eq!(orders.token_orders()[0].id, token.id);
        assert_eq!(orders.by_id(&billing.id).unwrap().id, billing.id);
        assert!(orders.by_id("order_0_missing").is_none());
    }

    #[test]
    fn test_by_token_number_matches_item_level_tokens() {
        let store = Store::in_memory();
        let catalog = FixedCatalog::with(&[("tea1", "Tea")]);

        let order = store
            .orders()
            .create_token_order(
                &[line("tea1", 2, 500, 0)],
                "u1",
                &catalog,
                &OrderOptions::default(),
            )
            .unwrap();

        // token 2 lives only on the second item, not the order header
        assert_eq!(order.token_number, Some(1));
        let matched = store.orders().by_token_number(2);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, order.id);
        assert!(store.orders().by_token_number(99).is_empty());
    }

    #[test]
    fn test_status_advances_forward_only() {
        let store = Store::in_memory();
        let catalog = FixedCatalog::with(&[("tea1", "Tea")]);
        let orders = store.orders();
        let order = orders
            .create_token_order(
                &[line("tea1", 1, 500, 0)],
                "u1",
                &catalog,
                &OrderOptions::default(),
            )
            .unwrap();

        let ready = orders.update_status(&order.id, OrderStatus::Ready).unwrap().unwrap();
        assert_eq!(ready.status, Some(OrderStatus::Ready));

        // backward transition rejected and nothing written
        let err = orders.update_status(&order.id, OrderStatus::Preparing).unwrap_err();
        assert!(err.to_string().contains("illegal status transition"));
        assert_eq!(
            orders.by_id(&order.id).unwrap().status,
            Some(OrderStatus::Ready)
        );

        let done = orders
            .update_status(&order.id, OrderStatus::Completed)
            .unwrap()
            .unwrap();
        assert_eq!(done.status, Some(OrderStatus::Completed));
    }

    #[test]
    fn test_status_update_unknown_order_is_none() {
        let store = Store::in_memory();
        let result = store
            .orders()
            .update_status("order_0_missing", OrderStatus::Ready)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_status_update_on_billing_order_rejected() {
        let store = Store::in_memory();
        let orders = store.orders();
        let billing = orders
            .create_order(&[line("p1", 1, 500, 0)], "u1", None, &OrderOptions::default())
            .unwrap();

        let err = orders.update_status(&billing.id, OrderStatus::Ready).unwrap_err();
        assert!(err.to_string().contains("billing order"));
        assert_eq!(orders.by_id(&billing.id).unwrap().status, None);
    }

    #[test]
    fn test_missing_status_reads_as_preparing() {
        let store = Store::in_memory();
        // simulate an older token order persisted without a status field
        let json = r#"[{
            "id": "order_1_abcdefghi",
            "items": [{"productId":"p1","productName":"Chai","quantity":1,
                       "unitPriceCents":500,"taxRateBps":0,"subtotalCents":500,
                       "tokenNumber":1,"category":"Tea"}],
            "subtotalCents":500,"taxCents":0,"totalCents":500,
            "tokenNumber":1,"timestamp":"2025-06-01T10:00:00Z","userId":"u1"
        }]"#;
        store.set_string(keys::ORDERS, json);

        let updated = store
            .orders()
            .update_status("order_1_abcdefghi", OrderStatus::Ready)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, Some(OrderStatus::Ready));
    }
}
