//! # Catalog Repository
//!
//! Products and categories. The token engine consumes this through the
//! [`Catalog`] seam; everything else is plain CRUD over the two stored
//! arrays.
//!
//! ## Default Categories
//! A fresh install seeds four categories so the token board has its kitchen
//! stations from day one. `Other` doubles as the fallback group for items
//! whose product has vanished from the catalog.

use chrono::Utc;
use tracing::{debug, info};

use chai_core::types::{Catalog, Category, Product};

use crate::keys;
use crate::store::Store;

/// `(name, accent color)` pairs seeded on first run.
const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("Tea", "#4A7C59"),
    ("Juice", "#FF8C42"),
    ("Smoothie", "#27AE60"),
    ("Other", "#7F8C8D"),
];

/// Repository over products and categories.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    store: Store,
}

impl CatalogRepository {
    pub(crate) fn new(store: Store) -> Self {
        CatalogRepository { store }
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// All products, active or not.
    pub fn all_products(&self) -> Vec<Product> {
        self.store.get_array(keys::PRODUCTS)
    }

    /// Products still offered for sale.
    pub fn active_products(&self) -> Vec<Product> {
        self.all_products().into_iter().filter(|p| p.is_active).collect()
    }

    /// Looks up one product by id.
    pub fn product_by_id(&self, id: &str) -> Option<Product> {
        self.all_products().into_iter().find(|p| p.id == id)
    }

    /// Active products in one category.
    pub fn products_by_category(&self, category: &str) -> Vec<Product> {
        self.active_products()
            .into_iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Adds a product to the catalog and returns it.
    pub fn create_product(&self, product: Product) -> Product {
        let mut products = self.all_products();
        products.push(product.clone());
        self.store.set_array(keys::PRODUCTS, &products);
        debug!(product_id = %product.id, name = %product.name, "Created product");
        product
    }

    /// Replaces the product with the same id, bumping `updated_at`.
    /// Returns the stored version, or `None` when the id is unknown.
    pub fn update_product(&self, mut product: Product) -> Option<Product> {
        let mut products = self.all_products();
        let pos = products.iter().position(|p| p.id == product.id)?;
        product.updated_at = Utc::now();
        products[pos] = product.clone();
        self.store.set_array(keys::PRODUCTS, &products);
        debug!(product_id = %product.id, "Updated product");
        Some(product)
    }

    /// Removes a product from the catalog. Past orders keep their frozen
    /// snapshots; token checkout falls back to the `Other` group for carts
    /// that still reference the id.
    pub fn delete_product(&self, id: &str) -> bool {
        let mut products = self.all_products();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return false;
        }
        self.store.set_array(keys::PRODUCTS, &products);
        debug!(product_id = %id, "Deleted product");
        true
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    /// All categories.
    pub fn categories(&self) -> Vec<Category> {
        self.store.get_array(keys::CATEGORIES)
    }

    /// Adds a category and returns it.
    pub fn create_category(&self, category: Category) -> Category {
        let mut categories = self.categories();
        categories.push(category.clone());
        self.store.set_array(keys::CATEGORIES, &categories);
        debug!(category_id = %category.id, name = %category.name, "Created category");
        category
    }

    /// Removes a category by id. Products keep their category string; only
    /// the list entry (and its board color) goes away.
    pub fn delete_category(&self, id: &str) -> bool {
        let mut categories = self.categories();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return false;
        }
        self.store.set_array(keys::CATEGORIES, &categories);
        debug!(category_id = %id, "Deleted category");
        true
    }

    /// Seeds the default categories on first run. A no-op when any category
    /// already exists, so user edits are never clobbered.
    pub fn seed_default_categories(&self) {
        if !self.categories().is_empty() {
            return;
        }
        let seeded: Vec<Category> = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, color)| Category::new(*name, *color))
            .collect();
        self.store.set_array(keys::CATEGORIES, &seeded);
        info!(count = seeded.len(), "Seeded default categories");
    }
}

impl Catalog for CatalogRepository {
    fn product_by_id(&self, id: &str) -> Option<Product> {
        CatalogRepository::product_by_id(self, id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
