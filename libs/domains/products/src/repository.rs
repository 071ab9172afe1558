use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::query::ProductQuery;

/// Repository trait for Product persistence
///
/// Implementations own id assignment and must return results in ascending
/// id order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a transient product and return it with its new id
    async fn create(&self, product: Product) -> ProductResult<Product>;

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// Commit the fields of a persisted product
    async fn update(&self, product: Product) -> ProductResult<Product>;

    /// Returns `false` when no product had the given id
    async fn delete(&self, id: i32) -> ProductResult<bool>;

    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>>;
}

fn empty_id() -> ProductError {
    ProductError::Validation("Update called with empty ID field".to_string())
}

#[derive(Default)]
struct Store {
    products: BTreeMap<i32, Product>,
    last_id: i32,
}

/// In-memory implementation for development and tests
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, mut product: Product) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        store.last_id += 1;
        let id = store.last_id;
        product.id = Some(id);
        store.products.insert(id, product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let id = product.id.ok_or_else(empty_id)?;
        let mut store = self.store.write().await;

        let slot = store
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;
        *slot = product.clone();

        tracing::info!(product_id = id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let mut store = self.store.write().await;

        if store.products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store
            .products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }
}
