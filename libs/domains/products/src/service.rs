//! Product Service - request-level operations over a [`ProductRepository`]

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{IntoCategory, Product};
use crate::query::{ListParams, ProductQuery};
use crate::repository::ProductRepository;

/// Product service
///
/// Maps JSON payloads onto [`Product`] records and delegates persistence to
/// the repository it was built with.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Build a product from `payload` and persist it
    #[instrument(skip(self, payload))]
    pub async fn create_product(&self, payload: &Map<String, Value>) -> ProductResult<Product> {
        tracing::info!("Request to create a product");

        let mut product = Product::default();
        product.apply_payload(payload)?;

        let product = self.repository.create(product).await?;
        tracing::info!(product_id = ?product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        let product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        tracing::info!(product_name = %product.name, "Returning product");
        Ok(product)
    }

    /// Replace the fields of product `id` with those in `payload`
    ///
    /// Fails with [`ProductError::NotFound`] before the payload is looked at.
    #[instrument(skip(self, payload))]
    pub async fn update_product(
        &self,
        id: i32,
        payload: &Map<String, Value>,
    ) -> ProductResult<Product> {
        let mut product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        product.apply_payload(payload)?;

        let product = self.repository.update(product).await?;
        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    /// Delete product `id`; deleting an unknown id succeeds without effect
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            tracing::debug!(product_id = id, "No product to delete");
        }
        tracing::info!(product_id = id, "Product delete complete");
        Ok(())
    }

    /// List products, applying at most one filter from the query string
    #[instrument(skip(self))]
    pub async fn list_products(&self, params: &ListParams) -> ProductResult<Vec<Product>> {
        let products = match ProductQuery::from_params(params)? {
            ProductQuery::All => self.all().await?,
            ProductQuery::ByName(name) => self.find_by_name(&name).await?,
            ProductQuery::ByCategory(category) => self.find_by_category(category).await?,
            ProductQuery::ByAvailability(available) => {
                self.find_by_availability(available).await?
            }
        };

        tracing::info!("[{}] Products returned", products.len());
        Ok(products)
    }

    pub async fn all(&self) -> ProductResult<Vec<Product>> {
        tracing::info!("Processing all products");
        self.repository.list(ProductQuery::All).await
    }

    pub async fn find_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        tracing::info!(name, "Processing name query");
        self.repository
            .list(ProductQuery::ByName(name.to_string()))
            .await
    }

    /// Accepts a [`Category`], a category name or an ordinal.
    pub async fn find_by_category(
        &self,
        category: impl IntoCategory,
    ) -> ProductResult<Vec<Product>> {
        let category = category.into_category()?;
        tracing::info!(%category, "Processing category query");
        self.repository
            .list(ProductQuery::ByCategory(category))
            .await
    }

    pub async fn find_by_availability(&self, available: bool) -> ProductResult<Vec<Product>> {
        tracing::info!(available, "Processing available query");
        self.repository
            .list(ProductQuery::ByAvailability(available))
            .await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn stored(id: i32, name: &str) -> Product {
        Product {
            id: Some(id),
            ..Product::new(name, 10.0, Category::Food)
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload_without_touching_storage() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let err = service.create_product(&payload(json!({}))).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid product: missing name");
    }

    #[tokio::test]
    async fn test_create_passes_transient_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .withf(|p| p.id.is_none() && p.name == "Widget" && p.category == Category::Tools)
            .returning(|mut p| {
                p.id = Some(1);
                Ok(p)
            });

        let service = ProductService::new(mock_repo);
        let product = service
            .create_product(&payload(json!({"name": "Widget", "price": 9.99, "category": "TOOLS"})))
            .await
            .unwrap();

        assert_eq!(product.id, Some(1));
        assert!(product.available);
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(4))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let err = service.get_product(4).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound(4)));
    }

    #[tokio::test]
    async fn test_update_missing_product_checks_existence_first() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        // Invalid payload, but the missing record is reported first
        let err = service
            .update_product(8, &payload(json!({})))
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound(8)));
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(Some(stored(id, "Bread"))));
        mock_repo
            .expect_update()
            .withf(|p| p.id == Some(2) && p.name == "Rye")
            .returning(Ok);

        let service = ProductService::new(mock_repo);
        let product = service
            .update_product(
                2,
                &payload(json!({"id": 50, "name": "Rye", "price": 3, "category": "FOOD"})),
            )
            .await
            .unwrap();

        assert_eq!(product.id, Some(2));
        assert_eq!(product.price, 3.0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().with(eq(9)).returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        assert!(service.delete_product(9).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_uses_name_over_other_filters() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_list()
            .with(eq(ProductQuery::ByName("Special Product".to_string())))
            .times(1)
            .returning(|_| Ok(vec![stored(1, "Special Product")]));

        let service = ProductService::new(mock_repo);
        let params = ListParams {
            name: Some("Special Product".to_string()),
            category: Some("FOOD".to_string()),
            available: Some("false".to_string()),
        };
        let products = service.list_products(&params).await.unwrap();

        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn test_list_invalid_category() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_list().never();

        let service = ProductService::new(mock_repo);
        let params = ListParams {
            category: Some("GADGETS".to_string()),
            ..Default::default()
        };
        let err = service.list_products(&params).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid category: GADGETS");
    }

    #[tokio::test]
    async fn test_find_by_category_accepts_names_and_variants() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_list()
            .with(eq(ProductQuery::ByCategory(Category::Housewares)))
            .times(4)
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(mock_repo);
        service.find_by_category(Category::Housewares).await.unwrap();
        service.find_by_category("housewares").await.unwrap();
        service.find_by_category("HouseWares").await.unwrap();
        service.find_by_category(3_i64).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_by_category_rejects_unknown_names_as_validation() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_list().never();

        let service = ProductService::new(mock_repo);
        let err = service.find_by_category("spanners").await.unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid category: spanners");

        let err = service.find_by_category(6_i64).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }
}
