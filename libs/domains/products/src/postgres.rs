use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::Product,
    query::ProductQuery,
    repository::ProductRepository,
};

/// PostgreSQL implementation backed by the `products` table
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = Product { id: None, ..product }.into();

        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let id = product
            .id
            .ok_or_else(|| ProductError::Validation("Update called with empty ID field".to_string()))?;
        let active_model: entity::ActiveModel = product.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ProductError::NotFound(id),
            other => other.into(),
        })?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let mut select = entity::Entity::find();

        select = match query {
            ProductQuery::All => select,
            ProductQuery::ByName(name) => select.filter(entity::Column::Name.eq(name)),
            ProductQuery::ByCategory(category) => {
                select.filter(entity::Column::Category.eq(category))
            }
            ProductQuery::ByAvailability(available) => {
                select.filter(entity::Column::Available.eq(available))
            }
        };

        let models = select
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: i32, name: &str, category: Category) -> entity::Model {
        entity::Model {
            id,
            name: name.to_string(),
            description: None,
            price: 9.99,
            available: true,
            category,
        }
    }

    #[tokio::test]
    async fn test_create_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "Widget", Category::Tools)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let created = repo
            .create(Product::new("Widget", 9.99, Category::Tools))
            .await
            .unwrap();

        assert_eq!(created.id, Some(1));
        assert_eq!(created.category, Category::Tools);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert_eq!(repo.get_by_id(5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_without_id_skips_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db);

        let err = repo
            .update(Product::new("Widget", 1.0, Category::Tools))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Update called with empty ID field");
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = Product {
            id: Some(3),
            ..Product::new("Widget", 1.0, Category::Tools)
        };
        let err = repo.update(product).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(3)));
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.delete(1).await.unwrap());
        assert!(!repo.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_maps_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                model(1, "Hat", Category::Cloths),
                model(2, "Shirt", Category::Cloths),
            ]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let products = repo
            .list(ProductQuery::ByCategory(Category::Cloths))
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id, Some(2));
        assert_eq!(products[1].name, "Shirt");
    }
}
