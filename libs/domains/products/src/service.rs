//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductFilter};
use crate::repository::ProductRepository;

/// Product service
///
/// Dispatches each catalog operation to the repository. Failures propagate
/// unchanged so the HTTP layer can normalize them in one place.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Products matching the filter, newest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        self.repository.list(filter).await
    }

    /// A product by id; `Ok(None)` when no product has that id.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Option<Product>> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = self.repository.create(input).await?;
        tracing::info!(product_id = %product.id(), "Product created");
        Ok(product)
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
