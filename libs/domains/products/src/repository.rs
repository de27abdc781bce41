use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductFilter};

/// Repository trait for Product persistence
///
/// Implementations classify every store fault into a [`ProductError`] before
/// returning it; callers never see driver errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Validate, persist and return a new product.
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Look a product up by id.
    ///
    /// Returns `MalformedIdentifier` when `id` is not a valid identifier and
    /// `Ok(None)` when it is valid but unassigned.
    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    /// All products matching the filter, newest first.
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;
}

/// Canonical (hyphenated) form of a product id, or `MalformedIdentifier`.
pub fn parse_product_id(id: &str) -> ProductResult<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| ProductError::MalformedIdentifier(id.to_string()))
}

/// Newest first; ids break ties.
pub(crate) fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(a.id()))
    });
}

/// In-memory implementation of ProductRepository
///
/// Same semantics as the MongoDB gateway. Useful for local development and
/// as the backing store in HTTP tests.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input)?;

        let mut products = self.products.write().await;
        if products.contains_key(product.id()) {
            return Err(ProductError::DuplicateKey {
                field: Some("_id".to_string()),
            });
        }
        products.insert(product.id().to_string(), product.clone());

        Ok(product)
    }

    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let id = parse_product_id(id)?;
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| filter.category().is_none_or(|c| p.category() == c))
            .cloned()
            .collect();
        sort_newest_first(&mut result);

        Ok(result)
    }
}
