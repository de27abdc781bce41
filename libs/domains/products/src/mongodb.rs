//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductFilter};
use crate::repository::{parse_product_id, ProductRepository};

pub const COLLECTION_NAME: &str = "products";

/// Stored shape of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    price: f64,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            price: product.price(),
            category: product.category().to_string(),
            description: product.description().map(str::to_string),
            created_at: bson::DateTime::from_millis(product.created_at().timestamp_millis()),
            updated_at: bson::DateTime::from_millis(product.updated_at().timestamp_millis()),
        }
    }
}

impl ProductDocument {
    fn into_product(self) -> ProductResult<Product> {
        let created_at = to_chrono(self.created_at, &self.id)?;
        let updated_at = to_chrono(self.updated_at, &self.id)?;

        Ok(Product::from_stored(
            self.id,
            self.name,
            self.price,
            self.category,
            self.description,
            created_at,
            updated_at,
        ))
    }
}

fn to_chrono(value: bson::DateTime, id: &str) -> ProductResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(value.timestamp_millis()).ok_or_else(|| {
        ProductError::Internal(format!("Product {} has an out-of-range timestamp", id))
    })
}

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<ProductDocument>(COLLECTION_NAME),
        }
    }

    /// Create the index backing the filtered, newest-first listing.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "category": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_category_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn build_filter(filter: &ProductFilter) -> Document {
        match filter.category() {
            Some(category) => doc! { "category": category },
            None => doc! {},
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input)?;

        self.collection
            .insert_one(ProductDocument::from(&product))
            .await?;

        tracing::debug!(product_id = %product.id(), "Product inserted");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let id = parse_product_id(id)?;

        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .map(ProductDocument::into_product)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        documents.into_iter().map(ProductDocument::into_product).collect()
    }
}
