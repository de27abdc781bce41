//! Products API routes
//!
//! Wires the products domain to HTTP routes over MongoDB.

use axum::Router;
use domain_products::{MongoProductRepository, ProductResult, ProductService, handlers};
use mongodb::Database;

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::new(&state.db);
    let service = ProductService::new(repository);

    handlers::router(service)
}

/// Create the indexes the products listing relies on.
pub async fn init_indexes(db: &Database) -> ProductResult<()> {
    MongoProductRepository::new(db).init_indexes().await
}
