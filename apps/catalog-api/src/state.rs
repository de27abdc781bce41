//! Application state management.

use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is cheap; the MongoDB client shares one connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub mongo_client: Client,
    /// Database holding the `products` collection
    pub db: Database,
}
