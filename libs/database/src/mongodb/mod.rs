//! MongoDB database connector and utilities
//!
//! Provides configuration, connection management and health probes.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{MongoError, connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health_detailed};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
