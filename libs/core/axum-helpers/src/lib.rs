//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: Opt-in CORS
//! - **[`errors`]**: `{ success: false, error }` envelope and `AppError`
//! - **[`response`]**: `{ success: true, ... }` envelopes
//! - **[`extractors`]**: JSON body extractor with envelope rejections
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(routes)?;
//!
//!     create_production_app(router, &ServerConfig::default(), Duration::from_secs(30), async {})
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer};

pub use errors::{AppError, ErrorResponse, SERVER_ERROR, error_response};

pub use response::{ApiResponse, ListResponse, MessageResponse};

pub use extractors::JsonBody;
