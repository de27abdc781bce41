use axum::Router;
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

/// Full application router: products, readiness, liveness, docs, fallback.
fn build_app(state: &AppState) -> std::io::Result<Router> {
    let router = create_router::<openapi::ApiDoc>(api::routes(state))?;
    Ok(router.merge(health_router(state.config.app)))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // Connect to MongoDB with retry; startup only
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    api::products::init_indexes(&db).await?;

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    let app = build_app(&state)?;

    info!("Starting Catalog API with production-ready shutdown (30s timeout)");

    let client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{Environment, app_info, server::ServerConfig};
    use database::mongodb::MongoConfig;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    // The driver connects lazily, so no server is needed for routes that
    // never touch the store.
    async fn test_state() -> AppState {
        let mongo_config = MongoConfig::default();
        let mongo_client = mongodb::Client::with_uri_str(mongo_config.url())
            .await
            .unwrap();
        let db = mongo_client.database(mongo_config.database());

        AppState {
            config: Config {
                app: app_info!(),
                mongodb: mongo_config,
                server: ServerConfig::default(),
                environment: Environment::Development,
            },
            mongo_client,
            db,
        }
    }

    async fn json_body(body: Body) -> Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_route_returns_route_not_found() {
        let app = build_app(&test_state().await).unwrap();

        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response.into_body()).await,
            json!({ "success": false, "error": "Route not found" })
        );
    }

    #[tokio::test]
    async fn test_health_reports_package() {
        let app = build_app(&test_state().await).unwrap();

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["name"], "catalog_api");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_product_paths() {
        let app = build_app(&test_state().await).unwrap();

        let response = app
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response.into_body()).await;
        assert!(body["paths"].get("/products").is_some());
        assert!(body["paths"].get("/products/{id}").is_some());
    }
}
