use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::cors::cors_layer_from_env;
use axum::Router;
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Path of the generated OpenAPI document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Wraps the application routes with the cross-cutting layers.
///
/// Sets up:
/// - Swagger UI at `/swagger-ui`, backed by [`OPENAPI_JSON_PATH`]
/// - the JSON `Route not found` fallback, also used for a known path called
///   with a method it does not serve
/// - request tracing
/// - CORS, only when `CORS_ALLOWED_ORIGIN` is set
///
/// Routes are merged at the root; callers choose their own mount points
/// (e.g. `Router::new().nest("/products", ...)`). Health endpoints are added
/// by the app with [`super::health_router`].
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` is set but empty or invalid.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, T::openapi()))
        .merge(apis)
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    match cors_layer_from_env()? {
        Some(cors) => Ok(router.layer(cors)),
        None => Ok(router),
    }
}

/// Serves `router` until a shutdown signal, then runs `cleanup`.
///
/// In-flight requests drain first; `cleanup` (closing store connections) is
/// bounded by `shutdown_timeout` and abandoned with a warning past it.
///
/// # Example
/// ```ignore
/// let client = state.client.clone();
/// create_production_app(router, &config.server, Duration::from_secs(30), async move {
///     client.shutdown().await;
/// })
/// .await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::default();
    let cleanup_signal = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        cleanup_signal.wait_for_shutdown().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { coordinator.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    if let Err(e) = cleanup_handle.await {
        tracing::warn!("Cleanup task did not finish: {}", e);
    }

    serve_result
}
