//! JSON body extractor whose rejections use the standard error envelope.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON extractor that reports decoding failures as `AppError`.
///
/// Axum's plain `Json` rejects with a text body and a 400, 415 or 422 status;
/// this wrapper answers every such rejection with `400` and
/// `{ "success": false, "error": "..." }` carrying the decoder message.
/// Field-level rules are left to the domain.
///
/// # Example
/// ```ignore
/// use axum::routing::post;
/// use axum_helpers::extractors::JsonBody;
///
/// async fn create(JsonBody(payload): JsonBody<CreateProduct>) -> impl IntoResponse { ... }
///
/// let app = Router::new().route("/", post(create));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(data)) => Ok(JsonBody(data)),
            Err(rejection) => Err(AppError::from(rejection).into_response()),
        }
    }
}
