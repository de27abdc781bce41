use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Server error code MongoDB reports for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

pub const RESOURCE_NOT_FOUND: &str = "Resource not found";
pub const DUPLICATE_FIELD_VALUE: &str = "Duplicate field value entered";

#[derive(Debug, Error)]
pub enum ProductError {
    /// One message per violated field rule, in field order.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// The id is not in the identifier format.
    #[error("Malformed product id: {0}")]
    MalformedIdentifier(String),

    #[error("Duplicate value for field {}", .field.as_deref().unwrap_or("unknown"))]
    DuplicateKey { field: Option<String> },

    #[error("Database unavailable")]
    StoreUnavailable { detail: String },

    #[error("Database error")]
    Database { detail: String },

    #[error("{0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Whether the failure is caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProductError::Validation(_)
                | ProductError::MalformedIdentifier(_)
                | ProductError::DuplicateKey { .. }
        )
    }
}

/// Normalize a product failure into the HTTP error shape.
///
/// The original failure is logged with its full detail; the client only sees
/// the normalized message.
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        if err.is_client_error() {
            tracing::warn!(error = ?err, "Product request rejected");
        } else {
            tracing::error!(error = ?err, "Product request failed");
        }

        match err {
            ProductError::Validation(messages) => AppError::BadRequest(messages.join(", ")),
            ProductError::MalformedIdentifier(_) => AppError::NotFound(RESOURCE_NOT_FOUND.to_string()),
            ProductError::DuplicateKey { .. } => {
                AppError::BadRequest(DUPLICATE_FIELD_VALUE.to_string())
            }
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE => {
                ProductError::DuplicateKey {
                    field: duplicate_key_field(&write.message),
                }
            }
            ErrorKind::Command(command) if command.code == DUPLICATE_KEY_CODE => {
                ProductError::DuplicateKey {
                    field: duplicate_key_field(&command.message),
                }
            }
            ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. } => ProductError::StoreUnavailable {
                detail: err.to_string(),
            },
            _ => ProductError::Database {
                detail: err.to_string(),
            },
        }
    }
}

/// Field named in a duplicate key message, e.g. `name` from
/// `E11000 duplicate key error collection: catalog.products index: name_1 dup key: { name: "Widget" }`.
pub fn duplicate_key_field(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("dup key: {")?;
    let (field, _) = rest.split_once(':')?;
    let field = field.trim().trim_matches('"');
    (!field.is_empty()).then(|| field.to_string())
}
