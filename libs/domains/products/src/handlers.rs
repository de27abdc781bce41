//! HTTP handlers for Products API

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_helpers::{
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
    ApiResponse, AppError, ErrorResponse, JsonBody, ListResponse, MessageResponse,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreateProduct, Product, ProductFilter};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, get_product),
    components(
        schemas(Product, CreateProduct, ProductFilter, MessageResponse, ErrorResponse),
        responses(NotFoundResponse, BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router
///
/// Routes are relative; the caller picks the mount point (`/products`).
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product))
        .with_state(shared_service)
}

/// List products, optionally filtered by category
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Products, newest first", body = ListResponse<Product>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    query: Result<Query<ProductFilter>, QueryRejection>,
) -> Result<ListResponse<Product>, AppError> {
    let Query(filter) = query?;
    let products = service.list_products(filter).await?;
    Ok(ListResponse::success(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(input): JsonBody<CreateProduct>,
) -> Result<impl IntoResponse, AppError> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(product)))
}

/// Get a product by id
///
/// An id that is well formed but unassigned answers with a message envelope;
/// a malformed id is a failure and goes through the error envelope.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<Product>),
        (status = 404, description = "No product with this id, or malformed id", body = MessageResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    match service.get_product(&id).await? {
        Some(product) => Ok(ApiResponse::success(product).into_response()),
        None => Ok(MessageResponse::failure(PRODUCT_NOT_FOUND).with_status(StatusCode::NOT_FOUND)),
    }
}
