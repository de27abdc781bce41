//! HTTP middleware module.
//!
//! Currently only CORS, which is opt-in through `CORS_ALLOWED_ORIGIN`.

pub mod cors;

pub use cors::{cors_layer_from_env, create_cors_layer, parse_origins};
