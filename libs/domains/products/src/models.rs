use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::{ProductError, ProductResult};

/// Field order used when reporting validation failures.
const FIELD_ORDER: [&str; 4] = ["name", "price", "category", "description"];

pub const PRICE_NOT_FINITE: &str = "Product price must be a finite number";

/// Product entity
///
/// Only obtainable through [`Product::new`] (or rebuilt from a stored
/// record), so every instance has a non-empty name and category and a
/// non-negative price.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v7, hyphenated)
    #[schema(example = "01928a6e-8b7c-7d3e-9f10-4a5b6c7d8e9f")]
    id: String,
    #[schema(example = "Widget")]
    name: String,
    #[schema(example = 9.99)]
    price: f64,
    #[schema(example = "tools")]
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Validating factory.
    ///
    /// Trims text fields, checks every rule and, when all pass, assigns a
    /// fresh id and stamps both timestamps with the same instant (millisecond
    /// precision). Otherwise returns `ProductError::Validation` with one
    /// message per violated rule, in field order.
    pub fn new(input: CreateProduct) -> ProductResult<Self> {
        let input = input.normalized();

        let mut messages = match input.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => validation_messages(&errors),
        };
        if input.price.is_some_and(|price| !price.is_finite()) {
            messages.push(PRICE_NOT_FINITE.to_string());
        }
        if !messages.is_empty() {
            return Err(ProductError::Validation(messages));
        }

        let CreateProduct {
            name: Some(name),
            price: Some(price),
            category: Some(category),
            description,
        } = input
        else {
            return Err(ProductError::Internal(
                "validated product is missing a required field".to_string(),
            ));
        };

        let now = Utc::now().trunc_subsecs(3);
        Ok(Self {
            id: Uuid::now_v7().to_string(),
            name,
            price,
            category,
            description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a product from a stored record. No validation is applied.
    pub(crate) fn from_stored(
        id: String,
        name: String,
        price: f64,
        category: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            price,
            category,
            description,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Raw creation payload
///
/// Every field is optional here so that a missing field is reported by
/// validation with its own message instead of failing JSON decoding.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(required(message = "Product name is required"))]
    #[schema(example = "Widget")]
    pub name: Option<String>,

    #[validate(
        required(message = "Product price is required"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    #[schema(example = 9.99)]
    pub price: Option<f64>,

    #[validate(required(message = "Product category is required"))]
    #[schema(example = "tools")]
    pub category: Option<String>,

    pub description: Option<String>,
}

impl CreateProduct {
    /// Trim text fields; blank text counts as absent.
    fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            price: self.price,
            category: trimmed(self.category),
            description: trimmed(self.description),
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Flatten validator errors into their messages, in field order.
fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let field_errors = errors.field_errors();

    FIELD_ORDER
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errors| errors.iter())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => error.code.to_string(),
        })
        .collect()
}

/// Query parameters for listing products
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Exact, case-sensitive category match. Empty means no filter.
    pub category: Option<String>,
}

impl ProductFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
        }
    }

    /// The category to filter on, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> CreateProduct {
        CreateProduct {
            name: Some("Widget".to_string()),
            price: Some(9.99),
            category: Some("tools".to_string()),
            description: None,
        }
    }

    fn messages(input: CreateProduct) -> Vec<String> {
        match Product::new(input) {
            Err(ProductError::Validation(messages)) => messages,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_new_assigns_id_and_equal_timestamps() {
        let product = Product::new(widget()).unwrap();

        assert!(Uuid::parse_str(product.id()).is_ok());
        assert_eq!(product.name(), "Widget");
        assert_eq!(product.price(), 9.99);
        assert_eq!(product.category(), "tools");
        assert_eq!(product.description(), None);
        assert_eq!(product.created_at(), product.updated_at());
        assert_eq!(product.created_at().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_new_trims_text_fields() {
        let product = Product::new(CreateProduct {
            name: Some("  Widget ".to_string()),
            category: Some(" tools".to_string()),
            description: Some("  A small widget  ".to_string()),
            ..widget()
        })
        .unwrap();

        assert_eq!(product.name(), "Widget");
        assert_eq!(product.category(), "tools");
        assert_eq!(product.description(), Some("A small widget"));
    }

    #[test]
    fn test_blank_description_is_dropped() {
        let product = Product::new(CreateProduct {
            description: Some("   ".to_string()),
            ..widget()
        })
        .unwrap();
        assert_eq!(product.description(), None);
    }

    #[test]
    fn test_zero_price_is_valid() {
        let product = Product::new(CreateProduct {
            price: Some(0.0),
            ..widget()
        })
        .unwrap();
        assert_eq!(product.price(), 0.0);
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let result = messages(CreateProduct {
            price: Some(-1.0),
            ..widget()
        });
        assert_eq!(result, vec!["Price cannot be negative"]);
    }

    #[test]
    fn test_non_finite_price_is_rejected() {
        let result = messages(CreateProduct {
            price: Some(f64::NAN),
            ..widget()
        });
        assert_eq!(result, vec![PRICE_NOT_FINITE]);
    }

    #[test]
    fn test_missing_fields_report_in_field_order() {
        let result = messages(CreateProduct::default());
        assert_eq!(
            result,
            vec![
                "Product name is required",
                "Product price is required",
                "Product category is required",
            ]
        );
    }

    #[test]
    fn test_whitespace_only_name_counts_as_missing() {
        let result = messages(CreateProduct {
            name: Some("   ".to_string()),
            ..widget()
        });
        assert_eq!(result, vec!["Product name is required"]);
    }

    #[test]
    fn test_validation_display_joins_messages() {
        let err = Product::new(CreateProduct {
            name: None,
            price: Some(-5.0),
            ..widget()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Product name is required, Price cannot be negative"
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Product::new(widget()).unwrap();
        let b = Product::new(widget()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_serializes_camel_case_without_absent_description() {
        let product = Product::new(widget()).unwrap();
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["name"], "Widget");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("description").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_create_product_deserializes_partial_payload() {
        let input: CreateProduct = serde_json::from_str(r#"{"name":"Widget"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("Widget"));
        assert_eq!(input.price, None);
    }

    #[test]
    fn test_empty_category_filter_means_no_filter() {
        assert_eq!(ProductFilter::default().category(), None);
        assert_eq!(ProductFilter::by_category("").category(), None);
        assert_eq!(ProductFilter::by_category("tools").category(), Some("tools"));
    }
}
