//! Decoding of the service's JSON bodies into typed results.
//!
//! # Design
//! The service uses three body shapes: a bare object, a one-element array
//! wrapping an object, and an object with a `productlist` array. Each decoder
//! here accepts the shapes its operations can receive and reports anything
//! else as `UnexpectedShape`, so a caller can always tell a malformed body
//! from a valid empty list.
//!
//! Numeric fields usually arrive as JSON strings (`"categoryId": "45"`);
//! plain JSON integers are accepted as well.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::types::{Product, ProductFull, ProductResult};

/// Wire shape of one product object.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    ean: String,
    name: String,
    category_id: IntField,
    category_name: String,
    issuing_country: String,
    #[serde(default)]
    google_category_id: Option<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntField {
    Int(i64),
    Text(String),
}

impl IntField {
    fn to_u32(&self) -> Option<u32> {
        match self {
            IntField::Int(n) => u32::try_from(*n).ok(),
            IntField::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize)]
struct ProductListEnvelope {
    productlist: Vec<Value>,
}

impl RawProduct {
    /// Validate required fields and pick the variant.
    fn into_result(self) -> Result<ProductResult> {
        for (field, value) in [
            ("ean", &self.ean),
            ("name", &self.name),
            ("categoryName", &self.category_name),
            ("issuingCountry", &self.issuing_country),
        ] {
            if value.is_empty() {
                return Err(ApiError::InvalidProduct(format!("`{field}` is empty")));
            }
        }
        let category_id = self.category_id.to_u32().ok_or_else(|| {
            ApiError::InvalidProduct("`categoryId` is not a non-negative integer".to_string())
        })?;

        let google_category_id = self.google_category_id.as_ref().and_then(optional_i64);
        let product = Product {
            barcode: self.ean,
            name: self.name,
            category_id,
            category_name: self.category_name,
            issuing_country: self.issuing_country,
        };
        Ok(match google_category_id {
            Some(google_category_id) => ProductResult::Full(ProductFull {
                product,
                google_category_id,
            }),
            None => ProductResult::Basic(product),
        })
    }
}

/// An optional integer field; anything unparsable counts as absent.
fn optional_i64(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fail with `Service` if the body is the service's `{"error": ...}` payload,
/// either bare or wrapped in a one-element array.
fn check_service_error(value: &Value) -> Result<()> {
    let object = match value {
        Value::Object(o) => o,
        Value::Array(items) if items.len() == 1 => match items[0].as_object() {
            Some(o) => o,
            None => return Ok(()),
        },
        _ => return Ok(()),
    };
    match object.get("error") {
        Some(Value::String(msg)) => Err(ApiError::Service(msg.clone())),
        Some(other) => Err(ApiError::Service(other.to_string())),
        None => Ok(()),
    }
}

/// Unwrap a bare object or a one-element array holding an object.
fn single_object(value: Value) -> Result<Value> {
    match value {
        Value::Object(_) => Ok(value),
        Value::Array(mut items) => {
            if items.len() != 1 {
                return Err(ApiError::UnexpectedShape(format!(
                    "expected a one-element array, got {} elements",
                    items.len()
                )));
            }
            let item = items.remove(0);
            if item.is_object() {
                Ok(item)
            } else {
                Err(ApiError::UnexpectedShape(format!(
                    "expected an object inside the array, got {}",
                    json_kind(&item)
                )))
            }
        }
        other => Err(ApiError::UnexpectedShape(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn parse_body(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body)?;
    check_service_error(&value)?;
    Ok(value)
}

/// Decode one product object into its tagged form.
pub fn product_from_value(value: Value) -> Result<ProductResult> {
    let raw: RawProduct =
        serde_json::from_value(value).map_err(|e| ApiError::InvalidProduct(e.to_string()))?;
    raw.into_result()
}

/// Decode a single-product body (bare object or one-element array).
pub fn decode_product(body: &str) -> Result<ProductResult> {
    let object = single_object(parse_body(body)?)?;
    product_from_value(object)
}

/// Decode a `{"productlist": [...]}` body.
///
/// Items that fail to decode are skipped; the remaining ones keep their
/// upstream order. A missing or non-array `productlist` is an error, while an
/// empty array yields an empty list.
pub fn decode_product_list(body: &str) -> Result<Vec<ProductResult>> {
    let value = parse_body(body)?;
    if !value.is_object() {
        return Err(ApiError::UnexpectedShape(format!(
            "expected an object with `productlist`, got {}",
            json_kind(&value)
        )));
    }
    let envelope: ProductListEnvelope =
        serde_json::from_value(value).map_err(|e| ApiError::UnexpectedShape(e.to_string()))?;

    let products = envelope
        .productlist
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match product_from_value(item) {
            Ok(product) => Some(product),
            Err(e) => {
                debug!(index, error = %e, "skipping undecodable product");
                None
            }
        })
        .collect();
    Ok(products)
}

/// Extract a string field from a single-object body.
pub fn decode_string_field(body: &str, field: &'static str) -> Result<String> {
    let object = single_object(parse_body(body)?)?;
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ApiError::MissingField(field)),
    }
}

/// `true` only when the `valid` field is the string `"1"`.
pub fn decode_checksum(body: &str) -> Result<bool> {
    Ok(decode_string_field(body, "valid")? == "1")
}
