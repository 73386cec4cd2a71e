use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Token accepted by `app()`.
pub const TEST_TOKEN: &str = "mock-token";

const PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub ean: String,
    pub name: String,
    pub category_id: String,
    pub category_name: String,
    pub issuing_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_category_id: Option<String>,
}

fn product(ean: &str, name: &str, category: (&str, &str), country: &str, google: Option<&str>) -> Product {
    Product {
        ean: ean.to_string(),
        name: name.to_string(),
        category_id: category.0.to_string(),
        category_name: category.1.to_string(),
        issuing_country: country.to_string(),
        google_category_id: google.map(str::to_string),
    }
}

/// The fixed catalog served by the mock.
pub fn catalog() -> Vec<Product> {
    vec![
        product("5099750442227", "Michael Jackson, Thriller", ("45", "Music"), "UK", Some("855")),
        product("9781119578888", "Linux for Dummies", ("15", "Books"), "US", Some("784")),
        product("4007249146014", "Bananaboat Sunscreen SPF 30", ("20", "Health"), "DE", None),
        product("4007249146021", "Bananaboat Sunscreen SPF 50", ("20", "Health"), "DE", None),
        product("5012345678900", "Bananaboat Song (Harry Belafonte)", ("45", "Music"), "UK", None),
    ]
}

#[derive(Clone)]
struct AppState {
    token: String,
    catalog: Arc<Vec<Product>>,
}

pub fn app() -> Router {
    app_with_token(TEST_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        token: token.to_string(),
        catalog: Arc::new(catalog()),
    };
    Router::new().route("/api", get(api)).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(message: &str) -> Response {
    Json(json!({ "error": message })).into_response()
}

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> &'a str {
    params.get(name).map(String::as_str).unwrap_or_default()
}

fn number(params: &HashMap<String, String>, name: &str, default: usize) -> usize {
    params.get(name).and_then(|v| v.parse().ok()).unwrap_or(default)
}

async fn api(State(state): State<AppState>, Query(params): Query<HashMap<String, String>>) -> Response {
    if param(&params, "format") != "json" {
        return (StatusCode::BAD_REQUEST, "only format=json is supported").into_response();
    }
    if param(&params, "token") != state.token {
        return error("Invalid token");
    }

    let catalog = state.catalog.as_slice();
    match param(&params, "op") {
        "barcode-lookup" => {
            let ean = match params.get("isbn") {
                Some(isbn) => isbn_to_ean(isbn).unwrap_or_default(),
                None => param(&params, "ean").to_string(),
            };
            match catalog.iter().find(|p| p.ean == ean) {
                Some(p) => Json(vec![p.clone()]).into_response(),
                None => Json(json!([{ "error": "Barcode not found" }])).into_response(),
            }
        }
        "verify-checksum" => {
            let ean = param(&params, "ean");
            let valid = if has_valid_checksum(ean) { "1" } else { "0" };
            Json(json!([{ "ean": ean, "valid": valid }])).into_response()
        }
        "product-search" => {
            let name = param(&params, "name").to_lowercase();
            let hits = catalog.iter().filter(|p| p.name.to_lowercase().contains(&name));
            product_page(hits, number(&params, "page", 0))
        }
        "similar-product-search" => {
            let words: Vec<String> = param(&params, "name")
                .split_whitespace()
                .map(str::to_lowercase)
                .collect();
            let hits = catalog.iter().filter(|p| {
                let name = p.name.to_lowercase();
                words.iter().any(|w| name.contains(w.as_str()))
            });
            product_page(hits, number(&params, "page", 1).saturating_sub(1))
        }
        "category-search" => {
            let category = param(&params, "category");
            let name = param(&params, "name").to_lowercase();
            let hits = catalog
                .iter()
                .filter(|p| p.category_id == category && p.name.to_lowercase().contains(&name));
            product_page(hits, number(&params, "page", 0))
        }
        "barcode-prefix-search" => {
            let prefix = param(&params, "prefix");
            let hits = catalog.iter().filter(|p| p.ean.starts_with(prefix));
            product_page(hits, number(&params, "page", 0))
        }
        "issuing-country" => {
            let ean = param(&params, "ean");
            Json(json!([{ "ean": ean, "issuingCountry": issuing_country(ean) }])).into_response()
        }
        "barcode-image" => {
            let ean = param(&params, "ean");
            let width = number(&params, "width", 102);
            let height = number(&params, "height", 50);
            let image = format!("PNG:{width}x{height}:{ean}");
            Json(json!([{ "ean": ean, "barcode": image }])).into_response()
        }
        _ => error("Unknown operation"),
    }
}

fn product_page<'a>(hits: impl Iterator<Item = &'a Product>, page: usize) -> Response {
    let hits: Vec<&Product> = hits.collect();
    let start = page.saturating_mul(PAGE_SIZE).min(hits.len());
    let end = (start + PAGE_SIZE).min(hits.len());
    let body: Value = json!({
        "page": page,
        "moreproducts": end < hits.len(),
        "totalproducts": hits.len(),
        "productlist": &hits[start..end],
    });
    Json(body).into_response()
}

/// EAN-13 checksum: weights 1 and 3 alternating from the left.
pub fn has_valid_checksum(ean: &str) -> bool {
    if ean.len() != 13 || !ean.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = ean.bytes().map(|b| u32::from(b - b'0')).collect();
    digits[12] == ean13_check_digit(&digits[..12])
}

fn ean13_check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    (10 - sum % 10) % 10
}

/// ISBN-10 or ISBN-13 to the matching EAN-13.
pub fn isbn_to_ean(isbn: &str) -> Option<String> {
    let isbn: String = isbn.chars().filter(|c| *c != '-').collect();
    match isbn.len() {
        13 => Some(isbn),
        10 => {
            let head = isbn.get(..9)?;
            if !head.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let body = format!("978{head}");
            let digits: Vec<u32> = body.bytes().map(|b| u32::from(b - b'0')).collect();
            Some(format!("{body}{}", ean13_check_digit(&digits)))
        }
        _ => None,
    }
}

fn issuing_country(ean: &str) -> &'static str {
    match ean.get(..2).and_then(|p| p.parse::<u32>().ok()) {
        Some(0..=13) => "US",
        Some(40..=44) => "DE",
        Some(50) => "UK",
        Some(97..=98) => "Bookland",
        _ => "",
    }
}
