//! Product records and request enums for the EAN search API.
//!
//! # Design
//! The service returns one JSON object shape per product, optionally carrying
//! a Google taxonomy id. `ProductResult` tags the two cases explicitly so
//! callers never have to guess whether the extended field is populated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A catalog entry with the fields every product carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// EAN/UPC/GTIN, as returned in the `ean` field.
    pub barcode: String,
    pub name: String,
    pub category_id: u32,
    pub category_name: String,
    pub issuing_country: String,
}

/// A product that also carries its Google product-taxonomy id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFull {
    #[serde(flatten)]
    pub product: Product,
    pub google_category_id: i64,
}

/// One decoded product, tagged by whether `googleCategoryId` was present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductResult {
    Basic(Product),
    Full(ProductFull),
}

impl ProductResult {
    /// The fields shared by both variants.
    pub fn product(&self) -> &Product {
        match self {
            ProductResult::Basic(p) => p,
            ProductResult::Full(full) => &full.product,
        }
    }

    pub fn google_category_id(&self) -> Option<i64> {
        match self {
            ProductResult::Basic(_) => None,
            ProductResult::Full(full) => Some(full.google_category_id),
        }
    }

    pub fn into_product(self) -> Product {
        match self {
            ProductResult::Basic(p) => p,
            ProductResult::Full(full) => full.product,
        }
    }
}

impl fmt::Display for ProductResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.product();
        write!(
            f,
            "{} is {} in category {} [{}]",
            p.barcode, p.name, p.category_id, p.category_name
        )?;
        if let Some(google) = self.google_category_id() {
            write!(f, " Google category {google}")?;
        }
        write!(f, " issued in {}", p.issuing_country)
    }
}

/// Result language ids, as numbered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Language {
    English = 1,
    Danish = 2,
    German = 3,
    Spanish = 4,
    Finish = 5,
    French = 6,
    Italian = 8,
    Dutch = 10,
    Norwegian = 11,
    Polish = 12,
    Portuguese = 13,
    Swedish = 15,
    Any = 99,
}

impl Language {
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
