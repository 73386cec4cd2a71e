//! Blocking client for the EAN search barcode database.
//!
//! # Overview
//! `EanSearch` turns typed calls (barcode and ISBN lookup, checksum
//! verification, name/category/prefix searches, issuing-country lookup and
//! barcode images) into GET requests against `/api`, and decodes the JSON
//! answers into `ProductResult` values.
//!
//! # Design
//! - Every operation is split into `build_*` (produces the request) and
//!   `parse_*` (consumes the response); the `Transport` in between is the only
//!   component that does I/O.
//! - `try_*` methods return `Result<_, ApiError>`. The plain methods return
//!   the operation's empty value instead (`None`, `false`, `""`) and never
//!   panic.
//! - One call, one connection: `UreqTransport` builds a fresh agent per call
//!   and keeps no state between calls.

pub mod client;
pub mod decode;
pub mod encode;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{EanSearch, DEFAULT_BASE_URL};
pub use encode::encode_query_value;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Transport};
pub use transport::UreqTransport;
pub use types::{Language, Product, ProductFull, ProductResult};
