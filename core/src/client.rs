//! The `EanSearch` facade: one method family per service operation.
//!
//! # Design
//! Each operation is split the same way:
//! - `build_*` assembles the `HttpRequest` (free text goes through
//!   `encode_query_value`; barcodes, ids and numbers are passed verbatim),
//! - `parse_*` turns the `HttpResponse` into a typed value,
//! - `try_*` runs both through the transport and returns `Result`,
//! - the plain method applies the service defaults and collapses every
//!   failure into the operation's empty value (`None`, `false`, `""`).
//!
//! The client holds only the credential, the base URL and the transport, so
//! a shared `&EanSearch` can be used from several threads as long as the
//! transport allows it.

use tracing::debug;

use crate::decode;
use crate::encode::encode_query_value;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;
use crate::types::{Language, ProductResult};

pub const DEFAULT_BASE_URL: &str = "https://api.ean-search.org";
pub const DEFAULT_IMAGE_WIDTH: u32 = 102;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 50;

/// Client for the EAN search barcode database.
#[derive(Clone)]
pub struct EanSearch<T = UreqTransport> {
    token: String,
    base_url: String,
    transport: T,
}

impl<T> std::fmt::Debug for EanSearch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EanSearch")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl EanSearch<UreqTransport> {
    /// Client for the public service, authenticated with `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Client for a compatible service at `base_url`, e.g. a local mock.
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Self {
        Self::with_transport(token, base_url, UreqTransport::new())
    }
}

impl<T: Transport> EanSearch<T> {
    pub fn with_transport(token: impl Into<String>, base_url: &str, transport: T) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    /// `params` values must already be query-safe.
    fn build(&self, op: &'static str, params: &[(&str, &str)]) -> HttpRequest {
        let mut url = format!("{}/api?op={op}", self.base_url);
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(value);
        }
        url.push_str("&token=");
        url.push_str(&self.token);
        url.push_str("&format=json");
        HttpRequest {
            op,
            url,
            headers: Vec::new(),
        }
    }

    fn build_search(
        &self,
        op: &'static str,
        leading: &[(&str, &str)],
        language: Language,
        page: u32,
    ) -> HttpRequest {
        let language = language.to_string();
        let page = page.to_string();
        let mut params = leading.to_vec();
        params.push(("language", language.as_str()));
        params.push(("page", page.as_str()));
        self.build(op, &params)
    }

    pub fn build_barcode_lookup(&self, barcode: &str, language: Language) -> HttpRequest {
        let language = language.to_string();
        self.build("barcode-lookup", &[("ean", barcode), ("language", language.as_str())])
    }

    pub fn build_isbn_lookup(&self, isbn: &str) -> HttpRequest {
        self.build("barcode-lookup", &[("isbn", isbn)])
    }

    pub fn build_verify_checksum(&self, barcode: &str) -> HttpRequest {
        self.build("verify-checksum", &[("ean", barcode)])
    }

    pub fn build_product_search(&self, name: &str, language: Language, page: u32) -> HttpRequest {
        let name = encode_query_value(name);
        self.build_search("product-search", &[("name", &*name)], language, page)
    }

    pub fn build_similar_product_search(
        &self,
        name: &str,
        language: Language,
        page: u32,
    ) -> HttpRequest {
        let name = encode_query_value(name);
        self.build_search("similar-product-search", &[("name", &*name)], language, page)
    }

    pub fn build_category_search(
        &self,
        category: u32,
        name: &str,
        language: Language,
        page: u32,
    ) -> HttpRequest {
        let category = category.to_string();
        let name = encode_query_value(name);
        self.build_search(
            "category-search",
            &[("category", category.as_str()), ("name", &*name)],
            language,
            page,
        )
    }

    pub fn build_barcode_prefix_search(
        &self,
        prefix: &str,
        language: Language,
        page: u32,
    ) -> HttpRequest {
        self.build_search("barcode-prefix-search", &[("prefix", prefix)], language, page)
    }

    pub fn build_issuing_country_lookup(&self, barcode: &str) -> HttpRequest {
        self.build("issuing-country", &[("ean", barcode)])
    }

    pub fn build_barcode_image(&self, barcode: &str, width: u32, height: u32) -> HttpRequest {
        let width = width.to_string();
        let height = height.to_string();
        self.build(
            "barcode-image",
            &[("ean", barcode), ("width", width.as_str()), ("height", height.as_str())],
        )
    }

    // -----------------------------------------------------------------------
    // Response parsing
    // -----------------------------------------------------------------------

    pub fn parse_product(&self, response: HttpResponse) -> Result<ProductResult> {
        check_status(&response)?;
        decode::decode_product(&response.body)
    }

    pub fn parse_product_list(&self, response: HttpResponse) -> Result<Vec<ProductResult>> {
        check_status(&response)?;
        decode::decode_product_list(&response.body)
    }

    pub fn parse_verify_checksum(&self, response: HttpResponse) -> Result<bool> {
        check_status(&response)?;
        decode::decode_checksum(&response.body)
    }

    pub fn parse_issuing_country(&self, response: HttpResponse) -> Result<String> {
        check_status(&response)?;
        decode::decode_string_field(&response.body, "issuingCountry")
    }

    /// The `barcode` field: the rendered image, as delivered by the service.
    pub fn parse_barcode_image(&self, response: HttpResponse) -> Result<String> {
        check_status(&response)?;
        decode::decode_string_field(&response.body, "barcode")
    }

    // -----------------------------------------------------------------------
    // Calls returning `Result`
    // -----------------------------------------------------------------------

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(op = request.op, "calling EAN search");
        self.transport.execute(request)
    }

    pub fn try_barcode_lookup(&self, barcode: &str, language: Language) -> Result<ProductResult> {
        let response = self.send(&self.build_barcode_lookup(barcode, language))?;
        self.parse_product(response)
    }

    pub fn try_isbn_lookup(&self, isbn: &str) -> Result<ProductResult> {
        let response = self.send(&self.build_isbn_lookup(isbn))?;
        self.parse_product(response)
    }

    pub fn try_verify_checksum(&self, barcode: &str) -> Result<bool> {
        let response = self.send(&self.build_verify_checksum(barcode))?;
        self.parse_verify_checksum(response)
    }

    pub fn try_product_search(
        &self,
        name: &str,
        language: Language,
        page: u32,
    ) -> Result<Vec<ProductResult>> {
        let response = self.send(&self.build_product_search(name, language, page))?;
        self.parse_product_list(response)
    }

    pub fn try_similar_product_search(
        &self,
        name: &str,
        language: Language,
        page: u32,
    ) -> Result<Vec<ProductResult>> {
        let response = self.send(&self.build_similar_product_search(name, language, page))?;
        self.parse_product_list(response)
    }

    pub fn try_category_search(
        &self,
        category: u32,
        name: &str,
        language: Language,
        page: u32,
    ) -> Result<Vec<ProductResult>> {
        let response = self.send(&self.build_category_search(category, name, language, page))?;
        self.parse_product_list(response)
    }

    pub fn try_barcode_prefix_search(
        &self,
        prefix: &str,
        language: Language,
        page: u32,
    ) -> Result<Vec<ProductResult>> {
        let response = self.send(&self.build_barcode_prefix_search(prefix, language, page))?;
        self.parse_product_list(response)
    }

    pub fn try_issuing_country_lookup(&self, barcode: &str) -> Result<String> {
        let response = self.send(&self.build_issuing_country_lookup(barcode))?;
        self.parse_issuing_country(response)
    }

    pub fn try_barcode_image(&self, barcode: &str, width: u32, height: u32) -> Result<String> {
        let response = self.send(&self.build_barcode_image(barcode, width, height))?;
        self.parse_barcode_image(response)
    }

    // -----------------------------------------------------------------------
    // Calls returning the empty value on failure
    // -----------------------------------------------------------------------

    /// Look up a barcode, English names preferred.
    pub fn barcode_lookup(&self, barcode: &str) -> Option<ProductResult> {
        self.barcode_lookup_with(barcode, Language::English)
    }

    pub fn barcode_lookup_with(&self, barcode: &str, language: Language) -> Option<ProductResult> {
        settle("barcode-lookup", self.try_barcode_lookup(barcode, language))
    }

    pub fn isbn_lookup(&self, isbn: &str) -> Option<ProductResult> {
        settle("barcode-lookup", self.try_isbn_lookup(isbn))
    }

    /// `false` both for an invalid checksum and for any failure.
    pub fn verify_checksum(&self, barcode: &str) -> bool {
        settle("verify-checksum", self.try_verify_checksum(barcode)).unwrap_or(false)
    }

    /// Search by name in any language, first page.
    pub fn product_search(&self, name: &str) -> Option<Vec<ProductResult>> {
        self.product_search_with(name, Language::Any, 0)
    }

    pub fn product_search_with(
        &self,
        name: &str,
        language: Language,
        page: u32,
    ) -> Option<Vec<ProductResult>> {
        settle("product-search", self.try_product_search(name, language, page))
    }

    /// Fuzzy name search in any language. The service numbers these pages from 1.
    pub fn similar_product_search(&self, name: &str) -> Option<Vec<ProductResult>> {
        self.similar_product_search_with(name, Language::Any, 1)
    }

    pub fn similar_product_search_with(
        &self,
        name: &str,
        language: Language,
        page: u32,
    ) -> Option<Vec<ProductResult>> {
        settle(
            "similar-product-search",
            self.try_similar_product_search(name, language, page),
        )
    }

    pub fn category_search(&self, category: u32, name: &str) -> Option<Vec<ProductResult>> {
        self.category_search_with(category, name, Language::Any, 0)
    }

    pub fn category_search_with(
        &self,
        category: u32,
        name: &str,
        language: Language,
        page: u32,
    ) -> Option<Vec<ProductResult>> {
        settle(
            "category-search",
            self.try_category_search(category, name, language, page),
        )
    }

    pub fn barcode_prefix_search(&self, prefix: &str) -> Option<Vec<ProductResult>> {
        self.barcode_prefix_search_with(prefix, Language::English, 0)
    }

    pub fn barcode_prefix_search_with(
        &self,
        prefix: &str,
        language: Language,
        page: u32,
    ) -> Option<Vec<ProductResult>> {
        settle(
            "barcode-prefix-search",
            self.try_barcode_prefix_search(prefix, language, page),
        )
    }

    /// Country that issued the barcode's prefix, or `""`.
    pub fn issuing_country_lookup(&self, barcode: &str) -> String {
        settle("issuing-country", self.try_issuing_country_lookup(barcode)).unwrap_or_default()
    }

    pub fn barcode_image(&self, barcode: &str) -> String {
        self.barcode_image_with(barcode, DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_HEIGHT)
    }

    pub fn barcode_image_with(&self, barcode: &str, width: u32, height: u32) -> String {
        settle("barcode-image", self.try_barcode_image(barcode, width, height)).unwrap_or_default()
    }
}

fn check_status(response: &HttpResponse) -> Result<()> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

fn settle<R>(op: &'static str, result: Result<R>) -> Option<R> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(op, error = %e, "EAN search call produced no result");
            None
        }
    }
}
