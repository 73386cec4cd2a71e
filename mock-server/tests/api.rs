use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_token, TEST_TOKEN};
use serde_json::Value;
use tower::ServiceExt;

async fn get(app: axum::Router, query: &str) -> (StatusCode, Value) {
    let uri = format!("/api?{query}&token={TEST_TOKEN}&format=json");
    let response = app
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// --- lookup ---

#[tokio::test]
async fn barcode_lookup_returns_one_element_array() {
    let (status, body) = get(app(), "op=barcode-lookup&ean=5099750442227&language=1").await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Michael Jackson, Thriller");
    assert_eq!(items[0]["googleCategoryId"], "855");
}

#[tokio::test]
async fn unknown_barcode_reports_error() {
    let (_, body) = get(app(), "op=barcode-lookup&ean=0000000000000").await;
    assert_eq!(body[0]["error"], "Barcode not found");
}

#[tokio::test]
async fn isbn_lookup_finds_bookland_ean() {
    let (_, body) = get(app(), "op=barcode-lookup&isbn=1119578884").await;
    assert_eq!(body[0]["ean"], "9781119578888");
}

// --- checksum / scalars ---

#[tokio::test]
async fn verify_checksum_flags_validity() {
    let (_, body) = get(app(), "op=verify-checksum&ean=5099750442227").await;
    assert_eq!(body[0]["valid"], "1");
    let (_, body) = get(app(), "op=verify-checksum&ean=5099750442228").await;
    assert_eq!(body[0]["valid"], "0");
}

#[tokio::test]
async fn issuing_country_and_image() {
    let (_, body) = get(app(), "op=issuing-country&ean=5099750442227").await;
    assert_eq!(body[0]["issuingCountry"], "UK");
    let (_, body) = get(app(), "op=barcode-image&ean=5099750442227&width=102&height=50").await;
    assert_eq!(body[0]["barcode"], "PNG:102x50:5099750442227");
}

// --- searches ---

#[tokio::test]
async fn product_search_matches_decoded_name() {
    let (_, body) = get(app(), "op=product-search&name=Bananaboat%20S&language=99&page=0").await;
    let list = body["productlist"].as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(body["totalproducts"], 3);
    assert_eq!(body["moreproducts"], false);
}

#[tokio::test]
async fn product_search_without_hits_is_empty_list() {
    let (_, body) = get(app(), "op=product-search&name=nothing&language=99&page=0").await;
    assert_eq!(body["productlist"], serde_json::json!([]));
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let (_, body) = get(app(), "op=product-search&name=Bananaboat&language=99&page=5").await;
    assert!(body["productlist"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn similar_search_pages_start_at_one() {
    let (_, body) = get(app(), "op=similar-product-search&name=thriller%20whatever&language=99&page=1").await;
    let list = body["productlist"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["ean"], "5099750442227");
}

#[tokio::test]
async fn category_search_filters_category() {
    let (_, body) = get(app(), "op=category-search&category=45&name=Bananaboat&language=99&page=0").await;
    let list = body["productlist"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["categoryName"], "Music");
}

#[tokio::test]
async fn prefix_search_matches_leading_digits() {
    let (_, body) = get(app(), "op=barcode-prefix-search&prefix=4007249146&language=1&page=0").await;
    assert_eq!(body["productlist"].as_array().unwrap().len(), 2);
}

// --- protocol errors ---

#[tokio::test]
async fn wrong_token_is_rejected() {
    let (status, body) = get(app_with_token("other"), "op=verify-checksum&ean=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn unknown_op_is_rejected() {
    let (_, body) = get(app(), "op=delete-everything").await;
    assert_eq!(body["error"], "Unknown operation");
}

#[tokio::test]
async fn non_json_format_is_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri(format!("/api?op=verify-checksum&ean=1&token={TEST_TOKEN}&format=xml"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
