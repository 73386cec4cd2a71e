//! End-to-end run against the mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building and response decoding agree with the server's wire format.

use std::net::SocketAddr;

use eansearch_core::{ApiError, EanSearch, Language, ProductResult};

fn start_mock_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

#[test]
fn every_operation_against_mock_server() {
    let addr = start_mock_server();
    let client = EanSearch::with_base_url(mock_server::TEST_TOKEN, &format!("http://{addr}"));

    // Barcode lookup: full product.
    let product = client.barcode_lookup("5099750442227").expect("lookup");
    assert!(matches!(product, ProductResult::Full(_)));
    assert_eq!(product.product().name, "Michael Jackson, Thriller");
    assert_eq!(product.google_category_id(), Some(855));

    // Unknown barcode: service error, empty result.
    assert!(client.barcode_lookup("0000000000000").is_none());
    let err = client.try_barcode_lookup("0000000000000", Language::English).unwrap_err();
    assert!(matches!(err, ApiError::Service(_)), "{err:?}");

    // ISBN lookup.
    let book = client.isbn_lookup("1119578884").expect("isbn");
    assert_eq!(book.product().barcode, "9781119578888");

    // Checksums.
    assert!(client.verify_checksum("5099750442227"));
    assert!(!client.verify_checksum("5099750442228"));

    // Searches.
    let hits = client.product_search("Bananaboat").expect("search");
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|p| p.product().name.contains("Bananaboat")));

    let hits = client.product_search("Bananaboat Song (Harry").expect("search with punctuation");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].product().barcode, "5012345678900");

    let none = client.product_search("no such product").expect("empty search");
    assert!(none.is_empty());

    let similar = client.similar_product_search("Thriller whatever").expect("similar");
    assert_eq!(similar.len(), 1);

    let music = client.category_search(45, "Bananaboat").expect("category");
    assert_eq!(music.len(), 1);
    assert_eq!(music[0].product().category_name, "Music");

    let prefixed = client.barcode_prefix_search("4007249146").expect("prefix");
    assert_eq!(prefixed.len(), 2);
    assert!(prefixed.iter().all(|p| matches!(p, ProductResult::Basic(_))));

    // Scalars.
    assert_eq!(client.issuing_country_lookup("5099750442227"), "UK");
    assert_eq!(client.barcode_image("5099750442227"), "PNG:102x50:5099750442227");
    assert_eq!(client.barcode_image_with("5099750442227", 300, 120), "PNG:300x120:5099750442227");
}

#[test]
fn wrong_token_yields_empty_results() {
    let addr = start_mock_server();
    let client = EanSearch::with_base_url("wrong-token", &format!("http://{addr}"));

    assert!(client.barcode_lookup("5099750442227").is_none());
    assert!(client.product_search("Bananaboat").is_none());
    assert!(!client.verify_checksum("5099750442227"));
    assert_eq!(client.issuing_country_lookup("5099750442227"), "");

    let err = client.try_product_search("Bananaboat", Language::Any, 0).unwrap_err();
    assert!(matches!(err, ApiError::Service(ref msg) if msg == "Invalid token"));
}

#[test]
fn closed_port_yields_transport_errors() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = EanSearch::with_base_url(mock_server::TEST_TOKEN, &format!("http://{addr}"));

    assert!(client.barcode_lookup("5099750442227").is_none());
    assert!(client.similar_product_search("x").is_none());
    assert_eq!(client.barcode_image("5099750442227"), "");
    assert!(client.try_isbn_lookup("1119578884").unwrap_err().is_transport());
}
