use std::process::ExitCode;

use eansearch_core::{EanSearch, Language, ProductResult, DEFAULT_BASE_URL};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn print_list(list: Option<Vec<ProductResult>>) {
    match list {
        Some(products) if products.is_empty() => println!("no matches"),
        Some(products) => {
            for p in products {
                println!("{p}");
            }
        }
        None => println!("search failed"),
    }
}

fn main() -> ExitCode {
    let env_log = match EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
    {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("invalid RUST_LOG: {e}");
            return ExitCode::FAILURE;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .compact()
        .with_file(false)
        .with_env_filter(env_log);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber.finish()) {
        eprintln!("failed to install log subscriber: {e}");
        return ExitCode::FAILURE;
    }

    let Ok(token) = std::env::var("EAN_SEARCH_API_TOKEN") else {
        error!("EAN_SEARCH_API_TOKEN is not set");
        return ExitCode::FAILURE;
    };
    let base_url = std::env::var("EAN_SEARCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    info!(base_url = %base_url, "using EAN search service");
    let eansearch = EanSearch::with_base_url(token, &base_url);

    println!("*** barcode lookup");
    let ean = "5099750442227";
    match eansearch.barcode_lookup(ean) {
        Some(p) => println!("{p}"),
        None => println!("{ean} not found"),
    }

    println!("*** ISBN lookup");
    let isbn = "1119578884";
    match eansearch.isbn_lookup(isbn) {
        Some(book) => println!("{isbn} is book title {}", book.product().name),
        None => println!("{isbn} not found"),
    }

    println!("*** verify checksum");
    for ean in ["5099750442227", "5099750442228"] {
        let validity = if eansearch.verify_checksum(ean) { "" } else { "not " };
        println!("{ean} is {validity}valid");
    }

    println!("*** product search: Bananaboat");
    print_list(eansearch.product_search("Bananaboat"));

    println!("*** similar product search: iPhone Max whatever");
    print_list(eansearch.similar_product_search_with("iPhone Max whatever", Language::English, 1));

    println!("*** category search: Bananaboat in Music");
    print_list(eansearch.category_search(45, "Bananaboat"));

    println!("*** barcode prefix search: 4007249146");
    print_list(eansearch.barcode_prefix_search("4007249146"));

    println!("*** issuing country");
    let ean = "5099750442227";
    println!("{ean} was issued in {}", eansearch.issuing_country_lookup(ean));

    println!("*** barcode image");
    let image = eansearch.barcode_image(ean);
    if image.is_empty() {
        println!("no image for {ean}");
    } else {
        println!("{ean} image: {} bytes of encoded data", image.len());
    }

    ExitCode::SUCCESS
}
