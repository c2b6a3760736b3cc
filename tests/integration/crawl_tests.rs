//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog and run the full
//! discover, walk, scrape and write cycle over real HTTP.

use book_scout::config::{parse_config, Config};
use book_scout::crawler::{Coordinator, WalkStop};
use book_scout::output::{CsvDatasetWriter, DatasetWriter, ImageDownloader};
use book_scout::records::FailureKind;
use book_scout::ScoutError;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POETRY: &str = "/catalogue/category/books/poetry_23/index.html";
const POETRY_2: &str = "/catalogue/category/books/poetry_23/page-2.html";
const POETRY_3: &str = "/catalogue/category/books/poetry_23/page-3.html";
const TRAVEL: &str = "/catalogue/category/books/travel_2/index.html";
const TRAVEL_2: &str = "/catalogue/category/books/travel_2/page-2.html";

fn test_config(base_url: &str, data_dir: &Path, extra: &str) -> Config {
    parse_config(&format!(
        r#"{extra}
[site]
base-url = "{base_url}/"

[crawler]
max-concurrent-items = 2
max-retries = 1
retry-delay = 10
timeout = 5

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"

[output]
data-dir = "{data_dir}"
summary-path = "{data_dir}/summary.md"
"#,
        data_dir = data_dir.display()
    ))
    .expect("test config should parse")
}

fn landing_page() -> String {
    r#"<html><body><div class="side_categories"><ul class="nav nav-list"><li>
        <a href="catalogue/category/books_1/index.html">Books</a>
        <ul>
            <li><a href="catalogue/category/books/poetry_23/index.html">
                Poetry
            </a></li>
            <li><a href="catalogue/category/books/travel_2/index.html">
                Travel
            </a></li>
        </ul>
    </li></ul></div></body></html>"#
        .to_string()
}

fn listing_page(slugs: &[&str], next: Option<&str>) -> String {
    let articles: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li><article class="product_pod">
                    <h3><a href="../../../{slug}/index.html" title="{slug}">{slug}</a></h3>
                </article></li>"#
            )
        })
        .collect();
    let pager = next
        .map(|href| {
            format!(r#"<ul class="pager"><li class="next"><a href="{href}">next</a></li></ul>"#)
        })
        .unwrap_or_default();

    format!(r#"<html><body><section><ol class="row">{articles}</ol>{pager}</section></body></html>"#)
}

fn detail_page(upc: &str, title: &str, rating: Option<&str>) -> String {
    let rating = rating
        .map(|word| format!(r#"<p class="star-rating {word}"><i class="icon-star"></i></p>"#))
        .unwrap_or_default();

    format!(
        r#"<html><body>
        <ul class="breadcrumb">
            <li><a href="../../index.html">Home</a></li>
            <li><a href="../category/books_1/index.html">Books</a></li>
            <li><a href="../category/books/poetry_23/index.html">Poetry</a></li>
            <li class="active">{title}</li>
        </ul>
        <div class="item active"><img src="../../media/cache/{upc}.jpg" alt="{title}"></div>
        <div class="product_main"><h1>{title}</h1>{rating}</div>
        <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
        <p>A book called {title}.</p>
        <table class="table table-striped">
            <tr><th>UPC</th><td>{upc}</td></tr>
            <tr><th>Price (excl. tax)</th><td>£10.00</td></tr>
            <tr><th>Price (incl. tax)</th><td>£12.50</td></tr>
            <tr><th>Availability</th><td>In stock (7 available)</td></tr>
        </table>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Poetry spans three listing pages, reached through a same-directory link
/// and then a root-relative one. Of its five items, one has no rating, one is
/// missing and one (`flaky_4`) is left for the caller to mount.
async fn mount_catalog(server: &MockServer) {
    mount_page(server, "/", landing_page()).await;

    mount_page(
        server,
        POETRY,
        listing_page(&["alpha_1", "no-rating_2"], Some("page-2.html")),
    )
    .await;
    mount_page(
        server,
        POETRY_2,
        listing_page(
            &["gone_3", "flaky_4"],
            Some("/catalogue/category/books/poetry_23/page-3.html"),
        ),
    )
    .await;
    mount_page(server, POETRY_3, listing_page(&["omega_5"], None)).await;

    mount_page(server, TRAVEL, listing_page(&["road_6"], Some("page-2.html"))).await;
    mount_page(server, TRAVEL_2, listing_page(&["sea_7"], Some("index.html"))).await;

    let items = [
        ("alpha_1", "a1", "Alpha", Some("Five")),
        ("no-rating_2", "b2", "Unrated", None),
        ("omega_5", "c5", "Omega", Some("Two")),
        ("road_6", "d6", "Road", Some("One")),
        ("sea_7", "e7", "Sea", Some("Four")),
    ];
    for (slug, upc, title, rating) in items {
        let item_path = format!("/catalogue/{}/index.html", slug);
        mount_page(server, &item_path, detail_page(upc, title, rating)).await;
    }

    for upc in ["a1", "c5", "d6", "e7"] {
        Mock::given(method("GET"))
            .and(path(format!("/media/cache/{}.jpg", upc)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
            .mount(server)
            .await;
    }
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("CSV file should exist");
    let header = reader
        .headers()
        .expect("CSV should have a header")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("valid row").iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[tokio::test]
async fn test_full_crawl_writes_category_datasets() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;
    // One attempt plus one retry
    Mock::given(method("GET"))
        .and(path("/catalogue/flaky_4/index.html"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;
    let base_url = mock_server.uri();

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&base_url, data_dir.path(), "");

    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let index = coordinator
        .discover_categories()
        .await
        .expect("Failed to discover categories");
    assert_eq!(index.len(), 2);

    let mut writer = CsvDatasetWriter::new(data_dir.path())
        .with_images(ImageDownloader::new(coordinator.fetcher(), data_dir.path()));
    let report = coordinator.run(&index, &mut writer).await;

    // Poetry: three pages, five URLs, two records
    let poetry = &report.categories[0];
    assert_eq!(poetry.name, "Poetry");
    assert_eq!(poetry.pages_visited, 3);
    assert_eq!(poetry.urls_found, 5);
    assert_eq!(poetry.records, 2);
    assert_eq!(poetry.pagination, WalkStop::LastPage);

    let failures: Vec<(String, FailureKind)> = poetry
        .failures
        .iter()
        .map(|f| (f.url.clone(), f.kind))
        .collect();
    let item = |slug: &str| format!("{}/catalogue/{}/index.html", base_url, slug);
    assert_eq!(
        failures,
        vec![
            (item("no-rating_2"), FailureKind::Extraction),
            (item("gone_3"), FailureKind::Transport),
            (item("flaky_4"), FailureKind::Transport),
        ]
    );
    assert!(poetry.failures[0].reason.contains("review_rating"));

    let (header, rows) = read_rows(&writer.csv_path("Poetry"));
    assert_eq!(
        header,
        vec![
            "product_page_url",
            "universal_product_code",
            "title",
            "price_including_tax",
            "price_excluding_tax",
            "number_available",
            "product_description",
            "category",
            "review_rating",
            "image_url",
        ]
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], item("alpha_1"));
    assert_eq!(rows[0][1], "a1");
    assert_eq!(rows[0][2], "Alpha");
    assert_eq!(rows[0][3].parse::<f64>().unwrap(), 12.5);
    assert_eq!(rows[0][4].parse::<f64>().unwrap(), 10.0);
    assert_eq!(rows[0][5], "7");
    assert_eq!(rows[0][6], "A book called Alpha.");
    assert_eq!(rows[0][7], "Poetry");
    assert_eq!(rows[0][8], "5");
    assert_eq!(rows[0][9], format!("{}/media/cache/a1.jpg", base_url));
    assert_eq!(rows[1][1], "c5");
    assert_eq!(rows[1][8], "2");

    let image_dir = data_dir.path().join("images").join("poetry");
    assert!(image_dir.join("a1.jpg").exists());
    assert!(image_dir.join("c5.jpg").exists());

    assert!(data_dir.path().join("travel_books_data.csv").exists());
    assert_eq!(report.total_records(), 4);
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_pagination_cycle_keeps_collected_items() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&mock_server.uri(), data_dir.path(), r#"categories = ["travel"]"#);

    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let index = coordinator.discover_categories().await.unwrap();
    assert_eq!(index.len(), 1);

    let travel = coordinator
        .crawl_category(index.get("Travel").unwrap())
        .await;

    assert!(matches!(travel.pagination, WalkStop::Cycle { .. }));
    assert_eq!(travel.pages_visited, 2);
    assert_eq!(travel.records.len(), 2);
    assert!(travel.failures.is_empty());

    let mut writer = CsvDatasetWriter::new(data_dir.path());
    writer.write_category("Travel", &travel).await.unwrap();

    let (_, rows) = read_rows(&writer.csv_path("Travel"));
    let titles: Vec<&str> = rows.iter().map(|r| r[2].as_str()).collect();
    assert_eq!(titles, vec!["Road", "Sea"]);
}

#[tokio::test]
async fn test_landing_page_failure_stops_the_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&mock_server.uri(), data_dir.path(), "");

    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let result = coordinator.discover_categories().await;

    assert!(matches!(result, Err(ScoutError::Fetch(_))));
}
