//! Integration tests for the crawl and detail engines
//!
//! These tests use wiremock to stand in for the classifieds site and
//! tempfile scratch directories for the CSV stores, exercising pagination
//! termination, resume idempotence, and partial-failure tolerance
//! end-to-end.

use arenda_harvest::config::Config;
use arenda_harvest::crawler::{build_http_client, DetailEngine, DistrictCrawler, StopReason};
use arenda_harvest::model::{CardRef, District, Furniture};
use arenda_harvest::pipeline::Pipeline;
use arenda_harvest::storage::{DetailStore, ListingStore};
use chrono::NaiveDate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test configuration pointed at a mock server, with delays collapsed to
/// near-zero so tests run fast.
fn test_config(base_url: &str, out_root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.search_path = "/list/".to_string();
    config.fetch.page_delay_ms = 1;
    config.fetch.min_delay_ms = 0;
    config.fetch.max_delay_ms = 1;
    config.fetch.timeout_secs = 5;
    config.fetch.max_pages = 10;
    config.output.listings_dir = out_root.join("listings").display().to_string();
    config.output.cleaned_dir = out_root.join("cleaned").display().to_string();
    config.output.details_dir = out_root.join("details").display().to_string();
    config.districts = vec![District {
        id: 25,
        name: "testville".to_string(),
    }];
    config
}

fn district() -> District {
    District {
        id: 25,
        name: "testville".to_string(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
}

/// A results page with one card per (card id, price) pair.
fn listing_page(cards: &[(&str, &str)]) -> String {
    let mut body = String::from(r#"<html><body><div data-testid="listing-grid">"#);
    for (card_id, price) in cards {
        body.push_str(&format!(
            r#"<div class="card">
                <a class="css-1tqlkj0" href="/d/obyavlenie/kvartira-ID{card_id}.html">
                    <h4>Квартира {card_id}</h4>
                </a>
                <p data-testid="ad-price">{price}</p>
                <p data-testid="location-date">Ташкент, Тестовый район - Сегодня в 10:00</p>
            </div>"#
        ));
    }
    body.push_str("</div></body></html>");
    body
}

fn empty_listing_page() -> String {
    r#"<html><body><div data-testid="listing-grid"></div></body></html>"#.to_string()
}

fn detail_page(rooms: &str, area: &str) -> String {
    format!(
        r#"<html><body>
        <div data-testid="ad-parameters-container">
            <p>Количество комнат: {rooms}</p>
            <p>Общая площадь: {area} м²</p>
            <p>Меблирована: Да</p>
            <p>Ремонт: Евроремонт</p>
        </div>
        <span data-testid="ad-posted-at">21 ноября 2024 г.</span>
        </body></html>"#
    )
}

async fn mount_listing_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_empty_page_terminates_pagination() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());

    mount_listing_page(
        &server,
        "1",
        listing_page(&[("AAA1", "1 200 сум"), ("BBB2", "900 у.е.")]),
    )
    .await;
    mount_listing_page(&server, "2", empty_listing_page()).await;

    let client = build_http_client(&config.site.user_agent, config.fetch.timeout()).unwrap();
    let store = ListingStore::new(&config.output.listings_dir).unwrap();
    let crawler = DistrictCrawler::new(&client, &config, &store);

    let stats = crawler.run(&district(), today()).await.unwrap();
    assert_eq!(stats.stop_reason, StopReason::EmptyPage);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.records, 2);

    // Page 3 was never requested.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    // Prior pages' records survive the termination.
    let saved = ListingStore::load(&stats.output_path).unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].card_id, "AAA1");
    assert_eq!(saved[0].price_value, Some(1200.0));
    assert_eq!(saved[0].price_currency, Some("сум".to_string()));
    assert_eq!(saved[0].posted_date, Some(today()));
    assert_eq!(saved[0].district_id, 25);
}

#[tokio::test]
async fn test_http_error_is_benign_end_of_results() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());

    mount_listing_page(&server, "1", listing_page(&[("AAA1", "1 200 сум")])).await;
    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = build_http_client(&config.site.user_agent, config.fetch.timeout()).unwrap();
    let store = ListingStore::new(&config.output.listings_dir).unwrap();
    let crawler = DistrictCrawler::new(&client, &config, &store);

    let stats = crawler.run(&district(), today()).await.unwrap();
    assert_eq!(stats.stop_reason, StopReason::HttpStatus(404));
    assert_eq!(stats.records, 1);

    let saved = ListingStore::load(&stats.output_path).unwrap();
    assert_eq!(saved.len(), 1);
}

#[tokio::test]
async fn test_page_limit_stops_pagination() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let mut config = test_config(&server.uri(), out.path());
    config.fetch.max_pages = 2;

    mount_listing_page(&server, "1", listing_page(&[("AAA1", "1 200 сум")])).await;
    mount_listing_page(&server, "2", listing_page(&[("BBB2", "900 у.е.")])).await;

    let client = build_http_client(&config.site.user_agent, config.fetch.timeout()).unwrap();
    let store = ListingStore::new(&config.output.listings_dir).unwrap();
    let crawler = DistrictCrawler::new(&client, &config, &store);

    let stats = crawler.run(&district(), today()).await.unwrap();
    assert_eq!(stats.stop_reason, StopReason::PageLimit);
    assert_eq!(stats.records, 2);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_cards_without_url_or_id_are_dropped() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());

    // One valid card, one anchor without href, one href without an ID marker.
    let body = String::from(
        r#"<html><body><div data-testid="listing-grid">
        <div><a class="css-1tqlkj0" href="/d/obyavlenie/x-IDAAA1.html"><h4>Ok</h4></a></div>
        <div><a class="css-1tqlkj0"><h4>No href</h4></a></div>
        <div><a class="css-1tqlkj0" href="/d/obyavlenie/bare.html"><h4>No marker</h4></a></div>
        </div></body></html>"#,
    );
    mount_listing_page(&server, "1", body).await;
    mount_listing_page(&server, "2", empty_listing_page()).await;

    let client = build_http_client(&config.site.user_agent, config.fetch.timeout()).unwrap();
    let store = ListingStore::new(&config.output.listings_dir).unwrap();
    let crawler = DistrictCrawler::new(&client, &config, &store);

    let stats = crawler.run(&district(), today()).await.unwrap();
    assert_eq!(stats.records, 1);

    let saved = ListingStore::load(&stats.output_path).unwrap();
    assert_eq!(saved[0].card_id, "AAA1");
}

#[tokio::test]
async fn test_detail_run_then_resume_is_idempotent() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());

    for card_id in ["AAA1", "BBB2"] {
        Mock::given(method("GET"))
            .and(path(format!("/d/card/{}", card_id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("3", "54.5")))
            .mount(&server)
            .await;
    }

    let inputs: Vec<CardRef> = ["AAA1", "BBB2"]
        .iter()
        .map(|card_id| CardRef {
            card_id: card_id.to_string(),
            url: format!("{}/d/card/{}", server.uri(), card_id),
        })
        .collect();

    let client = build_http_client(&config.site.user_agent, config.fetch.timeout()).unwrap();
    let store = DetailStore::new(&config.output.details_dir).unwrap();
    let engine = DetailEngine::new(&client, &config, &store);

    let first = engine.run("testville", &inputs, today()).await.unwrap();
    assert_eq!(first.total, 2);
    assert_eq!(first.succeeded, 2);
    assert_eq!(first.skipped, 0);
    assert_eq!(first.failed, 0);
    assert_eq!(first.final_count, 2);

    let saved = store.load_existing("testville").unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].number_rooms, Some("3".to_string()));
    assert_eq!(saved[0].area, Some(54.5));
    assert_eq!(saved[0].furniture, Some(Furniture::Yes));
    assert_eq!(saved[0].date, NaiveDate::from_ymd_opt(2024, 11, 21));

    // Second run with unchanged input: everything is already done.
    let second = engine.run("testville", &inputs, today()).await.unwrap();
    assert_eq!(second.skipped, second.total);
    assert_eq!(second.succeeded, 0);
    assert_eq!(second.failed, 0);
    assert_eq!(second.final_count, 2);
}

#[tokio::test]
async fn test_detail_404_counts_failed_and_preserves_output() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());

    Mock::given(method("GET"))
        .and(path("/d/card/AAA1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("2", "40")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/card/GONE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let inputs = vec![
        CardRef {
            card_id: "AAA1".to_string(),
            url: format!("{}/d/card/AAA1", server.uri()),
        },
        CardRef {
            card_id: "GONE".to_string(),
            url: format!("{}/d/card/GONE", server.uri()),
        },
    ];

    let client = build_http_client(&config.site.user_agent, config.fetch.timeout()).unwrap();
    let store = DetailStore::new(&config.output.details_dir).unwrap();
    let engine = DetailEngine::new(&client, &config, &store);

    let first = engine.run("testville", &inputs, today()).await.unwrap();
    assert_eq!(first.succeeded, 1);
    assert_eq!(first.failed, 1);
    assert_eq!(first.final_count, 1);

    // The failed id is absent from the output and retried on the next run;
    // the done record is untouched.
    let second = engine.run("testville", &inputs, today()).await.unwrap();
    assert_eq!(second.skipped, 1);
    assert_eq!(second.failed, 1);
    assert_eq!(second.final_count, 1);

    let saved = store.load_existing("testville").unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].card_id, "AAA1");
}

#[tokio::test]
async fn test_full_pipeline_end_to_end() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());

    mount_listing_page(
        &server,
        "1",
        listing_page(&[("AAA1", "1 200 сум"), ("BBB2", "900 у.е.")]),
    )
    .await;
    mount_listing_page(&server, "2", empty_listing_page()).await;

    for card_id in ["AAA1", "BBB2"] {
        Mock::given(method("GET"))
            .and(path(format!("/d/obyavlenie/kvartira-ID{}.html", card_id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("3", "54.5")))
            .mount(&server)
            .await;
    }

    let pipeline = Pipeline::new(config.clone(), None);
    let report = pipeline.run_full().await.unwrap();
    assert!(report.success());

    let scrape = report.scrape.unwrap();
    assert_eq!(scrape.scraped, 1);
    assert_eq!(scrape.records, 2);

    let details = report.details.unwrap();
    assert_eq!(details.processed, 1);
    assert_eq!(details.stats[0].1.succeeded, 2);

    let store = DetailStore::new(&config.output.details_dir).unwrap();
    let saved = store.load_existing("testville").unwrap();
    assert_eq!(saved.len(), 2);
}

#[tokio::test]
async fn test_details_with_empty_input_dir_is_an_error() {
    let out = tempfile::tempdir().unwrap();
    let config = test_config("http://127.0.0.1:9", out.path());

    let pipeline = Pipeline::new(config, None);
    let result = pipeline.run_details().await;
    assert!(result.is_err());
}
