//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a result page, detail pages and images,
//! and drive the full harvest cycle end-to-end through the snapshot backend.

use lot_harvester::config::{parse_config, Config};
use lot_harvester::images::ImageFetcher;
use lot_harvester::output::{CatalogWriter, HugoWriter, JsonWriter};
use lot_harvester::{harvest, CrawlState, HarvestError, ListingRecord};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"
    <html><body>
      <div itemtype="http://schema.org/Product">
        <a itemprop="url" href="/moskva/avtomobili/bmw_x5_1"><h3 itemprop="name">BMW X5 3.0 AT, 2019</h3></a>
        <meta itemprop="price" content="5200000">
      </div>
      <div itemtype="http://schema.org/Product">
        <a itemprop="url" href="/moskva/avtomobili/lada_2"></a>
        <span data-marker="item-price">650 000 ₽</span>
      </div>
      <div itemtype="http://schema.org/Product">
        <a itemprop="url" href="/moskva/avtomobili/kia_rio_3"><h3 itemprop="name">Kia Rio 1.6 MT, 2012, 180 000 км</h3></a>
        <span data-marker="item-price">650 000 ₽</span>
      </div>
    </body></html>
"#;

const BMW_DETAIL: &str = r#"
    <html><body>
      <div data-marker="image-preview/item"><img src="/img/x5-front.jpg?cqp=2.5"></div>
      <div data-marker="image-preview/item"><img src="/img/x5-missing.jpg?cqp=2.5"></div>
      <div data-marker="image-preview/item"><img src="/img/x5-back.jpg?cqp=2.5"></div>
      <div data-marker="image-preview/item"><img src="/static/no-photo.svg"></div>
      <div data-marker="item-view/item-description"><p>Один владелец, полный комплект ключей.</p></div>
      <ul data-marker="item-view/item-params">
        <li>Год выпуска: 2019</li>
        <li>Пробег: 64 000 км</li>
        <li>Привод: полный</li>
        <li>Тип кузова: внедорожник</li>
        <li>Цвет: чёрный</li>
        <li>VIN: WBAKS410X00K12345</li>
      </ul>
    </body></html>
"#;

/// Serves the result page, the BMW detail page and two of its three images.
/// The Kia detail page and the second BMW image are missing.
async fn mount_marketplace(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/moskva/avtomobili"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/moskva/avtomobili/bmw_x5_1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BMW_DETAIL))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/moskva/avtomobili/kia_rio_3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    for image in ["/img/x5-front.jpg", "/img/x5-back.jpg"] {
        Mock::given(method("GET"))
            .and(path(image))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xD9]))
            .mount(server)
            .await;
    }
}

/// Creates a snapshot-backend configuration pointing at the mock server
fn create_test_config(base_url: &str, out: &TempDir, enrich: bool) -> Config {
    let toml = format!(
        r#"
        [crawler]
        listing-url = "{base}/moskva/avtomobili"
        enrich = {enrich}
        initial-settle-ms = 0
        scroll-settle-ms = 0
        detail-settle-ms = 0
        max-scroll-rounds = 3

        [browser]
        backend = "snapshot"

        [images]
        directory = "{dir}/images"
        timeout-secs = 5

        [output]
        content-dir = "{dir}/content"
        json-path = "{dir}/cars.json"
        "#,
        base = base_url,
        enrich = enrich,
        dir = out.path().display(),
    );
    parse_config(&toml).expect("test config should be valid")
}

fn no_shutdown() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

#[tokio::test]
async fn test_harvest_skips_item_without_title() {
    let server = MockServer::start().await;
    mount_marketplace(&server).await;
    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &out, false);

    let report = harvest(&config, no_shutdown()).await.unwrap();

    assert_eq!(report.state, CrawlState::Done);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.enriched, 0);

    let brands: Vec<&str> = report.records.iter().map(|r| r.brand.as_str()).collect();
    assert_eq!(brands, vec!["BMW", "Kia"]);
    assert_eq!(
        report.records[0].source_url,
        format!("{}/moskva/avtomobili/bmw_x5_1", server.uri())
    );
}

#[tokio::test]
async fn test_harvest_enriches_from_detail_pages() {
    let server = MockServer::start().await;
    mount_marketplace(&server).await;
    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &out, true);

    let report = harvest(&config, no_shutdown()).await.unwrap();

    assert_eq!(report.state, CrawlState::Done);
    assert_eq!(report.records.len(), 2);
    // Kia's detail page answers 404
    assert_eq!(report.enriched, 1);

    let bmw = &report.records[0];
    assert_eq!(bmw.year, 2019);
    assert_eq!(bmw.mileage, Some(64_000));
    assert_eq!(bmw.drive_type, "полный");
    assert_eq!(bmw.body_type, "внедорожник");
    assert_eq!(bmw.color, "чёрный");
    assert_eq!(bmw.vin.as_deref(), Some("WBAKS410X00K12345"));
    assert!(bmw.description.contains("Один владелец"));
    assert_eq!(
        bmw.images,
        vec![
            format!("{}/img/x5-front.jpg?size=1200x900", server.uri()),
            format!("{}/img/x5-missing.jpg?size=1200x900", server.uri()),
            format!("{}/img/x5-back.jpg?size=1200x900", server.uri()),
        ]
    );

    let kia = &report.records[1];
    assert_eq!(kia.mileage, Some(180_000));
    assert_eq!(kia.color, "Не указан");
    assert!(kia.images.is_empty());
}

#[tokio::test]
async fn test_full_harvest_writes_catalog() {
    let server = MockServer::start().await;
    mount_marketplace(&server).await;
    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &out, true);

    let mut report = harvest(&config, no_shutdown()).await.unwrap();

    let fetcher = ImageFetcher::new(
        &config.images.directory,
        &config.user_agent.value,
        Duration::from_secs(config.images.timeout_secs),
    )
    .unwrap();
    let mut downloaded = 0;
    for record in &mut report.records {
        downloaded += fetcher.attach_images(record).await;
    }

    // The missing second image leaves a gap in the numbering
    assert_eq!(downloaded, 2);
    assert_eq!(
        report.records[0].images,
        vec!["bmw-x5-2019.jpg", "bmw-x5-2019-2.jpg"]
    );
    let images_dir = out.path().join("images");
    assert!(images_dir.join("bmw-x5-2019.jpg").exists());
    assert!(!images_dir.join("bmw-x5-2019-1.jpg").exists());
    assert!(images_dir.join("bmw-x5-2019-2.jpg").exists());

    let hugo = HugoWriter::new(&config.output.content_dir, config.output.overwrite);
    let summary = hugo.write(&report.records).unwrap();
    assert_eq!(summary.written, 2);

    let page =
        std::fs::read_to_string(out.path().join("content").join("bmw-x5-2019.md")).unwrap();
    assert!(page.contains("image: \"images/cars/bmw-x5-2019.jpg\""));
    assert!(page.contains("vin: \"WBAKS410X00K12345\""));
    assert!(page.contains("| **Цена** | 5 200 000 ₽ |"));

    // A second run leaves existing pages alone
    let again = hugo.write(&report.records).unwrap();
    assert_eq!(again.written, 0);
    assert_eq!(again.skipped, 2);

    JsonWriter::new(&config.output.json_path)
        .write(&report.records)
        .unwrap();
    let json = std::fs::read_to_string(&config.output.json_path).unwrap();
    let saved: Vec<ListingRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(saved, report.records);
}

#[tokio::test]
async fn test_harvest_interrupted_returns_partial_report() {
    let server = MockServer::start().await;
    mount_marketplace(&server).await;
    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &out, true);

    let report = harvest(&config, Arc::new(AtomicBool::new(true)))
        .await
        .unwrap();

    assert_eq!(report.state, CrawlState::Aborted);
    assert!(!report.is_complete());
    assert!(report.records.is_empty());
}

#[tokio::test]
async fn test_harvest_unreachable_listing_page() {
    let server = MockServer::start().await;
    // Nothing mounted: every request answers 404
    let out = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &out, false);

    let result = harvest(&config, no_shutdown()).await;
    assert!(matches!(result, Err(HarvestError::Navigation { .. })));
}
