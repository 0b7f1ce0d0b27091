//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog and tempfile for the
//! destination, then run the full crawl cycle end-to-end.

use ebook_mirror::config::Config;
use ebook_mirror::crawler::{run_crawl, Coordinator};
use ebook_mirror::{ConfigError, MirrorError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for a catalog served at `base_url`
fn create_test_config(base_url: &str, destination: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.asset_hosts = vec!["127.0.0.1".to_string()];
    config.crawler.max_concurrent_listings = 2;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.destination = Some(destination.to_path_buf());
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html")
}

/// An overview page linking to `slugs`, with an optional next-page link
fn overview_page(current: u32, slugs: &[&str], next: Option<&str>) -> String {
    let entries: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<article><h2 class="entry-title"><a href="/{slug}/">{slug}</a></h2></article>"#
            )
        })
        .collect();
    let next_link = next
        .map(|href| format!(r#"<a href="{href}">{}</a>"#, current + 1))
        .unwrap_or_default();

    format!(
        r#"<html><body>{entries}
           <div class="pagination"><span class="current">{current}</span>{next_link}</div>
           </body></html>"#
    )
}

/// A detail page offering one PDF named after the slug
fn detail_page(base_url: &str, slug: &str) -> String {
    format!(
        r#"<html><body>
           <article class="post"><div class="entry-content"><p>About {slug}.</p></div></article>
           <span class="download-links"><a href="{base_url}/files/{slug}.pdf">Download PDF</a></span>
           </body></html>"#
    )
}

/// Mounts a detail page and its file; both must be requested `times` times
async fn mount_listing(server: &MockServer, slug: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/", slug)))
        .respond_with(html(detail_page(&server.uri(), slug)))
        .expect(times)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/files/{}.pdf", slug)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("%PDF {}", slug)))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_overview(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn listing_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(slug)
}

#[tokio::test]
async fn test_full_crawl_follows_pagination() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_overview(
        &mock_server,
        "/",
        overview_page(1, &["alpha", "beta"], Some("/page/2/")),
    )
    .await;
    mount_overview(&mock_server, "/page/2/", overview_page(2, &["gamma"], None)).await;

    for slug in ["alpha", "beta", "gamma"] {
        mount_listing(&mock_server, slug, 1).await;
    }

    let dest = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&base_url, dest.path());

    let stats = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(stats.overview_pages, 2);
    assert_eq!(stats.listings_found, 3);
    assert_eq!(stats.listings_downloaded, 3);
    assert_eq!(stats.files_downloaded, 3);
    assert_eq!(stats.listings_failed, 0);

    for slug in ["alpha", "beta", "gamma"] {
        let dir = listing_dir(dest.path(), slug);
        let description =
            std::fs::read_to_string(dir.join("description.txt")).expect("Missing description");
        assert_eq!(description, format!("About {}.", slug));

        let file = std::fs::read_to_string(dir.join(format!("{}.pdf", slug)))
            .expect("Missing downloaded file");
        assert_eq!(file, format!("%PDF {}", slug));
        assert!(!dir.join(format!("{}.pdf.part", slug)).exists());
    }
}

#[tokio::test]
async fn test_second_run_skips_mirrored_listings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_overview(&mock_server, "/", overview_page(1, &["alpha", "beta"], None)).await;

    // Detail pages and files are fetched by the first run only
    mount_listing(&mock_server, "alpha", 1).await;
    mount_listing(&mock_server, "beta", 1).await;

    let dest = TempDir::new().expect("Failed to create temp dir");

    let first = run_crawl(create_test_config(&base_url, dest.path()))
        .await
        .expect("First crawl failed");
    assert_eq!(first.listings_downloaded, 2);

    let second = run_crawl(create_test_config(&base_url, dest.path()))
        .await
        .expect("Second crawl failed");
    assert_eq!(second.listings_downloaded, 0);
    assert_eq!(second.listings_skipped, 2);
    assert_eq!(second.files_downloaded, 0);
}

#[tokio::test]
async fn test_failing_listing_does_not_affect_others() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_overview(
        &mock_server,
        "/",
        overview_page(1, &["alpha", "broken", "gamma"], None),
    )
    .await;
    mount_listing(&mock_server, "alpha", 1).await;
    mount_listing(&mock_server, "gamma", 1).await;

    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dest = TempDir::new().expect("Failed to create temp dir");
    let stats = run_crawl(create_test_config(&base_url, dest.path()))
        .await
        .expect("A single failing listing must not abort the crawl");

    assert_eq!(stats.listings_downloaded, 2);
    assert_eq!(stats.listings_failed, 1);
    assert_eq!(stats.failed_urls, vec![format!("{}/broken/", base_url)]);

    assert!(listing_dir(dest.path(), "alpha").join("alpha.pdf").exists());
    assert!(listing_dir(dest.path(), "gamma").join("gamma.pdf").exists());
    // Released so the next run retries it
    assert!(!listing_dir(dest.path(), "broken").exists());
}

#[tokio::test]
async fn test_failed_download_is_retried_on_next_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_overview(&mock_server, "/", overview_page(1, &["flaky"], None)).await;
    Mock::given(method("GET"))
        .and(path("/flaky/"))
        .respond_with(html(detail_page(&base_url, "flaky")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/flaky.pdf"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/flaky.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF flaky".to_vec()))
        .mount(&mock_server)
        .await;

    let dest = TempDir::new().expect("Failed to create temp dir");

    let first = run_crawl(create_test_config(&base_url, dest.path()))
        .await
        .expect("Crawl failed");
    assert_eq!(first.listings_failed, 1);
    assert!(!listing_dir(dest.path(), "flaky").exists());

    let second = run_crawl(create_test_config(&base_url, dest.path()))
        .await
        .expect("Crawl failed");
    assert_eq!(second.listings_downloaded, 1);
    assert!(listing_dir(dest.path(), "flaky").join("flaky.pdf").exists());
}

#[tokio::test]
async fn test_unreachable_overview_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dest = TempDir::new().expect("Failed to create temp dir");
    let result = run_crawl(create_test_config(&base_url, dest.path())).await;

    match result {
        Err(MirrorError::OverviewUnavailable { url }) => assert_eq!(url, format!("{}/", base_url)),
        other => panic!("Expected OverviewUnavailable, got {:?}", other.map(|s| s.overview_pages)),
    }
}

#[tokio::test]
async fn test_later_overview_failure_keeps_earlier_listings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_overview(&mock_server, "/", overview_page(1, &["alpha"], Some("/page/2/"))).await;
    mount_listing(&mock_server, "alpha", 1).await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let dest = TempDir::new().expect("Failed to create temp dir");
    let result = run_crawl(create_test_config(&base_url, dest.path())).await;

    assert!(matches!(result, Err(MirrorError::OverviewUnavailable { .. })));
    assert!(listing_dir(dest.path(), "alpha").join("alpha.pdf").exists());
}

#[tokio::test]
async fn test_missing_destination_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0) // Should never be called
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.site.base_url = base_url;

    let result = run_crawl(config).await;
    assert!(matches!(
        result,
        Err(MirrorError::Config(ConfigError::MissingDestination))
    ));
}

#[tokio::test]
async fn test_listing_without_files_keeps_description() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_overview(&mock_server, "/", overview_page(1, &["bare"], None)).await;
    Mock::given(method("GET"))
        .and(path("/bare/"))
        .respond_with(html(
            r#"<article class="post"><div class="entry-content">No files, only words.</div></article>
               <span class="download-links"><a href="http://elsewhere.test/x.pdf">Mirror</a></span>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let dest = TempDir::new().expect("Failed to create temp dir");
    let stats = run_crawl(create_test_config(&base_url, dest.path()))
        .await
        .expect("Crawl failed");

    assert_eq!(stats.listings_downloaded, 1);
    assert_eq!(stats.files_downloaded, 0);

    let dir = listing_dir(dest.path(), "bare");
    assert_eq!(
        std::fs::read_to_string(dir.join("description.txt")).expect("Missing description"),
        "No files, only words."
    );
    let entries = std::fs::read_dir(&dir).expect("Missing listing dir").count();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn test_pagination_cycle_stops_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_overview(&mock_server, "/", overview_page(1, &["alpha"], Some("/page/2/"))).await;
    // Page 2 links back to the first page
    mount_overview(&mock_server, "/page/2/", overview_page(2, &["beta"], Some("/"))).await;
    mount_listing(&mock_server, "alpha", 1).await;
    mount_listing(&mock_server, "beta", 1).await;

    let dest = TempDir::new().expect("Failed to create temp dir");
    let stats = run_crawl(create_test_config(&base_url, dest.path()))
        .await
        .expect("Crawl failed");

    assert_eq!(stats.overview_pages, 2);
    assert_eq!(stats.listings_downloaded, 2);
}

#[tokio::test]
async fn test_max_pages_limits_overview_walk() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_overview(&mock_server, "/", overview_page(1, &["alpha"], Some("/page/2/"))).await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(html(overview_page(2, &["beta"], None)))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_listing(&mock_server, "alpha", 1).await;

    let dest = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&base_url, dest.path());
    config.crawler.max_pages = 1;

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.overview_pages, 1);
    assert_eq!(stats.listings_downloaded, 1);
    assert!(!listing_dir(dest.path(), "beta").exists());
}
