//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full discovery cycle end-to-end.

use sitecap::capture::{CapturePipeline, ScreenshotCapturer};
use sitecap::config::{Config, ExpansionPolicy};
use sitecap::crawler::{crawl, Coordinator};
use sitecap::{ErrorKind, SitecapError};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.politeness_delay_ms = 0;
    config.http.request_timeout_secs = 5;
    config.sitemap.enabled = false;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("location", location)
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/xml")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn discover(config: &Config, seed: &str) -> Vec<String> {
    crawl(config, seed)
        .await
        .expect("Crawl failed")
        .report
        .links
}

#[tokio::test]
async fn test_home_page_links_are_filtered() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r##"<a href="/about">About</a>
            <a href="/logo.png">Logo</a>
            <a href="#contact">Contact</a>
            <a href="https://other.com">Elsewhere</a>"##,
    )
    .await;
    mount_page(&server, "/about", "<p>About us</p>").await;

    let links = discover(&create_test_config(), &format!("{}/", base)).await;

    assert_eq!(links, vec![format!("{}/about", base)]);
}

#[tokio::test]
async fn test_duplicate_anchors_are_discovered_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="/team">Team</a><a href="{}/team">Team again</a>"#,
            base
        ),
    )
    .await;
    mount_page(&server, "/team", "").await;

    let links = discover(&create_test_config(), &base).await;

    assert_eq!(links, vec![format!("{}/team", base)]);
}

#[tokio::test]
async fn test_redirects_to_home_terminate() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    for route in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(redirect_to("/"))
            .mount(&server)
            .await;
    }

    let mut config = create_test_config();
    config.crawler.expansion = ExpansionPolicy::FixedPoint;

    let output = crawl(&config, &format!("{}/", base))
        .await
        .expect("Crawl failed");

    assert_eq!(
        output.report.links,
        vec![
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base),
        ]
    );
    assert_eq!(output.report.stats.pages_skipped, 3);
}

#[tokio::test]
async fn test_home_page_reached_by_redirect_is_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/start", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    for route in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(redirect_to(&format!("{}/", base)))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/c">C</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let links = discover(&create_test_config(), &format!("{}/start", base)).await;

    assert_eq!(
        links,
        vec![
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base),
        ]
    );
}

#[tokio::test]
async fn test_redirect_target_replaces_duplicate() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/old">Old</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&server)
        .await;

    let links = discover(&create_test_config(), &base).await;

    assert_eq!(links, vec![format!("{}/new", base), format!("{}/old", base)]);
}

#[tokio::test]
async fn test_off_origin_redirect_is_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/out">Out</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/out"))
        .respond_with(redirect_to("https://other.example/landing"))
        .mount(&server)
        .await;

    let output = crawl(&create_test_config(), &base)
        .await
        .expect("Crawl failed");

    assert_eq!(output.report.links, vec![format!("{}/out", base)]);
    assert_eq!(output.report.stats.pages_skipped, 1);
}

#[tokio::test]
async fn test_single_generation_is_the_default() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/b">B</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(r#"<a href="/c">C</a>"#))
        .expect(0)
        .mount(&server)
        .await;

    let links = discover(&create_test_config(), &base).await;

    assert_eq!(links, vec![format!("{}/a", base), format!("{}/b", base)]);
}

#[tokio::test]
async fn test_fixed_point_expansion() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/b">B</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/c">C</a><a href="/">Home</a>"#).await;
    mount_page(&server, "/c", r#"<a href="/a">A</a>"#).await;

    let mut config = create_test_config();
    config.crawler.expansion = ExpansionPolicy::FixedPoint;

    let links = discover(&config, &base).await;

    assert_eq!(
        links,
        vec![
            format!("{}/", base),
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base),
        ]
    );
}

#[tokio::test]
async fn test_failing_pages_do_not_abort_discovery() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/broken">Broken</a><a href="/ok">Ok</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", r#"<a href="/deeper">Deeper</a>"#).await;

    let output = crawl(&create_test_config(), &base)
        .await
        .expect("Crawl failed");

    assert_eq!(
        output.report.links,
        vec![
            format!("{}/broken", base),
            format!("{}/deeper", base),
            format!("{}/ok", base),
        ]
    );
    assert_eq!(output.report.stats.pages_failed, 1);
    assert_eq!(output.report.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_link_cap_is_respected_and_sitemap_is_uncapped() {
    let server = MockServer::start().await;
    let base = server.uri();

    let anchors: String = (0..150)
        .map(|i| format!(r#"<a href="/page{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &anchors).await;

    // Expansion never starts once the cap is reached
    Mock::given(method("GET"))
        .and(path_regex(r"^/page\d+$"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&server)
        .await;

    let entries: String = (0..5)
        .map(|i| format!("<url><loc>{}/extra{}</loc></url>", base, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(format!("<urlset>{}</urlset>", entries)))
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.sitemap.enabled = true;

    let output = crawl(&config, &base).await.expect("Crawl failed");

    assert_eq!(output.report.stats.html_links, 100);
    assert_eq!(output.report.stats.sitemap_links, 5);
    assert_eq!(output.report.links.len(), 105);
    assert!(output.report.links.contains(&format!("{}/extra4", base)));
}

#[tokio::test]
async fn test_sitemap_index_is_flattened() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "").await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <sitemap><loc>{0}/sitemap-a.xml</loc></sitemap>
              <sitemap><loc>{0}/sitemap-b.xml</loc></sitemap>
              <sitemap><loc>{0}/sitemap-missing.xml</loc></sitemap>
            </sitemapindex>"#,
            base
        )))
        .mount(&server)
        .await;

    for (name, pages) in [("a", ["one", "two", "three"]), ("b", ["four", "five", "six"])] {
        let entries: String = pages
            .iter()
            .map(|p| format!("<url><loc>{}/{}</loc></url>", base, p))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("/sitemap-{}.xml", name)))
            .respond_with(xml(format!("<urlset>{}</urlset>", entries)))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/sitemap-missing.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.sitemap.enabled = true;

    let output = crawl(&config, &base).await.expect("Crawl failed");

    assert_eq!(output.report.links.len(), 6);
    assert_eq!(output.report.stats.sitemap_links, 6);
    for page in ["one", "two", "three", "four", "five", "six"] {
        assert!(output.report.links.contains(&format!("{}/{}", base, page)));
    }
}

#[tokio::test]
async fn test_sitemap_overlap_is_deduplicated() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/about">About</a>"#).await;
    mount_page(&server, "/about", "").await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(format!(
            "<urlset><url><loc>{0}/about</loc></url><url><loc>{0}/pricing</loc></url></urlset>",
            base
        )))
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.sitemap.enabled = true;

    let links = discover(&config, &base).await;

    assert_eq!(
        links,
        vec![format!("{}/about", base), format!("{}/pricing", base)]
    );
}

#[tokio::test]
async fn test_coordinators_are_reusable_across_crawls() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", "").await;

    let coordinator = Coordinator::new(&create_test_config()).expect("Failed to create coordinator");
    let seed = Url::parse(&base).unwrap();

    let first = coordinator.discover(&seed).await.expect("Crawl failed");
    let second = coordinator.discover(&seed).await.expect("Crawl failed");

    assert_eq!(first.links, second.links);
    assert_eq!(second.stats.pages_skipped, 0);
}

#[tokio::test]
async fn test_invalid_seed_is_an_input_error() {
    for seed in ["", "not a url", "ftp://example.com/", "mailto:someone@example.com"] {
        let err = crawl(&create_test_config(), seed).await.unwrap_err();
        assert!(matches!(err, SitecapError::InvalidSeed(_)), "seed {:?}", seed);
        assert_eq!(err.kind(), ErrorKind::Input);
    }
}

#[tokio::test]
async fn test_unreachable_capture_continues_pipeline() {
    let temp_dir = TempDir::new().unwrap();

    let mut config = create_test_config().capture;
    config.output_dir = temp_dir.path().join("screenshots");
    config.navigation_timeout_secs = 10;
    config.network_idle_ms = 100;

    let pipeline = CapturePipeline::new(ScreenshotCapturer::new(config));
    let urls = vec![
        "http://127.0.0.1:9/about".to_string(),
        "http://127.0.0.1:9/contact".to_string(),
    ];

    let results = pipeline.capture_all(&urls).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, urls[0]);
    assert_eq!(results[1].url, urls[1]);
    assert!(results.iter().all(|r| r.screenshot_path.is_none()));
    assert!(!temp_dir.path().join("screenshots").join("screenshot-0.png").exists());
}
