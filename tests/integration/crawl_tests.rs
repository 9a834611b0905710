//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_sentiment::config::{Config, CrawlerConfig};
use site_sentiment::crawler::NO_TITLE;
use site_sentiment::{crawl, write_json, Crawler};
use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(max_pages: usize, workers: usize) -> Config {
    let mut config = Config::default();
    config.crawler = CrawlerConfig {
        max_pages,
        workers,
        fetch_timeout_secs: 1,
        ..CrawlerConfig::default()
    };
    config
}

/// Builds an HTML page with the given title and body markup
fn html_page(title: Option<&str>, body: &str) -> String {
    let head = title
        .map(|t| format!("<title>{}</title>", t))
        .unwrap_or_default();
    format!(
        "<html><head>{}</head><body>{}</body></html>",
        head, body
    )
}

/// Mounts a page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, page_path: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn key(server: &MockServer, page_path: &str) -> String {
    format!("{}{}", server.uri(), page_path)
}

#[tokio::test]
async fn test_crawl_records_internal_links_only() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            Some("Home"),
            r#"<p>Welcome home.</p>
            <a href="/a">A</a>
            <a href="https://external.example.org/x">External</a>
            <a href="/b">B</a>"#,
        ),
        1,
    )
    .await;
    mount_page(&server, "/a", html_page(Some("A"), "<p>Page A.</p>"), 1).await;
    mount_page(&server, "/b", html_page(Some("B"), "<p>Page B.</p>"), 1).await;

    let crawler = Crawler::new(&create_test_config(10, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(result.len(), 3);

    let seed = result.get(&key(&server, "/")).expect("Seed missing");
    assert_eq!(seed.title, "Home");
    assert_eq!(seed.links, vec![key(&server, "/a"), key(&server, "/b")]);

    for url in result.urls() {
        assert!(
            url.starts_with(&server.uri()),
            "Unexpected external key {}",
            url
        );
    }

    assert_eq!(result.stats().external_links, 1);
    server.verify().await;
}

#[tokio::test]
async fn test_max_pages_one_records_only_seed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<a href="/a">A</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/a", html_page(Some("A"), ""), 0).await;
    mount_page(&server, "/b", html_page(Some("B"), ""), 0).await;

    let crawler = Crawler::new(&create_test_config(1, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(result.len(), 1);
    assert!(result.contains(&key(&server, "/")));
    assert_eq!(result.stats().pages_visited, 1);
    server.verify().await;
}

#[tokio::test]
async fn test_seed_keyed_by_string_as_given() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<a href="/a">A</a>"#),
        2,
    )
    .await;
    mount_page(&server, "/a", html_page(Some("A"), ""), 2).await;

    // No trailing slash: the parsed form would be "<uri>/".
    // Crawled once sequentially and once with a worker pool.
    let seed = server.uri();

    for workers in [1, 2] {
        let crawler =
            Crawler::new(&create_test_config(5, workers)).expect("Failed to create crawler");
        let result = crawler.crawl(&seed).await.expect("Crawl failed");

        let urls: Vec<&str> = result.urls().collect();
        assert_eq!(urls, vec![seed.clone(), key(&server, "/a")]);
        assert!(result.contains(&seed));
        assert!(!result.contains(&key(&server, "/")));
        assert_eq!(
            result.get(&seed).expect("Seed missing").links,
            vec![key(&server, "/a")]
        );
    }
    server.verify().await;
}

#[tokio::test]
async fn test_crawl_entry_point_respects_max_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<a href="/a">A</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/a", html_page(Some("A"), ""), 0).await;
    mount_page(&server, "/b", html_page(Some("B"), ""), 0).await;

    let seed = key(&server, "/");
    let result = crawl(&seed, 1).await.expect("Crawl failed");

    assert_eq!(result.len(), 1);
    assert_eq!(result.pages()[0].url, seed);
    assert_eq!(result.pages()[0].links.len(), 2);
    server.verify().await;
}

#[tokio::test]
async fn test_crawl_is_depth_first() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<a href="/a">A</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page(Some("A"), r#"<a href="/a/deep">Deep</a><a href="/">Home</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/a/deep", html_page(Some("Deep"), ""), 1).await;
    mount_page(&server, "/b", html_page(Some("B"), ""), 1).await;

    let crawler = Crawler::new(&create_test_config(10, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = result.urls().collect();
    assert_eq!(
        urls,
        vec![
            key(&server, "/"),
            key(&server, "/a"),
            key(&server, "/a/deep"),
            key(&server, "/b"),
        ]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_page_bound_stops_depth_first_crawl_early() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<a href="/a">A</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page(Some("A"), r#"<a href="/a/deep">Deep</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/a/deep", html_page(Some("Deep"), ""), 1).await;
    mount_page(&server, "/b", html_page(Some("B"), ""), 0).await;

    let crawler = Crawler::new(&create_test_config(3, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(result.len(), 3);
    assert!(!result.contains(&key(&server, "/b")));
    server.verify().await;
}

#[tokio::test]
async fn test_failed_pages_are_absent_and_siblings_still_crawled() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            Some("Home"),
            r#"<a href="/missing">Missing</a>
            <a href="/slow">Slow</a>
            <a href="/ok">Ok</a>"#,
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>gone</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(Some("Slow"), ""))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", html_page(Some("Ok"), ""), 1).await;

    let crawler = Crawler::new(&create_test_config(10, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = result.urls().collect();
    assert_eq!(urls, vec![key(&server, "/"), key(&server, "/ok")]);

    // Links are recorded whether or not their fetch succeeds
    let seed = result.get(&key(&server, "/")).expect("Seed missing");
    assert_eq!(seed.links.len(), 3);

    let stats = result.stats();
    assert_eq!(stats.pages_visited, 4);
    assert_eq!(stats.http_errors, 1);
    assert_eq!(stats.network_errors, 1);
    server.verify().await;
}

#[tokio::test]
async fn test_unreachable_seed_gives_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let crawler = Crawler::new(&create_test_config(10, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    assert!(result.is_empty());
    assert_eq!(result.stats().http_errors, 1);
}

#[tokio::test]
async fn test_page_without_title() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(None, "<p>Untitled.</p>"), 1).await;

    let crawler = Crawler::new(&create_test_config(10, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    let seed = result.get(&key(&server, "/")).expect("Seed missing");
    assert_eq!(seed.title, NO_TITLE);
}

#[tokio::test]
async fn test_each_url_fetched_at_most_once() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            Some("Home"),
            r#"<a href="/a">A</a><a href="/a">A again</a><a href="/">Self</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page(Some("A"), r#"<a href="/">Home</a><a href="/a">Self</a>"#),
        1,
    )
    .await;

    let crawler = Crawler::new(&create_test_config(10, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(result.len(), 2);
    let seed = result.get(&key(&server, "/")).expect("Seed missing");
    assert_eq!(seed.links, vec![key(&server, "/a"), key(&server, "/")]);

    let titles: Vec<&str> = result
        .pages()
        .iter()
        .map(|page| page.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Home", "A"]);
    server.verify().await;
}

#[tokio::test]
async fn test_sentiment_is_scored_per_sentence() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html_page(
            Some("Review"),
            "<p>This is a wonderful site.</p><p>The checkout was terrible.</p>",
        ),
        1,
    )
    .await;

    let crawler = Crawler::new(&create_test_config(10, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    let seed = result.get(&key(&server, "/")).expect("Seed missing");
    assert_eq!(seed.sentiment.len(), 2);
    assert_eq!(seed.sentiment[0].text, "This is a wonderful site.");
    assert!(seed.sentiment[0].polarity > 0.0);
    assert!(seed.sentiment[1].polarity < 0.0);

    for sentence in &seed.sentiment {
        assert!((-1.0..=1.0).contains(&sentence.polarity));
        assert!((0.0..=1.0).contains(&sentence.subjectivity));
    }
}

#[tokio::test]
async fn test_concurrent_crawl_respects_page_bound() {
    let server = MockServer::start().await;

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(Some("Page"), &links))
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let crawler = Crawler::new(&create_test_config(5, 4)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(result.len(), 5);
    assert_eq!(result.stats().pages_visited, 5);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 5);

    let unique: HashSet<&str> = result.urls().collect();
    assert_eq!(unique.len(), 5);
}

#[tokio::test]
async fn test_concurrent_crawl_visits_same_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<a href="/a">A</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page(Some("A"), r#"<a href="/b">B</a><a href="/c">C</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/b", html_page(Some("B"), ""), 1).await;
    mount_page(&server, "/c", html_page(Some("C"), ""), 1).await;

    let crawler = Crawler::new(&create_test_config(10, 3)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    let urls: HashSet<&str> = result.urls().collect();
    let expected: HashSet<String> = ["/", "/a", "/b", "/c"]
        .iter()
        .map(|p| key(&server, p))
        .collect();
    assert_eq!(urls.len(), 4);
    for url in &expected {
        assert!(urls.contains(url.as_str()), "Missing {}", url);
    }
    assert_eq!(result.urls().next(), Some(key(&server, "/").as_str()));
    server.verify().await;
}

#[tokio::test]
async fn test_cancellation_returns_partial_result() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<a href="/a">A</a><a href="/hang">Hang</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/a", html_page(Some("A"), ""), 1).await;
    Mock::given(method("GET"))
        .and(path("/hang"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(Some("Hang"), ""))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(10, 1);
    config.crawler.fetch_timeout_secs = 30;
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = crawler
        .crawl_with_cancellation(&key(&server, "/"), cancel)
        .await
        .expect("Crawl failed");

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(result.stats().cancelled);

    let urls: Vec<&str> = result.urls().collect();
    assert_eq!(urls, vec![key(&server, "/"), key(&server, "/a")]);
}

#[tokio::test]
async fn test_crawl_timeout_returns_partial_result() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<a href="/hang">Hang</a>"#),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hang"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let mut config = create_test_config(10, 2);
    config.crawler.fetch_timeout_secs = 30;
    config.crawler.crawl_timeout_secs = Some(1);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    assert!(result.stats().cancelled);
    assert_eq!(result.len(), 1);
    assert!(result.contains(&key(&server, "/")));
}

#[tokio::test]
async fn test_results_written_as_json() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(Some("Home"), r#"<p>A great start.</p><a href="/a">A</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/a", html_page(None, "<p>Plain text.</p>"), 1).await;

    let crawler = Crawler::new(&create_test_config(10, 1)).expect("Failed to create crawler");
    let result = crawler
        .crawl(&key(&server, "/"))
        .await
        .expect("Crawl failed");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("links.json");
    write_json(&result, &output).expect("Failed to write output");

    let content = std::fs::read_to_string(&output).expect("Failed to read output");
    let json: serde_json::Value = serde_json::from_str(&content).expect("Invalid JSON");

    let object = json.as_object().expect("Top level must be an object");
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![key(&server, "/"), key(&server, "/a")]);

    let seed = &json[key(&server, "/")];
    assert_eq!(seed["title"], "Home");
    assert_eq!(seed["links"][0], key(&server, "/a"));
    assert!(seed["sentiment_analysis"][0]["polarity"].as_f64().unwrap() > 0.0);
    assert!(seed["sentiment_analysis"][0]["subjectivity"].is_number());
    assert!(seed["sentiment_analysis"][0]["text"].is_string());

    assert_eq!(json[key(&server, "/a")]["title"], NO_TITLE);
}
