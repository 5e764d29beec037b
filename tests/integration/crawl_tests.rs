//! Integration tests for the crawler and the hub protocol
//!
//! These tests use wiremock to stand in for crawled sites and for the hub,
//! and drive the public API end-to-end.

use hubcrawl::config::{CrawlerConfig, UserAgentConfig};
use hubcrawl::crawler::{build_http_client, CrawlSession, DomainCrawler, Fetcher, HttpFetcher};
use hubcrawl::hub::HubClient;
use hubcrawl::output::ImageStore;
use hubcrawl::CrawlError;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Crawler settings pointed at a plain-HTTP mock site with no delay
fn test_settings(budget: u32) -> CrawlerConfig {
    CrawlerConfig {
        crawl_budget: budget,
        politeness_delay_ms: 0,
        root_scheme: "http".to_string(),
        request_timeout_secs: 5,
        ..CrawlerConfig::default()
    }
}

fn test_fetcher() -> HttpFetcher {
    let user_agent = UserAgentConfig {
        header: "TestBot/1.0".to_string(),
    };
    HttpFetcher::from_config(&test_settings(1), &user_agent).expect("Failed to build fetcher")
}

/// Domain string (`host:port`) for a mock server
fn domain_of(server: &MockServer) -> String {
    server.address().to_string()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_fetcher_returns_body() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>Hello</p>").await;

    let url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let body = test_fetcher().fetch(&url).await.unwrap();

    assert_eq!(body, b"<html><body><p>Hello</p></body></html>");
}

#[tokio::test]
async fn test_fetcher_reports_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/broken", server.uri())).unwrap();
    let result = test_fetcher().fetch(&url).await;

    assert!(matches!(result, Err(CrawlError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_fetcher_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/new", "<p>Moved</p>").await;

    let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
    let body = test_fetcher().fetch(&url).await.unwrap();

    assert!(String::from_utf8(body).unwrap().contains("Moved"));
}

#[tokio::test]
async fn test_fetcher_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(html("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&server.uri()).unwrap();
    assert!(test_fetcher().fetch(&url).await.is_ok());
}

// ---------------------------------------------------------------------------
// Domain crawl
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<h1>Home</h1>
        <a href="/about">About</a>
        <a href="/about?ref=nav">Tracked</a>
        <a href="https://other.example/">Elsewhere</a>
        <a href="/theme/style.css">Style</a>
        <img src="/img/logo.png">"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About us</p><script>var hidden = 1;</script>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .mount(&server)
        .await;

    let fetcher = test_fetcher();
    let settings = test_settings(100);
    let domain = domain_of(&server);

    let data = DomainCrawler::new(&fetcher, &settings, domain.clone())
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(data.domain_name, domain);

    let root_key = format!("{}/", base);
    let about_key = format!("{}/about", base);
    let keys: Vec<&String> = data.pages.keys().collect();
    assert_eq!(keys, vec![&root_key, &about_key]);

    let root = &data.pages[&root_key];
    assert!(root.text.starts_with("Home"));
    assert_eq!(root.images.len(), 1);
    assert_eq!(root.images[0].data, PNG_BYTES);
    assert!(root.images[0].name.ends_with(".png"));

    let about = &data.pages[&about_key];
    assert_eq!(about.text, "About us");
    assert!(about.images.is_empty());

    let paths = requested_paths(&server).await;
    assert!(!paths.iter().any(|p| p.ends_with(".css")));
}

#[tokio::test]
async fn test_crawl_respects_budget() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<p>Root</p><a href="/one">1</a><a href="/two">2</a><a href="/three">3</a>"#,
    )
    .await;
    for page in ["/one", "/two", "/three"] {
        mount_page(&server, page, &format!("<p>Page {}</p>", page)).await;
    }

    let fetcher = test_fetcher();
    let settings = test_settings(2);

    let data = DomainCrawler::new(&fetcher, &settings, domain_of(&server))
        .run()
        .await
        .unwrap();

    assert_eq!(data.page_count(), 2);
    assert_eq!(requested_paths(&server).await.len(), 2);
}

#[tokio::test]
async fn test_failed_pages_are_dropped_from_result() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<p>Root</p><a href="/missing">Gone</a><a href="/binary">Bytes</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/binary"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0x00, 0x9f]))
        .mount(&server)
        .await;

    let fetcher = test_fetcher();
    let settings = test_settings(10);

    let data = DomainCrawler::new(&fetcher, &settings, domain_of(&server))
        .run()
        .await
        .unwrap();

    assert_eq!(data.page_count(), 1);
    assert!(data.pages.contains_key(&format!("{}/", server.uri())));
}

#[tokio::test]
async fn test_crawl_saves_images_to_store() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<p>Gallery</p><img src="/a.png"><img src="/b.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"other".to_vec()))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let store = ImageStore::new(temp_dir.path().join("images"));
    let fetcher = test_fetcher();
    let settings = CrawlerConfig {
        max_images_per_page: 1,
        ..test_settings(10)
    };

    let data = DomainCrawler::new(&fetcher, &settings, domain_of(&server))
        .with_image_store(Some(&store))
        .run()
        .await
        .unwrap();

    let page = &data.pages[&format!("{}/", server.uri())];
    assert_eq!(page.images.len(), 1);

    let saved = store.dir().join(&page.images[0].name);
    assert_eq!(std::fs::read(saved).unwrap(), page.images[0].data);

    let files = std::fs::read_dir(store.dir()).unwrap().count();
    assert_eq!(files, 1);
}

// ---------------------------------------------------------------------------
// Hub protocol
// ---------------------------------------------------------------------------

fn hub_for(server: &MockServer) -> HubClient {
    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    HubClient::new(&server.uri(), client).unwrap()
}

#[tokio::test]
async fn test_request_jobs() {
    let hub_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getCrawlJobs"))
        .and(query_param("num_domains", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"domains": ["a.com", "b.org", "c.net"]})),
        )
        .expect(1)
        .mount(&hub_server)
        .await;

    let domains = hub_for(&hub_server).request_jobs(3).await;

    assert_eq!(domains, vec!["a.com", "b.org", "c.net"]);
}

#[tokio::test]
async fn test_request_jobs_null_domains() {
    let hub_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getCrawlJobs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"domains": null})),
        )
        .mount(&hub_server)
        .await;

    assert!(hub_for(&hub_server).request_jobs(3).await.is_empty());
}

#[tokio::test]
async fn test_request_jobs_error_status_is_no_jobs() {
    let hub_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getCrawlJobs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&hub_server)
        .await;

    assert!(hub_for(&hub_server).request_jobs(3).await.is_empty());
}

#[tokio::test]
async fn test_request_jobs_malformed_body_is_no_jobs() {
    let hub_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getCrawlJobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&hub_server)
        .await;

    assert!(hub_for(&hub_server).request_jobs(3).await.is_empty());
}

#[tokio::test]
async fn test_post_crawl_data_wire_format() {
    let hub_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postCrawlData"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hub_server)
        .await;

    let mut data = hubcrawl::DomainData::new("example.com");
    data.record_page(
        "https://example.com/",
        hubcrawl::PageContent {
            text: "Hello".to_string(),
            images: vec![hubcrawl::Image {
                name: "logo.png".to_string(),
                data: b"abc".to_vec(),
            }],
        },
    );
    data.finalize();

    hub_for(&hub_server).post_crawl_data(&data).await.unwrap();

    let requests = hub_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(body["DomainName"], "example.com");
    let page = &body["Pages"]["https://example.com/"];
    assert_eq!(page["Text"], "Hello");
    assert_eq!(page["Images"][0]["Name"], "logo.png");
    assert_eq!(page["Images"][0]["Data"], "YWJj");
    assert!(body["TimeStamp"].is_string());
}

#[tokio::test]
async fn test_post_crawl_data_failure() {
    let hub_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postCrawlData"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&hub_server)
        .await;

    let data = hubcrawl::DomainData::new("example.com");
    let result = hub_for(&hub_server).post_crawl_data(&data).await;

    match result {
        Err(CrawlError::Submission { domain, reason }) => {
            assert_eq!(domain, "example.com");
            assert!(reason.contains("503"));
        }
        other => panic!("expected submission error, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_session_cycle_with_hub() {
    let site = MockServer::start().await;
    mount_page(&site, "/", "<p>Site root</p>").await;

    let hub_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getCrawlJobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"domains": [domain_of(&site)]})),
        )
        .mount(&hub_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/postCrawlData"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hub_server)
        .await;

    let hub = hub_for(&hub_server);
    let mut session = CrawlSession::new(test_fetcher(), test_settings(10));

    assert_eq!(session.request_jobs(&hub, 3).await, 1);

    let stats = session.crawl_all().await;
    assert_eq!(stats.domains_completed, 1);
    assert_eq!(stats.pages, 1);

    let outcome = session.submit_all(&hub).await;
    assert_eq!(outcome.delivered, vec![domain_of(&site)]);
    assert!(outcome.is_complete());
    assert!(session.completed().is_empty());
}

#[tokio::test]
async fn test_session_keeps_result_when_submission_fails() {
    let site = MockServer::start().await;
    mount_page(&site, "/", "<p>Site root</p>").await;

    let failing_hub = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postCrawlData"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&failing_hub)
        .await;

    let working_hub = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postCrawlData"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&working_hub)
        .await;

    let mut session = CrawlSession::new(test_fetcher(), test_settings(10));
    session.insert_domain(domain_of(&site));
    session.crawl_all().await;

    let result = session.submit_next(&hub_for(&failing_hub)).await;
    assert!(matches!(result, Some(Err(CrawlError::Submission { .. }))));
    assert_eq!(session.completed().len(), 1);

    let result = session.submit_next(&hub_for(&working_hub)).await;
    assert_eq!(result.unwrap().unwrap(), domain_of(&site));
    assert!(session.completed().is_empty());
}

#[tokio::test]
async fn test_rejected_submission_does_not_block_other_domains() {
    let mut sites = Vec::new();
    for name in ["first", "second", "third"] {
        let site = MockServer::start().await;
        mount_page(&site, "/", &format!("<p>Site {}</p>", name)).await;
        sites.push(site);
    }
    let domains: Vec<String> = sites.iter().map(domain_of).collect();

    // The hub has no host for the middle domain
    let hub_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postCrawlData"))
        .and(body_string_contains(format!("\"DomainName\":\"{}\"", domains[1])))
        .respond_with(ResponseTemplate::new(500).set_body_string("unknown host"))
        .expect(1)
        .mount(&hub_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/postCrawlData"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&hub_server)
        .await;

    let hub = hub_for(&hub_server);
    let mut session = CrawlSession::new(test_fetcher(), test_settings(10));
    session.insert_domains(domains.iter().cloned());
    assert_eq!(session.crawl_all().await.domains_completed, 3);

    let outcome = session.submit_all(&hub).await;

    assert_eq!(outcome.delivered, vec![domains[0].clone(), domains[2].clone()]);
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(
        &outcome.errors[0],
        CrawlError::Submission { domain, .. } if domain == &domains[1]
    ));

    let kept: Vec<&str> = session
        .completed()
        .iter()
        .map(|d| d.domain_name.as_str())
        .collect();
    assert_eq!(kept, vec![domains[1].as_str()]);
    assert_eq!(hub_server.received_requests().await.unwrap().len(), 3);
}
