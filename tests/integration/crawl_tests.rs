//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end. A bare TCP server covers bodies cut off mid-stream.

use sitegraph::config::Config;
use sitegraph::crawler::crawl;
use sitegraph::output::{format_report, CrawlStatistics};
use sitegraph::{CrawlState, Crawler, SiteMap};
use std::collections::HashSet;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given request timeout
fn create_test_config(request_timeout_ms: u64) -> Config {
    let mut config = Config::default();
    config.crawler.request_timeout_ms = request_timeout_ms;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page: &str, template: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(template)
        .expect(times)
        .mount(server)
        .await;
}

/// Reads one request head and returns its path
async fn read_request_path(socket: &mut TcpStream) -> Option<String> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        request.extend_from_slice(&buf[..n]);
    }
    let head = String::from_utf8_lossy(&request);
    head.split_whitespace().nth(1).map(str::to_string)
}

/// Starts a server whose `/` promises 5000 bytes but hangs up after `partial`
///
/// Every other path gets a complete, empty HTML page.
async fn start_cut_off_server(partial: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let Some(path) = read_request_path(&mut socket).await else {
                    return;
                };
                let response = if path == "/" {
                    format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 5000\r\n\r\n{}",
                        partial
                    )
                } else {
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string()
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.flush().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Returns the set of URLs `url` references in the finished graph
fn reference_urls(map: &SiteMap, url: &str) -> HashSet<String> {
    let resource = map
        .lookup(url)
        .unwrap_or_else(|| panic!("{} not registered", url));
    map.references(resource)
        .map(|r| r.url().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(
            r#"<html><head><title>Home</title></head><body>
            <a href="/about">About</a>
            <a href="https://external.test/">Elsewhere</a>
            <img src="/logo.png">
            </body></html>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/about",
        html("<html><body><p>No links here</p></body></html>"),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/logo.png",
        ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
        1,
    )
    .await;

    let map = crawl(&format!("{}/", base), &create_test_config(5_000))
        .await
        .expect("Crawl failed to start");

    assert_eq!(map.len(), 3, "root, /about and /logo.png");
    assert!(!map.contains("https://external.test/"));

    let root_url = format!("{}/", base);
    let expected: HashSet<String> = [format!("{}/about", base), format!("{}/logo.png", base)]
        .into_iter()
        .collect();
    assert_eq!(reference_urls(&map, &root_url), expected);

    let entry = map.entry().expect("root should be registered");
    assert_eq!(entry.url().as_str(), root_url);
    assert_eq!(entry.status_code(), Some(200));
    assert_eq!(entry.state(), CrawlState::Joined);

    let logo = map.lookup(&format!("{}/logo.png", base)).unwrap();
    assert_eq!(logo.content_type(), "image/png");
    assert!(logo.references().is_empty());

    let report = format_report(&map);
    let expected_report = format!(
        "(webpage) {base}/\n    Links\n        (webpage) {base}/about\n    Assets\n        (image/png) {base}/logo.png\n(webpage) {base}/about\n    Links\n    Assets\n",
        base = base
    );
    assert_eq!(report, expected_report);
}

#[tokio::test]
async fn test_cycle_terminates() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/a", html(r#"<a href="/b">B</a>"#), 1).await;
    mount_page(&mock_server, "/b", html(r#"<a href="/a">A</a>"#), 1).await;

    let map = crawl(&format!("{}/a", base), &create_test_config(5_000))
        .await
        .unwrap();

    assert_eq!(map.len(), 2);
    let a = format!("{}/a", base);
    let b = format!("{}/b", base);
    assert_eq!(reference_urls(&map, &a), [b.clone()].into_iter().collect());
    assert_eq!(reference_urls(&map, &b), [a.clone()].into_iter().collect());
}

#[tokio::test]
async fn test_self_link_terminates() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", html(r#"<a href="/">Home</a>"#), 1).await;

    let map = crawl(&format!("{}/", base), &create_test_config(5_000))
        .await
        .unwrap();

    assert_eq!(map.len(), 1);
    let root = map.entry().unwrap();
    assert_eq!(root.references(), &[root.id()]);
}

#[tokio::test]
async fn test_shared_target_fetched_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/left">L</a><a href="/right">R</a>"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/left", html(r#"<a href="/shared">S</a>"#), 1).await;
    mount_page(&mock_server, "/right", html(r#"<a href="/shared">S</a>"#), 1).await;
    mount_page(&mock_server, "/shared", html("<p>leaf</p>"), 1).await;

    let map = crawl(&format!("{}/", base), &create_test_config(5_000))
        .await
        .unwrap();

    assert_eq!(map.len(), 4);
    let shared = format!("{}/shared", base);
    let shared_id = map.lookup(&shared).unwrap().id();
    for side in ["left", "right"] {
        let page = map.lookup(&format!("{}/{}", base, side)).unwrap();
        assert_eq!(page.references(), &[shared_id]);
    }
}

#[tokio::test]
async fn test_failed_fetch_is_contained() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/about">About</a><img src="/logo.png">"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/about", html("<p>About us</p>"), 1).await;
    mount_page(
        &mock_server,
        "/logo.png",
        ResponseTemplate::new(200)
            .set_body_raw(vec![0u8; 4], "image/png")
            .set_delay(Duration::from_secs(3)),
        1,
    )
    .await;

    let map = crawl(&format!("{}/", base), &create_test_config(500))
        .await
        .unwrap();

    assert_eq!(map.len(), 3);

    let logo = map.lookup(&format!("{}/logo.png", base)).unwrap();
    let error = logo.error().expect("logo fetch should have failed");
    assert!(error.is_timeout(), "unexpected error: {}", error);
    assert_eq!(logo.state(), CrawlState::Failed);

    let about = map.lookup(&format!("{}/about", base)).unwrap();
    assert!(about.is_fetched());
    assert!(about.is_web_page());

    // The failed resource is still referenced, but the report leaves it out
    assert!(reference_urls(&map, &format!("{}/", base)).contains(logo.url().as_str()));
    assert!(!format_report(&map).contains("logo.png"));
}

#[tokio::test]
async fn test_unreachable_root() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html("<p>too late</p>").set_delay(Duration::from_secs(3)),
        1,
    )
    .await;

    let map = crawl(&format!("{}/", base), &create_test_config(300))
        .await
        .unwrap();

    assert_eq!(map.len(), 1);
    assert!(map.entry().unwrap().error().is_some());
    assert_eq!(format_report(&map), "");
}

#[tokio::test]
async fn test_cut_off_page_keeps_received_references() {
    let base =
        start_cut_off_server(r#"<html><body><a href="/kept">kept</a><p>the rest never arr"#).await;

    let map = crawl(&format!("{}/", base), &create_test_config(5_000))
        .await
        .unwrap();

    let root = map.entry().unwrap();
    assert!(root.error().is_none());
    assert_eq!(root.status_code(), Some(200));

    let kept = format!("{}/kept", base);
    assert!(map.contains(&kept));
    assert!(map.lookup(&kept).unwrap().is_fetched());
    assert_eq!(
        reference_urls(&map, &format!("{}/", base)),
        [kept].into_iter().collect()
    );
}

#[tokio::test]
async fn test_assets_are_not_parsed() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", html(r#"<a href="/data.txt">data</a>"#), 1).await;
    mount_page(
        &mock_server,
        "/data.txt",
        ResponseTemplate::new(200).set_body_raw(r#"<a href="/hidden">not html</a>"#, "text/plain"),
        1,
    )
    .await;
    mount_page(&mock_server, "/hidden", html("<p>hidden</p>"), 0).await;

    let map = crawl(&format!("{}/", base), &create_test_config(5_000))
        .await
        .unwrap();

    assert_eq!(map.len(), 2);
    assert!(!map.contains(&format!("{}/hidden", base)));
}

#[tokio::test]
async fn test_relative_references_resolve_against_page() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/dir/page.html",
        html(r#"<img src="../assets/logo.png"><a href="sibling.html">s</a>"#),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/assets/logo.png",
        ResponseTemplate::new(200).set_body_raw(vec![1u8], "image/png"),
        1,
    )
    .await;
    mount_page(&mock_server, "/dir/sibling.html", html("<p>hi</p>"), 1).await;

    let map = crawl(&format!("{}/dir/page.html", base), &create_test_config(5_000))
        .await
        .unwrap();

    assert!(map.contains(&format!("{}/assets/logo.png", base)));
    assert!(map.contains(&format!("{}/dir/sibling.html", base)));
}

#[tokio::test]
async fn test_error_status_recorded_without_error() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", html(r#"<a href="/gone">gone</a>"#), 1).await;
    mount_page(
        &mock_server,
        "/gone",
        ResponseTemplate::new(404).set_body_raw("<p>Not found</p>", "text/html"),
        1,
    )
    .await;

    let map = crawl(&format!("{}/", base), &create_test_config(5_000))
        .await
        .unwrap();

    let gone = map.lookup(&format!("{}/gone", base)).unwrap();
    assert_eq!(gone.status_code(), Some(404));
    assert!(gone.error().is_none());

    let stats = CrawlStatistics::from_site_map(&map);
    assert_eq!(stats.error_statuses, 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_last_modified_recorded() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html("<p>home</p>").insert_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT"),
        1,
    )
    .await;

    let map = crawl(&format!("{}/", base), &create_test_config(5_000))
        .await
        .unwrap();

    assert_eq!(
        map.entry().unwrap().last_modified(),
        Some("Wed, 21 Oct 2015 07:28:00 GMT")
    );
}

#[tokio::test]
async fn test_successive_crawls_are_isolated() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", html(r#"<a href="/next">next</a>"#), 2).await;
    mount_page(&mock_server, "/next", html("<p>end</p>"), 2).await;

    let crawler = Crawler::new(&format!("{}/", base), &create_test_config(5_000)).unwrap();
    let first = crawler.crawl().await;
    let second = crawler.crawl().await;

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert!(second.entry().unwrap().is_fetched());
}

#[tokio::test]
async fn test_bounded_fetches_complete_deep_graph() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/1">1</a><a href="/2">2</a><a href="/3">3</a>"#),
        1,
    )
    .await;
    for i in 1..=3 {
        mount_page(
            &mock_server,
            &format!("/{}", i),
            html(&format!(r#"<a href="/{i}/a">a</a><a href="/{i}/b">b</a><a href="/">home</a>"#)),
            1,
        )
        .await;
        for leaf in ["a", "b"] {
            mount_page(
                &mock_server,
                &format!("/{}/{}", i, leaf),
                html(r#"<a href="/">home</a>"#),
                1,
            )
            .await;
        }
    }

    let mut config = create_test_config(5_000);
    config.crawler.max_concurrent_fetches = Some(1);

    let map = tokio::time::timeout(
        Duration::from_secs(30),
        crawl(&format!("{}/", base), &config),
    )
    .await
    .expect("bounded crawl should not stall")
    .unwrap();

    assert_eq!(map.len(), 10);
    assert!(map.iter().all(|r| r.is_fetched()));
}

#[tokio::test]
async fn test_malformed_root_rejected() {
    let result = crawl("::not a url::", &Config::default()).await;
    assert!(result.is_err());
}
