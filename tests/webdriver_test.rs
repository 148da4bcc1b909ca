//! End-to-end crawl through a real browser.
//!
//! Needs a WebDriver server (e.g. `chromedriver --port=4444`) on
//! localhost, so these only run with `cargo test -- --ignored`.

use anyhow::Result;
use std::time::Duration;

use sitemapper::{run_crawl, CrawlerConfig, RenderEngine, RenderPage, RenderSession, Sitemapper, WebDriverEngine};

fn page(body: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>t</title></head><body>{}</body></html>", body)
}

#[tokio::test]
#[ignore] // Requires a running WebDriver server
async fn test_crawl_local_site() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let _home = server.mock("GET", "/")
        .with_header("content-type", "text/html")
        .with_body(page(&format!(
            r#"<a href="/about">About</a>
               <a href="/about/">About again</a>
               <a href="/#top">Top</a>
               <a href="https://www.rust-lang.org/">External</a>
               <svg><a href="/svg-target"><text>svg</text></a></svg>
               <div id="late"></div>
               <script>setTimeout(function () {{
                   document.getElementById('late').innerHTML = '<a href="{}/late">late</a>';
               }}, 100);</script>"#,
            base
        )))
        .create_async()
        .await;
    let _about = server.mock("GET", "/about")
        .with_header("content-type", "text/html")
        .with_body(page(r#"<a href="/">Home</a>"#))
        .create_async()
        .await;
    let _svg = server.mock("GET", "/svg-target")
        .with_header("content-type", "text/html")
        .with_body(page("svg page"))
        .create_async()
        .await;
    let _late = server.mock("GET", "/late")
        .with_header("content-type", "text/html")
        .with_body(page("rendered later"))
        .create_async()
        .await;

    let config = CrawlerConfig::new()
        .with_wait(Duration::from_millis(500))
        .with_page_timeout(Duration::from_secs(20));
    let engine = WebDriverEngine::from_config(&config);
    let mut mapper = Sitemapper::new(engine, &base, config);

    let report = run_crawl(&mut mapper).await?;

    assert!(report.errors.is_empty(), "unexpected errors: {:?}", report.errors);
    for path in ["/about", "/svg-target", "/late"] {
        let url = format!("{}{}", base, path);
        assert!(report.visited.contains(&url), "{} not visited: {:?}", url, report.visited);
    }
    assert_eq!(report.visited.len(), 4);
    assert!(!report.xml.contains("rust-lang.org"));
    Ok(())
}

#[tokio::test]
#[ignore] // Requires a running WebDriver server
async fn test_unreachable_page_is_recorded() -> Result<()> {
    let config = CrawlerConfig::new()
        .with_wait(Duration::ZERO)
        .with_page_timeout(Duration::from_secs(10));
    let engine = WebDriverEngine::from_config(&config);
    // Nothing listens on port 9
    let mut mapper = Sitemapper::new(engine, "http://127.0.0.1:9", config);

    let report = run_crawl(&mut mapper).await?;

    assert_eq!(report.visited, vec!["http://127.0.0.1:9".to_string()]);
    assert_eq!(report.errors.len(), 1);
    Ok(())
}

#[tokio::test]
#[ignore] // Requires a running WebDriver server
async fn test_tabs_are_closed_after_each_page() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _home = server.mock("GET", "/")
        .with_header("content-type", "text/html")
        .with_body(page(r#"<a href="/a">A</a>"#))
        .create_async()
        .await;

    let config = CrawlerConfig::new().with_page_timeout(Duration::from_secs(20));
    let mut session = WebDriverEngine::from_config(&config).launch().await?;
    assert_eq!(session.open_windows().await?, 1);

    for _ in 0..3 {
        let mut tab = session.new_page().await?;
        assert_eq!(session.open_windows().await?, 2);
        tab.goto(&server.url()).await?;
        tab.close().await?;
        tab.close().await?;
        assert_eq!(session.open_windows().await?, 1);
    }

    session.close().await?;
    assert!(session.new_page().await.is_err());
    Ok(())
}

#[tokio::test]
#[ignore] // Requires a running WebDriver server
async fn test_svg_links_follow_document_base() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let _start = server.mock("GET", "/start")
        .with_header("content-type", "text/html")
        .with_body(format!(
            r#"<!DOCTYPE html><html><head><base href="{}/docs/"></head>
               <body><svg><a href="guide"><text>guide</text></a></svg></body></html>"#,
            base
        ))
        .create_async()
        .await;

    let config = CrawlerConfig::new().with_page_timeout(Duration::from_secs(20));
    let mut session = WebDriverEngine::from_config(&config).launch().await?;
    let mut tab = session.new_page().await?;
    tab.goto(&format!("{}/start", base)).await?;
    let links = tab.extract_links().await?;
    tab.close().await?;
    session.close().await?;

    assert_eq!(links, vec![sitemapper::RawLink::Href(format!("{}/docs/guide", base))]);
    Ok(())
}
