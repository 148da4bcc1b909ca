use anyhow::{Context, Result};
use tracing::{error, info};

use crate::crawler::Sitemapper;
use crate::error::CrawlFailure;
use crate::render::RenderEngine;
use crate::utils::bounded;

/// Number of failures listed individually in a summary
pub const ERROR_SUMMARY_LIMIT: usize = 5;

/// Outcome of a finished crawl
#[derive(Debug)]
pub struct CrawlReport {
    pub xml: String,
    pub visited: Vec<String>,
    pub errors: Vec<CrawlFailure>,
}

impl CrawlReport {
    /// The first `limit` failure messages plus the number left out
    pub fn error_summary(&self, limit: usize) -> (Vec<String>, usize) {
        let (shown, remaining) = bounded(&self.errors, limit);
        (shown.iter().map(|f| f.to_string()).collect(), remaining)
    }
}

/// Crawls from the seed until the frontier is exhausted or the limit is hit
///
/// This function performs the following steps:
/// 1. Launches the browser session
/// 2. Parses the seed, then whatever the frontier hands out next
/// 3. Builds the sitemap from the visited set
/// 4. Closes the session
///
/// The session is closed on every path, including a failed launch.
///
/// # Arguments
/// * `mapper` - A fresh, uninitialized crawl session
///
/// # Returns
/// * `Result<CrawlReport>` - Sitemap XML, visited URLs and per-page failures
pub async fn run_crawl<E: RenderEngine>(mapper: &mut Sitemapper<E>) -> Result<CrawlReport> {
    let result = crawl(mapper).await;
    mapper.close().await;

    match result {
        Ok(xml) => Ok(CrawlReport {
            xml,
            visited: mapper.visited().to_vec(),
            errors: mapper.take_errors(),
        }),
        Err(e) => {
            error!("Crawl of {} aborted: {:#}", mapper.seed(), e);
            Err(e)
        }
    }
}

async fn crawl<E: RenderEngine>(mapper: &mut Sitemapper<E>) -> Result<String> {
    mapper.init().await.context("Failed to start browser session")?;

    let limit = mapper.config().limit;
    let seed = mapper.seed().to_string();
    let mut count = 1;
    info!("[{}/{}] Parsing {}...", count, limit, seed);
    mapper.parse(&seed).await?;

    while !mapper.is_complete() {
        let next = match mapper.next_url() {
            Some(next) => next.to_string(),
            None => break,
        };
        count += 1;
        info!("[{}/{}] Parsing {}...", count, limit, next);
        mapper.parse(&next).await?;
    }

    info!("Crawl finished: {} urls visited, {} errors", mapper.visited().len(), mapper.errors().len());
    mapper.generate_sitemap()
}
