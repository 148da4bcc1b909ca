//! Crawl session: drives the render port and owns the frontier.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::fmt;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::{CrawlFailure, CrawlerError, RenderError};
use crate::frontier::Frontier;
use crate::render::{RenderEngine, RenderPage, RenderSession};
use crate::sitemap::SitemapDocument;
use crate::url_classifier::{resolve_link, RawLink};

pub mod config;
pub mod runner;

pub use config::CrawlerConfig;
pub use runner::{run_crawl, CrawlReport};

/// Lifecycle of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
    /// Internal: held only while a `parse` call is in flight. `parse`
    /// borrows the session mutably, so this is never observable from
    /// outside; a finished `parse` always leaves `Ready` or `Done`.
    Parsing,
    Done,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "uninitialized"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Parsing => write!(f, "parsing"),
            SessionState::Done => write!(f, "done"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

/// Maps a single site by rendering pages and following in-scope links
///
/// All crawl state (frontier, visited set, failures) lives here. Pages are
/// rendered one at a time; each `parse` call closes its page before it
/// returns.
pub struct Sitemapper<E: RenderEngine> {
    engine: E,
    session: Option<E::Session>,
    state: SessionState,
    config: CrawlerConfig,
    frontier: Frontier,
    errors: Vec<CrawlFailure>,
    generated_on: NaiveDate,
}

impl<E: RenderEngine> fmt::Debug for Sitemapper<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sitemapper")
            .field("seed", &self.frontier.seed())
            .field("state", &self.state)
            .field("pending", &self.frontier.pending().len())
            .field("visited", &self.frontier.visited().len())
            .field("errors", &self.errors.len())
            .finish()
    }
}

impl<E: RenderEngine> Sitemapper<E> {
    /// Creates a session for `seed`, stamping today's date for `lastmod`
    pub fn new(engine: E, seed: &str, config: CrawlerConfig) -> Self {
        Self::with_date(engine, seed, config, Local::now().date_naive())
    }

    /// Same as [`Sitemapper::new`] with an explicit generation date
    pub fn with_date(engine: E, seed: &str, config: CrawlerConfig, generated_on: NaiveDate) -> Self {
        debug!("Creating crawl session for {} (wait={:?}, limit={})", seed, config.wait, config.limit);
        Self {
            engine,
            session: None,
            state: SessionState::Uninitialized,
            config,
            frontier: Frontier::new(seed),
            errors: Vec::new(),
            generated_on,
        }
    }

    /// Launches the browser session
    ///
    /// Launch failures are returned as is and not retried.
    pub async fn init(&mut self) -> Result<(), CrawlerError> {
        if self.state != SessionState::Uninitialized {
            return Err(CrawlerError::InvalidState {
                operation: "init",
                state: self.state.to_string(),
            });
        }

        match self.engine.launch().await {
            Ok(session) => {
                self.session = Some(session);
                self.state = SessionState::Ready;
                info!("Browser session ready");
                Ok(())
            }
            Err(e) => {
                error!("Failed to launch browser: {}", e);
                Err(e.into())
            }
        }
    }

    /// Renders `url`, harvests its links and records the outcome
    ///
    /// Per-page failures are stored in [`Sitemapper::errors`] and the URL is
    /// still marked visited. Only session misuse is returned as an error.
    #[instrument(skip(self))]
    pub async fn parse(&mut self, url: &str) -> Result<(), CrawlerError> {
        match self.state {
            SessionState::Ready | SessionState::Done => {}
            SessionState::Uninitialized => return Err(CrawlerError::NotInitialized),
            state => {
                return Err(CrawlerError::InvalidState {
                    operation: "parse",
                    state: state.to_string(),
                })
            }
        }

        let url = self.frontier.canonical(url);
        if self.frontier.is_visited(&url) {
            debug!("Skipping already visited {}", url);
            self.frontier.remove(&url);
            self.update_state();
            return Ok(());
        }

        let session = match self.session.as_ref() {
            Some(session) => session,
            None => return Err(CrawlerError::NotInitialized),
        };

        self.state = SessionState::Parsing;
        let started = Instant::now();
        let outcome = render_links(session, &url, self.config.wait, self.config.page_timeout).await;

        match outcome {
            Ok(links) => {
                debug!("Parsed {} in {:?}, found {} links", url, started.elapsed(), links.len());
                self.frontier.merge(links);
            }
            Err(e) => {
                warn!("Error parsing {}: {}", url, e);
                self.errors.push(CrawlFailure { url: url.clone(), error: e });
            }
        }

        self.frontier.mark_visited(&url);
        self.update_state();
        trace!("{} pending after parsing {}", self.frontier.pending().len(), url);
        Ok(())
    }

    /// Builds the sitemap from everything visited so far
    ///
    /// Can be called repeatedly; the result always reflects the current
    /// visited set.
    pub fn generate_sitemap(&self) -> Result<String> {
        let mut document = SitemapDocument::new(self.generated_on);
        for url in self.frontier.visited() {
            document.add_url(url.as_str());
        }
        info!("Generating sitemap with {} urls", document.len());
        document.to_xml()
    }

    /// Releases the browser session
    ///
    /// Safe to call more than once, and before `init`. Errors while closing
    /// are logged, not returned.
    pub async fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.close().await {
                warn!("Failed to close browser session cleanly: {}", e);
            }
        } else {
            trace!("close() called with no open session");
        }
        self.state = SessionState::Closed;
    }

    /// True once nothing is pending or the visit limit was reached
    pub fn is_complete(&self) -> bool {
        self.frontier.is_exhausted(self.config.limit)
    }

    pub fn next_url(&self) -> Option<&str> {
        self.frontier.next()
    }

    pub fn seed(&self) -> &str {
        self.frontier.seed()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn pending(&self) -> &[String] {
        self.frontier.pending()
    }

    pub fn visited(&self) -> &[String] {
        self.frontier.visited()
    }

    pub fn errors(&self) -> &[CrawlFailure] {
        &self.errors
    }

    pub fn generated_on(&self) -> NaiveDate {
        self.generated_on
    }

    /// Hands the recorded failures over to the caller
    pub fn take_errors(&mut self) -> Vec<CrawlFailure> {
        std::mem::take(&mut self.errors)
    }

    fn update_state(&mut self) {
        self.state = if self.is_complete() {
            SessionState::Done
        } else {
            SessionState::Ready
        };
    }
}

/// One render attempt: open a page, load it, harvest links, close it
///
/// Loading and extraction are bounded by `page_timeout` plus the settle
/// delay. The page is closed on every path, including a timeout. A close
/// failure is only logged.
async fn render_links<S: RenderSession>(
    session: &S,
    url: &str,
    wait: Duration,
    page_timeout: Duration,
) -> Result<Vec<String>, RenderError> {
    let mut page = session.new_page().await?;

    let started = Instant::now();
    let result = match timeout(page_timeout + wait, load_and_extract(&mut page, url, wait)).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout {
            url: url.to_string(),
            elapsed: started.elapsed(),
        }),
    };

    if let Err(e) = page.close().await {
        warn!("Failed to close page for {}: {}", url, e);
    }

    let raw_links = result?;
    Ok(raw_links
        .iter()
        .filter_map(|raw| resolve_link(raw, url))
        .collect())
}

async fn load_and_extract<P: RenderPage>(page: &mut P, url: &str, wait: Duration) -> Result<Vec<RawLink>, RenderError> {
    page.goto(url).await?;
    if !wait.is_zero() {
        trace!("Waiting {:?} for client-side rendering", wait);
        sleep(wait).await;
    }
    page.extract_links().await
}
