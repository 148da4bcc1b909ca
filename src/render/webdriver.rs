use async_trait::async_trait;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, Locator};
use std::fmt;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, trace, warn};

use crate::crawler::config::CrawlerConfig;
use crate::error::RenderError;
use crate::render::client::create_client;
use crate::render::config::{NETWORK_IDLE_POLL, NETWORK_IDLE_WINDOW};
use crate::render::extract::{decode_links, LINK_EXTRACTOR_SCRIPT, RESOURCE_COUNT_SCRIPT};
use crate::render::{RenderEngine, RenderPage, RenderSession};
use crate::url_classifier::RawLink;

/// Launches Chrome sessions through a WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverEngine {
    webdriver_url: String,
    viewport_size: (u32, u32),
    headless: bool,
    page_timeout: Duration,
}

impl WebDriverEngine {
    pub fn new(webdriver_url: &str, viewport_size: (u32, u32), headless: bool, page_timeout: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            viewport_size,
            headless,
            page_timeout,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(&config.webdriver_url, config.viewport_size, config.headless, config.page_timeout)
    }
}

#[async_trait]
impl RenderEngine for WebDriverEngine {
    type Session = WebDriverSession;

    async fn launch(&self) -> Result<WebDriverSession, RenderError> {
        info!("Launching browser via WebDriver at {}", self.webdriver_url);
        let client = create_client(&self.webdriver_url, self.viewport_size, self.headless).await?;

        let main_window = match client.window().await {
            Ok(handle) => handle,
            Err(e) => {
                error!("Failed to read initial window handle: {}", e);
                if let Err(close_err) = client.close().await {
                    warn!("Failed to close half-initialized WebDriver client: {}", close_err);
                }
                return Err(RenderError::Launch(format!("Failed to read initial window handle: {}", e)));
            }
        };

        Ok(WebDriverSession {
            client: Some(client),
            main_window,
            page_timeout: self.page_timeout,
        })
    }
}

/// One WebDriver session. Pages are opened as tabs next to the main window.
pub struct WebDriverSession {
    client: Option<Client>,
    main_window: WindowHandle,
    page_timeout: Duration,
}

impl fmt::Debug for WebDriverSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDriverSession")
            .field("open", &self.client.is_some())
            .field("page_timeout", &self.page_timeout)
            .finish()
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        // No async in drop; the WebDriver server will reap the session eventually
        if self.client.is_some() {
            warn!("WebDriverSession dropped without close(), browser session may linger");
        }
    }
}

impl WebDriverSession {
    /// Number of browser windows currently open, main window included
    pub async fn open_windows(&self) -> Result<usize, RenderError> {
        let client = self.client.as_ref()
            .ok_or_else(|| RenderError::Page("Browser session already closed".to_string()))?;
        let windows = client.windows().await
            .map_err(|e| RenderError::Page(format!("Failed to list windows: {}", e)))?;
        Ok(windows.len())
    }
}

#[async_trait]
impl RenderSession for WebDriverSession {
    type Page = WebDriverPage;

    async fn new_page(&self) -> Result<WebDriverPage, RenderError> {
        let client = self.client.as_ref()
            .ok_or_else(|| RenderError::Page("Browser session already closed".to_string()))?
            .clone();

        trace!("Opening new tab");
        let window = client.new_window(true).await
            .map_err(|e| RenderError::Page(format!("Failed to open new tab: {}", e)))?;
        let handle = window.handle;

        if let Err(e) = client.switch_to_window(handle.clone()).await {
            error!("Failed to switch to new tab: {}", e);
            discard_tab(&client, handle, &self.main_window).await;
            return Err(RenderError::Page(format!("Failed to switch to new tab: {}", e)));
        }

        Ok(WebDriverPage {
            client,
            main_window: self.main_window.clone(),
            page_timeout: self.page_timeout,
            current_url: None,
            closed: false,
        })
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        match self.client.take() {
            Some(client) => {
                if let Ok(windows) = client.windows().await {
                    if windows.len() > 1 {
                        warn!("{} tabs still open at session close", windows.len() - 1);
                    }
                }
                info!("Closing browser session");
                client.close().await
                    .map_err(|e| RenderError::Page(format!("Failed to close browser session: {}", e)))
            }
            None => {
                trace!("Browser session already closed");
                Ok(())
            }
        }
    }
}

/// Closes a tab that never became a page, then returns to the main window
///
/// WebDriver can only close the current window, so this retries the switch
/// once. Failures are logged; the tab is reaped with the session at worst.
async fn discard_tab(client: &Client, handle: WindowHandle, main_window: &WindowHandle) {
    match client.switch_to_window(handle).await {
        Ok(()) => {
            if let Err(e) = client.close_window().await {
                warn!("Failed to close orphaned tab: {}", e);
            }
        }
        Err(e) => warn!("Orphaned tab left open until session close: {}", e),
    }

    if let Err(e) = client.switch_to_window(main_window.clone()).await {
        warn!("Failed to switch back to main window: {}", e);
    }
}

/// A browser tab holding one page
pub struct WebDriverPage {
    client: Client,
    main_window: WindowHandle,
    page_timeout: Duration,
    current_url: Option<String>,
    closed: bool,
}

impl WebDriverPage {
    async fn resource_count(&self) -> Result<u64, RenderError> {
        let value = self.client.execute(RESOURCE_COUNT_SCRIPT, vec![]).await
            .map_err(|e| RenderError::Evaluation {
                url: self.url_for_errors(),
                reason: e.to_string(),
            })?;
        Ok(value.as_u64().unwrap_or(0))
    }

    /// Waits until no new resource has been requested for a quiet window
    ///
    /// Mirrors a "network idle" load policy. Gives up silently when the page
    /// keeps loading past the page timeout; the caller's own timeout is the
    /// hard bound.
    async fn wait_for_network_idle(&self) -> Result<(), RenderError> {
        let deadline = Instant::now() + self.page_timeout;
        let mut last_count = self.resource_count().await?;
        let mut quiet_since = Instant::now();

        loop {
            if quiet_since.elapsed() >= NETWORK_IDLE_WINDOW {
                trace!("Network idle with {} resources loaded", last_count);
                return Ok(());
            }
            if Instant::now() >= deadline {
                warn!("Network never went idle on {}, continuing anyway", self.url_for_errors());
                return Ok(());
            }

            sleep(NETWORK_IDLE_POLL).await;

            let count = self.resource_count().await?;
            if count != last_count {
                trace!("Resource count changed {} -> {}", last_count, count);
                last_count = count;
                quiet_since = Instant::now();
            }
        }
    }

    fn url_for_errors(&self) -> String {
        self.current_url.clone().unwrap_or_else(|| "about:blank".to_string())
    }
}

#[async_trait]
impl RenderPage for WebDriverPage {
    async fn goto(&mut self, url: &str) -> Result<(), RenderError> {
        self.current_url = Some(url.to_string());

        debug!("Navigating to URL: {}", url);
        if let Err(e) = self.client.goto(url).await {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            });
        }

        debug!("Waiting for page body to load");
        if let Err(e) = self.client.wait()
            .at_most(self.page_timeout)
            .for_element(Locator::Css("body"))
            .await
        {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: format!("body never appeared: {}", e),
            });
        }

        self.wait_for_network_idle().await
    }

    async fn extract_links(&mut self) -> Result<Vec<RawLink>, RenderError> {
        let url = self.url_for_errors();
        trace!("Running link extractor on {}", url);

        let value = self.client.execute(LINK_EXTRACTOR_SCRIPT, vec![]).await
            .map_err(|e| RenderError::Evaluation { url: url.clone(), reason: e.to_string() })?;

        let links = decode_links(value)
            .map_err(|reason| RenderError::Evaluation { url: url.clone(), reason })?;
        debug!("Extracted {} raw links from {}", links.len(), url);
        Ok(links)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        trace!("Closing tab for {}", self.url_for_errors());
        let closed = self.client.close_window().await
            .map_err(|e| RenderError::Page(format!("Failed to close tab: {}", e)));

        // Always try to get back to the main window, even if closing failed
        self.client.switch_to_window(self.main_window.clone()).await
            .map_err(|e| RenderError::Page(format!("Failed to switch back to main window: {}", e)))?;

        closed
    }
}
