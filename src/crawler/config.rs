use std::time::Duration;

use crate::render::config::{DEFAULT_VIEWPORT, DEFAULT_WEBDRIVER_URL};

// Constants for crawler configuration
pub const DEFAULT_WAIT_MS: u64 = 1500;
pub const DEFAULT_LIMIT: usize = 99999;
pub const DEFAULT_PAGE_TIMEOUT: u64 = 30; // seconds

/// Configuration for a crawl session
///
/// Controls how long each page is given to settle, how many pages are
/// visited at most, and how the browser is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlerConfig {
    // Crawl behavior
    pub wait: Duration,
    pub limit: usize,
    pub page_timeout: Duration,

    // Browser configuration
    pub webdriver_url: String,
    pub headless: bool,
    pub viewport_size: (u32, u32),
}

impl CrawlerConfig {
    /// Creates a new crawler configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the extra delay applied after the network goes idle
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Sets the maximum number of URLs to visit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the upper bound for a single render attempt
    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    /// Sets the WebDriver server URL
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    /// Sets whether the browser runs without a visible window
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets the browser window size
    pub fn with_viewport_size(mut self, width: u32, height: u32) -> Self {
        self.viewport_size = (width, height);
        self
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            wait: Duration::from_millis(DEFAULT_WAIT_MS),
            limit: DEFAULT_LIMIT,
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            viewport_size: DEFAULT_VIEWPORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.wait, Duration::from_millis(1500));
        assert_eq!(config.limit, 99999);
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(config.headless);
    }

    #[test]
    fn test_config_builder() {
        let config = CrawlerConfig::new()
            .with_wait(Duration::from_millis(250))
            .with_limit(10)
            .with_page_timeout(Duration::from_secs(5))
            .with_webdriver_url("http://127.0.0.1:9515")
            .with_headless(false)
            .with_viewport_size(800, 600);

        assert_eq!(config.wait, Duration::from_millis(250));
        assert_eq!(config.limit, 10);
        assert_eq!(config.page_timeout, Duration::from_secs(5));
        assert_eq!(config.webdriver_url, "http://127.0.0.1:9515");
        assert!(!config.headless);
        assert_eq!(config.viewport_size, (800, 600));
    }
}
