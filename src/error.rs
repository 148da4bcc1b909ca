//! Error types for rendering pages and driving a crawl session
//!
//! Render errors come in two flavours: `Launch` is fatal for the whole
//! session, every other variant is scoped to a single URL and is recorded
//! rather than propagated.

use std::time::Duration;

/// Failures reported by the render collaborator
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The browser session could not be started
    #[error("Failed to launch browser session: {0}")]
    Launch(String),

    /// Navigation failed (DNS, refused connection, load timeout, ...)
    #[error("Failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// The render attempt exceeded the per-page timeout
    #[error("Timed out after {elapsed:?} while rendering {url}")]
    Timeout { url: String, elapsed: Duration },

    /// The in-page link extractor threw or returned something unexpected
    #[error("Failed to extract links from {url}: {reason}")]
    Evaluation { url: String, reason: String },

    /// Opening, closing or switching a page resource failed
    #[error("Page error: {0}")]
    Page(String),
}

/// Misuse of a crawl session or failure to acquire its browser
#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("Browser not initialized. Call init() first.")]
    NotInitialized,

    #[error("Cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One failed render attempt
#[derive(Debug)]
pub struct CrawlFailure {
    pub url: String,
    pub error: RenderError,
}

impl std::fmt::Display for CrawlFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.url, self.error)
    }
}
