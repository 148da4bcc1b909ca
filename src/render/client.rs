use fantoccini::{Client, ClientBuilder};
use tracing::{error, debug, trace, warn};

use crate::error::RenderError;
use crate::render::config;

/// Creates a new WebDriver client with the specified configuration
///
/// Sets up a Chrome browser instance tuned for rendering pages and reading
/// their links.
///
/// # Arguments
/// * `webdriver_url` - WebDriver server URL
/// * `viewport_size` - Browser window dimensions
/// * `headless` - Whether to run in headless mode
///
/// # Returns
/// * `Result<Client, RenderError>` - A configured WebDriver client or a launch error
pub async fn create_client(
    webdriver_url: &str,
    viewport_size: (u32, u32),
    headless: bool,
) -> Result<Client, RenderError> {
    trace!("Creating new WebDriver client connecting to {}", webdriver_url);
    let mut caps = serde_json::map::Map::new();
    let mut chrome_opts = serde_json::map::Map::new();

    debug!("Configuring Chrome options with headless={}", headless);
    let args = config::chrome_arguments(headless, viewport_size);

    trace!("Setting Chrome arguments: {:?}", args);
    chrome_opts.insert("args".to_string(), serde_json::Value::Array(
        args.into_iter().map(serde_json::Value::String).collect()
    ));
    chrome_opts.insert("prefs".to_string(), serde_json::Value::Object(config::chrome_preferences()));

    caps.insert("goog:chromeOptions".to_string(), serde_json::Value::Object(chrome_opts));

    debug!("Connecting to WebDriver at {}", webdriver_url);
    let client = match ClientBuilder::native()
        .capabilities(caps)
        .connect(webdriver_url)
        .await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
                return Err(RenderError::Launch(format!(
                    "Failed to connect to WebDriver at {}: {}", webdriver_url, e
                )));
            }
        };

    let (width, height) = viewport_size;
    debug!("Setting viewport size to {}x{}", width, height);
    if let Err(e) = client.set_window_size(width, height).await {
        // Not critical, the window keeps its default size
        warn!("Failed to set window size to {}x{}: {}", width, height, e);
    }

    trace!("Successfully created WebDriver client");
    Ok(client)
}
