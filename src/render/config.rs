use std::time::Duration;

// Network idle detection
pub const NETWORK_IDLE_WINDOW: Duration = Duration::from_millis(500);  // No new requests for this long counts as idle
pub const NETWORK_IDLE_POLL: Duration = Duration::from_millis(100);    // How often resource counts are sampled

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 800);

// Chrome browser arguments
pub fn chrome_arguments(headless: bool, viewport_size: (u32, u32)) -> Vec<String> {
    let window_size = format!("--window-size={},{}", viewport_size.0, viewport_size.1);
    vec![
        "--no-sandbox",
        "--disable-gpu",
        "--disable-dev-shm-usage",
        "--disable-extensions",
        "--disable-notifications",
        "--disable-infobars",
        "--disable-popup-blocking",
        "--disable-background-timer-throttling",
        "--disable-backgrounding-occluded-windows",
        "--disable-breakpad",
        "--disable-renderer-backgrounding",
        "--mute-audio",
        window_size.as_str(),
        if headless { "--headless=new" } else { "" }
    ].into_iter()
    .filter(|s| !s.is_empty())
    .map(String::from)
    .collect()
}

// Chrome content settings preferences
pub fn chrome_preferences() -> serde_json::Map<String, serde_json::Value> {
    let mut prefs = serde_json::Map::new();
    prefs.insert("profile.default_content_setting_values.images".to_string(), 2.into()); // 2 = block, links don't need them
    prefs.insert("profile.managed_default_content_settings.javascript".to_string(), 1.into()); // 1 = allow
    prefs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_flag() {
        let args = chrome_arguments(true, DEFAULT_VIEWPORT);
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--window-size=1280,800".to_string()));

        let args = chrome_arguments(false, (800, 600));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert!(args.contains(&"--window-size=800,600".to_string()));
        assert!(args.iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn test_preferences_block_images_and_allow_javascript() {
        let prefs = chrome_preferences();
        assert_eq!(prefs.len(), 2);
        assert_eq!(prefs["profile.managed_default_content_settings.javascript"], 1);
        assert_eq!(prefs["profile.default_content_setting_values.images"], 2);
    }
}
