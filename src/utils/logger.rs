use anyhow::{Context, Result};
use std::path::Path;
use std::fs;
use std::sync::Mutex;
use chrono::Local;
use tracing::info;
use tracing_subscriber::{FmtSubscriber, EnvFilter};

/// Installs the global tracing subscriber
///
/// With a `log_dir`, output goes to a timestamped file in that directory,
/// otherwise to stderr. `RUST_LOG` controls the filter and defaults to `info`.
pub fn init_logger(log_dir: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(log_dir) => {
            // Create log directory if it doesn't exist
            if !Path::new(log_dir).exists() {
                fs::create_dir_all(log_dir)
                    .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
            }

            let log_file = log_file_path(log_dir);
            let file = fs::File::create(&log_file)
                .with_context(|| format!("Failed to create log file: {}", log_file))?;

            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    info!("Logger initialized");
    Ok(())
}

fn log_file_path(log_dir: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("{}/sitemapper_{}.log", log_dir, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let path = log_file_path("logs");
        assert!(path.starts_with("logs/sitemapper_"));
        assert!(path.ends_with(".log"));
        // logs/sitemapper_YYYYmmdd_HHMMSS.log
        assert_eq!(path.len(), "logs/sitemapper_".len() + 15 + ".log".len());
    }
}
