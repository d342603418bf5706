//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.
//! The segmentation thresholds are empirically tuned defaults; the
//! environment can override them without a rebuild.

use dotenv::dotenv;
use std::env;

use crate::error::Result;
use crate::segment::SegmentOptions;

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Segmentation thresholds and abbreviation list
    pub segment: SegmentOptions,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            segment: SegmentOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[allow(clippy::unnecessary_wraps)] // Returns Result for forward-compatible API
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Some(n) = env_usize("LYRICTEXT_MAX_NAIVE_LINES") {
            config.segment.max_naive_lines = n;
        }
        if let Some(n) = env_usize("LYRICTEXT_RESEG_MIN_LEN") {
            config.segment.reseg_min_len = n;
        }
        if let Some(n) = env_usize("LYRICTEXT_UNBROKEN_LINE_LEN") {
            config.segment.unbroken_line_len = n;
        }

        // Comma-separated abbreviation list replaces the default wholesale
        if let Ok(list) = env::var("LYRICTEXT_ABBREVIATIONS") {
            config.segment.abbreviations = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }
}

/// Read a usize environment variable, ignoring unset or unparseable values.
fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_thresholds_match_tuned_values() {
        let config = Config::default();
        assert_eq!(config.segment.max_naive_lines, 3);
        assert_eq!(config.segment.reseg_min_len, 200);
        assert_eq!(config.segment.unbroken_line_len, 100);
        assert!(config.segment.abbreviations.iter().any(|a| a == "Dr"));
    }

    #[test]
    fn app_identity_comes_from_cargo() {
        let config = Config::default();
        assert_eq!(config.app_name(), "lyrictext");
        assert!(!config.app_version().is_empty());
    }
}
