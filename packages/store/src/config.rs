//! # Client configuration: `postwall.toml`
//!
//! Defines the TOML configuration file read by the native shells at startup
//! (filename: [`ClientConfig::filename`] = `"postwall.toml"`). It tells the
//! client where the REST API lives and how large each feed page is.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3000"
//! timeout_secs = 30
//!
//! [feed]
//! page_size = 10
//! comments_page_size = 10
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ClientConfig`] | Top-level config. Builder helpers (`new`, `with_page_size`), TOML (de)serialisation, and the canonical filename. |
//! | [`ApiConfig`] | REST endpoint base URL and request timeout. |
//! | [`FeedConfig`] | Page sizes for the post feed and comment lists. |
//!
//! All structs derive `Default` (with the production defaults) so that a
//! missing or empty config file is equivalent to the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `postwall.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

/// REST API connection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. 0 disables the timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Pagination settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page_size")]
    pub comments_page_size: u32,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            comments_page_size: default_page_size(),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at the given API base URL.
    pub fn new(base_url: String) -> Self {
        Self {
            api: ApiConfig {
                base_url,
                ..ApiConfig::default()
            },
            feed: FeedConfig::default(),
        }
    }

    /// Builder method to set the feed page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.feed.page_size = page_size;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "postwall.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.feed.page_size, 10);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            [api]
            base_url = "https://posts.example.com"

            [feed]
            page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://posts.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.feed.page_size, 25);
        assert_eq!(config.feed.comments_page_size, 10);
    }

    #[test]
    fn test_builder_survives_toml() {
        let config = ClientConfig::new("http://10.0.0.2:80".to_string()).with_page_size(5);
        let text = config.to_toml().unwrap();
        assert!(text.contains("page_size = 5"));
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }
}
