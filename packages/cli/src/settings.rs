use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat, Map};
use store::ClientConfig;

/// Layered client settings: built-in defaults, then `postwall.toml` (or the
/// file given on the command line), then `POSTWALL_*` environment variables.
///
/// Nested keys use a double underscore, e.g. `POSTWALL_API__BASE_URL` or
/// `POSTWALL_FEED__PAGE_SIZE`.
pub struct Settings;

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<ClientConfig, ConfigError> {
        Self::load_with_env(file, None)
    }

    /// Like [`load`](Self::load), reading environment variables from `env`
    /// instead of the process environment when it is given.
    fn load_with_env(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<ClientConfig, ConfigError> {
        let defaults = ClientConfig::default();
        let source = match file {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::with_name(ClientConfig::filename())
                .format(FileFormat::Toml)
                .required(false),
        };

        let config = Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs as i64)?
            .set_default("feed.page_size", i64::from(defaults.feed.page_size))?
            .set_default("feed.comments_page_size", i64::from(defaults.feed.comments_page_size))?
            .add_source(source)
            .add_source(
                Environment::with_prefix("POSTWALL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        config.try_deserialize()
    }
}
