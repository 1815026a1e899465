use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::PluginSection;

/// Application configuration for Herald.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Plugin kinds to run for each inbound event, in order.
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Per-plugin configuration sections, keyed by plugin kind.
    #[serde(flatten)]
    pub sections: HashMap<String, PluginSection>,
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("HERALD").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Returns the configuration section for a plugin kind, if one exists.
    pub fn section(&self, kind: &str) -> Option<&PluginSection> {
        self.sections.get(kind)
    }
}

/// Configuration for the callback HTTP server.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address and port for the HTTP server to listen on.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Route path the alert source delivers callbacks to.
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            callback_path: default_callback_path(),
        }
    }
}

/// Provides the default value for listen_address.
fn default_listen_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Provides the default value for callback_path.
fn default_callback_path() -> String {
    "/event".to_string()
}
