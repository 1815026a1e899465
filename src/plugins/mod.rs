//! # Plugin Registry
//!
//! This module fans inbound alert events out to the configured delivery
//! channels. It acts as the central hub for relaying alerts when the
//! callback endpoint receives a notification.
//!
//! ## Core Components
//!
//! - **`PluginRegistry`**: holds the plugins built from the application
//!   configuration and runs each of them for every inbound event.
//! - **`Plugin` Trait**: a generic interface for all delivery channels,
//!   allowing a unified dispatch mechanism.
//!
//! ## Workflow
//!
//! 1. The registry is built at startup from the configuration's `plugins`
//!    list; each named kind is constructed with its own configuration
//!    section. Unknown kinds fail startup.
//! 2. For each inbound event, every plugin runs in turn. Failures are
//!    caught and logged at this boundary, so one misbehaving plugin never
//!    affects its siblings or the event-handling loop.

use crate::{config::AppConfig, models::AlertEvent};

pub mod dispatch;
pub mod error;
pub mod exec;
pub mod template;
mod traits;

mod email;
mod logging;
mod sms;

pub use email::EmailPlugin;
pub use logging::LogPlugin;
pub use sms::SmsPlugin;
pub use traits::Plugin;

use dispatch::DispatchPlugin;
use error::PluginError;

/// The set of delivery channels to run for each inbound alert event.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    /// Builds the registry from the application configuration.
    ///
    /// Each entry of the `plugins` list is matched against the statically
    /// known kinds and constructed with its configuration section. A kind
    /// without a section is still constructed; it reports `NotConfigured`
    /// when run, without affecting other plugins.
    pub fn from_config(config: &AppConfig) -> Result<Self, PluginError> {
        let mut plugins: Vec<Box<dyn Plugin>> = Vec::with_capacity(config.plugins.len());
        for kind in &config.plugins {
            let section = config.section(kind).cloned();
            let plugin: Box<dyn Plugin> = match kind.as_str() {
                DispatchPlugin::NAME => Box::new(DispatchPlugin::new(section)),
                LogPlugin::NAME => Box::new(LogPlugin::new(section)),
                EmailPlugin::NAME => Box::new(EmailPlugin::new(section)),
                SmsPlugin::NAME => Box::new(SmsPlugin::new(section)),
                other => return Err(PluginError::UnknownKind(other.to_string())),
            };
            tracing::debug!(plugin = kind, "registered plugin");
            plugins.push(plugin);
        }
        Ok(Self { plugins })
    }

    /// Runs every registered plugin for one inbound event.
    ///
    /// Plugin failures are logged and swallowed here; an error in one
    /// plugin never prevents the remaining plugins from running.
    pub async fn handle_event(&self, event: &AlertEvent) {
        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), "running plugin");
            if let Err(error) = plugin.run(event).await {
                tracing::error!(plugin = plugin.name(), %error, "plugin failed");
            }
        }
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// True when no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
