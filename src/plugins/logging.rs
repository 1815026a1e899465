use crate::{
    config::PluginSection,
    models::{ATTRIBUTE_NAMES, AlertEvent},
    plugins::{error::PluginError, traits::Plugin},
};

/// Plugin that simply records each inbound event in the log.
pub struct LogPlugin {
    section: Option<PluginSection>,
}

impl LogPlugin {
    /// Kind name, matching the plugin's configuration section.
    pub const NAME: &'static str = "log";

    /// Creates the plugin with its configuration section, if one exists.
    pub fn new(section: Option<PluginSection>) -> Self {
        Self { section }
    }
}

#[async_trait::async_trait]
impl Plugin for LogPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, event: &AlertEvent) -> Result<(), PluginError> {
        if self.section.is_none() {
            return Err(PluginError::NotConfigured(Self::NAME.to_string()));
        }

        let present: Vec<&str> = ATTRIBUTE_NAMES
            .into_iter()
            .filter(|name| event.attribute(name).is_some_and(|v| !v.is_empty()))
            .collect();
        tracing::info!(attributes = ?present, "alert event received");
        tracing::debug!(?event, "alert event attributes");
        Ok(())
    }
}
