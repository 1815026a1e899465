use crate::{models::AlertEvent, plugins::error::PluginError};

/// A delivery channel that relays one inbound alert event.
///
/// Implementations are constructed once at startup with their own
/// configuration section and run once per inbound event. A plugin's failure
/// must never affect its siblings; the registry catches and logs every error
/// at this boundary.
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
    /// The plugin's kind name, matching its configuration section.
    fn name(&self) -> &str;

    /// Relays the given alert event through this plugin's channel.
    async fn run(&self, event: &AlertEvent) -> Result<(), PluginError>;
}
