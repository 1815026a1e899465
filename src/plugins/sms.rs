//! SMS/pager delivery through a local gateway command.
//!
//! The message is rendered from a short template and piped to a configured
//! gateway binary (a gammu or smstools inject command, typically) through
//! the same timed executor the dispatch plugin uses, so timeout kills and
//! stderr reporting behave identically.

use crate::{
    config::PluginSection,
    models::AlertEvent,
    plugins::{dispatch::read_timeout, error::PluginError, exec, template, traits::Plugin},
};

/// Body used when the section carries no `body` template; the short pager
/// letter from the upstream dispatch tooling.
const DEFAULT_BODY: &str = "Alert notification\n\n\
    Device name: {device_hostname}\n\
    Monitor name: {monitor_name}\n\
    State: {status}\n\
    Time: {time}\n";

/// Single-SMS payload limit; longer messages are left to the gateway to
/// split into concatenated parts.
const SINGLE_SMS_LEN: usize = 160;

/// Plugin that relays alerts through an SMS gateway command.
///
/// Section keys: `command` (gateway argument template, required), optional
/// `body` message template, optional `timeout` in seconds.
pub struct SmsPlugin {
    section: Option<PluginSection>,
}

impl SmsPlugin {
    /// Kind name, matching the plugin's configuration section.
    pub const NAME: &'static str = "sms";

    /// Creates the plugin with its configuration section, if one exists.
    pub fn new(section: Option<PluginSection>) -> Self {
        Self { section }
    }
}

#[async_trait::async_trait]
impl Plugin for SmsPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, event: &AlertEvent) -> Result<(), PluginError> {
        let section = self
            .section
            .as_ref()
            .ok_or_else(|| PluginError::NotConfigured(Self::NAME.to_string()))?;

        let command = section.get_str("command").ok_or_else(|| PluginError::InvalidValue {
            key: "command".to_string(),
            reason: "a gateway command template is required".to_string(),
        })?;
        let body_tmpl = section
            .get_str("body")
            .unwrap_or_else(|| DEFAULT_BODY.to_string());
        let limit = read_timeout(section, "timeout")?;

        let message = template::render(&body_tmpl, event);
        if message.len() > SINGLE_SMS_LEN {
            tracing::debug!(
                length = message.len(),
                "message exceeds a single SMS, gateway will send concatenated parts"
            );
        }

        let argv = template::render_argv(&command, event);
        let result = exec::run_command(&argv, Some(&message), limit).await?;
        exec::report(Self::NAME, "command", &result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_helpers::{EventBuilder, section_from_json};

    #[tokio::test]
    async fn pipes_the_rendered_message_to_the_gateway_command() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("sms");
        let sink_str = sink.to_str().unwrap();

        let plugin = SmsPlugin::new(Some(section_from_json(json!({
            "command": format!("/usr/bin/tee {sink_str}"),
            "body": "{monitor_name} is {status}",
        }))));
        let event = EventBuilder::new()
            .monitor_name("ping")
            .status("down")
            .build();

        plugin.run(&event).await.unwrap();
        assert_eq!(std::fs::read_to_string(&sink).unwrap(), "ping is down");
    }

    #[tokio::test]
    async fn missing_gateway_command_is_a_configuration_error() {
        let plugin = SmsPlugin::new(Some(section_from_json(json!({}))));
        let event = EventBuilder::new().build();

        let error = plugin.run(&event).await.unwrap_err();
        assert!(matches!(error, PluginError::InvalidValue { key, .. } if key == "command"));
    }

    #[tokio::test]
    async fn missing_section_is_not_configured() {
        let plugin = SmsPlugin::new(None);
        let event = EventBuilder::new().build();

        let error = plugin.run(&event).await.unwrap_err();
        assert!(matches!(error, PluginError::NotConfigured(name) if name == "sms"));
    }
}
