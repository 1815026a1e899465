//! # Command Dispatch Plugin
//!
//! Relays alerts to external executables. For each inbound event the plugin
//! resolves its configured dispatch targets, renders each target's command
//! line and optional input against the alert attributes, and runs the
//! command under a deadline. Targets are independent: a spawn failure,
//! stderr output, or timeout kill in one target is logged and never stops
//! the others.

mod resolver;

pub use resolver::{DispatchTarget, read_timeout, resolve_targets};

use crate::{
    config::PluginSection,
    models::AlertEvent,
    plugins::{error::PluginError, exec, template, traits::Plugin},
};

/// Marker value of the alert-time-period "down" state.
///
/// The downtime short-circuit compares the alert identifier against the
/// time-period state and skips dispatch only when both carry this marker.
/// These are different value domains, so the comparison is unlikely to ever
/// hold naturally; the behavior is preserved as inherited. See DESIGN.md.
const DOWN_STATE: &str = "down";

/// Plugin that executes configured external commands for each alert.
pub struct DispatchPlugin {
    section: Option<PluginSection>,
}

impl DispatchPlugin {
    /// Kind name, matching the plugin's configuration section.
    pub const NAME: &'static str = "dispatch";

    /// Creates the plugin with its configuration section, if one exists.
    pub fn new(section: Option<PluginSection>) -> Self {
        Self { section }
    }

    async fn run_target(
        &self,
        target: &DispatchTarget,
        plugin_timeout: Option<std::time::Duration>,
        event: &AlertEvent,
    ) -> Result<(), PluginError> {
        let argv = template::render_argv(&target.command, event);
        let input = target
            .input
            .as_deref()
            .map(|tmpl| template::render(tmpl, event));
        // Plugin-wide timeout wins over the target's own.
        let limit = plugin_timeout.or(target.timeout);

        let result = exec::run_command(&argv, input.as_deref(), limit).await?;
        exec::report(Self::NAME, &target.label(), &result);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Plugin for DispatchPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, event: &AlertEvent) -> Result<(), PluginError> {
        let section = self
            .section
            .as_ref()
            .ok_or_else(|| PluginError::NotConfigured(Self::NAME.to_string()))?;

        if let Some(field) = event.missing_required() {
            return Err(PluginError::MissingRequiredField(field));
        }

        if in_downtime(event) {
            tracing::info!(
                alert = %event.alert,
                "alert falls inside a scheduled downtime window, skipping dispatch"
            );
            return Ok(());
        }

        let plugin_timeout = resolver::read_timeout(section, "timeout")?;
        let targets = resolve_targets(section)?;
        tracing::debug!(count = targets.len(), "resolved dispatch targets");

        for target in &targets {
            if let Err(error) = self.run_target(target, plugin_timeout, event).await {
                tracing::error!(
                    label = %target.label(),
                    %error,
                    "dispatch target failed"
                );
            }
        }
        Ok(())
    }
}

/// Downtime short-circuit policy: skip only on an exact match of the alert
/// identifier and the time-period state, both denoting the down state.
fn in_downtime(event: &AlertEvent) -> bool {
    event.alert == event.alert_time_period_state && event.alert == DOWN_STATE
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_helpers::{EventBuilder, section_from_json};

    fn plugin(section: serde_json::Value) -> DispatchPlugin {
        DispatchPlugin::new(Some(section_from_json(section)))
    }

    #[tokio::test]
    async fn missing_section_is_not_configured() {
        let plugin = DispatchPlugin::new(None);
        let event = EventBuilder::new().build();

        let error = plugin.run(&event).await.unwrap_err();
        assert!(matches!(error, PluginError::NotConfigured(name) if name == "dispatch"));
    }

    #[tokio::test]
    async fn missing_required_attribute_names_the_field() {
        let plugin = plugin(json!({ "command": "/bin/true" }));
        let event = EventBuilder::new().status("").build();

        let error = plugin.run(&event).await.unwrap_err();
        assert!(matches!(error, PluginError::MissingRequiredField("status")));
    }

    #[tokio::test]
    async fn downtime_short_circuit_skips_resolution_entirely() {
        // The section is deliberately broken; the downtime check must fire
        // before targets are resolved.
        let plugin = plugin(json!({ "command": ["broken"] }));
        let event = EventBuilder::new()
            .alert("down")
            .alert_time_period_state("down")
            .build();

        assert!(plugin.run(&event).await.is_ok());
    }

    #[tokio::test]
    async fn non_matching_downtime_state_proceeds_to_dispatch() {
        let plugin = plugin(json!({ "command": ["broken"] }));

        // Same value but not the down marker: no skip.
        let event = EventBuilder::new()
            .alert("abc123")
            .alert_time_period_state("abc123")
            .build();
        assert!(plugin.run(&event).await.is_err());

        // Down marker on one side only: no skip.
        let event = EventBuilder::new()
            .alert("down")
            .alert_time_period_state("up")
            .build();
        assert!(plugin.run(&event).await.is_err());
    }

    #[test]
    fn downtime_policy_matrix() {
        let case = |alert: &str, state: &str| {
            in_downtime(
                &EventBuilder::new()
                    .alert(alert)
                    .alert_time_period_state(state)
                    .build(),
            )
        };
        assert!(case("down", "down"));
        assert!(!case("down", ""));
        assert!(!case("", "down"));
        assert!(!case("up", "up"));
        assert!(!case("alert-9", "down"));
    }

    #[tokio::test]
    async fn a_failing_target_does_not_stop_its_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let marker_str = marker.to_str().unwrap();

        let plugin = plugin(json!({
            "command1": "/no/such/binary {status}",
            "command2": format!("/bin/touch {marker_str}"),
        }));
        let event = EventBuilder::new().build();

        plugin.run(&event).await.unwrap();
        assert!(marker.exists(), "second target must run despite the first failing");
    }

    #[tokio::test]
    async fn rendered_input_reaches_the_process() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("sink");
        let sink_str = sink.to_str().unwrap();

        let plugin = plugin(json!({
            "command": format!("/usr/bin/tee {sink_str}"),
            "input": ["Device: {device_hostname}", "State: {status}"],
        }));
        let event = EventBuilder::new()
            .device_hostname("srv1")
            .status("CRITICAL")
            .build();

        plugin.run(&event).await.unwrap();
        let written = std::fs::read_to_string(&sink).unwrap();
        assert_eq!(written, "Device: srv1\nState: CRITICAL");
    }

    #[tokio::test]
    async fn plugin_wide_timeout_overrides_target_timeout() {
        let started = std::time::Instant::now();
        let plugin = plugin(json!({
            "command5": "/bin/sleep 30",
            "timeout5": 600,
            "timeout": 1,
        }));
        let event = EventBuilder::new().build();

        plugin.run(&event).await.unwrap();
        assert!(
            started.elapsed() < std::time::Duration::from_secs(10),
            "plugin-wide timeout must win over the per-target value"
        );
    }
}
