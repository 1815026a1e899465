//! A set of helpers for testing

use config::Config;

use crate::{
    config::{AppConfig, PluginSection},
    models::AlertEvent,
};

/// A builder for constructing [`AlertEvent`] instances in tests.
///
/// Defaults carry the required attributes so a freshly built event passes
/// validation; individual attributes can be overridden or cleared.
pub struct EventBuilder {
    event: AlertEvent,
}

impl EventBuilder {
    /// Creates a builder whose event has all required attributes set.
    pub fn new() -> Self {
        Self {
            event: AlertEvent {
                time: "2026-01-01T00:00:00+00:00".to_string(),
                alert: "alert-1".to_string(),
                status: "CRITICAL".to_string(),
                monitor: "mon-1".to_string(),
                organisation: String::new(),
                alert_time_period_state: String::new(),
                device: "dev-1".to_string(),
                device_hostname: String::new(),
                monitor_name: String::new(),
                monitor_type: String::new(),
            },
        }
    }

    /// Sets the `time` attribute.
    pub fn time(mut self, value: &str) -> Self {
        self.event.time = value.to_string();
        self
    }

    /// Sets the `alert` attribute.
    pub fn alert(mut self, value: &str) -> Self {
        self.event.alert = value.to_string();
        self
    }

    /// Sets the `status` attribute.
    pub fn status(mut self, value: &str) -> Self {
        self.event.status = value.to_string();
        self
    }

    /// Sets the `monitor` attribute.
    pub fn monitor(mut self, value: &str) -> Self {
        self.event.monitor = value.to_string();
        self
    }

    /// Sets the `organisation` attribute.
    pub fn organisation(mut self, value: &str) -> Self {
        self.event.organisation = value.to_string();
        self
    }

    /// Sets the `alert_time_period_state` attribute.
    pub fn alert_time_period_state(mut self, value: &str) -> Self {
        self.event.alert_time_period_state = value.to_string();
        self
    }

    /// Sets the `device` attribute.
    pub fn device(mut self, value: &str) -> Self {
        self.event.device = value.to_string();
        self
    }

    /// Sets the `device_hostname` attribute.
    pub fn device_hostname(mut self, value: &str) -> Self {
        self.event.device_hostname = value.to_string();
        self
    }

    /// Sets the `monitor_name` attribute.
    pub fn monitor_name(mut self, value: &str) -> Self {
        self.event.monitor_name = value.to_string();
        self
    }

    /// Sets the `monitor_type` attribute.
    pub fn monitor_type(mut self, value: &str) -> Self {
        self.event.monitor_type = value.to_string();
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> AlertEvent {
        self.event
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a [`PluginSection`] from a JSON table literal.
pub fn section_from_json(value: serde_json::Value) -> PluginSection {
    serde_json::from_value(value).expect("section literal must be a table")
}

/// Parses an [`AppConfig`] from an inline YAML document.
pub fn config_from_yaml(yaml: &str) -> AppConfig {
    Config::builder()
        .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
        .build()
        .expect("test YAML must be valid")
        .try_deserialize()
        .expect("test YAML must deserialize")
}
