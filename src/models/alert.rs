//! This module defines the inbound alert event model.

use std::collections::HashMap;

use chrono::Utc;

/// Attribute names recognized in templates and exposed by [`AlertEvent::attribute`].
pub const ATTRIBUTE_NAMES: [&str; 10] = [
    "time",
    "alert",
    "status",
    "monitor",
    "organisation",
    "alert_time_period_state",
    "device",
    "device_hostname",
    "monitor_name",
    "monitor_type",
];

/// Attributes that must be present and non-empty before dispatching.
pub const REQUIRED_ATTRIBUTES: [&str; 3] = ["status", "monitor", "device"];

/// One inbound notification describing a monitored entity's state change.
///
/// Every attribute is a plain string; attributes absent from the callback
/// parameters default to the empty string. The `time` attribute is captured
/// once when the event is built and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertEvent {
    /// Timestamp captured at event receipt, RFC 3339.
    pub time: String,
    /// Identifier of the alert itself.
    pub alert: String,
    /// New state of the monitor (e.g. "up", "down").
    pub status: String,
    /// Identifier of the monitor that changed state.
    pub monitor: String,
    /// Organisation the monitored entity belongs to.
    pub organisation: String,
    /// State of the alert time period (downtime window marker).
    pub alert_time_period_state: String,
    /// Identifier of the device the monitor runs against.
    pub device: String,
    /// Hostname of the device.
    pub device_hostname: String,
    /// Human-readable monitor name.
    pub monitor_name: String,
    /// Monitor type (e.g. "passive_monitor").
    pub monitor_type: String,
}

impl AlertEvent {
    /// Builds an event from the raw callback parameters, capturing the
    /// receipt timestamp. Unknown parameters are ignored; missing ones
    /// default to the empty string.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| params.get(key).cloned().unwrap_or_default();
        Self {
            time: Utc::now().to_rfc3339(),
            alert: get("alert"),
            status: get("status"),
            monitor: get("monitor"),
            organisation: get("organisation"),
            alert_time_period_state: get("alert_time_period_state"),
            device: get("device"),
            device_hostname: get("device_hostname"),
            monitor_name: get("monitor_name"),
            monitor_type: get("monitor_type"),
        }
    }

    /// Looks up an attribute by its template name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let value = match name {
            "time" => &self.time,
            "alert" => &self.alert,
            "status" => &self.status,
            "monitor" => &self.monitor,
            "organisation" => &self.organisation,
            "alert_time_period_state" => &self.alert_time_period_state,
            "device" => &self.device,
            "device_hostname" => &self.device_hostname,
            "monitor_name" => &self.monitor_name,
            "monitor_type" => &self.monitor_type,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Returns the name of the first required attribute that is missing or
    /// empty, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        REQUIRED_ATTRIBUTES
            .iter()
            .find(|name| self.attribute(name).is_none_or(str::is_empty))
            .copied()
    }
}
