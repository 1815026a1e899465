//! Resolution of dispatch targets from a plugin configuration section.

use std::time::Duration;

use serde_json::Value;

use crate::{config::PluginSection, plugins::error::PluginError};

/// Configuration key prefix shared by all dispatch targets.
const COMMAND_PREFIX: &str = "command";

/// One configured external-command action, built fresh from configuration
/// for each inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTarget {
    /// Key suffix identifying the target (`""` for the legacy single-target
    /// form, `"2"` for `command2`, and so on).
    pub suffix: String,
    /// Whitespace-delimited argument template.
    pub command: String,
    /// Input template piped to the process's stdin when present.
    pub input: Option<String>,
    /// Per-target timeout; only consulted when no plugin-wide timeout exists.
    pub timeout: Option<Duration>,
}

impl DispatchTarget {
    /// Human-readable label for log lines.
    pub fn label(&self) -> String {
        format!("{COMMAND_PREFIX}{}", self.suffix)
    }
}

/// Enumerates every `command<suffix>` key in the section and pairs it with
/// its `input<suffix>` and `timeout<suffix>` counterparts.
///
/// Keys are sorted for stable log output; target order carries no meaning,
/// since targets are executed independently. At least one command key must
/// be present.
pub fn resolve_targets(section: &PluginSection) -> Result<Vec<DispatchTarget>, PluginError> {
    let mut command_keys: Vec<&str> = section
        .keys()
        .filter(|key| key.starts_with(COMMAND_PREFIX))
        .collect();
    command_keys.sort_unstable();

    let mut targets = Vec::with_capacity(command_keys.len());
    for key in command_keys {
        let suffix = &key[COMMAND_PREFIX.len()..];
        let command = section.get_str(key).ok_or_else(|| PluginError::InvalidValue {
            key: key.to_string(),
            reason: "expected a string command template".to_string(),
        })?;
        targets.push(DispatchTarget {
            suffix: suffix.to_string(),
            command,
            input: resolve_input(section, suffix)?,
            timeout: read_timeout(section, &format!("timeout{suffix}"))?,
        });
    }

    if targets.is_empty() {
        return Err(PluginError::InvalidValue {
            key: COMMAND_PREFIX.to_string(),
            reason: "at least one command template is required".to_string(),
        });
    }
    Ok(targets)
}

/// Reads an optional timeout key as whole seconds.
pub fn read_timeout(
    section: &PluginSection,
    key: &str,
) -> Result<Option<Duration>, PluginError> {
    let Some(raw) = section.get_str(key) else {
        tracing::debug!(key, "no timeout configured");
        return Ok(None);
    };
    let secs: u64 = raw.parse().map_err(|_| PluginError::InvalidValue {
        key: key.to_string(),
        reason: format!("'{raw}' is not a whole number of seconds"),
    })?;
    Ok(Some(Duration::from_secs(secs)))
}

/// Reads the optional input template for a target.
///
/// Accepts a native array of lines, or a string that is either a JSON array
/// of strings or a plain template. Array forms are joined with newlines
/// before any attribute substitution happens.
fn resolve_input(
    section: &PluginSection,
    suffix: &str,
) -> Result<Option<String>, PluginError> {
    let key = format!("input{suffix}");
    let Some(value) = section.value(&key) else {
        tracing::debug!(key = %key, "no input configured for dispatch target");
        return Ok(None);
    };
    match value {
        Value::Array(items) => {
            let lines: Vec<&str> = items
                .iter()
                .map(|item| {
                    item.as_str().ok_or_else(|| PluginError::InvalidValue {
                        key: key.clone(),
                        reason: "input arrays may only contain strings".to_string(),
                    })
                })
                .collect::<Result<_, _>>()?;
            Ok(Some(lines.join("\n")))
        }
        Value::String(s) => {
            // INI-era configurations carry JSON arrays as quoted strings.
            match serde_json::from_str::<Vec<String>>(s) {
                Ok(lines) => Ok(Some(lines.join("\n"))),
                Err(_) => Ok(Some(s.clone())),
            }
        }
        _ => Err(PluginError::InvalidValue {
            key,
            reason: "expected a string or an array of strings".to_string(),
        }),
    }
}
