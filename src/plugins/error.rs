//! Error types for the plugin layer.

use thiserror::Error;

use crate::plugins::exec::ExecError;

/// Defines the failures that can occur while building or running a plugin.
///
/// Every variant is caught and logged at the plugin-invocation boundary; no
/// plugin failure propagates to sibling plugins handling the same event.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin's configuration section is missing entirely. Fatal for the
    /// invocation; a user-visible misconfiguration.
    #[error("plugin '{0}' has no configuration section")]
    NotConfigured(String),

    /// A required alert attribute is absent or empty.
    #[error("required alert attribute '{0}' is missing or empty")]
    MissingRequiredField(&'static str),

    /// A configuration key is present but its value cannot be used.
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue {
        /// The offending configuration key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The `plugins` list names a kind that is not registered.
    #[error("unknown plugin kind '{0}'")]
    UnknownKind(String),

    /// A dispatch target failed to spawn or to complete its I/O.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// An e-mail address in the plugin configuration failed to parse.
    #[error("invalid e-mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The e-mail message could not be assembled.
    #[error("failed to build e-mail message: {0}")]
    EmailMessage(#[from] lettre::error::Error),

    /// The SMTP transport rejected or failed to deliver the message.
    #[error("smtp transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
