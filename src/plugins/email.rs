//! E-mail delivery over SMTP.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};

use crate::{
    config::PluginSection,
    models::AlertEvent,
    plugins::{error::PluginError, template, traits::Plugin},
};

/// Body used when the section carries no `body` template, modeled on the
/// alert letter the upstream dispatch tooling sent.
const DEFAULT_BODY: &str = "Alert notification\n\n\
    Device name: {device_hostname}\n\
    Monitor name: {monitor_name}\n\
    State: {status}\n\
    Time: {time}\n\n\
    Alert time period state: {alert_time_period_state}\n";

/// Subject used when the section carries no `subject` template.
const DEFAULT_SUBJECT: &str = "Alert: {monitor_name} on {device_hostname} is {status}";

/// Plugin that relays alerts by e-mail.
///
/// Section keys: `smtp_host` (default `localhost`), `smtp_port` (default
/// 25), `from`, `to` (list or comma-separated), optional `reply_to`,
/// optional `username`/`password` for SMTP auth, optional `subject` and
/// `body` templates.
pub struct EmailPlugin {
    section: Option<PluginSection>,
}

impl EmailPlugin {
    /// Kind name, matching the plugin's configuration section.
    pub const NAME: &'static str = "email";

    /// Creates the plugin with its configuration section, if one exists.
    pub fn new(section: Option<PluginSection>) -> Self {
        Self { section }
    }
}

/// Renders the subject and body for one event, falling back to the default
/// templates when the section does not override them.
pub fn render_message(section: &PluginSection, event: &AlertEvent) -> (String, String) {
    let subject_tmpl = section
        .get_str("subject")
        .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
    let body_tmpl = section
        .get_str("body")
        .unwrap_or_else(|| DEFAULT_BODY.to_string());
    (
        template::render(&subject_tmpl, event),
        template::render(&body_tmpl, event),
    )
}

#[async_trait::async_trait]
impl Plugin for EmailPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, event: &AlertEvent) -> Result<(), PluginError> {
        let section = self
            .section
            .as_ref()
            .ok_or_else(|| PluginError::NotConfigured(Self::NAME.to_string()))?;

        let from = section.get_str("from").ok_or_else(|| PluginError::InvalidValue {
            key: "from".to_string(),
            reason: "a sender address is required".to_string(),
        })?;
        let recipients = section
            .get_str_list("to")
            .filter(|list| !list.is_empty())
            .ok_or_else(|| PluginError::InvalidValue {
                key: "to".to_string(),
                reason: "at least one recipient address is required".to_string(),
            })?;

        let (subject, body) = render_message(section, event);

        let mut builder = Message::builder()
            .from(from.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        if let Some(reply_to) = section.get_str("reply_to") {
            builder = builder.reply_to(reply_to.parse()?);
        }
        for recipient in &recipients {
            builder = builder.to(recipient.parse()?);
        }
        let message = builder.body(body)?;

        let host = section
            .get_str("smtp_host")
            .unwrap_or_else(|| "localhost".to_string());
        let port = match section.get_str("smtp_port") {
            Some(raw) => raw.parse().map_err(|_| PluginError::InvalidValue {
                key: "smtp_port".to_string(),
                reason: format!("'{raw}' is not a port number"),
            })?,
            None => 25,
        };

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host.as_str()).port(port);
        if let (Some(username), Some(password)) =
            (section.get_str("username"), section.get_str("password"))
        {
            transport_builder =
                transport_builder.credentials(Credentials::new(username, password));
        }
        let transport: AsyncSmtpTransport<Tokio1Executor> = transport_builder.build();

        tracing::debug!(to = ?recipients, "sending alert e-mail");
        transport.send(message).await?;
        tracing::debug!(to = ?recipients, "alert e-mail accepted by relay");
        Ok(())
    }
}
