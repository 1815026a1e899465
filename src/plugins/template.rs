//! `{name}`-style placeholder substitution against alert attributes.
//!
//! Templates use single-brace placeholders (`{status}`, `{device_hostname}`)
//! resolved against the fixed attribute set of an [`AlertEvent`]. A
//! placeholder naming an unknown attribute renders as the empty string,
//! mirroring the "default to empty" policy for missing alert fields, so
//! rendering never fails. Anything that does not scan as a placeholder (no
//! closing brace, non-identifier characters) passes through literally.

use crate::models::AlertEvent;

/// Renders a template string against the event's attributes.
pub fn render(template: &str, event: &AlertEvent) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder_name(&after[..close]) => {
                out.push_str(event.attribute(&after[..close]).unwrap_or(""));
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Renders a whitespace-delimited command template into an argument list.
///
/// The template is split into tokens *before* substitution, so a substituted
/// value containing spaces still occupies exactly one argument slot. No
/// shell is involved at any point.
pub fn render_argv(command_template: &str, event: &AlertEvent) -> Vec<String> {
    command_template
        .split_whitespace()
        .map(|token| render(token, event))
        .collect()
}

fn is_placeholder_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::EventBuilder;

    #[test]
    fn render_substitutes_known_attributes() {
        let event = EventBuilder::new()
            .device_hostname("srv1")
            .status("CRITICAL")
            .build();

        assert_eq!(
            render("host {device_hostname} is {status}", &event),
            "host srv1 is CRITICAL"
        );
    }

    #[test]
    fn render_resolves_unknown_placeholders_to_empty() {
        let event = EventBuilder::new().status("up").build();
        assert_eq!(render("[{nonexistent}] {status}", &event), "[] up");
    }

    #[test]
    fn render_leaves_malformed_placeholders_alone() {
        let event = EventBuilder::new().status("up").build();
        assert_eq!(render("a {status", &event), "a {status");
        assert_eq!(render("{not a name}", &event), "{not a name}");
        assert_eq!(render("empty {} braces", &event), "empty {} braces");
    }

    #[test]
    fn render_argv_splits_before_substitution() {
        let event = EventBuilder::new()
            .device_hostname("srv1")
            .status("CRITICAL")
            .build();

        let argv = render_argv(
            "/bin/notify --host {device_hostname} --state {status}",
            &event,
        );
        assert_eq!(argv, ["/bin/notify", "--host", "srv1", "--state", "CRITICAL"]);
    }

    #[test]
    fn render_argv_keeps_values_with_spaces_in_one_slot() {
        let event = EventBuilder::new().monitor_name("disk usage /var").build();

        let argv = render_argv("/bin/notify {monitor_name}", &event);
        assert_eq!(argv, ["/bin/notify", "disk usage /var"]);
    }
}
