//! Messages from the editor page to its host.
//!
//! The page cannot call the host directly. It pushes callback names onto a
//! queue and navigates to `re-callback://`; the host intercepts that
//! navigation, fetches the queue as a JSON array of strings and handles each
//! entry in order.

/// Navigation URL prefix the page uses to signal queued callbacks.
pub const CALLBACK_SCHEME: &str = "re-callback://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCallback {
    /// The page finished loading and can accept content.
    Ready,
    /// The user changed the content.
    Input,
    /// The content height may have changed.
    UpdateHeight,
    Focus,
    Blur,
    /// A custom toolbar action ran in the page.
    Action(String),
    Unknown(String),
}

impl EditorCallback {
    /// Callbacks are matched by prefix, so `"input:123"` is still an input.
    pub fn parse(method: &str) -> Self {
        if let Some(action) = method.strip_prefix("action/") {
            EditorCallback::Action(action.to_string())
        } else if method.starts_with("ready") {
            EditorCallback::Ready
        } else if method.starts_with("input") {
            EditorCallback::Input
        } else if method.starts_with("updateHeight") {
            EditorCallback::UpdateHeight
        } else if method.starts_with("focus") {
            EditorCallback::Focus
        } else if method.starts_with("blur") {
            EditorCallback::Blur
        } else {
            EditorCallback::Unknown(method.to_string())
        }
    }

    /// Whether the page content may differ after this callback.
    pub fn changes_content(&self) -> bool {
        matches!(self, EditorCallback::Input | EditorCallback::Action(_))
    }
}

/// Parse the page's command queue. A queue that isn't a JSON array of
/// strings yields no commands.
pub fn parse_command_queue(json: &str) -> Vec<EditorCallback> {
    match serde_json::from_str::<Vec<String>>(json) {
        Ok(commands) => commands
            .iter()
            .map(|command| EditorCallback::parse(command))
            .collect(),
        Err(err) => {
            log::warn!("Failed to parse editor command queue: {err}");
            Vec::new()
        }
    }
}

pub fn is_callback_url(url: &str) -> bool {
    url.starts_with(CALLBACK_SCHEME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("ready", EditorCallback::Ready)]
    #[case("input", EditorCallback::Input)]
    #[case("input:42", EditorCallback::Input)]
    #[case("updateHeight", EditorCallback::UpdateHeight)]
    #[case("focus", EditorCallback::Focus)]
    #[case("blur", EditorCallback::Blur)]
    #[case("action/clear", EditorCallback::Action("clear".to_string()))]
    #[case("selection", EditorCallback::Unknown("selection".to_string()))]
    fn parses_callback_names(#[case] method: &str, #[case] expected: EditorCallback) {
        assert_eq!(EditorCallback::parse(method), expected);
    }

    #[test]
    fn parses_queue_in_order() {
        assert_eq!(
            parse_command_queue(r#"["ready","input","action/bold"]"#),
            vec![
                EditorCallback::Ready,
                EditorCallback::Input,
                EditorCallback::Action("bold".to_string()),
            ]
        );
    }

    #[rstest]
    #[case("")]
    #[case("not json")]
    #[case(r#"{"queue": []}"#)]
    #[case("[1, 2]")]
    fn malformed_queue_yields_nothing(#[case] json: &str) {
        assert_eq!(parse_command_queue(json), vec![]);
    }

    #[test]
    fn only_input_and_actions_change_content() {
        assert!(EditorCallback::Input.changes_content());
        assert!(EditorCallback::Action("x".to_string()).changes_content());
        assert!(!EditorCallback::Focus.changes_content());
        assert!(!EditorCallback::Ready.changes_content());
    }

    #[test]
    fn recognises_callback_urls() {
        assert!(is_callback_url("re-callback://"));
        assert!(!is_callback_url("https://example.com"));
    }
}
