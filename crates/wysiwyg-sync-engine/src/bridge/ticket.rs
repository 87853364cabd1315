use std::time::Instant;

use wysiwyg_sync_syntax::{HtmlError, check_well_formed};

/// A source edit waiting for its debounce interval to elapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingEdit {
    pub(crate) text: String,
    pub(crate) due: Instant,
}

/// Permission to render one source edit away from the UI thread.
///
/// Issued by [`SyncBridge::begin_source_render`](super::SyncBridge::begin_source_render)
/// and handed back with the result to
/// [`SyncBridge::complete_source_render`](super::SyncBridge::complete_source_render).
/// A ticket goes stale as soon as either projection is edited again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub(crate) revision: u64,
    pub(crate) text: String,
}

impl RenderTicket {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The source text this ticket was issued for.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check the text and produce the HTML to hand to the editor.
    ///
    /// Pure, so it can run on any thread.
    pub fn render(&self) -> Result<String, HtmlError> {
        check_well_formed(&self.text)?;
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wysiwyg_sync_syntax::HtmlErrorKind;

    fn assert_send<T: Send>() {}

    #[test]
    fn ticket_can_cross_threads() {
        assert_send::<RenderTicket>();

        let ticket = RenderTicket {
            revision: 3,
            text: "<p>ok</p>".to_string(),
        };
        let rendered = std::thread::spawn(move || ticket.render())
            .join()
            .unwrap();

        assert_eq!(rendered, Ok("<p>ok</p>".to_string()));
    }

    #[test]
    fn render_reports_malformed_text() {
        let ticket = RenderTicket {
            revision: 1,
            text: "<b>unterminated".to_string(),
        };

        assert_eq!(
            ticket.render().unwrap_err().kind,
            HtmlErrorKind::UnclosedElement {
                name: "b".to_string()
            }
        );
    }
}
