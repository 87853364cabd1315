use wysiwyg_sync_syntax::inner_text;

use super::{ChangeHandler, EditorSurface, HandlerList, SourceView, SubscriptionId};

/// In-memory editor surface.
///
/// Writes fire the change handlers synchronously, like an editor that
/// reports every content change regardless of where it came from. An
/// optional render function stands in for an editor that reformats the HTML
/// it is given.
#[derive(Debug, Default)]
pub struct MemoryEditor {
    html: String,
    render: Option<fn(&str) -> String>,
    writes: Vec<String>,
    handlers: HandlerList,
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(html: &str) -> Self {
        Self {
            html: html.to_string(),
            ..Self::default()
        }
    }

    /// Reformat every `set_html` input with `render` before storing it.
    pub fn with_render(mut self, render: fn(&str) -> String) -> Self {
        self.render = Some(render);
        self
    }

    /// Simulate the user editing the rich content so it serializes to `html`.
    pub fn user_edit(&mut self, html: &str) {
        self.html = html.to_string();
        self.handlers.emit(html);
    }

    /// Plain-text projection of the rendered content.
    pub fn text(&self) -> String {
        inner_text(&self.html)
    }

    /// Every value passed to `set_html`, oldest first.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl EditorSurface for MemoryEditor {
    fn get_html(&self) -> String {
        self.html.clone()
    }

    fn set_html(&mut self, html: &str) {
        self.writes.push(html.to_string());
        self.html = match self.render {
            Some(render) => render(html),
            None => html.to_string(),
        };
        let rendered = self.html.clone();
        self.handlers.emit(&rendered);
    }

    fn on_content_changed(&mut self, handler: ChangeHandler) -> SubscriptionId {
        self.handlers.add(handler)
    }

    fn remove_handler(&mut self, id: SubscriptionId) -> bool {
        self.handlers.remove(id)
    }
}

/// In-memory plain-text source view.
#[derive(Debug, Default)]
pub struct MemorySourceView {
    text: String,
    writes: Vec<String>,
    handlers: HandlerList,
}

impl MemorySourceView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// Simulate the user typing so the view now holds `text`.
    pub fn user_edit(&mut self, text: &str) {
        self.text = text.to_string();
        self.handlers.emit(text);
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl SourceView for MemorySourceView {
    fn get_text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.writes.push(text.to_string());
        self.text = text.to_string();
        self.handlers.emit(text);
    }

    fn on_text_changed(&mut self, handler: ChangeHandler) -> SubscriptionId {
        self.handlers.add(handler)
    }

    fn remove_handler(&mut self, id: SubscriptionId) -> bool {
        self.handlers.remove(id)
    }
}
