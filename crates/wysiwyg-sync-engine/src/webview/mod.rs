/*!
 * # Script-driven Editor
 *
 * [`ScriptEditor`] implements [`EditorSurface`] on top of a rich-text page
 * running in an embedded web view. The host only has to provide a
 * [`ScriptHost`] that evaluates a script in the page and returns its result
 * as a string, and to route the page's navigations through
 * [`ScriptEditor::handle_navigation`].
 *
 * ## Readiness
 *
 * The page cannot accept content until it has loaded. Content and
 * placeholder set before then are kept and applied when the page reports
 * `ready`; [`EditorSurface::get_html`] always returns the latest content.
 *
 * ## Module Structure
 *
 * - **`protocol`**: callback names and the command queue format
 * - **`command`**: formatting commands sent to the page
 * - **`escape`**: quoting values into script string literals
 */

mod command;
mod escape;
pub mod protocol;

pub use command::EditorCommand;
pub use escape::script_string;
pub use protocol::{CALLBACK_SCHEME, EditorCallback, parse_command_queue};

use thiserror::Error;

use crate::surface::{ChangeHandler, EditorSurface, HandlerList, SubscriptionId};

const DEFAULT_LINE_HEIGHT: u32 = 28;

/// Callback invoked with the new content height in CSS pixels.
pub type HeightHandler = Box<dyn FnMut(&i64)>;

/// Evaluates scripts inside the editor page.
pub trait ScriptHost {
    /// Run `script` and return its result converted to a string.
    fn evaluate(&mut self, script: &str) -> Result<String, ScriptError>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Script evaluation failed: {message}")]
    Evaluation { message: String },
    #[error("Editor page is not loaded")]
    NotLoaded,
}

/// What the web view should do with a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPolicy {
    Allow,
    /// The navigation was an editor callback and has been handled.
    Cancel,
}

pub struct ScriptEditor<H> {
    host: H,
    html: String,
    placeholder: String,
    line_height: u32,
    ready: bool,
    focused: bool,
    height: i64,
    content_handlers: HandlerList,
    action_handlers: HandlerList,
    height_handlers: HandlerList<i64>,
}

impl<H: ScriptHost> ScriptEditor<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            html: String::new(),
            placeholder: String::new(),
            line_height: DEFAULT_LINE_HEIGHT,
            ready: false,
            focused: false,
            height: 0,
            content_handlers: HandlerList::default(),
            action_handlers: HandlerList::default(),
            height_handlers: HandlerList::default(),
        }
    }

    /// Text shown by the page while the content is empty.
    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
        if self.ready {
            self.run(&format!(
                "RE.setPlaceholderText('{}');",
                script_string(placeholder)
            ));
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Line height in CSS pixels.
    pub fn set_line_height(&mut self, line_height: u32) {
        self.line_height = line_height;
        if self.ready {
            self.run(&format!("RE.setLineHeight('{line_height}px');"));
        }
    }

    /// Register a handler called with the name of each custom action the
    /// page runs.
    pub fn on_action(&mut self, handler: ChangeHandler) -> SubscriptionId {
        self.action_handlers.add(handler)
    }

    pub fn remove_action_handler(&mut self, id: SubscriptionId) -> bool {
        self.action_handlers.remove(id)
    }

    /// Register a handler called whenever the measured content height changes.
    pub fn on_height_changed(&mut self, handler: HeightHandler) -> SubscriptionId {
        self.height_handlers.add(handler)
    }

    pub fn remove_height_handler(&mut self, id: SubscriptionId) -> bool {
        self.height_handlers.remove(id)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Content height in CSS pixels, as last measured.
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Plain text of the page content.
    pub fn get_text(&mut self) -> Result<String, ScriptError> {
        self.query("RE.getText();")
    }

    /// Run a formatting command, then report the content if it changed.
    pub fn run_command(&mut self, command: &EditorCommand) -> Result<(), ScriptError> {
        log::debug!("Running editor command {command:?}");
        self.query(&command.script())?;
        self.refresh_content();
        Ok(())
    }

    /// Whether the selection is a range rather than a caret.
    pub fn has_range_selection(&mut self) -> Result<bool, ScriptError> {
        Ok(self.query("RE.rangeSelectionExists();")? == "true")
    }

    /// Whether there is a range or caret selection.
    pub fn has_range_or_caret_selection(&mut self) -> Result<bool, ScriptError> {
        Ok(self.query("RE.rangeOrCaretSelectionExists();")? == "true")
    }

    /// The link target of the selected range, if it is inside an anchor.
    pub fn selected_href(&mut self) -> Result<Option<String>, ScriptError> {
        if !self.has_range_selection()? {
            return Ok(None);
        }
        let href = self.query("RE.getSelectedHref();")?;
        Ok((!href.is_empty()).then_some(href))
    }

    /// Whether the page accepts user input.
    pub fn is_editing_enabled(&mut self) -> Result<bool, ScriptError> {
        Ok(self.query("RE.editor.isContentEditable;")? == "true")
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Decide a navigation request from the page, handling it if it carries
    /// editor callbacks.
    pub fn handle_navigation(&mut self, url: &str) -> NavigationPolicy {
        if !protocol::is_callback_url(url) {
            return NavigationPolicy::Allow;
        }

        match self.host.evaluate("RE.getCommandQueue();") {
            Ok(queue) => {
                for callback in parse_command_queue(&queue) {
                    self.handle_callback(callback);
                }
            }
            Err(err) => log::warn!("Failed to fetch editor command queue: {err}"),
        }
        NavigationPolicy::Cancel
    }

    pub fn handle_callback(&mut self, callback: EditorCallback) {
        log::trace!("Editor callback: {callback:?}");
        if callback.changes_content() {
            self.refresh_content();
        }
        match callback {
            EditorCallback::Ready => {
                if !self.ready {
                    log::info!("Editor page ready");
                    self.ready = true;
                    let html = self.html.clone();
                    let placeholder = self.placeholder.clone();
                    self.push_html(&html);
                    self.set_placeholder(&placeholder);
                    self.set_line_height(self.line_height);
                }
                self.update_height();
            }
            EditorCallback::Input => self.update_height(),
            EditorCallback::UpdateHeight => self.update_height(),
            EditorCallback::Focus => self.focused = true,
            EditorCallback::Blur => self.focused = false,
            EditorCallback::Action(name) => self.action_handlers.emit(&name),
            EditorCallback::Unknown(method) => {
                log::debug!("Ignoring unknown editor callback: {method}");
            }
        }
    }

    /// Read the page's content and report it if it changed.
    fn refresh_content(&mut self) {
        match self.host.evaluate("RE.getHtml();") {
            Ok(html) if html != self.html => {
                self.html = html;
                self.content_handlers.emit(&self.html);
            }
            Ok(_) => {}
            Err(err) => log::warn!("Failed to read editor content: {err}"),
        }
    }

    fn update_height(&mut self) {
        match self
            .host
            .evaluate("document.getElementById('viewer').clientHeight;")
        {
            Ok(value) => {
                let height = value.trim().parse().unwrap_or(0);
                if height != self.height {
                    self.height = height;
                    self.height_handlers.emit(&height);
                }
            }
            Err(err) => log::debug!("Failed to measure editor height: {err}"),
        }
    }

    /// Evaluate a query that needs the loaded page.
    fn query(&mut self, script: &str) -> Result<String, ScriptError> {
        if !self.ready {
            return Err(ScriptError::NotLoaded);
        }
        self.host.evaluate(script)
    }

    fn push_html(&mut self, html: &str) {
        self.run(&format!("RE.setHtml('{}');", script_string(html)));
    }

    fn run(&mut self, script: &str) {
        if let Err(err) = self.host.evaluate(script) {
            log::warn!("Editor script failed: {err}");
        }
    }
}

impl<H: ScriptHost> EditorSurface for ScriptEditor<H> {
    fn get_html(&self) -> String {
        self.html.clone()
    }

    fn set_html(&mut self, html: &str) {
        self.html = html.to_string();
        if self.ready {
            self.push_html(html);
            self.update_height();
        }
    }

    fn on_content_changed(&mut self, handler: ChangeHandler) -> SubscriptionId {
        self.content_handlers.add(handler)
    }

    fn remove_handler(&mut self, id: SubscriptionId) -> bool {
        self.content_handlers.remove(id)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::{ScriptError, ScriptHost};

    /// A page that records scripts and answers the few queries the editor
    /// makes.
    #[derive(Debug, Default)]
    pub struct FakePage {
        pub scripts: Vec<String>,
        pub html: String,
        pub queue: Vec<String>,
        pub height: i64,
        pub range_selected: bool,
        pub href: String,
        pub editable: bool,
        pub broken: bool,
    }

    impl FakePage {
        /// Simulate the page queueing `commands`.
        pub fn push_commands(&mut self, commands: &[&str]) {
            self.queue
                .extend(commands.iter().map(|command| command.to_string()));
        }

        pub fn ran(&self, prefix: &str) -> bool {
            self.scripts.iter().any(|script| script.starts_with(prefix))
        }
    }

    impl ScriptHost for FakePage {
        fn evaluate(&mut self, script: &str) -> Result<String, ScriptError> {
            if self.broken {
                return Err(ScriptError::Evaluation {
                    message: "page crashed".to_string(),
                });
            }
            self.scripts.push(script.to_string());
            Ok(match script {
                "RE.getCommandQueue();" => {
                    let queue = std::mem::take(&mut self.queue);
                    serde_json::to_string(&queue).unwrap()
                }
                "RE.getHtml();" => self.html.clone(),
                "RE.getText();" => wysiwyg_sync_syntax::inner_text(&self.html),
                "RE.setBold();" => {
                    self.html = format!("<b>{}</b>", self.html);
                    String::new()
                }
                "RE.rangeSelectionExists();" => self.range_selected.to_string(),
                "RE.rangeOrCaretSelectionExists();" => "true".to_string(),
                "RE.getSelectedHref();" => self.href.clone(),
                "RE.editor.isContentEditable;" => self.editable.to_string(),
                s if s.contains("clientHeight") => self.height.to_string(),
                _ => String::new(),
            })
        }
    }
}
