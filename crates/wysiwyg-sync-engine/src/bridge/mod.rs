/*!
 * # Sync Bridge
 *
 * Keeps an [`EditorSurface`] and a [`SourceView`] convergent.
 *
 * ## Echo Prevention
 *
 * The bridge keeps one plain string per projection: the last value it wrote
 * to that projection, or the last value that projection reported. A change
 * notification equal to its projection's string is an echo of the bridge's
 * own write (or a duplicate report) and is dropped. Anything else is a
 * genuine edit and is propagated to the *other* projection exactly once.
 * The bridge never writes back to the projection that reported a change, so
 * no edit can ping-pong.
 *
 * ## Debounce
 *
 * With a non-zero `debounce_ms`, source edits are held as a single pending
 * edit and only pushed to the editor by [`SyncBridge::poll`] once the
 * interval has elapsed (or by [`SyncBridge::flush`]). An editor edit that
 * arrives in between wins: the pending source edit is dropped.
 *
 * ## Off-thread Rendering
 *
 * [`SyncBridge::begin_source_render`] hands out a [`RenderTicket`] carrying
 * the current revision. Every accepted edit bumps the revision, so a result
 * coming back with an older ticket is stale and is discarded by
 * [`SyncBridge::complete_source_render`].
 */

mod clock;
mod ticket;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ticket::RenderTicket;

use std::time::Instant;

use wysiwyg_sync_config::SyncConfig;
use wysiwyg_sync_syntax::{HtmlError, check_well_formed, same_document};

use crate::error::{Origin, SyncError};
use crate::surface::{EditorSurface, SourceView};
use ticket::PendingEdit;

/// What a bridge operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The other projection was written.
    Propagated,
    /// The other projection already held this content; nothing was written.
    Unchanged,
    /// The notification repeated the projection's known content.
    EchoSuppressed,
    /// Held back by the debounce interval.
    Deferred,
    /// A render result for an outdated revision was discarded.
    Stale,
}

pub struct SyncBridge<E, S> {
    editor: E,
    source: S,
    config: SyncConfig,
    clock: Box<dyn Clock>,
    /// Last HTML written to, or reported by, the editor
    editor_html: String,
    /// Last text written to, or reported by, the source view
    source_text: String,
    pending: Option<PendingEdit>,
    revision: u64,
    disposed: bool,
}

impl<E: EditorSurface, S: SourceView> SyncBridge<E, S> {
    pub fn new(editor: E, source: S, config: SyncConfig) -> Self {
        Self::with_clock(editor, source, config, SystemClock)
    }

    pub fn with_clock(
        editor: E,
        source: S,
        config: SyncConfig,
        clock: impl Clock + 'static,
    ) -> Self {
        let editor_html = editor.get_html();
        let source_text = source.get_text();
        Self {
            editor,
            source,
            config,
            clock: Box::new(clock),
            editor_html,
            source_text,
            pending: None,
            revision: 0,
            disposed: false,
        }
    }

    /// Set both projections from `html`, bypassing change detection.
    pub fn load_initial_content(&mut self, html: &str) -> Result<SyncOutcome, SyncError> {
        self.ensure_attached(Origin::Host)?;
        log::info!("Loading initial content ({} bytes)", html.len());

        self.pending = None;
        self.revision += 1;
        let display = self.source_display(html);
        self.editor_html = html.to_string();
        self.source_text = display.clone();
        self.editor.set_html(html);
        self.source.set_text(&display);
        Ok(SyncOutcome::Propagated)
    }

    /// The editor reports its content is now `html`.
    pub fn on_editor_changed(&mut self, html: &str) -> Result<SyncOutcome, SyncError> {
        self.ensure_attached(Origin::Editor)?;
        if self.same(html, &self.editor_html) {
            log::trace!("Editor echo suppressed");
            return Ok(SyncOutcome::EchoSuppressed);
        }

        self.editor_html = html.to_string();
        self.revision += 1;
        if let Some(pending) = self.pending.take() {
            log::debug!(
                "Dropping pending source edit ({} bytes), superseded by editor change",
                pending.text.len()
            );
        }

        let display = self.source_display(html);
        if self.same(&display, &self.source_text) {
            return Ok(SyncOutcome::Unchanged);
        }
        log::debug!("Editor change written to source view ({} bytes)", display.len());
        self.source_text = display.clone();
        self.source.set_text(&display);
        Ok(SyncOutcome::Propagated)
    }

    /// The source view's text is now `text`.
    ///
    /// In strict mode (`lenient_render = false`) text that is not well-formed
    /// HTML is rejected with [`SyncError::MalformedContent`]; the editor keeps
    /// its content and the source view keeps the user's text.
    pub fn on_source_changed(&mut self, text: &str) -> Result<SyncOutcome, SyncError> {
        self.ensure_attached(Origin::Source)?;
        if self.same(text, &self.source_text) {
            log::trace!("Source echo suppressed");
            return Ok(SyncOutcome::EchoSuppressed);
        }

        self.source_text = text.to_string();
        self.revision += 1;

        let debounce = self.config.debounce();
        if !debounce.is_zero() {
            self.pending = Some(PendingEdit {
                text: text.to_string(),
                due: self.clock.now() + debounce,
            });
            return Ok(SyncOutcome::Deferred);
        }
        self.push_to_editor(text)
    }

    /// Push the pending source edit if its debounce interval has elapsed.
    pub fn poll(&mut self) -> Result<SyncOutcome, SyncError> {
        self.ensure_attached(Origin::Host)?;
        match &self.pending {
            None => Ok(SyncOutcome::Unchanged),
            Some(pending) if self.clock.now() < pending.due => Ok(SyncOutcome::Deferred),
            Some(_) => self.flush(),
        }
    }

    /// Push the pending source edit now, ignoring the debounce interval.
    pub fn flush(&mut self) -> Result<SyncOutcome, SyncError> {
        self.ensure_attached(Origin::Host)?;
        match self.pending.take() {
            Some(pending) => self.push_to_editor(&pending.text),
            None => Ok(SyncOutcome::Unchanged),
        }
    }

    /// When the pending source edit becomes due, if there is one.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Accept a source edit whose rendering happens elsewhere.
    ///
    /// Returns `None` for an echo. Any debounced edit is superseded.
    pub fn begin_source_render(&mut self, text: &str) -> Result<Option<RenderTicket>, SyncError> {
        self.ensure_attached(Origin::Source)?;
        if self.same(text, &self.source_text) {
            return Ok(None);
        }

        self.source_text = text.to_string();
        self.revision += 1;
        self.pending = None;
        Ok(Some(RenderTicket {
            revision: self.revision,
            text: text.to_string(),
        }))
    }

    /// Apply the result of an off-thread render, unless it is stale.
    pub fn complete_source_render(
        &mut self,
        ticket: RenderTicket,
        rendered: Result<String, HtmlError>,
    ) -> Result<SyncOutcome, SyncError> {
        self.ensure_attached(Origin::Host)?;
        if ticket.revision != self.revision {
            log::debug!(
                "Dropping stale render for revision {} (current {})",
                ticket.revision,
                self.revision
            );
            return Ok(SyncOutcome::Stale);
        }

        let html = match rendered {
            Ok(html) => html,
            Err(source) if self.config.lenient_render => {
                log::debug!("Rendering malformed source best-effort: {source}");
                ticket.text
            }
            Err(source) => return Err(SyncError::MalformedContent { source }),
        };
        if self.same(&html, &self.editor_html) {
            return Ok(SyncOutcome::Unchanged);
        }
        Ok(self.write_editor(&html))
    }

    /// Stop synchronizing. Later notifications fail with
    /// [`SyncError::DetachedSurface`].
    pub fn dispose(&mut self) {
        if !self.disposed {
            log::info!("Sync bridge disposed");
        }
        self.disposed = true;
        self.pending = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Bumped on every accepted edit from either projection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn into_parts(self) -> (E, S) {
        (self.editor, self.source)
    }

    fn push_to_editor(&mut self, text: &str) -> Result<SyncOutcome, SyncError> {
        if self.same(text, &self.editor_html) {
            return Ok(SyncOutcome::Unchanged);
        }
        if !self.config.lenient_render
            && let Err(source) = check_well_formed(text)
        {
            log::debug!("Rejecting malformed source: {source}");
            return Err(SyncError::MalformedContent { source });
        }
        Ok(self.write_editor(text))
    }

    fn write_editor(&mut self, html: &str) -> SyncOutcome {
        log::debug!("Source change written to editor ({} bytes)", html.len());
        self.editor_html = html.to_string();
        self.editor.set_html(html);
        SyncOutcome::Propagated
    }

    fn same(&self, a: &str, b: &str) -> bool {
        if self.config.normalize_whitespace {
            same_document(a, b)
        } else {
            a == b
        }
    }

    /// What the source view shows for editor content `html`.
    fn source_display(&self, html: &str) -> String {
        match &self.config.empty_source_text {
            Some(placeholder) if html.is_empty() => placeholder.clone(),
            _ => html.to_string(),
        }
    }

    fn ensure_attached(&self, origin: Origin) -> Result<(), SyncError> {
        if self.disposed {
            return Err(SyncError::DetachedSurface { origin });
        }
        Ok(())
    }
}
