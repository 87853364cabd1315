//! Wiring a [`SyncBridge`] to its surfaces' change events.
//!
//! Surfaces call their handlers synchronously, often from inside a write the
//! bridge itself is performing. Handlers therefore never call the bridge
//! directly: they queue a notification, and whoever holds the bridge drains
//! the queue once its own call has returned. Notifications are handled one
//! at a time, in arrival order, each with exclusive access to the bridge.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::bridge::{SyncBridge, SyncOutcome};
use crate::error::SyncError;
use crate::surface::{EditorSurface, SourceView, SubscriptionId};

/// Receives errors raised while handling surface notifications.
pub type ErrorHandler = Box<dyn FnMut(&SyncError)>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notification {
    Editor(String),
    Source(String),
}

struct SessionInner<E, S> {
    bridge: RefCell<SyncBridge<E, S>>,
    inbox: RefCell<VecDeque<Notification>>,
    error_handlers: RefCell<Vec<ErrorHandler>>,
    /// Errors waiting for the handlers, in the order they were raised
    errors: RefCell<VecDeque<SyncError>>,
    dispatching: Cell<bool>,
    subscriptions: RefCell<Option<(SubscriptionId, SubscriptionId)>>,
}

impl<E: EditorSurface, S: SourceView> SessionInner<E, S> {
    fn notify(&self, notification: Notification) {
        self.inbox.borrow_mut().push_back(notification);
        self.drain();
    }

    fn drain(&self) {
        loop {
            // Busy: the caller holding the bridge drains when it returns
            let Ok(mut bridge) = self.bridge.try_borrow_mut() else {
                return;
            };
            let Some(notification) = self.inbox.borrow_mut().pop_front() else {
                return;
            };
            let result = match &notification {
                Notification::Editor(html) => bridge.on_editor_changed(html),
                Notification::Source(text) => bridge.on_source_changed(text),
            };
            drop(bridge);
            self.report(result);
        }
    }

    fn report(&self, result: Result<SyncOutcome, SyncError>) {
        match result {
            Ok(outcome) => log::trace!("Notification handled: {outcome:?}"),
            Err(err) if err.is_detached() => log::warn!("Ignoring notification: {err}"),
            Err(err) => {
                self.errors.borrow_mut().push_back(err);
                self.dispatch_errors();
            }
        }
    }

    /// Hand queued errors to the handlers. Handlers may call back into the
    /// session; errors they cause are queued and dispatched by the outermost
    /// call.
    fn dispatch_errors(&self) {
        if self.dispatching.replace(true) {
            return;
        }
        loop {
            let Some(err) = self.errors.borrow_mut().pop_front() else {
                break;
            };
            let mut handlers = std::mem::take(&mut *self.error_handlers.borrow_mut());
            for handler in handlers.iter_mut() {
                handler(&err);
            }
            // Keep handlers registered while dispatching, after the existing ones
            let mut error_handlers = self.error_handlers.borrow_mut();
            handlers.append(&mut error_handlers);
            *error_handlers = handlers;
        }
        self.dispatching.set(false);
    }
}

/// A bridge attached to its surfaces for the lifetime of a hosting view.
pub struct BridgeSession<E, S> {
    inner: Rc<SessionInner<E, S>>,
}

impl<E, S> Clone for BridgeSession<E, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E, S> BridgeSession<E, S>
where
    E: EditorSurface + 'static,
    S: SourceView + 'static,
{
    /// Subscribe `bridge` to both of its surfaces.
    pub fn attach(bridge: SyncBridge<E, S>) -> Self {
        let inner = Rc::new(SessionInner {
            bridge: RefCell::new(bridge),
            inbox: RefCell::new(VecDeque::new()),
            error_handlers: RefCell::new(Vec::new()),
            errors: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            subscriptions: RefCell::new(None),
        });

        let editor_session: Weak<SessionInner<E, S>> = Rc::downgrade(&inner);
        let source_session = Weak::clone(&editor_session);
        let subscriptions = {
            let mut bridge = inner.bridge.borrow_mut();
            let editor_id = bridge
                .editor_mut()
                .on_content_changed(Box::new(move |html: &str| {
                    if let Some(session) = editor_session.upgrade() {
                        session.notify(Notification::Editor(html.to_string()));
                    }
                }));
            let source_id = bridge
                .source_mut()
                .on_text_changed(Box::new(move |text: &str| {
                    if let Some(session) = source_session.upgrade() {
                        session.notify(Notification::Source(text.to_string()));
                    }
                }));
            (editor_id, source_id)
        };
        *inner.subscriptions.borrow_mut() = Some(subscriptions);

        Self { inner }
    }

    /// Register a handler for errors raised by surface notifications, such as
    /// malformed source text in strict mode.
    pub fn on_error(&self, handler: impl FnMut(&SyncError) + 'static) {
        self.inner.error_handlers.borrow_mut().push(Box::new(handler));
    }

    pub fn load_initial_content(&self, html: &str) -> Result<SyncOutcome, SyncError> {
        self.with_bridge_mut(|bridge| bridge.load_initial_content(html))
    }

    /// Run `f` against the editor, then handle whatever it triggered.
    pub fn with_editor<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        self.with_bridge_mut(|bridge| f(bridge.editor_mut()))
    }

    /// Run `f` against the source view, then handle whatever it triggered.
    pub fn with_source<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        self.with_bridge_mut(|bridge| f(bridge.source_mut()))
    }

    /// Read-only access to the bridge.
    pub fn with_bridge<R>(&self, f: impl FnOnce(&SyncBridge<E, S>) -> R) -> R {
        f(&self.inner.bridge.borrow())
    }

    /// Push a debounced source edit if it is due. Call from the host's timer.
    pub fn poll(&self) -> Result<SyncOutcome, SyncError> {
        self.with_bridge_mut(|bridge| bridge.poll())
    }

    pub fn flush(&self) -> Result<SyncOutcome, SyncError> {
        self.with_bridge_mut(|bridge| bridge.flush())
    }

    /// Unsubscribe from both surfaces and dispose the bridge.
    pub fn dispose(&self) {
        self.with_bridge_mut(|bridge| {
            if let Some((editor_id, source_id)) = self.inner.subscriptions.borrow_mut().take() {
                bridge.editor_mut().remove_handler(editor_id);
                bridge.source_mut().remove_handler(source_id);
            }
            bridge.dispose();
        });
    }

    pub fn is_disposed(&self) -> bool {
        self.with_bridge(|bridge| bridge.is_disposed())
    }

    fn with_bridge_mut<R>(&self, f: impl FnOnce(&mut SyncBridge<E, S>) -> R) -> R {
        let result = f(&mut self.inner.bridge.borrow_mut());
        self.inner.drain();
        result
    }
}
