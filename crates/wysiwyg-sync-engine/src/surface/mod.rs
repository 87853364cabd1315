/*!
 * # Surfaces
 *
 * The two collaborators of the bridge, described only by what the bridge
 * needs from them:
 *
 * - [`EditorSurface`]: rich-text editor that reports and accepts HTML
 * - [`SourceView`]: plain-text view of the same HTML
 *
 * Change events are plain callback registrations. Registering returns a
 * [`SubscriptionId`] which removes the handler again on teardown.
 *
 * Implementations decide whether programmatic writes (`set_html`,
 * `set_text`) fire their own change handlers. The bridge copes with both:
 * a notification caused by its own write is recognised as an echo.
 *
 * ## Module Structure
 *
 * - **`memory`**: in-memory implementations used by tests and headless hosts
 */

pub mod memory;

pub use memory::{MemoryEditor, MemorySourceView};

/// Callback invoked with the new content after a change.
pub type ChangeHandler = Box<dyn FnMut(&str)>;

/// Handle returned by a handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Rich-text editor capability set.
pub trait EditorSurface {
    /// Current content serialized as HTML.
    fn get_html(&self) -> String;
    /// Replace the content with `html`, rendered as well as the editor can.
    fn set_html(&mut self, html: &str);
    /// Register a handler called with the new HTML whenever the content changes.
    fn on_content_changed(&mut self, handler: ChangeHandler) -> SubscriptionId;
    fn remove_handler(&mut self, id: SubscriptionId) -> bool;
}

/// Plain-text source view capability set.
pub trait SourceView {
    fn get_text(&self) -> String;
    fn set_text(&mut self, text: &str);
    /// Register a handler called with the new text whenever it changes.
    fn on_text_changed(&mut self, handler: ChangeHandler) -> SubscriptionId;
    fn remove_handler(&mut self, id: SubscriptionId) -> bool;
}

/// Registered handlers, in registration order.
pub struct HandlerList<T: ?Sized = str> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Box<dyn FnMut(&T)>)>,
}

impl<T: ?Sized> Default for HandlerList<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

impl<T: ?Sized> HandlerList<T> {
    pub fn add(&mut self, handler: Box<dyn FnMut(&T)>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, value: &T) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(value);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T: ?Sized> std::fmt::Debug for HandlerList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerList")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_to_every_handler_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut handlers: HandlerList = HandlerList::default();
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            handlers.add(Box::new(move |value| {
                seen.borrow_mut().push(format!("{tag}:{value}"))
            }));
        }

        handlers.emit("x");

        assert_eq!(*seen.borrow(), vec!["a:x".to_string(), "b:x".to_string()]);
    }

    #[test]
    fn removed_handler_is_not_called() {
        let calls = Rc::new(RefCell::new(0));
        let mut handlers: HandlerList = HandlerList::default();
        let counter = Rc::clone(&calls);
        let id = handlers.add(Box::new(move |_| *counter.borrow_mut() += 1));

        assert!(handlers.remove(id));
        assert!(!handlers.remove(id));
        handlers.emit("x");

        assert_eq!(*calls.borrow(), 0);
        assert!(handlers.is_empty());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut handlers: HandlerList = HandlerList::default();
        let first = handlers.add(Box::new(|_| {}));
        handlers.remove(first);
        let second = handlers.add(Box::new(|_| {}));

        assert_ne!(first, second);
        assert_eq!(handlers.len(), 1);
    }
}
