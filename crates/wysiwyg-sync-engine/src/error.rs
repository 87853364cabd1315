use std::fmt;

use wysiwyg_sync_syntax::HtmlError;

/// Which projection a change notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Editor,
    Source,
    Host,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Editor => write!(f, "editor surface"),
            Origin::Source => write!(f, "source view"),
            Origin::Host => write!(f, "host"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Source text cannot be rendered: {source}")]
    MalformedContent {
        #[source]
        source: HtmlError,
    },
    #[error("Change from {origin} arrived after the bridge was disposed")]
    DetachedSurface { origin: Origin },
}

impl SyncError {
    pub fn is_detached(&self) -> bool {
        matches!(self, SyncError::DetachedSurface { .. })
    }
}
