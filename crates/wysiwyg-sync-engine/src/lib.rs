pub mod bridge;
pub mod error;
pub mod session;
pub mod surface;
pub mod webview;

// Re-export key types for easier usage
pub use bridge::{Clock, ManualClock, RenderTicket, SyncBridge, SyncOutcome, SystemClock};
pub use error::{Origin, SyncError};
pub use session::{BridgeSession, ErrorHandler};
pub use surface::{
    ChangeHandler, EditorSurface, MemoryEditor, MemorySourceView, SourceView, SubscriptionId,
};
pub use webview::{EditorCommand, NavigationPolicy, ScriptEditor, ScriptError, ScriptHost};
pub use wysiwyg_sync_config::SyncConfig;
