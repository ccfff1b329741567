//! Core of the live log viewer: the append-only log stream fed from any thread, the auto-scroll
//! state machine, the selectable-text capability and the severity palette. Nothing in here
//! depends on a GUI toolkit.

pub mod autoscroll;
pub mod classify;
pub mod config;
pub mod logging;
pub mod notify;
pub mod palette;
pub mod record;
pub mod selectable;
pub mod stream;
pub mod tracing_bridge;
pub mod viewer;

pub use autoscroll::{
    AutoScrollController, ScrollChanged, ScrollDecision, ScrollSurface, SurfaceError,
};
pub use classify::classify_line;
pub use config::{
    ConfigError, ConfigLoadResult, ConfigSource, DemoPreferences, FileConfig, ViewerPreferences,
    WindowPreferences, config_directory, config_path, load_config, load_config_from,
    save_config_to,
};
pub use logging::{LoggingDestination, LoggingError, current_log_path, init_logging};
pub use notify::{ChangeEvent, ChangeNotifier, CollectionChange, NotifySender, SubscriptionId};
pub use palette::{LogColor, Severity, SeverityPalette};
pub use record::LogRecord;
pub use selectable::{
    CapabilityError, Clipboard, CommandOutcome, CommandRegistry, Selectable, SelectableText,
    SelectionController, TextCommand, TextViewId,
};
pub use stream::{LEN_PROPERTY, LogStream, LogStreamHandle, PumpSummary, WakeHook};
pub use tracing_bridge::ViewerLayer;
pub use viewer::{LogViewer, LogViewerHandle};
