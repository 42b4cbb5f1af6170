// spyglass-core: engine-agnostic console state.
// Holds the log entry store, the action/variable registry, and the
// settings model. No unsafe code lives here; the spyglass crate wraps
// this behind the C bridge surface.

pub mod bounded_list;
pub mod console;
pub mod cvar;
pub mod entry;
pub mod entry_list;
pub mod error;
pub mod registry;
pub mod registry_filter;
pub mod rich_text;
pub mod settings;
pub mod sorted_list;

// Re-export the primary public API surface.
pub use bounded_list::BoundedList;
pub use console::{Console, ConsoleListener, ConsoleListenerHandle};
pub use cvar::{cvar_flags, CVar, CVarRange, CVarType};
pub use entry::{EntryDisplay, LogEntry, LogType, LogTypeMask};
pub use entry_list::{AddOutcome, LogEntryList};
pub use error::{status_of, ConsoleError, ConsoleResult};
pub use registry::{Action, ActionRegistry, RegistryEvent, RegistryListenerHandle};
pub use registry_filter::RegistryFilter;
pub use rich_text::{Color, RichText, Span, SpanStyle};
pub use settings::{
    ExceptionWarningDisplayMode, ExceptionWarningSettings, Gesture, LogEntryColors,
    LogOverlayColors, LogOverlaySettings, PluginSettings, SettingsColor,
};
pub use sorted_list::{SortKey, SortedList};
