// spyglass: the plugin crate an engine host links against. Wraps
// spyglass-core behind panic-guarded C exports, carries script messages
// back through the engine callback table, and picks up inventory-submitted
// variable registrations at start.

pub use spyglass_core;
pub use spyglass_ffi;

pub mod engine;
pub mod exports;
pub mod guard;
pub mod plugin;
pub mod variables;

// Re-export the primary public API surface.
pub use engine::{EngineBridge, LOG_ERROR, LOG_INFO, LOG_WARNING};
pub use guard::bridge_boundary;
pub use plugin::{ConsolePlugin, VariableSpec};
pub use variables::{register_all_from_inventory, VariableRegistration};

// For inventory::submit! invocations in dependent crates.
#[doc(hidden)]
pub extern crate inventory as __inventory;
