// Outbound half of the bridge: a safe wrapper over the engine-supplied
// callback table. Script messages and diagnostic log lines both flow to
// the managed runtime through these function pointers.

use spyglass_ffi::EngineCallbacks;

/// Log level constants for the `engine_log!` macro.
pub const LOG_INFO: u8 = 0;
pub const LOG_WARNING: u8 = 1;
pub const LOG_ERROR: u8 = 2;

/// Script message names understood by the managed listener.
pub const MSG_CONSOLE_OPEN: &str = "console_open";
pub const MSG_CONSOLE_CLOSE: &str = "console_close";
pub const MSG_CONSOLE_ACTION: &str = "console_action";
pub const MSG_CONSOLE_VARIABLE_SET: &str = "console_variable_set";

/// Copy of the engine callback table. Function pointers are plain values,
/// so the bridge owns its copy and never dereferences the table pointer
/// after `spyglass_initialize` returns.
#[derive(Clone, Copy)]
pub struct EngineBridge {
    callbacks: EngineCallbacks,
}

impl EngineBridge {
    /// Copy the callback table out of engine memory. Returns None for a
    /// null table.
    ///
    /// # Safety
    /// `table` must either be null or point to a valid `EngineCallbacks`
    /// for the duration of the call.
    pub unsafe fn from_table(table: *const EngineCallbacks) -> Option<Self> {
        if table.is_null() {
            return None;
        }
        // SAFETY: non-null per the check above, valid per the contract.
        let callbacks = unsafe { std::ptr::read(table) };
        Some(EngineBridge { callbacks })
    }

    /// Deliver a parameterless script message.
    pub fn send_message(&self, name: &str) {
        self.send(name, "");
    }

    /// Deliver a script message with a JSON object of string parameters.
    pub fn send_message_with(&self, name: &str, params: &serde_json::Value) {
        let encoded = params.to_string();
        self.send(name, &encoded);
    }

    fn send(&self, name: &str, params: &str) {
        (self.callbacks.send_script_message)(
            name.as_ptr(),
            name.len() as u32,
            params.as_ptr(),
            params.len() as u32,
        );
    }

    /// Forward a diagnostic line to the engine's log output.
    pub fn log(&self, level: u8, message: &str) {
        (self.callbacks.log)(level, message.as_ptr(), message.len() as u32);
    }
}

/// Log a diagnostic through the engine callback table.
///
/// Usage:
/// ```ignore
/// engine_log!(bridge, LOG_WARNING, "settings fell back to defaults: {err}");
/// ```
#[macro_export]
macro_rules! engine_log {
    ($bridge:expr, $level:expr, $($arg:tt)*) => {{
        $bridge.log($level, &format!($($arg)*));
    }};
}
