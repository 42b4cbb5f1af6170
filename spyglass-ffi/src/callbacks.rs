/// Callback table filled by the engine and handed to the plugin at
/// `spyglass_initialize`. The plugin calls back into the managed runtime
/// through these function pointers.
///
/// All strings cross the boundary as UTF-8 (pointer, byte length) pairs.
/// The table is plain function pointers, so the plugin copies it by value
/// at initialization; the engine's pointer need not outlive that call.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct EngineCallbacks {
    /// Deliver a script message to the managed listener object.
    /// `name` identifies the message (e.g. "console_open"); `params` is a
    /// JSON object with string values, or empty for parameterless messages.
    pub send_script_message: extern "C" fn(
        name_ptr: *const u8,
        name_len: u32,
        params_ptr: *const u8,
        params_len: u32,
    ),

    /// Forward a plugin diagnostic line to the engine's own log output.
    /// `level`: 0 = info, 1 = warning, 2 = error.
    pub log: extern "C" fn(level: u8, msg_ptr: *const u8, msg_len: u32),
}
