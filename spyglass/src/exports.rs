// The C exports. Every function is panic-guarded, reads strings as
// UTF-8 (pointer, byte length) pairs, and reports outcomes through
// ConsoleStatus codes; calls before spyglass_initialize are rejected
// with NotInitialized rather than crashing.

use std::borrow::Cow;
use std::sync::Mutex;

use spyglass_core::status_of;
use spyglass_ffi::{ConsoleStatus, EngineCallbacks};

use crate::engine::{EngineBridge, LOG_ERROR};
use crate::guard::bridge_boundary;
use crate::plugin::{ConsolePlugin, VariableSpec};

static PLUGIN: Mutex<Option<ConsolePlugin>> = Mutex::new(None);

/// Best-effort panic reporting from the boundary guard. Uses try_lock:
/// if the panic left the mutex held or poisoned, the message is dropped.
pub(crate) fn log_panic(message: &str) {
    if let Ok(guard) = PLUGIN.try_lock() {
        if let Some(plugin) = guard.as_ref() {
            plugin.bridge().log(LOG_ERROR, message);
        }
    }
}

/// Read a string argument. Null or empty yields "", invalid UTF-8 is
/// replaced lossily; the bridge never rejects a message over encoding.
unsafe fn str_arg<'a>(ptr: *const u8, len: u32) -> Cow<'a, str> {
    if ptr.is_null() || len == 0 {
        return Cow::Borrowed("");
    }
    // SAFETY: non-null with `len` readable bytes, per the export contract.
    let bytes = unsafe { std::slice::from_raw_parts(ptr, len as usize) };
    String::from_utf8_lossy(bytes)
}

fn with_plugin(f: impl FnOnce(&mut ConsolePlugin) -> ConsoleStatus) -> ConsoleStatus {
    match PLUGIN.lock() {
        Ok(mut guard) => match guard.as_mut() {
            Some(plugin) => f(plugin),
            None => ConsoleStatus::NotInitialized,
        },
        Err(_) => ConsoleStatus::InternalError,
    }
}

/// Create the plugin instance. `callbacks` must point at a valid table;
/// it is copied before this function returns. Calling twice without an
/// intervening `spyglass_destroy` fails with AlreadyInitialized.
#[unsafe(no_mangle)]
pub extern "C" fn spyglass_initialize(
    target_ptr: *const u8,
    target_len: u32,
    method_ptr: *const u8,
    method_len: u32,
    version_ptr: *const u8,
    version_len: u32,
    settings_ptr: *const u8,
    settings_len: u32,
    callbacks: *const EngineCallbacks,
) -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        // SAFETY: table validity is the caller's contract; null is handled.
        let Some(bridge) = (unsafe { EngineBridge::from_table(callbacks) }) else {
            return ConsoleStatus::InvalidArgument;
        };
        let target = unsafe { str_arg(target_ptr, target_len) };
        let method = unsafe { str_arg(method_ptr, method_len) };
        let version = unsafe { str_arg(version_ptr, version_len) };
        let settings = unsafe { str_arg(settings_ptr, settings_len) };
        match PLUGIN.lock() {
            Ok(mut guard) => {
                if guard.is_some() {
                    return ConsoleStatus::AlreadyInitialized;
                }
                *guard = Some(ConsolePlugin::new(
                    &target, &method, &version, &settings, bridge,
                ));
                ConsoleStatus::Ok
            }
            Err(_) => ConsoleStatus::InternalError,
        }
    })
}

/// Tear the plugin down, dropping all entries, registrations, and the
/// callback table copy.
#[unsafe(no_mangle)]
pub extern "C" fn spyglass_destroy() -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || match PLUGIN.lock() {
        Ok(mut guard) => {
            if guard.take().is_some() {
                ConsoleStatus::Ok
            } else {
                ConsoleStatus::NotInitialized
            }
        }
        Err(_) => ConsoleStatus::InternalError,
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn spyglass_show() -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        with_plugin(|plugin| {
            plugin.show();
            ConsoleStatus::Ok
        })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn spyglass_hide() -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        with_plugin(|plugin| {
            plugin.hide();
            ConsoleStatus::Ok
        })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn spyglass_clear() -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        with_plugin(|plugin| {
            plugin.clear();
            ConsoleStatus::Ok
        })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn spyglass_log_message(
    message_ptr: *const u8,
    message_len: u32,
    stack_ptr: *const u8,
    stack_len: u32,
    log_type: u8,
) -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        let message = unsafe { str_arg(message_ptr, message_len) };
        let stack = unsafe { str_arg(stack_ptr, stack_len) };
        with_plugin(|plugin| status_of(&plugin.log_message(&message, &stack, log_type)))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn spyglass_action_register(
    id: i32,
    name_ptr: *const u8,
    name_len: u32,
) -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        let name = unsafe { str_arg(name_ptr, name_len) };
        with_plugin(|plugin| status_of(&plugin.register_action(id, &name)))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn spyglass_action_unregister(id: i32) -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        with_plugin(|plugin| {
            if plugin.unregister_action(id) {
                ConsoleStatus::Ok
            } else {
                ConsoleStatus::UnknownId
            }
        })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn spyglass_cvar_register(
    id: i32,
    name_ptr: *const u8,
    name_len: u32,
    type_ptr: *const u8,
    type_len: u32,
    value_ptr: *const u8,
    value_len: u32,
    default_ptr: *const u8,
    default_len: u32,
    flags: u32,
    has_range: bool,
    min: f32,
    max: f32,
    values_ptr: *const u8,
    values_len: u32,
) -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        let name = unsafe { str_arg(name_ptr, name_len) };
        let type_name = unsafe { str_arg(type_ptr, type_len) };
        let value = unsafe { str_arg(value_ptr, value_len) };
        let default_value = unsafe { str_arg(default_ptr, default_len) };
        let values_csv = unsafe { str_arg(values_ptr, values_len) };
        with_plugin(|plugin| {
            status_of(&plugin.register_variable(VariableSpec {
                id,
                name: &name,
                type_name: &type_name,
                value: &value,
                default_value: &default_value,
                flags,
                range: has_range.then_some((min, max)),
                values_csv: &values_csv,
            }))
        })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn spyglass_cvar_update(
    id: i32,
    value_ptr: *const u8,
    value_len: u32,
) -> ConsoleStatus {
    bridge_boundary(ConsoleStatus::InternalError, || {
        let value = unsafe { str_arg(value_ptr, value_len) };
        with_plugin(|plugin| status_of(&plugin.update_variable(id, &value)))
    })
}
