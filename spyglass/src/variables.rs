// Inventory-based variable registration: crates linking against spyglass
// submit VariableRegistration entries at link time, and the plugin picks
// them up during start without any explicit registration call.

use spyglass_core::CVarType;

use crate::engine::LOG_INFO;
use crate::engine_log;
use crate::plugin::ConsolePlugin;

/// Submitted via `inventory::submit!` by code that wants a variable in
/// the console without going through the bridge.
pub struct VariableRegistration {
    pub name: &'static str,
    pub cvar_type: CVarType,
    pub default_value: &'static str,
    pub flags: u32,
}

inventory::collect!(VariableRegistration);

/// Register every submitted variable on the plugin. Called once during
/// plugin start; duplicate names are fine (ids are assigned fresh), but a
/// registration failure is logged rather than aborting start.
pub fn register_all_from_inventory(plugin: &mut ConsolePlugin) {
    let mut count = 0u32;
    for reg in inventory::iter::<VariableRegistration> {
        match plugin.register_local_variable(reg.name, reg.cvar_type, reg.default_value, reg.flags)
        {
            Ok(_) => count += 1,
            Err(err) => {
                engine_log!(
                    plugin.bridge(),
                    crate::engine::LOG_WARNING,
                    "[Spyglass] skipped inventory variable '{}': {err}",
                    reg.name
                );
            }
        }
    }
    if count > 0 {
        engine_log!(
            plugin.bridge(),
            LOG_INFO,
            "[Spyglass] registered {count} variables from inventory"
        );
    }
}
