// The plugin object behind the C exports: owns the console store, the
// action/variable registry, the filtered overlay view, and the settings
// parsed at initialization. One instance per process, driven from the
// bridge thread.

use spyglass_core::{
    ActionRegistry, CVar, CVarType, Console, ConsoleError, ConsoleResult, LogType, PluginSettings,
    RegistryEvent, RegistryFilter, RichText,
};

use crate::engine::{
    EngineBridge, LOG_WARNING, MSG_CONSOLE_ACTION, MSG_CONSOLE_CLOSE, MSG_CONSOLE_OPEN,
    MSG_CONSOLE_VARIABLE_SET,
};
use crate::engine_log;

/// Parameters for registering a variable over the bridge; mirrors the
/// `spyglass_cvar_register` argument list.
pub struct VariableSpec<'a> {
    pub id: i32,
    pub name: &'a str,
    pub type_name: &'a str,
    pub value: &'a str,
    pub default_value: &'a str,
    pub flags: u32,
    pub range: Option<(f32, f32)>,
    /// Comma-separated list of allowed values for Enum variables.
    pub values_csv: &'a str,
}

pub struct ConsolePlugin {
    target_name: String,
    method_name: String,
    version: String,
    settings: PluginSettings,
    console: Console,
    registry: ActionRegistry,
    filter: RegistryFilter,
    bridge: EngineBridge,
    // Locally-registered variables (inventory submissions) get ids from
    // the negative space so they never collide with host-assigned ids.
    next_local_id: i32,
}

impl ConsolePlugin {
    /// Build the plugin from the initialization arguments. A malformed
    /// settings document is reported through the engine log and replaced
    /// with defaults; initialization itself never fails on bad settings.
    pub fn new(
        target_name: &str,
        method_name: &str,
        version: &str,
        settings_json: &str,
        bridge: EngineBridge,
    ) -> Self {
        let settings = match PluginSettings::from_json(settings_json) {
            Ok(settings) => settings,
            Err(err) => {
                engine_log!(bridge, LOG_WARNING, "[Spyglass] {err}; using defaults");
                PluginSettings::default()
            }
        };
        let console = Console::new(settings.capacity, settings.trim);
        let registry = ActionRegistry::new(settings.sort_actions, settings.sort_variables);
        let filter = RegistryFilter::new(&registry);
        let mut plugin = ConsolePlugin {
            target_name: target_name.to_owned(),
            method_name: method_name.to_owned(),
            version: version.to_owned(),
            settings,
            console,
            registry,
            filter,
            bridge,
            next_local_id: -1,
        };
        crate::variables::register_all_from_inventory(&mut plugin);
        plugin
    }

    #[inline]
    pub(crate) fn bridge(&self) -> EngineBridge {
        self.bridge
    }

    #[inline]
    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[inline]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    #[inline]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    #[inline]
    pub fn console(&self) -> &Console {
        &self.console
    }

    #[inline]
    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    #[inline]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    #[inline]
    pub fn filter(&self) -> &RegistryFilter {
        &self.filter
    }

    // -----------------------------------------------------------------
    // Console operations (inbound)
    // -----------------------------------------------------------------

    /// Store a log line. Rich-text markup is parsed only when enabled in
    /// the settings; otherwise the raw string passes through untouched.
    pub fn log_message(
        &mut self,
        message: &str,
        stack_trace: &str,
        raw_type: u8,
    ) -> ConsoleResult<()> {
        let log_type =
            LogType::from_raw(raw_type).ok_or(ConsoleError::InvalidLogType(raw_type))?;
        let message = if self.settings.rich_text_tags {
            RichText::parse(message)
        } else {
            RichText::plain(message)
        };
        let stack_trace = if stack_trace.is_empty() {
            None
        } else {
            Some(stack_trace.to_owned())
        };
        self.console.log_message(message, stack_trace, log_type);
        Ok(())
    }

    /// Console UI became visible; notify the managed listener.
    pub fn show(&mut self) {
        self.bridge.send_message(MSG_CONSOLE_OPEN);
    }

    /// Console UI was dismissed; notify the managed listener.
    pub fn hide(&mut self) {
        self.bridge.send_message(MSG_CONSOLE_CLOSE);
    }

    pub fn clear(&mut self) {
        self.console.clear();
    }

    // -----------------------------------------------------------------
    // Registry operations (inbound)
    // -----------------------------------------------------------------

    pub fn register_action(&mut self, id: i32, name: &str) -> ConsoleResult<()> {
        let Some(index) = self.registry.register_action(id, name) else {
            return Err(ConsoleError::DuplicateId(id));
        };
        self.filter
            .handle_event(&self.registry, &RegistryEvent::ActionAdded { id, index });
        Ok(())
    }

    /// Unknown ids are a silent no-op, reported through the return value.
    pub fn unregister_action(&mut self, id: i32) -> bool {
        let Some(name) = self.registry.find_action(id).map(|a| a.name().to_owned()) else {
            return false;
        };
        self.registry.unregister_action(id);
        self.filter.handle_event(
            &self.registry,
            &RegistryEvent::ActionRemoved { id, name, index: 0 },
        );
        true
    }

    pub fn register_variable(&mut self, spec: VariableSpec<'_>) -> ConsoleResult<()> {
        let cvar_type = CVarType::from_name(spec.type_name).ok_or_else(|| {
            ConsoleError::InvalidArgument(format!("unknown variable type '{}'", spec.type_name))
        })?;
        let mut cvar = CVar::new(spec.id, spec.name, cvar_type, spec.value, spec.default_value)
            .with_flags(spec.flags);
        if let Some((min, max)) = spec.range {
            cvar = cvar.with_range(min, max);
        }
        if cvar_type == CVarType::Enum {
            let values: Vec<String> = spec
                .values_csv
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
                .collect();
            cvar = cvar.with_values(values);
        }
        let id = spec.id;
        let Some(index) = self.registry.register_variable(cvar) else {
            return Err(ConsoleError::DuplicateId(id));
        };
        self.filter.handle_event(
            &self.registry,
            &RegistryEvent::VariableRegistered { id, index },
        );
        Ok(())
    }

    /// Register a variable submitted from Rust code rather than over the
    /// bridge; ids are assigned from the local (negative) space.
    pub fn register_local_variable(
        &mut self,
        name: &str,
        cvar_type: CVarType,
        default_value: &str,
        flags: u32,
    ) -> ConsoleResult<i32> {
        let id = self.next_local_id;
        self.next_local_id -= 1;
        let cvar = CVar::new(id, name, cvar_type, default_value, default_value).with_flags(flags);
        let Some(index) = self.registry.register_variable(cvar) else {
            return Err(ConsoleError::DuplicateId(id));
        };
        self.filter.handle_event(
            &self.registry,
            &RegistryEvent::VariableRegistered { id, index },
        );
        Ok(id)
    }

    /// Host-side value change (no script message back; the host already
    /// knows). Rejected values keep the previous one.
    pub fn update_variable(&mut self, id: i32, value: &str) -> ConsoleResult<()> {
        let index = self.registry.set_variable_value(id, value)?;
        self.filter
            .handle_event(&self.registry, &RegistryEvent::VariableChanged { id, index });
        Ok(())
    }

    // -----------------------------------------------------------------
    // UI-driven operations (outbound script messages)
    // -----------------------------------------------------------------

    /// The user tapped an action in the console UI.
    pub fn invoke_action(&mut self, id: i32) -> ConsoleResult<()> {
        if self.registry.find_action(id).is_none() {
            return Err(ConsoleError::UnknownId(id));
        }
        self.bridge.send_message_with(
            MSG_CONSOLE_ACTION,
            &serde_json::json!({ "id": id.to_string() }),
        );
        Ok(())
    }

    /// The user edited a variable in the console UI: validate, store, and
    /// forward the new value to the managed runtime.
    pub fn set_variable(&mut self, id: i32, value: &str) -> ConsoleResult<()> {
        self.update_variable(id, value)?;
        self.bridge.send_message_with(
            MSG_CONSOLE_VARIABLE_SET,
            &serde_json::json!({ "id": id.to_string(), "value": value }),
        );
        Ok(())
    }

    pub fn set_action_filter_text(&mut self, text: &str) -> bool {
        self.filter.set_filter_text(&self.registry, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{capture_bridge, drain_logged, drain_sent};
    use spyglass_core::cvar_flags;

    fn plugin_with(settings_json: &str) -> ConsolePlugin {
        ConsolePlugin::new("SpyglassListener", "OnMessage", "1.0.0", settings_json, capture_bridge())
    }

    #[test]
    fn bad_settings_fall_back_to_defaults_with_a_warning() {
        let _ = drain_logged();
        let plugin = plugin_with("{broken");
        assert_eq!(plugin.settings().capacity, 4096);
        let logged = drain_logged();
        let warnings: Vec<_> = logged
            .iter()
            .filter(|(level, _)| *level == LOG_WARNING)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].1.contains("defaults"));
    }

    #[test]
    fn log_message_rejects_invalid_raw_type() {
        let mut plugin = plugin_with("{}");
        assert_eq!(
            plugin.log_message("x", "", 9),
            Err(ConsoleError::InvalidLogType(9))
        );
        assert!(plugin.log_message("x", "", 0).is_ok());
        assert_eq!(plugin.console().count(), 1);
    }

    #[test]
    fn rich_text_setting_controls_parsing() {
        let mut plugin = plugin_with(r#"{"richTextTags": true}"#);
        plugin.log_message("<b>bold</b>", "", 3).unwrap();
        let entry = plugin.console().entry_at(0).unwrap();
        assert_eq!(entry.message.text(), "bold");

        let mut plugin = plugin_with("{}");
        plugin.log_message("<b>bold</b>", "", 3).unwrap();
        let entry = plugin.console().entry_at(0).unwrap();
        assert_eq!(entry.message.text(), "<b>bold</b>");
    }

    #[test]
    fn show_hide_send_script_messages() {
        let mut plugin = plugin_with("{}");
        let _ = drain_sent();
        plugin.show();
        plugin.hide();
        assert_eq!(
            drain_sent(),
            vec![
                ("console_open".to_owned(), String::new()),
                ("console_close".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn duplicate_registrations_report_duplicate_id() {
        let mut plugin = plugin_with("{}");
        assert!(plugin.register_action(1, "Jump").is_ok());
        assert_eq!(
            plugin.register_action(1, "Jump Again"),
            Err(ConsoleError::DuplicateId(1))
        );
        assert!(plugin.unregister_action(1));
        assert!(!plugin.unregister_action(1));
    }

    #[test]
    fn enum_variable_values_come_from_csv() {
        let mut plugin = plugin_with("{}");
        plugin
            .register_variable(VariableSpec {
                id: 7,
                name: "quality",
                type_name: "Enum",
                value: "Medium",
                default_value: "Medium",
                flags: cvar_flags::NONE,
                range: None,
                values_csv: "Low, Medium, High",
            })
            .unwrap();
        assert!(plugin.update_variable(7, "High").is_ok());
        assert_eq!(
            plugin.update_variable(7, "Ultra"),
            Err(ConsoleError::InvalidValue("Ultra".into()))
        );
        assert_eq!(plugin.registry().find_variable(7).unwrap().value(), "High");
    }

    #[test]
    fn unknown_variable_type_is_invalid_argument() {
        let mut plugin = plugin_with("{}");
        let result = plugin.register_variable(VariableSpec {
            id: 1,
            name: "v",
            type_name: "Vector",
            value: "",
            default_value: "",
            flags: 0,
            range: None,
            values_csv: "",
        });
        assert!(matches!(result, Err(ConsoleError::InvalidArgument(_))));
    }

    #[test]
    fn ui_edits_round_trip_through_script_messages() {
        let mut plugin = plugin_with("{}");
        plugin.register_action(3, "Restart").unwrap();
        plugin
            .register_variable(VariableSpec {
                id: 4,
                name: "speed",
                type_name: "Float",
                value: "1.0",
                default_value: "1.0",
                flags: 0,
                range: Some((0.0, 10.0)),
                values_csv: "",
            })
            .unwrap();
        let _ = drain_sent();
        plugin.invoke_action(3).unwrap();
        plugin.set_variable(4, "2.5").unwrap();
        assert_eq!(
            drain_sent(),
            vec![
                ("console_action".to_owned(), r#"{"id":"3"}"#.to_owned()),
                (
                    "console_variable_set".to_owned(),
                    r#"{"id":"4","value":"2.5"}"#.to_owned()
                ),
            ]
        );
        assert_eq!(plugin.registry().find_variable(4).unwrap().value(), "2.5");
        assert_eq!(
            plugin.invoke_action(99),
            Err(ConsoleError::UnknownId(99))
        );
    }

    #[test]
    fn filter_overlay_tracks_registrations() {
        let mut plugin = plugin_with("{}");
        plugin.register_action(1, "Reload").unwrap();
        plugin.register_action(2, "Quit").unwrap();
        assert!(plugin.set_action_filter_text("re"));
        assert_eq!(plugin.filter().action_count(), 1);
        plugin.register_action(3, "Respawn").unwrap();
        assert_eq!(plugin.filter().action_count(), 2);
        plugin.unregister_action(1);
        assert_eq!(plugin.filter().action_count(), 1);
    }
}
