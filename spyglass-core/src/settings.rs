// Plugin settings, deserialized from the JSON document the game engine
// hands over at initialization. Field names are camelCase on the wire;
// every field is optional and falls back to its documented default, and
// unknown fields are ignored so older and newer hosts interoperate.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::error::{ConsoleError, ConsoleResult};

/// Gesture used to open the console UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gesture {
    None,
    #[default]
    SwipeDown,
}

/// Which log classes pop the exception warning bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExceptionWarningDisplayMode {
    None,
    Errors,
    Exceptions,
    #[default]
    All,
}

/// RGBA color as carried in the settings document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for SettingsColor {
    fn default() -> Self {
        SettingsColor {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }
}

impl SettingsColor {
    pub const fn from_argb(argb: u32) -> Self {
        SettingsColor {
            a: ((argb >> 24) & 0xff) as u8,
            r: ((argb >> 16) & 0xff) as u8,
            g: ((argb >> 8) & 0xff) as u8,
            b: (argb & 0xff) as u8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogEntryColors {
    pub foreground: SettingsColor,
    pub background: SettingsColor,
}

impl LogEntryColors {
    const fn from_argb(foreground: u32, background: u32) -> Self {
        LogEntryColors {
            foreground: SettingsColor::from_argb(foreground),
            background: SettingsColor::from_argb(background),
        }
    }
}

impl Default for LogEntryColors {
    fn default() -> Self {
        LogEntryColors::from_argb(0xFFEA4646, 0xFF1E1E1E)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogOverlayColors {
    pub exception: LogEntryColors,
    pub error: LogEntryColors,
    pub warning: LogEntryColors,
    pub debug: LogEntryColors,
}

impl Default for LogOverlayColors {
    fn default() -> Self {
        LogOverlayColors {
            exception: LogEntryColors::from_argb(0xFFEA4646, 0xFF1E1E1E),
            error: LogEntryColors::from_argb(0xFFEA4646, 0xFF1E1E1E),
            warning: LogEntryColors::from_argb(0xFFCBCB40, 0xFF1E1E1E),
            debug: LogEntryColors::from_argb(0xFF9BDDFF, 0xFF1E1E1E),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogOverlaySettings {
    pub enabled: bool,
    pub max_visible_lines: u32,
    pub timeout: f32,
    pub colors: LogOverlayColors,
}

impl Default for LogOverlaySettings {
    fn default() -> Self {
        LogOverlaySettings {
            enabled: false,
            max_visible_lines: 3,
            timeout: 1.0,
            colors: LogOverlayColors::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExceptionWarningSettings {
    pub display_mode: ExceptionWarningDisplayMode,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginSettings {
    pub exception_warning: ExceptionWarningSettings,
    pub log_overlay: LogOverlaySettings,
    pub capacity: usize,
    pub trim: usize,
    pub gesture: Gesture,
    pub rich_text_tags: bool,
    pub sort_actions: bool,
    pub sort_variables: bool,
    pub emails: Vec<String>,
}

impl Default for PluginSettings {
    fn default() -> Self {
        PluginSettings {
            exception_warning: ExceptionWarningSettings::default(),
            log_overlay: LogOverlaySettings::default(),
            capacity: 4096,
            trim: 512,
            gesture: Gesture::default(),
            rich_text_tags: false,
            sort_actions: true,
            sort_variables: true,
            emails: Vec::new(),
        }
    }
}

impl PluginSettings {
    /// Parse a settings document. The trim count is clamped so the store
    /// constructor's `trim <= capacity` requirement always holds.
    pub fn from_json(json: &str) -> ConsoleResult<Self> {
        let mut settings: PluginSettings = serde_json::from_str(json)
            .map_err(|err| ConsoleError::InvalidArgument(format!("bad settings json: {err}")))?;
        if settings.capacity == 0 {
            settings.capacity = PluginSettings::default().capacity;
        }
        if settings.trim == 0 || settings.trim > settings.capacity {
            settings.trim = settings.capacity.min(PluginSettings::default().trim);
        }
        Ok(settings)
    }
}

// Hosts serialize enums either as their numeric value or as the variant
// name, depending on the serializer in play; accept both.
fn enum_token<'de, D>(deserializer: D) -> Result<EnumToken, D::Error>
where
    D: Deserializer<'de>,
{
    struct TokenVisitor;

    impl<'de> Visitor<'de> for TokenVisitor {
        type Value = EnumToken;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("an enum value as an integer or a string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<EnumToken, E> {
            Ok(EnumToken::Number(value as i64))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<EnumToken, E> {
            Ok(EnumToken::Number(value))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<EnumToken, E> {
            Ok(EnumToken::Name(value.to_owned()))
        }
    }

    deserializer.deserialize_any(TokenVisitor)
}

enum EnumToken {
    Number(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for Gesture {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match enum_token(deserializer)? {
            EnumToken::Number(0) => Ok(Gesture::None),
            EnumToken::Number(1) => Ok(Gesture::SwipeDown),
            EnumToken::Number(other) => Err(de::Error::custom(format!(
                "unknown gesture value {other}"
            ))),
            EnumToken::Name(name) => match name.as_str() {
                "None" => Ok(Gesture::None),
                "SwipeDown" => Ok(Gesture::SwipeDown),
                other => Err(de::Error::custom(format!("unknown gesture '{other}'"))),
            },
        }
    }
}

impl<'de> Deserialize<'de> for ExceptionWarningDisplayMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match enum_token(deserializer)? {
            EnumToken::Number(0) => Ok(ExceptionWarningDisplayMode::None),
            EnumToken::Number(1) => Ok(ExceptionWarningDisplayMode::Errors),
            EnumToken::Number(2) => Ok(ExceptionWarningDisplayMode::Exceptions),
            EnumToken::Number(3) => Ok(ExceptionWarningDisplayMode::All),
            EnumToken::Number(other) => Err(de::Error::custom(format!(
                "unknown display mode value {other}"
            ))),
            EnumToken::Name(name) => match name.as_str() {
                "None" => Ok(ExceptionWarningDisplayMode::None),
                "Errors" => Ok(ExceptionWarningDisplayMode::Errors),
                "Exceptions" => Ok(ExceptionWarningDisplayMode::Exceptions),
                "All" => Ok(ExceptionWarningDisplayMode::All),
                other => Err(de::Error::custom(format!("unknown display mode '{other}'"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = PluginSettings::default();
        assert_eq!(settings.capacity, 4096);
        assert_eq!(settings.trim, 512);
        assert_eq!(settings.gesture, Gesture::SwipeDown);
        assert!(!settings.rich_text_tags);
        assert!(settings.sort_actions);
        assert!(settings.sort_variables);
        assert!(!settings.log_overlay.enabled);
        assert_eq!(settings.log_overlay.max_visible_lines, 3);
        assert_eq!(settings.log_overlay.timeout, 1.0);
        assert_eq!(
            settings.exception_warning.display_mode,
            ExceptionWarningDisplayMode::All
        );
        assert_eq!(
            settings.log_overlay.colors.warning.foreground,
            SettingsColor {
                a: 0xFF,
                r: 0xCB,
                g: 0xCB,
                b: 0x40
            }
        );
    }

    #[test]
    fn partial_document_fills_defaults() {
        let settings =
            PluginSettings::from_json(r#"{"capacity": 1024, "richTextTags": true}"#).unwrap();
        assert_eq!(settings.capacity, 1024);
        assert!(settings.rich_text_tags);
        assert_eq!(settings.trim, 512);
        assert!(settings.sort_actions);
    }

    #[test]
    fn enums_accept_numbers_and_names() {
        let by_number = PluginSettings::from_json(
            r#"{"gesture": 0, "exceptionWarning": {"displayMode": 2}}"#,
        )
        .unwrap();
        assert_eq!(by_number.gesture, Gesture::None);
        assert_eq!(
            by_number.exception_warning.display_mode,
            ExceptionWarningDisplayMode::Exceptions
        );

        let by_name = PluginSettings::from_json(
            r#"{"gesture": "SwipeDown", "exceptionWarning": {"displayMode": "Errors"}}"#,
        )
        .unwrap();
        assert_eq!(by_name.gesture, Gesture::SwipeDown);
        assert_eq!(
            by_name.exception_warning.display_mode,
            ExceptionWarningDisplayMode::Errors
        );
    }

    #[test]
    fn trim_never_exceeds_capacity() {
        let settings = PluginSettings::from_json(r#"{"capacity": 256, "trim": 9999}"#).unwrap();
        assert_eq!(settings.trim, 256);
        let settings = PluginSettings::from_json(r#"{"capacity": 0, "trim": 0}"#).unwrap();
        assert_eq!(settings.capacity, 4096);
        assert_eq!(settings.trim, 512);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let settings = PluginSettings::from_json(r#"{"futureKnob": 42, "trim": 64}"#).unwrap();
        assert_eq!(settings.trim, 64);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(PluginSettings::from_json("{not json").is_err());
    }

    #[test]
    fn overlay_colors_parse_from_components() {
        let settings = PluginSettings::from_json(
            r#"{"logOverlay": {"enabled": true, "colors": {"debug": {"foreground": {"r": 1, "g": 2, "b": 3, "a": 4}}}}}"#,
        )
        .unwrap();
        assert!(settings.log_overlay.enabled);
        assert_eq!(
            settings.log_overlay.colors.debug.foreground,
            SettingsColor {
                r: 1,
                g: 2,
                b: 3,
                a: 4
            }
        );
        // Unspecified sibling colors keep their defaults.
        assert_eq!(
            settings.log_overlay.colors.debug.background,
            SettingsColor::from_argb(0xFF1E1E1E)
        );
        assert_eq!(
            settings.log_overlay.colors.error,
            LogEntryColors::default()
        );
    }
}
