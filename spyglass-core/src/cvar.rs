// Console variables (cvars): remotely tunable named values. Values travel
// the bridge as strings; the typed validation lives here so a malformed
// update from the engine can never corrupt a variable.

use crate::sorted_list::SortKey;

/// Value type of a console variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CVarType {
    Boolean,
    Integer,
    Float,
    String,
    Enum,
}

impl CVarType {
    /// Parse the type name used on the bridge. Returns None for unknown names.
    pub fn from_name(name: &str) -> Option<CVarType> {
        match name {
            "Boolean" => Some(CVarType::Boolean),
            "Integer" => Some(CVarType::Integer),
            "Float" => Some(CVarType::Float),
            "String" => Some(CVarType::String),
            "Enum" => Some(CVarType::Enum),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CVarType::Boolean => "Boolean",
            CVarType::Integer => "Integer",
            CVarType::Float => "Float",
            CVarType::String => "String",
            CVarType::Enum => "Enum",
        }
    }

    /// Only numeric variables may carry a range.
    pub fn is_numeric(self) -> bool {
        matches!(self, CVarType::Integer | CVarType::Float)
    }
}

/// Behavior flags, an explicit bit-set matching the bridge contract.
pub mod cvar_flags {
    pub const NONE: u32 = 0;
    /// Not listed in the UI.
    pub const HIDDEN: u32 = 1 << 1;
    /// Not persisted between sessions.
    pub const NO_ARCHIVE: u32 = 1 << 2;
}

/// Numeric slider range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CVarRange {
    pub min: f32,
    pub max: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CVar {
    id: i32,
    name: String,
    cvar_type: CVarType,
    value: String,
    default_value: String,
    /// Allowed values for enum variables, in display order.
    values: Vec<String>,
    flags: u32,
    range: Option<CVarRange>,
}

impl CVar {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        cvar_type: CVarType,
        value: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        CVar {
            id,
            name: name.into(),
            cvar_type,
            value: value.into(),
            default_value: default_value.into(),
            values: Vec::new(),
            flags: cvar_flags::NONE,
            range: None,
        }
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Attach a range. Ignored for non-numeric types (the invariant is
    /// `has_range ⇔ range set and type numeric`).
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        if self.cvar_type.is_numeric() {
            self.range = Some(CVarRange { min, max });
        }
        self
    }

    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn cvar_type(&self) -> CVarType {
        self.cvar_type
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[inline]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    #[inline]
    pub fn range(&self) -> Option<CVarRange> {
        self.range
    }

    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    pub fn is_default_value(&self) -> bool {
        self.value == self.default_value
    }

    /// Update the value after type validation. A value that does not parse
    /// for this variable's type leaves the previous value untouched and
    /// reports failure.
    pub fn set_value(&mut self, value: &str) -> bool {
        if !self.accepts(value) {
            return false;
        }
        self.value = value.to_owned();
        true
    }

    pub fn reset_to_default(&mut self) {
        self.value = self.default_value.clone();
    }

    fn accepts(&self, value: &str) -> bool {
        match self.cvar_type {
            CVarType::String => true,
            // Booleans travel as "0"/"1" but tolerate spelled-out forms.
            CVarType::Boolean => {
                matches!(value, "0" | "1" | "true" | "false") || value.parse::<i32>().is_ok()
            }
            CVarType::Integer => value.parse::<i32>().is_ok(),
            CVarType::Float => value.parse::<f32>().is_ok_and(f32::is_finite),
            CVarType::Enum => self.values.iter().any(|allowed| allowed == value),
        }
    }
}

impl SortKey for CVar {
    fn sort_key(&self) -> &str {
        &self.name
    }
}
