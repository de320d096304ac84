use std::fmt;

use serde_json::{Map, Number, Value};

use crate::{
    data::infer::{Inference, infer},
    error::{ConfigError, Result},
    name::format_setting_name,
};

/// Semantic type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingType {
    Boolean,
    String,
    Number,
    Array,
    /// Multi-line string.
    Text,
    Dropdown,
    /// Edited and serialized by per-key logic.
    Custom,
    /// Nested object kept as-is.
    Compound,
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingType::Boolean => "Boolean",
            SettingType::String => "String",
            SettingType::Number => "Number",
            SettingType::Array => "Array",
            SettingType::Text => "Text",
            SettingType::Dropdown => "Dropdown",
            SettingType::Custom => "Custom",
            SettingType::Compound => "Compound",
        };
        f.write_str(name)
    }
}

/// Value payload of a setting; the variant is the setting's type.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean state is carried by [`Setting::enabled`].
    Boolean,
    String(String),
    Text(String),
    Number(Number),
    Array(Vec<String>),
    /// Selected option, a member of [`Setting::options`] or empty.
    Dropdown(String),
    /// Raw value of a custom key.
    Custom(Value),
    Compound(Map<String, Value>),
}

impl SettingValue {
    /// Type tag of this payload.
    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::Boolean => SettingType::Boolean,
            SettingValue::String(_) => SettingType::String,
            SettingValue::Text(_) => SettingType::Text,
            SettingValue::Number(_) => SettingType::Number,
            SettingValue::Array(_) => SettingType::Array,
            SettingValue::Dropdown(_) => SettingType::Dropdown,
            SettingValue::Custom(_) => SettingType::Custom,
            SettingValue::Compound(_) => SettingType::Compound,
        }
    }

    /// Convert a raw JSON value into the payload for `setting_type`.
    fn from_raw(setting_type: SettingType, value: &Value) -> Self {
        match setting_type {
            SettingType::Boolean => SettingValue::Boolean,
            SettingType::String => SettingValue::String(raw_string(value)),
            SettingType::Text => SettingValue::Text(raw_string(value)),
            SettingType::Dropdown => SettingValue::Dropdown(raw_string(value)),
            SettingType::Number => SettingValue::Number(match value {
                Value::Number(n) => n.clone(),
                _ => Number::from(0),
            }),
            SettingType::Array => SettingValue::Array(match value {
                Value::Array(items) => items.iter().map(raw_string).collect(),
                _ => Vec::new(),
            }),
            SettingType::Custom => SettingValue::Custom(value.clone()),
            SettingType::Compound => SettingValue::Compound(match value {
                Value::Object(map) => map.clone(),
                _ => Map::new(),
            }),
        }
    }
}

fn raw_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse edited text into a number: integers stay integers, anything
/// unparseable becomes `0.0`.
pub fn parse_number(text: &str) -> Number {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Number::from(i);
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .or_else(|| Number::from_f64(0.0))
        .unwrap_or(Number::from(0))
}

const DISPLAY_LIMIT: usize = 20;
const DISPLAY_KEEP: usize = 17;

fn truncate_for_display(s: &str) -> String {
    if s.chars().count() > DISPLAY_LIMIT {
        let kept: String = s.chars().take(DISPLAY_KEEP).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// A single configurable field of a clone profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    /// Globally unique key, stable across sessions.
    pub key: String,
    /// Label derived from the key; never persisted.
    pub display_name: String,
    /// Typed payload.
    pub value: SettingValue,
    /// Primary flag of Boolean and Custom settings.
    pub enabled: bool,
    /// Options of a Dropdown setting, empty otherwise.
    pub options: Vec<String>,
    /// Fixed description, may be empty.
    pub description: String,
    /// Whether the setting gates dependent child fields.
    pub is_parent: bool,
    /// Dependent fields of an expanding custom setting.
    pub children: Option<Vec<Setting>>,
    /// Last identifier produced for a setting whose payload is not a string.
    pub generated: Option<String>,
}

impl Setting {
    /// Build a setting from a raw key/value pair using type inference.
    pub fn from_raw(key: &str, value: &Value) -> Self {
        let Inference {
            setting_type,
            mut options,
            is_parent,
            description,
        } = infer(key, value);

        let value_payload = SettingValue::from_raw(setting_type, value);
        if let SettingValue::Dropdown(selected) = &value_payload {
            if !selected.is_empty() && !options.contains(selected) {
                debug!("{key}: keeping unlisted option `{selected}`");
                options.push(selected.clone());
            }
        }

        let enabled = match value {
            Value::Bool(b) => *b,
            _ => true,
        };

        Self {
            key: key.to_string(),
            display_name: format_setting_name(key),
            value: value_payload,
            enabled,
            options,
            description,
            is_parent,
            children: None,
            generated: None,
        }
    }

    /// Create a boolean setting.
    pub fn boolean(key: &str, enabled: bool) -> Self {
        Self::from_raw(key, &Value::Bool(enabled))
    }

    /// Type tag of the current payload.
    pub fn setting_type(&self) -> SettingType {
        self.value.setting_type()
    }

    /// Whether the setting is edited through a dedicated editor.
    pub fn has_custom_editor(&self) -> bool {
        matches!(
            self.setting_type(),
            SettingType::Custom | SettingType::Compound
        )
    }

    /// Short text summarizing the value for list views.
    pub fn display_value(&self) -> String {
        match &self.value {
            SettingValue::Boolean | SettingValue::Custom(Value::Bool(_)) => {
                match &self.generated {
                    Some(generated) if self.enabled => {
                        format!("{} ({generated})", self.enabled_label())
                    }
                    _ => self.enabled_label().to_string(),
                }
            }
            SettingValue::String(s) | SettingValue::Text(s) => truncate_for_display(s),
            SettingValue::Number(n) => n.to_string(),
            SettingValue::Array(items) if items.is_empty() => "[0 items]".to_string(),
            SettingValue::Array(items) => format!("{} item(s)", items.len()),
            SettingValue::Dropdown(s) => s.clone(),
            SettingValue::Custom(v) => v.to_string(),
            SettingValue::Compound(_) => "Complex Setting".to_string(),
        }
    }

    fn enabled_label(&self) -> &'static str {
        if self.enabled { "Enabled" } else { "Disabled" }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Apply text typed into an editor.
    ///
    /// Numbers fall back to `0.0` when the text does not parse, arrays take
    /// one trimmed entry per non-blank line and dropdowns accept only one of
    /// their options.
    pub fn set_text_input(&mut self, text: &str) -> Result<()> {
        match self.setting_type() {
            SettingType::Dropdown => return self.select_option(text),
            SettingType::Boolean | SettingType::Custom | SettingType::Compound => {
                return Err(self.not_editable());
            }
            _ => {}
        }

        match &mut self.value {
            SettingValue::String(s) | SettingValue::Text(s) => *s = text.to_string(),
            SettingValue::Number(n) => *n = parse_number(text),
            SettingValue::Array(items) => {
                *items = text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {}
        }
        Ok(())
    }

    /// Select a dropdown option. The empty string clears the selection.
    pub fn select_option(&mut self, option: &str) -> Result<()> {
        if self.setting_type() != SettingType::Dropdown {
            return Err(self.not_editable());
        }
        if !option.is_empty() && !self.options.iter().any(|o| o == option) {
            return Err(ConfigError::InvalidOption {
                key: self.key.clone(),
                options: self.options.clone(),
                actual: option.to_string(),
            });
        }
        self.value = SettingValue::Dropdown(option.to_string());
        Ok(())
    }

    fn not_editable(&self) -> ConfigError {
        ConfigError::NotEditable {
            key: self.key.clone(),
            setting_type: self.setting_type().to_string(),
        }
    }

    /// Dependent child with the given key.
    pub fn child(&self, key: &str) -> Option<&Setting> {
        self.children.as_ref()?.iter().find(|c| c.key == key)
    }

    /// Mutable dependent child with the given key.
    pub fn child_mut(&mut self, key: &str) -> Option<&mut Setting> {
        self.children.as_mut()?.iter_mut().find(|c| c.key == key)
    }

    /// Serialize the setting's own value (children are not included).
    pub fn as_json(&self) -> Value {
        match &self.value {
            SettingValue::Boolean => Value::Bool(self.enabled),
            SettingValue::String(s) | SettingValue::Text(s) | SettingValue::Dropdown(s) => {
                Value::String(s.clone())
            }
            SettingValue::Number(n) => Value::Number(n.clone()),
            SettingValue::Array(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            SettingValue::Custom(Value::Bool(_)) => Value::Bool(self.enabled),
            SettingValue::Custom(raw) => raw.clone(),
            SettingValue::Compound(map) => Value::Object(map.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_boolean_enabled_follows_value() {
        let on = Setting::from_raw("changeAndroidId", &json!(true));
        let off = Setting::from_raw("changeImei", &json!(false));
        assert_eq!(on.setting_type(), SettingType::Boolean);
        assert!(on.enabled);
        assert!(!off.enabled);
        assert_eq!(off.display_name, "Change IMEI");
        assert_eq!(off.as_json(), json!(false));
    }

    #[test]
    fn test_number_keeps_integer() {
        let setting = Setting::from_raw("spoofLocationInterval", &json!(5));
        assert_eq!(setting.as_json(), json!(5));
        let setting = Setting::from_raw("spoofLocationInterval", &json!(2.5));
        assert_eq!(setting.as_json(), json!(2.5));
    }

    #[test]
    fn test_number_text_input() {
        let mut setting = Setting::from_raw("customInstallUpdateTime", &json!(0));
        setting.set_text_input("42").unwrap();
        assert_eq!(setting.as_json(), json!(42));
        setting.set_text_input("1.5").unwrap();
        assert_eq!(setting.as_json(), json!(1.5));
        setting.set_text_input("not a number").unwrap();
        assert_eq!(setting.as_json(), json!(0.0));
    }

    #[test]
    fn test_array_text_input() {
        let mut setting = Setting::from_raw("addPermissions", &json!([]));
        setting
            .set_text_input("  android.permission.CAMERA \n\n android.permission.INTERNET\n")
            .unwrap();
        assert_eq!(
            setting.as_json(),
            json!(["android.permission.CAMERA", "android.permission.INTERNET"])
        );
        assert_eq!(setting.display_value(), "2 item(s)");
    }

    #[test]
    fn test_dropdown_selection() {
        let mut setting = Setting::from_raw("relativeInstallUpdateTimeUnit", &json!("days"));
        setting.select_option("weeks").unwrap();
        assert_eq!(setting.as_json(), json!("weeks"));
        assert!(matches!(
            setting.select_option("years"),
            Err(ConfigError::InvalidOption { .. })
        ));
        assert_eq!(setting.as_json(), json!("weeks"));
        setting.set_text_input("").unwrap();
        assert_eq!(setting.as_json(), json!(""));
    }

    #[test]
    fn test_dropdown_unlisted_value_kept() {
        let setting = Setting::from_raw("changeLocale", &json!("nl_NL"));
        assert_eq!(setting.as_json(), json!("nl_NL"));
        assert_eq!(setting.options.last().map(String::as_str), Some("nl_NL"));
    }

    #[test]
    fn test_custom_passthrough() {
        let mut cookies = Setting::from_raw("webViewCookies", &json!(false));
        assert_eq!(cookies.setting_type(), SettingType::Custom);
        cookies.set_enabled(true);
        assert_eq!(cookies.as_json(), json!(true));

        let list = Setting::from_raw("customBuildProps", &json!(["ro.a=1"]));
        assert_eq!(list.as_json(), json!(["ro.a=1"]));
        assert!(list.has_custom_editor());
        assert!(matches!(
            Setting::from_raw("customBuildProps", &json!([])).set_text_input("x"),
            Err(ConfigError::NotEditable { .. })
        ));
    }

    #[test]
    fn test_display_value() {
        let long = Setting::from_raw("serialFormat", &json!("abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(long.display_value(), "abcdefghijklmnopq...");
        let short = Setting::from_raw("serialFormat", &json!("abc"));
        assert_eq!(short.display_value(), "abc");
        let empty = Setting::from_raw("addProviders", &json!([]));
        assert_eq!(empty.display_value(), "[0 items]");
        let compound = Setting::from_raw("stringsProperties", &json!({}));
        assert_eq!(compound.display_value(), "Complex Setting");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 7 "), Number::from(7));
        assert_eq!(parse_number("-3.25").as_f64(), Some(-3.25));
        assert_eq!(parse_number("").as_f64(), Some(0.0));
        assert_eq!(parse_number("NaN").as_f64(), Some(0.0));
    }
}
