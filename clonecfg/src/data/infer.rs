use serde_json::Value;

use crate::data::{catalog, setting::SettingType};

/// Editing metadata derived from a raw key/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Semantic type of the setting.
    pub setting_type: SettingType,
    /// Dropdown options, empty for every other type.
    pub options: Vec<String>,
    /// Whether the setting gates dependent child fields.
    pub is_parent: bool,
    /// Fixed description, empty when unmapped.
    pub description: String,
}

/// Infer the setting type and editing metadata of a raw value.
///
/// Resolution order, first match wins: custom-editor keys, booleans,
/// numbers, strings (dropdown keys, then multi-line text keys), lists,
/// objects. Anything else (`null`) falls back to a plain string.
pub fn infer(key: &str, value: &Value) -> Inference {
    let setting_type = infer_type(key, value);
    let options = match setting_type {
        SettingType::Dropdown => catalog::dropdown_options(key)
            .unwrap_or_default()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        _ => Vec::new(),
    };

    Inference {
        setting_type,
        options,
        is_parent: catalog::is_parent_key(key),
        description: catalog::description(key).to_string(),
    }
}

fn infer_type(key: &str, value: &Value) -> SettingType {
    if catalog::is_custom_key(key) {
        return SettingType::Custom;
    }

    match value {
        Value::Bool(_) => SettingType::Boolean,
        Value::Number(_) => SettingType::Number,
        Value::String(_) => {
            if catalog::dropdown_options(key).is_some() {
                SettingType::Dropdown
            } else if is_text_key(key) {
                SettingType::Text
            } else {
                SettingType::String
            }
        }
        Value::Array(_) => SettingType::Array,
        Value::Object(_) => SettingType::Compound,
        Value::Null => SettingType::String,
    }
}

/// Keys whose string values are edited as multi-line text.
fn is_text_key(key: &str) -> bool {
    key.contains("Expression") || key.contains("Content") || key == "customBuildPropsFile"
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_dropdown_keys() {
        for (key, _) in catalog::DROPDOWN_KEYS {
            let inferred = infer(key, &json!("DISABLED"));
            assert_eq!(inferred.setting_type, SettingType::Dropdown, "{key}");
            assert!(!inferred.options.is_empty(), "{key}");
        }
    }

    #[test]
    fn test_custom_keys_ignore_value_shape() {
        let shapes = [
            json!(true),
            json!(3),
            json!("text"),
            json!(["a"]),
            json!({"a": 1}),
            Value::Null,
        ];
        for (key, _) in catalog::CUSTOM_KEYS {
            for shape in &shapes {
                assert_eq!(infer(key, shape).setting_type, SettingType::Custom, "{key}");
            }
        }
    }

    #[test]
    fn test_value_shapes() {
        assert_eq!(infer("changeImei", &json!(false)).setting_type, SettingType::Boolean);
        assert_eq!(
            infer("spoofLocationInterval", &json!(0)).setting_type,
            SettingType::Number
        );
        assert_eq!(infer("serialFormat", &json!("")).setting_type, SettingType::String);
        assert_eq!(infer("addPermissions", &json!([])).setting_type, SettingType::Array);
        assert_eq!(
            infer("stringsProperties", &json!({})).setting_type,
            SettingType::Compound
        );
        assert_eq!(infer("unknown", &Value::Null).setting_type, SettingType::String);
    }

    #[test]
    fn test_dropdown_only_for_strings() {
        // 下拉框键只有在值为字符串时才会被识别为下拉框
        let inferred = infer("addSnow", &json!(false));
        assert_eq!(inferred.setting_type, SettingType::Boolean);
        assert!(inferred.options.is_empty());
    }

    #[test]
    fn test_text_keys() {
        for key in [
            "webViewUrlDataMonitorRegularExpression",
            "hostsBlockerFileContent",
            "customBuildPropsFile",
        ] {
            assert_eq!(infer(key, &json!("")).setting_type, SettingType::Text, "{key}");
        }
    }

    #[test]
    fn test_parent_and_description() {
        let inferred = infer("hostsBlocker", &json!(false));
        assert!(inferred.is_parent);
        assert_eq!(inferred.description, "Block specific hosts/domains");

        let inferred = infer("changeLocale", &json!("en_US"));
        assert!(!inferred.is_parent);
        assert_eq!(inferred.description, "");
        assert_eq!(inferred.options.first().map(String::as_str), Some("en_US"));
    }

    #[test]
    fn test_deterministic() {
        let value = json!("ja_JP");
        assert_eq!(infer("changeLocale", &value), infer("changeLocale", &value));
    }
}
