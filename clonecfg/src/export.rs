//! Flattening the settings model back into the persisted map.
//!
//! All categories are merged into a single level. Custom settings are written
//! by the handler registered for their key in
//! [`CUSTOM_KEYS`](crate::data::catalog::CUSTOM_KEYS); every other setting
//! writes its own value.

use serde_json::{Map, Value};

use crate::{
    data::{
        catalog::{self, CustomHandler},
        category::Category,
        setting::{Setting, SettingValue},
    },
    error::Result,
};

/// The saved, single-level configuration.
pub type FlatMap = Map<String, Value>;

const CONFIG_FILE_SUFFIX: &str = "_cloneSettings.json";
const UNKNOWN_PACKAGE: &str = "unknown_package";

/// Flatten categories into the persisted map, in category/setting order.
pub fn build_configuration_map(categories: &[Category]) -> FlatMap {
    let mut config = FlatMap::new();
    for setting in categories.iter().flat_map(|c| c.settings.iter()) {
        write_setting(&mut config, setting);
    }
    config
}

fn write_setting(config: &mut FlatMap, setting: &Setting) {
    let handler = match &setting.value {
        SettingValue::Custom(_) => catalog::custom_handler(&setting.key),
        _ => None,
    };

    match handler {
        Some(CustomHandler::Expand(specs)) => {
            config.insert(setting.key.clone(), Value::Bool(setting.enabled));
            if !setting.enabled {
                return;
            }
            for spec in specs {
                let value = setting
                    .child(spec.key)
                    .map(Setting::as_json)
                    .unwrap_or_else(|| spec.default_value());
                config.insert(spec.key.to_string(), value);
            }
        }
        Some(CustomHandler::Passthrough) | None => {
            config.insert(setting.key.clone(), setting.as_json());
        }
    }
}

/// Pretty-printed JSON of the flattened configuration.
pub fn export_configuration(categories: &[Category]) -> Result<String> {
    let config = build_configuration_map(categories);
    Ok(serde_json::to_string_pretty(&config)?)
}

/// Escape serialized text for embedding inside a string literal.
///
/// Only backslash, double quote, newline, carriage return and tab are
/// escaped, in that order. Other control characters pass through unchanged.
pub fn escape_for_embedding(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Inverse of [`escape_for_embedding`].
///
/// Unknown escape sequences are kept as written.
pub fn unescape_embedded(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// File name a profile is saved under for the given package.
///
/// Path separators in the package name become `_`, so the name always stays
/// inside the output directory.
pub fn config_file_name(package_name: &str) -> String {
    let package_name = package_name.trim();
    if package_name.is_empty() {
        format!("{UNKNOWN_PACKAGE}{CONFIG_FILE_SUFFIX}")
    } else {
        let package_name = package_name.replace(['/', '\\'], "_");
        format!("{package_name}{CONFIG_FILE_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::parse::{ConfigDocument, parse_config_data};

    fn parse(value: Value) -> Vec<Category> {
        let Value::Object(doc) = value else {
            panic!("not an object")
        };
        parse_config_data(&doc).unwrap()
    }

    #[test]
    fn test_round_trip_plain_keys() {
        let input = json!({
            "deviceInformation": {
                "changeAndroidId": true,
                "changeImei": false,
                "changeLocale": "ja_JP"
            },
            "locationPrivacy": {
                "spoofLocationInterval": 15,
                "spoofLocationApi": "Google"
            },
            "webViewPrivacy": {
                "webViewUrlDataMonitorFilterStrings": ["a", "b"],
                "webViewUrlDataMonitorRegularExpression": "^https?://",
                "serialFormat": "SN-####"
            },
            "installTime": {
                "customInstallUpdateTime": 1.5
            }
        });
        let map = build_configuration_map(&parse(input.clone()));

        let Value::Object(doc) = input else { unreachable!() };
        let doc: ConfigDocument = doc;
        for settings in doc.values() {
            for (key, value) in settings.as_object().unwrap() {
                assert_eq!(map.get(key), Some(value), "{key}");
            }
        }
    }

    #[test]
    fn test_disabled_parent_hides_children() {
        let mut categories = parse(json!({
            "appData": {
                "bundleAppData": true,
                "bundleAppDataPath": "/sdcard/app.zip",
                "bundleAppDataPassword": "pw"
            }
        }));
        categories[0].settings[0].set_enabled(false);

        let map = build_configuration_map(&categories);
        assert_eq!(map.get("bundleAppData"), Some(&json!(false)));
        assert!(!map.contains_key("bundleAppDataPath"));
        assert!(!map.contains_key("bundleAppDataPassword"));
    }

    #[test]
    fn test_enabled_parent_emits_children() {
        let categories = parse(json!({
            "buildProperties": {
                "buildsProps": true,
                "buildPropsBrand": "google",
                "buildPropsModel": "Pixel 7a"
            }
        }));
        let map = build_configuration_map(&categories);
        assert_eq!(map.get("buildsProps"), Some(&json!(true)));
        assert_eq!(map.get("buildPropsBrand"), Some(&json!("google")));
        assert_eq!(map.get("buildPropsModel"), Some(&json!("Pixel 7a")));
        assert_eq!(map.get("buildPropsDeviceName"), Some(&json!("")));
        assert_eq!(map.get("buildPropsManufacturer"), Some(&json!("")));
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "buildsProps",
                "buildPropsDeviceName",
                "buildPropsManufacturer",
                "buildPropsBrand",
                "buildPropsModel"
            ]
        );
    }

    #[test]
    fn test_disabled_delete_on_exit() {
        let categories = parse(json!({
            "appData": {
                "deleteOnExit": false,
                "deleteFilesDirectoriesOnExit": ["cache"],
                "securelyDeleteFilesDirectoriesOnExit": true
            }
        }));
        let map = build_configuration_map(&categories);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("deleteOnExit"), Some(&json!(false)));
    }

    #[test]
    fn test_passthrough_custom_keys() {
        let categories = parse(json!({
            "systemSettings": {
                "hostsBlocker": true,
                "overrideSharedPreferences": [{"file": "prefs", "key": "a"}],
                "skipDialogsStrings": ["Rate us"],
                "stringsProperties": {"app_name": "Clone"}
            }
        }));
        let map = build_configuration_map(&categories);
        assert_eq!(map.get("hostsBlocker"), Some(&json!(true)));
        assert_eq!(
            map.get("overrideSharedPreferences"),
            Some(&json!([{"file": "prefs", "key": "a"}]))
        );
        assert_eq!(map.get("skipDialogsStrings"), Some(&json!(["Rate us"])));
        assert_eq!(
            map.get("stringsProperties"),
            Some(&json!({"app_name": "Clone"}))
        );
    }

    #[test]
    fn test_escape_order() {
        assert_eq!(escape_for_embedding(r#"a\b"#), r#"a\\b"#);
        assert_eq!(escape_for_embedding(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_for_embedding("l1\nl2\r\tx"), r#"l1\nl2\r\tx"#);
        // 反斜杠先转义，不会出现二次转义
        assert_eq!(escape_for_embedding("\\\n"), r#"\\\n"#);
        // 其他控制字符保持原样
        assert_eq!(escape_for_embedding("\u{1}"), "\u{1}");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        let text = "{\n\t\"path\": \"C:\\\\dir\"\r\n}";
        assert_eq!(unescape_embedded(&escape_for_embedding(text)), text);
        assert_eq!(unescape_embedded(r"\q"), r"\q");
        assert_eq!(unescape_embedded("end\\"), "end\\");
    }

    #[test]
    fn test_config_file_name() {
        assert_eq!(
            config_file_name("com.example.app"),
            "com.example.app_cloneSettings.json"
        );
        assert_eq!(config_file_name(""), "unknown_package_cloneSettings.json");
        assert_eq!(config_file_name("  "), "unknown_package_cloneSettings.json");
    }

    #[test]
    fn test_config_file_name_has_no_separators() {
        assert_eq!(config_file_name("../x"), ".._x_cloneSettings.json");
        assert_eq!(config_file_name("a\\b/c"), "a_b_c_cloneSettings.json");
        // 文件名只有一个路径分量
        let name = config_file_name("../../etc/passwd");
        assert_eq!(std::path::Path::new(&name).components().count(), 1);
    }

    #[test]
    fn test_export_is_flat_json() {
        let categories = parse(json!({
            "network": {"dnsOverHttps": true},
            "extra": {"snow": "x"}
        }));
        let text = export_configuration(&categories).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"dnsOverHttps": true, "snow": "x"}));
    }
}
