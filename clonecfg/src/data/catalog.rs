//! Closed vocabulary of setting keys known at compile time.
//!
//! Inference never guesses that a key is custom, a dropdown or a parent from
//! the shape of its value: all three sets live in the tables below.

use serde_json::Value;

/// How a custom key is written back to the flat configuration map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CustomHandler {
    /// Emits the enable flag and, only while enabled, the listed child keys.
    Expand(&'static [ChildSpec]),
    /// Emits the raw value unchanged.
    Passthrough,
}

/// A dependent field owned by an expanding custom setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSpec {
    pub key: &'static str,
    pub default: ChildDefault,
}

/// Value used when a child key is missing from the loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildDefault {
    EmptyString,
    EmptyList,
    False,
}

impl ChildSpec {
    const fn text(key: &'static str) -> Self {
        Self {
            key,
            default: ChildDefault::EmptyString,
        }
    }

    const fn list(key: &'static str) -> Self {
        Self {
            key,
            default: ChildDefault::EmptyList,
        }
    }

    const fn flag(key: &'static str) -> Self {
        Self {
            key,
            default: ChildDefault::False,
        }
    }

    /// Raw JSON value for a child that was not present in the input.
    pub fn default_value(&self) -> Value {
        match self.default {
            ChildDefault::EmptyString => Value::String(String::new()),
            ChildDefault::EmptyList => Value::Array(Vec::new()),
            ChildDefault::False => Value::Bool(false),
        }
    }
}

const BUNDLE_APP_DATA_CHILDREN: &[ChildSpec] = &[
    ChildSpec::text("bundleAppDataPath"),
    ChildSpec::text("bundleAppDataPassword"),
];

const DELETE_ON_EXIT_CHILDREN: &[ChildSpec] = &[
    ChildSpec::list("deleteFilesDirectoriesOnExit"),
    ChildSpec::flag("securelyDeleteFilesDirectoriesOnExit"),
];

/// Child key holding the spoofed latitude.
pub const SPOOF_LATITUDE: &str = "spoofLocationLatitude";
/// Child key holding the spoofed longitude.
pub const SPOOF_LONGITUDE: &str = "spoofLocationLongitude";

const SPOOF_LOCATION_CHILDREN: &[ChildSpec] = &[
    ChildSpec::text(SPOOF_LATITUDE),
    ChildSpec::text(SPOOF_LONGITUDE),
];

const BUILD_PROPS_CHILDREN: &[ChildSpec] = &[
    ChildSpec::text("buildPropsDeviceName"),
    ChildSpec::text("buildPropsManufacturer"),
    ChildSpec::text("buildPropsBrand"),
    ChildSpec::text("buildPropsModel"),
];

/// Key of the location spoofing setting.
pub const SPOOF_LOCATION: &str = "spoofLocation";
/// Key of the build properties setting.
pub const BUILDS_PROPS: &str = "buildsProps";

/// Every key edited by a custom editor, with exactly one handler each.
pub const CUSTOM_KEYS: &[(&str, CustomHandler)] = &[
    ("bundleAppData", CustomHandler::Expand(BUNDLE_APP_DATA_CHILDREN)),
    ("deleteOnExit", CustomHandler::Expand(DELETE_ON_EXIT_CHILDREN)),
    (SPOOF_LOCATION, CustomHandler::Expand(SPOOF_LOCATION_CHILDREN)),
    (BUILDS_PROPS, CustomHandler::Expand(BUILD_PROPS_CHILDREN)),
    ("webViewUrlDataFilterList", CustomHandler::Passthrough),
    ("overrideSharedPreferences", CustomHandler::Passthrough),
    ("customBuildProps", CustomHandler::Passthrough),
    ("webViewCookies", CustomHandler::Passthrough),
    ("hostsBlocker", CustomHandler::Passthrough),
    ("webViewOverrideUrlLoadingList", CustomHandler::Passthrough),
    ("skipDialogsStrings", CustomHandler::Passthrough),
    ("bundleFilesDirectories", CustomHandler::Passthrough),
    ("bundleInternalFilesDirectories", CustomHandler::Passthrough),
];

const LOCALE_OPTIONS: &[&str] = &[
    "en_US", "en_GB", "en_CA", "en_AU", "de_DE", "fr_FR", "es_ES", "it_IT", "pt_BR", "zh_CN",
    "zh_TW", "ja_JP", "ko_KR", "ru_RU", "CUSTOM",
];
const LOCATION_API_OPTIONS: &[&str] = &["", "Google", "OpenStreetMap", "CUSTOM"];
const COMPATIBILITY_MODE_OPTIONS: &[&str] = &["PERMISSIVE", "RESTRICTIVE"];
const TIME_UNIT_OPTIONS: &[&str] = &["days", "weeks", "months"];
const FILTER_OPTIONS: &[&str] = &["DISABLED", "INCLUDE", "EXCLUDE"];
const SNOW_OPTIONS: &[&str] = &["", "flake", "heart", "star", "custom"];
const PICTURE_IN_PICTURE_OPTIONS: &[&str] = &["", "generic", "youtube", "custom"];

/// String-valued keys edited through a fixed list of options.
pub const DROPDOWN_KEYS: &[(&str, &[&str])] = &[
    ("changeLocale", LOCALE_OPTIONS),
    ("spoofLocationApi", LOCATION_API_OPTIONS),
    ("spoofLocationCompatibilityMode", COMPATIBILITY_MODE_OPTIONS),
    ("relativeInstallUpdateTimeUnit", TIME_UNIT_OPTIONS),
    ("webViewUrlDataMonitorFilter", FILTER_OPTIONS),
    ("showWebViewSourceCodeFilter", FILTER_OPTIONS),
    ("addSnow", SNOW_OPTIONS),
    ("pictureInPicture", PICTURE_IN_PICTURE_OPTIONS),
];

/// Settings that gate dependent child fields.
pub const PARENT_KEYS: &[&str] = &[
    SPOOF_LOCATION,
    BUILDS_PROPS,
    "bundleAppData",
    "deleteOnExit",
    "randomizeBuildProps",
    "changeInstallUpdateTime",
    "webViewPrivacyOptions",
    "webViewUrlDataMonitor",
    "showWebViewSourceCode",
    "hostsBlocker",
];

const DESCRIPTIONS: &[(&str, &str)] = &[
    ("changeAndroidId", "Generate a new random Android ID"),
    ("changeImei", "Generate a new random IMEI number"),
    ("changeAndroidSerial", "Generate a new random Android serial number"),
    ("changeWifiMacAddress", "Generate a new random WiFi MAC address"),
    (
        "changeBluetoothMacAddress",
        "Generate a new random Bluetooth MAC address",
    ),
    ("changeImsi", "Generate a new random IMSI number"),
    (SPOOF_LOCATION, "Fake GPS location coordinates"),
    (BUILDS_PROPS, "Modify Android build properties"),
    ("bundleAppData", "Include app data in the clone"),
    ("deleteOnExit", "Delete files and directories when app exits"),
    ("webViewPrivacyOptions", "Configure WebView privacy settings"),
    ("webViewUrlDataMonitor", "Monitor and modify WebView URL data"),
    ("showWebViewSourceCode", "Display WebView source code"),
    ("hostsBlocker", "Block specific hosts/domains"),
];

/// Name of the category collecting keys unknown to the built-in layout.
pub const OTHER_CATEGORY: &str = "other";

/// Settings whose value is a nested object. Only these may hold an object in
/// a flat (saved) document.
pub const COMPOUND_KEYS: &[&str] = &["stringsProperties", "devicesDatabaseSdkVersions"];

/// Reference profile: category order and the full key set of a clone profile.
pub const SAMPLE_PROFILE: &str = r#"{
    "deviceInformation": {
        "changeAndroidId": true,
        "changeImei": false,
        "changeAndroidSerial": false,
        "changeWifiMacAddress": false,
        "changeBluetoothMacAddress": false,
        "changeImsi": false,
        "changeGoogleAdvertisingId": false,
        "changeGoogleServiceFrameworkId": false,
        "changeFacebookAttributionId": false,
        "changeAppSetId": false,
        "changeOpenId": false,
        "changeAmazonAdvertisingId": false,
        "changeHuaweiAdvertisingId": false,
        "changeLocale": "en_US",
        "changeEthernetMacAddress": false
    },
    "locationPrivacy": {
        "spoofLocation": false,
        "spoofLocationLatitude": "",
        "spoofLocationLongitude": "",
        "spoofRandomLocation": false,
        "spoofLocationUseIpLocation": false,
        "spoofLocationApi": "",
        "spoofLocationCalculateBearing": false,
        "spoofLocationCompatibilityMode": false,
        "spoofLocationInterval": 0,
        "spoofLocationShareLocationReceiver": false,
        "spoofLocationShowSpoofLocationNotification": false,
        "spoofLocationSimulatePositionalUncertainty": false,
        "favoriteLocationsShowDistance": false
    },
    "buildProperties": {
        "buildsProps": false,
        "buildPropsDeviceName": "",
        "buildPropsManufacturer": "",
        "buildPropsBrand": "",
        "buildPropsModel": "",
        "buildPropsProduct": "",
        "buildPropsDevice": "",
        "buildPropsBoard": "",
        "buildPropsRadio": "",
        "buildPropsHardware": "",
        "randomizeBuildProps": false,
        "filterDevicesDatabase": false,
        "devicesDatabaseFilters": [],
        "devicesDatabaseUseAndroidVersion": false,
        "devicesDatabaseSdkVersions": {},
        "randomizeBuildPropsDeviceNamePrefix": ""
    },
    "appData": {
        "bundleAppData": false,
        "bundleAppDataPath": "",
        "bundleAppDataPassword": "",
        "bundleAppDataEncryptCertificate": false,
        "restoreAppDataOnEveryStart": false,
        "deleteOnExit": false,
        "deleteFilesDirectoriesOnExit": [],
        "securelyDeleteFilesDirectoriesOnExit": false,
        "bundleFilesDirectories": [],
        "bundleInternalFilesDirectories": []
    },
    "webViewPrivacy": {
        "webViewPrivacyOptions": false,
        "webViewDisableWebRtc": false,
        "webViewDisableWebGl": false,
        "webViewDisableAudioContext": false,
        "webViewUrlDataMonitor": false,
        "webViewUrlDataMonitorAutoCopy": false,
        "webViewUrlDataMonitorAutoOpen": false,
        "webViewUrlDataMonitorFilter": "DISABLED",
        "webViewUrlDataMonitorFilterStrings": [],
        "webViewUrlDataMonitorRegularExpression": "",
        "webViewUrlDataMonitorShowJavaScriptUrls": false,
        "webViewUrlDataMonitorShowOverrideUrlLoading": false,
        "webViewUrlDataMonitorUrlDecode": false,
        "webViewUrlDataFilterList": [],
        "showWebViewSourceCode": false,
        "showWebViewIFrameSourceCode": false,
        "showWebViewSourceCodeFilter": "DISABLED",
        "showWebViewSourceCodeFilterStrings": [],
        "showWebViewSourceCodeRegularExpression": "",
        "webViewCookies": false,
        "webViewOverrideUrlLoadingList": []
    },
    "systemSettings": {
        "skipDialogsStrings": [],
        "skipDialogsStacktraceStrings": [],
        "skipDialogsMonitorStacktraces": false,
        "overrideSharedPreferences": [],
        "overrideSharedPreferencesEnablePlaceholders": false,
        "customBuildProps": [],
        "customBuildPropsFile": "",
        "customBuildPropsFileEnablePlaceholders": false,
        "hostsBlocker": false,
        "hostsBlockerBlockByDefault": false,
        "hostsBlockerShowNotification": false,
        "hostsBlockerUseFile": false,
        "hostsBlockerFileContent": "",
        "hostsBlockerAllowAllOtherHosts": false,
        "addPermissions": [],
        "addProviders": [],
        "addReceivers": [],
        "addServices": [],
        "addActivities": [],
        "stringsProperties": {},
        "serialFormat": ""
    },
    "installTime": {
        "changeInstallUpdateTime": false,
        "customInstallUpdateTime": 0,
        "randomizeUserCreationTime": false,
        "relativeInstallUpdateTime": false,
        "relativeInstallUpdateTimeUnit": "days"
    },
    "network": {
        "dnsOverHttps": false,
        "dnsOverHttpsCustomUrl": "",
        "dnsOverHttpsSilent": false
    },
    "extra": {
        "addSnow": false,
        "snow": "",
        "pictureInPictureSupport": false,
        "pictureInPicture": ""
    }
}"#;

/// Handler for a custom key, `None` if the key is not custom.
pub fn custom_handler(key: &str) -> Option<CustomHandler> {
    CUSTOM_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, handler)| *handler)
}

/// Whether the key is edited by a custom editor.
pub fn is_custom_key(key: &str) -> bool {
    custom_handler(key).is_some()
}

/// Static option list of a dropdown key.
pub fn dropdown_options(key: &str) -> Option<&'static [&'static str]> {
    DROPDOWN_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, options)| *options)
}

pub fn is_compound_key(key: &str) -> bool {
    COMPOUND_KEYS.contains(&key)
}

pub fn is_parent_key(key: &str) -> bool {
    PARENT_KEYS.contains(&key)
}

/// Fixed description text, empty when the key has none.
pub fn description(key: &str) -> &'static str {
    DESCRIPTIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
        .unwrap_or("")
}

/// Child keys of an expanding custom setting, empty for everything else.
pub fn child_specs(key: &str) -> &'static [ChildSpec] {
    match custom_handler(key) {
        Some(CustomHandler::Expand(children)) => children,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_keys_unique() {
        for (i, (key, _)) in CUSTOM_KEYS.iter().enumerate() {
            assert!(
                CUSTOM_KEYS[i + 1..].iter().all(|(other, _)| other != key),
                "duplicate custom key {key}"
            );
        }
    }

    #[test]
    fn test_expanding_keys_are_parents() {
        for (key, handler) in CUSTOM_KEYS {
            if let CustomHandler::Expand(children) = handler {
                assert!(is_parent_key(key), "{key} gates children but is not a parent");
                assert!(!children.is_empty());
            }
        }
    }

    #[test]
    fn test_child_keys_are_not_custom() {
        for (_, handler) in CUSTOM_KEYS {
            if let CustomHandler::Expand(children) = handler {
                for child in children.iter() {
                    assert!(!is_custom_key(child.key));
                }
            }
        }
    }

    #[test]
    fn test_sample_profile_is_two_level() {
        let doc: Value = serde_json::from_str(SAMPLE_PROFILE).unwrap();
        let categories = doc.as_object().unwrap();
        assert_eq!(categories.len(), 9);
        assert!(categories.values().all(Value::is_object));
    }

    #[test]
    fn test_lookup_helpers() {
        assert_eq!(description("changeImei"), "Generate a new random IMEI number");
        assert_eq!(description("snow"), "");
        assert_eq!(dropdown_options("relativeInstallUpdateTimeUnit").unwrap().len(), 3);
        assert!(dropdown_options("changeImei").is_none());
        assert_eq!(child_specs(BUILDS_PROPS).len(), 4);
        assert!(child_specs("hostsBlocker").is_empty());
    }
}
