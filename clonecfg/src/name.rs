//! Human-readable labels for setting keys.
//!
//! Keys in a clone profile are camelCase identifiers (`changeWifiMacAddress`).
//! Front ends show them as title-cased labels (`Change Wifi MAC Address`);
//! the conversion lives here so that it has no UI dependency.

use std::sync::LazyLock;

use regex::Regex;

static UPPERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([A-Z])").expect("static pattern is valid"));

/// Word sequences rewritten after the camelCase split, applied in order.
const ACRONYMS: &[(&str, &str)] = &[
    ("Web View", "WebView"),
    ("Dns Over Https", "DNS over HTTPS"),
    ("Imei", "IMEI"),
    ("Imsi", "IMSI"),
    ("Mac Address", "MAC Address"),
];

const BUILD_PROPS_PREFIX: &str = "buildProps";

fn split_camel_case(key: &str) -> String {
    let spaced = UPPERCASE.replace_all(key, " $1");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a setting key into its display label.
///
/// ```
/// use clonecfg::name::format_setting_name;
///
/// assert_eq!(format_setting_name("changeImei"), "Change IMEI");
/// assert_eq!(format_setting_name("dnsOverHttpsSilent"), "DNS over HTTPS Silent");
/// ```
pub fn format_setting_name(key: &str) -> String {
    let mut label = split_camel_case(key);
    for (from, to) in ACRONYMS {
        label = label.replace(from, to);
    }
    label.trim().to_string()
}

/// Label for a `buildProps*` key inside a device profile, without the prefix.
pub fn format_property_name(key: &str) -> String {
    let stripped = key.replace(BUILD_PROPS_PREFIX, "");
    split_camel_case(&stripped).trim().to_string()
}
