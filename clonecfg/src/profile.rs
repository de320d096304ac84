//! Device profiles used to fill the build properties of a clone.
//!
//! [`DeviceProfiles`] starts from a fixed table of real devices and can be
//! extended at runtime. It is a plain value owned by the caller.

use std::fmt::Write as _;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    data::{
        catalog::{self, BUILDS_PROPS},
        setting::Setting,
    },
    error::{ConfigError, Result},
    name::format_property_name,
};

/// Build property keys every built-in profile defines, in display order.
pub const PROPERTY_KEYS: [&str; 9] = [
    "buildPropsDeviceName",
    "buildPropsManufacturer",
    "buildPropsBrand",
    "buildPropsModel",
    "buildPropsProduct",
    "buildPropsDevice",
    "buildPropsBoard",
    "buildPropsRadio",
    "buildPropsHardware",
];

const MODEL_KEY: &str = "buildPropsModel";

/// Name, codename, manufacturer, brand, model.
const BUILTIN: &[(&str, &str, &str, &str, &str)] = &[
    ("Google Pixel 8 Pro", "husky", "Google", "google", "Pixel 8 Pro"),
    ("Google Pixel 7a", "lynx", "Google", "google", "Pixel 7a"),
    ("Samsung Galaxy S24 Ultra", "e3q", "Samsung", "samsung", "SM-S928B"),
    ("Samsung Galaxy A54 5G", "a54x", "Samsung", "samsung", "SM-A546B"),
    ("OnePlus 12", "OP5929L1", "OnePlus", "OnePlus", "CPH2449"),
    ("OnePlus Nord 3 5G", "OP556FL1", "OnePlus", "OnePlus", "CPH2383"),
    ("Xiaomi 14 Ultra", "aurora", "Xiaomi", "Xiaomi", "23127PN0CC"),
    ("Redmi Note 13 Pro 5G", "garnet", "Redmi", "Redmi", "2312DRA50G"),
    ("Asus ROG Phone 7 series", "ASUS_AI2205", "Asus", "asus", "ASUS_AI2205"),
    ("Asus Zenfone 10", "ASUS_AI2302", "Asus", "asus", "ASUS_AI2302"),
];

const SDK_VERSIONS: &[(&str, &[u32])] = &[
    ("Pixel 8 Pro", &[34, 35]),
    ("Pixel 7a", &[33, 34]),
    ("Galaxy S24 Ultra", &[34]),
    ("Galaxy A54 5G", &[33, 34]),
    ("OnePlus 12", &[34]),
    ("OnePlus Nord 3 5G", &[33, 34]),
    ("Xiaomi 14 Ultra", &[34]),
    ("Redmi Note 13 Pro 5G", &[33, 34]),
    ("Asus ROG Phone 7 series", &[34]),
    ("Asus Zenfone 10", &[34]),
];

const DEFAULT_SDK_VERSIONS: &[u32] = &[28, 29, 30, 31, 32, 33, 34];

/// Ordered build property values.
pub type Properties = Vec<(String, String)>;

/// A named set of build property values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Name shown in the profile list.
    pub name: String,
    /// Property key/value pairs in display order.
    pub properties: Properties,
}

impl DeviceProfile {
    pub fn new(name: impl Into<String>, properties: Properties) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    fn builtin(&(name, codename, manufacturer, brand, model): &(&str, &str, &str, &str, &str)) -> Self {
        let values = [
            codename,
            manufacturer,
            brand,
            model,
            codename,
            codename,
            codename,
            "",
            codename,
        ];
        let properties = PROPERTY_KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(name, properties)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// SDK levels for this device, matched on the full name or on the name
    /// without its brand prefix.
    pub fn sdk_versions(&self) -> &'static [u32] {
        let device = SDK_VERSIONS
            .iter()
            .map(|(name, _)| *name)
            .find(|name| {
                self.name == *name
                    || self
                        .name
                        .strip_suffix(name)
                        .is_some_and(|brand| brand.ends_with(' '))
            });
        supported_sdk_versions(device.unwrap_or(&self.name))
    }

    /// Multi-line summary: a title line, a blank line, then one
    /// `Label: value` line per property.
    pub fn describe(&self) -> String {
        let mut details = format!("Device Profile: {}\n\n", self.name);
        for (key, value) in &self.properties {
            let _ = writeln!(details, "{}: {value}", format_property_name(key));
        }
        details
    }

    /// Write this profile into a `buildsProps` setting.
    ///
    /// Only keys the setting persists are written; missing children are
    /// created. The setting is enabled. Returns the number of values written.
    pub fn apply_to(&self, setting: &mut Setting) -> Result<usize> {
        apply_properties(&self.properties, setting)
    }
}

/// Write property values into the children of a `buildsProps` setting.
pub fn apply_properties(properties: &[(String, String)], setting: &mut Setting) -> Result<usize> {
    if setting.key != BUILDS_PROPS {
        return Err(ConfigError::WrongSetting {
            key: setting.key.clone(),
            expected: BUILDS_PROPS,
        });
    }

    let mut written = 0;
    for spec in catalog::child_specs(BUILDS_PROPS) {
        let Some((_, value)) = properties.iter().find(|(k, _)| k == spec.key) else {
            continue;
        };
        match setting.child_mut(spec.key) {
            Some(child) => child.set_text_input(value)?,
            None => {
                let child = Setting::from_raw(spec.key, &serde_json::Value::String(value.clone()));
                setting.children.get_or_insert_with(Vec::new).push(child);
            }
        }
        written += 1;
    }
    setting.set_enabled(true);
    debug!("applied {written} build properties");
    Ok(written)
}

/// Registry of device profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfiles {
    profiles: Vec<DeviceProfile>,
}

impl Default for DeviceProfiles {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceProfiles {
    /// Registry holding the built-in profiles.
    pub fn new() -> Self {
        Self {
            profiles: BUILTIN.iter().map(DeviceProfile::builtin).collect(),
        }
    }

    pub fn profiles(&self) -> &[DeviceProfile] {
        &self.profiles
    }

    pub fn get(&self, name: &str) -> Option<&DeviceProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Add a profile, replacing any profile with the same name.
    pub fn add_custom(&mut self, name: impl Into<String>, properties: Properties) {
        let profile = DeviceProfile::new(name, properties);
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Remove the named profile. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.name != name);
        self.profiles.len() != before
    }

    /// Properties of a random profile with the model suffixed by `_N`,
    /// `N` in `0..1000`. Empty when the registry is empty.
    pub fn random_properties<R: Rng + ?Sized>(&self, rng: &mut R) -> Properties {
        if self.profiles.is_empty() {
            return Properties::new();
        }
        let profile = &self.profiles[rng.gen_range(0..self.profiles.len())];
        let suffix = rng.gen_range(0..1000);
        profile
            .properties
            .iter()
            .map(|(k, v)| {
                let v = if k == MODEL_KEY {
                    format!("{v}_{suffix}")
                } else {
                    v.clone()
                };
                (k.clone(), v)
            })
            .collect()
    }
}

/// Android SDK levels a device is known to ship with.
///
/// Unknown devices get every level from 28 to 34.
pub fn supported_sdk_versions(device: &str) -> &'static [u32] {
    SDK_VERSIONS
        .iter()
        .find(|(name, _)| *name == device)
        .map(|(_, versions)| *versions)
        .unwrap_or(DEFAULT_SDK_VERSIONS)
}
