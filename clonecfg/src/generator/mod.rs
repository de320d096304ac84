//! Synthetic identity values.
//!
//! Every generator is a plain function of a [`rand::Rng`], so a seeded
//! [`StdRng`] reproduces the same values. [`IdentityGenerator`] owns one
//! random source for an edit session and applies generated values to
//! settings.
//!
//! The values are cosmetic. Nothing here is suitable for secrets.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::Value;
use uuid::{Builder, Uuid};

use crate::{
    data::{
        catalog::{SPOOF_LATITUDE, SPOOF_LOCATION, SPOOF_LONGITUDE},
        setting::{Setting, SettingValue},
    },
    error::{ConfigError, Result},
};

/// Luhn-checked IMEI numbers.
pub mod imei;

/// Land-constrained coordinates.
pub mod location;

/// Vendor-prefixed MAC addresses.
pub mod mac;

pub use imei::generate_imei;
pub use location::generate_realistic_location;
pub use mac::generate_mac_address;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const FALLBACK_PREFIX: &str = "CUSTOM_";

/// Algorithm used to produce a value for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// 16 lowercase hex characters.
    HexId,
    /// 15-digit Luhn-checked IMEI.
    Imei,
    /// 12 alphanumeric or 16 hex characters.
    Serial,
    /// Colon-separated uppercase MAC address.
    MacAddress,
    /// Canonical UUID v4.
    Uuid,
    /// `CUSTOM_` followed by 8 hex characters.
    Fallback,
}

#[derive(Debug, Clone, Copy)]
enum KeyPattern {
    Exact(&'static str),
    Suffix(&'static str),
}

impl KeyPattern {
    fn matches(self, key: &str) -> bool {
        match self {
            KeyPattern::Exact(k) => key == k,
            KeyPattern::Suffix(s) => key.ends_with(s),
        }
    }
}

/// Key patterns and their generators, checked in order.
const GENERATORS: &[(KeyPattern, GeneratorKind)] = &[
    (KeyPattern::Exact("changeAndroidId"), GeneratorKind::HexId),
    (
        KeyPattern::Exact("changeGoogleServiceFrameworkId"),
        GeneratorKind::HexId,
    ),
    (KeyPattern::Exact("changeImei"), GeneratorKind::Imei),
    (KeyPattern::Exact("changeAndroidSerial"), GeneratorKind::Serial),
    (KeyPattern::Suffix("MacAddress"), GeneratorKind::MacAddress),
    (KeyPattern::Suffix("AdvertisingId"), GeneratorKind::Uuid),
    (KeyPattern::Suffix("AttributionId"), GeneratorKind::Uuid),
    (KeyPattern::Exact("changeAppSetId"), GeneratorKind::Uuid),
    (KeyPattern::Exact("changeOpenId"), GeneratorKind::Uuid),
];

impl GeneratorKind {
    /// Generator registered for `key`, [`GeneratorKind::Fallback`] if none.
    pub fn for_key(key: &str) -> Self {
        GENERATORS
            .iter()
            .find(|(pattern, _)| pattern.matches(key))
            .map(|(_, kind)| *kind)
            .unwrap_or(GeneratorKind::Fallback)
    }

    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            GeneratorKind::HexId => hex_string(rng, 16),
            GeneratorKind::Imei => generate_imei(rng),
            GeneratorKind::Serial => android_serial(rng),
            GeneratorKind::MacAddress => generate_mac_address(rng),
            GeneratorKind::Uuid => uuid_v4(rng).to_string(),
            GeneratorKind::Fallback => fallback_id(rng),
        }
    }
}

/// `len` independent uniform lowercase hex digits.
pub fn hex_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .filter_map(|_| char::from_digit(rng.gen_range(0..16), 16))
        .collect()
}

/// `len` characters drawn from `A-Z0-9`.
pub fn alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())]))
        .collect()
}

/// Either 12 alphanumeric characters or 16 hex digits, with equal odds.
pub fn android_serial<R: Rng + ?Sized>(rng: &mut R) -> String {
    if rng.gen_bool(0.5) {
        alphanumeric(rng, 12)
    } else {
        hex_string(rng, 16)
    }
}

/// Version 4 UUID built from the given random source.
pub fn uuid_v4<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

/// `CUSTOM_` plus the first 8 hex characters of a fresh UUID.
pub fn fallback_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let uuid = uuid_v4(rng).simple().to_string();
    format!("{FALLBACK_PREFIX}{}", &uuid[..8])
}

/// Generate a value for `setting` according to its key and store it.
///
/// String and Text payloads are replaced. A switch (Boolean, or a custom key
/// holding a boolean) is turned on and the value is kept in
/// [`Setting::generated`] for display. Other payloads are left as they are.
pub fn generate_random_value<R: Rng + ?Sized>(setting: &mut Setting, rng: &mut R) -> String {
    let kind = GeneratorKind::for_key(&setting.key);
    let value = kind.generate(rng);
    debug!("{}: generated {kind:?} value", setting.key);

    match &mut setting.value {
        SettingValue::String(s) | SettingValue::Text(s) => *s = value.clone(),
        SettingValue::Boolean | SettingValue::Custom(Value::Bool(_)) => {
            setting.set_enabled(true);
            setting.generated = Some(value.clone());
        }
        _ => setting.generated = Some(value.clone()),
    }
    value
}

/// Fill the latitude/longitude children of a `spoofLocation` setting and
/// enable it.
pub fn randomize_location<R: Rng + ?Sized>(setting: &mut Setting, rng: &mut R) -> Result<String> {
    if setting.key != SPOOF_LOCATION {
        return Err(ConfigError::WrongSetting {
            key: setting.key.clone(),
            expected: SPOOF_LOCATION,
        });
    }

    let (lat, lon) = location::random_coordinates(rng);
    let formatted = location::format_location(lat, lon);
    let (lat_text, lon_text) = formatted.split_once(',').unwrap_or((formatted.as_str(), ""));

    for (key, text) in [(SPOOF_LATITUDE, lat_text), (SPOOF_LONGITUDE, lon_text)] {
        match setting.child_mut(key) {
            Some(child) => child.set_text_input(text)?,
            None => {
                let child = Setting::from_raw(key, &Value::String(text.to_string()));
                setting.children.get_or_insert_with(Vec::new).push(child);
            }
        }
    }
    setting.set_enabled(true);
    Ok(formatted)
}

/// Session-scoped generator owning its random source.
#[derive(Debug, Clone)]
pub struct IdentityGenerator<R = StdRng> {
    rng: R,
}

impl IdentityGenerator<StdRng> {
    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> IdentityGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Value for a key without touching any setting.
    pub fn generate_for_key(&mut self, key: &str) -> String {
        GeneratorKind::for_key(key).generate(&mut self.rng)
    }

    /// See [`generate_random_value`].
    pub fn generate_random_value(&mut self, setting: &mut Setting) -> String {
        generate_random_value(setting, &mut self.rng)
    }

    pub fn generate_realistic_location(&mut self) -> String {
        generate_realistic_location(&mut self.rng)
    }

    /// See [`randomize_location`].
    pub fn randomize_location(&mut self, setting: &mut Setting) -> Result<String> {
        randomize_location(setting, &mut self.rng)
    }

    /// Access the underlying random source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
