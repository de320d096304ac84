//! Settings model construction from a persisted profile.

use std::{collections::HashSet, sync::LazyLock};

use serde_json::{Map, Value};

use crate::{
    data::{
        catalog::{self, CustomHandler},
        category::Category,
        setting::Setting,
    },
    error::{ConfigError, Result},
    export::unescape_embedded,
};

/// A persisted profile: category name → (setting key → raw value).
pub type ConfigDocument = Map<String, Value>;

/// Category → keys layout of the reference profile, used to regroup a flat
/// (saved) document.
static SAMPLE_LAYOUT: LazyLock<Vec<(String, Vec<String>)>> = LazyLock::new(|| {
    let Ok(Value::Object(doc)) = serde_json::from_str::<Value>(catalog::SAMPLE_PROFILE) else {
        warn!("reference profile does not parse, flat documents stay ungrouped");
        return Vec::new();
    };
    doc.into_iter()
        .map(|(name, settings)| {
            let keys = settings
                .as_object()
                .map(|m| m.keys().cloned().collect())
                .unwrap_or_default();
            (name, keys)
        })
        .collect()
});

/// Build categories from a two-level document, keeping its order.
///
/// Fails with [`ConfigError::Shape`] when a top-level value is not an object.
/// Categories left without settings are dropped.
pub fn parse_config_data(doc: &ConfigDocument) -> Result<Vec<Category>> {
    let mut seen = HashSet::new();
    let mut categories = Vec::with_capacity(doc.len());

    for (name, settings) in doc {
        let Value::Object(settings) = settings else {
            return Err(ConfigError::Shape(format!(
                "category `{name}` is not an object"
            )));
        };

        let mut category = Category::new(name.as_str());
        for (key, value) in settings {
            if !seen.insert(key.clone()) {
                warn!("duplicate setting `{key}` in `{name}` ignored");
                continue;
            }
            category.add_setting(Setting::from_raw(key, value));
        }
        categories.push(category);
    }

    absorb_children(&mut categories);
    categories.retain(|c| !c.is_empty());
    Ok(categories)
}

/// Move the dependent fields of each expanding custom setting into its
/// `children`, creating missing ones with their default value.
fn absorb_children(categories: &mut [Category]) {
    let parents: Vec<(String, &'static [catalog::ChildSpec])> = categories
        .iter()
        .flat_map(|c| c.settings.iter())
        .filter_map(|s| match catalog::custom_handler(&s.key) {
            Some(CustomHandler::Expand(children)) => Some((s.key.clone(), children)),
            _ => None,
        })
        .collect();

    for (parent_key, specs) in parents {
        let children = specs
            .iter()
            .map(|spec| {
                take_setting(categories, spec.key)
                    .unwrap_or_else(|| Setting::from_raw(spec.key, &spec.default_value()))
            })
            .collect();

        if let Some(parent) = categories
            .iter_mut()
            .find_map(|c| c.get_mut(&parent_key))
        {
            parent.children = Some(children);
        }
    }
}

fn take_setting(categories: &mut [Category], key: &str) -> Option<Setting> {
    categories.iter_mut().find_map(|c| {
        let idx = c.settings.iter().position(|s| s.key == key)?;
        Some(c.settings.remove(idx))
    })
}

/// Regroup a flat document (the saved format) into the reference layout.
///
/// Keys unknown to the layout are collected in a trailing
/// [`catalog::OTHER_CATEGORY`].
pub fn group_flat_document(flat: &Map<String, Value>) -> ConfigDocument {
    let mut doc = ConfigDocument::new();
    let mut placed = HashSet::new();

    for (category, keys) in SAMPLE_LAYOUT.iter() {
        let mut settings = Map::new();
        for key in keys {
            if let Some(value) = flat.get(key) {
                settings.insert(key.clone(), value.clone());
                placed.insert(key.as_str());
            }
        }
        if !settings.is_empty() {
            doc.insert(category.clone(), Value::Object(settings));
        }
    }

    let other: Map<String, Value> = flat
        .iter()
        .filter(|(k, _)| !placed.contains(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !other.is_empty() {
        doc.insert(catalog::OTHER_CATEGORY.to_string(), Value::Object(other));
    }
    doc
}

/// A document is two-level when every top-level value is an object.
fn is_two_level(doc: &Map<String, Value>) -> bool {
    doc.values().all(Value::is_object)
}

/// A flat document names no category and holds objects only under
/// compound keys.
fn is_flat(doc: &Map<String, Value>) -> bool {
    doc.iter().all(|(key, value)| {
        !SAMPLE_LAYOUT.iter().any(|(category, _)| category == key)
            && (!value.is_object() || catalog::is_compound_key(key))
    })
}

fn try_parse(raw: &str) -> Result<Vec<Category>> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            // Saved profiles are escaped for embedding; undo that and retry.
            let unescaped = unescape_embedded(raw);
            serde_json::from_str(&unescaped).map_err(|_| e)?
        }
    };

    let Value::Object(doc) = value else {
        return Err(ConfigError::Shape("top level is not an object".into()));
    };

    let categories = if is_two_level(&doc) {
        parse_config_data(&doc)?
    } else if is_flat(&doc) {
        debug!("flat document with {} keys, regrouping", doc.len());
        parse_config_data(&group_flat_document(&doc))?
    } else {
        return Err(ConfigError::Shape(
            "mix of categories and top-level settings".into(),
        ));
    };

    if categories.is_empty() {
        return Err(ConfigError::Shape("no settings found".into()));
    }
    Ok(categories)
}

/// Parse a profile from text. Never fails.
///
/// Accepts the two-level document, a flat saved document (escaped or not)
/// and falls back to [`default_categories`] for anything else.
pub fn parse_configuration(raw: &str) -> Vec<Category> {
    match try_parse(raw) {
        Ok(categories) => categories,
        Err(e) => {
            warn!("using default settings: {e}");
            default_categories()
        }
    }
}

/// Parse the built-in reference profile.
pub fn sample_configuration() -> Vec<Category> {
    parse_configuration(catalog::SAMPLE_PROFILE)
}

/// Minimal model used when a profile cannot be read.
pub fn default_categories() -> Vec<Category> {
    let mut device = Category::new("deviceInformation");
    device.add_setting(Setting::boolean("changeAndroidId", true));
    device.add_setting(Setting::boolean("changeImei", false));

    let mut location = Category::new("locationPrivacy");
    location.add_setting(Setting::boolean(catalog::SPOOF_LOCATION, false));

    let mut categories = vec![device, location];
    absorb_children(&mut categories);
    categories
}
