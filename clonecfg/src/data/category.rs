use crate::{data::setting::Setting, name::format_setting_name};

/// Named, ordered group of settings; one per top-level key of a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Top-level key in the persisted document.
    pub name: String,
    /// Settings in document order.
    pub settings: Vec<Setting>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: Vec::new(),
        }
    }

    pub fn add_setting(&mut self, setting: Setting) {
        self.settings.push(setting);
    }

    /// Label shown for the category header.
    pub fn display_name(&self) -> String {
        format_setting_name(&self.name)
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Top-level setting with the given key.
    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.key == key)
    }

    /// Mutable top-level setting with the given key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Setting> {
        self.settings.iter_mut().find(|s| s.key == key)
    }
}

/// Find a setting anywhere in the model, including dependent children.
pub fn find_setting<'a>(categories: &'a [Category], key: &str) -> Option<&'a Setting> {
    categories
        .iter()
        .flat_map(|c| c.settings.iter())
        .find_map(|s| {
            if s.key == key {
                Some(s)
            } else {
                s.child(key)
            }
        })
}

/// Mutable variant of [`find_setting`].
pub fn find_setting_mut<'a>(categories: &'a mut [Category], key: &str) -> Option<&'a mut Setting> {
    categories
        .iter_mut()
        .flat_map(|c| c.settings.iter_mut())
        .find_map(|s| {
            if s.key == key {
                Some(s)
            } else {
                s.child_mut(key)
            }
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Vec<Category> {
        let mut location = Setting::from_raw("spoofLocation", &json!(true));
        location.children = Some(vec![Setting::from_raw(
            "spoofLocationLatitude",
            &json!("1.0"),
        )]);

        let mut category = Category::new("locationPrivacy");
        category.add_setting(location);
        category.add_setting(Setting::from_raw("spoofLocationInterval", &json!(3)));
        vec![category]
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Category::new("deviceInformation").display_name(), "Device Information");
    }

    #[test]
    fn test_find_top_level_and_child() {
        let mut categories = sample();
        assert!(find_setting(&categories, "spoofLocationInterval").is_some());
        assert!(find_setting(&categories, "spoofLocationLatitude").is_some());
        assert!(find_setting(&categories, "missing").is_none());

        let child = find_setting_mut(&mut categories, "spoofLocationLatitude").unwrap();
        child.set_text_input("2.0").unwrap();
        assert_eq!(
            categories[0].get("spoofLocation").unwrap().child("spoofLocationLatitude").unwrap().as_json(),
            json!("2.0")
        );
    }
}
