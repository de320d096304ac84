use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::SystemTime,
};

use rand::Rng;

use crate::{
    data::{
        catalog::{self, BUILDS_PROPS, SPOOF_LOCATION},
        category::{Category, find_setting, find_setting_mut},
        parse::{default_categories, parse_configuration},
        setting::Setting,
    },
    error::{ConfigError, Result},
    export::{build_configuration_map, config_file_name, escape_for_embedding},
    generator,
    profile::DeviceProfile,
};

/// Edit session for one clone profile.
#[derive(Debug, Clone)]
pub struct AppData {
    /// Settings model being edited.
    pub categories: Vec<Category>,
    /// Package the profile belongs to; names the saved file.
    pub package_name: String,
    /// Directory the profile is saved into.
    pub output_dir: PathBuf,
    /// File the model was loaded from, if any.
    pub source: Option<PathBuf>,
    /// Whether the model has unsaved changes.
    pub needs_save: bool,
}

impl AppData {
    /// Session over an already built model.
    pub fn new(categories: Vec<Category>, package_name: impl Into<String>) -> Self {
        Self {
            categories,
            package_name: package_name.into(),
            output_dir: PathBuf::from("."),
            source: None,
            needs_save: false,
        }
    }

    /// Load a profile from disk. Never fails.
    ///
    /// A missing or unreadable file yields the default model.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let categories = match fs::read_to_string(path) {
            Ok(content) => parse_configuration(&content),
            Err(e) => {
                warn!("cannot read {}: {e}, using default settings", path.display());
                default_categories()
            }
        };

        let mut data = Self::new(categories, "");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            data.output_dir = parent.to_path_buf();
        }
        data.source = Some(path.to_path_buf());
        data
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn mark_dirty(&mut self) {
        self.needs_save = true;
    }

    /// Full path the profile is saved to.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(config_file_name(&self.package_name))
    }

    pub fn setting(&self, key: &str) -> Option<&Setting> {
        find_setting(&self.categories, key)
    }

    /// Mutable access to a setting; marks the session dirty when found.
    pub fn setting_mut(&mut self, key: &str) -> Option<&mut Setting> {
        let setting = find_setting_mut(&mut self.categories, key);
        if setting.is_some() {
            self.needs_save = true;
        }
        setting
    }

    /// Apply text to the setting named `key`.
    pub fn set_text(&mut self, key: &str, text: &str) -> Result<()> {
        let setting = self.require_mut(key)?;
        setting.set_text_input(text)?;
        self.needs_save = true;
        Ok(())
    }

    /// Generate a new value for the setting named `key`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, key: &str, rng: &mut R) -> Result<String> {
        let setting = self.require_mut(key)?;
        let value = generator::generate_random_value(setting, rng);
        self.needs_save = true;
        Ok(value)
    }

    /// Give `spoofLocation` a new on-land location.
    pub fn randomize_location<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
        let setting = self.require_mut(SPOOF_LOCATION)?;
        let location = generator::randomize_location(setting, rng)?;
        self.needs_save = true;
        Ok(location)
    }

    /// Write a device profile into `buildsProps` and the standalone build
    /// property settings (`buildPropsProduct`, `buildPropsRadio`, ...).
    ///
    /// Properties without a matching setting are skipped. Returns the number
    /// of values written.
    pub fn apply_profile(&mut self, profile: &DeviceProfile) -> Result<usize> {
        let setting = self.require_mut(BUILDS_PROPS)?;
        let mut written = profile.apply_to(setting)?;

        let children = catalog::child_specs(BUILDS_PROPS);
        for (key, value) in &profile.properties {
            if children.iter().any(|spec| spec.key == key.as_str()) {
                continue;
            }
            match find_setting_mut(&mut self.categories, key) {
                Some(setting) => {
                    setting.set_text_input(value)?;
                    written += 1;
                }
                None => debug!("{}: no setting for `{key}`", profile.name),
            }
        }

        self.needs_save = true;
        Ok(written)
    }

    fn require_mut(&mut self, key: &str) -> Result<&mut Setting> {
        find_setting_mut(&mut self.categories, key)
            .ok_or_else(|| ConfigError::Shape(format!("no setting named `{key}`")))
    }

    /// Save to [`output_path`](Self::output_path).
    ///
    /// Failures are logged and reported as `false`.
    pub fn save(&mut self) -> bool {
        let path = self.output_path();
        match self.save_to(&path) {
            Ok(()) => {
                info!("saved {}", path.display());
                true
            }
            Err(e) => {
                error!("failed to save {}: {e}", path.display());
                false
            }
        }
    }

    /// Serialize, escape and write the profile to `path`.
    ///
    /// An existing file is first copied to `<stem>.bk-<unix-secs>.json`, or
    /// `<stem>.bk-<unix-secs>-<n>.json` when that backup already exists.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        let config = build_configuration_map(&self.categories);
        let text = escape_for_embedding(&serde_json::to_string_pretty(&config)?);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if path.exists() {
            let secs = SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let backup_path = backup_path(path, secs);
            fs::copy(path, &backup_path)?;
            debug!("backup written to {}", backup_path.display());
        }

        {
            let mut writer = BufWriter::new(fs::File::create(path)?);
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }

        self.needs_save = false;
        Ok(())
    }
}

/// First free backup name for `path` taken at `secs`.
fn backup_path(path: &Path, secs: u64) -> PathBuf {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let mut candidate = path.with_extension(format!("bk-{secs}.{ext}"));
    let mut n = 1u32;
    while candidate.exists() {
        candidate = path.with_extension(format!("bk-{secs}-{n}.{ext}"));
        n += 1;
    }
    candidate
}
