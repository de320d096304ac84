//! Command context.
//!
//! [`AppContext`] merges the config file with the device profile registry and
//! implements each subcommand on top of the `clonecfg` engine.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clonecfg::{
    AppData, Category, DeviceProfiles, IdentityGenerator, Setting,
    data::parse::sample_configuration, export::export_configuration,
};
use colored::Colorize;

use crate::config::CliConfig;

/// Options of the `save` command.
#[derive(Debug, Default, Clone)]
pub struct SaveOptions {
    pub input: Option<PathBuf>,
    pub package: Option<String>,
    pub out: Option<PathBuf>,
    /// Keys to give freshly generated values.
    pub randomize: Vec<String>,
    /// Device profile written into the build properties.
    pub profile: Option<String>,
    pub random_location: bool,
    pub seed: Option<u64>,
}

pub struct AppContext {
    /// Settings from `.clonectl.toml`.
    pub config: CliConfig,
    /// Built-in and configured device profiles.
    pub profiles: DeviceProfiles,
}

impl AppContext {
    pub fn new(config: CliConfig) -> Self {
        let mut profiles = DeviceProfiles::new();
        for custom in &config.profiles {
            profiles.add_custom(custom.name.clone(), custom.properties.clone());
        }
        Self { config, profiles }
    }

    /// Generator seeded from the flag, then the config, then OS entropy.
    pub fn generator(&self, seed: Option<u64>) -> IdentityGenerator {
        match seed.or(self.config.seed) {
            Some(seed) => IdentityGenerator::seeded(seed),
            None => IdentityGenerator::from_entropy(),
        }
    }

    /// Session over `input`, or over the built-in sample profile.
    pub fn session(&self, input: Option<&Path>) -> AppData {
        match input {
            Some(path) => AppData::load(path),
            None => AppData::new(sample_configuration(), ""),
        }
    }

    pub fn show(&self, input: Option<&Path>) {
        let session = self.session(input);
        for category in &session.categories {
            println!("{}", category.display_name().bold().green());
            for setting in &category.settings {
                print_setting(setting, 1);
            }
        }
        println!(
            "{} settings in {} categories",
            setting_count(&session.categories),
            session.categories.len()
        );
    }

    pub fn export(&self, input: Option<&Path>) -> anyhow::Result<()> {
        let session = self.session(input);
        let text = export_configuration(&session.categories)?;
        println!("{text}");
        Ok(())
    }

    pub fn generate(&self, key: &str, seed: Option<u64>) {
        println!("{}", self.generator(seed).generate_for_key(key));
    }

    pub fn location(&self, seed: Option<u64>) {
        println!("{}", self.generator(seed).generate_realistic_location());
    }

    pub fn list_profiles(&self, name: Option<&str>) -> anyhow::Result<()> {
        let Some(name) = name else {
            for p in self.profiles.profiles() {
                println!("{}", p.name);
            }
            return Ok(());
        };

        let Some(p) = self.profiles.get(name) else {
            bail!("unknown device profile `{name}`");
        };
        print!("{}", p.describe());
        let levels: Vec<_> = p
            .sdk_versions()
            .iter()
            .map(u32::to_string)
            .collect();
        println!("SDK: {}", levels.join(", "));
        Ok(())
    }

    pub fn show_config(&self) -> anyhow::Result<()> {
        print!("{}", self.config.effective_toml()?);
        Ok(())
    }

    /// Load, apply edits and save. Returns whether the save succeeded.
    pub fn save(&self, opts: SaveOptions) -> anyhow::Result<bool> {
        let mut session = self.session(opts.input.as_deref());
        let mut generator = self.generator(opts.seed);

        session.package_name = opts
            .package
            .or_else(|| self.config.package_name.clone())
            .unwrap_or_default();
        if let Some(dir) = opts.out.or_else(|| self.config.output_dir.clone()) {
            session.output_dir = dir;
        }

        for key in &opts.randomize {
            let value = session
                .randomize(key, generator.rng_mut())
                .with_context(|| format!("cannot randomize `{key}`"))?;
            println!("{key} = {value}");
        }

        if let Some(name) = &opts.profile {
            let profile = self
                .profiles
                .get(name)
                .with_context(|| format!("unknown device profile `{name}`"))?;
            session.apply_profile(profile)?;
        }

        if opts.random_location {
            let location = session.randomize_location(generator.rng_mut())?;
            println!("location = {location}");
        }

        session.mark_dirty();
        let saved = session.save();
        if saved {
            println!("{}", session.output_path().display());
        }
        Ok(saved)
    }
}

fn print_setting(setting: &Setting, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{} {} {}",
        setting.display_name,
        format!("[{}]", setting.setting_type()).dimmed(),
        setting.display_value()
    );
    for child in setting.children.iter().flatten() {
        print_setting(child, depth + 1);
    }
}

/// Number of top-level settings across categories.
pub fn setting_count(categories: &[Category]) -> usize {
    categories.iter().map(|c| c.settings.len()).sum()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn ctx() -> AppContext {
        AppContext::new(CliConfig {
            seed: Some(3),
            ..Default::default()
        })
    }

    #[test]
    fn test_custom_profiles_registered() {
        let config = CliConfig {
            profiles: vec![clonecfg::DeviceProfile::new(
                "Lab phone",
                vec![("buildPropsModel".into(), "A1".into())],
            )],
            ..Default::default()
        };
        let ctx = AppContext::new(config);
        assert_eq!(ctx.profiles.profiles().len(), 11);
        assert!(ctx.profiles.get("Lab phone").is_some());
    }

    #[test]
    fn test_config_seed_is_used() {
        let ctx = ctx();
        let a = ctx.generator(None).generate_for_key("changeAndroidId");
        let b = ctx.generator(None).generate_for_key("changeAndroidId");
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_session() {
        let session = ctx().session(None);
        assert!(setting_count(&session.categories) > 0);
    }

    #[test]
    fn test_save_command() {
        let dir = tempfile::tempdir().unwrap();
        let opts = SaveOptions {
            package: Some("com.example.app".into()),
            out: Some(dir.path().to_path_buf()),
            randomize: vec!["changeAndroidId".into()],
            profile: Some("Google Pixel 8 Pro".into()),
            random_location: true,
            ..Default::default()
        };
        assert!(ctx().save(opts).unwrap());
        let saved = fs::read_to_string(dir.path().join("com.example.app_cloneSettings.json")).unwrap();
        assert!(saved.contains(r#"\"buildPropsModel\": \"Pixel 8 Pro\""#));
        assert!(saved.contains(r#"\"spoofLocation\": true"#));
        assert!(saved.contains(r#"\"spoofLocationLatitude\": "#));
    }

    #[test]
    fn test_save_randomized_switch() {
        let dir = tempfile::tempdir().unwrap();
        let opts = SaveOptions {
            package: Some("com.example.app".into()),
            out: Some(dir.path().to_path_buf()),
            randomize: vec!["changeImei".into()],
            ..Default::default()
        };
        assert!(ctx().save(opts).unwrap());
        let path = dir.path().join("com.example.app_cloneSettings.json");
        let reloaded = AppData::load(&path);
        let map = clonecfg::build_configuration_map(&reloaded.categories);
        // 随机化后开关写为打开
        assert_eq!(map["changeImei"].as_bool(), Some(true));
    }

    #[test]
    fn test_save_unknown_profile() {
        let opts = SaveOptions {
            profile: Some("Nokia 3310".into()),
            ..Default::default()
        };
        assert!(ctx().save(opts).is_err());
    }

    #[test]
    fn test_show_config() {
        assert!(ctx().show_config().is_ok());
        assert_eq!(ctx().config.split_count(), crate::config::DEFAULT_SPLIT_COUNT);
    }

    #[test]
    fn test_unknown_profile_details() {
        assert!(ctx().list_profiles(Some("Nokia 3310")).is_err());
        assert!(ctx().list_profiles(None).is_ok());
    }
}
