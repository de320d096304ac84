//! `.clonectl.toml` configuration.
//!
//! ```toml
//! package_name = "com.example.app"
//! output_dir = "profiles"
//! seed = 42
//! split_count = 101
//!
//! [[profile]]
//! name = "Lab phone"
//! properties = [["buildPropsBrand", "acme"], ["buildPropsModel", "A1"]]
//! ```
//!
//! Every field is optional. Command line flags take precedence.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clonecfg::DeviceProfile;
use serde::{Deserialize, Serialize};

/// Default file name looked up in the working directory.
pub const CONFIG_FILE: &str = ".clonectl.toml";

pub const DEFAULT_SPLIT_COUNT: u32 = 101;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Package the saved profile is named after.
    pub package_name: Option<String>,
    /// Directory profiles are saved into.
    pub output_dir: Option<PathBuf>,
    /// Seed for reproducible generated values.
    pub seed: Option<u64>,
    /// Number of parts an app is split into when cloned.
    pub split_count: Option<u32>,
    /// Extra device profiles added to the built-in list.
    #[serde(rename = "profile")]
    pub profiles: Vec<DeviceProfile>,
}

impl CliConfig {
    /// Read the config at `path`. A missing file gives the default config.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("no config at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn split_count(&self) -> u32 {
        self.split_count.unwrap_or(DEFAULT_SPLIT_COUNT)
    }

    /// The config with defaults filled in, as TOML.
    pub fn effective_toml(&self) -> anyhow::Result<String> {
        let effective = Self {
            split_count: Some(self.split_count()),
            ..self.clone()
        };
        toml::to_string_pretty(&effective).context("failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.split_count(), DEFAULT_SPLIT_COUNT);
    }

    #[test]
    fn test_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
package_name = "com.example.app"
output_dir = "out"
seed = 7
split_count = 12

[[profile]]
name = "Lab phone"
properties = [["buildPropsModel", "A1"]]
"#,
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.package_name.as_deref(), Some("com.example.app"));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.split_count(), 12);
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].property("buildPropsModel"), Some("A1"));
    }

    #[test]
    fn test_effective_toml_fills_split_count() {
        let config = CliConfig {
            seed: Some(3),
            ..Default::default()
        };
        let text = config.effective_toml().unwrap();
        assert!(text.contains("split_count = 101"));
        // 输出可以重新读回
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.seed, Some(3));
        assert_eq!(parsed.split_count, Some(DEFAULT_SPLIT_COUNT));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "seed = \"not a number\"").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }
}
