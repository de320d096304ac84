//! # clonecfg
//!
//! Settings engine for Android app-clone profiles.
//!
//! A clone profile is a JSON document grouping setting keys into categories.
//! `clonecfg` turns it into a typed settings model, lets callers edit it,
//! generates synthetic device identities and writes the result back as the
//! flat map the clone runtime reads.
//!
//! ## Quick Start
//!
//! ```rust
//! use clonecfg::{build_configuration_map, parse_configuration};
//!
//! let categories = parse_configuration(r#"{"deviceInformation": {"changeImei": true}}"#);
//! assert_eq!(categories[0].settings[0].display_name, "Change IMEI");
//!
//! let flat = build_configuration_map(&categories);
//! assert_eq!(flat["changeImei"], true);
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Settings model, type inference and the edit session
//! - [`export`] - Flattening and escaping for persistence
//! - [`generator`] - Synthetic identifiers and locations
//! - [`profile`] - Device profiles for build properties
//! - [`name`] - Display labels for keys

#[macro_use]
extern crate log;

pub mod data;

/// Library error type.
pub mod error;

pub mod export;

pub mod generator;

pub mod name;

pub mod profile;

pub use data::{AppData, Category, Setting, SettingType, SettingValue, parse_configuration};
pub use error::{ConfigError, Result};
pub use export::build_configuration_map;
pub use generator::{IdentityGenerator, generate_random_value, generate_realistic_location};
pub use profile::{DeviceProfile, DeviceProfiles};
