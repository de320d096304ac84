//! Settings model of a clone profile.
//!
//! A profile is loaded as an ordered list of [`Category`] values, each holding
//! typed [`Setting`]s. The submodules are:
//!
//! - [`app_data`] - Edit session: load, edit and save one profile
//! - [`catalog`] - Fixed key tables (custom, dropdown and parent keys)
//! - [`category`] - Category container and lookups across categories
//! - [`infer`] - Type inference for raw key/value pairs
//! - [`parse`] - Building the model from persisted text
//! - [`setting`] - The setting type and its typed payload

/// Edit session for one profile.
pub mod app_data;

pub mod catalog;

/// Category container.
pub mod category;

/// Type inference.
pub mod infer;

pub mod parse;

/// Setting values and editing.
pub mod setting;

pub use app_data::AppData;
pub use category::Category;
pub use parse::{ConfigDocument, parse_configuration};
pub use setting::{Setting, SettingType, SettingValue};
