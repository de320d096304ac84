use thiserror::Error;

/// Errors produced while loading, editing or saving a clone profile.
///
/// Most public entry points recover from these locally (falling back to
/// defaults or reporting `false`); the variants still carry enough context to
/// be logged.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input text is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input is valid JSON but not a category → key → value document.
    #[error("unexpected document shape: {0}")]
    Shape(String),

    /// A dropdown was given a value that is not one of its options.
    #[error("invalid option for `{key}`: expected one of {options:?}, got `{actual}`")]
    InvalidOption {
        key: String,
        options: Vec<String>,
        actual: String,
    },

    /// An operation that only applies to one custom key was called on another.
    #[error("`{key}` is not a `{expected}` setting")]
    WrongSetting { key: String, expected: &'static str },

    /// The edit targets a value variant that does not accept text input.
    #[error("`{key}` of type {setting_type} cannot be edited as text")]
    NotEditable { key: String, setting_type: String },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
