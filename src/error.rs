//! Error type shared by every input source.
//!
//! Errors only happen while *building* things: a lifecycle missing a hook, a bad
//! identifier list, or a config file that does not parse. Once a source exists,
//! event handling, `update()` and every query are infallible.

use thiserror::Error;

/// Errors raised while constructing input sources or loading configuration.
#[derive(Debug, Error)]
pub enum InputError {
    /// A lifecycle was built without one of its mandatory hooks.
    ///
    /// This is a programmer error in the concrete source; retrying cannot help.
    #[error("incomplete input source: missing `{hook}` hook")]
    IncompleteSource { hook: &'static str },

    /// The same identifier appeared twice in one source.
    #[error("duplicate input identifier `{0}`")]
    DuplicateIdentifier(String),

    /// An identifier is empty or lacks its source namespace prefix.
    #[error("invalid input identifier `{id}`: expected a non-empty name prefixed with `{prefix}`")]
    InvalidIdentifier { id: String, prefix: &'static str },

    #[error("invalid input configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("could not serialize input configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("could not read input configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// A device backend failed to initialize.
    #[error("input backend unavailable: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, InputError>;
