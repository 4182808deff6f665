//! Error types for the member console
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Invalid input
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// Non-positive item height or chunk size
    #[snafu(display("Configuration error: {message}"))]
    Configuration { message: String },

    /// A page fetch failed; the chunk stays unloaded and is retried on the next scroll
    #[snafu(display("Fetch of {limit} items at offset {offset} failed: {message}"))]
    FetchFailed {
        offset: usize,
        limit: usize,
        message: String,
    },

    /// The remote delete capability rejected the removal
    #[snafu(display("Delete failed: {message}"))]
    DeleteFailed { message: String },

    /// A removal is still awaiting its remote result
    #[snafu(display("A removal is already in progress"))]
    RemovalInProgress,

    /// The owning list has been unmounted
    #[snafu(display("List has been torn down"))]
    TornDown,

    /// IO error (file operations, network, etc.)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Shorthand for a fetch failure coming from a remote source
    pub fn fetch_failed(offset: usize, limit: usize, message: impl Into<String>) -> Self {
        Error::FetchFailed {
            offset,
            limit,
            message: message.into(),
        }
    }

    /// Shorthand for a delete failure coming from a remote source
    pub fn delete_failed(message: impl Into<String>) -> Self {
        Error::DeleteFailed {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
